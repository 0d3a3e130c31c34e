// ABOUTME: Meal risk intelligence module: feature derivation, scoring, recommendations, training
// ABOUTME: Composes the pure derive-score-recommend pipeline and the offline classifier tooling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Intelligence Module
//!
//! Everything that turns a meal's nutrients into a risk assessment.
//!
//! - [`features`]: the 9 derived ratios and flags
//! - [`algorithms`]: the weighted-threshold score and the training-label rule
//! - [`recommendations`]: deterministic advisory messages
//! - [`classifier`]: trained-model artifacts and inference
//! - [`scorer`]: scorer selection and the [`MealRiskEngine`] pipeline
//! - [`training`]: offline logistic-regression trainer
//! - [`reference_meals`]: meals with known bands

/// Rule-based risk algorithms
pub mod algorithms;
/// Trained-model artifacts and inference
pub mod classifier;
/// Feature deriver
pub mod features;
/// Recommendation generator
pub mod recommendations;
/// Meals with known risk bands
pub mod reference_meals;
/// Scorer selection and assessment pipeline
pub mod scorer;
/// Offline classifier trainer
pub mod training;

pub use algorithms::{HighRiskLabelRule, WeightedThresholdRule};
pub use classifier::{ModelArtifact, TrainedClassifier};
pub use features::{derive, feature_vector};
pub use recommendations::RecommendationGenerator;
pub use reference_meals::{ReferenceMeal, REFERENCE_MEALS};
pub use scorer::{MealRiskEngine, RiskAssessment, RiskScorer, ScorerKind};
pub use training::{LabelledRow, LogisticTrainer, TrainingConfig, TrainingOutcome};
