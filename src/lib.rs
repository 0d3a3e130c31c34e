// ABOUTME: Main library entry point for the gestational diabetes meal risk engine
// ABOUTME: Feature derivation, rule and classifier risk scoring, recommendations, and dataset tooling
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # GDM Meal Risk
//!
//! Estimates whether a meal's nutritional profile is likely to cause a high
//! post-meal blood glucose spike, for people managing gestational diabetes.
//!
//! ## Pipeline
//!
//! ```text
//! MealNutrients -> DerivedFeatures -> RiskAssessment
//!   (8 fields)      (9 ratios/flags)   (band, score, recommendations)
//! ```
//!
//! The deriver, the rule scorers and the recommendation generator are pure
//! functions. The only state is an optional trained classifier, which is
//! loaded and validated once and then shared read-only.
//!
//! ## Architecture
//!
//! - **intelligence**: feature deriver, rule algorithms, classifier, scorer, trainer
//! - **dataset**: CSV interchange for raw and labelled feature tables
//! - **config**: environment-driven configuration with validation
//! - **logging**: structured `tracing` setup
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use gdm_meal_risk::intelligence::MealRiskEngine;
//! use gdm_core::models::MealNutrients;
//!
//! let engine = MealRiskEngine::default();
//! let assessment = engine.assess(&MealNutrients {
//!     total_carbs_g: 80.0,
//!     fiber_g: 1.0,
//!     glycemic_index: 73.0,
//!     ..MealNutrients::default()
//! });
//! println!("{} risk: {:?}", assessment.risk_level, assessment.recommendations);
//! ```

/// Environment-driven configuration
pub mod config;

/// Tabular interchange for meal datasets
pub mod dataset;

/// Feature derivation, risk scoring, recommendations, and training
pub mod intelligence;

/// Structured logging setup
pub mod logging;

pub use gdm_core::errors;
pub use gdm_core::models;
