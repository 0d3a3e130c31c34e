// ABOUTME: Rule-based risk algorithms shared by interactive scoring and training-label generation
// ABOUTME: Provides the weighted-threshold score and the binary high-risk label rule

//! Rule Algorithms
//!
//! Two rules read the same nutrition signals but answer different questions,
//! so they are kept apart under distinct names:
//!
//! - [`WeightedThresholdRule`]: continuous score with low/moderate/high bands,
//!   used for interactive assessment.
//! - [`HighRiskLabelRule`]: binary label, used to produce training targets for
//!   classifiers.
//!
//! The two can disagree on the same meal. Neither is derived from the other.
//!
//! # Example
//!
//! ```rust,no_run
//! use gdm_meal_risk::intelligence::algorithms::{HighRiskLabelRule, WeightedThresholdRule};
//! use gdm_meal_risk::intelligence::features::derive;
//! use gdm_core::models::MealNutrients;
//!
//! let meal = MealNutrients { total_carbs_g: 80.0, fiber_g: 1.0, glycemic_index: 73.0, ..Default::default() };
//! let derived = derive(&meal);
//! let (score, level) = WeightedThresholdRule::default().classify(&meal, &derived);
//! let label = HighRiskLabelRule.label(&meal, &derived);
//! ```

/// Fixed three-clause rule that produces training labels
pub mod label_rule;
/// Configurable additive score banded into risk levels
pub mod weighted_threshold;

pub use label_rule::{HighRiskLabelRule, LabelClause};
pub use weighted_threshold::{RiskSignals, WeightedThresholdRule};
