// ABOUTME: Weighted-threshold scoring configuration for interactive meal risk assessment
// ABOUTME: Configures signal thresholds, additive weights, and low/moderate/high band cut points
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Weighted Threshold Scoring Configuration
//!
//! The interactive score adds a fixed weight for each of four signals:
//! high GI, high carbohydrate amount, low fiber and high glycemic load. The
//! defaults sum to exactly 1.0, so the score is bounded by `[0, 1]` without
//! any clamping; validation keeps it that way for overridden weights.
//!
//! # Clinical Context
//!
//! - Gestational diabetes 1-hour post-meal target: < 140 mg/dL
//!   (American Diabetes Association, Standards of Care 2024, Section 15).
//! - GI bands: low ≤ 55, medium 56-69, high ≥ 70 (Atkinson et al. 2008,
//!   DOI: 10.2337/dc08-1239).
//! - Glycemic load bands: low ≤ 10, medium 11-19, high ≥ 20.

use super::error::ConfigError;
use gdm_core::models::RiskLevel;
use serde::{Deserialize, Serialize};

/// Weighted threshold scoring configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightedScoringConfig {
    /// Signal thresholds
    pub thresholds: ScoringThresholds,
    /// Weight added when each signal fires
    pub weights: ScoringWeights,
    /// Score cut points for the risk bands
    pub bands: RiskBands,
}

/// Thresholds at which each scoring signal fires (all strict comparisons)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringThresholds {
    /// GI strictly above this fires the high-GI signal: 70
    pub high_glycemic_index: f64,
    /// Carbs strictly above this (grams) fire the high-carb signal: 45
    pub high_carbs_g: f64,
    /// Fiber strictly below this (grams) fires the low-fiber signal: 3
    pub low_fiber_g: f64,
    /// Glycemic load strictly above this fires the high-load signal: 20
    pub high_glycemic_load: f64,
}

/// Additive weights of the scoring signals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// High GI: 0.3
    pub high_glycemic_index: f64,
    /// High carbs: 0.2
    pub high_carbs: f64,
    /// Low fiber: 0.2
    pub low_fiber: f64,
    /// High glycemic load: 0.3
    pub high_glycemic_load: f64,
}

impl ScoringWeights {
    /// Sum of all weights, the largest score the rule can produce
    #[must_use]
    pub fn total(&self) -> f64 {
        self.high_glycemic_index + self.high_carbs + self.low_fiber + self.high_glycemic_load
    }
}

/// Score cut points; a score must be strictly above a cut point to reach its band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskBands {
    /// Scores above this are high risk: 0.6
    pub high_above: f64,
    /// Scores above this (and not high) are moderate risk: 0.4
    pub moderate_above: f64,
}

impl RiskBands {
    /// Band a score or probability
    #[must_use]
    pub fn level(&self, score: f64) -> RiskLevel {
        if score > self.high_above {
            RiskLevel::High
        } else if score > self.moderate_above {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}

impl Default for ScoringThresholds {
    fn default() -> Self {
        Self {
            high_glycemic_index: 70.0,
            high_carbs_g: 45.0,
            low_fiber_g: 3.0,
            high_glycemic_load: 20.0,
        }
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            high_glycemic_index: 0.3,
            high_carbs: 0.2,
            low_fiber: 0.2,
            high_glycemic_load: 0.3,
        }
    }
}

impl Default for RiskBands {
    fn default() -> Self {
        Self {
            high_above: 0.6,
            moderate_above: 0.4,
        }
    }
}

/// Tolerance on the weight total so that 0.3 + 0.2 + 0.2 + 0.3 passes
const WEIGHT_TOTAL_TOLERANCE: f64 = 1e-9;

impl WeightedScoringConfig {
    /// Validate weights, thresholds, and bands
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidWeights` if any weight is negative or the
    /// weights sum to more than 1.0, `ConfigError::ValueOutOfRange` if a
    /// threshold is negative, and `ConfigError::InvalidRange` if the bands are
    /// not ordered inside `[0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = [
            ("high_glycemic_index", self.weights.high_glycemic_index),
            ("high_carbs", self.weights.high_carbs),
            ("low_fiber", self.weights.low_fiber),
            ("high_glycemic_load", self.weights.high_glycemic_load),
        ];
        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::InvalidWeights(format!(
                    "{name} weight must be a non-negative number, got {weight}"
                )));
            }
        }

        let total = self.weights.total();
        if total > 1.0 + WEIGHT_TOTAL_TOLERANCE {
            return Err(ConfigError::InvalidWeights(format!(
                "scoring weights must sum to at most 1.0, got {total}"
            )));
        }

        let thresholds = [
            ("high_glycemic_index", self.thresholds.high_glycemic_index),
            ("high_carbs_g", self.thresholds.high_carbs_g),
            ("low_fiber_g", self.thresholds.low_fiber_g),
            ("high_glycemic_load", self.thresholds.high_glycemic_load),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ValueOutOfRange(format!(
                    "{name} threshold must be a non-negative number, got {value}"
                )));
            }
        }

        let bands = &self.bands;
        if !(0.0..=1.0).contains(&bands.moderate_above) || !(0.0..=1.0).contains(&bands.high_above)
        {
            return Err(ConfigError::InvalidRange(
                "risk band cut points must be between 0.0 and 1.0",
            ));
        }
        if bands.moderate_above >= bands.high_above {
            return Err(ConfigError::InvalidRange(
                "moderate_above must be < high_above",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate_and_sum_to_one() {
        let config = WeightedScoringConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.weights.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_weights_above_one_rejected() {
        let mut config = WeightedScoringConfig::default();
        config.weights.high_glycemic_load = 0.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWeights(_))
        ));
    }

    #[test]
    fn test_negative_weight_rejected() {
        let mut config = WeightedScoringConfig::default();
        config.weights.low_fiber = -0.1;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidWeights(_))
        ));
    }

    #[test]
    fn test_inverted_bands_rejected() {
        let mut config = WeightedScoringConfig::default();
        config.bands.moderate_above = 0.7;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRange(_))));
    }
}
