// ABOUTME: Risk configuration root with environment overrides, validation, and a global singleton
// ABOUTME: Combines weighted scoring, recommendation, and scorer-selection configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration
//!
//! Configuration is environment-only. Every section starts from its
//! `Default`, environment variables override individual values, and the
//! combined result is validated before use.
//!
//! | Variable | Field |
//! |---|---|
//! | `GDM_WEIGHT_HIGH_GI` | `scoring.weights.high_glycemic_index` |
//! | `GDM_WEIGHT_HIGH_CARBS` | `scoring.weights.high_carbs` |
//! | `GDM_WEIGHT_LOW_FIBER` | `scoring.weights.low_fiber` |
//! | `GDM_WEIGHT_HIGH_GL` | `scoring.weights.high_glycemic_load` |
//! | `GDM_BAND_HIGH_ABOVE` | `scoring.bands.high_above` |
//! | `GDM_BAND_MODERATE_ABOVE` | `scoring.bands.moderate_above` |
//! | `GDM_RISK_SCORER` | `scorer.kind` |
//! | `GDM_MODEL_PATH` | `scorer.model_path` |

/// Configuration error types
pub mod error;
/// Recommendation thresholds and messages
pub mod recommendation;
/// Weighted threshold scoring rule
pub mod scoring;

pub use error::ConfigError;
pub use recommendation::{RecommendationConfig, RecommendationMessages, RecommendationThresholds};
pub use scoring::{RiskBands, ScoringThresholds, ScoringWeights, WeightedScoringConfig};

use crate::intelligence::scorer::ScorerKind;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::{debug, warn};

/// Global configuration singleton
static RISK_CONFIG: OnceLock<RiskConfig> = OnceLock::new();

/// Which risk scorer to build and where its model lives
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScorerConfig {
    /// Selected scorer
    pub kind: ScorerKind,
    /// Trained-model artifact, required for the classifier scorer
    pub model_path: Option<PathBuf>,
}

impl ScorerConfig {
    /// Validate scorer selection
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingField` if the classifier scorer is selected
    /// without a model path.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.kind == ScorerKind::Classifier && self.model_path.is_none() {
            return Err(ConfigError::MissingField("GDM_MODEL_PATH"));
        }
        Ok(())
    }
}

/// Scorer choices supplied by a caller, applied over the environment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScorerOverrides {
    /// Explicit scorer, wins over everything else
    pub kind: Option<ScorerKind>,
    /// Model artifact; selects the classifier unless `kind` is also set
    pub model_path: Option<PathBuf>,
}

impl ScorerOverrides {
    fn apply(self, scorer: &mut ScorerConfig) {
        if let Some(path) = self.model_path {
            scorer.model_path = Some(path);
            scorer.kind = ScorerKind::Classifier;
        }
        if let Some(kind) = self.kind {
            scorer.kind = kind;
        }
    }
}

/// Main risk configuration container
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Interactive weighted-threshold rule
    pub scoring: WeightedScoringConfig,
    /// Recommendation generator
    pub recommendations: RecommendationConfig,
    /// Scorer selection
    pub scorer: ScorerConfig,
}

impl RiskConfig {
    /// Get the global configuration instance
    pub fn global() -> &'static Self {
        RISK_CONFIG.get_or_init(|| {
            Self::load().unwrap_or_else(|e| {
                warn!("Failed to load risk config: {}, using defaults", e);
                Self::default()
            })
        })
    }

    /// Load configuration from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values or validation fails
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(ScorerOverrides::default())
    }

    /// Load configuration from the environment, then apply caller overrides
    ///
    /// Validation runs once, after the overrides, so an explicit scorer can
    /// replace an environment selection that would not validate on its own.
    ///
    /// # Errors
    ///
    /// Returns an error if environment variables contain invalid values or the
    /// combined configuration fails validation
    pub fn load_with(overrides: ScorerOverrides) -> Result<Self, ConfigError> {
        let mut config = Self::default().apply_env_overrides()?;
        overrides.apply(&mut config.scorer);
        config.validate()?;
        debug!(scorer = %config.scorer.kind, "Loaded risk configuration");
        Ok(config)
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first validation failure of any section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scoring.validate()?;
        self.recommendations.validate()?;
        self.scorer.validate()
    }

    /// Helper function to parse and apply an environment variable override
    fn apply_env_var<T: FromStr>(env_var_name: &str, target: &mut T) -> Result<(), ConfigError> {
        if let Ok(val) = env::var(env_var_name) {
            *target = val
                .parse()
                .map_err(|_| ConfigError::Parse(format!("Invalid {env_var_name}")))?;
        }
        Ok(())
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(mut self) -> Result<Self, ConfigError> {
        let weights = &mut self.scoring.weights;
        Self::apply_env_var("GDM_WEIGHT_HIGH_GI", &mut weights.high_glycemic_index)?;
        Self::apply_env_var("GDM_WEIGHT_HIGH_CARBS", &mut weights.high_carbs)?;
        Self::apply_env_var("GDM_WEIGHT_LOW_FIBER", &mut weights.low_fiber)?;
        Self::apply_env_var("GDM_WEIGHT_HIGH_GL", &mut weights.high_glycemic_load)?;

        let bands = &mut self.scoring.bands;
        Self::apply_env_var("GDM_BAND_HIGH_ABOVE", &mut bands.high_above)?;
        Self::apply_env_var("GDM_BAND_MODERATE_ABOVE", &mut bands.moderate_above)?;

        Self::apply_env_var("GDM_RISK_SCORER", &mut self.scorer.kind)?;
        if let Ok(path) = env::var("GDM_MODEL_PATH") {
            if !path.trim().is_empty() {
                self.scorer.model_path = Some(PathBuf::from(path));
            }
        }

        Ok(self)
    }
}
