// ABOUTME: Risk scorer selection and the derive-score-recommend meal assessment pipeline
// ABOUTME: Weighted-threshold, label-rule, and trained-classifier scorers behind one enum

//! Risk Scorer
//!
//! The scorer is chosen once, at configuration time, and is read-only
//! afterwards. A classifier artifact is loaded and validated while building the
//! scorer, so a broken or unsupported model fails before any meal is scored.
//!
//! Assessment is a pure pipeline:
//! `MealNutrients -> DerivedFeatures -> RiskAssessment`.

use super::algorithms::{HighRiskLabelRule, WeightedThresholdRule};
use super::classifier::metrics::DECISION_THRESHOLD;
use super::classifier::TrainedClassifier;
use super::features::derive;
use super::recommendations::RecommendationGenerator;
use crate::config::{RiskBands, RiskConfig, ScorerConfig, WeightedScoringConfig};
use gdm_core::errors::{AppError, AppResult};
use gdm_core::models::{DerivedFeatures, FeatureVector, MealNutrients, RiskLevel};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

/// Scorer selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    /// Additive weighted-threshold score with three bands
    #[default]
    WeightedThreshold,
    /// Binary training-label rule
    LabelRule,
    /// Offline-trained classifier loaded from an artifact
    Classifier,
}

impl ScorerKind {
    /// Get scorer name for logging and debugging
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::WeightedThreshold => "weighted_threshold",
            Self::LabelRule => "label_rule",
            Self::Classifier => "classifier",
        }
    }

    /// Get scorer description
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::WeightedThreshold => "Weighted threshold: interactive score with low/moderate/high bands",
            Self::LabelRule => "Label rule: binary high-risk target used for training",
            Self::Classifier => "Classifier: probability from an offline-trained model",
        }
    }
}

impl fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ScorerKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weighted_threshold" | "weighted" => Ok(Self::WeightedThreshold),
            "label_rule" | "label" => Ok(Self::LabelRule),
            "classifier" | "model" => Ok(Self::Classifier),
            other => Err(AppError::invalid_input(format!(
                "Unknown risk scorer: '{other}'. Valid options: weighted_threshold, label_rule, classifier"
            ))),
        }
    }
}

/// A configured risk scorer
#[derive(Debug, Clone)]
pub enum RiskScorer {
    /// Interactive weighted-threshold rule
    WeightedThreshold(WeightedThresholdRule),
    /// Binary training-label rule
    LabelRule(HighRiskLabelRule),
    /// Trained classifier, shared read-only
    Classifier(Arc<TrainedClassifier>),
}

impl Default for RiskScorer {
    fn default() -> Self {
        Self::WeightedThreshold(WeightedThresholdRule::default())
    }
}

impl RiskScorer {
    /// Build the configured scorer
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid weights or a classifier
    /// without a model path, and any artifact load or validation error.
    pub fn from_config(scorer: &ScorerConfig, scoring: &WeightedScoringConfig) -> AppResult<Self> {
        scorer.validate()?;
        match scorer.kind {
            ScorerKind::WeightedThreshold => Ok(Self::WeightedThreshold(
                WeightedThresholdRule::new(scoring.clone())?,
            )),
            ScorerKind::LabelRule => Ok(Self::LabelRule(HighRiskLabelRule)),
            ScorerKind::Classifier => {
                let path = scorer
                    .model_path
                    .as_deref()
                    .ok_or_else(|| AppError::config_missing("GDM_MODEL_PATH"))?;
                Ok(Self::Classifier(Arc::new(TrainedClassifier::load(path)?)))
            }
        }
    }

    /// Which scorer this is
    #[must_use]
    pub const fn kind(&self) -> ScorerKind {
        match self {
            Self::WeightedThreshold(_) => ScorerKind::WeightedThreshold,
            Self::LabelRule(_) => ScorerKind::LabelRule,
            Self::Classifier(_) => ScorerKind::Classifier,
        }
    }

    /// Risk level, binary flag, and optional score for a meal
    ///
    /// `bands` applies to classifier probabilities; the weighted rule carries
    /// its own.
    #[must_use]
    pub fn evaluate(
        &self,
        meal: &MealNutrients,
        derived: &DerivedFeatures,
        bands: &RiskBands,
    ) -> (RiskLevel, bool, Option<f64>) {
        match self {
            Self::WeightedThreshold(rule) => {
                let (score, level) = rule.classify(meal, derived);
                (level, level == RiskLevel::High, Some(score))
            }
            Self::LabelRule(rule) => {
                if rule.evaluate(meal, derived) {
                    (RiskLevel::High, true, None)
                } else {
                    (RiskLevel::Low, false, None)
                }
            }
            Self::Classifier(classifier) => {
                let features = FeatureVector::new(*meal, *derived);
                let probability = classifier.predict_proba(&features);
                (
                    bands.level(probability),
                    probability >= DECISION_THRESHOLD,
                    Some(probability),
                )
            }
        }
    }
}

/// Outcome of assessing one meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Scorer that produced the result
    pub scorer: ScorerKind,
    /// Risk band
    pub risk_level: RiskLevel,
    /// Binary high-risk decision
    pub high_risk: bool,
    /// Weighted score or classifier probability; absent for the label rule
    pub risk_score: Option<f64>,
    /// Glycemic load of the meal
    pub glycemic_load: f64,
    /// Fiber-to-carb ratio of the meal
    pub carb_quality_ratio: f64,
    /// Ordered advisory messages
    pub recommendations: Vec<String>,
}

/// Composes feature derivation, risk scoring, and recommendations
#[derive(Debug, Clone, Default)]
pub struct MealRiskEngine {
    scorer: RiskScorer,
    recommender: RecommendationGenerator,
    bands: RiskBands,
}

impl MealRiskEngine {
    /// Engine from an already-built scorer and generator, with default bands
    #[must_use]
    pub fn new(scorer: RiskScorer, recommender: RecommendationGenerator) -> Self {
        Self {
            scorer,
            recommender,
            bands: RiskBands::default(),
        }
    }

    /// Replace the bands applied to classifier probabilities
    #[must_use]
    pub fn with_bands(mut self, bands: RiskBands) -> Self {
        self.bands = bands;
        self
    }

    /// Engine from configuration, loading a classifier artifact if selected
    ///
    /// # Errors
    ///
    /// Returns configuration and artifact load errors
    pub fn from_config(config: &RiskConfig) -> AppResult<Self> {
        let scorer = RiskScorer::from_config(&config.scorer, &config.scoring)?;
        let recommender = RecommendationGenerator::new(config.recommendations.clone())?;
        info!(scorer = %scorer.kind(), "Initialized meal risk engine");
        Ok(Self::new(scorer, recommender).with_bands(config.scoring.bands.clone()))
    }

    /// Scorer in use
    #[must_use]
    pub const fn scorer(&self) -> &RiskScorer {
        &self.scorer
    }

    /// Score a meal whose features were derived by the caller
    #[must_use]
    pub fn score(&self, meal: &MealNutrients, derived: &DerivedFeatures) -> RiskAssessment {
        let (risk_level, high_risk, risk_score) = self.scorer.evaluate(meal, derived, &self.bands);
        RiskAssessment {
            scorer: self.scorer.kind(),
            risk_level,
            high_risk,
            risk_score,
            glycemic_load: derived.glycemic_load,
            carb_quality_ratio: derived.carb_quality_ratio,
            recommendations: self.recommender.generate(meal),
        }
    }

    /// Derive features and score a meal
    #[must_use]
    pub fn assess(&self, meal: &MealNutrients) -> RiskAssessment {
        self.score(meal, &derive(meal))
    }

    /// Assess many meals in parallel, preserving input order
    #[must_use]
    pub fn assess_batch(&self, meals: &[MealNutrients]) -> Vec<RiskAssessment> {
        meals.par_iter().map(|meal| self.assess(meal)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scorer_kind_aliases() {
        assert_eq!("weighted".parse::<ScorerKind>().ok(), Some(ScorerKind::WeightedThreshold));
        assert_eq!("LABEL".parse::<ScorerKind>().ok(), Some(ScorerKind::LabelRule));
        assert_eq!("model".parse::<ScorerKind>().ok(), Some(ScorerKind::Classifier));
        assert!("xgboost".parse::<ScorerKind>().is_err());
    }

    #[test]
    fn test_label_rule_has_no_score() {
        let engine = MealRiskEngine::new(
            RiskScorer::LabelRule(HighRiskLabelRule),
            RecommendationGenerator::default(),
        );
        let assessment = engine.assess(&MealNutrients {
            total_carbs_g: 80.0,
            fiber_g: 1.0,
            sugar_g: 20.0,
            glycemic_index: 73.0,
            ..MealNutrients::default()
        });
        assert_eq!(assessment.risk_level, RiskLevel::High);
        assert!(assessment.high_risk);
        assert_eq!(assessment.risk_score, None);
    }

    #[test]
    fn test_classifier_without_path_is_config_error() {
        let scorer = ScorerConfig {
            kind: ScorerKind::Classifier,
            model_path: None,
        };
        let result = RiskScorer::from_config(&scorer, &WeightedScoringConfig::default());
        assert!(result.is_err());
    }
}
