// ABOUTME: Interactive weighted-threshold meal risk score with low/moderate/high bands
// ABOUTME: Adds a fixed weight per fired signal (high GI, high carbs, low fiber, high glycemic load)

use crate::config::{ConfigError, WeightedScoringConfig};
use gdm_core::models::{DerivedFeatures, MealNutrients, RiskLevel};
use serde::{Deserialize, Serialize};

/// Additive weighted-threshold risk rule
///
/// Each signal that fires adds its weight to the score:
///
/// | Signal | Condition | Weight |
/// |---|---|---|
/// | high GI | GI > 70 | 0.3 |
/// | high carbs | carbs > 45 g | 0.2 |
/// | low fiber | fiber < 3 g | 0.2 |
/// | high load | glycemic load > 20 | 0.3 |
///
/// Bands: score > 0.6 is high, 0.4 < score ≤ 0.6 is moderate, anything else
/// is low. The default weights sum to exactly 1.0, which is also the largest
/// score the rule can produce, so no clamping is applied.
///
/// # Scientific References
///
/// - Atkinson, F.S., et al. (2008). International tables of glycemic index and glycemic load values.
///   *Diabetes Care*, 31(12), 2281-2283. <https://doi.org/10.2337/dc08-1239>
/// - American Diabetes Association (2024). Management of Diabetes in Pregnancy.
///   *Diabetes Care*, 47(Suppl. 1), S282-S294.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightedThresholdRule {
    config: WeightedScoringConfig,
}

/// Which weighted signals fired for a meal
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskSignals {
    /// GI above threshold
    pub high_glycemic_index: bool,
    /// Carbs above threshold
    pub high_carbs: bool,
    /// Fiber below threshold
    pub low_fiber: bool,
    /// Glycemic load above threshold
    pub high_glycemic_load: bool,
}

impl WeightedThresholdRule {
    /// Build a rule from validated configuration
    ///
    /// # Errors
    ///
    /// Returns the configuration's validation error
    pub fn new(config: WeightedScoringConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &WeightedScoringConfig {
        &self.config
    }

    /// Evaluate each signal
    #[must_use]
    pub fn signals(&self, meal: &MealNutrients, derived: &DerivedFeatures) -> RiskSignals {
        let thresholds = &self.config.thresholds;
        RiskSignals {
            high_glycemic_index: meal.glycemic_index > thresholds.high_glycemic_index,
            high_carbs: meal.total_carbs_g > thresholds.high_carbs_g,
            low_fiber: meal.fiber_g < thresholds.low_fiber_g,
            high_glycemic_load: derived.glycemic_load > thresholds.high_glycemic_load,
        }
    }

    /// Continuous risk score in `[0, sum of weights]`
    #[must_use]
    pub fn score(&self, meal: &MealNutrients, derived: &DerivedFeatures) -> f64 {
        let signals = self.signals(meal, derived);
        let weights = &self.config.weights;

        // Accumulation order is fixed so band boundaries are reproducible
        let mut score = 0.0;
        if signals.high_glycemic_index {
            score += weights.high_glycemic_index;
        }
        if signals.high_carbs {
            score += weights.high_carbs;
        }
        if signals.low_fiber {
            score += weights.low_fiber;
        }
        if signals.high_glycemic_load {
            score += weights.high_glycemic_load;
        }
        score
    }

    /// Map a score onto a risk band
    #[must_use]
    pub fn band(&self, score: f64) -> RiskLevel {
        self.config.bands.level(score)
    }

    /// Score a meal and band the result
    #[must_use]
    pub fn classify(&self, meal: &MealNutrients, derived: &DerivedFeatures) -> (f64, RiskLevel) {
        let score = self.score(meal, derived);
        (score, self.band(score))
    }

    /// Get algorithm name for logging and debugging
    #[must_use]
    pub const fn name(&self) -> &'static str {
        "weighted_threshold"
    }

    /// Get algorithm description
    #[must_use]
    pub const fn description(&self) -> &'static str {
        "Weighted threshold: additive score over GI, carbs, fiber and glycemic load signals"
    }

    /// Get the formula as a string
    #[must_use]
    pub const fn formula(&self) -> &'static str {
        "0.3[GI>70] + 0.2[carbs>45] + 0.2[fiber<3] + 0.3[GL>20]"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intelligence::features::derive;

    fn meal(total_carbs_g: f64, fiber_g: f64, glycemic_index: f64) -> MealNutrients {
        MealNutrients {
            total_carbs_g,
            fiber_g,
            glycemic_index,
            ..MealNutrients::default()
        }
    }

    fn classify(m: &MealNutrients) -> (f64, RiskLevel) {
        WeightedThresholdRule::default().classify(m, &derive(m))
    }

    #[test]
    fn test_all_signals_sum_to_one() {
        let (score, level) = classify(&meal(80.0, 1.0, 73.0));
        assert!((score - 1.0).abs() < 1e-12);
        assert_eq!(level, RiskLevel::High);
    }

    #[test]
    fn test_no_signals_is_low() {
        let (score, level) = classify(&meal(30.0, 5.0, 55.0));
        assert!(score.abs() < f64::EPSILON);
        assert_eq!(level, RiskLevel::Low);
    }

    #[test]
    fn test_carbs_and_load_is_moderate() {
        let (score, level) = classify(&meal(50.0, 4.0, 68.0));
        assert!((score - 0.5).abs() < 1e-12);
        assert_eq!(level, RiskLevel::Moderate);
    }

    #[test]
    fn test_band_boundaries_are_exclusive_below() {
        let rule = WeightedThresholdRule::default();
        assert_eq!(rule.band(0.4), RiskLevel::Low);
        assert_eq!(rule.band(0.41), RiskLevel::Moderate);
        assert_eq!(rule.band(0.6), RiskLevel::Moderate);
        assert_eq!(rule.band(0.61), RiskLevel::High);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = WeightedScoringConfig::default();
        config.weights.high_carbs = 0.9;
        assert!(WeightedThresholdRule::new(config).is_err());
    }
}
