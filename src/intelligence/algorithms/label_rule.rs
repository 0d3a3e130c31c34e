// ABOUTME: Binary high-risk labelling rule used to manufacture classifier training targets
// ABOUTME: Three-way OR of conjunctions over GI, carbs, fiber, glycemic load, and sugar flag

use gdm_core::constants::label_rule::{
    HIGH_CARBS_G, HIGH_GLYCEMIC_INDEX, HIGH_GLYCEMIC_LOAD, LOW_CARB_QUALITY_RATIO, LOW_FIBER_G,
};
use gdm_core::models::{DerivedFeatures, MealNutrients};
use serde::{Deserialize, Serialize};

/// Conjunction of the label rule that marked a meal high risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelClause {
    /// GI > 70 and carbs > 45 g and fiber < 3 g
    HighGiCarbHeavyLowFiber,
    /// Glycemic load > 20 and carb quality ratio < 0.1
    HighLoadLowQuality,
    /// GI > 70 and sugar above the flag threshold
    HighGiHighSugar,
}

impl LabelClause {
    /// Stable clause name
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::HighGiCarbHeavyLowFiber => "high_gi_carb_heavy_low_fiber",
            Self::HighLoadLowQuality => "high_load_low_quality",
            Self::HighGiHighSugar => "high_gi_high_sugar",
        }
    }
}

/// Rule producing the binary `high_risk` training label
///
/// `high_risk = 1` if any of:
/// 1. GI > 70 AND carbs > 45 g AND fiber < 3 g
/// 2. glycemic load > 20 AND carb quality ratio < 0.1
/// 3. GI > 70 AND `high_sugar`
///
/// The thresholds are constants because every trained classifier depends on
/// the exact labels this rule produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighRiskLabelRule;

impl HighRiskLabelRule {
    /// First clause that fires, in rule order
    #[must_use]
    pub fn matched_clause(
        &self,
        meal: &MealNutrients,
        derived: &DerivedFeatures,
    ) -> Option<LabelClause> {
        let high_gi = meal.glycemic_index > HIGH_GLYCEMIC_INDEX;

        if high_gi && meal.total_carbs_g > HIGH_CARBS_G && meal.fiber_g < LOW_FIBER_G {
            Some(LabelClause::HighGiCarbHeavyLowFiber)
        } else if derived.glycemic_load > HIGH_GLYCEMIC_LOAD
            && derived.carb_quality_ratio < LOW_CARB_QUALITY_RATIO
        {
            Some(LabelClause::HighLoadLowQuality)
        } else if high_gi && derived.high_sugar {
            Some(LabelClause::HighGiHighSugar)
        } else {
            None
        }
    }

    /// Whether the meal is labelled high risk
    #[must_use]
    pub fn evaluate(&self, meal: &MealNutrients, derived: &DerivedFeatures) -> bool {
        self.matched_clause(meal, derived).is_some()
    }

    /// Label as written to the interchange table
    #[must_use]
    pub fn label(&self, meal: &MealNutrients, derived: &DerivedFeatures) -> u8 {
        u8::from(self.evaluate(meal, derived))
    }

    /// Get algorithm name for logging and debugging
    #[must_use]
    pub const fn name(&self) -> &'static str {
        "label_rule"
    }

    /// Get algorithm description
    #[must_use]
    pub const fn description(&self) -> &'static str {
        "Label rule: binary high-risk target used to train classifiers"
    }

    /// Get the formula as a string
    #[must_use]
    pub const fn formula(&self) -> &'static str {
        "(GI>70 & carbs>45 & fiber<3) | (GL>20 & fiber/carbs<0.1) | (GI>70 & sugar>15)"
    }
}
