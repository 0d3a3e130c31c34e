// ABOUTME: Deterministic meal recommendation generator for glucose management
// ABOUTME: Appends one advisory per triggered condition, or a single well-balanced message

//! Recommendation Generator
//!
//! Recommendations are independent and additive: each condition that holds
//! appends its message, in a fixed order, and several may fire together.
//! When nothing fires the list holds only the well-balanced message. The same
//! input always yields the same ordered list.
//!
//! | Condition | Advice |
//! |---|---|
//! | carbs > 45 g | reduce portion size |
//! | fiber < 5 g | add fiber |
//! | GI > 70 | choose lower-GI alternatives |
//! | fat < 5 g and carbs > 30 g | add healthy fats |
//! | protein < 15 g | add protein |

use crate::config::{ConfigError, RecommendationConfig};
use gdm_core::models::MealNutrients;

/// Generates advisory messages from a meal's base nutrients
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationGenerator {
    config: RecommendationConfig,
}

impl RecommendationGenerator {
    /// Build a generator from validated configuration
    ///
    /// # Errors
    ///
    /// Returns the configuration's validation error
    pub fn new(config: RecommendationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Ordered advisory messages for a meal
    #[must_use]
    pub fn generate(&self, meal: &MealNutrients) -> Vec<String> {
        let t = &self.config.thresholds;
        let m = &self.config.messages;

        let triggers = [
            (meal.total_carbs_g > t.high_carbs_g, &m.reduce_portion),
            (meal.fiber_g < t.low_fiber_g, &m.add_fiber),
            (meal.glycemic_index > t.high_glycemic_index, &m.lower_gi),
            (
                meal.fat_g < t.low_fat_g && meal.total_carbs_g > t.fat_carbs_above_g,
                &m.add_fat,
            ),
            (meal.protein_g < t.low_protein_g, &m.add_protein),
        ];

        let recommendations: Vec<String> = triggers
            .into_iter()
            .filter(|(fired, _)| *fired)
            .map(|(_, message)| message.clone())
            .collect();

        if recommendations.is_empty() {
            vec![m.well_balanced.clone()]
        } else {
            recommendations
        }
    }
}
