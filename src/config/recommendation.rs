// ABOUTME: Recommendation configuration for meal-level glucose management advice
// ABOUTME: Configures trigger thresholds and the fixed advisory message for each trigger
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Recommendation Configuration
//!
//! Each threshold triggers exactly one advisory message. Messages are plain
//! strings so that a deployment can localise them without touching the
//! trigger logic.

use super::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Recommendation generator configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationConfig {
    /// Trigger thresholds
    pub thresholds: RecommendationThresholds,
    /// Advisory messages, one per trigger
    pub messages: RecommendationMessages,
}

/// Trigger thresholds for recommendations (all strict comparisons)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationThresholds {
    /// Carbs above this (grams) suggest a smaller portion: 45
    pub high_carbs_g: f64,
    /// Fiber below this (grams) suggests adding fiber: 5
    pub low_fiber_g: f64,
    /// GI above this suggests a lower-GI alternative: 70
    pub high_glycemic_index: f64,
    /// Fat below this (grams) suggests adding fat, together with `fat_carbs_above_g`: 5
    pub low_fat_g: f64,
    /// Carbs above this (grams) are required for the fat advice: 30
    pub fat_carbs_above_g: f64,
    /// Protein below this (grams) suggests adding protein: 15
    pub low_protein_g: f64,
}

/// Advisory message templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationMessages {
    /// Too many carbohydrates
    pub reduce_portion: String,
    /// Not enough fiber
    pub add_fiber: String,
    /// High glycemic index
    pub lower_gi: String,
    /// Carb-heavy meal without fat
    pub add_fat: String,
    /// Not enough protein
    pub add_protein: String,
    /// Returned alone when no other message applies
    pub well_balanced: String,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            high_carbs_g: 45.0,
            low_fiber_g: 5.0,
            high_glycemic_index: 70.0,
            low_fat_g: 5.0,
            fat_carbs_above_g: 30.0,
            low_protein_g: 15.0,
        }
    }
}

impl Default for RecommendationMessages {
    fn default() -> Self {
        Self {
            reduce_portion: "Consider reducing portion size to lower total carbs".to_owned(),
            add_fiber: "Add more fiber (vegetables, whole grains, legumes)".to_owned(),
            lower_gi: "Choose lower GI alternatives (brown rice instead of white)".to_owned(),
            add_fat: "Add healthy fats to slow carb absorption (nuts, avocado, olive oil)"
                .to_owned(),
            add_protein: "Include more protein to stabilize blood sugar".to_owned(),
            well_balanced: "This meal looks well-balanced!".to_owned(),
        }
    }
}

impl RecommendationConfig {
    /// Validate thresholds and messages
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValueOutOfRange` if a threshold is negative or not
    /// finite, and `ConfigError::MissingField` if a message is empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        let thresholds = [
            ("high_carbs_g", t.high_carbs_g),
            ("low_fiber_g", t.low_fiber_g),
            ("high_glycemic_index", t.high_glycemic_index),
            ("low_fat_g", t.low_fat_g),
            ("fat_carbs_above_g", t.fat_carbs_above_g),
            ("low_protein_g", t.low_protein_g),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ValueOutOfRange(format!(
                    "recommendation threshold {name} must be non-negative, got {value}"
                )));
            }
        }

        let m = &self.messages;
        let messages = [
            ("reduce_portion", &m.reduce_portion),
            ("add_fiber", &m.add_fiber),
            ("lower_gi", &m.lower_gi),
            ("add_fat", &m.add_fat),
            ("add_protein", &m.add_protein),
            ("well_balanced", &m.well_balanced),
        ];
        for (name, message) in messages {
            if message.trim().is_empty() {
                return Err(ConfigError::MissingField(name));
            }
        }

        Ok(())
    }
}
