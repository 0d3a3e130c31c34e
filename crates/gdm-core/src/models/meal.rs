// ABOUTME: Meal nutrient input model and the derived feature set computed from it
// ABOUTME: MealNutrients, DerivedFeatures, and the ordered 17-field FeatureVector
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::schema::{
    BASE_FEATURE_COUNT, DERIVED_FEATURE_COUNT, FEATURE_COUNT, FEATURE_NAMES,
};
use serde::{Deserialize, Serialize};

/// Macro-nutrient profile of a single meal or food serving
///
/// All amounts are non-negative. The glycemic index is conventionally in
/// `[0, 100]` but is not clamped; range checks belong to whoever collects the
/// input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MealNutrients {
    /// Total carbohydrates (grams)
    pub total_carbs_g: f64,
    /// Dietary fiber (grams)
    pub fiber_g: f64,
    /// Total sugars (grams)
    pub sugar_g: f64,
    /// Protein (grams)
    pub protein_g: f64,
    /// Total fat (grams)
    pub fat_g: f64,
    /// Saturated fat (grams)
    pub saturated_fat_g: f64,
    /// Energy (kcal)
    pub energy_kcal: f64,
    /// Glycemic index of the carbohydrate source
    pub glycemic_index: f64,
}

impl MealNutrients {
    /// Base fields in feature-vector order
    #[must_use]
    pub const fn to_array(&self) -> [f64; BASE_FEATURE_COUNT] {
        [
            self.total_carbs_g,
            self.fiber_g,
            self.sugar_g,
            self.protein_g,
            self.fat_g,
            self.saturated_fat_g,
            self.energy_kcal,
            self.glycemic_index,
        ]
    }

    /// Build from base fields given in feature-vector order
    #[must_use]
    pub const fn from_array(values: [f64; BASE_FEATURE_COUNT]) -> Self {
        let [total_carbs_g, fiber_g, sugar_g, protein_g, fat_g, saturated_fat_g, energy_kcal, glycemic_index] =
            values;
        Self {
            total_carbs_g,
            fiber_g,
            sugar_g,
            protein_g,
            fat_g,
            saturated_fat_g,
            energy_kcal,
            glycemic_index,
        }
    }
}

/// Nutritional ratios and flags derived from a [`MealNutrients`]
///
/// Every ratio with a carbohydrate denominator is `0.0` when total carbs are
/// zero, so no field is ever NaN or infinite for finite input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DerivedFeatures {
    /// GI x carbs / 100
    pub glycemic_load: f64,
    /// Fiber / carbs
    pub carb_quality_ratio: f64,
    /// Fat / carbs
    pub fat_to_carb_ratio: f64,
    /// Carbs - fiber (may be negative)
    pub net_carbs_g: f64,
    /// 100 x sugar / carbs
    pub sugar_pct_carbs: f64,
    /// Protein / carbs
    pub protein_to_carb_ratio: f64,
    /// Sugar above 15 g
    pub high_sugar: bool,
    /// Fiber below 3 g
    pub low_fiber: bool,
    /// Carbs above 45 g
    pub high_carb: bool,
}

impl DerivedFeatures {
    /// Derived fields in feature-vector order, flags encoded as 0.0/1.0
    #[must_use]
    pub fn to_array(&self) -> [f64; DERIVED_FEATURE_COUNT] {
        [
            self.glycemic_load,
            self.carb_quality_ratio,
            self.fat_to_carb_ratio,
            self.net_carbs_g,
            self.sugar_pct_carbs,
            self.protein_to_carb_ratio,
            flag_value(self.high_sugar),
            flag_value(self.low_fiber),
            flag_value(self.high_carb),
        ]
    }
}

/// Encode a binary flag the way the interchange table and models expect it
#[must_use]
pub fn flag_value(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

/// Base nutrients concatenated with their derived features
///
/// This is the 17-field contract shared by training and inference; see
/// [`FEATURE_NAMES`] for the order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Base nutrient fields
    pub nutrients: MealNutrients,
    /// Derived ratio and flag fields
    pub derived: DerivedFeatures,
}

impl FeatureVector {
    /// Combine base nutrients and their derived features
    #[must_use]
    pub const fn new(nutrients: MealNutrients, derived: DerivedFeatures) -> Self {
        Self { nutrients, derived }
    }

    /// Field names in order
    #[must_use]
    pub const fn names() -> &'static [&'static str; FEATURE_COUNT] {
        &FEATURE_NAMES
    }

    /// All 17 values in [`FEATURE_NAMES`] order
    #[must_use]
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        let mut values = [0.0; FEATURE_COUNT];
        values[..BASE_FEATURE_COUNT].copy_from_slice(&self.nutrients.to_array());
        values[BASE_FEATURE_COUNT..].copy_from_slice(&self.derived.to_array());
        values
    }

    /// Look up a single value by feature name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        let index = FEATURE_NAMES.iter().position(|candidate| *candidate == name)?;
        Some(self.to_array()[index])
    }
}
