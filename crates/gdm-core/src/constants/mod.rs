// ABOUTME: Feature-schema constants shared by the deriver, the rule scorers, and trained models
// ABOUTME: Flag thresholds, label-rule thresholds, and the ordered 17-name feature list
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! These values define the feature contract between training and inference.
//! Changing any of them changes the meaning of every previously trained model,
//! which is why they are constants rather than configuration.

/// Thresholds used by the binary flags in the derived feature set
pub mod feature_flags {
    /// Sugar above this amount (grams) sets `high_sugar`
    pub const HIGH_SUGAR_THRESHOLD_G: f64 = 15.0;

    /// Fiber below this amount (grams) sets `low_fiber`
    pub const LOW_FIBER_THRESHOLD_G: f64 = 3.0;

    /// Total carbohydrates above this amount (grams) sets `high_carb`
    pub const HIGH_CARB_THRESHOLD_G: f64 = 45.0;
}

/// Thresholds of the `high_risk` training-label rule
///
/// The rule is a disjunction of three conjunctions:
/// 1. GI > 70 and carbs > 45 g and fiber < 3 g
/// 2. glycemic load > 20 and carb quality ratio < 0.1
/// 3. GI > 70 and `high_sugar`
pub mod label_rule {
    /// Glycemic index above which a food counts as high-GI
    pub const HIGH_GLYCEMIC_INDEX: f64 = 70.0;

    /// Total carbohydrate amount (grams) above which a meal counts as carb-heavy
    pub const HIGH_CARBS_G: f64 = 45.0;

    /// Fiber amount (grams) below which a meal counts as fiber-poor
    pub const LOW_FIBER_G: f64 = 3.0;

    /// Glycemic load above which a meal counts as high-load
    pub const HIGH_GLYCEMIC_LOAD: f64 = 20.0;

    /// Fiber-to-carb ratio below which carbohydrates count as low quality
    pub const LOW_CARB_QUALITY_RATIO: f64 = 0.1;
}

/// Glycemic arithmetic
pub mod glycemic {
    /// Divisor turning GI x carbs into glycemic load
    pub const GLYCEMIC_LOAD_DIVISOR: f64 = 100.0;

    /// Multiplier turning a sugar/carb fraction into a percentage
    pub const PERCENT: f64 = 100.0;
}

/// Column names of the 17-field feature vector and the interchange table
pub mod schema {
    /// Number of base nutrient fields
    pub const BASE_FEATURE_COUNT: usize = 8;

    /// Number of derived fields
    pub const DERIVED_FEATURE_COUNT: usize = 9;

    /// Total number of fields in a feature vector
    pub const FEATURE_COUNT: usize = BASE_FEATURE_COUNT + DERIVED_FEATURE_COUNT;

    /// Ordered feature names; training and inference must use exactly this list
    pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
        "total_carbs_g",
        "fiber_g",
        "sugar_g",
        "protein_g",
        "fat_g",
        "saturated_fat_g",
        "energy_kcal",
        "glycemic_index",
        "glycemic_load",
        "carb_quality_ratio",
        "fat_to_carb_ratio",
        "net_carbs_g",
        "sugar_pct_carbs",
        "protein_to_carb_ratio",
        "high_sugar",
        "low_fiber",
        "high_carb",
    ];

    /// Column holding the binary training label
    pub const LABEL_COLUMN: &str = "high_risk";

    /// Optional free-text column identifying a food or meal
    pub const NAME_COLUMN: &str = "food_name";
}

pub use schema::{FEATURE_COUNT, FEATURE_NAMES, LABEL_COLUMN};
