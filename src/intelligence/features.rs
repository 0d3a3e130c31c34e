// ABOUTME: Feature deriver turning a meal's base nutrients into glycemic ratios and flags
// ABOUTME: Glycemic load, carb quality, macro-to-carb ratios, net carbs, and threshold flags
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Feature Deriver
//!
//! Pure, stateless transformation from the 8 base nutrient measurements of a
//! meal to the 9 derived features consumed by every risk scorer. The same
//! function serves interactive requests and offline batches; there is no
//! call-site specific behaviour.
//!
//! # Formulas
//!
//! | Feature | Formula |
//! |---|---|
//! | `glycemic_load` | GI x carbs / 100 |
//! | `carb_quality_ratio` | fiber / carbs |
//! | `fat_to_carb_ratio` | fat / carbs |
//! | `net_carbs_g` | carbs - fiber |
//! | `sugar_pct_carbs` | 100 x sugar / carbs |
//! | `protein_to_carb_ratio` | protein / carbs |
//! | `high_sugar` | sugar > 15 g |
//! | `low_fiber` | fiber < 3 g |
//! | `high_carb` | carbs > 45 g |
//!
//! Every carb-denominator ratio is defined as `0.0` when total carbs are zero.
//! Nothing is clamped or rounded.
//!
//! # Scientific References
//!
//! - Salmerón, J., et al. (1997). Dietary fiber, glycemic load, and risk of NIDDM in women.
//!   *JAMA*, 277(6), 472-477. <https://doi.org/10.1001/jama.1997.03540300040031>
//! - Atkinson, F.S., et al. (2008). International tables of glycemic index and glycemic load values.
//!   *Diabetes Care*, 31(12), 2281-2283. <https://doi.org/10.2337/dc08-1239>

use gdm_core::constants::feature_flags::{
    HIGH_CARB_THRESHOLD_G, HIGH_SUGAR_THRESHOLD_G, LOW_FIBER_THRESHOLD_G,
};
use gdm_core::constants::glycemic::{GLYCEMIC_LOAD_DIVISOR, PERCENT};
use gdm_core::models::{DerivedFeatures, FeatureVector, MealNutrients};

/// Derive the 9 nutrition features of a meal
///
/// Total and deterministic: never fails, never produces NaN or infinity for
/// finite input, and returns bit-identical output for identical input.
#[must_use]
pub fn derive(meal: &MealNutrients) -> DerivedFeatures {
    let carbs = meal.total_carbs_g;

    DerivedFeatures {
        glycemic_load: glycemic_load(meal.glycemic_index, carbs),
        carb_quality_ratio: per_carb(meal.fiber_g, carbs),
        fat_to_carb_ratio: per_carb(meal.fat_g, carbs),
        net_carbs_g: carbs - meal.fiber_g,
        sugar_pct_carbs: per_carb(meal.sugar_g, carbs) * PERCENT,
        protein_to_carb_ratio: per_carb(meal.protein_g, carbs),
        high_sugar: meal.sugar_g > HIGH_SUGAR_THRESHOLD_G,
        low_fiber: meal.fiber_g < LOW_FIBER_THRESHOLD_G,
        high_carb: carbs > HIGH_CARB_THRESHOLD_G,
    }
}

/// Derive features and concatenate them with the base nutrients
#[must_use]
pub fn feature_vector(meal: &MealNutrients) -> FeatureVector {
    FeatureVector::new(*meal, derive(meal))
}

/// Glycemic load of a serving
///
/// Formula: GL = GI x carbs / 100
///
/// # Reference
/// Salmerón et al. (1997) DOI: 10.1001/jama.1997.03540300040031
#[must_use]
pub fn glycemic_load(glycemic_index: f64, total_carbs_g: f64) -> f64 {
    (glycemic_index * total_carbs_g) / GLYCEMIC_LOAD_DIVISOR
}

/// Ratio against total carbohydrates, `0.0` when there are no carbohydrates
#[allow(clippy::float_cmp)] // Safe: exact zero is the documented guard, not an approximation
fn per_carb(numerator: f64, total_carbs_g: f64) -> f64 {
    if total_carbs_g == 0.0 {
        0.0
    } else {
        numerator / total_carbs_g
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meal(total_carbs_g: f64, fiber_g: f64, sugar_g: f64, glycemic_index: f64) -> MealNutrients {
        MealNutrients {
            total_carbs_g,
            fiber_g,
            sugar_g,
            protein_g: 12.0,
            fat_g: 8.0,
            saturated_fat_g: 2.0,
            energy_kcal: 350.0,
            glycemic_index,
        }
    }

    #[test]
    fn test_zero_carbs_ratios_are_exactly_zero() {
        let derived = derive(&meal(0.0, 2.0, 1.0, 50.0));

        assert_eq!(derived.carb_quality_ratio.to_bits(), 0.0_f64.to_bits());
        assert_eq!(derived.fat_to_carb_ratio.to_bits(), 0.0_f64.to_bits());
        assert_eq!(derived.sugar_pct_carbs.to_bits(), 0.0_f64.to_bits());
        assert_eq!(derived.protein_to_carb_ratio.to_bits(), 0.0_f64.to_bits());
        assert!(derived.glycemic_load.abs() < f64::EPSILON);
    }

    #[test]
    fn test_glycemic_load_is_linear() {
        assert!(derive(&meal(50.0, 4.0, 5.0, 0.0)).glycemic_load.abs() < f64::EPSILON);
        assert!((derive(&meal(50.0, 4.0, 5.0, 100.0)).glycemic_load - 50.0).abs() < 1e-12);
        assert!((glycemic_load(73.0, 80.0) - 58.4).abs() < 1e-9);
    }

    #[test]
    fn test_net_carbs_may_go_negative() {
        let derived = derive(&meal(5.0, 8.0, 1.0, 30.0));
        assert!((derived.net_carbs_g - -3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_ratios_against_carbs() {
        let derived = derive(&meal(40.0, 4.0, 10.0, 55.0));

        assert!((derived.carb_quality_ratio - 0.1).abs() < 1e-12);
        assert!((derived.fat_to_carb_ratio - 0.2).abs() < 1e-12);
        assert!((derived.sugar_pct_carbs - 25.0).abs() < 1e-12);
        assert!((derived.protein_to_carb_ratio - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_flags_use_strict_thresholds() {
        let at_thresholds = derive(&meal(45.0, 3.0, 15.0, 55.0));
        assert!(!at_thresholds.high_sugar);
        assert!(!at_thresholds.low_fiber);
        assert!(!at_thresholds.high_carb);

        let past_thresholds = derive(&meal(45.5, 2.9, 15.1, 55.0));
        assert!(past_thresholds.high_sugar);
        assert!(past_thresholds.low_fiber);
        assert!(past_thresholds.high_carb);
    }

    #[test]
    fn test_feature_vector_keeps_base_values() {
        let input = meal(80.0, 1.0, 20.0, 73.0);
        let vector = feature_vector(&input);

        assert_eq!(vector.nutrients, input);
        assert_eq!(vector.derived, derive(&input));
        assert_eq!(vector.get("high_sugar"), Some(1.0));
    }
}
