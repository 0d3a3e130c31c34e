// ABOUTME: Reference meals with known risk bands for demonstrations and regression checks
// ABOUTME: Five common meals spanning low, moderate, and high weighted-threshold bands

use gdm_core::models::{MealNutrients, RiskLevel};

/// A named meal with the band the weighted-threshold rule should assign
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceMeal {
    /// Display name
    pub name: &'static str,
    /// Nutrient profile (unlisted nutrients are zero)
    pub nutrients: MealNutrients,
    /// Expected weighted-threshold band
    pub expected: RiskLevel,
}

const fn meal(total_carbs_g: f64, fiber_g: f64, glycemic_index: f64) -> MealNutrients {
    MealNutrients {
        total_carbs_g,
        fiber_g,
        sugar_g: 0.0,
        protein_g: 0.0,
        fat_g: 0.0,
        saturated_fat_g: 0.0,
        energy_kcal: 0.0,
        glycemic_index,
    }
}

/// Reference meals in display order
pub const REFERENCE_MEALS: [ReferenceMeal; 5] = [
    ReferenceMeal {
        name: "White rice + soda",
        nutrients: meal(80.0, 1.0, 73.0),
        expected: RiskLevel::High,
    },
    ReferenceMeal {
        name: "Brown rice + chicken + veggies",
        nutrients: meal(50.0, 4.0, 68.0),
        expected: RiskLevel::Moderate,
    },
    ReferenceMeal {
        name: "Quinoa salad",
        nutrients: meal(40.0, 6.0, 53.0),
        expected: RiskLevel::Low,
    },
    ReferenceMeal {
        name: "Apple with almond butter",
        nutrients: meal(25.0, 4.0, 36.0),
        expected: RiskLevel::Low,
    },
    ReferenceMeal {
        name: "White bread with jam",
        nutrients: meal(60.0, 2.0, 75.0),
        expected: RiskLevel::High,
    },
];
