// ABOUTME: Shared test utilities for meal risk integration tests
// ABOUTME: Quiet logging setup, meal builders, and a seeded synthetic meal generator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::similar_names
)]
//! Shared test utilities for `gdm_meal_risk`

use gdm_meal_risk::dataset::RawMealRecord;
use gdm_meal_risk::models::MealNutrients;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::env;
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        // Another test binary harness may already have installed one
        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// Meal with the four signals the scoring rules look at; other nutrients are typical
pub fn meal(total_carbs_g: f64, fiber_g: f64, sugar_g: f64, glycemic_index: f64) -> MealNutrients {
    MealNutrients {
        total_carbs_g,
        fiber_g,
        sugar_g,
        protein_g: 18.0,
        fat_g: 9.0,
        saturated_fat_g: 2.5,
        energy_kcal: 420.0,
        glycemic_index,
    }
}

/// Seeded synthetic meals spanning both label classes
pub fn synthetic_meals(count: usize, seed: u64) -> Vec<RawMealRecord> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            let total_carbs_g: f64 = rng.gen_range(0.0..120.0);
            let fiber_g: f64 = rng.gen_range(0.0..12.0);
            let sugar_g: f64 = rng.gen_range(0.0..40.0_f64).min(total_carbs_g);
            let protein_g: f64 = rng.gen_range(0.0..45.0);
            let fat_g: f64 = rng.gen_range(0.0..35.0);
            RawMealRecord {
                food_name: Some(format!("meal {i}")),
                nutrients: MealNutrients {
                    total_carbs_g,
                    fiber_g,
                    sugar_g,
                    protein_g,
                    fat_g,
                    saturated_fat_g: fat_g * 0.3,
                    energy_kcal: 4.0f64.mul_add(total_carbs_g + protein_g, 9.0 * fat_g),
                    glycemic_index: rng.gen_range(20.0..100.0),
                },
            }
        })
        .collect()
}
