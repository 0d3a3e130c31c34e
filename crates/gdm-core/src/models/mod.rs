// ABOUTME: Data models module for meal nutrients, derived feature vectors, and risk levels
// ABOUTME: Re-exports the meal input, derived feature, feature vector, and risk band types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Meal models shared by every crate in the workspace.

/// Meal nutrient input, derived features, and the 17-field feature vector
pub mod meal;
/// Risk bands
pub mod risk;

pub use meal::{DerivedFeatures, FeatureVector, MealNutrients};
pub use risk::RiskLevel;
