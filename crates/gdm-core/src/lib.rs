// ABOUTME: Core types and constants for the gestational diabetes meal risk engine
// ABOUTME: Foundation crate with error handling, feature-schema constants, and meal models
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # GDM Core
//!
//! Foundation crate providing the shared types and constants of the meal risk
//! engine. Everything here is part of the contract between the feature deriver,
//! the rule-based scorers and any offline-trained classifier, so it is kept in
//! a crate that changes infrequently.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError` and `ErrorCode`
//! - **constants**: Feature-schema thresholds, label-rule thresholds and the ordered feature names
//! - **models**: `MealNutrients`, `DerivedFeatures` and the 17-field `FeatureVector`

/// Unified error handling system with standard error codes
pub mod errors;

/// Feature-schema and label-rule constants organized by domain
pub mod constants;

/// Meal nutrient and feature models
pub mod models;
