// ABOUTME: Criterion benchmarks for feature derivation and meal risk scoring
// ABOUTME: Measures single-meal latency and parallel batch throughput for each scorer
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Criterion benchmarks for the derive-score-recommend pipeline.

#![allow(clippy::missing_docs_in_private_items, missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use gdm_core::constants::FEATURE_COUNT;
use gdm_meal_risk::intelligence::classifier::{ArtifactMetadata, LogisticModel, ModelSpec};
use gdm_meal_risk::intelligence::{
    derive, feature_vector, HighRiskLabelRule, MealRiskEngine, ModelArtifact,
    RecommendationGenerator, RiskScorer, TrainedClassifier, REFERENCE_MEALS,
};
use gdm_meal_risk::models::MealNutrients;
use std::sync::Arc;

/// Deterministic spread of meals across the interesting nutrient ranges
fn generate_meals(count: usize) -> Vec<MealNutrients> {
    (0..count)
        .map(|index| {
            let i = index as f64;
            MealNutrients {
                total_carbs_g: (i * 7.0) % 120.0,
                fiber_g: (i * 3.0) % 12.0,
                sugar_g: (i * 5.0) % 40.0,
                protein_g: (i * 11.0) % 45.0,
                fat_g: (i * 13.0) % 35.0,
                saturated_fat_g: (i * 2.0) % 10.0,
                energy_kcal: 150.0 + (i * 37.0) % 700.0,
                glycemic_index: 20.0 + (i * 17.0) % 80.0,
            }
        })
        .collect()
}

fn classifier_engine() -> Option<MealRiskEngine> {
    let mut coefficients = vec![0.01; FEATURE_COUNT];
    coefficients[7] = 0.05;
    coefficients[8] = 0.08;
    let artifact = ModelArtifact::new(
        None,
        ModelSpec::LogisticRegression(LogisticModel {
            coefficients,
            intercept: -4.0,
        }),
        ArtifactMetadata::default(),
    );
    let classifier = TrainedClassifier::from_artifact(artifact).ok()?;
    Some(MealRiskEngine::new(
        RiskScorer::Classifier(Arc::new(classifier)),
        RecommendationGenerator::default(),
    ))
}

fn bench_feature_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("feature_derivation");
    let meal = REFERENCE_MEALS[0].nutrients;

    group.bench_function("derive", |b| b.iter(|| derive(black_box(&meal))));
    group.bench_function("feature_vector", |b| {
        b.iter(|| feature_vector(black_box(&meal)).to_array());
    });

    group.finish();
}

fn bench_single_meal_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_meal");
    let meal = REFERENCE_MEALS[1].nutrients;

    let weighted = MealRiskEngine::default();
    group.bench_function("weighted_threshold", |b| {
        b.iter(|| weighted.assess(black_box(&meal)));
    });

    let label = MealRiskEngine::new(
        RiskScorer::LabelRule(HighRiskLabelRule),
        RecommendationGenerator::default(),
    );
    group.bench_function("label_rule", |b| b.iter(|| label.assess(black_box(&meal))));

    if let Some(classifier) = classifier_engine() {
        group.bench_function("logistic_classifier", |b| {
            b.iter(|| classifier.assess(black_box(&meal)));
        });
    }

    group.finish();
}

fn bench_batch_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("batch_scoring");
    let engine = MealRiskEngine::default();

    for count in [100, 1_000, 10_000] {
        let meals = generate_meals(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("sequential", count), &meals, |b, meals| {
            b.iter(|| {
                meals
                    .iter()
                    .map(|meal| engine.assess(meal))
                    .collect::<Vec<_>>()
            });
        });
        group.bench_with_input(BenchmarkId::new("parallel", count), &meals, |b, meals| {
            b.iter(|| engine.assess_batch(black_box(meals)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_feature_derivation,
    bench_single_meal_scoring,
    bench_batch_scoring,
);
criterion_main!(benches);
