// ABOUTME: End-to-end tests for featurize, train, save, load, and classifier scoring
// ABOUTME: Uses a seeded synthetic meal dataset labelled by the high-risk rule
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{init_test_logging, meal, synthetic_meals};
use gdm_meal_risk::config::{RiskConfig, ScorerConfig};
use gdm_meal_risk::dataset::{featurize, read_feature_table_path, write_feature_table_path};
use gdm_meal_risk::errors::ErrorCode;
use gdm_meal_risk::intelligence::training::stratified_split;
use gdm_meal_risk::intelligence::{
    LabelledRow, LogisticTrainer, MealRiskEngine, ScorerKind, TrainedClassifier, TrainingConfig,
};
use tempfile::TempDir;

fn labelled_rows(count: usize, seed: u64) -> Vec<LabelledRow> {
    featurize(synthetic_meals(count, seed))
        .iter()
        .map(|record| record.to_labelled_row())
        .collect()
}

#[test]
fn test_train_from_feature_table_file() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let table = dir.path().join("features.csv");
    let model = dir.path().join("model.json");

    write_feature_table_path(&table, &featurize(synthetic_meals(400, 11))).unwrap();
    let rows: Vec<LabelledRow> = read_feature_table_path(&table)
        .unwrap()
        .iter()
        .map(|record| record.to_labelled_row())
        .collect();

    let outcome = LogisticTrainer::new(TrainingConfig::default())
        .train(&rows)
        .unwrap();
    assert!(outcome.iterations > 0);
    assert!((0.0..=1.0).contains(&outcome.metrics.accuracy));
    assert!(outcome.metrics.roc_auc.is_some_and(|auc| auc > 0.75));

    let metadata = &outcome.artifact.metadata;
    assert_eq!(metadata.train_rows + metadata.test_rows, rows.len());
    assert!(metadata.trained_at.is_some());
    assert_eq!(metadata.metrics, Some(outcome.metrics));
    assert_eq!(outcome.metrics.confusion.total(), metadata.test_rows);

    outcome.artifact.save(&model).unwrap();
    let classifier = TrainedClassifier::load(&model).unwrap();
    assert_eq!(classifier.kind(), "logistic_regression");
    let saved = classifier.metadata().metrics.unwrap();
    assert_eq!(saved.confusion, outcome.metrics.confusion);
}

#[test]
fn test_trained_model_drives_engine() {
    init_test_logging();
    let dir = TempDir::new().unwrap();
    let model = dir.path().join("model.json");
    LogisticTrainer::new(TrainingConfig::default())
        .train(&labelled_rows(400, 5))
        .unwrap()
        .artifact
        .save(&model)
        .unwrap();

    let config = RiskConfig {
        scorer: ScorerConfig {
            kind: ScorerKind::Classifier,
            model_path: Some(model),
        },
        ..RiskConfig::default()
    };
    let engine = MealRiskEngine::from_config(&config).unwrap();

    let white_rice = engine.assess(&meal(80.0, 1.0, 20.0, 73.0));
    assert_eq!(white_rice.scorer, ScorerKind::Classifier);
    assert!(white_rice.high_risk);
    assert!(white_rice.risk_score.is_some_and(|p| (0.5..=1.0).contains(&p)));

    let apple = engine.assess(&meal(25.0, 4.0, 3.0, 36.0));
    assert!(!apple.high_risk);
    assert!(apple.risk_score.is_some_and(|p| (0.0..0.5).contains(&p)));
}

#[test]
fn test_training_is_deterministic_for_a_seed() {
    let rows = labelled_rows(200, 8);
    let trainer = LogisticTrainer::new(TrainingConfig::default());

    let first = trainer.train(&rows).unwrap();
    let second = trainer.train(&rows).unwrap();
    assert_eq!(first.artifact.model, second.artifact.model);
    assert_eq!(first.artifact.scaler, second.artifact.scaler);
    assert_eq!(first.metrics, second.metrics);
}

#[test]
fn test_split_is_stratified() {
    let rows = labelled_rows(300, 21);
    let positives = rows.iter().filter(|row| row.label).count();
    let negatives = rows.len() - positives;

    let (train, test) = stratified_split(&rows, 0.2, 42);
    assert_eq!(train.len() + test.len(), rows.len());

    let test_positives = test.iter().filter(|row| row.label).count();
    let test_negatives = test.len() - test_positives;
    assert_eq!(test_positives, (positives as f64 * 0.2).round() as usize);
    assert_eq!(test_negatives, (negatives as f64 * 0.2).round() as usize);

    let (again_train, again_test) = stratified_split(&rows, 0.2, 42);
    assert_eq!(train, again_train);
    assert_eq!(test, again_test);
}

#[test]
fn test_single_class_rejected() {
    let rows: Vec<LabelledRow> = labelled_rows(200, 2)
        .into_iter()
        .filter(|row| !row.label)
        .collect();

    let error = LogisticTrainer::new(TrainingConfig::default())
        .train(&rows)
        .unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
}

#[test]
fn test_out_of_range_test_fraction_rejected() {
    let trainer = LogisticTrainer::new(TrainingConfig {
        test_fraction: 1.0,
        ..TrainingConfig::default()
    });

    let error = trainer.train(&labelled_rows(50, 4)).unwrap_err();
    assert_eq!(error.code, ErrorCode::InvalidInput);
}
