// ABOUTME: Offline trainer fitting a class-balanced logistic regression on labelled feature rows
// ABOUTME: Stratified seeded split, standard scaling, gradient descent, and held-out evaluation

//! Offline Trainer
//!
//! Fits a logistic regression on rows produced by the feature deriver and
//! labelled by [`HighRiskLabelRule`](super::algorithms::HighRiskLabelRule).
//! Every step is deterministic for a given seed, so retraining on the same
//! table reproduces the same artifact parameters.
//!
//! # Procedure
//!
//! 1. Stratified split: each class is shuffled with `ChaCha8Rng` and
//!    `test_fraction` of it is held out.
//! 2. A [`StandardScaler`] is fitted on the training split only.
//! 3. Full-batch gradient descent on the mean class-balanced log-loss plus
//!    `||w||² / (2Cn)`; the intercept is not penalised.
//! 4. Accuracy, precision, recall and ROC-AUC on the held-out split.

use super::classifier::{
    ArtifactMetadata, EvaluationMetrics, LogisticModel, ModelArtifact, ModelSpec, StandardScaler,
};
use chrono::Utc;
use gdm_core::constants::FEATURE_COUNT;
use gdm_core::errors::{AppError, AppResult};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Gradient descent iterations between debug checkpoints
const CHECKPOINT_INTERVAL: usize = 100;

/// One labelled training example
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelledRow {
    /// Feature values in schema order
    pub features: [f64; FEATURE_COUNT],
    /// High-risk label
    pub label: bool,
}

/// Trainer hyper-parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Held-out share of each class, in (0, 1)
    pub test_fraction: f64,
    /// Seed for the split shuffle
    pub seed: u64,
    /// Inverse L2 regularisation strength
    pub inverse_regularization: f64,
    /// Gradient descent step size
    pub learning_rate: f64,
    /// Iteration cap
    pub max_iterations: usize,
    /// Stop once the gradient norm falls below this
    pub tolerance: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
            inverse_regularization: 1.0,
            learning_rate: 0.5,
            max_iterations: 1000,
            tolerance: 1e-6,
        }
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingOutcome {
    /// Artifact ready to save
    pub artifact: ModelArtifact,
    /// Held-out evaluation
    pub metrics: EvaluationMetrics,
    /// Gradient descent iterations performed
    pub iterations: usize,
}

/// Trains logistic regression risk classifiers
#[derive(Debug, Clone, Default)]
pub struct LogisticTrainer {
    config: TrainingConfig,
}

impl LogisticTrainer {
    /// Trainer with the given hyper-parameters
    #[must_use]
    pub const fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    /// Fit, evaluate, and package a model
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the rows are empty, contain a single class,
    /// or the hyper-parameters are out of range.
    pub fn train(&self, rows: &[LabelledRow]) -> AppResult<TrainingOutcome> {
        self.validate(rows)?;

        let (train, test) = stratified_split(rows, self.config.test_fraction, self.config.seed);
        info!(
            total = rows.len(),
            train = train.len(),
            test = test.len(),
            seed = self.config.seed,
            "Split training data"
        );

        let train_features: Vec<[f64; FEATURE_COUNT]> =
            train.iter().map(|row| row.features).collect();
        let scaler = StandardScaler::fit(&train_features);
        let scaled: Vec<LabelledRow> = train
            .iter()
            .map(|row| LabelledRow {
                features: scaler.transform(&row.features),
                label: row.label,
            })
            .collect();

        let (model, iterations) = self.fit(&scaled);
        info!(iterations, "Fitted logistic regression");

        let probabilities: Vec<f64> = test
            .iter()
            .map(|row| model.predict_proba(&scaler.transform(&row.features)))
            .collect();
        let labels: Vec<bool> = test.iter().map(|row| row.label).collect();
        let metrics = EvaluationMetrics::compute(&labels, &probabilities);
        info!(
            accuracy = metrics.accuracy,
            precision = metrics.precision,
            recall = metrics.recall,
            roc_auc = ?metrics.roc_auc,
            "Evaluated on held-out split"
        );

        let artifact = ModelArtifact::new(
            Some(scaler),
            ModelSpec::LogisticRegression(model),
            ArtifactMetadata {
                trained_at: Some(Utc::now()),
                train_rows: train.len(),
                test_rows: test.len(),
                metrics: Some(metrics),
            },
        );

        Ok(TrainingOutcome {
            artifact,
            metrics,
            iterations,
        })
    }

    fn validate(&self, rows: &[LabelledRow]) -> AppResult<()> {
        let c = &self.config;
        if !(c.test_fraction > 0.0 && c.test_fraction < 1.0) {
            return Err(AppError::invalid_input(format!(
                "test fraction must be in (0, 1), got {}",
                c.test_fraction
            )));
        }
        if !(c.inverse_regularization > 0.0 && c.learning_rate > 0.0 && c.tolerance >= 0.0) {
            return Err(AppError::invalid_input(
                "regularization and learning rate must be positive",
            ));
        }
        if rows.is_empty() {
            return Err(AppError::invalid_input("no training rows"));
        }
        let positives = rows.iter().filter(|row| row.label).count();
        if positives == 0 || positives == rows.len() {
            return Err(AppError::invalid_input(
                "training rows must contain both high-risk and low-risk examples",
            ));
        }
        if rows.iter().any(|row| row.features.iter().any(|x| !x.is_finite())) {
            return Err(AppError::invalid_input("training rows contain non-finite values"));
        }
        Ok(())
    }

    /// Gradient descent on the class-balanced, L2-penalised log-loss
    ///
    /// Sample weights follow the balanced scheme `n / (2 * n_class)`; the loss
    /// is averaged over samples.
    fn fit(&self, rows: &[LabelledRow]) -> (LogisticModel, usize) {
        let n = rows.len() as f64;
        let positives = rows.iter().filter(|row| row.label).count() as f64;
        let negatives = n - positives;
        let positive_weight = if positives > 0.0 { n / (2.0 * positives) } else { 0.0 };
        let negative_weight = if negatives > 0.0 { n / (2.0 * negatives) } else { 0.0 };
        let penalty = 1.0 / (self.config.inverse_regularization * n);

        let mut model = LogisticModel {
            coefficients: vec![0.0; FEATURE_COUNT],
            intercept: 0.0,
        };
        let mut iterations = 0;

        while iterations < self.config.max_iterations {
            let mut grad_w = [0.0; FEATURE_COUNT];
            let mut grad_b = 0.0;

            for row in rows {
                let p = model.predict_proba(&row.features);
                let (target, weight) = if row.label {
                    (1.0, positive_weight)
                } else {
                    (0.0, negative_weight)
                };
                let residual = weight * (p - target);
                for (g, x) in grad_w.iter_mut().zip(&row.features) {
                    *g += residual * x;
                }
                grad_b += residual;
            }

            for (g, w) in grad_w.iter_mut().zip(&model.coefficients) {
                *g = *g / n + penalty * w;
            }
            grad_b /= n;

            let norm = grad_w
                .iter()
                .fold(grad_b * grad_b, |acc, g| g.mul_add(*g, acc))
                .sqrt();
            if norm < self.config.tolerance {
                break;
            }

            for (w, g) in model.coefficients.iter_mut().zip(&grad_w) {
                *w -= self.config.learning_rate * g;
            }
            model.intercept -= self.config.learning_rate * grad_b;
            iterations += 1;

            if iterations % CHECKPOINT_INTERVAL == 0 {
                debug!(iteration = iterations, gradient_norm = norm, "Training checkpoint");
            }
        }

        (model, iterations)
    }
}

/// Deterministic per-class split into (train, test)
///
/// Each class keeps at least one training row; a class with more than one row
/// contributes at least one test row.
#[must_use]
pub fn stratified_split(
    rows: &[LabelledRow],
    test_fraction: f64,
    seed: u64,
) -> (Vec<LabelledRow>, Vec<LabelledRow>) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut train = Vec::with_capacity(rows.len());
    let mut test = Vec::new();

    for class in [false, true] {
        let mut members: Vec<LabelledRow> =
            rows.iter().filter(|row| row.label == class).copied().collect();
        if members.is_empty() {
            continue;
        }
        members.shuffle(&mut rng);

        let wanted = (members.len() as f64 * test_fraction).round() as usize;
        let held_out = wanted.clamp(usize::from(members.len() > 1), members.len() - 1);
        let kept = members.split_off(held_out);
        test.extend(members);
        train.extend(kept);
    }

    (train, test)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(signal: f64, label: bool) -> LabelledRow {
        let mut features = [1.0; FEATURE_COUNT];
        features[7] = signal;
        LabelledRow { features, label }
    }

    fn separable_rows() -> Vec<LabelledRow> {
        (0..40_u32)
            .map(|i| {
                let high = i % 2 == 0;
                let offset = f64::from(i / 2);
                let signal = if high { 70.0 + offset } else { 50.0 - offset };
                row(signal, high)
            })
            .collect()
    }

    #[test]
    fn test_split_is_stratified_and_deterministic() {
        let rows = separable_rows();
        let (train_a, test_a) = stratified_split(&rows, 0.2, 42);
        let (train_b, test_b) = stratified_split(&rows, 0.2, 42);

        assert_eq!(test_a, test_b);
        assert_eq!(train_a, train_b);
        assert_eq!(test_a.len(), 8);
        assert_eq!(test_a.iter().filter(|r| r.label).count(), 4);
        assert_eq!(train_a.len() + test_a.len(), rows.len());
    }

    #[test]
    fn test_separable_data_trains_to_perfect_auc() {
        let outcome = LogisticTrainer::default().train(&separable_rows());
        let metrics = outcome.map(|o| o.metrics);
        assert!(matches!(metrics, Ok(m) if m.roc_auc == Some(1.0) && m.accuracy > 0.99));
    }

    #[test]
    fn test_single_class_rejected() {
        let rows: Vec<LabelledRow> = (0..10_u32).map(|i| row(f64::from(i), true)).collect();
        assert!(LogisticTrainer::default().train(&rows).is_err());
    }

    #[test]
    fn test_empty_rows_rejected() {
        assert!(LogisticTrainer::default().train(&[]).is_err());
    }

    #[test]
    fn test_bad_test_fraction_rejected() {
        let trainer = LogisticTrainer::new(TrainingConfig {
            test_fraction: 1.0,
            ..TrainingConfig::default()
        });
        assert!(trainer.train(&separable_rows()).is_err());
    }
}
