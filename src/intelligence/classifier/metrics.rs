// ABOUTME: Binary classification metrics for evaluating trained risk classifiers
// ABOUTME: Confusion matrix, accuracy, precision, recall, and rank-based ROC-AUC

use serde::{Deserialize, Serialize};

/// Probability at or above which a prediction counts as high risk
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Prediction counts at the decision threshold
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    /// High risk predicted and labelled
    pub true_positives: usize,
    /// High risk predicted, labelled low
    pub false_positives: usize,
    /// Low risk predicted and labelled
    pub true_negatives: usize,
    /// Low risk predicted, labelled high
    pub false_negatives: usize,
}

impl ConfusionMatrix {
    /// Count predictions against binary labels
    #[must_use]
    pub fn from_predictions(labels: &[bool], probabilities: &[f64]) -> Self {
        let mut matrix = Self::default();
        for (&label, &p) in labels.iter().zip(probabilities) {
            match (label, p >= DECISION_THRESHOLD) {
                (true, true) => matrix.true_positives += 1,
                (false, true) => matrix.false_positives += 1,
                (false, false) => matrix.true_negatives += 1,
                (true, false) => matrix.false_negatives += 1,
            }
        }
        matrix
    }

    /// Number of evaluated rows
    #[must_use]
    pub const fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }
}

/// Held-out evaluation of a trained classifier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    /// Fraction of correct predictions
    pub accuracy: f64,
    /// True positives over predicted positives (0 when nothing is predicted positive)
    pub precision: f64,
    /// True positives over actual positives (0 when there are none)
    pub recall: f64,
    /// Area under the ROC curve (`None` when only one class is present)
    pub roc_auc: Option<f64>,
    /// Raw counts behind accuracy, precision, and recall
    #[serde(default)]
    pub confusion: ConfusionMatrix,
}

impl EvaluationMetrics {
    /// Evaluate probabilities against binary labels
    ///
    /// Both slices must be the same length; extra elements of the longer one
    /// are ignored.
    #[must_use]
    pub fn compute(labels: &[bool], probabilities: &[f64]) -> Self {
        let confusion = ConfusionMatrix::from_predictions(labels, probabilities);
        let tp = confusion.true_positives;
        Self {
            accuracy: ratio(tp + confusion.true_negatives, confusion.total()),
            precision: ratio(tp, tp + confusion.false_positives),
            recall: ratio(tp, tp + confusion.false_negatives),
            roc_auc: roc_auc(labels, probabilities),
            confusion,
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// ROC-AUC via the Mann-Whitney rank statistic, averaging ranks over ties
#[must_use]
pub fn roc_auc(labels: &[bool], probabilities: &[f64]) -> Option<f64> {
    let mut scored: Vec<(f64, bool)> = probabilities
        .iter()
        .copied()
        .zip(labels.iter().copied())
        .collect();
    let positives = scored.iter().filter(|(_, label)| *label).count();
    let negatives = scored.len() - positives;
    if positives == 0 || negatives == 0 {
        return None;
    }

    scored.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut positive_rank_sum = 0.0;
    let mut start = 0;
    while start < scored.len() {
        let mut end = start;
        while end + 1 < scored.len() && scored[end + 1].0.total_cmp(&scored[start].0).is_eq() {
            end += 1;
        }
        // Ranks are 1-based; tied scores share the mean rank of their run
        let mean_rank = (start + end) as f64 / 2.0 + 1.0;
        let tied_positives = scored[start..=end].iter().filter(|(_, l)| *l).count();
        positive_rank_sum += mean_rank * tied_positives as f64;
        start = end + 1;
    }

    let p = positives as f64;
    let n = negatives as f64;
    Some(p.mul_add(-(p + 1.0) / 2.0, positive_rank_sum) / (p * n))
}
