// ABOUTME: Logistic regression evaluator over the 17-field feature vector
// ABOUTME: Linear decision function with a numerically stable sigmoid

use gdm_core::constants::FEATURE_COUNT;
use gdm_core::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Binary logistic regression model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    /// One coefficient per feature, in feature-schema order
    pub coefficients: Vec<f64>,
    /// Bias term
    pub intercept: f64,
}

impl LogisticModel {
    /// Check coefficient count and finiteness
    ///
    /// # Errors
    ///
    /// Returns `SchemaMismatch` if there are not exactly 17 coefficients and
    /// `InvalidFormat` if any parameter is not finite.
    pub fn validate(&self) -> AppResult<()> {
        if self.coefficients.len() != FEATURE_COUNT {
            return Err(AppError::schema_mismatch(format!(
                "logistic model must have {FEATURE_COUNT} coefficients, got {}",
                self.coefficients.len()
            )));
        }
        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(AppError::invalid_format(
                "logistic model parameters must be finite",
            ));
        }
        Ok(())
    }

    /// Linear decision value (log-odds)
    #[must_use]
    pub fn decision(&self, values: &[f64; FEATURE_COUNT]) -> f64 {
        self.coefficients
            .iter()
            .zip(values)
            .fold(self.intercept, |acc, (w, x)| w.mul_add(*x, acc))
    }

    /// Probability of the high-risk class
    #[must_use]
    pub fn predict_proba(&self, values: &[f64; FEATURE_COUNT]) -> f64 {
        sigmoid(self.decision(values))
    }
}

/// Logistic function, stable for large magnitudes
#[must_use]
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
