// ABOUTME: Per-feature standard scaler fitted during training and reapplied at inference
// ABOUTME: Stores mean and scale for each of the 17 features; zero scale behaves as one

use gdm_core::constants::FEATURE_COUNT;
use gdm_core::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Standardises each feature as `(x - mean) / scale`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    /// Per-feature mean
    pub mean: Vec<f64>,
    /// Per-feature population standard deviation
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Fit mean and population standard deviation per column
    ///
    /// Constant columns get a scale of `1.0`. An empty input yields zero means
    /// and unit scales.
    #[must_use]
    pub fn fit(rows: &[[f64; FEATURE_COUNT]]) -> Self {
        let mut mean = vec![0.0; FEATURE_COUNT];
        let mut scale = vec![1.0; FEATURE_COUNT];
        if rows.is_empty() {
            return Self { mean, scale };
        }

        let n = rows.len() as f64;
        for row in rows {
            for (total, value) in mean.iter_mut().zip(row) {
                *total += value;
            }
        }
        for total in &mut mean {
            *total /= n;
        }

        let mut variance = vec![0.0; FEATURE_COUNT];
        for row in rows {
            for ((acc, value), m) in variance.iter_mut().zip(row).zip(&mean) {
                let d = value - m;
                *acc += d * d;
            }
        }
        for (s, var) in scale.iter_mut().zip(variance) {
            let std = (var / n).sqrt();
            if std > 0.0 {
                *s = std;
            }
        }

        Self { mean, scale }
    }

    /// Check lengths and finiteness against the feature schema
    ///
    /// # Errors
    ///
    /// Returns `SchemaMismatch` if either vector is not 17 long, and
    /// `InvalidFormat` if a value is not finite or a scale is negative.
    pub fn validate(&self) -> AppResult<()> {
        if self.mean.len() != FEATURE_COUNT || self.scale.len() != FEATURE_COUNT {
            return Err(AppError::schema_mismatch(format!(
                "scaler must have {FEATURE_COUNT} means and scales, got {} and {}",
                self.mean.len(),
                self.scale.len()
            )));
        }
        if self.mean.iter().any(|m| !m.is_finite())
            || self.scale.iter().any(|s| !s.is_finite() || *s < 0.0)
        {
            return Err(AppError::invalid_format(
                "scaler means and scales must be finite and scales non-negative",
            ));
        }
        Ok(())
    }

    /// Standardise one feature vector
    #[must_use]
    pub fn transform(&self, values: &[f64; FEATURE_COUNT]) -> [f64; FEATURE_COUNT] {
        let mut out = *values;
        for ((x, m), s) in out.iter_mut().zip(&self.mean).zip(&self.scale) {
            let divisor = if *s > 0.0 { *s } else { 1.0 };
            *x = (*x - m) / divisor;
        }
        out
    }
}
