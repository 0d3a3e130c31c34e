// ABOUTME: Trained-model artifact format, load-time validation, and probability inference
// ABOUTME: Binds an offline-fitted scaler and model to the 17-field feature contract

//! Trained Classifier
//!
//! A trained classifier is persisted as a JSON artifact:
//!
//! ```json
//! {
//!   "format_version": 1,
//!   "feature_names": ["total_carbs_g", "...", "high_carb"],
//!   "scaler": { "mean": [...], "scale": [...] },
//!   "model": { "kind": "logistic_regression", "coefficients": [...], "intercept": -0.4 },
//!   "metadata": { "trained_at": "2025-01-01T00:00:00Z", "train_rows": 800, "test_rows": 200 }
//! }
//! ```
//!
//! Loading is the only fallible step. It checks, in order: the format
//! version, the feature-name list (exact content and order), the scaler
//! lengths, then the model parameters. After loading, a [`TrainedClassifier`]
//! is immutable and can be shared across threads freely.

/// Linear model over scaled features
pub mod logistic;
/// Held-out evaluation metrics
pub mod metrics;
/// Per-feature standardization fitted at training time
pub mod scaler;
/// Forest and boosted tree ensembles
pub mod tree_ensemble;

pub use logistic::LogisticModel;
pub use metrics::{ConfusionMatrix, EvaluationMetrics};
pub use scaler::StandardScaler;
pub use tree_ensemble::{Aggregation, DecisionTree, TreeEnsembleModel, TreeNode};

use chrono::{DateTime, Utc};
use gdm_core::constants::{FEATURE_COUNT, FEATURE_NAMES};
use gdm_core::errors::{AppError, AppResult};
use gdm_core::models::FeatureVector;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{error, info};

/// Artifact layout version understood by this build
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Serialized model parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    /// Linear model with sigmoid link
    LogisticRegression(LogisticModel),
    /// Random forest or boosted trees
    TreeEnsemble(TreeEnsembleModel),
}

impl ModelSpec {
    /// Stable model kind name
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::LogisticRegression(_) => "logistic_regression",
            Self::TreeEnsemble(_) => "tree_ensemble",
        }
    }
}

/// Provenance recorded by the trainer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    /// When training finished
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trained_at: Option<DateTime<Utc>>,
    /// Rows used for fitting
    #[serde(default)]
    pub train_rows: usize,
    /// Rows held out for evaluation
    #[serde(default)]
    pub test_rows: usize,
    /// Held-out evaluation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<EvaluationMetrics>,
}

/// Persisted classifier bundle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Artifact layout version
    pub format_version: u32,
    /// Ordered feature names the model was trained on
    pub feature_names: Vec<String>,
    /// Standardisation fitted during training, if any
    pub scaler: Option<StandardScaler>,
    /// Model parameters
    pub model: ModelSpec,
    /// Training provenance
    #[serde(default)]
    pub metadata: ArtifactMetadata,
}

impl ModelArtifact {
    /// Bundle a freshly trained model with the current feature schema
    #[must_use]
    pub fn new(scaler: Option<StandardScaler>, model: ModelSpec, metadata: ArtifactMetadata) -> Self {
        Self {
            format_version: ARTIFACT_FORMAT_VERSION,
            feature_names: FEATURE_NAMES.iter().map(|name| (*name).to_owned()).collect(),
            scaler,
            model,
            metadata,
        }
    }

    /// Parse an artifact document
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if the document is not a valid artifact
    pub fn from_json(json: &str) -> AppResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            AppError::serialization(format!("Invalid model artifact: {e}")).with_source(e)
        })
    }

    /// Serialize as pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if serialization fails
    pub fn to_json(&self) -> AppResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the artifact to disk
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the file cannot be written
    pub fn save(&self, path: &Path) -> AppResult<()> {
        let json = self.to_json()?;
        fs::write(path, json).map_err(|e| {
            AppError::storage(format!("Failed to write model artifact {}", path.display()))
                .with_source(e)
        })?;
        info!(path = %path.display(), kind = self.model.kind(), "Saved model artifact");
        Ok(())
    }

    /// Validate the artifact against the feature contract
    ///
    /// # Errors
    ///
    /// - `SchemaMismatch` for an unknown format version, a feature-name list
    ///   differing from the schema, or wrong parameter lengths
    /// - `InvalidFormat` for non-finite parameters or malformed trees
    /// - `CapabilityUnavailable` for a model kind not compiled into this build
    pub fn validate(&self) -> AppResult<()> {
        if self.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(AppError::schema_mismatch(format!(
                "unsupported artifact format version {} (expected {ARTIFACT_FORMAT_VERSION})",
                self.format_version
            )));
        }

        validate_feature_names(&self.feature_names)?;

        if let Some(scaler) = &self.scaler {
            scaler.validate()?;
        }

        match &self.model {
            ModelSpec::LogisticRegression(model) => model.validate(),
            ModelSpec::TreeEnsemble(model) => {
                model.validate()?;
                if cfg!(feature = "tree-ensembles") {
                    Ok(())
                } else {
                    Err(AppError::capability_unavailable(
                        "tree_ensemble models require the `tree-ensembles` feature",
                    ))
                }
            }
        }
    }
}

fn validate_feature_names(names: &[String]) -> AppResult<()> {
    if names.len() != FEATURE_COUNT {
        return Err(AppError::schema_mismatch(format!(
            "model expects {} features, schema has {FEATURE_COUNT}",
            names.len()
        )));
    }
    for (position, (actual, expected)) in names.iter().zip(FEATURE_NAMES).enumerate() {
        if actual != expected {
            return Err(AppError::schema_mismatch(format!(
                "feature {position} is '{actual}', schema expects '{expected}'"
            )));
        }
    }
    Ok(())
}

/// Evaluation path chosen once at load time
#[derive(Debug, Clone, PartialEq)]
enum CompiledModel {
    Logistic(LogisticModel),
    #[cfg(feature = "tree-ensembles")]
    Trees(TreeEnsembleModel),
}

/// Validated, read-only classifier ready for inference
#[derive(Debug, Clone, PartialEq)]
pub struct TrainedClassifier {
    scaler: Option<StandardScaler>,
    model: CompiledModel,
    metadata: ArtifactMetadata,
}

impl TrainedClassifier {
    /// Validate an artifact and prepare it for inference
    ///
    /// # Errors
    ///
    /// Returns any error from [`ModelArtifact::validate`]
    pub fn from_artifact(artifact: ModelArtifact) -> AppResult<Self> {
        artifact.validate()?;
        let model = match artifact.model {
            ModelSpec::LogisticRegression(model) => CompiledModel::Logistic(model),
            #[cfg(feature = "tree-ensembles")]
            ModelSpec::TreeEnsemble(model) => CompiledModel::Trees(model),
            #[cfg(not(feature = "tree-ensembles"))]
            ModelSpec::TreeEnsemble(_) => {
                return Err(AppError::capability_unavailable(
                    "tree_ensemble models require the `tree-ensembles` feature",
                ))
            }
        };
        Ok(Self {
            scaler: artifact.scaler,
            model,
            metadata: artifact.metadata,
        })
    }

    /// Load and validate an artifact file
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the file cannot be read, `SerializationError`
    /// if it is not a valid document, and any validation error
    pub fn load(path: &Path) -> AppResult<Self> {
        let json = fs::read_to_string(path).map_err(|e| {
            AppError::storage(format!("Failed to read model artifact {}", path.display()))
                .with_source(e)
        })?;
        let classifier = ModelArtifact::from_json(&json)
            .and_then(Self::from_artifact)
            .inspect_err(|e| {
                error!(path = %path.display(), error = %e, "Rejected model artifact");
            })?;
        info!(
            path = %path.display(),
            kind = classifier.kind(),
            features = FEATURE_COUNT,
            scaled = classifier.scaler.is_some(),
            "Loaded model artifact"
        );
        Ok(classifier)
    }

    /// Model kind name
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self.model {
            CompiledModel::Logistic(_) => "logistic_regression",
            #[cfg(feature = "tree-ensembles")]
            CompiledModel::Trees(_) => "tree_ensemble",
        }
    }

    /// Training provenance
    #[must_use]
    pub const fn metadata(&self) -> &ArtifactMetadata {
        &self.metadata
    }

    /// Probability of the high-risk class for raw (unscaled) feature values
    #[must_use]
    pub fn predict_values(&self, values: &[f64; FEATURE_COUNT]) -> f64 {
        let input = self
            .scaler
            .as_ref()
            .map_or(*values, |scaler| scaler.transform(values));
        match &self.model {
            CompiledModel::Logistic(model) => model.predict_proba(&input),
            #[cfg(feature = "tree-ensembles")]
            CompiledModel::Trees(model) => model.predict_proba(&input),
        }
    }

    /// Probability of the high-risk class for a feature vector
    #[must_use]
    pub fn predict_proba(&self, features: &FeatureVector) -> f64 {
        self.predict_values(&features.to_array())
    }
}
