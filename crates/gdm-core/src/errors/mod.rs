// ABOUTME: Unified error handling with standard error codes for the meal risk engine
// ABOUTME: Defines AppError, ErrorCode, and conversions from I/O, JSON, and CSV failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! The pure scoring core never fails: derivation, rule evaluation and
//! recommendation generation are total functions. Errors only arise at the
//! boundaries (configuration, model artifact loading, tabular I/O and training
//! input) and all of them are expressed as an [`AppError`] carrying an
//! [`ErrorCode`].

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::io;
use thiserror::Error;

/// Standard error codes used throughout the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    // Validation (3000-3999)
    /// Input value is invalid
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput = 3000,
    /// Required field is absent
    #[serde(rename = "MISSING_REQUIRED_FIELD")]
    MissingRequiredField = 3001,
    /// Data format is invalid
    #[serde(rename = "INVALID_FORMAT")]
    InvalidFormat = 3002,

    // Model contract (4000-4999)
    /// Feature schema of a model does not match the 17-field contract
    #[serde(rename = "SCHEMA_MISMATCH")]
    SchemaMismatch = 4000,
    /// Requested scorer capability is not compiled into this build
    #[serde(rename = "CAPABILITY_UNAVAILABLE")]
    CapabilityUnavailable = 4001,

    // Configuration (6000-6999)
    /// Required configuration is missing
    #[serde(rename = "CONFIG_MISSING")]
    ConfigMissing = 6001,
    /// Configuration failed validation
    #[serde(rename = "CONFIG_INVALID")]
    ConfigInvalid = 6002,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError = 9000,
    /// File system read or write failed
    #[serde(rename = "STORAGE_ERROR")]
    StorageError = 9002,
    /// Serialization or deserialization failed
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError = 9003,
}

impl ErrorCode {
    /// Process exit code used by command-line front ends
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidInput | Self::MissingRequiredField | Self::InvalidFormat => 2,
            Self::SchemaMismatch | Self::CapabilityUnavailable => 3,
            Self::ConfigMissing | Self::ConfigInvalid => 4,
            Self::StorageError | Self::SerializationError => 5,
            Self::InternalError => 1,
        }
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::InvalidInput => "The provided input is invalid",
            Self::MissingRequiredField => "A required field is missing",
            Self::InvalidFormat => "The data format is invalid",
            Self::SchemaMismatch => "Model feature schema does not match the feature contract",
            Self::CapabilityUnavailable => "The requested scorer is not available in this build",
            Self::ConfigMissing => "Required configuration is missing",
            Self::ConfigInvalid => "Configuration is invalid",
            Self::InternalError => "An internal error occurred",
            Self::StorageError => "Storage operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }
}

/// Unified error type for the engine
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Process exit code for this error
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.code.exit_code()
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Invalid data format (malformed row, bad artifact document)
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidFormat, message)
    }

    /// Missing required field
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("Missing required field: {}", field.into()),
        )
    }

    /// Invalid configuration
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigInvalid, message)
    }

    /// Missing configuration
    pub fn config_missing(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigMissing, message)
    }

    /// Feature schema mismatch between a model and the feature contract
    pub fn schema_mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SchemaMismatch, message)
    }

    /// Scorer capability not compiled into this build
    pub fn capability_unavailable(capability: impl Into<String>) -> Self {
        Self::new(ErrorCode::CapabilityUnavailable, capability)
    }

    /// Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// Serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::SerializationError, message)
    }

    /// Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

impl From<io::Error> for AppError {
    fn from(error: io::Error) -> Self {
        Self::storage(error.to_string()).with_source(error)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::serialization(error.to_string()).with_source(error)
    }
}

#[cfg(feature = "csv-errors")]
impl From<csv::Error> for AppError {
    fn from(error: csv::Error) -> Self {
        let message = error.to_string();
        if error.is_io_error() {
            Self::storage(message).with_source(error)
        } else {
            Self::invalid_format(message).with_source(error)
        }
    }
}

#[cfg(feature = "anyhow-errors")]
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::internal(format!("{error:#}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_exit_codes() {
        assert_eq!(ErrorCode::InvalidInput.exit_code(), 2);
        assert_eq!(ErrorCode::SchemaMismatch.exit_code(), 3);
        assert_eq!(ErrorCode::ConfigInvalid.exit_code(), 4);
        assert_eq!(ErrorCode::StorageError.exit_code(), 5);
        assert_eq!(ErrorCode::InternalError.exit_code(), 1);
    }

    #[test]
    fn test_display_includes_description_and_message() {
        let error = AppError::schema_mismatch("expected 17 features, got 16");
        let rendered = error.to_string();
        assert!(rendered.starts_with("Model feature schema does not match"));
        assert!(rendered.ends_with("expected 17 features, got 16"));
    }

    #[test]
    fn test_io_error_maps_to_storage() {
        let error = AppError::from(io::Error::new(io::ErrorKind::NotFound, "model.json"));
        assert_eq!(error.code, ErrorCode::StorageError);
        assert!(error.source.is_some());
    }

    #[cfg(feature = "anyhow-errors")]
    #[test]
    fn test_anyhow_error_maps_to_internal_with_context() {
        let error = AppError::from(
            anyhow::anyhow!("subscriber already set").context("Failed to install tracing subscriber"),
        );
        assert_eq!(error.code, ErrorCode::InternalError);
        assert_eq!(error.exit_code(), 1);
        assert_eq!(
            error.message,
            "Failed to install tracing subscriber: subscriber already set"
        );
    }

    #[test]
    fn test_error_code_serializes_screaming_case() {
        let json = serde_json::to_string(&ErrorCode::CapabilityUnavailable).ok();
        assert_eq!(json.as_deref(), Some("\"CAPABILITY_UNAVAILABLE\""));
    }
}
