//! Error types for keel-core

use thiserror::Error;

/// Result type alias using keel-core's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for Keel
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Invalid configuration format
    #[error("Invalid configuration format: {message}")]
    InvalidConfig { message: String },

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed artifact coordinates
    #[error("Invalid artifact coordinates '{coords}': {reason}")]
    InvalidCoords { coords: String, reason: String },

    /// Malformed stream coordinates
    #[error("Invalid stream coordinates: {coords}")]
    InvalidStream { coords: String },

    /// Recognized-version expression that cannot be compiled
    #[error("Invalid version expression '{expression}': {reason}")]
    InvalidVersionExpression { expression: String, reason: String },

    /// Missing required field
    #[error("Missing required field: {field}")]
    MissingField { field: String },
}

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create an invalid coordinates error
    pub fn invalid_coords(coords: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCoords {
            coords: coords.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid stream coordinates error
    pub fn invalid_stream(coords: impl Into<String>) -> Self {
        Self::InvalidStream {
            coords: coords.into(),
        }
    }

    /// Create an invalid version expression error
    pub fn invalid_version_expression(
        expression: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidVersionExpression {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}
