//! Error types for keel-registry

use thiserror::Error;

/// Result type alias using keel-registry's error type
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Registry resolution error types
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Nothing to query
    #[error("No registries configured")]
    NoRegistriesConfigured,

    /// Resolution produced no catalog or could not proceed
    #[error("{message}")]
    ResolutionFailed { message: String },

    /// Several registries claim exclusive ownership of the same request
    #[error("The following registries were configured as exclusive providers of {subject}: {}", registries.join(", "))]
    ExclusiveProviderConflict {
        subject: String,
        registries: Vec<String>,
    },

    /// Merge called without catalogs
    #[error("No catalogs to merge")]
    EmptyMerge,

    /// Artifact missing from the repository
    #[error("Artifact not found: {coords}")]
    ArtifactNotFound { coords: String },

    /// HTTP transfer failed
    #[error("Failed to download {url}: {message}")]
    Download { url: String, message: String },

    /// Descriptor is not valid JSON for the expected shape
    #[error("Failed to parse {source_name}: {source}")]
    Json {
        source_name: String,
        #[source]
        source: serde_json::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Registry id not among the configured registries
    #[error("Failed to locate {id} among the configured registries: {}", configured.join(" "))]
    UnknownRegistry { id: String, configured: Vec<String> },

    /// Error raised by keel-core
    #[error(transparent)]
    Core(#[from] keel_core::Error),
}

impl RegistryError {
    /// Create a resolution failure
    pub fn resolution_failed(message: impl Into<String>) -> Self {
        Self::ResolutionFailed {
            message: message.into(),
        }
    }

    /// Create an exclusive provider conflict
    pub fn exclusive_conflict(subject: impl Into<String>, registries: Vec<String>) -> Self {
        Self::ExclusiveProviderConflict {
            subject: subject.into(),
            registries,
        }
    }

    /// Create an artifact not found error
    pub fn artifact_not_found(coords: impl ToString) -> Self {
        Self::ArtifactNotFound {
            coords: coords.to_string(),
        }
    }

    /// Create a download error
    pub fn download(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Download {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a JSON parse error for a named descriptor
    pub fn json(source_name: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            source_name: source_name.into(),
            source,
        }
    }

    /// Whether the error only means the artifact does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ArtifactNotFound { .. })
    }
}
