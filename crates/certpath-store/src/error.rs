//! Error types for persistence backends

use certpath_model::DocumentError;
use std::path::PathBuf;

/// Persistence failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The remote backend reported a failure
    #[error("remote {op} failed: {message}")]
    Remote {
        /// Operation name
        op: &'static str,
        /// Backend message
        message: String,
    },

    /// A remote call did not answer in time
    #[error("remote {op} timed out after {after_ms}ms")]
    Timeout {
        /// Operation name
        op: &'static str,
        /// Configured limit
        after_ms: u64,
    },

    /// Handle no longer resolves to an artifact
    #[error("artifact not found: {0}")]
    NotFound(String),

    /// Artifact already exists where a new one was requested
    #[error("artifact already exists: {0}")]
    AlreadyExists(String),

    /// Artifact name cannot be stored
    #[error("invalid artifact name: {0:?}")]
    InvalidName(String),

    /// Filesystem failure
    #[error("IO error at {path}: {source}")]
    Io {
        /// Path involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Stored bytes are not a valid document
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Login record could not be encoded
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Remote session used after close
    #[error("remote session closed")]
    SessionClosed,
}

impl StoreError {
    /// Create IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a backend-reported failure
    pub fn remote(op: &'static str, message: impl Into<String>) -> Self {
        Self::Remote {
            op,
            message: message.into(),
        }
    }

    /// Check if a retry could succeed
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            StoreError::Remote { .. } | StoreError::Timeout { .. } | StoreError::Io { .. }
        )
    }
}
