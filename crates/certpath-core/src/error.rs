//! Error types for the tracker

use crate::session::SessionError;
use certpath_store::StoreError;
use std::path::PathBuf;

/// Main tracker error type
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Sign-in needs a remote backend and none is configured
    #[error("remote backend is not configured")]
    RemoteUnavailable,

    /// The identity provider rejected the sign-in
    #[error("sign-in failed: {0}")]
    SignInFailed(String),

    /// Requested session change is not allowed from the current state
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Persistence failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl TrackerError {
    /// Check if the caller may simply try again
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            TrackerError::SignInFailed(_) => true,
            TrackerError::Store(e) => e.is_transient(),
            _ => false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read {path}: {source}")]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Environment override has the wrong shape
    #[error("invalid value {value:?} for {var}")]
    InvalidEnv {
        /// Variable name
        var: &'static str,
        /// Offending value
        value: String,
    },
}

/// Mentor backend failures, never shown to the user verbatim
#[derive(Debug, thiserror::Error)]
pub enum MentorError {
    /// Backend could not be reached
    #[error("mentor backend unavailable: {0}")]
    Unavailable(String),

    /// Backend answered with something unusable
    #[error("mentor backend error: {0}")]
    Backend(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracker_error_display() {
        assert_eq!(
            TrackerError::RemoteUnavailable.to_string(),
            "remote backend is not configured"
        );
        let err = TrackerError::from(StoreError::NotFound("x".into()));
        assert_eq!(err.to_string(), "store error: artifact not found: x");
        assert!(!err.is_retryable());
    }

    #[test]
    fn invalid_env_display() {
        let err = ConfigError::InvalidEnv {
            var: "CERTPATH_QUIESCENT_MS",
            value: "soon".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value \"soon\" for CERTPATH_QUIESCENT_MS"
        );
    }
}
