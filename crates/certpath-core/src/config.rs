//! Tracker configuration
//!
//! Loaded from an optional TOML file, then overridden by `CERTPATH_*`
//! environment variables.

use crate::error::ConfigError;
use certpath_model::Identity;
use certpath_store::{Capability, RemotePolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default quiescent window before an edit is saved
pub const DEFAULT_QUIESCENT_MS: u64 = 2_000;

/// Default per-call remote timeout
pub const DEFAULT_REMOTE_TIMEOUT_MS: u64 = 15_000;

/// Application name written into login records
pub const DEFAULT_APP_NAME: &str = "Agentic AI Architect Roadmap";

/// Identity the CLI signs in as
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Display name
    pub name: Option<String>,
    /// Email, the user key
    pub email: Option<String>,
    /// Avatar URL
    pub picture: Option<String>,
}

impl IdentityConfig {
    /// Build an identity when an email is configured
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        let email = self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())?;
        let name = self.name.clone().unwrap_or_else(|| email.to_string());
        Some(Identity::new(name, email).with_picture(self.picture.clone().unwrap_or_default()))
    }
}

/// Tracker configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Shared folder scoping remote artifacts; unset means local only
    pub remote_folder: Option<String>,
    /// Local slot and default export directory
    pub data_dir: PathBuf,
    /// Debounce window in milliseconds
    pub quiescent_window_ms: u64,
    /// Per-call remote timeout in milliseconds
    pub remote_timeout_ms: u64,
    /// Extra attempts after a transient remote failure
    pub remote_retries: u32,
    /// Name written into login records
    pub app_name: String,
    /// CLI sign-in identity
    pub identity: IdentityConfig,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            remote_folder: None,
            data_dir: PathBuf::from(".certpath"),
            quiescent_window_ms: DEFAULT_QUIESCENT_MS,
            remote_timeout_ms: DEFAULT_REMOTE_TIMEOUT_MS,
            remote_retries: 0,
            app_name: DEFAULT_APP_NAME.to_string(),
            identity: IdentityConfig::default(),
        }
    }
}

impl TrackerConfig {
    /// Parse TOML
    ///
    /// # Errors
    /// Returns `ConfigError::Parse` on invalid TOML.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load the optional file, then apply process environment overrides
    ///
    /// # Errors
    /// Returns `ConfigError` if the file is unreadable or invalid, or an
    /// override does not parse.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };
        base.with_overrides(|var| std::env::var(var).ok())
    }

    /// Apply `CERTPATH_*` overrides from `lookup`
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidEnv` if a numeric override does not parse.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(folder) = lookup("CERTPATH_REMOTE_FOLDER") {
            self.remote_folder = Some(folder);
        }
        if let Some(dir) = lookup("CERTPATH_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(ms) = parse_env(&lookup, "CERTPATH_QUIESCENT_MS")? {
            self.quiescent_window_ms = ms;
        }
        if let Some(ms) = parse_env(&lookup, "CERTPATH_REMOTE_TIMEOUT_MS")? {
            self.remote_timeout_ms = ms;
        }
        if let Some(n) = parse_env(&lookup, "CERTPATH_REMOTE_RETRIES")? {
            self.remote_retries = n;
        }
        if let Some(name) = lookup("CERTPATH_USER_NAME") {
            self.identity.name = Some(name);
        }
        if let Some(email) = lookup("CERTPATH_USER_EMAIL") {
            self.identity.email = Some(email);
        }
        Ok(self)
    }

    /// Resolve the remote capability
    #[must_use]
    pub fn capability(&self) -> Capability {
        Capability::resolve(self.remote_folder.as_deref())
    }

    /// Debounce window
    #[inline]
    #[must_use]
    pub fn quiescent_window(&self) -> Duration {
        Duration::from_millis(self.quiescent_window_ms)
    }

    /// Timeout and retry policy for the remote session
    #[must_use]
    pub fn remote_policy(&self) -> RemotePolicy {
        RemotePolicy::default()
            .with_timeout(Duration::from_millis(self.remote_timeout_ms))
            .with_retries(self.remote_retries)
    }
}

fn parse_env<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { var, value }),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn defaults() {
        let config = TrackerConfig::default();
        assert_eq!(config.quiescent_window(), Duration::from_secs(2));
        assert_eq!(config.capability(), Capability::LocalOnly);
        assert_eq!(config.app_name, "Agentic AI Architect Roadmap");
        assert_eq!(config.remote_policy().retries, 0);
    }

    #[test]
    fn toml_then_env() {
        let config = TrackerConfig::from_toml_str(
            r#"
            remote_folder = "team"
            quiescent_window_ms = 500

            [identity]
            email = "sam@example.com"
            "#,
        )
        .unwrap()
        .with_overrides(env(&[("CERTPATH_QUIESCENT_MS", "750")]))
        .unwrap();

        assert_eq!(config.quiescent_window_ms, 750);
        assert_eq!(
            config.capability(),
            Capability::Remote {
                folder: "team".into()
            }
        );
        let identity = config.identity.identity().unwrap();
        assert_eq!(identity.name, "sam@example.com");
    }

    #[test]
    fn bad_number_is_rejected() {
        let err = TrackerConfig::default()
            .with_overrides(env(&[("CERTPATH_REMOTE_RETRIES", "many")]))
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnv {
                var: "CERTPATH_REMOTE_RETRIES",
                ..
            }
        ));
    }

    #[test]
    fn placeholder_folder_stays_local() {
        let config = TrackerConfig::default()
            .with_overrides(env(&[("CERTPATH_REMOTE_FOLDER", "YOUR_FOLDER_ID_HERE")]))
            .unwrap();
        assert_eq!(config.capability(), Capability::LocalOnly);
    }

    #[test]
    fn wrong_type_is_rejected() {
        assert!(TrackerConfig::from_toml_str("quiescent_window_ms = \"soon\"").is_err());
    }
}
