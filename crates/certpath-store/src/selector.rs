//! Backend selection
//!
//! A pure function of the resolved remote capability and the session state.
//! The demo guard runs before selection, so the demo sentinel never reaches
//! this table on the write path.

use certpath_model::SessionState;
use std::fmt;

/// Whether a remote backend is available in this build
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    /// Remote store scoped to a shared folder
    Remote {
        /// Folder identifier
        folder: String,
    },
    /// Only the local slot exists
    LocalOnly,
}

impl Capability {
    /// Resolve from the configured folder identifier
    ///
    /// Empty values and unfilled `YOUR_..._HERE` placeholders count as unset.
    #[must_use]
    pub fn resolve(remote_folder: Option<&str>) -> Self {
        match remote_folder.map(str::trim) {
            Some(folder)
                if !folder.is_empty()
                    && !(folder.starts_with("YOUR_") && folder.ends_with("_HERE")) =>
            {
                Capability::Remote {
                    folder: folder.to_string(),
                }
            }
            _ => Capability::LocalOnly,
        }
    }

    /// True when a remote backend is configured
    #[inline]
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Capability::Remote { .. })
    }
}

/// Where a save or load goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// The local slot
    Local,
    /// The remote store under the user's key
    Remote {
        /// User key (email)
        key: String,
    },
    /// No persistence at all
    Suppressed,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::Local => f.write_str("local"),
            Backend::Remote { key } => write!(f, "remote:{key}"),
            Backend::Suppressed => f.write_str("suppressed"),
        }
    }
}

/// Pick the backend
///
/// | capability | session       | backend    |
/// |------------|---------------|------------|
/// | local only | any           | local      |
/// | remote     | anonymous     | local      |
/// | remote     | demo          | suppressed |
/// | remote     | authenticated | remote     |
#[must_use]
pub fn select(capability: &Capability, session: &SessionState) -> Backend {
    match (capability, session) {
        (Capability::LocalOnly, _) | (Capability::Remote { .. }, SessionState::Anonymous) => {
            Backend::Local
        }
        (Capability::Remote { .. }, SessionState::Demo) => Backend::Suppressed,
        (Capability::Remote { .. }, SessionState::Authenticated(identity)) => {
            if identity.is_demo() {
                Backend::Suppressed
            } else {
                Backend::Remote {
                    key: identity.email.clone(),
                }
            }
        }
    }
}
