//! User identity
//!
//! The email is the lookup key for a user's stored document. One reserved
//! identity, [`Identity::demo`], marks exploration mode and must never reach
//! a persistence backend.

use serde::{Deserialize, Serialize};

const DEMO_NAME: &str = "Alex (Demo User)";
const DEMO_EMAIL: &str = "alex.test@example.com";

/// A signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identity {
    /// Display name
    pub name: String,
    /// Unique key for backend document lookup
    pub email: String,
    /// Avatar URL, empty when unknown
    #[serde(default)]
    pub picture: String,
}

impl Identity {
    /// Create identity without a picture
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            picture: String::new(),
        }
    }

    /// With avatar URL
    #[inline]
    #[must_use]
    pub fn with_picture(mut self, picture: impl Into<String>) -> Self {
        self.picture = picture.into();
        self
    }

    /// The demo sentinel
    #[must_use]
    pub fn demo() -> Self {
        Self::new(DEMO_NAME, DEMO_EMAIL)
    }

    /// True for the demo sentinel
    ///
    /// Compared by email, the backend key, so a sentinel deserialized from
    /// elsewhere is still recognised.
    #[inline]
    #[must_use]
    pub fn is_demo(&self) -> bool {
        self.email == DEMO_EMAIL
    }
}

/// Who is driving the session
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Nobody signed in
    #[default]
    Anonymous,
    /// Exploring with the demo sentinel
    Demo,
    /// Signed in through the external provider
    Authenticated(Identity),
}

impl SessionState {
    /// Current identity, the sentinel in demo mode
    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        match self {
            SessionState::Anonymous => None,
            SessionState::Demo => Some(Identity::demo()),
            SessionState::Authenticated(identity) => Some(identity.clone()),
        }
    }

    /// True whenever the effective identity is the demo sentinel
    #[inline]
    #[must_use]
    pub fn is_demo(&self) -> bool {
        match self {
            SessionState::Anonymous => false,
            SessionState::Demo => true,
            SessionState::Authenticated(identity) => identity.is_demo(),
        }
    }

    /// Short state name for logs
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Anonymous => "anonymous",
            SessionState::Demo => "demo",
            SessionState::Authenticated(_) => "authenticated",
        }
    }
}
