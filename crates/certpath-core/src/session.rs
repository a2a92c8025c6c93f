//! Identity/session gate
//!
//! Legal moves between anonymous, demo and authenticated sessions, and the
//! seam to the external identity provider.

use certpath_model::{Identity, SessionState};

/// Coarse session state, without the identity payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionKind {
    /// Nobody signed in
    Anonymous,
    /// Demo sentinel
    Demo,
    /// Signed-in user
    Authenticated,
}

impl From<&SessionState> for SessionKind {
    fn from(state: &SessionState) -> Self {
        match state {
            SessionState::Anonymous => SessionKind::Anonymous,
            SessionState::Demo => SessionKind::Demo,
            SessionState::Authenticated(_) => SessionKind::Authenticated,
        }
    }
}

/// Session gate errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Transition not in the session table
    #[error("illegal session transition: {from:?} -> {to:?}")]
    IllegalTransition {
        /// Current state
        from: SessionKind,
        /// Requested state
        to: SessionKind,
    },
}

/// States reachable from `from`
#[must_use]
pub fn allowed_transitions(from: SessionKind) -> Vec<SessionKind> {
    use SessionKind::{Anonymous, Authenticated, Demo};
    match from {
        Anonymous => vec![Authenticated, Demo],
        Authenticated => vec![Anonymous, Demo],
        Demo => vec![Anonymous],
    }
}

/// Check a transition against the session table
///
/// # Errors
/// Returns `SessionError::IllegalTransition` if `to` is not reachable.
pub fn validate_transition(from: SessionKind, to: SessionKind) -> Result<(), SessionError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(SessionError::IllegalTransition { from, to })
    }
}

/// External sign-in provider
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Run the sign-in flow and fetch the user's profile
    async fn sign_in(&self) -> Result<Identity, String>;

    /// Revoke the current session token
    async fn revoke(&self) -> Result<(), String>;
}

/// Provider that signs in as a fixed, configured identity
#[derive(Debug, Clone)]
pub struct StaticIdentityProvider {
    identity: Option<Identity>,
}

impl StaticIdentityProvider {
    /// Provider for `identity`; `None` makes every sign-in fail
    #[must_use]
    pub fn new(identity: Option<Identity>) -> Self {
        Self { identity }
    }
}

#[async_trait::async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn sign_in(&self) -> Result<Identity, String> {
        self.identity
            .clone()
            .ok_or_else(|| "no identity configured (set CERTPATH_USER_EMAIL)".to_string())
    }

    async fn revoke(&self) -> Result<(), String> {
        Ok(())
    }
}
