//! Persistence router
//!
//! Owns the local slot and, when the capability allows, the remote session.
//! Every save passes the demo guard first and is then routed by
//! [`select`](crate::selector::select).

use crate::error::StoreError;
use crate::local::LocalStore;
use crate::login::LoginRecord;
use crate::naming;
use crate::remote::{RemoteStoreSession, Upsert};
use crate::selector::{select, Backend, Capability};
use certpath_model::{codec, Identity, RoadmapDocument, SessionState};
use chrono::Utc;
use std::fmt;
use std::sync::Arc;

/// Where a save landed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveReceipt {
    /// Written to the local slot
    Local,
    /// Written to the remote store
    Remote {
        /// Artifact name
        artifact: String,
        /// True when the artifact did not exist before
        created: bool,
    },
    /// Nothing was written
    Suppressed,
}

/// Routes document saves and loads to the selected backend
pub struct PersistenceRouter {
    capability: Capability,
    local: Arc<dyn LocalStore>,
    remote: Option<RemoteStoreSession>,
}

impl fmt::Debug for PersistenceRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistenceRouter")
            .field("capability", &self.capability)
            .field("remote", &self.remote)
            .finish_non_exhaustive()
    }
}

impl PersistenceRouter {
    /// Router with only the local slot
    #[must_use]
    pub fn local_only(local: Arc<dyn LocalStore>) -> Self {
        Self {
            capability: Capability::LocalOnly,
            local,
            remote: None,
        }
    }

    /// Router with a remote session; capability follows the session folder
    #[must_use]
    pub fn with_remote(local: Arc<dyn LocalStore>, remote: RemoteStoreSession) -> Self {
        Self {
            capability: Capability::Remote {
                folder: remote.folder().to_string(),
            },
            local,
            remote: Some(remote),
        }
    }

    /// Resolved capability
    #[inline]
    #[must_use]
    pub fn capability(&self) -> &Capability {
        &self.capability
    }

    /// Backend a save would use right now
    #[must_use]
    pub fn backend_for(&self, session: &SessionState) -> Backend {
        if session.is_demo() {
            return Backend::Suppressed;
        }
        select(&self.capability, session)
    }

    /// Persist the whole document
    ///
    /// # Errors
    /// Returns `StoreError` if encoding or the backend write fails.
    pub async fn save(
        &self,
        doc: &RoadmapDocument,
        session: &SessionState,
    ) -> Result<SaveReceipt, StoreError> {
        match self.backend_for(session) {
            Backend::Suppressed => Ok(SaveReceipt::Suppressed),
            Backend::Local => {
                let bytes = codec::encode(doc)?;
                self.local.set(&bytes)?;
                Ok(SaveReceipt::Local)
            }
            Backend::Remote { key } => {
                let remote = self.remote()?;
                let artifact = naming::progress_artifact(&key);
                let bytes = codec::encode(doc)?;
                let created = matches!(remote.upsert(&artifact, &bytes).await?, Upsert::Created(_));
                tracing::debug!(artifact = %artifact, created, "remote document saved");
                Ok(SaveReceipt::Remote { artifact, created })
            }
        }
    }

    /// Load a user's remote document, `None` when they have none yet
    ///
    /// # Errors
    /// Returns `StoreError` on backend failure or undecodable contents, and
    /// `SessionClosed` when no remote is configured.
    pub async fn load_remote(
        &self,
        identity: &Identity,
    ) -> Result<Option<RoadmapDocument>, StoreError> {
        let remote = self.remote()?;
        let artifact = naming::progress_artifact(&identity.email);
        match remote.read_named(&artifact).await? {
            Some(bytes) => Ok(Some(codec::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Load the local slot, `None` when empty
    ///
    /// # Errors
    /// Returns `StoreError` if the slot is unreadable or undecodable.
    pub fn load_local(&self) -> Result<Option<RoadmapDocument>, StoreError> {
        match self.local.get()? {
            Some(bytes) => Ok(Some(codec::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Write the user's login record, stamped now, to the remote store
    ///
    /// Does nothing without a remote or for the demo sentinel.
    ///
    /// # Errors
    /// Returns `StoreError` if the remote write fails.
    pub async fn record_login(&self, identity: &Identity, app: &str) -> Result<(), StoreError> {
        let Some(remote) = &self.remote else {
            return Ok(());
        };
        if identity.is_demo() {
            return Ok(());
        }
        let record = LoginRecord::new(identity, Utc::now(), app);
        let artifact = naming::login_artifact(&identity.email);
        remote.upsert(&artifact, &record.to_bytes()?).await?;
        tracing::debug!(artifact = %artifact, "login recorded");
        Ok(())
    }

    /// Close the remote session if any
    pub fn close(&self) {
        if let Some(remote) = &self.remote {
            remote.close();
        }
    }

    fn remote(&self) -> Result<&RemoteStoreSession, StoreError> {
        self.remote.as_ref().ok_or(StoreError::SessionClosed)
    }
}
