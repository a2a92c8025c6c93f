//! Remote store
//!
//! A shared folder of named artifacts: find by name, create, update in
//! place, read. [`RemoteStoreSession`] wraps a backend with the configured
//! timeout and retry policy and an explicit open/close lifecycle.

use crate::error::StoreError;
use std::fmt;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Opaque reference to an existing remote artifact
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteHandle(pub String);

impl RemoteHandle {
    /// Backend identifier
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Named-artifact backend scoped to one folder
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
#[async_trait::async_trait]
pub trait RemoteStore: Send + Sync {
    /// Look up an artifact by exact name
    async fn find(&self, name: &str) -> Result<Option<RemoteHandle>, StoreError>;

    /// Create a new artifact
    async fn create(&self, name: &str, bytes: &[u8]) -> Result<RemoteHandle, StoreError>;

    /// Replace an existing artifact's contents
    async fn update(&self, handle: &RemoteHandle, bytes: &[u8]) -> Result<(), StoreError>;

    /// Read an artifact's contents
    async fn read(&self, handle: &RemoteHandle) -> Result<Vec<u8>, StoreError>;
}

/// Outcome of an upsert
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upsert {
    /// No artifact existed, one was created
    Created(RemoteHandle),
    /// Existing artifact was replaced
    Updated(RemoteHandle),
}

/// Timeout and retry policy for remote calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemotePolicy {
    /// Per-call timeout
    pub timeout: Duration,
    /// Extra attempts after a transient failure
    pub retries: u32,
    /// First backoff delay, doubled per retry
    pub backoff: Duration,
}

impl Default for RemotePolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(15_000),
            retries: 0,
            backoff: Duration::from_millis(250),
        }
    }
}

impl RemotePolicy {
    /// With per-call timeout
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// With retry count
    #[inline]
    #[must_use]
    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// With first backoff delay
    #[inline]
    #[must_use]
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }
}

/// An open connection to the remote folder
pub struct RemoteStoreSession {
    store: Arc<dyn RemoteStore>,
    folder: String,
    policy: RemotePolicy,
    open: AtomicBool,
}

impl fmt::Debug for RemoteStoreSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteStoreSession")
            .field("folder", &self.folder)
            .field("policy", &self.policy)
            .field("open", &self.is_open())
            .finish_non_exhaustive()
    }
}

impl RemoteStoreSession {
    /// Open a session on `folder`
    #[must_use]
    pub fn open(
        store: Arc<dyn RemoteStore>,
        folder: impl Into<String>,
        policy: RemotePolicy,
    ) -> Self {
        let folder = folder.into();
        tracing::info!(folder = %folder, timeout = ?policy.timeout, "remote session opened");
        Self {
            store,
            folder,
            policy,
            open: AtomicBool::new(true),
        }
    }

    /// Folder this session is scoped to
    #[inline]
    #[must_use]
    pub fn folder(&self) -> &str {
        &self.folder
    }

    /// True until [`close`](Self::close) is called
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Close the session; later calls fail with `SessionClosed`
    pub fn close(&self) {
        if self.open.swap(false, Ordering::AcqRel) {
            tracing::info!(folder = %self.folder, "remote session closed");
        }
    }

    /// Find an artifact by name
    ///
    /// # Errors
    /// Returns `StoreError` on backend failure, timeout or closed session.
    pub async fn find(&self, name: &str) -> Result<Option<RemoteHandle>, StoreError> {
        let store = &self.store;
        self.call("find", move || store.find(name)).await
    }

    /// Read an artifact
    ///
    /// # Errors
    /// Returns `StoreError` on backend failure, timeout or closed session.
    pub async fn read(&self, handle: &RemoteHandle) -> Result<Vec<u8>, StoreError> {
        let store = &self.store;
        self.call("read", move || store.read(handle)).await
    }

    /// Find then read; `None` when no artifact has that name
    ///
    /// # Errors
    /// Returns `StoreError` on backend failure, timeout or closed session.
    pub async fn read_named(&self, name: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match self.find(name).await? {
            Some(handle) => self.read(&handle).await.map(Some),
            None => Ok(None),
        }
    }

    /// Update the artifact named `name`, creating it when absent
    ///
    /// # Errors
    /// Returns `StoreError` on backend failure, timeout or closed session.
    pub async fn upsert(&self, name: &str, bytes: &[u8]) -> Result<Upsert, StoreError> {
        let store = &self.store;
        match self.find(name).await? {
            Some(handle) => {
                let target = &handle;
                self.call("update", move || store.update(target, bytes)).await?;
                Ok(Upsert::Updated(handle))
            }
            None => {
                let handle = self.call("create", move || store.create(name, bytes)).await?;
                Ok(Upsert::Created(handle))
            }
        }
    }

    /// Run one backend call under the timeout and retry policy
    async fn call<T, F, Fut>(&self, op: &'static str, mut f: F) -> Result<T, StoreError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, StoreError>>,
    {
        if !self.is_open() {
            return Err(StoreError::SessionClosed);
        }
        let mut delay = self.policy.backoff;
        let mut attempt = 0u32;
        loop {
            let result = match tokio::time::timeout(self.policy.timeout, f()).await {
                Ok(result) => result,
                Err(_) => Err(StoreError::Timeout {
                    op,
                    after_ms: u64::try_from(self.policy.timeout.as_millis()).unwrap_or(u64::MAX),
                }),
            };
            match result {
                Err(e) if e.is_transient() && attempt < self.policy.retries => {
                    attempt += 1;
                    tracing::warn!(op, attempt, error = %e, "remote call failed, retrying");
                    tokio::time::sleep(delay).await;
                    delay = delay.saturating_mul(2);
                }
                other => return other,
            }
        }
    }
}
