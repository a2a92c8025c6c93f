//! Testing utilities for certpath workspace
//!
//! In-memory backends with call counters and failure switches, a scripted
//! identity provider, and fixtures.

#![allow(missing_docs)]

use certpath_core::{IdentityProvider, Tracker};
use certpath_model::{seed, Identity, PhaseId, RoadmapDocument};
use certpath_store::{
    LocalStore, PersistenceRouter, RemoteHandle, RemotePolicy, RemoteStore, RemoteStoreSession,
    StoreError,
};
use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const TEST_FOLDER: &str = "test-folder";
pub const TEST_WINDOW: Duration = Duration::from_millis(2_000);

pub fn sam() -> Identity {
    Identity::new("Sam Rivera", "sam@example.com").with_picture("https://example.com/sam.png")
}

pub fn kim() -> Identity {
    Identity::new("Kim Lee", "kim@example.com")
}

/// Seed with PL-900 started, distinguishable from the seed itself
pub fn edited_roadmap() -> RoadmapDocument {
    seed::default_roadmap().rotate_certification_status(PhaseId(1), "PL-900")
}

#[derive(Debug, Default)]
pub struct Calls {
    pub find: AtomicUsize,
    pub create: AtomicUsize,
    pub update: AtomicUsize,
    pub read: AtomicUsize,
}

impl Calls {
    pub fn total(&self) -> usize {
        self.find.load(Ordering::SeqCst)
            + self.create.load(Ordering::SeqCst)
            + self.update.load(Ordering::SeqCst)
            + self.read.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.create.load(Ordering::SeqCst) + self.update.load(Ordering::SeqCst)
    }
}

/// Remote store in memory; handles are artifact names
#[derive(Debug, Default)]
pub struct MemoryRemoteStore {
    artifacts: DashMap<String, Vec<u8>>,
    history: Mutex<Vec<(String, Vec<u8>)>>,
    pub calls: Calls,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
    fail_prefix: Mutex<Option<String>>,
    latency: Mutex<Option<Duration>>,
    read_latency: Mutex<Option<Duration>>,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Fail only writes to artifacts whose name starts with `prefix`
    pub fn fail_writes_with_prefix(&self, prefix: &str) {
        *self.fail_prefix.lock() = Some(prefix.to_string());
    }

    /// Delay every write by `latency`
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock() = Some(latency);
    }

    /// Delay every read by `latency`
    pub fn set_read_latency(&self, latency: Duration) {
        *self.read_latency.lock() = Some(latency);
    }

    pub fn insert(&self, name: &str, bytes: Vec<u8>) {
        self.artifacts.insert(name.to_string(), bytes);
    }

    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.artifacts.get(name).map(|v| v.value().clone())
    }

    pub fn document(&self, name: &str) -> Option<RoadmapDocument> {
        self.get(name)
            .map(|bytes| certpath_model::codec::decode(&bytes).unwrap())
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    /// Every write in arrival order
    pub fn history(&self) -> Vec<(String, Vec<u8>)> {
        self.history.lock().clone()
    }

    async fn write(&self, name: &str, bytes: &[u8], op: &'static str) -> Result<(), StoreError> {
        let latency = *self.latency.lock();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        let prefixed = self
            .fail_prefix
            .lock()
            .as_deref()
            .is_some_and(|prefix| name.starts_with(prefix));
        if prefixed || self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::remote(op, "injected failure"));
        }
        self.artifacts.insert(name.to_string(), bytes.to_vec());
        self.history.lock().push((name.to_string(), bytes.to_vec()));
        Ok(())
    }
}

#[async_trait::async_trait]
impl RemoteStore for MemoryRemoteStore {
    async fn find(&self, name: &str) -> Result<Option<RemoteHandle>, StoreError> {
        self.calls.find.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::remote("find", "injected failure"));
        }
        Ok(self
            .artifacts
            .contains_key(name)
            .then(|| RemoteHandle(name.to_string())))
    }

    async fn create(&self, name: &str, bytes: &[u8]) -> Result<RemoteHandle, StoreError> {
        self.calls.create.fetch_add(1, Ordering::SeqCst);
        if self.artifacts.contains_key(name) {
            return Err(StoreError::AlreadyExists(name.to_string()));
        }
        self.write(name, bytes, "create").await?;
        Ok(RemoteHandle(name.to_string()))
    }

    async fn update(&self, handle: &RemoteHandle, bytes: &[u8]) -> Result<(), StoreError> {
        self.calls.update.fetch_add(1, Ordering::SeqCst);
        if !self.artifacts.contains_key(handle.as_str()) {
            return Err(StoreError::NotFound(handle.as_str().to_string()));
        }
        self.write(handle.as_str(), bytes, "update").await
    }

    async fn read(&self, handle: &RemoteHandle) -> Result<Vec<u8>, StoreError> {
        self.calls.read.fetch_add(1, Ordering::SeqCst);
        let latency = *self.read_latency.lock();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::remote("read", "injected failure"));
        }
        self.get(handle.as_str())
            .ok_or_else(|| StoreError::NotFound(handle.as_str().to_string()))
    }
}

/// Local slot in memory
#[derive(Debug, Default)]
pub struct MemoryLocalStore {
    slot: Mutex<Option<Vec<u8>>>,
    pub gets: AtomicUsize,
    pub sets: AtomicUsize,
    fail: AtomicBool,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(doc: &RoadmapDocument) -> Self {
        let store = Self::new();
        *store.slot.lock() = Some(certpath_model::codec::encode(doc).unwrap());
        store
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn document(&self) -> Option<RoadmapDocument> {
        self.slot
            .lock()
            .as_ref()
            .map(|bytes| certpath_model::codec::decode(bytes).unwrap())
    }

    pub fn calls(&self) -> usize {
        self.gets.load(Ordering::SeqCst) + self.sets.load(Ordering::SeqCst)
    }
}

impl LocalStore for MemoryLocalStore {
    fn get(&self) -> Result<Option<Vec<u8>>, StoreError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::io_error(
                "memory",
                std::io::Error::other("injected failure"),
            ));
        }
        Ok(self.slot.lock().clone())
    }

    fn set(&self, bytes: &[u8]) -> Result<(), StoreError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::io_error(
                "memory",
                std::io::Error::other("quota exceeded"),
            ));
        }
        *self.slot.lock() = Some(bytes.to_vec());
        Ok(())
    }
}

/// Identity provider answering from a script
#[derive(Debug, Default)]
pub struct ScriptedIdentityProvider {
    script: Mutex<VecDeque<Result<Identity, String>>>,
    pub revokes: AtomicUsize,
    fail_revoke: AtomicBool,
}

impl ScriptedIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_identity(self, identity: Identity) -> Self {
        self.script.lock().push_back(Ok(identity));
        self
    }

    pub fn then_failure(self, message: &str) -> Self {
        self.script.lock().push_back(Err(message.to_string()));
        self
    }

    pub fn set_fail_revoke(&self, fail: bool) {
        self.fail_revoke.store(fail, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl IdentityProvider for ScriptedIdentityProvider {
    async fn sign_in(&self) -> Result<Identity, String> {
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err("script exhausted".to_string()))
    }

    async fn revoke(&self) -> Result<(), String> {
        self.revokes.fetch_add(1, Ordering::SeqCst);
        if self.fail_revoke.load(Ordering::SeqCst) {
            Err("revoke failed".to_string())
        } else {
            Ok(())
        }
    }
}

/// Backends and a tracker wired together
pub struct Harness {
    pub tracker: Arc<Tracker>,
    pub local: Arc<MemoryLocalStore>,
    pub remote: Option<Arc<MemoryRemoteStore>>,
    pub identity: Arc<ScriptedIdentityProvider>,
}

pub fn local_harness(local: MemoryLocalStore, identity: ScriptedIdentityProvider) -> Harness {
    let local = Arc::new(local);
    let identity = Arc::new(identity);
    let router = PersistenceRouter::local_only(local.clone());
    let tracker = Tracker::open(Arc::new(router), identity.clone(), TEST_WINDOW);
    Harness {
        tracker: Arc::new(tracker),
        local,
        remote: None,
        identity,
    }
}

pub fn remote_harness(
    local: MemoryLocalStore,
    remote: MemoryRemoteStore,
    identity: ScriptedIdentityProvider,
) -> Harness {
    let local = Arc::new(local);
    let remote = Arc::new(remote);
    let identity = Arc::new(identity);
    let session = RemoteStoreSession::open(remote.clone(), TEST_FOLDER, RemotePolicy::default());
    let router = PersistenceRouter::with_remote(local.clone(), session);
    let tracker = Tracker::open(Arc::new(router), identity.clone(), TEST_WINDOW);
    Harness {
        tracker: Arc::new(tracker),
        local,
        remote: Some(remote),
        identity,
    }
}

impl Harness {
    pub fn remote(&self) -> &MemoryRemoteStore {
        self.remote.as_deref().expect("harness has no remote")
    }
}
