//! The roadmap tracker
//!
//! Owns the live document, the session and the autosave scheduler behind one
//! short-held lock that is never held across an `.await`. Writes are
//! serialized by a separate async gate so they reach the store in edit
//! order.

use crate::autosave::{AutosaveScheduler, SaveOutcome, SyncStats, SyncStatus};
use crate::config::DEFAULT_APP_NAME;
use crate::error::TrackerError;
use crate::session::{validate_transition, IdentityProvider, SessionError, SessionKind};
use certpath_model::{seed, Identity, Mutation, RoadmapDocument, SessionState};
use certpath_store::{Backend, Capability, PersistenceRouter, SaveReceipt};
use chrono::Utc;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;

#[derive(Debug)]
struct TrackerState {
    document: RoadmapDocument,
    session: SessionState,
    scheduler: AutosaveScheduler,
}

impl TrackerState {
    fn transition(&self, to: SessionKind) -> Result<(), TrackerError> {
        let from = SessionKind::from(&self.session);
        validate_transition(from, to)?;
        tracing::debug!(?from, ?to, "session transition");
        Ok(())
    }

    /// Like `transition`, but only starting from `from`
    fn transition_from(&self, from: SessionKind, to: SessionKind) -> Result<(), TrackerError> {
        let current = SessionKind::from(&self.session);
        if current != from {
            return Err(SessionError::IllegalTransition { from: current, to }.into());
        }
        self.transition(to)
    }
}

/// Point-in-time view for display
#[derive(Debug, Clone)]
pub struct TrackerSnapshot {
    /// Live document
    pub document: RoadmapDocument,
    /// Current session
    pub session: SessionState,
    /// Sync indicator
    pub status: SyncStatus,
    /// Sync counters
    pub stats: SyncStats,
}

/// Roadmap tracker
pub struct Tracker {
    state: Mutex<TrackerState>,
    router: Arc<PersistenceRouter>,
    identity: Arc<dyn IdentityProvider>,
    write_gate: tokio::sync::Mutex<()>,
    wake: Notify,
    app_name: String,
}

impl std::fmt::Debug for Tracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker")
            .field("router", &self.router)
            .field("app_name", &self.app_name)
            .finish_non_exhaustive()
    }
}

impl Tracker {
    /// Open the tracker
    ///
    /// Without a remote backend the local slot is loaded when present.
    /// Otherwise the session starts anonymous on the seed roadmap.
    #[must_use]
    pub fn open(
        router: Arc<PersistenceRouter>,
        identity: Arc<dyn IdentityProvider>,
        window: Duration,
    ) -> Self {
        let (document, status) = match router.capability() {
            Capability::LocalOnly => match router.load_local() {
                Ok(Some(doc)) => {
                    tracing::info!(phases = doc.len(), "loaded local roadmap");
                    (doc, SyncStatus::Local)
                }
                Ok(None) => (seed::default_roadmap().clone(), SyncStatus::Idle),
                Err(e) => {
                    tracing::error!(error = %e, "local roadmap unreadable, starting from seed");
                    (seed::default_roadmap().clone(), SyncStatus::Error)
                }
            },
            Capability::Remote { .. } => (seed::default_roadmap().clone(), SyncStatus::Idle),
        };
        Self {
            state: Mutex::new(TrackerState {
                document,
                session: SessionState::Anonymous,
                scheduler: AutosaveScheduler::new(window).with_status(status),
            }),
            router,
            identity,
            write_gate: tokio::sync::Mutex::new(()),
            wake: Notify::new(),
            app_name: DEFAULT_APP_NAME.to_string(),
        }
    }

    /// With application name for login records
    #[inline]
    #[must_use]
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    /// Live document
    #[must_use]
    pub fn document(&self) -> RoadmapDocument {
        self.state.lock().document.clone()
    }

    /// Current session
    #[must_use]
    pub fn session(&self) -> SessionState {
        self.state.lock().session.clone()
    }

    /// Sync indicator
    #[must_use]
    pub fn sync_status(&self) -> SyncStatus {
        self.state.lock().scheduler.status()
    }

    /// Everything at once, under a single lock
    #[must_use]
    pub fn snapshot(&self) -> TrackerSnapshot {
        let st = self.state.lock();
        TrackerSnapshot {
            document: st.document.clone(),
            session: st.session.clone(),
            status: st.scheduler.status(),
            stats: st.scheduler.stats(),
        }
    }

    /// Remote capability
    #[must_use]
    pub fn capability(&self) -> &Capability {
        self.router.capability()
    }

    /// Apply an edit and arm the autosave timer
    ///
    /// Returns false, scheduling nothing, when the target does not exist.
    pub fn apply(&self, mutation: &Mutation) -> bool {
        {
            let mut st = self.state.lock();
            let next = st.document.apply(mutation);
            if next == st.document {
                tracing::debug!(%mutation, "edit matched nothing");
                return false;
            }
            st.document = next.clone();
            st.scheduler.schedule(next, Instant::now());
        }
        self.wake.notify_one();
        true
    }

    /// Sign in through the identity provider, then load the user's document
    ///
    /// Saves are held back until the load settles. An edit still pending
    /// from the anonymous session is dropped when a stored document replaces
    /// it or the load fails, and is saved remotely when the user has none.
    ///
    /// # Errors
    /// - `RemoteUnavailable` without a remote backend
    /// - `Session` unless currently anonymous
    /// - `SignInFailed` when the provider rejects; status becomes error
    pub async fn sign_in(&self) -> Result<Identity, TrackerError> {
        if !self.router.capability().is_remote() {
            return Err(TrackerError::RemoteUnavailable);
        }
        self.state.lock().transition(SessionKind::Authenticated)?;

        let identity = match self.identity.sign_in().await {
            Ok(identity) => identity,
            Err(message) => {
                tracing::error!(error = %message, "sign-in failed");
                self.state.lock().scheduler.settle(SyncStatus::Error);
                return Err(TrackerError::SignInFailed(message));
            }
        };

        // Saves wait until the load settles, so an edit armed while
        // anonymous never lands on the stored document
        let _gate = self.write_gate.lock().await;
        {
            let mut st = self.state.lock();
            st.transition_from(SessionKind::Anonymous, SessionKind::Authenticated)?;
            st.session = SessionState::Authenticated(identity.clone());
        }
        tracing::info!(email = %identity.email, "signed in");

        self.spawn_login_record(identity.clone());

        match self.router.load_remote(&identity).await {
            Ok(Some(doc)) => {
                tracing::info!(email = %identity.email, "loaded remote roadmap");
                let mut st = self.state.lock();
                st.document = doc;
                st.scheduler.cancel_pending();
                st.scheduler.settle(SyncStatus::Saved);
            }
            Ok(None) => {
                tracing::info!(email = %identity.email, "no remote roadmap yet");
                self.state.lock().scheduler.settle(SyncStatus::Idle);
            }
            Err(e) => {
                tracing::error!(email = %identity.email, error = %e, "remote load failed");
                let mut st = self.state.lock();
                // Unreadable is not absent: keep the stored artifact intact
                if st.scheduler.cancel_pending() {
                    tracing::warn!("pending edit dropped after failed remote load");
                }
                st.scheduler.settle(SyncStatus::Error);
            }
        }
        self.wake.notify_one();
        Ok(identity)
    }

    /// Sign out; the remote document is kept
    ///
    /// # Errors
    /// Returns `Session` unless currently authenticated.
    pub async fn sign_out(&self) -> Result<(), TrackerError> {
        self.state
            .lock()
            .transition_from(SessionKind::Authenticated, SessionKind::Anonymous)?;
        if let Err(message) = self.identity.revoke().await {
            tracing::warn!(error = %message, "token revoke failed");
        }
        let mut st = self.state.lock();
        st.session = SessionState::Anonymous;
        st.scheduler.settle(SyncStatus::Local);
        tracing::info!("signed out");
        Ok(())
    }

    /// Switch to the demo roadmap; never touches a backend
    ///
    /// # Errors
    /// Returns `Session` when already in demo.
    pub fn enter_demo(&self) -> Result<(), TrackerError> {
        {
            let mut st = self.state.lock();
            st.transition(SessionKind::Demo)?;
            st.scheduler.cancel_pending();
            st.document = seed::demo_roadmap().clone();
            st.session = SessionState::Demo;
            st.scheduler.settle(SyncStatus::Saved);
        }
        self.wake.notify_one();
        tracing::info!("entered demo");
        Ok(())
    }

    /// Leave demo, restoring the local slot or the seed
    ///
    /// # Errors
    /// Returns `Session` unless currently in demo.
    pub fn exit_demo(&self) -> Result<(), TrackerError> {
        {
            let mut st = self.state.lock();
            st.transition_from(SessionKind::Demo, SessionKind::Anonymous)?;
            st.scheduler.cancel_pending();
            st.session = SessionState::Anonymous;
        }
        let document = match self.router.load_local() {
            Ok(Some(doc)) => doc,
            Ok(None) => seed::default_roadmap().clone(),
            Err(e) => {
                tracing::error!(error = %e, "local roadmap unreadable, restoring seed");
                seed::default_roadmap().clone()
            }
        };
        {
            let mut st = self.state.lock();
            st.document = document;
            st.scheduler.settle(SyncStatus::Local);
        }
        self.wake.notify_one();
        tracing::info!("left demo");
        Ok(())
    }

    /// Deadline of the pending autosave
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.state.lock().scheduler.next_deadline()
    }

    /// Drop the pending autosave
    pub fn cancel_pending(&self) -> bool {
        self.state.lock().scheduler.cancel_pending()
    }

    /// Run the autosave if its timer has fired by `now`
    ///
    /// Waits for any in-flight write first. Returns the settled status, or
    /// `None` when nothing was due.
    pub async fn run_due(&self, now: Instant) -> Option<SyncStatus> {
        let _gate = self.write_gate.lock().await;
        let (job, session) = {
            let mut st = self.state.lock();
            let job = st.scheduler.poll_due(now)?;
            (job, st.session.clone())
        };

        let outcome = if session.is_demo() {
            tracing::debug!("demo session, save suppressed");
            SaveOutcome::Suppressed
        } else {
            let backend = self.router.backend_for(&session);
            if matches!(backend, Backend::Remote { .. }) {
                self.state.lock().scheduler.mark_syncing(job.generation);
            }
            match self.router.save(&job.document, &session).await {
                Ok(SaveReceipt::Remote { artifact, created }) => {
                    tracing::info!(%artifact, created, "roadmap saved");
                    SaveOutcome::Remote
                }
                Ok(SaveReceipt::Local) => {
                    tracing::info!("roadmap saved locally");
                    SaveOutcome::Local
                }
                Ok(SaveReceipt::Suppressed) => SaveOutcome::Suppressed,
                Err(e) => {
                    tracing::error!(backend = %backend, error = %e, "roadmap save failed");
                    if matches!(backend, Backend::Remote { .. }) {
                        SaveOutcome::Failed
                    } else {
                        SaveOutcome::LocalFailed
                    }
                }
            }
        };

        let status = self.state.lock().scheduler.complete(job.generation, outcome);
        self.wake.notify_one();
        Some(status)
    }

    /// Write the pending edit now instead of waiting for its timer
    pub async fn flush(&self) -> SyncStatus {
        while let Some(deadline) = self.next_deadline() {
            self.run_due(deadline).await;
        }
        self.sync_status()
    }

    /// Export the live document to `dir`
    ///
    /// # Errors
    /// Returns `Store` if the file cannot be written.
    pub async fn export(&self, dir: impl AsRef<Path>) -> Result<PathBuf, TrackerError> {
        let doc = self.document();
        Ok(certpath_store::write_backup(dir, &doc, Utc::now().date_naive()).await?)
    }

    /// Close the remote session
    pub fn close(&self) {
        self.router.close();
    }

    pub(crate) async fn woken(&self) {
        self.wake.notified().await;
    }

    fn spawn_login_record(&self, identity: Identity) {
        let router = Arc::clone(&self.router);
        let app = self.app_name.clone();
        tokio::spawn(async move {
            if let Err(e) = router.record_login(&identity, &app).await {
                tracing::warn!(email = %identity.email, error = %e, "login record not written");
            }
        });
    }
}
