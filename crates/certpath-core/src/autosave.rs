//! Debounced autosave scheduling
//!
//! A pure state machine driven by explicit instants: every edit (re)arms a
//! single timer, only the newest document is written, and at most one write
//! is in flight. The worker task in [`crate::worker`] drives it with real
//! time.

use certpath_model::RoadmapDocument;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// User-visible sync indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SyncStatus {
    /// Nothing to save yet
    #[default]
    Idle,
    /// An edit is waiting for the quiescent window
    Pending,
    /// A remote write is in flight
    Syncing,
    /// Last write reached the remote store, or was suppressed in demo
    Saved,
    /// Last remote operation failed
    Error,
    /// Last write went to the local slot
    Local,
}

impl SyncStatus {
    /// Lowercase label
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SyncStatus::Idle => "idle",
            SyncStatus::Pending => "pending",
            SyncStatus::Syncing => "syncing",
            SyncStatus::Saved => "saved",
            SyncStatus::Error => "error",
            SyncStatus::Local => "local",
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a write ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Remote write succeeded
    Remote,
    /// Local write succeeded
    Local,
    /// Local write failed; still reported as local
    LocalFailed,
    /// Remote write failed
    Failed,
    /// Nothing written (demo)
    Suppressed,
}

impl SaveOutcome {
    /// Status shown once this outcome settles
    #[must_use]
    pub fn status(self) -> SyncStatus {
        match self {
            SaveOutcome::Remote | SaveOutcome::Suppressed => SyncStatus::Saved,
            SaveOutcome::Local | SaveOutcome::LocalFailed => SyncStatus::Local,
            SaveOutcome::Failed => SyncStatus::Error,
        }
    }
}

/// Counters since startup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Edits scheduled
    pub scheduled: u64,
    /// Edits folded into a later one before their timer fired
    pub coalesced: u64,
    /// Successful remote writes
    pub remote_saves: u64,
    /// Successful local writes
    pub local_saves: u64,
    /// Writes skipped in demo mode
    pub suppressed: u64,
    /// Failed remote writes
    pub failures: u64,
    /// Failed local writes
    pub local_failures: u64,
}

/// A write taken off the scheduler
#[derive(Debug, Clone, PartialEq)]
pub struct SaveJob {
    /// Sequence number of the edit being written
    pub generation: u64,
    /// Document to write
    pub document: RoadmapDocument,
}

#[derive(Debug, Clone)]
struct PendingSave {
    due: Instant,
    generation: u64,
    document: RoadmapDocument,
}

/// Debounce state machine
#[derive(Debug, Clone)]
pub struct AutosaveScheduler {
    window: Duration,
    status: SyncStatus,
    pending: Option<PendingSave>,
    in_flight: Option<u64>,
    generation: u64,
    stats: SyncStats,
}

impl AutosaveScheduler {
    /// Scheduler with the given quiescent window
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            status: SyncStatus::Idle,
            pending: None,
            in_flight: None,
            generation: 0,
            stats: SyncStats::default(),
        }
    }

    /// Start from a given status, for documents loaded at startup
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: SyncStatus) -> Self {
        self.status = status;
        self
    }

    /// Current indicator
    #[inline]
    #[must_use]
    pub fn status(&self) -> SyncStatus {
        self.status
    }

    /// Counters
    #[inline]
    #[must_use]
    pub fn stats(&self) -> SyncStats {
        self.stats
    }

    /// Quiescent window
    #[inline]
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// True while a write is in flight
    #[inline]
    #[must_use]
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Arm the timer for `doc`, replacing any pending one
    ///
    /// Returns the new deadline.
    pub fn schedule(&mut self, doc: RoadmapDocument, now: Instant) -> Instant {
        self.generation += 1;
        if self.pending.is_some() {
            self.stats.coalesced += 1;
        }
        self.stats.scheduled += 1;
        let due = now + self.window;
        self.pending = Some(PendingSave {
            due,
            generation: self.generation,
            document: doc,
        });
        self.status = SyncStatus::Pending;
        tracing::debug!(generation = self.generation, "autosave armed");
        due
    }

    /// Drop the pending timer; an in-flight write is left alone
    ///
    /// Returns true if a timer was cancelled.
    pub fn cancel_pending(&mut self) -> bool {
        let cancelled = self.pending.take().is_some();
        if cancelled {
            tracing::debug!("autosave cancelled");
        }
        cancelled
    }

    /// When the pending timer fires, if any
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Take the pending write if its timer has fired
    ///
    /// Returns `None` while another write is in flight so writes stay in
    /// edit order.
    pub fn poll_due(&mut self, now: Instant) -> Option<SaveJob> {
        if self.in_flight.is_some() {
            return None;
        }
        if self.pending.as_ref().map_or(true, |p| p.due > now) {
            return None;
        }
        let pending = self.pending.take()?;
        self.in_flight = Some(pending.generation);
        Some(SaveJob {
            generation: pending.generation,
            document: pending.document,
        })
    }

    /// Mark the in-flight write as a remote sync
    pub fn mark_syncing(&mut self, generation: u64) {
        if self.in_flight == Some(generation) && self.pending.is_none() {
            self.status = SyncStatus::Syncing;
        }
    }

    /// Settle the in-flight write
    ///
    /// A newer edit armed meanwhile keeps the status at pending.
    pub fn complete(&mut self, generation: u64, outcome: SaveOutcome) -> SyncStatus {
        if self.in_flight != Some(generation) {
            tracing::warn!(generation, "completion for a write that is not in flight");
            return self.status;
        }
        self.in_flight = None;
        match outcome {
            SaveOutcome::Remote => self.stats.remote_saves += 1,
            SaveOutcome::Local => self.stats.local_saves += 1,
            SaveOutcome::LocalFailed => self.stats.local_failures += 1,
            SaveOutcome::Failed => self.stats.failures += 1,
            SaveOutcome::Suppressed => self.stats.suppressed += 1,
        }
        if self.pending.is_none() {
            self.status = outcome.status();
        }
        self.status
    }

    /// Set the indicator after a session change
    ///
    /// Ignored while an edit is pending or a write is in flight, those
    /// settle the status themselves.
    pub fn settle(&mut self, status: SyncStatus) {
        if self.pending.is_none() && self.in_flight.is_none() {
            self.status = status;
        }
    }
}
