//! certpath Core - Roadmap tracker
//!
//! Ties the document model to persistence:
//! - Session gate: anonymous, demo and authenticated sessions
//! - Debounced autosave with a single pending timer and one write in flight
//! - Configuration from TOML and `CERTPATH_*` environment variables
//! - Mentor chat seam grounded in the live roadmap
//!
//! # Example
//!
//! ```rust,no_run
//! use certpath_core::prelude::*;
//! use certpath_store::{FileLocalStore, PersistenceRouter};
//! use std::sync::Arc;
//!
//! # async fn run() {
//! let config = TrackerConfig::default();
//! let router = PersistenceRouter::local_only(Arc::new(FileLocalStore::in_dir(&config.data_dir)));
//! let tracker = Arc::new(Tracker::open(
//!     Arc::new(router),
//!     Arc::new(StaticIdentityProvider::new(None)),
//!     config.quiescent_window(),
//! ));
//! let autosave = spawn_autosave(Arc::clone(&tracker));
//! tracker.apply(&Mutation::ToggleSkill { phase: PhaseId(1), name: "Responsible AI".into() });
//! tracker.flush().await;
//! autosave.shutdown().await;
//! # }
//! ```

#![warn(unreachable_pub)]

pub mod autosave;
pub mod config;
pub mod error;
pub mod mentor;
pub mod session;
pub mod tracker;
pub mod worker;

pub use autosave::{AutosaveScheduler, SaveJob, SaveOutcome, SyncStats, SyncStatus};
pub use config::{IdentityConfig, TrackerConfig};
pub use error::{ConfigError, MentorError, TrackerError};
pub use mentor::{
    ChatMessage, ChatRole, MentorBackend, MentorReply, MentorRequest, MentorSession, Source,
};
pub use session::{
    allowed_transitions, validate_transition, IdentityProvider, SessionError, SessionKind,
    StaticIdentityProvider,
};
pub use tracker::{Tracker, TrackerSnapshot};
pub use worker::{spawn_autosave, AutosaveHandle};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a tracker
    pub use crate::{
        spawn_autosave, IdentityProvider, StaticIdentityProvider, SyncStatus, Tracker,
        TrackerConfig, TrackerError,
    };
    pub use certpath_model::prelude::*;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
