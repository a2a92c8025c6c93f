//! certpath Store - Persistence backends
//!
//! Documents live in one of two places:
//! - A local slot on the user's machine ([`LocalStore`])
//! - A remote folder of named artifacts keyed by user email ([`RemoteStore`])
//!
//! [`PersistenceRouter`] picks between them with [`select`], after a demo
//! guard that keeps the demo sentinel away from every backend.

#![warn(unreachable_pub)]

pub mod dir;
pub mod error;
pub mod export;
pub mod local;
pub mod login;
pub mod naming;
pub mod remote;
pub mod router;
pub mod selector;

pub use dir::DirRemoteStore;
pub use error::StoreError;
pub use export::write_backup;
pub use local::{FileLocalStore, LocalStore};
pub use login::LoginRecord;
pub use remote::{RemoteHandle, RemotePolicy, RemoteStore, RemoteStoreSession, Upsert};
pub use router::{PersistenceRouter, SaveReceipt};
pub use selector::{select, Backend, Capability};

#[cfg(any(test, feature = "mock"))]
pub use local::MockLocalStore;
#[cfg(any(test, feature = "mock"))]
pub use remote::MockRemoteStore;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
