//! certpath Model - Roadmap document and pure mutations
//!
//! The roadmap is a tree of phases, each owning ordered lists of
//! certifications, skills and projects. This crate provides:
//! - The document types and their lookup-key invariants
//! - The three toggle operations (certification rotation, project rotation,
//!   skill mastery), all pure `&self -> Self`
//! - The persisted JSON codec shared by every backend
//! - Seed and demo documents, progress summaries, search
//!
//! # Example
//!
//! ```rust
//! use certpath_model::{seed, PhaseId, Status};
//!
//! let doc = seed::default_roadmap().rotate_certification_status(PhaseId(1), "PL-900");
//! assert_eq!(doc.certification(PhaseId(1), "PL-900").unwrap().status(), Status::InProgress);
//! ```

#![warn(unreachable_pub)]

pub mod codec;
pub mod error;
pub mod identity;
pub mod progress;
pub mod roadmap;
pub mod schedule;
pub mod search;
pub mod seed;
pub mod status;

pub use error::{ChildKind, DocumentError};
pub use identity::{Identity, SessionState};
pub use progress::{PhaseProgress, ProgressSummary};
pub use roadmap::{
    Certification, Difficulty, Mutation, Phase, PhaseId, Project, RoadmapDocument, Skill,
    SkillCategory,
};
pub use search::{search, SearchHit, SearchResults};
pub use status::Status;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with roadmap documents
    pub use crate::{
        codec, seed, Identity, Mutation, PhaseId, RoadmapDocument, SessionState, Status,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
