//! Error types for the document model
//!
//! Covers:
//! - Decoding persisted bytes into a [`RoadmapDocument`](crate::RoadmapDocument)
//! - Structural validation (phase numbering and lookup-key uniqueness)

use crate::roadmap::PhaseId;

/// Errors raised while decoding or validating a roadmap document
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Bytes are not a valid JSON phase sequence
    #[error("malformed roadmap document: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Document serialization failed
    #[error("failed to encode roadmap document: {0}")]
    Encode(String),

    /// Phase ids do not run 1..N in order
    #[error("phase ids must run 1..N: expected {expected}, found {found}")]
    PhaseSequence { expected: PhaseId, found: PhaseId },

    /// Two children of one phase share a lookup key
    #[error("duplicate {kind} '{key}' in phase {phase}")]
    DuplicateKey {
        phase: PhaseId,
        kind: ChildKind,
        key: String,
    },
}

impl DocumentError {
    /// Create duplicate-key error
    #[inline]
    pub fn duplicate(phase: PhaseId, kind: ChildKind, key: impl Into<String>) -> Self {
        Self::DuplicateKey {
            phase,
            kind,
            key: key.into(),
        }
    }
}

/// Which child list a key belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildKind {
    /// Certification, keyed by code
    Certification,
    /// Skill, keyed by name
    Skill,
    /// Project, keyed by title
    Project,
}

impl std::fmt::Display for ChildKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ChildKind::Certification => "certification",
            ChildKind::Skill => "skill",
            ChildKind::Project => "project",
        };
        f.write_str(name)
    }
}
