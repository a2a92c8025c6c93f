//! Progress summary derived from a roadmap document

use crate::roadmap::{Certification, Phase, PhaseId, RoadmapDocument};
use crate::status::Status;
use serde::Serialize;

/// Per-phase counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseProgress {
    /// Phase id
    pub phase: PhaseId,
    /// Completed certifications
    pub completed: usize,
    /// Certifications in progress
    pub in_progress: usize,
    /// Mastered skills
    pub skills_mastered: usize,
    /// Total skills
    pub skills_total: usize,
}

/// Whole-roadmap progress
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressSummary {
    /// Certifications across all phases
    pub total_certs: usize,
    /// Completed certifications
    pub completed_certs: usize,
    /// Certifications in progress
    pub in_progress_certs: usize,
    /// Rounded share of completed certifications (0-100)
    pub completed_pct: u8,
    /// Rounded share of in-progress certifications (0-100)
    pub in_progress_pct: u8,
    /// Phase the user is working through
    pub current_phase: Option<PhaseId>,
    /// Next certification to finish in the current phase
    pub next_milestone: Option<String>,
    /// Breakdown per phase, in roadmap order
    pub phases: Vec<PhaseProgress>,
}

impl ProgressSummary {
    /// Summarise a document
    ///
    /// The current phase is the first one with a certification in progress,
    /// else the first one with any certification not completed, else the
    /// last phase.
    #[must_use]
    pub fn of(doc: &RoadmapDocument) -> Self {
        let certs: Vec<&Certification> = doc.phases().iter().flat_map(|p| &p.certs).collect();
        let total_certs = certs.len();
        let completed_certs = count_status(certs.iter().copied(), Status::Completed);
        let in_progress_certs = count_status(certs.iter().copied(), Status::InProgress);

        let current = current_phase(doc);
        let next_milestone = current.and_then(|p| {
            p.certs
                .iter()
                .find(|c| c.status() != Status::Completed)
                .map(|c| c.code.clone())
        });

        let phases = doc
            .phases()
            .iter()
            .map(|p| PhaseProgress {
                phase: p.id,
                completed: count_status(p.certs.iter(), Status::Completed),
                in_progress: count_status(p.certs.iter(), Status::InProgress),
                skills_mastered: p.skills.iter().filter(|s| s.mastered()).count(),
                skills_total: p.skills.len(),
            })
            .collect();

        Self {
            total_certs,
            completed_certs,
            in_progress_certs,
            completed_pct: percent(completed_certs, total_certs),
            in_progress_pct: percent(in_progress_certs, total_certs),
            current_phase: current.map(|p| p.id),
            next_milestone,
            phases,
        }
    }
}

fn count_status<'a>(certs: impl Iterator<Item = &'a Certification>, status: Status) -> usize {
    certs.filter(|c| c.status() == status).count()
}

fn current_phase(doc: &RoadmapDocument) -> Option<&Phase> {
    let phases = doc.phases();
    phases
        .iter()
        .find(|p| p.certs.iter().any(|c| c.status() == Status::InProgress))
        .or_else(|| {
            phases
                .iter()
                .find(|p| p.certs.iter().any(|c| c.status() != Status::Completed))
        })
        .or_else(|| phases.last())
}

#[allow(clippy::cast_possible_truncation)]
fn percent(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    // round half up, as a percentage
    ((part * 200 + total) / (total * 2)).min(100) as u8
}
