//! Case-insensitive search across the roadmap
//!
//! Hits carry their phase id so a caller can toggle the matched item directly.

use crate::roadmap::{Certification, PhaseId, Project, RoadmapDocument, Skill};

/// One matched item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchHit<'a> {
    /// Matched on name, code or description
    Certification {
        phase: PhaseId,
        cert: &'a Certification,
    },
    /// Matched on title, description or tech stack
    Project { phase: PhaseId, project: &'a Project },
    /// Matched on name or category
    Skill { phase: PhaseId, skill: &'a Skill },
}

/// Search results grouped by kind, each in roadmap order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResults<'a> {
    /// Certification hits
    pub certs: Vec<SearchHit<'a>>,
    /// Project hits
    pub projects: Vec<SearchHit<'a>>,
    /// Skill hits
    pub skills: Vec<SearchHit<'a>>,
}

impl SearchResults<'_> {
    /// Total number of hits
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.certs.len() + self.projects.len() + self.skills.len()
    }

    /// True when nothing matched
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Search a document
///
/// A blank query matches nothing.
#[must_use]
pub fn search<'a>(doc: &'a RoadmapDocument, query: &str) -> SearchResults<'a> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return SearchResults::default();
    }
    let hit = |text: &str| text.to_lowercase().contains(&needle);

    let mut results = SearchResults::default();
    for phase in doc.phases() {
        results.certs.extend(
            phase
                .certs
                .iter()
                .filter(|c| hit(&c.name) || hit(&c.code) || hit(&c.description))
                .map(|cert| SearchHit::Certification {
                    phase: phase.id,
                    cert,
                }),
        );
        results.projects.extend(
            phase
                .projects
                .iter()
                .filter(|p| {
                    hit(&p.title) || hit(&p.description) || p.tech_stack.iter().any(|t| hit(t))
                })
                .map(|project| SearchHit::Project {
                    phase: phase.id,
                    project,
                }),
        );
        results.skills.extend(
            phase
                .skills
                .iter()
                .filter(|s| hit(&s.name) || hit(s.category.as_str()))
                .map(|skill| SearchHit::Skill {
                    phase: phase.id,
                    skill,
                }),
        );
    }
    results
}
