//! Roadmap document tree and its pure mutations
//!
//! The tree is `RoadmapDocument -> Phase -> {Certification, Skill, Project}`.
//! Every mutation takes `&self` and returns a new document. Only the targeted
//! leaf differs; every sibling is carried over unchanged.
//!
//! Lookup keys inside a phase:
//! - certifications by `code`
//! - skills by `name`
//! - projects by `title`

use crate::error::{ChildKind, DocumentError};
use crate::status::Status;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Phase identifier (1-based, equal to the phase position in a document)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct PhaseId(pub u32);

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PhaseId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Certification difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// Entry level
    Beginner,
    /// Associate level
    Intermediate,
    /// Specialist level
    Advanced,
    /// Architect level
    Expert,
}

/// Skill category tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillCategory {
    /// Solution and system design
    Architecture,
    /// Building and coding
    Development,
    /// Security, compliance, administration
    Governance,
    /// Business value and adoption
    Business,
}

impl SkillCategory {
    /// All categories in display order
    pub const ALL: [SkillCategory; 4] = [
        SkillCategory::Architecture,
        SkillCategory::Development,
        SkillCategory::Governance,
        SkillCategory::Business,
    ];

    /// Tag as written on the wire
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SkillCategory::Architecture => "Architecture",
            SkillCategory::Development => "Development",
            SkillCategory::Governance => "Governance",
            SkillCategory::Business => "Business",
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A certification milestone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    /// Exam or programme code, unique within its phase
    pub code: String,
    /// Display name
    pub name: String,
    /// Short description
    pub description: String,
    /// Official page
    pub link: String,
    /// Optional study guide page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub study_guide: Option<String>,
    /// Difficulty tier
    pub difficulty: Difficulty,
    status: Status,
}

impl Certification {
    /// Create a locked certification
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        link: impl Into<String>,
        difficulty: Difficulty,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            description: description.into(),
            link: link.into(),
            study_guide: None,
            difficulty,
            status: Status::Locked,
        }
    }

    /// With study guide link
    #[inline]
    #[must_use]
    pub fn with_study_guide(mut self, link: impl Into<String>) -> Self {
        self.study_guide = Some(link.into());
        self
    }

    /// With initial status (document construction only)
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Current status
    #[inline]
    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    fn rotated(&self) -> Self {
        Self {
            status: self.status.rotated(),
            ..self.clone()
        }
    }
}

/// A skill to master
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    /// Skill name, unique within its phase
    pub name: String,
    /// Category tag
    pub category: SkillCategory,
    mastered: bool,
}

impl Skill {
    /// Create an unmastered skill
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>, category: SkillCategory) -> Self {
        Self {
            name: name.into(),
            category,
            mastered: false,
        }
    }

    /// With initial mastery flag (document construction only)
    #[inline]
    #[must_use]
    pub fn with_mastered(mut self, mastered: bool) -> Self {
        self.mastered = mastered;
        self
    }

    /// Whether the skill is mastered
    #[inline]
    #[must_use]
    pub fn mastered(&self) -> bool {
        self.mastered
    }

    fn toggled(&self) -> Self {
        Self {
            mastered: !self.mastered,
            ..self.clone()
        }
    }
}

/// A hands-on project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Project title, unique within its phase
    pub title: String,
    /// What gets built
    pub description: String,
    /// Technologies used
    pub tech_stack: Vec<String>,
    /// Expected outputs
    pub deliverables: Vec<String>,
    status: Status,
}

impl Project {
    /// Create a locked project
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        tech_stack: Vec<String>,
        deliverables: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            tech_stack,
            deliverables,
            status: Status::Locked,
        }
    }

    /// With initial status (document construction only)
    #[inline]
    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Current status
    #[inline]
    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    fn rotated(&self) -> Self {
        Self {
            status: self.status.rotated(),
            ..self.clone()
        }
    }
}

/// A roadmap stage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    /// Position in the roadmap
    pub id: PhaseId,
    /// Phase title
    pub title: String,
    /// Planned duration, free text ("Months 1-3")
    pub duration: String,
    /// Description
    pub description: String,
    /// Certification path summary
    pub focus: String,
    /// Certifications, in roadmap order
    pub certs: Vec<Certification>,
    /// Skills, in roadmap order
    pub skills: Vec<Skill>,
    /// Projects, in roadmap order
    pub projects: Vec<Project>,
}

impl Phase {
    /// Certification by code
    #[must_use]
    pub fn certification(&self, code: &str) -> Option<&Certification> {
        self.certs.iter().find(|c| c.code == code)
    }

    /// Skill by name
    #[must_use]
    pub fn skill(&self, name: &str) -> Option<&Skill> {
        self.skills.iter().find(|s| s.name == name)
    }

    /// Project by title
    #[must_use]
    pub fn project(&self, title: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.title == title)
    }

    fn with_certification_rotated(&self, code: &str) -> Option<Self> {
        let idx = self.certs.iter().position(|c| c.code == code)?;
        let mut certs = self.certs.clone();
        certs[idx] = self.certs[idx].rotated();
        Some(Self {
            certs,
            ..self.clone()
        })
    }

    fn with_project_rotated(&self, title: &str) -> Option<Self> {
        let idx = self.projects.iter().position(|p| p.title == title)?;
        let mut projects = self.projects.clone();
        projects[idx] = self.projects[idx].rotated();
        Some(Self {
            projects,
            ..self.clone()
        })
    }

    fn with_skill_toggled(&self, name: &str) -> Option<Self> {
        let idx = self.skills.iter().position(|s| s.name == name)?;
        let mut skills = self.skills.clone();
        skills[idx] = self.skills[idx].toggled();
        Some(Self {
            skills,
            ..self.clone()
        })
    }

    fn validate(&self) -> Result<(), DocumentError> {
        unique_keys(self.id, ChildKind::Certification, self.certs.iter().map(|c| c.code.as_str()))?;
        unique_keys(self.id, ChildKind::Skill, self.skills.iter().map(|s| s.name.as_str()))?;
        unique_keys(self.id, ChildKind::Project, self.projects.iter().map(|p| p.title.as_str()))
    }
}

fn unique_keys<'a>(
    phase: PhaseId,
    kind: ChildKind,
    keys: impl Iterator<Item = &'a str>,
) -> Result<(), DocumentError> {
    let mut seen = HashSet::new();
    for key in keys {
        if !seen.insert(key) {
            return Err(DocumentError::duplicate(phase, kind, key));
        }
    }
    Ok(())
}

/// A single user toggle action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// Rotate a certification's status
    RotateCertification { phase: PhaseId, code: String },
    /// Rotate a project's status
    RotateProject { phase: PhaseId, title: String },
    /// Flip a skill's mastered flag
    ToggleSkill { phase: PhaseId, name: String },
}

impl Mutation {
    /// Phase targeted by this mutation
    #[inline]
    #[must_use]
    pub fn phase(&self) -> PhaseId {
        match self {
            Mutation::RotateCertification { phase, .. }
            | Mutation::RotateProject { phase, .. }
            | Mutation::ToggleSkill { phase, .. } => *phase,
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::RotateCertification { phase, code } => {
                write!(f, "rotate certification '{code}' in phase {phase}")
            }
            Mutation::RotateProject { phase, title } => {
                write!(f, "rotate project '{title}' in phase {phase}")
            }
            Mutation::ToggleSkill { phase, name } => {
                write!(f, "toggle skill '{name}' in phase {phase}")
            }
        }
    }
}

/// The ordered phase sequence: the unit of persistence
///
/// # Invariants
/// - Phase ids are exactly 1..N in order
/// - Lookup keys are unique within each phase
///
/// Both are checked on construction and on deserialization, and every
/// mutation preserves them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Phase>", into = "Vec<Phase>")]
pub struct RoadmapDocument {
    phases: Vec<Phase>,
}

impl RoadmapDocument {
    /// Build a document, validating phase numbering and key uniqueness
    ///
    /// # Errors
    /// - `DocumentError::PhaseSequence` if ids are not exactly 1..N in order
    /// - `DocumentError::DuplicateKey` if a phase repeats a lookup key
    pub fn new(phases: Vec<Phase>) -> Result<Self, DocumentError> {
        for (expected, phase) in (1..).map(PhaseId).zip(&phases) {
            if phase.id != expected {
                return Err(DocumentError::PhaseSequence {
                    expected,
                    found: phase.id,
                });
            }
        }
        for phase in &phases {
            phase.validate()?;
        }
        Ok(Self { phases })
    }

    /// Build from phases known to satisfy the invariants (seed data)
    pub(crate) fn from_trusted(phases: Vec<Phase>) -> Self {
        debug_assert!(Self::new(phases.clone()).is_ok(), "seed document violates invariants");
        Self { phases }
    }

    /// Phases in roadmap order
    #[inline]
    #[must_use]
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Number of phases
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// True when the document has no phases
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Phase by id
    #[must_use]
    pub fn phase(&self, id: PhaseId) -> Option<&Phase> {
        self.phases.iter().find(|p| p.id == id)
    }

    /// Certification by phase and code
    #[must_use]
    pub fn certification(&self, phase: PhaseId, code: &str) -> Option<&Certification> {
        self.phase(phase)?.certification(code)
    }

    /// Project by phase and title
    #[must_use]
    pub fn project(&self, phase: PhaseId, title: &str) -> Option<&Project> {
        self.phase(phase)?.project(title)
    }

    /// Skill by phase and name
    #[must_use]
    pub fn skill(&self, phase: PhaseId, name: &str) -> Option<&Skill> {
        self.phase(phase)?.skill(name)
    }

    /// Rotate one certification's status
    ///
    /// Returns the document unchanged when the phase or code is unknown.
    #[must_use]
    pub fn rotate_certification_status(&self, phase: PhaseId, code: &str) -> Self {
        self.replace_phase(phase, |p| p.with_certification_rotated(code))
    }

    /// Rotate one project's status
    ///
    /// Returns the document unchanged when the phase or title is unknown.
    #[must_use]
    pub fn rotate_project_status(&self, phase: PhaseId, title: &str) -> Self {
        self.replace_phase(phase, |p| p.with_project_rotated(title))
    }

    /// Flip one skill's mastered flag
    ///
    /// Returns the document unchanged when the phase or name is unknown.
    #[must_use]
    pub fn toggle_skill_mastery(&self, phase: PhaseId, name: &str) -> Self {
        self.replace_phase(phase, |p| p.with_skill_toggled(name))
    }

    /// Apply a [`Mutation`]
    #[must_use]
    pub fn apply(&self, mutation: &Mutation) -> Self {
        match mutation {
            Mutation::RotateCertification { phase, code } => {
                self.rotate_certification_status(*phase, code)
            }
            Mutation::RotateProject { phase, title } => self.rotate_project_status(*phase, title),
            Mutation::ToggleSkill { phase, name } => self.toggle_skill_mastery(*phase, name),
        }
    }

    /// Consume into the phase list
    #[inline]
    #[must_use]
    pub fn into_phases(self) -> Vec<Phase> {
        self.phases
    }

    fn replace_phase(&self, id: PhaseId, update: impl FnOnce(&Phase) -> Option<Phase>) -> Self {
        let Some(idx) = self.phases.iter().position(|p| p.id == id) else {
            return self.clone();
        };
        match update(&self.phases[idx]) {
            Some(phase) => {
                let mut phases = self.phases.clone();
                phases[idx] = phase;
                Self { phases }
            }
            None => self.clone(),
        }
    }
}

impl TryFrom<Vec<Phase>> for RoadmapDocument {
    type Error = DocumentError;

    fn try_from(phases: Vec<Phase>) -> Result<Self, Self::Error> {
        Self::new(phases)
    }
}

impl From<RoadmapDocument> for Vec<Phase> {
    fn from(doc: RoadmapDocument) -> Self {
        doc.phases
    }
}
