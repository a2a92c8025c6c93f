//! Built-in documents
//!
//! - [`default_roadmap`]: the document every fresh session starts from
//! - [`demo_roadmap`]: the fixed document paired with [`Identity::demo`](crate::Identity::demo)

use crate::roadmap::{
    Certification, Difficulty, Phase, PhaseId, Project, RoadmapDocument, Skill, SkillCategory,
};
use crate::status::Status;
use once_cell::sync::Lazy;

static DEFAULT_ROADMAP: Lazy<RoadmapDocument> =
    Lazy::new(|| RoadmapDocument::from_trusted(build_default()));

static DEMO_ROADMAP: Lazy<RoadmapDocument> = Lazy::new(build_demo);

/// The seed roadmap: four phases, everything locked except AI-900
#[inline]
#[must_use]
pub fn default_roadmap() -> &'static RoadmapDocument {
    &DEFAULT_ROADMAP
}

/// The demo roadmap: phase 1 complete, phase 2 underway, phases 3-4 untouched
#[inline]
#[must_use]
pub fn demo_roadmap() -> &'static RoadmapDocument {
    &DEMO_ROADMAP
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

#[allow(clippy::too_many_lines)]
fn build_default() -> Vec<Phase> {
    vec![
        Phase {
            id: PhaseId(1),
            title: "Phase 1: The Recruit (Foundations)".into(),
            duration: "Months 1-3".into(),
            description: "Build the essential knowledge base. Start with AI concepts, get hands-on with Copilot Studio, and ground it in Power Platform fundamentals.".into(),
            focus: "AI-900 -> Copilot Academy -> PL-900".into(),
            certs: vec![
                Certification::new(
                    "AI-900",
                    "Azure AI Fundamentals",
                    "Entry-level. Provides a solid understanding of ML and AI concepts in the context of Azure.",
                    "https://learn.microsoft.com/en-us/credentials/certifications/azure-ai-fundamentals/",
                    Difficulty::Beginner,
                )
                .with_status(Status::InProgress),
                Certification::new(
                    "Copilot Academy",
                    "Copilot Studio Academy",
                    "Hands-on recruit training. Put together by April Dunnam. Best practical start for Copilots.",
                    "https://aka.ms/CopilotStudioAcademy",
                    Difficulty::Beginner,
                ),
                Certification::new(
                    "PL-900",
                    "Power Platform Fundamentals",
                    "Provides a solid understanding of the Power Platform, where many low-code agents live.",
                    "https://learn.microsoft.com/en-us/credentials/certifications/power-platform-fundamentals/",
                    Difficulty::Beginner,
                ),
            ],
            skills: vec![
                Skill::new("Azure AI Concepts", SkillCategory::Architecture),
                Skill::new("Copilot Studio Basics", SkillCategory::Development),
                Skill::new("Power Platform Core", SkillCategory::Business),
                Skill::new("Responsible AI", SkillCategory::Governance),
            ],
            projects: vec![Project::new(
                "Project Alpha: The Knowledge Base",
                "Create a simple Q&A bot using Azure OpenAI Playground on your own data.",
                strings(&["Azure OpenAI Studio", "System Prompts"]),
                strings(&["Deployed Model endpoint", "System Prompt documentation"]),
            )],
        },
        Phase {
            id: PhaseId(2),
            title: "Phase 2: The Admin & Consultant".into(),
            duration: "Months 4-6".into(),
            description: "Deepen your skills with PL-200 and then master the governance of the ecosystem with AB-900. This is the gateway to advanced roles.".into(),
            focus: "PL-200 -> AB-900".into(),
            certs: vec![
                Certification::new(
                    "PL-200",
                    "Power Platform Consultant",
                    "Analyze business requirements and select the right tools. A critical pre-req step before Admin.",
                    "https://learn.microsoft.com/en-us/credentials/certifications/power-platform-consultant/",
                    Difficulty::Intermediate,
                ),
                Certification::new(
                    "AB-900",
                    "Copilot & Agent Admin",
                    "Configure, secure, and govern AI-enabled M365 environments. The central hub of the roadmap.",
                    "https://learn.microsoft.com/en-us/credentials/certifications/exams/ab-900/",
                    Difficulty::Intermediate,
                )
                .with_study_guide("https://learn.microsoft.com/en-us/credentials/certifications/resources/study-guides/ab-900"),
            ],
            skills: vec![
                Skill::new("Dataverse Modeling", SkillCategory::Architecture),
                Skill::new("Agent Governance", SkillCategory::Governance),
                Skill::new("M365 Copilot Admin", SkillCategory::Governance),
                Skill::new("Solution Architecture", SkillCategory::Architecture),
            ],
            projects: vec![Project::new(
                "Project Beta: The HR Assistant",
                "Build a Copilot Studio agent that handles time-off requests and policy queries via SharePoint.",
                strings(&["Copilot Studio", "SharePoint", "Power Automate"]),
                strings(&["Architecture Diagram", "Working Bot Demo Video"]),
            )],
        },
        Phase {
            id: PhaseId(3),
            title: "Phase 3: The Specialist (Split Path)".into(),
            duration: "Months 7-9".into(),
            description: "The path splits here. Choose your specialization: Advanced Engineering (AI-102) or Business Professional (AB-730). You should aim for both.".into(),
            focus: "AB-900 -> AI-102 & AB-900 -> AB-730".into(),
            certs: vec![
                Certification::new(
                    "AB-730",
                    "AI Business Professional",
                    "Effectively use Gen AI within M365 to boost productivity and drive business outcomes.",
                    "https://learn.microsoft.com/en-us/credentials/certifications/exams/ab-730/",
                    Difficulty::Advanced,
                )
                .with_study_guide("https://learn.microsoft.com/en-us/credentials/certifications/resources/study-guides/ab-730"),
                Certification::new(
                    "AI-102",
                    "Azure AI Engineer Associate",
                    "Learn to build, manage, and deploy AI solutions leveraging Azure AI. Code-heavy.",
                    "https://learn.microsoft.com/en-us/credentials/certifications/azure-ai-engineer/",
                    Difficulty::Advanced,
                ),
            ],
            skills: vec![
                Skill::new("Business Value Analysis", SkillCategory::Business),
                Skill::new("Prompt Engineering (Adv)", SkillCategory::Development),
                Skill::new("Vector Search & RAG", SkillCategory::Development),
                Skill::new("Custom Copilot Dev", SkillCategory::Development),
            ],
            projects: vec![Project::new(
                "Project Gamma: Intelligent Search",
                "Implement a 'Chat with your Data' solution using Azure AI Search (Vector) and Python.",
                strings(&["Azure AI Search", "Python SDK", "Azure Functions"]),
                strings(&["GitHub Repo", "Performance Analysis Report"]),
            )],
        },
        Phase {
            id: PhaseId(4),
            title: "Phase 4: The Architect & Leader".into(),
            duration: "Months 10-12".into(),
            description: "The summit. Become the Transformation Leader (AB-731) and the ultimate Agentic AI Solutions Architect (AB-100).".into(),
            focus: "AB-731 & AB-100".into(),
            certs: vec![
                Certification::new(
                    "AB-731",
                    "AI Transformation Leader",
                    "Recognize AI transformation opportunities, select tools, and lead responsible AI adoption.",
                    "https://learn.microsoft.com/en-us/credentials/certifications/exams/ab-731/",
                    Difficulty::Expert,
                )
                .with_study_guide("https://learn.microsoft.com/en-us/credentials/certifications/resources/study-guides/ab-731"),
                Certification::new(
                    "AB-100",
                    "Agentic AI Architect",
                    "Architect enterprise AI solutions using Microsoft technologies. The final boss.",
                    "#",
                    Difficulty::Expert,
                ),
            ],
            skills: vec![
                Skill::new("Multi-Agent Orchestration", SkillCategory::Architecture),
                Skill::new("Enterprise AI Strategy", SkillCategory::Business),
                Skill::new("Change Management", SkillCategory::Business),
                Skill::new("Full Stack Agent Design", SkillCategory::Architecture),
            ],
            projects: vec![Project::new(
                "Flagship: The Enterprise Orchestrator",
                "A multi-agent system where a 'Manager' agent delegates tasks to 'Worker' agents (Research, Coding, Email) to solve complex workflows.",
                strings(&["Azure AI Agent Service", "Semantic Kernel / AutoGen", "M365 Graph API"]),
                strings(&["Full Architecture Deck", "Live Demo", "Cost Analysis Model"]),
            )],
        },
    ]
}

fn build_demo() -> RoadmapDocument {
    let mut phases = build_default();

    if let Some(first) = phases.get_mut(0) {
        first.certs = first
            .certs
            .drain(..)
            .map(|c| c.with_status(Status::Completed))
            .collect();
        first.skills = first.skills.drain(..).map(|s| s.with_mastered(true)).collect();
        first.projects = first
            .projects
            .drain(..)
            .map(|p| p.with_status(Status::Completed))
            .collect();
    }

    if let Some(second) = phases.get_mut(1) {
        let statuses = [Status::Completed, Status::InProgress];
        second.certs = second
            .certs
            .drain(..)
            .zip(statuses)
            .map(|(c, s)| c.with_status(s))
            .collect();
        second.skills = second
            .skills
            .drain(..)
            .enumerate()
            .map(|(i, s)| s.with_mastered(i < 2))
            .collect();
        second.projects = second
            .projects
            .drain(..)
            .map(|p| p.with_status(Status::InProgress))
            .collect();
    }

    RoadmapDocument::from_trusted(phases)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_is_valid() {
        let doc = default_roadmap();
        assert_eq!(doc.len(), 4);
        assert!(RoadmapDocument::new(doc.phases().to_vec()).is_ok());
        assert_eq!(
            doc.certification(PhaseId(1), "AI-900").unwrap().status(),
            Status::InProgress
        );
    }

    #[test]
    fn demo_progress_shape() {
        let demo = demo_roadmap();
        let p1 = &demo.phases()[0];
        assert!(p1.certs.iter().all(|c| c.status() == Status::Completed));
        assert!(p1.skills.iter().all(Skill::mastered));

        let p2 = &demo.phases()[1];
        assert_eq!(p2.certs[0].status(), Status::Completed);
        assert_eq!(p2.certs[1].status(), Status::InProgress);
        assert!(p2.skills[0].mastered() && p2.skills[1].mastered());
        assert!(!p2.skills[2].mastered());
        assert_eq!(p2.projects[0].status(), Status::InProgress);

        assert_eq!(demo.phases()[2..], default_roadmap().phases()[2..]);
    }
}
