//! Plain-text views

use certpath_core::{ChatMessage, SyncStats, SyncStatus};
use certpath_model::schedule::{weekly_hours, WEEKLY_SCHEDULE};
use certpath_model::{
    ProgressSummary, RoadmapDocument, SearchHit, SearchResults, SessionState, Status,
};
use std::fmt::Write;

fn mark(status: Status) -> &'static str {
    match status {
        Status::Locked => "[ ]",
        Status::InProgress => "[~]",
        Status::Completed => "[x]",
    }
}

/// The whole roadmap
pub(crate) fn roadmap(doc: &RoadmapDocument) -> String {
    let mut out = String::new();
    for phase in doc.phases() {
        let _ = writeln!(out, "Phase {}: {} ({})", phase.id, phase.title, phase.duration);
        let _ = writeln!(out, "  Focus: {}", phase.focus);
        for cert in &phase.certs {
            let _ = writeln!(out, "  {} {:<8} {}", mark(cert.status()), cert.code, cert.name);
        }
        for project in &phase.projects {
            let _ = writeln!(out, "  {} project: {}", mark(project.status()), project.title);
        }
        for skill in &phase.skills {
            let check = if skill.mastered() { "*" } else { "-" };
            let _ = writeln!(out, "    {check} {} ({})", skill.name, skill.category.as_str());
        }
    }
    out
}

/// Progress summary
pub(crate) fn progress(summary: &ProgressSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Certifications: {}/{} completed ({}%), {} in progress ({}%)",
        summary.completed_certs,
        summary.total_certs,
        summary.completed_pct,
        summary.in_progress_certs,
        summary.in_progress_pct
    );
    if let Some(phase) = summary.current_phase {
        let _ = writeln!(out, "Current phase: {phase}");
    }
    match &summary.next_milestone {
        Some(code) => {
            let _ = writeln!(out, "Next milestone: {code}");
        }
        None => {
            let _ = writeln!(out, "Next milestone: phase complete");
        }
    }
    for p in &summary.phases {
        let _ = writeln!(
            out,
            "  Phase {}: {} done, {} in progress, skills {}/{}",
            p.phase, p.completed, p.in_progress, p.skills_mastered, p.skills_total
        );
    }
    out
}

/// Search hits grouped by kind
pub(crate) fn search(results: &SearchResults<'_>) -> String {
    if results.is_empty() {
        return "No matches\n".to_string();
    }
    let mut out = String::new();
    for hit in results.certs.iter().chain(&results.projects).chain(&results.skills) {
        let _ = match hit {
            SearchHit::Certification { phase, cert } => {
                writeln!(out, "  cert    {phase} {} {}", cert.code, cert.name)
            }
            SearchHit::Project { phase, project } => {
                writeln!(out, "  project {phase} {}", project.title)
            }
            SearchHit::Skill { phase, skill } => writeln!(out, "  skill   {phase} {}", skill.name),
        };
    }
    out
}

/// Sync indicator and session line
pub(crate) fn status(session: &SessionState, status: SyncStatus, stats: &SyncStats) -> String {
    let who = match session {
        SessionState::Anonymous => "anonymous".to_string(),
        SessionState::Demo => "demo".to_string(),
        SessionState::Authenticated(identity) => format!("{} <{}>", identity.name, identity.email),
    };
    format!(
        "session: {who}\nsync: {status}\nsaves: {} remote, {} local, {} suppressed, {} failed, {} local failures\n",
        stats.remote_saves, stats.local_saves, stats.suppressed, stats.failures, stats.local_failures
    )
}

/// Mentor reply with its citations
pub(crate) fn chat(reply: &ChatMessage) -> String {
    let mut out = format!("{}\n", reply.text.trim_end());
    for source in &reply.sources {
        let _ = writeln!(out, "  - {} <{}>", source.title, source.uri);
    }
    out
}

/// Weekly plan
pub(crate) fn schedule() -> String {
    let mut out = String::new();
    for task in &WEEKLY_SCHEDULE {
        let _ = writeln!(
            out,
            "{:<10} {:<40} {:?} {}h",
            task.day, task.activity, task.kind, task.hours
        );
    }
    let _ = writeln!(out, "Total: {}h per week", weekly_hours());
    out
}
