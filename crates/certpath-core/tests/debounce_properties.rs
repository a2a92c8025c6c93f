//! Debounce properties of the pure scheduler

use certpath_core::{AutosaveScheduler, SaveOutcome, SyncStatus};
use certpath_model::{seed, Mutation, PhaseId, RoadmapDocument};
use proptest::prelude::*;
use std::time::Duration;
use tokio::time::Instant;

const WINDOW_MS: u64 = 2_000;

fn edit(i: usize) -> Mutation {
    let skills = [
        "Azure AI Concepts",
        "Copilot Studio Basics",
        "Power Platform Core",
        "Responsible AI",
    ];
    Mutation::ToggleSkill {
        phase: PhaseId(1),
        name: skills[i % skills.len()].to_string(),
    }
}

proptest! {
    #[test]
    fn prop_burst_inside_window_writes_once(gaps in prop::collection::vec(0..WINDOW_MS, 1..20)) {
        let t0 = Instant::now();
        let mut scheduler = AutosaveScheduler::new(Duration::from_millis(WINDOW_MS));
        let mut doc: RoadmapDocument = seed::default_roadmap().clone();
        let mut now = t0;
        let mut jobs = Vec::new();

        for (i, gap) in gaps.iter().enumerate() {
            now += Duration::from_millis(*gap);
            // Nothing fires while edits keep arriving inside the window
            if let Some(job) = scheduler.poll_due(now) {
                jobs.push(job);
            }
            doc = doc.apply(&edit(i));
            scheduler.schedule(doc.clone(), now);
        }
        let end = now + Duration::from_millis(WINDOW_MS);
        if let Some(job) = scheduler.poll_due(end) {
            jobs.push(job);
        }

        prop_assert_eq!(jobs.len(), 1);
        prop_assert_eq!(&jobs[0].document, &doc);
        prop_assert_eq!(
            scheduler.complete(jobs[0].generation, SaveOutcome::Local),
            SyncStatus::Local
        );
        prop_assert!(scheduler.poll_due(end + Duration::from_secs(3_600)).is_none());
    }

    #[test]
    fn prop_spaced_edits_write_each(count in 1usize..10) {
        let t0 = Instant::now();
        let window = Duration::from_millis(WINDOW_MS);
        let mut scheduler = AutosaveScheduler::new(window);
        let mut doc = seed::default_roadmap().clone();
        let mut written = Vec::new();

        for i in 0..count {
            let at = t0 + window * (2 * i as u32);
            doc = doc.apply(&edit(i));
            scheduler.schedule(doc.clone(), at);
            let job = scheduler.poll_due(at + window).unwrap();
            scheduler.complete(job.generation, SaveOutcome::Remote);
            written.push(job.document);
        }

        prop_assert_eq!(written.len(), count);
        prop_assert_eq!(written.last(), Some(&doc));
        prop_assert_eq!(scheduler.stats().coalesced, 0);
    }
}
