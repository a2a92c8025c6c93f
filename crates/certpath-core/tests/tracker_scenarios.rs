//! End-to-end tracker scenarios on paused tokio time

use certpath_core::{spawn_autosave, SyncStatus, TrackerError};
use certpath_model::{codec, seed, Mutation, PhaseId, RoadmapDocument, SessionState, Status};
use certpath_test_utils::{
    edited_roadmap, kim, local_harness, remote_harness, sam, MemoryLocalStore, MemoryRemoteStore,
    ScriptedIdentityProvider, TEST_WINDOW,
};
use pretty_assertions::assert_eq;
use std::sync::atomic::Ordering;
use std::time::Duration;

const SAM_PROGRESS: &str = "agentic_roadmap_progress_sam@example.com.json";
const SAM_LOGIN: &str = "user_tracker_sam@example.com.json";
const KIM_PROGRESS: &str = "agentic_roadmap_progress_kim@example.com.json";

fn rotate(code: &str) -> Mutation {
    Mutation::RotateCertification {
        phase: PhaseId(1),
        code: code.into(),
    }
}

fn progress_writes(remote: &MemoryRemoteStore) -> Vec<RoadmapDocument> {
    remote
        .history()
        .into_iter()
        .filter(|(name, _)| name == SAM_PROGRESS)
        .map(|(_, bytes)| codec::decode(&bytes).unwrap())
        .collect()
}

async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

async fn past_window() {
    tokio::time::sleep(TEST_WINDOW + Duration::from_millis(10)).await;
}

#[tokio::test(start_paused = true)]
async fn local_skill_toggle_settles_local() {
    let h = local_harness(MemoryLocalStore::new(), ScriptedIdentityProvider::new());
    let autosave = spawn_autosave(h.tracker.clone());
    assert_eq!(h.tracker.sync_status(), SyncStatus::Idle);

    assert!(h.tracker.apply(&Mutation::ToggleSkill {
        phase: PhaseId(1),
        name: "Responsible AI".into(),
    }));
    assert_eq!(h.tracker.sync_status(), SyncStatus::Pending);

    past_window().await;
    assert_eq!(h.tracker.sync_status(), SyncStatus::Local);
    let stored = h.local.document().unwrap();
    assert!(stored.skill(PhaseId(1), "Responsible AI").unwrap().mastered());
    autosave.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn burst_of_edits_makes_one_remote_write() {
    let h = remote_harness(
        MemoryLocalStore::new(),
        MemoryRemoteStore::new(),
        ScriptedIdentityProvider::new().then_identity(sam()),
    );
    h.tracker.sign_in().await.unwrap();
    let autosave = spawn_autosave(h.tracker.clone());

    let edits = [
        rotate("PL-900"),
        rotate("PL-900"),
        rotate("AI-900"),
        Mutation::ToggleSkill {
            phase: PhaseId(1),
            name: "Azure AI Concepts".into(),
        },
        rotate("PL-900"),
    ];
    for edit in &edits {
        h.tracker.apply(edit);
        tokio::time::sleep(Duration::from_millis(300)).await;
    }
    past_window().await;

    let writes = progress_writes(h.remote());
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0], h.tracker.document());
    assert_eq!(
        writes[0].certification(PhaseId(1), "PL-900").unwrap().status(),
        Status::Locked
    );
    assert_eq!(h.tracker.sync_status(), SyncStatus::Saved);
    assert_eq!(h.tracker.snapshot().stats.coalesced, 4);
    // one progress write plus the login record
    assert_eq!(h.remote().calls.writes(), 2);
    autosave.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn sign_in_without_remote_document_is_idle() {
    let h = remote_harness(
        MemoryLocalStore::new(),
        MemoryRemoteStore::new(),
        ScriptedIdentityProvider::new().then_identity(sam()),
    );
    let before = h.tracker.document();

    let identity = h.tracker.sign_in().await.unwrap();
    assert_eq!(identity, sam());
    assert_eq!(h.tracker.sync_status(), SyncStatus::Idle);
    assert_eq!(h.tracker.document(), before);
    assert_eq!(h.tracker.session(), SessionState::Authenticated(sam()));

    settle().await;
    let record: serde_json::Value =
        serde_json::from_slice(&h.remote().get(SAM_LOGIN).unwrap()).unwrap();
    assert_eq!(record["email"], "sam@example.com");
    assert_eq!(record["app"], "Agentic AI Architect Roadmap");
    assert!(record["lastLogin"].is_string());
    assert_eq!(h.remote().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn sign_in_loads_stored_document() {
    let remote = MemoryRemoteStore::new();
    remote.insert(SAM_PROGRESS, codec::encode(&edited_roadmap()).unwrap());
    let h = remote_harness(
        MemoryLocalStore::new(),
        remote,
        ScriptedIdentityProvider::new().then_identity(sam()),
    );

    h.tracker.sign_in().await.unwrap();
    assert_eq!(h.tracker.document(), edited_roadmap());
    assert_eq!(h.tracker.sync_status(), SyncStatus::Saved);
}

#[tokio::test(start_paused = true)]
async fn anonymous_edit_never_overwrites_stored_document() {
    let remote = MemoryRemoteStore::new();
    remote.insert(SAM_PROGRESS, codec::encode(&edited_roadmap()).unwrap());
    remote.set_read_latency(Duration::from_millis(500));
    let h = remote_harness(
        MemoryLocalStore::new(),
        remote,
        ScriptedIdentityProvider::new().then_identity(sam()),
    );
    let autosave = spawn_autosave(h.tracker.clone());

    assert!(h.tracker.apply(&Mutation::ToggleSkill {
        phase: PhaseId(2),
        name: "Agent Governance".into(),
    }));
    // The anonymous timer comes due while the remote load is still reading
    tokio::time::sleep(TEST_WINDOW - Duration::from_millis(100)).await;
    h.tracker.sign_in().await.unwrap();
    tokio::time::sleep(Duration::from_secs(10)).await;

    assert_eq!(h.remote().document(SAM_PROGRESS), Some(edited_roadmap()));
    assert!(progress_writes(h.remote()).is_empty());
    assert_eq!(h.tracker.document(), edited_roadmap());
    assert_eq!(h.tracker.sync_status(), SyncStatus::Saved);
    assert_eq!(h.local.sets.load(Ordering::SeqCst), 0);
    autosave.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn anonymous_edit_is_kept_for_a_new_user() {
    let h = remote_harness(
        MemoryLocalStore::new(),
        MemoryRemoteStore::new(),
        ScriptedIdentityProvider::new().then_identity(sam()),
    );
    let autosave = spawn_autosave(h.tracker.clone());

    h.tracker.apply(&rotate("PL-900"));
    h.tracker.sign_in().await.unwrap();
    assert_eq!(h.tracker.sync_status(), SyncStatus::Pending);
    past_window().await;

    assert_eq!(progress_writes(h.remote()), vec![edited_roadmap()]);
    assert_eq!(h.tracker.sync_status(), SyncStatus::Saved);
    autosave.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn failed_load_drops_anonymous_edit() {
    let remote = MemoryRemoteStore::new();
    remote.insert(SAM_PROGRESS, codec::encode(&edited_roadmap()).unwrap());
    remote.set_fail_reads(true);
    let h = remote_harness(
        MemoryLocalStore::new(),
        remote,
        ScriptedIdentityProvider::new().then_identity(sam()),
    );
    let autosave = spawn_autosave(h.tracker.clone());

    h.tracker.apply(&rotate("AI-900"));
    h.tracker.sign_in().await.unwrap();
    past_window().await;

    assert_eq!(h.tracker.sync_status(), SyncStatus::Error);
    assert_eq!(h.remote().document(SAM_PROGRESS), Some(edited_roadmap()));
    autosave.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn failing_login_record_is_swallowed() {
    let remote = MemoryRemoteStore::new();
    remote.insert(SAM_PROGRESS, codec::encode(&edited_roadmap()).unwrap());
    remote.fail_writes_with_prefix("user_tracker_");
    let h = remote_harness(
        MemoryLocalStore::new(),
        remote,
        ScriptedIdentityProvider::new().then_identity(sam()),
    );

    let identity = h.tracker.sign_in().await.unwrap();
    assert_eq!(identity, sam());
    settle().await;

    assert!(h.remote().get(SAM_LOGIN).is_none());
    assert!(h.remote().calls.create.load(Ordering::SeqCst) >= 1);
    assert_eq!(h.tracker.sync_status(), SyncStatus::Saved);
    assert_eq!(h.tracker.document(), edited_roadmap());
    assert_eq!(h.tracker.session(), SessionState::Authenticated(sam()));

    // Saves keep working afterwards
    h.tracker.apply(&rotate("AI-900"));
    assert_eq!(h.tracker.flush().await, SyncStatus::Saved);
    assert_eq!(h.remote().document(SAM_PROGRESS), Some(h.tracker.document()));
}

#[tokio::test(start_paused = true)]
async fn each_user_loads_only_their_own_document() {
    let remote = MemoryRemoteStore::new();
    remote.insert(SAM_PROGRESS, codec::encode(&edited_roadmap()).unwrap());
    let h = remote_harness(
        MemoryLocalStore::new(),
        remote,
        ScriptedIdentityProvider::new().then_identity(kim()),
    );

    h.tracker.sign_in().await.unwrap();
    assert_eq!(h.tracker.sync_status(), SyncStatus::Idle);
    assert_eq!(&h.tracker.document(), seed::default_roadmap());

    h.tracker.apply(&rotate("PL-900"));
    h.tracker.flush().await;
    assert_eq!(h.remote().document(KIM_PROGRESS), Some(edited_roadmap()));
    assert!(progress_writes(h.remote()).is_empty());
}

#[tokio::test(start_paused = true)]
async fn sign_in_load_failure_keeps_document() {
    let remote = MemoryRemoteStore::new();
    remote.set_fail_reads(true);
    let h = remote_harness(
        MemoryLocalStore::new(),
        remote,
        ScriptedIdentityProvider::new().then_identity(sam()),
    );

    h.tracker.sign_in().await.unwrap();
    assert_eq!(h.tracker.sync_status(), SyncStatus::Error);
    assert_eq!(&h.tracker.document(), seed::default_roadmap());
    assert!(matches!(h.tracker.session(), SessionState::Authenticated(_)));
}

#[tokio::test(start_paused = true)]
async fn rejected_sign_in_sets_error() {
    let h = remote_harness(
        MemoryLocalStore::new(),
        MemoryRemoteStore::new(),
        ScriptedIdentityProvider::new().then_failure("popup closed"),
    );
    let err = h.tracker.sign_in().await.unwrap_err();
    assert!(matches!(err, TrackerError::SignInFailed(ref m) if m == "popup closed"));
    assert_eq!(h.tracker.sync_status(), SyncStatus::Error);
    assert_eq!(h.tracker.session(), SessionState::Anonymous);
    assert_eq!(h.remote().calls.total(), 0);
    assert!(h.remote().is_empty());
}

#[tokio::test(start_paused = true)]
async fn sign_in_without_remote_is_unavailable() {
    let h = local_harness(
        MemoryLocalStore::new(),
        ScriptedIdentityProvider::new().then_identity(sam()),
    );
    assert!(matches!(
        h.tracker.sign_in().await,
        Err(TrackerError::RemoteUnavailable)
    ));
    assert_eq!(h.tracker.session(), SessionState::Anonymous);
}

#[tokio::test(start_paused = true)]
async fn second_sign_in_is_illegal() {
    let h = remote_harness(
        MemoryLocalStore::new(),
        MemoryRemoteStore::new(),
        ScriptedIdentityProvider::new()
            .then_identity(sam())
            .then_identity(sam()),
    );
    h.tracker.sign_in().await.unwrap();
    assert!(matches!(
        h.tracker.sign_in().await,
        Err(TrackerError::Session(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn demo_never_reaches_a_backend() {
    let h = remote_harness(
        MemoryLocalStore::new(),
        MemoryRemoteStore::new(),
        ScriptedIdentityProvider::new().then_identity(sam()),
    );
    h.tracker.sign_in().await.unwrap();
    settle().await;
    let autosave = spawn_autosave(h.tracker.clone());
    let remote_calls = h.remote().calls.total();
    let local_calls = h.local.calls();

    h.tracker.enter_demo().unwrap();
    assert_eq!(&h.tracker.document(), seed::demo_roadmap());
    assert_eq!(h.tracker.sync_status(), SyncStatus::Saved);
    for _ in 0..10 {
        h.tracker.apply(&rotate("AI-900"));
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    past_window().await;
    h.tracker.apply(&rotate("PL-900"));
    h.tracker.flush().await;

    assert_eq!(h.remote().calls.total(), remote_calls);
    assert_eq!(h.local.calls(), local_calls);
    assert_eq!(h.tracker.sync_status(), SyncStatus::Saved);
    assert_eq!(h.tracker.snapshot().stats.suppressed, 2);
    autosave.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn local_only_demo_is_also_suppressed() {
    let h = local_harness(MemoryLocalStore::new(), ScriptedIdentityProvider::new());
    let local_calls = h.local.calls();
    h.tracker.enter_demo().unwrap();
    h.tracker.apply(&rotate("AI-900"));
    assert_eq!(h.tracker.flush().await, SyncStatus::Saved);
    assert_eq!(h.local.calls(), local_calls);
}

#[tokio::test(start_paused = true)]
async fn exit_demo_restores_local_slot() {
    let h = local_harness(
        MemoryLocalStore::with_document(&edited_roadmap()),
        ScriptedIdentityProvider::new(),
    );
    assert_eq!(h.tracker.document(), edited_roadmap());
    assert_eq!(h.tracker.sync_status(), SyncStatus::Local);

    h.tracker.enter_demo().unwrap();
    assert!(h.tracker.enter_demo().is_err());
    h.tracker.exit_demo().unwrap();
    assert_eq!(h.tracker.document(), edited_roadmap());
    assert_eq!(h.tracker.sync_status(), SyncStatus::Local);
    assert_eq!(h.tracker.session(), SessionState::Anonymous);
}

#[tokio::test(start_paused = true)]
async fn exit_demo_without_slot_resets_to_seed() {
    let h = local_harness(MemoryLocalStore::new(), ScriptedIdentityProvider::new());
    h.tracker.enter_demo().unwrap();
    h.tracker.exit_demo().unwrap();
    assert_eq!(&h.tracker.document(), seed::default_roadmap());
}

#[tokio::test(start_paused = true)]
async fn remote_failure_then_next_edit_recovers() {
    let h = remote_harness(
        MemoryLocalStore::new(),
        MemoryRemoteStore::new(),
        ScriptedIdentityProvider::new().then_identity(sam()),
    );
    h.tracker.sign_in().await.unwrap();
    let autosave = spawn_autosave(h.tracker.clone());

    h.remote().set_fail_writes(true);
    h.tracker.apply(&rotate("PL-900"));
    past_window().await;
    assert_eq!(h.tracker.sync_status(), SyncStatus::Error);
    assert!(progress_writes(h.remote()).is_empty());

    h.remote().set_fail_writes(false);
    h.tracker.apply(&rotate("PL-900"));
    past_window().await;
    assert_eq!(h.tracker.sync_status(), SyncStatus::Saved);
    assert_eq!(progress_writes(h.remote()), vec![h.tracker.document()]);
    autosave.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn writes_land_in_edit_order() {
    let remote = MemoryRemoteStore::new();
    remote.set_latency(Duration::from_secs(5));
    let h = remote_harness(
        MemoryLocalStore::new(),
        remote,
        ScriptedIdentityProvider::new().then_identity(sam()),
    );
    h.tracker.sign_in().await.unwrap();
    let autosave = spawn_autosave(h.tracker.clone());

    h.tracker.apply(&rotate("PL-900"));
    let first = h.tracker.document();
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(h.tracker.sync_status(), SyncStatus::Syncing);

    h.tracker.apply(&rotate("PL-900"));
    let second = h.tracker.document();
    assert_eq!(h.tracker.sync_status(), SyncStatus::Pending);

    tokio::time::sleep(Duration::from_secs(20)).await;
    assert_eq!(progress_writes(h.remote()), vec![first, second]);
    assert_eq!(h.tracker.sync_status(), SyncStatus::Saved);
    autosave.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn shutdown_drops_pending_edit() {
    let h = local_harness(MemoryLocalStore::new(), ScriptedIdentityProvider::new());
    let autosave = spawn_autosave(h.tracker.clone());
    h.tracker.apply(&rotate("PL-900"));
    autosave.shutdown().await;
    tokio::time::sleep(TEST_WINDOW * 5).await;
    assert_eq!(h.local.sets.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn flush_writes_without_waiting() {
    let h = local_harness(MemoryLocalStore::new(), ScriptedIdentityProvider::new());
    h.tracker.apply(&rotate("PL-900"));
    assert_eq!(h.tracker.flush().await, SyncStatus::Local);
    assert_eq!(h.local.document(), Some(h.tracker.document()));
    assert!(h.tracker.next_deadline().is_none());
}

#[tokio::test(start_paused = true)]
async fn local_failure_still_reports_local() {
    let h = local_harness(MemoryLocalStore::new(), ScriptedIdentityProvider::new());
    h.local.set_fail(true);
    h.tracker.apply(&rotate("PL-900"));
    assert_eq!(h.tracker.flush().await, SyncStatus::Local);
    assert_eq!(h.tracker.snapshot().stats.local_failures, 1);
}

#[tokio::test(start_paused = true)]
async fn three_clicks_observed_in_order() {
    let h = local_harness(MemoryLocalStore::new(), ScriptedIdentityProvider::new());
    let status = |doc: RoadmapDocument| doc.certification(PhaseId(1), "PL-900").unwrap().status();
    let mut seen = vec![status(h.tracker.document())];
    for _ in 0..3 {
        h.tracker.apply(&rotate("PL-900"));
        seen.push(status(h.tracker.document()));
    }
    assert_eq!(
        seen,
        vec![Status::Locked, Status::InProgress, Status::Completed, Status::Locked]
    );
}

#[tokio::test(start_paused = true)]
async fn unknown_target_schedules_nothing() {
    let h = local_harness(MemoryLocalStore::new(), ScriptedIdentityProvider::new());
    assert!(!h.tracker.apply(&rotate("NOPE-000")));
    assert_eq!(h.tracker.sync_status(), SyncStatus::Idle);
    assert!(h.tracker.next_deadline().is_none());
}

#[tokio::test(start_paused = true)]
async fn sign_out_keeps_remote_document() {
    let h = remote_harness(
        MemoryLocalStore::new(),
        MemoryRemoteStore::new(),
        ScriptedIdentityProvider::new().then_identity(sam()),
    );
    h.identity.set_fail_revoke(true);
    h.tracker.sign_in().await.unwrap();
    h.tracker.apply(&rotate("PL-900"));
    assert_eq!(h.tracker.flush().await, SyncStatus::Saved);

    h.tracker.sign_out().await.unwrap();
    assert_eq!(h.identity.revokes.load(Ordering::SeqCst), 1);
    assert_eq!(h.tracker.session(), SessionState::Anonymous);
    assert_eq!(h.tracker.sync_status(), SyncStatus::Local);
    assert!(h.remote().get(SAM_PROGRESS).is_some());
    assert!(h.tracker.sign_out().await.is_err());

    h.tracker.apply(&rotate("PL-900"));
    assert_eq!(h.tracker.flush().await, SyncStatus::Local);
    assert_eq!(h.local.document(), Some(h.tracker.document()));
}

#[tokio::test]
async fn export_writes_dated_backup() {
    let h = local_harness(MemoryLocalStore::new(), ScriptedIdentityProvider::new());
    let dir = tempfile::tempdir().unwrap();
    let path = h.tracker.export(dir.path()).await.unwrap();
    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(name.starts_with("agentic_roadmap_backup_"));
    assert!(name.ends_with(".json"));
    let back = codec::decode(&std::fs::read(&path).unwrap()).unwrap();
    assert_eq!(&back, seed::default_roadmap());
}
