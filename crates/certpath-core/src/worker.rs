//! Background autosave task
//!
//! Sleeps until the tracker's next deadline, wakes early when an edit
//! re-arms the timer, and runs the due write.

use crate::tracker::Tracker;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Handle to the running autosave task
#[derive(Debug)]
pub struct AutosaveHandle {
    tracker: Arc<Tracker>,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl AutosaveHandle {
    /// Stop the task and drop any pending timer
    ///
    /// Call [`Tracker::flush`] first to keep the pending edit.
    pub async fn shutdown(self) {
        self.tracker.cancel_pending();
        // The receiver is gone only if the task already ended
        let _ = self.shutdown.send(());
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "autosave task ended abnormally");
        }
        tracing::debug!("autosave worker stopped");
    }
}

/// Spawn the autosave task for `tracker`
#[must_use]
pub fn spawn_autosave(tracker: Arc<Tracker>) -> AutosaveHandle {
    let (shutdown, mut stop) = oneshot::channel();
    let worker = Arc::clone(&tracker);
    let task = tokio::spawn(async move {
        tracing::debug!("autosave worker started");
        loop {
            let deadline = worker.next_deadline();
            let sleep = async {
                match deadline {
                    Some(at) => tokio::time::sleep_until(at).await,
                    None => std::future::pending().await,
                }
            };
            tokio::select! {
                _ = &mut stop => break,
                () = worker.woken() => {}
                () = sleep => {
                    if let Some(status) = worker.run_due(Instant::now()).await {
                        tracing::debug!(%status, "autosave settled");
                    }
                }
            }
        }
    });
    AutosaveHandle {
        tracker,
        shutdown,
        task,
    }
}
