//! Periodic synchronization with a single-flight discipline.
//!
//! The next run is scheduled only after the previous one has finished
//! (successfully or not), followed by the fixed interval. Runs never overlap,
//! and there is no jitter or backoff.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::SyncOutcome;

/// Handle to a running periodic sync task.
///
/// Dropping the handle stops the loop at its next wait; an in-flight run is
/// allowed to finish.
pub struct SyncScheduler {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SyncScheduler {
    /// Spawn the loop on the current tokio runtime.
    ///
    /// `job` is invoked immediately, then again `interval` after each run
    /// completes. `on_outcome` sees every outcome in order.
    pub fn spawn<Job, Fut, OnOutcome>(interval: Duration, job: Job, mut on_outcome: OnOutcome) -> Self
    where
        Job: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = SyncOutcome> + Send + 'static,
        OnOutcome: FnMut(&SyncOutcome) + Send + 'static,
    {
        let (shutdown, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            tracing::info!("Periodic sync started (interval {:?})", interval);
            let mut runs: u64 = 0;

            loop {
                runs += 1;
                let outcome = job().await;
                match &outcome {
                    SyncOutcome::Completed(_) => {
                        tracing::info!("Sync run {}: {}", runs, outcome.status_message());
                    }
                    SyncOutcome::Failed(_) | SyncOutcome::Skipped => {
                        tracing::warn!("Sync run {}: {}", runs, outcome.status_message());
                    }
                }
                on_outcome(&outcome);

                tokio::select! {
                    () = tokio::time::sleep(interval) => {}
                    _ = shutdown_rx.changed() => break,
                }
            }

            tracing::info!("Periodic sync stopped after {} runs", runs);
        });

        Self { shutdown, task }
    }

    /// Stop the loop and wait for the task to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        if let Err(error) = self.task.await {
            tracing::warn!("Periodic sync task ended abnormally: {}", error);
        }
    }
}
