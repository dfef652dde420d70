use quotebook_core::services::QuoteService;
use quotebook_core::sync::SyncOutcome;

use crate::error::CliError;

pub async fn run_sync(service: &QuoteService) -> Result<(), CliError> {
    let outcome = service.synchronize().await;
    sync_result(&outcome)
}

/// Periodic sync until Ctrl-C; an in-flight run finishes before exit.
pub async fn run_watch(service: &QuoteService) -> Result<(), CliError> {
    println!(
        "Syncing every {}s with {} (Ctrl-C to stop)",
        service.settings().sync_interval.as_secs(),
        service.settings().remote_url
    );

    let scheduler = service.spawn_scheduler(|outcome| println!("{}", outcome.status_message()));
    tokio::signal::ctrl_c().await?;
    scheduler.shutdown().await;
    Ok(())
}

pub fn sync_result(outcome: &SyncOutcome) -> Result<(), CliError> {
    match outcome {
        SyncOutcome::Failed(_) => Err(CliError::SyncFailed(outcome.status_message())),
        SyncOutcome::Completed(_) | SyncOutcome::Skipped => {
            println!("{}", outcome.status_message());
            Ok(())
        }
    }
}
