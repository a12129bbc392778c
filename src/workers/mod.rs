mod archive_sweep;

use tokio::sync::{broadcast, Mutex};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{error, info, warn};

use crate::state::AppState;

pub use archive_sweep::{sweep_all_decks, SweepReport};

/// Runs the scheduled archive sweep until [`WorkerManager::stop`].
pub struct WorkerManager {
    scheduler: Mutex<JobScheduler>,
    shutdown_tx: broadcast::Sender<()>,
    state: AppState,
}

impl WorkerManager {
    pub async fn new(state: AppState) -> Result<Self, WorkerError> {
        let scheduler = JobScheduler::new().await?;
        let (shutdown_tx, _) = broadcast::channel(1);
        Ok(Self {
            scheduler: Mutex::new(scheduler),
            shutdown_tx,
            state,
        })
    }

    pub async fn start(&self, schedule: &str) -> Result<(), WorkerError> {
        let scheduler = self.scheduler.lock().await;

        let state = self.state.clone();
        let shutdown_rx = self.shutdown_tx.subscribe();
        let job = Job::new_async(schedule, move |_uuid, _lock| {
            let state = state.clone();
            let mut rx = shutdown_rx.resubscribe();
            Box::pin(async move {
                let report = sweep_all_decks(&state, &mut rx).await;
                if report.failed > 0 {
                    error!(failed = report.failed, "archive sweep finished with errors");
                }
            })
        })?;
        scheduler.add(job).await?;
        info!(schedule = %schedule, "Archive sweep worker scheduled");

        scheduler.start().await?;
        info!("Workers started");

        Ok(())
    }

    /// Signals shutdown, then takes every deck lock so a deck sweep that is
    /// already saving finishes before the scheduler goes down.
    pub async fn stop(&self) {
        info!("Stopping workers...");
        let _ = self.shutdown_tx.send(());

        let mut held = Vec::new();
        for deck in self.state.store().decks() {
            if let Some(lock) = self.state.deck_lock(deck) {
                held.push(lock.lock_owned().await);
            }
        }

        let mut scheduler = self.scheduler.lock().await;
        if let Err(e) = scheduler.shutdown().await {
            warn!(error = %e, "Error shutting down scheduler");
        }

        drop(held);
        info!("Workers stopped");
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] tokio_cron_scheduler::JobSchedulerError),
}
