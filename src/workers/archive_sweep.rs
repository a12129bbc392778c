use std::time::Instant;

use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{error, info};

use crate::services::archive::run_archive_process;
use crate::state::AppState;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub decks: usize,
    pub archived: usize,
    pub failed: usize,
    pub interrupted: bool,
}

/// Sweeps every configured deck. A failing deck is logged and skipped.
///
/// Shutdown is only observed between decks: a deck whose sweep has started
/// is always saved completely.
pub async fn sweep_all_decks(
    state: &AppState,
    shutdown: &mut broadcast::Receiver<()>,
) -> SweepReport {
    let start = Instant::now();
    let mut report = SweepReport::default();

    for deck in state.store().decks() {
        if shutdown_requested(shutdown) {
            info!(swept = report.decks, "archive sweep interrupted by shutdown");
            report.interrupted = true;
            break;
        }
        report.decks += 1;
        match run_archive_process(state, deck).await {
            Ok(archived) => report.archived += archived,
            Err(e) => {
                report.failed += 1;
                error!(deck = %deck, error = %e, "archive sweep failed");
            }
        }
    }

    info!(
        decks = report.decks,
        archived = report.archived,
        failed = report.failed,
        duration_secs = start.elapsed().as_secs_f64(),
        "archive sweep complete"
    );

    report
}

fn shutdown_requested(shutdown: &mut broadcast::Receiver<()>) -> bool {
    match shutdown.try_recv() {
        Ok(()) | Err(TryRecvError::Closed) | Err(TryRecvError::Lagged(_)) => true,
        Err(TryRecvError::Empty) => false,
    }
}
