//! Background scheduler for periodic quote refresh.
//!
//! Refreshes the full symbol universe on a fixed interval so the bulk
//! ticker cache stays warm between client requests.

use std::sync::Arc;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::{info, warn};

use crate::main_lib::AppState;

/// Starts the background quote refresh scheduler.
///
/// The first interval tick fires immediately and is consumed without a
/// refresh since the startup warm-up has already primed the cache.
/// Signalling `shutdown` stops the loop and resolves the handle.
pub fn start_quote_refresh_scheduler(
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let period = state.config.refresh_interval;
        info!("Quote refresh scheduler started ({:?} interval)", period);

        let mut refresh_interval = interval(period);
        refresh_interval.tick().await;

        loop {
            tokio::select! {
                _ = refresh_interval.tick() => {
                    run_scheduled_refresh(&state).await;
                }
                _ = shutdown.notified() => {
                    info!("Quote refresh scheduler stopped");
                    return;
                }
            }
        }
    })
}

/// Runs a single scheduled refresh of the full symbol universe.
async fn run_scheduled_refresh(state: &Arc<AppState>) {
    info!("Running scheduled quote refresh...");
    match state.stocks.refresh().await {
        Ok(count) => {
            info!("Scheduled quote refresh completed: {} symbols cached", count);
        }
        Err(e) => {
            // Cache keeps its previous payload; reads fall back to stale data.
            warn!("Scheduled quote refresh failed: {}", e);
        }
    }
}
