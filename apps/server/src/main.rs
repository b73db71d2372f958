use std::sync::Arc;

use tokio::sync::Notify;
use tracing::{error, info};

use mercator_server::api::app_router;
use mercator_server::config::Config;
use mercator_server::{build_state, init_tracing, scheduler};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env();
    init_tracing();
    let state = build_state(&config)?;

    // Prime the ticker cache with the core subset before serving.
    match state.stocks.warm_up().await {
        Ok(count) => info!("Warm-up complete: {} symbols cached", count),
        Err(e) => error!("Warm-up failed, cache starts cold: {}", e),
    }

    let shutdown = Arc::new(Notify::new());
    let scheduler_handle =
        scheduler::start_quote_refresh_scheduler(state.clone(), shutdown.clone());

    let router = app_router(state);
    info!("Listening on {}", config.listen_addr);
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    shutdown.notify_waiters();
    scheduler_handle.await?;
    Ok(())
}
