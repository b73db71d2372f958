//! Shared application state and startup wiring.

use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use mercator_market_data::{MarketDataProvider, YahooProvider};

use crate::config::Config;
use crate::service::StockService;

pub struct AppState {
    pub stocks: Arc<StockService>,
    pub config: Config,
}

pub fn init_tracing() {
    let log_format = std::env::var("MERCATOR_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Build application state with the live Yahoo provider.
pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let provider = Arc::new(YahooProvider::new()?);
    Ok(build_state_with_provider(config, provider))
}

/// Build application state around an arbitrary provider. Used by tests
/// to substitute a fake.
pub fn build_state_with_provider(
    config: &Config,
    provider: Arc<dyn MarketDataProvider>,
) -> Arc<AppState> {
    let stocks = Arc::new(StockService::new(provider, config));
    Arc::new(AppState {
        stocks,
        config: config.clone(),
    })
}
