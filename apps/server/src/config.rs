//! Process configuration from environment variables.

use std::env;
use std::time::Duration;

/// Full symbol universe refreshed in bulk by the scheduler.
pub const DEFAULT_TICKER_SYMBOLS: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "META", "NVDA", "BRK-B", "JPM", "JNJ", "V", "PG",
    "UNH", "HD", "MA", "DIS", "NFLX", "AMD", "INTC", "PYPL", "ADBE", "CRM", "NKE", "CMCSA", "PFE",
    "TMO", "ABT", "COST", "ACN", "DHR", "^GSPC", "^DJI", "^IXIC", "^RUT", "^VIX",
];

/// Smaller core subset used for the low-latency warm-up fetch.
pub const DEFAULT_CORE_SYMBOLS: &[&str] = &[
    "AAPL", "MSFT", "GOOGL", "AMZN", "TSLA", "META", "NVDA", "BRK-B", "JPM", "JNJ", "V", "PG",
    "UNH", "HD", "MA", "DIS",
];

/// Server configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to
    pub listen_addr: String,
    /// Full symbol universe for bulk fetches
    pub symbols: Vec<String>,
    /// Core subset for the startup warm-up and fast-path cold fetch
    pub core_symbols: Vec<String>,
    /// TTL of the bulk ticker cache
    pub ticker_ttl: Duration,
    /// TTL of each per-symbol detail cache entry
    pub detail_ttl: Duration,
    /// Interval of the background refresh scheduler
    pub refresh_interval: Duration,
    /// Maximum number of detail cache entries before LRU eviction
    pub detail_cache_capacity: usize,
}

impl Config {
    /// Read configuration from `MERCATOR_*` environment variables,
    /// falling back to the shipped defaults.
    pub fn from_env() -> Self {
        Self {
            listen_addr: env::var("MERCATOR_LISTEN_ADDR")
                .unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            symbols: env_symbols("MERCATOR_SYMBOLS", DEFAULT_TICKER_SYMBOLS),
            core_symbols: env_symbols("MERCATOR_CORE_SYMBOLS", DEFAULT_CORE_SYMBOLS),
            ticker_ttl: Duration::from_secs(env_u64("MERCATOR_TICKER_TTL_SECS", 120)),
            detail_ttl: Duration::from_secs(env_u64("MERCATOR_DETAIL_TTL_SECS", 60)),
            refresh_interval: Duration::from_secs(env_u64("MERCATOR_REFRESH_INTERVAL_SECS", 120)),
            detail_cache_capacity: env_u64("MERCATOR_DETAIL_CACHE_CAPACITY", 512) as usize,
        }
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parse a comma-separated symbol list from the environment.
fn env_symbols(key: &str, default: &[&str]) -> Vec<String> {
    match env::var(key) {
        Ok(value) => value
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Err(_) => default.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_symbols_are_subset_of_universe() {
        for symbol in DEFAULT_CORE_SYMBOLS {
            assert!(
                DEFAULT_TICKER_SYMBOLS.contains(symbol),
                "{} missing from universe",
                symbol
            );
        }
    }

    #[test]
    fn test_env_symbols_parses_comma_separated_list() {
        env::set_var("MERCATOR_TEST_SYMBOLS", "AAPL, MSFT ,,GOOGL");
        let symbols = env_symbols("MERCATOR_TEST_SYMBOLS", &["X"]);
        assert_eq!(symbols, vec!["AAPL", "MSFT", "GOOGL"]);
        env::remove_var("MERCATOR_TEST_SYMBOLS");
    }
}
