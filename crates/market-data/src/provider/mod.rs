//! Market data provider trait definitions.
//!
//! This module defines the `MarketDataProvider` trait: the seam between
//! the caching read path and the external market data source. The
//! server injects a real provider in production and programmable fakes
//! in tests.

pub mod yahoo;

use async_trait::async_trait;
use futures::future::join_all;
use tracing::warn;

use crate::errors::MarketDataError;
use crate::models::{HistoryBar, QuoteSnapshot, Timeframe};

/// Trait for market data providers.
///
/// Provider calls are the only suspension points of the system; latency
/// and failure are provider-controlled and unpredictable, which is why
/// callers layer caching and stale fallback on top.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "YAHOO". Used for logging and
    /// error context.
    fn id(&self) -> &'static str;

    /// Fetch the current quote snapshot for one symbol.
    async fn quote(&self, symbol: &str) -> Result<QuoteSnapshot, MarketDataError>;

    /// Fetch quote snapshots for a batch of symbols.
    ///
    /// Each symbol is fetched independently; a failing symbol is logged
    /// and omitted from the result rather than aborting the batch. The
    /// batch as a whole fails only when every symbol failed.
    async fn quotes(&self, symbols: &[String]) -> Result<Vec<QuoteSnapshot>, MarketDataError> {
        let fetches = symbols.iter().map(|symbol| async move {
            match self.quote(symbol).await {
                Ok(snapshot) => Some(snapshot),
                Err(e) => {
                    warn!("Failed to fetch {}: {}", symbol, e);
                    None
                }
            }
        });

        let snapshots: Vec<QuoteSnapshot> =
            join_all(fetches).await.into_iter().flatten().collect();

        if snapshots.is_empty() && !symbols.is_empty() {
            return Err(MarketDataError::AllSymbolsFailed {
                requested: symbols.len(),
            });
        }

        Ok(snapshots)
    }

    /// Fetch the historical series for a symbol over a timeframe.
    ///
    /// Returns the bars ordered by date ascending. An empty series is
    /// reported as [`MarketDataError::NoDataForRange`].
    async fn history(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<HistoryBar>, MarketDataError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    /// Provider that only knows a fixed set of symbols.
    struct PartialProvider {
        known: Vec<String>,
    }

    fn snapshot(symbol: &str) -> QuoteSnapshot {
        QuoteSnapshot {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            price: dec!(100.00),
            change: Decimal::ZERO,
            change_percent: Decimal::ZERO,
            volume: 0,
            market_cap: 0,
            pe: Decimal::ZERO,
            high52: Decimal::ZERO,
            low52: Decimal::ZERO,
            open: Decimal::ZERO,
            previous_close: dec!(100.00),
        }
    }

    #[async_trait]
    impl MarketDataProvider for PartialProvider {
        fn id(&self) -> &'static str {
            "PARTIAL"
        }

        async fn quote(&self, symbol: &str) -> Result<QuoteSnapshot, MarketDataError> {
            if self.known.iter().any(|s| s == symbol) {
                Ok(snapshot(symbol))
            } else {
                Err(MarketDataError::SymbolNotFound(symbol.to_string()))
            }
        }

        async fn history(
            &self,
            _symbol: &str,
            _timeframe: Timeframe,
        ) -> Result<Vec<HistoryBar>, MarketDataError> {
            Err(MarketDataError::NoDataForRange)
        }
    }

    #[tokio::test]
    async fn test_bulk_fetch_skips_failing_symbols() {
        let provider = PartialProvider {
            known: vec!["AAPL".to_string(), "MSFT".to_string()],
        };
        let symbols = vec![
            "AAPL".to_string(),
            "BOGUS".to_string(),
            "MSFT".to_string(),
        ];

        let snapshots = provider.quotes(&symbols).await.unwrap();
        let fetched: Vec<&str> = snapshots.iter().map(|s| s.symbol.as_str()).collect();
        assert_eq!(fetched, vec!["AAPL", "MSFT"]);
    }

    #[tokio::test]
    async fn test_bulk_fetch_total_failure() {
        let provider = PartialProvider { known: vec![] };
        let symbols = vec!["A".to_string(), "B".to_string()];

        let err = provider.quotes(&symbols).await.unwrap_err();
        assert!(matches!(
            err,
            MarketDataError::AllSymbolsFailed { requested: 2 }
        ));
    }

    #[tokio::test]
    async fn test_bulk_fetch_empty_batch_is_ok() {
        let provider = PartialProvider { known: vec![] };
        let snapshots = provider.quotes(&[]).await.unwrap();
        assert!(snapshots.is_empty());
    }
}
