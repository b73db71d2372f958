//! Stock service: cache policy around the market data provider.

use std::sync::Arc;

use tracing::{debug, warn};

use mercator_market_data::{
    HistoryBar, MarketDataError, MarketDataProvider, QuoteSnapshot, Timeframe,
};

use crate::cache::{DetailCache, TickerCache};
use crate::config::Config;
use crate::error::{ApiError, ApiResult};

/// Bulk ticker payload together with how it was served.
pub struct Ticker {
    pub stocks: Arc<[QuoteSnapshot]>,
    /// True when served from cache without hitting the provider.
    pub cached: bool,
    /// True when the payload is past its TTL and served as a fallback.
    pub stale: bool,
}

/// Serves quote data, caching bulk and per-symbol reads.
pub struct StockService {
    provider: Arc<dyn MarketDataProvider>,
    ticker_cache: TickerCache,
    detail_cache: DetailCache,
    symbols: Vec<String>,
    core_symbols: Vec<String>,
}

impl StockService {
    pub fn new(provider: Arc<dyn MarketDataProvider>, config: &Config) -> Self {
        Self {
            provider,
            ticker_cache: TickerCache::new(config.ticker_ttl),
            detail_cache: DetailCache::new(config.detail_ttl, config.detail_cache_capacity),
            symbols: config.symbols.clone(),
            core_symbols: config.core_symbols.clone(),
        }
    }

    /// Fetch the core symbol subset and prime the ticker cache.
    /// Called once at startup so the first requests are served warm.
    pub async fn warm_up(&self) -> Result<usize, MarketDataError> {
        let stocks = self.provider.quotes(&self.core_symbols).await?;
        let payload = self.ticker_cache.write(stocks).await;
        Ok(payload.len())
    }

    /// Fetch the full symbol universe and replace the ticker cache.
    /// Driven by the background scheduler.
    pub async fn refresh(&self) -> Result<usize, MarketDataError> {
        let stocks = self.provider.quotes(&self.symbols).await?;
        let payload = self.ticker_cache.write(stocks).await;
        Ok(payload.len())
    }

    /// Serve the bulk ticker payload.
    ///
    /// Fresh cache hits are served directly. On a miss the full
    /// universe is fetched and cached. When that fetch fails, an
    /// expired payload is served as a stale fallback; the error only
    /// propagates when the cache has never been filled.
    ///
    /// Concurrent misses each trigger their own fetch; the last write
    /// wins. Requests are not coalesced.
    pub async fn ticker(&self) -> ApiResult<Ticker> {
        let read = self.ticker_cache.read().await;
        if read.valid {
            if let Some(stocks) = read.stocks {
                debug!("Serving ticker from cache ({} symbols)", stocks.len());
                return Ok(Ticker {
                    stocks,
                    cached: true,
                    stale: false,
                });
            }
        }

        match self.provider.quotes(&self.symbols).await {
            Ok(stocks) => {
                let payload = self.ticker_cache.write(stocks).await;
                Ok(Ticker {
                    stocks: payload,
                    cached: false,
                    stale: false,
                })
            }
            Err(e) => match read.stocks {
                Some(stocks) => {
                    warn!("Ticker refresh failed, serving stale cache: {}", e);
                    Ok(Ticker {
                        stocks,
                        cached: true,
                        stale: true,
                    })
                }
                None => Err(ApiError::CacheEmpty(e)),
            },
        }
    }

    /// Serve whatever ticker payload is cached, fresh or stale,
    /// fetching only the core subset when the cache is empty.
    pub async fn ticker_fast(&self) -> ApiResult<Ticker> {
        let read = self.ticker_cache.read().await;
        if let Some(stocks) = read.stocks {
            return Ok(Ticker {
                stocks,
                cached: true,
                stale: !read.valid,
            });
        }

        let stocks = self
            .provider
            .quotes(&self.core_symbols)
            .await
            .map_err(ApiError::CacheEmpty)?;
        let payload = self.ticker_cache.write(stocks).await;
        Ok(Ticker {
            stocks: payload,
            cached: false,
            stale: false,
        })
    }

    /// Serve a single symbol's snapshot, cached per symbol.
    pub async fn detail(&self, symbol: &str) -> ApiResult<QuoteSnapshot> {
        if let Some(snapshot) = self.detail_cache.get_if_fresh(symbol).await {
            debug!("Serving {} detail from cache", symbol);
            return Ok(snapshot);
        }
        let snapshot = self.provider.quote(symbol).await?;
        self.detail_cache.insert(snapshot.clone()).await;
        Ok(snapshot)
    }

    /// Fetch a historical price series. Never cached.
    pub async fn history(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> ApiResult<Vec<HistoryBar>> {
        Ok(self.provider.history(symbol, timeframe).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;
    use std::time::Duration;

    fn snapshot(symbol: &str) -> QuoteSnapshot {
        QuoteSnapshot {
            symbol: symbol.to_string(),
            name: symbol.to_string(),
            price: dec!(100.00),
            change: dec!(1.00),
            change_percent: dec!(1.01),
            volume: 1_000,
            market_cap: 2_000,
            pe: dec!(25.5),
            high52: dec!(120.00),
            low52: dec!(80.00),
            open: dec!(99.00),
            previous_close: dec!(99.00),
        }
    }

    /// Provider fake recording the batch size of each bulk call.
    struct FakeProvider {
        fail_bulk: Mutex<bool>,
        bulk_calls: Mutex<Vec<usize>>,
        quote_calls: Mutex<usize>,
    }

    impl FakeProvider {
        fn new() -> Self {
            Self {
                fail_bulk: Mutex::new(false),
                bulk_calls: Mutex::new(Vec::new()),
                quote_calls: Mutex::new(0),
            }
        }

        fn set_fail_bulk(&self, fail: bool) {
            *self.fail_bulk.lock().unwrap() = fail;
        }

        fn bulk_calls(&self) -> Vec<usize> {
            self.bulk_calls.lock().unwrap().clone()
        }

        fn quote_calls(&self) -> usize {
            *self.quote_calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl MarketDataProvider for FakeProvider {
        fn id(&self) -> &'static str {
            "FAKE"
        }

        async fn quote(&self, symbol: &str) -> Result<QuoteSnapshot, MarketDataError> {
            *self.quote_calls.lock().unwrap() += 1;
            if symbol == "BOGUS" {
                return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
            }
            Ok(snapshot(symbol))
        }

        async fn quotes(&self, symbols: &[String]) -> Result<Vec<QuoteSnapshot>, MarketDataError> {
            self.bulk_calls.lock().unwrap().push(symbols.len());
            if *self.fail_bulk.lock().unwrap() {
                return Err(MarketDataError::AllSymbolsFailed {
                    requested: symbols.len(),
                });
            }
            Ok(symbols.iter().map(|s| snapshot(s)).collect())
        }

        async fn history(
            &self,
            _symbol: &str,
            _timeframe: Timeframe,
        ) -> Result<Vec<HistoryBar>, MarketDataError> {
            Ok(Vec::new())
        }
    }

    fn test_config() -> Config {
        Config {
            listen_addr: "127.0.0.1:0".to_string(),
            symbols: vec![
                "AAPL".to_string(),
                "MSFT".to_string(),
                "GOOGL".to_string(),
                "AMZN".to_string(),
            ],
            core_symbols: vec!["AAPL".to_string(), "MSFT".to_string()],
            ticker_ttl: Duration::from_secs(120),
            detail_ttl: Duration::from_secs(60),
            refresh_interval: Duration::from_secs(120),
            detail_cache_capacity: 512,
        }
    }

    fn service() -> (Arc<FakeProvider>, StockService) {
        let provider = Arc::new(FakeProvider::new());
        let service = StockService::new(provider.clone(), &test_config());
        (provider, service)
    }

    #[tokio::test]
    async fn test_warm_up_fetches_core_subset() {
        let (provider, service) = service();
        let count = service.warm_up().await.unwrap();
        assert_eq!(count, 2);
        assert_eq!(provider.bulk_calls(), vec![2]);
    }

    #[tokio::test]
    async fn test_ticker_fetches_full_universe_on_cold_cache() {
        let (provider, service) = service();
        let ticker = service.ticker().await.unwrap();
        assert!(!ticker.cached);
        assert!(!ticker.stale);
        assert_eq!(ticker.stocks.len(), 4);
        assert_eq!(provider.bulk_calls(), vec![4]);
    }

    #[tokio::test]
    async fn test_ticker_serves_from_cache_within_ttl() {
        let (provider, service) = service();
        service.ticker().await.unwrap();
        let ticker = service.ticker().await.unwrap();
        assert!(ticker.cached);
        assert!(!ticker.stale);
        assert_eq!(provider.bulk_calls().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_refetches_after_ttl_expiry() {
        let (provider, service) = service();
        service.ticker().await.unwrap();

        tokio::time::advance(Duration::from_secs(121)).await;
        let ticker = service.ticker().await.unwrap();
        assert!(!ticker.cached);
        assert_eq!(provider.bulk_calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_falls_back_to_stale_cache_on_failure() {
        let (provider, service) = service();
        service.ticker().await.unwrap();

        tokio::time::advance(Duration::from_secs(121)).await;
        provider.set_fail_bulk(true);
        let ticker = service.ticker().await.unwrap();
        assert!(ticker.cached);
        assert!(ticker.stale);
        assert_eq!(ticker.stocks.len(), 4);
    }

    #[tokio::test]
    async fn test_ticker_errors_when_cache_empty_and_fetch_fails() {
        let (provider, service) = service();
        provider.set_fail_bulk(true);
        let result = service.ticker().await;
        assert!(matches!(result, Err(ApiError::CacheEmpty(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_fast_serves_stale_without_fetching() {
        let (provider, service) = service();
        service.warm_up().await.unwrap();

        tokio::time::advance(Duration::from_secs(121)).await;
        let ticker = service.ticker_fast().await.unwrap();
        assert!(ticker.cached);
        assert!(ticker.stale);
        // Only the warm-up call hit the provider.
        assert_eq!(provider.bulk_calls().len(), 1);
    }

    #[tokio::test]
    async fn test_ticker_fast_fetches_core_subset_on_empty_cache() {
        let (provider, service) = service();
        let ticker = service.ticker_fast().await.unwrap();
        assert!(!ticker.cached);
        assert_eq!(ticker.stocks.len(), 2);
        assert_eq!(provider.bulk_calls(), vec![2]);
    }

    #[tokio::test]
    async fn test_detail_caches_per_symbol() {
        let (provider, service) = service();
        service.detail("AAPL").await.unwrap();
        service.detail("AAPL").await.unwrap();
        assert_eq!(provider.quote_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_detail_refetches_after_ttl_expiry() {
        let (provider, service) = service();
        service.detail("AAPL").await.unwrap();

        tokio::time::advance(Duration::from_secs(61)).await;
        service.detail("AAPL").await.unwrap();
        assert_eq!(provider.quote_calls(), 2);
    }

    #[tokio::test]
    async fn test_detail_propagates_not_found() {
        let (_, service) = service();
        let result = service.detail("BOGUS").await;
        assert!(matches!(
            result,
            Err(ApiError::MarketData(MarketDataError::SymbolNotFound(_)))
        ));
    }
}
