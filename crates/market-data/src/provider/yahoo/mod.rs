//! Yahoo Finance market data provider.
//!
//! Combines two Yahoo surfaces per snapshot, mirroring what the quote
//! endpoints themselves do:
//! - the chart API (via `yahoo_finance_api`) for the latest traded
//!   price and for historical series
//! - the quoteSummary API (direct reqwest call with crumb/cookie
//!   authentication) for valuation fields the chart API lacks
//!   (name, market cap, P/E, 52-week range, previous close)

mod models;

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use lazy_static::lazy_static;
use reqwest::header;
use rust_decimal::Decimal;
use tracing::{debug, warn};
use urlencoding::encode;
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::models::{HistoryBar, QuoteSnapshot, Timeframe};
use crate::provider::MarketDataProvider;

use models::{YahooPriceDetail, YahooQuoteSummaryResponse, YahooQuoteSummaryResult};

// ============================================================================
// Crumb/Cookie Authentication
// ============================================================================

/// Cached Yahoo authentication data
#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

lazy_static! {
    /// Global cache for Yahoo authentication crumb
    static ref YAHOO_CRUMB: RwLock<Option<CrumbData>> = RwLock::default();
}

// ============================================================================
// Yahoo Provider
// ============================================================================

/// Yahoo Finance market data provider.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider.
    pub fn new() -> Result<Self, MarketDataError> {
        let connector =
            yahoo::YahooConnector::new().map_err(|e| MarketDataError::ProviderError {
                provider: "YAHOO".to_string(),
                message: format!("Failed to initialize Yahoo connector: {}", e),
            })?;
        Ok(Self { connector })
    }

    // ========================================================================
    // Crumb/Cookie Authentication
    // ========================================================================

    /// Ensure we have a valid Yahoo authentication crumb.
    async fn ensure_crumb(&self) -> Result<CrumbData, MarketDataError> {
        {
            let guard = YAHOO_CRUMB.read().unwrap();
            if let Some(crumb) = guard.as_ref() {
                return Ok(crumb.clone());
            }
        }

        self.fetch_crumb().await
    }

    /// Fetch a new Yahoo authentication crumb.
    async fn fetch_crumb(&self) -> Result<CrumbData, MarketDataError> {
        let client = reqwest::Client::new();

        // Step 1: Get cookie from fc.yahoo.com
        let response = client
            .get("https://fc.yahoo.com")
            .send()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: "YAHOO".to_string(),
                message: format!("Failed to get cookie: {}", e),
            })?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .ok_or_else(|| MarketDataError::ProviderError {
                provider: "YAHOO".to_string(),
                message: "Failed to parse Yahoo cookie".to_string(),
            })?;

        // Step 2: Get crumb using cookie
        let crumb = client
            .get("https://query1.finance.yahoo.com/v1/test/getcrumb")
            .header(
                header::USER_AGENT,
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
            )
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: "YAHOO".to_string(),
                message: format!("Failed to get crumb: {}", e),
            })?
            .text()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: "YAHOO".to_string(),
                message: format!("Failed to read crumb: {}", e),
            })?;

        let crumb_data = CrumbData { cookie, crumb };

        let mut guard = YAHOO_CRUMB.write().unwrap();
        *guard = Some(crumb_data.clone());

        Ok(crumb_data)
    }

    /// Clear the cached crumb (used when authentication fails)
    fn clear_crumb(&self) {
        let mut guard = YAHOO_CRUMB.write().unwrap();
        *guard = None;
    }

    // ========================================================================
    // Snapshot Fetching
    // ========================================================================

    /// Fetch the quoteSummary result for a symbol.
    async fn fetch_quote_summary(
        &self,
        symbol: &str,
    ) -> Result<YahooQuoteSummaryResult, MarketDataError> {
        let crumb = self.ensure_crumb().await?;

        let url = format!(
            "https://query1.finance.yahoo.com/v10/finance/quoteSummary/{}?modules=price,summaryDetail&crumb={}",
            encode(symbol),
            encode(&crumb.crumb)
        );

        let client = reqwest::Client::new();
        let response = client
            .get(&url)
            .header(
                header::USER_AGENT,
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
            )
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await
            .map_err(|e| MarketDataError::ProviderError {
                provider: "YAHOO".to_string(),
                message: format!("quoteSummary request failed: {}", e),
            })?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            self.clear_crumb();
            return Err(MarketDataError::ProviderError {
                provider: "YAHOO".to_string(),
                message: "Yahoo authentication expired".to_string(),
            });
        }

        let data: YahooQuoteSummaryResponse = response.json().await.map_err(|e| {
            MarketDataError::ProviderError {
                provider: "YAHOO".to_string(),
                message: format!("Failed to parse quoteSummary response: {}", e),
            }
        })?;

        data.quote_summary
            .result
            .into_iter()
            .next()
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))
    }

    /// Fetch the last close from a 1-day history, if available.
    ///
    /// This is the preferred price source; failures degrade to the
    /// regular-market fields in the quoteSummary response.
    async fn fetch_last_close(&self, symbol: &str) -> Option<Decimal> {
        match self.connector.get_latest_quotes(symbol, "1d").await {
            Ok(response) => match response.last_quote() {
                Ok(quote) => Decimal::from_f64_retain(quote.close),
                Err(e) => {
                    debug!("No 1d quotes for {}: {}", symbol, e);
                    None
                }
            },
            Err(e) => {
                debug!("1d history fetch failed for {}: {}", symbol, e);
                None
            }
        }
    }
}

// ============================================================================
// MarketDataProvider Implementation
// ============================================================================

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> &'static str {
        "YAHOO"
    }

    async fn quote(&self, symbol: &str) -> Result<QuoteSnapshot, MarketDataError> {
        debug!("Fetching snapshot for {} from Yahoo", symbol);

        let summary = self.fetch_quote_summary(symbol).await?;
        let last_close = self.fetch_last_close(symbol).await;

        build_snapshot(symbol, &summary, last_close)
    }

    async fn history(
        &self,
        symbol: &str,
        timeframe: Timeframe,
    ) -> Result<Vec<HistoryBar>, MarketDataError> {
        debug!(
            "Fetching {} history for {} (range {}, interval {}) from Yahoo",
            timeframe,
            symbol,
            timeframe.range(),
            timeframe.interval()
        );

        let response = self
            .connector
            .get_quote_range(symbol, timeframe.interval(), timeframe.range())
            .await
            .map_err(|e| {
                if matches!(e, yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult) {
                    MarketDataError::SymbolNotFound(symbol.to_string())
                } else {
                    MarketDataError::ProviderError {
                        provider: "YAHOO".to_string(),
                        message: e.to_string(),
                    }
                }
            })?;

        match response.quotes() {
            Ok(yahoo_quotes) => {
                let bars: Vec<HistoryBar> = yahoo_quotes
                    .into_iter()
                    .filter_map(|q| match yahoo_quote_to_bar(&q) {
                        Some(bar) => Some(bar),
                        None => {
                            warn!("Skipping bar with invalid timestamp {}", q.timestamp);
                            None
                        }
                    })
                    .collect();

                if bars.is_empty() {
                    return Err(MarketDataError::NoDataForRange);
                }

                Ok(bars)
            }
            Err(yahoo::YahooError::NoQuotes) => {
                warn!(
                    "No historical quotes returned for '{}' over {}",
                    symbol, timeframe
                );
                Err(MarketDataError::NoDataForRange)
            }
            Err(e) => Err(MarketDataError::ProviderError {
                provider: "YAHOO".to_string(),
                message: e.to_string(),
            }),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Extract the raw value of an optional `{raw, fmt}` field as a Decimal.
fn raw_decimal(field: &Option<YahooPriceDetail>) -> Option<Decimal> {
    field
        .as_ref()
        .and_then(|d| d.raw)
        .and_then(Decimal::from_f64_retain)
}

/// Extract the raw value of an optional `{raw, fmt}` field as a count.
fn raw_u64(field: &Option<YahooPriceDetail>) -> u64 {
    field
        .as_ref()
        .and_then(|d| d.raw)
        .map(|v| v as u64)
        .unwrap_or(0)
}

/// Assemble a [`QuoteSnapshot`] from a quoteSummary result and an
/// optional last close taken from the 1-day history.
///
/// Field fallbacks: price prefers the history close over the
/// regular-market price; previous close falls back to the current
/// price; change/changePercent are derived from price and previous
/// close when a history close is available, otherwise the
/// provider-reported regular-market change fields are used; everything
/// else defaults to zero. A result with no usable price at all is a
/// missing symbol.
fn build_snapshot(
    symbol: &str,
    result: &YahooQuoteSummaryResult,
    last_close: Option<Decimal>,
) -> Result<QuoteSnapshot, MarketDataError> {
    let price_data = result.price.as_ref();
    let detail = result.summary_detail.as_ref();

    let regular_market_price =
        price_data.and_then(|p| raw_decimal(&p.regular_market_price));

    let price = last_close
        .or(regular_market_price)
        .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?
        .round_dp(2);

    let previous_close = price_data
        .and_then(|p| raw_decimal(&p.regular_market_previous_close))
        .or_else(|| detail.and_then(|d| raw_decimal(&d.previous_close)))
        .unwrap_or(price)
        .round_dp(2);

    let (change, change_percent) = if last_close.is_some() {
        QuoteSnapshot::derive_change(price, previous_close)
    } else {
        // No fresh close: trust the provider's own change fields.
        // regularMarketChangePercent is a fraction, hence the * 100.
        let reported_change = price_data
            .and_then(|p| raw_decimal(&p.regular_market_change))
            .map(|c| c.round_dp(2));
        let reported_percent = price_data
            .and_then(|p| raw_decimal(&p.regular_market_change_percent))
            .map(|c| (c * Decimal::ONE_HUNDRED).round_dp(2));
        match (reported_change, reported_percent) {
            (Some(c), Some(p)) => (c, p),
            _ => QuoteSnapshot::derive_change(price, previous_close),
        }
    };

    let name = price_data
        .and_then(|p| p.long_name.clone().or_else(|| p.short_name.clone()))
        .unwrap_or_else(|| symbol.to_string());

    let volume = price_data
        .map(|p| raw_u64(&p.regular_market_volume))
        .filter(|v| *v > 0)
        .unwrap_or_else(|| detail.map(|d| raw_u64(&d.volume)).unwrap_or(0));

    let market_cap = price_data
        .map(|p| raw_u64(&p.market_cap))
        .filter(|v| *v > 0)
        .unwrap_or_else(|| detail.map(|d| raw_u64(&d.market_cap)).unwrap_or(0));

    let pe = detail
        .and_then(|d| raw_decimal(&d.trailing_pe))
        .unwrap_or(Decimal::ZERO);

    let high52 = detail
        .and_then(|d| raw_decimal(&d.fifty_two_week_high))
        .unwrap_or(Decimal::ZERO);

    let low52 = detail
        .and_then(|d| raw_decimal(&d.fifty_two_week_low))
        .unwrap_or(Decimal::ZERO);

    let open = price_data
        .and_then(|p| raw_decimal(&p.regular_market_open))
        .or_else(|| detail.and_then(|d| raw_decimal(&d.open)))
        .unwrap_or(Decimal::ZERO);

    Ok(QuoteSnapshot {
        symbol: symbol.to_string(),
        name,
        price,
        change,
        change_percent,
        volume,
        market_cap,
        pe,
        high52,
        low52,
        open,
        previous_close,
    })
}

/// Convert one Yahoo chart quote into a history bar.
///
/// Returns None when the bar timestamp cannot be interpreted.
fn yahoo_quote_to_bar(q: &yahoo::Quote) -> Option<HistoryBar> {
    let date = Utc
        .timestamp_opt(q.timestamp as i64, 0)
        .single()
        .map(|dt| dt.date_naive())?;

    let close = Decimal::from_f64_retain(q.close)?.round_dp(2);

    Some(HistoryBar {
        date,
        price: close,
        volume: q.volume,
        open: Decimal::from_f64_retain(q.open)
            .unwrap_or(Decimal::ZERO)
            .round_dp(2),
        high: Decimal::from_f64_retain(q.high)
            .unwrap_or(Decimal::ZERO)
            .round_dp(2),
        low: Decimal::from_f64_retain(q.low)
            .unwrap_or(Decimal::ZERO)
            .round_dp(2),
        close,
    })
}

// ============================================================================
// Tests
// ============================================================================
