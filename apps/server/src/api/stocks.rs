//! Stock quote endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use mercator_market_data::{HistoryBar, QuoteSnapshot, Timeframe};

use crate::error::{ApiError, ApiResult};
use crate::main_lib::AppState;
use crate::service::Ticker;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TickerResponse {
    stocks: Arc<[QuoteSnapshot]>,
    count: usize,
    cached: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    stale: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    fast: Option<bool>,
}

impl TickerResponse {
    fn from_ticker(ticker: Ticker, fast: bool) -> Self {
        Self {
            count: ticker.stocks.len(),
            stocks: ticker.stocks,
            cached: ticker.cached,
            stale: ticker.stale.then_some(true),
            fast: fast.then_some(true),
        }
    }
}

#[derive(Deserialize)]
struct HistoryQuery {
    #[serde(default = "default_timeframe")]
    timeframe: String,
}

fn default_timeframe() -> String {
    "1M".to_string()
}

#[derive(Serialize)]
struct HistoryResponse {
    symbol: String,
    timeframe: &'static str,
    data: Vec<HistoryBar>,
}

/// Get quotes for the full symbol universe, cached in bulk.
async fn get_ticker(State(state): State<Arc<AppState>>) -> ApiResult<Json<TickerResponse>> {
    let ticker = state.stocks.ticker().await?;
    Ok(Json(TickerResponse::from_ticker(ticker, false)))
}

/// Get whatever ticker payload is cached, trading freshness for latency.
async fn get_ticker_fast(State(state): State<Arc<AppState>>) -> ApiResult<Json<TickerResponse>> {
    let ticker = state.stocks.ticker_fast().await?;
    Ok(Json(TickerResponse::from_ticker(ticker, true)))
}

/// Get the detail snapshot for a single symbol.
async fn get_stock_info(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<QuoteSnapshot>> {
    let snapshot = state.stocks.detail(&symbol).await?;
    Ok(Json(snapshot))
}

/// Get a historical price series for a symbol.
///
/// The timeframe is validated before any provider call.
async fn get_stock_history(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    let timeframe: Timeframe = query.timeframe.parse().map_err(ApiError::BadRequest)?;
    let data = state.stocks.history(&symbol, timeframe).await?;
    Ok(Json(HistoryResponse {
        symbol,
        timeframe: timeframe.as_str(),
        data,
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/stocks/ticker", get(get_ticker))
        .route("/stocks/ticker/fast", get(get_ticker_fast))
        .route("/stocks/{symbol}/info", get(get_stock_info))
        .route("/stocks/{symbol}/history", get(get_stock_history))
}
