//! Mercator Market Data Crate
//!
//! This crate provides the provider gateway for the Mercator stock API:
//! fetching quote snapshots and historical price series from an external
//! market data source (Yahoo Finance).
//!
//! # Overview
//!
//! The market data crate supports:
//! - Single-symbol quote snapshots with best-effort field fallbacks
//! - Bulk quote fetching that tolerates per-symbol failures
//! - Historical series bounded by a fixed timeframe table
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |    Read Path     |  (server: caches + fallback policy)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! | MarketDataProvider|  (gateway trait, injectable for tests)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |  YahooProvider   |  (chart API + quoteSummary)
//! +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`QuoteSnapshot`] - A point-in-time quote record with derived change fields
//! - [`HistoryBar`] - One bar of a historical price series
//! - [`Timeframe`] - Enumerated history windows with a static lookback table
//! - [`MarketDataError`] - Error taxonomy for all gateway operations

pub mod errors;
pub mod models;
pub mod provider;

// Re-export all public types from models
pub use models::{HistoryBar, QuoteSnapshot, Timeframe};

// Re-export provider types
pub use provider::yahoo::YahooProvider;
pub use provider::MarketDataProvider;

pub use errors::MarketDataError;
