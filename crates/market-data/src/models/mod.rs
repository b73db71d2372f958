//! Market data models
//!
//! This module contains the core data types for market data operations:
//! - `quote` - Quote snapshot record (QuoteSnapshot)
//! - `history` - Historical series bar (HistoryBar)
//! - `timeframe` - Enumerated history windows (Timeframe)

mod history;
mod quote;
mod timeframe;

pub use history::HistoryBar;
pub use quote::QuoteSnapshot;
pub use timeframe::Timeframe;
