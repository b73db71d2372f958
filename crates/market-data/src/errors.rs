//! Error types for the market data crate.

use thiserror::Error;

/// Errors that can occur during market data operations.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The requested symbol was not found by the provider.
    /// Retrying won't help.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The symbol exists but has no bars in the requested window.
    #[error("No data for date range")]
    NoDataForRange,

    /// Every symbol in a non-empty bulk fetch failed.
    ///
    /// Individual symbol failures inside a batch are logged and skipped;
    /// this variant is the batch-level "total failure" the read path
    /// recovers from with stale cache data.
    #[error("All {requested} symbols failed in bulk fetch")]
    AllSymbolsFailed {
        /// How many symbols the batch requested
        requested: usize,
    },

    /// A provider-specific error occurred.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// A network error occurred while communicating with the provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// True when the error means "the symbol itself is unknown or empty",
    /// as opposed to the provider being unreachable.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::SymbolNotFound(_) | Self::NoDataForRange
        )
    }
}
