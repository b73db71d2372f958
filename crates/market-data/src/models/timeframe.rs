use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// History window requested by a client.
///
/// Each variant maps to a fixed (lookback range, sampling interval)
/// pair in the provider's own vocabulary. The lookback is deliberately
/// wider than the tag suggests so charts have context around the
/// requested window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    /// "1D" - 5 days of hourly bars
    #[serde(rename = "1D")]
    OneDay,
    /// "5D" - 1 month of daily bars
    #[serde(rename = "5D")]
    FiveDays,
    /// "1M" - 3 months of daily bars
    #[serde(rename = "1M")]
    OneMonth,
    /// "3M" - 6 months of daily bars
    #[serde(rename = "3M")]
    ThreeMonths,
    /// "1Y" - 1 year of weekly bars
    #[serde(rename = "1Y")]
    OneYear,
}

impl Timeframe {
    /// Client-facing tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::OneDay => "1D",
            Timeframe::FiveDays => "5D",
            Timeframe::OneMonth => "1M",
            Timeframe::ThreeMonths => "3M",
            Timeframe::OneYear => "1Y",
        }
    }

    /// Provider lookback range for this window.
    pub fn range(&self) -> &'static str {
        match self {
            Timeframe::OneDay => "5d",
            Timeframe::FiveDays => "1mo",
            Timeframe::OneMonth => "3mo",
            Timeframe::ThreeMonths => "6mo",
            Timeframe::OneYear => "1y",
        }
    }

    /// Provider sampling interval for this window.
    pub fn interval(&self) -> &'static str {
        match self {
            Timeframe::OneDay => "1h",
            Timeframe::FiveDays => "1d",
            Timeframe::OneMonth => "1d",
            Timeframe::ThreeMonths => "1d",
            Timeframe::OneYear => "1wk",
        }
    }
}

impl FromStr for Timeframe {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1D" => Ok(Timeframe::OneDay),
            "5D" => Ok(Timeframe::FiveDays),
            "1M" => Ok(Timeframe::OneMonth),
            "3M" => Ok(Timeframe::ThreeMonths),
            "1Y" => Ok(Timeframe::OneYear),
            _ => Err(format!(
                "Invalid timeframe: {}. Use: 1D, 5D, 1M, 3M, 1Y",
                s
            )),
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
