use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A point-in-time quote snapshot for one symbol.
///
/// All numeric fields are best-effort: when the provider omits a field
/// the documented fallback is substituted (often the current price, or
/// zero). A new fetch produces a new snapshot; existing snapshots are
/// never mutated.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteSnapshot {
    /// Ticker symbol (e.g. "AAPL", "^GSPC")
    pub symbol: String,

    /// Display name, falling back to the symbol itself
    pub name: String,

    /// Last traded price
    pub price: Decimal,

    /// Absolute change versus the previous close
    pub change: Decimal,

    /// Percent change versus the previous close
    pub change_percent: Decimal,

    /// Trading volume (0 when unavailable)
    pub volume: u64,

    /// Market capitalization (0 when unavailable)
    pub market_cap: u64,

    /// Trailing price/earnings ratio (0 when unavailable)
    pub pe: Decimal,

    /// 52-week high (0 when unavailable)
    pub high52: Decimal,

    /// 52-week low (0 when unavailable)
    pub low52: Decimal,

    /// Opening price (0 when unavailable)
    pub open: Decimal,

    /// Previous close, falling back to the current price
    pub previous_close: Decimal,
}

impl QuoteSnapshot {
    /// Derive (change, changePercent) from a price and previous close,
    /// both rounded to 2 decimal places. Percent change is zero when the
    /// previous close is zero.
    pub fn derive_change(price: Decimal, previous_close: Decimal) -> (Decimal, Decimal) {
        let change = price - previous_close;
        let change_percent = if previous_close.is_zero() {
            Decimal::ZERO
        } else {
            (change / previous_close) * Decimal::ONE_HUNDRED
        };
        (change.round_dp(2), change_percent.round_dp(2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_derive_change() {
        let (change, pct) = QuoteSnapshot::derive_change(dec!(150.25), dec!(148.00));
        assert_eq!(change, dec!(2.25));
        assert_eq!(pct, dec!(1.52));
    }

    #[test]
    fn test_derive_change_negative() {
        let (change, pct) = QuoteSnapshot::derive_change(dec!(95.00), dec!(100.00));
        assert_eq!(change, dec!(-5.00));
        assert_eq!(pct, dec!(-5.00));
    }

    #[test]
    fn test_derive_change_zero_previous_close() {
        let (change, pct) = QuoteSnapshot::derive_change(dec!(10.00), Decimal::ZERO);
        assert_eq!(change, dec!(10.00));
        assert_eq!(pct, Decimal::ZERO);
    }

    #[test]
    fn test_serialize_camel_case() {
        let snapshot = QuoteSnapshot {
            symbol: "AAPL".to_string(),
            name: "Apple Inc.".to_string(),
            price: dec!(150.25),
            change: dec!(2.25),
            change_percent: dec!(1.52),
            volume: 1_000_000,
            market_cap: 2_500_000_000_000,
            pe: dec!(28.5),
            high52: dec!(182.94),
            low52: dec!(124.17),
            open: dec!(148.50),
            previous_close: dec!(148.00),
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["symbol"], "AAPL");
        assert!(json.get("changePercent").is_some());
        assert!(json.get("marketCap").is_some());
        assert!(json.get("previousClose").is_some());
        assert!(json.get("high52").is_some());
        assert!(json.get("change_percent").is_none());
    }
}
