use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One bar of a historical price series.
///
/// `price` duplicates `close` for chart consumers that only plot a
/// single line; both are kept for compatibility with the wire shape.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryBar {
    /// Bar date (YYYY-MM-DD on the wire)
    pub date: NaiveDate,

    /// Closing price of the bar
    pub price: Decimal,

    /// Trading volume (0 when unavailable)
    pub volume: u64,

    /// Opening price
    pub open: Decimal,

    /// High price
    pub high: Decimal,

    /// Low price
    pub low: Decimal,

    /// Closing price
    pub close: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_date_serializes_as_iso() {
        let bar = HistoryBar {
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            price: dec!(150.25),
            volume: 1_000_000,
            open: dec!(148.50),
            high: dec!(151.00),
            low: dec!(147.80),
            close: dec!(150.25),
        };

        let json = serde_json::to_value(&bar).unwrap();
        assert_eq!(json["date"], "2024-01-15");
        assert_eq!(json["close"], json["price"]);
    }
}
