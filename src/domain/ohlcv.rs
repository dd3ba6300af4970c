//! OHLCV bar representation.

use chrono::NaiveDate;

/// Base column names of a price frame, in frame order.
pub const OHLCV_COLUMNS: [&str; 5] = ["open", "high", "low", "close", "volume"];

#[derive(Debug, Clone, PartialEq)]
pub struct OhlcvBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl OhlcvBar {
    /// Field value by base column name.
    pub fn field(&self, name: &str) -> Option<f64> {
        match name {
            "open" => Some(self.open),
            "high" => Some(self.high),
            "low" => Some(self.low),
            "close" => Some(self.close),
            "volume" => Some(self.volume),
            _ => None,
        }
    }
}
