//! Price observation value objects

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One daily observation of an instrument's price.
///
/// `close` is the canonical value all derived metrics use; OHLC and volume are
/// optional because NAV histories only carry a single value per day. A slice of
/// points from one source is not guaranteed sorted; consuming functions sort
/// for themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    pub close: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
}

impl PricePoint {
    /// Create a close-only point, as produced by NAV histories.
    pub fn close_only(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            open: None,
            high: None,
            low: None,
            close,
            volume: None,
        }
    }
}

/// A close rebased against the first observation of its series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub date: NaiveDate,
    pub close: f64,
    /// `100 * close / first_close`
    pub normalized_price: f64,
    /// Percent change relative to the first observation
    pub percent_change: f64,
}
