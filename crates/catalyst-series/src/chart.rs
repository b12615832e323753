//! Chart-ready shapes derived from a price series

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use crate::point::PricePoint;

/// A chart type that is not part of the supported set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown chart type: {0}. Supported: snakey, line, candlestick, area")]
pub struct UnknownChartKind(pub String);

/// The closed set of chart renderings a request may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Snakey,
    Line,
    Candlestick,
    Area,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Snakey => "snakey",
            Self::Line => "line",
            Self::Candlestick => "candlestick",
            Self::Area => "area",
        };
        f.write_str(name)
    }
}

impl FromStr for ChartKind {
    type Err = UnknownChartKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "snakey" => Ok(Self::Snakey),
            "line" => Ok(Self::Line),
            "candlestick" => Ok(Self::Candlestick),
            "area" => Ok(Self::Area),
            other => Err(UnknownChartKind(other.to_string())),
        }
    }
}

/// Price bounds of a fetched window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
    pub current: f64,
}

/// Min low, max high, and latest close of a series in chronological order.
///
/// Points without OHLC fall back to their close. An empty series yields zeros
/// so report assembly keeps its shape.
pub fn price_range(series: &[PricePoint]) -> PriceRange {
    if series.is_empty() {
        return PriceRange {
            min: 0.0,
            max: 0.0,
            current: 0.0,
        };
    }

    let min = series
        .iter()
        .map(|p| p.low.unwrap_or(p.close))
        .fold(f64::INFINITY, f64::min);
    let max = series
        .iter()
        .map(|p| p.high.unwrap_or(p.close))
        .fold(f64::NEG_INFINITY, f64::max);
    let current = series.last().map_or(0.0, |p| p.close);

    PriceRange { min, max, current }
}

/// Build the renderer-facing config for one symbol and chart kind.
///
/// The series shape follows the kind: snake paths plot close over index,
/// candlesticks carry OHLC rows, line and area charts carry dated closes.
pub fn chart_config(symbol: &str, series: &[PricePoint], kind: ChartKind) -> Value {
    let series_entry = match kind {
        ChartKind::Snakey => json!({
            "name": "Snake Path",
            "type": "line",
            "data": series
                .iter()
                .enumerate()
                .map(|(i, p)| json!([i, p.close]))
                .collect::<Vec<_>>(),
            "curve": "smooth",
            "strokeWidth": 3,
            "gradient": true,
        }),
        ChartKind::Candlestick => json!({
            "name": symbol,
            "type": "candlestick",
            "data": series
                .iter()
                .map(|p| {
                    json!([
                        p.date,
                        p.open.unwrap_or(p.close),
                        p.high.unwrap_or(p.close),
                        p.low.unwrap_or(p.close),
                        p.close,
                    ])
                })
                .collect::<Vec<_>>(),
        }),
        ChartKind::Line | ChartKind::Area => json!({
            "name": symbol,
            "type": kind.to_string(),
            "data": series
                .iter()
                .map(|p| json!([p.date, p.close]))
                .collect::<Vec<_>>(),
        }),
    };

    json!({
        "title": format!("{} - {} Chart", symbol, kind.to_string().to_uppercase()),
        "xAxis": { "type": "datetime", "title": "Date" },
        "yAxis": { "title": "Price ($)" },
        "series": [series_entry],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::testutil::point;

    #[test]
    fn chart_kind_parse_is_a_closed_set() {
        assert_eq!("snakey".parse::<ChartKind>(), Ok(ChartKind::Snakey));
        assert_eq!("LINE".parse::<ChartKind>(), Ok(ChartKind::Line));

        let err = "spiral".parse::<ChartKind>().unwrap_err();
        assert_eq!(err, UnknownChartKind("spiral".to_string()));
    }

    #[test]
    fn price_range_falls_back_to_close_without_ohlc() {
        let series = vec![
            point(2024, 1, 1, 100.0),
            point(2024, 1, 2, 90.0),
            point(2024, 1, 3, 110.0),
        ];

        let range = price_range(&series);
        assert_eq!(range.min, 90.0);
        assert_eq!(range.max, 110.0);
        assert_eq!(range.current, 110.0);
    }

    #[test]
    fn price_range_uses_highs_and_lows_when_present() {
        let mut p = point(2024, 1, 1, 100.0);
        p.high = Some(105.0);
        p.low = Some(95.0);

        let range = price_range(&[p]);
        assert_eq!(range.min, 95.0);
        assert_eq!(range.max, 105.0);
        assert_eq!(range.current, 100.0);
    }

    #[test]
    fn price_range_empty_series_is_zeroed() {
        let range = price_range(&[]);
        assert_eq!((range.min, range.max, range.current), (0.0, 0.0, 0.0));
    }

    #[test]
    fn snakey_config_plots_close_over_index() {
        let series = vec![point(2024, 1, 1, 100.0), point(2024, 1, 2, 102.0)];
        let config = chart_config("AAPL", &series, ChartKind::Snakey);

        assert_eq!(config["title"], "AAPL - SNAKEY Chart");
        let data = &config["series"][0]["data"];
        assert_eq!(data[0][0], 0);
        assert_eq!(data[1][1], 102.0);
    }

    #[test]
    fn candlestick_config_carries_ohlc_rows() {
        let mut p = point(2024, 1, 1, 100.0);
        p.open = Some(98.0);
        p.high = Some(101.0);
        p.low = Some(97.0);

        let config = chart_config("MSFT", &[p], ChartKind::Candlestick);
        let row = &config["series"][0]["data"][0];
        assert_eq!(row[1], 98.0);
        assert_eq!(row[4], 100.0);
    }

    #[test]
    fn line_config_carries_dated_closes() {
        let series = vec![point(2024, 1, 1, 100.0)];
        let config = chart_config("TSLA", &series, ChartKind::Line);

        assert_eq!(config["series"][0]["type"], "line");
        assert_eq!(config["series"][0]["data"][0][1], 100.0);
    }
}
