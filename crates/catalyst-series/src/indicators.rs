//! Technical indicators over a close series
//!
//! Outputs are index-aligned with their input; entries that lack a full
//! trailing window are `None`, never zero or extrapolated.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::point::PricePoint;

/// Default RSI lookback.
pub const DEFAULT_RSI_PERIOD: usize = 14;

/// Moving-average windows included when the MA indicator is requested.
pub const MA_PERIODS: [usize; 2] = [20, 50];

/// An indicator name that is not part of the supported set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown indicator: {0}. Supported: MA, RSI")]
pub struct UnknownIndicator(pub String);

/// The closed set of chart indicators a request may ask for.
///
/// Unknown flags are rejected at parse time rather than silently ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Indicator {
    MovingAverage,
    Rsi,
}

impl FromStr for Indicator {
    type Err = UnknownIndicator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "MA" => Ok(Self::MovingAverage),
            "RSI" => Ok(Self::Rsi),
            other => Err(UnknownIndicator(other.to_string())),
        }
    }
}

/// Trailing simple moving average of `closes`.
///
/// The first `period - 1` entries are `None` (insufficient window). A zero
/// period produces all-`None` output.
pub fn moving_average(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; closes.len()];
    }

    closes
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i + 1 < period {
                None
            } else {
                let window = &closes[i + 1 - period..=i];
                Some(window.iter().sum::<f64>() / period as f64)
            }
        })
        .collect()
}

/// RSI approximated with simple moving averages of gains and losses.
///
/// The output is aligned to the per-step change series, so it has
/// `closes.len() - 1` entries, of which the first `period - 1` are `None`.
/// When the trailing average loss is zero the RSI is pinned to 100 rather
/// than dividing by zero.
pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if closes.len() < 2 || period == 0 {
        return Vec::new();
    }

    let mut gains = Vec::with_capacity(closes.len() - 1);
    let mut losses = Vec::with_capacity(closes.len() - 1);
    for pair in closes.windows(2) {
        let change = pair[1] - pair[0];
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    gains
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i + 1 < period {
                None
            } else {
                let window = i + 1 - period..=i;
                let avg_gain = gains[window.clone()].iter().sum::<f64>() / period as f64;
                let avg_loss = losses[window].iter().sum::<f64>() / period as f64;
                if avg_loss == 0.0 {
                    Some(100.0)
                } else {
                    Some(100.0 - 100.0 / (1.0 + avg_gain / avg_loss))
                }
            }
        })
        .collect()
}

/// One coordinate of the snake-path chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnakePoint {
    /// Position in the series
    pub x: usize,
    /// Close at that position
    pub y: f64,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<u64>,
    /// Discrete second difference, 0 at both endpoints
    pub curvature: f64,
}

/// Snake-path coordinates for a series in chronological order.
pub fn snake_coordinates(series: &[PricePoint]) -> Vec<SnakePoint> {
    series
        .iter()
        .enumerate()
        .map(|(i, p)| SnakePoint {
            x: i,
            y: p.close,
            date: p.date,
            volume: p.volume,
            curvature: curvature_at(series, i),
        })
        .collect()
}

fn curvature_at(series: &[PricePoint], index: usize) -> f64 {
    if index == 0 || index + 1 >= series.len() {
        return 0.0;
    }
    let prev = series[index - 1].close;
    let curr = series[index].close;
    let next = series[index + 1].close;
    ((next - curr) - (curr - prev)) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::testutil::point;

    #[test]
    fn indicator_parse_is_a_closed_set() {
        assert_eq!("MA".parse::<Indicator>(), Ok(Indicator::MovingAverage));
        assert_eq!("rsi".parse::<Indicator>(), Ok(Indicator::Rsi));

        let err = "MACD".parse::<Indicator>().unwrap_err();
        assert_eq!(err, UnknownIndicator("MACD".to_string()));
    }

    #[test]
    fn moving_average_leading_entries_are_none() {
        let closes = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ma = moving_average(&closes, 3);

        assert_eq!(ma[0], None);
        assert_eq!(ma[1], None);
        assert_eq!(ma[2], Some(2.0));
        assert_eq!(ma[3], Some(3.0));
        assert_eq!(ma[4], Some(4.0));
    }

    #[test]
    fn moving_average_period_longer_than_series() {
        let closes = [1.0, 2.0];
        assert_eq!(moving_average(&closes, 5), vec![None, None]);
        assert_eq!(moving_average(&closes, 0), vec![None, None]);
    }

    #[test]
    fn rsi_pins_to_100_on_strictly_increasing_series() {
        let closes: Vec<f64> = (1..=20).map(f64::from).collect();
        let values = rsi(&closes, DEFAULT_RSI_PERIOD);

        // 19 change entries; the first 13 lack a full window.
        assert_eq!(values.len(), 19);
        assert!(values[..13].iter().all(Option::is_none));
        assert!(values[13..].iter().all(|v| *v == Some(100.0)));
    }

    #[test]
    fn rsi_neutral_on_alternating_series() {
        // Equal average gain and loss puts RSI at 50.
        let closes = [10.0, 11.0, 10.0, 11.0, 10.0, 11.0, 10.0];
        let values = rsi(&closes, 2);

        for value in values.iter().flatten() {
            assert!((value - 50.0).abs() < 1e-9);
        }
    }

    #[test]
    fn rsi_short_series_is_empty() {
        assert!(rsi(&[100.0], 14).is_empty());
        assert!(rsi(&[], 14).is_empty());
    }

    #[test]
    fn snake_curvature_zero_at_endpoints() {
        let series = vec![
            point(2024, 1, 1, 100.0),
            point(2024, 1, 2, 104.0),
            point(2024, 1, 3, 102.0),
            point(2024, 1, 4, 108.0),
        ];

        let coords = snake_coordinates(&series);
        assert_eq!(coords.len(), 4);
        assert_eq!(coords[0].curvature, 0.0);
        assert_eq!(coords[3].curvature, 0.0);

        // Interior: ((102-104) - (104-100)) / 2 = -3
        assert!((coords[1].curvature + 3.0).abs() < 1e-9);
        assert_eq!(coords[1].x, 1);
        assert_eq!(coords[1].y, 104.0);
    }

    #[test]
    fn snake_coordinates_carry_volume() {
        let mut p = point(2024, 1, 1, 100.0);
        p.volume = Some(12_345);
        let coords = snake_coordinates(&[p]);
        assert_eq!(coords[0].volume, Some(12_345));
        assert_eq!(coords[0].curvature, 0.0);
    }
}
