//! Return, risk, and correlation statistics over a price series
//!
//! All functions sort or pair their own input and signal data-shape problems
//! through [`MetricError`] or a documented fallback constant instead of letting
//! `NaN`/`Infinity` escape.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::point::{NormalizedPoint, PricePoint};

/// Trading days used to annualize daily statistics.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Default annual risk-free rate for the Sharpe ratio.
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

/// Why a metric could not be derived from the given series
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MetricError {
    /// Fewer points than the metric needs
    #[error("insufficient data: {required} points required, {available} available")]
    InsufficientData { required: usize, available: usize },

    /// The series does not reach back far enough for the requested horizon
    #[error("no observation at or before the {horizon_years}-year lookback date")]
    OutOfRangeHorizon { horizon_years: f64 },

    /// A base price of zero would divide the calculation
    #[error("division by zero: base price is zero")]
    DivisionByZero,
}

/// Absolute and compounded return over a lookback horizon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnMetric {
    pub horizon_years: f64,
    pub absolute_return_pct: f64,
    pub cagr_pct: f64,
}

/// Return over `horizon_years` measured against `as_of`.
///
/// The series is sorted descending by date; `latest` is the most recent point
/// and the comparison point is the newest one dated at or before
/// `as_of - horizon_years * 365 days`. A series that does not reach that far
/// back yields [`MetricError::OutOfRangeHorizon`] so callers skip the horizon
/// rather than fabricate a zero.
pub fn horizon_return(
    series: &[PricePoint],
    horizon_years: f64,
    as_of: NaiveDate,
) -> Result<ReturnMetric, MetricError> {
    if series.is_empty() {
        return Err(MetricError::InsufficientData {
            required: 1,
            available: 0,
        });
    }

    let mut sorted: Vec<&PricePoint> = series.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));

    let latest = sorted[0];
    let lookback_days = (horizon_years * 365.0).round() as i64;
    let target = as_of - Duration::days(lookback_days);

    let old = sorted
        .iter()
        .find(|p| p.date <= target)
        .ok_or(MetricError::OutOfRangeHorizon { horizon_years })?;

    if old.close == 0.0 {
        return Err(MetricError::DivisionByZero);
    }

    let absolute_return_pct = (latest.close - old.close) / old.close * 100.0;
    let cagr_pct = ((latest.close / old.close).powf(1.0 / horizon_years) - 1.0) * 100.0;

    Ok(ReturnMetric {
        horizon_years,
        absolute_return_pct,
        cagr_pct,
    })
}

/// Annualized volatility (percent) over the trailing `window_days` points.
///
/// Sorts descending, truncates to the window, then takes the population
/// standard deviation of period-over-period returns, annualized by
/// `sqrt(252)`. A window shorter than the series is fine; fewer than two
/// remaining points is [`MetricError::InsufficientData`].
pub fn volatility(series: &[PricePoint], window_days: usize) -> Result<f64, MetricError> {
    let mut sorted: Vec<&PricePoint> = series.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(window_days);

    if sorted.len() < 2 {
        return Err(MetricError::InsufficientData {
            required: 2,
            available: sorted.len(),
        });
    }

    let mut returns = Vec::with_capacity(sorted.len() - 1);
    for pair in sorted.windows(2) {
        let (current, previous) = (pair[0].close, pair[1].close);
        if previous == 0.0 {
            return Err(MetricError::DivisionByZero);
        }
        returns.push((current - previous) / previous);
    }

    Ok(population_std_dev(&returns) * TRADING_DAYS_PER_YEAR.sqrt() * 100.0)
}

/// Annualized volatility (percent) of closes already in positional order.
///
/// Variant used for per-symbol performance metrics where the window is the
/// whole fetched range. Returns 0.0 below two points.
pub fn annualized_volatility(closes: &[f64]) -> f64 {
    let returns = daily_returns(closes);
    if returns.is_empty() {
        return 0.0;
    }
    population_std_dev(&returns) * TRADING_DAYS_PER_YEAR.sqrt() * 100.0
}

/// Maximum peak-to-trough decline, as a percent of the peak.
///
/// Expects prices in ascending time order. Non-decreasing and all-equal
/// series yield 0.
pub fn max_drawdown(prices: &[f64]) -> f64 {
    let Some(&first) = prices.first() else {
        return 0.0;
    };

    let mut peak = first;
    let mut max_dd = 0.0_f64;
    for &price in prices {
        if price > peak {
            peak = price;
        }
        if peak > 0.0 {
            let drawdown = (peak - price) / peak;
            if drawdown > max_dd {
                max_dd = drawdown;
            }
        }
    }
    max_dd * 100.0
}

/// Sharpe ratio of daily returns against an annual risk-free rate.
///
/// Defined as 0 for constant series (zero standard deviation) and for series
/// too short to produce a return.
pub fn sharpe_ratio(prices: &[f64], risk_free_rate_annual: f64) -> f64 {
    let returns = daily_returns(prices);
    if returns.is_empty() {
        return 0.0;
    }

    let avg = mean(&returns);
    let excess = avg - risk_free_rate_annual / TRADING_DAYS_PER_YEAR;
    let std_dev = population_std_dev(&returns);

    if std_dev == 0.0 { 0.0 } else { excess / std_dev }
}

/// Pearson correlation coefficient between two close series.
///
/// Pairs elements positionally over the first `min(len)` entries rather than
/// joining on dates; series with mismatched trading calendars are therefore
/// compared slightly out of phase. Returns 0 when either series has zero
/// variance.
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }

    let x = &x[..n];
    let y = &y[..n];
    let nf = n as f64;

    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    let sum_xx: f64 = x.iter().map(|a| a * a).sum();
    let sum_yy: f64 = y.iter().map(|b| b * b).sum();

    let numerator = nf * sum_xy - sum_x * sum_y;
    let denominator = ((nf * sum_xx - sum_x * sum_x) * (nf * sum_yy - sum_y * sum_y)).sqrt();

    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Rebase every close to `100 * close / first_close`.
///
/// A zero first close falls back to a divisor of 1 so overlay charts degrade
/// instead of dividing by zero. Input order is preserved.
pub fn normalize(series: &[PricePoint]) -> Vec<NormalizedPoint> {
    let base = match series.first() {
        Some(p) if p.close != 0.0 => p.close,
        Some(_) => 1.0,
        None => return Vec::new(),
    };

    series
        .iter()
        .map(|p| NormalizedPoint {
            date: p.date,
            close: p.close,
            normalized_price: p.close / base * 100.0,
            percent_change: (p.close - base) / base * 100.0,
        })
        .collect()
}

/// First-to-last percent change of closes in positional order.
///
/// 0 when the series is shorter than two points or starts at zero.
pub fn total_return_pct(prices: &[f64]) -> f64 {
    match (prices.first(), prices.last()) {
        (Some(&first), Some(&last)) if prices.len() >= 2 && first != 0.0 => {
            (last - first) / first * 100.0
        }
        _ => 0.0,
    }
}

fn daily_returns(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .filter(|pair| pair[0] != 0.0)
        .map(|pair| (pair[1] - pair[0]) / pair[0])
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}
