//! Calendar aggregation of a price series
//!
//! Builds the monthly-returns treemap and the per-horizon risk/reward points
//! used by the fund report, plus the history floor filter.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::point::PricePoint;
use crate::stats::{self, ReturnMetric};

/// Trailing volatility windows matching the 1/3/5-year return horizons, in days.
pub const RISK_WINDOWS_DAYS: [usize; 3] = [365, 1095, 1825];

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Direction of a monthly return; zero is its own category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sign {
    Positive,
    Negative,
    Zero,
}

impl Sign {
    fn of(value: f64) -> Self {
        if value > 0.0 {
            Self::Positive
        } else if value < 0.0 {
            Self::Negative
        } else {
            Self::Zero
        }
    }
}

/// Return of one calendar month, from its first to its last observation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyReturnCell {
    /// 1-based calendar month
    pub month: u32,
    pub label: &'static str,
    pub return_pct: f64,
    pub sign: Sign,
}

/// One year of the treemap, months in chronological order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearBucket {
    pub year: i32,
    pub months: Vec<MonthlyReturnCell>,
}

/// Reward per unit of risk over one labeled horizon
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskRewardPoint {
    pub period: &'static str,
    /// Annualized volatility percent over the matching trailing window
    pub risk: f64,
    /// CAGR percent for the horizon
    pub reward: f64,
    /// `reward / risk`, 0 when risk is 0
    pub ratio: f64,
}

/// Group a series into (year, month) buckets of per-month returns.
///
/// The per-month return uses the first and last observation inside that
/// calendar month, not an average. A zero first observation yields a 0 return
/// for that month. Empty input yields an empty treemap.
pub fn monthly_returns_treemap(series: &[PricePoint]) -> Vec<YearBucket> {
    let mut sorted: Vec<&PricePoint> = series.iter().collect();
    sorted.sort_by_key(|p| p.date);

    // (year, month) -> (first close, last close); BTreeMap keeps keys chronological.
    let mut by_month: BTreeMap<(i32, u32), (f64, f64)> = BTreeMap::new();
    for p in sorted {
        let key = (p.date.year(), p.date.month());
        by_month
            .entry(key)
            .and_modify(|(_, last)| *last = p.close)
            .or_insert((p.close, p.close));
    }

    let mut buckets: Vec<YearBucket> = Vec::new();
    for ((year, month), (first, last)) in by_month {
        let return_pct = if first > 0.0 {
            round2((last - first) / first * 100.0)
        } else {
            0.0
        };
        let cell = MonthlyReturnCell {
            month,
            label: MONTH_LABELS[(month - 1) as usize],
            return_pct,
            sign: Sign::of(return_pct),
        };
        match buckets.last_mut() {
            Some(bucket) if bucket.year == year => bucket.months.push(cell),
            _ => buckets.push(YearBucket {
                year,
                months: vec![cell],
            }),
        }
    }
    buckets
}

/// Build one risk/reward point per horizon with a defined return metric.
///
/// Horizons whose return is absent are skipped entirely, never emitted as
/// zero-filled placeholders. Risk falls back to 0 when the volatility window
/// itself has too little data.
pub fn risk_reward_series(
    series: &[PricePoint],
    one_year: Option<&ReturnMetric>,
    three_year: Option<&ReturnMetric>,
    five_year: Option<&ReturnMetric>,
) -> Vec<RiskRewardPoint> {
    let horizons = [
        ("1Y", one_year, RISK_WINDOWS_DAYS[0]),
        ("3Y", three_year, RISK_WINDOWS_DAYS[1]),
        ("5Y", five_year, RISK_WINDOWS_DAYS[2]),
    ];

    let mut points = Vec::new();
    for (period, metric, window) in horizons {
        let Some(metric) = metric else { continue };
        let risk = stats::volatility(series, window).unwrap_or(0.0);
        let reward = metric.cagr_pct;
        let ratio = if risk == 0.0 {
            0.0
        } else {
            round2(reward / risk)
        };
        points.push(RiskRewardPoint {
            period,
            risk,
            reward,
            ratio,
        });
    }
    points
}

/// Drop every point strictly before `floor`, preserving relative order.
pub fn filter_from(series: &[PricePoint], floor: NaiveDate) -> Vec<PricePoint> {
    series.iter().filter(|p| p.date >= floor).cloned().collect()
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::testutil::{date, point};
    use crate::stats::horizon_return;

    #[test]
    fn treemap_two_months_one_year_bucket() {
        let series = vec![
            point(2023, 1, 2, 100.0),
            point(2023, 1, 31, 110.0),
            point(2023, 2, 1, 110.0),
            point(2023, 2, 28, 99.0),
        ];

        let treemap = monthly_returns_treemap(&series);
        assert_eq!(treemap.len(), 1);
        assert_eq!(treemap[0].year, 2023);
        assert_eq!(treemap[0].months.len(), 2);

        let jan = &treemap[0].months[0];
        assert_eq!((jan.month, jan.label), (1, "Jan"));
        assert!((jan.return_pct - 10.0).abs() < 1e-9);
        assert_eq!(jan.sign, Sign::Positive);

        let feb = &treemap[0].months[1];
        assert_eq!(feb.label, "Feb");
        assert!((feb.return_pct + 10.0).abs() < 1e-9);
        assert_eq!(feb.sign, Sign::Negative);
    }

    #[test]
    fn treemap_sorts_unordered_input_and_splits_years() {
        let series = vec![
            point(2024, 1, 5, 50.0),
            point(2023, 12, 29, 48.0),
            point(2023, 12, 1, 40.0),
            point(2024, 1, 31, 50.0),
        ];

        let treemap = monthly_returns_treemap(&series);
        assert_eq!(treemap.len(), 2);
        assert_eq!(treemap[0].year, 2023);
        assert_eq!(treemap[1].year, 2024);
        assert!((treemap[0].months[0].return_pct - 20.0).abs() < 1e-9);
        assert_eq!(treemap[1].months[0].sign, Sign::Zero);
    }

    #[test]
    fn treemap_empty_input_is_empty_output() {
        assert!(monthly_returns_treemap(&[]).is_empty());
    }

    #[test]
    fn treemap_single_observation_month_is_zero() {
        let series = vec![point(2023, 6, 15, 80.0)];
        let treemap = monthly_returns_treemap(&series);
        assert_eq!(treemap[0].months[0].return_pct, 0.0);
        assert_eq!(treemap[0].months[0].sign, Sign::Zero);
    }

    #[test]
    fn treemap_zero_first_close_falls_back_to_zero() {
        let series = vec![point(2023, 3, 1, 0.0), point(2023, 3, 31, 10.0)];
        let treemap = monthly_returns_treemap(&series);
        assert_eq!(treemap[0].months[0].return_pct, 0.0);
    }

    #[test]
    fn risk_reward_skips_undefined_horizons() {
        let series: Vec<_> = (0..400)
            .map(|i| {
                let d = date(2023, 1, 1) + chrono::Duration::days(i);
                point(d.year(), d.month(), d.day(), 100.0 + i as f64 * 0.1)
            })
            .collect();

        let one_year = horizon_return(&series, 1.0, date(2024, 2, 1)).ok();
        assert!(one_year.is_some());

        let points = risk_reward_series(&series, one_year.as_ref(), None, None);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].period, "1Y");
        assert!(points[0].reward > 0.0);
    }

    #[test]
    fn risk_reward_ratio_zero_when_risk_zero() {
        // Constant series: volatility 0, so ratio falls back to 0.
        let series: Vec<_> = (1..=30).map(|d| point(2024, 1, d, 100.0)).collect();
        let metric = ReturnMetric {
            horizon_years: 1.0,
            absolute_return_pct: 0.0,
            cagr_pct: 0.0,
        };

        let points = risk_reward_series(&series, Some(&metric), None, None);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].risk, 0.0);
        assert_eq!(points[0].ratio, 0.0);
    }

    #[test]
    fn filter_from_drops_older_points_keeps_order() {
        let series = vec![
            point(2018, 12, 31, 1.0),
            point(2019, 1, 1, 2.0),
            point(2020, 5, 5, 3.0),
            point(2018, 6, 1, 4.0),
        ];

        let filtered = filter_from(&series, date(2019, 1, 1));
        let closes: Vec<f64> = filtered.iter().map(|p| p.close).collect();
        assert_eq!(closes, vec![2.0, 3.0]);
    }
}
