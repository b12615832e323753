//! Pure report assembly: correlation tables, performance maps, fund metrics
//!
//! Everything here operates on already-fetched series. Missing data shows up
//! as absent fields in the output, never as an error, so the report shape
//! stays stable for downstream consumers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregate::{self, RiskRewardPoint, YearBucket, round2};
use crate::point::PricePoint;
use crate::stats::{self, DEFAULT_RISK_FREE_RATE, ReturnMetric};

/// Correlation between one unordered pair of series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationEntry {
    pub symbol_a: String,
    pub symbol_b: String,
    pub coefficient: f64,
}

impl CorrelationEntry {
    /// `A_B` key used in correlation tables and insight strings.
    pub fn key(&self) -> String {
        format!("{}_{}", self.symbol_a, self.symbol_b)
    }
}

/// Per-symbol summary statistics for a comparison report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub total_return_pct: f64,
    pub volatility_pct: f64,
    pub max_drawdown_pct: f64,
    pub sharpe_ratio: f64,
}

/// Correlations for every unordered pair of the given series, in input order.
pub fn correlation_map(series: &[(String, Vec<f64>)]) -> Vec<CorrelationEntry> {
    let mut entries = Vec::new();
    for i in 0..series.len() {
        for j in i + 1..series.len() {
            let (ref symbol_a, ref closes_a) = series[i];
            let (ref symbol_b, ref closes_b) = series[j];
            entries.push(CorrelationEntry {
                symbol_a: symbol_a.clone(),
                symbol_b: symbol_b.clone(),
                coefficient: stats::pearson_correlation(closes_a, closes_b),
            });
        }
    }
    entries
}

/// Summary statistics for one symbol's closes in chronological order.
pub fn performance_metrics(closes: &[f64]) -> PerformanceMetrics {
    PerformanceMetrics {
        total_return_pct: stats::total_return_pct(closes),
        volatility_pct: stats::annualized_volatility(closes),
        max_drawdown_pct: stats::max_drawdown(closes),
        sharpe_ratio: stats::sharpe_ratio(closes, DEFAULT_RISK_FREE_RATE),
    }
}

/// Highest/lowest correlation insight strings.
///
/// Ties are broken by the first entry encountered in iteration order; this is
/// a deliberate policy so the output is deterministic and testable. No pairs
/// means no insights.
pub fn comparison_insights(correlations: &[CorrelationEntry]) -> Vec<String> {
    let Some(first) = correlations.first() else {
        return Vec::new();
    };

    let mut highest = first;
    let mut lowest = first;
    for entry in correlations {
        if entry.coefficient > highest.coefficient {
            highest = entry;
        }
        if entry.coefficient < lowest.coefficient {
            lowest = entry;
        }
    }

    vec![
        format!(
            "Highest correlation: {} ({:.2}%)",
            highest.key(),
            highest.coefficient * 100.0
        ),
        format!(
            "Lowest correlation: {} ({:.2}%)",
            lowest.key(),
            lowest.coefficient * 100.0
        ),
    ]
}

/// Static identity of a mutual fund scheme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundProfile {
    pub scheme_name: String,
    pub fund_house: String,
    pub category: String,
    pub scheme_type: String,
}

/// Everything derivable from a fund's NAV history
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundMetrics {
    pub current_nav: Option<f64>,
    pub returns_1y: Option<ReturnMetric>,
    pub returns_3y: Option<ReturnMetric>,
    pub returns_5y: Option<ReturnMetric>,
    pub volatility_pct: Option<f64>,
    /// Whole years of history available
    pub track_record_years: i64,
    pub data_points: usize,
    pub treemap: Vec<YearBucket>,
    pub risk_reward: Vec<RiskRewardPoint>,
}

/// Derive the full fund metric set from a NAV series.
///
/// Each horizon return is independently optional; a young fund simply has
/// fewer defined horizons. Returns and volatility are rounded to two decimals
/// for presentation, matching the report tables.
pub fn fund_metrics(series: &[PricePoint], as_of: NaiveDate) -> FundMetrics {
    let returns_1y = rounded_return(series, 1.0, as_of);
    let returns_3y = rounded_return(series, 3.0, as_of);
    let returns_5y = rounded_return(series, 5.0, as_of);
    let volatility_pct = stats::volatility(series, 365).ok().map(round2);

    let mut sorted: Vec<&PricePoint> = series.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    let current_nav = sorted.first().map(|p| p.close);

    let treemap = aggregate::monthly_returns_treemap(series);
    let risk_reward = aggregate::risk_reward_series(
        series,
        returns_1y.as_ref(),
        returns_3y.as_ref(),
        returns_5y.as_ref(),
    );

    FundMetrics {
        current_nav,
        returns_1y,
        returns_3y,
        returns_5y,
        volatility_pct,
        track_record_years: (series.len() / 365) as i64,
        data_points: series.len(),
        treemap,
        risk_reward,
    }
}

fn rounded_return(series: &[PricePoint], years: f64, as_of: NaiveDate) -> Option<ReturnMetric> {
    stats::horizon_return(series, years, as_of)
        .ok()
        .map(|m| ReturnMetric {
            horizon_years: m.horizon_years,
            absolute_return_pct: round2(m.absolute_return_pct),
            cagr_pct: round2(m.cagr_pct),
        })
}

/// Heatmap and risk/reward insight lines for prompts and report footers.
pub fn fund_chart_insights(metrics: &FundMetrics) -> Vec<String> {
    let mut lines = Vec::new();

    let cells: Vec<(i32, &str, f64)> = metrics
        .treemap
        .iter()
        .flat_map(|bucket| {
            bucket
                .months
                .iter()
                .map(|m| (bucket.year, m.label, m.return_pct))
        })
        .collect();

    if cells.is_empty() {
        lines.push("- Heatmap: insufficient data".to_string());
    } else {
        let mut best = cells[0];
        let mut worst = cells[0];
        for cell in &cells {
            if cell.2 > best.2 {
                best = *cell;
            }
            if cell.2 < worst.2 {
                worst = *cell;
            }
        }
        let last12 = &cells[cells.len().saturating_sub(12)..];
        let avg12 = round2(last12.iter().map(|c| c.2).sum::<f64>() / last12.len() as f64);
        lines.push(format!(
            "- Heatmap: avg last 12m {avg12}%, best {} {} {}%, worst {} {} {}%",
            best.1, best.0, best.2, worst.1, worst.0, worst.2
        ));
    }

    if metrics.risk_reward.is_empty() {
        lines.push("- Risk/Reward: insufficient data".to_string());
    } else {
        let parts: Vec<String> = metrics
            .risk_reward
            .iter()
            .map(|p| {
                format!(
                    "{}: reward {}% vs risk {}% (ratio {})",
                    p.period,
                    round2(p.reward),
                    round2(p.risk),
                    p.ratio
                )
            })
            .collect();
        lines.push(format!("- Risk/Reward: {}", parts.join(", ")));
    }

    lines
}

/// Render the fund report as markdown tables plus the agent narrative.
pub fn fund_markdown(profile: &FundProfile, metrics: &FundMetrics, analysis: &str) -> String {
    let fmt_return = |metric: &Option<ReturnMetric>| -> (String, String) {
        match metric {
            Some(m) => (m.absolute_return_pct.to_string(), m.cagr_pct.to_string()),
            None => ("N/A".to_string(), "N/A".to_string()),
        }
    };
    let (abs_1y, cagr_1y) = fmt_return(&metrics.returns_1y);
    let (abs_3y, cagr_3y) = fmt_return(&metrics.returns_3y);
    let (abs_5y, cagr_5y) = fmt_return(&metrics.returns_5y);

    let volatility = metrics
        .volatility_pct
        .map_or_else(|| "N/A".to_string(), |v| v.to_string());
    let nav = metrics
        .current_nav
        .map_or_else(|| "N/A".to_string(), |v| v.to_string());

    let mut out = String::new();
    out.push_str("**Fund Details**\n\n");
    out.push_str("| Field | Value |\n|-------|-------|\n");
    out.push_str(&format!("| Name | {} |\n", profile.scheme_name));
    out.push_str(&format!("| Fund House | {} |\n", profile.fund_house));
    out.push_str(&format!("| Category | {} |\n", profile.category));
    out.push_str(&format!("| Type | {} |\n", profile.scheme_type));
    out.push_str(&format!("| Current NAV | ₹{nav} |\n\n"));

    out.push_str("**Performance Metrics**\n\n");
    out.push_str("| Period | Absolute Return (%) | CAGR (%) |\n");
    out.push_str("|--------|--------------------|----------|\n");
    out.push_str(&format!("| 1 Year | {abs_1y} | {cagr_1y} |\n"));
    out.push_str(&format!("| 3 Year | {abs_3y} | {cagr_3y} |\n"));
    out.push_str(&format!("| 5 Year | {abs_5y} | {cagr_5y} |\n\n"));

    out.push_str("**Risk Metrics**\n\n");
    out.push_str("| Metric | Value |\n|--------|-------|\n");
    out.push_str(&format!("| Annualized Volatility | {volatility}% |\n"));
    out.push_str(&format!(
        "| Track Record | {} years |\n",
        metrics.track_record_years
    ));
    out.push_str(&format!("| Data Points | {} |\n\n", metrics.data_points));

    out.push_str("**Charts Summary**\n\n");
    for line in fund_chart_insights(metrics) {
        out.push_str(&line);
        out.push('\n');
    }
    out.push('\n');

    out.push_str("**Agent Analysis**\n\n");
    out.push_str(analysis.trim());
    out.push('\n');

    out
}
