//! Time-series analytics for stock and mutual-fund price data
//!
//! This crate is the numeric core of the analysis service. It turns an ordered
//! sequence of dated price (or NAV) observations into derived metrics:
//!
//! - Horizon returns and CAGR over 1/3/5-year lookbacks
//! - Annualized volatility, max drawdown, Sharpe ratio
//! - Pearson correlation between series and min-max normalization
//! - Monthly-returns treemap and risk-vs-reward summary points
//! - Moving average, RSI, and snake-path chart coordinates
//! - Chart config, correlation map, and insight assembly for reports
//!
//! Every function here is pure and synchronous: no I/O, no hidden state, and
//! identical input always yields identical output. Missing or too-short data is
//! signaled through typed absent results ([`MetricError`]), never a panic, so
//! report assembly downstream can always produce a stable shape.

pub mod aggregate;
pub mod chart;
pub mod indicators;
pub mod point;
pub mod report;
pub mod stats;

// Re-export main types for convenience
pub use aggregate::{MonthlyReturnCell, RiskRewardPoint, Sign, YearBucket};
pub use chart::{ChartKind, PriceRange};
pub use indicators::{Indicator, SnakePoint};
pub use point::{NormalizedPoint, PricePoint};
pub use report::{CorrelationEntry, FundMetrics, FundProfile, PerformanceMetrics};
pub use stats::{MetricError, ReturnMetric};
