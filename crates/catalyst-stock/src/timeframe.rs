//! Request timeframes and their date windows

use crate::error::CatalystError;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of supported lookback windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    OneDay,
    FiveDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
    YearToDate,
    Max,
}

impl Timeframe {
    /// Start of the window that ends at `end`
    pub fn start_date(self, end: NaiveDate) -> NaiveDate {
        match self {
            Timeframe::OneDay => end - Duration::days(1),
            Timeframe::FiveDays => end - Duration::days(5),
            Timeframe::OneMonth => end - Duration::days(30),
            Timeframe::ThreeMonths => end - Duration::days(90),
            Timeframe::SixMonths => end - Duration::days(180),
            Timeframe::OneYear => end - Duration::days(365),
            Timeframe::TwoYears => end - Duration::days(730),
            Timeframe::FiveYears => end - Duration::days(1825),
            Timeframe::YearToDate => {
                NaiveDate::from_ymd_opt(end.year(), 1, 1).unwrap_or(end)
            }
            // ~100 years, effectively "everything"
            Timeframe::Max => end - Duration::days(36_500),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Timeframe::OneDay => "1d",
            Timeframe::FiveDays => "5d",
            Timeframe::OneMonth => "1mo",
            Timeframe::ThreeMonths => "3mo",
            Timeframe::SixMonths => "6mo",
            Timeframe::OneYear => "1y",
            Timeframe::TwoYears => "2y",
            Timeframe::FiveYears => "5y",
            Timeframe::YearToDate => "ytd",
            Timeframe::Max => "max",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = CatalystError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "1d" => Ok(Timeframe::OneDay),
            "5d" => Ok(Timeframe::FiveDays),
            "1mo" | "1m" => Ok(Timeframe::OneMonth),
            "3mo" | "3m" => Ok(Timeframe::ThreeMonths),
            "6mo" | "6m" => Ok(Timeframe::SixMonths),
            "1y" => Ok(Timeframe::OneYear),
            "2y" => Ok(Timeframe::TwoYears),
            "5y" => Ok(Timeframe::FiveYears),
            "ytd" => Ok(Timeframe::YearToDate),
            "max" => Ok(Timeframe::Max),
            other => Err(CatalystError::UnknownTimeframe(other.to_string())),
        }
    }
}
