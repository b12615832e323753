//! Data source boundaries
//!
//! The engine depends on these traits rather than on concrete clients, so
//! tests can inject canned data and alternative providers can be dropped in
//! without touching report assembly.

use crate::api::polygon::NewsArticle;
use crate::api::{FundApiClient, PolygonClient};
use crate::error::Result;
use async_trait::async_trait;
use catalyst_series::{FundProfile, PricePoint};
use chrono::NaiveDate;

/// A provider of daily price series and ticker news
///
/// An empty vec is a legitimate answer for a symbol with no data in the
/// window; the analytics core degrades to its insufficient-data paths.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SeriesSource: Send + Sync {
    /// Fetch the daily series for `symbol` between `from` and `to` inclusive
    async fn daily_series(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>>;

    /// Fetch up to `limit` recent news articles for `symbol`
    async fn recent_news(&self, symbol: &str, limit: u32) -> Result<Vec<NewsArticle>>;
}

#[async_trait]
impl SeriesSource for PolygonClient {
    async fn daily_series(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>> {
        self.daily_aggregates(symbol, from, to).await
    }

    async fn recent_news(&self, symbol: &str, limit: u32) -> Result<Vec<NewsArticle>> {
        self.news(symbol, limit).await
    }
}

/// A provider of mutual-fund NAV histories
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FundSource: Send + Sync {
    /// Fetch the fund profile and full NAV history for a scheme code
    async fn nav_history(&self, scheme_code: u32) -> Result<(FundProfile, Vec<PricePoint>)>;
}

#[async_trait]
impl FundSource for FundApiClient {
    async fn nav_history(&self, scheme_code: u32) -> Result<(FundProfile, Vec<PricePoint>)> {
        FundApiClient::nav_history(self, scheme_code).await
    }
}
