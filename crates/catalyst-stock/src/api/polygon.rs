//! Polygon.io API client
//!
//! Fetches daily aggregate bars and ticker news. Bars arrive as epoch
//! milliseconds plus OHLCV fields and are mapped into [`PricePoint`]s.

use crate::error::{CatalystError, Result};
use catalyst_series::PricePoint;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.polygon.io";

/// Polygon API client
#[derive(Debug, Clone)]
pub struct PolygonClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// One daily aggregate bar as returned by the aggregates endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct AggBar {
    /// Epoch milliseconds of the bar's start
    pub t: i64,
    pub o: Option<f64>,
    pub h: Option<f64>,
    pub l: Option<f64>,
    pub c: f64,
    pub v: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct AggsResponse {
    #[serde(default)]
    results: Vec<AggBar>,
    #[serde(default)]
    status: Option<String>,
}

/// A news article for a ticker
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub published_utc: Option<String>,
    #[serde(default)]
    pub article_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    results: Vec<NewsArticle>,
}

impl PolygonClient {
    /// Create a new client with the given API key
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the base URL (for tests against a local server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch daily aggregate bars for a symbol over a date range
    pub async fn daily_aggregates(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>> {
        let url = format!(
            "{}/v2/aggs/ticker/{}/range/1/day/{}/{}",
            self.base_url, symbol, from, to
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("adjusted", "true"),
                ("sort", "asc"),
                ("limit", "50000"),
                ("apiKey", &self.api_key),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CatalystError::ApiError(format!(
                "Polygon HTTP error: {}",
                response.status()
            )));
        }

        let data: AggsResponse = response.json().await?;

        if let Some(status) = &data.status {
            if status == "ERROR" {
                return Err(CatalystError::ApiError(format!(
                    "Polygon rejected request for {symbol}"
                )));
            }
        }

        Ok(bars_to_points(&data.results))
    }

    /// Fetch recent news articles for a symbol
    pub async fn news(&self, symbol: &str, limit: u32) -> Result<Vec<NewsArticle>> {
        let url = format!("{}/v2/reference/news", self.base_url);
        let limit = limit.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("ticker", symbol),
                ("limit", limit.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CatalystError::ApiError(format!(
                "Polygon news HTTP error: {}",
                response.status()
            )));
        }

        let data: NewsResponse = response.json().await?;
        Ok(data.results)
    }
}

/// Map aggregate bars to price points, dropping bars with unrepresentable
/// timestamps.
fn bars_to_points(bars: &[AggBar]) -> Vec<PricePoint> {
    bars.iter()
        .filter_map(|bar| {
            let date = DateTime::<Utc>::from_timestamp_millis(bar.t)?.date_naive();
            Some(PricePoint {
                date,
                open: bar.o,
                high: bar.h,
                low: bar.l,
                close: bar.c,
                volume: bar.v.map(|v| v as u64),
            })
        })
        .collect()
}
