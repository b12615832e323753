//! Mutual-fund NAV history client
//!
//! The NAV API returns scheme metadata plus rows of
//! `{date: "DD-MM-YYYY", nav: "string"}`. Rows that fail to parse are
//! skipped and counted rather than failing the whole history.

use crate::error::{CatalystError, Result};
use catalyst_series::{FundProfile, PricePoint};
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://api.mfapi.in";

/// Client for the mutual-fund NAV history API
#[derive(Debug, Clone)]
pub struct FundApiClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct NavHistoryResponse {
    meta: FundMeta,
    #[serde(default)]
    data: Vec<NavRow>,
}

#[derive(Debug, Deserialize)]
struct FundMeta {
    #[serde(default)]
    fund_house: String,
    #[serde(default)]
    scheme_type: String,
    #[serde(default)]
    scheme_category: String,
    #[serde(default)]
    scheme_name: String,
}

#[derive(Debug, Deserialize)]
struct NavRow {
    date: String,
    nav: String,
}

impl FundApiClient {
    /// Create a new client
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Override the base URL (for tests against a local server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetch the full NAV history for a scheme code
    ///
    /// Returns the fund's profile and its NAV series mapped onto close-only
    /// price points. The API returns rows newest-first; the series is passed
    /// through as-is because every core function sorts for itself.
    pub async fn nav_history(&self, scheme_code: u32) -> Result<(FundProfile, Vec<PricePoint>)> {
        let url = format!("{}/mf/{}", self.base_url, scheme_code);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(CatalystError::ApiError(format!(
                "Fund API HTTP error for scheme {scheme_code}: {}",
                response.status()
            )));
        }

        let body: NavHistoryResponse = response.json().await?;
        if body.data.is_empty() {
            return Err(CatalystError::DataUnavailable {
                symbol: scheme_code.to_string(),
                reason: "No NAV history returned".to_string(),
            });
        }

        let profile = FundProfile {
            scheme_name: body.meta.scheme_name,
            fund_house: body.meta.fund_house,
            category: body.meta.scheme_category,
            scheme_type: body.meta.scheme_type,
        };

        Ok((profile, rows_to_points(&body.data)))
    }
}

/// Parse NAV rows into price points, skipping rows whose date or NAV does
/// not parse.
fn rows_to_points(rows: &[NavRow]) -> Vec<PricePoint> {
    let mut points = Vec::with_capacity(rows.len());
    let mut skipped = 0_usize;

    for row in rows {
        let parsed_date = NaiveDate::parse_from_str(&row.date, "%d-%m-%Y");
        let parsed_nav = row.nav.trim().parse::<f64>();
        match (parsed_date, parsed_nav) {
            (Ok(date), Ok(nav)) => points.push(PricePoint::close_only(date, nav)),
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::warn!("Skipped {} unparseable NAV rows", skipped);
    }

    points
}
