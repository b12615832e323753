//! Configuration for the analysis service

use crate::error::{CatalystError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_POLYGON_BASE: &str = "https://api.polygon.io";
const DEFAULT_FUND_API_BASE: &str = "https://api.mfapi.in";
const DEFAULT_LLM_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

/// Configuration for the analysis engine and its clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalystConfig {
    /// Polygon API key
    pub polygon_api_key: Option<String>,

    /// Base URL for the Polygon API (overridable for tests)
    pub polygon_base_url: String,

    /// Base URL for the mutual-fund NAV API
    pub fund_api_base_url: String,

    /// Base URL for the OpenAI-compatible chat endpoint
    pub llm_api_base: String,

    /// API key for the LLM endpoint
    pub llm_api_key: Option<String>,

    /// Model name sent with chat requests
    pub llm_model: String,

    /// Cache TTL for assembled reports
    pub report_cache_ttl: Duration,

    /// Maximum number of retries for API and LLM calls
    pub max_retries: u32,

    /// Initial backoff duration for retries
    pub retry_backoff_base: Duration,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// Oldest NAV observation included in fund analysis
    pub fund_history_floor: NaiveDate,
}

impl Default for CatalystConfig {
    fn default() -> Self {
        Self {
            polygon_api_key: None,
            polygon_base_url: DEFAULT_POLYGON_BASE.to_string(),
            fund_api_base_url: DEFAULT_FUND_API_BASE.to_string(),
            llm_api_base: DEFAULT_LLM_API_BASE.to_string(),
            llm_api_key: None,
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            report_cache_ttl: Duration::from_secs(300), // 5 minutes
            max_retries: 3,
            retry_backoff_base: Duration::from_millis(500),
            request_timeout: Duration::from_secs(30),
            // NAV quality before this date is too patchy to trend on
            fund_history_floor: NaiveDate::from_ymd_opt(2019, 1, 1)
                .unwrap_or(NaiveDate::MIN),
        }
    }
}

impl CatalystConfig {
    /// Create a new configuration builder
    pub fn builder() -> CatalystConfigBuilder {
        CatalystConfigBuilder::default()
    }

    /// Load API keys and endpoint overrides from the environment
    ///
    /// Reads `POLYGON_API_KEY`, `OPENAI_API_KEY`, `OPENAI_API_BASE`, and
    /// `OPENAI_MODEL`; unset variables leave the current values in place.
    pub fn with_env(mut self) -> Self {
        if let Ok(key) = std::env::var("POLYGON_API_KEY") {
            self.polygon_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.llm_api_key = Some(key);
        }
        if let Ok(base) = std::env::var("OPENAI_API_BASE") {
            self.llm_api_base = base;
        }
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            self.llm_model = model;
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            return Err(CatalystError::ConfigError(
                "max_retries must be greater than 0".to_string(),
            ));
        }
        if self.llm_model.is_empty() {
            return Err(CatalystError::ConfigError(
                "llm_model must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for CatalystConfig
#[derive(Debug, Default)]
pub struct CatalystConfigBuilder {
    polygon_api_key: Option<String>,
    polygon_base_url: Option<String>,
    fund_api_base_url: Option<String>,
    llm_api_base: Option<String>,
    llm_api_key: Option<String>,
    llm_model: Option<String>,
    report_cache_ttl: Option<Duration>,
    max_retries: Option<u32>,
    retry_backoff_base: Option<Duration>,
    request_timeout: Option<Duration>,
    fund_history_floor: Option<NaiveDate>,
}

impl CatalystConfigBuilder {
    /// Set the Polygon API key
    pub fn polygon_api_key(mut self, key: impl Into<String>) -> Self {
        self.polygon_api_key = Some(key.into());
        self
    }

    /// Override the Polygon base URL
    pub fn polygon_base_url(mut self, url: impl Into<String>) -> Self {
        self.polygon_base_url = Some(url.into());
        self
    }

    /// Override the mutual-fund API base URL
    pub fn fund_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.fund_api_base_url = Some(url.into());
        self
    }

    /// Set the LLM endpoint base URL
    pub fn llm_api_base(mut self, url: impl Into<String>) -> Self {
        self.llm_api_base = Some(url.into());
        self
    }

    /// Set the LLM API key
    pub fn llm_api_key(mut self, key: impl Into<String>) -> Self {
        self.llm_api_key = Some(key.into());
        self
    }

    /// Set the LLM model name
    pub fn llm_model(mut self, model: impl Into<String>) -> Self {
        self.llm_model = Some(model.into());
        self
    }

    /// Set the report cache TTL
    pub fn report_cache_ttl(mut self, ttl: Duration) -> Self {
        self.report_cache_ttl = Some(ttl);
        self
    }

    /// Set maximum retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.max_retries = Some(retries);
        self
    }

    /// Set retry backoff base duration
    pub fn retry_backoff_base(mut self, duration: Duration) -> Self {
        self.retry_backoff_base = Some(duration);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the oldest NAV date included in fund analysis
    pub fn fund_history_floor(mut self, floor: NaiveDate) -> Self {
        self.fund_history_floor = Some(floor);
        self
    }

    /// Load keys and endpoint overrides from the environment
    pub fn with_env(mut self) -> Self {
        if let Ok(key) = std::env::var("POLYGON_API_KEY") {
            self.polygon_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.llm_api_key = Some(key);
        }
        if let Ok(base) = std::env::var("OPENAI_API_BASE") {
            self.llm_api_base = Some(base);
        }
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            self.llm_model = Some(model);
        }
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<CatalystConfig> {
        let defaults = CatalystConfig::default();

        let config = CatalystConfig {
            polygon_api_key: self.polygon_api_key,
            polygon_base_url: self.polygon_base_url.unwrap_or(defaults.polygon_base_url),
            fund_api_base_url: self
                .fund_api_base_url
                .unwrap_or(defaults.fund_api_base_url),
            llm_api_base: self.llm_api_base.unwrap_or(defaults.llm_api_base),
            llm_api_key: self.llm_api_key,
            llm_model: self.llm_model.unwrap_or(defaults.llm_model),
            report_cache_ttl: self.report_cache_ttl.unwrap_or(defaults.report_cache_ttl),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries),
            retry_backoff_base: self
                .retry_backoff_base
                .unwrap_or(defaults.retry_backoff_base),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            fund_history_floor: self
                .fund_history_floor
                .unwrap_or(defaults.fund_history_floor),
        };

        config.validate()?;
        Ok(config)
    }
}
