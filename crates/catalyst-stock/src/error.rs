//! Error types for the analysis service

use catalyst_series::MetricError;
use catalyst_series::chart::UnknownChartKind;
use catalyst_series::indicators::UnknownIndicator;
use thiserror::Error;

/// Service-level errors
#[derive(Debug, Error)]
pub enum CatalystError {
    /// Upstream API rejected or failed the request
    #[error("API error: {0}")]
    ApiError(String),

    /// Invalid stock symbol or scheme code provided
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// LLM generation failed
    #[error("LLM error: {0}")]
    LlmError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Cache error
    #[error("Cache error: {0}")]
    CacheError(String),

    /// Requested agent persona does not exist
    #[error("Unknown agent: {0}")]
    UnknownAgent(String),

    /// Requested timeframe is not in the supported set
    #[error("Unknown timeframe: {0}")]
    UnknownTimeframe(String),

    /// Requested chart indicator is not in the supported set
    #[error(transparent)]
    UnknownIndicator(#[from] UnknownIndicator),

    /// Requested chart type is not in the supported set
    #[error(transparent)]
    UnknownChartKind(#[from] UnknownChartKind),

    /// A metric the caller explicitly required could not be computed
    #[error("Metric error: {0}")]
    Metric(#[from] MetricError),
}

/// Result type alias for service operations
pub type Result<T> = std::result::Result<T, CatalystError>;
