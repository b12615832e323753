//! Stock and mutual-fund analysis service
//!
//! Wraps the pure analytics core in [`catalyst_series`] with everything a
//! running service needs: data API clients, a persona-agent fan-out over an
//! LLM boundary, loose JSON extraction, retries, a report cache, and the
//! engine that assembles it all into JSON report bundles.
//!
//! The engine's collaborators (price source, fund API, text generator) are
//! injected traits, so every operation is testable with mocks and no module
//! holds global state.

pub mod agents;
pub mod api;
pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod llm;
pub mod retry;
pub mod source;
pub mod timeframe;

pub use agents::{AgentReport, Persona};
pub use api::{FundApiClient, PolygonClient};
pub use cache::{CacheKey, ReportCache};
pub use config::CatalystConfig;
pub use engine::AnalysisEngine;
pub use error::{CatalystError, Result};
pub use extract::AgentVerdict;
pub use llm::{OpenAiGenerator, TextGenerator};
pub use retry::RetryPolicy;
pub use source::{FundSource, SeriesSource};
pub use timeframe::Timeframe;
