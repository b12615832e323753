//! Loose JSON extraction from LLM output
//!
//! Models are asked for structured JSON but reply with prose, fenced code
//! blocks, or half-valid objects. Extraction therefore never fails: when no
//! JSON can be recovered the raw text becomes the verdict summary.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

/// Confidence assigned when the model answered but returned no parseable JSON
const TEXT_ONLY_CONFIDENCE: f64 = 0.5;

/// Confidence assigned when the model produced no usable answer at all
const FALLBACK_CONFIDENCE: f64 = 0.3;

/// Structured result recovered from one agent's output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentVerdict {
    pub summary: String,
    pub confidence: f64,
    /// Whatever structured payload the model produced, if any
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

impl AgentVerdict {
    /// Verdict used when an agent produced no usable output
    pub fn fallback(agent: &str) -> Self {
        Self {
            summary: format!("{agent} produced no usable output"),
            confidence: FALLBACK_CONFIDENCE,
            data: Value::Null,
        }
    }
}

fn fenced_json_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)```").expect("hardcoded regex"))
}

/// Extract the first JSON value embedded in free text.
///
/// Tries a fenced code block first, then the span from the first `{` to the
/// last `}`. Returns `None` when neither parses.
pub fn extract_json(text: &str) -> Option<Value> {
    if let Some(caps) = fenced_json_re().captures(text) {
        if let Some(inner) = caps.get(1) {
            if let Ok(value) = serde_json::from_str::<Value>(inner.as_str().trim()) {
                return Some(value);
            }
        }
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Value>(&text[start..=end]).ok()
}

/// Build a verdict from raw agent output.
///
/// A recovered JSON object contributes its `summary` (or `thesis`) and
/// `confidence` fields; plain text becomes the summary directly.
pub fn verdict_from_text(agent: &str, text: &str) -> AgentVerdict {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return AgentVerdict::fallback(agent);
    }

    match extract_json(trimmed) {
        Some(value) => {
            let summary = value
                .get("summary")
                .or_else(|| value.get("thesis"))
                .or_else(|| value.get("valuationSummary"))
                .and_then(Value::as_str)
                .map_or_else(|| trimmed.to_string(), ToString::to_string);
            let confidence = value
                .get("confidence")
                .and_then(Value::as_f64)
                .unwrap_or(TEXT_ONLY_CONFIDENCE);
            AgentVerdict {
                summary,
                confidence,
                data: value,
            }
        }
        None => AgentVerdict {
            summary: trimmed.to_string(),
            confidence: TEXT_ONLY_CONFIDENCE,
            data: Value::Null,
        },
    }
}
