//! Extractor — pulls the single JSON value out of free-form model output.
//!
//! Flow: trim → unwrap the first fenced block → greedy `{…}` / `[…]` span →
//! strict parse → repair parse → unwrap a single-element array wrapper.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::curriculum::repair::repair_json;

#[derive(Debug, Error, PartialEq)]
pub enum ExtractionError {
    #[error("No JSON found")]
    NoJson,

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),
}

fn fence_pattern() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"```(?:json)?\s*([\s\S]*?)```").expect("valid fence regex"))
}

/// Leftmost-first alternation: whichever of `{` / `[` opens first (and has a
/// matching closer somewhere after it) wins, and the span runs to the last
/// closer of that kind in the text.
fn span_pattern() -> &'static Regex {
    static SPAN: OnceLock<Regex> = OnceLock::new();
    SPAN.get_or_init(|| Regex::new(r"\{[\s\S]*\}|\[[\s\S]*\]").expect("valid span regex"))
}

/// Extracts and parses the JSON value embedded in `raw_text`.
pub fn extract(raw_text: &str) -> Result<Value, ExtractionError> {
    let mut working = raw_text.trim();
    if let Some(body) = fence_pattern()
        .captures(working)
        .and_then(|caps| caps.get(1))
    {
        working = body.as_str().trim();
    }

    let span = span_pattern()
        .find(working)
        .ok_or(ExtractionError::NoJson)?
        .as_str();

    let parsed = match serde_json::from_str::<Value>(span) {
        Ok(value) => value,
        Err(_) => parse_repaired(span)?,
    };

    Ok(unwrap_first(parsed))
}

fn parse_repaired(span: &str) -> Result<Value, ExtractionError> {
    let repaired = repair_json(span).map_err(|e| ExtractionError::InvalidJson(e.to_string()))?;
    serde_json::from_str(&repaired).map_err(|e| ExtractionError::InvalidJson(e.to_string()))
}

/// A non-empty top-level array is taken to wrap the document; only its first
/// element is kept. Deeper nesting is left alone.
fn unwrap_first(value: Value) -> Value {
    match value {
        Value::Array(mut items) if !items.is_empty() => items.swap_remove(0),
        other => other,
    }
}
