// src/candidates/ingestion/normalizer.rs
//! Tolerant decoding of extraction-service output into profile fields.
//!
//! A malformed envelope (not JSON, or not a JSON object) is a hard failure.
//! Missing or mistyped fields inside a well-formed object fall back to
//! empty values.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;
use tracing::debug;

use super::error::IngestionError;
use crate::candidates::models::ProfileFields;

fn leading_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^```[A-Za-z0-9_+\-]*").expect("valid leading fence regex"))
}

fn trailing_fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"```$").expect("valid trailing fence regex"))
}

fn leading_json_word() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^json\s*").expect("valid json word regex"))
}

/// Remove surrounding code fences and a stray leading `json` word
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(m) = leading_fence().find(text) {
        text = text[m.end()..].trim_start();
    }
    if let Some(m) = trailing_fence().find(text) {
        text = text[..m.start()].trim_end();
    }
    if let Some(m) = leading_json_word().find(text) {
        text = &text[m.end()..];
    }

    text.trim()
}

#[derive(Debug, PartialEq)]
enum FieldDecode<T> {
    Present(T),
    Missing,
    WrongShape(&'static str),
}

impl<T: Default> FieldDecode<T> {
    fn or_default(self, key: &str) -> T {
        match self {
            FieldDecode::Present(value) => value,
            FieldDecode::Missing => T::default(),
            FieldDecode::WrongShape(found) => {
                debug!(field = key, found = found, "Extraction field has unexpected shape");
                T::default()
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn decode_text(obj: &Map<String, Value>, key: &str) -> FieldDecode<String> {
    match obj.get(key) {
        None | Some(Value::Null) => FieldDecode::Missing,
        Some(Value::String(s)) => FieldDecode::Present(s.clone()),
        Some(other) => FieldDecode::WrongShape(json_kind(other)),
    }
}

/// Strings are kept as sent; numbers and booleans are rendered; anything else is dropped
fn decode_text_list(obj: &Map<String, Value>, key: &str) -> FieldDecode<Vec<String>> {
    match obj.get(key) {
        None | Some(Value::Null) => FieldDecode::Missing,
        Some(Value::Array(items)) => FieldDecode::Present(
            items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    Value::Bool(b) => Some(b.to_string()),
                    _ => None,
                })
                .collect(),
        ),
        Some(other) => FieldDecode::WrongShape(json_kind(other)),
    }
}

/// Decode raw extraction output into profile fields
pub fn normalize_response(raw: &str) -> Result<ProfileFields, IngestionError> {
    let cleaned = strip_code_fences(raw);

    let value: Value = serde_json::from_str(cleaned).map_err(|e| IngestionError::ExtractionFormat {
        reason: e.to_string(),
        raw: raw.trim().to_string(),
    })?;

    let obj = match value {
        Value::Object(obj) => obj,
        other => {
            return Err(IngestionError::ExtractionFormat {
                reason: format!("expected a JSON object, found {}", json_kind(&other)),
                raw: raw.trim().to_string(),
            })
        }
    };

    Ok(ProfileFields {
        name: decode_text(&obj, "name").or_default("name"),
        summary: decode_text(&obj, "summary").or_default("summary"),
        skills: decode_text_list(&obj, "skills").or_default("skills"),
        academic: decode_text_list(&obj, "academic").or_default("academic"),
    })
}
