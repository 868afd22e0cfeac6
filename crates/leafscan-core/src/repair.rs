//! JSON extraction and repair.
//!
//! Generated text is supposed to be a bare JSON object but regularly arrives
//! wrapped in markdown fences or surrounded by prose. [`repair`] recovers the
//! object when it can and otherwise yields a [`FallbackEnvelope`] holding the
//! original text. It never fails.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use leafscan_types::{
    ExplanationDocument, FallbackEnvelope, Generated, PlantInfoDocument,
    models::StructuredDocument,
};

static FENCED_BLOCK_REGEX: OnceLock<Regex> = OnceLock::new();

/// A ```-fenced block, with an optional language tag on the opening fence.
fn fenced_block_regex() -> &'static Regex {
    FENCED_BLOCK_REGEX.get_or_init(|| {
        Regex::new(r"(?s)```[A-Za-z0-9_+-]*[ \t]*\r?\n?(.*?)```").expect("Fence regex is valid")
    })
}

/// Strip fences and surrounding prose, leaving the span from the first `{` to
/// the last `}` (or the stripped text when there is no such span).
pub fn extract_object_text(raw: &str) -> String {
    let unfenced = fenced_block_regex().replace_all(raw, "$1");
    let cleaned = unfenced.replace("```", "");
    let cleaned = cleaned.trim();

    match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if start < end => cleaned[start..=end].to_string(),
        _ => cleaned.to_string(),
    }
}

/// Recover a `T` from generated text, or fall back to `{error, raw}`.
pub fn repair<T: StructuredDocument>(raw: &str) -> Generated<T> {
    let candidate = extract_object_text(raw);

    let object = match serde_json::from_str::<Value>(&candidate) {
        Ok(Value::Object(object)) => object,
        Ok(_) => {
            debug!("Generated JSON is not an object");
            return Generated::Fallback(FallbackEnvelope::invalid_json(raw));
        }
        Err(e) => {
            debug!(error = %e, "Generated text is not valid JSON");
            return Generated::Fallback(FallbackEnvelope::invalid_json(raw));
        }
    };

    let Some(fields) = required_fields_as_text(object, T::REQUIRED_KEYS) else {
        debug!(required = ?T::REQUIRED_KEYS, "Generated JSON is missing required keys");
        return Generated::Fallback(FallbackEnvelope::invalid_json(raw));
    };

    match serde_json::from_value::<T>(Value::Object(fields)) {
        Ok(document) => Generated::Document(document),
        Err(_) => Generated::Fallback(FallbackEnvelope::invalid_json(raw)),
    }
}

pub fn repair_explanation(raw: &str) -> Generated<ExplanationDocument> {
    repair(raw)
}

pub fn repair_plant_info(raw: &str) -> Generated<PlantInfoDocument> {
    repair(raw)
}

/// Keep only the required keys, rendering every value as text. `None` when a
/// key is absent.
fn required_fields_as_text(
    mut object: Map<String, Value>,
    required: &[&str],
) -> Option<Map<String, Value>> {
    let mut fields = Map::new();
    for key in required {
        let value = object.remove(*key)?;
        fields.insert((*key).to_string(), Value::String(value_to_text(value)));
    }
    Some(fields)
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        Value::Array(items) => items.into_iter().map(value_to_text).collect::<Vec<_>>().join("; "),
        other => other.to_string(),
    }
}
