//! Response-shape normalization.
//!
//! Tool results reach callers in one of a few shapes depending on the
//! transport that produced them. They are classified once here, and every
//! consumer works with the plain JSON value that comes out.

use serde_json::{Map, Value};

/// The shapes a tool or backend result can take.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolPayload {
    /// `{"content": [<text item>, ...]}`
    Wrapped(Vec<Value>),
    /// `[<text item>, ...]`
    Items(Vec<Value>),
    /// Any other JSON object, used as-is.
    Object(Map<String, Value>),
    /// Scalars and arrays that are not text items.
    Other(Value),
}

impl ToolPayload {
    pub fn classify(value: Value) -> Self {
        match value {
            Value::Object(mut map) => {
                let wrapped = map.len() <= 2
                    && map.get("content").and_then(Value::as_array).is_some_and(|items| {
                        items.iter().all(is_text_item)
                    })
                    && map.keys().all(|k| k == "content" || k == "isError");
                match (wrapped, map.remove("content")) {
                    (true, Some(Value::Array(items))) => ToolPayload::Wrapped(items),
                    (_, Some(content)) => {
                        map.insert("content".to_string(), content);
                        ToolPayload::Object(map)
                    }
                    (_, None) => ToolPayload::Object(map),
                }
            }
            Value::Array(items) if !items.is_empty() && items.iter().all(is_text_item) => {
                ToolPayload::Items(items)
            }
            other => ToolPayload::Other(other),
        }
    }

    /// Collapse to the payload value. The first text item wins; text holding
    /// JSON is decoded. `None` when a wrapper carries no items.
    pub fn into_value(self) -> Option<Value> {
        match self {
            ToolPayload::Wrapped(items) | ToolPayload::Items(items) => {
                items.into_iter().next().map(decode_text_item)
            }
            ToolPayload::Object(map) => Some(Value::Object(map)),
            ToolPayload::Other(value) => Some(value),
        }
    }
}

/// Classify and collapse in one step.
pub fn normalize(value: Value) -> Option<Value> {
    ToolPayload::classify(value).into_value()
}

fn is_text_item(item: &Value) -> bool {
    item.get("type").and_then(Value::as_str) == Some("text")
        && item.get("text").is_some_and(Value::is_string)
}

fn decode_text_item(item: Value) -> Value {
    match item.get("text").and_then(Value::as_str) {
        Some(text) => serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())),
        None => item,
    }
}
