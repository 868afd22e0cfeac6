//! Tool transport: JSON-RPC 2.0 over HTTP (`POST /mcp`) and stdio.
//!
//! Supports `initialize`, `ping`, `tools/list` and `tools/call`. Stdio framing
//! is one JSON message per line; requests without an `id` are notifications
//! and get no response.

use anyhow::Result;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use leafscan_client::tools::to_call_result;
use leafscan_client::{tool_specs, ToolAdapter};

use crate::state::AppState;

pub const PROTOCOL_VERSION: &str = "2024-11-05";
const SERVER_NAME: &str = "leafscan";

const PARSE_ERROR: i64 = -32700;
const INVALID_REQUEST: i64 = -32600;
const METHOD_NOT_FOUND: i64 = -32601;
const INVALID_PARAMS: i64 = -32602;

#[derive(Debug, Deserialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    #[serde(default)]
    params: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    jsonrpc: &'static str,
    id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct ToolCallParams {
    name: String,
    #[serde(default)]
    arguments: Value,
}

impl JsonRpcResponse {
    fn success(id: Value, result: Value) -> Self {
        Self { jsonrpc: "2.0", id, result: Some(result), error: None }
    }

    fn failure(id: Value, code: i64, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            result: None,
            error: Some(JsonRpcError { code, message: message.into() }),
        }
    }

    fn parse_error() -> Self {
        Self::failure(Value::Null, PARSE_ERROR, "parse error")
    }
}

/// Dispatch one decoded message. `None` for notifications.
pub async fn handle_message(adapter: &ToolAdapter, message: Value) -> Option<JsonRpcResponse> {
    let Some(object) = message.as_object() else {
        return Some(JsonRpcResponse::failure(Value::Null, INVALID_REQUEST, "invalid json-rpc request"));
    };
    let id = object.get("id").cloned();

    let request = match serde_json::from_value::<JsonRpcRequest>(message) {
        Ok(request) => request,
        Err(_) => {
            return Some(JsonRpcResponse::failure(
                id.unwrap_or(Value::Null),
                INVALID_REQUEST,
                "invalid json-rpc request",
            ))
        }
    };

    let Some(id) = id else {
        debug!(method = %request.method, "Notification received");
        return None;
    };

    if request.jsonrpc != "2.0" {
        return Some(JsonRpcResponse::failure(id, INVALID_REQUEST, "invalid json-rpc version"));
    }

    let response = match request.method.as_str() {
        "initialize" => JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "serverInfo": { "name": SERVER_NAME, "version": env!("CARGO_PKG_VERSION") },
                "capabilities": { "tools": {} },
            }),
        ),
        "ping" => JsonRpcResponse::success(id, json!({})),
        "tools/list" => JsonRpcResponse::success(id, json!({ "tools": tool_specs() })),
        "tools/call" => {
            let params = request.params.unwrap_or(Value::Null);
            match serde_json::from_value::<ToolCallParams>(params) {
                Ok(call) => {
                    let arguments =
                        if call.arguments.is_null() { json!({}) } else { call.arguments };
                    let output = adapter.call_tool(&call.name, &arguments).await;
                    JsonRpcResponse::success(id, to_call_result(&output))
                }
                Err(_) => JsonRpcResponse::failure(id, INVALID_PARAMS, "invalid tool params"),
            }
        }
        other => {
            debug!(method = other, "Unknown JSON-RPC method");
            JsonRpcResponse::failure(id, METHOD_NOT_FOUND, "method not found")
        }
    };
    Some(response)
}

/// `POST /mcp`. Notifications are acknowledged with 202 and no body.
pub async fn handle_http(State(state): State<AppState>, body: Bytes) -> Response {
    let message = match serde_json::from_slice::<Value>(&body) {
        Ok(message) => message,
        Err(_) => return (StatusCode::BAD_REQUEST, Json(JsonRpcResponse::parse_error())).into_response(),
    };
    match handle_message(state.tools(), message).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Serve newline-delimited JSON-RPC on stdin/stdout until stdin closes.
pub async fn serve_stdio(adapter: ToolAdapter) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();
    info!("Tool server reading JSON-RPC from stdin");

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let response = match serde_json::from_str::<Value>(line) {
            Ok(message) => handle_message(&adapter, message).await,
            Err(e) => {
                warn!(error = %e, "Discarding malformed JSON-RPC line");
                Some(JsonRpcResponse::parse_error())
            }
        };
        if let Some(response) = response {
            let mut payload = serde_json::to_vec(&response)?;
            payload.push(b'\n');
            stdout.write_all(&payload).await?;
            stdout.flush().await?;
        }
    }

    info!("stdin closed, tool server exiting");
    Ok(())
}
