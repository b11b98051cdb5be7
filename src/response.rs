//! Response body helpers. Bodies are bare JSON (no envelope).

use axum::{http::StatusCode, Json};
use serde_json::Value;

pub fn success_ok(data: Value) -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(data))
}

pub fn success_created(data: Value) -> (StatusCode, Json<Value>) {
    (StatusCode::CREATED, Json(data))
}

/// `{"error": message}`, used for lookups and internal failures.
pub fn error_body(message: impl Into<String>) -> Value {
    serde_json::json!({ "error": message.into() })
}

/// `{"errors": [...]}`, used for rejected writes.
pub fn errors_body(messages: Vec<String>) -> Value {
    serde_json::json!({ "errors": messages })
}

/// `{"message": message}`
pub fn message_body(message: impl Into<String>) -> Value {
    serde_json::json!({ "message": message.into() })
}
