mod errors;
mod frames;

pub use errors::{
    ERROR_INVALID_PARAMS, ERROR_INVALID_REQUEST, ERROR_METHOD_NOT_FOUND, ERROR_PARSE, ERROR_TOOL,
    ErrorShape,
};
pub use frames::{RequestFrame, ResponseFrame};

use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";

/// A decoded request body: one call or a batch of calls.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Single(Value),
    Batch(Vec<Value>),
}

pub fn parse_envelope(body: &[u8]) -> Result<Envelope, ErrorShape> {
    let value = serde_json::from_slice::<Value>(body)
        .map_err(|error| ErrorShape::new(ERROR_PARSE, format!("parse error: {error}")))?;

    match value {
        Value::Array(items) if items.is_empty() => Err(ErrorShape::new(
            ERROR_INVALID_REQUEST,
            "invalid request: empty batch",
        )),
        Value::Array(items) => Ok(Envelope::Batch(items)),
        other => Ok(Envelope::Single(other)),
    }
}

pub fn parse_request_frame(value: Value) -> Result<RequestFrame, ErrorShape> {
    let request = serde_json::from_value::<RequestFrame>(value).map_err(|error| {
        ErrorShape::new(
            ERROR_INVALID_REQUEST,
            format!("invalid request: {error}"),
        )
    })?;

    if request.jsonrpc.as_deref() != Some(JSONRPC_VERSION) {
        return Err(ErrorShape::new(
            ERROR_INVALID_REQUEST,
            "invalid request: jsonrpc must be \"2.0\"",
        ));
    }
    if request.method.trim().is_empty() {
        return Err(ErrorShape::new(
            ERROR_INVALID_REQUEST,
            "invalid request: missing method",
        ));
    }

    Ok(request)
}

/// Id of a raw call, for error replies to calls that failed to parse.
#[must_use]
pub fn raw_request_id(value: &Value) -> Value {
    match value.get("id") {
        Some(id @ (Value::String(_) | Value::Number(_))) => id.clone(),
        _ => Value::Null,
    }
}

#[must_use]
pub fn response_ok(id: Value, result: Value) -> ResponseFrame {
    ResponseFrame {
        jsonrpc: JSONRPC_VERSION.to_owned(),
        result: Some(result),
        error: None,
        id,
    }
}

#[must_use]
pub fn response_error(id: Value, error: ErrorShape) -> ResponseFrame {
    ResponseFrame {
        jsonrpc: JSONRPC_VERSION.to_owned(),
        result: None,
        error: Some(error),
        id,
    }
}
