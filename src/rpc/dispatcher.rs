use serde_json::{Value, json};
use tracing::{info, warn};

use crate::{
    application::state::SharedState,
    domain::error::ToolError,
    protocol::{
        ERROR_METHOD_NOT_FOUND, ERROR_TOOL, ErrorShape, RequestFrame, ResponseFrame,
        parse_request_frame, raw_request_id, response_error, response_ok,
    },
    rpc::methods,
};

/// Handles one raw call from an envelope. Returns `None` for notifications.
pub async fn dispatch_value(state: &SharedState, raw: Value) -> Option<ResponseFrame> {
    let id = raw_request_id(&raw);
    let request = match parse_request_frame(raw) {
        Ok(request) => request,
        Err(error) => {
            warn!("rejected rpc frame code={}: {}", error.code, error.message);
            return Some(response_error(id, error));
        }
    };

    let response = dispatch_request(state, &request).await;
    if request.is_notification() {
        None
    } else {
        Some(response)
    }
}

pub async fn dispatch_request(state: &SharedState, request: &RequestFrame) -> ResponseFrame {
    info!("rpc request method={}", request.method);

    let params = request.params.as_ref();
    let result = match request.method.as_str() {
        "rawg_search" => methods::search::handle_search(state, params).await,
        "rawg_popular" => methods::browse::handle_popular(state, params).await,
        "rawg_by_genre" => methods::browse::handle_by_genre(state, params).await,
        "rawg_by_platform" => methods::browse::handle_by_platform(state, params).await,
        "rawg_game_details" => methods::lookup::handle_details(state, params).await,
        "rawg_game_stores" => methods::lookup::handle_stores(state, params).await,
        "rawg_game_dlcs" => methods::lookup::handle_dlcs(state, params).await,
        "list_tools" => methods::tools::handle_list(params),
        _ => Err(ErrorShape::new(
            ERROR_METHOD_NOT_FOUND,
            format!("method not found: {}", request.method),
        )),
    };

    let id = request.id.clone().unwrap_or(Value::Null);
    match result {
        Ok(payload) => {
            info!("rpc success method={}", request.method);
            response_ok(id, payload)
        }
        Err(error) => {
            warn!(
                "rpc error method={} code={}: {}",
                request.method, error.code, error.message
            );
            response_error(id, error)
        }
    }
}

#[must_use]
pub fn map_tool_error(error: ToolError) -> ErrorShape {
    let kind = error.kind();
    ErrorShape::new(ERROR_TOOL, error.to_string()).with_data(json!({ "kind": kind }))
}
