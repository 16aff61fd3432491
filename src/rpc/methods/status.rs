use serde_json::{Value, json};

use crate::application::state::SharedState;

pub const SERVER_NAME: &str = "RAWG MCP Server";

#[must_use]
pub fn health_payload(state: &SharedState) -> Value {
    json!({
        "status": "ok",
        "message": format!("{SERVER_NAME} is running"),
        "api_key_configured": !state.config().api_key.is_empty(),
        "uptime_ms": state.uptime_ms(),
    })
}

#[must_use]
pub fn info_payload(state: &SharedState) -> Value {
    json!({
        "name": SERVER_NAME,
        "version": state.config().server_version,
        "description": "MCP server to access RAWG Video Games Database",
        "methods": state.methods(),
    })
}
