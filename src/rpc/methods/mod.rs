pub mod browse;
pub mod lookup;
pub mod search;
pub mod status;
pub mod tools;

use std::future::Future;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::{
    application::state::SharedState,
    domain::{error::ToolError, models::Role},
    protocol::{ERROR_INVALID_PARAMS, ErrorShape},
    rpc::dispatcher::map_tool_error,
};

pub const MAX_PAGE_SIZE: u32 = 20;
pub const SEARCH_DEFAULT_PAGE_SIZE: u32 = 5;
pub const LIST_DEFAULT_PAGE_SIZE: u32 = 10;

/// Catalog tools, in the order they are advertised.
pub const TOOL_METHODS: &[&str] = &[
    "rawg_search",
    "rawg_popular",
    "rawg_by_genre",
    "rawg_by_platform",
    "rawg_game_details",
    "rawg_game_stores",
    "rawg_game_dlcs",
];

#[must_use]
pub fn known_methods() -> Vec<String> {
    TOOL_METHODS
        .iter()
        .map(|value| (*value).to_owned())
        .collect()
}

/// Requested page size bounded to `1..=MAX_PAGE_SIZE`. Any non-negative
/// integer is accepted, however large.
#[must_use]
pub fn effective_page_size(requested: Option<u64>, default: u32) -> u32 {
    requested
        .map_or(default, |value| u32::try_from(value).unwrap_or(MAX_PAGE_SIZE))
        .clamp(1, MAX_PAGE_SIZE)
}

/// Successful tool result: the one-line summary that goes to the transcript
/// and the tool-specific payload fields.
pub(crate) struct ToolReply {
    pub(crate) message: String,
    pub(crate) fields: Map<String, Value>,
}

impl ToolReply {
    pub(crate) fn new(message: String) -> Self {
        Self {
            message,
            fields: Map::new(),
        }
    }

    pub(crate) fn field(mut self, name: &str, value: Value) -> Self {
        self.fields.insert(name.to_owned(), value);
        self
    }

    fn into_payload(self) -> Value {
        let mut payload = Map::new();
        payload.insert("success".to_owned(), Value::Bool(true));
        payload.insert("message".to_owned(), Value::String(self.message));
        payload.extend(self.fields);
        Value::Object(payload)
    }
}

/// Records `action` as the user entry, runs `work`, then records exactly one
/// assistant entry for the outcome. `work` is not polled until the user entry
/// is written, so no upstream call precedes it.
///
/// The call runs on its own task: once accepted it completes and writes both
/// entries even if the caller goes away.
pub(crate) async fn run_tool<F>(
    state: &SharedState,
    action: String,
    work: F,
) -> Result<Value, ErrorShape>
where
    F: Future<Output = Result<ToolReply, ToolError>> + Send + 'static,
{
    let recorder = state.clone();
    let call = tokio::spawn(async move {
        recorder.record(Role::User, &action).await;
        let outcome = work.await;
        let summary = match &outcome {
            Ok(reply) => reply.message.clone(),
            Err(error) => error.to_string(),
        };
        recorder.record(Role::Assistant, &summary).await;
        outcome
    });

    match call.await {
        Ok(Ok(reply)) => Ok(reply.into_payload()),
        Ok(Err(error)) => Err(map_tool_error(error)),
        Err(error) => Err(map_tool_error(ToolError::Unexpected(format!(
            "tool task failed: {error}"
        )))),
    }
}

/// Rejects blank required text before anything is logged or fetched.
pub(crate) fn require_text<'a>(value: &'a str, message: &str) -> Result<&'a str, ErrorShape> {
    if value.trim().is_empty() {
        return Err(map_tool_error(ToolError::Validation(message.to_owned())));
    }
    Ok(value)
}

pub(crate) fn parse_optional_params<T: DeserializeOwned>(
    method: &str,
    params: Option<&Value>,
) -> Result<T, ErrorShape> {
    let raw = params.cloned().unwrap_or_else(|| Value::Object(Map::new()));
    serde_json::from_value::<T>(raw).map_err(|error| {
        ErrorShape::new(
            ERROR_INVALID_PARAMS,
            format!("invalid {method} params: {error}"),
        )
    })
}

pub(crate) fn parse_required_params<T: DeserializeOwned>(
    method: &str,
    params: Option<&Value>,
) -> Result<T, ErrorShape> {
    let Some(raw) = params.cloned() else {
        return Err(ErrorShape::new(
            ERROR_INVALID_PARAMS,
            format!("invalid {method} params: object required"),
        ));
    };

    if !raw.is_object() {
        return Err(ErrorShape::new(
            ERROR_INVALID_PARAMS,
            format!("invalid {method} params: object required"),
        ));
    }

    serde_json::from_value::<T>(raw).map_err(|error| {
        ErrorShape::new(
            ERROR_INVALID_PARAMS,
            format!("invalid {method} params: {error}"),
        )
    })
}
