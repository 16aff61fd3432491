use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    application::state::SharedState,
    catalog::normalize::{results_of, to_game_detail, to_game_summaries, to_store_listings},
    domain::error::ToolError,
    protocol::ErrorShape,
    rpc::methods::{
        LIST_DEFAULT_PAGE_SIZE, ToolReply, effective_page_size, parse_required_params,
        require_text, run_tool,
    },
};

const GAME_NAME_REQUIRED: &str = "Game name cannot be empty";

#[derive(Debug, Deserialize)]
struct GameParams {
    game_name: String,
}

#[derive(Debug, Deserialize)]
struct GameDlcParams {
    game_name: String,
    #[serde(default)]
    page_size: Option<u64>,
}

pub async fn handle_details(
    state: &SharedState,
    params: Option<&Value>,
) -> Result<Value, ErrorShape> {
    let parsed: GameParams = parse_required_params("rawg_game_details", params)?;
    let game_name = require_text(&parsed.game_name, GAME_NAME_REQUIRED)?;

    run_tool(
        state,
        format!("Fetching details for game: {game_name}"),
        details(state.clone(), game_name.to_owned()),
    )
    .await
}

pub async fn handle_stores(
    state: &SharedState,
    params: Option<&Value>,
) -> Result<Value, ErrorShape> {
    let parsed: GameParams = parse_required_params("rawg_game_stores", params)?;
    let game_name = require_text(&parsed.game_name, GAME_NAME_REQUIRED)?;

    run_tool(
        state,
        format!("Fetching stores for: {game_name}"),
        stores(state.clone(), game_name.to_owned()),
    )
    .await
}

pub async fn handle_dlcs(
    state: &SharedState,
    params: Option<&Value>,
) -> Result<Value, ErrorShape> {
    let parsed: GameDlcParams = parse_required_params("rawg_game_dlcs", params)?;
    let game_name = require_text(&parsed.game_name, GAME_NAME_REQUIRED)?;
    let page_size = effective_page_size(parsed.page_size, LIST_DEFAULT_PAGE_SIZE);

    run_tool(
        state,
        format!("Fetching DLCs for: {game_name}"),
        dlcs(state.clone(), game_name.to_owned(), page_size),
    )
    .await
}

async fn details(state: SharedState, game_name: String) -> Result<ToolReply, ToolError> {
    let game_id = resolve_game_id(&state, &game_name, "Error fetching game details").await?;

    let payload = state
        .catalog()
        .fetch(&format!("games/{game_id}"), &[])
        .await
        .map_err(|error| ToolError::Upstream(format!("Error fetching details: {error}")))?;

    Ok(
        ToolReply::new(format!("Details fetched for '{game_name}'"))
            .field("game", json!(to_game_detail(&payload))),
    )
}

async fn stores(state: SharedState, game_name: String) -> Result<ToolReply, ToolError> {
    let game_id = resolve_game_id(&state, &game_name, "Error fetching stores").await?;

    let payload = state
        .catalog()
        .fetch(&format!("games/{game_id}/stores"), &[])
        .await
        .map_err(|error| ToolError::Upstream(format!("Error fetching stores: {error}")))?;

    let stores = to_store_listings(results_of(&payload));
    Ok(
        ToolReply::new(format!("Found {} stores for '{game_name}'", stores.len()))
            .field("game_name", json!(game_name))
            .field("count", json!(stores.len()))
            .field("stores", json!(stores)),
    )
}

async fn dlcs(
    state: SharedState,
    game_name: String,
    page_size: u32,
) -> Result<ToolReply, ToolError> {
    let game_id = resolve_game_id(&state, &game_name, "Error fetching DLCs").await?;

    let payload = state
        .catalog()
        .fetch(
            &format!("games/{game_id}/additions"),
            &[("page_size", page_size.to_string())],
        )
        .await
        .map_err(|error| ToolError::Upstream(format!("Error fetching DLCs: {error}")))?;

    let mut dlcs = to_game_summaries(results_of(&payload));
    dlcs.truncate(page_size as usize);
    Ok(
        ToolReply::new(format!("Found {} DLCs for '{game_name}'", dlcs.len()))
            .field("game_name", json!(game_name))
            .field("count", json!(dlcs.len()))
            .field("dlcs", json!(dlcs)),
    )
}

/// First step of every lookup: a precise one-result search by name.
async fn resolve_game_id(
    state: &SharedState,
    game_name: &str,
    context: &str,
) -> Result<i64, ToolError> {
    let payload = state
        .catalog()
        .fetch(
            "games",
            &[
                ("search", game_name.to_owned()),
                ("page_size", "1".to_owned()),
                ("search_precise", "true".to_owned()),
            ],
        )
        .await
        .map_err(|error| ToolError::Upstream(format!("RAWG API error: {error}")))?;

    let Some(first) = results_of(&payload)
        .as_array()
        .and_then(|results| results.first())
    else {
        return Err(ToolError::NotFound(format!("Game '{game_name}' not found")));
    };

    first.get("id").and_then(Value::as_i64).ok_or_else(|| {
        ToolError::Unexpected(format!(
            "{context}: search result for '{game_name}' has no id"
        ))
    })
}
