use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    application::state::SharedState,
    catalog::normalize::{results_of, to_game_summaries},
    domain::error::ToolError,
    protocol::ErrorShape,
    rpc::methods::{
        SEARCH_DEFAULT_PAGE_SIZE, ToolReply, effective_page_size, parse_required_params,
        require_text, run_tool,
    },
};

#[derive(Debug, Deserialize)]
struct SearchParams {
    query: String,
    #[serde(default)]
    page_size: Option<u64>,
}

pub async fn handle_search(
    state: &SharedState,
    params: Option<&Value>,
) -> Result<Value, ErrorShape> {
    let parsed: SearchParams = parse_required_params("rawg_search", params)?;
    let query = require_text(&parsed.query, "Query cannot be empty")?;
    let page_size = effective_page_size(parsed.page_size, SEARCH_DEFAULT_PAGE_SIZE);

    run_tool(
        state,
        format!("Searching games: {query}"),
        search(state.clone(), query.to_owned(), page_size),
    )
    .await
}

async fn search(
    state: SharedState,
    query: String,
    page_size: u32,
) -> Result<ToolReply, ToolError> {
    let payload = state
        .catalog()
        .fetch(
            "games",
            &[
                ("search", query.to_owned()),
                ("page_size", page_size.to_string()),
                ("search_precise", "true".to_owned()),
            ],
        )
        .await
        .map_err(|error| ToolError::Upstream(format!("RAWG API error: {error}")))?;

    let mut games = to_game_summaries(results_of(&payload));
    games.truncate(page_size as usize);

    Ok(
        ToolReply::new(format!("Found {} games for '{query}'", games.len()))
            .field("query", json!(query))
            .field("count", json!(games.len()))
            .field("games", json!(games)),
    )
}
