use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    application::state::SharedState,
    catalog::normalize::{results_of, to_game_summaries},
    domain::{error::ToolError, models::GameSummary},
    protocol::ErrorShape,
    rpc::methods::{
        LIST_DEFAULT_PAGE_SIZE, ToolReply, effective_page_size, parse_optional_params,
        parse_required_params, require_text, run_tool,
    },
};

#[derive(Debug, Deserialize)]
struct PopularParams {
    #[serde(default)]
    page_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct GenreParams {
    genre: String,
    #[serde(default)]
    page_size: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct PlatformParams {
    platform: String,
    #[serde(default)]
    page_size: Option<u64>,
}

pub async fn handle_popular(
    state: &SharedState,
    params: Option<&Value>,
) -> Result<Value, ErrorShape> {
    let parsed: PopularParams = parse_optional_params("rawg_popular", params)?;
    let page_size = effective_page_size(parsed.page_size, LIST_DEFAULT_PAGE_SIZE);

    run_tool(
        state,
        "Fetching popular games".to_owned(),
        popular(state.clone(), page_size),
    )
    .await
}

pub async fn handle_by_genre(
    state: &SharedState,
    params: Option<&Value>,
) -> Result<Value, ErrorShape> {
    let parsed: GenreParams = parse_required_params("rawg_by_genre", params)?;
    let genre = require_text(&parsed.genre, "Genre cannot be empty")?;
    let page_size = effective_page_size(parsed.page_size, LIST_DEFAULT_PAGE_SIZE);

    run_tool(
        state,
        format!("Searching games by genre: {genre}"),
        by_genre(state.clone(), genre.to_owned(), page_size),
    )
    .await
}

pub async fn handle_by_platform(
    state: &SharedState,
    params: Option<&Value>,
) -> Result<Value, ErrorShape> {
    let parsed: PlatformParams = parse_required_params("rawg_by_platform", params)?;
    let platform = require_text(&parsed.platform, "Platform cannot be empty")?;
    let page_size = effective_page_size(parsed.page_size, LIST_DEFAULT_PAGE_SIZE);

    run_tool(
        state,
        format!("Searching games by platform: {platform}"),
        by_platform(state.clone(), platform.to_owned(), page_size),
    )
    .await
}

async fn popular(state: SharedState, page_size: u32) -> Result<ToolReply, ToolError> {
    let games = list_games(&state, "-added", None, page_size).await?;

    Ok(
        ToolReply::new(format!("Fetched {} popular games", games.len()))
            .field("count", json!(games.len()))
            .field("games", json!(games)),
    )
}

async fn by_genre(
    state: SharedState,
    genre: String,
    page_size: u32,
) -> Result<ToolReply, ToolError> {
    let filter = ("genres", genre.to_lowercase());
    let games = list_games(&state, "-rating", Some(filter), page_size).await?;

    Ok(
        ToolReply::new(format!("Found {} games in genre '{genre}'", games.len()))
            .field("genre", json!(genre))
            .field("count", json!(games.len()))
            .field("games", json!(games)),
    )
}

async fn by_platform(
    state: SharedState,
    platform: String,
    page_size: u32,
) -> Result<ToolReply, ToolError> {
    let filter = ("platforms", platform.to_lowercase());
    let games = list_games(&state, "-rating", Some(filter), page_size).await?;

    Ok(ToolReply::new(format!(
        "Found {} games for platform '{platform}'",
        games.len()
    ))
    .field("platform", json!(platform))
    .field("count", json!(games.len()))
    .field("games", json!(games)))
}

/// One page of `games` in the given order, optionally filtered. Filter
/// values are lower-cased slugs; callers echo their original spelling.
async fn list_games(
    state: &SharedState,
    ordering: &str,
    filter: Option<(&str, String)>,
    page_size: u32,
) -> Result<Vec<GameSummary>, ToolError> {
    let mut params = Vec::with_capacity(3);
    if let Some(filter) = filter {
        params.push(filter);
    }
    params.push(("page_size", page_size.to_string()));
    params.push(("ordering", ordering.to_owned()));

    let payload = state
        .catalog()
        .fetch("games", &params)
        .await
        .map_err(|error| ToolError::Upstream(format!("RAWG API error: {error}")))?;

    let mut games = to_game_summaries(results_of(&payload));
    games.truncate(page_size as usize);
    Ok(games)
}
