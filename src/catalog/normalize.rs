//! Projections of raw catalog payloads into the simplified schemas returned by
//! the tools. Every function here is total: a missing or mistyped field
//! becomes its declared default.

use serde_json::Value;

use crate::domain::models::{GameDetail, GameSummary, StoreListing};

pub const TAG_LIMIT: usize = 5;
pub const DESCRIPTION_LIMIT: usize = 500;
pub const ELLIPSIS: &str = "...";
pub const NO_DESCRIPTION: &str = "No description";
pub const NOT_RATED: &str = "Not Rated";
pub const NO_STORE_URL: &str = "No URL available";

/// The `results` list of a paged catalog payload, `Null` when absent.
#[must_use]
pub fn results_of(payload: &Value) -> &Value {
    payload.get("results").unwrap_or(&Value::Null)
}

/// Maps a `results` array. Anything other than an array yields no games.
#[must_use]
pub fn to_game_summaries(raw: &Value) -> Vec<GameSummary> {
    raw.as_array()
        .map(|games| games.iter().map(to_game_summary).collect())
        .unwrap_or_default()
}

#[must_use]
pub fn to_game_summary(game: &Value) -> GameSummary {
    GameSummary {
        id: int_field(game, "id"),
        name: text_field(game, "name"),
        released: text_field(game, "released"),
        rating: game.get("rating").and_then(Value::as_f64),
        metacritic: int_field(game, "metacritic"),
        platforms: platform_names(game),
        genres: names(game, "genres", usize::MAX),
        tags: names(game, "tags", TAG_LIMIT),
        background_image: text_field(game, "background_image"),
    }
}

#[must_use]
pub fn to_game_detail(game: &Value) -> GameDetail {
    GameDetail {
        id: int_field(game, "id"),
        name: text_field(game, "name"),
        description: truncate_description(game.get("description_raw").and_then(Value::as_str)),
        released: text_field(game, "released"),
        rating: game.get("rating").and_then(Value::as_f64),
        metacritic: int_field(game, "metacritic"),
        playtime: int_field(game, "playtime").unwrap_or(0),
        developers: names(game, "developers", usize::MAX),
        publishers: names(game, "publishers", usize::MAX),
        genres: names(game, "genres", usize::MAX),
        platforms: platform_names(game),
        tags: names(game, "tags", TAG_LIMIT),
        esrb_rating: game
            .pointer("/esrb_rating/name")
            .and_then(Value::as_str)
            .unwrap_or(NOT_RATED)
            .to_owned(),
        website: text_field(game, "website").unwrap_or_default(),
        background_image: text_field(game, "background_image"),
    }
}

#[must_use]
pub fn to_store_listings(raw: &Value) -> Vec<StoreListing> {
    raw.as_array()
        .map(|stores| {
            stores
                .iter()
                .map(|entry| StoreListing {
                    store: entry
                        .pointer("/store/name")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_owned(),
                    url: text_field(entry, "url").unwrap_or_else(|| NO_STORE_URL.to_owned()),
                    store_id: entry
                        .pointer("/store/id")
                        .and_then(Value::as_i64)
                        .unwrap_or(0),
                })
                .collect()
        })
        .unwrap_or_default()
}

/// First [`DESCRIPTION_LIMIT`] characters plus [`ELLIPSIS`] when longer,
/// the text itself otherwise, [`NO_DESCRIPTION`] when empty or absent.
#[must_use]
pub fn truncate_description(raw: Option<&str>) -> String {
    match raw {
        None | Some("") => NO_DESCRIPTION.to_owned(),
        Some(text) => match text.char_indices().nth(DESCRIPTION_LIMIT) {
            Some((cut, _)) => format!("{}{ELLIPSIS}", &text[..cut]),
            None => text.to_owned(),
        },
    }
}

fn int_field(value: &Value, field: &str) -> Option<i64> {
    value.get(field).and_then(Value::as_i64)
}

fn text_field(value: &Value, field: &str) -> Option<String> {
    value.get(field).and_then(Value::as_str).map(str::to_owned)
}

fn names(value: &Value, field: &str, limit: usize) -> Vec<String> {
    value
        .get(field)
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .take(limit)
                .filter_map(|item| item.get("name").and_then(Value::as_str))
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}

fn platform_names(value: &Value) -> Vec<String> {
    value
        .get("platforms")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.pointer("/platform/name").and_then(Value::as_str))
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default()
}
