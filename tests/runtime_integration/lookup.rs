use axum::http::StatusCode;
use serde_json::json;

use super::support::{StubReply, UpstreamStub, ok, raw_game, results, spawn_gateway};

#[tokio::test]
async fn details_without_description_use_placeholders() {
    let upstream = UpstreamStub::spawn(vec![
        ("games", ok(results(vec![raw_game(3498, "Grand Theft Auto V")]))),
        (
            "games/3498",
            ok(json!({
                "id": 3498,
                "name": "Grand Theft Auto V",
                "released": "2013-09-17",
                "rating": 4.47,
                "playtime": 74,
                "developers": [{"name": "Rockstar North"}],
                "publishers": [{"name": "Rockstar Games"}],
                "esrb_rating": null,
                "tags": [
                    {"name": "Open World"}, {"name": "Singleplayer"}, {"name": "Multiplayer"},
                    {"name": "Action"}, {"name": "Third Person"}, {"name": "Crime"}
                ]
            })),
        ),
    ])
    .await;
    let server = spawn_gateway(&upstream).await;

    let response = server
        .rpc(
            "rawg_game_details",
            Some(json!({"game_name": "Grand Theft Auto V"})),
        )
        .await;
    let result = &response["result"];
    assert_eq!(result["message"], "Details fetched for 'Grand Theft Auto V'");
    let game = &result["game"];
    assert_eq!(game["id"], 3498);
    assert_eq!(game["description"], "No description");
    assert_eq!(game["esrb_rating"], "Not Rated");
    assert_eq!(game["website"], "");
    assert_eq!(game["playtime"], 74);
    assert_eq!(game["developers"], json!(["Rockstar North"]));
    assert_eq!(game["tags"].as_array().map(Vec::len), Some(5));

    let calls = upstream.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].path, "games");
    assert_eq!(calls[0].query["search"], "Grand Theft Auto V");
    assert_eq!(calls[0].query["page_size"], "1");
    assert_eq!(calls[0].query["search_precise"], "true");
    assert_eq!(calls[1].path, "games/3498");
    assert_eq!(calls[1].query["key"], "test-key");

    server.stop().await;
    upstream.stop().await;
}

#[tokio::test]
async fn details_truncate_long_descriptions() {
    let description = "x".repeat(620);
    let upstream = UpstreamStub::spawn(vec![
        ("games", ok(results(vec![raw_game(7, "Long Game")]))),
        (
            "games/7",
            ok(json!({"id": 7, "name": "Long Game", "description_raw": description})),
        ),
    ])
    .await;
    let server = spawn_gateway(&upstream).await;

    let response = server
        .rpc("rawg_game_details", Some(json!({"game_name": "Long Game"})))
        .await;
    let text = response["result"]["game"]["description"]
        .as_str()
        .expect("description");
    assert_eq!(text, format!("{}...", "x".repeat(500)));

    server.stop().await;
    upstream.stop().await;
}

#[tokio::test]
async fn stores_for_unknown_game_is_not_found_without_second_call() {
    let upstream = UpstreamStub::spawn(vec![("games", ok(results(Vec::new())))]).await;
    let server = spawn_gateway(&upstream).await;

    let response = server
        .rpc(
            "rawg_game_stores",
            Some(json!({"game_name": "Unknown Game XYZ"})),
        )
        .await;
    assert_eq!(
        response["error"]["message"],
        "Game 'Unknown Game XYZ' not found"
    );
    assert_eq!(response["error"]["data"]["kind"], "not_found");
    assert_eq!(upstream.calls().len(), 1);

    let transcript = server.transcript().await;
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0]["content"], "Fetching stores for: Unknown Game XYZ");
    assert_eq!(transcript[1]["content"], "Game 'Unknown Game XYZ' not found");

    server.stop().await;
    upstream.stop().await;
}

#[tokio::test]
async fn stores_fill_missing_urls() {
    let upstream = UpstreamStub::spawn(vec![
        ("games", ok(results(vec![raw_game(42, "Hades")]))),
        (
            "games/42/stores",
            ok(json!({
                "count": 2,
                "results": [
                    {"id": 1, "url": "https://store.steampowered.com/app/1145360/", "store": {"id": 1, "name": "Steam"}},
                    {"id": 2, "store": {"id": 6, "name": "Nintendo Store"}}
                ]
            })),
        ),
    ])
    .await;
    let server = spawn_gateway(&upstream).await;

    let response = server
        .rpc("rawg_game_stores", Some(json!({"game_name": "Hades"})))
        .await;
    let result = &response["result"];
    assert_eq!(result["game_name"], "Hades");
    assert_eq!(result["message"], "Found 2 stores for 'Hades'");
    assert_eq!(result["count"], 2);
    assert_eq!(result["stores"][0]["store"], "Steam");
    assert_eq!(result["stores"][1]["url"], "No URL available");
    assert_eq!(result["stores"][1]["store_id"], 6);

    server.stop().await;
    upstream.stop().await;
}

#[tokio::test]
async fn dlcs_forward_capped_page_size() {
    let upstream = UpstreamStub::spawn(vec![
        ("games", ok(results(vec![raw_game(3328, "The Witcher 3")]))),
        (
            "games/3328/additions",
            ok(results(vec![
                raw_game(58753, "Hearts of Stone"),
                raw_game(58754, "Blood and Wine"),
            ])),
        ),
    ])
    .await;
    let server = spawn_gateway(&upstream).await;

    let response = server
        .rpc(
            "rawg_game_dlcs",
            Some(json!({"game_name": "The Witcher 3", "page_size": 30})),
        )
        .await;
    let result = &response["result"];
    assert_eq!(result["message"], "Found 2 DLCs for 'The Witcher 3'");
    assert_eq!(result["count"], 2);
    assert_eq!(result["dlcs"][1]["name"], "Blood and Wine");

    let calls = upstream.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[1].path, "games/3328/additions");
    assert_eq!(calls[1].query["page_size"], "20");

    server.stop().await;
    upstream.stop().await;
}

#[tokio::test]
async fn search_step_failure_is_an_upstream_error() {
    let upstream = UpstreamStub::spawn(vec![(
        "games",
        StubReply::Json(StatusCode::SERVICE_UNAVAILABLE, json!({})),
    )])
    .await;
    let server = spawn_gateway(&upstream).await;

    let response = server
        .rpc("rawg_game_dlcs", Some(json!({"game_name": "Hades"})))
        .await;
    let message = response["error"]["message"].as_str().expect("error message");
    assert!(message.starts_with("RAWG API error: "), "{message}");
    assert_eq!(response["error"]["data"]["kind"], "upstream");
    assert_eq!(upstream.calls().len(), 1);

    server.stop().await;
    upstream.stop().await;
}

#[tokio::test]
async fn detail_step_failure_names_the_step() {
    let upstream =
        UpstreamStub::spawn(vec![("games", ok(results(vec![raw_game(42, "Hades")])))]).await;
    let server = spawn_gateway(&upstream).await;

    let response = server
        .rpc("rawg_game_details", Some(json!({"game_name": "Hades"})))
        .await;
    let message = response["error"]["message"].as_str().expect("error message");
    assert!(message.starts_with("Error fetching details: "), "{message}");
    assert!(message.contains("404"), "{message}");
    assert_eq!(upstream.calls().len(), 2);

    server.stop().await;
    upstream.stop().await;
}

#[tokio::test]
async fn search_result_without_id_is_unexpected() {
    let upstream = UpstreamStub::spawn(vec![(
        "games",
        ok(json!({"results": [{"name": "Ghost Entry"}]})),
    )])
    .await;
    let server = spawn_gateway(&upstream).await;

    let response = server
        .rpc("rawg_game_dlcs", Some(json!({"game_name": "Ghost Entry"})))
        .await;
    assert_eq!(
        response["error"]["message"],
        "Error fetching DLCs: search result for 'Ghost Entry' has no id"
    );
    assert_eq!(response["error"]["data"]["kind"], "unexpected");
    assert_eq!(upstream.calls().len(), 1);

    let response = server
        .rpc("rawg_game_details", Some(json!({"game_name": "  "})))
        .await;
    assert_eq!(response["error"]["message"], "Game name cannot be empty");

    server.stop().await;
    upstream.stop().await;
}
