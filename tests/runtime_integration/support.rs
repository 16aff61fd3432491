use std::{
    collections::HashMap,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use rawg_gateway::{
    application::{config::RuntimeConfig, startup},
    storage::TranscriptSink,
};
use serde_json::{Value, json};
use tempfile::TempDir;
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

#[derive(Debug, Clone)]
pub(crate) enum StubReply {
    Json(StatusCode, Value),
    Text(StatusCode, String),
    /// `200 OK` with the body, sent after the delay.
    Delayed(Duration, Value),
}

pub(crate) fn ok(body: Value) -> StubReply {
    StubReply::Json(StatusCode::OK, body)
}

#[derive(Debug, Clone)]
pub(crate) struct UpstreamCall {
    pub(crate) path: String,
    pub(crate) query: HashMap<String, String>,
}

#[derive(Clone)]
struct StubState {
    routes: Arc<HashMap<String, StubReply>>,
    calls: Arc<Mutex<Vec<UpstreamCall>>>,
}

/// Stand-in for the RAWG API. Paths are matched without the `/api/` prefix.
pub(crate) struct UpstreamStub {
    pub(crate) base_url: String,
    calls: Arc<Mutex<Vec<UpstreamCall>>>,
    shutdown: Option<oneshot::Sender<()>>,
    join: JoinHandle<()>,
}

impl UpstreamStub {
    pub(crate) async fn spawn(routes: Vec<(&str, StubReply)>) -> Self {
        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
            .await
            .expect("stub listener should bind");
        let addr = listener
            .local_addr()
            .expect("stub listener should expose local addr");

        let calls = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            routes: Arc::new(
                routes
                    .into_iter()
                    .map(|(path, reply)| (path.to_owned(), reply))
                    .collect(),
            ),
            calls: calls.clone(),
        };
        let router = Router::new().fallback(stub_handler).with_state(state);

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let join = tokio::spawn(async move {
            let _ = axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await;
        });

        Self {
            base_url: format!("http://{addr}/api"),
            calls,
            shutdown: Some(shutdown_tx),
            join,
        }
    }

    pub(crate) fn calls(&self) -> Vec<UpstreamCall> {
        self.calls.lock().expect("stub calls lock").clone()
    }

    pub(crate) async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        let _ = self.join.await;
    }
}

async fn stub_handler(
    State(stub): State<StubState>,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let path = uri.path().trim_start_matches("/api/").to_owned();
    stub.calls
        .lock()
        .expect("stub calls lock")
        .push(UpstreamCall {
            path: path.clone(),
            query,
        });

    match stub.routes.get(&path) {
        Some(StubReply::Json(status, body)) => (*status, Json(body.clone())).into_response(),
        Some(StubReply::Text(status, body)) => (*status, body.clone()).into_response(),
        Some(StubReply::Delayed(delay, body)) => {
            tokio::time::sleep(*delay).await;
            (StatusCode::OK, Json(body.clone())).into_response()
        }
        None => (StatusCode::NOT_FOUND, Json(json!({"detail": "Not found."}))).into_response(),
    }
}

pub(crate) struct GatewayHandle {
    pub(crate) addr: SocketAddr,
    pub(crate) transcript_path: PathBuf,
    shutdown: Option<oneshot::Sender<()>>,
    join: JoinHandle<()>,
    _temp_dir: TempDir,
}

impl GatewayHandle {
    pub(crate) async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        let _ = self.join.await;
    }

    /// Posts a JSON-RPC call and returns the response envelope.
    pub(crate) async fn rpc(&self, method: &str, params: Option<Value>) -> Value {
        let mut request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
        });
        if let Some(params) = params {
            request["params"] = params;
        }

        self.post_raw(request.to_string()).await.1
    }

    pub(crate) async fn post_raw(&self, body: String) -> (reqwest::StatusCode, Value) {
        let response = reqwest::Client::new()
            .post(format!("http://{}/", self.addr))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("rpc request should return");

        let status = response.status();
        let text = response.text().await.expect("rpc body should read");
        let payload = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).expect("rpc response should be json")
        };
        (status, payload)
    }

    /// Transcript as persisted on disk; empty when nothing was written yet.
    pub(crate) async fn transcript(&self) -> Vec<Value> {
        match tokio::fs::read_to_string(&self.transcript_path).await {
            Ok(text) => serde_json::from_str(&text).expect("transcript should be a json array"),
            Err(_) => Vec::new(),
        }
    }

    /// Polls the transcript file until it holds `len` entries or the
    /// deadline passes, returning the last complete read.
    pub(crate) async fn wait_for_transcript(&self, len: usize) -> Vec<Value> {
        let mut latest = Vec::new();
        for _ in 0..60 {
            if let Ok(text) = tokio::fs::read_to_string(&self.transcript_path).await
                && let Ok(entries) = serde_json::from_str::<Vec<Value>>(&text)
            {
                latest = entries;
                if latest.len() >= len {
                    break;
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        latest
    }
}

pub(crate) async fn spawn_gateway(upstream: &UpstreamStub) -> GatewayHandle {
    start_gateway(upstream, None).await
}

/// Gateway whose transcript goes to `sink` instead of the default file.
pub(crate) async fn spawn_gateway_with_sink(
    upstream: &UpstreamStub,
    sink: Arc<dyn TranscriptSink>,
) -> GatewayHandle {
    start_gateway(upstream, Some(sink)).await
}

async fn start_gateway(
    upstream: &UpstreamStub,
    sink: Option<Arc<dyn TranscriptSink>>,
) -> GatewayHandle {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0))
        .await
        .expect("listener should bind");
    let addr = listener
        .local_addr()
        .expect("listener should expose local addr");

    let temp_dir = tempfile::tempdir().expect("temp dir should be created");
    let transcript_path = temp_dir.path().join("logs").join("rawg_mcp_log.json");

    let config = RuntimeConfig::for_test(
        IpAddr::V4(Ipv4Addr::LOCALHOST),
        addr.port(),
        upstream.base_url.clone(),
        transcript_path.clone(),
    );

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let join = tokio::spawn(async move {
        let shutdown = async {
            let _ = shutdown_rx.await;
        };
        let _ = match sink {
            Some(sink) => startup::run_with_sink(listener, config, sink, shutdown).await,
            None => startup::run_with_listener(listener, config, shutdown).await,
        };
    });

    GatewayHandle {
        addr,
        transcript_path,
        shutdown: Some(shutdown_tx),
        join,
        _temp_dir: temp_dir,
    }
}

pub(crate) fn raw_game(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "released": "2011-04-18",
        "rating": 4.6,
        "metacritic": 95,
        "platforms": [{"platform": {"id": 4, "name": "PC"}}],
        "genres": [{"id": 7, "name": "Puzzle"}],
        "tags": [
            {"name": "Singleplayer"}, {"name": "Co-op"}, {"name": "Funny"},
            {"name": "Physics"}, {"name": "Sci-fi"}, {"name": "First-Person"}
        ],
        "background_image": format!("https://media.example/{id}.jpg")
    })
}

pub(crate) fn results(games: Vec<Value>) -> Value {
    json!({ "count": games.len(), "next": null, "previous": null, "results": games })
}
