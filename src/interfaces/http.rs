use std::future::Future;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use futures_util::future::join_all;
use serde_json::Value;
use tokio::net::TcpListener;
use tracing::info;

use crate::{
    application::state::SharedState,
    domain::error::DomainError,
    protocol::{Envelope, parse_envelope, response_error},
    rpc::{
        dispatcher::dispatch_value,
        methods::status::{health_payload, info_payload},
    },
};

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", post(rpc_handler))
        .route("/health", get(health_handler))
        .route("/info", get(info_handler))
        .with_state(state)
}

pub async fn serve(
    listener: TcpListener,
    state: SharedState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), DomainError> {
    let local_addr = listener.local_addr().map_err(|error| {
        DomainError::Unavailable(format!("failed to read listener address: {error}"))
    })?;

    info!(
        "rawg-gateway listening on http://{}:{}, methods={}",
        local_addr.ip(),
        local_addr.port(),
        state.methods().len(),
    );

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|error| DomainError::Unavailable(format!("server runtime error: {error}")))
}

async fn rpc_handler(State(state): State<SharedState>, body: Bytes) -> Response {
    match parse_envelope(&body) {
        Err(error) => (StatusCode::OK, Json(response_error(Value::Null, error))).into_response(),
        Ok(Envelope::Single(raw)) => match dispatch_value(&state, raw).await {
            Some(response) => (StatusCode::OK, Json(response)).into_response(),
            None => StatusCode::NO_CONTENT.into_response(),
        },
        Ok(Envelope::Batch(items)) => {
            let responses = join_all(items.into_iter().map(|raw| dispatch_value(&state, raw)))
                .await
                .into_iter()
                .flatten()
                .collect::<Vec<_>>();
            if responses.is_empty() {
                StatusCode::NO_CONTENT.into_response()
            } else {
                (StatusCode::OK, Json(responses)).into_response()
            }
        }
    }
}

async fn health_handler(State(state): State<SharedState>) -> impl IntoResponse {
    (StatusCode::OK, Json(health_payload(&state)))
}

async fn info_handler(State(state): State<SharedState>) -> impl IntoResponse {
    (StatusCode::OK, Json(info_payload(&state)))
}
