use std::{error::Error as _, time::Duration};

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::error::DomainError;

pub const DEFAULT_BASE_URL: &str = "https://api.rawg.io/api";
pub const API_KEY_PARAM: &str = "key";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    /// Connection failure, timeout or non-success status.
    #[error("{0}")]
    Transport(String),
    /// The catalog answered but the body was not usable JSON.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type UpstreamOutcome = Result<Value, UpstreamError>;

/// Client for the RAWG catalog API. One attempt per call, bounded by the
/// configured timeout.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl CatalogClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, DomainError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| {
                DomainError::Unavailable(format!("failed to construct http client: {error}"))
            })?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            api_key: api_key.to_owned(),
        })
    }

    #[must_use]
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }

    pub async fn fetch(&self, endpoint: &str, params: &[(&str, String)]) -> UpstreamOutcome {
        let query = with_api_key(params, &self.api_key);

        let response = self
            .http
            .get(self.endpoint_url(endpoint))
            .query(&query)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|error| {
                let message = describe(error);
                warn!(endpoint, "catalog request failed: {message}");
                UpstreamError::Transport(message)
            })?;

        debug!(endpoint, status = %response.status(), "catalog response received");

        let body = response.bytes().await.map_err(|error| {
            let message = describe(error);
            warn!(endpoint, "catalog body read failed: {message}");
            UpstreamError::Transport(message)
        })?;

        serde_json::from_slice::<Value>(&body).map_err(|error| {
            warn!(endpoint, "catalog body is not json: {error}");
            UpstreamError::Unexpected(error.to_string())
        })
    }
}

/// Caller params with the API key appended last; a caller-supplied `key`
/// never reaches the wire.
fn with_api_key(params: &[(&str, String)], api_key: &str) -> Vec<(String, String)> {
    params
        .iter()
        .filter(|(name, _)| *name != API_KEY_PARAM)
        .map(|(name, value)| ((*name).to_owned(), value.clone()))
        .chain(std::iter::once((API_KEY_PARAM.to_owned(), api_key.to_owned())))
        .collect()
}

// The request URL carries the API key, so it is stripped before the message
// leaves this module.
fn describe(error: reqwest::Error) -> String {
    let error = error.without_url();
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
