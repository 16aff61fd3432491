use std::{sync::Arc, time::Instant};

use tracing::warn;

use crate::{
    application::config::RuntimeConfig,
    catalog::CatalogClient,
    domain::{error::DomainError, models::Role},
    storage::{Transcript, TranscriptSink},
};

#[derive(Clone)]
pub struct SharedState {
    inner: Arc<InnerState>,
}

struct InnerState {
    config: RuntimeConfig,
    catalog: CatalogClient,
    transcript: Transcript,
    methods: Vec<String>,
    started_at: Instant,
}

impl SharedState {
    pub fn new(
        config: RuntimeConfig,
        sink: Arc<dyn TranscriptSink>,
        methods: Vec<String>,
    ) -> Result<Self, DomainError> {
        let catalog =
            CatalogClient::new(&config.base_url, &config.api_key, config.upstream_timeout)?;

        Ok(Self {
            inner: Arc::new(InnerState {
                catalog,
                transcript: Transcript::new(sink),
                methods,
                started_at: Instant::now(),
                config,
            }),
        })
    }

    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    #[must_use]
    pub fn methods(&self) -> Vec<String> {
        self.inner.methods.clone()
    }

    #[must_use]
    pub fn uptime_ms(&self) -> u64 {
        u64::try_from(self.inner.started_at.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Records one transcript entry. A storage failure never fails the call
    /// that produced the entry.
    pub async fn record(&self, role: Role, content: &str) {
        if let Err(error) = self.inner.transcript.append(role, content).await {
            warn!("transcript append failed role={role}: {error}");
        }
    }
}
