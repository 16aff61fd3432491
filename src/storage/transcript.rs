use std::{
    future::Future,
    path::{Path, PathBuf},
    pin::Pin,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use crate::{
    domain::{
        error::DomainError,
        models::{LogEntry, Role},
    },
    storage::util::{now_iso8601, to_json_pretty},
};

pub type SinkFuture<'a> = Pin<Box<dyn Future<Output = Result<(), DomainError>> + Send + 'a>>;

/// Durable storage for the transcript. Every call receives the complete
/// sequence and replaces whatever was stored before.
pub trait TranscriptSink: Send + Sync {
    fn persist<'a>(&'a self, entries: &'a [LogEntry]) -> SinkFuture<'a>;
}

/// Writes the transcript as one pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub async fn create(path: &Path) -> Result<Self, DomainError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(|error| {
                DomainError::Storage(format!("failed to create transcript directory: {error}"))
            })?;
        }

        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

impl TranscriptSink for JsonFileSink {
    fn persist<'a>(&'a self, entries: &'a [LogEntry]) -> SinkFuture<'a> {
        Box::pin(async move {
            let text = to_json_pretty(entries).map_err(DomainError::Storage)?;
            tokio::fs::write(&self.path, text).await.map_err(|error| {
                DomainError::Storage(format!(
                    "failed to write transcript {}: {error}",
                    self.path.display()
                ))
            })
        })
    }
}

/// Keeps the last persisted snapshot in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    snapshot: Mutex<Vec<LogEntry>>,
    flushes: AtomicUsize,
}

impl MemorySink {
    #[must_use]
    pub fn snapshot(&self) -> Vec<LogEntry> {
        self.snapshot
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn flushes(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }
}

impl TranscriptSink for MemorySink {
    fn persist<'a>(&'a self, entries: &'a [LogEntry]) -> SinkFuture<'a> {
        Box::pin(async move {
            let mut guard = self
                .snapshot
                .lock()
                .map_err(|_| DomainError::Storage("memory sink lock poisoned".to_owned()))?;
            *guard = entries.to_vec();
            self.flushes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }
}

/// Process-wide conversation log. Appends are serialized: the entry is
/// stamped, pushed and flushed while the writer lock is held, so memory,
/// timestamps and storage all agree on order.
#[derive(Clone)]
pub struct Transcript {
    inner: Arc<TranscriptInner>,
}

struct TranscriptInner {
    entries: tokio::sync::Mutex<Vec<LogEntry>>,
    sink: Arc<dyn TranscriptSink>,
}

impl Transcript {
    #[must_use]
    pub fn new(sink: Arc<dyn TranscriptSink>) -> Self {
        Self {
            inner: Arc::new(TranscriptInner {
                entries: tokio::sync::Mutex::new(Vec::new()),
                sink,
            }),
        }
    }

    /// Appends one entry and flushes the whole sequence. A failed flush is
    /// reported but the entry stays in memory and goes out with the next one.
    pub async fn append(
        &self,
        role: Role,
        content: impl Into<String>,
    ) -> Result<LogEntry, DomainError> {
        let mut entries = self.inner.entries.lock().await;
        let entry = LogEntry {
            role,
            content: content.into(),
            timestamp: now_iso8601(),
        };
        entries.push(entry.clone());
        self.inner.sink.persist(&entries).await?;
        Ok(entry)
    }

}

#[cfg(test)]
impl Transcript {
    async fn entries(&self) -> Vec<LogEntry> {
        self.inner.entries.lock().await.clone()
    }
}
