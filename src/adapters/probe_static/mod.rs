// In-memory probe adapter for tests and dry runs

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::domain::model::*;
use crate::ports::*;

/// Answers probes from a fixed table. Unknown paths behave like a failed probe.
#[derive(Default)]
pub struct StaticProbeAdapter {
    table: HashMap<PathBuf, VideoMetadata>,
    calls: AtomicUsize,
}

impl StaticProbeAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the metadata returned for `path`
    pub fn with_file(mut self, path: impl Into<PathBuf>, metadata: VideoMetadata) -> Self {
        self.table.insert(path.into(), metadata);
        self
    }

    /// Number of probes served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProbePort for StaticProbeAdapter {
    async fn probe_media(&self, file_path: &Path) -> VideoMetadata {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // yield so concurrent probes actually interleave
        tokio::task::yield_now().await;
        self.table.get(file_path).cloned().unwrap_or_default()
    }
}
