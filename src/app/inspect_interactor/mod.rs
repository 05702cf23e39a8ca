// Inspect interactor - Probes and scores a single media file

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::ScoringPolicy;
use crate::ports::*;
use crate::utils::Utils;

/// Interactor for single-file inspection
pub struct InspectInteractor {
    probe_port: Arc<dyn ProbePort>,
    fs_port: Arc<dyn FsPort>,
    log_port: Arc<dyn LogPort>,
}

impl InspectInteractor {
    /// Create new inspect interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        fs_port: Arc<dyn FsPort>,
        log_port: Arc<dyn LogPort>,
    ) -> Self {
        Self {
            probe_port,
            fs_port,
            log_port,
        }
    }

    /// Probe the file, score it and render a summary in the requested format
    pub async fn execute(&self, request: InspectRequest) -> Result<InspectResponse, DomainError> {
        let input = self.fs_port.resolve_path(&request.input_path).await?;
        self.log_port
            .info(&format!("Starting media file inspection for: {}", input.display()))
            .await;

        let size_bytes = self.fs_port.file_size(&input).await.map_err(|_| {
            DomainError::FsFail(format!("Input file does not exist: {}", input.display()))
        })?;

        let metadata = self.probe_port.probe_media(&input).await;
        if metadata.is_degraded() {
            self.log_port
                .warn(&format!(
                    "No metadata could be read from {}, scoring with empty values",
                    input.display()
                ))
                .await;
        }

        let entry = ScoredEntry::new(
            input.to_string_lossy().into_owned(),
            metadata,
            size_bytes,
            request.scoring,
        );

        let summary = match request.format {
            InspectFormat::Json => format_as_json(&entry)?,
            InspectFormat::Yaml => format_as_yaml(&entry)?,
            InspectFormat::Text => format_as_text(&entry, request.scoring),
        };

        self.log_port.info("Media file inspection completed").await;
        self.log_port.flush().await;

        Ok(InspectResponse { entry, summary })
    }
}

/// Serialized view of an inspected file
#[derive(Serialize)]
struct InspectView<'a> {
    path: &'a str,
    size_bytes: u64,
    score: f64,
    metadata: &'a VideoMetadata,
}

impl<'a> From<&'a ScoredEntry> for InspectView<'a> {
    fn from(entry: &'a ScoredEntry) -> Self {
        Self {
            path: entry.path(),
            size_bytes: entry.size_bytes(),
            score: entry.score(),
            metadata: entry.metadata(),
        }
    }
}

fn format_as_json(entry: &ScoredEntry) -> Result<String, DomainError> {
    serde_json::to_string_pretty(&InspectView::from(entry))
        .map_err(|e| DomainError::InternalError(format!("JSON serialization failed: {}", e)))
}

fn format_as_yaml(entry: &ScoredEntry) -> Result<String, DomainError> {
    serde_yaml::to_string(&InspectView::from(entry))
        .map_err(|e| DomainError::InternalError(format!("YAML serialization failed: {}", e)))
}

fn format_as_text(entry: &ScoredEntry, scoring: ScoringPolicy) -> String {
    let metadata = entry.metadata();
    let mut output = String::new();

    output.push_str("Media File Information:\n");
    output.push_str(&format!("  File: {}\n", entry.path()));
    output.push_str(&format!(
        "  Duration: {}\n",
        Utils::format_millis(metadata.duration_ms)
    ));
    output.push_str(&format!(
        "  File Size: {}\n",
        Utils::format_file_size(entry.size_bytes())
    ));
    let resolution = if metadata.resolution.is_known() {
        metadata.resolution.to_string()
    } else {
        "unknown resolution".to_string()
    };
    output.push_str(&format!(
        "  Video: {} {} @ {:.3} fps, {:.0} kbps\n",
        or_unknown(&metadata.video_codec),
        resolution,
        metadata.frame_rate,
        metadata.video_bitrate_kbps
    ));
    output.push_str(&format!(
        "  Audio: {} {} kbps\n",
        or_unknown(&metadata.audio_codec),
        metadata.audio_bitrate_kbps
    ));
    output.push_str(&format!("  Quality Score ({}): {}\n", scoring, entry.score()));
    output
}

fn or_unknown(codec: &str) -> &str {
    if codec.is_empty() {
        "unknown"
    } else {
        codec
    }
}

/// Summary format for `inspect`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InspectFormat {
    #[default]
    Text,
    Json,
    Yaml,
}

impl InspectFormat {
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.trim().to_lowercase().as_str() {
            "text" | "" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            other => Err(DomainError::BadArgs(format!(
                "Invalid format: {} (expected text, json or yaml)",
                other
            ))),
        }
    }
}

/// Request for single-file inspection
#[derive(Debug, Clone)]
pub struct InspectRequest {
    pub input_path: PathBuf,
    pub format: InspectFormat,
    pub scoring: ScoringPolicy,
}

impl InspectRequest {
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            format: InspectFormat::Text,
            scoring: ScoringPolicy::default(),
        }
    }

    pub fn with_format(mut self, format: InspectFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringPolicy) -> Self {
        self.scoring = scoring;
        self
    }
}

/// Response from single-file inspection
#[derive(Debug, Clone)]
pub struct InspectResponse {
    pub entry: ScoredEntry,
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{LocalFsAdapter, MemoryLogAdapter, StaticProbeAdapter};
    use tempfile::TempDir;

    fn full_hd() -> VideoMetadata {
        VideoMetadata {
            video_codec: "h264".to_string(),
            resolution: Resolution::new(1920, 1080),
            video_bitrate_kbps: 8_000.0,
            audio_codec: "aac".to_string(),
            audio_bitrate_kbps: 128,
            frame_rate: 25.0,
            duration_ms: 600_000,
        }
    }

    fn interactor(probe: StaticProbeAdapter) -> InspectInteractor {
        InspectInteractor::new(
            Arc::new(probe),
            Arc::new(LocalFsAdapter::new()),
            Arc::new(MemoryLogAdapter::new()),
        )
    }

    #[tokio::test]
    async fn test_text_summary() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("movie.mkv");
        std::fs::write(&file, b"data").unwrap();

        let response = interactor(StaticProbeAdapter::new().with_file(&file, full_hd()))
            .execute(InspectRequest::new(&file))
            .await
            .unwrap();

        // 10 + 20 + 8 + 10 + 4 + 10 minutes + 0 MiB
        assert_eq!(response.entry.score(), 62.0);
        assert!(response.summary.contains("Video: h264 1920x1080"));
        assert!(response.summary.contains("Quality Score (additive): 62"));
    }

    #[tokio::test]
    async fn test_json_summary() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("movie.mp4");
        std::fs::write(&file, b"data").unwrap();

        let response = interactor(StaticProbeAdapter::new().with_file(&file, full_hd()))
            .execute(InspectRequest::new(&file).with_format(InspectFormat::Json))
            .await
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&response.summary).unwrap();
        assert_eq!(value["size_bytes"], 4);
        assert_eq!(value["metadata"]["video_codec"], "h264");
        assert_eq!(value["metadata"]["resolution"]["width"], 1920);
    }

    #[tokio::test]
    async fn test_text_summary_of_unprobed_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("broken.avi");
        std::fs::write(&file, b"data").unwrap();

        let response = interactor(StaticProbeAdapter::new())
            .execute(InspectRequest::new(&file))
            .await
            .unwrap();

        assert!(response
            .summary
            .contains("Video: unknown unknown resolution @ 0.000 fps"));
        assert!(response.summary.contains("Audio: unknown 0 kbps"));
        assert_eq!(response.entry.score(), 15.0);
    }

    #[tokio::test]
    async fn test_missing_file_is_fs_error() {
        let dir = TempDir::new().unwrap();
        let result = interactor(StaticProbeAdapter::new())
            .execute(InspectRequest::new(dir.path().join("nope.mp4")))
            .await;
        assert!(matches!(result, Err(DomainError::FsFail(_))));
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(InspectFormat::parse("JSON").unwrap(), InspectFormat::Json);
        assert_eq!(InspectFormat::parse("yml").unwrap(), InspectFormat::Yaml);
        assert!(InspectFormat::parse("xml").is_err());
    }
}
