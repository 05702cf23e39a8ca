// Playlist interactor - Orchestrates the discover, probe, score, sort and write pipeline

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::sort_entries;
use crate::output::{render_listing, XspfWriter};
use crate::ports::*;

/// Interactor for the playlist generation use case
pub struct PlaylistInteractor {
    probe_port: Arc<dyn ProbePort>,
    fs_port: Arc<dyn FsPort>,
    log_port: Arc<dyn LogPort>,
    max_concurrent_probes: usize,
}

/// Raw probe result for one file, before scoring
struct ProbedFile {
    path: PathBuf,
    metadata: VideoMetadata,
    size_bytes: u64,
}

impl PlaylistInteractor {
    /// Create new playlist interactor with injected ports
    pub fn new(
        probe_port: Arc<dyn ProbePort>,
        fs_port: Arc<dyn FsPort>,
        log_port: Arc<dyn LogPort>,
    ) -> Self {
        Self {
            probe_port,
            fs_port,
            log_port,
            max_concurrent_probes: num_cpus::get(),
        }
    }

    /// Bound the number of probes in flight. Zero is treated as one.
    pub fn with_max_concurrent_probes(mut self, limit: usize) -> Self {
        self.max_concurrent_probes = limit.max(1);
        self
    }

    /// Run the whole pipeline for `request`
    pub async fn execute(&self, request: PlaylistRequest) -> Result<PlaylistReport, DomainError> {
        let result = self.run(&request).await;
        self.log_port.flush().await;
        result
    }

    async fn run(&self, request: &PlaylistRequest) -> Result<PlaylistReport, DomainError> {
        let files = self.resolve_files(request).await?;

        let probed = self.probe_all(&files, request.verbose).await;
        let degraded = probed.iter().filter(|f| f.metadata.is_degraded()).count();

        let mut entries = Vec::with_capacity(probed.len());
        for file in probed {
            let path = match file.path.to_str() {
                Some(path) => path.to_string(),
                None => {
                    let lossy = file.path.to_string_lossy().into_owned();
                    self.log_port
                        .warn(&format!(
                            "Path is not valid UTF-8, its playlist location will not resolve: {}",
                            lossy
                        ))
                        .await;
                    lossy
                }
            };
            let entry = ScoredEntry::new(path, file.metadata, file.size_bytes, request.scoring);
            self.log_port
                .info(&format!(
                    "File processed: {}, Quality Score: {}",
                    entry.path(),
                    entry.score()
                ))
                .await;
            entries.push(entry);
        }

        let entries = sort_entries(entries, request.sort);
        self.log_port
            .debug(&format!(
                "Sorted {} entries by {} ({} scoring)",
                entries.len(),
                request.sort,
                request.scoring
            ))
            .await;

        let document = XspfWriter::render_entries(&request.title, &entries);

        let output_path = self.fs_port.resolve_path(&request.output_path).await?;
        if let Err(e) = self.fs_port.write_text(&output_path, &document).await {
            let path = output_path.display().to_string();
            self.log_port
                .error(&format!("Error: Failed to save playlist file: {}", path))
                .await;
            return Err(DomainError::WriteFailed {
                path,
                reason: e.to_string(),
                document,
            });
        }
        self.log_port
            .info(&format!("Playlist saved to: {}", output_path.display()))
            .await;

        if let Some(listing_path) = &request.listing_path {
            self.write_listing(listing_path, &entries).await;
        }

        let completion = match request.source {
            PlaylistSource::Directory(_) => "Process completed",
            PlaylistSource::Files(_) => "Manual playlist process completed",
        };
        self.log_port.info(completion).await;

        Ok(PlaylistReport {
            document,
            entries,
            output_path,
            degraded,
        })
    }

    /// Validate the source and produce the absolute file list
    async fn resolve_files(&self, request: &PlaylistRequest) -> Result<Vec<PathBuf>, DomainError> {
        match &request.source {
            PlaylistSource::Directory(root) => {
                self.log_port.info("Starting process").await;

                if !self.fs_port.directory_exists(root).await {
                    let dir = root.display().to_string();
                    self.log_port
                        .error(&format!("Error: Directory does not exist: {}", dir))
                        .await;
                    return Err(DomainError::NotFound(dir));
                }

                let root = self.fs_port.resolve_path(root).await?;
                let files = self
                    .fs_port
                    .discover_files(&root, &request.extensions)
                    .await?;

                if files.is_empty() {
                    let dir = root.display().to_string();
                    self.log_port
                        .error(&format!("Error: No video files found in directory: {}", dir))
                        .await;
                    return Err(DomainError::NoFilesFound(dir));
                }

                self.log_port
                    .info(&format!("Found {} video files", files.len()))
                    .await;
                Ok(files)
            }
            PlaylistSource::Files(paths) => {
                self.log_port.info("Starting manual playlist process").await;

                if paths.is_empty() {
                    self.log_port
                        .error("Error: No files provided for manual playlist")
                        .await;
                    return Err(DomainError::EmptyInput);
                }

                let mut seen = HashSet::new();
                let mut files = Vec::with_capacity(paths.len());
                for path in paths {
                    let resolved = self.fs_port.resolve_path(path).await?;
                    if seen.insert(resolved.clone()) {
                        files.push(resolved);
                    } else {
                        self.log_port
                            .warn(&format!("Skipping duplicate file: {}", resolved.display()))
                            .await;
                    }
                }

                self.log_port
                    .info(&format!("Processing {} files", files.len()))
                    .await;
                Ok(files)
            }
        }
    }

    /// Probe every file with bounded concurrency and wait for all of them.
    ///
    /// Results come back in the order of `files`, whatever order the probes
    /// finish in.
    async fn probe_all(&self, files: &[PathBuf], verbose: bool) -> Vec<ProbedFile> {
        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_probes));
        let mut handles = Vec::with_capacity(files.len());

        for path in files {
            self.log_port
                .info(&format!("Processing file: {}", path.display()))
                .await;

            let semaphore = Arc::clone(&semaphore);
            let probe_port = Arc::clone(&self.probe_port);
            let fs_port = Arc::clone(&self.fs_port);
            let path = path.clone();

            handles.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let metadata = probe_port.probe_media(&path).await;
                let size = fs_port.file_size(&path).await;
                (metadata, size)
            }));
        }

        let mut probed = Vec::with_capacity(files.len());
        for (path, handle) in files.iter().zip(handles) {
            let (metadata, size) = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    self.log_port
                        .warn(&format!("Probe task for {} failed: {}", path.display(), e))
                        .await;
                    (VideoMetadata::default(), Ok(0))
                }
            };

            let size_bytes = match size {
                Ok(size) => size,
                Err(e) => {
                    self.log_port
                        .warn(&format!("Could not read size of {}: {}", path.display(), e))
                        .await;
                    0
                }
            };

            if metadata.is_degraded() {
                self.log_port
                    .warn(&format!(
                        "No metadata could be read from {}, scoring with empty values",
                        path.display()
                    ))
                    .await;
            } else if verbose {
                self.log_metadata(path, &metadata, size_bytes).await;
            }

            probed.push(ProbedFile {
                path: path.clone(),
                metadata,
                size_bytes,
            });
        }

        probed
    }

    async fn log_metadata(&self, path: &Path, metadata: &VideoMetadata, size_bytes: u64) {
        let event = LogEvent::new(
            LogLevel::Info,
            format!(
                "Metadata for {}: video {} {} @ {:.3} fps, {:.0} kbps; audio {} {} kbps; {} ms; {} bytes",
                path.display(),
                metadata.video_codec,
                metadata.resolution,
                metadata.frame_rate,
                metadata.video_bitrate_kbps,
                metadata.audio_codec,
                metadata.audio_bitrate_kbps,
                metadata.duration_ms,
                size_bytes
            ),
        )
        .with_field("path", path.display())
        .with_field("video_codec", &metadata.video_codec)
        .with_field("resolution", metadata.resolution)
        .with_field("duration_ms", metadata.duration_ms);
        self.log_port.log_event(&event).await;
    }

    /// The listing is a convenience output; failing to write it is not fatal
    async fn write_listing(&self, listing_path: &Path, entries: &[ScoredEntry]) {
        let listing = render_listing(entries);
        match self.fs_port.write_text(listing_path, &listing).await {
            Ok(()) => {
                self.log_port
                    .info(&format!("File list saved to: {}", listing_path.display()))
                    .await
            }
            Err(e) => {
                self.log_port
                    .warn(&format!(
                        "Failed to save file list {}: {}",
                        listing_path.display(),
                        e
                    ))
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{LocalFsAdapter, MemoryLogAdapter, StaticProbeAdapter};
    use crate::domain::rules::ScoringPolicy;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;

    fn with_duration(duration_ms: u64) -> VideoMetadata {
        VideoMetadata {
            duration_ms,
            ..VideoMetadata::default()
        }
    }

    fn touch(path: &Path, bytes: usize) {
        std::fs::write(path, vec![0u8; bytes]).unwrap();
    }

    fn interactor(probe: StaticProbeAdapter, log: Arc<MemoryLogAdapter>) -> PlaylistInteractor {
        PlaylistInteractor::new(Arc::new(probe), Arc::new(LocalFsAdapter::new()), log)
    }

    #[tokio::test]
    async fn test_directory_run_orders_by_duration() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.mp4");
        let b = dir.path().join("b.mkv");
        let c = dir.path().join("c.avi");
        for path in [&a, &b, &c] {
            touch(path, 10);
        }
        touch(&dir.path().join("notes.txt"), 10);

        let probe = StaticProbeAdapter::new()
            .with_file(&a, with_duration(60_000))
            .with_file(&b, with_duration(120_000))
            .with_file(&c, with_duration(30_000));
        let log = Arc::new(MemoryLogAdapter::new());
        let output = dir.path().join("out.xspf");

        let source = PlaylistSource::Directory(dir.path().to_path_buf());
        let request = PlaylistRequest::new(source, &output).with_sort(SortStrategy::Duration);
        let report = interactor(probe, log.clone()).execute(request).await.unwrap();

        let durations: Vec<u64> = report.entries.iter().map(|e| e.duration_ms()).collect();
        assert_eq!(durations, vec![120_000, 60_000, 30_000]);
        assert_eq!(std::fs::read_to_string(&output).unwrap(), report.document);
        assert_eq!(report.degraded, 0);

        let messages = log.messages();
        assert_eq!(messages.first().map(String::as_str), Some("Starting process"));
        assert!(messages.contains(&"Found 3 video files".to_string()));
        assert_eq!(messages.last().map(String::as_str), Some("Process completed"));
    }

    #[tokio::test]
    async fn test_missing_directory_is_not_found() {
        let dir = TempDir::new().unwrap();
        let log = Arc::new(MemoryLogAdapter::new());
        let request = PlaylistRequest::new(
            PlaylistSource::Directory(dir.path().join("missing")),
            dir.path().join("out.xspf"),
        );

        let result = interactor(StaticProbeAdapter::new(), log.clone()).execute(request).await;
        assert!(matches!(result, Err(DomainError::NotFound(_))));
        assert!(!dir.path().join("out.xspf").exists());
        assert!(log.messages().iter().any(|m| m.starts_with("Error: Directory does not exist")));
    }

    #[tokio::test]
    async fn test_empty_directory_writes_nothing() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("cover.jpg"), 3);
        let probe = StaticProbeAdapter::new();
        let request = PlaylistRequest::new(
            PlaylistSource::Directory(dir.path().to_path_buf()),
            dir.path().join("out.xspf"),
        )
        .with_sort(SortStrategy::Quality);

        let log = Arc::new(MemoryLogAdapter::new());
        let interactor = interactor(probe, log);
        let result = interactor.execute(request).await;

        assert!(matches!(result, Err(DomainError::NoFilesFound(_))));
        assert!(!dir.path().join("out.xspf").exists());
    }

    #[tokio::test]
    async fn test_empty_manual_list_is_rejected() {
        let dir = TempDir::new().unwrap();
        let request =
            PlaylistRequest::new(PlaylistSource::Files(vec![]), dir.path().join("out.xspf"));
        let log = Arc::new(MemoryLogAdapter::new());
        let result = interactor(StaticProbeAdapter::new(), log).execute(request).await;
        assert!(matches!(result, Err(DomainError::EmptyInput)));
    }

    #[tokio::test]
    async fn test_fully_probed_file_beats_failed_probe() {
        let dir = TempDir::new().unwrap();
        let broken = dir.path().join("broken.mp4");
        let good = dir.path().join("good.mp4");
        touch(&broken, 1);
        touch(&good, 1);

        let full = VideoMetadata {
            video_codec: "h264".to_string(),
            resolution: Resolution::new(1920, 1080),
            video_bitrate_kbps: 12_000.0,
            audio_codec: "aac".to_string(),
            audio_bitrate_kbps: 256,
            frame_rate: 24.0,
            duration_ms: 90_000,
        };
        let probe = StaticProbeAdapter::new().with_file(&good, full);
        let log = Arc::new(MemoryLogAdapter::new());

        let request = PlaylistRequest::new(
            PlaylistSource::Files(vec![broken.clone(), good.clone()]),
            dir.path().join("out.xspf"),
        )
        .with_sort(SortStrategy::Quality);
        let report = interactor(probe, log.clone()).execute(request).await.unwrap();

        assert_eq!(report.entries[0].path(), good.to_string_lossy());
        assert_eq!(report.entries[1].score(), 15.0);
        assert_eq!(report.degraded, 1);
        assert!(log.messages().iter().any(|m| m.starts_with("No metadata could be read")));
        assert_eq!(
            log.messages().last().map(String::as_str),
            Some("Manual playlist process completed")
        );
    }

    #[tokio::test]
    async fn test_manual_duplicates_are_dropped() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.mp4");
        touch(&a, 1);
        let log = Arc::new(MemoryLogAdapter::new());
        let request = PlaylistRequest::new(
            PlaylistSource::Files(vec![a.clone(), a.clone()]),
            dir.path().join("out.xspf"),
        );

        let report = interactor(StaticProbeAdapter::new(), log.clone())
            .execute(request)
            .await
            .unwrap();
        assert_eq!(report.entries.len(), 1);
        assert!(log.messages().iter().any(|m| m.starts_with("Skipping duplicate file")));
    }

    #[tokio::test]
    async fn test_vanished_file_scores_with_zero_size() {
        let dir = TempDir::new().unwrap();
        let present = dir.path().join("present.mp4");
        let vanished = dir.path().join("vanished.mp4");
        touch(&present, 3 * 1024 * 1024);
        let log = Arc::new(MemoryLogAdapter::new());

        let request = PlaylistRequest::new(
            PlaylistSource::Files(vec![present.clone(), vanished.clone()]),
            dir.path().join("out.xspf"),
        )
        .with_sort(SortStrategy::Size);
        let report = interactor(StaticProbeAdapter::new(), log.clone())
            .execute(request)
            .await
            .unwrap();

        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries[1].path(), vanished.to_str().unwrap());
        assert_eq!(report.entries[1].size_bytes(), 0);
        assert_eq!(report.entries[0].size_bytes(), 3 * 1024 * 1024);
        assert!(log
            .messages()
            .iter()
            .any(|m| m.starts_with("Could not read size of")));
    }

    #[cfg(target_os = "linux")]
    #[tokio::test]
    async fn test_non_utf8_path_is_reported() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = TempDir::new().unwrap();
        let odd = dir.path().join(OsStr::from_bytes(b"clip\xff.mp4"));
        let log = Arc::new(MemoryLogAdapter::new());

        let request = PlaylistRequest::new(
            PlaylistSource::Files(vec![odd]),
            dir.path().join("out.xspf"),
        );
        let report = interactor(StaticProbeAdapter::new(), log.clone())
            .execute(request)
            .await
            .unwrap();

        assert_eq!(report.entries.len(), 1);
        assert!(log
            .messages()
            .iter()
            .any(|m| m.starts_with("Path is not valid UTF-8")));
    }

    #[tokio::test]
    async fn test_unwritable_output_keeps_document() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.mp4");
        touch(&a, 1);
        let log = Arc::new(MemoryLogAdapter::new());
        let request = PlaylistRequest::new(
            PlaylistSource::Files(vec![a]),
            dir.path().join("missing/dir/out.xspf"),
        );

        let error = interactor(StaticProbeAdapter::new(), log.clone())
            .execute(request)
            .await
            .unwrap_err();

        assert!(matches!(error, DomainError::WriteFailed { .. }));
        let document = error.document().unwrap();
        assert!(document.contains("<vlc:item tid=\"0\"/>"));
        assert!(log
            .messages()
            .iter()
            .any(|m| m.starts_with("Error: Failed to save playlist file")));
    }

    #[tokio::test]
    async fn test_listing_written_in_final_order() {
        let dir = TempDir::new().unwrap();
        let small = dir.path().join("small.mp4");
        let large = dir.path().join("large.mp4");
        touch(&small, 10);
        touch(&large, 1000);
        let listing = dir.path().join("list.txt");

        let request = PlaylistRequest::new(
            PlaylistSource::Directory(dir.path().to_path_buf()),
            dir.path().join("out.xspf"),
        )
        .with_sort(SortStrategy::Size)
        .with_listing(Some(listing.clone()));
        let log = Arc::new(MemoryLogAdapter::new());
        let report = interactor(StaticProbeAdapter::new(), log).execute(request).await.unwrap();

        let expected = format!("{}\n{}\n", large.display(), small.display());
        assert_eq!(std::fs::read_to_string(&listing).unwrap(), expected);
        assert_eq!(report.ordered_paths().len(), 2);
    }

    #[tokio::test]
    async fn test_verbose_logs_metadata_without_changing_output() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.mp4");
        touch(&a, 1);
        let probe = || StaticProbeAdapter::new().with_file(&a, with_duration(5_000));

        let quiet_log = Arc::new(MemoryLogAdapter::new());
        let quiet = interactor(probe(), quiet_log.clone())
            .execute(PlaylistRequest::new(
                PlaylistSource::Files(vec![a.clone()]),
                dir.path().join("quiet.xspf"),
            ))
            .await
            .unwrap();

        let loud_log = Arc::new(MemoryLogAdapter::new());
        let loud = interactor(probe(), loud_log.clone())
            .execute(
                PlaylistRequest::new(
                    PlaylistSource::Files(vec![a.clone()]),
                    dir.path().join("loud.xspf"),
                )
                .verbose(true),
            )
            .await
            .unwrap();

        assert_eq!(quiet.document, loud.document);
        assert!(!quiet_log.messages().iter().any(|m| m.starts_with("Metadata for")));
        assert!(loud_log.messages().iter().any(|m| m.starts_with("Metadata for")));
    }

    /// Probe that records how many calls overlap
    struct CountingProbe {
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl ProbePort for CountingProbe {
        async fn probe_media(&self, _file_path: &Path) -> VideoMetadata {
            let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            VideoMetadata::default()
        }
    }

    #[tokio::test]
    async fn test_probe_concurrency_is_bounded() {
        let dir = TempDir::new().unwrap();
        let files: Vec<PathBuf> = (0..12)
            .map(|i| {
                let path = dir.path().join(format!("{:02}.mp4", i));
                touch(&path, 1);
                path
            })
            .collect();

        let probe = Arc::new(CountingProbe {
            active: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let interactor = PlaylistInteractor::new(
            probe.clone(),
            Arc::new(LocalFsAdapter::new()),
            Arc::new(MemoryLogAdapter::new()),
        )
        .with_max_concurrent_probes(3);

        let source = PlaylistSource::Files(files.clone());
        let request = PlaylistRequest::new(source, dir.path().join("out.xspf"))
            .with_scoring(ScoringPolicy::Multiplicative);
        let report = interactor.execute(request).await.unwrap();

        assert!(probe.peak.load(Ordering::SeqCst) <= 3);
        assert_eq!(report.entries.len(), 12);
        // path order is the default and matches the input here
        let paths: Vec<String> = files.iter().map(|p| p.to_string_lossy().into_owned()).collect();
        assert_eq!(report.ordered_paths(), paths.iter().map(String::as_str).collect::<Vec<_>>());
    }
}
