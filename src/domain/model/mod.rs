// Domain models - Core types and data structures

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::rules::ScoringPolicy;
use crate::utils::path;

/// Frame dimensions in pixels. Both are zero when unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total pixel count per frame
    pub fn pixels(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn is_known(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Technical metadata for a single probed file.
///
/// A probe that fails for any reason yields [`VideoMetadata::default`]: zero
/// numbers and empty codec names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub video_codec: String,
    pub resolution: Resolution,
    pub video_bitrate_kbps: f64,
    pub audio_codec: String,
    pub audio_bitrate_kbps: u32,
    pub frame_rate: f64,
    pub duration_ms: u64,
}

impl VideoMetadata {
    /// True when nothing at all could be extracted
    pub fn is_degraded(&self) -> bool {
        *self == Self::default()
    }

    /// Video bitrate in bits per second
    pub fn video_bitrate_bps(&self) -> f64 {
        self.video_bitrate_kbps * 1000.0
    }
}

/// A probed file together with its size and derived quality score.
///
/// The score is computed once at construction and never changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredEntry {
    path: String,
    metadata: VideoMetadata,
    size_bytes: u64,
    score: f64,
}

impl ScoredEntry {
    /// Score `metadata` with `policy` and build the entry
    pub fn new(
        path: impl Into<String>,
        metadata: VideoMetadata,
        size_bytes: u64,
        policy: ScoringPolicy,
    ) -> Self {
        let score = policy.score(&metadata, size_bytes, None);
        Self {
            path: path.into(),
            metadata,
            size_bytes,
            score,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Final path component, or the whole path when there is none
    pub fn file_name(&self) -> &str {
        path::base_name(&self.path)
    }

    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn duration_ms(&self) -> u64 {
        self.metadata.duration_ms
    }

    pub fn score(&self) -> f64 {
        self.score
    }
}

/// Ordering applied to the final file list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortStrategy {
    /// Ascending full path
    #[default]
    None,
    /// Descending quality score
    Quality,
    /// Ascending base name
    Name,
    /// Descending duration
    Duration,
    /// Descending file size
    Size,
}

impl SortStrategy {
    /// Parse sort strategy from string
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.trim().to_lowercase().as_str() {
            "none" | "path" | "" => Ok(SortStrategy::None),
            "quality" => Ok(SortStrategy::Quality),
            "name" => Ok(SortStrategy::Name),
            "duration" => Ok(SortStrategy::Duration),
            "size" => Ok(SortStrategy::Size),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid sort strategy: {}. Valid strategies: none, quality, name, duration, size",
                value
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortStrategy::None => "none",
            SortStrategy::Quality => "quality",
            SortStrategy::Name => "name",
            SortStrategy::Duration => "duration",
            SortStrategy::Size => "size",
        }
    }
}

impl fmt::Display for SortStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive set of file extensions accepted by discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSet {
    extensions: BTreeSet<String>,
}

impl ExtensionSet {
    /// Extensions accepted by the directory and manual entry points
    pub const VIDEO: [&'static str; 7] = ["mp4", "avi", "mkv", "mov", "wmv", "flv", "webm"];

    /// Build a set from arbitrary extensions; leading dots are ignored
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        Self { extensions }
    }

    pub fn all_video() -> Self {
        Self::new(Self::VIDEO)
    }

    /// The narrower set used by the ranking command
    pub fn mp4_only() -> Self {
        Self::new(["mp4"])
    }

    /// Parse a comma separated list such as `mp4,.MKV`
    pub fn parse(list: &str) -> Result<Self, DomainError> {
        let set = Self::new(list.split(','));
        if set.is_empty() {
            return Err(DomainError::BadArgs(format!(
                "Extension list '{}' does not name any extension",
                list
            )));
        }
        Ok(set)
    }

    pub fn matches(&self, file: &Path) -> bool {
        file.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }
}

impl Default for ExtensionSet {
    fn default() -> Self {
        Self::all_video()
    }
}

impl fmt::Display for ExtensionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        f.write_str(&joined.join(","))
    }
}

/// One `<track>` of the playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistTrack {
    pub location: String,
    pub duration_ms: u64,
    pub track_id: usize,
}

/// Ordered playlist ready for rendering.
///
/// Track ids are the 0-based output positions; the trailing extension block
/// lists exactly the same ids in the same order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistDocument {
    title: String,
    tracks: Vec<PlaylistTrack>,
}

impl PlaylistDocument {
    pub const DEFAULT_TITLE: &'static str = "Playlist";

    /// Build the document from entries already in their final order
    pub fn from_entries(title: impl Into<String>, entries: &[ScoredEntry]) -> Self {
        let tracks = entries
            .iter()
            .enumerate()
            .map(|(track_id, entry)| PlaylistTrack {
                location: path::to_file_uri(entry.path()),
                duration_ms: entry.duration_ms(),
                track_id,
            })
            .collect();

        Self {
            title: title.into(),
            tracks,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn tracks(&self) -> &[PlaylistTrack] {
        &self.tracks
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Ids carried inside each track
    pub fn track_ids(&self) -> Vec<usize> {
        self.tracks.iter().map(|track| track.track_id).collect()
    }

    /// Ids listed by the playlist-level extension block
    pub fn extension_item_ids(&self) -> Vec<usize> {
        (0..self.tracks.len()).collect()
    }
}

/// Where the pipeline takes its files from
#[derive(Debug, Clone, PartialEq)]
pub enum PlaylistSource {
    /// Walk this directory recursively
    Directory(PathBuf),
    /// Use exactly these files, in this order
    Files(Vec<PathBuf>),
}

/// Request for a playlist generation run
#[derive(Debug, Clone)]
pub struct PlaylistRequest {
    pub source: PlaylistSource,
    pub sort: SortStrategy,
    pub scoring: ScoringPolicy,
    pub extensions: ExtensionSet,
    pub output_path: PathBuf,
    pub title: String,
    pub listing_path: Option<PathBuf>,
    pub verbose: bool,
}

impl PlaylistRequest {
    /// Create new request with default policies
    pub fn new(source: PlaylistSource, output_path: impl Into<PathBuf>) -> Self {
        Self {
            source,
            sort: SortStrategy::default(),
            scoring: ScoringPolicy::default(),
            extensions: ExtensionSet::default(),
            output_path: output_path.into(),
            title: PlaylistDocument::DEFAULT_TITLE.to_string(),
            listing_path: None,
            verbose: false,
        }
    }

    pub fn with_sort(mut self, sort: SortStrategy) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringPolicy) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn with_extensions(mut self, extensions: ExtensionSet) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_listing(mut self, listing_path: Option<PathBuf>) -> Self {
        self.listing_path = listing_path;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Successful outcome of a playlist run
#[derive(Debug, Clone)]
pub struct PlaylistReport {
    /// Rendered XSPF text, identical to what was written
    pub document: String,
    /// Entries in final playlist order
    pub entries: Vec<ScoredEntry>,
    pub output_path: PathBuf,
    /// Files whose probe produced no metadata
    pub degraded: usize,
}

impl PlaylistReport {
    /// Absolute paths in final order
    pub fn ordered_paths(&self) -> Vec<&str> {
        self.entries.iter().map(ScoredEntry::path).collect()
    }
}
