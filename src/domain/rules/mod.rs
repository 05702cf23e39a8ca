// Domain rules - Scoring and ordering policies

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::errors::*;
use crate::domain::model::*;

/// Quality scoring formula.
///
/// `Additive` backs the directory and manual entry points (`build`, `manual`).
/// `Multiplicative` backs the command-line ranking entry point (`rank`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringPolicy {
    /// Weighted point accumulation over codec, resolution, bitrates, length and size
    #[default]
    Additive,
    /// Pixel rate times bitrate, scaled by a codec multiplier
    Multiplicative,
}

impl ScoringPolicy {
    /// Parse scoring policy from string
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        match value.trim().to_lowercase().as_str() {
            "additive" | "points" => Ok(ScoringPolicy::Additive),
            "multiplicative" | "pixel-rate" => Ok(ScoringPolicy::Multiplicative),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid scoring policy: {}. Valid policies: additive, multiplicative",
                value
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringPolicy::Additive => "additive",
            ScoringPolicy::Multiplicative => "multiplicative",
        }
    }

    /// Score a file. `duration_override` replaces the probed duration when given.
    pub fn score(
        &self,
        metadata: &VideoMetadata,
        size_bytes: u64,
        duration_override: Option<u64>,
    ) -> f64 {
        match self {
            ScoringPolicy::Additive => additive_score(
                metadata,
                size_bytes,
                duration_override.unwrap_or(metadata.duration_ms),
            ),
            ScoringPolicy::Multiplicative => multiplicative_score(metadata),
        }
    }
}

impl fmt::Display for ScoringPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const MIB: u64 = 1024 * 1024;

fn additive_score(metadata: &VideoMetadata, size_bytes: u64, duration_ms: u64) -> f64 {
    let video_codec: u64 = if metadata.video_codec.eq_ignore_ascii_case("h264") {
        10
    } else {
        5
    };

    let resolution: u64 = match (metadata.resolution.width, metadata.resolution.height) {
        (1920, 1080) => 20,
        (1280, 720) => 10,
        _ => 5,
    };

    // float to int casts saturate, so absurd probe values stay finite
    let video_bitrate = (metadata.video_bitrate_kbps.max(0.0) / 1000.0).floor() as u64;

    let audio_codec: u64 = if metadata.audio_codec.eq_ignore_ascii_case("aac") {
        10
    } else {
        5
    };

    let audio_bitrate = metadata.audio_bitrate_kbps as u64 / 32;

    // one point per full minute and per full MiB
    [
        video_codec,
        resolution,
        video_bitrate,
        audio_codec,
        audio_bitrate,
        duration_ms / 60_000,
        size_bytes / MIB,
    ]
    .into_iter()
    .fold(0u64, u64::saturating_add) as f64
}

fn multiplicative_score(metadata: &VideoMetadata) -> f64 {
    let pixel_rate = metadata.resolution.pixels() as f64 * metadata.frame_rate;
    let quality = pixel_rate * metadata.video_bitrate_bps() / 1_000_000.0;
    quality * codec_multiplier(&metadata.video_codec)
}

/// Efficiency weight of a video codec for the multiplicative policy
pub fn codec_multiplier(codec: &str) -> f64 {
    match codec.to_lowercase().as_str() {
        "h265" | "hevc" => 1.5,
        "vp9" => 1.3,
        "h264" | "avc" => 1.2,
        _ => 1.0,
    }
}

/// Comparator used to order playlist entries
pub type EntryComparator = fn(&ScoredEntry, &ScoredEntry) -> Ordering;

impl SortStrategy {
    /// Comparator for this strategy. Every comparator is a total order.
    pub fn comparator(self) -> EntryComparator {
        match self {
            SortStrategy::None => by_path,
            SortStrategy::Quality => by_score_desc,
            SortStrategy::Name => by_name,
            SortStrategy::Duration => by_duration_desc,
            SortStrategy::Size => by_size_desc,
        }
    }
}

fn by_path(a: &ScoredEntry, b: &ScoredEntry) -> Ordering {
    a.path().cmp(b.path())
}

fn by_score_desc(a: &ScoredEntry, b: &ScoredEntry) -> Ordering {
    b.score().total_cmp(&a.score())
}

fn by_name(a: &ScoredEntry, b: &ScoredEntry) -> Ordering {
    a.file_name().cmp(b.file_name())
}

fn by_duration_desc(a: &ScoredEntry, b: &ScoredEntry) -> Ordering {
    b.duration_ms().cmp(&a.duration_ms())
}

fn by_size_desc(a: &ScoredEntry, b: &ScoredEntry) -> Ordering {
    b.size_bytes().cmp(&a.size_bytes())
}

/// Order entries by `strategy`. Equal keys keep their input order.
pub fn sort_entries(mut entries: Vec<ScoredEntry>, strategy: SortStrategy) -> Vec<ScoredEntry> {
    entries.sort_by(strategy.comparator());
    entries
}
