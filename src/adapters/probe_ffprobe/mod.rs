//! FFprobe adapter for media file probing
//!
//! Runs the `ffprobe` executable once per file and parses its `key=value`
//! output. Every failure mode (missing binary, non-zero exit, timeout,
//! garbage output) degrades to zero-valued metadata for that file.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Default wall-clock budget for a single probe
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Stream and format fields requested from ffprobe
const SHOW_ENTRIES: &str =
    "stream=codec_type,codec_name,width,height,bit_rate,avg_frame_rate:format=duration";

/// FFprobe-based probe adapter
pub struct FFprobeAdapter {
    executable: PathBuf,
    timeout: Duration,
}

impl FFprobeAdapter {
    /// Create new FFprobe adapter
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run ffprobe and return its standard output
    async fn run(&self, file_path: &Path) -> Result<String, DomainError> {
        let mut command = Command::new(&self.executable);
        command
            .args(["-v", "error", "-show_entries", SHOW_ENTRIES, "-of", "default"])
            .arg(file_path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = match tokio::time::timeout(self.timeout, command.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(DomainError::InternalError(format!(
                    "failed to launch {}: {}",
                    self.executable.display(),
                    e
                )))
            }
            Err(_) => {
                return Err(DomainError::InternalError(format!(
                    "ffprobe timed out after {:?}",
                    self.timeout
                )))
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DomainError::InternalError(format!(
                "ffprobe exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for FFprobeAdapter {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

#[async_trait]
impl ProbePort for FFprobeAdapter {
    async fn probe_media(&self, file_path: &Path) -> VideoMetadata {
        match self.run(file_path).await {
            Ok(stdout) => {
                let metadata = parse_probe_output(&stdout);
                debug!(path = %file_path.display(), ?metadata, "probe finished");
                metadata
            }
            Err(e) => {
                warn!(
                    path = %file_path.display(),
                    error = %e,
                    "probe failed, using empty metadata"
                );
                VideoMetadata::default()
            }
        }
    }
}

type Section = HashMap<String, String>;

/// Split ffprobe output into stream sections and one format section.
///
/// Lines outside any `[SECTION]` wrapper (the `noprint_wrappers=1` style)
/// count as both the video stream and the format.
fn split_sections(output: &str) -> (Vec<Section>, Section) {
    let mut streams = Vec::new();
    let mut format = Section::new();
    let mut loose = Section::new();
    let mut current: Option<(String, Section)> = None;

    for line in output.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(name) = line.strip_prefix("[/").and_then(|l| l.strip_suffix(']')) {
            let closes_current = matches!(&current, Some((open, _)) if open == name);
            if closes_current {
                if let Some((open, fields)) = current.take() {
                    if open == "STREAM" {
                        streams.push(fields);
                    } else {
                        format.extend(fields);
                    }
                }
            }
        } else if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            // nested wrappers such as [SIDE_DATA] stay inside their stream
            if name == "STREAM" || name == "FORMAT" {
                current = Some((name.to_string(), Section::new()));
            }
        } else if let Some((key, value)) = line.split_once('=') {
            let target = match current.as_mut() {
                Some((_, fields)) => fields,
                None => &mut loose,
            };
            target
                .entry(key.trim().to_string())
                .or_insert_with(|| value.trim().to_string());
        }
    }

    if !loose.is_empty() {
        for (key, value) in &loose {
            format.entry(key.clone()).or_insert_with(|| value.clone());
        }
        streams.insert(0, loose);
    }

    (streams, format)
}

fn is_codec_type(section: &Section, codec_type: &str) -> bool {
    section.get("codec_type").map(String::as_str) == Some(codec_type)
}

/// Parse ffprobe `key=value` output into metadata.
///
/// Every field is parsed on its own; a missing or malformed value leaves that
/// field at its default without affecting the others.
pub fn parse_probe_output(output: &str) -> VideoMetadata {
    let (streams, format) = split_sections(output);

    let video = streams
        .iter()
        .find(|s| is_codec_type(s, "video"))
        .or_else(|| streams.iter().find(|s| !s.contains_key("codec_type")));
    let audio = streams.iter().find(|s| is_codec_type(s, "audio"));

    let field = |section: Option<&Section>, key: &str| -> Option<String> {
        section.and_then(|s| s.get(key)).cloned()
    };

    VideoMetadata {
        video_codec: field(video, "codec_name")
            .filter(|codec| is_token(codec))
            .unwrap_or_default(),
        resolution: Resolution::new(
            parse_unsigned(field(video, "width").as_deref()),
            parse_unsigned(field(video, "height").as_deref()),
        ),
        video_bitrate_kbps: parse_bitrate_kbps(field(video, "bit_rate").as_deref()),
        audio_codec: field(audio, "codec_name")
            .filter(|codec| is_token(codec))
            .unwrap_or_default(),
        audio_bitrate_kbps: parse_bitrate_kbps(field(audio, "bit_rate").as_deref()) as u32,
        frame_rate: parse_frame_rate(field(video, "avg_frame_rate").as_deref()),
        duration_ms: parse_duration_ms(format.get("duration").map(String::as_str)),
    }
}

fn is_token(value: &str) -> bool {
    !value.is_empty()
        && value != "N/A"
        && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn parse_unsigned(value: Option<&str>) -> u32 {
    value.and_then(|v| v.parse::<u32>().ok()).unwrap_or(0)
}

/// Bits per second -> kilobits per second
fn parse_bitrate_kbps(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|bps| bps.is_finite() && *bps > 0.0)
        .map(|bps| bps / 1000.0)
        .unwrap_or(0.0)
}

/// Rational `N/D` (or plain decimal) frame rate. Zero when `D` is zero.
pub fn parse_frame_rate(value: Option<&str>) -> f64 {
    let Some(value) = value else {
        return 0.0;
    };

    let rate = match value.split_once('/') {
        Some((num, den)) => match (num.trim().parse::<f64>(), den.trim().parse::<f64>()) {
            (Ok(_), Ok(den)) if den == 0.0 => 0.0,
            (Ok(num), Ok(den)) => num / den,
            _ => 0.0,
        },
        None => value.trim().parse::<f64>().unwrap_or(0.0),
    };

    if rate.is_finite() && rate > 0.0 {
        rate
    } else {
        0.0
    }
}

/// Seconds -> rounded milliseconds
fn parse_duration_ms(value: Option<&str>) -> u64 {
    value
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .map(|secs| (secs * 1000.0).round() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_OUTPUT: &str = "\
[STREAM]
codec_name=h264
codec_type=video
width=1920
height=1080
avg_frame_rate=30000/1001
bit_rate=8000000
[/STREAM]
[STREAM]
codec_name=aac
codec_type=audio
avg_frame_rate=0/0
bit_rate=128000
[/STREAM]
[FORMAT]
duration=61.4567
[/FORMAT]
";

    #[test]
    fn test_parse_full_output() {
        let metadata = parse_probe_output(FULL_OUTPUT);
        assert_eq!(metadata.video_codec, "h264");
        assert_eq!(metadata.resolution, Resolution::new(1920, 1080));
        assert_eq!(metadata.video_bitrate_kbps, 8000.0);
        assert_eq!(metadata.audio_codec, "aac");
        assert_eq!(metadata.audio_bitrate_kbps, 128);
        assert!((metadata.frame_rate - 29.97).abs() < 0.01);
        assert_eq!(metadata.duration_ms, 61_457);
    }

    #[test]
    fn test_audio_section_first() {
        let output = "\
[STREAM]
codec_name=opus
codec_type=audio
bit_rate=96000
[/STREAM]
[STREAM]
codec_name=vp9
codec_type=video
width=1280
height=720
[/STREAM]
";
        let metadata = parse_probe_output(output);
        assert_eq!(metadata.video_codec, "vp9");
        assert_eq!(metadata.audio_codec, "opus");
        assert_eq!(metadata.audio_bitrate_kbps, 96);
        assert_eq!(metadata.resolution, Resolution::new(1280, 720));
        assert_eq!(metadata.duration_ms, 0);
    }

    #[test]
    fn test_flat_output_without_wrappers() {
        let output = "width=640\nheight=480\nbit_rate=N/A\navg_frame_rate=25/1\ncodec_name=mpeg4\nduration=10.0\n";
        let metadata = parse_probe_output(output);
        assert_eq!(metadata.resolution, Resolution::new(640, 480));
        assert_eq!(metadata.video_bitrate_kbps, 0.0);
        assert_eq!(metadata.frame_rate, 25.0);
        assert_eq!(metadata.video_codec, "mpeg4");
        assert_eq!(metadata.duration_ms, 10_000);
        assert!(metadata.audio_codec.is_empty());
    }

    #[test]
    fn test_malformed_fields_are_independent() {
        let output = "\
[STREAM]
codec_type=video
codec_name=h264
width=wide
height=1080
avg_frame_rate=abc/def
bit_rate=-5
[/STREAM]
[FORMAT]
duration=N/A
[/FORMAT]
";
        let metadata = parse_probe_output(output);
        assert_eq!(metadata.video_codec, "h264");
        assert_eq!(metadata.resolution.width, 0);
        assert_eq!(metadata.resolution.height, 1080);
        assert_eq!(metadata.frame_rate, 0.0);
        assert_eq!(metadata.video_bitrate_kbps, 0.0);
        assert_eq!(metadata.duration_ms, 0);
    }

    #[test]
    fn test_empty_output_is_default() {
        assert_eq!(parse_probe_output(""), VideoMetadata::default());
        assert_eq!(parse_probe_output("garbage\n[[[\n"), VideoMetadata::default());
    }

    #[test]
    fn test_frame_rate_zero_denominator() {
        assert_eq!(parse_frame_rate(Some("30/0")), 0.0);
        assert_eq!(parse_frame_rate(Some("0/0")), 0.0);
        assert_eq!(parse_frame_rate(Some("24/1")), 24.0);
        assert_eq!(parse_frame_rate(Some("23.976")), 23.976);
        assert_eq!(parse_frame_rate(None), 0.0);
    }

    #[tokio::test]
    async fn test_missing_executable_degrades() {
        let adapter = FFprobeAdapter::new("/nonexistent/ffprobe_binary_xyz");
        let metadata = adapter.probe_media(Path::new("/tmp/whatever.mp4")).await;
        assert_eq!(metadata, VideoMetadata::default());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit_degrades() {
        // `false` ignores its arguments and exits with status 1
        let adapter = FFprobeAdapter::new("false");
        let metadata = adapter.probe_media(Path::new("/tmp/whatever.mp4")).await;
        assert!(metadata.is_degraded());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_probe_times_out() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let script = dir.path().join("slow_ffprobe.sh");
        std::fs::write(&script, "#!/bin/sh\nsleep 5\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let adapter = FFprobeAdapter::new(&script).with_timeout(Duration::from_millis(100));
        let started = std::time::Instant::now();
        let metadata = adapter.probe_media(Path::new("/tmp/whatever.mp4")).await;

        assert!(metadata.is_degraded());
        assert!(started.elapsed() < Duration::from_secs(3));
    }
}
