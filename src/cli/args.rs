//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Options shared by every playlist-producing command
#[derive(Args, Debug, Clone, Default)]
pub struct PipelineArgs {
    /// Playlist order: none, quality, name, duration or size
    #[arg(long)]
    pub sort: Option<String>,

    /// Scoring policy: additive or multiplicative
    #[arg(long)]
    pub scoring: Option<String>,

    /// Comma-separated file extensions to include
    #[arg(long)]
    pub extensions: Option<String>,

    /// Playlist output path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Playlist title
    #[arg(long)]
    pub title: Option<String>,

    /// Also write the ordered path list to this file
    #[arg(short, long)]
    pub list: Option<PathBuf>,

    /// ffprobe executable
    #[arg(long)]
    pub ffprobe: Option<PathBuf>,

    /// Per-file probe timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Maximum number of concurrent probes
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Log per-file metadata
    #[arg(short, long)]
    pub verbose: bool,
}

/// Arguments for the build command
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Directory to scan recursively
    #[arg(short, long)]
    pub dir: PathBuf,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

/// Arguments for the manual command
#[derive(Args, Debug)]
pub struct ManualArgs {
    /// Files in playlist order
    #[arg(num_args = 0..)]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

/// Arguments for the rank command
#[derive(Args, Debug)]
pub struct RankArgs {
    /// Directory to scan for mp4 files
    pub dir: PathBuf,

    /// Order by quality score instead of path
    #[arg(short, long)]
    pub quality: bool,

    #[command(flatten)]
    pub pipeline: PipelineArgs,
}

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output format: text, json or yaml
    #[arg(long, default_value = "text")]
    pub format: String,

    /// Scoring policy: additive or multiplicative
    #[arg(long)]
    pub scoring: Option<String>,

    /// ffprobe executable
    #[arg(long)]
    pub ffprobe: Option<PathBuf>,

    /// Probe timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
}
