//! CLI module for playlister
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

pub mod args;
pub mod commands;

/// Playlister
///
/// Ranks video files by technical quality and writes VLC-compatible XSPF
/// playlists.
#[derive(Parser, Debug)]
#[command(name = "playlister")]
#[command(about = "Playlister - Quality-ranked VLC playlists from your video files")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    /// Configuration file (default: ./playlistx.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for timestamped run logs
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Whether the selected command asked for verbose output
    pub fn verbose(&self) -> bool {
        match &self.command {
            Commands::Build(args) => args.pipeline.verbose,
            Commands::Manual(args) => args.pipeline.verbose,
            Commands::Rank(args) => args.pipeline.verbose,
            Commands::Inspect(_) => false,
        }
    }

    /// Log level after `-v` is taken into account
    pub fn effective_log_level(&self) -> &str {
        if self.verbose() && matches!(self.log_level.as_str(), "info" | "warn" | "error") {
            "debug"
        } else {
            &self.log_level
        }
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a playlist from every video file under a directory
    Build(args::BuildArgs),
    /// Build a playlist from an explicit list of files
    Manual(args::ManualArgs),
    /// Rank the mp4 files of a directory and print them in playlist order
    Rank(args::RankArgs),
    /// Probe and score a single video file
    Inspect(args::InspectArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}
