//! Playlister library
//!
//! Discovers video files, probes them with ffprobe, scores them by technical
//! quality and writes the result as a VLC-compatible XSPF playlist.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod output;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use app::{AppContainer, DefaultAppContainer, PlaylistInteractor};
pub use domain::errors::DomainError;
pub use domain::model::{
    ExtensionSet, PlaylistReport, PlaylistRequest, PlaylistSource, ScoredEntry, SortStrategy,
    VideoMetadata,
};
pub use domain::rules::ScoringPolicy;
pub use output::XspfWriter;
