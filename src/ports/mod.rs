// Ports - Interface definitions (contracts)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Local};

use crate::domain::errors::*;
use crate::domain::model::*;

/// Port for media file probing
#[async_trait]
pub trait ProbePort: Send + Sync {
    /// Probe one file. Any failure yields `VideoMetadata::default()`.
    async fn probe_media(&self, file_path: &Path) -> VideoMetadata;
}

/// Port for file system operations
#[async_trait]
pub trait FsPort: Send + Sync {
    /// Check if directory exists
    async fn directory_exists(&self, dir_path: &Path) -> bool;

    /// Recursively list files under `root` whose extension is in `extensions`
    async fn discover_files(
        &self,
        root: &Path,
        extensions: &ExtensionSet,
    ) -> Result<Vec<PathBuf>, DomainError>;

    /// Get file size
    async fn file_size(&self, file_path: &Path) -> Result<u64, DomainError>;

    /// Resolve relative path to absolute path
    async fn resolve_path(&self, file_path: &Path) -> Result<PathBuf, DomainError>;

    /// Replace the contents of `file_path` with `contents`
    async fn write_text(&self, file_path: &Path, contents: &str) -> Result<(), DomainError>;
}

/// Port for the run log. Sinks are append-only and must not fail the caller.
#[async_trait]
pub trait LogPort: Send + Sync {
    /// Record a structured event
    async fn log_event(&self, event: &LogEvent);

    /// Log info message
    async fn info(&self, message: &str) {
        self.log_event(&LogEvent::new(LogLevel::Info, message)).await;
    }

    /// Log warning message
    async fn warn(&self, message: &str) {
        self.log_event(&LogEvent::new(LogLevel::Warn, message)).await;
    }

    /// Log error message
    async fn error(&self, message: &str) {
        self.log_event(&LogEvent::new(LogLevel::Error, message)).await;
    }

    /// Log debug message
    async fn debug(&self, message: &str) {
        self.log_event(&LogEvent::new(LogLevel::Debug, message)).await;
    }

    /// Flush log buffer
    async fn flush(&self) {}
}

/// Log event with structured data
#[derive(Debug, Clone)]
pub struct LogEvent {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Local>,
    pub context: BTreeMap<String, String>,
}

impl LogEvent {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Local::now(),
            context: BTreeMap::new(),
        }
    }

    /// Attach a context field
    pub fn with_field(mut self, key: &str, value: impl ToString) -> Self {
        self.context.insert(key.to_string(), value.to_string());
        self
    }

    /// `YYYY-MM-DD HH:MM:SS - message`
    pub fn line(&self) -> String {
        format!(
            "{} - {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.message
        )
    }
}

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Parse log level from string
    pub fn parse(level_str: &str) -> Result<Self, DomainError> {
        match level_str.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid log level: {}. Valid levels: trace, debug, info, warn, error",
                level_str
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
