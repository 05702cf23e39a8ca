// File log adapter - Timestamped run log on disk

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Local;
use tracing::warn;

use crate::domain::errors::*;
use crate::ports::*;

/// Suffix of log files created by [`FileLogAdapter::create_in`]
pub const LOG_FILE_SUFFIX: &str = "_playlistx.log";

/// Appends `YYYY-MM-DD HH:MM:SS - message` lines to a file.
///
/// Write errors are reported once through `tracing` and otherwise ignored.
pub struct FileLogAdapter {
    path: PathBuf,
    min_level: LogLevel,
    writer: Mutex<Option<BufWriter<File>>>,
}

impl FileLogAdapter {
    /// Open (append) the log file at `path`
    pub fn open(path: impl Into<PathBuf>, min_level: LogLevel) -> Result<Self, DomainError> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                DomainError::FsFail(format!("Failed to open log file {}: {}", path.display(), e))
            })?;

        Ok(Self {
            path,
            min_level,
            writer: Mutex::new(Some(BufWriter::new(file))),
        })
    }

    /// Create `<dir>/YYYYMMDD_HHMMSS_playlistx.log`, creating `dir` if needed
    pub fn create_in(dir: &Path, min_level: LogLevel) -> Result<Self, DomainError> {
        fs::create_dir_all(dir).map_err(|e| {
            DomainError::FsFail(format!("Failed to create log directory: {}", e))
        })?;
        let name = format!("{}{}", Local::now().format("%Y%m%d_%H%M%S"), LOG_FILE_SUFFIX);
        Self::open(dir.join(name), min_level)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_line(&self, line: &str) {
        let Ok(mut guard) = self.writer.lock() else {
            return;
        };
        let Some(writer) = guard.as_mut() else {
            return;
        };

        let result = writeln!(writer, "{}", line).and_then(|_| writer.flush());
        if let Err(e) = result {
            warn!(
                path = %self.path.display(),
                error = %e,
                "log file write failed, disabling file log"
            );
            *guard = None;
        }
    }
}

#[async_trait]
impl LogPort for FileLogAdapter {
    async fn log_event(&self, event: &LogEvent) {
        if event.level >= self.min_level {
            self.write_line(&event.line());
        }
    }

    async fn flush(&self) {
        if let Ok(mut guard) = self.writer.lock() {
            if let Some(writer) = guard.as_mut() {
                let _ = writer.flush();
            }
        }
    }
}
