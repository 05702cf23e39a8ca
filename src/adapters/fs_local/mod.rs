// Local filesystem adapter - discovery, stat and playlist persistence

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use walkdir::WalkDir;

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::ports::*;

/// Filesystem adapter backed by `std::fs` and `walkdir`
#[derive(Debug, Default, Clone)]
pub struct LocalFsAdapter;

impl LocalFsAdapter {
    /// Create new local filesystem adapter
    pub fn new() -> Self {
        Self
    }
}

/// Walk `root` and collect every regular file whose extension is in `extensions`.
///
/// Entries that cannot be read (permissions, races) are skipped. An empty
/// result is not an error.
pub fn find_video_files(
    root: &Path,
    extensions: &ExtensionSet,
) -> Result<Vec<PathBuf>, DomainError> {
    if !root.is_dir() {
        return Err(DomainError::NotFound(root.display().to_string()));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        if entry.file_type().is_file() && extensions.matches(entry.path()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Write `contents` next to `path` in a temp file, then move it into place
fn write_atomic(path: &Path, contents: &str) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = tempfile::NamedTempFile::new_in(parent)?;
    temp.write_all(contents.as_bytes())?;
    temp.flush()?;
    temp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl FsPort for LocalFsAdapter {
    async fn directory_exists(&self, dir_path: &Path) -> bool {
        dir_path.is_dir()
    }

    async fn discover_files(
        &self,
        root: &Path,
        extensions: &ExtensionSet,
    ) -> Result<Vec<PathBuf>, DomainError> {
        let root = root.to_path_buf();
        let extensions = extensions.clone();
        tokio::task::spawn_blocking(move || find_video_files(&root, &extensions))
            .await
            .map_err(|e| DomainError::InternalError(format!("discovery task failed: {}", e)))?
    }

    async fn file_size(&self, file_path: &Path) -> Result<u64, DomainError> {
        let metadata = tokio::fs::metadata(file_path)
            .await
            .map_err(|e| DomainError::FsFail(format!("Failed to get file size: {}", e)))?;
        Ok(metadata.len())
    }

    async fn resolve_path(&self, file_path: &Path) -> Result<PathBuf, DomainError> {
        if file_path.is_absolute() {
            return Ok(file_path.to_path_buf());
        }
        let cwd = std::env::current_dir()
            .map_err(|e| DomainError::FsFail(format!("Failed to resolve path: {}", e)))?;
        Ok(cwd.join(file_path))
    }

    async fn write_text(&self, file_path: &Path, contents: &str) -> Result<(), DomainError> {
        let path = file_path.to_path_buf();
        let contents = contents.to_string();
        tokio::task::spawn_blocking(move || write_atomic(&path, &contents))
            .await
            .map_err(|e| DomainError::InternalError(format!("write task failed: {}", e)))?
            .map_err(|e| DomainError::FsFail(e.to_string()))
    }
}
