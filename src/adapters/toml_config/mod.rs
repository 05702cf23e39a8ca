// TOML config adapter - Settings from file, environment and defaults

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::ScoringPolicy;

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "playlistx.toml";

/// Effective settings for a run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlaylistSettings {
    /// Probe executable, looked up on `PATH` when not absolute
    pub ffprobe_path: PathBuf,
    /// Wall-clock budget for one probe
    pub probe_timeout_secs: u64,
    /// Upper bound on concurrent probes
    pub max_concurrent_probes: usize,
    pub extensions: Vec<String>,
    pub scoring: ScoringPolicy,
    pub sort: SortStrategy,
    pub title: String,
    pub output: PathBuf,
    /// Directory for timestamped run logs; no file log when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for PlaylistSettings {
    fn default() -> Self {
        Self {
            ffprobe_path: PathBuf::from("ffprobe"),
            probe_timeout_secs: 30,
            max_concurrent_probes: num_cpus::get(),
            extensions: ExtensionSet::VIDEO.iter().map(|e| e.to_string()).collect(),
            scoring: ScoringPolicy::Additive,
            sort: SortStrategy::None,
            title: PlaylistDocument::DEFAULT_TITLE.to_string(),
            output: PathBuf::from("playlist.xspf"),
            log_dir: None,
        }
    }
}

impl PlaylistSettings {
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn extension_set(&self) -> Result<ExtensionSet, DomainError> {
        let set = ExtensionSet::new(&self.extensions);
        if set.is_empty() {
            return Err(DomainError::Config(
                "extensions must name at least one file extension".to_string(),
            ));
        }
        Ok(set)
    }

    /// Reject settings no run could use
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.probe_timeout_secs == 0 {
            return Err(DomainError::Config(
                "probe_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.max_concurrent_probes == 0 {
            return Err(DomainError::Config(
                "max_concurrent_probes must be greater than zero".to_string(),
            ));
        }
        if self.ffprobe_path.as_os_str().is_empty() {
            return Err(DomainError::Config("ffprobe_path must not be empty".to_string()));
        }
        self.extension_set()?;
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    playlistx: Option<PlaylistSettings>,
}

/// Loads [`PlaylistSettings`] with precedence environment > file > defaults
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse the `[playlistx]` table of a TOML document
    pub fn parse(toml_content: &str) -> Result<PlaylistSettings, DomainError> {
        let parsed: ConfigFile = toml::from_str(toml_content)
            .map_err(|e| DomainError::Config(format!("Failed to parse TOML config: {}", e)))?;
        Ok(parsed.playlistx.unwrap_or_default())
    }

    /// Load from an explicit file, or from [`DEFAULT_CONFIG_FILE`] when present
    pub fn load_file(explicit: Option<&Path>) -> Result<PlaylistSettings, DomainError> {
        let path = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(DomainError::Config(format!(
                        "Config file does not exist: {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    debug!("No configuration file found, using defaults");
                    return Ok(PlaylistSettings::default());
                }
                fallback
            }
        };

        info!("Loading configuration from: {}", path.display());
        let content = std::fs::read_to_string(&path)
            .map_err(|e| DomainError::Config(format!("Failed to read config file: {}", e)))?;
        Self::parse(&content)
    }

    /// Apply `PLAYLISTX_*` overrides read through `lookup`
    pub fn apply_env<F>(settings: &mut PlaylistSettings, lookup: F) -> Result<usize, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = 0;

        if let Some(value) = lookup("PLAYLISTX_FFPROBE") {
            settings.ffprobe_path = PathBuf::from(value);
            applied += 1;
        }
        if let Some(value) = lookup("PLAYLISTX_PROBE_TIMEOUT") {
            settings.probe_timeout_secs = parse_number("PLAYLISTX_PROBE_TIMEOUT", &value)?;
            applied += 1;
        }
        if let Some(value) = lookup("PLAYLISTX_JOBS") {
            settings.max_concurrent_probes = parse_number("PLAYLISTX_JOBS", &value)?;
            applied += 1;
        }
        if let Some(value) = lookup("PLAYLISTX_SORT") {
            settings.sort = SortStrategy::parse(&value).map_err(as_config)?;
            applied += 1;
        }
        if let Some(value) = lookup("PLAYLISTX_SCORING") {
            settings.scoring = ScoringPolicy::parse(&value).map_err(as_config)?;
            applied += 1;
        }
        if let Some(value) = lookup("PLAYLISTX_EXTENSIONS") {
            settings.extensions = value.split(',').map(|e| e.trim().to_string()).collect();
            applied += 1;
        }
        if let Some(value) = lookup("PLAYLISTX_TITLE") {
            settings.title = value;
            applied += 1;
        }
        if let Some(value) = lookup("PLAYLISTX_LOG_DIR") {
            settings.log_dir = Some(PathBuf::from(value));
            applied += 1;
        }

        Ok(applied)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, DomainError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| DomainError::Config(format!("{} must be a number, got '{}'", key, value)))
}

fn as_config(error: DomainError) -> DomainError {
    DomainError::Config(error.to_string())
}
