//! Configuration initialization and hierarchy management

use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use crate::adapters::{PlaylistSettings, TomlConfigAdapter};
use crate::cli::args::PipelineArgs;
use crate::cli::{Cli, Commands};
use crate::domain::model::{ExtensionSet, SortStrategy};
use crate::domain::rules::ScoringPolicy;

/// Default playlist name of the `rank` command
pub const RANK_OUTPUT_FILE: &str = "vlc_playlist.xspf";

/// Initialize configuration hierarchy following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(cli: &Cli) -> Result<PlaylistSettings> {
    resolve_settings(cli, |key| std::env::var(key).ok())
}

/// Same as [`initialize_configuration_hierarchy`] with an injectable environment
pub fn resolve_settings<F>(cli: &Cli, env_lookup: F) -> Result<PlaylistSettings>
where
    F: Fn(&str) -> Option<String>,
{
    info!("Initializing configuration hierarchy");

    let mut settings = TomlConfigAdapter::load_file(cli.config.as_deref())?;

    let env_overrides = TomlConfigAdapter::apply_env(&mut settings, env_lookup)?;
    if env_overrides > 0 {
        info!("Applied {} environment variable overrides", env_overrides);
    }

    let cli_overrides = apply_cli_configuration_overrides(&mut settings, cli)?;
    if cli_overrides > 0 {
        info!("Applied {} CLI configuration overrides", cli_overrides);
    }

    settings.validate()?;
    Ok(settings)
}

/// Apply CLI argument overrides to configuration
fn apply_cli_configuration_overrides(settings: &mut PlaylistSettings, cli: &Cli) -> Result<usize> {
    let mut cli_overrides = 0;

    if let Some(log_dir) = &cli.log_dir {
        settings.log_dir = Some(log_dir.clone());
        cli_overrides += 1;
    }

    match &cli.command {
        Commands::Build(args) => cli_overrides += apply_pipeline(settings, &args.pipeline)?,
        Commands::Manual(args) => cli_overrides += apply_pipeline(settings, &args.pipeline)?,
        Commands::Rank(args) => {
            // the ranking command has its own fixed profile
            settings.extensions = ExtensionSet::mp4_only().iter().map(String::from).collect();
            settings.scoring = ScoringPolicy::Multiplicative;
            settings.sort = SortStrategy::None;
            settings.output = PathBuf::from(RANK_OUTPUT_FILE);

            cli_overrides += apply_pipeline(settings, &args.pipeline)?;
            if args.quality {
                settings.sort = SortStrategy::Quality;
                cli_overrides += 1;
            }
        }
        Commands::Inspect(args) => {
            if let Some(scoring) = &args.scoring {
                settings.scoring = ScoringPolicy::parse(scoring)?;
                cli_overrides += 1;
            }
            if let Some(ffprobe) = &args.ffprobe {
                settings.ffprobe_path = ffprobe.clone();
                cli_overrides += 1;
            }
            if let Some(timeout) = args.timeout {
                settings.probe_timeout_secs = timeout;
                cli_overrides += 1;
            }
        }
    }

    Ok(cli_overrides)
}

fn apply_pipeline(settings: &mut PlaylistSettings, args: &PipelineArgs) -> Result<usize> {
    let mut applied = 0;

    if let Some(sort) = &args.sort {
        settings.sort = SortStrategy::parse(sort)?;
        applied += 1;
    }
    if let Some(scoring) = &args.scoring {
        settings.scoring = ScoringPolicy::parse(scoring)?;
        applied += 1;
    }
    if let Some(extensions) = &args.extensions {
        settings.extensions = ExtensionSet::parse(extensions)?.iter().map(String::from).collect();
        applied += 1;
    }
    if let Some(output) = &args.output {
        settings.output = output.clone();
        applied += 1;
    }
    if let Some(title) = &args.title {
        settings.title = title.clone();
        applied += 1;
    }
    if let Some(ffprobe) = &args.ffprobe {
        settings.ffprobe_path = ffprobe.clone();
        applied += 1;
    }
    if let Some(timeout) = args.timeout {
        settings.probe_timeout_secs = timeout;
        applied += 1;
    }
    if let Some(jobs) = args.jobs {
        settings.max_concurrent_probes = jobs;
        applied += 1;
    }

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_cli_beats_env_beats_file() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("playlistx.toml");
        std::fs::write(
            &config,
            "[playlistx]\nsort = \"name\"\ntitle = \"From file\"\nprobe_timeout_secs = 7\n",
        )
        .unwrap();

        let env: HashMap<&str, &str> = [("PLAYLISTX_SORT", "size"), ("PLAYLISTX_TITLE", "From env")]
            .into_iter()
            .collect();

        let cli = Cli::parse_from([
            "playlister",
            "--config",
            config.to_str().unwrap(),
            "build",
            "--dir",
            "/videos",
            "--sort",
            "duration",
        ]);
        let settings = resolve_settings(&cli, |k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(settings.sort, SortStrategy::Duration);
        assert_eq!(settings.title, "From env");
        assert_eq!(settings.probe_timeout_secs, 7);
    }

    #[test]
    fn test_rank_profile() {
        let cli = Cli::parse_from(["playlister", "rank", "/videos", "-q"]);
        let settings = resolve_settings(&cli, no_env).unwrap();

        assert_eq!(settings.extension_set().unwrap(), ExtensionSet::mp4_only());
        assert_eq!(settings.scoring, ScoringPolicy::Multiplicative);
        assert_eq!(settings.sort, SortStrategy::Quality);
        assert_eq!(settings.output, PathBuf::from(RANK_OUTPUT_FILE));
    }

    #[test]
    fn test_rank_output_can_be_overridden() {
        let cli = Cli::parse_from([
            "playlister",
            "rank",
            "/videos",
            "-o",
            "mine.xspf",
            "--scoring",
            "additive",
        ]);
        let settings = resolve_settings(&cli, no_env).unwrap();
        assert_eq!(settings.output, PathBuf::from("mine.xspf"));
        assert_eq!(settings.scoring, ScoringPolicy::Additive);
        assert_eq!(settings.sort, SortStrategy::None);
    }

    #[test]
    fn test_invalid_cli_values_are_rejected() {
        let cli = Cli::parse_from(["playlister", "build", "--dir", "/videos", "--sort", "random"]);
        assert!(resolve_settings(&cli, no_env).is_err());

        let cli = Cli::parse_from(["playlister", "build", "--dir", "/videos", "--jobs", "0"]);
        assert!(resolve_settings(&cli, no_env).is_err());
    }
}
