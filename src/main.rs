//! Playlister
//!
//! Ranks video files by technical quality and writes VLC-compatible XSPF
//! playlists.
//!
//! # Usage
//!
//! ```bash
//! playlister build --dir ~/Videos --sort quality
//! playlister manual intro.mkv feature.mp4 --output evening.xspf
//! playlister rank ~/Videos -q -l ranked.txt
//! playlister inspect --input feature.mp4 --format json
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use playlistx_cli::app::DefaultAppContainer;
use playlistx_cli::cli::{commands, Cli, Commands, LogFormat};
use playlistx_cli::config_initialization::initialize_configuration_hierarchy;
use playlistx_cli::ports::LogLevel;

/// Main entry point for the playlister CLI
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    init_tracing(&cli);
    info!("Starting playlister");

    let settings = initialize_configuration_hierarchy(&cli)?;
    let log_level = LogLevel::parse(cli.effective_log_level()).unwrap_or(LogLevel::Info);
    let container = DefaultAppContainer::new(&settings, log_level);

    // Execute the requested command
    match cli.command {
        Commands::Build(args) => commands::build(&container, &settings, args).await?,
        Commands::Manual(args) => commands::manual(&container, &settings, args).await?,
        Commands::Rank(args) => commands::rank(&container, &settings, args).await?,
        Commands::Inspect(args) => commands::inspect(&container, &settings, args).await?,
    }

    info!("playlister completed successfully");
    Ok(())
}

/// Logs go to stderr so stdout only carries command output
fn init_tracing(cli: &Cli) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.effective_log_level()));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match cli.log_format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Text => subscriber.init(),
    }
}
