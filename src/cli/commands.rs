//! Command implementations

use anyhow::Result;
use tracing::{error, info};

use crate::adapters::PlaylistSettings;
use crate::app::{AppContainer, InspectFormat, InspectRequest};
use crate::cli::args::{BuildArgs, InspectArgs, ManualArgs, PipelineArgs, RankArgs};
use crate::domain::errors::DomainError;
use crate::domain::model::{PlaylistReport, PlaylistRequest, PlaylistSource};

/// Execute the build command
pub async fn build(
    container: &dyn AppContainer,
    settings: &PlaylistSettings,
    args: BuildArgs,
) -> Result<()> {
    info!("Starting build operation for: {}", args.dir.display());
    let request = playlist_request(PlaylistSource::Directory(args.dir), settings, &args.pipeline)?;
    run_playlist(container, request).await?;
    Ok(())
}

/// Execute the manual command
pub async fn manual(
    container: &dyn AppContainer,
    settings: &PlaylistSettings,
    args: ManualArgs,
) -> Result<()> {
    info!("Starting manual operation with {} files", args.files.len());
    let request = playlist_request(PlaylistSource::Files(args.files), settings, &args.pipeline)?;
    run_playlist(container, request).await?;
    Ok(())
}

/// Execute the rank command and print the final order
pub async fn rank(
    container: &dyn AppContainer,
    settings: &PlaylistSettings,
    args: RankArgs,
) -> Result<()> {
    info!("Starting rank operation for: {}", args.dir.display());
    let request = playlist_request(PlaylistSource::Directory(args.dir), settings, &args.pipeline)?;
    let report = run_playlist(container, request).await?;

    for path in report.ordered_paths() {
        println!("{}", path);
    }
    Ok(())
}

/// Execute the inspect command
pub async fn inspect(
    container: &dyn AppContainer,
    settings: &PlaylistSettings,
    args: InspectArgs,
) -> Result<()> {
    info!("Starting inspect operation");
    let format = InspectFormat::parse(&args.format)?;
    let request = InspectRequest::new(args.input)
        .with_format(format)
        .with_scoring(settings.scoring);

    let response = container.inspect_interactor().execute(request).await?;
    print!("{}", response.summary);
    if !response.summary.ends_with('\n') {
        println!();
    }
    Ok(())
}

fn playlist_request(
    source: PlaylistSource,
    settings: &PlaylistSettings,
    pipeline: &PipelineArgs,
) -> Result<PlaylistRequest, DomainError> {
    Ok(PlaylistRequest::new(source, settings.output.clone())
        .with_sort(settings.sort)
        .with_scoring(settings.scoring)
        .with_extensions(settings.extension_set()?)
        .with_title(settings.title.clone())
        .with_listing(pipeline.list.clone())
        .verbose(pipeline.verbose))
}

/// Run the pipeline. A playlist that could not be saved is printed instead.
async fn run_playlist(
    container: &dyn AppContainer,
    request: PlaylistRequest,
) -> Result<PlaylistReport> {
    match container.playlist_interactor().execute(request).await {
        Ok(report) => {
            info!(
                "Playlist with {} entries written to {}",
                report.entries.len(),
                report.output_path.display()
            );
            if report.degraded > 0 {
                info!("{} files could not be probed and were scored as empty", report.degraded);
            }
            Ok(report)
        }
        Err(e) => {
            if let Some(document) = e.document() {
                error!("Playlist could not be saved, printing it instead");
                print!("{}", document);
            }
            Err(e.into())
        }
    }
}
