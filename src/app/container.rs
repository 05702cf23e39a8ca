use std::sync::Arc;

use tracing::{info, warn};

use crate::adapters::{
    FFprobeAdapter, FanoutLogAdapter, FileLogAdapter, LocalFsAdapter, PlaylistSettings,
    TracingLogAdapter,
};
use crate::app::{inspect_interactor::InspectInteractor, playlist_interactor::PlaylistInteractor};
use crate::ports::{FsPort, LogLevel, LogPort, ProbePort};

pub trait AppContainer: Send + Sync {
    fn playlist_interactor(&self) -> Arc<PlaylistInteractor>;
    fn inspect_interactor(&self) -> Arc<InspectInteractor>;
}

pub struct DefaultAppContainer {
    playlist_interactor: Arc<PlaylistInteractor>,
    inspect_interactor: Arc<InspectInteractor>,
}

impl DefaultAppContainer {
    /// Wire the production adapters from resolved settings
    pub fn new(settings: &PlaylistSettings, log_level: LogLevel) -> Self {
        let probe_port = Arc::new(
            FFprobeAdapter::new(settings.ffprobe_path.clone())
                .with_timeout(settings.probe_timeout()),
        );
        let fs_port = Arc::new(LocalFsAdapter::new());

        let mut log_port = FanoutLogAdapter::default();
        log_port.push(Arc::new(TracingLogAdapter::new(log_level)));
        if let Some(log_dir) = &settings.log_dir {
            // a missing log directory only costs the file sink
            match FileLogAdapter::create_in(log_dir, log_level) {
                Ok(file_log) => {
                    info!("Writing run log to: {}", file_log.path().display());
                    log_port.push(Arc::new(file_log));
                }
                Err(e) => warn!("File logging disabled: {}", e),
            }
        }

        Self::with_ports(
            probe_port,
            fs_port,
            Arc::new(log_port),
            settings.max_concurrent_probes,
        )
    }

    /// Wire arbitrary adapters, e.g. in-memory ones for tests
    pub fn with_ports(
        probe_port: Arc<dyn ProbePort>,
        fs_port: Arc<dyn FsPort>,
        log_port: Arc<dyn LogPort>,
        max_concurrent_probes: usize,
    ) -> Self {
        let playlist_interactor = Arc::new(
            PlaylistInteractor::new(
                Arc::clone(&probe_port),
                Arc::clone(&fs_port),
                Arc::clone(&log_port),
            )
            .with_max_concurrent_probes(max_concurrent_probes),
        );

        let inspect_interactor = Arc::new(InspectInteractor::new(probe_port, fs_port, log_port));

        Self {
            playlist_interactor,
            inspect_interactor,
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn playlist_interactor(&self) -> Arc<PlaylistInteractor> {
        Arc::clone(&self.playlist_interactor)
    }

    fn inspect_interactor(&self) -> Arc<InspectInteractor> {
        Arc::clone(&self.inspect_interactor)
    }
}
