// Adapters - External system implementations

pub mod file_log;
pub mod fs_local;
pub mod memory_log;
pub mod probe_ffprobe;
pub mod probe_static;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use file_log::FileLogAdapter;
pub use fs_local::LocalFsAdapter;
pub use memory_log::{FanoutLogAdapter, MemoryLogAdapter};
pub use probe_ffprobe::FFprobeAdapter;
pub use probe_static::StaticProbeAdapter;
pub use toml_config::{PlaylistSettings, TomlConfigAdapter};
pub use tracing_log::TracingLogAdapter;
