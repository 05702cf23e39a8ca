// Tracing log adapter - Structured logging using tracing crate

use async_trait::async_trait;
use tracing::{debug, error, info, trace, warn};

use crate::ports::*;

/// Forwards run events to the global `tracing` subscriber
pub struct TracingLogAdapter {
    min_level: LogLevel,
}

impl TracingLogAdapter {
    /// Create new tracing log adapter
    pub fn new(min_level: LogLevel) -> Self {
        Self { min_level }
    }

    /// Check if log level should be logged
    fn should_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }
}

impl Default for TracingLogAdapter {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

#[async_trait]
impl LogPort for TracingLogAdapter {
    async fn log_event(&self, event: &LogEvent) {
        if !self.should_log(event.level) {
            return;
        }

        let context = &event.context;
        match event.level {
            LogLevel::Error => error!(message = %event.message, ?context),
            LogLevel::Warn => warn!(message = %event.message, ?context),
            LogLevel::Info => info!(message = %event.message, ?context),
            LogLevel::Debug => debug!(message = %event.message, ?context),
            LogLevel::Trace => trace!(message = %event.message, ?context),
        }
    }
}
