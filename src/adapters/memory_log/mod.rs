// In-memory and fan-out log sinks

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::*;

/// Keeps every event in memory so callers can read the run log back
#[derive(Default)]
pub struct MemoryLogAdapter {
    events: Mutex<Vec<LogEvent>>,
}

impl MemoryLogAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the recorded events
    pub fn events(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Messages in arrival order, without timestamps
    pub fn messages(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.message).collect()
    }

    /// Timestamped lines in arrival order
    pub fn lines(&self) -> Vec<String> {
        self.events().iter().map(LogEvent::line).collect()
    }
}

#[async_trait]
impl LogPort for MemoryLogAdapter {
    async fn log_event(&self, event: &LogEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

/// Broadcasts each event to several sinks
#[derive(Default)]
pub struct FanoutLogAdapter {
    sinks: Vec<Arc<dyn LogPort>>,
}

impl FanoutLogAdapter {
    pub fn new(sinks: Vec<Arc<dyn LogPort>>) -> Self {
        Self { sinks }
    }

    pub fn push(&mut self, sink: Arc<dyn LogPort>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

#[async_trait]
impl LogPort for FanoutLogAdapter {
    async fn log_event(&self, event: &LogEvent) {
        for sink in &self.sinks {
            sink.log_event(event).await;
        }
    }

    async fn flush(&self) {
        for sink in &self.sinks {
            sink.flush().await;
        }
    }
}
