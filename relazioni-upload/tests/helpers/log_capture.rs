//! Log capture for testing
//!
//! Records every event emitted by this crate together with the state of a
//! shared busy flag at that moment.

use relazioni_upload::BusyIndicator;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

const CRATE_TARGET: &str = "relazioni_upload";

/// Captured log record
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub target: String,
    pub while_busy: bool,
}

/// Busy indicator whose visibility can be observed from elsewhere
#[derive(Debug, Clone, Default)]
pub struct SharedIndicator {
    visible: Arc<AtomicBool>,
}

impl SharedIndicator {
    pub fn flag(&self) -> Arc<AtomicBool> {
        self.visible.clone()
    }
}

impl BusyIndicator for SharedIndicator {
    fn show(&mut self) {
        self.visible.store(true, Ordering::SeqCst);
    }

    fn hide(&mut self) {
        self.visible.store(false, Ordering::SeqCst);
    }

    fn is_visible(&self) -> bool {
        self.visible.load(Ordering::SeqCst)
    }
}

/// Log capture layer for testing
#[derive(Clone)]
pub struct LogCapture {
    busy: Arc<AtomicBool>,
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl LogCapture {
    pub fn watching(busy: Arc<AtomicBool>) -> Self {
        Self {
            busy,
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn records(&self) -> Vec<LogRecord> {
        self.records.lock().unwrap().clone()
    }

    /// Records emitted while the busy flag was set
    pub fn while_busy(&self) -> Vec<LogRecord> {
        self.records().into_iter().filter(|r| r.while_busy).collect()
    }
}

impl<S> Layer<S> for LogCapture
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let target = event.metadata().target();
        if !target.starts_with(CRATE_TARGET) {
            return;
        }
        self.records.lock().unwrap().push(LogRecord {
            target: target.to_string(),
            while_busy: self.busy.load(Ordering::SeqCst),
        });
    }
}
