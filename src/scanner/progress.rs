//! Progress reporting
//!
//! The orchestrator reports through a single observer injected at
//! construction. Snapshots are delivered in the order counters change.

use std::sync::Mutex;

use super::types::ScanProgress;

/// Receives progress snapshots during a scan
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, progress: &ScanProgress);
}

/// Discards every snapshot
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&self, _progress: &ScanProgress) {}
}

/// Logs each snapshot at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl ProgressObserver for LogProgress {
    fn on_progress(&self, progress: &ScanProgress) {
        log::debug!(
            "{} [{}/{}, {} dead]",
            progress.status,
            progress.current,
            progress.total,
            progress.found
        );
    }
}

/// Any closure taking a snapshot is an observer
impl<F> ProgressObserver for F
where
    F: Fn(&ScanProgress) + Send + Sync,
{
    fn on_progress(&self, progress: &ScanProgress) {
        self(progress)
    }
}

/// Keeps every snapshot, in delivery order
#[derive(Debug, Default)]
pub struct RecordingProgress {
    snapshots: Mutex<Vec<ScanProgress>>,
}

impl RecordingProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshots(&self) -> Vec<ScanProgress> {
        self.snapshots
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

impl ProgressObserver for RecordingProgress {
    fn on_progress(&self, progress: &ScanProgress) {
        if let Ok(mut snapshots) = self.snapshots.lock() {
            snapshots.push(progress.clone());
        }
    }
}
