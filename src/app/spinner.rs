//! Progress spinner for terminal feedback
//!
//! Renders each scan progress snapshot as a single rewritten line on
//! stderr, so stdout stays clean for the report.

use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::scanner::progress::ProgressObserver;
use crate::scanner::types::ScanProgress;

const BRAILLE_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Spinner only when stderr is a terminal and log lines would not
/// interleave with it
pub fn should_show_spinner() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stderr()) && !log::log_enabled!(log::Level::Info)
}

pub struct ProgressSpinner {
    frame_index: AtomicUsize,
}

impl Default for ProgressSpinner {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSpinner {
    pub fn new() -> Self {
        Self {
            frame_index: AtomicUsize::new(0),
        }
    }

    fn next_frame(&self) -> char {
        let index = self.frame_index.fetch_add(1, Ordering::Relaxed);
        BRAILLE_FRAMES[index % BRAILLE_FRAMES.len()]
    }

    /// Clear the spinner line
    pub fn finish(&self) {
        let mut stderr = std::io::stderr().lock();
        let _ = write!(stderr, "\r\x1b[2K");
        let _ = stderr.flush();
    }
}

/// `⠋ [3/20] Analyzed 3/20 branches... (1 found)`
pub fn render_line(frame: char, progress: &ScanProgress) -> String {
    if progress.total == 0 {
        format!("{} {}", frame, progress.status)
    } else {
        format!(
            "{} [{}/{}] {} ({} found)",
            frame, progress.current, progress.total, progress.status, progress.found
        )
    }
}

impl ProgressObserver for ProgressSpinner {
    fn on_progress(&self, progress: &ScanProgress) {
        let line = render_line(self.next_frame(), progress);
        let mut stderr = std::io::stderr().lock();
        let _ = write!(stderr, "\r\x1b[2K{}", line);
        let _ = stderr.flush();
    }
}
