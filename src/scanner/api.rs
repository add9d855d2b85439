//! Scanner API
//!
//! Public surface of the scanner: the entry point, its request and outcome
//! types, and the progress observer interface.

// Entry point
pub use crate::scanner::orchestrator::{analyze_repository, ScanOrchestrator, ScanRequest};

// Deadline configuration
pub use crate::scanner::deadline::DeadlinePolicy;

// Error handling
pub use crate::scanner::error::ScanError;

// Progress reporting
pub use crate::scanner::progress::{LogProgress, NoProgress, ProgressObserver, RecordingProgress};

// Core data types
pub use crate::scanner::types::{
    DeadBranch, ErrorCode, ScanFailure, ScanOutcome, ScanProgress, ScanState,
};
