//! Scanner Component
//!
//! Finds the dead branches of a remote repository: branches whose every
//! commit is already reachable from the main branch.
//!
//! ## Core Features
//!
//! - **ScanOrchestrator**: resolves the main branch, lists candidates and
//!   checks them in sequential batches of bounded concurrency
//! - **MergeDetector**: per-branch merge status and last-commit lookup
//! - **ScanDeadline**: one cancellation deadline per scan, extendable once
//!   when the candidate count is known
//! - **ProgressObserver**: snapshot stream for callers

pub mod api;
pub mod deadline;
pub mod detector;
pub mod error;
pub mod orchestrator;
pub mod progress;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{ScanError, ScanResult};
pub use orchestrator::{analyze_repository, ScanOrchestrator, ScanRequest, BATCH_SIZE};
pub use types::{DeadBranch, ErrorCode, ScanFailure, ScanOutcome, ScanProgress, ScanState};
