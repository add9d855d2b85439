//! Scanner Types and Enums
//!
//! Shared types produced by the merge detector and the scan orchestrator.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// A fully merged branch that has not been deleted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadBranch {
    pub name: String,
    /// Calendar date of the last commit, `YYYY-MM-DD`
    pub last_commit_date: String,
    pub last_commit_sha: String,
}

/// Normalise an RFC 3339 commit timestamp to its calendar date.
///
/// The date is taken as written, in the author's own offset, not converted
/// to UTC first: `2024-03-25T23:30:00-05:00` gives `2024-03-25`.
pub fn normalize_commit_date(timestamp: &str) -> Option<String> {
    DateTime::parse_from_rfc3339(timestamp.trim())
        .ok()
        .map(|dt| dt.date_naive().format("%Y-%m-%d").to_string())
}

/// Transient progress snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanProgress {
    pub current: usize,
    pub total: usize,
    pub found: usize,
    pub status: String,
}

impl ScanProgress {
    pub fn new(current: usize, total: usize, found: usize, status: impl Into<String>) -> Self {
        Self {
            current,
            total,
            found,
            status: status.into(),
        }
    }
}

/// Scan lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Connecting,
    ListingBranches,
    Scanning,
    Complete,
    Failed,
    TimedOut,
}

impl ScanState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ScanState::Complete | ScanState::Failed | ScanState::TimedOut
        )
    }
}

/// Machine-readable failure code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Timeout,
    AnalysisFailed,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::AnalysisFailed => "ANALYSIS_FAILED",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fatal scan failure as exposed to callers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanFailure {
    pub error_message: String,
    pub error_code: ErrorCode,
}

/// Either every dead branch or exactly one fatal error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScanOutcome {
    Completed {
        #[serde(rename = "deadBranches")]
        dead_branches: Vec<DeadBranch>,
    },
    Failed(ScanFailure),
}

impl ScanOutcome {
    pub fn dead_branches(&self) -> Option<&[DeadBranch]> {
        match self {
            ScanOutcome::Completed { dead_branches } => Some(dead_branches),
            ScanOutcome::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ScanFailure> {
        match self {
            ScanOutcome::Completed { .. } => None,
            ScanOutcome::Failed(failure) => Some(failure),
        }
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        self.failure().map(|f| f.error_code)
    }
}
