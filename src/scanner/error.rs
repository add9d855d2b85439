//! Scanner Error Types

use crate::remote::RemoteError;
use crate::scanner::types::{ErrorCode, ScanFailure};

pub const TIMEOUT_MESSAGE: &str = "Repository analysis timed out. This repository may have too many branches to analyze quickly. Try using a GitHub token for faster API access.";

/// Fatal scan errors. Per-branch failures never reach this type.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Repository target does not name a repository
    #[error("{source}")]
    InvalidTarget {
        #[source]
        source: RemoteError,
    },

    /// Repository metadata or branch listing failed
    #[error("{source}")]
    Upstream {
        #[source]
        source: RemoteError,
    },

    /// Deadline fired before the scan settled
    #[error("{}", TIMEOUT_MESSAGE)]
    Timeout,
}

impl From<RemoteError> for ScanError {
    fn from(source: RemoteError) -> Self {
        match source {
            RemoteError::InvalidTarget { .. } => ScanError::InvalidTarget { source },
            RemoteError::Cancelled { .. } => ScanError::Timeout,
            source => ScanError::Upstream { source },
        }
    }
}

impl ScanError {
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ScanError::Timeout => ErrorCode::Timeout,
            ScanError::InvalidTarget { .. } | ScanError::Upstream { .. } => {
                ErrorCode::AnalysisFailed
            }
        }
    }

    pub fn to_failure(&self) -> ScanFailure {
        ScanFailure {
            error_message: self.to_string(),
            error_code: self.error_code(),
        }
    }
}

impl crate::core::error_handling::ContextualError for ScanError {
    fn is_user_actionable(&self) -> bool {
        match self {
            ScanError::InvalidTarget { .. } => true,
            ScanError::Upstream { source } => matches!(
                source,
                RemoteError::RateLimited | RemoteError::Status { .. }
            ),
            ScanError::Timeout => true,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ScanError::InvalidTarget { .. } => Some("Invalid GitHub URL"),
            ScanError::Upstream {
                source: RemoteError::RateLimited,
            } => Some(
                "GitHub API rate limit exceeded. Please provide a valid GitHub token or wait for the rate limit to reset.",
            ),
            ScanError::Upstream {
                source: RemoteError::Status { context, .. },
            } => Some(context),
            ScanError::Timeout => Some(TIMEOUT_MESSAGE),
            ScanError::Upstream { .. } => None,
        }
    }
}

pub type ScanResult<T> = Result<T, ScanError>;
