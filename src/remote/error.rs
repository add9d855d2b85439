//! Remote API Error Types

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("Invalid GitHub URL")]
    InvalidTarget { target: String },

    #[error("GitHub API rate limit exceeded. Please provide a valid GitHub token or wait for the rate limit to reset.")]
    RateLimited,

    #[error("{context}: {}", .status.canonical_reason().unwrap_or("Unknown error"))]
    Status { context: String, status: StatusCode },

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Request to {url} was cancelled")]
    Cancelled { url: String },
}

impl RemoteError {
    /// True when the scan deadline interrupted the request
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RemoteError::Cancelled { .. })
    }
}

/// Result type for remote operations
pub type RemoteResult<T> = Result<T, RemoteError>;
