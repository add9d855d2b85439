//! Wire types for the hosting platform's REST surface
//!
//! Only the fields the scan reads are modelled; everything else in the
//! payloads is ignored by serde.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::{RemoteError, RemoteResult};

/// Header carrying the remaining request allowance
pub const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";

/// Repository metadata (`GET /repos/{owner}/{repo}`)
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryInfo {
    pub default_branch: String,
}

/// Tip commit of a listed branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchCommit {
    pub sha: String,
}

/// Branch Reference as returned by the listing call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRef {
    pub name: String,
    pub commit: BranchCommit,
}

impl BranchRef {
    pub fn new(name: impl Into<String>, sha: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commit: BranchCommit { sha: sha.into() },
        }
    }

    pub fn sha(&self) -> &str {
        &self.commit.sha
    }
}

/// Comparison of a candidate branch against the main branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Comparison {
    pub ahead_by: u64,
    pub behind_by: u64,
}

impl Comparison {
    /// A candidate with nothing ahead of main is fully merged
    pub fn is_merged(&self) -> bool {
        self.ahead_by == 0
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitAuthor {
    pub date: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommitDetail {
    pub author: Option<CommitAuthor>,
}

/// Commit lookup payload (`GET /repos/{owner}/{repo}/commits/{sha}`)
#[derive(Debug, Clone, Deserialize)]
pub struct CommitInfo {
    pub sha: String,
    pub commit: Option<CommitDetail>,
}

impl CommitInfo {
    /// The raw author timestamp, if the payload carried one
    pub fn author_date(&self) -> Option<&str> {
        self.commit
            .as_ref()
            .and_then(|c| c.author.as_ref())
            .and_then(|a| a.date.as_deref())
            .filter(|d| !d.is_empty())
    }
}

/// A fully-read API response
///
/// Non-success responses are values, not errors; callers decide what a
/// status means for them.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub url: String,
    pub status: StatusCode,
    pub rate_limit_remaining: Option<u64>,
    pub body: String,
}

impl ApiResponse {
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// 403 with a zero remaining allowance: the credential is spent
    pub fn is_rate_limited(&self) -> bool {
        self.status == StatusCode::FORBIDDEN && self.rate_limit_remaining == Some(0)
    }

    pub fn json<T: DeserializeOwned>(&self) -> RemoteResult<T> {
        serde_json::from_str(&self.body).map_err(|source| RemoteError::Decode {
            url: self.url.clone(),
            source,
        })
    }
}
