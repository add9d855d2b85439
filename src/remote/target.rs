//! Repository target identification

use crate::remote::error::RemoteError;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

static TARGET_PATTERN: OnceLock<Regex> = OnceLock::new();

fn target_pattern() -> &'static Regex {
    TARGET_PATTERN.get_or_init(|| {
        Regex::new(r"github\.com/([^/]+)/([^/?#]+)").expect("static pattern compiles")
    })
}

/// Owner/repository pair extracted from a repository URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryTarget {
    pub owner: String,
    pub repo: String,
}

impl RepositoryTarget {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Extract the owner and repository from anything containing
    /// `github.com/<owner>/<repo>`. A trailing `.git` is dropped.
    pub fn parse(url: &str) -> Result<Self, RemoteError> {
        let captures = target_pattern()
            .captures(url.trim())
            .ok_or_else(|| RemoteError::InvalidTarget {
                target: url.to_string(),
            })?;

        let owner = captures[1].to_string();
        let repo = captures[2].trim_end_matches(".git").to_string();
        if repo.is_empty() {
            return Err(RemoteError::InvalidTarget {
                target: url.to_string(),
            });
        }
        Ok(Self { owner, repo })
    }

    /// API path prefix for this repository
    pub fn api_path(&self) -> String {
        format!("/repos/{}/{}", self.owner, self.repo)
    }

    /// Browser URL of a commit in this repository
    pub fn commit_url(&self, sha: &str) -> String {
        format!("https://github.com/{}/{}/commit/{}", self.owner, self.repo, sha)
    }
}

impl fmt::Display for RepositoryTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
