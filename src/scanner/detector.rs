//! Merge Detector
//!
//! Decides whether one candidate branch is fully reachable from the main
//! branch and, if so, resolves its tip commit into a [`DeadBranch`] record.
//! Failures here are never fatal; they only mean "not dead".

use tokio_util::sync::CancellationToken;

use crate::remote::{BranchRef, CommitInfo, Comparison, RemoteClient, RepositoryTarget};

use super::types::{normalize_commit_date, DeadBranch};

/// Classification of one candidate branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchVerdict {
    /// Fully merged with resolvable commit metadata
    Dead(DeadBranch),
    /// Has commits main does not
    Unmerged { ahead_by: u64 },
    /// Could not be classified (lookup failed, cancelled, bad metadata)
    Skipped,
}

impl BranchVerdict {
    pub fn into_record(self) -> Option<DeadBranch> {
        match self {
            BranchVerdict::Dead(record) => Some(record),
            _ => None,
        }
    }
}

/// Build the verdict from a comparison and, for merged branches, the tip
/// commit. Pure: the same inputs always give the same verdict.
pub fn classify(
    branch: &BranchRef,
    comparison: &Comparison,
    commit: Option<&CommitInfo>,
) -> BranchVerdict {
    if !comparison.is_merged() {
        return BranchVerdict::Unmerged {
            ahead_by: comparison.ahead_by,
        };
    }

    let Some(commit) = commit else {
        return BranchVerdict::Skipped;
    };
    match commit.author_date().and_then(normalize_commit_date) {
        Some(last_commit_date) => BranchVerdict::Dead(DeadBranch {
            name: branch.name.clone(),
            last_commit_date,
            last_commit_sha: commit.sha.clone(),
        }),
        None => BranchVerdict::Skipped,
    }
}

/// Checks candidates of one repository against its main branch
pub struct MergeDetector<'a> {
    client: &'a RemoteClient,
    target: &'a RepositoryTarget,
}

impl<'a> MergeDetector<'a> {
    pub fn new(client: &'a RemoteClient, target: &'a RepositoryTarget) -> Self {
        Self { client, target }
    }

    /// Classify `branch` against `main`
    pub async fn check(
        &self,
        main: &str,
        branch: &BranchRef,
        cancel: &CancellationToken,
    ) -> BranchVerdict {
        if cancel.is_cancelled() {
            return BranchVerdict::Skipped;
        }

        let comparison = match self
            .client
            .compare(self.target, main, &branch.name, cancel)
            .await
        {
            Ok(comparison) => comparison,
            Err(e) => {
                if !e.is_cancelled() {
                    log::debug!("Failed to check branch {}: {}", branch.name, e);
                }
                return BranchVerdict::Skipped;
            }
        };

        if !comparison.is_merged() {
            return classify(branch, &comparison, None);
        }

        let commit = match self.client.commit(self.target, branch.sha(), cancel).await {
            Ok(commit) => commit,
            Err(e) => {
                if !e.is_cancelled() {
                    log::debug!(
                        "Failed to fetch last commit of branch {}: {}",
                        branch.name,
                        e
                    );
                }
                return BranchVerdict::Skipped;
            }
        };

        let verdict = classify(branch, &comparison, Some(&commit));
        if verdict == BranchVerdict::Skipped {
            log::debug!("Branch {} has no usable author timestamp", branch.name);
        }
        verdict
    }
}
