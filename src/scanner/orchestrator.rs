//! Scan Orchestrator
//!
//! Drives one scan end to end: resolve the main branch, list candidates,
//! check them in sequential batches of bounded concurrency, and settle into
//! exactly one [`ScanOutcome`] before the deadline fires.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::stream::{FuturesUnordered, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::remote::{
    BranchRef, ClientConfig, CredentialSet, RemoteClient, RepositoryTarget, BRANCH_PAGE_SIZE,
};

use super::deadline::{DeadlinePolicy, ScanDeadline, DEFAULT_EXTENSION_FLOOR, DEFAULT_PER_BRANCH};
use super::detector::MergeDetector;
use super::error::{ScanError, ScanResult};
use super::progress::{NoProgress, ProgressObserver};
use super::types::{DeadBranch, ScanOutcome, ScanProgress, ScanState};

/// Candidates checked concurrently; the next batch waits for this one
pub const BATCH_SIZE: usize = 10;

/// Everything needed to run one scan
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub repository_url: String,
    pub timeout: Duration,
    /// Caller's own token, tried first
    pub credential: Option<String>,
    /// Further tokens to rotate to once earlier ones are exhausted
    pub fallback_credentials: Vec<String>,
    pub adaptive_timeout: bool,
    pub extension_floor: Duration,
    pub per_branch: Duration,
    pub client: ClientConfig,
}

impl ScanRequest {
    pub fn new(repository_url: impl Into<String>) -> Self {
        let policy = DeadlinePolicy::default();
        Self {
            repository_url: repository_url.into(),
            timeout: policy.base,
            credential: None,
            fallback_credentials: Vec::new(),
            adaptive_timeout: policy.adaptive,
            extension_floor: DEFAULT_EXTENSION_FLOOR,
            per_branch: DEFAULT_PER_BRANCH,
            client: ClientConfig::default(),
        }
    }

    pub fn deadline_policy(&self) -> DeadlinePolicy {
        DeadlinePolicy {
            base: self.timeout,
            adaptive: self.adaptive_timeout,
            extension_floor: self.extension_floor,
            per_branch: self.per_branch,
        }
    }

    /// A fresh credential set for this scan
    pub fn credential_set(&self) -> CredentialSet {
        CredentialSet::new(
            self.credential
                .iter()
                .chain(self.fallback_credentials.iter())
                .cloned(),
        )
    }

    pub fn into_orchestrator(
        self,
        observer: Arc<dyn ProgressObserver>,
    ) -> ScanResult<ScanOrchestrator> {
        let client = RemoteClient::new(self.client.clone(), self.credential_set())?;
        Ok(ScanOrchestrator::new(client, observer, self.deadline_policy()))
    }
}

/// Scan a repository for dead branches.
///
/// Progress snapshots are streamed to `observer` when one is supplied. The
/// outcome is either every dead branch or one classified failure.
pub async fn analyze_repository(
    request: ScanRequest,
    observer: Option<Arc<dyn ProgressObserver>>,
) -> ScanOutcome {
    let repository_url = request.repository_url.clone();
    let observer = observer.unwrap_or_else(|| Arc::new(NoProgress));
    match request.into_orchestrator(observer) {
        Ok(orchestrator) => orchestrator.run(&repository_url).await,
        Err(error) => {
            log::error!("Could not start scan: {}", error);
            ScanOutcome::Failed(error.to_failure())
        }
    }
}

/// Runs a single scan; owns the scan's client and credentials
pub struct ScanOrchestrator {
    client: RemoteClient,
    observer: Arc<dyn ProgressObserver>,
    policy: DeadlinePolicy,
    state: Mutex<ScanState>,
}

impl ScanOrchestrator {
    pub fn new(
        client: RemoteClient,
        observer: Arc<dyn ProgressObserver>,
        policy: DeadlinePolicy,
    ) -> Self {
        Self {
            client,
            observer,
            policy,
            state: Mutex::new(ScanState::Connecting),
        }
    }

    pub fn client(&self) -> &RemoteClient {
        &self.client
    }

    pub fn state(&self) -> ScanState {
        self.state
            .lock()
            .map(|state| *state)
            .unwrap_or(ScanState::Failed)
    }

    fn transition(&self, next: ScanState) {
        if let Ok(mut state) = self.state.lock() {
            log::debug!("Scan state {:?} -> {:?}", *state, next);
            *state = next;
        }
    }

    fn report(&self, current: usize, total: usize, found: usize, status: impl Into<String>) {
        self.observer
            .on_progress(&ScanProgress::new(current, total, found, status));
    }

    /// Run the scan to a terminal state
    pub async fn run(&self, repository_url: &str) -> ScanOutcome {
        let deadline = ScanDeadline::arm(self.policy);

        let result = tokio::select! {
            biased;
            _ = deadline.token().cancelled() => Err(ScanError::Timeout),
            result = self.perform_scan(repository_url, &deadline) => result,
        };

        match result {
            Ok(dead_branches) => ScanOutcome::Completed { dead_branches },
            Err(error) => {
                if matches!(error, ScanError::Timeout) {
                    self.transition(ScanState::TimedOut);
                    log::warn!("Scan of {} timed out after {:?}", repository_url, deadline.budget());
                } else {
                    self.transition(ScanState::Failed);
                    log::warn!("Scan of {} failed: {}", repository_url, error);
                }
                ScanOutcome::Failed(error.to_failure())
            }
        }
    }

    async fn perform_scan(
        &self,
        repository_url: &str,
        deadline: &ScanDeadline,
    ) -> ScanResult<Vec<DeadBranch>> {
        let cancel = deadline.token();
        let target = RepositoryTarget::parse(repository_url)?;

        self.transition(ScanState::Connecting);
        self.report(0, 0, 0, "Connecting to GitHub API...");
        let main = self.client.repository_info(&target, cancel).await?.default_branch;
        log::debug!("Main branch of {} is {}", target, main);

        self.transition(ScanState::ListingBranches);
        self.report(0, 0, 0, format!("Fetching branches from {}...", target));
        let candidates = self.list_candidates(&target, &main, cancel).await?;
        let total = candidates.len();

        // Applied before the first batch starts
        deadline.extend_for(total);
        self.report(0, total, 0, format!("Found {} branches to analyze...", total));

        self.transition(ScanState::Scanning);
        let detector = MergeDetector::new(&self.client, &target);
        let dead_branches = self
            .scan_candidates(&detector, &main, &candidates, cancel)
            .await?;

        self.transition(ScanState::Complete);
        self.report(total, total, dead_branches.len(), "Analysis complete!");
        log::info!(
            "Found {} dead branches out of {} in {}",
            dead_branches.len(),
            total,
            target
        );
        Ok(dead_branches)
    }

    /// Every branch except `main`, in listing order
    async fn list_candidates(
        &self,
        target: &RepositoryTarget,
        main: &str,
        cancel: &CancellationToken,
    ) -> ScanResult<Vec<BranchRef>> {
        let mut branches = Vec::new();
        let mut page = 1;
        loop {
            let listed = self.client.branch_page(target, page, cancel).await?;
            let count = listed.len();
            branches.extend(listed);
            if count < BRANCH_PAGE_SIZE {
                break;
            }
            page += 1;
        }
        log::debug!("Listed {} branches across {} pages", branches.len(), page);

        branches.retain(|branch| branch.name != main);
        Ok(branches)
    }

    async fn scan_candidates(
        &self,
        detector: &MergeDetector<'_>,
        main: &str,
        candidates: &[BranchRef],
        cancel: &CancellationToken,
    ) -> ScanResult<Vec<DeadBranch>> {
        let total = candidates.len();
        let mut dead_branches = Vec::new();
        let mut completed = 0;

        for batch in candidates.chunks(BATCH_SIZE) {
            if cancel.is_cancelled() {
                return Err(ScanError::Timeout);
            }

            let mut pending: FuturesUnordered<_> = batch
                .iter()
                .enumerate()
                .map(|(index, branch)| async move {
                    (index, detector.check(main, branch, cancel).await)
                })
                .collect();

            let mut settled = Vec::new();
            while let Some((index, verdict)) = pending.next().await {
                completed += 1;
                if let Some(record) = verdict.into_record() {
                    settled.push((index, record));
                }
                self.report(
                    completed,
                    total,
                    dead_branches.len() + settled.len(),
                    format!("Analyzed {}/{} branches...", completed, total),
                );
            }

            // Keep listing order within the batch
            settled.sort_by_key(|(index, _)| *index);
            dead_branches.extend(settled.into_iter().map(|(_, record)| record));
        }

        // Partial results are never returned
        if cancel.is_cancelled() {
            return Err(ScanError::Timeout);
        }
        Ok(dead_branches)
    }
}
