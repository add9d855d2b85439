//! Scan deadline
//!
//! A single deadline governs a scan. When it fires the scan's cancellation
//! token is cancelled, which unblocks every pending remote call. The deadline
//! may be pushed out once, when the candidate count becomes known.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Default scan budget
pub const DEFAULT_BASE_TIMEOUT: Duration = Duration::from_secs(180);
/// Budget floor applied when extending
pub const DEFAULT_EXTENSION_FLOOR: Duration = Duration::from_secs(180);
/// Extra budget per candidate branch
pub const DEFAULT_PER_BRANCH: Duration = Duration::from_secs(1);

/// Timeout configuration for one scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeadlinePolicy {
    pub base: Duration,
    pub adaptive: bool,
    pub extension_floor: Duration,
    pub per_branch: Duration,
}

impl Default for DeadlinePolicy {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE_TIMEOUT,
            adaptive: true,
            extension_floor: DEFAULT_EXTENSION_FLOOR,
            per_branch: DEFAULT_PER_BRANCH,
        }
    }
}

impl DeadlinePolicy {
    /// Fixed budget, never extended
    pub fn fixed(base: Duration) -> Self {
        Self {
            base,
            adaptive: false,
            ..Self::default()
        }
    }

    /// Budget for `candidates` branches; never below `base`
    pub fn budget_for(&self, candidates: usize) -> Duration {
        let per_branch = self
            .per_branch
            .saturating_mul(u32::try_from(candidates).unwrap_or(u32::MAX));
        self.base
            .max(self.extension_floor.saturating_add(per_branch))
    }
}

/// An armed deadline
#[derive(Debug)]
pub struct ScanDeadline {
    policy: DeadlinePolicy,
    started: Instant,
    token: CancellationToken,
    expires_tx: watch::Sender<Instant>,
    extended: AtomicBool,
}

impl ScanDeadline {
    /// Arm the deadline now. Must be called inside a tokio runtime.
    pub fn arm(policy: DeadlinePolicy) -> Self {
        let started = Instant::now();
        let token = CancellationToken::new();
        let (expires_tx, mut expires_rx) = watch::channel(started + policy.base);

        let fire = token.clone();
        tokio::spawn(async move {
            loop {
                let expires = *expires_rx.borrow_and_update();
                tokio::select! {
                    _ = tokio::time::sleep_until(expires) => {
                        fire.cancel();
                        break;
                    }
                    changed = expires_rx.changed() => {
                        // Deadline dropped: scan already settled
                        if changed.is_err() {
                            break;
                        }
                    }
                    _ = fire.cancelled() => break,
                }
            }
        });

        Self {
            policy,
            started,
            token,
            expires_tx,
            extended: AtomicBool::new(false),
        }
    }

    /// Token cancelled when the deadline fires
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn has_fired(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Current budget measured from arming
    pub fn budget(&self) -> Duration {
        self.expires_tx.borrow().duration_since(self.started)
    }

    /// Recompute the budget from the candidate count.
    ///
    /// Applies only to adaptive policies, only once, and only upward.
    /// Returns the new budget when it changed.
    pub fn extend_for(&self, candidates: usize) -> Option<Duration> {
        if !self.policy.adaptive || self.has_fired() {
            return None;
        }
        if self.extended.swap(true, Ordering::AcqRel) {
            return None;
        }

        let budget = self.policy.budget_for(candidates);
        if budget <= self.budget() {
            return None;
        }
        self.expires_tx.send_replace(self.started + budget);
        log::debug!(
            "Scan deadline extended to {:?} for {} candidate branches",
            budget,
            candidates
        );
        Some(budget)
    }
}
