//! Credential Set and rotation
//!
//! A scan owns exactly one `CredentialSet`. The cursor only moves forward and
//! never wraps: once the last credential is exhausted the client surfaces the
//! rate-limit response as-is.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Environment variables consulted for fallback credentials, in priority order
pub const FALLBACK_TOKEN_VARS: &[&str] = &["GITHUB_TOKEN_1", "GITHUB_TOKEN_2"];

/// Fallback tokens present in the environment, in priority order
pub fn fallback_tokens_from_env() -> Vec<String> {
    FALLBACK_TOKEN_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .filter(|token| !token.trim().is_empty())
        .collect()
}

/// Ordered access tokens plus the scan-local cursor
#[derive(Debug, Default)]
pub struct CredentialSet {
    tokens: Vec<String>,
    cursor: AtomicUsize,
}

/// The credential a request was issued with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credential<'a> {
    pub index: usize,
    pub token: &'a str,
}

impl CredentialSet {
    /// Build a set from tokens, dropping blank entries
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens = tokens
            .into_iter()
            .map(|token| {
                let token: String = token.into();
                token.trim().to_string()
            })
            .filter(|t| !t.is_empty())
            .collect();
        Self {
            tokens,
            cursor: AtomicUsize::new(0),
        }
    }

    /// An empty set: requests go out unauthenticated
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Index of the current credential
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }

    /// The credential at the cursor, or `None` when the set is empty
    pub fn current(&self) -> Option<Credential<'_>> {
        let index = self.cursor();
        self.tokens.get(index).map(|token| Credential {
            index,
            token: token.as_str(),
        })
    }

    /// Advance to the next credential. Returns false at the last credential
    /// or when the set is empty.
    pub fn rotate(&self) -> bool {
        self.rotate_from(self.cursor())
    }

    /// Advance past `seen`, the index a request was issued with.
    ///
    /// Concurrent branch checks can observe the same exhaustion; only the
    /// first one moves the cursor. Later callers see the cursor already past
    /// `seen` and are told a fresher credential is available.
    pub fn rotate_from(&self, seen: usize) -> bool {
        let next = seen + 1;
        if next >= self.tokens.len() {
            return false;
        }
        match self
            .cursor
            .compare_exchange(seen, next, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => true,
            Err(actual) => actual > seen,
        }
    }
}
