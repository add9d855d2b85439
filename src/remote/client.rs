//! Remote Repository Client
//!
//! Every outbound call goes through [`RemoteClient::call`], which attaches the
//! current credential and, when the response reports an exhausted allowance,
//! rotates once and retries exactly once.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use tokio_util::sync::CancellationToken;

use super::credentials::CredentialSet;
use super::error::{RemoteError, RemoteResult};
use super::target::RepositoryTarget;
use super::types::{
    ApiResponse, BranchRef, CommitInfo, Comparison, RepositoryInfo, RATE_LIMIT_REMAINING,
};

/// Public GitHub REST endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Branch listing page size; a shorter page ends pagination
pub const BRANCH_PAGE_SIZE: usize = 100;

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github.v3+json";

/// Percent-encode a ref or hash for the request path; `/` separators stay
/// literal since branch names like `feature/x` are addressed that way.
fn encode_ref(name: &str) -> String {
    urlencoding::encode(name).replace("%2F", "/")
}

/// Connection settings for the remote client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            user_agent: format!("gitreaper/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Outcome of a single request attempt
enum Attempt {
    Completed(ApiResponse),
    /// Allowance spent; `credential` is the index the request carried
    Exhausted {
        response: ApiResponse,
        credential: Option<usize>,
    },
}

impl Attempt {
    fn into_response(self) -> ApiResponse {
        match self {
            Attempt::Completed(response) | Attempt::Exhausted { response, .. } => response,
        }
    }
}

/// Read-only client for one scan; owns the scan's credential set
#[derive(Debug)]
pub struct RemoteClient {
    http: Client,
    base_url: String,
    credentials: CredentialSet,
}

impl RemoteClient {
    pub fn new(config: ClientConfig, credentials: CredentialSet) -> RemoteResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));

        let http = Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent)
            .timeout(config.request_timeout)
            .build()
            .map_err(|source| RemoteError::Transport {
                url: config.api_base_url.clone(),
                source,
            })?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn credentials(&self) -> &CredentialSet {
        &self.credentials
    }

    /// Perform one logical call, rotating credentials at most once
    pub async fn call(&self, path: &str, cancel: &CancellationToken) -> RemoteResult<ApiResponse> {
        let url = format!("{}{}", self.base_url, path);

        let (response, seen) = match self.attempt(&url, cancel).await? {
            Attempt::Completed(response) => return Ok(response),
            Attempt::Exhausted {
                response,
                credential,
            } => (response, credential),
        };

        // Unauthenticated requests have nothing to rotate to
        let Some(seen) = seen else {
            return Ok(response);
        };
        if !self.credentials.rotate_from(seen) {
            log::debug!("Rate limit hit on last credential for {}", url);
            return Ok(response);
        }

        log::info!(
            "GitHub rate limit hit. Switching to token #{}",
            self.credentials.cursor() + 1
        );
        Ok(self.attempt(&url, cancel).await?.into_response())
    }

    async fn attempt(&self, url: &str, cancel: &CancellationToken) -> RemoteResult<Attempt> {
        if cancel.is_cancelled() {
            return Err(RemoteError::Cancelled {
                url: url.to_string(),
            });
        }

        let credential = self.credentials.current();
        let mut request = self.http.get(url);
        if let Some(credential) = credential {
            request = request.bearer_auth(credential.token);
        }

        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let rate_limit_remaining = response
                .headers()
                .get(RATE_LIMIT_REMAINING)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let body = response.text().await?;
            Ok::<_, reqwest::Error>(ApiResponse {
                url: url.to_string(),
                status,
                rate_limit_remaining,
                body,
            })
        };

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(RemoteError::Cancelled { url: url.to_string() });
            }
            result = exchange => result.map_err(|source| RemoteError::Transport {
                url: url.to_string(),
                source,
            })?,
        };

        log::trace!("GET {} -> {}", url, response.status);

        if response.is_rate_limited() {
            Ok(Attempt::Exhausted {
                response,
                credential: credential.map(|c| c.index),
            })
        } else {
            Ok(Attempt::Completed(response))
        }
    }

    /// Resolve the repository's default branch
    pub async fn repository_info(
        &self,
        target: &RepositoryTarget,
        cancel: &CancellationToken,
    ) -> RemoteResult<RepositoryInfo> {
        let response = self.call(&target.api_path(), cancel).await?;
        if !response.is_success() {
            if response.status == reqwest::StatusCode::FORBIDDEN {
                return Err(RemoteError::RateLimited);
            }
            return Err(RemoteError::Status {
                context: "Failed to fetch repository info".to_string(),
                status: response.status,
            });
        }
        response.json()
    }

    /// Fetch one page of branches (1-based)
    pub async fn branch_page(
        &self,
        target: &RepositoryTarget,
        page: u32,
        cancel: &CancellationToken,
    ) -> RemoteResult<Vec<BranchRef>> {
        let path = format!(
            "{}/branches?per_page={}&page={}",
            target.api_path(),
            BRANCH_PAGE_SIZE,
            page
        );
        let response = self.call(&path, cancel).await?;
        if !response.is_success() {
            if response.is_rate_limited() {
                return Err(RemoteError::RateLimited);
            }
            return Err(RemoteError::Status {
                context: "Failed to fetch branches".to_string(),
                status: response.status,
            });
        }
        response.json()
    }

    /// Compare `head` against `base`
    pub async fn compare(
        &self,
        target: &RepositoryTarget,
        base: &str,
        head: &str,
        cancel: &CancellationToken,
    ) -> RemoteResult<Comparison> {
        let path = format!(
            "{}/compare/{}...{}",
            target.api_path(),
            encode_ref(base),
            encode_ref(head)
        );
        let response = self.call(&path, cancel).await?;
        if !response.is_success() {
            return Err(RemoteError::Status {
                context: format!("Failed to compare {}...{}", base, head),
                status: response.status,
            });
        }
        response.json()
    }

    /// Look up one commit by hash
    pub async fn commit(
        &self,
        target: &RepositoryTarget,
        sha: &str,
        cancel: &CancellationToken,
    ) -> RemoteResult<CommitInfo> {
        let path = format!("{}/commits/{}", target.api_path(), encode_ref(sha));
        let response = self.call(&path, cancel).await?;
        if !response.is_success() {
            return Err(RemoteError::Status {
                context: format!("Failed to fetch commit {}", sha),
                status: response.status,
            });
        }
        response.json()
    }
}
