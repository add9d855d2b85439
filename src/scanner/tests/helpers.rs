//! Test helper functions for scanner unit tests
//!
//! Wraps a wiremock server that speaks just enough of the hosting API for a
//! scan: repository metadata, branch pages, comparisons and commit lookups.

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::remote::{ClientConfig, CredentialSet, RemoteClient};
use crate::scanner::deadline::DeadlinePolicy;
use crate::scanner::orchestrator::ScanOrchestrator;
use crate::scanner::progress::ProgressObserver;

pub const OWNER: &str = "octo";
pub const REPO: &str = "graveyard";

pub fn repository_url() -> String {
    format!("https://github.com/{}/{}", OWNER, REPO)
}

fn api(suffix: &str) -> String {
    format!("/repos/{}/{}{}", OWNER, REPO, suffix)
}

/// Path form of a ref as it arrives at the server
fn encoded(name: &str) -> String {
    urlencoding::encode(name).replace("%2F", "/")
}

/// Mock hosting API for one repository
pub struct MockRepo {
    pub server: MockServer,
}

impl MockRepo {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn client(&self, credentials: CredentialSet) -> RemoteClient {
        let config = ClientConfig {
            api_base_url: self.server.uri(),
            ..ClientConfig::default()
        };
        RemoteClient::new(config, credentials).unwrap()
    }

    pub fn orchestrator(
        &self,
        observer: Arc<dyn ProgressObserver>,
        policy: DeadlinePolicy,
    ) -> ScanOrchestrator {
        ScanOrchestrator::new(self.client(CredentialSet::anonymous()), observer, policy)
    }

    pub async fn default_branch(&self, name: &str) {
        Mock::given(method("GET"))
            .and(path(api("")))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "default_branch": name })),
            )
            .mount(&self.server)
            .await;
    }

    /// Serve `names` as page `page`; each branch's sha is `sha-<name>`
    pub async fn branch_page(&self, page: u32, names: &[String]) {
        let body: Vec<_> = names
            .iter()
            .map(|name| {
                serde_json::json!({
                    "name": name,
                    "commit": { "sha": sha_of(name), "url": "https://example.invalid" }
                })
            })
            .collect();
        Mock::given(method("GET"))
            .and(path(api("/branches")))
            .and(query_param("page", page.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn branches(&self, names: &[&str]) {
        let names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        self.branch_page(1, &names).await;
    }

    pub async fn comparison(&self, main: &str, branch: &str, ahead_by: u64) {
        self.comparison_with_delay(main, branch, ahead_by, Duration::ZERO)
            .await;
    }

    pub async fn comparison_with_delay(
        &self,
        main: &str,
        branch: &str,
        ahead_by: u64,
        delay: Duration,
    ) {
        let status = if ahead_by == 0 { "behind" } else { "diverged" };
        Mock::given(method("GET"))
            .and(path(api(&format!(
                "/compare/{}...{}",
                encoded(main),
                encoded(branch)
            ))))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({
                        "status": status,
                        "ahead_by": ahead_by,
                        "behind_by": 1
                    }))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn commit(&self, branch: &str, date: &str) {
        let sha = sha_of(branch);
        Mock::given(method("GET"))
            .and(path(api(&format!("/commits/{}", encoded(&sha)))))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "sha": sha,
                "commit": { "author": { "name": "ghost", "date": date } }
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn failing_commit(&self, branch: &str, status: u16) {
        Mock::given(method("GET"))
            .and(path(api(&format!("/commits/{}", encoded(&sha_of(branch))))))
            .respond_with(ResponseTemplate::new(status))
            .mount(&self.server)
            .await;
    }

    /// A merged branch with a resolvable last commit
    pub async fn merged(&self, main: &str, branch: &str, date: &str) {
        self.comparison(main, branch, 0).await;
        self.commit(branch, date).await;
    }
}

pub fn sha_of(branch: &str) -> String {
    format!("sha-{}", branch.replace('/', "-"))
}

pub fn quick_policy(base: Duration) -> DeadlinePolicy {
    DeadlinePolicy {
        base,
        adaptive: false,
        ..DeadlinePolicy::default()
    }
}
