//! Common test utilities and helpers
//!
//! A wiremock server standing in for the GitHub REST API, seeded with one
//! repository. Used by both the library and the binary integration tests.

#![allow(dead_code)]

use std::time::Duration;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const OWNER: &str = "acme";
pub const REPO: &str = "widgets";

pub fn repository_url() -> String {
    format!("https://github.com/{}/{}", OWNER, REPO)
}

fn api(suffix: &str) -> String {
    format!("/repos/{}/{}{}", OWNER, REPO, suffix)
}

pub fn sha_of(branch: &str) -> String {
    format!("{}-tip", branch.replace('/', "-"))
}

/// Branch fixture: name plus whether it is merged into main
pub struct Fixture {
    pub name: &'static str,
    pub merged: bool,
    pub date: &'static str,
}

pub const fn merged(name: &'static str, date: &'static str) -> Fixture {
    Fixture {
        name,
        merged: true,
        date,
    }
}

pub const fn active(name: &'static str) -> Fixture {
    Fixture {
        name,
        merged: false,
        date: "2024-01-01T00:00:00Z",
    }
}

pub struct GitHubMock {
    pub server: MockServer,
}

impl GitHubMock {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Serve `main` plus `branches` with matching comparisons and commits
    pub async fn repository(&self, branches: &[Fixture]) {
        self.repository_with_delay(branches, Duration::ZERO).await;
    }

    /// As `repository`, with every comparison delayed by `delay`
    pub async fn repository_with_delay(&self, branches: &[Fixture], delay: Duration) {
        Mock::given(method("GET"))
            .and(path(api("")))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"default_branch": "main"})),
            )
            .mount(&self.server)
            .await;

        let mut listing = vec![serde_json::json!({"name": "main", "commit": {"sha": sha_of("main")}})];
        listing.extend(
            branches
                .iter()
                .map(|b| serde_json::json!({"name": b.name, "commit": {"sha": sha_of(b.name)}})),
        );
        Mock::given(method("GET"))
            .and(path(api("/branches")))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(listing))
            .mount(&self.server)
            .await;

        for branch in branches {
            let ahead_by = if branch.merged { 0 } else { 4 };
            Mock::given(method("GET"))
                .and(path(api(&format!("/compare/main...{}", branch.name))))
                .respond_with(
                    ResponseTemplate::new(200)
                        .set_body_json(serde_json::json!({"ahead_by": ahead_by, "behind_by": 2}))
                        .set_delay(delay),
                )
                .mount(&self.server)
                .await;

            Mock::given(method("GET"))
                .and(path(api(&format!("/commits/{}", sha_of(branch.name)))))
                .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                    "sha": sha_of(branch.name),
                    "commit": {"author": {"date": branch.date}}
                })))
                .mount(&self.server)
                .await;
        }
    }
}
