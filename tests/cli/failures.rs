//! Exit codes and messages for failed runs

use std::time::Duration;

use wiremock::matchers::method;
use wiremock::{Mock, ResponseTemplate};

use super::{args, run_gitreaper};
use crate::common::{merged, repository_url, GitHubMock};

#[tokio::test(flavor = "multi_thread")]
async fn test_malformed_url_is_rejected_before_scanning() {
    let mock = GitHubMock::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock.server)
        .await;
    let home = tempfile::tempdir().unwrap();

    let output = run_gitreaper(
        args(&["https://github.com/acme", "--api-url", &mock.uri()]),
        home.path(),
    )
    .await;

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid GitHub repository URL format"),
        "{}",
        stderr
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_url_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    let output = run_gitreaper(Vec::new(), home.path()).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("URL cannot be empty"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_config_file_is_fatal() {
    let home = tempfile::tempdir().unwrap();
    let missing = home.path().join("nope.toml");

    let output = run_gitreaper(
        args(&[&repository_url(), "--config-file", missing.to_str().unwrap()]),
        home.path(),
    )
    .await;

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_missing_repository_exits_with_failure() {
    let mock = GitHubMock::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock.server)
        .await;
    let home = tempfile::tempdir().unwrap();

    let output = run_gitreaper(
        args(&[&repository_url(), "--json", "--api-url", &mock.uri()]),
        home.path(),
    )
    .await;

    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["errorCode"], "ANALYSIS_FAILED");
    assert_eq!(
        report["errorMessage"],
        "Failed to fetch repository info: Not Found"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_timeout_has_its_own_exit_code() {
    let mock = GitHubMock::start().await;
    mock.repository_with_delay(&[merged("slow", "2024-01-01T00:00:00Z")], Duration::from_secs(10))
        .await;
    let home = tempfile::tempdir().unwrap();

    let output = run_gitreaper(
        args(&[
            &repository_url(),
            "--json",
            "--timeout",
            "1",
            "--no-adaptive-timeout",
            "--api-url",
            &mock.uri(),
        ]),
        home.path(),
    )
    .await;

    assert_eq!(output.status.code(), Some(3));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["errorCode"], "TIMEOUT");
}
