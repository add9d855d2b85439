//! Report output of completed scans

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

use super::{args, run_gitreaper};
use crate::common::{active, merged, repository_url, GitHubMock, OWNER, REPO};

#[tokio::test(flavor = "multi_thread")]
async fn test_json_report_for_completed_scan() {
    let mock = GitHubMock::start().await;
    mock.repository(&[merged("old-feature", "2024-03-25T14:45:30+01:00"), active("wip")])
        .await;
    let home = tempfile::tempdir().unwrap();

    let output = run_gitreaper(
        args(&[&repository_url(), "--json", "--api-url", &mock.uri()]),
        home.path(),
    )
    .await;

    assert_eq!(output.status.code(), Some(0), "{:?}", output);
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        report["deadBranches"],
        serde_json::json!([
            {"name": "old-feature", "lastCommitDate": "2024-03-25", "lastCommitSha": "old-feature-tip"}
        ])
    );
    assert_eq!(report["repositoryUrl"], repository_url());
    assert_eq!(report["tokenUsed"], "none");
    assert!(report["analyzedAt"].as_str().unwrap().ends_with('Z'));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_token_flag_is_sent_and_reported() {
    let mock = GitHubMock::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/repos/{}/{}", OWNER, REPO)))
        .and(header("authorization", "Bearer secret"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"default_branch": "main"})),
        )
        .expect(1)
        .mount(&mock.server)
        .await;
    mock.repository(&[]).await;
    let home = tempfile::tempdir().unwrap();

    let output = run_gitreaper(
        args(&[
            "--repo",
            &repository_url(),
            "--token",
            "secret",
            "--json",
            "--api-url",
            &mock.uri(),
        ]),
        home.path(),
    )
    .await;

    assert_eq!(output.status.code(), Some(0), "{:?}", output);
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["tokenUsed"], "user");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_table_report_lists_commit_urls() {
    let mock = GitHubMock::start().await;
    mock.repository(&[merged("stale", "2021-01-02T03:04:05Z")]).await;
    let home = tempfile::tempdir().unwrap();

    let output = run_gitreaper(
        args(&[&repository_url(), "--no-color", "--api-url", &mock.uri()]),
        home.path(),
    )
    .await;

    assert_eq!(output.status.code(), Some(0), "{:?}", output);
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Found 1 dead branch in acme/widgets"), "{}", stdout);
    assert!(stdout.contains("stale"));
    assert!(stdout.contains("2021-01-02"));
    assert!(stdout.contains("https://github.com/acme/widgets/commit/stale-tip"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_config_file_supplies_repository_and_api() {
    let mock = GitHubMock::start().await;
    mock.repository(&[]).await;
    let home = tempfile::tempdir().unwrap();
    let config = home.path().join("gitreaper.toml");
    std::fs::write(
        &config,
        format!(
            "repository = \"{}\"\napi-url = \"{}\"\njson = true\n",
            repository_url(),
            mock.uri()
        ),
    )
    .unwrap();

    let output = run_gitreaper(
        args(&["--config-file", config.to_str().unwrap()]),
        home.path(),
    )
    .await;

    assert_eq!(output.status.code(), Some(0), "{:?}", output);
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["deadBranches"], serde_json::json!([]));
}
