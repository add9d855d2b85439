//! CLI Integration Test Modules

pub mod failures;
pub mod report;

use std::path::Path;
use std::process::{Command, Output};

/// Run the binary with `args`, isolated from the caller's configuration
/// directory and token environment
pub async fn run_gitreaper(args: Vec<String>, config_home: &Path) -> Output {
    let config_home = config_home.to_path_buf();
    tokio::task::spawn_blocking(move || {
        Command::new(env!("CARGO_BIN_EXE_gitreaper"))
            .args(&args)
            .env("XDG_CONFIG_HOME", &config_home)
            .env("HOME", &config_home)
            .env_remove("GITHUB_TOKEN_1")
            .env_remove("GITHUB_TOKEN_2")
            .output()
            .expect("binary runs")
    })
    .await
    .expect("runner task")
}

pub fn args(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
