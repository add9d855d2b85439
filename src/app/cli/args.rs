//! Command line arguments
//!
//! Values left unset on the command line may be filled from the TOML
//! configuration file (see `config.rs`); command line values always win.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::core::validation::validate_seconds;
use crate::scanner::ScanRequest;

pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "gitreaper")]
#[command(about = "Find branches that are fully merged into main but were never deleted")]
#[command(version)]
pub struct Args {
    /// GitHub repository URL (https://github.com/owner/repo)
    #[arg(value_name = "URL")]
    pub repository: Option<String>,

    /// GitHub repository URL (alternative to the positional argument)
    #[arg(short = 'r', long = "repo", value_name = "URL", conflicts_with = "repository")]
    pub repo: Option<String>,

    /// GitHub access token, tried before any fallback tokens
    #[arg(short = 't', long = "token", value_name = "TOKEN")]
    pub token: Option<String>,

    /// Scan time budget in seconds [default: 180]
    #[arg(short = 'T', long = "timeout", value_name = "SECONDS", value_parser = validate_seconds)]
    pub timeout: Option<u64>,

    /// Keep the time budget fixed instead of extending it for large repositories
    #[arg(long = "no-adaptive-timeout")]
    pub no_adaptive_timeout: bool,

    /// GitHub API base URL
    #[arg(long = "api-url", value_name = "URL")]
    pub api_url: Option<String>,

    /// Per-request timeout in seconds [default: 30]
    #[arg(long = "request-timeout", value_name = "SECONDS", value_parser = validate_seconds)]
    pub request_timeout: Option<u64>,

    /// Print the report as JSON
    #[arg(short = 'j', long = "json")]
    pub json: bool,

    /// Configuration file path
    #[arg(short = 'c', long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Force coloured output
    #[arg(short = 'g', long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Disable coloured output
    #[arg(short = 'n', long = "no-color")]
    pub no_color: bool,

    /// Log level
    #[arg(short = 'l', long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log file path (use 'none' to disable file logging)
    #[arg(short = 'f', long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log output format
    #[arg(short = 'o', long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Extra tokens from the configuration file
    #[arg(skip)]
    pub config_tokens: Vec<String>,

    /// Colour preference from the configuration file
    #[arg(skip)]
    pub config_color: Option<bool>,
}

impl Args {
    /// Repository URL from either the positional argument or `--repo`
    pub fn repository_url(&self) -> Option<&str> {
        self.repo.as_deref().or(self.repository.as_deref())
    }

    /// Log file, with the magic values `none` and `-` meaning stderr
    pub fn log_file(&self) -> Option<&std::path::Path> {
        self.log_file.as_deref().filter(|path| {
            let text = path.to_string_lossy();
            !(text.eq_ignore_ascii_case("none") || text == "-")
        })
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    /// Flags win over the configuration file; otherwise colour follows
    /// whether `is_terminal` is true.
    pub fn use_color(&self, is_terminal: bool) -> bool {
        if self.no_color {
            false
        } else if self.color {
            true
        } else {
            self.config_color.unwrap_or(is_terminal)
        }
    }

    /// Build the scan request for `repository_url`.
    ///
    /// Credential order: `--token` (or the file's `token`), the file's
    /// `tokens`, then `env_tokens`.
    pub fn scan_request(&self, repository_url: &str, env_tokens: Vec<String>) -> ScanRequest {
        let mut request = ScanRequest::new(repository_url);
        if let Some(secs) = self.timeout {
            request.timeout = Duration::from_secs(secs);
        }
        request.adaptive_timeout = !self.no_adaptive_timeout;
        request.credential = self.token.clone();
        request.fallback_credentials = self
            .config_tokens
            .iter()
            .cloned()
            .chain(env_tokens)
            .collect();
        if let Some(api_url) = &self.api_url {
            request.client.api_base_url = api_url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = self.request_timeout {
            request.client.request_timeout = Duration::from_secs(secs);
        }
        request
    }
}
