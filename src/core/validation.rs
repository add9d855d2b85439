//! Validation utilities for CLI arguments

use std::sync::OnceLock;

use regex::Regex;

pub const EMPTY_URL_MESSAGE: &str = "URL cannot be empty";
pub const URL_FORMAT_MESSAGE: &str =
    "Invalid GitHub repository URL format. Expected: https://github.com/owner/repo";

/// Argument or configuration value rejected before a scan starts
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl crate::core::error_handling::ContextualError for ValidationError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<&str> {
        Some(&self.message)
    }
}

fn repository_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^https?://github\.com/([a-zA-Z0-9_-]+)/([a-zA-Z0-9_.-]+)/?$")
            .expect("static pattern compiles")
    })
}

/// Strict check of a repository URL typed by the user.
///
/// Returns the trimmed URL. The scanner's own target parsing is looser;
/// this rejects query strings, extra path segments and foreign hosts up
/// front so the user gets a precise message.
pub fn validate_repository_url(url: &str) -> Result<String, ValidationError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ValidationError::new(EMPTY_URL_MESSAGE));
    }
    if !repository_url_pattern().is_match(url) {
        return Err(ValidationError::new(URL_FORMAT_MESSAGE));
    }
    Ok(url.to_string())
}

/// Validate a whole number of seconds greater than zero
pub fn validate_seconds(value: &str) -> Result<u64, String> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err("Value must be greater than 0".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{}' is not a valid number of seconds", value)),
    }
}
