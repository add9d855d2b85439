//! Report rendering: a coloured table for people, a JSON envelope for tools

use chrono::{DateTime, SecondsFormat, Utc};
use prettytable::format::consts::FORMAT_CLEAN;
use prettytable::{Cell, Row, Table};
use serde::Serialize;

use crate::core::styles::StyleRole;
use crate::remote::RepositoryTarget;
use crate::scanner::{DeadBranch, ScanOutcome, ScanRequest};

const SHORT_SHA_LEN: usize = 7;

/// Which kind of credential the scan started with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenSource {
    None,
    User,
    Fallback,
}

impl TokenSource {
    pub fn of(request: &ScanRequest) -> Self {
        let user_supplied = request
            .credential
            .as_deref()
            .is_some_and(|token| !token.trim().is_empty());
        if user_supplied {
            TokenSource::User
        } else if !request.credential_set().is_empty() {
            TokenSource::Fallback
        } else {
            TokenSource::None
        }
    }
}

/// JSON envelope around a scan outcome
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport<'a> {
    #[serde(flatten)]
    pub outcome: &'a ScanOutcome,
    pub repository_url: &'a str,
    pub analyzed_at: String,
    pub token_used: TokenSource,
}

impl<'a> ScanReport<'a> {
    pub fn new(
        outcome: &'a ScanOutcome,
        repository_url: &'a str,
        analyzed_at: DateTime<Utc>,
        token_used: TokenSource,
    ) -> Self {
        Self {
            outcome,
            repository_url,
            analyzed_at: analyzed_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            token_used,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn short_sha(sha: &str) -> &str {
    sha.get(..SHORT_SHA_LEN).unwrap_or(sha)
}

fn styled_cell(text: &str, role: StyleRole, use_color: bool) -> Cell {
    let cell = Cell::new(text);
    match role.to_prettytable_spec() {
        Some(spec) if use_color => cell.style_spec(&spec),
        _ => cell,
    }
}

/// One row per dead branch, in scan order
pub fn build_table(target: &RepositoryTarget, branches: &[DeadBranch], use_color: bool) -> Table {
    let mut table = Table::new();
    table.set_format(*FORMAT_CLEAN);

    let header_spec = if use_color { "bFy" } else { "b" };
    table.set_titles(Row::new(
        ["Branch", "Last commit", "Commit", "URL"]
            .iter()
            .map(|title| Cell::new(title).style_spec(header_spec))
            .collect(),
    ));

    for branch in branches {
        table.add_row(Row::new(vec![
            styled_cell(&branch.name, StyleRole::Branch, use_color),
            styled_cell(&branch.last_commit_date, StyleRole::Date, use_color),
            styled_cell(short_sha(&branch.last_commit_sha), StyleRole::Hash, use_color),
            styled_cell(&target.commit_url(&branch.last_commit_sha), StyleRole::Link, use_color),
        ]));
    }
    table
}

/// Headline shown above the table
pub fn summary_line(target: &RepositoryTarget, count: usize) -> String {
    match count {
        0 => format!("No dead branches found in {}", target),
        1 => format!("Found 1 dead branch in {}", target),
        n => format!("Found {} dead branches in {}", n, target),
    }
}

/// Print a human readable outcome; failures go to stderr
pub fn print_outcome(target: &RepositoryTarget, outcome: &ScanOutcome, use_color: bool) {
    match outcome {
        ScanOutcome::Completed { dead_branches } => {
            let summary = summary_line(target, dead_branches.len());
            if dead_branches.is_empty() {
                println!("{}", StyleRole::Success.paint(&summary, use_color));
                return;
            }
            println!("{}", StyleRole::Header.paint(&summary, use_color));
            println!();
            let table = build_table(target, dead_branches, use_color);
            if use_color {
                table.printstd();
            } else {
                print!("{}", table);
            }
        }
        ScanOutcome::Failed(failure) => {
            eprintln!(
                "{} {}",
                StyleRole::Error.paint(&format!("[{}]", failure.error_code), use_color),
                failure.error_message
            );
        }
    }
}
