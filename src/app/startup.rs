//! Application startup: arguments, configuration, logging, then one scan

use std::sync::Arc;

use chrono::Utc;
use clap::{CommandFactory, FromArgMatches};

use super::cli::Args;
use super::display::{print_outcome, ScanReport, TokenSource};
use super::spinner::{should_show_spinner, ProgressSpinner};
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::init_logging;
use crate::core::styles::palette_to_clap;
use crate::core::validation::{validate_repository_url, ValidationError, EMPTY_URL_MESSAGE};
use crate::core::version;
use crate::remote::{fallback_tokens_from_env, RepositoryTarget};
use crate::scanner::progress::{LogProgress, ProgressObserver};
use crate::scanner::{analyze_repository, ErrorCode, ScanOutcome};

pub const EXIT_SUCCESS: i32 = 0;
/// Bad arguments, configuration or analysis failure
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_TIMEOUT: i32 = 3;

/// Exit status for a finished scan
pub fn exit_code(outcome: &ScanOutcome) -> i32 {
    match outcome.error_code() {
        None => EXIT_SUCCESS,
        Some(ErrorCode::Timeout) => EXIT_TIMEOUT,
        Some(ErrorCode::AnalysisFailed) => EXIT_FAILURE,
    }
}

fn parse_args() -> Args {
    let stdout_is_terminal = std::io::IsTerminal::is_terminal(&std::io::stdout());
    let matches = Args::command()
        .styles(palette_to_clap(stdout_is_terminal))
        .get_matches();
    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

/// Run the command line application and return its exit status
pub async fn startup() -> i32 {
    let mut args = parse_args();

    // Logging is not up yet; configuration problems go straight to stderr
    if let Err(e) = args.merge_config_file().await {
        eprintln!("Error: {}", e);
        return EXIT_FAILURE;
    }

    let use_color = args.use_color(std::io::IsTerminal::is_terminal(&std::io::stdout()));
    colored::control::set_override(use_color);

    if let Err(e) = init_logging(
        Some(args.log_level()),
        args.log_format.as_deref(),
        args.log_file(),
        use_color,
    ) {
        eprintln!("Error initialising logging: {}", e);
        return EXIT_FAILURE;
    }
    log::info!("GitReaper {} starting", version::describe());

    let repository_url = match args
        .repository_url()
        .ok_or_else(|| ValidationError::new(EMPTY_URL_MESSAGE))
        .and_then(validate_repository_url)
    {
        Ok(url) => url,
        Err(e) => {
            log_error_with_context(&e, "Argument validation");
            return EXIT_FAILURE;
        }
    };

    let target = match RepositoryTarget::parse(&repository_url) {
        Ok(target) => target,
        Err(e) => {
            log::error!("FATAL: {}", e);
            return EXIT_FAILURE;
        }
    };

    let request = args.scan_request(&repository_url, fallback_tokens_from_env());
    let token_used = TokenSource::of(&request);
    log::info!(
        "Scanning {} with {} credential(s), token: {:?}",
        target,
        request.credential_set().len(),
        token_used
    );

    let spinner = should_show_spinner().then(|| Arc::new(ProgressSpinner::new()));
    let observer: Arc<dyn ProgressObserver> = match &spinner {
        Some(spinner) => spinner.clone(),
        None => Arc::new(LogProgress),
    };

    let outcome = analyze_repository(request, Some(observer)).await;
    if let Some(spinner) = &spinner {
        spinner.finish();
    }

    if args.json {
        let report = ScanReport::new(&outcome, &repository_url, Utc::now(), token_used);
        match report.to_json() {
            Ok(json) => println!("{}", json),
            Err(e) => {
                log::error!("FATAL: Could not serialise report: {}", e);
                return EXIT_FAILURE;
            }
        }
    } else {
        print_outcome(&target, &outcome, use_color);
    }

    exit_code(&outcome)
}
