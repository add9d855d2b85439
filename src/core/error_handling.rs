//! Error reporting helpers shared by the CLI and the scanner

/// Errors that know whether their message is meant for the user.
///
/// When `is_user_actionable()` is true, `user_message()` must return
/// `Some`; otherwise it returns `None` and callers fall back to a generic
/// description of the failed operation.
pub trait ContextualError: std::error::Error {
    /// True when the message tells the user what to change (bad URL, missing
    /// token, rate limit) rather than describing an internal failure.
    fn is_user_actionable(&self) -> bool;

    fn user_message(&self) -> Option<&str>;
}

/// Log a fatal error, preferring the user message when there is one.
///
/// ```rust,no_run
/// # use gitreaper::core::error_handling::log_error_with_context;
/// # use gitreaper::scanner::ScanError;
/// log_error_with_context(&ScanError::Timeout, "Repository analysis");
/// // Logs: "FATAL: Repository analysis timed out. ..."
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    log::error!("FATAL: {}", display_message(error, operation_context));
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

/// Message to show the user for `error`
pub fn display_message<E: ContextualError>(error: &E, operation_context: &str) -> String {
    match error.user_message() {
        Some(message) if error.is_user_actionable() => message.to_string(),
        _ => format!("{}: {}", operation_context, error),
    }
}
