//! Generic error handling utilities
//!
//! Every module error (`DiscoveryError`, `ScanError`, `ConfigError`, ...) implements
//! `ContextualError`, so fatal errors are reported the same way regardless of
//! where they came from.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` should return
/// `Some(message)` with a message that tells the user what to change (a bad
/// option, an invalid query, a missing token). System errors (network, IO)
/// return `None`.
pub trait ContextualError: std::error::Error {
    fn is_user_actionable(&self) -> bool;

    fn user_message(&self) -> Option<&str>;
}

/// Log a fatal error once, with detail at debug level
///
/// User-actionable errors log their own message. System errors log the
/// operation context followed by the error text.
///
/// ```rust,no_run
/// # use repofuncs::core::error_handling::log_error_with_context;
/// # use repofuncs::discovery::DiscoveryError;
/// let err = DiscoveryError::NoResults { query: "stars:>1".to_string() };
/// log_error_with_context(&err, "Repository discovery");
/// // Logs: "FATAL: No repositories returned. Check query and API token/rate limits."
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    log::error!("{}", fatal_line(error, operation_context));
    log::debug!("DETAIL: {}", error);
    log::debug!("DEBUG_DETAILS: {:?}", error);
}

fn fatal_line<E: ContextualError + std::fmt::Display>(
    error: &E,
    operation_context: &str,
) -> String {
    match error.user_message().filter(|_| error.is_user_actionable()) {
        Some(message) => format!("FATAL: {}", message),
        None => format!("FATAL: {}: {}", operation_context, error),
    }
}
