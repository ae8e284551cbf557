//! Validation utilities for CLI arguments
//!
//! Each validator has the `fn(&str) -> Result<T, String>` shape so it can be
//! used directly as a clap `value_parser` and again when checking values that
//! come from the config file.

use crate::pipeline::{parse_batch_label, parse_batch_targets};

/// Validate positive integer value
pub fn validate_positive_int(value: &str) -> Result<usize, String> {
    match value.trim().parse::<usize>() {
        Ok(0) => Err("Value must be greater than 0".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{}' is not a valid positive integer", value)),
    }
}

/// Validate a search query (non-blank)
pub fn validate_query(value: &str) -> Result<String, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("Search query cannot be empty".to_string());
    }
    Ok(trimmed.to_string())
}

/// Validate a comma-separated checkpoint list such as `10,20,25`
///
/// Only the syntax is checked here; clamping to the requested count happens
/// when the batch plan is built.
pub fn validate_batch_targets(value: &str) -> Result<String, String> {
    parse_batch_targets(value, usize::MAX)?;
    Ok(value.trim().to_string())
}

/// Validate an `i/n` batch label
pub fn validate_batch_label(value: &str) -> Result<String, String> {
    match parse_batch_label(value) {
        Some(_) => Ok(value.trim().to_string()),
        None => Err(format!(
            "Invalid batch label '{}': expected <index>/<count> with 1 <= index <= count",
            value
        )),
    }
}

/// Validate a 1-based inclusive rank range
pub fn validate_subset_range(start: usize, end: usize) -> Result<(), String> {
    if start == 0 {
        return Err("--subset-start must be at least 1".to_string());
    }
    if end < start {
        return Err(format!(
            "--subset-end ({}) is before --subset-start ({})",
            end, start
        ));
    }
    Ok(())
}
