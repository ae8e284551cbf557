//! Extraction engine tests, organized by block rule

mod indentation;

use crate::extract::{FunctionKind, FunctionRecord};

/// Flatten records into comparable tuples
pub(super) fn summarize(records: &[FunctionRecord]) -> Vec<(FunctionKind, String, usize, usize)> {
    records
        .iter()
        .map(|r| (r.kind(), r.name().to_string(), r.start_line(), r.end_line()))
        .collect()
}

pub(super) fn row(
    kind: FunctionKind,
    name: &str,
    start: usize,
    end: usize,
) -> (FunctionKind, String, usize, usize) {
    (kind, name.to_string(), start, end)
}
