//! Extraction Engine
//!
//! Locates function and method definitions in raw source text using lexical
//! cues only: keywords, braces, indentation and `end` terminators. No parser
//! or compiler front end is involved, so comment and string contents are
//! scanned like any other text.
//!
//! ## Structure
//!
//! Each [`LanguageFamily`] owns a [`FunctionDetector`] made of two halves:
//!
//! - `match_signature`: recognise a definition on a single line
//! - `compute_extent`: find the last line of the definition's body
//!
//! Brace families share one detector type with per-family signature tables;
//! indentation and keyword-block families have their own detectors. A new
//! family is added by adding a variant and a detector.

mod brace;
pub mod family;
mod indent;
mod keyword;
pub mod types;

pub use family::{BlockRule, LanguageFamily};
pub use types::{FunctionKind, FunctionRecord, Signature};

/// Family-specific function boundary detection
pub trait FunctionDetector: Send + Sync {
    /// Recognise a definition starting on `lines[index]`
    ///
    /// Surrounding lines are available for context (e.g. enclosing classes)
    /// but a signature is only ever matched on the line itself.
    fn match_signature(&self, lines: &[&str], index: usize) -> Option<Signature>;

    /// Index of the last line belonging to the definition starting at `index`
    ///
    /// Must return a value in `index..lines.len()`.
    fn compute_extent(&self, lines: &[&str], index: usize) -> usize;
}

/// Extract function records from `text`, ordered by start line
pub fn extract(text: &str, family: LanguageFamily) -> Vec<FunctionRecord> {
    let lines: Vec<&str> = text.lines().collect();
    extract_lines(&lines, family)
}

/// Extract from pre-split lines (used when the caller also needs the lines for bodies)
pub fn extract_lines(lines: &[&str], family: LanguageFamily) -> Vec<FunctionRecord> {
    let detector = family.detector();
    let mut records = Vec::new();

    for index in 0..lines.len() {
        if let Some(signature) = detector.match_signature(lines, index) {
            let end = detector
                .compute_extent(lines, index)
                .clamp(index, lines.len() - 1);
            records.push(FunctionRecord::new(
                signature.kind,
                signature.name,
                index + 1,
                end + 1,
            ));
        }
    }

    records
}

/// Width of a line's leading whitespace, with tabs advancing to the next multiple of 8
pub(crate) fn indent_width(line: &str) -> usize {
    let mut width = 0;
    for ch in line.chars() {
        match ch {
            ' ' => width += 1,
            '\t' => width = (width / 8 + 1) * 8,
            '\u{000C}' => width = 0,
            _ => break,
        }
    }
    width
}

#[cfg(test)]
mod tests;
