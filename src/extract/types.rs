//! Extraction Types
//!
//! Function records produced by the extraction engine.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of definition recognised by a signature rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FunctionKind {
    Function,
    AsyncFunction,
    Method,
    Constructor,
}

impl FunctionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::AsyncFunction => "async_function",
            Self::Method => "method",
            Self::Constructor => "constructor",
        }
    }
}

impl fmt::Display for FunctionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single function definition located in a file
///
/// Lines are 1-based and inclusive. Records are immutable once produced;
/// `end_line` is never smaller than `start_line`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionRecord {
    kind: FunctionKind,
    name: String,
    start_line: usize,
    end_line: usize,
}

impl FunctionRecord {
    pub fn new(
        kind: FunctionKind,
        name: impl Into<String>,
        start_line: usize,
        end_line: usize,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            start_line,
            end_line: end_line.max(start_line),
        }
    }

    pub fn kind(&self) -> FunctionKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start_line(&self) -> usize {
        self.start_line
    }

    pub fn end_line(&self) -> usize {
        self.end_line
    }

    /// Number of lines spanned by the definition
    pub fn line_count(&self) -> usize {
        self.end_line - self.start_line + 1
    }

    /// True when `other` lies entirely within this record's line range
    pub fn contains(&self, other: &FunctionRecord) -> bool {
        self.start_line <= other.start_line && other.end_line <= self.end_line
    }

    /// Raw source text of the definition taken from the original file lines
    pub fn body(&self, lines: &[&str]) -> Option<String> {
        let start = self.start_line.checked_sub(1)?;
        if start >= lines.len() {
            return None;
        }
        let end = self.end_line.min(lines.len());
        let body = lines[start..end].join("\n");
        if body.is_empty() {
            None
        } else {
            Some(body)
        }
    }
}

/// Name and kind recognised on a signature line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub kind: FunctionKind,
}

impl Signature {
    pub fn new(name: impl Into<String>, kind: FunctionKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}
