//! Brace-delimited families (JavaScript/TypeScript, Go, C-like)
//!
//! Every line is tested against the family's signature rules; the first rule
//! that yields an acceptable name wins. The extent starts at the first `{` at
//! or after the signature line and ends where brace depth returns to zero.
//! A definition that never opens a body (an expression arrow, a Go stub, a
//! declaration followed by the next definition) ends before anything else
//! starts.

use super::types::{FunctionKind, Signature};
use super::FunctionDetector;
use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Words that can sit in the name position of a rule but never name a function
const RESERVED_NAMES: &[&str] = &[
    "if",
    "else",
    "for",
    "foreach",
    "while",
    "do",
    "switch",
    "case",
    "catch",
    "return",
    "new",
    "delete",
    "throw",
    "sizeof",
    "typeof",
    "function",
    "synchronized",
    "using",
    "lock",
    "fixed",
    "await",
    "yield",
];

/// Leading words that turn a C-like line into a statement rather than a declaration
const STATEMENT_WORDS: &[&str] = &[
    "return", "new", "else", "throw", "case", "goto", "delete", "await", "yield", "typeof",
    "sizeof",
];

/// Declaration modifiers that do not name a return type
const MODIFIERS: &[&str] = &[
    "public",
    "private",
    "protected",
    "internal",
    "static",
    "final",
    "abstract",
    "synchronized",
    "native",
    "virtual",
    "explicit",
    "inline",
    "constexpr",
    "extern",
    "unsafe",
    "override",
    "sealed",
    "async",
    "partial",
    "strictfp",
];

pub(crate) static JAVASCRIPT_DETECTOR: LazyLock<BraceDetector> = LazyLock::new(|| {
    BraceDetector::new(vec![
        SignatureRule::new(
            r"^\s*(?:export\s+)?(?:default\s+)?(?P<async>async\s+)?function\b\s*\*?\s*(?P<name>[A-Za-z_$][\w$]*)\s*(?:<[^>]*>)?\s*\(",
            resolve_async_or_function,
        ),
        SignatureRule::new(
            r"^\s*(?:export\s+)?(?:const|let|var)\s+(?P<name>[A-Za-z_$][\w$]*)\s*(?::[^=]+)?=\s*(?P<async>async\s+)?(?:function\b|\([^)]*\)\s*(?::[^=]+)?=>|\(\s*$|[A-Za-z_$][\w$]*\s*=>)",
            resolve_async_or_function,
        ),
        SignatureRule::new(
            r"^\s*(?P<name>[A-Za-z_$][\w$]*)\s*=\s*(?P<async>async\s+)?\([^)]*\)\s*=>",
            resolve_async_or_function,
        ),
        SignatureRule::new(
            r"^\s*(?:(?:public|private|protected|static|readonly|override|abstract|get|set)\s+)*(?:async\s+)?\*?\s*(?P<name>[A-Za-z_$][\w$]*)\s*(?:<[^>]*>)?\s*\([^)]*\)\s*(?::\s*[^{;]+)?\{",
            resolve_js_method,
        ),
    ])
});

pub(crate) static GO_DETECTOR: LazyLock<BraceDetector> = LazyLock::new(|| {
    BraceDetector::new(vec![SignatureRule::new(
        r"^\s*func\s+(?P<recv>\([^)]*\)\s*)?(?P<name>[A-Za-z_][A-Za-z0-9_]*)\s*(?:\[[^\]]*\])?\s*\(",
        resolve_go,
    )])
});

pub(crate) static C_LIKE_DETECTOR: LazyLock<BraceDetector> = LazyLock::new(|| {
    BraceDetector::new(vec![SignatureRule::new(
        r"^\s*(?:@[\w.]+(?:\([^)]*\))?\s+)*(?P<prefix>(?:[A-Za-z_<][\w<>,\[\]\.:?]*[*&]*\s+)+)[*&]*(?P<name>~?[A-Za-z_]\w*(?:::~?[A-Za-z_]\w*)*)\s*\([^)]*\)\s*(?:const\b\s*)?(?:noexcept\b\s*)?(?:override\b\s*)?(?:throws\s+[^{]+)?(?:\{.*)?$",
        resolve_c_like,
    )])
});

/// A signature regex plus the function turning its captures into a name and kind
struct SignatureRule {
    pattern: Regex,
    resolve: fn(&Captures<'_>) -> Option<Signature>,
}

impl SignatureRule {
    fn new(pattern: &str, resolve: fn(&Captures<'_>) -> Option<Signature>) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("signature pattern must compile"),
            resolve,
        }
    }

    fn apply(&self, line: &str) -> Option<Signature> {
        let captures = self.pattern.captures(line)?;
        (self.resolve)(&captures)
    }
}

/// Detector shared by all brace-delimited families
pub(crate) struct BraceDetector {
    rules: Vec<SignatureRule>,
}

impl BraceDetector {
    fn new(rules: Vec<SignatureRule>) -> Self {
        Self { rules }
    }
}

impl FunctionDetector for BraceDetector {
    fn match_signature(&self, lines: &[&str], index: usize) -> Option<Signature> {
        let line = lines.get(index)?;
        self.rules
            .iter()
            .filter_map(|rule| rule.apply(line))
            .find(|signature| !is_reserved(&signature.name))
    }

    fn compute_extent(&self, lines: &[&str], index: usize) -> usize {
        let mut depth = 0usize;
        let mut opened = false;

        for (offset, line) in lines.iter().enumerate().skip(index) {
            // A new definition before any body means this one had none
            if !opened && offset > index && self.match_signature(lines, offset).is_some() {
                return last_content_line(lines, index, offset);
            }

            for ch in line.chars() {
                match ch {
                    '{' => {
                        depth += 1;
                        opened = true;
                    }
                    '}' if opened => {
                        depth -= 1;
                        if depth == 0 {
                            return offset;
                        }
                    }
                    // The enclosing block closed first
                    '}' => return index,
                    _ => {}
                }
            }

            if !opened && offset == index && ends_without_body(line) {
                return index;
            }
        }

        // No body opened, or never closed: run to the end of the file
        lines.len().saturating_sub(1).max(index)
    }
}

/// Expression-bodied arrows and terminated declarations end on their own line
fn ends_without_body(line: &str) -> bool {
    if line.trim_end().ends_with(';') {
        return true;
    }
    match line.rfind("=>") {
        Some(pos) => !line[pos + 2..].trim().is_empty(),
        None => false,
    }
}

/// Last non-blank line in `start..end`, or `start`
fn last_content_line(lines: &[&str], start: usize, end: usize) -> usize {
    (start..end)
        .rev()
        .find(|&i| !lines[i].trim().is_empty())
        .unwrap_or(start)
}

fn is_reserved(name: &str) -> bool {
    let last = name.rsplit("::").next().unwrap_or(name);
    RESERVED_NAMES.contains(&last)
}

fn captured_name(captures: &Captures<'_>) -> Option<String> {
    captures.name("name").map(|m| m.as_str().to_string())
}

fn resolve_async_or_function(captures: &Captures<'_>) -> Option<Signature> {
    let kind = if captures.name("async").is_some() {
        FunctionKind::AsyncFunction
    } else {
        FunctionKind::Function
    };
    Some(Signature::new(captured_name(captures)?, kind))
}

fn resolve_js_method(captures: &Captures<'_>) -> Option<Signature> {
    let name = captured_name(captures)?;
    let kind = if name == "constructor" {
        FunctionKind::Constructor
    } else {
        FunctionKind::Method
    };
    Some(Signature::new(name, kind))
}

fn resolve_go(captures: &Captures<'_>) -> Option<Signature> {
    let kind = if captures.name("recv").is_some() {
        FunctionKind::Method
    } else {
        FunctionKind::Function
    };
    Some(Signature::new(captured_name(captures)?, kind))
}

fn resolve_c_like(captures: &Captures<'_>) -> Option<Signature> {
    let name = captured_name(captures)?;
    let prefix: Vec<&str> = captures
        .name("prefix")
        .map(|m| m.as_str().split_whitespace().collect())
        .unwrap_or_default();

    if prefix.iter().any(|token| STATEMENT_WORDS.contains(token)) {
        return None;
    }

    let segments: Vec<&str> = name.split("::").collect();
    let kind = if segments.len() >= 2 {
        let owner = segments[segments.len() - 2];
        let member = segments[segments.len() - 1];
        if member == owner {
            FunctionKind::Constructor
        } else {
            FunctionKind::Method
        }
    } else if prefix.iter().all(|token| MODIFIERS.contains(token)) {
        FunctionKind::Constructor
    } else {
        FunctionKind::Function
    };

    Some(Signature::new(name, kind))
}
