//! Indentation-delimited family (Python)

use super::types::{FunctionKind, Signature};
use super::{indent_width, FunctionDetector};
use regex::Regex;
use std::sync::LazyLock;

static DEF_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<async>async\s+)?def\s+(?P<name>[A-Za-z_]\w*)\s*\(")
        .expect("def pattern must compile")
});

static CLASS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*class\s+(?P<name>[A-Za-z_]\w*)").expect("class pattern must compile")
});

static ENCLOSING_DEF_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:async\s+)?def\s").expect("def pattern must compile"));

pub(crate) static PYTHON_DETECTOR: LazyLock<IndentDetector> = LazyLock::new(|| IndentDetector);

/// Detector for `def` blocks whose body is delimited by indentation
pub(crate) struct IndentDetector;

/// Blank or comment-only lines never open or close a block
fn is_insignificant(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with('#')
}

/// Net open brackets on a line, ignoring string literals and trailing comments
fn paren_balance(line: &str) -> isize {
    let mut balance = 0;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(ch) = chars.next() {
        match (quote, ch) {
            (Some(_), '\\') => {
                chars.next();
            }
            (Some(open), c) if c == open => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(ch),
            (None, '#') => break,
            (None, '(' | '[' | '{') => balance += 1,
            (None, ')' | ']' | '}') => balance -= 1,
            (None, _) => {}
        }
    }
    balance
}

/// A parameter list only continues onto deeper lines or a closing bracket line
fn continues_signature(line: &str, baseline: usize) -> bool {
    indent_width(line) > baseline || line.trim_start().starts_with([')', ']'])
}

/// What encloses the definition at `index`, walking outwards through lines of
/// strictly smaller indentation
struct Enclosing {
    classes: Vec<String>,
    nearest_is_class: bool,
}

fn enclosing_scopes(lines: &[&str], index: usize) -> Enclosing {
    let mut limit = indent_width(lines[index]);
    let mut classes = Vec::new();
    let mut nearest: Option<bool> = None;

    for line in lines[..index].iter().rev() {
        if limit == 0 {
            break;
        }
        if is_insignificant(line) {
            continue;
        }
        let width = indent_width(line);
        if width >= limit {
            continue;
        }
        limit = width;

        if let Some(captures) = CLASS_PATTERN.captures(line) {
            classes.push(captures["name"].to_string());
            nearest.get_or_insert(true);
        } else if ENCLOSING_DEF_PATTERN.is_match(line) {
            nearest.get_or_insert(false);
        }
    }

    classes.reverse();
    Enclosing {
        classes,
        nearest_is_class: nearest.unwrap_or(false),
    }
}

impl FunctionDetector for IndentDetector {
    fn match_signature(&self, lines: &[&str], index: usize) -> Option<Signature> {
        let captures = DEF_PATTERN.captures(lines.get(index)?)?;
        let name = &captures["name"];
        let enclosing = enclosing_scopes(lines, index);

        let kind = if enclosing.nearest_is_class && name == "__init__" {
            FunctionKind::Constructor
        } else if enclosing.nearest_is_class {
            FunctionKind::Method
        } else if captures.name("async").is_some() {
            FunctionKind::AsyncFunction
        } else {
            FunctionKind::Function
        };

        let qualified = if enclosing.classes.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", enclosing.classes.join("."), name)
        };

        Some(Signature::new(qualified, kind))
    }

    fn compute_extent(&self, lines: &[&str], index: usize) -> usize {
        let baseline = indent_width(lines[index]);

        // Multi-line parameter lists belong to the signature
        let mut signature_end = index;
        let mut balance = paren_balance(lines[index]);
        while balance > 0
            && signature_end + 1 < lines.len()
            && continues_signature(lines[signature_end + 1], baseline)
        {
            signature_end += 1;
            balance += paren_balance(lines[signature_end]);
        }

        let mut end = signature_end;
        for (offset, line) in lines.iter().enumerate().skip(signature_end + 1) {
            if is_insignificant(line) {
                continue;
            }
            if indent_width(line) <= baseline {
                break;
            }
            end = offset;
        }
        end
    }
}
