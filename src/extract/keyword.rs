//! Keyword-block family (Ruby)
//!
//! A definition's extent is tracked with a nesting counter: block openers
//! increment it, each `end` keyword decrements it, and the definition closes on
//! the line where the counter drops back to zero. Blank and comment lines are
//! ignored. String contents are not excluded, so an `end` inside a literal can
//! close a block early.

use super::types::{FunctionKind, Signature};
use super::FunctionDetector;
use regex::Regex;
use std::sync::LazyLock;

static DEF_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*def\s+(?P<receiver>(?:self|[A-Z]\w*)\.)?(?P<name>[A-Za-z_]\w*[?!=]?|\[\]=?|[-+*/%<>=!~^&|]+@?)",
    )
    .expect("def pattern must compile")
});

/// `def name(args) = expr` and `def name = expr`
static ENDLESS_DEF_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*def\s+[^\s(=]+(?:\([^)]*\)\s*|\s+)=(?:[^=~>]|$)")
        .expect("endless def pattern must compile")
});

static STATEMENT_OPENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:def|class|module|if|unless|while|until|case|begin|for)\b")
        .expect("opener pattern must compile")
});

static ASSIGNED_OPENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[^=!<>])=\s*(?:if|unless|case|begin|while|until)\b")
        .expect("assigned opener pattern must compile")
});

static TRAILING_DO: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bdo\s*(?:\|[^|]*\|)?\s*$").expect("do pattern must compile")
});

static LOOP_HEAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:while|until|for)\b").expect("loop pattern must compile")
});

static END_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bend\b").expect("end pattern must compile"));

pub(crate) static RUBY_DETECTOR: LazyLock<KeywordDetector> = LazyLock::new(|| KeywordDetector);

/// Detector for `def ... end` blocks
pub(crate) struct KeywordDetector;

/// Drop a trailing `# comment`, leaving `#{...}` interpolation alone
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'#' {
            continue;
        }
        let after_space = i == 0 || bytes[i - 1].is_ascii_whitespace();
        let interpolation = bytes.get(i + 1) == Some(&b'{');
        if after_space && !interpolation {
            return &line[..i];
        }
    }
    line
}

fn count_ends(code: &str) -> isize {
    END_KEYWORD
        .find_iter(code)
        .filter(|m| {
            let before = code[..m.start()].chars().next_back();
            let after = code[m.end()..].chars().next();
            !matches!(before, Some('.' | ':' | '@' | '$'))
                && !matches!(after, Some('?' | '!' | ':'))
        })
        .count() as isize
}

/// Net change of the nesting counter contributed by one line
fn nesting_delta(line: &str) -> isize {
    let trimmed = line.trim_start();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return 0;
    }
    let code = strip_comment(line);

    let mut opens = 0;
    if STATEMENT_OPENER.is_match(code) && !ENDLESS_DEF_PATTERN.is_match(code) {
        opens += 1;
    }
    opens += ASSIGNED_OPENER.find_iter(code).count() as isize;
    if TRAILING_DO.is_match(code) && !LOOP_HEAD.is_match(code) {
        opens += 1;
    }

    opens - count_ends(code)
}

impl FunctionDetector for KeywordDetector {
    fn match_signature(&self, lines: &[&str], index: usize) -> Option<Signature> {
        let captures = DEF_PATTERN.captures(lines.get(index)?)?;
        let name = &captures["name"];
        let kind = if name == "initialize" {
            FunctionKind::Constructor
        } else {
            FunctionKind::Method
        };
        let receiver = captures.name("receiver").map_or("", |m| m.as_str());
        Some(Signature::new(format!("{}{}", receiver, name), kind))
    }

    fn compute_extent(&self, lines: &[&str], index: usize) -> usize {
        if ENDLESS_DEF_PATTERN.is_match(lines[index]) {
            return index;
        }

        let mut depth = 0isize;
        for (offset, line) in lines.iter().enumerate().skip(index) {
            depth += nesting_delta(line);
            if depth <= 0 {
                return offset;
            }
        }
        lines.len() - 1
    }
}
