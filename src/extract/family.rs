//! Language families and their block-delimiting conventions

use super::brace::{C_LIKE_DETECTOR, GO_DETECTOR, JAVASCRIPT_DETECTOR};
use super::indent::PYTHON_DETECTOR;
use super::keyword::RUBY_DETECTOR;
use super::types::FunctionKind;
use super::FunctionDetector;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// How the body of a function is delimited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockRule {
    /// Body is a `{ ... }` block; the extent follows brace depth
    BraceDepth,
    /// Body is every following line indented deeper than the signature
    Indentation,
    /// Body runs until the matching `end` keyword
    EndKeyword,
}

/// Supported language families
#[derive(EnumIter, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageFamily {
    Python,
    Ruby,
    JavaScript,
    Go,
    CLike,
}

impl LanguageFamily {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Ruby => "ruby",
            Self::JavaScript => "javascript",
            Self::Go => "go",
            Self::CLike => "c-like",
        }
    }

    /// File extensions (lowercase, without the dot) owned by this family
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Python => &["py", "pyi"],
            Self::Ruby => &["rb"],
            Self::JavaScript => &["js", "jsx", "mjs", "cjs", "ts", "tsx"],
            Self::Go => &["go"],
            Self::CLike => &["java", "cs", "c", "cc", "cpp", "cxx", "h", "hpp"],
        }
    }

    pub fn block_rule(&self) -> BlockRule {
        match self {
            Self::Python => BlockRule::Indentation,
            Self::Ruby => BlockRule::EndKeyword,
            Self::JavaScript | Self::Go | Self::CLike => BlockRule::BraceDepth,
        }
    }

    /// Prefix of the `<type>` column in rendered output
    pub fn type_prefix(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Ruby => "ruby",
            Self::JavaScript => "js",
            Self::Go => "go",
            Self::CLike => "java_like",
        }
    }

    /// Output type label such as `js_function` or `python_async_function`
    pub fn type_label(&self, kind: FunctionKind) -> String {
        format!("{}_{}", self.type_prefix(), kind.as_str())
    }

    /// Look up the family owning a file extension (case-insensitive, dot optional)
    pub fn from_extension(extension: &str) -> Option<Self> {
        let cleaned = extension.strip_prefix('.').unwrap_or(extension);
        if cleaned.is_empty() {
            return None;
        }
        let lowered = cleaned.to_ascii_lowercase();
        Self::iter().find(|family| family.extensions().contains(&lowered.as_str()))
    }

    /// Detector for this family's block rule and signature table
    pub(crate) fn detector(&self) -> &'static dyn FunctionDetector {
        match self.block_rule() {
            BlockRule::Indentation => &*PYTHON_DETECTOR,
            BlockRule::EndKeyword => &*RUBY_DETECTOR,
            BlockRule::BraceDepth => match self {
                Self::Go => &*GO_DETECTOR,
                Self::CLike => &*C_LIKE_DETECTOR,
                _ => &*JAVASCRIPT_DETECTOR,
            },
        }
    }
}

impl fmt::Display for LanguageFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
