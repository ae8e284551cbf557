//! File eligibility rules applied before extraction

use super::classify::classify;

/// Vendored, generated and tooling directories that are never scanned
pub const SKIP_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "dist",
    "build",
    ".venv",
    "vendor",
    "target",
    "__pycache__",
    ".idea",
    ".vscode",
];

/// Eligible iff the extension is supported and the size is within `max_kb` KiB
pub fn is_eligible(path: &str, size_bytes: u64, max_kb: u64) -> bool {
    classify(path).is_some() && size_bytes <= max_kb.saturating_mul(1024)
}

/// Size cutoff plus directory exclusions
#[derive(Debug, Clone)]
pub struct FileFilter {
    max_kb: u64,
    skip_dirs: Vec<String>,
}

impl FileFilter {
    pub fn new(max_kb: u64) -> Self {
        Self {
            max_kb,
            skip_dirs: SKIP_DIRS.iter().map(|d| d.to_string()).collect(),
        }
    }

    /// Largest entry, in bytes, whose content is worth materializing
    pub fn content_limit(&self) -> u64 {
        self.max_kb.saturating_mul(1024)
    }

    /// True when any path component is a skipped directory
    pub fn is_excluded(&self, path: &str) -> bool {
        path.split(['/', '\\'])
            .any(|part| self.skip_dirs.iter().any(|skip| skip == part))
    }

    pub fn accepts(&self, path: &str, size_bytes: u64) -> bool {
        !self.is_excluded(path) && is_eligible(path, size_bytes, self.max_kb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_eligible_size_cutoff() {
        assert!(is_eligible("a.js", 1024, 1));
        assert!(!is_eligible("a.js", 2048, 1));
        assert!(!is_eligible("a.txt", 10, 128));
        assert!(is_eligible("empty.go", 0, 0));
    }

    #[test]
    fn test_filter_excludes_skip_dirs() {
        let filter = FileFilter::new(128);
        assert!(filter.is_excluded("node_modules/left-pad/index.js"));
        assert!(filter.is_excluded("pkg/vendor/lib.go"));
        assert!(filter.is_excluded("src\\__pycache__\\mod.py"));
        assert!(!filter.is_excluded("src/vendored.go"));
        assert!(!filter.is_excluded("build.py"));
    }

    #[test]
    fn test_filter_accepts() {
        let filter = FileFilter::new(1);
        assert!(filter.accepts("src/main.c", 100));
        assert!(!filter.accepts("src/main.c", 4096));
        assert!(!filter.accepts("dist/bundle.js", 100));
        assert!(!filter.accepts("docs/guide.md", 100));
        assert_eq!(filter.content_limit(), 1024);
    }
}
