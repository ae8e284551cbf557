//! Scanner Types
//!
//! Repository references, scan tasks and the messages a repository scan yields.

use crate::extract::{FunctionRecord, LanguageFamily};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A ranked repository as returned by discovery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRef {
    /// `owner/name`
    pub full_name: String,
    #[serde(default)]
    pub default_branch: String,
    #[serde(default)]
    pub html_url: String,
    #[serde(rename = "stargazers_count", default)]
    pub stars: u64,
}

impl RepositoryRef {
    pub fn new(full_name: impl Into<String>, default_branch: impl Into<String>) -> Self {
        let full_name = full_name.into();
        Self {
            html_url: format!("https://github.com/{}", full_name),
            full_name,
            default_branch: default_branch.into(),
            stars: 0,
        }
    }

    pub fn owner(&self) -> &str {
        self.full_name
            .split_once('/')
            .map_or(self.full_name.as_str(), |(owner, _)| owner)
    }

    pub fn name(&self) -> &str {
        self.full_name
            .split_once('/')
            .map_or(self.full_name.as_str(), |(_, name)| name)
    }

    /// Directory name used for this repository's private staging area
    pub fn staging_key(&self) -> String {
        let sanitize = |part: &str| {
            part.chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                        c
                    } else {
                        '_'
                    }
                })
                .collect::<String>()
        };
        format!("{}__{}", sanitize(self.owner()), sanitize(self.name()))
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}

/// One unit of pipeline work: a repository and its 1-based rank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTask {
    pub repo: RepositoryRef,
    pub rank: usize,
    pub total: usize,
}

impl ScanTask {
    pub fn new(repo: RepositoryRef, rank: usize, total: usize) -> Self {
        Self { repo, rank, total }
    }

    /// Build tasks for a ranked list, ranks starting at 1
    pub fn from_ranked(repos: Vec<RepositoryRef>) -> Vec<ScanTask> {
        let total = repos.len();
        repos
            .into_iter()
            .enumerate()
            .map(|(i, repo)| ScanTask::new(repo, i + 1, total))
            .collect()
    }
}

/// Per-repository scan statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Eligible files that were decoded and scanned
    pub files_scanned: usize,
    /// Files rejected by the file filter
    pub files_skipped: usize,
    /// Eligible files that were not valid UTF-8
    pub undecodable: usize,
    pub functions: usize,
}

/// Messages produced by a repository scan, in archive order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanMessage {
    FunctionFound {
        repo: String,
        path: String,
        family: LanguageFamily,
        record: FunctionRecord,
        body: Option<String>,
    },
    /// Always the final message of a successful scan
    RepositoryDone {
        rank: usize,
        total: usize,
        stats: ScanStats,
    },
}
