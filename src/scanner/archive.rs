//! Archive Transport
//!
//! Repository snapshots are fetched as gzip tarballs and read entry by entry.
//!
//! ## Core Features
//!
//! - **ArchiveFetcher**: async seam for retrieving a snapshot into a staging directory
//! - **GithubArchiveFetcher**: streams `/repos/<owner>/<name>/tarball/<ref>` to disk
//! - **Archive**: iterates regular files with the top-level directory stripped,
//!   materializing content only for entries within the size cutoff

use super::error::{ScanError, ScanResult};
use super::types::ScanTask;
use async_trait::async_trait;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::Read;
use std::path::{Component, Path, PathBuf};
use tokio::io::AsyncWriteExt;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// File name of the downloaded snapshot inside a staging directory
pub const ARCHIVE_FILE_NAME: &str = "archive.tar.gz";

/// A regular file inside a repository snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Repository-relative path with `/` separators
    pub path: String,
    /// Uncompressed size in bytes
    pub size: u64,
    /// Empty when `size` exceeds the content limit used to read the archive
    pub content: Vec<u8>,
}

impl ArchiveEntry {
    pub fn new(path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        let content = content.into();
        Self {
            path: path.into(),
            size: content.len() as u64,
            content,
        }
    }
}

/// A fetched repository snapshot
#[derive(Debug, Clone)]
pub enum Archive {
    /// Gzip tarball on disk
    Tarball(PathBuf),
    /// Pre-built entries held in memory
    Memory(Vec<ArchiveEntry>),
}

impl Archive {
    pub fn from_entries(entries: Vec<ArchiveEntry>) -> Self {
        Archive::Memory(entries)
    }

    /// Run `visit` over the archive's entries
    ///
    /// Entries larger than `content_limit` are yielded with their real size and
    /// no content. An unreadable entry is yielded as an `Err`; consumers stop
    /// there.
    pub fn with_entries<T>(
        &self,
        content_limit: u64,
        visit: impl FnOnce(&mut dyn Iterator<Item = ScanResult<ArchiveEntry>>) -> T,
    ) -> ScanResult<T> {
        match self {
            Archive::Tarball(path) => {
                let file = File::open(path)?;
                let mut archive = tar::Archive::new(GzDecoder::new(file));
                let mut entries = archive
                    .entries()?
                    .filter_map(|entry| read_tar_entry(entry, content_limit));
                Ok(visit(&mut entries))
            }
            Archive::Memory(entries) => {
                let mut entries = entries.iter().map(|entry| {
                    let mut entry = entry.clone();
                    if entry.size > content_limit {
                        entry.content.clear();
                    }
                    Ok(entry)
                });
                Ok(visit(&mut entries))
            }
        }
    }
}

/// Convert one tar entry, skipping non-files and the top-level directory itself
fn read_tar_entry<R: Read>(
    entry: std::io::Result<tar::Entry<'_, R>>,
    content_limit: u64,
) -> Option<ScanResult<ArchiveEntry>> {
    let mut entry = match entry {
        Ok(entry) => entry,
        Err(e) => return Some(Err(ScanError::archive(format!("unreadable entry: {}", e)))),
    };

    if !entry.header().entry_type().is_file() {
        return None;
    }

    let path = match entry.path() {
        Ok(path) => path.into_owned(),
        Err(e) => return Some(Err(ScanError::archive(format!("invalid entry path: {}", e)))),
    };
    let relative = strip_top_directory(&path)?;

    let size = entry.size();
    let mut content = Vec::new();
    if size <= content_limit {
        if let Err(e) = entry.read_to_end(&mut content) {
            return Some(Err(ScanError::archive(format!(
                "failed to read {}: {}",
                relative, e
            ))));
        }
    }

    Some(Ok(ArchiveEntry {
        path: relative,
        size,
        content,
    }))
}

/// Drop the `<owner>-<name>-<sha>/` prefix and normalise separators
fn strip_top_directory(path: &Path) -> Option<String> {
    let parts: Vec<String> = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .skip(1)
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Retrieves a repository snapshot into a private staging directory
#[async_trait]
pub trait ArchiveFetcher: Send + Sync {
    async fn fetch(&self, task: &ScanTask, staging_dir: &Path) -> ScanResult<Archive>;
}

/// Downloads tarball snapshots from the GitHub REST API
#[derive(Debug, Clone)]
pub struct GithubArchiveFetcher {
    client: reqwest::Client,
    api_base: String,
    token: Option<String>,
}

impl GithubArchiveFetcher {
    pub fn new(client: reqwest::Client, token: Option<String>) -> Self {
        Self::with_api_base(client, token, DEFAULT_API_BASE)
    }

    pub fn with_api_base(
        client: reqwest::Client,
        token: Option<String>,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    pub fn tarball_url(&self, task: &ScanTask) -> String {
        let branch = task.repo.default_branch.trim();
        if branch.is_empty() {
            format!("{}/repos/{}/tarball", self.api_base, task.repo.full_name)
        } else {
            format!(
                "{}/repos/{}/tarball/{}",
                self.api_base, task.repo.full_name, branch
            )
        }
    }
}

#[async_trait]
impl ArchiveFetcher for GithubArchiveFetcher {
    async fn fetch(&self, task: &ScanTask, staging_dir: &Path) -> ScanResult<Archive> {
        let url = self.tarball_url(task);
        log::debug!("Downloading {} from {}", task.repo, url);

        let mut request = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.header(reqwest::header::AUTHORIZATION, format!("token {}", token));
        }

        let mut response = request.send().await?;
        if !response.status().is_success() {
            return Err(ScanError::Status {
                repo: task.repo.full_name.clone(),
                status: response.status().as_u16(),
            });
        }

        let target = staging_dir.join(ARCHIVE_FILE_NAME);
        let mut file = tokio::fs::File::create(&target).await?;
        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        log::debug!("Downloaded {} ({} bytes)", task.repo, written);
        Ok(Archive::Tarball(target))
    }
}
