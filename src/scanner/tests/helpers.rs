//! Shared fixtures for scanner tests

use crate::scanner::{ArchiveEntry, RepositoryRef, ScanTask};

pub fn task(name: &str, rank: usize, total: usize) -> ScanTask {
    ScanTask::new(RepositoryRef::new(name, "main"), rank, total)
}

pub fn entry(path: &str, content: &str) -> ArchiveEntry {
    ArchiveEntry::new(path, content)
}
