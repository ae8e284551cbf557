//! Repository Scan
//!
//! Turns a repository's archive entries into a lazy stream of scan messages.
//! Each call to `next` consumes at most one archive entry, so memory use is
//! bounded by a single file plus the records extracted from it.

use super::archive::ArchiveEntry;
use super::classify::classify;
use super::error::{ScanError, ScanResult};
use super::filter::FileFilter;
use super::types::{ScanMessage, ScanStats, ScanTask};
use crate::extract::extract_lines;
use std::collections::VecDeque;

/// Scan `entries` for function definitions
///
/// Yields one `FunctionFound` per record (archive order, then record order)
/// followed by exactly one `RepositoryDone`. An `Err` from `entries` is
/// passed through and ends the sequence without a `RepositoryDone`.
pub fn scan<I>(
    task: ScanTask,
    entries: I,
    filter: FileFilter,
    collect_body: bool,
) -> RepositoryScan<I>
where
    I: Iterator<Item = ScanResult<ArchiveEntry>>,
{
    RepositoryScan {
        task,
        entries,
        filter,
        collect_body,
        pending: VecDeque::new(),
        stats: ScanStats::default(),
        finished: false,
    }
}

/// Lazy, non-restartable scan of one repository
pub struct RepositoryScan<I> {
    task: ScanTask,
    entries: I,
    filter: FileFilter,
    collect_body: bool,
    pending: VecDeque<ScanMessage>,
    stats: ScanStats,
    finished: bool,
}

impl<I> RepositoryScan<I> {
    fn scan_entry(&mut self, entry: ArchiveEntry) {
        if !self.filter.accepts(&entry.path, entry.size) {
            self.stats.files_skipped += 1;
            return;
        }
        let Some(family) = classify(&entry.path) else {
            self.stats.files_skipped += 1;
            return;
        };

        let text = match String::from_utf8(entry.content) {
            Ok(text) => text,
            Err(_) => {
                log::debug!("{}: skipping undecodable {}", self.task.repo, entry.path);
                self.stats.undecodable += 1;
                return;
            }
        };

        let lines: Vec<&str> = text.lines().collect();
        let records = extract_lines(&lines, family);
        self.stats.files_scanned += 1;
        self.stats.functions += records.len();

        for record in records {
            let body = if self.collect_body {
                record.body(&lines).filter(|body| !body.trim().is_empty())
            } else {
                None
            };
            self.pending.push_back(ScanMessage::FunctionFound {
                repo: self.task.repo.full_name.clone(),
                path: entry.path.clone(),
                family,
                record,
                body,
            });
        }
    }
}

impl<I> Iterator for RepositoryScan<I>
where
    I: Iterator<Item = ScanResult<ArchiveEntry>>,
{
    type Item = Result<ScanMessage, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(message) = self.pending.pop_front() {
                return Some(Ok(message));
            }
            if self.finished {
                return None;
            }

            match self.entries.next() {
                Some(Ok(entry)) => self.scan_entry(entry),
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(e));
                }
                None => {
                    self.finished = true;
                    log::debug!(
                        "{}: {} files scanned, {} skipped, {} functions",
                        self.task.repo,
                        self.stats.files_scanned,
                        self.stats.files_skipped,
                        self.stats.functions
                    );
                    return Some(Ok(ScanMessage::RepositoryDone {
                        rank: self.task.rank,
                        total: self.task.total,
                        stats: self.stats.clone(),
                    }));
                }
            }
        }
    }
}
