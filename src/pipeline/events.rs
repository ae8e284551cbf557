//! Pipeline events
//!
//! Everything the Reporter renders arrives as a `PipelineEvent` from the
//! aggregator task, in completion order.

use super::batch::Batch;
use crate::extract::{FunctionRecord, LanguageFamily};
use crate::scanner::ScanStats;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    BatchStarted {
        batch: Batch,
    },
    FunctionFound {
        repo: String,
        path: String,
        family: LanguageFamily,
        record: FunctionRecord,
        body: Option<String>,
    },
    RepositoryDone {
        rank: usize,
        total: usize,
        repo: String,
        stats: ScanStats,
    },
    RepositoryFailed {
        rank: usize,
        total: usize,
        repo: String,
        reason: String,
    },
    BatchDone {
        batch: Batch,
        repositories: usize,
        functions: usize,
        failed: usize,
    },
    Finished(RunSummary),
}

/// Totals for a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Repositories scanned to completion
    pub repositories: usize,
    pub functions: usize,
    pub failed: usize,
    /// Repositories never started because of shutdown
    pub cancelled: usize,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn was_cancelled(&self) -> bool {
        self.cancelled > 0
    }
}
