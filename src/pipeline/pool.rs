//! Worker pool
//!
//! `W` workers pull tasks from one shared ordered queue. Each task runs
//! prepare staging → fetch → scan (on the blocking pool) → cleanup, and the
//! outcome goes to the aggregator as a single report, so a repository's output
//! is contiguous and a failing archive yields no partial output.

use super::batch::BatchPlan;
use super::events::{PipelineEvent, RunSummary};
use super::progress::{ProgressAggregator, WorkerMessage};
use crate::core::shutdown::ShutdownCoordinator;
use crate::scanner::{
    scan, ArchiveFetcher, FileFilter, ScanError, ScanMessage, ScanResult, ScanTask, StagingArea,
};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

/// Default number of concurrent repository scans
pub const DEFAULT_WORKERS: usize = 12;

const REPORT_BUFFER: usize = 64;

/// Per-run pipeline settings
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub workers: usize,
    pub filter: FileFilter,
    pub collect_body: bool,
}

impl PipelineConfig {
    pub fn new(workers: usize, filter: FileFilter, collect_body: bool) -> Self {
        Self {
            workers: workers.max(1),
            filter,
            collect_body,
        }
    }
}

struct WorkerContext {
    config: PipelineConfig,
    fetcher: Arc<dyn ArchiveFetcher>,
    staging: StagingArea,
    shutdown: ShutdownCoordinator,
}

/// Bounded concurrent fetch-and-scan over a ranked task list
pub struct ScanPipeline {
    context: Arc<WorkerContext>,
}

impl ScanPipeline {
    pub fn new(
        config: PipelineConfig,
        fetcher: Arc<dyn ArchiveFetcher>,
        staging: StagingArea,
        shutdown: ShutdownCoordinator,
    ) -> Self {
        Self {
            context: Arc::new(WorkerContext {
                config,
                fetcher,
                staging,
                shutdown,
            }),
        }
    }

    /// Scan every task, streaming events into `events`
    ///
    /// Returns once all workers have stopped and `Finished` has been sent.
    pub async fn run(
        &self,
        tasks: Vec<ScanTask>,
        plan: BatchPlan,
        events: mpsc::Sender<PipelineEvent>,
    ) -> RunSummary {
        let (report_tx, report_rx) = mpsc::channel(REPORT_BUFFER);
        let aggregator = ProgressAggregator::new(plan, &tasks, events);
        let aggregator = tokio::spawn(aggregator.run(report_rx));

        let worker_count = self.context.config.workers.min(tasks.len()).max(1);
        log::info!(
            "Scanning {} repositories with {} workers",
            tasks.len(),
            worker_count
        );

        let queue = Arc::new(Mutex::new(VecDeque::from(tasks)));
        let workers: Vec<_> = (0..worker_count)
            .map(|id| {
                tokio::spawn(worker(
                    id,
                    Arc::clone(&queue),
                    Arc::clone(&self.context),
                    report_tx.clone(),
                ))
            })
            .collect();
        drop(report_tx);

        for result in futures::future::join_all(workers).await {
            if let Err(e) = result {
                log::error!("Pipeline worker terminated abnormally: {}", e);
            }
        }

        match aggregator.await {
            Ok(summary) => summary,
            Err(e) => {
                log::error!("Progress aggregator terminated abnormally: {}", e);
                RunSummary::default()
            }
        }
    }
}

async fn worker(
    id: usize,
    queue: Arc<Mutex<VecDeque<ScanTask>>>,
    context: Arc<WorkerContext>,
    reports: mpsc::Sender<WorkerMessage>,
) {
    loop {
        if context.shutdown.is_shutdown_requested() {
            log::debug!("Worker {} stopping on shutdown", id);
            break;
        }
        let Some(task) = queue.lock().await.pop_front() else {
            break;
        };

        log::debug!("Worker {} fetching {} (rank {})", id, task.repo, task.rank);
        if reports
            .send(WorkerMessage::Started { rank: task.rank })
            .await
            .is_err()
        {
            break;
        }

        let report = match process(&context, &task).await {
            Ok(messages) => WorkerMessage::Completed { task, messages },
            Err(e) => WorkerMessage::Failed {
                task,
                reason: e.to_string(),
            },
        };
        if reports.send(report).await.is_err() {
            break;
        }
    }
}

async fn process(context: &WorkerContext, task: &ScanTask) -> ScanResult<Vec<ScanMessage>> {
    let staging = context.staging.prepare(&task.repo)?;
    let archive = context.fetcher.fetch(task, staging.path()).await?;

    let filter = context.config.filter.clone();
    let collect_body = context.config.collect_body;
    let scan_task = task.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        let limit = filter.content_limit();
        archive.with_entries(limit, move |entries| {
            scan(scan_task, entries, filter, collect_body).collect::<ScanResult<Vec<_>>>()
        })
    })
    .await
    .map_err(|e| ScanError::Task {
        message: format!("scan of {} did not complete: {}", task.repo, e),
    });

    if let Err(e) = staging.cleanup() {
        log::warn!("{}: failed to remove staging directory: {}", task.repo, e);
    }

    outcome??
}
