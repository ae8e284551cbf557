//! Progress aggregation
//!
//! Workers report into one aggregator task over an mpsc channel. The
//! aggregator owns every counter and per-batch tally, converts worker reports
//! into `PipelineEvent`s and closes the stream with `Finished`.

use super::batch::{Batch, BatchPlan};
use super::events::{PipelineEvent, RunSummary};
use crate::scanner::{ScanMessage, ScanTask};
use tokio::sync::mpsc;

/// Report from a worker about one task
#[derive(Debug)]
pub(crate) enum WorkerMessage {
    Started { rank: usize },
    Completed { task: ScanTask, messages: Vec<ScanMessage> },
    Failed { task: ScanTask, reason: String },
}

#[derive(Debug, Clone, Default)]
struct BatchTally {
    expected: usize,
    finished: usize,
    repositories: usize,
    functions: usize,
    failed: usize,
    started: bool,
    done: bool,
}

pub(crate) struct ProgressAggregator {
    plan: BatchPlan,
    tallies: Vec<BatchTally>,
    summary: RunSummary,
    queued: usize,
    events: mpsc::Sender<PipelineEvent>,
}

impl ProgressAggregator {
    pub(crate) fn new(
        plan: BatchPlan,
        tasks: &[ScanTask],
        events: mpsc::Sender<PipelineEvent>,
    ) -> Self {
        let mut tallies: Vec<BatchTally> = vec![BatchTally::default(); plan.len()];
        for task in tasks {
            if let Some(position) = plan.position_of(task.rank) {
                tallies[position].expected += 1;
            }
        }
        Self {
            plan,
            tallies,
            summary: RunSummary::default(),
            queued: tasks.len(),
            events,
        }
    }

    /// Consume worker reports until every worker has hung up
    pub(crate) async fn run(mut self, mut reports: mpsc::Receiver<WorkerMessage>) -> RunSummary {
        while let Some(report) = reports.recv().await {
            self.handle(report).await;
        }

        let terminal = self.summary.repositories + self.summary.failed;
        self.summary.cancelled = self.queued.saturating_sub(terminal);
        if self.summary.cancelled > 0 {
            log::warn!(
                "Shutdown requested: {} repositories were not scanned",
                self.summary.cancelled
            );
        }

        let summary = self.summary.clone();
        self.emit(PipelineEvent::Finished(summary.clone())).await;
        summary
    }

    async fn handle(&mut self, report: WorkerMessage) {
        match report {
            WorkerMessage::Started { rank } => {
                if let Some(position) = self.plan.position_of(rank) {
                    self.mark_started(position).await;
                }
            }
            WorkerMessage::Completed { task, messages } => {
                let position = self.plan.position_of(task.rank);
                if let Some(position) = position {
                    self.mark_started(position).await;
                }

                let mut functions = 0;
                for message in messages {
                    match message {
                        ScanMessage::FunctionFound {
                            repo,
                            path,
                            family,
                            record,
                            body,
                        } => {
                            functions += 1;
                            self.emit(PipelineEvent::FunctionFound {
                                repo,
                                path,
                                family,
                                record,
                                body,
                            })
                            .await;
                        }
                        ScanMessage::RepositoryDone { rank, total, stats } => {
                            self.emit(PipelineEvent::RepositoryDone {
                                rank,
                                total,
                                repo: task.repo.full_name.clone(),
                                stats,
                            })
                            .await;
                        }
                    }
                }

                self.summary.repositories += 1;
                self.summary.functions += functions;
                if let Some(position) = position {
                    let tally = &mut self.tallies[position];
                    tally.repositories += 1;
                    tally.functions += functions;
                    tally.finished += 1;
                    self.finish_if_complete(position).await;
                }
            }
            WorkerMessage::Failed { task, reason } => {
                let position = self.plan.position_of(task.rank);
                if let Some(position) = position {
                    self.mark_started(position).await;
                }

                log::warn!("{}: {}", task.repo, reason);
                self.emit(PipelineEvent::RepositoryFailed {
                    rank: task.rank,
                    total: task.total,
                    repo: task.repo.full_name.clone(),
                    reason,
                })
                .await;

                self.summary.failed += 1;
                if let Some(position) = position {
                    let tally = &mut self.tallies[position];
                    tally.failed += 1;
                    tally.finished += 1;
                    self.finish_if_complete(position).await;
                }
            }
        }
    }

    async fn mark_started(&mut self, position: usize) {
        if self.tallies[position].started {
            return;
        }
        self.tallies[position].started = true;
        let batch = self.batch(position);
        log::debug!("Batch {} started", batch);
        self.emit(PipelineEvent::BatchStarted { batch }).await;
    }

    async fn finish_if_complete(&mut self, position: usize) {
        let batch = self.batch(position);
        let tally = &mut self.tallies[position];
        if tally.done || tally.finished < tally.expected {
            return;
        }
        tally.done = true;
        let event = PipelineEvent::BatchDone {
            batch,
            repositories: tally.repositories,
            functions: tally.functions,
            failed: tally.failed,
        };
        self.emit(event).await;
    }

    fn batch(&self, position: usize) -> Batch {
        self.plan.batches()[position]
    }

    async fn emit(&self, event: PipelineEvent) {
        if self.events.send(event).await.is_err() {
            log::trace!("Event receiver dropped; discarding pipeline event");
        }
    }
}
