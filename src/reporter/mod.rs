//! Reporter
//!
//! Single consumer of pipeline events. Renders plain text lines to any
//! `Write` sink (stdout in the binary, a buffer in tests). Function lines are
//! never colored so they stay machine-parseable; progress and batch lines are
//! painted when color is enabled.

use crate::core::styles::StyleRole;
use crate::extract::{FunctionRecord, LanguageFamily};
use crate::pipeline::{Batch, BatchOutcome, PipelineEvent, RunSummary};
use std::io::{self, Write};
use tokio::sync::mpsc;

/// Width of the separator printed after every function
pub const SEPARATOR_WIDTH: usize = 80;

pub struct Reporter<W: Write> {
    out: W,
    show_body: bool,
    color: bool,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, show_body: bool, color: bool) -> Self {
        Self {
            out,
            show_body,
            color,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Render events until the channel closes
    ///
    /// Returns the writer and the run summary from the `Finished` event, if one
    /// arrived. A write failure (e.g. a closed pipe) stops rendering but keeps
    /// draining so the pipeline is never blocked on a full channel.
    pub async fn consume(
        mut self,
        mut events: mpsc::Receiver<PipelineEvent>,
    ) -> (W, Option<RunSummary>) {
        let mut summary = None;
        let mut writable = true;
        while let Some(event) = events.recv().await {
            if let PipelineEvent::Finished(run) = &event {
                summary = Some(run.clone());
            }
            if writable {
                if let Err(e) = self.render(&event) {
                    log::warn!("Stopped writing output: {}", e);
                    writable = false;
                }
            }
        }
        if writable {
            if let Err(e) = self.out.flush() {
                log::warn!("Failed to flush output: {}", e);
            }
        }
        (self.out, summary)
    }

    pub fn render(&mut self, event: &PipelineEvent) -> io::Result<()> {
        match event {
            PipelineEvent::BatchStarted { batch } => {
                let line = format!(
                    "[batch {}] repos {}-{}",
                    batch, batch.start_rank, batch.end_rank
                );
                self.line(StyleRole::Header, &line)
            }
            PipelineEvent::FunctionFound {
                repo,
                path,
                family,
                record,
                body,
            } => self.function(repo, path, *family, record, body.as_deref()),
            PipelineEvent::RepositoryDone { rank, total, .. } => {
                self.line(StyleRole::Progress, &format!("[{}/{}] done", rank, total))
            }
            PipelineEvent::RepositoryFailed {
                rank,
                total,
                repo,
                reason,
            } => self.line(
                StyleRole::Error,
                &format!("[{}/{}] failed [{}]: {}", rank, total, repo, reason),
            ),
            PipelineEvent::BatchDone {
                batch,
                repositories,
                functions,
                failed,
            } => {
                let line = format!(
                    "[batch {} done] repos {}-{}: {} functions across {} repos ({} failed)",
                    batch, batch.start_rank, batch.end_rank, functions, repositories, failed
                );
                self.line(StyleRole::Header, &line)
            }
            PipelineEvent::Finished(summary) => self.summary(summary),
        }
    }

    /// Process-per-batch: a child is about to start
    pub fn batch_spawning(&mut self, batch: &Batch) -> io::Result<()> {
        let line = format!(
            "[batch {}] spawning repos {}-{}",
            batch, batch.start_rank, batch.end_rank
        );
        self.line(StyleRole::Header, &line)
    }

    pub fn processes_starting(&mut self, count: usize) -> io::Result<()> {
        self.line(
            StyleRole::Header,
            &format!("Starting {} batch process(es).", count),
        )
    }

    pub fn batch_process_failed(&mut self, outcome: &BatchOutcome) -> io::Result<()> {
        let line = format!(
            "[batch {}] batch process failed with status {}.",
            outcome.batch,
            outcome.code()
        );
        self.line(StyleRole::Error, &line)
    }

    pub fn processes_finished(&mut self, count: usize) -> io::Result<()> {
        self.line(
            StyleRole::Summary,
            &format!("Spawned and waited for {} batch process(es).", count),
        )?;
        self.out.flush()
    }

    fn function(
        &mut self,
        repo: &str,
        path: &str,
        family: LanguageFamily,
        record: &FunctionRecord,
        body: Option<&str>,
    ) -> io::Result<()> {
        writeln!(
            self.out,
            "[{}] {} start:{} end:{} {} {}",
            repo,
            path,
            record.start_line(),
            record.end_line(),
            family.type_label(record.kind()),
            record.name()
        )?;
        if self.show_body {
            if let Some(body) = body.filter(|b| !b.trim().is_empty()) {
                writeln!(self.out, "{}", body)?;
            }
        }
        writeln!(self.out, "{}", "-".repeat(SEPARATOR_WIDTH))
    }

    fn summary(&mut self, summary: &RunSummary) -> io::Result<()> {
        let mut line = format!(
            "Done. Printed {} functions across {} repos.",
            summary.functions, summary.repositories
        );
        if summary.failed > 0 {
            line.push_str(&format!(" {} failed.", summary.failed));
        }
        if summary.cancelled > 0 {
            line.push_str(&format!(" {} cancelled.", summary.cancelled));
        }
        self.line(StyleRole::Summary, &line)?;
        self.out.flush()
    }

    fn line(&mut self, role: StyleRole, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", role.paint(text, self.color))
    }
}
