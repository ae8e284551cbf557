//! Process-per-batch execution
//!
//! Re-invokes the running executable once per batch, passing the shared
//! options plus the batch's rank range and label. Children inherit stdout and
//! stderr and are all awaited before returning.

use super::batch::Batch;
use super::error::{PipelineError, PipelineResult};
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitStatus;
use tokio::process::{Child, Command};

/// Exit status of one batch child
#[derive(Debug, Clone, Copy)]
pub struct BatchOutcome {
    pub batch: Batch,
    pub status: Option<ExitStatus>,
}

impl BatchOutcome {
    pub fn succeeded(&self) -> bool {
        self.status.is_some_and(|status| status.success())
    }

    /// Exit code, or -1 when the child was killed by a signal or could not be awaited
    pub fn code(&self) -> i32 {
        self.status.and_then(|status| status.code()).unwrap_or(-1)
    }
}

#[derive(Debug, Clone)]
pub struct BatchLauncher {
    program: PathBuf,
    common_args: Vec<OsString>,
    envs: Vec<(OsString, OsString)>,
}

impl BatchLauncher {
    pub fn new(program: impl Into<PathBuf>, common_args: Vec<OsString>) -> Self {
        Self {
            program: program.into(),
            common_args,
            envs: Vec::new(),
        }
    }

    /// Extra environment for every child
    pub fn with_env(mut self, key: impl Into<OsString>, value: impl Into<OsString>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Launcher that re-runs the current executable
    pub fn for_current_exe(common_args: Vec<OsString>) -> PipelineResult<Self> {
        let program = std::env::current_exe().map_err(PipelineError::CurrentExe)?;
        Ok(Self::new(program, common_args))
    }

    /// Full argument list for a batch child
    pub fn args_for(&self, batch: &Batch) -> Vec<OsString> {
        let mut args = self.common_args.clone();
        args.extend(
            [
                "--subset-start".to_string(),
                batch.start_rank.to_string(),
                "--subset-end".to_string(),
                batch.end_rank.to_string(),
                "--batch-label".to_string(),
                batch.label(),
            ]
            .map(OsString::from),
        );
        args
    }

    pub fn spawn(&self, batch: &Batch) -> PipelineResult<Child> {
        log::debug!(
            "Spawning {} for batch {} (ranks {}-{})",
            self.program.display(),
            batch,
            batch.start_rank,
            batch.end_rank
        );
        Command::new(&self.program)
            .args(self.args_for(batch))
            .envs(self.envs.iter().map(|(k, v)| (k, v)))
            .spawn()
            .map_err(|source| PipelineError::Spawn {
                batch: batch.label(),
                source,
            })
    }

    /// Wait for every child, in any completion order
    pub async fn wait_all(children: Vec<(Batch, Child)>) -> Vec<BatchOutcome> {
        let waits = children.into_iter().map(|(batch, mut child)| async move {
            let status = match child.wait().await {
                Ok(status) => Some(status),
                Err(e) => {
                    log::error!("Failed waiting for batch {}: {}", batch, e);
                    None
                }
            };
            BatchOutcome { batch, status }
        });
        futures::future::join_all(waits).await
    }
}
