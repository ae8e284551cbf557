//! Application startup and run modes
//!
//! Exit status: 0 on success, 1 on a fatal error (configuration, discovery),
//! 2 when at least one repository or batch process failed, 130 when a
//! shutdown signal cancelled queued repositories.

use super::cli::{Args, RunSettings, Subset};
use super::error::{AppError, AppResult};
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::{init_logging, reconfigure_log_level};
use crate::core::shutdown::ShutdownCoordinator;
use crate::discovery::{http_client, GithubClient};
use crate::pipeline::{
    parse_batch_label, parse_batch_targets, Batch, BatchLauncher, BatchPlan, PipelineConfig,
    RunSummary, ScanPipeline,
};
use crate::reporter::Reporter;
use crate::scanner::{FileFilter, GithubArchiveFetcher, ScanTask, StagingArea};
use std::sync::Arc;
use tokio::sync::mpsc;

pub const EXIT_OK: i32 = 0;
pub const EXIT_FATAL: i32 = 1;
pub const EXIT_PARTIAL: i32 = 2;
pub const EXIT_CANCELLED: i32 = 130;

const EVENT_BUFFER: usize = 256;

/// Parse arguments, run, and return the process exit status
pub fn startup() -> i32 {
    let args = Args::parse_with_styles();

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("FATAL: {}", AppError::Runtime(e));
            return EXIT_FATAL;
        }
    };

    runtime.block_on(async_startup(args))
}

async fn async_startup(mut args: Args) -> i32 {
    // Log with CLI settings first so config problems are reported in the chosen format
    let cli_level = args.log_level.is_some();
    let log_file = args.log_file.as_ref().map(|p| p.to_string_lossy().into_owned());
    if let Err(e) = init_logging(
        &args.effective_log_level(),
        args.log_format.unwrap_or_default(),
        log_file.as_deref(),
        args.use_color(),
    ) {
        eprintln!("Failed to initialize logging: {}", e);
        return EXIT_FATAL;
    }

    match Args::load_config_file(args.config_file.as_deref()).await {
        Ok(Some((path, table))) => {
            log::debug!("Loading configuration from {}", path.display());
            if let Err(e) = args.apply_toml_values(&table) {
                log_error_with_context(&e, "Configuration");
                return EXIT_FATAL;
            }
        }
        Ok(None) => {}
        Err(e) => {
            log_error_with_context(&e, "Configuration");
            return EXIT_FATAL;
        }
    }
    if !cli_level && args.log_level.is_some() {
        if let Err(e) = reconfigure_log_level(&args.effective_log_level()) {
            log::warn!("Could not apply log-level from configuration file: {}", e);
        }
    }

    let settings = match args.into_settings() {
        Ok(settings) => settings,
        Err(e) => {
            log_error_with_context(&e, "Configuration");
            return EXIT_FATAL;
        }
    };
    log::debug!("Effective settings: {:?}", RedactedSettings(&settings));

    let result = ShutdownCoordinator::guard_with_coordinator(|coordinator, _shutdown_rx| {
        run(settings, coordinator)
    })
    .await;

    match result {
        Ok(code) => code,
        Err(e) => {
            log_error_with_context(&e, e.context());
            EXIT_FATAL
        }
    }
}

async fn run(settings: RunSettings, shutdown: ShutdownCoordinator) -> AppResult<i32> {
    let client = http_client()?;
    let github = GithubClient::new(client.clone(), settings.token.clone());
    let (repos, _total_count) = github
        .fetch_top_repositories(&settings.query, settings.top)
        .await?;
    let tasks = ScanTask::from_ranked(repos);

    if let Some(subset) = &settings.subset {
        return run_subset(&settings, subset, tasks, client, shutdown).await;
    }

    let targets = settings
        .batch_targets
        .as_deref()
        .map(|raw| parse_batch_targets(raw, settings.top))
        .transpose()
        .map_err(super::cli::ConfigError::invalid)?;
    let plan = BatchPlan::build(tasks.len(), targets.as_deref(), settings.chunk_size);
    if plan.is_empty() {
        return Ok(EXIT_OK);
    }

    if settings.parallel_processes {
        return run_batch_processes(&settings, &plan).await;
    }
    run_in_process(&settings, tasks, plan, client, shutdown).await
}

/// Child-process mode: scan one explicit rank range
async fn run_subset(
    settings: &RunSettings,
    subset: &Subset,
    tasks: Vec<ScanTask>,
    client: reqwest::Client,
    shutdown: ShutdownCoordinator,
) -> AppResult<i32> {
    let start = subset.start - 1;
    let end = subset.end.min(tasks.len());
    if start >= end {
        log::info!(
            "Ranks {}-{} are beyond the {} discovered repositories",
            subset.start,
            subset.end,
            tasks.len()
        );
        return Ok(EXIT_OK);
    }

    let (index, total) = subset
        .label
        .as_deref()
        .and_then(parse_batch_label)
        .unwrap_or((1, 1));
    let plan = BatchPlan::single(Batch::new(index, total, start + 1, end));
    let tasks: Vec<ScanTask> = tasks.into_iter().skip(start).take(end - start).collect();

    run_in_process(settings, tasks, plan, client, shutdown).await
}

async fn run_in_process(
    settings: &RunSettings,
    tasks: Vec<ScanTask>,
    plan: BatchPlan,
    client: reqwest::Client,
    shutdown: ShutdownCoordinator,
) -> AppResult<i32> {
    std::fs::create_dir_all(&settings.workdir)
        .map_err(|e| AppError::workdir(&settings.workdir, e))?;

    let pipeline = ScanPipeline::new(
        PipelineConfig::new(
            settings.workers,
            FileFilter::new(settings.max_file_kb),
            settings.show_body,
        ),
        Arc::new(GithubArchiveFetcher::new(client, settings.token.clone())),
        StagingArea::new(&settings.workdir, settings.keep_archives),
        shutdown,
    );

    let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
    let reporter = Reporter::new(std::io::stdout(), settings.show_body, settings.color);
    let reporter = tokio::spawn(reporter.consume(events_rx));

    let summary = pipeline.run(tasks, plan, events_tx).await;
    if let Err(e) = reporter.await {
        log::error!("Reporter task terminated abnormally: {}", e);
    }

    Ok(exit_code(&summary))
}

/// Parent of process-per-batch mode: one child per batch, all awaited
async fn run_batch_processes(settings: &RunSettings, plan: &BatchPlan) -> AppResult<i32> {
    let mut launcher = BatchLauncher::for_current_exe(settings.child_args())?;
    if let Some(token) = &settings.token {
        launcher = launcher.with_env("GITHUB_TOKEN", token);
    }

    let mut reporter = Reporter::new(std::io::stdout(), settings.show_body, settings.color);
    let report = |result: std::io::Result<()>| {
        if let Err(e) = result {
            log::warn!("Failed to write output: {}", e);
        }
    };

    report(reporter.processes_starting(plan.len()));
    let mut children = Vec::with_capacity(plan.len());
    let mut failed = 0usize;
    for batch in plan.batches() {
        report(reporter.batch_spawning(batch));
        match launcher.spawn(batch) {
            Ok(child) => children.push((*batch, child)),
            Err(e) => {
                log_error_with_context(&e, "Batch processes");
                failed += 1;
            }
        }
    }

    let spawned = children.len();
    for outcome in BatchLauncher::wait_all(children).await {
        if !outcome.succeeded() {
            failed += 1;
            report(reporter.batch_process_failed(&outcome));
        }
    }
    report(reporter.processes_finished(spawned));

    Ok(if failed > 0 { EXIT_PARTIAL } else { EXIT_OK })
}

pub fn exit_code(summary: &RunSummary) -> i32 {
    if summary.has_failures() {
        EXIT_PARTIAL
    } else if summary.was_cancelled() {
        EXIT_CANCELLED
    } else {
        EXIT_OK
    }
}

/// Debug view of settings without the token
struct RedactedSettings<'a>(&'a RunSettings);

impl std::fmt::Debug for RedactedSettings<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self.0;
        f.debug_struct("RunSettings")
            .field("query", &s.query)
            .field("top", &s.top)
            .field("token", &s.token.as_ref().map(|_| "<redacted>"))
            .field("max_file_kb", &s.max_file_kb)
            .field("workers", &s.workers)
            .field("chunk_size", &s.chunk_size)
            .field("batch_targets", &s.batch_targets)
            .field("show_body", &s.show_body)
            .field("workdir", &s.workdir)
            .field("keep_archives", &s.keep_archives)
            .field("parallel_processes", &s.parallel_processes)
            .field("subset", &s.subset)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_from_summary() {
        assert_eq!(exit_code(&RunSummary::default()), EXIT_OK);

        let failed = RunSummary {
            failed: 1,
            cancelled: 3,
            ..Default::default()
        };
        assert_eq!(exit_code(&failed), EXIT_PARTIAL);

        let cancelled = RunSummary {
            cancelled: 3,
            ..Default::default()
        };
        assert_eq!(exit_code(&cancelled), EXIT_CANCELLED);
    }
}
