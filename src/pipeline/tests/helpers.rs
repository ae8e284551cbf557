use crate::core::shutdown::ShutdownCoordinator;
use crate::pipeline::{BatchPlan, PipelineConfig, PipelineEvent, RunSummary, ScanPipeline};
use crate::scanner::{
    Archive, ArchiveEntry, ArchiveFetcher, FileFilter, RepositoryRef, ScanError, ScanResult,
    ScanTask, StagingArea,
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc;

/// Serves in-memory archives; repositories without an archive fail with 404
#[derive(Default)]
pub struct MockFetcher {
    archives: HashMap<String, Vec<ArchiveEntry>>,
    /// Per-rank delay to shuffle completion order
    jitter: bool,
}

impl MockFetcher {
    pub fn with_repo(mut self, full_name: &str, files: &[(&str, &str)]) -> Self {
        let entries = files
            .iter()
            .map(|(path, content)| ArchiveEntry::new(*path, content.as_bytes()))
            .collect();
        self.archives.insert(full_name.to_string(), entries);
        self
    }

    pub fn with_jitter(mut self) -> Self {
        self.jitter = true;
        self
    }
}

#[async_trait]
impl ArchiveFetcher for MockFetcher {
    async fn fetch(&self, task: &ScanTask, staging_dir: &Path) -> ScanResult<Archive> {
        assert!(staging_dir.is_dir(), "staging directory must exist during fetch");
        if self.jitter {
            let millis = ((task.rank * 7) % 5) as u64;
            tokio::time::sleep(Duration::from_millis(millis)).await;
        }
        match self.archives.get(&task.repo.full_name) {
            Some(entries) => Ok(Archive::from_entries(entries.clone())),
            None => Err(ScanError::Status {
                repo: task.repo.full_name.clone(),
                status: 404,
            }),
        }
    }
}

pub fn tasks(names: &[String]) -> Vec<ScanTask> {
    ScanTask::from_ranked(
        names
            .iter()
            .map(|name| RepositoryRef::new(name.as_str(), "main"))
            .collect(),
    )
}

pub fn repo_names(count: usize) -> Vec<String> {
    (1..=count).map(|i| format!("owner/repo{:02}", i)).collect()
}

/// Fetcher with `count` repositories, each holding a couple of source files
pub fn populated_fetcher(names: &[String]) -> MockFetcher {
    names.iter().fold(MockFetcher::default(), |fetcher, name| {
        fetcher.with_repo(
            name,
            &[
                ("src/app.js", "function start() {\n  run();\n}\n"),
                ("lib/util.py", "def helper(x):\n    return x\n\nasync def go():\n    pass\n"),
                ("README.md", "# readme\n"),
            ],
        )
    })
}

pub struct Run {
    pub events: Vec<PipelineEvent>,
    pub summary: RunSummary,
    pub staging: TempDir,
}

pub async fn run_pipeline(
    fetcher: MockFetcher,
    tasks: Vec<ScanTask>,
    plan: BatchPlan,
    workers: usize,
    shutdown: ShutdownCoordinator,
) -> Run {
    let staging = TempDir::new().unwrap();
    let pipeline = ScanPipeline::new(
        PipelineConfig::new(workers, FileFilter::new(128), false),
        Arc::new(fetcher),
        StagingArea::new(staging.path(), false),
        shutdown,
    );

    let (tx, mut rx) = mpsc::channel(16);
    let collector = tokio::spawn(async move {
        let mut events = Vec::new();
        while let Some(event) = rx.recv().await {
            events.push(event);
        }
        events
    });

    let summary = pipeline.run(tasks, plan, tx).await;
    let events = collector.await.unwrap();
    Run {
        events,
        summary,
        staging,
    }
}

/// Order-insensitive view of found functions and completed repositories
pub fn outcome_set(events: &[PipelineEvent]) -> HashSet<String> {
    events
        .iter()
        .filter_map(|event| match event {
            PipelineEvent::FunctionFound {
                repo, path, record, ..
            } => Some(format!(
                "fn {} {} {}:{} {}",
                repo,
                path,
                record.start_line(),
                record.end_line(),
                record.name()
            )),
            PipelineEvent::RepositoryDone { repo, stats, .. } => {
                Some(format!("done {} {}", repo, stats.functions))
            }
            _ => None,
        })
        .collect()
}
