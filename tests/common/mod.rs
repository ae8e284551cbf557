//! Common test utilities and helpers
//!
//! Fetchers that stand in for the GitHub archive endpoint, plus helpers for
//! driving a pipeline run into a reporter.

#![allow(dead_code)]

use async_trait::async_trait;
use flate2::write::GzEncoder;
use flate2::Compression;
use repofuncs::core::shutdown::ShutdownCoordinator;
use repofuncs::pipeline::{BatchPlan, PipelineConfig, RunSummary, ScanPipeline};
use repofuncs::reporter::Reporter;
use repofuncs::scanner::archive::ARCHIVE_FILE_NAME;
use repofuncs::scanner::{
    Archive, ArchiveFetcher, FileFilter, RepositoryRef, ScanError, ScanResult, ScanTask,
    StagingArea,
};
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::sync::mpsc;

/// Writes a real gzip tarball per repository into its staging directory
#[derive(Default)]
pub struct TarballFetcher {
    repos: HashMap<String, Vec<(String, Vec<u8>)>>,
}

impl TarballFetcher {
    pub fn with_repo(mut self, full_name: &str, files: &[(&str, &str)]) -> Self {
        let files = files
            .iter()
            .map(|(path, content)| (path.to_string(), content.as_bytes().to_vec()))
            .collect();
        self.repos.insert(full_name.to_string(), files);
        self
    }

    pub fn with_binary(mut self, full_name: &str, path: &str, content: Vec<u8>) -> Self {
        self.repos
            .entry(full_name.to_string())
            .or_default()
            .push((path.to_string(), content));
        self
    }
}

#[async_trait]
impl ArchiveFetcher for TarballFetcher {
    async fn fetch(&self, task: &ScanTask, staging_dir: &Path) -> ScanResult<Archive> {
        let Some(files) = self.repos.get(&task.repo.full_name) else {
            return Err(ScanError::Status {
                repo: task.repo.full_name.clone(),
                status: 404,
            });
        };
        let target = staging_dir.join(ARCHIVE_FILE_NAME);
        write_tarball(&target, &task.repo, files);
        Ok(Archive::Tarball(target))
    }
}

/// Lay files out the way GitHub does: under `<owner>-<name>-<sha>/`
pub fn write_tarball(target: &Path, repo: &RepositoryRef, files: &[(String, Vec<u8>)]) {
    let prefix = format!("{}-{}-0123abc", repo.owner(), repo.name());
    let encoder = GzEncoder::new(File::create(target).unwrap(), Compression::fast());
    let mut builder = tar::Builder::new(encoder);

    let mut dir = tar::Header::new_gnu();
    dir.set_entry_type(tar::EntryType::Directory);
    dir.set_size(0);
    dir.set_mode(0o755);
    builder
        .append_data(&mut dir, format!("{}/", prefix), std::io::empty())
        .unwrap();

    for (path, content) in files {
        let mut header = tar::Header::new_gnu();
        header.set_size(content.len() as u64);
        header.set_mode(0o644);
        builder
            .append_data(&mut header, format!("{}/{}", prefix, path), content.as_slice())
            .unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
}

pub fn ranked(names: &[&str]) -> Vec<ScanTask> {
    ScanTask::from_ranked(
        names
            .iter()
            .map(|name| RepositoryRef::new(*name, "main"))
            .collect(),
    )
}

pub struct Rendered {
    pub output: String,
    pub summary: RunSummary,
    pub staging: TempDir,
}

/// Run the pipeline with a plain-text reporter writing into memory
pub async fn render_run(
    fetcher: TarballFetcher,
    tasks: Vec<ScanTask>,
    plan: BatchPlan,
    workers: usize,
    max_file_kb: u64,
    show_body: bool,
) -> Rendered {
    let staging = TempDir::new().unwrap();
    let (shutdown, _rx) = ShutdownCoordinator::new();
    let pipeline = ScanPipeline::new(
        PipelineConfig::new(workers, FileFilter::new(max_file_kb), show_body),
        Arc::new(fetcher),
        StagingArea::new(staging.path(), false),
        shutdown,
    );

    let (tx, rx) = mpsc::channel(16);
    let reporter = tokio::spawn(Reporter::new(Vec::new(), show_body, false).consume(rx));
    let summary = pipeline.run(tasks, plan, tx).await;
    let (bytes, reported) = reporter.await.unwrap();

    assert_eq!(reported.as_ref(), Some(&summary));
    Rendered {
        output: String::from_utf8(bytes).unwrap(),
        summary,
        staging,
    }
}
