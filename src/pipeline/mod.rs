//! Scan Pipeline
//!
//! Runs repository scans with bounded concurrency and turns their results into
//! an ordered stream of `PipelineEvent`s for the Reporter.
//!
//! ## Core Features
//!
//! - **BatchPlan**: partitions ranks into chunk-size or checkpoint batches
//! - **ScanPipeline**: `W` workers over a shared queue, one aggregator task
//!   owning all progress counters
//! - **BatchLauncher**: process-per-batch mode, one child per batch

pub mod batch;
pub mod error;
pub mod events;
pub mod pool;
pub mod process;
mod progress;

pub use batch::{parse_batch_label, parse_batch_targets, Batch, BatchPlan};
pub use error::{PipelineError, PipelineResult};
pub use events::{PipelineEvent, RunSummary};
pub use pool::{PipelineConfig, ScanPipeline, DEFAULT_WORKERS};
pub use process::{BatchLauncher, BatchOutcome};

#[cfg(test)]
mod tests;
