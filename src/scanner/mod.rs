//! Scanner Component
//!
//! Everything needed to turn one repository snapshot into function records:
//! classification, filtering, archive transport, staging and the lazy
//! per-repository scan.
//!
//! ## Core Features
//!
//! - **Source Classifier**: extension to language family mapping
//! - **File Filter**: size cutoff plus vendored/build directory exclusion
//! - **Archive Transport**: tarball download behind the `ArchiveFetcher` seam
//! - **Staging**: private per-repository directories with cleanup on drop
//! - **Repository Scan**: lazy iterator of scan messages ending in one
//!   repository-done marker

pub mod archive;
pub mod classify;
pub mod error;
pub mod filter;
pub mod staging;
pub mod task;
pub mod types;

pub use archive::{Archive, ArchiveEntry, ArchiveFetcher, GithubArchiveFetcher};
pub use classify::classify;
pub use error::{ScanError, ScanResult};
pub use filter::{is_eligible, FileFilter, SKIP_DIRS};
pub use staging::{StagingArea, StagingDir};
pub use task::{scan, RepositoryScan};
pub use types::{RepositoryRef, ScanMessage, ScanStats, ScanTask};

#[cfg(test)]
mod tests;
