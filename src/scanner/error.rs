//! Scanner Error Types

use std::path::PathBuf;

/// Failures isolated to a single repository scan
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// Transport failure while downloading a snapshot
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Snapshot endpoint answered with a non-success status
    #[error("archive download returned HTTP {status} for {repo}")]
    Status { repo: String, status: u16 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Corrupt or unreadable archive entry
    #[error("archive error: {message}")]
    Archive { message: String },

    /// Staging path exists but is not a directory we can reuse
    #[error("staging path is not a directory: {0}")]
    StagingConflict(PathBuf),

    /// The blocking scan task panicked or was aborted
    #[error("scan task failed: {message}")]
    Task { message: String },
}

impl ScanError {
    pub fn archive(message: impl Into<String>) -> Self {
        ScanError::Archive {
            message: message.into(),
        }
    }
}

impl crate::core::error_handling::ContextualError for ScanError {
    fn is_user_actionable(&self) -> bool {
        match self {
            ScanError::StagingConflict(_) => true, // User can clear or move the workdir
            ScanError::Http(_)
            | ScanError::Status { .. }
            | ScanError::Io(_)
            | ScanError::Archive { .. }
            | ScanError::Task { .. } => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ScanError::StagingConflict(_) => {
                Some("Staging path is occupied by a file; choose another --workdir")
            }
            _ => None,
        }
    }
}

pub type ScanResult<T> = Result<T, ScanError>;
