//! Top-level application errors

use super::cli::ConfigError;
use crate::core::error_handling::ContextualError;
use crate::discovery::DiscoveryError;
use crate::pipeline::PipelineError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("{message}: {source}")]
    Workdir {
        message: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl AppError {
    pub fn workdir(path: &std::path::Path, source: std::io::Error) -> Self {
        AppError::Workdir {
            message: format!(
                "Cannot prepare staging directory {} (check --workdir)",
                path.display()
            ),
            source,
        }
    }

    /// Operation named in the fatal log line
    pub fn context(&self) -> &'static str {
        match self {
            AppError::Config(_) => "Configuration",
            AppError::Discovery(_) => "Repository discovery",
            AppError::Pipeline(_) => "Batch processes",
            AppError::Workdir { .. } => "Staging setup",
            AppError::Runtime(_) => "Startup",
        }
    }
}

impl ContextualError for AppError {
    fn is_user_actionable(&self) -> bool {
        match self {
            AppError::Config(e) => e.is_user_actionable(),
            AppError::Discovery(e) => e.is_user_actionable(),
            AppError::Workdir { .. } => true,
            AppError::Pipeline(_) | AppError::Runtime(_) => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            AppError::Config(e) => e.user_message(),
            AppError::Discovery(e) => e.user_message(),
            AppError::Workdir { message, .. } => Some(message),
            AppError::Pipeline(_) | AppError::Runtime(_) => None,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
