use crate::core::error_handling::ContextualError;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Cannot locate the running executable: {0}")]
    CurrentExe(#[source] io::Error),

    #[error("Failed to spawn process for batch {batch}: {source}")]
    Spawn {
        batch: String,
        #[source]
        source: io::Error,
    },
}

impl ContextualError for PipelineError {
    fn is_user_actionable(&self) -> bool {
        false
    }

    fn user_message(&self) -> Option<&str> {
        None
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;
