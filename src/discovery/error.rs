//! Discovery Error Types

/// Failures while listing ranked repositories; all are fatal for a run
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the search API (rate limit, auth, invalid query)
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("no repositories matched query '{query}'")]
    NoResults { query: String },
}

impl DiscoveryError {
    fn is_request_problem(&self) -> bool {
        matches!(self, DiscoveryError::Api { status, .. } if matches!(status, 401 | 403 | 422))
    }
}

impl crate::core::error_handling::ContextualError for DiscoveryError {
    fn is_user_actionable(&self) -> bool {
        match self {
            DiscoveryError::Api { .. } => self.is_request_problem(),
            DiscoveryError::NoResults { .. } => true,
            DiscoveryError::Http(_) => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            DiscoveryError::Api { message, .. } if self.is_request_problem() => Some(message),
            DiscoveryError::NoResults { .. } => {
                Some("No repositories returned. Check query and API token/rate limits.")
            }
            _ => None,
        }
    }
}

pub type DiscoveryResult<T> = Result<T, DiscoveryError>;
