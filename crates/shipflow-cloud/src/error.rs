//! Cloud service error types

use thiserror::Error;

/// Cloud service errors
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("{0}")]
    ApiError(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    /// The provider failed without saying why
    #[error("provider returned no error message")]
    Unspecified,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CloudError {
    /// The human-readable message reported by the provider, if it gave one.
    ///
    /// An `ApiError` carrying only whitespace counts as absent; any other
    /// text is returned unchanged.
    pub fn provider_message(&self) -> Option<String> {
        match self {
            CloudError::Unspecified => None,
            CloudError::ApiError(msg) if msg.trim().is_empty() => None,
            CloudError::ApiError(msg) => Some(msg.clone()),
            other => Some(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;
