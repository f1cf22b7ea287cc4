//! AWS provider error types

use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use shipflow_cloud::CloudError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsError {
    /// The service answered with an error. `code` is the AWS error code.
    #[error("{message}")]
    Service {
        code: Option<String>,
        message: String,
    },

    /// The request never got a service answer (credentials, network, timeout)
    #[error("AWS request failed: {0}")]
    Request(String),

    #[error("Unexpected AWS response: {0}")]
    UnexpectedResponse(String),

    #[error("Build artifact error: {0}")]
    Artifact(#[from] shipflow_build::BuildError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AwsError {
    /// Error reported by a service, keeping its code and message as sent
    pub fn from_service<E: ProvideErrorMetadata>(err: &E) -> Self {
        AwsError::Service {
            code: err.code().map(str::to_string),
            message: err.message().unwrap_or_default().to_string(),
        }
    }

    /// AWS error code, e.g. `NoSuchEntity`
    pub fn code(&self) -> Option<&str> {
        match self {
            AwsError::Service { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

impl<E, R> From<SdkError<E, R>> for AwsError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    fn from(err: SdkError<E, R>) -> Self {
        match err.as_service_error() {
            Some(service) => AwsError::from_service(service),
            None => AwsError::Request(DisplayErrorContext(&err).to_string()),
        }
    }
}

impl From<AwsError> for CloudError {
    fn from(err: AwsError) -> Self {
        match err {
            AwsError::Service { message, .. } => CloudError::ApiError(message),
            AwsError::Request(msg) | AwsError::UnexpectedResponse(msg) => CloudError::ApiError(msg),
            AwsError::Artifact(e) => CloudError::InvalidConfig(e.user_message()),
            AwsError::Io(e) => CloudError::Io(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, AwsError>;
