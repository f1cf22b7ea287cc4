//! Deployment error types

use crate::step::Step;
use thiserror::Error;

/// Shown when the unrecognized database technology check fails
pub const UNSUPPORTED_DATABASE: &str = "Sorry deployment for this database is not possible";

/// Shown when bucket creation fails without a provider message
pub const BUCKET_IN_USE: &str =
    "The S3 bucket could not be created. Are you sure its name is not already used?";

/// Why a deployment stopped
///
/// Every variant is terminal for the run; the variants only differ in where
/// the failure came from and in the text reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeploymentError {
    /// Detected before any provisioning step ran
    #[error("{0}")]
    Configuration(String),

    #[error("{message}")]
    Build { message: String },

    #[error("{message}")]
    Provider { step: Step, message: String },
}

impl DeploymentError {
    pub fn configuration(message: impl Into<String>) -> Self {
        DeploymentError::Configuration(message.into())
    }

    pub fn provider(step: Step, message: impl Into<String>) -> Self {
        DeploymentError::Provider {
            step,
            message: message.into(),
        }
    }

    /// The step that failed; `None` for pre-flight configuration errors
    pub fn step(&self) -> Option<Step> {
        match self {
            DeploymentError::Configuration(_) => None,
            DeploymentError::Build { .. } => Some(Step::Build),
            DeploymentError::Provider { step, .. } => Some(*step),
        }
    }

    /// Message for the terminal, prefixed with the failing step
    pub fn user_message(&self) -> String {
        match self.step() {
            Some(step) => format!("{} failed: {}", step.title(), self),
            None => self.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DeploymentError>;
