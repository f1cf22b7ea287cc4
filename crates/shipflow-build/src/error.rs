use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Build wrapper not found: {0}")]
    WrapperNotFound(PathBuf),

    #[error("Unknown build tool: {0}")]
    UnknownTool(String),

    #[error("Build failed: {0}")]
    BuildFailed(String),

    #[error("Artifact not found in {0}")]
    ArtifactNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BuildError {
    /// Friendlier message for the terminal
    pub fn user_message(&self) -> String {
        match self {
            BuildError::WrapperNotFound(path) => {
                format!(
                    "Build wrapper not found: {}\n\
                     \n\
                     Run the deployment from the project root, next to mvnw or gradlew.",
                    path.display()
                )
            }
            BuildError::BuildFailed(msg) => {
                format!(
                    "The production build failed: {}\n\
                     \n\
                     Check the build output above.",
                    msg
                )
            }
            BuildError::ArtifactNotFound(dir) => {
                format!(
                    "No .war file was found in {}\n\
                     \n\
                     Make sure the project is packaged as a war.",
                    dir.display()
                )
            }
            _ => format!("{}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, BuildError>;
