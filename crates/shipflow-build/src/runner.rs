//! External build invocation

use crate::error::{BuildError, Result};
use crate::tool::BuildTool;
use async_trait::async_trait;
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Produces a deployable artifact
#[async_trait]
pub trait ArtifactBuilder: Send + Sync {
    /// Build with `tool` for `profile`. Output goes straight to the terminal.
    async fn build(&self, tool: BuildTool, profile: &str, war: bool) -> Result<()>;
}

/// Runs the project's own `mvnw` / `gradlew` wrapper
pub struct WrapperBuilder {
    project_root: PathBuf,
}

impl WrapperBuilder {
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            project_root: project_root.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl ArtifactBuilder for WrapperBuilder {
    async fn build(&self, tool: BuildTool, profile: &str, war: bool) -> Result<()> {
        let wrapper = tool.wrapper(&self.project_root);
        if !wrapper.exists() {
            return Err(BuildError::WrapperNotFound(wrapper));
        }

        let args = tool.build_args(profile, war);
        println!(
            "  {} {} {}",
            "→".blue(),
            wrapper.display(),
            args.join(" ")
        );
        tracing::debug!("Running: {} {}", wrapper.display(), args.join(" "));

        let status = Command::new(&wrapper)
            .args(&args)
            .current_dir(&self.project_root)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;

        if !status.success() {
            let reason = match status.code() {
                Some(code) => format!("{} exited with status {}", tool, code),
                None => format!("{} was terminated by a signal", tool),
            };
            return Err(BuildError::BuildFailed(reason));
        }

        Ok(())
    }
}
