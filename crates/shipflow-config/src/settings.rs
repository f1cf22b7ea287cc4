//! Project settings file
//!
//! Holds the project-wide facts (`baseName`, `buildTool`, `prodDatabaseType`)
//! and, once a deployment has been configured, the `aws` record. Credentials
//! are never written here.

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use shipflow_build::BuildTool;
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_BACKUP_SUFFIX: &str = "backup";

/// Contents of the project settings file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_tool: Option<BuildTool>,

    /// Production database technology declared by the project
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prod_database_type: Option<String>,

    /// Persisted deployment target, present after the first configured run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aws: Option<AwsSettings>,

    /// Keys owned by other tools, kept as they are
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The persisted `aws` record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsSettings {
    pub application_name: String,
    pub environment_name: String,
    pub bucket_name: String,
    pub instance_type: String,
    pub aws_region: String,
    pub db_name: String,
    pub db_instance_class: String,
}

/// Reads and writes the settings file
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn backup_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".");
        name.push(SETTINGS_BACKUP_SUFFIX);
        PathBuf::from(name)
    }

    /// Load the settings; a missing file yields empty settings
    pub fn load(&self) -> Result<ProjectSettings> {
        if !self.path.exists() {
            tracing::debug!("Settings file not found, returning empty settings");
            return Ok(ProjectSettings::default());
        }

        let content = fs::read_to_string(&self.path)?;
        let settings: ProjectSettings =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!(
            "Loaded settings from {} (aws record: {})",
            self.path.display(),
            settings.aws.is_some()
        );
        Ok(settings)
    }

    /// Save the settings, keeping the previous file as a backup
    pub fn save(&self, settings: &ProjectSettings) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        if self.path.exists() {
            fs::copy(&self.path, self.backup_path())?;
            tracing::debug!("Created settings backup");
        }

        let mut content = serde_json::to_string_pretty(settings)?;
        content.push('\n');
        fs::write(&self.path, content)?;

        tracing::debug!("Saved settings to {}", self.path.display());
        Ok(())
    }
}
