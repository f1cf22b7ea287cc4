pub mod error;
pub mod settings;

pub use error::*;
pub use settings::{AwsSettings, ProjectSettings, SettingsStore};

use std::path::{Path, PathBuf};

/// Default settings file name in the project root
pub const SETTINGS_FILE: &str = ".shipflow.json";

/// Environment variable pointing directly at a settings file
pub const SETTINGS_PATH_ENV: &str = "SHIPFLOW_SETTINGS_PATH";

/// Resolve the settings file for a project.
///
/// 1. `SHIPFLOW_SETTINGS_PATH` if set (the file need not exist yet)
/// 2. `<project_root>/.shipflow.json`
pub fn settings_path(project_root: &Path) -> PathBuf {
    if let Ok(path) = std::env::var(SETTINGS_PATH_ENV)
        && !path.trim().is_empty()
    {
        return PathBuf::from(path);
    }

    project_root.join(SETTINGS_FILE)
}

/// Open the settings store for a project
pub fn open(project_root: &Path) -> SettingsStore {
    SettingsStore::new(settings_path(project_root))
}
