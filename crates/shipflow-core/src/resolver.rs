//! New vs. existing deployment detection

use crate::error::{DeploymentError, Result, UNSUPPORTED_DATABASE};
use crate::model::{DbEngine, DeploymentConfig};
use shipflow_build::BuildTool;
use shipflow_config::ProjectSettings;

/// Build the starting configuration from the project settings.
///
/// The database technology check runs first and unconditionally: an
/// unsupported technology aborts before anything else is looked at. When the
/// settings carry an `aws` record the deployment is an existing one and its
/// fields are pre-filled; otherwise they are left for the caller to collect.
pub fn resolve_deployment(settings: &ProjectSettings) -> Result<DeploymentConfig> {
    let db_engine = match settings.prod_database_type.as_deref() {
        Some(technology) => DbEngine::from_technology(technology)?,
        None => return Err(DeploymentError::configuration(UNSUPPORTED_DATABASE)),
    };

    let build_tool = settings.build_tool.unwrap_or_else(|| {
        tracing::warn!("buildTool not set in project settings, assuming maven");
        BuildTool::Maven
    });

    let mut config = DeploymentConfig::new(build_tool, db_engine);
    config.base_name = settings.base_name.clone().unwrap_or_default();

    if let Some(saved) = &settings.aws {
        tracing::info!(
            "Existing deployment found for application {}",
            saved.application_name
        );
        config.apply_saved(saved);
    }

    Ok(config)
}
