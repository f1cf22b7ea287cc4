//! Deployment pipeline
//!
//! Runs [`Step::ALL`] in order against one [`DeploymentConfig`]. Each step
//! either succeeds and may record state for later steps, or fails and stops
//! the run. Nothing is retried and nothing provisioned earlier is rolled back.

use crate::error::{BUCKET_IN_USE, DeploymentError, Result};
use crate::model::DeploymentConfig;
use crate::step::Step;
use shipflow_build::ArtifactBuilder;
use shipflow_cloud::{
    ApplicationRequest, CloudError, CloudServices, DatabaseRequest, HostingAction,
};

/// Build profile used for deployments
pub const PRODUCTION_PROFILE: &str = "prod";

/// Receives progress notifications; purely cosmetic
pub trait PipelineObserver: Send + Sync {
    fn step_started(&self, _step: Step) {}

    /// `message` is what the service reported, if anything
    fn step_succeeded(&self, _step: Step, _message: Option<&str>) {}

    fn step_failed(&self, _step: Step, _error: &DeploymentError) {}
}

/// Observer that ignores everything
pub struct SilentObserver;

impl PipelineObserver for SilentObserver {}

pub struct DeploymentPipeline<'a> {
    services: &'a dyn CloudServices,
    builder: &'a dyn ArtifactBuilder,
    observer: &'a dyn PipelineObserver,
}

impl<'a> DeploymentPipeline<'a> {
    pub fn new(services: &'a dyn CloudServices, builder: &'a dyn ArtifactBuilder) -> Self {
        Self {
            services,
            builder,
            observer: &SilentObserver,
        }
    }

    pub fn with_observer(mut self, observer: &'a dyn PipelineObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Deploy `config`, returning it with `war_key` and `db_url` filled in
    pub async fn run(&self, mut config: DeploymentConfig) -> Result<DeploymentConfig> {
        config.validate()?;

        for step in Step::ALL {
            tracing::info!("Step {}/{}: {}", step.number(), Step::ALL.len(), step);
            self.observer.step_started(step);

            match self.execute(step, &mut config).await {
                Ok(message) => {
                    self.observer.step_succeeded(step, message.as_deref());
                }
                Err(e) => {
                    tracing::error!("Step {} failed: {}", step, e);
                    self.observer.step_failed(step, &e);
                    return Err(e);
                }
            }
        }

        Ok(config)
    }

    async fn execute(&self, step: Step, config: &mut DeploymentConfig) -> Result<Option<String>> {
        match step {
            Step::Build => {
                self.builder
                    .build(config.build_tool, PRODUCTION_PROFILE, true)
                    .await
                    .map_err(|e| DeploymentError::Build {
                        message: e.user_message(),
                    })?;
                Ok(None)
            }

            Step::CreateBucket => {
                let created = self
                    .services
                    .storage()
                    .create_bucket(&config.bucket_name)
                    .await
                    .map_err(|e| {
                        DeploymentError::provider(
                            step,
                            e.provider_message()
                                .unwrap_or_else(|| BUCKET_IN_USE.to_string()),
                        )
                    })?;
                Ok(Some(created.message))
            }

            Step::UploadArtifact => {
                let uploaded = self
                    .services
                    .storage()
                    .upload_artifact(&config.bucket_name, config.build_tool)
                    .await
                    .map_err(|e| provider_error(step, e))?;
                config.record_war_key(uploaded.war_key);
                Ok(Some(uploaded.message))
            }

            Step::CreateDatabase => {
                let request = DatabaseRequest {
                    instance_class: config.effective_db_instance_class().to_string(),
                    name: config.db_name.clone(),
                    engine: config.db_engine.creation_name().to_string(),
                    username: config.db_username.clone(),
                    password: config.db_password.clone(),
                };
                let created = self
                    .services
                    .database()
                    .create_database(&request)
                    .await
                    .map_err(|e| provider_error(step, e))?;
                Ok(Some(created.message))
            }

            Step::ResolveDatabaseUrl => {
                // postgres -> postgresql, only from here on
                let engine = config.db_engine.url_name();
                let resolved = self
                    .services
                    .database()
                    .resolve_url(&config.db_name, engine)
                    .await
                    .map_err(|e| provider_error(step, e))?;
                config.record_db_url(resolved.db_url);
                Ok(Some(resolved.message))
            }

            Step::VerifyRoles => {
                self.services
                    .identity()
                    .verify_roles()
                    .await
                    .map_err(|e| provider_error(step, e))?;
                Ok(None)
            }

            Step::CreateOrUpdateApplication => {
                let request = application_request(config, step)?;
                let deployed = self
                    .services
                    .hosting()
                    .create_or_update_application(&request)
                    .await
                    .map_err(|e| provider_error(step, e))?;
                Ok(Some(deployed.message))
            }
        }
    }
}

fn provider_error(step: Step, error: CloudError) -> DeploymentError {
    let message = error
        .provider_message()
        .unwrap_or_else(|| error.to_string());
    DeploymentError::provider(step, message)
}

fn application_request(config: &DeploymentConfig, step: Step) -> Result<ApplicationRequest> {
    // only reachable if the steps ran out of order
    let war_key = config
        .war_key()
        .ok_or_else(|| DeploymentError::provider(step, "artifact was not uploaded"))?;
    let db_url = config
        .db_url()
        .ok_or_else(|| DeploymentError::provider(step, "database URL was not resolved"))?;

    Ok(ApplicationRequest {
        application_name: config.application_name.clone(),
        bucket_name: config.bucket_name.clone(),
        war_key: war_key.to_string(),
        environment_name: config.environment_name.clone(),
        db_url: db_url.to_string(),
        db_username: config.db_username.clone(),
        db_password: config.db_password.clone(),
        instance_type: config.effective_instance_type().to_string(),
        action: HostingAction::for_existing(config.existing_project),
    })
}
