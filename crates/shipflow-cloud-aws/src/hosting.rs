//! Elastic Beanstalk: application, version and environment

use crate::error::{AwsError, Result};
use crate::identity::{INSTANCE_ROLE, SERVICE_ROLE};
use crate::provider::AwsServices;
use async_trait::async_trait;
use aws_sdk_elasticbeanstalk::operation::create_environment::builders::CreateEnvironmentFluentBuilder;
use aws_sdk_elasticbeanstalk::operation::update_environment::builders::UpdateEnvironmentFluentBuilder;
use aws_sdk_elasticbeanstalk::types::{
    ConfigurationOptionSetting, EnvironmentDescription, EnvironmentStatus, S3Location,
};
use shipflow_cloud::{AppHosting, ApplicationRequest, HostingAction, ServiceMessage};

/// Spring profile the deployed application runs with
const SPRING_PROFILE: &str = "prod";

/// Platform family the WAR is deployed on
const PLATFORM: &str = "Tomcat";

fn setting(namespace: &str, option_name: &str, value: &str) -> ConfigurationOptionSetting {
    ConfigurationOptionSetting::builder()
        .namespace(namespace)
        .option_name(option_name)
        .value(value)
        .build()
}

/// Environment configuration, sent on both create and update
pub(crate) fn option_settings(request: &ApplicationRequest) -> Vec<ConfigurationOptionSetting> {
    const LAUNCH: &str = "aws:autoscaling:launchconfiguration";
    const ENVIRONMENT: &str = "aws:elasticbeanstalk:environment";
    const APP_ENV: &str = "aws:elasticbeanstalk:application:environment";

    vec![
        setting(LAUNCH, "InstanceType", &request.instance_type),
        setting(LAUNCH, "IamInstanceProfile", INSTANCE_ROLE),
        setting(ENVIRONMENT, "ServiceRole", SERVICE_ROLE),
        setting(APP_ENV, "SPRING_PROFILES_ACTIVE", SPRING_PROFILE),
        setting(APP_ENV, "SPRING_DATASOURCE_URL", &request.db_url),
        setting(APP_ENV, "SPRING_DATASOURCE_USERNAME", &request.db_username),
        setting(APP_ENV, "SPRING_DATASOURCE_PASSWORD", &request.db_password),
    ]
}

/// Version label for an uploaded artifact: its key without the extension
pub(crate) fn version_label(war_key: &str) -> &str {
    war_key.strip_suffix(".war").unwrap_or(war_key)
}

/// Newest stack of the platform family, as listed by the service (newest first)
pub(crate) fn pick_solution_stack<'a>(stacks: &'a [String], platform: &str) -> Option<&'a str> {
    stacks
        .iter()
        .find(|s| s.contains(platform))
        .map(String::as_str)
}

fn is_live(environment: &EnvironmentDescription) -> bool {
    !matches!(
        environment.status(),
        Some(EnvironmentStatus::Terminated | EnvironmentStatus::Terminating)
    )
}

impl AwsServices {
    async fn application_exists(&self, name: &str) -> Result<bool> {
        let described = self
            .beanstalk
            .describe_applications()
            .application_names(name)
            .send()
            .await?;
        Ok(!described.applications().is_empty())
    }

    async fn environment_is_live(&self, application: &str, environment: &str) -> Result<bool> {
        let described = self
            .beanstalk
            .describe_environments()
            .application_name(application)
            .environment_names(environment)
            .send()
            .await?;
        Ok(described.environments().iter().any(is_live))
    }

    async fn create_version(&self, request: &ApplicationRequest, label: &str) -> Result<()> {
        let bundle = S3Location::builder()
            .s3_bucket(&request.bucket_name)
            .s3_key(&request.war_key)
            .build();
        self.beanstalk
            .create_application_version()
            .application_name(&request.application_name)
            .version_label(label)
            .source_bundle(bundle)
            .send()
            .await?;
        Ok(())
    }

    pub(crate) fn create_environment_request(
        &self,
        request: &ApplicationRequest,
        label: &str,
        stack: &str,
    ) -> CreateEnvironmentFluentBuilder {
        self.beanstalk
            .create_environment()
            .application_name(&request.application_name)
            .environment_name(&request.environment_name)
            .solution_stack_name(stack)
            .version_label(label)
            .set_option_settings(Some(option_settings(request)))
    }

    /// Moves a live environment to `label`, refreshing its configuration too
    pub(crate) fn update_environment_request(
        &self,
        request: &ApplicationRequest,
        label: &str,
    ) -> UpdateEnvironmentFluentBuilder {
        self.beanstalk
            .update_environment()
            .application_name(&request.application_name)
            .environment_name(&request.environment_name)
            .version_label(label)
            .set_option_settings(Some(option_settings(request)))
    }

    async fn create_environment(&self, request: &ApplicationRequest, label: &str) -> Result<()> {
        let stacks = self
            .beanstalk
            .list_available_solution_stacks()
            .send()
            .await?;
        let stack = pick_solution_stack(stacks.solution_stacks(), PLATFORM).ok_or_else(|| {
            AwsError::UnexpectedResponse(format!("no {} solution stack available", PLATFORM))
        })?;
        tracing::debug!("Using solution stack {}", stack);

        self.create_environment_request(request, label, stack)
            .send()
            .await?;
        Ok(())
    }

    async fn deploy_application(&self, request: &ApplicationRequest) -> Result<String> {
        let label = version_label(&request.war_key);

        if !self.application_exists(&request.application_name).await? {
            tracing::info!("Creating application {}", request.application_name);
            self.beanstalk
                .create_application()
                .application_name(&request.application_name)
                .send()
                .await?;
        }

        self.create_version(request, label).await?;

        let update = request.action == HostingAction::Update
            && self
                .environment_is_live(&request.application_name, &request.environment_name)
                .await?;

        if update {
            self.update_environment_request(request, label)
                .send()
                .await?;
            Ok(format!(
                "Environment {} is updating to version {}",
                request.environment_name, label
            ))
        } else {
            if request.action == HostingAction::Update {
                tracing::warn!(
                    "Environment {} not found, creating it",
                    request.environment_name
                );
            }
            self.create_environment(request, label).await?;
            Ok(format!(
                "Environment {} is launching with version {}",
                request.environment_name, label
            ))
        }
    }
}

#[async_trait]
impl AppHosting for AwsServices {
    async fn create_or_update_application(
        &self,
        request: &ApplicationRequest,
    ) -> shipflow_cloud::Result<ServiceMessage> {
        let message = self.deploy_application(request).await?;
        Ok(ServiceMessage::new(message))
    }
}
