//! AWS implementation of [`CloudServices`]

use crate::error::AwsError;
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use shipflow_cloud::{
    AppHosting, AuthStatus, CloudServices, ManagedDatabase, ObjectStorage, RoleVerifier,
    WaitConfig,
};
use std::path::{Path, PathBuf};

/// AWS account in one region, reached through the AWS SDK
pub struct AwsServices {
    pub(crate) s3: aws_sdk_s3::Client,
    pub(crate) rds: aws_sdk_rds::Client,
    pub(crate) iam: aws_sdk_iam::Client,
    pub(crate) beanstalk: aws_sdk_elasticbeanstalk::Client,
    sts: aws_sdk_sts::Client,
    region: String,
    pub(crate) project_root: PathBuf,
    pub(crate) wait: WaitConfig,
}

impl AwsServices {
    /// Load credentials the usual SDK way (environment, shared config,
    /// instance metadata), optionally from a named profile.
    ///
    /// `project_root` is where the build leaves the artifact to upload.
    pub async fn connect(
        region: impl Into<String>,
        profile: Option<&str>,
        project_root: impl AsRef<Path>,
    ) -> Self {
        let region = region.into();
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region.clone()));
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }
        let sdk_config = loader.load().await;

        tracing::debug!("AWS SDK configured for region {}", region);
        Self::from_sdk_config(&sdk_config, region, project_root)
    }

    pub fn from_sdk_config(
        sdk_config: &SdkConfig,
        region: impl Into<String>,
        project_root: impl AsRef<Path>,
    ) -> Self {
        Self {
            s3: aws_sdk_s3::Client::new(sdk_config),
            rds: aws_sdk_rds::Client::new(sdk_config),
            iam: aws_sdk_iam::Client::new(sdk_config),
            beanstalk: aws_sdk_elasticbeanstalk::Client::new(sdk_config),
            sts: aws_sdk_sts::Client::new(sdk_config),
            region: region.into(),
            project_root: project_root.as_ref().to_path_buf(),
            wait: WaitConfig::default(),
        }
    }

    /// Polling used while waiting for the database
    pub fn with_wait_config(mut self, wait: WaitConfig) -> Self {
        self.wait = wait;
        self
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

#[async_trait]
impl CloudServices for AwsServices {
    fn name(&self) -> &str {
        "aws"
    }

    async fn check_auth(&self) -> shipflow_cloud::Result<AuthStatus> {
        match self.sts.get_caller_identity().send().await {
            Ok(identity) => Ok(AuthStatus::ok(format!(
                "{} ({})",
                identity.account().unwrap_or("unknown account"),
                identity.arn().unwrap_or("unknown identity")
            ))),
            Err(e) => Ok(AuthStatus::failed(AwsError::from(e).to_string())),
        }
    }

    fn storage(&self) -> &dyn ObjectStorage {
        self
    }

    fn database(&self) -> &dyn ManagedDatabase {
        self
    }

    fn identity(&self) -> &dyn RoleVerifier {
        self
    }

    fn hosting(&self) -> &dyn AppHosting {
        self
    }
}
