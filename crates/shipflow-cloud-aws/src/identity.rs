//! IAM: roles Elastic Beanstalk runs under

use crate::error::{AwsError, Result};
use crate::provider::AwsServices;
use async_trait::async_trait;
use shipflow_cloud::RoleVerifier;

pub(crate) const INSTANCE_ROLE: &str = "aws-elasticbeanstalk-ec2-role";
pub(crate) const SERVICE_ROLE: &str = "aws-elasticbeanstalk-service-role";

const POLICY_ARN_PREFIX: &str = "arn:aws:iam::aws:policy/";

/// An IAM role with the principal allowed to assume it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RoleDefinition {
    pub name: &'static str,
    pub principal: &'static str,
    pub policies: &'static [&'static str],
    /// Also expose the role to EC2 through an instance profile of the same name
    pub instance_profile: bool,
}

pub(crate) const REQUIRED_ROLES: [RoleDefinition; 2] = [
    RoleDefinition {
        name: INSTANCE_ROLE,
        principal: "ec2.amazonaws.com",
        policies: &["AWSElasticBeanstalkWebTier"],
        instance_profile: true,
    },
    RoleDefinition {
        name: SERVICE_ROLE,
        principal: "elasticbeanstalk.amazonaws.com",
        policies: &[
            "service-role/AWSElasticBeanstalkEnhancedHealth",
            "AWSElasticBeanstalkManagedUpdatesCustomerRolePolicy",
        ],
        instance_profile: false,
    },
];

/// Trust policy letting `principal` assume the role
pub(crate) fn trust_policy(principal: &str) -> String {
    serde_json::json!({
        "Version": "2012-10-17",
        "Statement": [{
            "Effect": "Allow",
            "Principal": { "Service": principal },
            "Action": "sts:AssumeRole"
        }]
    })
    .to_string()
}

impl AwsServices {
    async fn ensure_role(&self, role: &RoleDefinition) -> Result<()> {
        let found = match self.iam.get_role().role_name(role.name).send().await {
            Ok(_) => true,
            Err(e)
                if e
                    .as_service_error()
                    .is_some_and(|s| s.is_no_such_entity_exception()) =>
            {
                false
            }
            Err(e) => return Err(e.into()),
        };

        if found {
            tracing::debug!("Role {} present", role.name);
        } else {
            tracing::info!("Creating role {}", role.name);
            self.iam
                .create_role()
                .role_name(role.name)
                .assume_role_policy_document(trust_policy(role.principal))
                .send()
                .await?;

            for managed in role.policies {
                self.iam
                    .attach_role_policy()
                    .role_name(role.name)
                    .policy_arn(format!("{}{}", POLICY_ARN_PREFIX, managed))
                    .send()
                    .await?;
            }
        }

        if role.instance_profile {
            self.ensure_instance_profile(role.name).await?;
        }
        Ok(())
    }

    async fn ensure_instance_profile(&self, name: &str) -> Result<()> {
        match self
            .iam
            .get_instance_profile()
            .instance_profile_name(name)
            .send()
            .await
        {
            Ok(_) => return Ok(()),
            Err(e)
                if e
                    .as_service_error()
                    .is_some_and(|s| s.is_no_such_entity_exception()) => {}
            Err(e) => return Err(e.into()),
        }

        tracing::info!("Creating instance profile {}", name);
        self.iam
            .create_instance_profile()
            .instance_profile_name(name)
            .send()
            .await?;

        match self
            .iam
            .add_role_to_instance_profile()
            .instance_profile_name(name)
            .role_name(name)
            .send()
            .await
        {
            Ok(_) => Ok(()),
            // the profile already holds its one role
            Err(e)
                if e
                    .as_service_error()
                    .is_some_and(|s| s.is_limit_exceeded_exception()) =>
            {
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl RoleVerifier for AwsServices {
    async fn verify_roles(&self) -> shipflow_cloud::Result<()> {
        for role in &REQUIRED_ROLES {
            self.ensure_role(role).await.map_err(|e: AwsError| {
                tracing::warn!(
                    "Role {} could not be verified ({}): {}",
                    role.name,
                    e.code().unwrap_or("no error code"),
                    e
                );
                e
            })?;
        }
        Ok(())
    }
}
