//! RDS: database instance and connection URL

use crate::error::AwsError;
use crate::provider::AwsServices;
use async_trait::async_trait;
use aws_sdk_rds::operation::create_db_instance::builders::CreateDBInstanceFluentBuilder;
use aws_sdk_rds::types::DbInstance;
use shipflow_cloud::{
    CloudError, DatabaseRequest, DatabaseUrl, ManagedDatabase, ServiceMessage, poll_until,
};

const ALLOCATED_STORAGE_GB: i32 = 20;

/// Statuses an instance never leaves on its own
const TERMINAL_STATUSES: &[&str] = &[
    "failed",
    "deleting",
    "incompatible-credentials",
    "incompatible-network",
    "incompatible-parameters",
    "incompatible-restore",
    "inaccessible-encryption-credentials",
    "storage-full",
];

/// The master password travels in the signed request body only
pub(crate) fn create_db_instance_request(
    rds: &aws_sdk_rds::Client,
    request: &DatabaseRequest,
) -> CreateDBInstanceFluentBuilder {
    rds.create_db_instance()
        .db_instance_identifier(&request.name)
        .db_name(&request.name)
        .db_instance_class(&request.instance_class)
        .engine(&request.engine)
        .master_username(&request.username)
        .master_user_password(&request.password)
        .allocated_storage(ALLOCATED_STORAGE_GB)
        .publicly_accessible(false)
}

/// `Some(url)` once the instance is available
fn ready_url(
    instance: Option<&DbInstance>,
    name: &str,
    engine: &str,
) -> shipflow_cloud::Result<Option<String>> {
    let instance = instance
        .ok_or_else(|| CloudError::ResourceNotFound(format!("database instance {}", name)))?;
    let status = instance.db_instance_status().unwrap_or_default();

    if TERMINAL_STATUSES.contains(&status) {
        return Err(CloudError::ApiError(format!(
            "Database instance {} is in state '{}'",
            name, status
        )));
    }

    tracing::info!("Database {} status: {}", name, status);
    if status != "available" {
        return Ok(None);
    }

    let endpoint = instance
        .endpoint()
        .and_then(|e| Some((e.address()?, e.port()?)));
    Ok(endpoint
        .map(|(address, port)| format!("jdbc:{}://{}:{}/{}", engine, address, port, name)))
}

#[async_trait]
impl ManagedDatabase for AwsServices {
    async fn create_database(
        &self,
        request: &DatabaseRequest,
    ) -> shipflow_cloud::Result<ServiceMessage> {
        match create_db_instance_request(&self.rds, request).send().await {
            Ok(_) => Ok(ServiceMessage::new(format!(
                "Database instance {} ({}, {}) is being created",
                request.name, request.engine, request.instance_class
            ))),
            Err(e)
                if e
                    .as_service_error()
                    .is_some_and(|s| s.is_db_instance_already_exists_fault()) =>
            {
                Ok(ServiceMessage::new(format!(
                    "Database instance {} already exists",
                    request.name
                )))
            }
            Err(e) => Err(AwsError::from(e).into()),
        }
    }

    async fn resolve_url(&self, name: &str, engine: &str) -> shipflow_cloud::Result<DatabaseUrl> {
        let what = format!("database {}", name);
        let db_url = poll_until(&what, &self.wait, || async move {
            let described = self
                .rds
                .describe_db_instances()
                .db_instance_identifier(name)
                .send()
                .await
                .map_err(AwsError::from)?;
            ready_url(described.db_instances().first(), name, engine)
        })
        .await?;

        Ok(DatabaseUrl {
            message: format!("Database available at {}", db_url),
            db_url,
        })
    }
}
