//! S3: artifact bucket and upload

use crate::error::AwsError;
use crate::provider::AwsServices;
use async_trait::async_trait;
use aws_sdk_s3::operation::create_bucket::CreateBucketError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use chrono::{DateTime, Utc};
use shipflow_build::BuildTool;
use shipflow_cloud::{CloudError, ObjectStorage, ServiceMessage, UploadedArtifact};
use std::path::Path;

/// Region where S3 rejects an explicit LocationConstraint
const DEFAULT_S3_REGION: &str = "us-east-1";

const WAR_CONTENT_TYPE: &str = "application/java-archive";

/// How S3 answered a bucket creation that clashed with an existing bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BucketClash {
    /// Ours already; nothing to do
    OwnedByYou,
    /// Taken by another account
    Taken,
}

pub(crate) fn bucket_clash(err: &CreateBucketError) -> Option<BucketClash> {
    if err.is_bucket_already_owned_by_you() {
        Some(BucketClash::OwnedByYou)
    } else if err.is_bucket_already_exists() {
        Some(BucketClash::Taken)
    } else {
        None
    }
}

pub(crate) fn bucket_configuration(region: &str) -> Option<CreateBucketConfiguration> {
    if region == DEFAULT_S3_REGION {
        return None;
    }
    Some(
        CreateBucketConfiguration::builder()
            .location_constraint(BucketLocationConstraint::from(region))
            .build(),
    )
}

/// Millisecond UTC timestamp, so two deploys in one second get distinct keys
pub(crate) fn artifact_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y%m%d%H%M%S%3f").to_string()
}

/// Object key for an uploaded artifact: `<file stem>-<UTC timestamp>.war`
pub(crate) fn artifact_key(war: &Path, timestamp: &str) -> String {
    let stem = war
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("application");
    format!("{}-{}.war", stem, timestamp)
}

#[async_trait]
impl ObjectStorage for AwsServices {
    async fn create_bucket(&self, name: &str) -> shipflow_cloud::Result<ServiceMessage> {
        let result = self
            .s3
            .create_bucket()
            .bucket(name)
            .set_create_bucket_configuration(bucket_configuration(self.region()))
            .send()
            .await;

        let err = match result {
            Ok(_) => return Ok(ServiceMessage::new(format!("Bucket {} created", name))),
            Err(err) => err,
        };

        match err.as_service_error().and_then(bucket_clash) {
            Some(BucketClash::OwnedByYou) => Ok(ServiceMessage::new(format!(
                "Bucket {} already exists and is owned by you",
                name
            ))),
            Some(BucketClash::Taken) => {
                // the caller explains the name clash
                tracing::debug!("Bucket {} belongs to another account", name);
                Err(CloudError::Unspecified)
            }
            None => Err(AwsError::from(err).into()),
        }
    }

    async fn upload_artifact(
        &self,
        bucket: &str,
        build_tool: BuildTool,
    ) -> shipflow_cloud::Result<UploadedArtifact> {
        let war = build_tool
            .find_war(&self.project_root)
            .map_err(AwsError::from)?;
        let key = artifact_key(&war, &artifact_timestamp(Utc::now()));

        let body = ByteStream::from_path(&war)
            .await
            .map_err(|e| AwsError::Io(std::io::Error::other(e)))?;

        tracing::debug!("Uploading {} to s3://{}/{}", war.display(), bucket, key);
        self.s3
            .put_object()
            .bucket(bucket)
            .key(&key)
            .content_type(WAR_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(AwsError::from)?;

        Ok(UploadedArtifact {
            message: format!("{} uploaded to s3://{}/{}", war.display(), bucket, key),
            war_key: key,
        })
    }
}
