//! Cloud service capability traits
//!
//! A deployment talks to four independent service groups. Each one is its own
//! trait so tests can fake them separately; [`CloudServices`] bundles them.

use crate::action::{
    ApplicationRequest, DatabaseRequest, DatabaseUrl, ServiceMessage, UploadedArtifact,
};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use shipflow_build::BuildTool;

/// Object storage holding the deployable artifact
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Ensure the named bucket exists.
    ///
    /// Must succeed against a bucket that already exists and is owned by the
    /// caller.
    async fn create_bucket(&self, name: &str) -> Result<ServiceMessage>;

    /// Upload the artifact produced by `build_tool` into `bucket`
    async fn upload_artifact(&self, bucket: &str, build_tool: BuildTool)
    -> Result<UploadedArtifact>;
}

/// Managed relational database
#[async_trait]
pub trait ManagedDatabase: Send + Sync {
    async fn create_database(&self, request: &DatabaseRequest) -> Result<ServiceMessage>;

    /// Wait until the database named `name` is reachable and build its
    /// connection string. Implementations bound their own polling.
    async fn resolve_url(&self, name: &str, engine: &str) -> Result<DatabaseUrl>;
}

/// Identity and access roles required by the hosting platform
#[async_trait]
pub trait RoleVerifier: Send + Sync {
    /// Succeeds once the required roles are present, creating them if needed
    async fn verify_roles(&self) -> Result<()>;
}

/// Managed application hosting
#[async_trait]
pub trait AppHosting: Send + Sync {
    async fn create_or_update_application(
        &self,
        request: &ApplicationRequest,
    ) -> Result<ServiceMessage>;
}

/// Every capability a deployment needs from one cloud account
#[async_trait]
pub trait CloudServices: Send + Sync {
    /// Returns the provider name (e.g., "aws")
    fn name(&self) -> &str;

    /// Check if the provider is properly configured and authenticated
    async fn check_auth(&self) -> Result<AuthStatus>;

    fn storage(&self) -> &dyn ObjectStorage;

    fn database(&self) -> &dyn ManagedDatabase;

    fn identity(&self) -> &dyn RoleVerifier;

    fn hosting(&self) -> &dyn AppHosting;
}

/// Authentication status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthStatus {
    /// Whether authentication is valid
    pub authenticated: bool,

    /// Account/user information if available
    pub account_info: Option<String>,

    /// Error message if not authenticated
    pub error: Option<String>,
}

impl AuthStatus {
    pub fn ok(account_info: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            account_info: Some(account_info.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            authenticated: false,
            account_info: None,
            error: Some(error.into()),
        }
    }
}
