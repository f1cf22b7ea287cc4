//! Provisioning steps, in execution order

use serde::{Deserialize, Serialize};

/// One provisioning step of a deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Step {
    Build,
    CreateBucket,
    UploadArtifact,
    CreateDatabase,
    ResolveDatabaseUrl,
    VerifyRoles,
    CreateOrUpdateApplication,
}

impl Step {
    /// Every step, in the only order they may run
    pub const ALL: [Step; 7] = [
        Step::Build,
        Step::CreateBucket,
        Step::UploadArtifact,
        Step::CreateDatabase,
        Step::ResolveDatabaseUrl,
        Step::VerifyRoles,
        Step::CreateOrUpdateApplication,
    ];

    /// Header printed when the step starts
    pub fn title(&self) -> &'static str {
        match self {
            Step::Build => "Building application",
            Step::CreateBucket => "Create S3 bucket",
            Step::UploadArtifact => "Upload WAR to S3",
            Step::CreateDatabase => "Create database",
            Step::ResolveDatabaseUrl => "Waiting for database (This may take several minutes)",
            Step::VerifyRoles => "Verifying ElasticBeanstalk Roles",
            Step::CreateOrUpdateApplication => "Create/Update application",
        }
    }

    /// 1-based position, for "[3/7]" style progress
    pub fn number(&self) -> usize {
        Step::ALL
            .iter()
            .position(|s| s == self)
            .map(|i| i + 1)
            .unwrap_or_default()
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Step::Build => write!(f, "build"),
            Step::CreateBucket => write!(f, "create-bucket"),
            Step::UploadArtifact => write!(f, "upload-artifact"),
            Step::CreateDatabase => write!(f, "create-database"),
            Step::ResolveDatabaseUrl => write!(f, "resolve-database-url"),
            Step::VerifyRoles => write!(f, "verify-roles"),
            Step::CreateOrUpdateApplication => write!(f, "create-or-update-application"),
        }
    }
}
