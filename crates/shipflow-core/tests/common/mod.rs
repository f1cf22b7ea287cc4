use async_trait::async_trait;
use shipflow_build::{ArtifactBuilder, BuildError, BuildTool};
use shipflow_cloud::{
    AppHosting, ApplicationRequest, AuthStatus, CloudError, CloudServices, DatabaseRequest,
    DatabaseUrl, ManagedDatabase, ObjectStorage, RoleVerifier, ServiceMessage, UploadedArtifact,
};
use shipflow_core::{DbEngine, DeploymentConfig, Step};
use std::sync::{Arc, Mutex};

/// One collaborator call, as observed by the fakes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Build {
        tool: BuildTool,
        profile: String,
        war: bool,
    },
    CreateBucket(String),
    UploadArtifact {
        bucket: String,
        tool: BuildTool,
    },
    CreateDatabase(DatabaseRequest),
    ResolveUrl {
        name: String,
        engine: String,
    },
    VerifyRoles,
    Hosting(ApplicationRequest),
}

impl Call {
    pub fn step(&self) -> Step {
        match self {
            Call::Build { .. } => Step::Build,
            Call::CreateBucket(_) => Step::CreateBucket,
            Call::UploadArtifact { .. } => Step::UploadArtifact,
            Call::CreateDatabase(_) => Step::CreateDatabase,
            Call::ResolveUrl { .. } => Step::ResolveDatabaseUrl,
            Call::VerifyRoles => Step::VerifyRoles,
            Call::Hosting(_) => Step::CreateOrUpdateApplication,
        }
    }
}

/// How the fake fails at a given step
#[derive(Debug, Clone)]
pub enum Failure {
    Message(String),
    NoMessage,
}

impl Failure {
    fn to_cloud_error(&self) -> CloudError {
        match self {
            Failure::Message(msg) => CloudError::ApiError(msg.clone()),
            Failure::NoMessage => CloudError::Unspecified,
        }
    }
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

/// Records every call and fails at most one chosen step
#[derive(Default)]
pub struct FakeCloud {
    pub calls: CallLog,
    pub fail_at: Option<(Step, Failure)>,
}

impl FakeCloud {
    pub fn new(calls: CallLog) -> Self {
        Self {
            calls,
            fail_at: None,
        }
    }

    pub fn failing_at(calls: CallLog, step: Step, failure: Failure) -> Self {
        Self {
            calls,
            fail_at: Some((step, failure)),
        }
    }

    fn record(&self, call: Call) -> Result<(), CloudError> {
        let step = call.step();
        self.calls.lock().unwrap().push(call);
        match &self.fail_at {
            Some((failing, failure)) if *failing == step => Err(failure.to_cloud_error()),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ObjectStorage for FakeCloud {
    async fn create_bucket(&self, name: &str) -> Result<ServiceMessage, CloudError> {
        self.record(Call::CreateBucket(name.to_string()))?;
        Ok(ServiceMessage::new(format!("Bucket {} created", name)))
    }

    async fn upload_artifact(
        &self,
        bucket: &str,
        build_tool: BuildTool,
    ) -> Result<UploadedArtifact, CloudError> {
        self.record(Call::UploadArtifact {
            bucket: bucket.to_string(),
            tool: build_tool,
        })?;
        Ok(UploadedArtifact {
            war_key: "store-20240101000000.war".to_string(),
            message: "Uploaded".to_string(),
        })
    }
}

#[async_trait]
impl ManagedDatabase for FakeCloud {
    async fn create_database(&self, request: &DatabaseRequest) -> Result<ServiceMessage, CloudError> {
        self.record(Call::CreateDatabase(request.clone()))?;
        Ok(ServiceMessage::new("Database created"))
    }

    async fn resolve_url(&self, name: &str, engine: &str) -> Result<DatabaseUrl, CloudError> {
        self.record(Call::ResolveUrl {
            name: name.to_string(),
            engine: engine.to_string(),
        })?;
        Ok(DatabaseUrl {
            db_url: format!("jdbc:{}://db.example.internal:5432/{}", engine, name),
            message: "Database available".to_string(),
        })
    }
}

#[async_trait]
impl RoleVerifier for FakeCloud {
    async fn verify_roles(&self) -> Result<(), CloudError> {
        self.record(Call::VerifyRoles)
    }
}

#[async_trait]
impl AppHosting for FakeCloud {
    async fn create_or_update_application(
        &self,
        request: &ApplicationRequest,
    ) -> Result<ServiceMessage, CloudError> {
        self.record(Call::Hosting(request.clone()))?;
        Ok(ServiceMessage::new(format!(
            "Application {} {}d",
            request.application_name, request.action
        )))
    }
}

#[async_trait]
impl CloudServices for FakeCloud {
    fn name(&self) -> &str {
        "fake"
    }

    async fn check_auth(&self) -> Result<AuthStatus, CloudError> {
        Ok(AuthStatus::ok("test-account"))
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

/// Build collaborator sharing the call log with [`FakeCloud`]
pub struct FakeBuilder {
    pub calls: CallLog,
    pub fail: bool,
}

#[async_trait]
impl ArtifactBuilder for FakeBuilder {
    async fn build(&self, tool: BuildTool, profile: &str, war: bool) -> Result<(), BuildError> {
        self.calls.lock().unwrap().push(Call::Build {
            tool,
            profile: profile.to_string(),
            war,
        });
        if self.fail {
            return Err(BuildError::BuildFailed("maven exited with status 1".into()));
        }
        Ok(())
    }
}

pub fn new_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn steps_called(calls: &CallLog) -> Vec<Step> {
    calls.lock().unwrap().iter().map(Call::step).collect()
}

pub fn config(engine: DbEngine) -> DeploymentConfig {
    let mut config = DeploymentConfig::new(BuildTool::Maven, engine);
    config.base_name = "store".into();
    config.application_name = "store".into();
    config.environment_name = "store-prod".into();
    config.bucket_name = "store-artifacts".into();
    config.instance_type = "t3.small".into();
    config.db_instance_class = "db.t3.micro".into();
    config.aws_region = "eu-west-1".into();
    config.db_name = "storedb".into();
    config.db_username = "store".into();
    config.db_password = "s3cret-password".into();
    config
}
