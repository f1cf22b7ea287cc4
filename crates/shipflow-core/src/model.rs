//! Deployment configuration and the state accumulated while deploying

use crate::error::{DeploymentError, Result, UNSUPPORTED_DATABASE};
use serde::{Deserialize, Serialize};
use shipflow_build::BuildTool;
use shipflow_config::AwsSettings;

/// Sizing value that defers to the companion free-text field
pub const CUSTOM_SIZE: &str = "custom";

/// Database engine of the managed instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DbEngine {
    MariaDb,
    MySql,
    Postgres,
}

impl DbEngine {
    /// Map the project's declared production database technology.
    ///
    /// Case-insensitive; only MariaDB, MySQL and PostgreSQL can be deployed.
    pub fn from_technology(technology: &str) -> Result<Self> {
        match technology.trim().to_ascii_lowercase().as_str() {
            "mariadb" => Ok(DbEngine::MariaDb),
            "mysql" => Ok(DbEngine::MySql),
            "postgresql" => Ok(DbEngine::Postgres),
            _ => Err(DeploymentError::configuration(UNSUPPORTED_DATABASE)),
        }
    }

    /// Engine name used when creating the instance
    pub fn creation_name(&self) -> &'static str {
        match self {
            DbEngine::MariaDb => "mariadb",
            DbEngine::MySql => "mysql",
            DbEngine::Postgres => "postgres",
        }
    }

    /// Engine name used when building the connection URL.
    ///
    /// Differs from [`creation_name`](Self::creation_name) only for PostgreSQL.
    pub fn url_name(&self) -> &'static str {
        match self {
            DbEngine::Postgres => "postgresql",
            other => other.creation_name(),
        }
    }
}

impl std::fmt::Display for DbEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.creation_name())
    }
}

/// Everything one deployment run needs, plus what it learns along the way.
///
/// `war_key` and `db_url` are written by the pipeline, once each, and are
/// absent until their producing step succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentConfig {
    pub base_name: String,
    pub build_tool: BuildTool,

    pub application_name: String,
    pub environment_name: String,
    pub bucket_name: String,

    pub instance_type: String,
    pub custom_instance_type: String,
    pub db_instance_class: String,
    pub custom_db_instance_class: String,

    pub aws_region: String,

    pub db_name: String,
    pub db_engine: DbEngine,
    pub db_username: String,
    pub db_password: String,

    /// Loaded from a previous run's settings
    pub existing_project: bool,

    war_key: Option<String>,
    db_url: Option<String>,
}

impl DeploymentConfig {
    /// Empty configuration for a fresh deployment
    pub fn new(build_tool: BuildTool, db_engine: DbEngine) -> Self {
        Self {
            base_name: String::new(),
            build_tool,
            application_name: String::new(),
            environment_name: String::new(),
            bucket_name: String::new(),
            instance_type: String::new(),
            custom_instance_type: String::new(),
            db_instance_class: String::new(),
            custom_db_instance_class: String::new(),
            aws_region: String::new(),
            db_name: String::new(),
            db_engine,
            db_username: String::new(),
            db_password: String::new(),
            existing_project: false,
            war_key: None,
            db_url: None,
        }
    }

    /// Fill the persisted fields from a previous run.
    ///
    /// Custom overrides are cleared, they are asked for again every run.
    pub fn apply_saved(&mut self, saved: &AwsSettings) {
        self.application_name = saved.application_name.clone();
        self.environment_name = saved.environment_name.clone();
        self.bucket_name = saved.bucket_name.clone();
        self.instance_type = saved.instance_type.clone();
        self.custom_instance_type.clear();
        self.aws_region = saved.aws_region.clone();
        self.db_name = saved.db_name.clone();
        self.db_instance_class = saved.db_instance_class.clone();
        self.custom_db_instance_class.clear();
        self.existing_project = true;
    }

    /// The record persisted after configuration; never contains credentials
    pub fn to_settings(&self) -> AwsSettings {
        AwsSettings {
            application_name: self.application_name.clone(),
            environment_name: self.environment_name.clone(),
            bucket_name: self.bucket_name.clone(),
            instance_type: self.instance_type.clone(),
            aws_region: self.aws_region.clone(),
            db_name: self.db_name.clone(),
            db_instance_class: self.db_instance_class.clone(),
        }
    }

    /// Instance type sent to the provider, honouring the custom override
    pub fn effective_instance_type(&self) -> &str {
        resolve_size(&self.instance_type, &self.custom_instance_type)
    }

    /// Database instance class sent to the provider, honouring the custom override
    pub fn effective_db_instance_class(&self) -> &str {
        resolve_size(&self.db_instance_class, &self.custom_db_instance_class)
    }

    pub fn war_key(&self) -> Option<&str> {
        self.war_key.as_deref()
    }

    pub fn db_url(&self) -> Option<&str> {
        self.db_url.as_deref()
    }

    pub(crate) fn record_war_key(&mut self, war_key: String) {
        debug_assert!(self.war_key.is_none(), "war_key is write-once");
        self.war_key = Some(war_key);
    }

    pub(crate) fn record_db_url(&mut self, db_url: String) {
        debug_assert!(self.db_url.is_none(), "db_url is write-once");
        self.db_url = Some(db_url);
    }

    /// Check that every value a provisioning step reads is present
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("application name", &self.application_name),
            ("environment name", &self.environment_name),
            ("bucket name", &self.bucket_name),
            ("AWS region", &self.aws_region),
            ("instance type", &self.instance_type),
            ("database instance class", &self.db_instance_class),
            ("database name", &self.db_name),
            ("database username", &self.db_username),
            ("database password", &self.db_password),
        ];

        let missing: Vec<&str> = required
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| *name)
            .collect();

        if !missing.is_empty() {
            return Err(DeploymentError::configuration(format!(
                "Missing deployment settings: {}",
                missing.join(", ")
            )));
        }

        if self.effective_instance_type().trim().is_empty() {
            return Err(DeploymentError::configuration(
                "Instance type is 'custom' but no custom instance type was given",
            ));
        }
        if self.effective_db_instance_class().trim().is_empty() {
            return Err(DeploymentError::configuration(
                "Database instance class is 'custom' but no custom class was given",
            ));
        }

        Ok(())
    }
}

fn resolve_size<'a>(tier: &'a str, custom: &'a str) -> &'a str {
    if tier == CUSTOM_SIZE { custom } else { tier }
}
