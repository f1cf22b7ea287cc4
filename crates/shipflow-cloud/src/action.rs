//! Request and response payloads exchanged with cloud services

use serde::{Deserialize, Serialize};

/// Plain acknowledgement returned by a provisioning call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceMessage {
    /// Human-readable message describing what happened
    pub message: String,
}

impl ServiceMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Result of uploading the build artifact into object storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedArtifact {
    /// Object key the artifact was stored under
    pub war_key: String,

    pub message: String,
}

/// Connection string of a provisioned database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseUrl {
    pub db_url: String,

    pub message: String,
}

/// Whether the hosted application is created or updated in place
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostingAction {
    /// First deployment: create application and environment
    Create,
    /// Re-deployment: roll a new version onto the existing environment
    Update,
}

impl HostingAction {
    pub fn for_existing(existing_project: bool) -> Self {
        if existing_project {
            HostingAction::Update
        } else {
            HostingAction::Create
        }
    }
}

impl std::fmt::Display for HostingAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostingAction::Create => write!(f, "create"),
            HostingAction::Update => write!(f, "update"),
        }
    }
}

/// Everything the hosting service needs to create or update an application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationRequest {
    pub application_name: String,
    pub bucket_name: String,
    pub war_key: String,
    pub environment_name: String,
    pub db_url: String,
    pub db_username: String,
    pub db_password: String,
    pub instance_type: String,
    pub action: HostingAction,
}

/// Parameters for provisioning a managed database instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseRequest {
    pub instance_class: String,
    pub name: String,
    /// Engine name as understood by the provider at creation time
    pub engine: String,
    pub username: String,
    pub password: String,
}
