//! shipflow Cloud Services
//!
//! This crate describes what a deployment needs from a cloud account,
//! independent of any provider SDK or CLI.
//!
//! # Capability groups
//!
//! - **Object storage**: bucket creation, artifact upload
//! - **Managed database**: instance creation, connection-string resolution
//! - **Identity**: verification of the roles the hosting platform relies on
//! - **Application hosting**: create or update an application environment
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  shipflow CLI                    │
//! │                  (ship deploy)                   │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               shipflow-core                      │
//! │            DeploymentPipeline                    │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               shipflow-cloud                     │
//! │  trait CloudServices {                           │
//! │      storage / database / identity / hosting     │
//! │  }                                               │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//!           ┌───────▼───────┐
//!           │ shipflow-     │
//!           │ cloud-aws     │
//!           └───────────────┘
//! ```

pub mod action;
pub mod error;
pub mod provider;
pub mod wait;

// Re-exports
pub use action::{
    ApplicationRequest, DatabaseRequest, DatabaseUrl, HostingAction, ServiceMessage,
    UploadedArtifact,
};
pub use error::{CloudError, Result};
pub use provider::{
    AppHosting, AuthStatus, CloudServices, ManagedDatabase, ObjectStorage, RoleVerifier,
};
pub use wait::{WaitConfig, poll_until};
