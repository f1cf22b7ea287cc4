//! shipflow Deployment Core
//!
//! Takes a web application from source to a running, database-backed
//! environment:
//!
//! 1. build the production artifact
//! 2. create the artifact bucket and upload into it
//! 3. create the managed database and wait for its URL
//! 4. verify hosting roles
//! 5. create or update the hosted application
//!
//! [`resolve_deployment`] turns the project settings into a
//! [`DeploymentConfig`]; [`DeploymentPipeline::run`] executes the steps.

pub mod error;
pub mod model;
pub mod pipeline;
pub mod resolver;
pub mod step;

pub use error::{BUCKET_IN_USE, DeploymentError, Result, UNSUPPORTED_DATABASE};
pub use model::{CUSTOM_SIZE, DbEngine, DeploymentConfig};
pub use pipeline::{DeploymentPipeline, PRODUCTION_PROFILE, PipelineObserver, SilentObserver};
pub use resolver::resolve_deployment;
pub use step::Step;
