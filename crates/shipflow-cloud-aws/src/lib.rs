//! AWS cloud services for shipflow
//!
//! Implements the `shipflow-cloud` capability traits on top of the AWS SDK:
//!
//! - **S3**: artifact bucket and WAR upload
//! - **RDS**: database instance and JDBC URL
//! - **IAM**: Elastic Beanstalk instance and service roles
//! - **Elastic Beanstalk**: application version and environment
//!
//! Credentials come from the SDK default chain (environment, shared config,
//! instance metadata), optionally narrowed to a named profile.

pub mod database;
pub mod error;
pub mod hosting;
pub mod identity;
pub mod provider;
pub mod storage;

pub use error::{AwsError, Result};
pub use provider::AwsServices;
