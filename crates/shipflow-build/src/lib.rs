//! shipflow production build
//!
//! This crate runs the project's build wrapper to produce a deployable
//! artifact and knows where each build tool leaves it.

pub mod error;
pub mod progress;
pub mod runner;
pub mod tool;

pub use error::{BuildError, Result};
pub use progress::StepProgress;
pub use runner::{ArtifactBuilder, WrapperBuilder};
pub use tool::BuildTool;
