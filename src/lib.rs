//! sftp-deploy - build and publish a static front-end to shared hosting
//!
//! One run builds the project, commits and pushes the result, waits for the
//! host's git auto-deploy, then mirrors the build output over SFTP, repairs
//! the public symlink and uploads the web server config.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use application::{DeployReport, Pipeline, RunFlags, StageKind, StagePlan};
pub use config::DeployConfig;
pub use domain::ports::{DeployEvent, DeployEventSink, Level};
pub use error::{DeployError, DeployResult};
