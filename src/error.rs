//! Error types for sftp-deploy
//!
//! Only fatal conditions are modelled here. Everything a stage can survive is
//! reported through its stage report and the event sink instead.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for deploy operations
pub type DeployResult<T> = Result<T, DeployError>;

/// Fatal errors that stop the pipeline
#[derive(Error, Debug)]
pub enum DeployError {
    /// Build command exited non-zero
    #[error("build command '{command}' failed ({status})")]
    BuildFailed { command: String, status: String },

    /// Build command could not be started
    #[error("could not run build command '{command}': {source}")]
    BuildSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Local build output tree is absent when a sync is required
    #[error("build output not found: {path}")]
    BuildOutputMissing { path: PathBuf },

    /// Configuration file could not be parsed
    #[error("invalid configuration in {file}: {message}")]
    InvalidConfig { file: PathBuf, message: String },

    /// Configuration is syntactically valid but unusable
    #[error("configuration error: {0}")]
    ConfigValidation(String),

    /// Remote session could not be established
    #[error("could not connect to {host}:{port}: {message}")]
    Connect {
        host: String,
        port: u16,
        message: String,
    },

    /// Server host key does not match the pinned fingerprint
    #[error("host key mismatch for {host}: expected {expected}, got {actual}")]
    HostKeyMismatch {
        host: String,
        expected: String,
        actual: String,
    },

    /// Password authentication rejected
    #[error("authentication failed for {user}@{host}")]
    AuthFailed { user: String, host: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DeployError {
    /// Short hint printed under the error, when one exists
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            DeployError::BuildOutputMissing { .. } => {
                Some("Run the build first or drop --skip-build")
            }
            DeployError::AuthFailed { .. } => {
                Some("Check SFTP_DEPLOY_USER and SFTP_DEPLOY_PASSWORD")
            }
            DeployError::HostKeyMismatch { .. } => {
                Some("Verify the server fingerprint before updating remote.host_key_sha256")
            }
            DeployError::ConfigValidation(_) | DeployError::InvalidConfig { .. } => {
                Some("See deploy.toml or the SFTP_DEPLOY_* environment variables")
            }
            _ => None,
        }
    }
}
