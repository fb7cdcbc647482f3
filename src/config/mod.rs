//! Configuration module for sftp-deploy
//!
//! Replaces ambient constants with one `DeployConfig` value, built at
//! start-up and handed to every stage:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (SFTP_DEPLOY_*)
//! 3. Project config (deploy.toml) or explicit --config file
//! 4. User config (<config dir>/sftp-deploy/config.toml)
//! 5. Built-in defaults (lowest priority)

mod env_validator;
mod loader;
mod types;

pub use env_validator::levenshtein;
pub use loader::{
    load_layered, user_config_path, with_env_overrides, ConfigSource, ConfigWarning,
    ENV_BASE_DIR, ENV_HOST, ENV_PASSWORD, ENV_PORT, ENV_USER, ENV_WAIT_SECONDS,
    PROJECT_CONFIG_FILE,
};
pub use types::{
    BuildConfig, DeployConfig, GitConfig, RemoteConfig, ServerConfigFile, SymlinkConfig,
    WaitConfig,
};
