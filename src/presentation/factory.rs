//! Connector Factory
//!
//! Picks the remote target for a run. This is the dependency injection
//! point between the CLI and the infrastructure adapters.

use std::path::Path;

use crate::config::DeployConfig;
use crate::domain::ports::RemoteConnector;
use crate::infrastructure::{LocalConnector, SftpConnector};

/// SFTP from the config, or a local mirror when `local_root` is given
pub fn create_connector(
    config: &DeployConfig,
    local_root: Option<&Path>,
) -> Box<dyn RemoteConnector> {
    match local_root {
        Some(root) => Box::new(create_local_connector(config, root)),
        None => Box::new(SftpConnector::from_config(config)),
    }
}

/// Local mirror where the hosting account's base and public directories
/// already exist, like on a fresh account
pub fn create_local_connector(config: &DeployConfig, root: &Path) -> LocalConnector {
    LocalConnector::new(root, vec![config.base_dir(), config.public_dir()])
}
