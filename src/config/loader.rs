//! Configuration loading
//!
//! Resolution order (highest first):
//! 1. Environment variables (`SFTP_DEPLOY_*`)
//! 2. Explicit `--config` file, else project `deploy.toml`
//! 3. User config (`<config dir>/sftp-deploy/config.toml`)
//! 4. Built-in defaults

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DeployError, DeployResult};

use super::env_validator::{levenshtein, EnvVarValidator};
use super::types::DeployConfig;

/// Project config file name
pub const PROJECT_CONFIG_FILE: &str = "deploy.toml";

pub const ENV_HOST: &str = "SFTP_DEPLOY_HOST";
pub const ENV_PORT: &str = "SFTP_DEPLOY_PORT";
pub const ENV_USER: &str = "SFTP_DEPLOY_USER";
pub const ENV_PASSWORD: &str = "SFTP_DEPLOY_PASSWORD";
pub const ENV_BASE_DIR: &str = "SFTP_DEPLOY_BASE_DIR";
pub const ENV_WAIT_SECONDS: &str = "SFTP_DEPLOY_WAIT_SECONDS";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Where the effective configuration came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

/// Load configuration and collect non-fatal warnings (unknown keys, secrets in file).
pub fn load_with_warnings(path: &Path) -> DeployResult<(DeployConfig, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: DeployConfig = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| DeployError::InvalidConfig {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut warnings: Vec<ConfigWarning> = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: key.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                message: format!("unknown key '{}'", path_str),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    if !config.remote.password.is_empty() {
        warnings.push(ConfigWarning {
            key: "password".to_string(),
            file: path.to_path_buf(),
            line: find_line_number(&content, "password"),
            message: format!("remote.password is stored in the file; prefer {}", ENV_PASSWORD),
            suggestion: None,
        });
    }

    Ok((config, warnings))
}

/// Resolve the configuration file and apply environment overrides.
///
/// An explicit path must exist. Without one, the project `deploy.toml` is
/// tried, then the user config, then defaults.
pub fn load_layered(
    explicit: Option<&Path>,
    project_root: &Path,
    get_env: impl Fn(&str) -> Option<String>,
) -> DeployResult<(DeployConfig, ConfigSource, Vec<ConfigWarning>)> {
    let candidate = match explicit {
        Some(path) => {
            if !path.is_file() {
                return Err(DeployError::ConfigValidation(format!(
                    "config file not found: {}",
                    path.display()
                )));
            }
            Some(path.to_path_buf())
        }
        None => {
            let project_config = project_root.join(PROJECT_CONFIG_FILE);
            if project_config.is_file() {
                Some(project_config)
            } else {
                user_config_path().filter(|p| p.is_file())
            }
        }
    };

    let (config, source, mut warnings) = match candidate {
        Some(path) => {
            let (config, warnings) = load_with_warnings(&path)?;
            (config, ConfigSource::File(path), warnings)
        }
        None => (DeployConfig::default(), ConfigSource::Defaults, Vec::new()),
    };

    let mut env_warnings = Vec::new();
    let config = with_env_overrides(config, &get_env, &mut env_warnings);
    warnings.extend(env_warnings);

    Ok((config, source, warnings))
}

/// Apply environment variable overrides (`SFTP_DEPLOY_*`)
pub fn with_env_overrides(
    mut config: DeployConfig,
    get_env: &impl Fn(&str) -> Option<String>,
    warnings: &mut Vec<ConfigWarning>,
) -> DeployConfig {
    if let Some(host) = get_env(ENV_HOST) {
        config.remote.host = host;
    }
    if let Some(user) = get_env(ENV_USER) {
        config.remote.username = user;
    }
    if let Some(password) = get_env(ENV_PASSWORD) {
        config.remote.password = password;
    }
    if let Some(base_dir) = get_env(ENV_BASE_DIR) {
        config.remote.base_dir = base_dir;
    }

    if let Some(port) = get_env(ENV_PORT) {
        let validator = EnvVarValidator::new(ENV_PORT, "a TCP port (1-65535)");
        config.remote.port = validator.parse(
            &port,
            |s| s.trim().parse::<u16>().ok().filter(|p| *p != 0),
            config.remote.port,
            warnings,
        );
    }

    if let Some(seconds) = get_env(ENV_WAIT_SECONDS) {
        let validator = EnvVarValidator::new(ENV_WAIT_SECONDS, "a number of seconds");
        config.wait.seconds = validator.parse(
            &seconds,
            |s| s.trim().parse::<u64>().ok(),
            config.wait.seconds,
            warnings,
        );
    }

    config
}

/// User-level config file location
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("sftp-deploy").join("config.toml"))
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "remote",
        "host",
        "port",
        "username",
        "password",
        "base_dir",
        "runtime_dir",
        "public_dir",
        "assets_dir",
        "host_key_sha256",
        "build",
        "command",
        "output_dir",
        "skip_dirs",
        "git",
        "enabled",
        "branch",
        "message",
        "paths",
        "wait",
        "seconds",
        "interval_seconds",
        "symlink",
        "name",
        "target",
        "server_config",
        "local_path",
        "remote_name",
        "required_tokens",
    ];

    let mut best: Option<(&str, usize)> = None;
    for &candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suggest_key_finds_close_match() {
        assert_eq!(suggest_key("usrname"), Some("username".to_string()));
        assert_eq!(suggest_key("completely_unrelated"), None);
    }

    #[test]
    fn find_line_number_is_one_based() {
        let content = "[remote]\nhost = \"x\"\n";
        assert_eq!(find_line_number(content, "host"), Some(2));
        assert_eq!(find_line_number(content, "port"), None);
    }
}
