//! Configuration type definitions

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::RemotePath;
use crate::error::DeployResult;

use super::loader::{self, ConfigWarning};

/// SFTP connection and remote layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    /// Prefer `SFTP_DEPLOY_PASSWORD`; accepted here with a warning
    pub password: String,
    /// Application directory on the server, e.g. `/home/u123/domains/example.com`
    pub base_dir: String,
    /// Sync target, relative to `base_dir`
    pub runtime_dir: String,
    /// Directory served by the web server, relative to `base_dir`
    pub public_dir: String,
    /// Purged before every sync, relative to `runtime_dir`
    pub assets_dir: String,
    /// Optional SHA-256 host key pin (hex, `:` separators allowed)
    pub host_key_sha256: Option<String>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: 22,
            username: String::new(),
            password: String::new(),
            base_dir: String::new(),
            runtime_dir: "nodejs".to_string(),
            public_dir: "public_html".to_string(),
            assets_dir: "assets".to_string(),
            host_key_sha256: None,
        }
    }
}

/// Build stage and local output tree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Program followed by its arguments
    pub command: Vec<String>,
    /// Build output, relative to the project root
    pub output_dir: String,
    /// Directory names never synced, at any depth
    pub skip_dirs: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            command: vec!["npm".to_string(), "run".to_string(), "build".to_string()],
            output_dir: "dist".to_string(),
            skip_dirs: vec!["downloads".to_string()],
        }
    }
}

/// Version-control publish stage
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GitConfig {
    pub enabled: bool,
    pub remote: String,
    pub branch: String,
    pub message: String,
    /// Extra paths staged with `git add -f`; empty means the build output dir
    pub paths: Vec<String>,
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            remote: "origin".to_string(),
            branch: "main".to_string(),
            message: "deploy: update build output".to_string(),
            paths: Vec::new(),
        }
    }
}

/// Deploy-wait timer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitConfig {
    pub seconds: u64,
    pub interval_seconds: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            seconds: 60,
            interval_seconds: 10,
        }
    }
}

/// Symlink enforced inside the public directory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SymlinkConfig {
    /// Link name, relative to the public directory
    pub name: String,
    /// Link target, stored verbatim
    pub target: String,
}

impl Default for SymlinkConfig {
    fn default() -> Self {
        Self {
            name: "nodejs".to_string(),
            target: "../nodejs".to_string(),
        }
    }
}

/// Web server configuration file pushed into the public directory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfigFile {
    /// Local file, relative to the project root
    pub local_path: String,
    /// File name inside the public directory
    pub remote_name: String,
    /// Literal substrings that must be present after upload.
    /// Empty means the defaults derived from `remote.runtime_dir`.
    pub required_tokens: Vec<String>,
}

impl Default for ServerConfigFile {
    fn default() -> Self {
        Self {
            local_path: "hostinger/public_html.htaccess".to_string(),
            remote_name: ".htaccess".to_string(),
            required_tokens: Vec::new(),
        }
    }
}

/// Complete deploy configuration, built once at start-up
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DeployConfig {
    pub remote: RemoteConfig,
    pub build: BuildConfig,
    pub git: GitConfig,
    pub wait: WaitConfig,
    pub symlink: SymlinkConfig,
    pub server_config: ServerConfigFile,
}

impl DeployConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> DeployResult<Self> {
        loader::load_with_warnings(path).map(|(config, _)| config)
    }

    /// Load configuration from a TOML file and return non-fatal warnings
    pub fn load_with_warnings(path: &Path) -> DeployResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    pub fn base_dir(&self) -> RemotePath {
        RemotePath::new(self.remote.base_dir.as_str())
    }

    /// Remote mirror of the build output tree
    pub fn runtime_dir(&self) -> RemotePath {
        self.base_dir().join(&self.remote.runtime_dir)
    }

    pub fn public_dir(&self) -> RemotePath {
        self.base_dir().join(&self.remote.public_dir)
    }

    pub fn assets_dir(&self) -> RemotePath {
        self.runtime_dir().join(&self.remote.assets_dir)
    }

    pub fn symlink_path(&self) -> RemotePath {
        self.public_dir().join(&self.symlink.name)
    }

    pub fn server_config_remote_path(&self) -> RemotePath {
        self.public_dir().join(&self.server_config.remote_name)
    }

    /// Tokens the uploaded server config must contain
    pub fn required_tokens(&self) -> Vec<String> {
        if !self.server_config.required_tokens.is_empty() {
            return self.server_config.required_tokens.clone();
        }
        let runtime = self.remote.runtime_dir.trim_matches('/');
        vec![
            "FollowSymlinks".to_string(),
            format!("/{}/index.html", runtime),
            format!("/{}/$1", runtime),
        ]
    }

    /// Paths staged with `git add -f`
    pub fn git_paths(&self) -> Vec<String> {
        if self.git.paths.is_empty() {
            vec![self.build.output_dir.clone()]
        } else {
            self.git.paths.clone()
        }
    }

    /// Check everything a run needs before any stage starts.
    ///
    /// `needs_sftp` is false when deploying into a local mirror directory.
    pub fn validate(&self, needs_sftp: bool) -> DeployResult<()> {
        use crate::error::DeployError;

        if needs_sftp {
            let required = [
                ("remote.host / SFTP_DEPLOY_HOST", &self.remote.host),
                ("remote.username / SFTP_DEPLOY_USER", &self.remote.username),
                ("SFTP_DEPLOY_PASSWORD", &self.remote.password),
            ];
            for (name, value) in required {
                if value.trim().is_empty() {
                    return Err(DeployError::ConfigValidation(format!("{} is not set", name)));
                }
            }
        }

        if self.remote.base_dir.trim().is_empty() {
            return Err(DeployError::ConfigValidation(
                "remote.base_dir / SFTP_DEPLOY_BASE_DIR is not set".to_string(),
            ));
        }
        if !self.remote.base_dir.starts_with('/') {
            return Err(DeployError::ConfigValidation(format!(
                "remote.base_dir must be absolute, got '{}'",
                self.remote.base_dir
            )));
        }

        let segments = [
            ("remote.runtime_dir", &self.remote.runtime_dir),
            ("remote.public_dir", &self.remote.public_dir),
            ("remote.assets_dir", &self.remote.assets_dir),
            ("symlink.name", &self.symlink.name),
            ("server_config.remote_name", &self.server_config.remote_name),
            ("build.output_dir", &self.build.output_dir),
        ];
        for (name, value) in segments {
            RemotePath::validate_relative(value).map_err(|e| {
                DeployError::ConfigValidation(format!("{}: {} ('{}')", name, e, value))
            })?;
        }

        if self.build.command.first().map_or(true, |p| p.trim().is_empty()) {
            return Err(DeployError::ConfigValidation(
                "build.command must name a program".to_string(),
            ));
        }
        if self.symlink.target.trim().is_empty() {
            return Err(DeployError::ConfigValidation(
                "symlink.target is empty".to_string(),
            ));
        }
        if self.wait.seconds > 0 && self.wait.interval_seconds == 0 {
            return Err(DeployError::ConfigValidation(
                "wait.interval_seconds must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}
