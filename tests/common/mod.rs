//! Common test utilities for the CLI tests.
//!
//! `TestEnv` owns a project directory, a local mirror standing in for the
//! hosting server, and an isolated home so no user config leaks in.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Remote `base_dir` written into the test `deploy.toml`
pub const BASE_DIR: &str = "/home/u1/site";

pub const HTACCESS: &str = "Options +FollowSymlinks\n\
RewriteEngine On\n\
RewriteRule ^$ /nodejs/index.html [L]\n\
RewriteRule ^(.*)$ /nodejs/$1 [L]\n";

const DEFAULT_CONFIG: &str = r#"[remote]
base_dir = "/home/u1/site"

[build]
command = ["sh", "-c", "exit 0"]
"#;

/// Result of running the CLI
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

pub struct TestEnv {
    pub project: TempDir,
    pub mirror: TempDir,
    pub home: TempDir,
}

impl TestEnv {
    /// Project with the default `deploy.toml` and nothing else
    pub fn new() -> Self {
        let env = Self {
            project: TempDir::new().expect("project dir"),
            mirror: TempDir::new().expect("mirror dir"),
            home: TempDir::new().expect("home dir"),
        };
        env.write("deploy.toml", DEFAULT_CONFIG);
        env
    }

    /// Project with a build output tree and a server config
    pub fn with_site() -> Self {
        let env = Self::new();
        env.write("dist/index.html", "<!doctype html>");
        env.write("dist/assets/app.js", "console.log('hi')");
        env.write("dist/downloads/report.pdf", "%PDF-1.4");
        env.write("hostinger/public_html.htaccess", HTACCESS);
        env
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.project.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, content).expect("write project file");
    }

    /// Mirror location of `<base_dir>/<relative>`
    pub fn remote(&self, relative: &str) -> PathBuf {
        let base = BASE_DIR.trim_start_matches('/');
        let mut path = self.mirror.path().join(base);
        for part in relative.split('/').filter(|p| !p.is_empty()) {
            path = path.join(part);
        }
        path
    }

    pub fn read_remote(&self, relative: &str) -> String {
        std::fs::read_to_string(self.remote(relative))
            .unwrap_or_else(|e| panic!("remote file {} missing: {}", relative, e))
    }

    /// Run against the local mirror with the given extra flags
    pub fn deploy(&self, args: &[&str]) -> TestResult {
        let mirror = self.mirror.path().to_string_lossy().to_string();
        let mut full = vec!["--local-root", mirror.as_str()];
        full.extend_from_slice(args);
        self.run(&full)
    }

    pub fn run(&self, args: &[&str]) -> TestResult {
        let output = self
            .command()
            .args(args)
            .output()
            .expect("Failed to execute sftp-deploy");

        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(bin());
        cmd.current_dir(self.project.path())
            .env("HOME", self.home.path())
            .env("USERPROFILE", self.home.path())
            .env("XDG_CONFIG_HOME", self.home.path().join(".config"))
            .env("NO_COLOR", "1")
            .env("LC_ALL", "C");
        for key in [
            "SFTP_DEPLOY_HOST",
            "SFTP_DEPLOY_PORT",
            "SFTP_DEPLOY_USER",
            "SFTP_DEPLOY_PASSWORD",
            "SFTP_DEPLOY_BASE_DIR",
            "SFTP_DEPLOY_WAIT_SECONDS",
        ] {
            cmd.env_remove(key);
        }
        cmd
    }
}

pub fn bin() -> &'static Path {
    Path::new(env!("CARGO_BIN_EXE_sftp-deploy"))
}

/// Every file below `dir`, as `/`-separated paths relative to it
pub fn list_files(dir: &Path) -> Vec<String> {
    fn walk(root: &Path, dir: &Path, out: &mut Vec<String>) {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            let is_real_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            if is_real_dir {
                walk(root, &path, out);
            } else if let Ok(rel) = path.strip_prefix(root) {
                out.push(rel.to_string_lossy().replace('\\', "/"));
            }
        }
    }

    let mut out = Vec::new();
    walk(dir, dir, &mut out);
    out.sort();
    out
}
