//! SFTP Implementation
//!
//! Implements the RemoteFs port over a single blocking SSH session
//! (libssh2 via the `ssh2` crate). Password authentication only; the server
//! host key can be pinned by its SHA-256 digest.

use crate::domain::ports::{
    EntryKind, FsError, FsResult, RemoteConnector, RemoteFs, RemoteSession,
};
use crate::domain::value_objects::RemotePath;
use crate::error::{DeployError, DeployResult};
use ssh2::{ErrorCode, FileStat, HashType, Session, Sftp};
use std::io::Read;
use std::net::TcpStream;
use std::path::{Path, PathBuf};

// libssh2 SFTP status codes
const FX_NO_SUCH_FILE: i32 = 2;
const FX_PERMISSION_DENIED: i32 = 3;
const FX_NO_SUCH_PATH: i32 = 10;

const DIR_MODE: i32 = 0o755;

/// Connection parameters for `SftpConnector`
#[derive(Debug, Clone)]
pub struct SftpConnector {
    host: String,
    port: u16,
    username: String,
    password: String,
    host_key_sha256: Option<String>,
}

impl SftpConnector {
    pub fn new(
        host: impl Into<String>,
        port: u16,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            username: username.into(),
            password: password.into(),
            host_key_sha256: None,
        }
    }

    /// Require the server host key to hash to `fingerprint` (hex, `:` allowed)
    pub fn with_host_key(mut self, fingerprint: Option<String>) -> Self {
        self.host_key_sha256 = fingerprint;
        self
    }

    pub fn from_config(config: &crate::config::DeployConfig) -> Self {
        Self::new(
            config.remote.host.as_str(),
            config.remote.port,
            config.remote.username.as_str(),
            config.remote.password.as_str(),
        )
        .with_host_key(config.remote.host_key_sha256.clone())
    }

    fn connect_error(&self, message: impl ToString) -> DeployError {
        DeployError::Connect {
            host: self.host.clone(),
            port: self.port,
            message: message.to_string(),
        }
    }

    fn verify_host_key(&self, session: &Session) -> DeployResult<()> {
        let Some(expected) = &self.host_key_sha256 else {
            return Ok(());
        };
        let expected = normalize_fingerprint(expected);
        let actual = session
            .host_key_hash(HashType::Sha256)
            .map(hex)
            .unwrap_or_default();

        if actual != expected {
            return Err(DeployError::HostKeyMismatch {
                host: self.host.clone(),
                expected,
                actual,
            });
        }
        Ok(())
    }
}

impl RemoteConnector for SftpConnector {
    fn destination(&self) -> String {
        format!("sftp://{}@{}:{}", self.username, self.host, self.port)
    }

    fn connect(&self) -> DeployResult<Box<dyn RemoteSession>> {
        let tcp = TcpStream::connect((self.host.as_str(), self.port))
            .map_err(|e| self.connect_error(e))?;

        let mut session = Session::new().map_err(|e| self.connect_error(e))?;
        session.set_tcp_stream(tcp);
        session.handshake().map_err(|e| self.connect_error(e))?;

        self.verify_host_key(&session)?;

        let auth_failed = || DeployError::AuthFailed {
            user: self.username.clone(),
            host: self.host.clone(),
        };
        session
            .userauth_password(&self.username, &self.password)
            .map_err(|_| auth_failed())?;
        if !session.authenticated() {
            return Err(auth_failed());
        }

        let sftp = session.sftp().map_err(|e| self.connect_error(e))?;

        Ok(Box::new(SftpSession {
            session,
            sftp: Some(sftp),
        }))
    }
}

/// An open SFTP channel and the SSH session carrying it
pub struct SftpSession {
    session: Session,
    sftp: Option<Sftp>,
}

impl SftpSession {
    fn sftp(&self) -> FsResult<&Sftp> {
        self.sftp
            .as_ref()
            .ok_or_else(|| FsError::Other("SFTP session already closed".to_string()))
    }

    fn shutdown(&mut self) -> FsResult<()> {
        if self.sftp.take().is_none() {
            return Ok(());
        }
        self.session
            .disconnect(None, "deploy finished", None)
            .map_err(|e| FsError::Other(format!("disconnect failed: {}", e)))
    }
}

fn map_ssh(err: ssh2::Error, path: &RemotePath) -> FsError {
    match err.code() {
        ErrorCode::SFTP(FX_NO_SUCH_FILE) | ErrorCode::SFTP(FX_NO_SUCH_PATH) => {
            FsError::NotFound(path.to_string())
        }
        ErrorCode::SFTP(FX_PERMISSION_DENIED) => FsError::PermissionDenied(path.to_string()),
        _ => FsError::Other(format!("{}: {}", path, err)),
    }
}

fn kind_of(stat: &FileStat) -> EntryKind {
    let file_type = stat.file_type();
    if file_type.is_symlink() {
        EntryKind::Symlink
    } else if file_type.is_dir() {
        EntryKind::Directory
    } else if file_type.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn normalize_fingerprint(fingerprint: &str) -> String {
    fingerprint
        .chars()
        .filter(|c| *c != ':' && !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase()
}

impl RemoteFs for SftpSession {
    fn stat(&self, path: &RemotePath) -> FsResult<EntryKind> {
        self.sftp()?
            .stat(Path::new(path.as_str()))
            .map(|s| kind_of(&s))
            .map_err(|e| map_ssh(e, path))
    }

    fn lstat(&self, path: &RemotePath) -> FsResult<EntryKind> {
        self.sftp()?
            .lstat(Path::new(path.as_str()))
            .map(|s| kind_of(&s))
            .map_err(|e| map_ssh(e, path))
    }

    fn list_dir(&self, path: &RemotePath) -> FsResult<Vec<String>> {
        let entries = self
            .sftp()?
            .readdir(Path::new(path.as_str()))
            .map_err(|e| map_ssh(e, path))?;

        let mut names: Vec<String> = entries
            .into_iter()
            .filter_map(|(entry, _)| {
                entry
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
            })
            .collect();
        names.sort();
        Ok(names)
    }

    fn create_dir(&self, path: &RemotePath) -> FsResult<()> {
        self.sftp()?
            .mkdir(Path::new(path.as_str()), DIR_MODE)
            .map_err(|e| map_ssh(e, path))
    }

    fn remove_file(&self, path: &RemotePath) -> FsResult<()> {
        self.sftp()?
            .unlink(Path::new(path.as_str()))
            .map_err(|e| map_ssh(e, path))
    }

    fn remove_dir(&self, path: &RemotePath) -> FsResult<()> {
        self.sftp()?
            .rmdir(Path::new(path.as_str()))
            .map_err(|e| map_ssh(e, path))
    }

    fn upload(&self, local: &Path, remote: &RemotePath) -> FsResult<u64> {
        let mut source = std::fs::File::open(local)
            .map_err(|e| FsError::Other(format!("{}: {}", local.display(), e)))?;
        let mut target = self
            .sftp()?
            .create(Path::new(remote.as_str()))
            .map_err(|e| map_ssh(e, remote))?;
        let written = std::io::copy(&mut source, &mut target)?;
        Ok(written)
    }

    fn read_to_string(&self, path: &RemotePath) -> FsResult<String> {
        let mut file = self
            .sftp()?
            .open(Path::new(path.as_str()))
            .map_err(|e| map_ssh(e, path))?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn symlink(&self, target: &str, link: &RemotePath) -> FsResult<()> {
        // ssh2 argument order: the link is created at the second path
        self.sftp()?
            .symlink(Path::new(target), Path::new(link.as_str()))
            .map_err(|e| map_ssh(e, link))
    }

    fn read_link(&self, path: &RemotePath) -> FsResult<PathBuf> {
        self.sftp()?
            .readlink(Path::new(path.as_str()))
            .map_err(|e| map_ssh(e, path))
    }
}

impl RemoteSession for SftpSession {
    fn close(&mut self) -> FsResult<()> {
        self.shutdown()
    }
}

impl Drop for SftpSession {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}
