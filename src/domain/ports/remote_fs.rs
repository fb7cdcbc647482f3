//! RemoteFs port - abstraction over the hosting server's file system
//!
//! The stages only ever talk to the server through this trait, so the same
//! code runs over SFTP, against a local mirror directory, or against an
//! in-memory double in tests.

use std::path::{Path, PathBuf};

use crate::domain::value_objects::RemotePath;

/// Result type for remote file system operations
pub type FsResult<T> = Result<T, FsError>;

/// Remote file system operation errors
#[derive(Debug)]
pub enum FsError {
    /// Path does not exist
    NotFound(String),
    /// Permission denied
    PermissionDenied(String),
    /// I/O error
    Io(std::io::Error),
    /// Other error (protocol level, directory not empty, ...)
    Other(String),
}

impl FsError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FsError::NotFound(_))
    }
}

impl From<std::io::Error> for FsError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound(String::new()),
            std::io::ErrorKind::PermissionDenied => FsError::PermissionDenied(String::new()),
            _ => FsError::Io(err),
        }
    }
}

impl std::fmt::Display for FsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FsError::NotFound(path) => write!(f, "No such file: {}", path),
            FsError::PermissionDenied(path) => write!(f, "Permission denied: {}", path),
            FsError::Io(err) => write!(f, "I/O error: {}", err),
            FsError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for FsError {}

/// Type of a remote entry as reported by `lstat`/`stat`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    Other,
}

/// Abstract remote file system
///
/// Implementations:
/// - `SftpSession` - SFTP over an SSH session
/// - `LocalMirrorFs` - a local directory standing in for the server
pub trait RemoteFs {
    /// Entry type, following symlinks
    fn stat(&self, path: &RemotePath) -> FsResult<EntryKind>;

    /// Entry type, not following symlinks
    fn lstat(&self, path: &RemotePath) -> FsResult<EntryKind>;

    /// Names of the immediate entries of a directory
    fn list_dir(&self, path: &RemotePath) -> FsResult<Vec<String>>;

    /// Create a single directory (parent must exist)
    fn create_dir(&self, path: &RemotePath) -> FsResult<()>;

    /// Remove a file or symlink
    fn remove_file(&self, path: &RemotePath) -> FsResult<()>;

    /// Remove an empty directory
    fn remove_dir(&self, path: &RemotePath) -> FsResult<()>;

    /// Copy a local file to `remote`, overwriting it. Returns bytes written.
    fn upload(&self, local: &Path, remote: &RemotePath) -> FsResult<u64>;

    /// Read a remote file as text (lossy UTF-8)
    fn read_to_string(&self, path: &RemotePath) -> FsResult<String>;

    /// Create a symlink at `link` whose target is `target` (stored verbatim)
    fn symlink(&self, target: &str, link: &RemotePath) -> FsResult<()>;

    /// Read the target of a symlink
    fn read_link(&self, path: &RemotePath) -> FsResult<PathBuf>;
}

/// A remote file system with an explicit end of life
///
/// `close` is called exactly once by the pipeline after the remote stages,
/// whatever their outcome.
pub trait RemoteSession: RemoteFs {
    /// Release the connection
    fn close(&mut self) -> FsResult<()>;
}

/// Opens remote sessions
pub trait RemoteConnector {
    /// Where sessions go, for the start banner (no secrets)
    fn destination(&self) -> String;

    fn connect(&self) -> crate::error::DeployResult<Box<dyn RemoteSession>>;
}
