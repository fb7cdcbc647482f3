//! Local Mirror Implementation
//!
//! Implements the RemoteFs port on a local directory. Every remote absolute
//! path `/a/b` maps to `<root>/a/b`, which makes it possible to stage a deploy
//! on disk and to exercise the stages against real file system semantics.

use crate::domain::ports::{
    EntryKind, FsError, FsResult, RemoteConnector, RemoteFs, RemoteSession,
};
use crate::domain::value_objects::RemotePath;
use crate::error::DeployResult;
use std::fs;
use std::path::{Path, PathBuf};

/// A local directory standing in for the hosting server
#[derive(Debug, Clone)]
pub struct LocalMirrorFs {
    root: PathBuf,
}

impl LocalMirrorFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Local location of a remote path
    pub fn resolve(&self, path: &RemotePath) -> PathBuf {
        let relative = path.as_str().trim_start_matches('/');
        if relative.is_empty() {
            return self.root.clone();
        }
        relative
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(self.root.clone(), |acc, part| acc.join(part))
    }
}

fn map_io(err: std::io::Error, path: &RemotePath) -> FsError {
    match err.kind() {
        std::io::ErrorKind::NotFound => FsError::NotFound(path.to_string()),
        std::io::ErrorKind::PermissionDenied => FsError::PermissionDenied(path.to_string()),
        _ => FsError::Io(err),
    }
}

fn kind_of(file_type: fs::FileType) -> EntryKind {
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

impl RemoteFs for LocalMirrorFs {
    fn stat(&self, path: &RemotePath) -> FsResult<EntryKind> {
        fs::metadata(self.resolve(path))
            .map(|m| kind_of(m.file_type()))
            .map_err(|e| map_io(e, path))
    }

    fn lstat(&self, path: &RemotePath) -> FsResult<EntryKind> {
        fs::symlink_metadata(self.resolve(path))
            .map(|m| kind_of(m.file_type()))
            .map_err(|e| map_io(e, path))
    }

    fn list_dir(&self, path: &RemotePath) -> FsResult<Vec<String>> {
        let entries = fs::read_dir(self.resolve(path)).map_err(|e| map_io(e, path))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| map_io(e, path))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }

    fn create_dir(&self, path: &RemotePath) -> FsResult<()> {
        fs::create_dir(self.resolve(path)).map_err(|e| map_io(e, path))
    }

    fn remove_file(&self, path: &RemotePath) -> FsResult<()> {
        let local = self.resolve(path);
        let meta = fs::symlink_metadata(&local).map_err(|e| map_io(e, path))?;
        if meta.is_dir() {
            return Err(FsError::Other(format!("{} is a directory", path)));
        }
        fs::remove_file(local).map_err(|e| map_io(e, path))
    }

    fn remove_dir(&self, path: &RemotePath) -> FsResult<()> {
        fs::remove_dir(self.resolve(path)).map_err(|e| map_io(e, path))
    }

    fn upload(&self, local: &Path, remote: &RemotePath) -> FsResult<u64> {
        fs::copy(local, self.resolve(remote)).map_err(|e| map_io(e, remote))
    }

    fn read_to_string(&self, path: &RemotePath) -> FsResult<String> {
        let bytes = fs::read(self.resolve(path)).map_err(|e| map_io(e, path))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    #[cfg(unix)]
    fn symlink(&self, target: &str, link: &RemotePath) -> FsResult<()> {
        std::os::unix::fs::symlink(target, self.resolve(link)).map_err(|e| map_io(e, link))
    }

    #[cfg(not(unix))]
    fn symlink(&self, _target: &str, link: &RemotePath) -> FsResult<()> {
        Err(FsError::Other(format!(
            "cannot create {}: symlinks are not supported on this platform",
            link
        )))
    }

    fn read_link(&self, path: &RemotePath) -> FsResult<PathBuf> {
        fs::read_link(self.resolve(path)).map_err(|e| map_io(e, path))
    }
}

impl RemoteSession for LocalMirrorFs {
    fn close(&mut self) -> FsResult<()> {
        Ok(())
    }
}

/// Opens `LocalMirrorFs` sessions
///
/// The directories in `prepared` are created on connect, emulating a hosting
/// account where the base and public directories already exist.
pub struct LocalConnector {
    root: PathBuf,
    prepared: Vec<RemotePath>,
}

impl LocalConnector {
    pub fn new(root: impl Into<PathBuf>, prepared: Vec<RemotePath>) -> Self {
        Self {
            root: root.into(),
            prepared,
        }
    }
}

impl RemoteConnector for LocalConnector {
    fn destination(&self) -> String {
        format!("local mirror {}", self.root.display())
    }

    fn connect(&self) -> DeployResult<Box<dyn RemoteSession>> {
        let fs = LocalMirrorFs::new(&self.root);
        fs::create_dir_all(&self.root)?;
        for dir in &self.prepared {
            fs::create_dir_all(fs.resolve(dir))?;
        }
        Ok(Box::new(fs))
    }
}
