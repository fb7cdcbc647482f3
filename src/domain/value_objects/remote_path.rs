//! Remote Path Value Object
//!
//! Paths on the hosting server are POSIX strings regardless of the platform
//! the deploy runs on, so they are never built with `PathBuf`.

use std::fmt;

/// Error when a relative path segment is rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Segment is empty
    Empty,
    /// Segment is absolute when relative is required
    AbsoluteNotAllowed,
    /// Segment contains traversal components (..)
    ContainsTraversal,
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::Empty => write!(f, "Path is empty"),
            PathError::AbsoluteNotAllowed => write!(f, "Absolute paths are not allowed"),
            PathError::ContainsTraversal => {
                write!(f, "Path contains traversal components (..)")
            }
        }
    }
}

impl std::error::Error for PathError {}

/// A `/`-separated path on the remote host
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RemotePath(String);

impl RemotePath {
    /// Wrap a remote path, dropping any trailing slash (except for `/`)
    pub fn new(path: impl Into<String>) -> Self {
        let mut path = path.into();
        while path.len() > 1 && path.ends_with('/') {
            path.pop();
        }
        Self(path)
    }

    /// Append a relative `/`-separated path.
    ///
    /// An empty `relative` yields `self` unchanged, which is how the root of
    /// a mirrored tree maps onto its remote base.
    pub fn join(&self, relative: &str) -> Self {
        let relative = relative.trim_matches('/');
        if relative.is_empty() {
            return self.clone();
        }
        if self.0.is_empty() {
            return Self(relative.to_string());
        }
        if self.0 == "/" {
            return Self(format!("/{}", relative));
        }
        Self(format!("{}/{}", self.0, relative))
    }

    /// Last segment of the path
    pub fn file_name(&self) -> Option<&str> {
        self.0
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
    }

    /// Path without its last segment
    pub fn parent(&self) -> Option<Self> {
        let idx = self.0.rfind('/')?;
        if idx == 0 {
            if self.0.len() == 1 {
                return None;
            }
            return Some(Self("/".to_string()));
        }
        Some(Self(self.0[..idx].to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check a configured relative segment such as `nodejs` or `public_html`
    pub fn validate_relative(segment: &str) -> Result<(), PathError> {
        if segment.trim().is_empty() {
            return Err(PathError::Empty);
        }
        if segment.starts_with('/') {
            return Err(PathError::AbsoluteNotAllowed);
        }
        if segment.split('/').any(|part| part == "..") {
            return Err(PathError::ContainsTraversal);
        }
        Ok(())
    }
}

impl fmt::Display for RemotePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RemotePath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for RemotePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
