//! Stage and run reports

use std::time::Duration;

use super::stages::StageKind;

/// One entry a stage could not handle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFailure {
    /// Remote (or local, for uploads) path of the entry
    pub path: String,
    pub reason: String,
}

impl EntryFailure {
    pub fn new(path: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl std::fmt::Display for EntryFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.reason)
    }
}

/// Result of the version-control publisher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    NothingToCommit,
    Pushed,
    PushFailed,
    CommitFailed,
    StatusFailed,
}

impl PublishOutcome {
    /// Only a successful push starts the hosting auto-deploy
    pub fn triggered_deploy(&self) -> bool {
        matches!(self, PublishOutcome::Pushed)
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            PublishOutcome::PushFailed | PublishOutcome::CommitFailed | PublishOutcome::StatusFailed
        )
    }
}

/// Result of purging the remote asset directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// The directory did not exist yet
    pub directory_missing: bool,
    /// Listing failed for another reason
    pub listing_error: Option<String>,
    pub deleted: Vec<String>,
    pub failures: Vec<EntryFailure>,
}

/// Result of mirroring the build output tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub uploaded: usize,
    pub bytes: u64,
    pub created_dirs: Vec<String>,
    pub failures: Vec<EntryFailure>,
}

/// What the symlink enforcer did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymlinkAction {
    Created,
    AlreadyCorrect,
    Retargeted { previous: String },
    /// An empty directory or a regular file was replaced by the link
    Replaced,
    /// A real directory with content sits at the link path
    DirectoryNotEmpty,
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymlinkReport {
    pub action: SymlinkAction,
    /// Target read back with `readlink`
    pub verified_target: Option<String>,
}

impl SymlinkReport {
    pub fn is_ok(&self) -> bool {
        !matches!(
            self.action,
            SymlinkAction::DirectoryNotEmpty | SymlinkAction::Failed { .. }
        ) && self.verified_target.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenCheck {
    pub token: String,
    pub present: bool,
}

/// Result of uploading and verifying the server config file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerConfigReport {
    pub uploaded: bool,
    pub checks: Vec<TokenCheck>,
    /// Size of the read-back remote copy
    pub remote_bytes: Option<usize>,
}

impl ServerConfigReport {
    /// Every required token was found in the read-back copy
    pub fn all_present(&self) -> bool {
        self.uploaded && self.remote_bytes.is_some() && self.checks.iter().all(|c| c.present)
    }
}

/// Everything one run did
#[derive(Debug, Clone, Default)]
pub struct DeployReport {
    /// Stages that ran, in order
    pub stages: Vec<StageKind>,
    pub publish: Option<PublishOutcome>,
    pub waited: Option<Duration>,
    pub clean: Option<CleanReport>,
    pub sync: Option<SyncReport>,
    pub symlink: Option<SymlinkReport>,
    pub server_config: Option<ServerConfigReport>,
    pub warnings: usize,
    pub errors: usize,
}

impl DeployReport {
    pub fn uploaded(&self) -> usize {
        self.sync.as_ref().map_or(0, |s| s.uploaded)
    }

    pub fn is_clean(&self) -> bool {
        self.errors == 0
    }
}
