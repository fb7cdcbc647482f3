//! Tree synchronizer
//!
//! Mirrors the local build output tree into the remote runtime directory.
//! Every file is uploaded on every run; there is no change detection.

use std::collections::HashSet;
use std::path::Path;

use ignore::WalkBuilder;

use crate::domain::ports::{DeployEvent, DeployEventSink, RemoteFs};
use crate::domain::value_objects::RemotePath;
use crate::error::{DeployError, DeployResult};

use super::report::{EntryFailure, SyncReport};

/// Upload `local_root` to `remote_root`, pruning directories named in
/// `skip_dirs` at any depth.
///
/// Fails only when `local_root` is not a directory. Per-entry failures end up
/// in the report.
pub fn sync_tree<F: RemoteFs + ?Sized>(
    remote: &F,
    local_root: &Path,
    remote_root: &RemotePath,
    skip_dirs: &[String],
    events: &dyn DeployEventSink,
) -> DeployResult<SyncReport> {
    if !local_root.is_dir() {
        return Err(DeployError::BuildOutputMissing {
            path: local_root.to_path_buf(),
        });
    }

    let skip: HashSet<String> = skip_dirs.iter().cloned().collect();
    let walker = WalkBuilder::new(local_root)
        .standard_filters(false)
        .hidden(false)
        .follow_links(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(move |entry| {
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            entry.depth() == 0
                || !is_dir
                || !skip.contains(entry.file_name().to_string_lossy().as_ref())
        })
        .build();

    let detailed = events.wants_detailed_events();
    let mut report = SyncReport::default();
    // Relative directories that could not be created; nothing below them is uploaded.
    let mut blocked: Vec<String> = Vec::new();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                report
                    .failures
                    .push(EntryFailure::new(local_root.display().to_string(), e));
                continue;
            }
        };

        let rel = relative_path(local_root, entry.path());
        if blocked.iter().any(|dir| is_within(&rel, dir)) {
            continue;
        }
        let target = remote_root.join(&rel);

        if entry.file_type().is_some_and(|t| t.is_dir()) {
            if remote.stat(&target).is_ok() {
                continue;
            }
            match remote.create_dir(&target) {
                Ok(()) => {
                    events.on_event(DeployEvent::DirectoryCreated {
                        path: display_rel(&rel),
                    });
                    report.created_dirs.push(rel);
                }
                Err(e) => {
                    events.on_event(DeployEvent::error(format!(
                        "Could not create {}: {}",
                        target, e
                    )));
                    report.failures.push(EntryFailure::new(target.as_str(), e));
                    blocked.push(rel);
                }
            }
            continue;
        }

        // Follows symlinks to files; dangling links and sockets are skipped.
        if !entry.path().is_file() {
            continue;
        }

        match remote.upload(entry.path(), &target) {
            Ok(bytes) => {
                report.uploaded += 1;
                report.bytes += bytes;
                if detailed {
                    events.on_event(DeployEvent::FileUploaded {
                        index: report.uploaded,
                        path: rel,
                        bytes,
                    });
                }
            }
            Err(e) => {
                events.on_event(DeployEvent::error(format!("Upload failed for {}: {}", rel, e)));
                report.failures.push(EntryFailure::new(target.as_str(), e));
            }
        }
    }

    events.on_event(DeployEvent::ok(format!(
        "{} files uploaded ({})",
        report.uploaded,
        human_bytes(report.bytes)
    )));
    Ok(report)
}

/// `/`-joined path of `path` below `root`; empty for the root itself
fn relative_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Whether `rel` is `dir` or below it; the root (`""`) contains everything
fn is_within(rel: &str, dir: &str) -> bool {
    dir.is_empty()
        || rel == dir
        || rel
            .strip_prefix(dir)
            .is_some_and(|rest| rest.starts_with('/'))
}

fn display_rel(rel: &str) -> String {
    if rel.is_empty() {
        "./".to_string()
    } else {
        format!("{}/", rel)
    }
}

/// Byte count for progress lines (`512 B`, `2.0 KiB`)
pub fn human_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let b = bytes as f64;
    if b < KIB {
        format!("{} B", bytes)
    } else if b < KIB * KIB {
        format!("{:.1} KiB", b / KIB)
    } else {
        format!("{:.1} MiB", b / (KIB * KIB))
    }
}
