//! Symlink enforcer
//!
//! The hosting auto-deploy may replace `public_html/nodejs` with a real
//! directory or a stale link. This stage puts the link back.

use crate::domain::ports::{DeployEvent, DeployEventSink, EntryKind, RemoteFs};
use crate::domain::value_objects::RemotePath;

use super::report::{SymlinkAction, SymlinkReport};

/// Make `link` a symlink to `target`, then read it back.
pub fn ensure_symlink<F: RemoteFs + ?Sized>(
    remote: &F,
    link: &RemotePath,
    target: &str,
    events: &dyn DeployEventSink,
) -> SymlinkReport {
    let action = match remote.lstat(link) {
        Err(e) if e.is_not_found() => create(remote, link, target, SymlinkAction::Created),
        Err(e) => SymlinkAction::Failed {
            reason: format!("cannot inspect {}: {}", link, e),
        },
        Ok(EntryKind::Symlink) => match remote.read_link(link) {
            Ok(current) if current.to_string_lossy() == target => {
                events.on_event(DeployEvent::ok("Symlink already correct"));
                SymlinkAction::AlreadyCorrect
            }
            current => {
                let previous = current
                    .map(|p| p.to_string_lossy().into_owned())
                    .unwrap_or_else(|e| format!("<unreadable: {}>", e));
                events.on_event(DeployEvent::warn(format!(
                    "Symlink points to '{}', fixing",
                    previous
                )));
                replace(remote, link, target, SymlinkAction::Retargeted { previous })
            }
        },
        Ok(EntryKind::Directory) => {
            events.on_event(DeployEvent::warn(format!(
                "{} is a real directory, removing it",
                link
            )));
            match remote.remove_dir(link) {
                Ok(()) => create(remote, link, target, SymlinkAction::Replaced),
                Err(e) => {
                    events.on_event(DeployEvent::error(format!(
                        "Could not remove directory {} ({})",
                        link, e
                    )));
                    events.on_event(DeployEvent::error(
                        "Remove it manually in the hosting panel and run again with --fix-only",
                    ));
                    SymlinkAction::DirectoryNotEmpty
                }
            }
        }
        Ok(_) => {
            events.on_event(DeployEvent::warn(format!(
                "{} is a regular file, replacing it",
                link
            )));
            replace(remote, link, target, SymlinkAction::Replaced)
        }
    };

    match &action {
        SymlinkAction::Failed { reason } => {
            events.on_event(DeployEvent::error(format!("Symlink not fixed: {}", reason)));
            return SymlinkReport {
                action,
                verified_target: None,
            };
        }
        SymlinkAction::DirectoryNotEmpty => {
            return SymlinkReport {
                action,
                verified_target: None,
            };
        }
        SymlinkAction::AlreadyCorrect => {}
        _ => events.on_event(DeployEvent::ok(format!("Symlink created: {} -> {}", link, target))),
    }

    let verified_target = match remote.read_link(link) {
        Ok(resolved) => {
            let resolved = resolved.to_string_lossy().into_owned();
            events.on_event(DeployEvent::ok(format!("Verified: {} -> {}", link, resolved)));
            Some(resolved)
        }
        Err(e) => {
            events.on_event(DeployEvent::error(format!(
                "Could not verify symlink {}: {}",
                link, e
            )));
            None
        }
    };

    SymlinkReport {
        action,
        verified_target,
    }
}

fn replace<F: RemoteFs + ?Sized>(
    remote: &F,
    link: &RemotePath,
    target: &str,
    on_success: SymlinkAction,
) -> SymlinkAction {
    match remote.remove_file(link) {
        Ok(()) => create(remote, link, target, on_success),
        Err(e) => SymlinkAction::Failed {
            reason: format!("cannot remove {}: {}", link, e),
        },
    }
}

fn create<F: RemoteFs + ?Sized>(
    remote: &F,
    link: &RemotePath,
    target: &str,
    on_success: SymlinkAction,
) -> SymlinkAction {
    match remote.symlink(target, link) {
        Ok(()) => on_success,
        Err(e) => SymlinkAction::Failed {
            reason: format!("cannot create {} -> {}: {}", link, target, e),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{MemoryRemoteFs, Node, RecordingSink};
    use crate::domain::ports::{Level, NoopEventSink};

    const LINK: &str = "/srv/public_html/nodejs";
    const TARGET: &str = "../nodejs";

    fn link() -> RemotePath {
        RemotePath::new(LINK)
    }

    fn public() -> MemoryRemoteFs {
        MemoryRemoteFs::new()
            .with_dir("/srv/public_html")
            .with_dir("/srv/nodejs")
    }

    #[test]
    fn absent_link_is_created_and_verified() {
        let fs = public();
        let sink = RecordingSink::new();

        let report = ensure_symlink(&fs, &link(), TARGET, &sink);

        assert_eq!(report.action, SymlinkAction::Created);
        assert_eq!(report.verified_target.as_deref(), Some(TARGET));
        assert_eq!(fs.node(LINK), Some(Node::Link(TARGET.to_string())));
        assert!(sink
            .messages(Level::Ok)
            .contains(&format!("Verified: {} -> {}", LINK, TARGET)));
    }

    #[test]
    fn second_run_is_already_correct() {
        let fs = public();
        ensure_symlink(&fs, &link(), TARGET, &NoopEventSink);

        let report = ensure_symlink(&fs, &link(), TARGET, &NoopEventSink);

        assert_eq!(report.action, SymlinkAction::AlreadyCorrect);
        assert_eq!(report.verified_target.as_deref(), Some(TARGET));
    }

    #[test]
    fn wrong_target_is_retargeted() {
        let fs = public().with_link(LINK, "../old");
        let sink = RecordingSink::new();

        let report = ensure_symlink(&fs, &link(), TARGET, &sink);

        assert_eq!(
            report.action,
            SymlinkAction::Retargeted {
                previous: "../old".to_string()
            }
        );
        assert_eq!(fs.node(LINK), Some(Node::Link(TARGET.to_string())));
        assert_eq!(sink.messages(Level::Warn), vec!["Symlink points to '../old', fixing"]);
    }

    #[test]
    fn empty_directory_is_replaced() {
        let fs = public().with_dir(LINK);

        let report = ensure_symlink(&fs, &link(), TARGET, &NoopEventSink);

        assert_eq!(report.action, SymlinkAction::Replaced);
        assert_eq!(fs.node(LINK), Some(Node::Link(TARGET.to_string())));
    }

    #[test]
    fn non_empty_directory_is_left_alone() {
        let fs = public().with_file("/srv/public_html/nodejs/index.html", b"x");
        let sink = RecordingSink::new();

        let report = ensure_symlink(&fs, &link(), TARGET, &sink);

        assert_eq!(report.action, SymlinkAction::DirectoryNotEmpty);
        assert!(report.verified_target.is_none());
        assert_eq!(fs.node(LINK), Some(Node::Dir));
        assert!(fs.file("/srv/public_html/nodejs/index.html").is_some());
        assert_eq!(sink.messages(Level::Error).len(), 2);
    }

    #[test]
    fn regular_file_is_replaced() {
        let fs = public().with_file(LINK, b"not a link");

        let report = ensure_symlink(&fs, &link(), TARGET, &NoopEventSink);

        assert_eq!(report.action, SymlinkAction::Replaced);
        assert_eq!(report.verified_target.as_deref(), Some(TARGET));
    }

    #[test]
    fn failed_creation_is_reported() {
        let fs = public().failing_on(LINK);
        let sink = RecordingSink::new();

        let report = ensure_symlink(&fs, &link(), TARGET, &sink);

        assert!(matches!(report.action, SymlinkAction::Failed { .. }));
        assert!(report.verified_target.is_none());
        assert_eq!(sink.messages(Level::Error).len(), 1);
    }

    #[test]
    fn failed_removal_of_stale_link_is_reported() {
        let fs = public().with_link(LINK, "../old").failing_on(LINK);

        let report = ensure_symlink(&fs, &link(), TARGET, &NoopEventSink);

        match report.action {
            SymlinkAction::Failed { reason } => assert!(reason.starts_with("cannot remove")),
            other => panic!("unexpected action: {other:?}"),
        }
        assert_eq!(fs.node(LINK), Some(Node::Link("../old".to_string())));
    }
}
