//! Remote-asset cleaner
//!
//! Purges the immediate entries of the remote asset directory so stale,
//! hash-named bundles from earlier builds do not pile up.

use crate::domain::ports::{DeployEvent, DeployEventSink, RemoteFs};
use crate::domain::value_objects::RemotePath;

use super::report::{CleanReport, EntryFailure};

/// Delete every entry of `dir` as a file. Best effort: failures are
/// collected in the report, never raised.
pub fn clean_remote_assets<F: RemoteFs + ?Sized>(
    remote: &F,
    dir: &RemotePath,
    events: &dyn DeployEventSink,
) -> CleanReport {
    let mut report = CleanReport::default();

    let entries = match remote.list_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.is_not_found() => {
            events.on_event(DeployEvent::warn(format!(
                "{} does not exist yet, it will be created",
                dir
            )));
            report.directory_missing = true;
            return report;
        }
        Err(e) => {
            events.on_event(DeployEvent::error(format!("Could not list {}: {}", dir, e)));
            report.listing_error = Some(e.to_string());
            return report;
        }
    };

    for name in entries {
        let path = dir.join(&name);
        match remote.remove_file(&path) {
            Ok(()) => report.deleted.push(name),
            Err(e) => report.failures.push(EntryFailure::new(path.as_str(), e)),
        }
    }

    events.on_event(DeployEvent::ok(format!(
        "Removed {} old assets",
        report.deleted.len()
    )));
    for failure in &report.failures {
        events.on_event(DeployEvent::warn(format!("Could not remove {}", failure)));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{MemoryRemoteFs, RecordingSink};
    use crate::domain::ports::Level;

    fn assets() -> RemotePath {
        RemotePath::new("/srv/nodejs/assets")
    }

    #[test]
    fn deletes_every_entry() {
        let fs = MemoryRemoteFs::new()
            .with_file("/srv/nodejs/assets/app-1.js", b"a")
            .with_file("/srv/nodejs/assets/app-1.css", b"b");
        let sink = RecordingSink::new();

        let report = clean_remote_assets(&fs, &assets(), &sink);

        assert_eq!(report.deleted, vec!["app-1.css", "app-1.js"]);
        assert!(report.failures.is_empty());
        assert!(fs.file("/srv/nodejs/assets/app-1.js").is_none());
        assert_eq!(sink.messages(Level::Ok), vec!["Removed 2 old assets"]);
    }

    #[test]
    fn missing_directory_is_a_warning() {
        let fs = MemoryRemoteFs::new().with_dir("/srv/nodejs");
        let sink = RecordingSink::new();

        let report = clean_remote_assets(&fs, &assets(), &sink);

        assert!(report.directory_missing);
        assert!(report.deleted.is_empty());
        assert_eq!(sink.messages(Level::Warn).len(), 1);
        assert!(sink.messages(Level::Error).is_empty());
    }

    #[test]
    fn failures_are_reported_not_swallowed() {
        let fs = MemoryRemoteFs::new()
            .with_file("/srv/nodejs/assets/keep.js", b"a")
            .with_file("/srv/nodejs/assets/old.js", b"b")
            .failing_on("/srv/nodejs/assets/keep.js");
        let sink = RecordingSink::new();

        let report = clean_remote_assets(&fs, &assets(), &sink);

        assert_eq!(report.deleted, vec!["old.js"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].path, "/srv/nodejs/assets/keep.js");
        assert!(fs.file("/srv/nodejs/assets/keep.js").is_some());
        assert_eq!(sink.messages(Level::Warn).len(), 1);
    }

    #[test]
    fn nested_directory_cannot_be_removed_as_file() {
        let fs = MemoryRemoteFs::new().with_dir("/srv/nodejs/assets/fonts");
        let report = clean_remote_assets(&fs, &assets(), &RecordingSink::new());

        assert!(report.deleted.is_empty());
        assert_eq!(report.failures.len(), 1);
    }

    #[test]
    fn asset_path_that_is_a_file_is_a_listing_error() {
        let fs = MemoryRemoteFs::new().with_file("/srv/nodejs/assets", b"oops");
        let sink = RecordingSink::new();

        let report = clean_remote_assets(&fs, &assets(), &sink);

        assert!(report.listing_error.is_some());
        assert!(!report.directory_missing);
        assert_eq!(sink.messages(Level::Error).len(), 1);
    }
}
