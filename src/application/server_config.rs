//! Config-file updater
//!
//! Uploads the web server config (`.htaccess`) into the public directory and
//! checks the remote copy for the directives the site depends on.

use std::path::Path;

use crate::domain::ports::{DeployEvent, DeployEventSink, RemoteFs};
use crate::domain::value_objects::RemotePath;

use super::report::{ServerConfigReport, TokenCheck};

pub fn update_server_config<F: RemoteFs + ?Sized>(
    remote: &F,
    local: &Path,
    remote_path: &RemotePath,
    required_tokens: &[String],
    events: &dyn DeployEventSink,
) -> ServerConfigReport {
    let mut report = ServerConfigReport::default();

    if !local.is_file() {
        events.on_event(DeployEvent::error(format!(
            "File not found: {}",
            local.display()
        )));
        return report;
    }

    if let Err(e) = remote.upload(local, remote_path) {
        events.on_event(DeployEvent::error(format!(
            "Could not upload {}: {}",
            remote_path, e
        )));
        return report;
    }
    report.uploaded = true;

    let content = match remote.read_to_string(remote_path) {
        Ok(content) => content,
        Err(e) => {
            events.on_event(DeployEvent::error(format!(
                "Could not read back {}: {}",
                remote_path, e
            )));
            return report;
        }
    };
    report.remote_bytes = Some(content.len());

    for token in required_tokens {
        let present = content.contains(token.as_str());
        events.on_event(DeployEvent::TokenChecked {
            token: token.clone(),
            present,
        });
        report.checks.push(TokenCheck {
            token: token.clone(),
            present,
        });
    }

    if report.all_present() {
        events.on_event(DeployEvent::ok(format!(
            "{} updated ({} bytes)",
            remote_path,
            content.len()
        )));
    } else {
        events.on_event(DeployEvent::error(format!(
            "{} may be incorrect, required directives are missing",
            remote_path
        )));
    }
    report
}
