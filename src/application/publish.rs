//! Version-control publisher
//!
//! Commits the working tree and pushes it so the hosting provider's
//! auto-deploy picks it up. Nothing here is fatal: every failure ends the
//! stage with a `PublishOutcome` and the run continues.

use std::path::Path;

use crate::config::GitConfig;
use crate::domain::ports::{CommandOutput, CommandRunner, DeployEvent, DeployEventSink};

use super::report::PublishOutcome;

const GIT: &str = "git";

/// Stage, commit and push.
///
/// `paths` are added with `-f` so an ignored build output directory is still
/// committed.
pub fn publish(
    git: &GitConfig,
    paths: &[String],
    project_root: &Path,
    runner: &dyn CommandRunner,
    events: &dyn DeployEventSink,
) -> PublishOutcome {
    let status = match run_git(runner, project_root, &["status", "--porcelain"]) {
        Ok(out) if out.success => out,
        Ok(out) => {
            events.on_event(DeployEvent::error(format!(
                "git status failed: {}",
                first_line(&out)
            )));
            return PublishOutcome::StatusFailed;
        }
        Err(e) => {
            events.on_event(DeployEvent::error(format!("could not run git: {}", e)));
            return PublishOutcome::StatusFailed;
        }
    };

    if status.stdout.trim().is_empty() {
        events.on_event(DeployEvent::warn("No changes to commit"));
        return PublishOutcome::NothingToCommit;
    }

    // Staging failures surface again at commit time.
    match run_git(runner, project_root, &["add", "-u"]) {
        Ok(out) if !out.success => {
            events.on_event(DeployEvent::warn(format!("git add -u: {}", first_line(&out))));
        }
        Err(e) => {
            events.on_event(DeployEvent::warn(format!("git add -u: {}", e)));
        }
        Ok(_) => {}
    }
    for path in paths {
        match run_git(runner, project_root, &["add", "-f", path]) {
            Ok(out) if !out.success => {
                events.on_event(DeployEvent::warn(format!(
                    "git add {}: {}",
                    path,
                    first_line(&out)
                )));
            }
            Err(e) => {
                events.on_event(DeployEvent::warn(format!("git add {}: {}", path, e)));
            }
            Ok(_) => {}
        }
    }

    match run_git(runner, project_root, &["commit", "-m", &git.message]) {
        Ok(out) if out.success => {
            events.on_event(DeployEvent::ok(format!("Committed: {}", git.message)));
        }
        Ok(out) if out.combined().contains("nothing to commit") => {
            events.on_event(DeployEvent::warn("Nothing to commit"));
            return PublishOutcome::NothingToCommit;
        }
        Ok(out) => {
            events.on_event(DeployEvent::error(format!(
                "git commit failed: {}",
                first_line(&out)
            )));
            return PublishOutcome::CommitFailed;
        }
        Err(e) => {
            events.on_event(DeployEvent::error(format!("git commit failed: {}", e)));
            return PublishOutcome::CommitFailed;
        }
    }

    match run_git(runner, project_root, &["push", &git.remote, &git.branch]) {
        Ok(out) if out.success => {
            events.on_event(DeployEvent::ok(format!(
                "Pushed to {}/{}",
                git.remote, git.branch
            )));
            PublishOutcome::Pushed
        }
        Ok(out) => {
            events.on_event(DeployEvent::error(format!(
                "git push failed: {}",
                first_line(&out)
            )));
            PublishOutcome::PushFailed
        }
        Err(e) => {
            events.on_event(DeployEvent::error(format!("git push failed: {}", e)));
            PublishOutcome::PushFailed
        }
    }
}

fn run_git(
    runner: &dyn CommandRunner,
    cwd: &Path,
    args: &[&str],
) -> std::io::Result<CommandOutput> {
    let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
    runner.run_captured(GIT, &args, cwd)
}

/// First non-empty line of the output, or the exit status
fn first_line(out: &CommandOutput) -> String {
    out.combined()
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| out.status_text())
}
