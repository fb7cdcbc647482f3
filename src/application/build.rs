//! Builder stage

use std::path::Path;

use crate::config::BuildConfig;
use crate::domain::ports::{CommandRunner, DeployEvent, DeployEventSink};
use crate::error::{DeployError, DeployResult};

/// Run the build command in the project root with inherited stdio.
///
/// A non-zero status or a spawn failure is fatal.
pub fn run_build(
    build: &BuildConfig,
    project_root: &Path,
    runner: &dyn CommandRunner,
    events: &dyn DeployEventSink,
) -> DeployResult<()> {
    let command = build.command.join(" ");
    let (program, args) = build
        .command
        .split_first()
        .ok_or_else(|| DeployError::ConfigValidation("build.command is empty".to_string()))?;

    events.on_event(DeployEvent::info(format!("Running {}", command)));

    let output = runner
        .run_inherited(program, args, project_root)
        .map_err(|source| DeployError::BuildSpawn {
            command: command.clone(),
            source,
        })?;

    if !output.success {
        events.on_event(DeployEvent::error("Build failed"));
        return Err(DeployError::BuildFailed {
            command,
            status: output.status_text(),
        });
    }

    events.on_event(DeployEvent::ok("Build finished"));
    Ok(())
}
