//! Deploy pipeline
//!
//! Runs the planned stages in order. Local stages (build, publish, wait) run
//! first; the remote stages then share a single session, which is closed
//! whatever happens inside them.
//!
//! ## Flow
//!
//! 1. Build (fatal on failure)
//! 2. Commit and push
//! 3. Wait for the hosting auto-deploy, only if something was pushed
//! 4. Clean remote assets
//! 5. Upload build output (fatal if the output tree is missing)
//! 6. Fix symlink
//! 7. Update server config

use std::cell::Cell;
use std::path::{Path, PathBuf};

use crate::config::DeployConfig;
use crate::domain::ports::{
    CommandRunner, DeployEvent, DeployEventSink, Level, RemoteConnector, RemoteSession, Sleeper,
};
use crate::error::DeployResult;

use super::build::run_build;
use super::clean::clean_remote_assets;
use super::publish::publish;
use super::report::DeployReport;
use super::server_config::update_server_config;
use super::stages::{PlannedStage, RunFlags, StageKind, StagePlan};
use super::symlink::ensure_symlink;
use super::sync::sync_tree;
use super::wait::wait_for_deploy;

/// One deploy run
pub struct Pipeline<'a> {
    config: &'a DeployConfig,
    project_root: PathBuf,
    flags: RunFlags,
    runner: &'a dyn CommandRunner,
    sleeper: &'a dyn Sleeper,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a DeployConfig,
        project_root: impl Into<PathBuf>,
        runner: &'a dyn CommandRunner,
        sleeper: &'a dyn Sleeper,
    ) -> Self {
        Self {
            config,
            project_root: project_root.into(),
            flags: RunFlags::default(),
            runner,
            sleeper,
        }
    }

    pub fn with_flags(mut self, flags: RunFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn plan(&self) -> StagePlan {
        StagePlan::new(self.flags, self.config)
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Run every planned stage.
    ///
    /// Returns `Err` only for fatal conditions; everything else is in the
    /// report and was logged through `events`.
    pub fn run(
        &self,
        connector: &dyn RemoteConnector,
        events: &dyn DeployEventSink,
    ) -> DeployResult<DeployReport> {
        let plan = self.plan();
        let sink = CountingSink::new(events);
        let mut report = DeployReport::default();

        sink.on_event(DeployEvent::Started {
            destination: connector.destination(),
            stage_count: plan.total(),
        });
        for kind in plan.skipped() {
            sink.on_event(DeployEvent::StageSkipped {
                title: kind.title().to_string(),
                reason: kind.skip_reason(self.flags).to_string(),
            });
        }

        for stage in plan.local_stages() {
            announce(&sink, stage);
            self.run_local_stage(stage.kind, &sink, &mut report)?;
            report.stages.push(stage.kind);
        }

        if plan.needs_remote() {
            sink.on_event(DeployEvent::info(format!(
                "Connecting to {}",
                connector.destination()
            )));
            let mut session = connector.connect()?;
            sink.on_event(DeployEvent::ok("Connected"));

            let result = plan.remote_stages().try_for_each(|stage| -> DeployResult<()> {
                announce(&sink, stage);
                self.run_remote_stage(stage.kind, session.as_ref(), &sink, &mut report)?;
                report.stages.push(stage.kind);
                Ok(())
            });

            if let Err(e) = session.close() {
                sink.on_event(DeployEvent::warn(format!("Closing session failed: {}", e)));
            }
            result?;
        }

        report.warnings = sink.warnings.get();
        report.errors = sink.errors.get();
        sink.on_event(DeployEvent::Completed {
            uploaded: report.uploaded(),
            warnings: report.warnings,
            errors: report.errors,
        });
        Ok(report)
    }

    fn run_local_stage(
        &self,
        kind: StageKind,
        events: &dyn DeployEventSink,
        report: &mut DeployReport,
    ) -> DeployResult<()> {
        match kind {
            StageKind::Build => {
                run_build(&self.config.build, &self.project_root, self.runner, events)?;
            }
            StageKind::Publish => {
                report.publish = Some(publish(
                    &self.config.git,
                    &self.config.git_paths(),
                    &self.project_root,
                    self.runner,
                    events,
                ));
            }
            StageKind::Wait => {
                if report.publish.is_some_and(|o| o.triggered_deploy()) {
                    report.waited = Some(wait_for_deploy(&self.config.wait, self.sleeper, events));
                } else {
                    events.on_event(DeployEvent::info("Nothing was pushed, not waiting"));
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn run_remote_stage(
        &self,
        kind: StageKind,
        remote: &dyn RemoteSession,
        events: &dyn DeployEventSink,
        report: &mut DeployReport,
    ) -> DeployResult<()> {
        let config = self.config;
        match kind {
            StageKind::CleanAssets => {
                report.clean = Some(clean_remote_assets(remote, &config.assets_dir(), events));
            }
            StageKind::Sync => {
                let local = self.project_root.join(&config.build.output_dir);
                report.sync = Some(sync_tree(
                    remote,
                    &local,
                    &config.runtime_dir(),
                    &config.build.skip_dirs,
                    events,
                )?);
            }
            StageKind::Symlink => {
                report.symlink = Some(ensure_symlink(
                    remote,
                    &config.symlink_path(),
                    &config.symlink.target,
                    events,
                ));
            }
            StageKind::ServerConfig => {
                report.server_config = Some(update_server_config(
                    remote,
                    &self.project_root.join(&config.server_config.local_path),
                    &config.server_config_remote_path(),
                    &config.required_tokens(),
                    events,
                ));
            }
            _ => {}
        }
        Ok(())
    }
}

fn announce(events: &dyn DeployEventSink, stage: PlannedStage) {
    events.on_event(DeployEvent::StageStarted {
        number: stage.number,
        total: stage.total,
        title: stage.kind.title().to_string(),
    });
}

/// Forwards events and counts warning and error lines
struct CountingSink<'a> {
    inner: &'a dyn DeployEventSink,
    warnings: Cell<usize>,
    errors: Cell<usize>,
}

impl<'a> CountingSink<'a> {
    fn new(inner: &'a dyn DeployEventSink) -> Self {
        Self {
            inner,
            warnings: Cell::new(0),
            errors: Cell::new(0),
        }
    }
}

impl DeployEventSink for CountingSink<'_> {
    fn on_event(&self, event: DeployEvent) {
        if let DeployEvent::Log { level, .. } = &event {
            match level {
                Level::Warn => self.warnings.set(self.warnings.get() + 1),
                Level::Error => self.errors.set(self.errors.get() + 1),
                Level::Info | Level::Ok => {}
            }
        }
        self.inner.on_event(event);
    }

    fn wants_detailed_events(&self) -> bool {
        self.inner.wants_detailed_events()
    }
}
