//! Stage descriptors
//!
//! The run is an ordered list of stages, each with a predicate over the run
//! flags. Step numbers shown to the user (`[3/7]`) are derived from this list,
//! never maintained by hand.

use crate::config::DeployConfig;

/// Flags selecting which stages run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunFlags {
    pub skip_build: bool,
    pub skip_git: bool,
    pub fix_only: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageKind {
    Build,
    Publish,
    Wait,
    CleanAssets,
    Sync,
    Symlink,
    ServerConfig,
}

impl StageKind {
    pub const ALL: [StageKind; 7] = [
        StageKind::Build,
        StageKind::Publish,
        StageKind::Wait,
        StageKind::CleanAssets,
        StageKind::Sync,
        StageKind::Symlink,
        StageKind::ServerConfig,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            StageKind::Build => "Build",
            StageKind::Publish => "Git commit & push",
            StageKind::Wait => "Wait for auto-deploy",
            StageKind::CleanAssets => "Clean remote assets",
            StageKind::Sync => "Upload build output",
            StageKind::Symlink => "Fix symlink",
            StageKind::ServerConfig => "Update server config",
        }
    }

    /// Stages that need the remote session
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            StageKind::CleanAssets | StageKind::Sync | StageKind::Symlink | StageKind::ServerConfig
        )
    }

    /// Whether the stage belongs to a run with these flags
    pub fn enabled(&self, flags: RunFlags, git_enabled: bool) -> bool {
        match self {
            StageKind::Build => !flags.skip_build && !flags.fix_only,
            StageKind::Publish | StageKind::Wait => {
                git_enabled && !flags.skip_git && !flags.fix_only
            }
            StageKind::CleanAssets | StageKind::Sync => !flags.fix_only,
            StageKind::Symlink | StageKind::ServerConfig => true,
        }
    }

    /// Why a disabled stage is not part of the run
    pub fn skip_reason(&self, flags: RunFlags) -> &'static str {
        if flags.fix_only {
            return "--fix-only";
        }
        match self {
            StageKind::Build => "--skip-build",
            StageKind::Publish | StageKind::Wait if flags.skip_git => "--skip-git",
            StageKind::Publish | StageKind::Wait => "git disabled in config",
            _ => "disabled",
        }
    }
}

/// A stage that is part of the run, with its 1-based position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedStage {
    pub kind: StageKind,
    pub number: usize,
    pub total: usize,
}

/// Ordered stages of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagePlan {
    stages: Vec<PlannedStage>,
    skipped: Vec<StageKind>,
}

impl StagePlan {
    pub fn new(flags: RunFlags, config: &DeployConfig) -> Self {
        Self::with_git(flags, config.git.enabled)
    }

    pub fn with_git(flags: RunFlags, git_enabled: bool) -> Self {
        let (enabled, skipped): (Vec<StageKind>, Vec<StageKind>) = StageKind::ALL
            .into_iter()
            .partition(|kind| kind.enabled(flags, git_enabled));
        let total = enabled.len();
        let stages = enabled
            .into_iter()
            .enumerate()
            .map(|(idx, kind)| PlannedStage {
                kind,
                number: idx + 1,
                total,
            })
            .collect();
        Self { stages, skipped }
    }

    pub fn stages(&self) -> &[PlannedStage] {
        &self.stages
    }

    pub fn skipped(&self) -> &[StageKind] {
        &self.skipped
    }

    pub fn total(&self) -> usize {
        self.stages.len()
    }

    pub fn get(&self, kind: StageKind) -> Option<PlannedStage> {
        self.stages.iter().copied().find(|s| s.kind == kind)
    }

    pub fn contains(&self, kind: StageKind) -> bool {
        self.get(kind).is_some()
    }

    pub fn needs_remote(&self) -> bool {
        self.stages.iter().any(|s| s.kind.is_remote())
    }

    pub fn local_stages(&self) -> impl Iterator<Item = PlannedStage> + '_ {
        self.stages.iter().copied().filter(|s| !s.kind.is_remote())
    }

    pub fn remote_stages(&self) -> impl Iterator<Item = PlannedStage> + '_ {
        self.stages.iter().copied().filter(|s| s.kind.is_remote())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(skip_build: bool, skip_git: bool, fix_only: bool) -> RunFlags {
        RunFlags {
            skip_build,
            skip_git,
            fix_only,
        }
    }

    fn kinds(plan: &StagePlan) -> Vec<StageKind> {
        plan.stages().iter().map(|s| s.kind).collect()
    }

    #[test]
    fn default_run_has_seven_stages() {
        let plan = StagePlan::with_git(RunFlags::default(), true);
        assert_eq!(plan.total(), 7);
        assert_eq!(kinds(&plan), StageKind::ALL.to_vec());
        assert!(plan.skipped().is_empty());
    }

    #[test]
    fn skip_git_drops_publish_and_wait() {
        let plan = StagePlan::with_git(flags(false, true, false), true);
        assert_eq!(plan.total(), 5);
        assert!(!plan.contains(StageKind::Publish));
        assert!(!plan.contains(StageKind::Wait));
        assert_eq!(plan.get(StageKind::CleanAssets).map(|s| s.number), Some(2));
    }

    #[test]
    fn skip_build_and_git_leaves_remote_stages() {
        let plan = StagePlan::with_git(flags(true, true, false), true);
        assert_eq!(plan.total(), 4);
        assert_eq!(
            kinds(&plan),
            vec![
                StageKind::CleanAssets,
                StageKind::Sync,
                StageKind::Symlink,
                StageKind::ServerConfig
            ]
        );
        assert_eq!(plan.stages()[0].number, 1);
        assert_eq!(plan.stages()[3].number, 4);
    }

    #[test]
    fn fix_only_overrides_everything() {
        for (b, g) in [(false, false), (true, false), (false, true), (true, true)] {
            let plan = StagePlan::with_git(flags(b, g, true), true);
            assert_eq!(
                kinds(&plan),
                vec![StageKind::Symlink, StageKind::ServerConfig]
            );
            assert!(plan.stages().iter().all(|s| s.total == 2));
        }
    }

    #[test]
    fn git_disabled_in_config_behaves_like_skip_git() {
        let plan = StagePlan::with_git(RunFlags::default(), false);
        assert_eq!(plan.total(), 5);
        assert_eq!(
            StageKind::Publish.skip_reason(RunFlags::default()),
            "git disabled in config"
        );
    }

    #[test]
    fn numbers_are_consecutive() {
        let plan = StagePlan::with_git(flags(true, false, false), true);
        let numbers: Vec<usize> = plan.stages().iter().map(|s| s.number).collect();
        assert_eq!(numbers, (1..=plan.total()).collect::<Vec<_>>());
    }

    #[test]
    fn skip_reasons_name_the_flag() {
        assert_eq!(StageKind::Build.skip_reason(flags(true, false, false)), "--skip-build");
        assert_eq!(StageKind::Wait.skip_reason(flags(false, true, false)), "--skip-git");
        assert_eq!(StageKind::Sync.skip_reason(flags(false, false, true)), "--fix-only");
    }

    #[test]
    fn remote_split() {
        let plan = StagePlan::with_git(RunFlags::default(), true);
        assert_eq!(plan.local_stages().count(), 3);
        assert_eq!(plan.remote_stages().count(), 4);
        assert!(plan.needs_remote());
    }
}
