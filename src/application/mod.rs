//! Application Layer
//!
//! The deploy stages and the pipeline that sequences them.
//! This layer:
//! - Talks to the outside world only through domain ports
//! - Reports progress through `DeployEventSink`
//! - Returns per-stage reports; only fatal conditions become errors
//!
//! ## Stages
//!
//! - `build` - run the front-end build
//! - `publish` - git commit and push
//! - `wait` - wait for the hosting auto-deploy
//! - `clean` - purge remote assets
//! - `sync` - mirror the build output tree
//! - `symlink` - repair the public symlink
//! - `server_config` - upload and verify `.htaccess`

pub mod build;
pub mod clean;
pub mod pipeline;
pub mod publish;
pub mod report;
pub mod server_config;
pub mod stages;
pub mod symlink;
pub mod sync;
pub mod wait;

#[cfg(test)]
pub(crate) mod testing;

pub use pipeline::Pipeline;
pub use report::{
    CleanReport, DeployReport, EntryFailure, PublishOutcome, ServerConfigReport, SymlinkAction,
    SymlinkReport, SyncReport, TokenCheck,
};
pub use stages::{PlannedStage, RunFlags, StageKind, StagePlan};
pub use sync::human_bytes;
