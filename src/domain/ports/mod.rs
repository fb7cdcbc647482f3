//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod command_runner;
pub mod deploy_events;
pub mod remote_fs;
pub mod sleeper;

pub use command_runner::{CommandOutput, CommandRunner};
pub use deploy_events::{DeployEvent, DeployEventSink, Level, NoopEventSink};
pub use remote_fs::{
    EntryKind, FsError, FsResult, RemoteConnector, RemoteFs, RemoteSession,
};
pub use sleeper::Sleeper;
