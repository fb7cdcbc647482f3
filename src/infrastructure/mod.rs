//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - Remote file system implementations (SFTP, local mirror)
//! - `events/` - Event sinks (JSON)
//! - `process` - External commands
//! - `sleeper` - Blocking delays

pub mod events;
pub mod fs;
pub mod process;
pub mod sleeper;

// Re-export for convenience
pub use events::JsonEventSink;
pub use fs::{LocalConnector, LocalMirrorFs, SftpConnector, SftpSession};
pub use process::SystemCommandRunner;
pub use sleeper::ThreadSleeper;
