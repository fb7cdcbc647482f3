//! Remote File System Implementations
//!
//! Concrete implementations of the RemoteFs port.

mod local;
mod sftp;

pub use local::{LocalConnector, LocalMirrorFs};
pub use sftp::{SftpConnector, SftpSession};
