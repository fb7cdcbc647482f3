//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Choosing the remote target (SFTP or local mirror)
//!
//! Terminal rendering lives with the binary in `src/ui`.

pub mod cli;
pub mod factory;

pub use cli::{Cli, ColorWhen};
pub use factory::{create_connector, create_local_connector};
