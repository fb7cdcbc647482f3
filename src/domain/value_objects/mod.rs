//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod remote_path;

pub use remote_path::{PathError, RemotePath};
