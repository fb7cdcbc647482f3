//! Domain Layer
//!
//! Stage-independent types and the ports the stages talk through.
//!
//! ## Structure
//!
//! - `value_objects/` - Immutable value types (RemotePath)
//! - `ports/` - Interface definitions for infrastructure
//!
//! ## Design Principles
//!
//! 1. **No I/O** - This layer never touches the file system or network directly
//! 2. **Ports & Adapters** - All I/O goes through trait-defined ports

pub mod ports;
pub mod value_objects;
