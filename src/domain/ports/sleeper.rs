//! Sleeper port - blocking delays

use std::time::Duration;

/// Blocks the calling thread
pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}
