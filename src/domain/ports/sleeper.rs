//! Sleeper port - the only way the pipeline waits
//!
//! Timeouts are attempt counts times a fixed interval, so swapping the
//! sleeper changes wall time without changing any bound.

use std::time::Duration;

pub trait Sleeper {
    fn sleep(&self, duration: Duration);
}
