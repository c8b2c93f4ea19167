//! Thread Sleeper
//!
//! Implements the Sleeper port by blocking the current thread.

use std::time::Duration;

use crate::domain::ports::Sleeper;

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}
