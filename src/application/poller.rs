//! Readiness Poller
//!
//! Bounded polling loop around a `ReadinessProbe`. The bound is an attempt
//! count; wall time is `attempts x POLL_INTERVAL`.

use std::time::Duration;

use crate::domain::ports::{ControlPlane, DeployEvent, DeployEventSink, Sleeper};
use crate::domain::services::{Readiness, ReadinessProbe};
use crate::domain::value_objects::Namespace;
use crate::error::{DeployError, DeployResult};

/// Delay between two polls of the same resource
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

pub struct ReadinessPoller<'a> {
    plane: &'a dyn ControlPlane,
    sleeper: &'a dyn Sleeper,
    events: &'a dyn DeployEventSink,
}

impl<'a> ReadinessPoller<'a> {
    pub fn new(
        plane: &'a dyn ControlPlane,
        sleeper: &'a dyn Sleeper,
        events: &'a dyn DeployEventSink,
    ) -> Self {
        Self {
            plane,
            sleeper,
            events,
        }
    }

    /// Poll until `probe` reports ready, returning the number of polls made.
    ///
    /// A fatal probe result or a command failure ends the wait immediately.
    /// Running out of attempts fails with `ReadinessTimeout`.
    pub fn wait(
        &self,
        probe: &dyn ReadinessProbe,
        namespace: &Namespace,
        name: &str,
        max_attempts: u32,
    ) -> DeployResult<u32> {
        for attempt in 0..max_attempts {
            match probe.check(self.plane, namespace, name, attempt)? {
                Readiness::Ready => {
                    if attempt != 0 {
                        self.events.on_event(DeployEvent::WaitFinished {
                            name: name.to_string(),
                            attempts: attempt + 1,
                        });
                    }
                    tracing::debug!(probe = probe.name(), %namespace, resource = name, attempt, "ready");
                    return Ok(attempt + 1);
                }
                Readiness::NotReady => {
                    if attempt == 0 {
                        self.events.on_event(DeployEvent::WaitStarted {
                            probe: probe.name().to_string(),
                            namespace: namespace.to_string(),
                            name: name.to_string(),
                        });
                    }
                    self.sleeper.sleep(POLL_INTERVAL);
                    self.events.on_event(DeployEvent::WaitTick);
                }
                Readiness::Fatal(reason) => {
                    tracing::warn!(probe = probe.name(), %namespace, resource = name, attempt, %reason, "fatal");
                    return Err(DeployError::fatal(reason));
                }
            }
        }

        Err(DeployError::ReadinessTimeout {
            probe: probe.name().to_string(),
            namespace: namespace.to_string(),
            name: name.to_string(),
            attempts: max_attempts,
        })
    }
}
