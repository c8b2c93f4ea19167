//! kubectl Control Plane
//!
//! Implements the ControlPlane port by shelling out to kubectl. Every
//! invocation is scoped to one namespace and one explicit kubeconfig.

use std::path::PathBuf;
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::ports::{ControlPlane, DeployEvent, DeployEventSink, NoopEventSink, Sleeper};
use crate::domain::value_objects::Namespace;
use crate::error::{DeployError, DeployResult};

use super::sleeper::ThreadSleeper;

/// Retries after the first failed invocation
pub const COMMAND_MAX_RETRIES: u32 = 3;
/// Delay between retries of a failed invocation
pub const COMMAND_RETRY_DELAY: Duration = Duration::from_secs(5);

pub struct KubectlRunner<S: Sleeper = ThreadSleeper> {
    binary: PathBuf,
    kubeconfig: Option<PathBuf>,
    sleeper: S,
    events: Arc<dyn DeployEventSink>,
}

impl KubectlRunner<ThreadSleeper> {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            kubeconfig: None,
            sleeper: ThreadSleeper,
            events: Arc::new(NoopEventSink),
        }
    }
}

impl<S: Sleeper> KubectlRunner<S> {
    pub fn with_kubeconfig(mut self, kubeconfig: Option<PathBuf>) -> Self {
        self.kubeconfig = kubeconfig;
        self
    }

    pub fn with_events(mut self, events: Arc<dyn DeployEventSink>) -> Self {
        self.events = events;
        self
    }

    pub fn with_sleeper<T: Sleeper>(self, sleeper: T) -> KubectlRunner<T> {
        KubectlRunner {
            binary: self.binary,
            kubeconfig: self.kubeconfig,
            sleeper,
            events: self.events,
        }
    }

    /// Full argument vector for one invocation
    fn command_line(&self, namespace: &Namespace, args: &[&str]) -> Vec<String> {
        let mut line = Vec::with_capacity(args.len() + 3);
        if let Some(kubeconfig) = &self.kubeconfig {
            line.push("--kubeconfig".to_string());
            line.push(kubeconfig.display().to_string());
        }
        line.push(format!("--namespace={}", namespace));
        line.extend(args.iter().map(|a| a.to_string()));
        line
    }

    fn invoke(&self, namespace: &Namespace, args: &[&str]) -> DeployResult<String> {
        let line = self.command_line(namespace, args);
        tracing::debug!(binary = %self.binary.display(), args = ?line, "invoking kubectl");

        let output = Command::new(&self.binary).args(&line).output().map_err(|e| {
            std::io::Error::new(
                e.kind(),
                format!("failed to run {}: {}", self.binary.display(), e),
            )
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if output.status.success() {
            return Ok(stdout.trim().to_string());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(DeployError::Command {
            args: args.iter().map(|a| a.to_string()).collect(),
            status: output.status.to_string(),
            output: combined_output(&stderr, &stdout),
        })
    }
}

/// Failure text: stderr then stdout, one per line, empty streams dropped
fn combined_output(stderr: &str, stdout: &str) -> String {
    [stderr.trim(), stdout.trim()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

impl<S: Sleeper> ControlPlane for KubectlRunner<S> {
    fn run(&self, namespace: &Namespace, args: &[&str]) -> DeployResult<String> {
        with_retries(&self.sleeper, self.events.as_ref(), || {
            self.invoke(namespace, args)
        })
    }
}

/// Run `attempt` until it succeeds or has failed `COMMAND_MAX_RETRIES + 1`
/// times. Only non-zero exits are retried; a binary that cannot be started
/// fails immediately.
pub(crate) fn with_retries<T>(
    sleeper: &dyn Sleeper,
    events: &dyn DeployEventSink,
    mut attempt: impl FnMut() -> DeployResult<T>,
) -> DeployResult<T> {
    let mut retry = 0;
    loop {
        match attempt() {
            Err(e @ DeployError::Command { .. }) if retry < COMMAND_MAX_RETRIES => {
                retry += 1;
                let command = match &e {
                    DeployError::Command { args, .. } => args.join(" "),
                    _ => String::new(),
                };
                tracing::warn!(%command, retry, error = %e, "kubectl failed, retrying");
                events.on_event(DeployEvent::CommandRetry {
                    command,
                    attempt: retry,
                    error: e.to_string(),
                });
                sleeper.sleep(COMMAND_RETRY_DELAY);
            }
            result => return result,
        }
    }
}
