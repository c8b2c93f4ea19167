//! ControlPlane port - the kubectl command surface, scoped to a namespace
//!
//! Every component talks to the cluster exclusively through this trait.

use crate::domain::value_objects::{Namespace, TrackedKind};
use crate::error::DeployResult;

/// Namespace-scoped control-plane command execution
///
/// Implementations:
/// - `KubectlRunner` - shells out to kubectl, retrying transient failures
/// - scripted fakes in tests
pub trait ControlPlane {
    /// Run one command (e.g. `["apply", "-f", path]`) and return its trimmed output.
    ///
    /// Fails with `DeployError::Command` once the implementation gives up.
    fn run(&self, namespace: &Namespace, args: &[&str]) -> DeployResult<String>;

    /// Names of every live resource of `kind`, from `get <kind> -o name`.
    fn resource_names(&self, namespace: &Namespace, kind: &str) -> DeployResult<Vec<String>> {
        let output = self.run(namespace, &["get", kind, "-o", "name"])?;
        Ok(parse_resource_names(&output))
    }

    /// Live names of a tracked kind, minus the control plane's own reserved ones.
    fn tracked_names(&self, namespace: &Namespace, kind: TrackedKind) -> DeployResult<Vec<String>> {
        Ok(self
            .resource_names(namespace, kind.as_str())?
            .into_iter()
            .filter(|name| !kind.is_reserved(name))
            .collect())
    }
}

/// Parse `<kind>/<name>` lines; lines without a `/` are skipped.
pub fn parse_resource_names(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.trim().split_once('/'))
        .map(|(_, name)| name.to_string())
        .collect()
}
