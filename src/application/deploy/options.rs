//! Deploy Options

use std::path::PathBuf;

use crate::domain::value_objects::Namespace;

/// Options for the deploy use case
#[derive(Debug, Clone)]
pub struct DeployOptions {
    /// Target namespace; must match `namespace.yaml`
    pub namespace: Namespace,
    /// Root of the rendered manifest tree
    pub template_dir: PathBuf,
    /// Kubeconfig the control plane is addressed with (checked for existence)
    pub kubeconfig: Option<PathBuf>,
    /// Fail instead of warn on client/server version skew
    pub version_checks: bool,
    /// Report orphans at the end instead of deleting them
    pub prune_dry_run: bool,
}

impl DeployOptions {
    pub fn new(namespace: Namespace, template_dir: impl Into<PathBuf>) -> Self {
        Self {
            namespace,
            template_dir: template_dir.into(),
            kubeconfig: None,
            version_checks: false,
            prune_dry_run: false,
        }
    }

    pub fn with_kubeconfig(mut self, kubeconfig: impl Into<PathBuf>) -> Self {
        self.kubeconfig = Some(kubeconfig.into());
        self
    }

    pub fn with_version_checks(mut self, enforce: bool) -> Self {
        self.version_checks = enforce;
        self
    }

    pub fn with_prune_dry_run(mut self, dry_run: bool) -> Self {
        self.prune_dry_run = dry_run;
        self
    }
}
