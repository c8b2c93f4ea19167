//! Resource groups and the fixed deployment order

use std::path::{Path, PathBuf};

use crate::error::{DeployError, DeployResult};

/// Name of the hidden file listing a group's strictly ordered manifests
pub const DEPENDENCY_SENTINEL: &str = ".depend.start";

/// One pipeline step: a manifest file or directory applied together
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceGroup {
    /// Path relative to the template root
    pub path: PathBuf,
    /// Skip silently when the path does not exist
    pub ignore_if_missing: bool,
    /// Apply only the dependency-ordered files, never the whole directory
    pub dependency_only: bool,
    /// Wait for every storage claim to bind once the group is applied
    pub await_storage: bool,
}

impl ResourceGroup {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ignore_if_missing: false,
            dependency_only: false,
            await_storage: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.ignore_if_missing = true;
        self
    }

    pub fn dependency_only(mut self) -> Self {
        self.dependency_only = true;
        self
    }

    pub fn awaiting_storage(mut self) -> Self {
        self.await_storage = true;
        self
    }

    /// The fixed group order of a full deployment.
    ///
    /// Namespace and secrets exist before anything references them; storage
    /// is bound before stateful workloads start; jobs and cronjobs are never
    /// bulk-started; the final step applies whatever lives at the root.
    pub fn full_deployment() -> Vec<ResourceGroup> {
        vec![
            ResourceGroup::new("namespace.yaml"),
            ResourceGroup::new("secrets").optional(),
            ResourceGroup::new("storage").optional().awaiting_storage(),
            ResourceGroup::new("configmaps").optional(),
            ResourceGroup::new("services").optional(),
            ResourceGroup::new("deployments").optional(),
            ResourceGroup::new("statefulsets").optional(),
            ResourceGroup::new("daemonsets").optional(),
            ResourceGroup::new("jobs").optional().dependency_only(),
            ResourceGroup::new("cronjobs").optional().dependency_only(),
            ResourceGroup::new("."),
        ]
    }

    /// Absolute location of the group under `root`
    pub fn resolve(&self, root: &Path) -> PathBuf {
        root.join(&self.path)
    }

    /// Location of the group's dependency sentinel under `root`
    pub fn sentinel_path(&self, root: &Path) -> PathBuf {
        self.resolve(root).join(DEPENDENCY_SENTINEL)
    }
}

/// Ordered manifest filenames, relative to the group directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyOrder {
    pub files: Vec<String>,
}

impl DependencyOrder {
    /// Parse the sentinel document: a plain YAML sequence of filenames.
    ///
    /// An empty document is an empty order.
    pub fn parse(content: &str, sentinel: &Path) -> DeployResult<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let files: Option<Vec<String>> =
            serde_yaml_ng::from_str(content).map_err(|e| DeployError::InvalidManifest {
                file: sentinel.to_path_buf(),
                message: format!("expected a list of filenames: {}", e),
            })?;
        Ok(Self {
            files: files.unwrap_or_default(),
        })
    }
}
