//! ManifestRepository port - read access to the rendered manifest tree

use std::path::Path;

use crate::domain::entities::{DependencyOrder, ResourceManifest};
use crate::error::DeployResult;

/// Read-only view of rendered manifests
///
/// The orchestrator never renders or validates manifests beyond their
/// identifying fields; this port only locates and parses them.
pub trait ManifestRepository {
    fn exists(&self, path: &Path) -> bool;

    /// Every document in one manifest file
    fn load_file(&self, path: &Path) -> DeployResult<Vec<ResourceManifest>>;

    /// The dependency order at `sentinel`, or `None` when there is no sentinel
    fn load_dependency_order(&self, sentinel: &Path) -> DeployResult<Option<DependencyOrder>>;

    /// Every document in every manifest file under `root`, recursively
    fn load_tree(&self, root: &Path) -> DeployResult<Vec<ResourceManifest>>;
}
