//! File System Manifest Repository
//!
//! Loads Kubernetes manifests and dependency sentinels from the local disk.

use std::path::Path;

use ignore::WalkBuilder;

use crate::domain::entities::{parse_manifest_documents, DependencyOrder, ResourceManifest};
use crate::domain::ports::ManifestRepository;
use crate::error::DeployResult;

/// File extensions scanned by `load_tree`
pub const MANIFEST_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Manifest repository that reads from the file system
#[derive(Debug, Clone, Copy, Default)]
pub struct FsManifestRepository;

impl FsManifestRepository {
    pub fn new() -> Self {
        Self
    }

    fn is_manifest(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| MANIFEST_EXTENSIONS.contains(&ext))
    }
}

impl ManifestRepository for FsManifestRepository {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn load_file(&self, path: &Path) -> DeployResult<Vec<ResourceManifest>> {
        let content = std::fs::read_to_string(path)?;
        parse_manifest_documents(&content, path)
    }

    fn load_dependency_order(&self, sentinel: &Path) -> DeployResult<Option<DependencyOrder>> {
        if !sentinel.is_file() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(sentinel)?;
        DependencyOrder::parse(&content, sentinel).map(Some)
    }

    /// Every manifest under `root`, hidden files included and no ignore
    /// files honored, in file-name order.
    fn load_tree(&self, root: &Path) -> DeployResult<Vec<ResourceManifest>> {
        let walker = WalkBuilder::new(root)
            .standard_filters(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let mut manifests = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| std::io::Error::other(e.to_string()))?;
            let path = entry.path();
            if !entry.file_type().is_some_and(|t| t.is_file()) || !Self::is_manifest(path) {
                continue;
            }
            tracing::trace!(file = %path.display(), "reading manifest");
            manifests.extend(self.load_file(path)?);
        }
        Ok(manifests)
    }
}
