//! Tracked resource kinds - the closed set of kinds the pruner inventories

use serde::{Deserialize, Serialize};

/// Resource kinds whose live inventory is compared against the manifests
///
/// Anything outside this set is never pruned. Adding a kind here forces every
/// `match` over it (reserved names, CLI names) to be updated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TrackedKind {
    ConfigMap,
    Deployment,
    Job,
    PersistentVolumeClaim,
    Secret,
    Service,
}

impl TrackedKind {
    /// Every tracked kind, in inventory order
    pub const ALL: [TrackedKind; 6] = [
        TrackedKind::ConfigMap,
        TrackedKind::Deployment,
        TrackedKind::Job,
        TrackedKind::PersistentVolumeClaim,
        TrackedKind::Secret,
        TrackedKind::Service,
    ];

    /// The manifest `kind:` value
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackedKind::ConfigMap => "ConfigMap",
            TrackedKind::Deployment => "Deployment",
            TrackedKind::Job => "Job",
            TrackedKind::PersistentVolumeClaim => "PersistentVolumeClaim",
            TrackedKind::Secret => "Secret",
            TrackedKind::Service => "Service",
        }
    }

    /// Parse a manifest `kind:` value; `None` for untracked kinds
    pub fn from_manifest_kind(kind: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == kind)
    }

    /// Name prefixes the control plane creates on its own for this kind.
    ///
    /// These are never operator-declared and must survive a prune.
    pub fn reserved_prefixes(&self) -> &'static [&'static str] {
        match self {
            TrackedKind::Secret => &["default-token"],
            TrackedKind::Service => &["glusterfs"],
            TrackedKind::ConfigMap
            | TrackedKind::Deployment
            | TrackedKind::Job
            | TrackedKind::PersistentVolumeClaim => &[],
        }
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_prefixes()
            .iter()
            .any(|prefix| name.starts_with(prefix))
    }
}

impl std::fmt::Display for TrackedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
