//! Kind-keyed resource inventories and the orphan diff

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::domain::value_objects::TrackedKind;

use super::ResourceManifest;

/// Resource names grouped by tracked kind
///
/// Used for the live cluster state, the declared manifest state, and the
/// orphans left over when one is subtracted from the other.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Inventory {
    kinds: BTreeMap<TrackedKind, BTreeSet<String>>,
}

/// Live names currently in the namespace
pub type ClusterInventory = Inventory;
/// Names declared across the manifest tree
pub type DesiredInventory = Inventory;
/// Live names with no declaration
pub type Orphans = Inventory;

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a declared inventory, skipping kinds that are not tracked
    pub fn from_manifests<'a>(manifests: impl IntoIterator<Item = &'a ResourceManifest>) -> Self {
        let mut inventory = Self::new();
        for manifest in manifests {
            if let Some(kind) = TrackedKind::from_manifest_kind(&manifest.kind) {
                inventory.insert(kind, manifest.name.clone());
            }
        }
        inventory
    }

    pub fn insert(&mut self, kind: TrackedKind, name: impl Into<String>) {
        self.kinds.entry(kind).or_default().insert(name.into());
    }

    /// Record a kind as queried even when it has no names
    pub fn touch(&mut self, kind: TrackedKind) {
        self.kinds.entry(kind).or_default();
    }

    pub fn names(&self, kind: TrackedKind) -> Option<&BTreeSet<String>> {
        self.kinds.get(&kind)
    }

    pub fn contains(&self, kind: TrackedKind, name: &str) -> bool {
        self.kinds
            .get(&kind)
            .is_some_and(|names| names.contains(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (TrackedKind, &BTreeSet<String>)> {
        self.kinds.iter().map(|(kind, names)| (*kind, names))
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.values().all(BTreeSet::is_empty)
    }

    /// Total number of names across all kinds
    pub fn len(&self) -> usize {
        self.kinds.values().map(BTreeSet::len).sum()
    }

    /// Names in `self` that `desired` does not declare.
    ///
    /// A kind missing from `desired` orphans every name under it. Kinds whose
    /// orphan set is empty are dropped from the result.
    pub fn orphans_against(&self, desired: &Inventory) -> Orphans {
        let mut orphans = Inventory::new();
        for (kind, names) in &self.kinds {
            let leftover: BTreeSet<String> = match desired.kinds.get(kind) {
                Some(declared) => names.difference(declared).cloned().collect(),
                None => names.clone(),
            };
            if !leftover.is_empty() {
                orphans.kinds.insert(*kind, leftover);
            }
        }
        orphans
    }
}
