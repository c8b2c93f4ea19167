//! Domain Entities
//!
//! - `ResourceManifest` - kind/name/namespace of one manifest document
//! - `ResourceGroup` / `DependencyOrder` - pipeline steps of a deployment
//! - `Inventory` - kind-keyed resource names, live or declared

mod inventory;
mod manifest;
mod resource_group;

pub use inventory::{ClusterInventory, DesiredInventory, Inventory, Orphans};
pub use manifest::{parse_manifest_documents, ResourceManifest};
pub use resource_group::{DependencyOrder, ResourceGroup, DEPENDENCY_SENTINEL};
