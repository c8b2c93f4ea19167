//! Domain Layer
//!
//! Resource identities, inventories, readiness rules and the ports through
//! which the application layer reaches the cluster and the manifest tree.
//!
//! ## Structure
//!
//! - `entities/` - ResourceManifest, ResourceGroup, Inventory
//! - `value_objects/` - Namespace, TrackedKind
//! - `services/` - Readiness probes and status extraction
//! - `ports/` - ControlPlane, ManifestRepository, Sleeper, DeployEventSink

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
