//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod control_plane;
pub mod deploy_events;
pub mod manifest_repository;
pub mod sleeper;

pub use control_plane::ControlPlane;
pub use deploy_events::{DeployEvent, DeployEventSink, NoopEventSink};
pub use manifest_repository::ManifestRepository;
pub use sleeper::Sleeper;
