//! kdeploy - ordered, readiness-gated rollout of Kubernetes manifest trees
//!
//! kdeploy applies a rendered manifest tree to one namespace in a fixed group
//! order, waits for deployments, jobs and storage claims to become ready
//! between steps, and finally deletes live resources that no manifest
//! declares any more.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;
pub mod ui;

// Re-exports for convenience
pub use application::{DeployOptions, DeployReport, DeployUseCase, PruneReport};
pub use config::Config;
pub use domain::ports::{ControlPlane, DeployEvent, DeployEventSink, ManifestRepository, Sleeper};
pub use domain::value_objects::{Namespace, TrackedKind};
pub use error::{DeployError, DeployResult};
