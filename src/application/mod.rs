//! Application Layer
//!
//! Use cases that orchestrate the rollout.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain readiness rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `DeployUseCase` - Orchestrates the deploy flow (validate, drain, apply, prune)
//!
//! ## Services
//!
//! - `ReadinessPoller` - Bounded polling of a readiness probe
//! - `JobReaper` - Waits for running jobs, then deletes them all
//! - `Sequencer` - Applies one resource group, gating on readiness
//! - `NamespacePruner` - Deletes resources no manifest declares

pub mod deploy;
pub mod poller;
pub mod pruner;
pub mod reaper;
pub mod sequencer;
pub mod validation;

#[cfg(test)]
pub(crate) mod testing;

pub use deploy::{DeployOptions, DeployReport, DeployUseCase};
pub use poller::{ReadinessPoller, POLL_INTERVAL};
pub use pruner::{NamespacePruner, PruneReport};
pub use reaper::{JobReaper, DRAIN_RETRY_DELAY, MAX_DRAIN_RETRIES};
pub use sequencer::{GroupOutcome, Sequencer, STORAGE_MAX_ATTEMPTS};
