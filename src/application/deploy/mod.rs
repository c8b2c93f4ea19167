//! Deploy Module
//!
//! Orchestrates a full rollout: validate, drain jobs, apply every resource
//! group in order, then prune drift.
//!
//! ## Structure
//!
//! - `options` - Configuration types (`DeployOptions`)
//! - `result` - Result types (`DeployReport`)
//! - `use_case` - Core use case logic (`DeployUseCase`)
//!
//! ## Usage
//!
//! ```ignore
//! use kdeploy::application::deploy::{DeployOptions, DeployUseCase};
//!
//! let use_case = DeployUseCase::new(kubectl, manifests, sleeper, events);
//! let report = use_case.execute(&DeployOptions::new(namespace, template_dir))?;
//! ```

mod options;
mod result;
mod use_case;

pub use options::DeployOptions;
pub use result::DeployReport;
pub use use_case::DeployUseCase;
