//! Presentation Layer
//!
//! This layer handles:
//! - CLI argument parsing (via clap)
//! - Creating use cases with infrastructure dependencies
//! - Output formatting (text/JSON)
//!
//! ## Structure
//!
//! - `cli` - Argument definitions
//! - `factory` - Creates use cases with proper dependencies (dependency injection)
//! - `output` - Report rendering
//!
//! ## Usage
//!
//! ```ignore
//! use kdeploy::presentation::factory;
//!
//! let use_case = factory::create_deploy_use_case("kubectl", Some(kubeconfig), events);
//! let report = use_case.execute(&options)?;
//! ```

pub mod cli;
pub mod factory;
pub mod output;

pub use factory::{create_deploy_use_case, create_event_sink, ConcreteDeployUseCase};
pub use output::{create_renderer, ReportRenderer};
