//! Configuration module for kdeploy
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (KDEPLOY_*)
//! 3. Project config (./kdeploy.toml or --config)
//! 4. User config (<config_dir>/kdeploy/config.toml)
//! 5. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use loader::{ConfigWarning, PROJECT_CONFIG_FILE};
pub use types::{ColorMode, Config, DeployConfig, KubectlConfig, OutputConfig, OutputFormat};
