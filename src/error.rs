//! Error types for kdeploy
//!
//! Uses `thiserror` for library errors. The binary wraps these in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for kdeploy operations
pub type DeployResult<T> = Result<T, DeployError>;

/// Main error type for kdeploy operations
#[derive(Error, Debug)]
pub enum DeployError {
    /// Malformed or mismatched input (never retried)
    #[error("validation failed: {message}")]
    Validation { message: String },

    /// A control-plane command kept failing after its retries
    #[error("kubectl {} failed ({status}): {output}", args.join(" "))]
    Command {
        args: Vec<String>,
        status: String,
        output: String,
    },

    /// A polled resource never became ready within its attempt budget
    #[error("condition not met: {probe}({namespace}, {name}) after {attempts} attempts")]
    ReadinessTimeout {
        probe: String,
        namespace: String,
        name: String,
        attempts: u32,
    },

    /// A resource reached a terminal failure state
    #[error("{message}")]
    FatalResourceState { message: String },

    /// Running jobs did not finish within the drain rounds
    #[error("running job '{job}' detected after {rounds} drain rounds, aborting deployment")]
    DrainExhausted { job: String, rounds: u32 },

    /// A manifest document is missing `kind` or `metadata.name`
    #[error("invalid manifest {file}: {message}")]
    InvalidManifest { file: PathBuf, message: String },

    /// A config file could not be parsed
    #[error("invalid config {file}: {message}")]
    Config { file: PathBuf, message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl DeployError {
    pub fn validation(message: impl Into<String>) -> Self {
        DeployError::Validation {
            message: message.into(),
        }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        DeployError::FatalResourceState {
            message: message.into(),
        }
    }

    /// True when a command failed because the target resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DeployError::Command { output, .. } if output.contains("not found"))
    }
}
