//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::DeployResult;

use super::loader::{self, ConfigWarning};

/// How the control plane is reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KubectlConfig {
    #[serde(default = "default_binary")]
    pub binary: PathBuf,

    /// Passed as `--kubeconfig` on every invocation
    #[serde(default)]
    pub kubeconfig: Option<PathBuf>,
}

impl Default for KubectlConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            kubeconfig: None,
        }
    }
}

fn default_binary() -> PathBuf {
    PathBuf::from("kubectl")
}

/// Deploy configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployConfig {
    /// Root of the rendered manifest tree
    #[serde(default = "default_template_dir")]
    pub template_dir: PathBuf,

    /// Fail instead of warn on client/server version skew
    #[serde(default)]
    pub version_checks: bool,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            template_dir: default_template_dir(),
            version_checks: false,
        }
    }
}

fn default_template_dir() -> PathBuf {
    PathBuf::from("./k8-generated/")
}

/// Output configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub color: ColorMode,

    #[serde(default)]
    pub format: OutputFormat,
}

/// Color output mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "always" => Some(Self::Always),
            "never" => Some(Self::Never),
            _ => None,
        }
    }
}

/// Progress output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    /// NDJSON events on stdout
    Json,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub kubectl: KubectlConfig,

    #[serde(default)]
    pub deploy: DeployConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration and collect non-fatal warnings (e.g. unknown keys).
    pub fn load_with_warnings(path: &Path) -> DeployResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Defaults, then user config, then project config (or `explicit`),
    /// then `KDEPLOY_*` environment variables.
    pub fn load_layered(explicit: Option<&Path>) -> DeployResult<(Self, Vec<ConfigWarning>)> {
        loader::load_layered(explicit)
    }

    /// Apply environment variable overrides (KDEPLOY_* prefix)
    pub fn with_env_overrides(self) -> Self {
        loader::with_env_overrides(self)
    }
}
