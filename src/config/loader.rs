//! Configuration loading and layering

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{DeployError, DeployResult};

use super::types::{ColorMode, Config, OutputFormat};

/// Project config looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = "kdeploy.toml";

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown config key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> DeployResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;
    let (config, warnings) = parse_with_warnings(&content, path)?;
    Ok((config, warnings))
}

fn parse_with_warnings(content: &str, path: &Path) -> DeployResult<(Config, Vec<ConfigWarning>)> {
    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| DeployError::Config {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                line: find_line_number(content, &key),
                suggestion: suggest_key(&key),
                key,
                file: path.to_path_buf(),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// User config, then project config, merged key by key over the defaults.
///
/// An `explicit` path replaces the project lookup and must exist.
pub fn load_layered(explicit: Option<&Path>) -> DeployResult<(Config, Vec<ConfigWarning>)> {
    let user = dirs::config_dir().map(|dir| dir.join("kdeploy").join("config.toml"));
    let project = match explicit {
        Some(path) if !path.is_file() => {
            return Err(DeployError::validation(format!(
                "config file does not exist: {}",
                path.display()
            )))
        }
        Some(path) => Some(path.to_path_buf()),
        None => Some(PathBuf::from(PROJECT_CONFIG_FILE)),
    };

    let files: Vec<PathBuf> = [user, project]
        .into_iter()
        .flatten()
        .filter(|p| p.is_file())
        .collect();
    let (config, warnings) = load_files(&files)?;
    Ok((with_env_overrides(config), warnings))
}

/// Merge `files` in order; later files win per key.
pub fn load_files(files: &[PathBuf]) -> DeployResult<(Config, Vec<ConfigWarning>)> {
    let mut merged = toml::Table::new();
    let mut warnings = Vec::new();
    let mut last = None;

    for file in files {
        let content = fs::read_to_string(file)?;
        // Validates the layer on its own and collects its unknown keys.
        let (_, layer_warnings) = parse_with_warnings(&content, file)?;
        warnings.extend(layer_warnings);

        let table: toml::Table = toml::from_str(&content).map_err(|e| DeployError::Config {
            file: file.clone(),
            message: e.to_string(),
        })?;
        merge_tables(&mut merged, table);
        tracing::debug!(file = %file.display(), "loaded config layer");
        last = Some(file);
    }

    let config: Config = toml::Value::Table(merged)
        .try_into()
        .map_err(|e: toml::de::Error| DeployError::Config {
            file: last.cloned().unwrap_or_default(),
            message: e.to_string(),
        })?;
    Ok((config, warnings))
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming)
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Apply environment variable overrides (KDEPLOY_* prefix)
pub fn with_env_overrides(config: Config) -> Config {
    with_overrides_from(config, |key| std::env::var(key).ok())
}

fn with_overrides_from(mut config: Config, get_env: impl Fn(&str) -> Option<String>) -> Config {
    if let Some(binary) = get_env("KDEPLOY_KUBECTL") {
        config.kubectl.binary = PathBuf::from(binary);
    }

    if let Some(kubeconfig) = get_env("KDEPLOY_KUBECONFIG") {
        config.kubectl.kubeconfig = Some(PathBuf::from(kubeconfig));
    }

    if let Some(dir) = get_env("KDEPLOY_TEMPLATE_DIR") {
        config.deploy.template_dir = PathBuf::from(dir);
    }

    if let Some(val) = get_env("KDEPLOY_VERSION_CHECKS") {
        config.deploy.version_checks = val.to_lowercase() != "false" && val != "0";
    }

    if let Some(color) = get_env("KDEPLOY_COLOR").as_deref().and_then(ColorMode::parse) {
        config.output.color = color;
    }

    if let Some(format) = get_env("KDEPLOY_FORMAT").as_deref().and_then(OutputFormat::parse) {
        config.output.format = format;
    }

    config
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| line.contains(needle))
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "kubectl",
        "binary",
        "kubeconfig",
        "deploy",
        "template_dir",
        "version_checks",
        "output",
        "color",
        "format",
    ];

    CANDIDATES
        .iter()
        .map(|candidate| (candidate, levenshtein(unknown, candidate)))
        .min_by_key(|(_, dist)| *dist)
        .filter(|(_, dist)| *dist <= 2)
        .map(|(candidate, _)| candidate.to_string())
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}

#[cfg(test)]
pub(super) fn overrides_for_test(config: Config, env: &[(&str, &str)]) -> Config {
    with_overrides_from(config, |key| {
        env.iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
    })
}

#[cfg(test)]
pub(super) fn suggest_for_test(unknown: &str) -> Option<String> {
    suggest_key(unknown)
}
