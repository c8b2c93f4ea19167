//! Namespace value object

use crate::error::{DeployError, DeployResult};

/// A validated Kubernetes namespace name (RFC 1123 label)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace(String);

impl Namespace {
    pub fn parse(name: impl Into<String>) -> DeployResult<Self> {
        let name = name.into();
        let valid_chars = name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        let valid_edges = !name.starts_with('-') && !name.ends_with('-');
        if name.is_empty() || name.len() > 63 || !valid_chars || !valid_edges {
            return Err(DeployError::validation(format!(
                "invalid namespace name '{}'",
                name
            )));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Namespace {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
