//! Resource manifest entity
//!
//! Only the identifying fields are extracted; the rest of the document is
//! handed to the control plane untouched.

use std::path::Path;

use serde::Deserialize;

use crate::error::{DeployError, DeployResult};

/// Identity of one manifest document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceManifest {
    pub kind: String,
    pub name: String,
    /// `metadata.namespace`, when the document sets one
    pub namespace: Option<String>,
}

impl ResourceManifest {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
            namespace: None,
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

#[derive(Debug, Deserialize)]
struct RawDocument {
    kind: Option<String>,
    metadata: Option<RawMetadata>,
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
    name: Option<String>,
    namespace: Option<String>,
}

/// Parse every document of a (possibly multi-document) YAML or JSON file.
///
/// `file` is only used for error messages. Empty documents are skipped.
pub fn parse_manifest_documents(content: &str, file: &Path) -> DeployResult<Vec<ResourceManifest>> {
    let mut manifests = Vec::new();

    for document in serde_yaml_ng::Deserializer::from_str(content) {
        let value = serde_yaml_ng::Value::deserialize(document)?;
        if value.is_null() {
            continue;
        }

        let raw: RawDocument =
            serde_yaml_ng::from_value(value).map_err(|e| DeployError::InvalidManifest {
                file: file.to_path_buf(),
                message: e.to_string(),
            })?;

        let kind = raw.kind.ok_or_else(|| DeployError::InvalidManifest {
            file: file.to_path_buf(),
            message: "document has no 'kind'".to_string(),
        })?;
        let metadata = raw.metadata.ok_or_else(|| DeployError::InvalidManifest {
            file: file.to_path_buf(),
            message: format!("{} document has no 'metadata'", kind),
        })?;
        let name = metadata.name.ok_or_else(|| DeployError::InvalidManifest {
            file: file.to_path_buf(),
            message: format!("{} document has no 'metadata.name'", kind),
        })?;

        manifests.push(ResourceManifest {
            kind,
            name,
            namespace: metadata.namespace,
        });
    }

    Ok(manifests)
}
