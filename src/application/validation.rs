//! Pre-deploy input validation
//!
//! Runs before anything in the cluster is touched. Mismatches abort; a
//! client/server version skew only warns unless version checks are enforced.

use std::path::Path;

use serde_json::Value;

use crate::domain::ports::{ControlPlane, DeployEvent, DeployEventSink, ManifestRepository};
use crate::domain::value_objects::Namespace;
use crate::error::{DeployError, DeployResult};

/// The manifest at the template root that must name the target namespace
pub const NAMESPACE_MANIFEST: &str = "namespace.yaml";

/// The template root exists and its namespace manifest names `namespace`.
pub fn validate_template_root(
    manifests: &dyn ManifestRepository,
    namespace: &Namespace,
    template_dir: &Path,
) -> DeployResult<()> {
    if !template_dir.is_dir() {
        return Err(DeployError::validation(format!(
            "template directory does not exist: {}",
            template_dir.display()
        )));
    }

    let namespace_file = template_dir.join(NAMESPACE_MANIFEST);
    if !manifests.exists(&namespace_file) {
        return Err(DeployError::validation(format!(
            "namespace manifest not found: {}",
            namespace_file.display()
        )));
    }

    let declared = manifests
        .load_file(&namespace_file)?
        .into_iter()
        .next()
        .ok_or_else(|| {
            DeployError::validation(format!("{} is empty", namespace_file.display()))
        })?;

    if declared.name != namespace.as_str() {
        return Err(DeployError::validation(format!(
            "namespaces do not match: requested '{}', {} declares '{}'",
            namespace, NAMESPACE_MANIFEST, declared.name
        )));
    }
    Ok(())
}

/// The kubeconfig, when given, is an existing file.
pub fn validate_kubeconfig(kubeconfig: Option<&Path>) -> DeployResult<()> {
    match kubeconfig {
        Some(path) if !path.is_file() => Err(DeployError::validation(format!(
            "kubeconfig file does not exist: {}",
            path.display()
        ))),
        _ => Ok(()),
    }
}

/// Compare client and server versions.
///
/// With `enforce` a mismatch is a validation error; otherwise it becomes a
/// warning event. An unreadable version report is always just a warning.
pub fn check_versions(
    plane: &dyn ControlPlane,
    namespace: &Namespace,
    enforce: bool,
    events: &dyn DeployEventSink,
) -> DeployResult<()> {
    let report = plane.run(namespace, &["version", "-o", "json"])?;
    let Some((client, server)) = parse_versions(&report) else {
        events.on_event(DeployEvent::Warning {
            message: "could not read kubectl client/server versions".to_string(),
        });
        return Ok(());
    };

    if client == server {
        tracing::debug!(%client, "kubectl client matches server");
        return Ok(());
    }

    let message = format!(
        "kubectl version mismatch -- install a matching client.\nClient: {}\nServer: {}",
        client, server
    );
    if enforce {
        return Err(DeployError::validation(message));
    }
    events.on_event(DeployEvent::Warning { message });
    Ok(())
}

/// `(client, server)` git versions from `kubectl version -o json`
pub fn parse_versions(report: &str) -> Option<(String, String)> {
    let value: Value = serde_json::from_str(report).ok()?;
    let version = |key: &str| {
        value
            .get(key)?
            .get("gitVersion")?
            .as_str()
            .map(str::to_string)
    };
    Some((version("clientVersion")?, version("serverVersion")?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{ns, RecordingSink, ScriptedPlane};
    use crate::infrastructure::FsManifestRepository;
    use std::fs;
    use tempfile::TempDir;

    const VERSIONS_MATCH: &str = r#"{
  "clientVersion": {"major": "1", "minor": "29", "gitVersion": "v1.29.3"},
  "serverVersion": {"major": "1", "minor": "29", "gitVersion": "v1.29.3"}
}"#;
    const VERSIONS_SKEWED: &str = r#"{
  "clientVersion": {"gitVersion": "v1.30.0"},
  "serverVersion": {"gitVersion": "v1.29.3"}
}"#;

    fn root_with_namespace(name: &str) -> TempDir {
        let root = TempDir::new().unwrap();
        fs::write(
            root.path().join(NAMESPACE_MANIFEST),
            format!("apiVersion: v1\nkind: Namespace\nmetadata:\n  name: {name}\n"),
        )
        .unwrap();
        root
    }

    #[test]
    fn matching_namespace_passes() {
        let root = root_with_namespace("shop");
        validate_template_root(&FsManifestRepository, &ns("shop"), root.path()).unwrap();
    }

    #[test]
    fn mismatched_namespace_is_rejected() {
        let root = root_with_namespace("shop-staging");
        let err = validate_template_root(&FsManifestRepository, &ns("shop"), root.path())
            .unwrap_err();
        assert!(matches!(err, DeployError::Validation { .. }));
        assert!(err.to_string().contains("shop-staging"));
    }

    #[test]
    fn missing_namespace_manifest_is_rejected() {
        let root = TempDir::new().unwrap();
        let err = validate_template_root(&FsManifestRepository, &ns("shop"), root.path())
            .unwrap_err();
        assert!(err.to_string().contains("namespace manifest not found"));
    }

    #[test]
    fn missing_kubeconfig_is_rejected() {
        assert!(validate_kubeconfig(Some(Path::new("/no/such/kubeconfig"))).is_err());
        assert!(validate_kubeconfig(None).is_ok());
    }

    #[test]
    fn parses_version_report() {
        assert_eq!(
            parse_versions(VERSIONS_SKEWED),
            Some(("v1.30.0".to_string(), "v1.29.3".to_string()))
        );
        assert_eq!(parse_versions("Client Version: v1.30.0"), None);
    }

    #[test]
    fn version_skew_warns_when_not_enforced() {
        let plane = ScriptedPlane::new().respond("version -o json", VERSIONS_SKEWED);
        let sink = RecordingSink::default();

        check_versions(&plane, &ns("shop"), false, &sink).unwrap();

        assert!(matches!(
            &sink.events()[0],
            DeployEvent::Warning { message } if message.contains("v1.29.3")
        ));
    }

    #[test]
    fn version_skew_fails_when_enforced() {
        let plane = ScriptedPlane::new().respond("version -o json", VERSIONS_SKEWED);
        let err = check_versions(&plane, &ns("shop"), true, &RecordingSink::default()).unwrap_err();
        assert!(matches!(err, DeployError::Validation { .. }));
    }

    #[test]
    fn matching_versions_are_silent() {
        let plane = ScriptedPlane::new().respond("version -o json", VERSIONS_MATCH);
        let sink = RecordingSink::default();
        check_versions(&plane, &ns("shop"), true, &sink).unwrap();
        assert!(sink.events().is_empty());
    }
}
