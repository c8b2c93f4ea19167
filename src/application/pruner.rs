//! Namespace Pruner
//!
//! Deletes live resources that no manifest under the template root declares.
//! Both inventories are rebuilt on every call; nothing is cached between runs.

use std::path::Path;

use serde::Serialize;

use crate::domain::entities::{ClusterInventory, DesiredInventory, Inventory, Orphans};
use crate::domain::ports::{ControlPlane, DeployEvent, DeployEventSink, ManifestRepository};
use crate::domain::value_objects::{Namespace, TrackedKind};
use crate::error::{DeployError, DeployResult};

/// Outcome of a prune
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PruneReport {
    pub orphans: Orphans,
    /// False in dry-run mode
    pub deleted: bool,
}

pub struct NamespacePruner<'a> {
    plane: &'a dyn ControlPlane,
    manifests: &'a dyn ManifestRepository,
    events: &'a dyn DeployEventSink,
}

impl<'a> NamespacePruner<'a> {
    pub fn new(
        plane: &'a dyn ControlPlane,
        manifests: &'a dyn ManifestRepository,
        events: &'a dyn DeployEventSink,
    ) -> Self {
        Self {
            plane,
            manifests,
            events,
        }
    }

    /// Diff the namespace against `template_root` and remove (or, with
    /// `dry_run`, only report) the orphans.
    pub fn prune(
        &self,
        namespace: &Namespace,
        template_root: &Path,
        dry_run: bool,
    ) -> DeployResult<PruneReport> {
        if !template_root.is_dir() {
            return Err(DeployError::validation(format!(
                "path either does not exist, or is not a directory: {}",
                template_root.display()
            )));
        }

        let cluster = self.cluster_inventory(namespace)?;
        let desired = self.desired_inventory(template_root)?;
        let orphans = cluster.orphans_against(&desired);
        tracing::info!(%namespace, orphans = orphans.len(), dry_run, "namespace diff computed");

        for (kind, names) in orphans.iter() {
            if dry_run {
                self.events.on_event(DeployEvent::OrphansFound {
                    kind,
                    names: names.iter().cloned().collect(),
                });
                continue;
            }
            for name in names {
                self.delete_orphan(namespace, kind, name)?;
            }
        }

        Ok(PruneReport {
            orphans,
            deleted: !dry_run,
        })
    }

    /// Live names of every tracked kind, reserved names excluded
    pub fn cluster_inventory(&self, namespace: &Namespace) -> DeployResult<ClusterInventory> {
        let mut inventory = Inventory::new();
        for kind in TrackedKind::ALL {
            inventory.touch(kind);
            for name in self.plane.tracked_names(namespace, kind)? {
                inventory.insert(kind, name);
            }
        }
        Ok(inventory)
    }

    /// Names declared by every manifest under `template_root`
    pub fn desired_inventory(&self, template_root: &Path) -> DeployResult<DesiredInventory> {
        let manifests = self.manifests.load_tree(template_root)?;
        Ok(Inventory::from_manifests(&manifests))
    }

    fn delete_orphan(&self, namespace: &Namespace, kind: TrackedKind, name: &str) -> DeployResult<()> {
        self.events.on_event(DeployEvent::OrphanDeleting {
            kind,
            name: name.to_string(),
        });
        match self.plane.run(namespace, &["delete", kind.as_str(), name]) {
            Ok(_) => Ok(()),
            Err(e) if e.is_not_found() => {
                tracing::debug!(%namespace, %kind, resource = name, "orphan already gone");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{ns, RecordingSink, ScriptedPlane};
    use crate::infrastructure::FsManifestRepository;
    use std::fs;
    use tempfile::TempDir;

    fn template_root() -> TempDir {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("configmaps")).unwrap();
        fs::create_dir_all(root.path().join("deployments")).unwrap();
        fs::write(
            root.path().join("configmaps/app.yaml"),
            "kind: ConfigMap\nmetadata:\n  name: app-config\n",
        )
        .unwrap();
        fs::write(
            root.path().join("deployments/web.yml"),
            "kind: Deployment\nmetadata:\n  name: web\n",
        )
        .unwrap();
        root
    }

    fn live_cluster() -> ScriptedPlane {
        ScriptedPlane::new()
            .respond(
                "get ConfigMap -o name",
                "configmap/app-config\nconfigmap/stale-config",
            )
            .respond("get Deployment -o name", "deployment.apps/web")
            .respond("get Secret -o name", "secret/default-token-q2x9z")
            .respond("get Service -o name", "service/glusterfs-dynamic-data")
    }

    #[test]
    fn deletes_only_the_stale_config() {
        let root = template_root();
        let plane = live_cluster();
        let sink = RecordingSink::default();
        let pruner = NamespacePruner::new(&plane, &FsManifestRepository, &sink);

        let report = pruner.prune(&ns("shop"), root.path(), false).unwrap();

        let mut expected = Inventory::new();
        expected.insert(TrackedKind::ConfigMap, "stale-config");
        assert_eq!(report.orphans, expected);
        assert!(report.deleted);
        assert_eq!(plane.count_prefix("delete"), 1);
        assert_eq!(plane.count("delete ConfigMap stale-config"), 1);
        assert_eq!(
            sink.events(),
            vec![DeployEvent::OrphanDeleting {
                kind: TrackedKind::ConfigMap,
                name: "stale-config".to_string()
            }]
        );
    }

    #[test]
    fn dry_run_reports_without_deleting() {
        let root = template_root();
        let plane = live_cluster().respond("get Job -o name", "job.batch/old-migrate");
        let sink = RecordingSink::default();
        let pruner = NamespacePruner::new(&plane, &FsManifestRepository, &sink);

        let report = pruner.prune(&ns("shop"), root.path(), true).unwrap();

        assert!(!report.deleted);
        assert_eq!(report.orphans.len(), 2);
        assert_eq!(plane.count_prefix("delete"), 0);
        assert_eq!(
            sink.events(),
            vec![
                DeployEvent::OrphansFound {
                    kind: TrackedKind::ConfigMap,
                    names: vec!["stale-config".to_string()]
                },
                DeployEvent::OrphansFound {
                    kind: TrackedKind::Job,
                    names: vec!["old-migrate".to_string()]
                },
            ]
        );
    }

    #[test]
    fn second_prune_finds_nothing() {
        let root = template_root();
        // The second listing reflects the cluster after the first prune.
        let plane = live_cluster()
            .respond("get ConfigMap -o name", "configmap/app-config");
        let sink = RecordingSink::default();
        let pruner = NamespacePruner::new(&plane, &FsManifestRepository, &sink);

        let first = pruner.prune(&ns("shop"), root.path(), false).unwrap();
        let second = pruner.prune(&ns("shop"), root.path(), false).unwrap();

        assert_eq!(first.orphans.len(), 1);
        assert!(second.orphans.is_empty());
        assert_eq!(plane.count_prefix("delete"), 1);
    }

    #[test]
    fn already_deleted_orphan_is_tolerated() {
        let root = template_root();
        let plane = live_cluster().fail(
            "delete ConfigMap stale-config",
            "Error from server (NotFound): configmaps \"stale-config\" not found",
        );
        let sink = RecordingSink::default();
        let pruner = NamespacePruner::new(&plane, &FsManifestRepository, &sink);

        assert!(pruner.prune(&ns("shop"), root.path(), false).is_ok());
    }

    #[test]
    fn missing_template_root_is_a_validation_error() {
        let plane = ScriptedPlane::new();
        let sink = RecordingSink::default();
        let pruner = NamespacePruner::new(&plane, &FsManifestRepository, &sink);

        let err = pruner
            .prune(&ns("shop"), Path::new("/definitely/not/here"), false)
            .unwrap_err();

        assert!(matches!(err, DeployError::Validation { .. }));
        assert!(plane.calls().is_empty());
    }

    #[test]
    fn cluster_inventory_queries_every_tracked_kind() {
        let plane = live_cluster();
        let sink = RecordingSink::default();
        let pruner = NamespacePruner::new(&plane, &FsManifestRepository, &sink);

        let inventory = pruner.cluster_inventory(&ns("shop")).unwrap();

        assert_eq!(plane.count_prefix("get "), TrackedKind::ALL.len());
        assert!(inventory.names(TrackedKind::Secret).unwrap().is_empty());
        assert!(inventory.names(TrackedKind::Service).unwrap().is_empty());
        assert_eq!(inventory.len(), 3);
    }
}
