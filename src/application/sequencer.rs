//! Sequencer
//!
//! Applies one resource group at a time. A group's dependency-ordered files
//! are applied one by one, each gated on the readiness of the deployments and
//! jobs it declares, before the rest of the group is bulk-applied.

use std::path::{Path, PathBuf};

use crate::domain::entities::ResourceGroup;
use crate::domain::ports::{ControlPlane, DeployEvent, DeployEventSink, ManifestRepository, Sleeper};
use crate::domain::services::{
    DeploymentProbe, JobProbe, DEPLOYMENT_MAX_ATTEMPTS, JOB_MAX_ATTEMPTS,
};
use crate::domain::value_objects::Namespace;
use crate::error::{DeployError, DeployResult};

use super::poller::{ReadinessPoller, POLL_INTERVAL};

/// 120 polls x 5s = 10 minutes for every claim to bind
pub const STORAGE_MAX_ATTEMPTS: u32 = 120;

/// What `apply_group` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupOutcome {
    /// Optional group absent from the template root
    Skipped,
    Applied {
        /// Files applied individually, in dependency order
        ordered: Vec<PathBuf>,
        /// Whether the whole file/directory was applied afterwards
        bulk: bool,
    },
}

pub struct Sequencer<'a> {
    plane: &'a dyn ControlPlane,
    manifests: &'a dyn ManifestRepository,
    sleeper: &'a dyn Sleeper,
    events: &'a dyn DeployEventSink,
    deployment_probe: DeploymentProbe,
    job_probe: JobProbe,
    root: &'a Path,
}

impl<'a> Sequencer<'a> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        plane: &'a dyn ControlPlane,
        manifests: &'a dyn ManifestRepository,
        sleeper: &'a dyn Sleeper,
        events: &'a dyn DeployEventSink,
        deployment_probe: DeploymentProbe,
        job_probe: JobProbe,
        root: &'a Path,
    ) -> Self {
        Self {
            plane,
            manifests,
            sleeper,
            events,
            deployment_probe,
            job_probe,
            root,
        }
    }

    /// Apply one group under the template root.
    pub fn apply_group(&self, namespace: &Namespace, group: &ResourceGroup) -> DeployResult<GroupOutcome> {
        let target = group.resolve(self.root);
        if group.ignore_if_missing && !self.manifests.exists(&target) {
            tracing::debug!(path = %group.path.display(), "optional group absent");
            self.events.on_event(DeployEvent::GroupSkipped {
                path: group.path.clone(),
            });
            return Ok(GroupOutcome::Skipped);
        }

        let mut ordered = Vec::new();
        let mut dependency_only = group.dependency_only;

        match self.manifests.load_dependency_order(&group.sentinel_path(self.root))? {
            Some(order) => {
                for file in &order.files {
                    let path = target.join(file);
                    self.apply_path(namespace, &path)?;
                    self.wait_online(namespace, &path)?;
                    ordered.push(path);
                }
            }
            // Without a sentinel there is nothing to apply but the whole group.
            None => dependency_only = false,
        }

        if !dependency_only {
            self.apply_path(namespace, &target)?;
        }

        Ok(GroupOutcome::Applied {
            ordered,
            bulk: !dependency_only,
        })
    }

    /// Poll the claim inventory until every claim reports `Bound`.
    pub fn wait_for_storage(&self, namespace: &Namespace) -> DeployResult<()> {
        let mut unbound = Vec::new();
        for attempt in 0..STORAGE_MAX_ATTEMPTS {
            let listing = self.plane.run(namespace, &["get", "pvc"])?;
            unbound = unbound_claims(&listing);
            if unbound.is_empty() {
                if attempt != 0 {
                    self.events.on_event(DeployEvent::WaitFinished {
                        name: "PersistentVolumeClaims".to_string(),
                        attempts: attempt + 1,
                    });
                }
                return Ok(());
            }
            if attempt == 0 {
                self.events.on_event(DeployEvent::StorageWaiting {
                    unbound: unbound.clone(),
                });
            }
            self.sleeper.sleep(POLL_INTERVAL);
            self.events.on_event(DeployEvent::WaitTick);
        }

        Err(DeployError::fatal(format!(
            "PVCs not 'Bound':\n{}",
            unbound.join("\n")
        )))
    }

    fn apply_path(&self, namespace: &Namespace, path: &Path) -> DeployResult<()> {
        let path_arg = path.to_string_lossy();
        tracing::info!(%namespace, path = %path_arg, "applying");
        let output = self.plane.run(namespace, &["apply", "-f", &path_arg])?;
        self.events.on_event(DeployEvent::Applied {
            path: path.to_path_buf(),
            output,
        });
        Ok(())
    }

    /// Wait for every deployment and job declared in `file`.
    fn wait_online(&self, namespace: &Namespace, file: &Path) -> DeployResult<()> {
        let poller = ReadinessPoller::new(self.plane, self.sleeper, self.events);
        for manifest in self.manifests.load_file(file)? {
            match manifest.kind.as_str() {
                "Deployment" => {
                    poller.wait(
                        &self.deployment_probe,
                        namespace,
                        &manifest.name,
                        DEPLOYMENT_MAX_ATTEMPTS,
                    )?;
                }
                "Job" => {
                    poller.wait(&self.job_probe, namespace, &manifest.name, JOB_MAX_ATTEMPTS)?;
                }
                _ => self.events.on_event(DeployEvent::NoReadinessCheck {
                    kind: manifest.kind,
                    name: manifest.name,
                }),
            }
        }
        Ok(())
    }
}

/// Rows of a `get pvc` table (header skipped) whose status is not `Bound`.
pub fn unbound_claims(listing: &str) -> Vec<String> {
    listing
        .lines()
        .skip(1)
        .filter(|row| !row.trim().is_empty() && !row.contains("Bound"))
        .map(|row| row.to_string())
        .collect()
}
