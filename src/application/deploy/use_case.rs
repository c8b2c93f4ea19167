//! Deploy Use Case
//!
//! Orchestrates the deployment flow:
//! 1. Validate inputs (kubeconfig, namespace manifest, version skew)
//! 2. Drain and delete every job in the namespace
//! 3. Apply each resource group in fixed order, gating on readiness
//! 4. Prune resources no manifest declares
//!
//! Every step runs to completion before the next starts; any error aborts
//! the whole run.

use std::path::Path;
use std::sync::Arc;

use crate::application::pruner::{NamespacePruner, PruneReport};
use crate::application::reaper::JobReaper;
use crate::application::sequencer::{GroupOutcome, Sequencer};
use crate::application::validation;
use crate::domain::entities::{DesiredInventory, ResourceGroup};
use crate::domain::ports::{
    ControlPlane, DeployEvent, DeployEventSink, ManifestRepository, NoopEventSink, Sleeper,
};
use crate::domain::services::{DeploymentProbe, DescribeTextExtractor, JobProbe, StatusExtractor};
use crate::domain::value_objects::Namespace;
use crate::error::DeployResult;

use super::options::DeployOptions;
use super::result::DeployReport;

/// Deploy use case - orchestrates the rollout
///
/// Parameterized by its ports so tests can script the control plane and
/// skip real sleeps.
pub struct DeployUseCase<CP, MR, S>
where
    CP: ControlPlane,
    MR: ManifestRepository,
    S: Sleeper,
{
    plane: CP,
    manifests: MR,
    sleeper: S,
    events: Arc<dyn DeployEventSink>,
    extractor: Arc<dyn StatusExtractor>,
}

impl<CP, MR, S> DeployUseCase<CP, MR, S>
where
    CP: ControlPlane,
    MR: ManifestRepository,
    S: Sleeper,
{
    pub fn new(plane: CP, manifests: MR, sleeper: S, events: Arc<dyn DeployEventSink>) -> Self {
        Self {
            plane,
            manifests,
            sleeper,
            events,
            extractor: Arc::new(DescribeTextExtractor),
        }
    }

    /// Use case with no event reporting
    pub fn silent(plane: CP, manifests: MR, sleeper: S) -> Self {
        Self::new(plane, manifests, sleeper, Arc::new(NoopEventSink))
    }

    pub fn control_plane(&self) -> &CP {
        &self.plane
    }

    /// Run the full deployment
    pub fn execute(&self, options: &DeployOptions) -> DeployResult<DeployReport> {
        let namespace = &options.namespace;
        let root = options.template_dir.as_path();
        let events = self.events.as_ref();

        validation::validate_kubeconfig(options.kubeconfig.as_deref())?;
        validation::validate_template_root(&self.manifests, namespace, root)?;
        validation::check_versions(&self.plane, namespace, options.version_checks, events)?;

        events.on_event(DeployEvent::Started {
            namespace: namespace.to_string(),
            template_dir: root.to_path_buf(),
        });
        tracing::info!(%namespace, template_dir = %root.display(), "deploy started");

        let mut report = DeployReport {
            jobs_deleted: self.reaper().drain_all(namespace)?,
            ..DeployReport::default()
        };

        let sequencer = self.sequencer(root);
        for group in ResourceGroup::full_deployment() {
            match sequencer.apply_group(namespace, &group)? {
                GroupOutcome::Skipped => report.groups_skipped.push(group.path.clone()),
                GroupOutcome::Applied { ordered, .. } => {
                    report.groups_applied.push(group.path.clone());
                    report.ordered_files.extend(ordered);
                }
            }
            if group.await_storage {
                sequencer.wait_for_storage(namespace)?;
            }
        }

        report.prune = self.prune(namespace, root, options.prune_dry_run)?;

        events.on_event(DeployEvent::Completed {
            groups_applied: report.groups_applied.len(),
            jobs_deleted: report.jobs_deleted,
            orphans_deleted: report.orphans_deleted(),
        });
        tracing::info!(%namespace, "deploy completed");
        Ok(report)
    }

    /// Run only the drift prune
    pub fn prune(&self, namespace: &Namespace, root: &Path, dry_run: bool) -> DeployResult<PruneReport> {
        NamespacePruner::new(&self.plane, &self.manifests, self.events.as_ref())
            .prune(namespace, root, dry_run)
    }

    /// Declared inventory of a manifest tree (no cluster access)
    pub fn desired_inventory(&self, root: &Path) -> DeployResult<DesiredInventory> {
        NamespacePruner::new(&self.plane, &self.manifests, self.events.as_ref())
            .desired_inventory(root)
    }

    fn reaper(&self) -> JobReaper<'_> {
        JobReaper::new(
            &self.plane,
            &self.sleeper,
            self.events.as_ref(),
            JobProbe::new(self.extractor.clone()),
        )
    }

    fn sequencer<'a>(&'a self, root: &'a Path) -> Sequencer<'a> {
        Sequencer::new(
            &self.plane,
            &self.manifests,
            &self.sleeper,
            self.events.as_ref(),
            DeploymentProbe::new(self.extractor.clone()),
            JobProbe::new(self.extractor.clone()),
            root,
        )
    }
}
