//! Readiness probes
//!
//! A probe answers "is this resource there yet?" for one attempt of a
//! bounded poll. The attempt index is passed in because the job probe has an
//! inner budget of its own.

use std::sync::Arc;

use crate::domain::ports::ControlPlane;
use crate::domain::value_objects::Namespace;
use crate::error::DeployResult;

use super::status_extractor::{DeploymentStatus, JobStatus, StatusExtractor};

/// 120 polls x 5s = 10 minutes
pub const DEPLOYMENT_MAX_ATTEMPTS: u32 = 120;
/// 3600 polls x 5s = 5 hours
pub const JOB_MAX_ATTEMPTS: u32 = 3600;
/// A job with no pods at all past this attempt index never started
pub const JOB_NOT_STARTED_MAX_ATTEMPTS: u32 = 120;

/// Outcome of one readiness check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    NotReady,
    /// Terminal failure; polling stops immediately
    Fatal(String),
}

/// A per-kind readiness predicate
pub trait ReadinessProbe {
    /// Short name used in wait messages and timeout errors
    fn name(&self) -> &'static str;

    /// Check `name` once; `attempt` is the zero-based poll index.
    fn check(
        &self,
        plane: &dyn ControlPlane,
        namespace: &Namespace,
        name: &str,
        attempt: u32,
    ) -> DeployResult<Readiness>;
}

impl DeploymentStatus {
    /// Ready once the total is a positive number and every replica is available
    pub fn readiness(&self) -> Readiness {
        match (self.total, self.available) {
            (Some(total), Some(available)) if total > 0 && total == available => Readiness::Ready,
            _ => Readiness::NotReady,
        }
    }
}

impl JobStatus {
    /// Evaluate job completion at poll index `attempt`.
    ///
    /// A report with no pod statuses at all counts as done. Missing succeeded
    /// or failed counts read as zero.
    pub fn readiness(&self, job: &str, attempt: u32) -> Readiness {
        let Some(running) = self.running else {
            return Readiness::Ready;
        };
        let succeeded = self.succeeded.unwrap_or(0);
        let failed = self.failed.unwrap_or(0);

        if running != 0 {
            return Readiness::NotReady;
        }
        if succeeded == 0 && failed == 0 {
            if attempt > JOB_NOT_STARTED_MAX_ATTEMPTS {
                return Readiness::Fatal(format!(
                    "Job {} refuses to start after 10min.",
                    job
                ));
            }
            return Readiness::NotReady;
        }
        if succeeded == 0 {
            return Readiness::Fatal(format!(
                "Job {} failed. Running: {}, Succeeded: {}, Failed: {}",
                job, running, succeeded, failed
            ));
        }
        Readiness::Ready
    }
}

/// Deployment is online when all of its replicas are available
#[derive(Clone)]
pub struct DeploymentProbe {
    extractor: Arc<dyn StatusExtractor>,
}

impl DeploymentProbe {
    pub fn new(extractor: Arc<dyn StatusExtractor>) -> Self {
        Self { extractor }
    }
}

impl ReadinessProbe for DeploymentProbe {
    fn name(&self) -> &'static str {
        "deployment-online"
    }

    fn check(
        &self,
        plane: &dyn ControlPlane,
        namespace: &Namespace,
        name: &str,
        _attempt: u32,
    ) -> DeployResult<Readiness> {
        let report = plane.run(namespace, &["describe", "deployment", name])?;
        Ok(self.extractor.deployment_status(&report).readiness())
    }
}

/// Job is done when it has no running pods and at least one success
#[derive(Clone)]
pub struct JobProbe {
    extractor: Arc<dyn StatusExtractor>,
}

impl JobProbe {
    pub fn new(extractor: Arc<dyn StatusExtractor>) -> Self {
        Self { extractor }
    }
}

impl ReadinessProbe for JobProbe {
    fn name(&self) -> &'static str {
        "job-done"
    }

    fn check(
        &self,
        plane: &dyn ControlPlane,
        namespace: &Namespace,
        name: &str,
        attempt: u32,
    ) -> DeployResult<Readiness> {
        let report = plane.run(namespace, &["describe", "job", name])?;
        Ok(self.extractor.job_status(&report).readiness(name, attempt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::services::DescribeTextExtractor;

    fn deployment(total: u32, available: u32) -> DeploymentStatus {
        DeploymentStatus {
            total: Some(total),
            available: Some(available),
        }
    }

    fn job(running: u32, succeeded: u32, failed: u32) -> JobStatus {
        JobStatus {
            running: Some(running),
            succeeded: Some(succeeded),
            failed: Some(failed),
        }
    }

    #[test]
    fn deployment_ready_when_all_available() {
        assert_eq!(deployment(3, 3).readiness(), Readiness::Ready);
    }

    #[test]
    fn deployment_not_ready_when_partially_available() {
        assert_eq!(deployment(3, 2).readiness(), Readiness::NotReady);
    }

    #[test]
    fn deployment_with_zero_replicas_is_not_ready() {
        assert_eq!(deployment(0, 0).readiness(), Readiness::NotReady);
    }

    #[test]
    fn deployment_without_counts_is_not_ready() {
        assert_eq!(DeploymentStatus::default().readiness(), Readiness::NotReady);
    }

    #[test]
    fn job_succeeded_is_ready() {
        assert_eq!(job(0, 1, 0).readiness("migrate", 0), Readiness::Ready);
    }

    #[test]
    fn job_running_is_not_ready() {
        assert_eq!(job(2, 0, 0).readiness("migrate", 0), Readiness::NotReady);
    }

    #[test]
    fn job_failed_outright_is_fatal() {
        assert!(matches!(
            job(0, 0, 1).readiness("migrate", 0),
            Readiness::Fatal(reason) if reason.contains("migrate failed")
        ));
    }

    #[test]
    fn job_with_failures_and_a_success_is_ready() {
        assert_eq!(job(0, 1, 2).readiness("migrate", 0), Readiness::Ready);
    }

    #[test]
    fn job_not_started_waits_then_turns_fatal() {
        assert_eq!(job(0, 0, 0).readiness("migrate", 5), Readiness::NotReady);
        assert_eq!(job(0, 0, 0).readiness("migrate", 120), Readiness::NotReady);
        assert!(matches!(
            job(0, 0, 0).readiness("migrate", 121),
            Readiness::Fatal(reason) if reason.contains("refuses to start")
        ));
    }

    #[test]
    fn job_without_pod_statuses_counts_as_done() {
        assert_eq!(JobStatus::default().readiness("migrate", 0), Readiness::Ready);
    }

    struct DescribePlane(&'static str);

    impl ControlPlane for DescribePlane {
        fn run(&self, _namespace: &Namespace, args: &[&str]) -> DeployResult<String> {
            assert_eq!(args[0], "describe");
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn deployment_probe_reads_describe_output() {
        let probe = DeploymentProbe::new(Arc::new(DescribeTextExtractor));
        let plane = DescribePlane("Replicas: 3 desired | 3 updated | 3 total | 3 available");
        let ns = Namespace::parse("shop").unwrap();
        assert_eq!(probe.check(&plane, &ns, "web", 0).unwrap(), Readiness::Ready);
    }

    #[test]
    fn job_probe_reads_describe_output() {
        let probe = JobProbe::new(Arc::new(DescribeTextExtractor));
        let plane = DescribePlane("Pods Statuses: 1 Running / 0 Succeeded / 0 Failed");
        let ns = Namespace::parse("shop").unwrap();
        assert_eq!(probe.check(&plane, &ns, "migrate", 0).unwrap(), Readiness::NotReady);
    }
}
