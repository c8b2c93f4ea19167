//! Job Reaper
//!
//! Reapplying manifests over a running job is unsafe, so every job in the
//! namespace must be finished before a deployment starts. Finished jobs are
//! then deleted in one bulk call.

use std::time::Duration;

use crate::domain::ports::{ControlPlane, DeployEvent, DeployEventSink, Sleeper};
use crate::domain::services::{JobProbe, Readiness, ReadinessProbe};
use crate::domain::value_objects::Namespace;
use crate::error::{DeployError, DeployResult};

/// Delay before rescanning when a running job was found
pub const DRAIN_RETRY_DELAY: Duration = Duration::from_secs(10);
/// Rescans allowed after the first scan; the scan after the last one aborts
pub const MAX_DRAIN_RETRIES: u32 = 6;

pub struct JobReaper<'a> {
    plane: &'a dyn ControlPlane,
    sleeper: &'a dyn Sleeper,
    events: &'a dyn DeployEventSink,
    probe: JobProbe,
}

impl<'a> JobReaper<'a> {
    pub fn new(
        plane: &'a dyn ControlPlane,
        sleeper: &'a dyn Sleeper,
        events: &'a dyn DeployEventSink,
        probe: JobProbe,
    ) -> Self {
        Self {
            plane,
            sleeper,
            events,
            probe,
        }
    }

    /// Wait for every job to finish, then delete them all.
    ///
    /// Each round rescans the whole namespace from scratch. Returns the number
    /// of jobs deleted.
    pub fn drain_all(&self, namespace: &Namespace) -> DeployResult<usize> {
        let mut round = 0;
        loop {
            let jobs = self.plane.resource_names(namespace, "Job")?;
            match self.first_running(namespace, &jobs)? {
                None => return self.delete_all(namespace, jobs.len()),
                Some(job) if round >= MAX_DRAIN_RETRIES => {
                    return Err(DeployError::DrainExhausted {
                        job,
                        rounds: round + 1,
                    });
                }
                Some(job) => {
                    tracing::warn!(%namespace, job = %job, round, "running job detected");
                    self.events
                        .on_event(DeployEvent::RunningJobDetected { job, round });
                    self.sleeper.sleep(DRAIN_RETRY_DELAY);
                    round += 1;
                }
            }
        }
    }

    fn first_running(&self, namespace: &Namespace, jobs: &[String]) -> DeployResult<Option<String>> {
        for job in jobs {
            if !self.is_done(namespace, job)? {
                return Ok(Some(job.clone()));
            }
        }
        Ok(None)
    }

    /// A job in a terminal failure state, or one already deleted, counts as done.
    fn is_done(&self, namespace: &Namespace, job: &str) -> DeployResult<bool> {
        match self.probe.check(self.plane, namespace, job, 0) {
            Ok(Readiness::Ready) | Ok(Readiness::Fatal(_)) => Ok(true),
            Ok(Readiness::NotReady) => Ok(false),
            Err(e) if e.is_not_found() => {
                tracing::debug!(%namespace, job, error = %e, "treating job as done");
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }

    fn delete_all(&self, namespace: &Namespace, count: usize) -> DeployResult<usize> {
        if count == 0 {
            return Ok(0);
        }
        let output = self.plane.run(namespace, &["delete", "jobs", "--all"])?;
        self.events.on_event(DeployEvent::JobsDeleted { output });
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::testing::{ns, RecordingSink, RecordingSleeper, ScriptedPlane};
    use crate::domain::services::DescribeTextExtractor;
    use std::sync::Arc;

    const RUNNING: &str = "Pods Statuses:  1 Running / 0 Succeeded / 0 Failed";
    const SUCCEEDED: &str = "Pods Statuses:  0 Running / 1 Succeeded / 0 Failed";
    const FAILED: &str = "Pods Statuses:  0 Running / 0 Succeeded / 1 Failed";
    const LIST: &str = "get Job -o name";

    fn drain(plane: &ScriptedPlane) -> (DeployResult<usize>, RecordingSleeper, RecordingSink) {
        let sleeper = RecordingSleeper::default();
        let sink = RecordingSink::default();
        let probe = JobProbe::new(Arc::new(DescribeTextExtractor));
        let result = JobReaper::new(plane, &sleeper, &sink, probe).drain_all(&ns("shop"));
        (result, sleeper, sink)
    }

    #[test]
    fn empty_namespace_deletes_nothing() {
        let plane = ScriptedPlane::new().respond(LIST, "");

        let (result, sleeper, _) = drain(&plane);

        assert_eq!(result.unwrap(), 0);
        assert_eq!(plane.count("delete jobs --all"), 0);
        assert!(sleeper.slept().is_empty());
    }

    #[test]
    fn finished_jobs_are_bulk_deleted_once() {
        let plane = ScriptedPlane::new()
            .respond(LIST, "job.batch/migrate\njob.batch/seed")
            .respond("describe job migrate", SUCCEEDED)
            .respond("describe job seed", SUCCEEDED)
            .respond("delete jobs --all", "job.batch \"migrate\" deleted");

        let (result, sleeper, sink) = drain(&plane);

        assert_eq!(result.unwrap(), 2);
        assert_eq!(plane.count("delete jobs --all"), 1);
        assert!(sleeper.slept().is_empty());
        assert!(sink
            .events()
            .iter()
            .any(|e| matches!(e, DeployEvent::JobsDeleted { .. })));
    }

    #[test]
    fn rescans_until_both_jobs_finish() {
        // migrate finishes after round 1, seed after round 3.
        let plane = ScriptedPlane::new()
            .respond(LIST, "job.batch/migrate\njob.batch/seed")
            .respond("describe job migrate", RUNNING)
            .respond("describe job migrate", SUCCEEDED)
            .respond("describe job seed", RUNNING)
            .respond("describe job seed", SUCCEEDED);

        let (result, sleeper, sink) = drain(&plane);

        assert_eq!(result.unwrap(), 2);
        assert_eq!(plane.count(LIST), 3);
        assert_eq!(plane.count("delete jobs --all"), 1);
        assert_eq!(sleeper.slept(), vec![DRAIN_RETRY_DELAY; 2]);
        let detected: Vec<_> = sink
            .events()
            .into_iter()
            .filter_map(|e| match e {
                DeployEvent::RunningJobDetected { job, round } => Some((job, round)),
                _ => None,
            })
            .collect();
        assert_eq!(
            detected,
            vec![("migrate".to_string(), 0), ("seed".to_string(), 1)]
        );
    }

    #[test]
    fn never_finishing_job_aborts_after_seven_rounds() {
        let plane = ScriptedPlane::new()
            .respond(LIST, "job.batch/stuck")
            .respond("describe job stuck", RUNNING);

        let (result, sleeper, _) = drain(&plane);

        assert!(matches!(
            result,
            Err(DeployError::DrainExhausted { ref job, rounds: 7 }) if job == "stuck"
        ));
        assert_eq!(plane.count(LIST), 7);
        assert_eq!(sleeper.slept().len(), 6);
        assert_eq!(plane.count("delete jobs --all"), 0);
    }

    #[test]
    fn failed_job_counts_as_done() {
        let plane = ScriptedPlane::new()
            .respond(LIST, "job.batch/broken")
            .respond("describe job broken", FAILED);

        let (result, _, _) = drain(&plane);

        assert_eq!(result.unwrap(), 1);
        assert_eq!(plane.count("delete jobs --all"), 1);
    }

    #[test]
    fn job_deleted_mid_scan_counts_as_done() {
        let plane = ScriptedPlane::new()
            .respond(LIST, "job.batch/gone")
            .fail(
                "describe job gone",
                "Error from server (NotFound): jobs.batch \"gone\" not found",
            );

        let (result, _, _) = drain(&plane);

        assert_eq!(result.unwrap(), 1);
    }

    #[test]
    fn other_command_errors_propagate() {
        let plane = ScriptedPlane::new()
            .respond(LIST, "job.batch/migrate")
            .fail("describe job migrate", "Unable to connect to the server");

        let (result, _, _) = drain(&plane);

        assert!(matches!(result, Err(DeployError::Command { .. })));
        assert_eq!(plane.count("delete jobs --all"), 0);
    }
}
