//! JSON Event Sink
//!
//! Outputs deploy events as NDJSON for CI/automation consumption.

use crate::domain::ports::{DeployEvent, DeployEventSink};
use std::io::{self, Write};
use std::sync::Mutex;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    /// Mutex to ensure thread-safe writes
    writer: Mutex<Box<dyn Write + Send>>,
    command: &'static str,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout(command: &'static str) -> Self {
        Self::with_writer(command, io::stdout())
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(command: &'static str, writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            command,
        }
    }

    fn write_event(&self, mut event: serde_json::Value) {
        event["command"] = serde_json::Value::from(self.command);
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

impl DeployEventSink for JsonEventSink {
    fn on_event(&self, event: DeployEvent) {
        let json = match event {
            DeployEvent::Started {
                namespace,
                template_dir,
            } => serde_json::json!({
                "event": "start",
                "namespace": namespace,
                "template_dir": template_dir.display().to_string(),
            }),

            DeployEvent::Warning { message } => serde_json::json!({
                "event": "warning",
                "message": message,
            }),

            DeployEvent::CommandRetry {
                command,
                attempt,
                error,
            } => serde_json::json!({
                "event": "command_retry",
                "kubectl": command,
                "attempt": attempt,
                "error": error,
            }),

            DeployEvent::GroupSkipped { path } => serde_json::json!({
                "event": "group_skipped",
                "path": path.display().to_string(),
            }),

            DeployEvent::Applied { path, output } => serde_json::json!({
                "event": "applied",
                "path": path.display().to_string(),
                "output": output,
            }),

            DeployEvent::WaitStarted {
                probe,
                namespace,
                name,
            } => serde_json::json!({
                "event": "wait_start",
                "probe": probe,
                "namespace": namespace,
                "name": name,
            }),

            // Progress ticks carry nothing a pipeline can use
            DeployEvent::WaitTick => return,

            DeployEvent::WaitFinished { name, attempts } => serde_json::json!({
                "event": "wait_finished",
                "name": name,
                "attempts": attempts,
            }),

            DeployEvent::NoReadinessCheck { kind, name } => serde_json::json!({
                "event": "no_readiness_check",
                "kind": kind,
                "name": name,
            }),

            DeployEvent::StorageWaiting { unbound } => serde_json::json!({
                "event": "storage_waiting",
                "unbound": unbound,
            }),

            DeployEvent::RunningJobDetected { job, round } => serde_json::json!({
                "event": "running_job",
                "job": job,
                "round": round,
            }),

            DeployEvent::JobsDeleted { output } => serde_json::json!({
                "event": "jobs_deleted",
                "output": output,
            }),

            DeployEvent::OrphansFound { kind, names } => serde_json::json!({
                "event": "orphans_found",
                "kind": kind,
                "names": names,
            }),

            DeployEvent::OrphanDeleting { kind, name } => serde_json::json!({
                "event": "orphan_deleting",
                "kind": kind,
                "name": name,
            }),

            DeployEvent::Completed {
                groups_applied,
                jobs_deleted,
                orphans_deleted,
            } => serde_json::json!({
                "event": "complete",
                "status": "success",
                "groups_applied": groups_applied,
                "jobs_deleted": jobs_deleted,
                "orphans_deleted": orphans_deleted,
            }),
        };

        self.write_event(json);
    }
}
