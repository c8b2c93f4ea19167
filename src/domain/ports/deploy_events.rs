//! Deploy Event Port
//!
//! Provides an observable interface for deploy operations.
//! Enables progress reporting, JSON event streams, and debugging.

use std::path::PathBuf;

use crate::domain::value_objects::TrackedKind;

/// Event emitted during deploy and prune operations
#[derive(Debug, Clone, PartialEq)]
pub enum DeployEvent {
    /// Deploy started
    Started {
        namespace: String,
        template_dir: PathBuf,
    },

    /// Non-fatal anomaly (e.g. client/server version skew)
    Warning { message: String },

    /// A control-plane command failed and will be retried
    CommandRetry {
        command: String,
        attempt: u32,
        error: String,
    },

    /// Optional group is absent and was skipped
    GroupSkipped { path: PathBuf },

    /// `apply -f` finished for a file or directory
    Applied { path: PathBuf, output: String },

    /// A readiness wait is polling a resource that is not ready yet
    WaitStarted {
        probe: String,
        namespace: String,
        name: String,
    },

    /// One more unsuccessful poll of the current wait
    WaitTick,

    /// The current wait ended after `attempts` polls
    WaitFinished { name: String, attempts: u32 },

    /// An applied document has a kind with no readiness check
    NoReadinessCheck { kind: String, name: String },

    /// Storage claims are not bound yet
    StorageWaiting { unbound: Vec<String> },

    /// A job is still running; the drain will rescan after a delay
    RunningJobDetected { job: String, round: u32 },

    /// All jobs were drained and deleted
    JobsDeleted { output: String },

    /// Dry-run prune report for one kind
    OrphansFound { kind: TrackedKind, names: Vec<String> },

    /// About to delete one orphan
    OrphanDeleting { kind: TrackedKind, name: String },

    /// Deploy completed
    Completed {
        groups_applied: usize,
        jobs_deleted: usize,
        orphans_deleted: usize,
    },
}

/// Trait for receiving deploy events
///
/// Implementations can be:
/// - ConsoleEventSink: Progress display in terminal
/// - JsonEventSink: NDJSON event stream for CI
/// - NoopEventSink: Silent operation
pub trait DeployEventSink: Send + Sync {
    /// Handle a deploy event
    fn on_event(&self, event: DeployEvent);
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl DeployEventSink for NoopEventSink {
    fn on_event(&self, _event: DeployEvent) {}
}
