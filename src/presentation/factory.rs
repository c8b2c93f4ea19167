//! Use Case Factory
//!
//! Creates use cases with infrastructure dependencies wired up.
//! This is the dependency injection point for the application.

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::DeployUseCase;
use crate::config::OutputFormat;
use crate::domain::ports::DeployEventSink;
use crate::infrastructure::{
    ConsoleEventSink, FsManifestRepository, JsonEventSink, KubectlRunner, ThreadSleeper,
};
use crate::ui::TerminalCapabilities;

/// Type alias for the concrete DeployUseCase with all dependencies
pub type ConcreteDeployUseCase = DeployUseCase<KubectlRunner, FsManifestRepository, ThreadSleeper>;

/// Progress sink for the chosen output format
pub fn create_event_sink(
    format: OutputFormat,
    caps: TerminalCapabilities,
    command: &'static str,
) -> Arc<dyn DeployEventSink> {
    match format {
        OutputFormat::Json => Arc::new(JsonEventSink::stdout(command)),
        OutputFormat::Text => Arc::new(ConsoleEventSink::stderr(caps)),
    }
}

/// Create a deploy use case talking to the cluster through `binary`
///
/// The same sink receives pipeline events and kubectl retry warnings.
pub fn create_deploy_use_case(
    binary: impl Into<PathBuf>,
    kubeconfig: Option<PathBuf>,
    events: Arc<dyn DeployEventSink>,
) -> ConcreteDeployUseCase {
    let kubectl = KubectlRunner::new(binary)
        .with_kubeconfig(kubeconfig)
        .with_events(events.clone());

    DeployUseCase::new(kubectl, FsManifestRepository::new(), ThreadSleeper, events)
}
