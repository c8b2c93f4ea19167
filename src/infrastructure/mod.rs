//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `kubectl` - `ControlPlane` backed by the kubectl binary
//! - `manifests` - `ManifestRepository` over the local file system
//! - `sleeper` - `Sleeper` backed by the current thread
//! - `events/` - Event sinks (console, NDJSON)

pub mod events;
pub mod kubectl;
pub mod manifests;
pub mod sleeper;

// Re-export for convenience
pub use events::{ConsoleEventSink, JsonEventSink};
pub use kubectl::KubectlRunner;
pub use manifests::FsManifestRepository;
pub use sleeper::ThreadSleeper;
