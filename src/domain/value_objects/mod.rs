//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod namespace;
mod resource_kind;

pub use namespace::Namespace;
pub use resource_kind::TrackedKind;
