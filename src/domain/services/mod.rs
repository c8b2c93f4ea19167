//! Domain Services
//!
//! Readiness evaluation for resource kinds. Status extraction is pure; probes
//! reach the cluster only through the `ControlPlane` port.

mod readiness;
mod status_extractor;

pub use readiness::{
    DeploymentProbe, JobProbe, Readiness, ReadinessProbe, DEPLOYMENT_MAX_ATTEMPTS,
    JOB_MAX_ATTEMPTS, JOB_NOT_STARTED_MAX_ATTEMPTS,
};
pub use status_extractor::{
    first_matches, DeploymentStatus, DescribeTextExtractor, JobStatus, StatusExtractor,
};
