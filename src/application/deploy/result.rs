//! Deploy Result

use std::path::PathBuf;

use serde::Serialize;

use crate::application::pruner::PruneReport;

/// Summary of a completed deploy
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeployReport {
    /// Groups that were applied (relative paths), in order
    pub groups_applied: Vec<PathBuf>,
    /// Optional groups absent from the template root
    pub groups_skipped: Vec<PathBuf>,
    /// Files applied one by one from dependency sentinels
    pub ordered_files: Vec<PathBuf>,
    /// Jobs drained and deleted before applying
    pub jobs_deleted: usize,
    /// Result of the final drift prune
    pub prune: PruneReport,
}

impl DeployReport {
    pub fn orphans_deleted(&self) -> usize {
        if self.prune.deleted {
            self.prune.orphans.len()
        } else {
            0
        }
    }
}
