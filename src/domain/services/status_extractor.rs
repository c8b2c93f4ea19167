//! Status extraction from `kubectl describe` reports
//!
//! Describe output is free text whose layout differs between kubectl
//! releases, so it sits behind `StatusExtractor`; a structured query can
//! replace it without touching the polling logic.

use std::sync::LazyLock;

use regex::Regex;

/// Replica counts of a deployment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeploymentStatus {
    pub total: Option<u32>,
    pub available: Option<u32>,
}

/// Pod counts of a job
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobStatus {
    pub running: Option<u32>,
    pub succeeded: Option<u32>,
    pub failed: Option<u32>,
}

/// Turns a descriptive status report into typed counts
pub trait StatusExtractor: Send + Sync {
    fn deployment_status(&self, report: &str) -> DeploymentStatus;
    fn job_status(&self, report: &str) -> JobStatus;
}

// v1.5: Replicas:   1 updated | 1 total | 1 available | 0 unavailable
// v1.7: Replicas:   1 desired | 1 updated | 1 total | 1 available | 0 unavailable
static DEPLOYMENT_PATTERNS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r"^Replicas:.*?(\d+) total").expect("valid regex"),
        Regex::new(r"^Replicas:.*?(\d+) available").expect("valid regex"),
    ]
});

// Older: Pods Statuses:  1 Running / 0 Succeeded / 0 Failed
// Newer: Pods Statuses:  1 Active (0 Ready) / 0 Succeeded / 0 Failed
static JOB_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"^Pods Statuses:.*?(\d+) (?:Running|Active)").expect("valid regex"),
        Regex::new(r"^Pods Statuses:.*?(\d+) Succeeded").expect("valid regex"),
        Regex::new(r"^Pods Statuses:.*?(\d+) Failed").expect("valid regex"),
    ]
});

/// Regex scraper for `kubectl describe` text
#[derive(Debug, Clone, Copy, Default)]
pub struct DescribeTextExtractor;

impl StatusExtractor for DescribeTextExtractor {
    fn deployment_status(&self, report: &str) -> DeploymentStatus {
        let [total, available] = first_matches(report, &*DEPLOYMENT_PATTERNS);
        DeploymentStatus {
            total: parse_count(total),
            available: parse_count(available),
        }
    }

    fn job_status(&self, report: &str) -> JobStatus {
        let [running, succeeded, failed] = first_matches(report, &*JOB_PATTERNS);
        JobStatus {
            running: parse_count(running),
            succeeded: parse_count(succeeded),
            failed: parse_count(failed),
        }
    }
}

/// Scan `report` line by line, keeping the first capture of each pattern.
///
/// Patterns are independent: each may match on a different line, which is
/// what lets one pattern set cover several report layouts.
pub fn first_matches<'r, const N: usize>(report: &'r str, patterns: &[Regex; N]) -> [Option<&'r str>; N] {
    let mut found = [None; N];
    for line in report.lines() {
        for (slot, pattern) in found.iter_mut().zip(patterns) {
            if slot.is_none() {
                *slot = pattern
                    .captures(line)
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str());
            }
        }
        if found.iter().all(Option::is_some) {
            break;
        }
    }
    found
}

fn parse_count(capture: Option<&str>) -> Option<u32> {
    capture.and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEPLOYMENT_V17: &str = "\
Name:                   web
Namespace:              shop
Selector:               app=web
Replicas:               3 desired | 3 updated | 3 total | 2 available | 1 unavailable
StrategyType:           RollingUpdate
";

    const DEPLOYMENT_V15: &str = "\
Name:\t\tweb
Replicas:\t\t1 updated | 1 total | 1 available | 0 unavailable
";

    #[test]
    fn reads_v17_replica_layout() {
        let status = DescribeTextExtractor.deployment_status(DEPLOYMENT_V17);
        assert_eq!(status.total, Some(3));
        assert_eq!(status.available, Some(2));
    }

    #[test]
    fn reads_v15_replica_layout() {
        let status = DescribeTextExtractor.deployment_status(DEPLOYMENT_V15);
        assert_eq!(status.total, Some(1));
        assert_eq!(status.available, Some(1));
    }

    #[test]
    fn unavailable_is_not_mistaken_for_available() {
        let status = DescribeTextExtractor
            .deployment_status("Replicas: 2 total | 0 unavailable | 2 available");
        assert_eq!(status.available, Some(2));
    }

    #[test]
    fn multi_digit_counts_are_kept_whole() {
        let status =
            DescribeTextExtractor.deployment_status("Replicas: 12 updated | 12 total | 10 available");
        assert_eq!(status.total, Some(12));
        assert_eq!(status.available, Some(10));
    }

    #[test]
    fn reads_job_pod_statuses() {
        let status = DescribeTextExtractor
            .job_status("Name: migrate\nPods Statuses:  0 Running / 1 Succeeded / 0 Failed\n");
        assert_eq!(
            status,
            JobStatus {
                running: Some(0),
                succeeded: Some(1),
                failed: Some(0),
            }
        );
    }

    #[test]
    fn reads_active_job_layout() {
        let status = DescribeTextExtractor
            .job_status("Pods Statuses:  2 Active (1 Ready) / 0 Succeeded / 0 Failed");
        assert_eq!(status.running, Some(2));
        assert_eq!(status.succeeded, Some(0));
    }

    #[test]
    fn missing_lines_yield_none() {
        assert_eq!(DescribeTextExtractor.job_status("Name: migrate"), JobStatus::default());
        assert_eq!(
            DescribeTextExtractor.deployment_status(""),
            DeploymentStatus::default()
        );
    }

    #[test]
    fn first_match_wins() {
        let report = "Replicas: 1 total\nReplicas: 5 total\n";
        assert_eq!(DescribeTextExtractor.deployment_status(report).total, Some(1));
    }
}
