//! Result aggregation and reporting.
//!
//! Per-workload reports, fleet-wide summaries, and baseline comparison.

use crate::{Finding, FindingStatus, PodguardError, Rule};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

/// Findings for one workload, one per active rule in rule order.
///
/// Computed fresh from a descriptor and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    #[serde(rename = "podName")]
    pub name: String,
    pub namespace: String,
    #[serde(rename = "validations")]
    pub findings: Vec<Finding>,
}

/// Overall state of a workload derived from its findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadStatus {
    /// At least one failed rule
    Critical,
    /// No failures, at least one warning
    Warning,
    Success,
}

impl fmt::Display for WorkloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkloadStatus::Critical => write!(f, "critical"),
            WorkloadStatus::Warning => write!(f, "warning"),
            WorkloadStatus::Success => write!(f, "success"),
        }
    }
}

/// Finding counts for one workload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WorkloadSummary {
    pub passed: u32,
    pub warned: u32,
    pub failed: u32,
    pub info: u32,
    pub status: WorkloadStatus,
}

impl ValidationReport {
    /// `namespace/name`
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    /// Finding for a rule id
    pub fn finding(&self, rule_id: &str) -> Option<&Finding> {
        self.findings.iter().find(|f| f.rule_id == rule_id)
    }

    /// Calculate summary statistics
    pub fn summary(&self) -> WorkloadSummary {
        let mut passed = 0;
        let mut warned = 0;
        let mut failed = 0;
        let mut info = 0;

        for finding in &self.findings {
            match finding.status {
                FindingStatus::Pass => passed += 1,
                FindingStatus::Warning => warned += 1,
                FindingStatus::Fail => failed += 1,
                FindingStatus::Info => info += 1,
            }
        }

        let status = if failed > 0 {
            WorkloadStatus::Critical
        } else if warned > 0 {
            WorkloadStatus::Warning
        } else {
            WorkloadStatus::Success
        };

        WorkloadSummary {
            passed,
            warned,
            failed,
            info,
            status,
        }
    }
}

/// Fleet-wide summary statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FleetSummary {
    pub workloads: u32,
    pub critical_workloads: u32,
    pub warning_workloads: u32,
    pub healthy_workloads: u32,
    pub passed: u32,
    pub warned: u32,
    pub failed: u32,
    pub info: u32,
}

impl FleetSummary {
    /// Process exit code: 1 on failures, 2 on warnings only, 0 otherwise
    pub fn exit_code(&self) -> u8 {
        if self.failed > 0 {
            1
        } else if self.warned > 0 {
            2
        } else {
            0
        }
    }
}

/// Reports for every workload of a snapshot, with the rules they were
/// evaluated against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetReport {
    pub timestamp: u64,
    pub rules: Vec<Rule>,
    pub workloads: Vec<ValidationReport>,
}

impl FleetReport {
    pub fn new(rules: Vec<Rule>, workloads: Vec<ValidationReport>) -> Self {
        FleetReport {
            timestamp: unix_timestamp(),
            rules,
            workloads,
        }
    }

    /// Rule definition for a finding
    pub fn rule(&self, rule_id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == rule_id)
    }

    /// Calculate summary statistics
    pub fn summary(&self) -> FleetSummary {
        let mut summary = FleetSummary::default();

        for workload in &self.workloads {
            let ws = workload.summary();
            summary.workloads += 1;
            summary.passed += ws.passed;
            summary.warned += ws.warned;
            summary.failed += ws.failed;
            summary.info += ws.info;

            match ws.status {
                WorkloadStatus::Critical => summary.critical_workloads += 1,
                WorkloadStatus::Warning => summary.warning_workloads += 1,
                WorkloadStatus::Success => summary.healthy_workloads += 1,
            }
        }

        summary
    }

    /// Workloads with at least one failing or warning finding
    pub fn with_issues(&self) -> Vec<&ValidationReport> {
        self.workloads
            .iter()
            .filter(|w| w.summary().status != WorkloadStatus::Success)
            .collect()
    }
}

/// Baseline comparison result.
///
/// Entries are `namespace/name:rule-id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    pub new_failures: Vec<String>,
    pub new_warnings: Vec<String>,
    pub resolved: Vec<String>,
    pub regressions: Vec<String>,
    pub unchanged: Vec<String>,
}

impl ComparisonResult {
    /// Whether anything got worse since the baseline
    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty() || !self.new_failures.is_empty()
    }
}

/// Compare a report against a baseline report
pub fn compare_to_baseline(current: &FleetReport, baseline: &FleetReport) -> ComparisonResult {
    let mut result = ComparisonResult::default();

    let baseline_results: HashMap<(String, &str), FindingStatus> = baseline
        .workloads
        .iter()
        .flat_map(|w| {
            let key = w.qualified_name();
            w.findings
                .iter()
                .map(move |f| ((key.clone(), f.rule_id.as_str()), f.status))
        })
        .collect();

    for workload in &current.workloads {
        let key = workload.qualified_name();

        for finding in &workload.findings {
            let entry = format!("{}:{}", key, finding.rule_id);
            let previous = baseline_results.get(&(key.clone(), finding.rule_id.as_str()));

            match (previous, finding.status) {
                (Some(FindingStatus::Pass), FindingStatus::Fail)
                | (Some(FindingStatus::Warning), FindingStatus::Fail) => result.regressions.push(entry),
                (Some(FindingStatus::Pass), FindingStatus::Warning) => result.new_warnings.push(entry),
                (Some(FindingStatus::Fail), FindingStatus::Pass)
                | (Some(FindingStatus::Fail), FindingStatus::Warning)
                | (Some(FindingStatus::Warning), FindingStatus::Pass) => result.resolved.push(entry),
                (None, FindingStatus::Fail) => result.new_failures.push(entry),
                (None, FindingStatus::Warning) => result.new_warnings.push(entry),
                _ => result.unchanged.push(entry),
            }
        }
    }

    result
}

/// Save a report as a JSON baseline
pub fn save_baseline(report: &FleetReport, path: &Path) -> Result<(), PodguardError> {
    let json = serde_json::to_string_pretty(report).map_err(|e| PodguardError::Output {
        message: e.to_string(),
    })?;

    std::fs::write(path, json).map_err(|source| PodguardError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Load a report from a JSON baseline.
///
/// Output of `--format json` is accepted as well.
pub fn load_baseline(path: &Path) -> Result<FleetReport, PodguardError> {
    let content = std::fs::read_to_string(path).map_err(|source| PodguardError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|e| PodguardError::Parse {
        context: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Seconds since the Unix epoch
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
