//! podguard library
//!
//! Pod compliance validation against registry, security and resource policy.
//!
//! This library provides:
//! - A static catalog of compliance rules (registry allow-list, non-root user,
//!   read-only root filesystem, resource limits and requests)
//! - A pure validator mapping one workload descriptor to a report with exactly
//!   one finding per active rule
//! - Snapshot loading from YAML/JSON, fleet summaries and baseline comparison
//! - Text, JSON and JUnit XML output
//!
//! # Example
//!
//! ```
//! use podguard::{ComplianceValidator, FindingStatus};
//! use podguard::data::workload::WorkloadDescriptor;
//!
//! let validator = ComplianceValidator::with_defaults();
//! let pod = WorkloadDescriptor::new("web-1", "default", "registry.example.com/default/web:v1");
//! let report = validator.validate(&pod).expect("identity is present");
//!
//! assert_eq!(report.findings.len(), 5);
//! assert_eq!(report.findings[0].status, FindingStatus::Pass);
//! ```

pub mod checks;
pub mod cli;
pub mod config;
pub mod data;
pub mod engine;
pub mod version;

use cli::args::RuleFilterOpts;
use config::ConfigFile;
use data::snapshot::ClusterSnapshot;
use engine::result::FleetReport;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

// Re-exports for public API
pub use engine::result::{ValidationReport, WorkloadStatus, WorkloadSummary};
pub use engine::validator::ComplianceValidator;

/// How important a rule is when it does not pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::High => write!(f, "high"),
            Severity::Medium => write!(f, "medium"),
            Severity::Low => write!(f, "low"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Rule category for grouping related rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleCategory {
    /// Image provenance and container privileges
    Security,
    /// Resource ceilings that bound spend
    Cost,
    /// Scheduling guarantees
    Reliability,
    /// General configuration hygiene
    BestPractice,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCategory::Security => write!(f, "security"),
            RuleCategory::Cost => write!(f, "cost"),
            RuleCategory::Reliability => write!(f, "reliability"),
            RuleCategory::BestPractice => write!(f, "best-practice"),
        }
    }
}

/// A compliance rule definition.
///
/// Rules are static configuration. Findings refer back to a rule by `id`
/// only; name and severity are looked up from the rule set when rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Unique identifier (e.g., "registry-whitelist")
    pub id: String,
    /// Human-readable label
    pub name: String,
    /// What the rule requires
    pub description: String,
    pub severity: Severity,
    pub category: RuleCategory,
}

/// Outcome of evaluating one rule against one workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingStatus {
    Pass,
    Fail,
    Warning,
    Info,
}

impl fmt::Display for FindingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindingStatus::Pass => write!(f, "pass"),
            FindingStatus::Fail => write!(f, "fail"),
            FindingStatus::Warning => write!(f, "warning"),
            FindingStatus::Info => write!(f, "info"),
        }
    }
}

/// The result of one rule for one workload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Identifier of the rule that produced this finding
    pub rule_id: String,
    pub status: FindingStatus,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Finding {
    pub fn new(rule_id: &str, status: FindingStatus, message: impl Into<String>) -> Self {
        Finding {
            rule_id: rule_id.to_string(),
            status,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Error types for podguard operations.
#[derive(Debug, thiserror::Error)]
pub enum PodguardError {
    /// A workload is missing a required identity field
    #[error("Workload is missing required field '{field}'")]
    MissingIdentity { field: &'static str },
    /// A rule id in the configuration does not name a known rule
    #[error("Unknown rule: '{rule_id}'")]
    UnknownRule { rule_id: String },
    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Parse error in {context}: {message}")]
    Parse { context: String, message: String },
    #[error("Invalid configuration: {message}")]
    Config { message: String },
    #[error("Output error: {message}")]
    Output { message: String },
}

/// Configuration for running the validator.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatorConfig {
    /// Registry prefixes an image may be pulled from
    pub allowed_registries: Vec<String>,
    /// Categories to evaluate (None = all)
    pub categories: Option<Vec<RuleCategory>>,
    /// Specific rules to skip (by ID)
    pub skip_rules: Vec<String>,
    /// Specific rules to run (by ID)
    pub only_rules: Vec<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        ValidatorConfig {
            allowed_registries: checks::registry::default_allowed_registries(),
            categories: None,
            skip_rules: Vec::new(),
            only_rules: Vec::new(),
        }
    }
}

impl ValidatorConfig {
    /// Merge a configuration file with command line filters.
    ///
    /// Command line `--skip`/`--only`/`--category` replace the file's values
    /// when given; `--allow-registry` entries are appended to the allow-list.
    pub fn resolve(file: ConfigFile, opts: &RuleFilterOpts) -> Self {
        let mut allowed_registries = file
            .allowed_registries
            .unwrap_or_else(checks::registry::default_allowed_registries);
        for prefix in &opts.allow_registry {
            if !allowed_registries.contains(prefix) {
                allowed_registries.push(prefix.clone());
            }
        }

        let categories = if !opts.category.is_empty() {
            Some(opts.category.iter().map(|c| c.to_category()).collect())
        } else if !file.categories.is_empty() {
            Some(file.categories)
        } else {
            None
        };

        ValidatorConfig {
            allowed_registries,
            categories,
            skip_rules: if opts.skip.is_empty() { file.skip } else { opts.skip.clone() },
            only_rules: if opts.only.is_empty() { file.only } else { opts.only.clone() },
        }
    }
}

/// Validate every workload of a snapshot.
///
/// This is the main entry point for fleet validation. Workloads are reported
/// in snapshot order.
///
/// # Errors
///
/// Returns `PodguardError::UnknownRule` if the configuration names a rule
/// that does not exist, and `PodguardError::MissingIdentity` for the first
/// workload without a name or namespace. No partial report is produced.
///
/// # Example
///
/// ```
/// use podguard::{validate_snapshot, ValidatorConfig};
/// use podguard::data::snapshot::ClusterSnapshot;
/// use podguard::data::workload::WorkloadDescriptor;
///
/// let snapshot = ClusterSnapshot::new(vec![
///     WorkloadDescriptor::new("api-1", "prod", "quay.io/acme/api:v3"),
/// ]);
/// let report = validate_snapshot(&ValidatorConfig::default(), &snapshot).unwrap();
/// assert_eq!(report.workloads.len(), 1);
/// ```
pub fn validate_snapshot(
    config: &ValidatorConfig,
    snapshot: &ClusterSnapshot,
) -> Result<FleetReport, PodguardError> {
    let validator = ComplianceValidator::new(config)?;
    validator.validate_snapshot(snapshot)
}
