//! Security posture rules.
//!
//! A workload without a security context is treated as if every flag were
//! false. Running as root is a failure; a writable root filesystem is only a
//! warning.

use crate::checks::EvaluationContext;
use crate::data::workload::WorkloadDescriptor;
use crate::{Finding, FindingStatus, Rule, RuleCategory, Severity};

pub const NON_ROOT_RULE_ID: &str = "non-root-user";
pub const READONLY_FS_RULE_ID: &str = "readonly-filesystem";

pub fn non_root_rule() -> Rule {
    Rule {
        id: NON_ROOT_RULE_ID.to_string(),
        name: "Run as non-root user".to_string(),
        description: "Containers must run as a non-root user".to_string(),
        severity: Severity::High,
        category: RuleCategory::Security,
    }
}

pub fn readonly_filesystem_rule() -> Rule {
    Rule {
        id: READONLY_FS_RULE_ID.to_string(),
        name: "Read-only root filesystem".to_string(),
        description: "The container root filesystem should be read-only".to_string(),
        severity: Severity::Medium,
        category: RuleCategory::Security,
    }
}

/// Evaluate the non-root user rule
pub fn check_non_root(workload: &WorkloadDescriptor, _ctx: &EvaluationContext<'_>) -> Finding {
    if workload.runs_as_non_root() == Some(true) {
        Finding::new(NON_ROOT_RULE_ID, FindingStatus::Pass, "Container runs as a non-root user")
    } else {
        Finding::new(NON_ROOT_RULE_ID, FindingStatus::Fail, "Container runs as root")
    }
}

/// Evaluate the read-only root filesystem rule
pub fn check_readonly_filesystem(workload: &WorkloadDescriptor, _ctx: &EvaluationContext<'_>) -> Finding {
    if workload.read_only_root_filesystem() == Some(true) {
        Finding::new(READONLY_FS_RULE_ID, FindingStatus::Pass, "Root filesystem is read-only")
    } else {
        Finding::new(READONLY_FS_RULE_ID, FindingStatus::Warning, "Root filesystem is writable")
    }
}
