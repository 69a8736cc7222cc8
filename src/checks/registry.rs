//! Registry allow-list rule.
//!
//! An image passes when its reference starts with one of the allowed
//! registry strings. The match is a literal prefix test: no wildcards, no
//! regex, no normalization of the reference.

use crate::checks::EvaluationContext;
use crate::data::workload::WorkloadDescriptor;
use crate::{Finding, FindingStatus, Rule, RuleCategory, Severity};

pub const RULE_ID: &str = "registry-whitelist";

/// Registries trusted out of the box
pub const DEFAULT_ALLOWED_REGISTRIES: [&str; 6] = [
    "registry.example.com",
    "docker.io/library",
    "k8s.gcr.io",
    "gcr.io",
    "quay.io",
    "ghcr.io",
];

pub fn default_allowed_registries() -> Vec<String> {
    DEFAULT_ALLOWED_REGISTRIES.iter().map(|r| r.to_string()).collect()
}

pub fn registry_rule() -> Rule {
    Rule {
        id: RULE_ID.to_string(),
        name: "Allowed registry".to_string(),
        description: "Images must be pulled only from allow-listed registries".to_string(),
        severity: Severity::High,
        category: RuleCategory::Security,
    }
}

/// Whether `image` starts with any of the `allowed` prefixes
pub fn is_registry_allowed(image: &str, allowed: &[String]) -> bool {
    allowed.iter().any(|registry| image.starts_with(registry.as_str()))
}

/// Evaluate the registry allow-list rule. Details always carry the image.
pub fn check_registry(workload: &WorkloadDescriptor, ctx: &EvaluationContext<'_>) -> Finding {
    if is_registry_allowed(&workload.image, ctx.allowed_registries) {
        Finding::new(RULE_ID, FindingStatus::Pass, "Image is pulled from an allowed registry")
            .with_details(workload.image.clone())
    } else {
        Finding::new(RULE_ID, FindingStatus::Fail, "Image is pulled from an unauthorized registry")
            .with_details(workload.image.clone())
    }
}
