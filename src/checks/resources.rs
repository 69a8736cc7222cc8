//! Resource limit and request rules.
//!
//! Both rules pass when the corresponding object is present, even if it
//! leaves CPU or memory unset, and warn when it is absent.

use crate::checks::EvaluationContext;
use crate::data::workload::{ResourceQuantities, WorkloadDescriptor};
use crate::{Finding, FindingStatus, Rule, RuleCategory, Severity};

pub const LIMITS_RULE_ID: &str = "resource-limits";
pub const REQUESTS_RULE_ID: &str = "resource-requests";

pub fn limits_rule() -> Rule {
    Rule {
        id: LIMITS_RULE_ID.to_string(),
        name: "Resource limits set".to_string(),
        description: "Containers should set CPU and memory limits".to_string(),
        severity: Severity::Medium,
        category: RuleCategory::Cost,
    }
}

pub fn requests_rule() -> Rule {
    Rule {
        id: REQUESTS_RULE_ID.to_string(),
        name: "Resource requests set".to_string(),
        description: "Containers should set CPU and memory requests".to_string(),
        severity: Severity::Medium,
        category: RuleCategory::Reliability,
    }
}

/// Render quantities as `CPU: <cpu>, Memory: <memory>`
pub fn format_quantities(quantities: &ResourceQuantities) -> String {
    format!(
        "CPU: {}, Memory: {}",
        quantities.cpu.as_deref().unwrap_or("unset"),
        quantities.memory.as_deref().unwrap_or("unset")
    )
}

/// Evaluate the resource limits rule
pub fn check_resource_limits(workload: &WorkloadDescriptor, _ctx: &EvaluationContext<'_>) -> Finding {
    match workload.limits() {
        Some(limits) => Finding::new(LIMITS_RULE_ID, FindingStatus::Pass, "Resource limits are set")
            .with_details(format_quantities(limits)),
        None => Finding::new(LIMITS_RULE_ID, FindingStatus::Warning, "Resource limits are not set"),
    }
}

/// Evaluate the resource requests rule
pub fn check_resource_requests(workload: &WorkloadDescriptor, _ctx: &EvaluationContext<'_>) -> Finding {
    match workload.requests() {
        Some(requests) => Finding::new(REQUESTS_RULE_ID, FindingStatus::Pass, "Resource requests are set")
            .with_details(format_quantities(requests)),
        None => Finding::new(REQUESTS_RULE_ID, FindingStatus::Warning, "Resource requests are not set"),
    }
}
