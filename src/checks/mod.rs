//! Compliance rule modules.
//!
//! This module contains the built-in rules organized by concern:
//! - Registry: image provenance against an allow-list
//! - Security: non-root user and read-only root filesystem
//! - Resources: CPU/memory limits and requests
//!
//! # Absent Fields
//!
//! Rules never error on missing optional data. Absence maps to a status:
//! - Security flag unset: same as `false`
//! - Resource limits/requests unset: Warning, never Fail
//!
//! The catalog order below is the evaluation order and the order findings
//! appear in every report.

pub mod registry;
pub mod resources;
pub mod security;

use crate::data::workload::WorkloadDescriptor;
use crate::{Finding, Rule, RuleCategory};

/// Inputs a rule may consult besides the workload itself
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub allowed_registries: &'a [String],
}

/// Evaluation function of a rule
pub type EvaluateFn = fn(&WorkloadDescriptor, &EvaluationContext<'_>) -> Finding;

/// A rule definition bound to its evaluation function
#[derive(Clone)]
pub struct RegisteredRule {
    pub rule: Rule,
    pub evaluate: EvaluateFn,
}

impl std::fmt::Debug for RegisteredRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredRule")
            .field("rule", &self.rule)
            .finish_non_exhaustive()
    }
}

/// Get all built-in rules with their evaluators, in declaration order
pub fn registered_rules() -> Vec<RegisteredRule> {
    vec![
        RegisteredRule {
            rule: registry::registry_rule(),
            evaluate: registry::check_registry,
        },
        RegisteredRule {
            rule: security::non_root_rule(),
            evaluate: security::check_non_root,
        },
        RegisteredRule {
            rule: security::readonly_filesystem_rule(),
            evaluate: security::check_readonly_filesystem,
        },
        RegisteredRule {
            rule: resources::limits_rule(),
            evaluate: resources::check_resource_limits,
        },
        RegisteredRule {
            rule: resources::requests_rule(),
            evaluate: resources::check_resource_requests,
        },
    ]
}

/// Get all rule definitions
pub fn default_rules() -> Vec<Rule> {
    registered_rules().into_iter().map(|r| r.rule).collect()
}

/// Get rule definitions for a specific category
pub fn rules_by_category(category: RuleCategory) -> Vec<Rule> {
    default_rules()
        .into_iter()
        .filter(|r| r.category == category)
        .collect()
}

/// Look up a built-in rule by id
pub fn find_rule(id: &str) -> Option<Rule> {
    default_rules().into_iter().find(|r| r.id == id)
}
