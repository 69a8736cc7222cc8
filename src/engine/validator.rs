//! Compliance validator.
//!
//! Selects the active rules from the catalog and evaluates them against
//! workloads.
//!
//! # Guarantees
//!
//! - One finding per active rule, no rule skipped, no rule repeated
//! - Findings appear in catalog declaration order regardless of input
//! - No hidden state: validating the same descriptor twice gives equal reports
//! - A workload without name or namespace is rejected, never half-reported

use crate::checks::{registered_rules, EvaluationContext, RegisteredRule};
use crate::data::snapshot::ClusterSnapshot;
use crate::data::workload::WorkloadDescriptor;
use crate::engine::result::{FleetReport, ValidationReport};
use crate::{PodguardError, Rule, ValidatorConfig};
use tracing::{debug, info, trace, warn};

/// Validator bound to an active rule set and registry allow-list
#[derive(Debug, Clone)]
pub struct ComplianceValidator {
    rules: Vec<RegisteredRule>,
    allowed_registries: Vec<String>,
}

impl ComplianceValidator {
    /// Create a validator from configuration.
    ///
    /// The active rule set is the catalog narrowed by `only_rules` (when
    /// non-empty), minus `skip_rules`, restricted to `categories` (when set).
    /// Catalog order is kept.
    pub fn new(config: &ValidatorConfig) -> Result<Self, PodguardError> {
        let catalog = registered_rules();

        for id in config.only_rules.iter().chain(config.skip_rules.iter()) {
            if !catalog.iter().any(|r| &r.rule.id == id) {
                return Err(PodguardError::UnknownRule { rule_id: id.clone() });
            }
        }

        let rules: Vec<RegisteredRule> = catalog
            .into_iter()
            .filter(|r| config.only_rules.is_empty() || config.only_rules.contains(&r.rule.id))
            .filter(|r| !config.skip_rules.contains(&r.rule.id))
            .filter(|r| match &config.categories {
                Some(categories) => categories.contains(&r.rule.category),
                None => true,
            })
            .collect();

        debug!(
            active = rules.len(),
            registries = config.allowed_registries.len(),
            "validator configured"
        );

        Ok(ComplianceValidator {
            rules,
            allowed_registries: config.allowed_registries.clone(),
        })
    }

    /// Validator with every built-in rule and the default allow-list
    pub fn with_defaults() -> Self {
        ComplianceValidator {
            rules: registered_rules(),
            allowed_registries: crate::checks::registry::default_allowed_registries(),
        }
    }

    /// Active rules, in evaluation order
    pub fn rules(&self) -> Vec<Rule> {
        self.rules.iter().map(|r| r.rule.clone()).collect()
    }

    pub fn allowed_registries(&self) -> &[String] {
        &self.allowed_registries
    }

    /// Validate one workload.
    ///
    /// Fails only when the workload's name or namespace is empty.
    pub fn validate(&self, workload: &WorkloadDescriptor) -> Result<ValidationReport, PodguardError> {
        if workload.name.trim().is_empty() {
            return Err(PodguardError::MissingIdentity { field: "name" });
        }
        if workload.namespace.trim().is_empty() {
            return Err(PodguardError::MissingIdentity { field: "namespace" });
        }

        let ctx = EvaluationContext {
            allowed_registries: &self.allowed_registries,
        };

        let findings: Vec<_> = self
            .rules
            .iter()
            .map(|registered| (registered.evaluate)(workload, &ctx))
            .collect();

        for finding in &findings {
            trace!(rule = %finding.rule_id, status = %finding.status, "rule evaluated");
        }

        let report = ValidationReport {
            name: workload.name.clone(),
            namespace: workload.namespace.clone(),
            findings,
        };

        let summary = report.summary();
        debug!(
            workload = %workload.qualified_name(),
            passed = summary.passed,
            warned = summary.warned,
            failed = summary.failed,
            status = %summary.status,
            "validated workload"
        );

        Ok(report)
    }

    /// Validate every workload of a snapshot, in snapshot order
    pub fn validate_snapshot(&self, snapshot: &ClusterSnapshot) -> Result<FleetReport, PodguardError> {
        let mut workloads = Vec::with_capacity(snapshot.len());

        for (index, workload) in snapshot.workloads.iter().enumerate() {
            match self.validate(workload) {
                Ok(report) => workloads.push(report),
                Err(e) => {
                    warn!(index, image = %workload.image, error = %e, "rejected workload");
                    return Err(e);
                }
            }
        }

        let report = FleetReport::new(self.rules(), workloads);
        let summary = report.summary();
        info!(
            workloads = summary.workloads,
            critical = summary.critical_workloads,
            warning = summary.warning_workloads,
            "snapshot validated"
        );

        Ok(report)
    }
}

impl Default for ComplianceValidator {
    fn default() -> Self {
        Self::with_defaults()
    }
}
