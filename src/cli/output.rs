//! Output formatting for podguard.
//!
//! Provides terminal, JSON, and JUnit XML output formatters, plus the rule
//! table printed by `podguard rules`.
//!
//! Findings only carry a rule id. Rule names and severities are joined from
//! the report's rule set at render time; a finding whose rule is missing from
//! the set is rendered with its id alone.
//!
//! All formatters produce valid output for any report, including an empty one.

use crate::cli::args::OutputFormat;
use crate::engine::result::{ComparisonResult, FleetReport, ValidationReport, WorkloadStatus};
use crate::{Finding, FindingStatus, PodguardError, Rule};
use chrono::{DateTime, SecondsFormat};
use colored::Colorize;
use comfy_table::{Row, Table};
use serde::Serialize;

const RULE_LINE: &str =
    "--------------------------------------------------------------------------------";

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format a fleet report, with an optional baseline comparison
    fn format(
        &self,
        report: &FleetReport,
        comparison: Option<&ComparisonResult>,
    ) -> Result<String, PodguardError>;
}

/// Terminal (human-readable) formatter
pub struct TerminalFormatter {
    color: bool,
    verbose: bool,
    quiet: bool,
}

impl TerminalFormatter {
    pub fn new(color: bool, verbose: bool, quiet: bool) -> Self {
        TerminalFormatter {
            color,
            verbose,
            quiet,
        }
    }

    fn green(&self, text: &str) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text.to_string()
        }
    }

    fn yellow(&self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }

    fn red(&self, text: &str) -> String {
        if self.color {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }

    fn gray(&self, text: &str) -> String {
        if self.color {
            text.bright_black().to_string()
        } else {
            text.to_string()
        }
    }

    fn status_tag(&self, status: FindingStatus) -> String {
        match status {
            FindingStatus::Pass => self.green("[PASS]"),
            FindingStatus::Warning => self.yellow("[WARN]"),
            FindingStatus::Fail => self.red("[FAIL]"),
            FindingStatus::Info => self.gray("[INFO]"),
        }
    }

    fn workload_tag(&self, status: WorkloadStatus) -> String {
        match status {
            WorkloadStatus::Critical => self.red("CRITICAL"),
            WorkloadStatus::Warning => self.yellow("WARNING"),
            WorkloadStatus::Success => self.green("OK"),
        }
    }

    fn format_workload(&self, report: &FleetReport, workload: &ValidationReport, output: &mut String) {
        let summary = workload.summary();

        output.push_str(&format!(
            "{} [{}] {} failed, {} warnings, {} passed\n",
            workload.qualified_name(),
            self.workload_tag(summary.status),
            summary.failed,
            summary.warned,
            summary.passed
        ));

        for finding in &workload.findings {
            if self.quiet && matches!(finding.status, FindingStatus::Pass | FindingStatus::Info) {
                continue;
            }

            let label = match report.rule(&finding.rule_id) {
                Some(rule) => format!("{} ({}, {})", rule.name, finding.rule_id, rule.severity),
                None => finding.rule_id.clone(),
            };

            output.push_str(&format!(
                "  {} {}: {}\n",
                self.status_tag(finding.status),
                label,
                finding.message
            ));

            if self.verbose {
                if let Some(ref details) = finding.details {
                    output.push_str(&format!("         {}\n", self.gray(details)));
                }
            }
        }

        output.push('\n');
    }

    fn format_comparison(&self, comparison: &ComparisonResult, output: &mut String) {
        output.push_str("BASELINE COMPARISON\n");

        let sections = [
            ("Regressions", &comparison.regressions, true),
            ("New failures", &comparison.new_failures, true),
            ("New warnings", &comparison.new_warnings, false),
            ("Resolved", &comparison.resolved, false),
        ];

        for (title, entries, bad) in sections.iter() {
            let heading = format!("{}: {}", title, entries.len());
            if *bad && !entries.is_empty() {
                output.push_str(&format!("  {}\n", self.red(&heading)));
            } else {
                output.push_str(&format!("  {}\n", heading));
            }
            for entry in entries.iter() {
                output.push_str(&format!("    - {}\n", entry));
            }
        }
        output.push_str(&format!("  Unchanged: {}\n\n", comparison.unchanged.len()));
    }
}

impl OutputFormatter for TerminalFormatter {
    fn format(
        &self,
        report: &FleetReport,
        comparison: Option<&ComparisonResult>,
    ) -> Result<String, PodguardError> {
        let mut output = String::new();

        // Header
        output.push_str(RULE_LINE);
        output.push('\n');
        output.push_str("podguard validation report\n");
        output.push_str(&format!("Workloads: {}\n", report.workloads.len()));
        output.push_str(&format!(
            "Rules: {}\n",
            report
                .rules
                .iter()
                .map(|r| r.id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));
        output.push_str(&format!("Timestamp: {}\n", format_timestamp(report.timestamp)));
        output.push_str(RULE_LINE);
        output.push_str("\n\n");

        let workloads: Vec<&ValidationReport> = if self.quiet {
            report.with_issues()
        } else {
            report.workloads.iter().collect()
        };
        for workload in workloads {
            self.format_workload(report, workload, &mut output);
        }

        if let Some(comparison) = comparison {
            self.format_comparison(comparison, &mut output);
        }

        // Summary
        let summary = report.summary();
        output.push_str(RULE_LINE);
        output.push('\n');
        output.push_str(&format!(
            "SUMMARY: {} workloads ({} critical, {} warning, {} ok)\n",
            summary.workloads,
            summary.critical_workloads,
            summary.warning_workloads,
            summary.healthy_workloads
        ));
        output.push_str(&format!(
            "FINDINGS: {} passed, {} warnings, {} failed\n",
            summary.passed, summary.warned, summary.failed
        ));

        let exit_desc = match summary.exit_code() {
            1 => "failures detected",
            2 => "warnings detected",
            _ => "all rules passed",
        };
        output.push_str(&format!("Exit code: {} ({})\n", summary.exit_code(), exit_desc));
        output.push_str(RULE_LINE);

        Ok(output)
    }
}

/// JSON formatter
pub struct JsonFormatter {
    pretty: bool,
}

#[derive(Serialize)]
struct JsonWorkload<'a> {
    #[serde(flatten)]
    report: &'a ValidationReport,
    status: WorkloadStatus,
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    timestamp: u64,
    summary: crate::engine::result::FleetSummary,
    rules: &'a [Rule],
    workloads: Vec<JsonWorkload<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    comparison: Option<&'a ComparisonResult>,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        JsonFormatter { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(
        &self,
        report: &FleetReport,
        comparison: Option<&ComparisonResult>,
    ) -> Result<String, PodguardError> {
        let doc = JsonDocument {
            timestamp: report.timestamp,
            summary: report.summary(),
            rules: &report.rules,
            workloads: report
                .workloads
                .iter()
                .map(|w| JsonWorkload {
                    report: w,
                    status: w.summary().status,
                })
                .collect(),
            comparison,
        };

        let result = if self.pretty {
            serde_json::to_string_pretty(&doc)
        } else {
            serde_json::to_string(&doc)
        };
        result.map_err(|e| PodguardError::Output {
            message: e.to_string(),
        })
    }
}

/// JUnit XML formatter.
///
/// One test suite per workload, one test case per finding.
pub struct JunitFormatter;

impl JunitFormatter {
    pub fn new() -> Self {
        JunitFormatter
    }

    fn escape_xml(s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '&' => result.push_str("&amp;"),
                '<' => result.push_str("&lt;"),
                '>' => result.push_str("&gt;"),
                '"' => result.push_str("&quot;"),
                '\'' => result.push_str("&apos;"),
                c => result.push(c),
            }
        }
        result
    }

    fn failure_text(finding: &Finding) -> String {
        match &finding.details {
            Some(details) => format!("{} - {}", finding.message, details),
            None => finding.message.clone(),
        }
    }
}

impl Default for JunitFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JunitFormatter {
    fn format(
        &self,
        report: &FleetReport,
        _comparison: Option<&ComparisonResult>,
    ) -> Result<String, PodguardError> {
        let mut output = String::new();
        output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");

        let summary = report.summary();
        let total = summary.passed + summary.warned + summary.failed + summary.info;
        output.push_str(&format!(
            "<testsuites name=\"podguard\" tests=\"{}\" failures=\"{}\" errors=\"0\" skipped=\"0\">\n",
            total, summary.failed
        ));

        for workload in &report.workloads {
            let ws = workload.summary();
            let suite_name = Self::escape_xml(&workload.qualified_name());

            output.push_str(&format!(
                "  <testsuite name=\"{}\" tests=\"{}\" failures=\"{}\" errors=\"0\" skipped=\"0\">\n",
                suite_name,
                workload.findings.len(),
                ws.failed
            ));

            for finding in &workload.findings {
                output.push_str(&format!(
                    "    <testcase name=\"{}\" classname=\"podguard.{}.{}\">\n",
                    Self::escape_xml(&finding.rule_id),
                    Self::escape_xml(&workload.namespace),
                    Self::escape_xml(&workload.name)
                ));

                match finding.status {
                    FindingStatus::Fail => {
                        let severity = report
                            .rule(&finding.rule_id)
                            .map(|r| r.severity.to_string())
                            .unwrap_or_default();
                        output.push_str(&format!(
                            "      <failure message=\"{}\" type=\"{}\">{}</failure>\n",
                            Self::escape_xml(&finding.message),
                            severity,
                            Self::escape_xml(&Self::failure_text(finding))
                        ));
                    }
                    FindingStatus::Warning => {
                        output.push_str(&format!(
                            "      <system-out>WARNING: {}</system-out>\n",
                            Self::escape_xml(&Self::failure_text(finding))
                        ));
                    }
                    FindingStatus::Pass | FindingStatus::Info => {
                        output.push_str(&format!(
                            "      <system-out>{}</system-out>\n",
                            Self::escape_xml(&finding.message)
                        ));
                    }
                }

                output.push_str("    </testcase>\n");
            }

            output.push_str("  </testsuite>\n");
        }

        output.push_str("</testsuites>");
        Ok(output)
    }
}

/// Get a formatter based on the output format
pub fn get_formatter(
    format: OutputFormat,
    color: bool,
    verbose: bool,
    quiet: bool,
) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(TerminalFormatter::new(color, verbose, quiet)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Junit => Box::new(JunitFormatter::new()),
    }
}

/// Render the rule catalog as a table
pub fn format_rule_table(rules: &[Rule], allowed_registries: &[String]) -> String {
    let mut table = Table::new();
    table.set_header(Row::from(["ID", "SEVERITY", "CATEGORY", "NAME"]));

    for rule in rules {
        table.add_row(Row::from([
            rule.id.clone(),
            rule.severity.to_string(),
            rule.category.to_string(),
            rule.name.clone(),
        ]));
    }
    table.load_preset(comfy_table::presets::NOTHING);

    let mut output = table.to_string();
    output.push_str("\n\nAllowed registries:\n");
    for registry in allowed_registries {
        output.push_str(&format!("  {}\n", registry));
    }
    output
}

/// Format a Unix timestamp as ISO 8601
fn format_timestamp(timestamp: u64) -> String {
    i64::try_from(timestamp)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Secs, true))
        .unwrap_or_else(|| timestamp.to_string())
}
