//! Command line arguments for podguard.

use crate::RuleCategory;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
    /// JUnit XML for CI/CD integration
    Junit,
}

/// Rule category filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryFilter {
    Security,
    Cost,
    Reliability,
    BestPractice,
}

impl CategoryFilter {
    pub fn to_category(self) -> RuleCategory {
        match self {
            CategoryFilter::Security => RuleCategory::Security,
            CategoryFilter::Cost => RuleCategory::Cost,
            CategoryFilter::Reliability => RuleCategory::Reliability,
            CategoryFilter::BestPractice => RuleCategory::BestPractice,
        }
    }
}

#[derive(Debug, clap::Args, Clone, Default)]
pub struct GlobalOptions {
    /// Include finding details and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output (also honored via NO_COLOR)
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Load configuration from a TOML file
    #[arg(long, global = true, env = "PODGUARD_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Options selecting the active rule set
#[derive(Debug, clap::Args, Clone, Default, PartialEq)]
pub struct RuleFilterOpts {
    /// Skip a rule by ID (repeatable)
    #[arg(long, value_name = "RULE")]
    pub skip: Vec<String>,

    /// Run only the given rule by ID (repeatable)
    #[arg(long, value_name = "RULE")]
    pub only: Vec<String>,

    /// Run only rules in a category (repeatable)
    #[arg(long, value_enum)]
    pub category: Vec<CategoryFilter>,

    /// Trust an additional registry prefix (repeatable)
    #[arg(long, value_name = "PREFIX")]
    pub allow_registry: Vec<String>,
}

#[derive(Debug, clap::Args, Clone, Default, PartialEq)]
pub struct CheckOpts {
    /// Snapshot files (YAML or JSON). Reads stdin when none are given or for `-`.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,

    #[command(flatten)]
    pub filter: RuleFilterOpts,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "PODGUARD_FORMAT")]
    pub format: OutputFormat,

    /// Only output workloads with failures or warnings
    #[arg(short, long)]
    pub quiet: bool,

    /// Compare against a baseline file
    #[arg(long, value_name = "FILE")]
    pub baseline: Option<PathBuf>,

    /// Save this run as a baseline file
    #[arg(long, value_name = "FILE")]
    pub save_baseline: Option<PathBuf>,
}

impl CheckOpts {
    /// Whether the snapshot comes from stdin (no files, or a lone `-`)
    pub fn reads_stdin(&self) -> bool {
        self.files.is_empty() || (self.files.len() == 1 && self.files[0].as_os_str() == "-")
    }
}

/// Printed when `check` would block on an interactive terminal
pub const STDIN_HINT: &str =
    "podguard: reading a workload snapshot from stdin (YAML or JSON); end input with Ctrl-D, or pass files to `podguard check`";

#[derive(Debug, Subcommand, Clone, PartialEq)]
pub enum Command {
    /// Validate workloads (default)
    Check(CheckOpts),
    /// List the active rules
    Rules(RuleFilterOpts),
    /// Print version information
    Version,
}

/// Parsed command line arguments
#[derive(Debug, Parser)]
#[command(
    name = "podguard",
    about = "Pod compliance validation against registry, security and resource policy",
    max_term_width = 100,
    disable_version_flag = true,
    after_help = "EXIT CODES:\n    0   All rules passed\n    1   One or more rules failed\n    2   Warnings only (no failures)\n    3   Runtime error"
)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Args {
    /// Command to run; `check` on stdin when none was given
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Check(CheckOpts::default()))
    }

    /// Whether output may use ANSI colors
    pub fn color_enabled(&self) -> bool {
        !self.global.no_color && std::env::var_os("NO_COLOR").is_none()
    }
}
