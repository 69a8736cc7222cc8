//! Build and catalog information for `podguard version`.

use crate::checks::{default_rules, registry::DEFAULT_ALLOWED_REGISTRIES};
use std::fmt;

/// What this binary is and what it checks out of the box
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    pub commit: Option<&'static str>,
    pub build_date: Option<&'static str>,
    pub target: &'static str,
    pub rustc_version: Option<&'static str>,
    /// Ids of the built-in rules, in evaluation order
    pub rule_ids: Vec<String>,
    pub default_registries: usize,
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let commit = self.commit.unwrap_or("unknown");
        writeln!(f, "podguard {} ({})", self.version, commit)?;

        let mut toolchain = self.target.to_string();
        if let Some(rustc) = self.rustc_version {
            toolchain.push_str(&format!(", rustc {}", rustc));
        }
        if let Some(date) = self.build_date {
            toolchain.push_str(&format!(", built {}", date));
        }
        writeln!(f, "  {}", toolchain)?;

        write!(
            f,
            "  {} rules: {}\n  {} default registries",
            self.rule_ids.len(),
            self.rule_ids.join(", "),
            self.default_registries
        )
    }
}

/// Collect build metadata emitted by `build.rs` plus the rule catalog
pub fn get_build_info() -> BuildInfo {
    BuildInfo {
        version: env!("CARGO_PKG_VERSION"),
        commit: option_env!("PODGUARD_GIT_HASH"),
        build_date: option_env!("PODGUARD_BUILD_DATE"),
        target: env!("PODGUARD_TARGET"),
        rustc_version: option_env!("PODGUARD_RUSTC_VERSION"),
        rule_ids: default_rules().into_iter().map(|r| r.id).collect(),
        default_registries: DEFAULT_ALLOWED_REGISTRIES.len(),
    }
}
