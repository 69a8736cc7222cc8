//! Configuration file support.
//!
//! ```toml
//! allowed_registries = ["registry.example.com", "ghcr.io/acme"]
//! skip = ["readonly-filesystem"]
//! only = []
//! categories = ["security", "cost"]
//! ```
//!
//! Every key is optional. A missing `allowed_registries` keeps the built-in
//! allow-list; an empty one trusts no registry.

use crate::{PodguardError, RuleCategory};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub allowed_registries: Option<Vec<String>>,
    pub skip: Vec<String>,
    pub only: Vec<String>,
    pub categories: Vec<RuleCategory>,
}

impl ConfigFile {
    pub fn from_toml_str(content: &str, context: &str) -> Result<Self, PodguardError> {
        toml::from_str(content).map_err(|e| PodguardError::Config {
            message: format!("{}: {}", context, e),
        })
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, PodguardError> {
        let content = std::fs::read_to_string(path).map_err(|source| PodguardError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content, &path.display().to_string())?;
        tracing::debug!(path = %path.display(), "loaded configuration file");
        Ok(config)
    }

    /// Load configuration if a path is given, defaults otherwise
    pub fn load_optional(path: Option<&Path>) -> Result<Self, PodguardError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
