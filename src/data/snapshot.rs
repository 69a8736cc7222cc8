//! Cluster snapshots.
//!
//! A snapshot is an immutable list of workload descriptors read once from
//! input and handed to the validator. Accepted document shapes:
//! - a single descriptor object
//! - a list of descriptors
//! - an object with a `pods` (or `podsInfo`) list
//!
//! Files ending in `.json` are parsed as JSON; everything else goes through
//! the YAML parser, which also accepts JSON.
//!
//! The document shape is decided before any descriptor is deserialized, so a
//! malformed entry inside a listing is a parse error naming that entry rather
//! than a different shape matching by accident.

use crate::data::workload::WorkloadDescriptor;
use crate::PodguardError;
use serde_json::Value;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Immutable set of workloads to validate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClusterSnapshot {
    pub workloads: Vec<WorkloadDescriptor>,
}

/// Input syntax of a snapshot document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    Yaml,
}

impl SnapshotFormat {
    /// Pick the parser from a file extension
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => SnapshotFormat::Json,
            _ => SnapshotFormat::Yaml,
        }
    }
}

impl ClusterSnapshot {
    pub fn new(workloads: Vec<WorkloadDescriptor>) -> Self {
        ClusterSnapshot { workloads }
    }

    pub fn len(&self) -> usize {
        self.workloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workloads.is_empty()
    }

    /// Combine two snapshots, keeping `self`'s workloads first
    pub fn merge(mut self, other: ClusterSnapshot) -> Self {
        self.workloads.extend(other.workloads);
        self
    }

    /// Parse a snapshot document. `context` names the source in errors.
    pub fn parse(content: &str, format: SnapshotFormat, context: &str) -> Result<Self, PodguardError> {
        if content.trim().is_empty() {
            return Ok(ClusterSnapshot::default());
        }

        let parse_error = |message: String| PodguardError::Parse {
            context: context.to_string(),
            message,
        };

        let doc: Value = match format {
            SnapshotFormat::Json => serde_json::from_str(content).map_err(|e| parse_error(e.to_string()))?,
            SnapshotFormat::Yaml => serde_yaml::from_str(content).map_err(|e| parse_error(e.to_string()))?,
        };

        let workloads = match doc {
            Value::Null => Vec::new(),
            Value::Array(items) => descriptors_from(items, "").map_err(parse_error)?,
            Value::Object(mut map) => {
                let listing = ["pods", "podsInfo"]
                    .into_iter()
                    .find_map(|key| map.remove(key).map(|value| (key, value)));

                match listing {
                    Some((key, Value::Array(items))) => descriptors_from(items, key).map_err(parse_error)?,
                    Some((key, other)) => {
                        return Err(parse_error(format!(
                            "`{}` must be a list of workloads, found {}",
                            key,
                            kind_of(&other)
                        )));
                    }
                    None => vec![descriptor_from(Value::Object(map)).map_err(parse_error)?],
                }
            }
            other => {
                return Err(parse_error(format!(
                    "expected a workload, a list, or a pods listing, found {}",
                    kind_of(&other)
                )));
            }
        };

        Ok(ClusterSnapshot { workloads })
    }
}

/// Deserialize each list entry, naming the failing index as `field[i]`
fn descriptors_from(items: Vec<Value>, field: &str) -> Result<Vec<WorkloadDescriptor>, String> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| descriptor_from(item).map_err(|e| format!("{}[{}]: {}", field, i, e)))
        .collect()
}

fn descriptor_from(value: Value) -> Result<WorkloadDescriptor, String> {
    if !value.is_object() {
        return Err(format!("expected a workload object, found {}", kind_of(&value)));
    }
    serde_json::from_value(value).map_err(|e| e.to_string())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Load a snapshot from a file
pub fn load_snapshot(path: &Path) -> Result<ClusterSnapshot, PodguardError> {
    let content = std::fs::read_to_string(path).map_err(|source| PodguardError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let snapshot = ClusterSnapshot::parse(
        &content,
        SnapshotFormat::from_path(path),
        &path.display().to_string(),
    )?;
    debug!(path = %path.display(), workloads = snapshot.len(), "loaded snapshot");
    Ok(snapshot)
}

/// Load and merge snapshots from several files, in order
pub fn load_snapshots(paths: &[impl AsRef<Path>]) -> Result<ClusterSnapshot, PodguardError> {
    paths.iter().try_fold(ClusterSnapshot::default(), |acc, path| {
        Ok(acc.merge(load_snapshot(path.as_ref())?))
    })
}

/// Load a snapshot from a reader (stdin)
pub fn read_snapshot(mut reader: impl Read) -> Result<ClusterSnapshot, PodguardError> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|source| PodguardError::Io {
            path: "<stdin>".into(),
            source,
        })?;
    ClusterSnapshot::parse(&content, SnapshotFormat::Yaml, "<stdin>")
}
