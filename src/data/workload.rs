//! Workload descriptors.
//!
//! A pod-like description of one deployable unit: identity, image, security
//! posture and resource constraints. Field names follow the Kubernetes
//! spelling (`securityContext`, `runAsNonRoot`, ...) so pod listings can be
//! fed in as-is; fields this crate does not use are ignored.

use serde::{Deserialize, Deserializer, Serialize};

/// Security flags of a workload. Each flag may be unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityPosture {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_as_non_root: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only_root_filesystem: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privileged: Option<bool>,
}

/// CPU and memory quantities, kept as the strings they were written as
/// (e.g. "500m", "256Mi"). Bare numbers such as `cpu: 1` are accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceQuantities {
    #[serde(default, deserialize_with = "quantity", skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    #[serde(default, deserialize_with = "quantity", skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuantity {
    Text(String),
    Integer(i64),
    Float(f64),
}

fn quantity<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawQuantity>::deserialize(deserializer)?.map(|q| match q {
        RawQuantity::Text(s) => s,
        RawQuantity::Integer(n) => n.to_string(),
        RawQuantity::Float(f) => f.to_string(),
    }))
}

impl ResourceQuantities {
    pub fn new(cpu: &str, memory: &str) -> Self {
        ResourceQuantities {
            cpu: Some(cpu.to_string()),
            memory: Some(memory.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRequirements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<ResourceQuantities>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requests: Option<ResourceQuantities>,
}

/// One workload to validate.
///
/// `name` and `namespace` default to empty when absent from the input so
/// that the validator, not the parser, reports the missing identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadDescriptor {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    /// Container image reference
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub security_context: Option<SecurityPosture>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourceRequirements>,
}

impl WorkloadDescriptor {
    /// Create a descriptor with no security context and no resources
    pub fn new(name: &str, namespace: &str, image: &str) -> Self {
        WorkloadDescriptor {
            name: name.to_string(),
            namespace: namespace.to_string(),
            image: image.to_string(),
            security_context: None,
            resources: None,
        }
    }

    pub fn with_security_context(mut self, posture: SecurityPosture) -> Self {
        self.security_context = Some(posture);
        self
    }

    pub fn with_limits(mut self, limits: ResourceQuantities) -> Self {
        self.resources.get_or_insert_with(ResourceRequirements::default).limits = Some(limits);
        self
    }

    pub fn with_requests(mut self, requests: ResourceQuantities) -> Self {
        self.resources.get_or_insert_with(ResourceRequirements::default).requests = Some(requests);
        self
    }

    /// `namespace/name`, used to key workloads across reports
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.namespace, self.name)
    }

    pub fn runs_as_non_root(&self) -> Option<bool> {
        self.security_context.as_ref().and_then(|s| s.run_as_non_root)
    }

    pub fn read_only_root_filesystem(&self) -> Option<bool> {
        self.security_context
            .as_ref()
            .and_then(|s| s.read_only_root_filesystem)
    }

    pub fn limits(&self) -> Option<&ResourceQuantities> {
        self.resources.as_ref().and_then(|r| r.limits.as_ref())
    }

    pub fn requests(&self) -> Option<&ResourceQuantities> {
        self.resources.as_ref().and_then(|r| r.requests.as_ref())
    }
}
