//! Fixture workloads.

#![allow(dead_code)]

use podguard::data::snapshot::ClusterSnapshot;
use podguard::data::workload::{ResourceQuantities, SecurityPosture, WorkloadDescriptor};

/// Every rule passes
pub fn compliant_pod(name: &str) -> WorkloadDescriptor {
    WorkloadDescriptor::new(name, "production", &format!("registry.example.com/production/{}:v1", name))
        .with_security_context(hardened_posture())
        .with_limits(ResourceQuantities::new("500m", "512Mi"))
        .with_requests(ResourceQuantities::new("250m", "256Mi"))
}

/// Runs as root from an unknown registry; limits only
pub fn risky_pod(name: &str) -> WorkloadDescriptor {
    WorkloadDescriptor::new(name, "staging", &format!("unauthorized-registry.example.com/staging/{}:v9", name))
        .with_security_context(SecurityPosture {
            run_as_non_root: Some(false),
            read_only_root_filesystem: Some(true),
            privileged: Some(true),
        })
        .with_limits(ResourceQuantities::new("1", "1Gi"))
}

/// Trusted image, nothing else set
pub fn bare_pod(name: &str) -> WorkloadDescriptor {
    WorkloadDescriptor::new(name, "default", "quay.io/acme/worker:v2")
}

/// Warnings only: writable filesystem, no requests
pub fn warning_pod(name: &str) -> WorkloadDescriptor {
    WorkloadDescriptor::new(name, "monitoring", "ghcr.io/acme/exporter:v1")
        .with_security_context(SecurityPosture {
            run_as_non_root: Some(true),
            read_only_root_filesystem: None,
            privileged: None,
        })
        .with_limits(ResourceQuantities::new("200m", "128Mi"))
}

pub fn hardened_posture() -> SecurityPosture {
    SecurityPosture {
        run_as_non_root: Some(true),
        read_only_root_filesystem: Some(true),
        privileged: Some(false),
    }
}

pub fn mixed_snapshot() -> ClusterSnapshot {
    ClusterSnapshot::new(vec![
        compliant_pod("frontend-1"),
        risky_pod("backend-2"),
        bare_pod("worker-3"),
        warning_pod("exporter-4"),
    ])
}

/// Pod listing in the dashboard's `podsInfo` shape
pub const POD_LISTING_YAML: &str = r#"
podsInfo:
  - name: frontend-6d4b
    namespace: frontend
    status: Running
    restarts: 0
    age: 3d
    cpu: 120m
    memory: 180Mi
    image: registry.example.com/frontend/app-1:v4
    securityContext:
      runAsNonRoot: true
      readOnlyRootFilesystem: true
      privileged: false
    resources:
      limits:
        cpu: 500m
        memory: 512Mi
      requests:
        cpu: 250m
        memory: 256Mi
  - name: backend-9f2c
    namespace: backend
    status: CrashLoopBackOff
    restarts: 7
    image: unauthorized-registry.example.com/backend/app-2:v1
    securityContext:
      runAsNonRoot: false
"#;

pub const POD_LIST_JSON: &str = r#"[
  {
    "name": "cache-0",
    "namespace": "data",
    "image": "docker.io/library/redis:7",
    "securityContext": { "runAsNonRoot": true },
    "resources": { "requests": { "cpu": "100m", "memory": "64Mi" } }
  }
]"#;
