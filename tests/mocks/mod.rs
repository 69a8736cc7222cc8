//! Workload fixtures for testing.
//!
//! Canned descriptors and snapshot documents covering compliant, partially
//! compliant and non-compliant pods.

pub mod workloads;
