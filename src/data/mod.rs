//! Data module for podguard
//!
//! Contains workload descriptors and the snapshots they are loaded into.

pub mod snapshot;
pub mod workload;
