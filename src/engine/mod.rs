//! Validation engine module.
//!
//! Provides rule evaluation and result aggregation.

pub mod result;
pub mod validator;
