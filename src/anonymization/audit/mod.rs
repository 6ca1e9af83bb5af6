//! Audit output
//!
//! Plain-text mapping files for substituted users and permuted courses.

pub mod logger;

pub use logger::{AuditLog, AUDIT_SEPARATOR};
