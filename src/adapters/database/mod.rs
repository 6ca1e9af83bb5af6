//! Database abstraction layer
//!
//! A trait-based seam between the anonymization modules and the PostgreSQL
//! adapter.

pub mod traits;

pub use traits::{DatasetStore, UserWrite};
