//! Anonymization of an EvaP-style evaluation dataset
//!
//! Three independent substitutions, each owning its data:
//!
//! - [`users`]: identities replaced by synthetic persons from [`identity`]
//! - [`courses`]: descriptions permuted among course ids
//! - [`comments`]: free text replaced by filler with the same word count
//!
//! Writes to unique columns go through the two-phase protocol in [`staging`].
//! The user and course mappings are written to [`audit`] files; the run totals
//! end up in a [`report::RunSummary`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use veil::anonymization::{AnonymizationEngine, engine::rng_from_seed};
//!
//! let engine = AnonymizationEngine::new(config.anonymization.clone())?;
//! let summary = engine.run(&mut store, &mut rng_from_seed(Some(7)), false).await?;
//! ```

pub mod audit;
pub mod comments;
pub mod config;
pub mod courses;
pub mod engine;
pub mod identity;
pub mod report;
pub mod staging;
pub mod users;

pub use config::AnonymizationConfig;
pub use engine::AnonymizationEngine;
pub use report::RunSummary;
