// Veil - Evaluation Database Anonymizer
// Copyright (c) 2025 Veil Contributors
// Licensed under the MIT License

//! # Veil - Evaluation Database Anonymizer
//!
//! Veil turns a copy of a course evaluation database into a dataset that can
//! be handed to developers and testers. It rewrites the copy in place.
//!
//! ## Overview
//!
//! A run performs three substitutions, in order:
//! - **Users**: every account outside the ignore list gets a synthetic name,
//!   username and email; the email domain keeps the account's role
//! - **Courses**: names and descriptive fields are permuted among course ids
//! - **Comments**: free-text answers become filler text with the same word count
//!
//! The user and course mappings are written to audit files.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`anonymization`] - Substitution logic, two-phase writes, audit, run summary
//! - [`adapters`] - PostgreSQL store and input files
//! - [`domain`] - Records, synthetic persons and error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use veil::adapters::postgresql::{PostgreSQLAdapter, PostgreSQLClient};
//! use veil::anonymization::{AnonymizationEngine, engine::rng_from_seed};
//! use veil::config::load_config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("veil.toml")?;
//!     let engine = AnonymizationEngine::new(config.anonymization.clone())?;
//!
//!     let client = PostgreSQLClient::new(config.database.clone())?;
//!     let mut store = PostgreSQLAdapter::connect(&client, &config.tables).await?;
//!
//!     let summary = engine
//!         .run(&mut store, &mut rng_from_seed(config.anonymization.seed), false)
//!         .await?;
//!     println!("{summary}");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`domain::Result`] with [`domain::VeilError`]. The
//! variant tells whether the failure happened before anything was written:
//!
//! ```rust
//! use veil::domain::VeilError;
//!
//! let err = VeilError::Validation("120 users but only 100 generated persons".into());
//! assert!(err.is_pre_write());
//! ```

pub mod adapters;
pub mod anonymization;
pub mod cli;
pub mod config;
pub mod domain;
pub mod logging;
