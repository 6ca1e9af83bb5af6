//! Configuration management for Veil.
//!
//! # Overview
//!
//! Veil reads a single TOML file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `VEIL_<SECTION>_<KEY>` overrides
//! - Default values for optional settings
//! - Validation of every section before anything touches the database
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use veil::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("veil.toml")?;
//!
//! println!("users table: {}", config.tables.users);
//! println!("pool size: {}", config.anonymization.identity.pool_size);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - log level and dry-run flag
//! - [`DatabaseConfig`] - PostgreSQL connection string and timeouts
//! - [`TableConfig`] - names of the users, courses and comments tables
//! - [`AnonymizationConfig`] - input files, identity rules, audit outputs, seed
//! - [`LoggingConfig`] - optional JSON log file
//!
//! # Example Configuration
//!
//! ```toml
//! [database]
//! connection_string = "${VEIL_DATABASE_URL}"
//!
//! [tables]
//! users = "evaluation_userprofile"
//! courses = "evaluation_course"
//! comments = "evaluation_textanswer"
//!
//! [anonymization.inputs]
//! first_names = "data/first_names.txt"
//! last_names = "data/last_names.txt"
//! ignores = "data/ignore.txt"
//! lorem_ipsum = "data/lorem_ipsum.txt"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use crate::anonymization::config::AnonymizationConfig;
pub use loader::{load_config, parse_config};
pub use schema::{ApplicationConfig, DatabaseConfig, LoggingConfig, TableConfig, VeilConfig};
pub use secret::{secret_string, SecretString, SecretValue};
