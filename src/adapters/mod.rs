//! External system integrations for Veil.
//!
//! - [`database`] - the [`database::DatasetStore`] seam used by the anonymization modules
//! - [`postgresql`] - PostgreSQL implementation of that seam
//! - [`files`] - line-oriented input files (name lists, ignore list, filler corpus)
//!
//! # Example
//!
//! ```rust,no_run
//! use veil::adapters::postgresql::{PostgreSQLAdapter, PostgreSQLClient};
//! use veil::adapters::database::DatasetStore;
//! use veil::config::load_config;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("veil.toml")?;
//! let client = PostgreSQLClient::new(config.database.clone())?;
//! let mut store = PostgreSQLAdapter::connect(&client, &config.tables).await?;
//!
//! let users = store.fetch_users().await?;
//! println!("{} users", users.len());
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod files;
pub mod postgresql;
