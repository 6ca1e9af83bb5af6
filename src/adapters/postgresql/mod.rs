//! PostgreSQL integration
//!
//! [`PostgreSQLClient`] owns the pool, [`PostgreSQLAdapter`] runs the
//! anonymization statements over one session taken from it.

pub mod adapter;
pub mod client;
pub mod statements;

pub use adapter::PostgreSQLAdapter;
pub use client::PostgreSQLClient;
pub use statements::Statements;
