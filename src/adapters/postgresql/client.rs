//! PostgreSQL client
//!
//! Owns the connection pool. Veil runs strictly sequentially over a single
//! session, so the pool is capped at one connection.

use crate::config::DatabaseConfig;
use crate::domain::{Result, VeilError};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod, Runtime};
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::NoTls;

/// Connections held by the pool
const MAX_CONNECTIONS: usize = 1;

/// PostgreSQL client for Veil
pub struct PostgreSQLClient {
    pool: Pool,
    config: DatabaseConfig,
}

impl PostgreSQLClient {
    /// Create a new PostgreSQL client
    ///
    /// No connection is opened until [`PostgreSQLClient::session`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`VeilError::Configuration`] if the connection string does not
    /// parse, and [`VeilError::Connection`] if the pool cannot be built.
    pub fn new(config: DatabaseConfig) -> Result<Self> {
        let pg_config: tokio_postgres::Config = config
            .connection_string
            .expose_secret()
            .as_ref()
            .parse()
            .map_err(|e| {
                VeilError::Configuration(format!("Invalid PostgreSQL connection string: {}", e))
            })?;

        let manager = Manager::from_config(
            pg_config,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );

        let timeout = Some(Duration::from_secs(config.connection_timeout_seconds));
        let pool = Pool::builder(manager)
            .max_size(MAX_CONNECTIONS)
            .runtime(Runtime::Tokio1)
            .wait_timeout(timeout)
            .create_timeout(timeout)
            .recycle_timeout(timeout)
            .build()
            .map_err(|e| {
                VeilError::Connection(format!("Failed to create connection pool: {}", e))
            })?;

        Ok(Self { pool, config })
    }

    /// Takes the single session from the pool and applies the statement timeout
    ///
    /// The returned object goes back to the pool when dropped.
    ///
    /// # Errors
    ///
    /// Returns [`VeilError::Connection`] if the database cannot be reached.
    pub async fn session(&self) -> Result<deadpool_postgres::Object> {
        let client = self.pool.get().await.map_err(|e| {
            VeilError::Connection(format!(
                "Failed to connect to {}: {}",
                self.connection_string_safe(),
                e
            ))
        })?;

        let timeout_ms = self.config.statement_timeout_seconds.saturating_mul(1000);
        client
            .batch_execute(&format!("SET statement_timeout = {timeout_ms}"))
            .await
            .map_err(|e| {
                VeilError::Connection(format!("Failed to set statement timeout: {}", e))
            })?;

        tracing::debug!(
            target_db = %self.connection_string_safe(),
            statement_timeout_ms = timeout_ms,
            "PostgreSQL session opened"
        );

        Ok(client)
    }

    /// Checks that the database answers a trivial query
    pub async fn test_connection(&self) -> Result<()> {
        let client = self.session().await?;

        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| VeilError::Connection(format!("Connection test failed: {}", e)))?;

        tracing::info!("PostgreSQL connection test successful");
        Ok(())
    }

    /// Connection string with credentials removed, for log output
    pub fn connection_string_safe(&self) -> String {
        self.config.connection_string.expose_secret().redacted_url()
    }

    /// Pool statistics
    pub fn pool_status(&self) -> deadpool_postgres::Status {
        self.pool.status()
    }
}
