//! Validate config command implementation
//!
//! Loads the configuration, reads every input file the run would read, and
//! optionally checks that the database answers.

use crate::adapters::postgresql::PostgreSQLClient;
use crate::anonymization::AnonymizationEngine;
use crate::cli::{exit_code, EXIT_OK};
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Also open a database session and run a test query
    #[arg(long)]
    pub check_connection: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration file");
                println!("   Error: {e}");
                return Ok(exit_code(&e));
            }
        };

        let engine = match AnonymizationEngine::new(config.anonymization.clone()) {
            Ok(engine) => {
                println!("✅ Input files are readable");
                engine
            }
            Err(e) => {
                println!("❌ Input files could not be loaded");
                println!("   Error: {e}");
                return Ok(exit_code(&e));
            }
        };

        let anonymization = engine.config();
        let identity = &anonymization.identity;

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!(
            "  Users / Courses / Comments: {} / {} / {}",
            config.tables.users, config.tables.courses, config.tables.comments
        );
        println!("  Pool Size: {}", identity.pool_size);
        println!(
            "  Domains: staff={}, student={}, external={} (suffix .{})",
            identity.staff_domain,
            identity.student_domain,
            identity.external_domain,
            identity.external_suffix
        );
        println!(
            "  Seed: {}",
            anonymization
                .seed
                .map_or_else(|| "random".to_string(), |s| s.to_string())
        );
        println!(
            "  Audit Files: {}, {}",
            anonymization.audit.users.display(),
            anonymization.audit.courses.display()
        );

        if self.check_connection {
            let outcome = match PostgreSQLClient::new(config.database.clone()) {
                Ok(client) => {
                    println!("  Database: {}", client.connection_string_safe());
                    client.test_connection().await
                }
                Err(e) => Err(e),
            };
            if let Err(e) = outcome {
                println!("❌ Database check failed");
                println!("   Error: {e}");
                return Ok(exit_code(&e));
            }
            println!("✅ Database is reachable");
        }

        println!();
        Ok(EXIT_OK)
    }
}
