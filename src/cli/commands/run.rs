//! Run command implementation
//!
//! Loads the configuration and inputs, asks for confirmation, then runs the
//! anonymization against the configured database.

use crate::adapters::postgresql::{PostgreSQLAdapter, PostgreSQLClient};
use crate::anonymization::engine::rng_from_seed;
use crate::anonymization::AnonymizationEngine;
use crate::cli::{exit_code, EXIT_OK};
use crate::config::{load_config, VeilConfig};
use crate::log_error_with_context;
use clap::Args;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Compute substitutions and write audit files without modifying the database
    #[arg(long)]
    pub dry_run: bool,

    /// Seed for the random generator, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the run summary as JSON to this path
    #[arg(long, value_name = "PATH")]
    pub report: Option<PathBuf>,
}

impl RunArgs {
    /// Execute the run command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Starting run command");

        let mut config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("❌ {e}");
                return Ok(exit_code(&e));
            }
        };
        self.apply_overrides(&mut config);
        let dry_run = config.application.dry_run;

        let engine = match AnonymizationEngine::new(config.anonymization.clone()) {
            Ok(engine) => engine,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load anonymization inputs");
                eprintln!("❌ {e}");
                return Ok(exit_code(&e));
            }
        };

        if dry_run {
            tracing::info!("Dry run mode enabled - no data will be written");
            println!("🔍 DRY RUN MODE - the database will not be modified");
            println!();
        } else if !self.yes {
            print_target(&config);
            let stdin = io::stdin();
            if !confirm(&mut stdin.lock(), &mut io::stdout())? {
                println!("Run cancelled.");
                return Ok(EXIT_OK);
            }
        }

        let client = match PostgreSQLClient::new(config.database.clone()) {
            Ok(client) => client,
            Err(e) => {
                log_error_with_context!(&e, "Failed to create database client");
                eprintln!("❌ {e}");
                return Ok(exit_code(&e));
            }
        };
        let mut store = match PostgreSQLAdapter::connect(&client, &config.tables).await {
            Ok(store) => store,
            Err(e) => {
                log_error_with_context!(&e, "Failed to connect to database");
                eprintln!("❌ {e}");
                return Ok(exit_code(&e));
            }
        };

        let mut rng = rng_from_seed(config.anonymization.seed);
        println!("🚀 Anonymizing {}", client.connection_string_safe());

        let summary = match engine.run(&mut store, &mut rng, dry_run).await {
            Ok(summary) => summary,
            Err(e) => {
                log_error_with_context!(&e, "Anonymization run failed");
                eprintln!("❌ Anonymization failed: {e}");
                return Ok(exit_code(&e));
            }
        };

        println!();
        println!("✅ {summary}");
        println!(
            "   Audit files: {}, {}",
            config.anonymization.audit.users.display(),
            config.anonymization.audit.courses.display()
        );

        if let Some(path) = &self.report {
            if let Err(e) = summary.write_json(path) {
                log_error_with_context!(&e, "Failed to write run report");
                eprintln!("❌ {e}");
                return Ok(exit_code(&e));
            }
            println!("   Report: {}", path.display());
        }

        Ok(EXIT_OK)
    }

    fn apply_overrides(&self, config: &mut VeilConfig) {
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }
        if let Some(seed) = self.seed {
            tracing::info!(seed, "Overriding seed from CLI");
            config.anonymization.seed = Some(seed);
        }
    }
}

fn print_target(config: &VeilConfig) {
    use secrecy::ExposeSecret;

    println!("⚠️  This irreversibly overwrites user identities, course descriptions and");
    println!("   free-text answers. Only run it against a copy of the production data.");
    println!();
    println!("  Database: {}", config.database.connection_string.expose_secret().redacted_url());
    println!(
        "  Tables:   {}, {}, {}",
        config.tables.users, config.tables.courses, config.tables.comments
    );
    println!();
}

/// Asks for confirmation; only `y` or `yes` proceeds
fn confirm(input: &mut impl BufRead, output: &mut impl Write) -> io::Result<bool> {
    write!(output, "Proceed with anonymization? [y/N]: ")?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}
