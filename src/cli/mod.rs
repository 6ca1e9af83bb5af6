//! CLI interface and argument parsing

pub mod commands;

use crate::domain::VeilError;
use clap::{Parser, Subcommand};

/// Exit code: success
pub const EXIT_OK: i32 = 0;
/// Exit code: configuration, input or validation error, nothing written
pub const EXIT_CONFIG: i32 = 2;
/// Exit code: database unreachable or connection lost
pub const EXIT_CONNECTION: i32 = 4;
/// Exit code: any other failure during the run
pub const EXIT_FATAL: i32 = 5;

/// Veil - anonymizes a copy of an evaluation platform database
#[derive(Parser, Debug)]
#[command(name = "veil")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "veil.toml", env = "VEIL_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "VEIL_LOG_LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymize users, courses and comments in the configured database
    Run(commands::run::RunArgs),

    /// Validate configuration file and input files
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

/// Maps a failure to the process exit code
pub fn exit_code(err: &VeilError) -> i32 {
    match err {
        VeilError::Configuration(_) | VeilError::Input(_) | VeilError::Validation(_) => {
            EXIT_CONFIG
        }
        VeilError::Connection(_) => EXIT_CONNECTION,
        VeilError::Database(_) | VeilError::Io(_) | VeilError::Serialization(_) => EXIT_FATAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_cli_parse_run() {
        let cli = Cli::parse_from(["veil", "run"]);
        assert_eq!(cli.config, "veil.toml");
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn test_cli_parse_run_flags() {
        let cli = Cli::parse_from([
            "veil", "run", "--yes", "--dry-run", "--seed", "42", "--report", "run.json",
        ]);
        match cli.command {
            Commands::Run(args) => {
                assert!(args.yes);
                assert!(args.dry_run);
                assert_eq!(args.seed, Some(42));
                assert_eq!(args.report.as_deref(), Some(std::path::Path::new("run.json")));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["veil", "--config", "custom.toml", "run"]);
        assert_eq!(cli.config, "custom.toml");
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["veil", "--log-level", "debug", "run"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["veil", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["veil", "init"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }

    #[test_case(VeilError::Configuration("x".into()), 2 ; "configuration")]
    #[test_case(VeilError::Input("x".into()), 2 ; "input")]
    #[test_case(VeilError::Validation("x".into()), 2 ; "validation")]
    #[test_case(VeilError::Connection("x".into()), 4 ; "connection")]
    #[test_case(VeilError::Database("x".into()), 5 ; "database")]
    #[test_case(VeilError::Io("x".into()), 5 ; "io")]
    fn test_exit_code(err: VeilError, expected: i32) {
        assert_eq!(exit_code(&err), expected);
    }
}
