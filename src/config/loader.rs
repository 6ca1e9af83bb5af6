//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::VeilConfig;
use crate::config::secret_string;
use crate::domain::errors::VeilError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Substitutes `${VAR}` placeholders from the environment
/// 3. Parses the TOML into [`VeilConfig`]
/// 4. Applies `VEIL_<SECTION>_<KEY>` overrides
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`VeilError::Configuration`] if the file is missing or unreadable,
/// a referenced variable is unset, the TOML is malformed, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use veil::config::loader::load_config;
///
/// let config = load_config("veil.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<VeilConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(VeilError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        VeilError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses and validates configuration text, as [`load_config`] does after reading the file
pub fn parse_config(contents: &str) -> Result<VeilConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: VeilConfig = toml::from_str(&contents)
        .map_err(|e| VeilError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        VeilError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied through untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| VeilError::Configuration(format!("Invalid placeholder pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    processed_line = processed_line.replace(&cap[0], &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(VeilError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn parse_override<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        VeilError::Configuration(format!("Invalid value '{value}' for environment override {key}"))
    })
}

/// Applies environment variable overrides using the VEIL_* prefix
///
/// Variables follow the pattern `VEIL_<SECTION>_<KEY>`, for example
/// `VEIL_DATABASE_CONNECTION_STRING` or `VEIL_ANONYMIZATION_SEED`.
/// An override that does not parse is a configuration error.
fn apply_env_overrides(config: &mut VeilConfig) -> Result<()> {
    let var = |key: &str| std::env::var(key).ok();

    if let Some(val) = var("VEIL_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Some(val) = var("VEIL_APPLICATION_DRY_RUN") {
        config.application.dry_run = parse_override("VEIL_APPLICATION_DRY_RUN", &val)?;
    }

    if let Some(val) = var("VEIL_DATABASE_CONNECTION_STRING") {
        config.database.connection_string = secret_string(val);
    }
    if let Some(val) = var("VEIL_DATABASE_CONNECTION_TIMEOUT_SECONDS") {
        config.database.connection_timeout_seconds =
            parse_override("VEIL_DATABASE_CONNECTION_TIMEOUT_SECONDS", &val)?;
    }
    if let Some(val) = var("VEIL_DATABASE_STATEMENT_TIMEOUT_SECONDS") {
        config.database.statement_timeout_seconds =
            parse_override("VEIL_DATABASE_STATEMENT_TIMEOUT_SECONDS", &val)?;
    }

    if let Some(val) = var("VEIL_TABLES_USERS") {
        config.tables.users = val;
    }
    if let Some(val) = var("VEIL_TABLES_COURSES") {
        config.tables.courses = val;
    }
    if let Some(val) = var("VEIL_TABLES_COMMENTS") {
        config.tables.comments = val;
    }

    let anonymization = &mut config.anonymization;
    if let Some(val) = var("VEIL_ANONYMIZATION_SEED") {
        anonymization.seed = Some(parse_override("VEIL_ANONYMIZATION_SEED", &val)?);
    }
    if let Some(val) = var("VEIL_ANONYMIZATION_POOL_SIZE") {
        anonymization.identity.pool_size = parse_override("VEIL_ANONYMIZATION_POOL_SIZE", &val)?;
    }
    if let Some(val) = var("VEIL_ANONYMIZATION_FIRST_NAMES") {
        anonymization.inputs.first_names = PathBuf::from(val);
    }
    if let Some(val) = var("VEIL_ANONYMIZATION_LAST_NAMES") {
        anonymization.inputs.last_names = PathBuf::from(val);
    }
    if let Some(val) = var("VEIL_ANONYMIZATION_IGNORES") {
        anonymization.inputs.ignores = PathBuf::from(val);
    }
    if let Some(val) = var("VEIL_ANONYMIZATION_LOREM_IPSUM") {
        anonymization.inputs.lorem_ipsum = PathBuf::from(val);
    }
    if let Some(val) = var("VEIL_ANONYMIZATION_AUDIT_USERS") {
        anonymization.audit.users = PathBuf::from(val);
    }
    if let Some(val) = var("VEIL_ANONYMIZATION_AUDIT_COURSES") {
        anonymization.audit.courses = PathBuf::from(val);
    }

    if let Some(val) = var("VEIL_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_override("VEIL_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Some(val) = var("VEIL_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = var("VEIL_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
