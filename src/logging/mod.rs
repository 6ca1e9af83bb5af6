//! Logging and observability
//!
//! Structured logging through `tracing`, with a console layer and an optional
//! rolling JSON file. Synthetic and real identities only appear at `debug`.
//!
//! # Example
//!
//! ```no_run
//! use veil::logging::init_logging;
//! use veil::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Anonymization started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log the start of an anonymization step
///
/// # Example
///
/// ```no_run
/// use veil::log_step_start;
///
/// log_step_start!("users", 1200);
/// ```
#[macro_export]
macro_rules! log_step_start {
    ($step:expr, $count:expr) => {
        tracing::info!(step = $step, records = $count, "Starting anonymization step");
    };
}

/// Log the completion of an anonymization step
///
/// # Example
///
/// ```no_run
/// use veil::log_step_complete;
/// use std::time::Duration;
///
/// log_step_complete!("courses", 42, Duration::from_millis(180));
/// ```
#[macro_export]
macro_rules! log_step_complete {
    ($step:expr, $count:expr, $duration:expr) => {
        tracing::info!(
            step = $step,
            written = $count,
            duration_ms = $duration.as_millis() as u64,
            "Anonymization step completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use veil::log_error_with_context;
/// use veil::domain::VeilError;
///
/// let error = VeilError::Input("first names list is empty".to_string());
/// log_error_with_context!(&error, "Failed to load inputs");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
