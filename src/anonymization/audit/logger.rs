//! Audit mapping files
//!
//! An audit file is the only link between an anonymized dataset and the real
//! one. Each line reads `original => substitute`.

use crate::domain::{Result, VeilError};
use std::fmt::Display;
use std::fs;
use std::path::Path;

/// Separator between the original and the substituted value
pub const AUDIT_SEPARATOR: &str = " => ";

/// Collected `original => substitute` mappings for one module
#[derive(Debug, Clone, Default)]
pub struct AuditLog {
    lines: Vec<(String, String)>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one mapping
    pub fn record(&mut self, original: impl Display, substitute: impl Display) {
        self.lines.push((original.to_string(), substitute.to_string()));
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// File contents, every line newline-terminated
    pub fn render(&self) -> String {
        self.lines
            .iter()
            .map(|(original, substitute)| format!("{original}{AUDIT_SEPARATOR}{substitute}\n"))
            .collect()
    }

    /// Writes the mappings to `path`, replacing any previous file
    ///
    /// Missing parent directories are created.
    ///
    /// # Errors
    ///
    /// Returns [`VeilError::Io`] if the directory or file cannot be written.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                VeilError::Io(format!(
                    "Failed to create audit directory {}: {e}",
                    parent.display()
                ))
            })?;
        }

        fs::write(path, self.render()).map_err(|e| {
            VeilError::Io(format!("Failed to write audit file {}: {e}", path.display()))
        })?;

        tracing::info!(file = %path.display(), entries = self.len(), "Audit file written");
        Ok(())
    }
}
