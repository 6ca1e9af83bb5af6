//! Run summary
//!
//! Counts from one anonymization run. The summary never contains real or
//! synthetic identities, so it is safe to keep next to the anonymized copy.

use crate::domain::{Result, VeilError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

/// Counters for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Unique id of this run
    pub run_id: Uuid,

    /// When the run started
    pub started_at: DateTime<Utc>,

    /// Wall-clock duration in milliseconds
    pub duration_ms: u64,

    /// Whether database writes were skipped
    pub dry_run: bool,

    pub users_read: usize,
    pub users_substituted: usize,
    pub users_ignored: usize,

    pub courses_permuted: usize,

    pub comments_read: usize,
    pub comment_fields_replaced: usize,
}

impl RunSummary {
    /// Empty summary stamped with a fresh run id and the current time
    pub fn start(dry_run: bool) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            duration_ms: 0,
            dry_run,
            users_read: 0,
            users_substituted: 0,
            users_ignored: 0,
            courses_permuted: 0,
            comments_read: 0,
            comment_fields_replaced: 0,
        }
    }

    /// Records the elapsed time and logs the totals
    pub fn finish(&mut self, elapsed: Duration) {
        self.duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

        tracing::info!(
            run_id = %self.run_id,
            dry_run = self.dry_run,
            users_substituted = self.users_substituted,
            users_ignored = self.users_ignored,
            courses_permuted = self.courses_permuted,
            comment_fields_replaced = self.comment_fields_replaced,
            duration_ms = self.duration_ms,
            "Anonymization run finished"
        );
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes the JSON summary to `path`
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?).map_err(|e| {
            VeilError::Io(format!("Failed to write report {}: {e}", path.display()))
        })
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run {}{}", self.run_id, if self.dry_run { " (dry run)" } else { "" })?;
        writeln!(
            f,
            "  Users:    {} read, {} substituted, {} ignored",
            self.users_read, self.users_substituted, self.users_ignored
        )?;
        writeln!(f, "  Courses:  {} permuted", self.courses_permuted)?;
        writeln!(
            f,
            "  Comments: {} read, {} fields replaced",
            self.comments_read, self.comment_fields_replaced
        )?;
        write!(f, "  Duration: {} ms", self.duration_ms)
    }
}
