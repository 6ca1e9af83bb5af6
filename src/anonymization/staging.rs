//! Two-phase writes over unique columns
//!
//! Overwriting a set of rows whose values are a permutation of each other
//! would collide on unique columns if done row by row. Phase one writes every
//! row with [`STAGING_MARKER`] appended to the unique columns. Phase two
//! strips the marker from all staged rows in a single statement. Both phases
//! run in one transaction.
//!
//! A staged value can only collide with a row not yet written if that row's
//! current value already ends with the marker. [`ensure_unmarked`] rejects such
//! data before the transaction starts.

use crate::adapters::database::DatasetStore;
use crate::domain::{Result, VeilError};

/// Trailing marker carried by staged values between the two phases
pub const STAGING_MARKER: &str = " ";

/// Appends the staging marker
pub fn staged(value: &str) -> String {
    format!("{value}{STAGING_MARKER}")
}

/// Commits when `outcome` succeeded, rolls back otherwise
///
/// A rollback failure is logged; the original error is returned.
pub async fn finish<S, T>(store: &mut S, unit: &str, outcome: Result<T>) -> Result<T>
where
    S: DatasetStore + ?Sized,
{
    match outcome {
        Ok(value) => {
            store.commit().await?;
            tracing::debug!(unit, "Transaction committed");
            Ok(value)
        }
        Err(err) => {
            tracing::error!(unit, error = %err, "Rolling back");
            if let Err(rollback_err) = store.rollback().await {
                tracing::error!(unit, error = %rollback_err, "Rollback failed");
            }
            Err(err)
        }
    }
}

/// Fails when a current value of a unique column already ends with the marker
///
/// `values` must cover every row whose column shares the unique index with the
/// staged rows. Offending values are counted, not echoed, since usernames are
/// identities.
///
/// # Errors
///
/// Returns [`VeilError::Validation`] naming `column` and the number of
/// offending values.
pub fn ensure_unmarked<'a, I>(column: &str, values: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>,
{
    let marked = values
        .into_iter()
        .filter(|value| value.ends_with(STAGING_MARKER))
        .count();
    if marked == 0 {
        return Ok(());
    }
    Err(VeilError::Validation(format!(
        "{marked} value(s) in {column} already end with the staging marker {STAGING_MARKER:?}; \
         trim them before running"
    )))
}

/// Checks that a statement touched exactly the expected number of rows
pub fn expect_rows(what: &str, expected: u64, affected: u64) -> Result<()> {
    if expected == affected {
        Ok(())
    } else {
        Err(VeilError::Database(format!(
            "{what}: expected {expected} row(s), {affected} affected"
        )))
    }
}
