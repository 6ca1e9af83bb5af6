//! Line-oriented input files
//!
//! Name lists and the ignore list hold one value per line. The filler corpus
//! holds its words on the first non-empty line.

use crate::domain::{Result, VeilError};
use std::collections::HashSet;
use std::path::Path;

fn read(path: &Path, what: &str) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        VeilError::Input(format!("Failed to read {what} file {}: {e}", path.display()))
    })
}

/// Reads a list file
///
/// Lines are trimmed, blank lines skipped and later duplicates dropped, so the
/// first occurrence of a value decides its position.
///
/// # Errors
///
/// Returns [`VeilError::Input`] if the file cannot be read.
pub fn read_list(path: impl AsRef<Path>, what: &str) -> Result<Vec<String>> {
    let path = path.as_ref();
    let contents = read(path, what)?;
    let values = parse_list(&contents);

    tracing::debug!(
        file = %path.display(),
        kind = what,
        entries = values.len(),
        "List file loaded"
    );

    Ok(values)
}

/// Splits list file contents into values
///
/// Surrounding whitespace is not part of a value, so `" Ada"` and `"Ada"` are
/// the same entry.
pub fn parse_list(contents: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(*line))
        .map(str::to_string)
        .collect()
}

/// Reads the filler corpus
///
/// # Errors
///
/// Returns [`VeilError::Input`] if the file cannot be read or holds no words.
pub fn read_corpus(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let contents = read(path, "filler corpus")?;
    let words = parse_corpus(&contents);

    if words.is_empty() {
        return Err(VeilError::Input(format!(
            "Filler corpus {} contains no words",
            path.display()
        )));
    }

    tracing::debug!(file = %path.display(), words = words.len(), "Filler corpus loaded");
    Ok(words)
}

/// Words of the first non-empty line
pub fn parse_corpus(contents: &str) -> Vec<String> {
    contents
        .lines()
        .find(|line| !line.trim().is_empty())
        .map(|line| line.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}
