//! Free-text replacement
//!
//! Answers are replaced by filler text with the same number of words. Text
//! shape survives, content does not.

use crate::adapters::database::DatasetStore;
use crate::anonymization::staging;
use crate::domain::{Comment, Result, VeilError};

/// Ordered filler words
#[derive(Debug, Clone)]
pub struct FillerCorpus {
    words: Vec<String>,
}

impl FillerCorpus {
    /// # Errors
    ///
    /// Returns [`VeilError::Input`] for an empty word list.
    pub fn new(words: Vec<String>) -> Result<Self> {
        if words.is_empty() {
            return Err(VeilError::Input("filler corpus is empty".to_string()));
        }
        Ok(Self { words })
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// `count` corpus words, starting at the first and wrapping around
    ///
    /// # Examples
    ///
    /// ```
    /// use veil::anonymization::comments::FillerCorpus;
    ///
    /// let corpus = FillerCorpus::new(vec!["lorem".into(), "ipsum".into()]).unwrap();
    /// assert_eq!(corpus.filler(3), "lorem ipsum lorem");
    /// ```
    pub fn filler(&self, count: usize) -> String {
        self.words
            .iter()
            .cycle()
            .take(count)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Replacement for one field; `None` when there is nothing to replace
    pub fn substitute(&self, source: Option<&str>) -> Option<String> {
        match source {
            None | Some("") => None,
            Some(text) => Some(self.filler(text.split_whitespace().count())),
        }
    }
}

/// Replacement values for one comment; a `None` field stays as stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentUpdate {
    pub id: i32,
    pub reviewed_answer: Option<String>,
    pub original_answer: Option<String>,
}

/// Computes replacements, leaving out comments with nothing to replace
pub fn plan_comment_substitutions(comments: &[Comment], corpus: &FillerCorpus) -> Vec<CommentUpdate> {
    comments
        .iter()
        .filter_map(|comment| {
            let reviewed_answer = corpus.substitute(comment.reviewed_answer.as_deref());
            let original_answer = corpus.substitute(comment.original_answer.as_deref());
            if reviewed_answer.is_none() && original_answer.is_none() {
                return None;
            }
            Some(CommentUpdate {
                id: comment.id,
                reviewed_answer,
                original_answer,
            })
        })
        .collect()
}

/// Writes the replacements in one transaction
///
/// Returns the number of fields replaced.
pub async fn apply_comment_updates<S>(store: &mut S, updates: &[CommentUpdate]) -> Result<u64>
where
    S: DatasetStore + ?Sized,
{
    if updates.is_empty() {
        return Ok(0);
    }

    store.begin().await?;
    let outcome = write_all(store, updates).await;
    staging::finish(store, "comments", outcome).await
}

async fn write_all<S>(store: &mut S, updates: &[CommentUpdate]) -> Result<u64>
where
    S: DatasetStore + ?Sized,
{
    let mut fields = 0u64;
    for update in updates {
        let affected = store
            .update_comment(
                update.id,
                update.reviewed_answer.as_deref(),
                update.original_answer.as_deref(),
            )
            .await?;
        staging::expect_rows(&format!("update comment {}", update.id), 1, affected)?;
        fields += u64::from(update.reviewed_answer.is_some())
            + u64::from(update.original_answer.is_some());
    }
    Ok(fields)
}
