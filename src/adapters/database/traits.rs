//! Dataset store abstraction
//!
//! The anonymization modules talk to the dataset through [`DatasetStore`],
//! which keeps SQL out of the substitution logic and lets the integration
//! tests run against an in-memory store.

use crate::domain::{Comment, Course, CourseFields, Result, User};
use async_trait::async_trait;

/// Row written back for one substituted user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWrite {
    /// New username, possibly carrying the staging marker
    pub username: String,

    /// Synthetic first name
    pub first_name: String,

    /// Synthetic last name
    pub last_name: String,

    /// Synthetic email address
    pub email: String,
}

/// A session on the dataset copy being anonymized
///
/// A store represents one connection. Statements issued between [`begin`] and
/// [`commit`] belong to a single transaction, and [`rollback`] discards them.
///
/// Every `update_*` method returns the number of affected rows.
///
/// [`begin`]: DatasetStore::begin
/// [`commit`]: DatasetStore::commit
/// [`rollback`]: DatasetStore::rollback
#[async_trait]
pub trait DatasetStore: Send {
    /// Name of the backend, used in log lines
    fn store_name(&self) -> &str;

    /// Reads `username, email` of every user, in store order
    async fn fetch_users(&mut self) -> Result<Vec<User>>;

    /// Overwrites the identity fields of the user currently named `original_username`
    async fn update_user(&mut self, original_username: &str, write: &UserWrite) -> Result<u64>;

    /// Removes `marker` from the end of each listed username, in one statement
    async fn strip_username_marker(&mut self, usernames: &[String], marker: &str) -> Result<u64>;

    /// Reads every course, in store order
    async fn fetch_courses(&mut self) -> Result<Vec<Course>>;

    /// Overwrites the non-id fields of course `id`
    async fn update_course(&mut self, id: i32, fields: &CourseFields) -> Result<u64>;

    /// Removes `marker` from the end of both name columns of the listed courses, in one statement
    async fn strip_course_marker(&mut self, ids: &[i32], marker: &str) -> Result<u64>;

    /// Reads every text answer, in store order
    async fn fetch_comments(&mut self) -> Result<Vec<Comment>>;

    /// Overwrites the given answer fields of comment `id`; a `None` keeps the stored value
    async fn update_comment(
        &mut self,
        id: i32,
        reviewed_answer: Option<&str>,
        original_answer: Option<&str>,
    ) -> Result<u64>;

    /// Opens a transaction
    async fn begin(&mut self) -> Result<()>;

    /// Commits the open transaction
    async fn commit(&mut self) -> Result<()>;

    /// Rolls back the open transaction
    async fn rollback(&mut self) -> Result<()>;
}
