//! PostgreSQL implementation of [`DatasetStore`]

use crate::adapters::database::traits::{DatasetStore, UserWrite};
use crate::adapters::postgresql::client::PostgreSQLClient;
use crate::adapters::postgresql::statements::Statements;
use crate::config::TableConfig;
use crate::domain::{Comment, Course, CourseFields, Result, User, VeilError};
use async_trait::async_trait;
use tokio_postgres::Row;

/// Dataset store over a single pooled PostgreSQL session
pub struct PostgreSQLAdapter {
    session: deadpool_postgres::Object,
    statements: Statements,
    in_transaction: bool,
}

impl PostgreSQLAdapter {
    /// Opens the session used for the whole run
    ///
    /// # Errors
    ///
    /// Returns [`VeilError::Connection`] if no session can be obtained.
    pub async fn connect(client: &PostgreSQLClient, tables: &TableConfig) -> Result<Self> {
        let session = client.session().await?;
        Ok(Self {
            session,
            statements: Statements::new(tables),
            in_transaction: false,
        })
    }

    async fn query(
        &self,
        context: &str,
        sql: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<Vec<Row>> {
        self.session
            .query(sql, params)
            .await
            .map_err(|e| statement_error(context, e))
    }

    async fn execute(
        &self,
        context: &str,
        sql: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> Result<u64> {
        self.session
            .execute(sql, params)
            .await
            .map_err(|e| statement_error(context, e))
    }
}

fn statement_error(context: &str, err: tokio_postgres::Error) -> VeilError {
    if err.is_closed() {
        VeilError::Connection(format!("{context}: connection closed: {err}"))
    } else {
        VeilError::Database(format!("{context}: {err}"))
    }
}

fn marker_len(marker: &str) -> Result<i32> {
    i32::try_from(marker.chars().count())
        .map_err(|_| VeilError::Validation("staging marker is too long".to_string()))
}

fn user_from_row(row: &Row) -> Result<User> {
    let username: Option<String> = row
        .try_get("username")
        .map_err(|e| VeilError::Database(format!("Failed to read username: {e}")))?;
    let email: Option<String> = row
        .try_get("email")
        .map_err(|e| VeilError::Database(format!("Failed to read email: {e}")))?;

    Ok(User::new(
        username.unwrap_or_default(),
        email.unwrap_or_default(),
    ))
}

fn course_from_row(row: &Row) -> Result<Course> {
    let id: i32 = row
        .try_get("id")
        .map_err(|e| VeilError::Database(format!("Failed to read course id: {e}")))?;
    let column = |name: &str| -> Result<String> {
        row.try_get::<_, Option<String>>(name)
            .map_err(|e| VeilError::Database(format!("Failed to read course {id} {name}: {e}")))?
            .ok_or_else(|| VeilError::Database(format!("Course {id} has NULL {name}")))
    };
    let semester: i32 = row
        .try_get("semester")
        .map_err(|e| VeilError::Database(format!("Failed to read course {id} semester: {e}")))?;

    Ok(Course::new(
        id,
        semester,
        column("degree")?,
        column("name_de")?,
        column("name_en")?,
    ))
}

fn comment_from_row(row: &Row) -> Result<Comment> {
    let id: i32 = row
        .try_get("id")
        .map_err(|e| VeilError::Database(format!("Failed to read comment id: {e}")))?;
    let text = |name: &str| -> Result<Option<String>> {
        row.try_get(name)
            .map_err(|e| VeilError::Database(format!("Failed to read comment {id} {name}: {e}")))
    };

    Ok(Comment {
        id,
        reviewed_answer: text("reviewed_answer")?,
        original_answer: text("original_answer")?,
    })
}

#[async_trait]
impl DatasetStore for PostgreSQLAdapter {
    fn store_name(&self) -> &str {
        "postgresql"
    }

    async fn fetch_users(&mut self) -> Result<Vec<User>> {
        let rows = self
            .query("Failed to read users", &self.statements.select_users, &[])
            .await?;
        let users = rows.iter().map(user_from_row).collect::<Result<Vec<_>>>()?;
        tracing::debug!(count = users.len(), "Users read from PostgreSQL");
        Ok(users)
    }

    async fn update_user(&mut self, original_username: &str, write: &UserWrite) -> Result<u64> {
        self.execute(
            "Failed to update user",
            &self.statements.update_user,
            &[
                &write.username,
                &write.first_name,
                &write.last_name,
                &write.email,
                &original_username,
            ],
        )
        .await
    }

    async fn strip_username_marker(&mut self, usernames: &[String], marker: &str) -> Result<u64> {
        let len = marker_len(marker)?;
        self.execute(
            "Failed to strip username marker",
            &self.statements.strip_username_marker,
            &[&usernames, &len, &marker],
        )
        .await
    }

    async fn fetch_courses(&mut self) -> Result<Vec<Course>> {
        let rows = self
            .query("Failed to read courses", &self.statements.select_courses, &[])
            .await?;
        let courses = rows
            .iter()
            .map(course_from_row)
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(count = courses.len(), "Courses read from PostgreSQL");
        Ok(courses)
    }

    async fn update_course(&mut self, id: i32, fields: &CourseFields) -> Result<u64> {
        self.execute(
            "Failed to update course",
            &self.statements.update_course,
            &[
                &fields.semester,
                &fields.degree,
                &fields.name_de,
                &fields.name_en,
                &id,
            ],
        )
        .await
    }

    async fn strip_course_marker(&mut self, ids: &[i32], marker: &str) -> Result<u64> {
        let len = marker_len(marker)?;
        self.execute(
            "Failed to strip course marker",
            &self.statements.strip_course_marker,
            &[&ids, &len, &marker],
        )
        .await
    }

    async fn fetch_comments(&mut self) -> Result<Vec<Comment>> {
        let rows = self
            .query("Failed to read comments", &self.statements.select_comments, &[])
            .await?;
        let comments = rows
            .iter()
            .map(comment_from_row)
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(count = comments.len(), "Comments read from PostgreSQL");
        Ok(comments)
    }

    async fn update_comment(
        &mut self,
        id: i32,
        reviewed_answer: Option<&str>,
        original_answer: Option<&str>,
    ) -> Result<u64> {
        self.execute(
            "Failed to update comment",
            &self.statements.update_comment,
            &[&reviewed_answer, &original_answer, &id],
        )
        .await
    }

    async fn begin(&mut self) -> Result<()> {
        if self.in_transaction {
            return Err(VeilError::Database(
                "Transaction already open on this session".to_string(),
            ));
        }
        self.session
            .batch_execute("BEGIN")
            .await
            .map_err(|e| statement_error("Failed to begin transaction", e))?;
        self.in_transaction = true;
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        self.in_transaction = false;
        self.session
            .batch_execute("COMMIT")
            .await
            .map_err(|e| statement_error("Failed to commit transaction", e))
    }

    async fn rollback(&mut self) -> Result<()> {
        self.in_transaction = false;
        self.session
            .batch_execute("ROLLBACK")
            .await
            .map_err(|e| statement_error("Failed to roll back transaction", e))
    }
}
