//! SQL text for the configured tables
//!
//! Table names come from configuration and cannot be bound as parameters, so
//! they are interpolated here once. [`crate::config::schema::is_valid_table_name`]
//! has already restricted them to plain identifiers.

use crate::config::TableConfig;

/// Prepared SQL text for one run
#[derive(Debug, Clone)]
pub struct Statements {
    pub select_users: String,
    pub update_user: String,
    pub strip_username_marker: String,
    pub select_courses: String,
    pub update_course: String,
    pub strip_course_marker: String,
    pub select_comments: String,
    pub update_comment: String,
}

impl Statements {
    /// Builds the statements for the given tables
    pub fn new(tables: &TableConfig) -> Self {
        let users = &tables.users;
        let courses = &tables.courses;
        let comments = &tables.comments;

        Self {
            select_users: format!("SELECT username, email FROM {users} ORDER BY username"),
            update_user: format!(
                "UPDATE {users} SET username = $1, first_name = $2, last_name = $3, email = $4 \
                 WHERE username = $5"
            ),
            // $1 marked usernames, $2 marker length, $3 marker
            strip_username_marker: format!(
                "UPDATE {users} SET username = left(username, -$2::int4) \
                 WHERE username = ANY($1) AND right(username, $2::int4) = $3"
            ),
            select_courses: format!(
                "SELECT id, semester, degree, name_de, name_en FROM {courses} ORDER BY id"
            ),
            update_course: format!(
                "UPDATE {courses} SET semester = $1, degree = $2, name_de = $3, name_en = $4 \
                 WHERE id = $5"
            ),
            // $1 staged ids, $2 marker length, $3 marker
            strip_course_marker: format!(
                "UPDATE {courses} SET name_de = left(name_de, -$2::int4), name_en = left(name_en, -$2::int4) \
                 WHERE id = ANY($1) AND right(name_de, $2::int4) = $3 AND right(name_en, $2::int4) = $3"
            ),
            select_comments: format!(
                "SELECT id, reviewed_answer, original_answer FROM {comments} ORDER BY id"
            ),
            update_comment: format!(
                "UPDATE {comments} SET reviewed_answer = COALESCE($1, reviewed_answer), \
                 original_answer = COALESCE($2, original_answer) WHERE id = $3"
            ),
        }
    }
}
