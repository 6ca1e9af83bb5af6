//! Shared fixtures for integration tests
//!
//! [`MemoryStore`] behaves like the PostgreSQL tables as far as the
//! anonymization cares: usernames and both course names are unique and checked
//! on every statement, and a rollback restores the state captured by `begin`.

#![allow(dead_code)]

use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use veil::adapters::database::{DatasetStore, UserWrite};
use veil::anonymization::config::{AuditConfig, IdentityConfig, InputFiles};
use veil::anonymization::AnonymizationConfig;
use veil::domain::{Comment, Course, CourseFields, Result, User, VeilError};

pub const STAFF_DOMAIN: &str = "uni.example";
pub const STUDENT_DOMAIN: &str = "student.uni.example";
pub const EXTERNAL_DOMAIN: &str = "guest.example";

/// A user row with the name columns the anonymization writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl UserRow {
    pub fn new(username: &str, email: &str) -> Self {
        Self {
            username: username.to_string(),
            first_name: String::new(),
            last_name: String::new(),
            email: email.to_string(),
        }
    }
}

/// Statement that should fail when reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    /// The n-th user update (0-based)
    UpdateUser(usize),
    /// The n-th course update (0-based)
    UpdateCourse(usize),
    /// The n-th comment update (0-based)
    UpdateComment(usize),
    StripUsernames,
    StripCourses,
}

#[derive(Debug, Clone, Default)]
struct Tables {
    users: Vec<UserRow>,
    courses: Vec<Course>,
    comments: Vec<Comment>,
}

/// In-memory [`DatasetStore`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Tables,
    snapshot: Option<Tables>,
    fail_at: Option<FailPoint>,
    user_updates: usize,
    course_updates: usize,
    comment_updates: usize,
    pub statements: usize,
    pub commits: usize,
    pub rollbacks: usize,
}

impl MemoryStore {
    pub fn new(users: Vec<UserRow>, courses: Vec<Course>, comments: Vec<Comment>) -> Self {
        Self {
            tables: Tables {
                users,
                courses,
                comments,
            },
            ..Self::default()
        }
    }

    pub fn failing_at(mut self, point: FailPoint) -> Self {
        self.fail_at = Some(point);
        self
    }

    pub fn users(&self) -> &[UserRow] {
        &self.tables.users
    }

    pub fn user(&self, username: &str) -> Option<&UserRow> {
        self.tables.users.iter().find(|u| u.username == username)
    }

    pub fn courses(&self) -> &[Course] {
        &self.tables.courses
    }

    pub fn course(&self, id: i32) -> Option<&Course> {
        self.tables.courses.iter().find(|c| c.id == id)
    }

    pub fn comments(&self) -> &[Comment] {
        &self.tables.comments
    }

    pub fn in_transaction(&self) -> bool {
        self.snapshot.is_some()
    }

    fn check_fail(&self, point: FailPoint) -> Result<()> {
        if self.fail_at == Some(point) {
            return Err(VeilError::Database(format!("injected failure at {point:?}")));
        }
        Ok(())
    }

    fn username_taken(&self, username: &str, except: usize) -> bool {
        self.tables
            .users
            .iter()
            .enumerate()
            .any(|(i, u)| i != except && u.username == username)
    }

    fn course_name_taken(&self, fields: &CourseFields, except: usize) -> Option<&'static str> {
        for (i, course) in self.tables.courses.iter().enumerate() {
            if i == except {
                continue;
            }
            if course.fields.name_de == fields.name_de {
                return Some("name_de");
            }
            if course.fields.name_en == fields.name_en {
                return Some("name_en");
            }
        }
        None
    }
}

#[async_trait]
impl DatasetStore for MemoryStore {
    fn store_name(&self) -> &str {
        "memory"
    }

    async fn fetch_users(&mut self) -> Result<Vec<User>> {
        self.statements += 1;
        let mut users: Vec<User> = self
            .tables
            .users
            .iter()
            .map(|u| User::new(u.username.clone(), u.email.clone()))
            .collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn update_user(&mut self, original_username: &str, write: &UserWrite) -> Result<u64> {
        self.statements += 1;
        let call = self.user_updates;
        self.user_updates += 1;
        self.check_fail(FailPoint::UpdateUser(call))?;

        let Some(index) = self
            .tables
            .users
            .iter()
            .position(|u| u.username == original_username)
        else {
            return Ok(0);
        };
        if self.username_taken(&write.username, index) {
            return Err(VeilError::Database(format!(
                "duplicate key value violates unique constraint: username={}",
                write.username
            )));
        }

        let row = &mut self.tables.users[index];
        row.username = write.username.clone();
        row.first_name = write.first_name.clone();
        row.last_name = write.last_name.clone();
        row.email = write.email.clone();
        Ok(1)
    }

    async fn strip_username_marker(&mut self, usernames: &[String], marker: &str) -> Result<u64> {
        self.statements += 1;
        self.check_fail(FailPoint::StripUsernames)?;

        let mut stripped = 0;
        for index in 0..self.tables.users.len() {
            let current = self.tables.users[index].username.clone();
            if !usernames.contains(&current) {
                continue;
            }
            let Some(target) = current.strip_suffix(marker) else {
                continue;
            };
            if self.username_taken(target, index) {
                return Err(VeilError::Database(format!(
                    "duplicate key value violates unique constraint: username={target}"
                )));
            }
            self.tables.users[index].username = target.to_string();
            stripped += 1;
        }
        Ok(stripped)
    }

    async fn fetch_courses(&mut self) -> Result<Vec<Course>> {
        self.statements += 1;
        let mut courses = self.tables.courses.clone();
        courses.sort_by_key(|c| c.id);
        Ok(courses)
    }

    async fn update_course(&mut self, id: i32, fields: &CourseFields) -> Result<u64> {
        self.statements += 1;
        let call = self.course_updates;
        self.course_updates += 1;
        self.check_fail(FailPoint::UpdateCourse(call))?;

        let Some(index) = self.tables.courses.iter().position(|c| c.id == id) else {
            return Ok(0);
        };
        if let Some(column) = self.course_name_taken(fields, index) {
            return Err(VeilError::Database(format!(
                "duplicate key value violates unique constraint: {column}"
            )));
        }
        self.tables.courses[index].fields = fields.clone();
        Ok(1)
    }

    async fn strip_course_marker(&mut self, ids: &[i32], marker: &str) -> Result<u64> {
        self.statements += 1;
        self.check_fail(FailPoint::StripCourses)?;

        let mut stripped = 0;
        for index in 0..self.tables.courses.len() {
            let course = &self.tables.courses[index];
            if !ids.contains(&course.id) {
                continue;
            }
            let (Some(de), Some(en)) = (
                course.fields.name_de.strip_suffix(marker),
                course.fields.name_en.strip_suffix(marker),
            ) else {
                continue;
            };
            let fields = CourseFields {
                name_de: de.to_string(),
                name_en: en.to_string(),
                ..course.fields.clone()
            };
            if let Some(column) = self.course_name_taken(&fields, index) {
                return Err(VeilError::Database(format!(
                    "duplicate key value violates unique constraint: {column}"
                )));
            }
            self.tables.courses[index].fields = fields;
            stripped += 1;
        }
        Ok(stripped)
    }

    async fn fetch_comments(&mut self) -> Result<Vec<Comment>> {
        self.statements += 1;
        let mut comments = self.tables.comments.clone();
        comments.sort_by_key(|c| c.id);
        Ok(comments)
    }

    async fn update_comment(
        &mut self,
        id: i32,
        reviewed_answer: Option<&str>,
        original_answer: Option<&str>,
    ) -> Result<u64> {
        self.statements += 1;
        let call = self.comment_updates;
        self.comment_updates += 1;
        self.check_fail(FailPoint::UpdateComment(call))?;

        let Some(comment) = self.tables.comments.iter_mut().find(|c| c.id == id) else {
            return Ok(0);
        };
        if let Some(text) = reviewed_answer {
            comment.reviewed_answer = Some(text.to_string());
        }
        if let Some(text) = original_answer {
            comment.original_answer = Some(text.to_string());
        }
        Ok(1)
    }

    async fn begin(&mut self) -> Result<()> {
        if self.snapshot.is_some() {
            return Err(VeilError::Database("transaction already open".to_string()));
        }
        self.snapshot = Some(self.tables.clone());
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        if self.snapshot.take().is_none() {
            return Err(VeilError::Database("no transaction to commit".to_string()));
        }
        self.commits += 1;
        Ok(())
    }

    async fn rollback(&mut self) -> Result<()> {
        let snapshot = self
            .snapshot
            .take()
            .ok_or_else(|| VeilError::Database("no transaction to roll back".to_string()))?;
        self.tables = snapshot;
        self.rollbacks += 1;
        Ok(())
    }
}

/// Input files and audit destinations inside a temporary directory
pub struct Workspace {
    pub root: PathBuf,
}

impl Workspace {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.root.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.root.join(name)).unwrap()
    }

    pub fn audit_users(&self) -> PathBuf {
        self.root.join("audit").join("users.txt")
    }

    pub fn audit_courses(&self) -> PathBuf {
        self.root.join("audit").join("courses.txt")
    }

    /// Writes the four input files and returns a matching configuration
    pub fn anonymization_config(
        &self,
        first_names: &str,
        last_names: &str,
        ignores: &str,
        lorem_ipsum: &str,
        pool_size: usize,
    ) -> AnonymizationConfig {
        AnonymizationConfig {
            seed: None,
            inputs: InputFiles {
                first_names: self.write("first_names.txt", first_names),
                last_names: self.write("last_names.txt", last_names),
                ignores: self.write("ignore.txt", ignores),
                lorem_ipsum: self.write("lorem_ipsum.txt", lorem_ipsum),
            },
            identity: IdentityConfig {
                pool_size,
                staff_domain: STAFF_DOMAIN.to_string(),
                student_domain: STUDENT_DOMAIN.to_string(),
                external_domain: EXTERNAL_DOMAIN.to_string(),
                external_suffix: "ext".to_string(),
            },
            audit: AuditConfig {
                users: self.audit_users(),
                courses: self.audit_courses(),
            },
        }
    }
}

/// Four users: staff, student, external and one on the ignore list
pub fn sample_users() -> Vec<UserRow> {
    vec![
        UserRow::new("alan.turing", "alan.turing@uni.example"),
        UserRow::new("jdoe", "jdoe@uni.example"),
        UserRow::new("jane.doe", "jane.doe@student.uni.example"),
        UserRow::new("zguest", "zguest@partner.org"),
    ]
}

pub fn sample_courses() -> Vec<Course> {
    vec![
        Course::new(1, 3, "BA-IT", "Mathematik I", "Mathematics I"),
        Course::new(2, 3, "MA-IT", "Datenbanken", "Databases"),
        Course::new(3, 4, "BA-IT", "Betriebssysteme", "Operating Systems"),
    ]
}

pub fn sample_comments() -> Vec<Comment> {
    vec![
        Comment::new(1, Some("very clear slides"), Some("very clear slides!!")),
        Comment::new(2, None, Some("yes it works really great")),
        Comment::new(3, None, None),
        Comment::new(4, Some(""), None),
    ]
}

pub const FIRST_NAMES: &str = "Ada\nGrace\n";
pub const LAST_NAMES: &str = "Lovelace\nHopper\n";
pub const IGNORES: &str = "alan.turing\n";
pub const LOREM: &str = "lorem ipsum dolor sit\n";
