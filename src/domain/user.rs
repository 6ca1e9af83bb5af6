//! Real user accounts and their role classification

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a user, derived from the email address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Institution staff member
    Staff,
    /// Enrolled student
    Student,
    /// Anyone else (guest lecturers, external reviewers)
    External,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Staff => write!(f, "staff"),
            Role::Student => write!(f, "student"),
            Role::External => write!(f, "external"),
        }
    }
}

/// A user account as read from the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Login name, the key used for updates
    pub username: String,

    /// Email address, empty when the store holds NULL
    pub email: String,
}

impl User {
    /// Creates a user record
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
        }
    }

    /// Whether the email belongs to the staff domain
    pub fn is_staff(&self, staff_domain: &str) -> bool {
        self.email.contains(&format!("@{staff_domain}"))
    }

    /// Whether the email belongs to the student domain
    pub fn is_student(&self, student_domain: &str) -> bool {
        self.email.contains(&format!("@{student_domain}"))
    }

    /// Classifies the user; staff takes precedence over student
    ///
    /// # Examples
    ///
    /// ```
    /// use veil::domain::{Role, User};
    ///
    /// let user = User::new("jane.doe", "jane.doe@student.example.edu");
    /// assert_eq!(user.role("example.edu", "student.example.edu"), Role::Student);
    /// ```
    pub fn role(&self, staff_domain: &str, student_domain: &str) -> Role {
        if self.is_staff(staff_domain) {
            Role::Staff
        } else if self.is_student(student_domain) {
            Role::Student
        } else {
            Role::External
        }
    }
}
