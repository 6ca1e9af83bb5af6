//! Anonymization configuration
//!
//! Everything the substitution modules need besides the database: input file
//! locations, identity rules, audit destinations and the optional RNG seed.

use crate::domain::Role;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Number of synthetic persons generated per run
pub const DEFAULT_POOL_SIZE: usize = 2000;

/// Anonymization settings (`[anonymization]` section)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationConfig {
    /// Seed for the random generator; unset means seeded from entropy
    #[serde(default)]
    pub seed: Option<u64>,

    /// Input file locations
    pub inputs: InputFiles,

    /// Identity generation rules
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Audit output locations
    #[serde(default)]
    pub audit: AuditConfig,
}

impl AnonymizationConfig {
    /// Validates the section
    pub fn validate(&self) -> Result<(), String> {
        self.inputs.validate()?;
        self.identity.validate()?;
        self.audit.validate()?;
        Ok(())
    }
}

/// Input files (`[anonymization.inputs]`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputFiles {
    /// One first name per line
    pub first_names: PathBuf,

    /// One last name per line
    pub last_names: PathBuf,

    /// Usernames that must keep their identity, one per line
    pub ignores: PathBuf,

    /// Single line of filler words
    pub lorem_ipsum: PathBuf,
}

impl InputFiles {
    fn validate(&self) -> Result<(), String> {
        for (key, path) in [
            ("first_names", &self.first_names),
            ("last_names", &self.last_names),
            ("ignores", &self.ignores),
            ("lorem_ipsum", &self.lorem_ipsum),
        ] {
            if path.as_os_str().is_empty() {
                return Err(format!("anonymization.inputs.{key} cannot be empty"));
            }
        }
        Ok(())
    }
}

/// Identity rules (`[anonymization.identity]`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    /// Number of synthetic persons to generate
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,

    /// Email domain of staff accounts
    #[serde(default = "default_staff_domain")]
    pub staff_domain: String,

    /// Email domain of student accounts
    #[serde(default = "default_student_domain")]
    pub student_domain: String,

    /// Email domain given to everyone else
    #[serde(default = "default_external_domain")]
    pub external_domain: String,

    /// Suffix appended to usernames of external accounts
    #[serde(default = "default_external_suffix")]
    pub external_suffix: String,
}

impl IdentityConfig {
    /// Classification domains in the order [`crate::domain::User::role`] expects
    pub fn classify(&self, user: &crate::domain::User) -> Role {
        user.role(&self.staff_domain, &self.student_domain)
    }

    /// Email domain for a role
    pub fn domain_for(&self, role: Role) -> &str {
        match role {
            Role::Staff => &self.staff_domain,
            Role::Student => &self.student_domain,
            Role::External => &self.external_domain,
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.pool_size == 0 {
            return Err("anonymization.identity.pool_size must be > 0".to_string());
        }

        for (key, domain) in [
            ("staff_domain", &self.staff_domain),
            ("student_domain", &self.student_domain),
            ("external_domain", &self.external_domain),
        ] {
            if domain.is_empty() {
                return Err(format!("anonymization.identity.{key} cannot be empty"));
            }
            if domain.contains('@') {
                return Err(format!(
                    "anonymization.identity.{key} must not contain '@', got '{domain}'"
                ));
            }
        }

        if self.external_suffix.is_empty() {
            return Err("anonymization.identity.external_suffix cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            pool_size: default_pool_size(),
            staff_domain: default_staff_domain(),
            student_domain: default_student_domain(),
            external_domain: default_external_domain(),
            external_suffix: default_external_suffix(),
        }
    }
}

/// Audit destinations (`[anonymization.audit]`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Username mapping file
    #[serde(default = "default_users_audit")]
    pub users: PathBuf,

    /// Course id mapping file
    #[serde(default = "default_courses_audit")]
    pub courses: PathBuf,
}

impl AuditConfig {
    fn validate(&self) -> Result<(), String> {
        if self.users == self.courses {
            return Err(format!(
                "anonymization.audit.users and anonymization.audit.courses must differ, both are '{}'",
                self.users.display()
            ));
        }
        Ok(())
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            users: default_users_audit(),
            courses: default_courses_audit(),
        }
    }
}

fn default_pool_size() -> usize {
    DEFAULT_POOL_SIZE
}

fn default_staff_domain() -> String {
    "institution.example.com".to_string()
}

fn default_student_domain() -> String {
    "student.institution.example.com".to_string()
}

fn default_external_domain() -> String {
    "external.example.com".to_string()
}

fn default_external_suffix() -> String {
    "ext".to_string()
}

fn default_users_audit() -> PathBuf {
    PathBuf::from("./audit/users.txt")
}

fn default_courses_audit() -> PathBuf {
    PathBuf::from("./audit/courses.txt")
}
