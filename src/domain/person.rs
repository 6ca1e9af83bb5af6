//! Synthetic identities
//!
//! A [`Person`] is a fictitious first/last name pair. Everything else about it
//! (username, suffixed username, email addresses) is derived on read, so a
//! person can never carry a username that disagrees with its names.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A fictitious person drawn from the name lists
///
/// Two persons are equal when their derived usernames are equal, regardless of
/// the capitalisation of the names they were built from.
#[derive(Debug, Clone)]
pub struct Person {
    first_name: String,
    last_name: String,
}

impl Person {
    /// Creates a person from a first and a last name
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }

    /// First name as drawn from the list
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Last name as drawn from the list
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Internal username: `firstname.lastname`, lower-cased
    ///
    /// # Examples
    ///
    /// ```
    /// use veil::domain::Person;
    ///
    /// let person = Person::new("Ada", "Lovelace");
    /// assert_eq!(person.username(), "ada.lovelace");
    /// ```
    pub fn username(&self) -> String {
        format!(
            "{}.{}",
            self.first_name.to_lowercase(),
            self.last_name.to_lowercase()
        )
    }

    /// Username for external accounts: `firstname.lastname.<suffix>`
    pub fn external_username(&self, suffix: &str) -> String {
        format!("{}.{}", self.username(), suffix)
    }

    /// Email address at the given domain, built from the internal username
    pub fn email(&self, domain: &str) -> String {
        format!("{}@{}", self.username(), domain)
    }
}

impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.username() == other.username()
    }
}

impl Eq for Person {}

impl Hash for Person {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.username().hash(state);
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.first_name, self.last_name)
    }
}
