//! Synthetic identity pool and ignore list

use crate::domain::{Person, Result, VeilError};
use rand::Rng;
use std::collections::HashSet;

/// Draw attempts allowed per requested person before generation gives up
pub const MAX_DRAWS_PER_PERSON: usize = 1000;

/// Headroom the name lists should leave over the number of users
const SPARSE_RATIO: f64 = 1.5;

/// Unique synthetic persons, in generation order
#[derive(Debug, Clone)]
pub struct PersonPool {
    persons: Vec<Person>,
    combinations: usize,
}

impl PersonPool {
    /// Draws `size` persons with pairwise distinct usernames
    ///
    /// Each candidate takes a uniformly random first name and an independent
    /// uniformly random last name. Candidates whose username is already in the
    /// pool are discarded.
    ///
    /// # Errors
    ///
    /// Returns [`VeilError::Validation`] when a name list is empty, when the
    /// lists cannot produce `size` distinct usernames, or when the draw budget
    /// of [`MAX_DRAWS_PER_PERSON`] per person runs out.
    pub fn generate<R: Rng + ?Sized>(
        first_names: &[String],
        last_names: &[String],
        size: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if first_names.is_empty() {
            return Err(VeilError::Validation(
                "first name list is empty".to_string(),
            ));
        }
        if last_names.is_empty() {
            return Err(VeilError::Validation("last name list is empty".to_string()));
        }

        let combinations = distinct_lowercase(first_names) * distinct_lowercase(last_names);
        if combinations < size {
            return Err(VeilError::Validation(format!(
                "name lists allow {combinations} distinct usernames, {size} requested"
            )));
        }

        let budget = size.saturating_mul(MAX_DRAWS_PER_PERSON);
        let mut usernames = HashSet::with_capacity(size);
        let mut persons = Vec::with_capacity(size);
        let mut draws = 0usize;

        while persons.len() < size {
            if draws == budget {
                return Err(VeilError::Validation(format!(
                    "gave up after {draws} draws with {} of {size} unique persons",
                    persons.len()
                )));
            }
            draws += 1;

            let first = &first_names[rng.gen_range(0..first_names.len())];
            let last = &last_names[rng.gen_range(0..last_names.len())];
            let candidate = Person::new(first.as_str(), last.as_str());

            if usernames.insert(candidate.username()) {
                persons.push(candidate);
            }
        }

        tracing::debug!(size, draws, combinations, "Person pool generated");

        Ok(Self {
            persons,
            combinations,
        })
    }

    /// Warns when the name lists leave little headroom over `user_count`
    ///
    /// Returns whether the warning was emitted.
    pub fn warn_if_sparse(&self, user_count: usize) -> bool {
        let sparse = (self.combinations as f64) < SPARSE_RATIO * user_count as f64;
        if sparse {
            tracing::warn!(
                combinations = self.combinations,
                users = user_count,
                "Few name combinations for the number of users; consider longer name lists"
            );
        }
        sparse
    }

    /// Person at generation position `index`
    pub fn get(&self, index: usize) -> Option<&Person> {
        self.persons.get(index)
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    /// Distinct lowercase first/last combinations the lists allow
    pub fn combinations(&self) -> usize {
        self.combinations
    }

    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.persons.iter()
    }
}

fn distinct_lowercase(names: &[String]) -> usize {
    names
        .iter()
        .map(|name| name.to_lowercase())
        .collect::<HashSet<_>>()
        .len()
}

/// Usernames that keep their real identity, matched case-insensitively
#[derive(Debug, Clone, Default)]
pub struct IgnoreList {
    usernames: HashSet<String>,
}

impl IgnoreList {
    pub fn new<I, S>(usernames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            usernames: usernames
                .into_iter()
                .map(|name| name.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Whether `username` is on the list
    pub fn contains(&self, username: &str) -> bool {
        self.usernames.contains(&username.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.usernames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.usernames.is_empty()
    }
}
