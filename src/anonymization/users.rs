//! User identity substitution
//!
//! Every user not on the ignore list takes the person at its own read
//! position in the pool. Ignored users keep their real identity and still
//! consume their position, so adding a name to the ignore list never shifts
//! the identities handed to other users.

use crate::adapters::database::{DatasetStore, UserWrite};
use crate::anonymization::audit::AuditLog;
use crate::anonymization::config::IdentityConfig;
use crate::anonymization::identity::{IgnoreList, PersonPool};
use crate::anonymization::staging::{self, staged, STAGING_MARKER};
use crate::domain::{Result, Role, User, VeilError};
use std::collections::HashSet;

/// Planned replacement for one user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserUpdate {
    /// Username the row carries before the run
    pub original_username: String,

    /// Role derived from the original email
    pub role: Role,

    /// Final values, without staging marker
    pub write: UserWrite,
}

/// Outcome of planning the user substitution
#[derive(Debug, Clone, Default)]
pub struct UserPlan {
    /// Users to rewrite, in read order
    pub updates: Vec<UserUpdate>,

    /// Usernames kept because they are on the ignore list
    pub ignored: Vec<String>,

    /// Rows skipped because their username is empty
    pub skipped_empty: usize,
}

impl UserPlan {
    /// Audit mapping: original username to written username
    ///
    /// The written username includes the external suffix (`ada.lovelace.ext`).
    /// Audit files from older tooling list the base username for external users
    /// instead, so compare those without the suffix.
    pub fn audit(&self) -> AuditLog {
        let mut log = AuditLog::new();
        for update in &self.updates {
            log.record(&update.original_username, &update.write.username);
        }
        log
    }

    /// Checks that no current username can collide with a staged username
    ///
    /// Ignored users share the unique index, so their usernames are checked too.
    ///
    /// # Errors
    ///
    /// Returns [`VeilError::Validation`] when a username already ends with the
    /// staging marker.
    pub fn ensure_stageable(&self) -> Result<()> {
        staging::ensure_unmarked(
            "username",
            self.updates
                .iter()
                .map(|u| u.original_username.as_str())
                .chain(self.ignored.iter().map(String::as_str)),
        )
    }
}

/// Maps users to pool persons
///
/// Rows with an empty username are dropped first; positions count only the
/// remaining rows.
///
/// # Errors
///
/// Returns [`VeilError::Validation`] when there are more users than persons in
/// the pool, or when a planned username equals the username of a user that
/// keeps its identity.
pub fn plan_user_substitutions(
    users: &[User],
    pool: &PersonPool,
    ignore: &IgnoreList,
    identity: &IdentityConfig,
) -> Result<UserPlan> {
    let mut plan = UserPlan::default();
    let users: Vec<&User> = users
        .iter()
        .filter(|user| {
            let empty = user.username.is_empty();
            if empty {
                plan.skipped_empty += 1;
            }
            !empty
        })
        .collect();

    if users.len() > pool.len() {
        return Err(VeilError::Validation(format!(
            "{} users but only {} generated persons; raise anonymization.identity.pool_size",
            users.len(),
            pool.len()
        )));
    }

    for (position, user) in users.iter().enumerate() {
        if ignore.contains(&user.username) {
            tracing::debug!(username = %user.username, position, "User ignored");
            plan.ignored.push(user.username.clone());
            continue;
        }

        let person = pool.get(position).ok_or_else(|| {
            VeilError::Validation(format!("no generated person at position {position}"))
        })?;
        let role = identity.classify(user);
        let username = match role {
            Role::External => person.external_username(&identity.external_suffix),
            Role::Staff | Role::Student => person.username(),
        };

        tracing::debug!(
            original = %user.username,
            substitute = %username,
            role = %role,
            "User substitution planned"
        );

        plan.updates.push(UserUpdate {
            original_username: user.username.clone(),
            role,
            write: UserWrite {
                username,
                first_name: person.first_name().to_string(),
                last_name: person.last_name().to_string(),
                email: person.email(identity.domain_for(role)),
            },
        });
    }

    let kept: HashSet<String> = plan.ignored.iter().map(|u| u.to_lowercase()).collect();
    if let Some(clash) = plan
        .updates
        .iter()
        .find(|update| kept.contains(&update.write.username))
    {
        return Err(VeilError::Validation(format!(
            "generated username '{}' equals an ignored user's username",
            clash.write.username
        )));
    }

    Ok(plan)
}

/// Writes the planned identities using the two-phase protocol
///
/// Returns the number of users rewritten.
pub async fn apply_user_plan<S>(store: &mut S, plan: &UserPlan) -> Result<u64>
where
    S: DatasetStore + ?Sized,
{
    if plan.updates.is_empty() {
        return Ok(0);
    }
    plan.ensure_stageable()?;

    store.begin().await?;
    let outcome = write_staged(store, plan).await;
    staging::finish(store, "users", outcome).await
}

async fn write_staged<S>(store: &mut S, plan: &UserPlan) -> Result<u64>
where
    S: DatasetStore + ?Sized,
{
    let mut marked = Vec::with_capacity(plan.updates.len());

    for update in &plan.updates {
        let write = UserWrite {
            username: staged(&update.write.username),
            ..update.write.clone()
        };
        let affected = store.update_user(&update.original_username, &write).await?;
        staging::expect_rows(
            &format!("stage user {}", update.original_username),
            1,
            affected,
        )?;
        marked.push(write.username);
    }

    let expected = marked.len() as u64;
    let stripped = store.strip_username_marker(&marked, STAGING_MARKER).await?;
    staging::expect_rows("strip username marker", expected, stripped)?;

    Ok(expected)
}
