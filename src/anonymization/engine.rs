//! Anonymization engine
//!
//! [`AnonymizationEngine`] runs the three steps in a fixed order, each one
//! finishing all of its writes before the next begins:
//!
//! 1. **Users**: identities replaced from a freshly generated person pool
//! 2. **Courses**: descriptions permuted among course ids
//! 3. **Comments**: free text replaced by filler with the same word count
//!
//! All input files are read in [`AnonymizationEngine::new`], so a missing or
//! malformed input fails the run before the first statement is sent.
//!
//! # Examples
//!
//! ```no_run
//! use veil::anonymization::{AnonymizationEngine, engine::rng_from_seed};
//! use veil::adapters::postgresql::{PostgreSQLAdapter, PostgreSQLClient};
//! use veil::config::load_config;
//!
//! # async fn example() -> veil::domain::Result<()> {
//! let config = load_config("veil.toml")?;
//! let engine = AnonymizationEngine::new(config.anonymization.clone())?;
//!
//! let client = PostgreSQLClient::new(config.database.clone())?;
//! let mut store = PostgreSQLAdapter::connect(&client, &config.tables).await?;
//! let mut rng = rng_from_seed(config.anonymization.seed);
//!
//! let summary = engine.run(&mut store, &mut rng, false).await?;
//! println!("{summary}");
//! # Ok(())
//! # }
//! ```

use crate::adapters::database::DatasetStore;
use crate::adapters::files;
use crate::anonymization::comments::{apply_comment_updates, plan_comment_substitutions, FillerCorpus};
use crate::anonymization::config::AnonymizationConfig;
use crate::anonymization::courses::{
    apply_course_permutation, course_audit, ensure_stageable, plan_course_permutation,
};
use crate::anonymization::identity::{IgnoreList, PersonPool};
use crate::anonymization::report::RunSummary;
use crate::anonymization::users::{apply_user_plan, plan_user_substitutions};
use crate::domain::{Result, VeilError};
use crate::{log_step_complete, log_step_start};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

/// Random generator for a run: seeded when a seed is given, from entropy otherwise
pub fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            tracing::info!(seed, "Using seeded random generator");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    }
}

/// Orchestrates one anonymization run
pub struct AnonymizationEngine {
    config: AnonymizationConfig,
    first_names: Vec<String>,
    last_names: Vec<String>,
    ignore: IgnoreList,
    corpus: FillerCorpus,
}

impl AnonymizationEngine {
    /// Validates the configuration and loads every input file
    ///
    /// # Errors
    ///
    /// Returns [`VeilError::Configuration`] for an invalid section and
    /// [`VeilError::Input`] for unreadable or empty input files.
    pub fn new(config: AnonymizationConfig) -> Result<Self> {
        config.validate().map_err(|e| {
            VeilError::Configuration(format!("Invalid anonymization configuration: {e}"))
        })?;

        let inputs = &config.inputs;
        let first_names = files::read_list(&inputs.first_names, "first names")?;
        let last_names = files::read_list(&inputs.last_names, "last names")?;
        let ignore = IgnoreList::new(files::read_list(&inputs.ignores, "ignore list")?);
        let corpus = FillerCorpus::new(files::read_corpus(&inputs.lorem_ipsum)?)?;

        if first_names.is_empty() {
            return Err(VeilError::Input(format!(
                "First name list {} is empty",
                inputs.first_names.display()
            )));
        }
        if last_names.is_empty() {
            return Err(VeilError::Input(format!(
                "Last name list {} is empty",
                inputs.last_names.display()
            )));
        }

        tracing::info!(
            first_names = first_names.len(),
            last_names = last_names.len(),
            ignored = ignore.len(),
            corpus_words = corpus.len(),
            "Anonymization inputs loaded"
        );

        Ok(Self {
            config,
            first_names,
            last_names,
            ignore,
            corpus,
        })
    }

    pub fn config(&self) -> &AnonymizationConfig {
        &self.config
    }

    /// Runs users, courses and comments in that order
    ///
    /// With `dry_run`, every plan is computed and the audit files are written,
    /// but no statement modifies the store.
    ///
    /// # Errors
    ///
    /// The first failing step aborts the run. Steps already committed stay
    /// committed; the failing step's transaction is rolled back.
    pub async fn run<S, R>(&self, store: &mut S, rng: &mut R, dry_run: bool) -> Result<RunSummary>
    where
        S: DatasetStore + ?Sized,
        R: Rng + ?Sized,
    {
        let started = Instant::now();
        let mut summary = RunSummary::start(dry_run);

        tracing::info!(
            run_id = %summary.run_id,
            store = store.store_name(),
            dry_run,
            "Anonymization run started"
        );

        self.anonymize_users(store, rng, dry_run, &mut summary)
            .await?;
        self.permute_courses(store, rng, dry_run, &mut summary)
            .await?;
        self.replace_comments(store, dry_run, &mut summary).await?;

        summary.finish(started.elapsed());
        Ok(summary)
    }

    async fn anonymize_users<S, R>(
        &self,
        store: &mut S,
        rng: &mut R,
        dry_run: bool,
        summary: &mut RunSummary,
    ) -> Result<()>
    where
        S: DatasetStore + ?Sized,
        R: Rng + ?Sized,
    {
        let started = Instant::now();
        let users = store.fetch_users().await?;
        summary.users_read = users.len();
        log_step_start!("users", users.len());

        let identity = &self.config.identity;
        let pool = PersonPool::generate(&self.first_names, &self.last_names, identity.pool_size, rng)?;
        pool.warn_if_sparse(users.len());

        let plan = plan_user_substitutions(&users, &pool, &self.ignore, identity)?;
        summary.users_ignored = plan.ignored.len();
        if plan.skipped_empty > 0 {
            tracing::warn!(rows = plan.skipped_empty, "Users with empty username skipped");
        }

        plan.ensure_stageable()?;
        plan.audit().write(&self.config.audit.users)?;

        let written = if dry_run {
            tracing::info!(planned = plan.updates.len(), "DRY RUN: users not written");
            plan.updates.len() as u64
        } else {
            apply_user_plan(store, &plan).await?
        };
        summary.users_substituted = plan.updates.len();

        log_step_complete!("users", written, started.elapsed());
        Ok(())
    }

    async fn permute_courses<S, R>(
        &self,
        store: &mut S,
        rng: &mut R,
        dry_run: bool,
        summary: &mut RunSummary,
    ) -> Result<()>
    where
        S: DatasetStore + ?Sized,
        R: Rng + ?Sized,
    {
        let started = Instant::now();
        let courses = store.fetch_courses().await?;
        log_step_start!("courses", courses.len());

        let assignments = plan_course_permutation(&courses, rng);
        ensure_stageable(&assignments)?;
        course_audit(&assignments).write(&self.config.audit.courses)?;

        let written = if dry_run {
            tracing::info!(planned = assignments.len(), "DRY RUN: courses not written");
            assignments.len() as u64
        } else {
            apply_course_permutation(store, &assignments).await?
        };
        summary.courses_permuted = assignments.len();

        log_step_complete!("courses", written, started.elapsed());
        Ok(())
    }

    async fn replace_comments<S>(
        &self,
        store: &mut S,
        dry_run: bool,
        summary: &mut RunSummary,
    ) -> Result<()>
    where
        S: DatasetStore + ?Sized,
    {
        let started = Instant::now();
        let comments = store.fetch_comments().await?;
        summary.comments_read = comments.len();
        log_step_start!("comments", comments.len());

        let updates = plan_comment_substitutions(&comments, &self.corpus);
        let fields: usize = updates
            .iter()
            .map(|u| usize::from(u.reviewed_answer.is_some()) + usize::from(u.original_answer.is_some()))
            .sum();

        let written = if dry_run {
            tracing::info!(planned = fields, "DRY RUN: comments not written");
            fields as u64
        } else {
            apply_comment_updates(store, &updates).await?
        };
        summary.comment_fields_replaced = fields;

        log_step_complete!("comments", written, started.elapsed());
        Ok(())
    }
}
