//! End-to-end tests for [`AnonymizationEngine`] against the in-memory store

mod support;

use std::fs;
use support::{FailPoint, MemoryStore, Workspace};
use tempfile::tempdir;
use veil::anonymization::engine::rng_from_seed;
use veil::anonymization::{AnonymizationConfig, AnonymizationEngine, RunSummary};
use veil::domain::VeilError;

fn sample_store() -> MemoryStore {
    MemoryStore::new(
        support::sample_users(),
        support::sample_courses(),
        support::sample_comments(),
    )
}

fn sample_config(ws: &Workspace) -> AnonymizationConfig {
    ws.anonymization_config(
        support::FIRST_NAMES,
        support::LAST_NAMES,
        support::IGNORES,
        support::LOREM,
        4,
    )
}

#[tokio::test]
async fn test_full_run_rewrites_all_three_tables() {
    let dir = tempdir().unwrap();
    let ws = Workspace::new(dir.path());
    let engine = AnonymizationEngine::new(sample_config(&ws)).unwrap();
    let mut store = sample_store();

    let summary = engine
        .run(&mut store, &mut rng_from_seed(Some(42)), false)
        .await
        .unwrap();

    assert!(!summary.dry_run);
    assert_eq!(summary.users_read, 4);
    assert_eq!(summary.users_substituted, 3);
    assert_eq!(summary.users_ignored, 1);
    assert_eq!(summary.courses_permuted, 3);
    assert_eq!(summary.comments_read, 4);
    assert_eq!(summary.comment_fields_replaced, 3);
    assert_eq!(store.commits, 3);

    assert!(store.user("alan.turing").is_some());
    for original in ["jane.doe", "jdoe", "zguest"] {
        assert!(store.user(original).is_none(), "{original} was not replaced");
    }

    let users_audit = fs::read_to_string(ws.audit_users()).unwrap();
    let lines: Vec<&str> = users_audit.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("jane.doe => "));
    assert!(lines[1].starts_with("jdoe => "));
    assert!(lines[2].starts_with("zguest => ") && lines[2].ends_with(".ext"));
    for line in &lines {
        let (_, written) = line.split_once(" => ").unwrap();
        assert!(store.user(written).is_some());
    }

    let courses_audit = fs::read_to_string(ws.audit_courses()).unwrap();
    let mut targets = Vec::new();
    let mut sources = Vec::new();
    for line in courses_audit.lines() {
        let (target, source) = line.split_once(" => ").unwrap();
        targets.push(target.parse::<i32>().unwrap());
        sources.push(source.parse::<i32>().unwrap());
    }
    sources.sort_unstable();
    assert_eq!(targets, vec![1, 2, 3]);
    assert_eq!(sources, vec![1, 2, 3]);

    assert_eq!(
        store.comments()[1].original_answer.as_deref(),
        Some("lorem ipsum dolor sit lorem")
    );
}

#[tokio::test]
async fn test_dry_run_writes_audit_files_only() {
    let dir = tempdir().unwrap();
    let ws = Workspace::new(dir.path());
    let engine = AnonymizationEngine::new(sample_config(&ws)).unwrap();
    let mut store = sample_store();

    let summary = engine
        .run(&mut store, &mut rng_from_seed(Some(1)), true)
        .await
        .unwrap();

    assert!(summary.dry_run);
    assert_eq!(summary.users_substituted, 3);
    assert_eq!(summary.courses_permuted, 3);
    assert_eq!(summary.comment_fields_replaced, 3);

    // Only the three reads reached the store
    assert_eq!(store.statements, 3);
    assert_eq!(store.commits, 0);
    assert_eq!(store.users(), support::sample_users().as_slice());
    assert_eq!(store.courses(), support::sample_courses().as_slice());
    assert_eq!(store.comments(), support::sample_comments().as_slice());

    assert_eq!(fs::read_to_string(ws.audit_users()).unwrap().lines().count(), 3);
    assert_eq!(fs::read_to_string(ws.audit_courses()).unwrap().lines().count(), 3);
}

#[tokio::test]
async fn test_same_seed_gives_same_dataset() {
    let mut results = Vec::new();
    for _ in 0..2 {
        let dir = tempdir().unwrap();
        let ws = Workspace::new(dir.path());
        let engine = AnonymizationEngine::new(sample_config(&ws)).unwrap();
        let mut store = sample_store();
        engine
            .run(&mut store, &mut rng_from_seed(Some(2024)), false)
            .await
            .unwrap();
        results.push((
            store.users().to_vec(),
            store.courses().to_vec(),
            ws.read("audit/users.txt"),
            ws.read("audit/courses.txt"),
        ));
    }
    assert_eq!(results[0], results[1]);
}

#[tokio::test]
async fn test_pool_too_small_fails_before_any_write() {
    let dir = tempdir().unwrap();
    let ws = Workspace::new(dir.path());
    let config = ws.anonymization_config(
        support::FIRST_NAMES,
        support::LAST_NAMES,
        "",
        support::LOREM,
        3,
    );
    let engine = AnonymizationEngine::new(config).unwrap();
    let mut store = sample_store();

    let err = engine
        .run(&mut store, &mut rng_from_seed(Some(1)), false)
        .await
        .unwrap_err();

    assert!(matches!(err, VeilError::Validation(_)));
    assert_eq!(store.commits, 0);
    assert_eq!(store.users(), support::sample_users().as_slice());
    assert!(!ws.audit_users().exists());
}

#[tokio::test]
async fn test_too_few_name_combinations_is_rejected() {
    let dir = tempdir().unwrap();
    let ws = Workspace::new(dir.path());
    let config = ws.anonymization_config("Ada\n", "Lovelace\nHopper\n", "", support::LOREM, 3);
    let engine = AnonymizationEngine::new(config).unwrap();
    let mut store = sample_store();

    let err = engine
        .run(&mut store, &mut rng_from_seed(None), false)
        .await
        .unwrap_err();
    assert!(matches!(err, VeilError::Validation(_)));
    assert_eq!(store.commits, 0);
}

#[tokio::test]
async fn test_course_failure_keeps_committed_users() {
    let dir = tempdir().unwrap();
    let ws = Workspace::new(dir.path());
    let engine = AnonymizationEngine::new(sample_config(&ws)).unwrap();
    let mut store = sample_store().failing_at(FailPoint::UpdateCourse(1));

    let err = engine
        .run(&mut store, &mut rng_from_seed(Some(7)), false)
        .await
        .unwrap_err();

    assert!(matches!(err, VeilError::Database(_)));
    assert_eq!(store.commits, 1);
    assert_eq!(store.rollbacks, 1);
    assert!(store.user("jdoe").is_none());
    assert_eq!(store.courses(), support::sample_courses().as_slice());
    assert_eq!(store.comments(), support::sample_comments().as_slice());
}

#[tokio::test]
async fn test_dry_run_rejects_names_ending_with_staging_marker() {
    let dir = tempdir().unwrap();
    let ws = Workspace::new(dir.path());
    let engine = AnonymizationEngine::new(sample_config(&ws)).unwrap();
    let mut courses = support::sample_courses();
    courses[2].fields.name_de.push(' ');
    let mut store = MemoryStore::new(support::sample_users(), courses, support::sample_comments());

    let err = engine
        .run(&mut store, &mut rng_from_seed(Some(1)), true)
        .await
        .unwrap_err();

    assert!(matches!(err, VeilError::Validation(_)));
    assert!(ws.audit_users().exists());
    assert!(!ws.audit_courses().exists());
    assert_eq!(store.commits, 0);
}

#[tokio::test]
async fn test_padded_ignore_entry_still_keeps_user() {
    let dir = tempdir().unwrap();
    let ws = Workspace::new(dir.path());
    let config = ws.anonymization_config(
        support::FIRST_NAMES,
        support::LAST_NAMES,
        "  alan.turing \r\n",
        support::LOREM,
        4,
    );
    let engine = AnonymizationEngine::new(config).unwrap();
    let mut store = sample_store();

    let summary = engine
        .run(&mut store, &mut rng_from_seed(Some(5)), false)
        .await
        .unwrap();

    assert_eq!(summary.users_ignored, 1);
    assert!(store.user("alan.turing").is_some());
}

#[test]
fn test_missing_input_file_is_an_input_error() {
    let dir = tempdir().unwrap();
    let ws = Workspace::new(dir.path());
    let mut config = sample_config(&ws);
    config.inputs.last_names = dir.path().join("missing.txt");

    let err = AnonymizationEngine::new(config).err().unwrap();
    assert!(matches!(err, VeilError::Input(_)));
    assert!(err.to_string().contains("missing.txt"));
}

#[test]
fn test_empty_corpus_is_an_input_error() {
    let dir = tempdir().unwrap();
    let ws = Workspace::new(dir.path());
    let config = ws.anonymization_config(
        support::FIRST_NAMES,
        support::LAST_NAMES,
        "",
        "\n   \n",
        4,
    );

    let err = AnonymizationEngine::new(config).err().unwrap();
    assert!(matches!(err, VeilError::Input(_)));
}

#[tokio::test]
async fn test_summary_report_round_trips_through_json() {
    let dir = tempdir().unwrap();
    let ws = Workspace::new(dir.path());
    let engine = AnonymizationEngine::new(sample_config(&ws)).unwrap();
    let mut store = sample_store();
    let summary = engine
        .run(&mut store, &mut rng_from_seed(Some(3)), true)
        .await
        .unwrap();

    let path = dir.path().join("reports").join("run.json");
    summary.write_json(&path).unwrap();

    let parsed: RunSummary = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed, summary);
}
