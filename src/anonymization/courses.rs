//! Course permutation
//!
//! The set of course descriptions stays the same; which id carries which
//! description is shuffled. Course names are unique, so the write goes
//! through [`crate::anonymization::staging`].

use crate::adapters::database::DatasetStore;
use crate::anonymization::audit::AuditLog;
use crate::anonymization::staging::{self, staged, STAGING_MARKER};
use crate::domain::{Course, CourseFields, Result};
use rand::seq::SliceRandom;
use rand::Rng;

/// One row of the permutation: `target_id` receives the fields of `source_id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseAssignment {
    pub target_id: i32,
    pub source_id: i32,
    pub fields: CourseFields,
}

/// Shuffles the courses and pairs each original with its shuffled counterpart
///
/// The result is a bijection on the course ids. A course may be paired with
/// itself.
pub fn plan_course_permutation<R: Rng + ?Sized>(
    courses: &[Course],
    rng: &mut R,
) -> Vec<CourseAssignment> {
    let mut shuffled: Vec<&Course> = courses.iter().collect();
    shuffled.shuffle(rng);

    courses
        .iter()
        .zip(shuffled)
        .map(|(original, source)| CourseAssignment {
            target_id: original.id,
            source_id: source.id,
            fields: source.fields.clone(),
        })
        .collect()
}

/// Audit mapping: target id to source id
pub fn course_audit(assignments: &[CourseAssignment]) -> AuditLog {
    let mut log = AuditLog::new();
    for assignment in assignments {
        log.record(assignment.target_id, assignment.source_id);
    }
    log
}

/// Checks that no course name can collide with its staged form
///
/// The assignments carry every course's current fields, so together they cover
/// all values of the unique name columns.
///
/// # Errors
///
/// Returns [`VeilError::Validation`](crate::domain::VeilError::Validation) when a
/// name already ends with the staging marker.
pub fn ensure_stageable(assignments: &[CourseAssignment]) -> Result<()> {
    staging::ensure_unmarked(
        "course name_de",
        assignments.iter().map(|a| a.fields.name_de.as_str()),
    )?;
    staging::ensure_unmarked(
        "course name_en",
        assignments.iter().map(|a| a.fields.name_en.as_str()),
    )
}

/// Writes the permutation using the two-phase protocol
///
/// Returns the number of courses rewritten.
pub async fn apply_course_permutation<S>(
    store: &mut S,
    assignments: &[CourseAssignment],
) -> Result<u64>
where
    S: DatasetStore + ?Sized,
{
    if assignments.is_empty() {
        return Ok(0);
    }
    ensure_stageable(assignments)?;

    store.begin().await?;
    let outcome = write_staged(store, assignments).await;
    staging::finish(store, "courses", outcome).await
}

async fn write_staged<S>(store: &mut S, assignments: &[CourseAssignment]) -> Result<u64>
where
    S: DatasetStore + ?Sized,
{
    let mut ids = Vec::with_capacity(assignments.len());

    for assignment in assignments {
        let fields = CourseFields {
            name_de: staged(&assignment.fields.name_de),
            name_en: staged(&assignment.fields.name_en),
            ..assignment.fields.clone()
        };
        let affected = store.update_course(assignment.target_id, &fields).await?;
        staging::expect_rows(
            &format!("stage course {}", assignment.target_id),
            1,
            affected,
        )?;
        ids.push(assignment.target_id);
    }

    let expected = ids.len() as u64;
    let stripped = store.strip_course_marker(&ids, STAGING_MARKER).await?;
    staging::expect_rows("strip course marker", expected, stripped)?;

    Ok(expected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn courses(n: i32) -> Vec<Course> {
        (1..=n)
            .map(|id| {
                Course::new(
                    id,
                    id % 3,
                    "ba-inf",
                    format!("Kurs {id}"),
                    format!("Course {id}"),
                )
            })
            .collect()
    }

    #[test]
    fn test_permutation_is_a_bijection() {
        let courses = courses(50);
        let plan = plan_course_permutation(&courses, &mut StdRng::seed_from_u64(9));

        let targets: HashSet<i32> = plan.iter().map(|a| a.target_id).collect();
        let sources: HashSet<i32> = plan.iter().map(|a| a.source_id).collect();
        let ids: HashSet<i32> = courses.iter().map(|c| c.id).collect();

        assert_eq!(plan.len(), 50);
        assert_eq!(targets, ids);
        assert_eq!(sources, ids);
    }

    #[test]
    fn test_assignment_carries_source_fields() {
        let courses = courses(10);
        let plan = plan_course_permutation(&courses, &mut StdRng::seed_from_u64(4));

        for assignment in &plan {
            let source = courses.iter().find(|c| c.id == assignment.source_id).unwrap();
            assert_eq!(assignment.fields, source.fields);
        }
    }

    #[test]
    fn test_permutation_is_reproducible_for_a_seed() {
        let courses = courses(20);
        let a = plan_course_permutation(&courses, &mut StdRng::seed_from_u64(42));
        let b = plan_course_permutation(&courses, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_single_course_maps_to_itself() {
        let courses = courses(1);
        let plan = plan_course_permutation(&courses, &mut StdRng::seed_from_u64(0));
        assert_eq!(course_audit(&plan).render(), "1 => 1\n");
    }

    #[test]
    fn test_empty_course_list() {
        let plan = plan_course_permutation(&[], &mut StdRng::seed_from_u64(0));
        assert!(plan.is_empty());
        assert!(course_audit(&plan).is_empty());
    }
}
