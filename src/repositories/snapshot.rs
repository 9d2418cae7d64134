use sqlx::PgPool;

use crate::db::models::{Assignment, Course, Student, Submission};
use crate::repositories::CourseSnapshot;

/// Reads the course, its enrolled students, assignments and records inside one
/// repeatable-read transaction so the gradebook never mixes pre- and post-penalty state.
pub(crate) async fn load(
    pool: &PgPool,
    course_id: &str,
) -> Result<Option<CourseSnapshot>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
        .execute(&mut *tx)
        .await?;

    let course = sqlx::query_as::<_, Course>(
        "SELECT id, code, name, created_at FROM courses WHERE id = $1",
    )
    .bind(course_id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(course) = course else {
        tx.rollback().await?;
        return Ok(None);
    };

    let students = sqlx::query_as::<_, Student>(
        "SELECT s.id, s.name, s.email
         FROM enrollments e
         JOIN students s ON s.id = e.student_id
         WHERE e.course_id = $1
         ORDER BY e.enrolled_at, s.id",
    )
    .bind(course_id)
    .fetch_all(&mut *tx)
    .await?;

    let assignments = sqlx::query_as::<_, Assignment>(&format!(
        "SELECT {} FROM assignments WHERE course_id = $1 ORDER BY deadline, created_at",
        super::assignments::COLUMNS
    ))
    .bind(course_id)
    .fetch_all(&mut *tx)
    .await?;

    let submissions = sqlx::query_as::<_, Submission>(&format!(
        "SELECT {} FROM submissions
         WHERE assignment_id IN (SELECT id FROM assignments WHERE course_id = $1)",
        super::submissions::COLUMNS
    ))
    .bind(course_id)
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(Some(CourseSnapshot { course, students, assignments, submissions }))
}
