use sqlx::PgPool;

use crate::db::models::{NewSubmission, PenaltyWrite, Submission};

pub(crate) const COLUMNS: &str = "\
    id, student_id, assignment_id, content, points, submitted_at, is_late, penalty_points, \
    penalty_applied";

pub(crate) async fn list_by_assignment(
    pool: &PgPool,
    assignment_id: &str,
) -> Result<Vec<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "SELECT {COLUMNS} FROM submissions WHERE assignment_id = $1 ORDER BY submitted_at"
    ))
    .bind(assignment_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_by_student(
    pool: &PgPool,
    student_id: &str,
) -> Result<Vec<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "SELECT {COLUMNS} FROM submissions WHERE student_id = $1 ORDER BY submitted_at"
    ))
    .bind(student_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    submission_id: &str,
) -> Result<Option<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!("SELECT {COLUMNS} FROM submissions WHERE id = $1"))
        .bind(submission_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn create(
    pool: &PgPool,
    id: &str,
    params: NewSubmission,
) -> Result<Submission, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "INSERT INTO submissions (
            id, student_id, assignment_id, content, points, submitted_at, is_late,
            penalty_points, penalty_applied
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,0,FALSE)
         RETURNING {COLUMNS}",
    ))
    .bind(id)
    .bind(params.student_id)
    .bind(params.assignment_id)
    .bind(params.content)
    .bind(params.points)
    .bind(params.submitted_at)
    .bind(params.is_late)
    .fetch_one(pool)
    .await
}

pub(crate) async fn update_points(
    pool: &PgPool,
    submission_id: &str,
    points: i32,
) -> Result<Option<Submission>, sqlx::Error> {
    sqlx::query_as::<_, Submission>(&format!(
        "UPDATE submissions
         SET points = CASE WHEN penalty_applied THEN GREATEST(0, $1 - penalty_points) ELSE $1 END
         WHERE id = $2
         RETURNING {COLUMNS}"
    ))
    .bind(points)
    .bind(submission_id)
    .fetch_optional(pool)
    .await
}

/// Single-statement compare-and-set on the guard flag and the points the penalty was
/// computed from.
pub(crate) async fn apply_penalty(
    pool: &PgPool,
    submission_id: &str,
    write: PenaltyWrite,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE submissions
         SET points = $1,
             penalty_points = $2,
             penalty_applied = TRUE
         WHERE id = $3
           AND penalty_applied = FALSE
           AND points = $4",
    )
    .bind(write.points)
    .bind(write.penalty_points)
    .bind(submission_id)
    .bind(write.expected_points)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}
