use sqlx::types::Json;
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::db::models::{Assignment, ExamTask, ExamVariant, NewAssignment};

pub(crate) const COLUMNS: &str = "\
    id, course_id, title, description, kind, max_points, deadline, penalty_per_day, created_at";

const VARIANT_COLUMNS: &str = "id, assignment_id, variant_number, tasks, created_at";

pub(crate) async fn list_by_course(
    pool: &PgPool,
    course_id: &str,
) -> Result<Vec<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "SELECT {COLUMNS} FROM assignments WHERE course_id = $1 ORDER BY deadline, created_at"
    ))
    .bind(course_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn list_all(pool: &PgPool) -> Result<Vec<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "SELECT {COLUMNS} FROM assignments ORDER BY deadline, created_at"
    ))
    .fetch_all(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    assignment_id: &str,
) -> Result<Option<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!("SELECT {COLUMNS} FROM assignments WHERE id = $1"))
        .bind(assignment_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn create(
    pool: &PgPool,
    id: &str,
    params: NewAssignment,
    created_at: OffsetDateTime,
) -> Result<Assignment, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "INSERT INTO assignments (
            id, course_id, title, description, kind, max_points, deadline, penalty_per_day,
            created_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)
         RETURNING {COLUMNS}",
    ))
    .bind(id)
    .bind(params.course_id)
    .bind(params.title)
    .bind(params.description)
    .bind(params.kind)
    .bind(params.max_points)
    .bind(params.deadline)
    .bind(params.penalty_per_day)
    .bind(created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn update(
    pool: &PgPool,
    assignment: &Assignment,
) -> Result<Option<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "UPDATE assignments SET
            title = $1,
            description = $2,
            kind = $3,
            max_points = $4,
            deadline = $5,
            penalty_per_day = $6
         WHERE id = $7
         RETURNING {COLUMNS}",
    ))
    .bind(&assignment.title)
    .bind(&assignment.description)
    .bind(assignment.kind)
    .bind(assignment.max_points)
    .bind(assignment.deadline)
    .bind(assignment.penalty_per_day)
    .bind(&assignment.id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_variants(
    pool: &PgPool,
    assignment_id: &str,
) -> Result<Vec<ExamVariant>, sqlx::Error> {
    sqlx::query_as::<_, ExamVariant>(&format!(
        "SELECT {VARIANT_COLUMNS} FROM exam_variants
         WHERE assignment_id = $1
         ORDER BY variant_number"
    ))
    .bind(assignment_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn create_variant(
    pool: &PgPool,
    id: &str,
    assignment_id: &str,
    variant_number: i32,
    tasks: Vec<ExamTask>,
    created_at: OffsetDateTime,
) -> Result<ExamVariant, sqlx::Error> {
    sqlx::query_as::<_, ExamVariant>(&format!(
        "INSERT INTO exam_variants (id, assignment_id, variant_number, tasks, created_at)
         VALUES ($1,$2,$3,$4,$5)
         RETURNING {VARIANT_COLUMNS}",
    ))
    .bind(id)
    .bind(assignment_id)
    .bind(variant_number)
    .bind(Json(tasks))
    .bind(created_at)
    .fetch_one(pool)
    .await
}
