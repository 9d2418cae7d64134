use sqlx::PgPool;
use time::OffsetDateTime;

use crate::db::models::{Course, FormulaValues, GradingFormula};

const COURSE_COLUMNS: &str = "id, code, name, created_at";

const FORMULA_COLUMNS: &str = "\
    course_id, assignment_count, points_per_assignment, exam_points, total_points, \
    description, updated_at";

pub(crate) async fn create(
    pool: &PgPool,
    id: &str,
    code: &str,
    name: &str,
    created_at: OffsetDateTime,
) -> Result<Course, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "INSERT INTO courses (id, code, name, created_at)
         VALUES ($1,$2,$3,$4)
         RETURNING {COURSE_COLUMNS}",
    ))
    .bind(id)
    .bind(code)
    .bind(name)
    .bind(created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    course_id: &str,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!("SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"))
        .bind(course_id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn find_formula(
    pool: &PgPool,
    course_id: &str,
) -> Result<Option<GradingFormula>, sqlx::Error> {
    sqlx::query_as::<_, GradingFormula>(&format!(
        "SELECT {FORMULA_COLUMNS} FROM grading_formulas WHERE course_id = $1"
    ))
    .bind(course_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn upsert_formula(
    pool: &PgPool,
    course_id: &str,
    formula: FormulaValues,
    updated_at: OffsetDateTime,
) -> Result<GradingFormula, sqlx::Error> {
    sqlx::query_as::<_, GradingFormula>(&format!(
        "INSERT INTO grading_formulas (
            course_id, assignment_count, points_per_assignment, exam_points, total_points,
            description, updated_at
         ) VALUES ($1,$2,$3,$4,$5,$6,$7)
         ON CONFLICT (course_id)
         DO UPDATE SET assignment_count = EXCLUDED.assignment_count,
                       points_per_assignment = EXCLUDED.points_per_assignment,
                       exam_points = EXCLUDED.exam_points,
                       total_points = EXCLUDED.total_points,
                       description = EXCLUDED.description,
                       updated_at = EXCLUDED.updated_at
         RETURNING {FORMULA_COLUMNS}",
    ))
    .bind(course_id)
    .bind(formula.assignment_count)
    .bind(formula.points_per_assignment)
    .bind(formula.exam_points)
    .bind(formula.total_points)
    .bind(formula.description)
    .bind(updated_at)
    .fetch_one(pool)
    .await
}
