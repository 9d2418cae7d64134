use sqlx::PgPool;
use time::OffsetDateTime;

use crate::db::models::Student;

pub(crate) async fn insert(
    pool: &PgPool,
    course_id: &str,
    student_id: &str,
    enrolled_at: OffsetDateTime,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO enrollments (course_id, student_id, enrolled_at)
         VALUES ($1,$2,$3)
         ON CONFLICT (course_id, student_id) DO NOTHING",
    )
    .bind(course_id)
    .bind(student_id)
    .bind(enrolled_at)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

pub(crate) async fn delete(
    pool: &PgPool,
    course_id: &str,
    student_id: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM enrollments WHERE course_id = $1 AND student_id = $2")
        .bind(course_id)
        .bind(student_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() == 1)
}

pub(crate) async fn list_students(
    pool: &PgPool,
    course_id: &str,
) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        "SELECT s.id, s.name, s.email
         FROM enrollments e
         JOIN students s ON s.id = e.student_id
         WHERE e.course_id = $1
         ORDER BY e.enrolled_at, s.id",
    )
    .bind(course_id)
    .fetch_all(pool)
    .await
}

pub(crate) async fn exists(
    pool: &PgPool,
    course_id: &str,
    student_id: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(
            SELECT 1 FROM enrollments WHERE course_id = $1 AND student_id = $2
         )",
    )
    .bind(course_id)
    .bind(student_id)
    .fetch_one(pool)
    .await
}
