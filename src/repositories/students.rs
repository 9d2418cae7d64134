use sqlx::PgPool;

use crate::db::models::Student;

pub(crate) async fn create(
    pool: &PgPool,
    id: &str,
    name: &str,
    email: &str,
) -> Result<Student, sqlx::Error> {
    sqlx::query_as::<_, Student>(
        "INSERT INTO students (id, name, email) VALUES ($1,$2,$3) RETURNING id, name, email",
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .fetch_one(pool)
    .await
}

pub(crate) async fn find_by_id(
    pool: &PgPool,
    student_id: &str,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>("SELECT id, name, email FROM students WHERE id = $1")
        .bind(student_id)
        .fetch_optional(pool)
        .await
}
