//! Needs a reachable Postgres. Run with `cargo test -- --ignored`.

use std::sync::Arc;

use sqlx::Row;
use time::macros::datetime;
use time::Duration;
use unigrade::db::types::AssignmentType;
use unigrade::schemas::{
    AssignmentDraft, CourseDraft, FormulaInput, StudentDraft, SubmissionDraft,
};
use unigrade::services::notifications::LogNotifier;
use unigrade::{EngineOptions, GradingEngine, PgStore};

fn database_url() -> String {
    dotenvy::dotenv().ok();

    if let Ok(url) = std::env::var("DATABASE_URL") {
        if !url.trim().is_empty() {
            return url;
        }
    }

    let server = std::env::var("POSTGRES_SERVER").unwrap_or_else(|_| "localhost".into());
    let port = std::env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".into());
    let user = std::env::var("POSTGRES_USER").unwrap_or_else(|_| "unigrade".into());
    let password = std::env::var("POSTGRES_PASSWORD").unwrap_or_default();
    let db = std::env::var("POSTGRES_DB").unwrap_or_else(|_| "unigrade_test".into());

    format!("postgresql://{user}:{password}@{server}:{port}/{db}")
}

async fn migrated_pool() -> anyhow::Result<sqlx::PgPool> {
    let pool =
        sqlx::postgres::PgPoolOptions::new().max_connections(4).connect(&database_url()).await?;
    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn migrations_apply_and_tables_exist() -> anyhow::Result<()> {
    let pool = migrated_pool().await?;

    let tables = [
        "courses",
        "grading_formulas",
        "students",
        "enrollments",
        "assignments",
        "exam_variants",
        "submissions",
    ];

    for table in tables {
        let row = sqlx::query("SELECT to_regclass($1)::text").bind(table).fetch_one(&pool).await?;
        let regclass: Option<String> = row.try_get(0)?;
        assert!(regclass.is_some(), "expected table {table} to exist after migrations");
    }

    Ok(())
}

#[tokio::test]
#[ignore = "requires Postgres"]
async fn postgres_sweep_penalizes_once() -> anyhow::Result<()> {
    let pool = migrated_pool().await?;
    let engine = GradingEngine::new(
        Arc::new(PgStore::new(pool)),
        Arc::new(LogNotifier),
        EngineOptions::default(),
    );

    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let course = engine
        .create_course(&CourseDraft {
            code: format!("PG-{}", &suffix[..8]),
            name: "Postgres smoke".to_string(),
        })
        .await?;
    engine.set_formula(&course.id, &FormulaInput::new(4, 10, 60)).await?;

    let deadline = datetime!(2025-03-01 12:00 UTC);
    let lab = engine
        .create_assignment(
            &course.id,
            &AssignmentDraft {
                title: "Lab 1".to_string(),
                description: None,
                kind: AssignmentType::Lab,
                max_points: 10,
                deadline,
                penalty_per_day: 4,
            },
        )
        .await?;
    let student = engine
        .create_student(&StudentDraft {
            name: "Smoke".to_string(),
            email: format!("smoke-{suffix}@uni.test"),
        })
        .await?;
    engine.enroll(&course.id, &student.id).await?;
    engine
        .submit_work(&SubmissionDraft {
            assignment_id: lab.id.clone(),
            student_id: student.id.clone(),
            content: None,
            submitted_at: Some(deadline + Duration::hours(50)),
        })
        .await?;

    let now = deadline + Duration::days(5);
    let first = engine.run_deadline_sweep(now).await?;
    let second = engine.run_deadline_sweep(now).await?;
    assert!(first.penalties_applied >= 1);
    assert_eq!(second.penalties_applied, 0);

    let gradebook = engine.build_gradebook(&course.id).await?;
    let row = gradebook.student(&student.id).expect("student row");
    assert_eq!(row.total_points, 2);

    Ok(())
}
