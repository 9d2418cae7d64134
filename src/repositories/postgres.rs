use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::db::models::{
    Assignment, Course, ExamVariant, FormulaValues, GradingFormula, NewAssignment, NewCourse,
    NewExamVariant, NewStudent, NewSubmission, PenaltyWrite, Student, Submission,
};
use crate::errors::StoreError;
use crate::repositories::{
    assignments, courses, enrollments, snapshot, students, submissions, AssignmentStore,
    CourseSnapshot, CourseStore, EnrollmentStore, SnapshotStore, StoreResult, StudentStore,
    SubmissionStore,
};

/// Postgres-backed stores over the schema in `migrations/`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[async_trait]
impl CourseStore for PgStore {
    async fn create_course(&self, course: NewCourse<'_>) -> StoreResult<Course> {
        courses::create(&self.pool, &new_id(), course.code, course.name, OffsetDateTime::now_utc())
            .await
            .map_err(|err| {
                StoreError::from_sqlx(err, &format!("course code {} is already taken", course.code))
            })
    }

    async fn get_course(&self, course_id: &str) -> StoreResult<Option<Course>> {
        Ok(courses::find_by_id(&self.pool, course_id).await?)
    }

    async fn get_formula(&self, course_id: &str) -> StoreResult<Option<GradingFormula>> {
        Ok(courses::find_formula(&self.pool, course_id).await?)
    }

    async fn set_formula(
        &self,
        course_id: &str,
        formula: FormulaValues,
    ) -> StoreResult<GradingFormula> {
        Ok(courses::upsert_formula(&self.pool, course_id, formula, OffsetDateTime::now_utc())
            .await?)
    }
}

#[async_trait]
impl AssignmentStore for PgStore {
    async fn list_assignments_by_course(&self, course_id: &str) -> StoreResult<Vec<Assignment>> {
        Ok(assignments::list_by_course(&self.pool, course_id).await?)
    }

    async fn list_all_assignments(&self) -> StoreResult<Vec<Assignment>> {
        Ok(assignments::list_all(&self.pool).await?)
    }

    async fn get_assignment(&self, assignment_id: &str) -> StoreResult<Option<Assignment>> {
        Ok(assignments::find_by_id(&self.pool, assignment_id).await?)
    }

    async fn create_assignment(&self, assignment: NewAssignment) -> StoreResult<Assignment> {
        Ok(assignments::create(&self.pool, &new_id(), assignment, OffsetDateTime::now_utc())
            .await?)
    }

    async fn update_assignment(&self, assignment: &Assignment) -> StoreResult<Assignment> {
        assignments::update(&self.pool, assignment)
            .await?
            .ok_or_else(|| StoreError::Database(sqlx::Error::RowNotFound))
    }

    async fn list_exam_variants(&self, assignment_id: &str) -> StoreResult<Vec<ExamVariant>> {
        Ok(assignments::list_variants(&self.pool, assignment_id).await?)
    }

    async fn create_exam_variant(&self, variant: NewExamVariant) -> StoreResult<ExamVariant> {
        let number = variant.variant_number;
        assignments::create_variant(
            &self.pool,
            &new_id(),
            &variant.assignment_id,
            variant.variant_number,
            variant.tasks,
            OffsetDateTime::now_utc(),
        )
        .await
        .map_err(|err| StoreError::from_sqlx(err, &format!("variant {number} already exists")))
    }
}

#[async_trait]
impl SubmissionStore for PgStore {
    async fn list_submissions_by_assignment(
        &self,
        assignment_id: &str,
    ) -> StoreResult<Vec<Submission>> {
        Ok(submissions::list_by_assignment(&self.pool, assignment_id).await?)
    }

    async fn list_submissions_by_student(&self, student_id: &str) -> StoreResult<Vec<Submission>> {
        Ok(submissions::list_by_student(&self.pool, student_id).await?)
    }

    async fn get_submission(&self, submission_id: &str) -> StoreResult<Option<Submission>> {
        Ok(submissions::find_by_id(&self.pool, submission_id).await?)
    }

    async fn create_submission(&self, submission: NewSubmission) -> StoreResult<Submission> {
        submissions::create(&self.pool, &new_id(), submission).await.map_err(|err| {
            StoreError::from_sqlx(err, "student already has a record for this assignment")
        })
    }

    async fn update_submission_points(
        &self,
        submission_id: &str,
        points: i32,
    ) -> StoreResult<Option<Submission>> {
        Ok(submissions::update_points(&self.pool, submission_id, points).await?)
    }

    async fn apply_penalty(&self, submission_id: &str, write: PenaltyWrite) -> StoreResult<bool> {
        Ok(submissions::apply_penalty(&self.pool, submission_id, write).await?)
    }
}

#[async_trait]
impl EnrollmentStore for PgStore {
    async fn enroll(&self, course_id: &str, student_id: &str) -> StoreResult<bool> {
        Ok(enrollments::insert(&self.pool, course_id, student_id, OffsetDateTime::now_utc())
            .await?)
    }

    async fn unenroll(&self, course_id: &str, student_id: &str) -> StoreResult<bool> {
        Ok(enrollments::delete(&self.pool, course_id, student_id).await?)
    }

    async fn list_enrolled_students(&self, course_id: &str) -> StoreResult<Vec<Student>> {
        Ok(enrollments::list_students(&self.pool, course_id).await?)
    }

    async fn is_enrolled(&self, course_id: &str, student_id: &str) -> StoreResult<bool> {
        Ok(enrollments::exists(&self.pool, course_id, student_id).await?)
    }
}

#[async_trait]
impl StudentStore for PgStore {
    async fn create_student(&self, student: NewStudent<'_>) -> StoreResult<Student> {
        students::create(&self.pool, &new_id(), student.name, student.email).await.map_err(|err| {
            StoreError::from_sqlx(err, &format!("email {} is already registered", student.email))
        })
    }

    async fn get_student(&self, student_id: &str) -> StoreResult<Option<Student>> {
        Ok(students::find_by_id(&self.pool, student_id).await?)
    }
}

#[async_trait]
impl SnapshotStore for PgStore {
    async fn course_snapshot(&self, course_id: &str) -> StoreResult<Option<CourseSnapshot>> {
        Ok(snapshot::load(&self.pool, course_id).await?)
    }
}
