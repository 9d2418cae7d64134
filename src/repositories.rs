//! Storage collaborators of the grading core.
//!
//! Entities reference each other by id only; the stores are the arenas. Method names
//! are unique across the traits so that all of them can be called through one
//! `dyn GradingStore`.

pub(crate) mod assignments;
pub(crate) mod courses;
pub(crate) mod enrollments;
pub mod memory;
pub mod postgres;
pub(crate) mod snapshot;
pub(crate) mod students;
pub(crate) mod submissions;

use async_trait::async_trait;

use crate::db::models::{
    Assignment, Course, ExamVariant, FormulaValues, GradingFormula, NewAssignment, NewCourse,
    NewExamVariant, NewStudent, NewSubmission, PenaltyWrite, Student, Submission,
};
use crate::errors::StoreError;

pub use memory::MemoryStore;
pub use postgres::PgStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait CourseStore: Send + Sync {
    async fn create_course(&self, course: NewCourse<'_>) -> StoreResult<Course>;
    async fn get_course(&self, course_id: &str) -> StoreResult<Option<Course>>;
    async fn get_formula(&self, course_id: &str) -> StoreResult<Option<GradingFormula>>;
    /// Creates or replaces the course's formula. Callers validate first.
    async fn set_formula(
        &self,
        course_id: &str,
        formula: FormulaValues,
    ) -> StoreResult<GradingFormula>;
}

#[async_trait]
pub trait AssignmentStore: Send + Sync {
    async fn list_assignments_by_course(&self, course_id: &str) -> StoreResult<Vec<Assignment>>;
    async fn list_all_assignments(&self) -> StoreResult<Vec<Assignment>>;
    async fn get_assignment(&self, assignment_id: &str) -> StoreResult<Option<Assignment>>;
    async fn create_assignment(&self, assignment: NewAssignment) -> StoreResult<Assignment>;
    async fn update_assignment(&self, assignment: &Assignment) -> StoreResult<Assignment>;
    async fn list_exam_variants(&self, assignment_id: &str) -> StoreResult<Vec<ExamVariant>>;
    async fn create_exam_variant(&self, variant: NewExamVariant) -> StoreResult<ExamVariant>;
}

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    async fn list_submissions_by_assignment(
        &self,
        assignment_id: &str,
    ) -> StoreResult<Vec<Submission>>;
    async fn list_submissions_by_student(&self, student_id: &str) -> StoreResult<Vec<Submission>>;
    async fn get_submission(&self, submission_id: &str) -> StoreResult<Option<Submission>>;
    /// Fails with `StoreError::Conflict` when the (student, assignment) pair already has a
    /// record.
    async fn create_submission(&self, submission: NewSubmission) -> StoreResult<Submission>;
    /// Stores new nominal points. A late penalty that was already applied is deducted
    /// again in the same write, so a regrade never loses it.
    async fn update_submission_points(
        &self,
        submission_id: &str,
        points: i32,
    ) -> StoreResult<Option<Submission>>;
    /// Atomically writes the penalized points and sets the guard flag, but only while the
    /// record still has `penalty_applied = false` and `points == expected_points`.
    /// Returns whether the write happened.
    async fn apply_penalty(&self, submission_id: &str, write: PenaltyWrite) -> StoreResult<bool>;
}

#[async_trait]
pub trait EnrollmentStore: Send + Sync {
    /// Returns `false` when the student was already enrolled.
    async fn enroll(&self, course_id: &str, student_id: &str) -> StoreResult<bool>;
    async fn unenroll(&self, course_id: &str, student_id: &str) -> StoreResult<bool>;
    async fn list_enrolled_students(&self, course_id: &str) -> StoreResult<Vec<Student>>;
    async fn is_enrolled(&self, course_id: &str, student_id: &str) -> StoreResult<bool>;
}

#[async_trait]
pub trait StudentStore: Send + Sync {
    async fn create_student(&self, student: NewStudent<'_>) -> StoreResult<Student>;
    async fn get_student(&self, student_id: &str) -> StoreResult<Option<Student>>;
}

/// Everything the gradebook needs for one course, read at a single point in time.
#[derive(Debug, Clone)]
pub struct CourseSnapshot {
    pub course: Course,
    pub students: Vec<Student>,
    pub assignments: Vec<Assignment>,
    pub submissions: Vec<Submission>,
}

#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn course_snapshot(&self, course_id: &str) -> StoreResult<Option<CourseSnapshot>>;
}

pub trait GradingStore:
    CourseStore + AssignmentStore + SubmissionStore + EnrollmentStore + StudentStore + SnapshotStore
{
}

impl<T> GradingStore for T where
    T: CourseStore
        + AssignmentStore
        + SubmissionStore
        + EnrollmentStore
        + StudentStore
        + SnapshotStore
{
}
