use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::db::types::AssignmentType;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub id: String,
    pub code: String,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct GradingFormula {
    pub course_id: String,
    pub assignment_count: i32,
    pub points_per_assignment: i32,
    pub exam_points: i32,
    pub total_points: i32,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Assignment {
    pub id: String,
    pub course_id: String,
    pub title: String,
    pub description: Option<String>,
    pub kind: AssignmentType,
    pub max_points: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub deadline: OffsetDateTime,
    pub penalty_per_day: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExamTask {
    pub question: String,
    pub points: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExamVariant {
    pub id: String,
    pub assignment_id: String,
    pub variant_number: i32,
    pub tasks: Json<Vec<ExamTask>>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// One graded record per (student, assignment). `points` only changes through a regrade
/// or the late-penalty pass; once `penalty_applied` is set the sweep never touches the
/// record again.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Submission {
    pub id: String,
    pub student_id: String,
    pub assignment_id: String,
    pub content: Option<String>,
    pub points: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
    pub is_late: bool,
    pub penalty_points: i32,
    pub penalty_applied: bool,
}

pub struct NewCourse<'a> {
    pub code: &'a str,
    pub name: &'a str,
}

pub struct NewStudent<'a> {
    pub name: &'a str,
    pub email: &'a str,
}

/// The arithmetic part of a formula, as written by `CourseStore::set_formula`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormulaValues {
    pub assignment_count: i32,
    pub points_per_assignment: i32,
    pub exam_points: i32,
    pub total_points: i32,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewAssignment {
    pub course_id: String,
    pub title: String,
    pub description: Option<String>,
    pub kind: AssignmentType,
    pub max_points: i32,
    pub deadline: OffsetDateTime,
    pub penalty_per_day: i32,
}

#[derive(Debug, Clone)]
pub struct NewExamVariant {
    pub assignment_id: String,
    pub variant_number: i32,
    pub tasks: Vec<ExamTask>,
}

#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub student_id: String,
    pub assignment_id: String,
    pub content: Option<String>,
    pub points: i32,
    pub submitted_at: OffsetDateTime,
    pub is_late: bool,
}

/// Compare-and-set payload for the late-penalty write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PenaltyWrite {
    pub expected_points: i32,
    pub points: i32,
    pub penalty_points: i32,
}
