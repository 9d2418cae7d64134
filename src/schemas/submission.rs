use serde::Deserialize;
use time::OffsetDateTime;
use validator::Validate;

/// Work handed in by a student; the record starts at the assignment's full points.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmissionDraft {
    #[serde(alias = "assignmentId")]
    pub assignment_id: String,
    #[serde(alias = "studentId")]
    pub student_id: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, alias = "submittedAt", with = "time::serde::rfc3339::option")]
    pub submitted_at: Option<OffsetDateTime>,
}

/// A instructor-entered grade for a student's assignment or exam.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GradeDraft {
    #[serde(alias = "assignmentId")]
    pub assignment_id: String,
    #[serde(alias = "studentId")]
    pub student_id: String,
    #[validate(range(min = 0, message = "points must be non-negative"))]
    pub points: i32,
    #[serde(default, alias = "submittedAt", with = "time::serde::rfc3339::option")]
    pub submitted_at: Option<OffsetDateTime>,
}
