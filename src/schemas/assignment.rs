use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use validator::Validate;

use crate::db::models::{Assignment, ExamTask};
use crate::db::types::AssignmentType;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AssignmentDraft {
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 1000, message = "description must be at most 1000 characters"))]
    pub description: Option<String>,
    #[serde(alias = "type")]
    pub kind: AssignmentType,
    #[serde(alias = "maxPoints")]
    #[validate(range(min = 0, message = "max_points must be non-negative"))]
    pub max_points: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub deadline: OffsetDateTime,
    #[serde(default, alias = "penaltyPerDay")]
    #[validate(range(min = 0, message = "penalty_per_day must be non-negative"))]
    pub penalty_per_day: i32,
}

/// Partial update; unset fields keep the assignment's current values.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct AssignmentPatch {
    #[serde(default)]
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: Option<String>,
    #[serde(default)]
    #[validate(length(max = 1000, message = "description must be at most 1000 characters"))]
    pub description: Option<String>,
    #[serde(default, alias = "type")]
    pub kind: Option<AssignmentType>,
    #[serde(default, alias = "maxPoints")]
    #[validate(range(min = 0, message = "max_points must be non-negative"))]
    pub max_points: Option<i32>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub deadline: Option<OffsetDateTime>,
    #[serde(default, alias = "penaltyPerDay")]
    #[validate(range(min = 0, message = "penalty_per_day must be non-negative"))]
    pub penalty_per_day: Option<i32>,
}

impl AssignmentPatch {
    /// The assignment as it would look after the patch.
    pub fn merge_into(&self, current: &Assignment) -> Assignment {
        Assignment {
            title: self.title.clone().unwrap_or_else(|| current.title.clone()),
            description: self.description.clone().or_else(|| current.description.clone()),
            kind: self.kind.unwrap_or(current.kind),
            max_points: self.max_points.unwrap_or(current.max_points),
            deadline: self.deadline.unwrap_or(current.deadline),
            penalty_per_day: self.penalty_per_day.unwrap_or(current.penalty_per_day),
            ..current.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ExamTaskDraft {
    #[validate(length(min = 1, message = "question must not be empty"))]
    pub question: String,
    #[validate(range(min = 0, message = "points must be non-negative"))]
    pub points: i32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ExamVariantDraft {
    #[serde(alias = "variantNumber")]
    #[validate(range(min = 1, message = "variant_number must be positive"))]
    pub variant_number: i32,
    #[validate(length(min = 1, message = "variant needs at least one task"), nested)]
    pub tasks: Vec<ExamTaskDraft>,
}

impl ExamVariantDraft {
    pub fn total_points(&self) -> i64 {
        self.tasks.iter().map(|task| i64::from(task.points)).sum()
    }

    pub(crate) fn into_tasks(self) -> Vec<ExamTask> {
        self.tasks
            .into_iter()
            .map(|task| ExamTask { question: task.question, points: task.points })
            .collect()
    }
}
