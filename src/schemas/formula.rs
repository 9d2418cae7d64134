use serde::Deserialize;
use validator::Validate;

use crate::db::models::FormulaValues;
use crate::services::formula::REQUIRED_TOTAL_POINTS;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FormulaInput {
    #[serde(alias = "assignmentCount")]
    #[validate(range(min = 0, message = "assignment_count must be non-negative"))]
    pub assignment_count: i32,
    #[serde(alias = "pointsPerAssignment")]
    #[validate(range(min = 0, message = "points_per_assignment must be non-negative"))]
    pub points_per_assignment: i32,
    #[serde(alias = "examPoints")]
    #[validate(range(min = 0, message = "exam_points must be non-negative"))]
    pub exam_points: i32,
    #[serde(default = "default_total_points", alias = "totalPoints")]
    pub total_points: i32,
    #[serde(default)]
    #[validate(length(max = 500, message = "description must be at most 500 characters"))]
    pub description: Option<String>,
}

impl FormulaInput {
    pub fn new(assignment_count: i32, points_per_assignment: i32, exam_points: i32) -> Self {
        Self {
            assignment_count,
            points_per_assignment,
            exam_points,
            total_points: REQUIRED_TOTAL_POINTS,
            description: None,
        }
    }

    pub fn values(&self) -> FormulaValues {
        FormulaValues {
            assignment_count: self.assignment_count,
            points_per_assignment: self.points_per_assignment,
            exam_points: self.exam_points,
            total_points: self.total_points,
            description: self.description.clone(),
        }
    }
}

fn default_total_points() -> i32 {
    REQUIRED_TOTAL_POINTS
}
