use validator::Validate;

use crate::core::state::GradingEngine;
use crate::db::models::GradingFormula;
use crate::errors::{FormulaInvalid, GradingError};
use crate::schemas::formula::FormulaInput;
use crate::services::formula;

impl GradingEngine {
    /// Arithmetic check only; see [`formula::validate_formula`].
    pub fn validate_formula(&self, input: &FormulaInput) -> Result<(), FormulaInvalid> {
        formula::validate_formula(&input.values())
    }

    /// Creates or replaces the course formula. Assignments that already exist are not
    /// re-checked against the new formula.
    pub async fn set_formula(
        &self,
        course_id: &str,
        input: &FormulaInput,
    ) -> Result<GradingFormula, GradingError> {
        input.validate()?;
        let values = input.values();
        formula::validate_formula(&values)?;

        let _course_guard = self.course_locks().lock(course_id).await;
        self.require_course(course_id).await?;

        let saved = self
            .store()
            .set_formula(course_id, values)
            .await
            .map_err(|err| GradingError::internal(err, "Failed to save grading formula"))?;
        tracing::info!(
            course_id,
            assignment_count = saved.assignment_count,
            points_per_assignment = saved.points_per_assignment,
            exam_points = saved.exam_points,
            "Grading formula saved"
        );
        Ok(saved)
    }

    pub async fn get_formula(
        &self,
        course_id: &str,
    ) -> Result<Option<GradingFormula>, GradingError> {
        self.require_course(course_id).await?;
        self.store()
            .get_formula(course_id)
            .await
            .map_err(|err| GradingError::internal(err, "Failed to load grading formula"))
    }
}
