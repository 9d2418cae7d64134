use validator::Validate;

use crate::core::state::GradingEngine;
use crate::db::models::{Assignment, ExamVariant, NewAssignment, NewExamVariant};
use crate::db::types::AssignmentType;
use crate::errors::GradingError;
use crate::schemas::assignment::{AssignmentDraft, AssignmentPatch, ExamVariantDraft};
use crate::services::assignment_gate;

impl GradingEngine {
    /// Runs the assignment gate without creating anything.
    pub async fn authorize_assignment_creation(
        &self,
        course_id: &str,
        draft: &AssignmentDraft,
    ) -> Result<(), GradingError> {
        draft.validate()?;
        self.require_course(course_id).await?;
        self.gate_new(course_id, draft).await
    }

    /// Gate and insert under the course lock, so concurrent creations cannot both pass
    /// the lab count check.
    pub async fn create_assignment(
        &self,
        course_id: &str,
        draft: &AssignmentDraft,
    ) -> Result<Assignment, GradingError> {
        draft.validate()?;
        let _course_guard = self.course_locks().lock(course_id).await;
        self.require_course(course_id).await?;
        self.gate_new(course_id, draft).await?;

        let created = self
            .store()
            .create_assignment(NewAssignment {
                course_id: course_id.to_string(),
                title: draft.title.trim().to_string(),
                description: draft.description.clone(),
                kind: draft.kind,
                max_points: draft.max_points,
                deadline: draft.deadline,
                penalty_per_day: draft.penalty_per_day,
            })
            .await
            .map_err(|err| GradingError::internal(err, "Failed to create assignment"))?;

        tracing::info!(
            course_id,
            assignment_id = %created.id,
            kind = created.kind.label(),
            max_points = created.max_points,
            "Assignment created"
        );
        Ok(created)
    }

    /// Applies a partial update. The merged values pass the same gate as a new
    /// assignment, with the edited assignment left out of the existing set.
    pub async fn update_assignment(
        &self,
        assignment_id: &str,
        patch: &AssignmentPatch,
    ) -> Result<Assignment, GradingError> {
        patch.validate()?;
        let course_id = self.require_assignment(assignment_id).await?.course_id;

        let _course_guard = self.course_locks().lock(&course_id).await;
        let current = self.require_assignment(assignment_id).await?;
        let prospective = patch.merge_into(&current);

        let formula = self
            .store()
            .get_formula(&course_id)
            .await
            .map_err(|err| GradingError::internal(err, "Failed to load grading formula"))?;
        let existing = self.course_assignments(&course_id).await?;
        assignment_gate::check_update(formula.as_ref(), &prospective, &existing)?;

        let updated = self
            .store()
            .update_assignment(&prospective)
            .await
            .map_err(|err| GradingError::internal(err, "Failed to update assignment"))?;
        tracing::info!(course_id = %course_id, assignment_id, "Assignment updated");
        Ok(updated)
    }

    /// Adds a numbered variant to an exam. Task points must add up to the exam's
    /// `max_points`.
    pub async fn add_exam_variant(
        &self,
        assignment_id: &str,
        draft: ExamVariantDraft,
    ) -> Result<ExamVariant, GradingError> {
        draft.validate()?;
        let course_id = self.require_assignment(assignment_id).await?.course_id;

        let _course_guard = self.course_locks().lock(&course_id).await;
        let exam = self.require_assignment(assignment_id).await?;
        if exam.kind != AssignmentType::Exam {
            return Err(GradingError::InvalidInput(
                "variants can only be added to exam assignments".to_string(),
            ));
        }
        let total = draft.total_points();
        if total != i64::from(exam.max_points) {
            return Err(GradingError::InvalidInput(format!(
                "variant tasks must add up to {} points, got {total}",
                exam.max_points
            )));
        }

        let variant_number = draft.variant_number;
        let variant = self
            .store()
            .create_exam_variant(NewExamVariant {
                assignment_id: exam.id.clone(),
                variant_number,
                tasks: draft.into_tasks(),
            })
            .await
            .map_err(|err| GradingError::internal(err, "Failed to create exam variant"))?;
        tracing::info!(assignment_id, variant_number, "Exam variant added");
        Ok(variant)
    }

    pub async fn exam_variants(
        &self,
        assignment_id: &str,
    ) -> Result<Vec<ExamVariant>, GradingError> {
        self.require_assignment(assignment_id).await?;
        self.store()
            .list_exam_variants(assignment_id)
            .await
            .map_err(|err| GradingError::internal(err, "Failed to list exam variants"))
    }

    pub(crate) async fn require_assignment(
        &self,
        assignment_id: &str,
    ) -> Result<Assignment, GradingError> {
        self.store()
            .get_assignment(assignment_id)
            .await
            .map_err(|err| GradingError::internal(err, "Failed to load assignment"))?
            .ok_or_else(|| GradingError::not_found("assignment", assignment_id))
    }

    async fn course_assignments(&self, course_id: &str) -> Result<Vec<Assignment>, GradingError> {
        self.store()
            .list_assignments_by_course(course_id)
            .await
            .map_err(|err| GradingError::internal(err, "Failed to list assignments"))
    }

    async fn gate_new(&self, course_id: &str, draft: &AssignmentDraft) -> Result<(), GradingError> {
        let formula = self
            .store()
            .get_formula(course_id)
            .await
            .map_err(|err| GradingError::internal(err, "Failed to load grading formula"))?;
        let existing = self.course_assignments(course_id).await?;
        assignment_gate::check_create(formula.as_ref(), draft.kind, draft.max_points, &existing)
            .map_err(|rejection| {
                tracing::info!(course_id, reason = %rejection, "Assignment rejected");
                GradingError::from(rejection)
            })
    }
}
