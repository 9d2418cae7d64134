use time::OffsetDateTime;
use validator::Validate;

use crate::core::state::GradingEngine;
use crate::db::models::{Assignment, NewSubmission, Submission};
use crate::errors::GradingError;
use crate::schemas::submission::{GradeDraft, SubmissionDraft};
use crate::services::penalty::{self, PenaltyResult};

impl GradingEngine {
    pub fn compute_penalty(
        &self,
        deadline: OffsetDateTime,
        submitted_at: OffsetDateTime,
        penalty_per_day: i32,
        nominal_points: i32,
    ) -> PenaltyResult {
        penalty::compute_penalty(deadline, submitted_at, penalty_per_day, nominal_points)
    }

    /// Records a student's work at the assignment's full points. A late penalty, if any,
    /// is deducted later by the deadline sweep.
    pub async fn submit_work(&self, draft: &SubmissionDraft) -> Result<Submission, GradingError> {
        draft.validate()?;
        self.create_record(
            &draft.assignment_id,
            &draft.student_id,
            draft.content.clone(),
            None,
            draft.submitted_at,
        )
        .await
    }

    /// Records instructor-entered points for a student's assignment or exam.
    pub async fn record_grade(&self, draft: &GradeDraft) -> Result<Submission, GradingError> {
        draft.validate()?;
        self.create_record(
            &draft.assignment_id,
            &draft.student_id,
            None,
            Some(draft.points),
            draft.submitted_at,
        )
        .await
    }

    /// Replaces the nominal points of an existing record. Lateness and the penalty guard
    /// stay as they are; an already applied penalty is deducted from the new points.
    pub async fn regrade(
        &self,
        submission_id: &str,
        points: i32,
    ) -> Result<Submission, GradingError> {
        let record = self
            .store()
            .get_submission(submission_id)
            .await
            .map_err(|err| GradingError::internal(err, "Failed to load submission"))?
            .ok_or_else(|| GradingError::not_found("submission", submission_id))?;
        let assignment = self.require_assignment(&record.assignment_id).await?;
        check_points(&assignment, points)?;

        let updated = self
            .store()
            .update_submission_points(submission_id, points)
            .await
            .map_err(|err| GradingError::internal(err, "Failed to update submission points"))?
            .ok_or_else(|| GradingError::not_found("submission", submission_id))?;
        tracing::info!(
            submission_id,
            assignment_id = %assignment.id,
            previous_points = record.points,
            points = updated.points,
            "Submission regraded"
        );
        Ok(updated)
    }

    async fn create_record(
        &self,
        assignment_id: &str,
        student_id: &str,
        content: Option<String>,
        points: Option<i32>,
        submitted_at: Option<OffsetDateTime>,
    ) -> Result<Submission, GradingError> {
        let assignment = self.require_assignment(assignment_id).await?;
        self.require_student(student_id).await?;

        let enrolled = self
            .store()
            .is_enrolled(&assignment.course_id, student_id)
            .await
            .map_err(|err| GradingError::internal(err, "Failed to check enrollment"))?;
        if !enrolled {
            return Err(GradingError::NotEnrolled {
                student_id: student_id.to_string(),
                course_id: assignment.course_id,
            });
        }

        let points = points.unwrap_or(assignment.max_points);
        check_points(&assignment, points)?;
        let submitted_at = submitted_at.unwrap_or_else(OffsetDateTime::now_utc);
        let is_late = submitted_at > assignment.deadline;

        let record = self
            .store()
            .create_submission(NewSubmission {
                student_id: student_id.to_string(),
                assignment_id: assignment.id.clone(),
                content,
                points,
                submitted_at,
                is_late,
            })
            .await
            .map_err(|err| GradingError::internal(err, "Failed to create submission"))?;
        tracing::info!(
            submission_id = %record.id,
            assignment_id = %assignment.id,
            student_id,
            points,
            is_late,
            "Submission recorded"
        );
        Ok(record)
    }
}

fn check_points(assignment: &Assignment, points: i32) -> Result<(), GradingError> {
    if (0..=assignment.max_points).contains(&points) {
        Ok(())
    } else {
        Err(GradingError::InvalidInput(format!(
            "points must be between 0 and {}, got {points}",
            assignment.max_points
        )))
    }
}
