use validator::Validate;

use crate::core::state::GradingEngine;
use crate::db::models::{Course, NewCourse, NewStudent, Student};
use crate::errors::GradingError;
use crate::schemas::course::{CourseDraft, StudentDraft};

impl GradingEngine {
    pub async fn create_course(&self, draft: &CourseDraft) -> Result<Course, GradingError> {
        let draft = draft.normalized();
        draft.validate()?;
        let course = self
            .store()
            .create_course(NewCourse { code: &draft.code, name: &draft.name })
            .await
            .map_err(|err| GradingError::internal(err, "Failed to create course"))?;
        tracing::info!(course_id = %course.id, code = %course.code, "Course created");
        Ok(course)
    }

    pub async fn create_student(&self, draft: &StudentDraft) -> Result<Student, GradingError> {
        let draft = draft.normalized();
        draft.validate()?;
        self.store()
            .create_student(NewStudent { name: &draft.name, email: &draft.email })
            .await
            .map_err(|err| GradingError::internal(err, "Failed to create student"))
    }

    /// Returns `false` when the student was already enrolled.
    pub async fn enroll(&self, course_id: &str, student_id: &str) -> Result<bool, GradingError> {
        self.require_course(course_id).await?;
        self.require_student(student_id).await?;
        let added = self
            .store()
            .enroll(course_id, student_id)
            .await
            .map_err(|err| GradingError::internal(err, "Failed to enroll student"))?;
        if added {
            tracing::info!(course_id, student_id, "Student enrolled");
        }
        Ok(added)
    }

    /// Existing records of the student stay in place but leave the gradebook.
    pub async fn unenroll(&self, course_id: &str, student_id: &str) -> Result<bool, GradingError> {
        self.require_course(course_id).await?;
        self.store()
            .unenroll(course_id, student_id)
            .await
            .map_err(|err| GradingError::internal(err, "Failed to unenroll student"))
    }

    pub(crate) async fn require_course(&self, course_id: &str) -> Result<Course, GradingError> {
        self.store()
            .get_course(course_id)
            .await
            .map_err(|err| GradingError::internal(err, "Failed to load course"))?
            .ok_or_else(|| GradingError::not_found("course", course_id))
    }

    pub(crate) async fn require_student(&self, student_id: &str) -> Result<Student, GradingError> {
        self.store()
            .get_student(student_id)
            .await
            .map_err(|err| GradingError::internal(err, "Failed to load student"))?
            .ok_or_else(|| GradingError::not_found("student", student_id))
    }
}
