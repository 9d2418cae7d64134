use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::types::Json;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::models::{
    Assignment, Course, ExamVariant, FormulaValues, GradingFormula, NewAssignment, NewCourse,
    NewExamVariant, NewStudent, NewSubmission, PenaltyWrite, Student, Submission,
};
use crate::errors::StoreError;
use crate::repositories::{
    AssignmentStore, CourseSnapshot, CourseStore, EnrollmentStore, SnapshotStore, StoreResult,
    StudentStore, SubmissionStore,
};

/// In-process stores keyed by id. Every trait call takes the lock once, so each call is
/// atomic with respect to the others.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    courses: HashMap<String, Course>,
    formulas: HashMap<String, GradingFormula>,
    students: HashMap<String, Student>,
    // (course_id, student_id) in enrollment order
    enrollments: Vec<(String, String)>,
    assignments: Vec<Assignment>,
    variants: Vec<ExamVariant>,
    submissions: Vec<Submission>,
}

impl Tables {
    fn enrolled_students(&self, course_id: &str) -> Vec<Student> {
        self.enrollments
            .iter()
            .filter(|(course, _)| course == course_id)
            .filter_map(|(_, student_id)| self.students.get(student_id).cloned())
            .collect()
    }

    fn course_assignments(&self, course_id: &str) -> Vec<Assignment> {
        let mut found: Vec<Assignment> =
            self.assignments.iter().filter(|a| a.course_id == course_id).cloned().collect();
        found.sort_by_key(|a| a.deadline);
        found
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

#[async_trait]
impl CourseStore for MemoryStore {
    async fn create_course(&self, course: NewCourse<'_>) -> StoreResult<Course> {
        let mut tables = self.tables.write().await;
        if tables.courses.values().any(|existing| existing.code == course.code) {
            return Err(StoreError::Conflict(format!(
                "course code {} is already taken",
                course.code
            )));
        }

        let created = Course {
            id: new_id(),
            code: course.code.to_string(),
            name: course.name.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        tables.courses.insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn get_course(&self, course_id: &str) -> StoreResult<Option<Course>> {
        Ok(self.tables.read().await.courses.get(course_id).cloned())
    }

    async fn get_formula(&self, course_id: &str) -> StoreResult<Option<GradingFormula>> {
        Ok(self.tables.read().await.formulas.get(course_id).cloned())
    }

    async fn set_formula(
        &self,
        course_id: &str,
        formula: FormulaValues,
    ) -> StoreResult<GradingFormula> {
        let stored = GradingFormula {
            course_id: course_id.to_string(),
            assignment_count: formula.assignment_count,
            points_per_assignment: formula.points_per_assignment,
            exam_points: formula.exam_points,
            total_points: formula.total_points,
            description: formula.description,
            updated_at: OffsetDateTime::now_utc(),
        };
        self.tables.write().await.formulas.insert(course_id.to_string(), stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl AssignmentStore for MemoryStore {
    async fn list_assignments_by_course(&self, course_id: &str) -> StoreResult<Vec<Assignment>> {
        Ok(self.tables.read().await.course_assignments(course_id))
    }

    async fn list_all_assignments(&self) -> StoreResult<Vec<Assignment>> {
        let mut all = self.tables.read().await.assignments.clone();
        all.sort_by_key(|a| a.deadline);
        Ok(all)
    }

    async fn get_assignment(&self, assignment_id: &str) -> StoreResult<Option<Assignment>> {
        let tables = self.tables.read().await;
        Ok(tables.assignments.iter().find(|a| a.id == assignment_id).cloned())
    }

    async fn create_assignment(&self, assignment: NewAssignment) -> StoreResult<Assignment> {
        let created = Assignment {
            id: new_id(),
            course_id: assignment.course_id,
            title: assignment.title,
            description: assignment.description,
            kind: assignment.kind,
            max_points: assignment.max_points,
            deadline: assignment.deadline,
            penalty_per_day: assignment.penalty_per_day,
            created_at: OffsetDateTime::now_utc(),
        };
        self.tables.write().await.assignments.push(created.clone());
        Ok(created)
    }

    async fn update_assignment(&self, assignment: &Assignment) -> StoreResult<Assignment> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .assignments
            .iter_mut()
            .find(|a| a.id == assignment.id)
            .ok_or(StoreError::Database(sqlx::Error::RowNotFound))?;
        *slot = Assignment { created_at: slot.created_at, ..assignment.clone() };
        Ok(slot.clone())
    }

    async fn list_exam_variants(&self, assignment_id: &str) -> StoreResult<Vec<ExamVariant>> {
        let tables = self.tables.read().await;
        let mut found: Vec<ExamVariant> =
            tables.variants.iter().filter(|v| v.assignment_id == assignment_id).cloned().collect();
        found.sort_by_key(|v| v.variant_number);
        Ok(found)
    }

    async fn create_exam_variant(&self, variant: NewExamVariant) -> StoreResult<ExamVariant> {
        let mut tables = self.tables.write().await;
        let taken = tables.variants.iter().any(|v| {
            v.assignment_id == variant.assignment_id && v.variant_number == variant.variant_number
        });
        if taken {
            return Err(StoreError::Conflict(format!(
                "variant {} already exists",
                variant.variant_number
            )));
        }

        let created = ExamVariant {
            id: new_id(),
            assignment_id: variant.assignment_id,
            variant_number: variant.variant_number,
            tasks: Json(variant.tasks),
            created_at: OffsetDateTime::now_utc(),
        };
        tables.variants.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn list_submissions_by_assignment(
        &self,
        assignment_id: &str,
    ) -> StoreResult<Vec<Submission>> {
        let tables = self.tables.read().await;
        Ok(tables.submissions.iter().filter(|s| s.assignment_id == assignment_id).cloned().collect())
    }

    async fn list_submissions_by_student(&self, student_id: &str) -> StoreResult<Vec<Submission>> {
        let tables = self.tables.read().await;
        Ok(tables.submissions.iter().filter(|s| s.student_id == student_id).cloned().collect())
    }

    async fn get_submission(&self, submission_id: &str) -> StoreResult<Option<Submission>> {
        let tables = self.tables.read().await;
        Ok(tables.submissions.iter().find(|s| s.id == submission_id).cloned())
    }

    async fn create_submission(&self, submission: NewSubmission) -> StoreResult<Submission> {
        let mut tables = self.tables.write().await;
        let duplicate = tables.submissions.iter().any(|s| {
            s.student_id == submission.student_id && s.assignment_id == submission.assignment_id
        });
        if duplicate {
            return Err(StoreError::Conflict(
                "student already has a record for this assignment".to_string(),
            ));
        }

        let created = Submission {
            id: new_id(),
            student_id: submission.student_id,
            assignment_id: submission.assignment_id,
            content: submission.content,
            points: submission.points,
            submitted_at: submission.submitted_at,
            is_late: submission.is_late,
            penalty_points: 0,
            penalty_applied: false,
        };
        tables.submissions.push(created.clone());
        Ok(created)
    }

    async fn update_submission_points(
        &self,
        submission_id: &str,
        points: i32,
    ) -> StoreResult<Option<Submission>> {
        let mut tables = self.tables.write().await;
        Ok(tables.submissions.iter_mut().find(|s| s.id == submission_id).map(|record| {
            record.points = if record.penalty_applied {
                points.saturating_sub(record.penalty_points).max(0)
            } else {
                points
            };
            record.clone()
        }))
    }

    async fn apply_penalty(&self, submission_id: &str, write: PenaltyWrite) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let Some(record) = tables.submissions.iter_mut().find(|s| s.id == submission_id) else {
            return Ok(false);
        };
        if record.penalty_applied || record.points != write.expected_points {
            return Ok(false);
        }

        record.points = write.points;
        record.penalty_points = write.penalty_points;
        record.penalty_applied = true;
        Ok(true)
    }
}

#[async_trait]
impl EnrollmentStore for MemoryStore {
    async fn enroll(&self, course_id: &str, student_id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let exists = tables
            .enrollments
            .iter()
            .any(|(course, student)| course == course_id && student == student_id);
        if exists {
            return Ok(false);
        }
        tables.enrollments.push((course_id.to_string(), student_id.to_string()));
        Ok(true)
    }

    async fn unenroll(&self, course_id: &str, student_id: &str) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.enrollments.len();
        tables.enrollments.retain(|(course, student)| !(course == course_id && student == student_id));
        Ok(tables.enrollments.len() != before)
    }

    async fn list_enrolled_students(&self, course_id: &str) -> StoreResult<Vec<Student>> {
        Ok(self.tables.read().await.enrolled_students(course_id))
    }

    async fn is_enrolled(&self, course_id: &str, student_id: &str) -> StoreResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables
            .enrollments
            .iter()
            .any(|(course, student)| course == course_id && student == student_id))
    }
}

#[async_trait]
impl StudentStore for MemoryStore {
    async fn create_student(&self, student: NewStudent<'_>) -> StoreResult<Student> {
        let mut tables = self.tables.write().await;
        if tables.students.values().any(|existing| existing.email == student.email) {
            return Err(StoreError::Conflict(format!(
                "email {} is already registered",
                student.email
            )));
        }

        let created = Student {
            id: new_id(),
            name: student.name.to_string(),
            email: student.email.to_string(),
        };
        tables.students.insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn get_student(&self, student_id: &str) -> StoreResult<Option<Student>> {
        Ok(self.tables.read().await.students.get(student_id).cloned())
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn course_snapshot(&self, course_id: &str) -> StoreResult<Option<CourseSnapshot>> {
        let tables = self.tables.read().await;
        let Some(course) = tables.courses.get(course_id).cloned() else {
            return Ok(None);
        };

        let assignments = tables.course_assignments(course_id);
        let submissions = tables
            .submissions
            .iter()
            .filter(|s| assignments.iter().any(|a| a.id == s.assignment_id))
            .cloned()
            .collect();

        Ok(Some(CourseSnapshot {
            course,
            students: tables.enrolled_students(course_id),
            assignments,
            submissions,
        }))
    }
}
