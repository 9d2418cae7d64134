use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use crate::core::state::{EngineOptions, GradingEngine};
use crate::db::models::{Assignment, Course, Student, Submission};
use crate::db::types::AssignmentType;
use crate::repositories::MemoryStore;
use crate::schemas::assignment::AssignmentDraft;
use crate::schemas::course::{CourseDraft, StudentDraft};
use crate::schemas::formula::FormulaInput;
use crate::schemas::submission::SubmissionDraft;
use crate::services::notifications::{Contact, NotificationSender, NotifyError};

/// Reference instant for fixtures; assignment deadlines are whole days after it.
pub(crate) const NOW: OffsetDateTime = datetime!(2025-03-01 12:00 UTC);

pub(crate) struct TestContext {
    pub(crate) engine: GradingEngine,
    pub(crate) store: Arc<MemoryStore>,
    pub(crate) notifier: Arc<RecordingNotifier>,
}

pub(crate) fn context() -> TestContext {
    context_with_options(EngineOptions::default())
}

pub(crate) fn context_with_options(options: EngineOptions) -> TestContext {
    let store = Arc::new(MemoryStore::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let engine = GradingEngine::new(store.clone(), notifier.clone(), options);
    TestContext { engine, store, notifier }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Notice {
    Reminder { email: String, title: String, deadline: OffsetDateTime },
    Penalty { email: String, title: String, penalty_points: i32 },
}

/// Keeps every notice in memory. Emails in `failing` get an error, emails in `stalled`
/// never get an answer.
#[derive(Default)]
pub(crate) struct RecordingNotifier {
    sent: Mutex<Vec<Notice>>,
    failing: Mutex<HashSet<String>>,
    stalled: Mutex<HashSet<String>>,
}

impl RecordingNotifier {
    pub(crate) fn sent(&self) -> Vec<Notice> {
        self.sent.lock().expect("notifier lock").clone()
    }

    pub(crate) fn fail_for(&self, email: &str) {
        self.failing.lock().expect("notifier lock").insert(email.to_string());
    }

    pub(crate) fn stall_for(&self, email: &str) {
        self.stalled.lock().expect("notifier lock").insert(email.to_string());
    }

    async fn deliver(&self, email: &str, notice: Notice) -> Result<(), NotifyError> {
        let stalled = self.stalled.lock().expect("notifier lock").contains(email);
        if stalled {
            tokio::time::sleep(StdDuration::from_secs(3600)).await;
        }
        if self.failing.lock().expect("notifier lock").contains(email) {
            return Err(NotifyError::Other(format!("mailbox {email} unavailable")));
        }
        self.sent.lock().expect("notifier lock").push(notice);
        Ok(())
    }
}

#[async_trait]
impl NotificationSender for RecordingNotifier {
    async fn send_reminder(
        &self,
        contact: &Contact,
        assignment_title: &str,
        deadline: OffsetDateTime,
    ) -> Result<(), NotifyError> {
        let notice = Notice::Reminder {
            email: contact.email.clone(),
            title: assignment_title.to_string(),
            deadline,
        };
        self.deliver(&contact.email, notice).await
    }

    async fn send_penalty_notice(
        &self,
        contact: &Contact,
        assignment_title: &str,
        penalty_points: i32,
    ) -> Result<(), NotifyError> {
        let notice = Notice::Penalty {
            email: contact.email.clone(),
            title: assignment_title.to_string(),
            penalty_points,
        };
        self.deliver(&contact.email, notice).await
    }
}

pub(crate) fn draft(kind: AssignmentType, max_points: i32, day: i64) -> AssignmentDraft {
    AssignmentDraft {
        title: format!("{} due day {day}", kind.label()),
        description: None,
        kind,
        max_points,
        deadline: NOW + Duration::days(day),
        penalty_per_day: 0,
    }
}

pub(crate) async fn course(ctx: &TestContext) -> Course {
    let draft = CourseDraft { code: "CHEM101".to_string(), name: "General Chemistry".to_string() };
    ctx.engine.create_course(&draft).await.expect("create course")
}

/// A course with four 10 point labs and a 60 point exam.
pub(crate) async fn course_with_formula(ctx: &TestContext) -> Course {
    course_with_formula_code(ctx, "CHEM101").await
}

pub(crate) async fn course_with_formula_code(ctx: &TestContext, code: &str) -> Course {
    let draft = CourseDraft { code: code.to_string(), name: format!("{code} course") };
    let course = ctx.engine.create_course(&draft).await.expect("create course");
    ctx.engine.set_formula(&course.id, &FormulaInput::new(4, 10, 60)).await.expect("set formula");
    course
}

pub(crate) async fn student(ctx: &TestContext, name: &str) -> Student {
    let draft = StudentDraft { name: name.to_string(), email: format!("{name}@uni.test") };
    ctx.engine.create_student(&draft).await.expect("create student")
}

pub(crate) async fn enrolled_student(ctx: &TestContext, course_id: &str, name: &str) -> Student {
    let student = student(ctx, name).await;
    ctx.engine.enroll(course_id, &student.id).await.expect("enroll");
    student
}

pub(crate) async fn lab(ctx: &TestContext, course_id: &str, day: i64) -> Assignment {
    lab_with_penalty(ctx, course_id, day, 0).await
}

pub(crate) async fn lab_with_penalty(
    ctx: &TestContext,
    course_id: &str,
    day: i64,
    penalty_per_day: i32,
) -> Assignment {
    let draft = AssignmentDraft { penalty_per_day, ..draft(AssignmentType::Lab, 10, day) };
    ctx.engine.create_assignment(course_id, &draft).await.expect("create lab")
}

/// Submits at `assignment.deadline + offset`.
pub(crate) async fn submit(
    ctx: &TestContext,
    assignment: &Assignment,
    student: &Student,
    offset: Duration,
) -> Submission {
    let draft = SubmissionDraft {
        assignment_id: assignment.id.clone(),
        student_id: student.id.clone(),
        content: None,
        submitted_at: Some(assignment.deadline + offset),
    };
    ctx.engine.submit_work(&draft).await.expect("submit work")
}
