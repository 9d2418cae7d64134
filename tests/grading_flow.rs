use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};
use unigrade::db::types::AssignmentType;
use unigrade::schemas::{
    AssignmentDraft, CourseDraft, FormulaInput, GradeDraft, LetterGrade, StudentDraft,
    SubmissionDraft, SweepScope,
};
use unigrade::services::notifications::{Contact, NotificationSender, NotifyError};
use unigrade::{EngineOptions, GradingEngine, GradingError, MemoryStore, Rejection};

#[derive(Default)]
struct Outbox {
    messages: Mutex<Vec<String>>,
}

#[async_trait]
impl NotificationSender for Outbox {
    async fn send_reminder(
        &self,
        contact: &Contact,
        assignment_title: &str,
        _deadline: OffsetDateTime,
    ) -> Result<(), NotifyError> {
        self.messages.lock().unwrap().push(format!("remind {} {assignment_title}", contact.email));
        Ok(())
    }

    async fn send_penalty_notice(
        &self,
        contact: &Contact,
        assignment_title: &str,
        penalty_points: i32,
    ) -> Result<(), NotifyError> {
        self.messages
            .lock()
            .unwrap()
            .push(format!("late {} {assignment_title} -{penalty_points}", contact.email));
        Ok(())
    }
}

const TERM_START: OffsetDateTime = datetime!(2025-02-03 09:00 UTC);

fn assignment(title: &str, kind: AssignmentType, max_points: i32, week: i64) -> AssignmentDraft {
    AssignmentDraft {
        title: title.to_string(),
        description: None,
        kind,
        max_points,
        deadline: TERM_START + Duration::weeks(week),
        penalty_per_day: if kind == AssignmentType::Lab { 2 } else { 0 },
    }
}

#[tokio::test]
async fn course_from_formula_to_gradebook() -> anyhow::Result<()> {
    let outbox = Arc::new(Outbox::default());
    let engine = GradingEngine::new(
        Arc::new(MemoryStore::default()),
        outbox.clone(),
        EngineOptions::default(),
    );

    let course = engine
        .create_course(&CourseDraft { code: "CHEM101".into(), name: "General Chemistry".into() })
        .await?;

    let premature = engine
        .create_assignment(&course.id, &assignment("Lab 1", AssignmentType::Lab, 10, 1))
        .await;
    assert!(matches!(
        premature,
        Err(GradingError::AssignmentRejected(Rejection::FormulaMissing))
    ));

    let bad = FormulaInput::new(4, 15, 60);
    assert!(engine.validate_formula(&bad).is_err());
    engine.set_formula(&course.id, &FormulaInput::new(4, 10, 60)).await?;

    let mut labs = Vec::new();
    for week in 1..=4 {
        let draft = assignment(&format!("Lab {week}"), AssignmentType::Lab, 10, week);
        labs.push(engine.create_assignment(&course.id, &draft).await?);
    }
    let fifth = engine
        .create_assignment(&course.id, &assignment("Lab 5", AssignmentType::Lab, 10, 5))
        .await;
    assert!(matches!(
        fifth,
        Err(GradingError::AssignmentRejected(Rejection::LabLimitExceeded { max: 4 }))
    ));
    let exam = engine
        .create_assignment(&course.id, &assignment("Final", AssignmentType::Exam, 60, 8))
        .await?;

    let ann = engine
        .create_student(&StudentDraft { name: "Ann".into(), email: "ann@uni.test".into() })
        .await?;
    let bob = engine
        .create_student(&StudentDraft { name: "Bob".into(), email: "bob@uni.test".into() })
        .await?;
    engine.enroll(&course.id, &ann.id).await?;
    engine.enroll(&course.id, &bob.id).await?;

    for lab in &labs {
        engine
            .submit_work(&SubmissionDraft {
                assignment_id: lab.id.clone(),
                student_id: ann.id.clone(),
                content: Some(format!("{} report", lab.title)),
                submitted_at: Some(lab.deadline - Duration::hours(3)),
            })
            .await?;
    }
    // Bob hands in Lab 1 three and a half days late.
    engine
        .submit_work(&SubmissionDraft {
            assignment_id: labs[0].id.clone(),
            student_id: bob.id.clone(),
            content: None,
            submitted_at: Some(labs[0].deadline + Duration::hours(84)),
        })
        .await?;

    let reminder_time = labs[1].deadline - Duration::hours(6);
    let reminders = engine.run_sweep(reminder_time, SweepScope::RemindersOnly).await?;
    assert_eq!(reminders.reminders_sent, 1);

    let after_term = exam.deadline + Duration::days(1);
    let first = engine.run_deadline_sweep(after_term).await?;
    assert_eq!(first.penalties_applied, 1);
    let second = engine.run_deadline_sweep(after_term).await?;
    assert_eq!(second.penalties_applied, 0);

    engine
        .record_grade(&GradeDraft {
            assignment_id: exam.id.clone(),
            student_id: ann.id.clone(),
            points: 52,
            submitted_at: Some(exam.deadline - Duration::hours(1)),
        })
        .await?;

    let gradebook = engine.build_gradebook(&course.id).await?;
    let ann_row = gradebook.student(&ann.id).expect("ann");
    assert_eq!(ann_row.total_points, 92);
    assert_eq!(ann_row.final_grade, LetterGrade::A);
    assert_eq!(ann_row.exam_grade.as_ref().map(|grade| grade.points), Some(52));

    let bob_row = gradebook.student(&bob.id).expect("bob");
    assert_eq!(bob_row.total_points, 4);
    assert_eq!(bob_row.assignment_grades[0].penalty_points, 6);
    assert_eq!(bob_row.final_grade, LetterGrade::F);

    let messages = outbox.messages.lock().unwrap().clone();
    assert!(messages.contains(&"remind bob@uni.test Lab 2".to_string()));
    assert!(messages.contains(&"late bob@uni.test Lab 1 -6".to_string()));
    Ok(())
}

#[tokio::test]
async fn penalty_arithmetic_is_exposed_on_the_engine() {
    let engine = GradingEngine::new(
        Arc::new(MemoryStore::default()),
        Arc::new(Outbox::default()),
        EngineOptions::default(),
    );
    let deadline = datetime!(2025-05-01 23:59 UTC);

    let late = engine.compute_penalty(deadline, deadline + Duration::hours(36), 5, 20);
    assert_eq!((late.days_late, late.penalty_points, late.final_points), (1, 5, 15));

    let floored = engine.compute_penalty(deadline, deadline + Duration::hours(36), 5, 3);
    assert_eq!(floored.final_points, 0);
}
