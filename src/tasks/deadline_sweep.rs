//! Recurring pass over every assignment: reminders for deadlines in the next 24 hours and
//! the one-time late penalty for records submitted after a passed deadline.
//!
//! The sweep keeps no state between runs besides the per-record `penalty_applied` flag,
//! so an interrupted run can simply be repeated.

use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use time::OffsetDateTime;

use crate::core::state::GradingEngine;
use crate::db::models::{Assignment, PenaltyWrite, Student, Submission};
use crate::errors::GradingError;
use crate::schemas::sweep::{SweepReport, SweepScope};
use crate::services::notifications::{Contact, NotifyError};
use crate::services::penalty::{compute_penalty, PenaltyResult};

const REMINDER_WINDOW: time::Duration = time::Duration::hours(24);

struct AppliedPenalty {
    student_id: String,
    result: PenaltyResult,
}

pub async fn run(
    engine: &GradingEngine,
    now: OffsetDateTime,
    scope: SweepScope,
) -> Result<SweepReport, GradingError> {
    let _running = engine.sweep_lock().lock().await;
    metrics::counter!("sweep_runs_total", "scope" => scope.as_str()).increment(1);
    tracing::info!(scope = scope.as_str(), "Deadline sweep started");

    let assignments = engine
        .store()
        .list_all_assignments()
        .await
        .map_err(|err| GradingError::internal(err, "Failed to list assignments for sweep"))?;

    let mut report = SweepReport::default();
    for assignment in &assignments {
        report.assignments_scanned += 1;

        let due_soon = now < assignment.deadline && assignment.deadline < now + REMINDER_WINDOW;
        if scope.reminders() && due_soon {
            send_reminders(engine, assignment, &mut report).await?;
        }

        if scope.penalties() && assignment.deadline < now && assignment.penalty_per_day > 0 {
            apply_penalties(engine, assignment, &mut report).await?;
        }
    }

    metrics::counter!("sweep_reminders_sent_total").increment(report.reminders_sent as u64);
    metrics::counter!("sweep_penalties_applied_total").increment(report.penalties_applied as u64);
    metrics::counter!("sweep_notification_failures_total")
        .increment(report.notification_failures as u64);

    tracing::info!(
        scope = scope.as_str(),
        assignments_scanned = report.assignments_scanned,
        reminders_sent = report.reminders_sent,
        penalties_applied = report.penalties_applied,
        notification_failures = report.notification_failures,
        "Deadline sweep finished"
    );

    Ok(report)
}

async fn send_reminders(
    engine: &GradingEngine,
    assignment: &Assignment,
    report: &mut SweepReport,
) -> Result<(), GradingError> {
    let store = engine.store();
    let students = store
        .list_enrolled_students(&assignment.course_id)
        .await
        .map_err(|err| GradingError::internal(err, "Failed to list enrolled students"))?;
    let submitted: HashSet<String> = store
        .list_submissions_by_assignment(&assignment.id)
        .await
        .map_err(|err| GradingError::internal(err, "Failed to list submissions"))?
        .into_iter()
        .map(|record| record.student_id)
        .collect();

    for student in students.iter().filter(|student| !submitted.contains(&student.id)) {
        let recipient = contact(student);
        let sent = deliver(
            engine.options().notify_timeout,
            engine.notifier().send_reminder(&recipient, &assignment.title, assignment.deadline),
        )
        .await;

        match sent {
            Ok(()) => report.reminders_sent += 1,
            Err(err) => {
                report.notification_failures += 1;
                tracing::warn!(
                    assignment_id = %assignment.id,
                    student_id = %student.id,
                    error = %err,
                    "Failed to send deadline reminder"
                );
            }
        }
    }

    Ok(())
}

async fn apply_penalties(
    engine: &GradingEngine,
    assignment: &Assignment,
    report: &mut SweepReport,
) -> Result<(), GradingError> {
    let records = engine
        .store()
        .list_submissions_by_assignment(&assignment.id)
        .await
        .map_err(|err| GradingError::internal(err, "Failed to list submissions"))?;

    // Lateness is fixed when the record is created; a deadline moved earlier afterwards
    // does not turn an on-time record into a penalized one.
    let pending = records.into_iter().filter(|record| {
        !record.penalty_applied && record.is_late && record.submitted_at > assignment.deadline
    });

    for record in pending {
        let Some(applied) = apply_record_penalty(engine, assignment, record).await? else {
            continue;
        };
        if applied.result.penalty_points == 0 {
            continue;
        }
        report.penalties_applied += 1;
        notify_late(engine, assignment, &applied, report).await?;
    }

    Ok(())
}

/// Applies the penalty to one record through the store's compare-and-set. When a regrade
/// changed the points in between, the record is re-read and the penalty recomputed from
/// the fresh points. Returns `None` when the guard was already set by someone else.
async fn apply_record_penalty(
    engine: &GradingEngine,
    assignment: &Assignment,
    record: Submission,
) -> Result<Option<AppliedPenalty>, GradingError> {
    let store = engine.store();
    let mut current = record;

    for _ in 0..engine.options().penalty_write_attempts.max(1) {
        let result = compute_penalty(
            assignment.deadline,
            current.submitted_at,
            assignment.penalty_per_day,
            current.points,
        );
        let write = PenaltyWrite {
            expected_points: current.points,
            points: result.final_points,
            penalty_points: result.penalty_points,
        };

        let applied = store
            .apply_penalty(&current.id, write)
            .await
            .map_err(|err| GradingError::internal(err, "Failed to apply late penalty"))?;
        if applied {
            tracing::info!(
                assignment_id = %assignment.id,
                submission_id = %current.id,
                student_id = %current.student_id,
                days_late = result.days_late,
                penalty_points = result.penalty_points,
                final_points = result.final_points,
                "Late penalty applied"
            );
            return Ok(Some(AppliedPenalty { student_id: current.student_id, result }));
        }

        match store
            .get_submission(&current.id)
            .await
            .map_err(|err| GradingError::internal(err, "Failed to reload submission"))?
        {
            Some(fresh) if !fresh.penalty_applied => current = fresh,
            _ => return Ok(None),
        }
    }

    tracing::warn!(
        assignment_id = %assignment.id,
        submission_id = %current.id,
        "Gave up applying late penalty after concurrent updates; next sweep retries"
    );
    Ok(None)
}

async fn notify_late(
    engine: &GradingEngine,
    assignment: &Assignment,
    applied: &AppliedPenalty,
    report: &mut SweepReport,
) -> Result<(), GradingError> {
    let student_id = applied.student_id.as_str();
    let student = engine
        .store()
        .get_student(student_id)
        .await
        .map_err(|err| GradingError::internal(err, "Failed to load student"))?;
    let Some(student) = student else {
        tracing::warn!(student_id, "Penalized record has no student; notice skipped");
        return Ok(());
    };

    let sent = deliver(
        engine.options().notify_timeout,
        engine.notifier().send_penalty_notice(
            &contact(&student),
            &assignment.title,
            applied.result.penalty_points,
        ),
    )
    .await;

    if let Err(err) = sent {
        report.notification_failures += 1;
        tracing::warn!(
            assignment_id = %assignment.id,
            student_id = %student.id,
            error = %err,
            "Failed to send late submission notice"
        );
    }
    Ok(())
}

async fn deliver<F>(limit: Duration, send: F) -> Result<(), NotifyError>
where
    F: Future<Output = Result<(), NotifyError>>,
{
    match tokio::time::timeout(limit, send).await {
        Ok(result) => result,
        Err(_) => Err(NotifyError::TimedOut(limit)),
    }
}

fn contact(student: &Student) -> Contact {
    Contact {
        student_id: student.id.clone(),
        name: student.name.clone(),
        email: student.email.clone(),
    }
}
