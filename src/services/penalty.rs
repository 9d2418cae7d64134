use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PenaltyResult {
    pub is_late: bool,
    pub days_late: i64,
    pub penalty_points: i32,
    pub final_points: i32,
}

/// Late-submission deduction. Lateness is counted in whole days, truncated, so anything
/// under 24 hours past the deadline costs nothing. Final points never drop below zero.
pub fn compute_penalty(
    deadline: OffsetDateTime,
    submitted_at: OffsetDateTime,
    penalty_per_day: i32,
    nominal_points: i32,
) -> PenaltyResult {
    if submitted_at <= deadline {
        return PenaltyResult {
            is_late: false,
            days_late: 0,
            penalty_points: 0,
            final_points: nominal_points,
        };
    }

    let days_late = (submitted_at - deadline).whole_days();
    let penalty = days_late.saturating_mul(i64::from(penalty_per_day)).max(0);
    if penalty == 0 {
        return PenaltyResult {
            is_late: true,
            days_late,
            penalty_points: 0,
            final_points: nominal_points,
        };
    }

    let final_points = (i64::from(nominal_points) - penalty).max(0);
    PenaltyResult {
        is_late: true,
        days_late,
        penalty_points: i32::try_from(penalty).unwrap_or(i32::MAX),
        final_points: i32::try_from(final_points).unwrap_or(i32::MAX),
    }
}
