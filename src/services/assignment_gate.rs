use crate::db::models::{Assignment, GradingFormula};
use crate::db::types::AssignmentType;
use crate::errors::Rejection;

/// Authorizes a new assignment of `kind` worth `max_points` against the course formula
/// and the assignments the course already has. Never mutates anything.
///
/// Labs are capped at `assignment_count` and must be worth exactly
/// `points_per_assignment`; a course has at most one exam worth exactly `exam_points`.
pub fn check_create(
    formula: Option<&GradingFormula>,
    kind: AssignmentType,
    max_points: i32,
    existing: &[Assignment],
) -> Result<(), Rejection> {
    let formula = formula.ok_or(Rejection::FormulaMissing)?;

    match kind {
        AssignmentType::Lab => {
            let labs = existing.iter().filter(|item| item.kind == AssignmentType::Lab).count();
            let max = formula.assignment_count;
            if labs as i64 >= i64::from(max) {
                return Err(Rejection::LabLimitExceeded { max });
            }
            if max_points != formula.points_per_assignment {
                return Err(Rejection::PointsMismatch {
                    kind,
                    expected: formula.points_per_assignment,
                    actual: max_points,
                });
            }
        }
        AssignmentType::Exam => {
            if existing.iter().any(|item| item.kind == AssignmentType::Exam) {
                return Err(Rejection::DuplicateExam);
            }
            if max_points != formula.exam_points {
                return Err(Rejection::PointsMismatch {
                    kind,
                    expected: formula.exam_points,
                    actual: max_points,
                });
            }
        }
    }

    Ok(())
}

/// Same rules for an edit: the assignment being changed does not count against itself.
pub fn check_update(
    formula: Option<&GradingFormula>,
    prospective: &Assignment,
    existing: &[Assignment],
) -> Result<(), Rejection> {
    let others: Vec<Assignment> =
        existing.iter().filter(|item| item.id != prospective.id).cloned().collect();
    check_create(formula, prospective.kind, prospective.max_points, &others)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn formula() -> GradingFormula {
        GradingFormula {
            course_id: "c1".to_string(),
            assignment_count: 2,
            points_per_assignment: 20,
            exam_points: 60,
            total_points: 100,
            description: None,
            updated_at: datetime!(2025-01-01 0:00 UTC),
        }
    }

    fn assignment(id: &str, kind: AssignmentType, max_points: i32) -> Assignment {
        Assignment {
            id: id.to_string(),
            course_id: "c1".to_string(),
            title: id.to_string(),
            description: None,
            kind,
            max_points,
            deadline: datetime!(2025-03-01 12:00 UTC),
            penalty_per_day: 0,
            created_at: datetime!(2025-01-02 0:00 UTC),
        }
    }

    #[test]
    fn missing_formula_blocks_everything() {
        assert_eq!(
            check_create(None, AssignmentType::Lab, 20, &[]),
            Err(Rejection::FormulaMissing)
        );
        assert_eq!(
            check_create(None, AssignmentType::Exam, 60, &[]),
            Err(Rejection::FormulaMissing)
        );
    }

    #[test]
    fn labs_up_to_the_count_are_accepted() {
        let formula = formula();
        let existing = vec![assignment("lab-1", AssignmentType::Lab, 20)];
        assert_eq!(check_create(Some(&formula), AssignmentType::Lab, 20, &existing), Ok(()));

        let existing = vec![
            assignment("lab-1", AssignmentType::Lab, 20),
            assignment("lab-2", AssignmentType::Lab, 20),
        ];
        assert_eq!(
            check_create(Some(&formula), AssignmentType::Lab, 20, &existing),
            Err(Rejection::LabLimitExceeded { max: 2 })
        );
    }

    #[test]
    fn exam_does_not_count_toward_lab_limit() {
        let formula = formula();
        let existing = vec![
            assignment("lab-1", AssignmentType::Lab, 20),
            assignment("exam", AssignmentType::Exam, 60),
        ];
        assert_eq!(check_create(Some(&formula), AssignmentType::Lab, 20, &existing), Ok(()));
    }

    #[test]
    fn lab_points_must_match_exactly() {
        assert_eq!(
            check_create(Some(&formula()), AssignmentType::Lab, 15, &[]),
            Err(Rejection::PointsMismatch { kind: AssignmentType::Lab, expected: 20, actual: 15 })
        );
    }

    #[test]
    fn second_exam_is_rejected() {
        let formula = formula();
        let existing = vec![assignment("exam", AssignmentType::Exam, 60)];
        assert_eq!(
            check_create(Some(&formula), AssignmentType::Exam, 60, &existing),
            Err(Rejection::DuplicateExam)
        );
    }

    #[test]
    fn exam_points_must_match_formula() {
        assert_eq!(
            check_create(Some(&formula()), AssignmentType::Exam, 50, &[]),
            Err(Rejection::PointsMismatch { kind: AssignmentType::Exam, expected: 60, actual: 50 })
        );
    }

    #[test]
    fn zero_lab_formula_rejects_first_lab() {
        let mut formula = formula();
        formula.assignment_count = 0;
        assert_eq!(
            check_create(Some(&formula), AssignmentType::Lab, 20, &[]),
            Err(Rejection::LabLimitExceeded { max: 0 })
        );
    }

    #[test]
    fn update_excludes_the_edited_assignment() {
        let formula = formula();
        let existing = vec![
            assignment("lab-1", AssignmentType::Lab, 20),
            assignment("lab-2", AssignmentType::Lab, 20),
        ];
        let mut edited = existing[1].clone();
        edited.title = "renamed".to_string();
        assert_eq!(check_update(Some(&formula), &edited, &existing), Ok(()));

        edited.max_points = 25;
        assert_eq!(
            check_update(Some(&formula), &edited, &existing),
            Err(Rejection::PointsMismatch { kind: AssignmentType::Lab, expected: 20, actual: 25 })
        );
    }

    #[test]
    fn turning_a_lab_into_a_second_exam_is_rejected() {
        let formula = formula();
        let existing = vec![
            assignment("lab-1", AssignmentType::Lab, 20),
            assignment("exam", AssignmentType::Exam, 60),
        ];
        let mut edited = existing[0].clone();
        edited.kind = AssignmentType::Exam;
        edited.max_points = 60;
        assert_eq!(check_update(Some(&formula), &edited, &existing), Err(Rejection::DuplicateExam));
    }
}
