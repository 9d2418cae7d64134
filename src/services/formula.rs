use crate::db::models::FormulaValues;
use crate::errors::FormulaInvalid;

/// Courses are graded on a 100 point scale only.
pub const REQUIRED_TOTAL_POINTS: i32 = 100;

/// Checks `assignment_count * points_per_assignment + exam_points == total_points == 100`.
///
/// Pure arithmetic; range checks on the individual parts belong to the input layer.
pub fn validate_formula(formula: &FormulaValues) -> Result<(), FormulaInvalid> {
    let calculated = i64::from(formula.assignment_count) * i64::from(formula.points_per_assignment)
        + i64::from(formula.exam_points);

    if calculated != i64::from(formula.total_points) {
        return Err(FormulaInvalid::new(format!(
            "{} * {} + {} = {calculated}, which does not match total points {}",
            formula.assignment_count,
            formula.points_per_assignment,
            formula.exam_points,
            formula.total_points
        )));
    }

    if formula.total_points != REQUIRED_TOTAL_POINTS {
        return Err(FormulaInvalid::new(format!(
            "total points must be {REQUIRED_TOTAL_POINTS}, got {}",
            formula.total_points
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn values(count: i32, per: i32, exam: i32, total: i32) -> FormulaValues {
        FormulaValues {
            assignment_count: count,
            points_per_assignment: per,
            exam_points: exam,
            total_points: total,
            description: None,
        }
    }

    #[test]
    fn four_labs_of_ten_and_sixty_exam_points_validate() {
        assert!(validate_formula(&values(4, 10, 60, 100)).is_ok());
    }

    #[test]
    fn overshooting_formula_names_the_sum() {
        let err = validate_formula(&values(4, 15, 60, 100)).expect_err("120 != 100");
        assert!(err.reason.contains("= 120"), "{}", err.reason);
    }

    #[test]
    fn consistent_formula_on_another_scale_is_rejected() {
        let err = validate_formula(&values(2, 10, 30, 50)).expect_err("scale is fixed");
        assert_eq!(err.reason, "total points must be 100, got 50");
    }

    #[test]
    fn exam_only_formula_is_valid() {
        assert!(validate_formula(&values(0, 0, 100, 100)).is_ok());
    }

    proptest! {
        #[test]
        fn validates_exactly_when_parts_sum_to_one_hundred(
            count in 0i32..50,
            per in 0i32..50,
            exam in 0i32..200,
            total in 0i32..200,
        ) {
            let expected = count * per + exam == total && total == 100;
            prop_assert_eq!(validate_formula(&values(count, per, exam, total)).is_ok(), expected);
        }

        #[test]
        fn extreme_parts_never_overflow(
            count in any::<i32>(),
            per in any::<i32>(),
            exam in any::<i32>(),
        ) {
            let _ = validate_formula(&values(count, per, exam, 100));
        }
    }
}
