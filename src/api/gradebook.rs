use crate::core::state::GradingEngine;
use crate::errors::GradingError;
use crate::schemas::gradebook::Gradebook;
use crate::services::gradebook;

impl GradingEngine {
    /// Read-only report over one consistent snapshot of the course.
    pub async fn build_gradebook(&self, course_id: &str) -> Result<Gradebook, GradingError> {
        let snapshot = self
            .store()
            .course_snapshot(course_id)
            .await
            .map_err(|err| GradingError::internal(err, "Failed to load course snapshot"))?
            .ok_or_else(|| GradingError::not_found("course", course_id))?;
        Ok(gradebook::build(&snapshot))
    }
}

#[cfg(test)]
mod tests {
    use time::Duration;

    use crate::errors::GradingError;
    use crate::schemas::gradebook::LetterGrade;
    use crate::test_support;

    #[tokio::test]
    async fn other_courses_do_not_leak_into_totals() {
        let ctx = test_support::context();
        let chem = test_support::course_with_formula(&ctx).await;
        let bio = test_support::course_with_formula_code(&ctx, "BIO201").await;
        let ann = test_support::enrolled_student(&ctx, &chem.id, "ann").await;
        ctx.engine.enroll(&bio.id, &ann.id).await.expect("enroll bio");

        let chem_lab = test_support::lab(&ctx, &chem.id, 1).await;
        let bio_lab = test_support::lab(&ctx, &bio.id, 1).await;
        test_support::submit(&ctx, &chem_lab, &ann, -Duration::hours(1)).await;

        let before = ctx.engine.build_gradebook(&chem.id).await.expect("gradebook");
        test_support::submit(&ctx, &bio_lab, &ann, -Duration::hours(1)).await;
        let after = ctx.engine.build_gradebook(&chem.id).await.expect("gradebook");

        let total = |book: &crate::schemas::gradebook::Gradebook| {
            book.student(&ann.id).map(|row| row.total_points)
        };
        assert_eq!(total(&before), Some(10));
        assert_eq!(total(&after), Some(10));
    }

    #[tokio::test]
    async fn enrolled_student_without_records_gets_f() {
        let ctx = test_support::context();
        let course = test_support::course_with_formula(&ctx).await;
        let bob = test_support::enrolled_student(&ctx, &course.id, "bob").await;

        let book = ctx.engine.build_gradebook(&course.id).await.expect("gradebook");
        let row = book.student(&bob.id).expect("bob row");
        assert_eq!(row.total_points, 0);
        assert_eq!(row.final_grade, LetterGrade::F);
    }

    #[tokio::test]
    async fn unknown_course_is_not_found() {
        let ctx = test_support::context();
        let err = ctx.engine.build_gradebook("missing").await.expect_err("no course");
        assert!(matches!(err, GradingError::NotFound { entity: "course", .. }));
    }
}
