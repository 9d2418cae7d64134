use std::collections::HashMap;

use crate::db::models::Assignment;
use crate::db::types::AssignmentType;
use crate::repositories::CourseSnapshot;
use crate::schemas::gradebook::{
    AssignmentGrade, ExamGrade, Gradebook, LetterGrade, StudentGrades,
};

pub fn letter_grade(total_points: i64) -> LetterGrade {
    match total_points {
        t if t >= 90 => LetterGrade::A,
        t if t >= 80 => LetterGrade::B,
        t if t >= 70 => LetterGrade::C,
        t if t >= 60 => LetterGrade::D,
        _ => LetterGrade::F,
    }
}

/// Joins one consistent course snapshot into per-student rows. Records of assignments
/// outside the course and of students not enrolled in it are ignored.
pub fn build(snapshot: &CourseSnapshot) -> Gradebook {
    let assignments: HashMap<&str, &Assignment> = snapshot
        .assignments
        .iter()
        .filter(|assignment| assignment.course_id == snapshot.course.id)
        .map(|assignment| (assignment.id.as_str(), assignment))
        .collect();

    let students = snapshot
        .students
        .iter()
        .map(|student| {
            let mut assignment_grades = Vec::new();
            let mut exam_grade = None;
            let mut total_points = 0i64;

            let records =
                snapshot.submissions.iter().filter(|record| record.student_id == student.id);
            for record in records {
                let Some(assignment) = assignments.get(record.assignment_id.as_str()) else {
                    continue;
                };
                total_points += i64::from(record.points);

                match assignment.kind {
                    AssignmentType::Lab => assignment_grades.push(AssignmentGrade {
                        assignment_id: assignment.id.clone(),
                        title: assignment.title.clone(),
                        max_points: assignment.max_points,
                        points: record.points,
                        deadline: assignment.deadline,
                        is_late: record.is_late,
                        penalty_points: record.penalty_points,
                    }),
                    AssignmentType::Exam => {
                        if exam_grade.is_none() {
                            exam_grade = Some(ExamGrade {
                                assignment_id: assignment.id.clone(),
                                title: assignment.title.clone(),
                                max_points: assignment.max_points,
                                points: record.points,
                            });
                        }
                    }
                }
            }

            assignment_grades
                .sort_by(|a, b| a.deadline.cmp(&b.deadline).then_with(|| a.title.cmp(&b.title)));

            StudentGrades {
                student_id: student.id.clone(),
                name: student.name.clone(),
                email: student.email.clone(),
                assignment_grades,
                exam_grade,
                total_points,
                final_grade: letter_grade(total_points),
            }
        })
        .collect();

    Gradebook {
        course_id: snapshot.course.id.clone(),
        course_code: snapshot.course.code.clone(),
        course_name: snapshot.course.name.clone(),
        students,
    }
}
