use serde::Serialize;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LetterGrade {
    A,
    B,
    C,
    D,
    F,
}

impl LetterGrade {
    pub fn as_str(self) -> &'static str {
        match self {
            LetterGrade::A => "A",
            LetterGrade::B => "B",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssignmentGrade {
    pub assignment_id: String,
    pub title: String,
    pub max_points: i32,
    pub points: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub deadline: OffsetDateTime,
    pub is_late: bool,
    pub penalty_points: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExamGrade {
    pub assignment_id: String,
    pub title: String,
    pub max_points: i32,
    pub points: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct StudentGrades {
    pub student_id: String,
    pub name: String,
    pub email: String,
    pub assignment_grades: Vec<AssignmentGrade>,
    pub exam_grade: Option<ExamGrade>,
    pub total_points: i64,
    pub final_grade: LetterGrade,
}

#[derive(Debug, Clone, Serialize)]
pub struct Gradebook {
    pub course_id: String,
    pub course_code: String,
    pub course_name: String,
    pub students: Vec<StudentGrades>,
}

impl Gradebook {
    pub fn student(&self, student_id: &str) -> Option<&StudentGrades> {
        self.students.iter().find(|row| row.student_id == student_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letter_grades_serialize_as_plain_letters() {
        let json = serde_json::to_string(&[LetterGrade::A, LetterGrade::F]).expect("serialize");
        assert_eq!(json, r#"["A","F"]"#);
    }
}
