pub mod assignment;
pub mod course;
pub mod formula;
pub mod gradebook;
pub mod submission;
pub mod sweep;

pub use assignment::{AssignmentDraft, AssignmentPatch, ExamTaskDraft, ExamVariantDraft};
pub use course::{CourseDraft, StudentDraft};
pub use formula::FormulaInput;
pub use gradebook::{AssignmentGrade, ExamGrade, Gradebook, LetterGrade, StudentGrades};
pub use submission::{GradeDraft, SubmissionDraft};
pub use sweep::{SweepReport, SweepScope};
