use serde::{Deserialize, Serialize};
use sqlx::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "assignmenttype", rename_all = "lowercase")]
pub enum AssignmentType {
    Lab,
    Exam,
}

impl AssignmentType {
    pub fn label(self) -> &'static str {
        match self {
            AssignmentType::Lab => "lab",
            AssignmentType::Exam => "exam",
        }
    }
}
