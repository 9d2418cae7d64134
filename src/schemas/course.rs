use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CourseDraft {
    #[validate(length(min = 1, max = 32, message = "code must be 1 to 32 characters"))]
    pub code: String,
    #[validate(length(min = 1, max = 200, message = "name must be 1 to 200 characters"))]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StudentDraft {
    #[validate(length(min = 1, max = 200, message = "name must be 1 to 200 characters"))]
    pub name: String,
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
}

impl CourseDraft {
    /// Surrounding whitespace is not part of a code or a name.
    pub fn normalized(&self) -> Self {
        Self { code: self.code.trim().to_string(), name: self.name.trim().to_string() }
    }
}

impl StudentDraft {
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_ascii_lowercase(),
        }
    }
}
