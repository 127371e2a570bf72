use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::is_valid_email;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub service: Option<String>,
    pub message: String,
}

impl ContactForm {
    pub fn validate(&self) -> Result<(), AppError> {
        require(&self.name, "name")?;
        require(&self.email, "email")?;
        require(&self.message, "message")?;
        if !is_valid_email(self.email.trim()) {
            return Err(AppError::Validation("Please enter a valid email address.".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content_base64: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CareerApplication {
    pub name: String,
    pub email: String,
    pub resume: Option<ResumeUpload>,
}

impl CareerApplication {
    pub fn validate(&self) -> Result<&ResumeUpload, AppError> {
        let resume = match &self.resume {
            Some(r) if !r.file_name.trim().is_empty() && !r.content_base64.trim().is_empty() => r,
            _ => return Err(all_fields_required()),
        };
        if self.name.trim().is_empty() || self.email.trim().is_empty() {
            return Err(all_fields_required());
        }
        if !is_valid_email(self.email.trim()) {
            return Err(AppError::Validation("Please enter a valid email address.".to_string()));
        }
        Ok(resume)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredCareerApplication {
    pub id: String,
    pub name: String,
    pub email: String,
    pub resume_path: String,
    pub submitted_at: NaiveDateTime,
}

fn all_fields_required() -> AppError {
    AppError::Validation("All fields are required: name, email, and resume".to_string())
}

fn require(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("The {field} field is required.")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_requires_message() {
        let form = ContactForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            ..Default::default()
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_career_requires_resume() {
        let app = CareerApplication {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            resume: None,
        };
        assert!(matches!(app.validate(), Err(AppError::Validation(_))));

        let app = CareerApplication {
            resume: Some(ResumeUpload {
                file_name: "cv.pdf".to_string(),
                content_base64: "JVBERi0=".to_string(),
            }),
            ..app
        };
        assert_eq!(app.validate().unwrap().file_name, "cv.pdf");
    }
}
