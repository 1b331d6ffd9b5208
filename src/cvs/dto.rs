use serde::{Deserialize, Serialize};

use super::repo_types::Cv;
use crate::error::AppError;

pub const MAX_FIELD_LEN: usize = 20_000;

/// The client-writable part of a CV. Anything else in the body is ignored.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvFields {
    pub title: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub summary: Option<String>,
    pub experience: Option<String>,
    pub education: Option<String>,
    pub skills: Option<String>,
    pub template: Option<String>,
}

impl CvFields {
    fn named(&self) -> [(&'static str, Option<&String>); 9] {
        [
            ("title", self.title.as_ref()),
            ("fullName", self.full_name.as_ref()),
            ("email", self.email.as_ref()),
            ("phone", self.phone.as_ref()),
            ("summary", self.summary.as_ref()),
            ("experience", self.experience.as_ref()),
            ("education", self.education.as_ref()),
            ("skills", self.skills.as_ref()),
            ("template", self.template.as_ref()),
        ]
    }

    pub fn validate(&self) -> Result<(), AppError> {
        for (name, value) in self.named() {
            if let Some(v) = value {
                if v.chars().count() > MAX_FIELD_LEN {
                    return Err(AppError::Validation(format!(
                        "{name} must be at most {MAX_FIELD_LEN} characters"
                    )));
                }
            }
        }
        if matches!(&self.template, Some(t) if t.trim().is_empty()) {
            return Err(AppError::Validation("template must not be blank".into()));
        }
        Ok(())
    }

    /// Overwrite every field that was supplied; leave the rest untouched.
    pub fn apply_to(self, cv: &mut Cv) {
        fn set(slot: &mut Option<String>, value: Option<String>) {
            if value.is_some() {
                *slot = value;
            }
        }
        set(&mut cv.title, self.title);
        set(&mut cv.full_name, self.full_name);
        set(&mut cv.email, self.email);
        set(&mut cv.phone, self.phone);
        set(&mut cv.summary, self.summary);
        set(&mut cv.experience, self.experience);
        set(&mut cv.education, self.education);
        set(&mut cv.skills, self.skills);
        if let Some(t) = self.template {
            cv.template = t.trim().to_string();
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
