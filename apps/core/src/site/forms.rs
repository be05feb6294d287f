use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{info, instrument};
use validator::Validate;

use crate::error::AppError;

/// Which form on the page was submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormKind {
    Volunteer,
    Contact,
    General,
}

impl FormKind {
    /// Message shown once the submission went through.
    pub fn acknowledgement(&self) -> &'static str {
        match self {
            FormKind::Volunteer => "Thank you for volunteering! We'll contact you soon.",
            FormKind::Contact => "Thank you for your message! We'll get back to you soon.",
            FormKind::General => "Thank you for your submission!",
        }
    }

    /// Maps a form's CSS class to its kind; anything unrecognised is `General`.
    pub fn from_class(class: &str) -> Self {
        match class.trim() {
            "volunteer-form" => FormKind::Volunteer,
            "contact-form" => FormKind::Contact,
            _ => FormKind::General,
        }
    }
}

/// Fields shared by the volunteer and contact forms.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FormSubmission {
    pub kind: FormKind,
    #[validate(length(min = 1, max = 120, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "a valid e-mail address is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 5000, message = "message is too long"))]
    pub message: Option<String>,
}

impl FormSubmission {
    /// Validates the fields, waits `delay` as the "Submitting..." phase, and
    /// returns the acknowledgement for the form kind.
    #[instrument(skip_all, fields(kind = ?self.kind))]
    pub async fn submit(&self, delay: Duration) -> Result<&'static str, AppError> {
        self.validate()?;

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        info!("form submitted");
        Ok(self.kind.acknowledgement())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(kind: FormKind, email: &str) -> FormSubmission {
        FormSubmission {
            kind,
            name: "Hodan".to_string(),
            email: email.to_string(),
            message: Some("Count me in for canvassing".to_string()),
        }
    }

    #[tokio::test]
    async fn test_volunteer_acknowledgement() {
        let ack = submission(FormKind::Volunteer, "hodan@example.com")
            .submit(Duration::ZERO)
            .await
            .unwrap();
        assert_eq!(ack, "Thank you for volunteering! We'll contact you soon.");
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let result = submission(FormKind::Contact, "hodan-at-example")
            .submit(Duration::ZERO)
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_form_kind_from_class() {
        assert_eq!(FormKind::from_class("volunteer-form"), FormKind::Volunteer);
        assert_eq!(FormKind::from_class("contact-form"), FormKind::Contact);
        assert_eq!(FormKind::from_class("newsletter-form"), FormKind::General);
    }
}
