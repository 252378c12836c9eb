//! Contact form submissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use portfolio_core::{Email, EmailError, SubmissionId};

/// Maximum length of the name and subject fields.
pub const MAX_SHORT_FIELD: usize = 200;
/// Maximum length of the message body.
pub const MAX_MESSAGE: usize = 5000;
/// Maximum length of the phone field.
pub const MAX_PHONE: usize = 40;

/// A stored contact submission.
#[derive(Debug, Clone, Serialize)]
pub struct ContactSubmission {
    pub id: SubmissionId,
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

/// Total and unread submission counts for the admin header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionCounts {
    pub total: i64,
    pub unread: i64,
}

/// Raw contact form body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

/// Why a contact form was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("Please fill in your {0}.")]
    Missing(&'static str),
    #[error("Your {field} is too long (at most {max} characters).")]
    TooLong { field: &'static str, max: usize },
    #[error("Please enter a valid email address.")]
    InvalidEmail(#[from] EmailError),
}

/// Validated, trimmed contact form input ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

impl TryFrom<&ContactForm> for NewSubmission {
    type Error = SubmissionError;

    fn try_from(form: &ContactForm) -> Result<Self, Self::Error> {
        let name = required(&form.name, "name", MAX_SHORT_FIELD)?;
        let email = Email::parse(&form.email)?;
        let phone = form
            .phone
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| limit(p, "phone number", MAX_PHONE))
            .transpose()?;
        let subject = required(&form.subject, "subject", MAX_SHORT_FIELD)?;
        let message = required(&form.message, "message", MAX_MESSAGE)?;

        Ok(Self {
            name,
            email,
            phone,
            subject,
            message,
        })
    }
}

fn required(value: &str, field: &'static str, max: usize) -> Result<String, SubmissionError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SubmissionError::Missing(field));
    }
    limit(value, field, max)
}

fn limit(value: &str, field: &'static str, max: usize) -> Result<String, SubmissionError> {
    if value.chars().count() > max {
        return Err(SubmissionError::TooLong { field, max });
    }
    Ok(value.to_owned())
}
