//! src/domain/subscriber_email.rs

use crate::domain::ValidationError;
use validator::ValidateEmail;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberEmail(String);

impl SubscriberEmail {
    /// Parse a raw form value, ignoring surrounding whitespace.
    pub fn parse(s: String) -> Result<SubscriberEmail, ValidationError> {
        let trimmed = s.trim().to_owned();
        if trimmed.is_empty() {
            return Err(ValidationError::EmptyEmail);
        }
        if trimmed.validate_email() {
            Ok(Self(trimmed))
        } else {
            Err(ValidationError::InvalidEmail(s))
        }
    }
}

impl AsRef<str> for SubscriberEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubscriberEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
