//! src/domain/signup_event.rs

use crate::domain::SubscriberEmail;
use chrono::{DateTime, Utc};

/// A beta signup as it passes through the notifier. Nothing is stored.
#[derive(Debug, Clone)]
pub struct SignupEvent {
    pub email: SubscriberEmail,
    pub signed_up_at: DateTime<Utc>,
}

impl SignupEvent {
    pub fn new(email: SubscriberEmail) -> Self {
        Self {
            email,
            signed_up_at: Utc::now(),
        }
    }

    /// Capture time as shown in notifications.
    pub fn signed_up_at_display(&self) -> String {
        self.signed_up_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    }
}
