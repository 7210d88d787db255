//! src/domain/mod.rs

mod signup_event;
mod subscriber_email;

pub use signup_event::SignupEvent;
pub use subscriber_email::SubscriberEmail;

/// Validation error for domain data
#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Please enter your email address")]
    EmptyEmail,
    #[error("Please enter a valid email address")]
    InvalidEmail(String),
}
