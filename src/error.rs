//! src/error.rs

use crate::domain::ValidationError;
use crate::notifier::DeliveryError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

pub type SignupResult<T> = Result<T, Error>;

/// User-facing text for any failed delivery.
pub const SIGNUP_FAILED_MESSAGE: &str = "Failed to process signup. Please try again.";

fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

#[derive(thiserror::Error)]
pub enum Error {
    #[error("Invalid input for beta signup")]
    ValidationError(#[from] ValidationError),
    #[error("Malformed beta signup payload: {0}")]
    PayloadError(String),
    #[error("Failed to process beta signup")]
    InternalError(#[from] DeliveryError),
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

#[derive(serde::Serialize)]
struct ErrorBody<'a> {
    error: ErrorDetail<'a>,
}

#[derive(serde::Serialize)]
struct ErrorDetail<'a> {
    code: &'a str,
    message: String,
}

impl Error {
    fn code(&self) -> &'static str {
        match self.status_code() {
            StatusCode::BAD_REQUEST => "BAD_REQUEST",
            _ => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Message shown to the end user. Delivery details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            Error::ValidationError(e) => e.to_string(),
            Error::PayloadError(_) => "Please enter a valid email address".to_owned(),
            Error::InternalError(_) => SIGNUP_FAILED_MESSAGE.to_owned(),
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::ValidationError(_) | Error::PayloadError(_) => StatusCode::BAD_REQUEST,
            Error::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            error: ErrorDetail {
                code: self.code(),
                message: self.public_message(),
            },
        })
    }
}
