//! src/routes/beta_signup.rs

use crate::domain::{SignupEvent, SubscriberEmail};
use crate::error::{Error, SignupResult};
use crate::notifier::SignupNotifier;
use actix_web::{web, HttpRequest, HttpResponse};

pub const SIGNUP_SUCCESS_MESSAGE: &str =
    "Thank you for signing up! You'll be notified when the beta is ready.";

#[derive(serde::Deserialize)]
pub struct BetaSignupData {
    email: String,
}

#[derive(serde::Serialize)]
pub struct BetaSignupResponse {
    pub success: bool,
    pub message: &'static str,
}

impl TryFrom<BetaSignupData> for SignupEvent {
    type Error = Error;

    fn try_from(value: BetaSignupData) -> Result<Self, Self::Error> {
        let email = SubscriberEmail::parse(value.email)?;
        Ok(SignupEvent::new(email))
    }
}

#[tracing::instrument(
    name = "Processing a beta signup.",
    skip(payload, notifier),
    fields(subscriber_email = %payload.email)
)]
pub async fn beta_signup(
    payload: web::Json<BetaSignupData>,
    notifier: web::Data<SignupNotifier>,
) -> SignupResult<HttpResponse> {
    let event: SignupEvent = payload.into_inner().try_into()?;
    notifier.handle_signup(&event).await?;
    Ok(HttpResponse::Ok().json(BetaSignupResponse {
        success: true,
        message: SIGNUP_SUCCESS_MESSAGE,
    }))
}

/// Reject unreadable payloads with the same JSON error shape as invalid emails.
pub fn json_error_handler(err: actix_web::error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    tracing::warn!(error.message = %err, "Rejected beta signup payload");
    Error::PayloadError(err.to_string()).into()
}
