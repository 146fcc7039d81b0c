//! Signup: validate the address and mail a verification link.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::info;

use super::{
    error::{AuthError, Flow},
    state::AuthState,
    types::{MessageResponse, SignupRequest},
    utils::{build_verify_url, normalize_email, valid_email},
};
use crate::{
    email::{send_with_timeout, EmailMessage, VerificationEmailContent},
    token::TokenPayload,
};

pub(super) const SIGNUP_SENT_MESSAGE: &str =
    "Verification email sent. Please check your email to complete registration.";

/// Start signup by emailing a verification link; no user row is written yet.
#[utoipa::path(
    post,
    path = "/api/v1/user/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Verification email sent", body = MessageResponse),
        (status = 400, description = "Missing or invalid email", body = MessageResponse),
        (status = 409, description = "Email already registered", body = MessageResponse),
        (status = 500, description = "Store or mail failure", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn signup(
    auth_state: Extension<Arc<AuthState>>,
    payload: Option<Json<SignupRequest>>,
) -> impl IntoResponse {
    let email = payload.and_then(|Json(request)| request.email);

    match request_signup(&auth_state, email.as_deref()).await {
        Ok(()) => (StatusCode::OK, Json(MessageResponse::new(SIGNUP_SENT_MESSAGE))).into_response(),
        Err(err) => err.into_response_for(Flow::Signup),
    }
}

/// Validate `email`, check it is free, then send the verification email.
///
/// The send is bounded by the configured email timeout.
pub(super) async fn request_signup(
    auth_state: &AuthState,
    email: Option<&str>,
) -> Result<(), AuthError> {
    let email = normalize_email(email.unwrap_or_default());
    if email.is_empty() {
        return Err(AuthError::MissingField);
    }
    if !valid_email(&email) {
        return Err(AuthError::InvalidFormat);
    }

    if auth_state.store().find_by_email(&email).await?.is_some() {
        return Err(AuthError::Conflict);
    }

    let config = auth_state.config();
    let token = auth_state
        .tokens()
        .issue(
            TokenPayload::Verification {
                email: email.clone(),
            },
            config.verification_token_ttl_seconds(),
        )
        .map_err(AuthError::Token)?;

    let verify_url = build_verify_url(config.base_url(), &token)
        .map_err(|err| AuthError::Internal(format!("invalid base URL: {err}")))?;
    let message = EmailMessage::verification(&email, VerificationEmailContent::new(&verify_url));

    send_with_timeout(auth_state.email(), &message, config.email_timeout()).await?;

    info!(to_email = %email, "verification email sent");
    Ok(())
}
