//! Email verification: redeem the emailed token, create the user, start a session.

use axum::{
    extract::{Extension, Query},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::{debug, info};

use super::{
    error::{AuthError, Flow},
    session::session_cookie,
    state::AuthState,
    types::{MessageResponse, VerifyEmailQuery, VerifyEmailResponse},
    utils::normalize_email,
};
use crate::{
    store::{StoreError, User},
    token::TokenPayload,
};

pub(super) const CREATED_MESSAGE: &str =
    "Email verified successfully! Account created and you are now logged in.";
pub(super) const ALREADY_VERIFIED_MESSAGE: &str = "Email already verified. You are now logged in.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum VerifyOutcome {
    Created,
    AlreadyVerified,
}

#[derive(Debug)]
pub(super) struct VerifiedLogin {
    pub(super) outcome: VerifyOutcome,
    pub(super) user: User,
    pub(super) auth_token: String,
}

/// Redeem a verification link and set the session cookie.
#[utoipa::path(
    get,
    path = "/api/v1/user/verify-email",
    params(VerifyEmailQuery),
    responses(
        (status = 201, description = "Account created and logged in", body = VerifyEmailResponse),
        (status = 200, description = "Account already existed; logged in", body = VerifyEmailResponse),
        (status = 400, description = "Missing token", body = MessageResponse),
        (status = 401, description = "Invalid, expired or wrong-kind token", body = MessageResponse),
        (status = 500, description = "Store failure", body = MessageResponse)
    ),
    tag = "auth"
)]
pub async fn verify_email(
    auth_state: Extension<Arc<AuthState>>,
    query: Option<Query<VerifyEmailQuery>>,
) -> impl IntoResponse {
    let token = query.and_then(|Query(query)| query.token);

    let login = match verify_email_token(&auth_state, token.as_deref()).await {
        Ok(login) => login,
        Err(err) => return err.into_response_for(Flow::VerifyEmail),
    };

    let mut headers = HeaderMap::new();
    match session_cookie(auth_state.config(), &login.auth_token) {
        Ok(cookie) => {
            headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => {
            return AuthError::Internal(format!("failed to build session cookie: {err}"))
                .into_response_for(Flow::VerifyEmail);
        }
    }

    let (status, message) = match login.outcome {
        VerifyOutcome::Created => (StatusCode::CREATED, CREATED_MESSAGE),
        VerifyOutcome::AlreadyVerified => (StatusCode::OK, ALREADY_VERIFIED_MESSAGE),
    };
    let body = VerifyEmailResponse {
        message: message.to_string(),
        user: login.user,
    };
    (status, headers, Json(body)).into_response()
}

/// Check the token, find or create the user, and issue an auth token for it.
///
/// A `Conflict` from `create_user` means a concurrent request created the user
/// first; that user is re-read and treated as already verified.
pub(super) async fn verify_email_token(
    auth_state: &AuthState,
    token: Option<&str>,
) -> Result<VerifiedLogin, AuthError> {
    let token = token
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)?;

    let claims = auth_state
        .tokens()
        .verify(token)
        .map_err(AuthError::from_presented_token)?;
    let TokenPayload::Verification { email } = claims.payload else {
        return Err(AuthError::WrongTokenKind);
    };
    let email = normalize_email(&email);

    let store = auth_state.store();
    let (user, outcome) = match store.find_by_email(&email).await? {
        Some(user) => (user, VerifyOutcome::AlreadyVerified),
        None => match store.create_user(&email).await {
            Ok(user) => (user, VerifyOutcome::Created),
            Err(StoreError::Conflict) => {
                debug!(to_email = %email, "user created concurrently, reusing it");
                let user = store.find_by_email(&email).await?.ok_or_else(|| {
                    AuthError::StoreUnavailable("user missing after conflicting insert".to_string())
                })?;
                (user, VerifyOutcome::AlreadyVerified)
            }
            Err(err) => return Err(err.into()),
        },
    };

    let auth_token = auth_state
        .tokens()
        .issue(
            TokenPayload::Auth {
                user_id: user.id.to_string(),
            },
            auth_state.config().session_ttl_seconds(),
        )
        .map_err(AuthError::Token)?;

    if outcome == VerifyOutcome::Created {
        info!(user_id = %user.id, "user created from verified email");
    }

    Ok(VerifiedLogin {
        outcome,
        user,
        auth_token,
    })
}
