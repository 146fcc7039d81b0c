//! Failure taxonomy shared by the signup and verification flows.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{debug, error};

use super::types::MessageResponse;
use crate::{email::EmailError, store::StoreError, token};

/// Which endpoint is answering; only internal failures word their message per flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Signup,
    VerifyEmail,
}

impl Flow {
    fn internal_message(self) -> &'static str {
        match self {
            Self::Signup => "An error occurred while processing your request.",
            Self::VerifyEmail => "An error occurred during email verification",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Signup => "Signup",
            Self::VerifyEmail => "Email verification",
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("email is required")]
    MissingField,
    #[error("invalid email format")]
    InvalidFormat,
    #[error("user already exists")]
    Conflict,
    #[error("missing token")]
    MissingToken,
    #[error("malformed token")]
    Malformed,
    #[error("expired token")]
    Expired,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token is not a verification token")]
    WrongTokenKind,
    #[error("user store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("failed to send verification email: {0}")]
    SendFailure(#[from] EmailError),
    #[error("token codec failure: {0}")]
    Token(token::Error),
    #[error("{0}")]
    Internal(String),
}

impl AuthError {
    /// Map a failure from decoding a presented token.
    pub(super) fn from_presented_token(err: token::Error) -> Self {
        match err {
            token::Error::Malformed | token::Error::Json(_) => Self::Malformed,
            token::Error::Expired => Self::Expired,
            token::Error::InvalidSignature => Self::InvalidSignature,
            other => Self::Token(other),
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingField | Self::InvalidFormat | Self::MissingToken => StatusCode::BAD_REQUEST,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Malformed | Self::Expired | Self::InvalidSignature | Self::WrongTokenKind => {
                StatusCode::UNAUTHORIZED
            }
            Self::StoreUnavailable(_) | Self::SendFailure(_) | Self::Token(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    #[must_use]
    pub fn public_message(&self, flow: Flow) -> &'static str {
        match self {
            Self::MissingField => "Email is required",
            Self::InvalidFormat => "Invalid email format",
            Self::Conflict => "User with this email already exists",
            Self::MissingToken => "Invalid or missing token",
            Self::Malformed | Self::Expired | Self::InvalidSignature => "Invalid or expired token",
            Self::WrongTokenKind => "Invalid token type",
            Self::StoreUnavailable(_) | Self::SendFailure(_) | Self::Token(_) | Self::Internal(_) => {
                flow.internal_message()
            }
        }
    }

    /// Render as `{"message": ...}`; internal causes are logged, never returned.
    pub fn into_response_for(self, flow: Flow) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{} error: {self}", flow.label());
        } else {
            debug!(status = status.as_u16(), "{} rejected: {self}", flow.label());
        }
        (status, Json(MessageResponse::new(self.public_message(flow)))).into_response()
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => Self::Conflict,
            StoreError::Unavailable(reason) => Self::StoreUnavailable(reason),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn client_errors_have_fixed_messages() {
        let cases = [
            (AuthError::MissingField, StatusCode::BAD_REQUEST, "Email is required"),
            (AuthError::InvalidFormat, StatusCode::BAD_REQUEST, "Invalid email format"),
            (AuthError::Conflict, StatusCode::CONFLICT, "User with this email already exists"),
            (AuthError::MissingToken, StatusCode::BAD_REQUEST, "Invalid or missing token"),
            (AuthError::Expired, StatusCode::UNAUTHORIZED, "Invalid or expired token"),
            (AuthError::WrongTokenKind, StatusCode::UNAUTHORIZED, "Invalid token type"),
        ];
        for (err, status, message) in cases {
            assert_eq!(err.status(), status);
            assert_eq!(err.public_message(Flow::Signup), message);
            assert_eq!(err.public_message(Flow::VerifyEmail), message);
        }
    }

    #[test]
    fn internal_errors_hide_cause_and_depend_on_flow() {
        let err = AuthError::SendFailure(EmailError::Timeout(Duration::from_secs(10)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.public_message(Flow::Signup),
            "An error occurred while processing your request."
        );
        assert_eq!(
            err.public_message(Flow::VerifyEmail),
            "An error occurred during email verification"
        );
    }

    #[test]
    fn presented_token_errors_map_to_unauthorized() {
        for err in [
            token::Error::Malformed,
            token::Error::Expired,
            token::Error::InvalidSignature,
        ] {
            assert_eq!(
                AuthError::from_presented_token(err).status(),
                StatusCode::UNAUTHORIZED
            );
        }
        assert_eq!(
            AuthError::from_presented_token(token::Error::EmptySecret).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_errors_convert() {
        assert!(matches!(AuthError::from(StoreError::Conflict), AuthError::Conflict));
        assert!(matches!(
            AuthError::from(StoreError::Unavailable("down".to_string())),
            AuthError::StoreUnavailable(_)
        ));
    }
}
