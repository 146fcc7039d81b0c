//! Request/response types for auth endpoints.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::store::User;

/// Signup body; a missing `email` is reported as a validation error, not a rejection.
#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
pub struct SignupRequest {
    pub email: Option<String>,
}

#[derive(IntoParams, Deserialize, Debug, Default)]
#[into_params(parameter_in = Query)]
pub struct VerifyEmailQuery {
    /// Verification token from the emailed link.
    pub token: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub(super) fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct VerifyEmailResponse {
    pub message: String,
    pub user: User,
}
