use utoipa::OpenApi;

use super::handlers::{
    auth::{self, types},
    health,
};
use crate::store::User;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::signup::signup,
        auth::verification::verify_email,
    ),
    components(schemas(
        health::Health,
        types::SignupRequest,
        types::MessageResponse,
        types::VerifyEmailResponse,
        User,
    )),
    tags(
        (name = "health", description = "Liveness and build info"),
        (name = "auth", description = "Signup and email verification"),
    )
)]
struct ApiDoc;

/// `OpenAPI` document; title, version and contact come from Cargo metadata.
#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
