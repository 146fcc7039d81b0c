//! Signup and email verification handlers.
//!
//! Signup never writes a user row: it mails a signed, 24 hour verification
//! link. The user is created when that link is redeemed, and the response
//! carries a session cookie holding an auth token for the new (or existing)
//! account. Redeeming the same link twice logs the user in again.

mod error;
pub(crate) mod session;
pub(crate) mod signup;
mod state;
pub(crate) mod types;
mod utils;
pub(crate) mod verification;

pub use error::{AuthError, Flow};
pub use session::SESSION_COOKIE_NAME;
pub use state::{AuthConfig, AuthState, Environment};

pub const SIGNUP_PATH: &str = "/api/v1/user/signup";
pub const VERIFY_EMAIL_PATH: &str = "/api/v1/user/verify-email";
