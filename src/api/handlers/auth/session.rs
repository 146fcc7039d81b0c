//! Session cookie issued after a successful verification.

use axum::http::{header::InvalidHeaderValue, HeaderValue};

use super::state::AuthConfig;

pub const SESSION_COOKIE_NAME: &str = "token";

/// Build the `HttpOnly` cookie carrying the auth token.
///
/// `Max-Age` follows the session TTL; `Secure` is only set in production.
pub(super) fn session_cookie(
    config: &AuthConfig,
    token: &str,
) -> Result<HeaderValue, InvalidHeaderValue> {
    let ttl_seconds = config.session_ttl_seconds();
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; HttpOnly; SameSite=Strict; Max-Age={ttl_seconds}"
    );
    if config.session_cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::auth::state::Environment;

    #[test]
    fn development_cookie_is_not_secure() -> Result<(), InvalidHeaderValue> {
        let config = AuthConfig::new("http://localhost:8080".to_string());
        let cookie = session_cookie(&config, "abc")?;
        assert_eq!(
            cookie.to_str().unwrap_or_default(),
            "token=abc; Path=/; HttpOnly; SameSite=Strict; Max-Age=86400"
        );
        Ok(())
    }

    #[test]
    fn production_cookie_is_secure_with_custom_ttl() -> Result<(), InvalidHeaderValue> {
        let config = AuthConfig::new("https://contest.test".to_string())
            .with_environment(Environment::Production)
            .with_session_ttl_seconds(600);
        let cookie = session_cookie(&config, "abc")?;
        let value = cookie.to_str().unwrap_or_default();
        assert!(value.ends_with("; Secure"));
        assert!(value.contains("Max-Age=600"));
        Ok(())
    }

    #[test]
    fn control_characters_are_rejected() {
        let config = AuthConfig::new("http://localhost:8080".to_string());
        assert!(session_cookie(&config, "bad\nvalue").is_err());
    }
}
