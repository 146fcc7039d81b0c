//! Auth configuration and the shared handler state.

use std::{fmt, str::FromStr, sync::Arc, time::Duration};

use crate::{
    email::{EmailSender, DEFAULT_SEND_TIMEOUT_SECONDS},
    store::UserStore,
    token::{TokenCodec, DEFAULT_TOKEN_TTL_SECONDS},
};

/// Deployment environment; only `Production` marks cookies `Secure`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl Environment {
    pub const NAMES: [&'static str; 3] = ["development", "test", "production"];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Test => "test",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AuthConfig {
    base_url: String,
    environment: Environment,
    verification_token_ttl_seconds: i64,
    session_ttl_seconds: i64,
    email_timeout: Duration,
}

impl AuthConfig {
    #[must_use]
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            environment: Environment::default(),
            verification_token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
            session_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
            email_timeout: Duration::from_secs(DEFAULT_SEND_TIMEOUT_SECONDS),
        }
    }

    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    #[must_use]
    pub fn with_verification_token_ttl_seconds(mut self, seconds: i64) -> Self {
        self.verification_token_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_session_ttl_seconds(mut self, seconds: i64) -> Self {
        self.session_ttl_seconds = seconds;
        self
    }

    #[must_use]
    pub fn with_email_timeout(mut self, timeout: Duration) -> Self {
        self.email_timeout = timeout;
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub(super) fn verification_token_ttl_seconds(&self) -> i64 {
        self.verification_token_ttl_seconds
    }

    pub(super) fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    pub(super) fn email_timeout(&self) -> Duration {
        self.email_timeout
    }

    pub(super) fn session_cookie_secure(&self) -> bool {
        self.environment == Environment::Production
    }
}

/// Everything the auth handlers need, shared behind one `Arc`.
pub struct AuthState {
    config: AuthConfig,
    tokens: TokenCodec,
    store: Arc<dyn UserStore>,
    email: Arc<dyn EmailSender>,
}

impl AuthState {
    pub fn new(
        config: AuthConfig,
        tokens: TokenCodec,
        store: Arc<dyn UserStore>,
        email: Arc<dyn EmailSender>,
    ) -> Self {
        Self {
            config,
            tokens,
            store,
            email,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub(super) fn tokens(&self) -> &TokenCodec {
        &self.tokens
    }

    pub(super) fn store(&self) -> &dyn UserStore {
        self.store.as_ref()
    }

    pub(super) fn email(&self) -> &dyn EmailSender {
        self.email.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_config_defaults_and_overrides() {
        let config = AuthConfig::new("https://contest.test".to_string());

        assert_eq!(config.base_url(), "https://contest.test");
        assert_eq!(config.environment(), Environment::Development);
        assert_eq!(config.verification_token_ttl_seconds(), 86_400);
        assert_eq!(config.session_ttl_seconds(), 86_400);
        assert_eq!(
            config.email_timeout(),
            Duration::from_secs(DEFAULT_SEND_TIMEOUT_SECONDS)
        );
        assert!(!config.session_cookie_secure());

        let config = config
            .with_environment(Environment::Production)
            .with_verification_token_ttl_seconds(60)
            .with_session_ttl_seconds(120)
            .with_email_timeout(Duration::from_secs(2));

        assert_eq!(config.verification_token_ttl_seconds(), 60);
        assert_eq!(config.session_ttl_seconds(), 120);
        assert_eq!(config.email_timeout(), Duration::from_secs(2));
        assert!(config.session_cookie_secure());
    }

    #[test]
    fn environment_parses_names_and_aliases() {
        assert_eq!("production".parse(), Ok(Environment::Production));
        assert_eq!("PROD".parse(), Ok(Environment::Production));
        assert_eq!("dev".parse(), Ok(Environment::Development));
        assert_eq!("test".parse(), Ok(Environment::Test));
        assert!("staging".parse::<Environment>().is_err());

        for name in Environment::NAMES {
            let parsed: Environment = name.parse().unwrap_or_default();
            assert_eq!(parsed.as_str(), name);
        }
    }

    #[test]
    fn only_production_sets_secure_cookies() {
        for environment in [Environment::Development, Environment::Test] {
            let config = AuthConfig::new("http://localhost".to_string()).with_environment(environment);
            assert!(!config.session_cookie_secure());
        }
    }
}
