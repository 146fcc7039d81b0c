use crate::{
    api::{
        self,
        handlers::auth::{AuthConfig, AuthState, Environment},
    },
    email::{EmailSender, LogEmailSender, SmtpConfig, SmtpEmailSender},
    store::{MemoryUserStore, PgUserStore, UserStore},
    token::TokenCodec,
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::{sync::Arc, time::Duration};
use tracing::{info, warn};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: Option<String>,
    pub base_url: String,
    pub token_secret: SecretString,
    pub environment: Environment,
    pub token_ttl_seconds: i64,
    pub session_ttl_seconds: i64,
    pub email_timeout_seconds: u64,
    pub smtp: Option<SmtpConfig>,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database or mail relay cannot be set up, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let tokens = TokenCodec::new(args.token_secret.expose_secret().as_bytes())
        .context("Invalid token secret")?;

    let store = user_store(args.dsn.as_deref()).await?;
    let email = email_sender(args.smtp)?;

    let auth_config = AuthConfig::new(args.base_url)
        .with_environment(args.environment)
        .with_verification_token_ttl_seconds(args.token_ttl_seconds)
        .with_session_ttl_seconds(args.session_ttl_seconds)
        .with_email_timeout(Duration::from_secs(args.email_timeout_seconds));

    info!(
        environment = %auth_config.environment(),
        base_url = auth_config.base_url(),
        "starting contest auth"
    );

    let auth_state = Arc::new(AuthState::new(auth_config, tokens, store, email));

    api::new(args.port, auth_state).await
}

async fn user_store(dsn: Option<&str>) -> Result<Arc<dyn UserStore>> {
    match dsn {
        Some(dsn) => {
            let store = PgUserStore::connect(dsn).await?;
            store
                .apply_schema()
                .await
                .context("Failed to apply database schema")?;
            Ok(Arc::new(store))
        }
        None => {
            warn!("No DSN configured, users are kept in memory");
            Ok(Arc::new(MemoryUserStore::new()))
        }
    }
}

fn email_sender(smtp: Option<SmtpConfig>) -> Result<Arc<dyn EmailSender>> {
    match smtp {
        Some(config) => {
            info!(host = %config.host, port = config.port, "delivering email over SMTP");
            let sender = SmtpEmailSender::new(config).context("Invalid SMTP configuration")?;
            Ok(Arc::new(sender))
        }
        None => {
            warn!("No SMTP host configured, verification emails are only logged");
            Ok(Arc::new(LogEmailSender))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn without_dsn_users_live_in_memory() -> Result<()> {
        let store = user_store(None).await?;
        assert!(store.find_by_email("a@example.com").await?.is_none());
        Ok(())
    }

    #[test]
    fn smtp_config_builds_smtp_sender() {
        let config = SmtpConfig {
            host: "localhost".to_string(),
            port: 25,
            username: None,
            password: None,
            use_tls: false,
            from: "Super30 Contest <no-reply@super30.dev>".to_string(),
        };
        assert!(email_sender(Some(config)).is_ok());
        assert!(email_sender(None).is_ok());
    }

    #[test]
    fn bad_from_address_fails_startup() {
        let config = SmtpConfig {
            host: "localhost".to_string(),
            port: 25,
            username: None,
            password: None,
            use_tls: false,
            from: "nope".to_string(),
        };
        assert!(email_sender(Some(config)).is_err());
    }
}
