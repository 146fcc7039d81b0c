//! SMTP delivery through `lettre`.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument};

use super::{EmailError, EmailMessage, EmailSender};

#[derive(Clone, Debug)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<SecretString>,
    pub use_tls: bool,
    pub from: String,
}

pub struct SmtpEmailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl std::fmt::Debug for SmtpEmailSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpEmailSender")
            .field("from", &self.from.to_string())
            .finish_non_exhaustive()
    }
}

impl SmtpEmailSender {
    /// Build a transport for `config`; no connection is opened until the first send.
    ///
    /// # Errors
    /// Returns [`EmailError::InvalidConfig`] for a bad sender address or TLS setup.
    pub fn new(config: SmtpConfig) -> Result<Self, EmailError> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|e| EmailError::InvalidConfig(format!("Invalid from address: {e}")))?;

        let mut builder = if config.use_tls {
            let tls_params = TlsParameters::new(config.host.clone())
                .map_err(|e| EmailError::InvalidConfig(format!("TLS configuration error: {e}")))?;

            // Port 465 uses implicit TLS (SMTPS), other ports use STARTTLS
            if config.port == 465 {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
                    .map_err(|e| EmailError::InvalidConfig(format!("SMTP relay error: {e}")))?
                    .port(config.port)
                    .tls(Tls::Wrapper(tls_params))
            } else {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                    .map_err(|e| EmailError::InvalidConfig(format!("SMTP relay error: {e}")))?
                    .port(config.port)
                    .tls(Tls::Required(tls_params))
            }
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host).port(config.port)
        };

        if let (Some(user), Some(pass)) = (config.username, config.password) {
            builder = builder.credentials(Credentials::new(user, pass.expose_secret().to_string()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    #[instrument(skip(self, message), fields(to_email = %message.to))]
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        let to: Mailbox = message
            .to
            .parse()
            .map_err(|e| EmailError::SendFailed(format!("Invalid to address: {e}")))?;

        let email = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(message.subject.clone())
            .user_agent(crate::APP_USER_AGENT.to_string())
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(message.text.clone()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(message.html.clone()),
                    ),
            )
            .map_err(|e| EmailError::SendFailed(format!("Failed to build email: {e}")))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| EmailError::SendFailed(e.to_string()))?;

        debug!("verification email handed to relay");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SmtpConfig {
        SmtpConfig {
            host: "localhost".to_string(),
            port: 25,
            username: None,
            password: None,
            use_tls: false,
            from: "Super30 Contest <no-reply@super30.dev>".to_string(),
        }
    }

    #[test]
    fn sender_creation_without_tls() {
        assert!(SmtpEmailSender::new(config()).is_ok());
    }

    #[test]
    fn sender_creation_with_credentials() {
        let config = SmtpConfig {
            port: 587,
            username: Some("user".to_string()),
            password: Some(SecretString::from("pass")),
            ..config()
        };
        assert!(SmtpEmailSender::new(config).is_ok());
    }

    #[test]
    fn invalid_from_address_is_rejected() {
        let config = SmtpConfig {
            from: "not an address".to_string(),
            ..config()
        };
        assert!(matches!(
            SmtpEmailSender::new(config),
            Err(EmailError::InvalidConfig(_))
        ));
    }

    #[tokio::test]
    async fn invalid_recipient_fails_before_connecting() -> Result<(), EmailError> {
        let sender = SmtpEmailSender::new(config())?;
        let message = EmailMessage {
            to: "nobody".to_string(),
            subject: "s".to_string(),
            html: "<p>h</p>".to_string(),
            text: "t".to_string(),
        };
        assert!(matches!(
            sender.send(&message).await,
            Err(EmailError::SendFailed(_))
        ));
        Ok(())
    }
}
