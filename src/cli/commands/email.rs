use anyhow::anyhow;
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

use crate::email::{SmtpConfig, DEFAULT_SEND_TIMEOUT_SECONDS};

pub const ARG_EMAIL_TIMEOUT_SECONDS: &str = "email-timeout-seconds";
pub const ARG_EMAIL_FROM: &str = "email-from";
pub const ARG_SMTP_HOST: &str = "smtp-host";
pub const ARG_SMTP_PORT: &str = "smtp-port";
pub const ARG_SMTP_USERNAME: &str = "smtp-username";
pub const ARG_SMTP_PASSWORD: &str = "smtp-password";
pub const ARG_SMTP_TLS: &str = "smtp-tls";

#[derive(Debug, Clone)]
pub struct Options {
    pub timeout_seconds: u64,
    /// `None` means messages are logged instead of delivered.
    pub smtp: Option<SmtpConfig>,
}

impl Options {
    /// Parse email delivery arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the timeout is zero or only one SMTP credential is given.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let timeout_seconds = matches
            .get_one::<u64>(ARG_EMAIL_TIMEOUT_SECONDS)
            .copied()
            .unwrap_or(DEFAULT_SEND_TIMEOUT_SECONDS);
        if timeout_seconds == 0 {
            return Err(anyhow!("--{ARG_EMAIL_TIMEOUT_SECONDS} must be positive"));
        }

        let read_optional = |id: &str| {
            matches
                .get_one::<String>(id)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let smtp = match read_optional(ARG_SMTP_HOST) {
            Some(host) => {
                let username = read_optional(ARG_SMTP_USERNAME);
                let password = read_optional(ARG_SMTP_PASSWORD).map(SecretString::from);
                if username.is_some() != password.is_some() {
                    return Err(anyhow!(
                        "--{ARG_SMTP_USERNAME} and --{ARG_SMTP_PASSWORD} must be set together"
                    ));
                }
                Some(SmtpConfig {
                    host,
                    port: matches.get_one::<u16>(ARG_SMTP_PORT).copied().unwrap_or(587),
                    username,
                    password,
                    use_tls: matches.get_one::<bool>(ARG_SMTP_TLS).copied().unwrap_or(true),
                    from: read_optional(ARG_EMAIL_FROM)
                        .ok_or_else(|| anyhow!("missing required argument: --{ARG_EMAIL_FROM}"))?,
                })
            }
            None => None,
        };

        Ok(Self {
            timeout_seconds,
            smtp,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_EMAIL_TIMEOUT_SECONDS)
                .long(ARG_EMAIL_TIMEOUT_SECONDS)
                .help("Give up on a verification email after this many seconds")
                .env("CONTEST_AUTH_EMAIL_TIMEOUT_SECONDS")
                .default_value("10")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_EMAIL_FROM)
                .long(ARG_EMAIL_FROM)
                .help("Sender mailbox for verification emails")
                .env("CONTEST_AUTH_EMAIL_FROM")
                .default_value("Super30 Contest <no-reply@super30.dev>"),
        )
        .arg(
            Arg::new(ARG_SMTP_HOST)
                .long(ARG_SMTP_HOST)
                .help("SMTP relay host; when unset emails are only logged")
                .env("CONTEST_AUTH_SMTP_HOST"),
        )
        .arg(
            Arg::new(ARG_SMTP_PORT)
                .long(ARG_SMTP_PORT)
                .help("SMTP relay port (465 uses implicit TLS)")
                .env("CONTEST_AUTH_SMTP_PORT")
                .default_value("587")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_SMTP_USERNAME)
                .long(ARG_SMTP_USERNAME)
                .help("SMTP username")
                .env("CONTEST_AUTH_SMTP_USERNAME"),
        )
        .arg(
            Arg::new(ARG_SMTP_PASSWORD)
                .long(ARG_SMTP_PASSWORD)
                .help("SMTP password")
                .env("CONTEST_AUTH_SMTP_PASSWORD")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_SMTP_TLS)
                .long(ARG_SMTP_TLS)
                .help("Use TLS when talking to the SMTP relay")
                .env("CONTEST_AUTH_SMTP_TLS")
                .default_value("true")
                .value_parser(clap::value_parser!(bool)),
        )
}
