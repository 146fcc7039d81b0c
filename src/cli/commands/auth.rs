use anyhow::{anyhow, Context};
use clap::{builder::PossibleValuesParser, Arg, ArgMatches, Command};
use secrecy::SecretString;
use url::Url;

use crate::{
    api::handlers::auth::Environment,
    token::DEFAULT_TOKEN_TTL_SECONDS,
};

pub const ARG_BASE_URL: &str = "base-url";
pub const ARG_TOKEN_SECRET: &str = "token-secret";
pub const ARG_ENVIRONMENT: &str = "environment";
pub const ARG_TOKEN_TTL_SECONDS: &str = "token-ttl-seconds";
pub const ARG_SESSION_TTL_SECONDS: &str = "session-ttl-seconds";

#[derive(Debug, Clone)]
pub struct Options {
    pub base_url: String,
    pub token_secret: SecretString,
    pub environment: Environment,
    pub token_ttl_seconds: i64,
    pub session_ttl_seconds: i64,
}

impl Options {
    /// Parse auth arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the secret is missing, the base URL is not absolute, or a TTL is not positive.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let base_url = matches
            .get_one::<String>(ARG_BASE_URL)
            .cloned()
            .context("missing required argument: --base-url")?;
        Url::parse(&base_url).with_context(|| format!("invalid --{ARG_BASE_URL}: {base_url}"))?;

        let token_secret = matches
            .get_one::<String>(ARG_TOKEN_SECRET)
            .filter(|secret| !secret.trim().is_empty())
            .map(|secret| SecretString::from(secret.clone()))
            .ok_or_else(|| anyhow!("missing required argument: --{ARG_TOKEN_SECRET}"))?;

        let environment = matches
            .get_one::<String>(ARG_ENVIRONMENT)
            .map_or(Ok(Environment::default()), |name| name.parse())
            .map_err(|err| anyhow!(err))?;

        let read_ttl = |id: &str| -> anyhow::Result<i64> {
            let ttl = matches
                .get_one::<i64>(id)
                .copied()
                .unwrap_or(DEFAULT_TOKEN_TTL_SECONDS);
            if ttl <= 0 {
                return Err(anyhow!("--{id} must be positive"));
            }
            Ok(ttl)
        };

        Ok(Self {
            base_url,
            token_secret,
            environment,
            token_ttl_seconds: read_ttl(ARG_TOKEN_TTL_SECONDS)?,
            session_ttl_seconds: read_ttl(ARG_SESSION_TTL_SECONDS)?,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_BASE_URL)
                .long(ARG_BASE_URL)
                .help("Public base URL used to build verification links")
                .env("CONTEST_AUTH_BASE_URL")
                .default_value("http://localhost:8080"),
        )
        .arg(
            Arg::new(ARG_TOKEN_SECRET)
                .long(ARG_TOKEN_SECRET)
                .help("HMAC secret for verification and auth tokens")
                .env("CONTEST_AUTH_TOKEN_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_ENVIRONMENT)
                .long(ARG_ENVIRONMENT)
                .help("Deployment environment; production marks the session cookie Secure")
                .env("CONTEST_AUTH_ENVIRONMENT")
                .default_value("development")
                .value_parser(PossibleValuesParser::new(Environment::NAMES)),
        )
        .arg(
            Arg::new(ARG_TOKEN_TTL_SECONDS)
                .long(ARG_TOKEN_TTL_SECONDS)
                .help("Verification token TTL in seconds")
                .env("CONTEST_AUTH_TOKEN_TTL_SECONDS")
                .default_value("86400")
                .value_parser(clap::value_parser!(i64)),
        )
        .arg(
            Arg::new(ARG_SESSION_TTL_SECONDS)
                .long(ARG_SESSION_TTL_SECONDS)
                .help("Session cookie and auth token TTL in seconds")
                .env("CONTEST_AUTH_SESSION_TTL_SECONDS")
                .default_value("86400")
                .value_parser(clap::value_parser!(i64)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn matches(args: &[&str]) -> ArgMatches {
        let mut argv = vec!["contest-auth"];
        argv.extend_from_slice(args);
        with_args(Command::new("contest-auth")).get_matches_from(argv)
    }

    #[test]
    fn defaults() -> anyhow::Result<()> {
        temp_env::with_vars(
            [
                ("CONTEST_AUTH_BASE_URL", None::<&str>),
                ("CONTEST_AUTH_ENVIRONMENT", None),
                ("CONTEST_AUTH_TOKEN_TTL_SECONDS", None),
                ("CONTEST_AUTH_SESSION_TTL_SECONDS", None),
            ],
            || {
                let options = Options::parse(&matches(&["--token-secret", "s3cret"]))?;
                assert_eq!(options.base_url, "http://localhost:8080");
                assert_eq!(options.token_secret.expose_secret(), "s3cret");
                assert_eq!(options.environment, Environment::Development);
                assert_eq!(options.token_ttl_seconds, 86_400);
                assert_eq!(options.session_ttl_seconds, 86_400);
                Ok(())
            },
        )
    }

    #[test]
    fn reads_environment_variables() -> anyhow::Result<()> {
        temp_env::with_vars(
            [
                ("CONTEST_AUTH_BASE_URL", Some("https://contest.test")),
                ("CONTEST_AUTH_TOKEN_SECRET", Some("from-env")),
                ("CONTEST_AUTH_ENVIRONMENT", Some("production")),
                ("CONTEST_AUTH_SESSION_TTL_SECONDS", Some("3600")),
            ],
            || {
                let options = Options::parse(&matches(&[]))?;
                assert_eq!(options.base_url, "https://contest.test");
                assert_eq!(options.token_secret.expose_secret(), "from-env");
                assert_eq!(options.environment, Environment::Production);
                assert_eq!(options.session_ttl_seconds, 3600);
                Ok(())
            },
        )
    }

    #[test]
    fn rejects_relative_base_url() {
        temp_env::with_var("CONTEST_AUTH_BASE_URL", None::<&str>, || {
            let result = Options::parse(&matches(&[
                "--token-secret",
                "s",
                "--base-url",
                "contest.test",
            ]));
            assert!(result.is_err());
        });
    }

    #[test]
    fn rejects_non_positive_ttl() {
        temp_env::with_var("CONTEST_AUTH_TOKEN_TTL_SECONDS", None::<&str>, || {
            let result = Options::parse(&matches(&[
                "--token-secret",
                "s",
                "--token-ttl-seconds",
                "0",
            ]));
            assert!(result.is_err());
        });
    }

    #[test]
    fn rejects_blank_secret() {
        let result = Options::parse(&matches(&["--token-secret", "  "]));
        assert!(result.is_err());
    }
}
