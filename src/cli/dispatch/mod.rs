//! Maps validated CLI arguments to the server action.

use crate::cli::actions::{server::Args, Action};
use crate::cli::commands::{auth, email};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>("dsn")
        .map(|dsn| dsn.trim().to_string())
        .filter(|dsn| !dsn.is_empty());

    let auth_opts = auth::Options::parse(matches)?;
    let email_opts = email::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        dsn,
        base_url: auth_opts.base_url,
        token_secret: auth_opts.token_secret,
        environment: auth_opts.environment,
        token_ttl_seconds: auth_opts.token_ttl_seconds,
        session_ttl_seconds: auth_opts.session_ttl_seconds,
        email_timeout_seconds: email_opts.timeout_seconds,
        smtp: email_opts.smtp,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handlers::auth::Environment;

    #[test]
    fn builds_server_action_from_env() {
        temp_env::with_vars(
            [
                ("CONTEST_AUTH_PORT", Some("9000")),
                ("CONTEST_AUTH_DSN", None),
                ("CONTEST_AUTH_TOKEN_SECRET", Some("s3cret")),
                ("CONTEST_AUTH_ENVIRONMENT", Some("production")),
                ("CONTEST_AUTH_SMTP_HOST", None),
                ("CONTEST_AUTH_BASE_URL", None),
            ],
            || {
                let matches = crate::cli::commands::new().get_matches_from(vec!["contest-auth"]);
                let result = handler(&matches);
                assert!(result.is_ok());
                if let Ok(Action::Server(args)) = result {
                    assert_eq!(args.port, 9000);
                    assert!(args.dsn.is_none());
                    assert!(args.smtp.is_none());
                    assert_eq!(args.environment, Environment::Production);
                    assert_eq!(args.base_url, "http://localhost:8080");
                }
            },
        );
    }

    #[test]
    fn invalid_base_url_is_an_error() {
        temp_env::with_vars(
            [
                ("CONTEST_AUTH_TOKEN_SECRET", Some("s3cret")),
                ("CONTEST_AUTH_BASE_URL", Some("not a url")),
            ],
            || {
                let matches = crate::cli::commands::new().get_matches_from(vec!["contest-auth"]);
                let result = handler(&matches);
                assert!(result.is_err());
                if let Err(err) = result {
                    assert!(err.to_string().contains("--base-url"));
                }
            },
        );
    }
}
