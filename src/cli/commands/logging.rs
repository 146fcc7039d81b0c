use clap::{builder::ValueParser, Arg, Command};

pub const ARG_VERBOSITY: &str = "verbosity";

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
            .env("CONTEST_AUTH_LOG_LEVEL")
            .global(true)
            .action(clap::ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_names_and_numbers() {
        let parse = |value: &str| {
            Command::new("test")
                .arg(
                    Arg::new("level")
                        .long("level")
                        .value_parser(validator_log_level()),
                )
                .try_get_matches_from(vec!["test", "--level", value])
                .ok()
                .and_then(|matches| matches.get_one::<u8>("level").copied())
        };

        assert_eq!(parse("info"), Some(2));
        assert_eq!(parse("TRACE"), Some(4));
        assert_eq!(parse("3"), Some(3));
        assert_eq!(parse("9"), None);
        assert_eq!(parse("loud"), None);
    }

    #[test]
    fn repeated_flag_counts() {
        let command = with_args(Command::new("test"));
        let matches = command.get_matches_from(vec!["test", "-vvv"]);
        assert_eq!(matches.get_one::<u8>(ARG_VERBOSITY).copied(), Some(3));
    }
}
