pub mod logging;
pub mod store;

use clap::{
    Arg, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

pub const ARG_IDENTITY: &str = "identity";
pub const ARG_CODE: &str = "code";
pub const ARG_SECRET: &str = "secret";
pub const ARG_COUNTER: &str = "counter";
pub const ARG_DIGITS: &str = "digits";

fn identity_arg() -> Arg {
    Arg::new(ARG_IDENTITY)
        .short('u')
        .long("identity")
        .help("Card or user reference the code belongs to")
        .required(true)
}

fn validate_command() -> Command {
    let command = Command::new("validate")
        .about("Validate a code and consume it")
        .arg(identity_arg())
        .arg(
            Arg::new(ARG_CODE)
                .long("code")
                .help("Code shown by the token")
                .required(true),
        );

    let command = store::with_secrets_args(command);
    let command = store::with_counters_args(command);
    store::with_validator_args(command)
}

fn generate_command() -> Command {
    Command::new("generate")
        .about("Print the code for a secret and counter")
        .arg(
            Arg::new(ARG_SECRET)
                .long("secret")
                .help("Base32 secret")
                .env("HOTP_SECRET")
                .hide_env_values(true)
                .required(true),
        )
        .arg(
            Arg::new(ARG_COUNTER)
                .long("counter")
                .help("Counter position")
                .value_parser(clap::value_parser!(u64))
                .required(true),
        )
        .arg(
            Arg::new(ARG_DIGITS)
                .long("digits")
                .help("Code length")
                .default_value("6")
                .value_parser(clap::value_parser!(u32).range(6..=8)),
        )
}

fn counter_command() -> Command {
    let command = Command::new("counter")
        .about("Print the stored counter for an identity")
        .arg(identity_arg());

    store::with_counters_args(command)
}

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("hotp")
        .about("HOTP code validation")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(validate_command())
        .subcommand(generate_command())
        .subcommand(counter_command());

    logging::with_args(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_new() {
        let command = new();

        assert_eq!(command.get_name(), "hotp");
        assert_eq!(
            command.get_about().map(ToString::to_string),
            Some("HOTP code validation".to_string())
        );
        assert_eq!(
            command.get_version().map(ToString::to_string),
            Some(env!("CARGO_PKG_VERSION").to_string())
        );
    }

    #[test]
    fn test_validate_args() {
        temp_env::with_vars(
            [
                ("HOTP_INCREMENT", None::<&str>),
                ("HOTP_DISABLED", None::<&str>),
            ],
            || {
                let matches = new().get_matches_from(vec![
                    "hotp",
                    "validate",
                    "--identity",
                    "qwerty",
                    "--code",
                    "644039",
                    "--secrets",
                    "/etc/hotp/secrets",
                    "--counters",
                    "/var/lib/hotp/counters",
                ]);

                let Some(("validate", sub)) = matches.subcommand() else {
                    panic!("expected validate subcommand");
                };
                assert_eq!(
                    sub.get_one::<String>(ARG_IDENTITY).map(String::as_str),
                    Some("qwerty")
                );
                assert_eq!(
                    sub.get_one::<String>(ARG_CODE).map(String::as_str),
                    Some("644039")
                );
                assert_eq!(
                    sub.get_one::<PathBuf>(store::ARG_SECRETS),
                    Some(&PathBuf::from("/etc/hotp/secrets"))
                );
                assert_eq!(
                    sub.get_one::<PathBuf>(store::ARG_COUNTERS),
                    Some(&PathBuf::from("/var/lib/hotp/counters"))
                );
                assert_eq!(sub.get_one::<u64>(store::ARG_INCREMENT).copied(), Some(crate::hotp::DEFAULT_INCREMENT));
                assert_eq!(sub.get_one::<bool>(store::ARG_DISABLED).copied(), Some(false));
            },
        );
    }

    #[test]
    fn test_validate_env() {
        temp_env::with_vars(
            [
                ("HOTP_SECRETS", Some("/etc/hotp/secrets")),
                ("HOTP_COUNTERS", Some("/var/lib/hotp/counters")),
                ("HOTP_INCREMENT", Some("2")),
                ("HOTP_DISABLED", Some("true")),
                ("HOTP_LOG_LEVEL", Some("info")),
            ],
            || {
                let matches = new().get_matches_from(vec![
                    "hotp", "validate", "-u", "qwerty", "--code", "644039",
                ]);

                assert_eq!(
                    matches
                        .get_one::<u8>(logging::ARG_VERBOSITY)
                        .copied(),
                    Some(2)
                );

                let Some(("validate", sub)) = matches.subcommand() else {
                    panic!("expected validate subcommand");
                };
                assert_eq!(sub.get_one::<u64>(store::ARG_INCREMENT).copied(), Some(2));
                assert_eq!(sub.get_one::<bool>(store::ARG_DISABLED).copied(), Some(true));
                assert_eq!(
                    sub.get_one::<PathBuf>(store::ARG_COUNTERS),
                    Some(&PathBuf::from("/var/lib/hotp/counters"))
                );
            },
        );
    }

    #[test]
    fn test_zero_increment_rejected() {
        temp_env::with_vars([("HOTP_INCREMENT", None::<&str>)], || {
            let result = new().try_get_matches_from(vec![
                "hotp",
                "validate",
                "-u",
                "qwerty",
                "--code",
                "644039",
                "-s",
                "secrets",
                "-c",
                "counters",
                "--increment",
                "0",
            ]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn test_generate_args() {
        temp_env::with_vars([("HOTP_SECRET", None::<&str>)], || {
            let matches = new().get_matches_from(vec![
                "hotp",
                "generate",
                "--secret",
                "DFIOJ3BJPHPCRJBT",
                "--counter",
                "2",
            ]);

            let Some(("generate", sub)) = matches.subcommand() else {
                panic!("expected generate subcommand");
            };
            assert_eq!(sub.get_one::<u64>(ARG_COUNTER).copied(), Some(2));
            assert_eq!(sub.get_one::<u32>(ARG_DIGITS).copied(), Some(6));

            let result = new().try_get_matches_from(vec![
                "hotp",
                "generate",
                "--secret",
                "DFIOJ3BJPHPCRJBT",
                "--counter",
                "2",
                "--digits",
                "10",
            ]);
            assert!(result.is_err());
        });
    }

    #[test]
    fn test_missing_subcommand() {
        let result = new().try_get_matches_from(vec!["hotp"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_check_log_level_env() {
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, &level) in levels.iter().enumerate() {
            temp_env::with_vars(
                [
                    ("HOTP_LOG_LEVEL", Some(level)),
                    ("HOTP_COUNTERS", Some("/var/lib/hotp/counters")),
                ],
                || {
                    let matches =
                        new().get_matches_from(vec!["hotp", "counter", "--identity", "qwerty"]);
                    assert_eq!(
                        matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                        Some(index as u8)
                    );
                },
            );
        }
    }

    #[test]
    fn test_numeric_log_level_env() {
        for (level, expected) in [("0", Some(0)), ("4", Some(4)), ("5", None), ("255", None)] {
            temp_env::with_vars(
                [
                    ("HOTP_LOG_LEVEL", Some(level)),
                    ("HOTP_COUNTERS", Some("/var/lib/hotp/counters")),
                ],
                || {
                    let result =
                        new().try_get_matches_from(vec!["hotp", "counter", "--identity", "qwerty"]);
                    let parsed = result
                        .ok()
                        .and_then(|matches| matches.get_one::<u8>(logging::ARG_VERBOSITY).copied());
                    assert_eq!(parsed, expected, "level {level}");
                },
            );
        }
    }

    #[test]
    fn test_check_log_level_verbosity() {
        let levels = vec!["error", "warn", "info", "debug", "trace"];
        for (index, _) in levels.iter().enumerate() {
            temp_env::with_vars([("HOTP_LOG_LEVEL", None::<String>)], || {
                let mut args = vec![
                    "hotp".to_string(),
                    "counter".to_string(),
                    "--identity".to_string(),
                    "qwerty".to_string(),
                    "--counters".to_string(),
                    "/var/lib/hotp/counters".to_string(),
                ];

                if index > 0 {
                    args.push(format!("-{}", "v".repeat(index)));
                }

                let matches = new().get_matches_from(args);

                assert_eq!(
                    matches.get_one::<u8>(logging::ARG_VERBOSITY).copied(),
                    Some(index as u8)
                );
            });
        }
    }
}
