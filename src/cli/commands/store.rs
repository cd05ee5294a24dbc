use clap::{Arg, ArgAction, Command};

pub const ARG_SECRETS: &str = "secrets";
pub const ARG_COUNTERS: &str = "counters";
pub const ARG_INCREMENT: &str = "increment";
pub const ARG_DISABLED: &str = "disabled";

#[must_use]
pub fn with_secrets_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_SECRETS)
            .short('s')
            .long("secrets")
            .help("File of '<identity> <base32 secret>' lines")
            .env("HOTP_SECRETS")
            .value_parser(clap::value_parser!(std::path::PathBuf))
            .required(true),
    )
}

#[must_use]
pub fn with_counters_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_COUNTERS)
            .short('c')
            .long("counters")
            .help("File of '<identity> <counter>' lines, rewritten after every accepted code")
            .env("HOTP_COUNTERS")
            .value_parser(clap::value_parser!(std::path::PathBuf))
            .required(true),
    )
}

#[must_use]
pub fn with_validator_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_INCREMENT)
                .short('i')
                .long("increment")
                .help("Number of counter positions searched ahead of the stored counter")
                .env("HOTP_INCREMENT")
                .default_value("8")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
        .arg(
            Arg::new(ARG_DISABLED)
                .long("disabled")
                .help("Accept every code without checking it (deployment bypass)")
                .env("HOTP_DISABLED")
                .action(ArgAction::SetTrue),
        )
}
