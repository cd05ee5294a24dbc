use crate::{
    cli::{
        actions::{Action, counter, generate, validate},
        commands::{self, store},
        globals::GlobalArgs,
    },
    hotp::Config,
};
use anyhow::{Context, Result, anyhow};
use clap::ArgMatches;
use secrecy::SecretString;
use std::path::PathBuf;

fn required<T: Clone + Send + Sync + 'static>(matches: &ArgMatches, id: &str) -> Result<T> {
    matches
        .get_one::<T>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}

fn globals(matches: &ArgMatches) -> Result<GlobalArgs> {
    let counters = required::<PathBuf>(matches, store::ARG_COUNTERS)?;
    let secrets = required::<PathBuf>(matches, store::ARG_SECRETS)?;

    let config = Config {
        enabled: !matches.get_flag(store::ARG_DISABLED),
        increment: required::<u64>(matches, store::ARG_INCREMENT)?,
    };

    Ok(GlobalArgs::new(counters)
        .with_secrets(secrets)
        .with_config(config))
}

/// # Errors
/// Returns an error if required arguments are missing or no subcommand was given.
pub fn handler(matches: &ArgMatches) -> Result<Action> {
    match matches.subcommand() {
        Some(("validate", sub)) => Ok(Action::Validate(validate::Args {
            globals: globals(sub)?,
            identity: required(sub, commands::ARG_IDENTITY)?,
            code: required(sub, commands::ARG_CODE)?,
        })),
        Some(("generate", sub)) => Ok(Action::Generate(generate::Args {
            secret: SecretString::from(required::<String>(sub, commands::ARG_SECRET)?),
            counter: required(sub, commands::ARG_COUNTER)?,
            digits: required(sub, commands::ARG_DIGITS)?,
        })),
        Some(("counter", sub)) => Ok(Action::Counter(counter::Args {
            counters: required(sub, store::ARG_COUNTERS)?,
            identity: required(sub, commands::ARG_IDENTITY)?,
        })),
        Some((name, _)) => Err(anyhow!("unknown subcommand: {name}")),
        None => Err(anyhow!("missing subcommand")),
    }
}
