use crate::{
    cli::globals::GlobalArgs,
    hotp::{CounterStore, Hotp},
    secrets::{KeyValueStore, Secret},
};
use anyhow::{Context, Result, anyhow};
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub identity: String,
    pub code: String,
}

/// Builds the validator described by `globals` from its files.
///
/// # Errors
/// Returns an error if either file cannot be loaded or the settings are invalid.
pub fn validator(globals: &GlobalArgs) -> Result<Hotp<KeyValueStore<Secret>>> {
    let secrets = KeyValueStore::new("secrets", Secret::from_base32);
    if let Some(path) = &globals.secrets {
        secrets
            .load(path)
            .with_context(|| format!("Failed to load secrets from {}", path.display()))?;
    }

    let counters = CounterStore::load(&globals.counters).with_context(|| {
        format!(
            "Failed to load counters from {}",
            globals.counters.display()
        )
    })?;

    debug!(
        secrets = secrets.len(),
        counters = counters.len(),
        "HOTP stores ready"
    );

    Ok(Hotp::new(globals.config, secrets, counters)?)
}

/// Validate `args.code` for `args.identity` and print `accepted`.
/// # Errors
/// Returns an error naming the rejection reason if the code is not accepted.
pub fn execute(args: &Args) -> Result<()> {
    let hotp = validator(&args.globals)?;

    hotp.validate(&args.identity, &args.code)
        .map_err(|e| anyhow!("{}: {e}", args.identity))?;

    println!("accepted");

    Ok(())
}
