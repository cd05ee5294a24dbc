use crate::hotp::CounterStore;
use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;

#[derive(Debug)]
pub struct Args {
    pub counters: PathBuf,
    pub identity: String,
}

/// Read the stored counter for `args.identity`.
/// # Errors
/// Returns an error if the counters file cannot be loaded or has no entry.
pub fn lookup(args: &Args) -> Result<u64> {
    let store = CounterStore::load(&args.counters)
        .with_context(|| format!("Failed to load counters from {}", args.counters.display()))?;

    store
        .get(&args.identity)
        .ok_or_else(|| anyhow!("no counter provisioned for identity: {}", args.identity))
}

/// Print the stored counter for `args.identity`.
/// # Errors
/// Returns an error if the counters file cannot be loaded or has no entry.
pub fn execute(args: &Args) -> Result<()> {
    println!("{}", lookup(args)?);

    Ok(())
}
