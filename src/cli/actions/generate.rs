use crate::{hotp, secrets::Secret};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};

#[derive(Debug)]
pub struct Args {
    pub secret: SecretString,
    pub counter: u64,
    pub digits: u32,
}

/// Compute the code for `args.counter`.
/// # Errors
/// Returns an error if the secret is not valid base32 or `args.digits` is out
/// of range.
pub fn code(args: &Args) -> Result<String> {
    let secret = Secret::from_base32(args.secret.expose_secret()).context("Invalid --secret")?;

    Ok(hotp::generate(secret.expose(), args.counter, args.digits)?)
}

/// Print the code for `args.counter`.
/// # Errors
/// Returns an error if the secret is not valid base32.
pub fn execute(args: &Args) -> Result<()> {
    println!("{}", code(args)?);

    Ok(())
}
