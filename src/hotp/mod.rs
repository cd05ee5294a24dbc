//! Counter-based one-time password validation.

pub mod counters;
pub mod error;
pub mod generator;

pub use counters::CounterStore;
pub use error::{Error, Result};
pub use generator::{DIGITS, MAX_DIGITS, generate};

use crate::secrets::{Secret, SecretLookup};
use subtle::ConstantTimeEq;
use tracing::{error, info, instrument, warn};

pub const DEFAULT_INCREMENT: u64 = 8;

/// Validator settings, fixed for the lifetime of a [`Hotp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// When false every code is accepted without any check. This only exists to
    /// switch HOTP off for a deployment, it is not an authentication decision.
    pub enabled: bool,
    /// How many counter positions, starting at the stored counter, are tried.
    pub increment: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: true,
            increment: DEFAULT_INCREMENT,
        }
    }
}

#[derive(Debug)]
pub struct Hotp<S> {
    enabled: bool,
    increment: u64,
    secrets: S,
    counters: CounterStore,
}

impl<S: SecretLookup> Hotp<S> {
    /// # Errors
    /// Returns `Error::InvalidIncrement` if `config.increment` is zero.
    pub fn new(config: Config, secrets: S, counters: CounterStore) -> Result<Self> {
        if config.increment == 0 {
            return Err(Error::InvalidIncrement);
        }

        Ok(Self {
            enabled: config.enabled,
            increment: config.increment,
            secrets,
            counters,
        })
    }

    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub const fn increment(&self) -> u64 {
        self.increment
    }

    #[must_use]
    pub const fn counters(&self) -> &CounterStore {
        &self.counters
    }

    #[must_use]
    pub const fn secrets(&self) -> &S {
        &self.secrets
    }

    /// Checks `code` for `identity` and consumes it.
    ///
    /// Codes are generated for the stored counter `c` up to
    /// `c + increment - 1`, in that order. The first match at `c + i` stores
    /// `c + i + 1`, so that code and every code before it are spent. A code that
    /// matches nothing leaves the counter where it was.
    ///
    /// # Errors
    /// - `Error::UnknownIdentity` if there is no secret for `identity`.
    /// - `Error::UnprovisionedCounter` if `identity` has no counter.
    /// - `Error::InvalidOrOutOfRangeCode` if no position in the window matches.
    /// - `Error::PersistenceFailure` if the code matched but the new counter
    ///   could not be written durably. The code stays consumed if the counters
    ///   file was already replaced.
    #[instrument(skip(self, code), fields(increment = self.increment))]
    pub fn validate(&self, identity: &str, code: &str) -> Result<()> {
        if !self.enabled {
            warn!("HOTP disabled, accepting code without validation");
            return Ok(());
        }

        let secret = self
            .secrets
            .secret(identity)
            .ok_or_else(|| Error::UnknownIdentity(identity.to_string()))
            .inspect_err(|_| warn!("HOTP rejected: unknown identity"))?;

        let result = self
            .counters
            .advance(identity, |counter| self.search(&secret, counter, code));

        match &result {
            Ok(counter) => info!(counter, "HOTP code accepted"),
            Err(Error::PersistenceFailure(e)) => {
                error!(error = %e, "HOTP code matched but counter could not be saved");
            }
            Err(e) => warn!(error = %e, "HOTP rejected"),
        }

        result.map(|_| ())
    }

    /// Returns the counter following the lowest matching position, if any.
    fn search(&self, secret: &Secret, counter: u64, code: &str) -> Result<Option<u64>> {
        for offset in 0..self.increment {
            // u64::MAX itself is never tried, there would be no next counter to store
            let Some(position) = counter.checked_add(offset).filter(|p| *p < u64::MAX) else {
                break;
            };

            let expected = generate(secret.expose(), position, DIGITS)?;
            if bool::from(expected.as_bytes().ct_eq(code.as_bytes())) {
                return Ok(Some(position + 1));
            }
        }

        Ok(None)
    }
}
