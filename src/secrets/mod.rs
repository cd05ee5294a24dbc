//! Shared secrets and the lookup the validator reads them through.

pub mod kvs;

pub use kvs::{Decoder, KeyValueStore};

use crate::hotp::error::{Error, Result};
use data_encoding::BASE32_NOPAD_NOCASE;
use secrecy::{ExposeSecret, SecretBox};
use std::sync::Arc;

/// Raw HOTP key bytes, zeroized on drop and redacted from `Debug` output.
#[derive(Debug)]
pub struct Secret(SecretBox<[u8]>);

impl Secret {
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(SecretBox::new(bytes.into_boxed_slice()))
    }

    /// Decodes an RFC 4648 base32 secret as printed by authenticator apps.
    ///
    /// Case, `=` padding and surrounding whitespace are ignored.
    ///
    /// # Errors
    /// Returns `Error::InvalidSecret` if the input is not base32 or decodes to
    /// an empty key.
    pub fn from_base32(encoded: &str) -> Result<Self> {
        let trimmed = encoded.trim().trim_end_matches('=');

        let bytes = BASE32_NOPAD_NOCASE
            .decode(trimmed.as_bytes())
            .map_err(|e| Error::InvalidSecret(e.to_string()))?;

        if bytes.is_empty() {
            return Err(Error::InvalidSecret("empty secret".to_string()));
        }

        Ok(Self::from_bytes(bytes))
    }

    pub(crate) fn expose(&self) -> &[u8] {
        self.0.expose_secret()
    }
}

/// Source of the shared secret for an identity.
pub trait SecretLookup {
    fn secret(&self, identity: &str) -> Option<Arc<Secret>>;
}

impl SecretLookup for KeyValueStore<Secret> {
    fn secret(&self, identity: &str) -> Option<Arc<Secret>> {
        self.get(identity)
    }
}

impl<T: SecretLookup + ?Sized> SecretLookup for Arc<T> {
    fn secret(&self, identity: &str) -> Option<Arc<Secret>> {
        (**self).secret(identity)
    }
}
