//! RFC 4226 code derivation.

use super::error::{Error, Result};
use hmac::{Hmac, Mac};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// Number of digits in the codes accepted by [`super::Hotp`].
pub const DIGITS: u32 = 6;

/// Longest code a 31-bit truncated value can fill.
pub const MAX_DIGITS: u32 = 9;

/// Generates the `digits` long code for `counter`.
///
/// The counter is hashed as an 8-byte big-endian integer with HMAC-SHA1 keyed
/// by `secret`, then dynamically truncated to a 31-bit value and reduced modulo
/// `10^digits`. The result is zero padded to exactly `digits` characters.
///
/// # Errors
/// - `Error::InvalidDigits` if `digits` is not between 1 and [`MAX_DIGITS`].
/// - `Error::InvalidSecret` if the HMAC cannot be keyed with `secret`.
pub fn generate(secret: &[u8], counter: u64, digits: u32) -> Result<String> {
    if !(1..=MAX_DIGITS).contains(&digits) {
        return Err(Error::InvalidDigits(digits));
    }

    let mut mac =
        HmacSha1::new_from_slice(secret).map_err(|e| Error::InvalidSecret(e.to_string()))?;
    mac.update(&counter.to_be_bytes());
    let digest = mac.finalize().into_bytes();

    // SHA-1 digests are 20 bytes, the offset is at most 15
    let offset = usize::from(digest[digest.len() - 1] & 0x0f);
    let truncated = u32::from_be_bytes([
        digest[offset],
        digest[offset + 1],
        digest[offset + 2],
        digest[offset + 3],
    ]) & 0x7fff_ffff;

    let code = u64::from(truncated) % 10u64.pow(digits);
    let width = digits as usize;

    Ok(format!("{code:0width$}"))
}
