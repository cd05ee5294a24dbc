//! # HOTP validator
//!
//! Counter-based one-time password validation (RFC 4226) for card and user
//! credentials, with a persisted per-identity counter that provides replay
//! protection.
//!
//! ## Components
//!
//! - [`hotp::generate`]: the HMAC-SHA1 code derivation with dynamic truncation.
//! - [`hotp::CounterStore`]: the last-accepted counter per identity, guarded by a
//!   single mutex and mirrored to a text file that is rewritten atomically after
//!   every successful validation.
//! - [`secrets::KeyValueStore`]: identity to secret lookup with an injected
//!   decoder (`Secret::from_base32` for HOTP secrets).
//! - [`hotp::Hotp`]: searches `increment` counter positions ahead of the stored
//!   counter, advancing it only when a code matches.
//!
//! ## Replay protection
//!
//! The window always starts at the stored counter, so a code for any position
//! that was already consumed can never match again. Failed attempts never move
//! the counter, and an accepted code is only reported once its new counter is
//! on disk.

pub mod cli;
pub mod hotp;
pub mod secrets;

mod entries;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
