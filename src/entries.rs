//! Line-oriented `key value` files shared by the secret and counter stores.
//!
//! One entry per line, key and value separated by whitespace. Blank lines and
//! lines starting with `#` are ignored.

use anyhow::{Context, Result, anyhow};
use std::{fmt::Display, fs, path::Path};

/// A key must be non-empty and free of whitespace to survive a round trip.
pub(crate) fn valid_key(key: &str) -> bool {
    !key.is_empty() && !key.starts_with('#') && !key.chars().any(char::is_whitespace)
}

/// Parses `contents`, calling `entry` for every `(key, value)` pair.
///
/// # Errors
/// Returns the first malformed line, or the first error raised by `entry`,
/// annotated with `origin` and the 1-based line number.
pub(crate) fn parse<F>(origin: &str, contents: &str, mut entry: F) -> Result<usize>
where
    F: FnMut(&str, &str) -> Result<()>,
{
    let mut count = 0;

    for (index, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let lineno = index + 1;
        let mut fields = line.split_whitespace();
        let (Some(key), Some(value), None) = (fields.next(), fields.next(), fields.next()) else {
            return Err(anyhow!("{origin}:{lineno}: expected '<key> <value>'"));
        };

        entry(key, value).with_context(|| format!("{origin}:{lineno}: invalid entry '{key}'"))?;
        count += 1;
    }

    Ok(count)
}

/// Reads and parses the file at `path`.
///
/// # Errors
/// Returns an error if the file cannot be read or a line is malformed.
pub(crate) fn read<F>(path: &Path, entry: F) -> Result<usize>
where
    F: FnMut(&str, &str) -> Result<()>,
{
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    parse(&path.display().to_string(), &contents, entry)
}

/// Renders entries in the format [`parse`] reads back.
pub(crate) fn render<'a, V, I>(entries: I) -> String
where
    V: Display + 'a,
    I: IntoIterator<Item = (&'a String, &'a V)>,
{
    let mut out = String::new();
    for (key, value) in entries {
        out.push_str(key);
        out.push('\t');
        out.push_str(&value.to_string());
        out.push('\n');
    }
    out
}
