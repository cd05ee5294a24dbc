use super::error::{Error, Result};
use crate::entries;
use anyhow::Context;
use std::{
    collections::BTreeMap,
    fmt, fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard, PoisonError},
};
use tempfile::NamedTempFile;
use tracing::{debug, error, info};

/// Last accepted counter per identity.
///
/// Every operation runs under one mutex. When a path is configured the whole
/// table is rewritten to it after each change, and the in-memory value only
/// moves once that write has succeeded.
pub struct CounterStore {
    counters: Mutex<BTreeMap<String, u64>>,
    path: Option<PathBuf>,
}

impl CounterStore {
    /// Memory-only store, counters are lost when the process exits.
    #[must_use]
    pub fn new() -> Self {
        Self {
            counters: Mutex::new(BTreeMap::new()),
            path: None,
        }
    }

    /// Empty store mirrored to `path`. The file is created on the first write.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            counters: Mutex::new(BTreeMap::new()),
            path: Some(path.into()),
        }
    }

    /// Loads the counters file at `path`, binding the store to it.
    ///
    /// A missing file yields an empty store.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read, or if a line is
    /// not a valid `identity counter` pair.
    pub fn load(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        let mut counters = BTreeMap::new();

        if path.exists() {
            let loaded = entries::read(&path, |identity, value| {
                let counter = value
                    .parse::<u64>()
                    .with_context(|| format!("invalid counter '{value}'"))?;
                counters.insert(identity.to_string(), counter);
                Ok(())
            })?;
            info!(path = %path.display(), loaded, "Loaded HOTP counters");
        } else {
            info!(path = %path.display(), "HOTP counters file not found, starting empty");
        }

        Ok(Self {
            counters: Mutex::new(counters),
            path: Some(path),
        })
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn get(&self, identity: &str) -> Option<u64> {
        self.lock().get(identity).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Provisions `identity` with `counter`, writing through to the file.
    ///
    /// An existing counter can only be kept or raised, never lowered.
    ///
    /// # Errors
    /// - `Error::InvalidIdentity` if the identity cannot be stored in the
    ///   counters file.
    /// - `Error::CounterRegression` if `counter` is below the stored counter.
    /// - `Error::PersistenceFailure` if the write fails.
    pub fn set(&self, identity: &str, counter: u64) -> Result<()> {
        if !entries::valid_key(identity) {
            return Err(Error::InvalidIdentity(identity.to_string()));
        }

        let mut counters = self.lock();

        if let Some(&stored) = counters.get(identity) {
            if counter < stored {
                return Err(Error::CounterRegression {
                    identity: identity.to_string(),
                    stored,
                    requested: counter,
                });
            }
        }

        self.store(&mut counters, identity, counter)
    }

    /// Atomically reads the counter for `identity`, passes it to `search` and
    /// stores the counter `search` returns.
    ///
    /// The lock is held for the whole sequence, so concurrent callers for the
    /// same identity observe each other's updates. `search` returning `None`
    /// leaves the counter untouched. Returns the stored counter.
    ///
    /// # Errors
    /// - `Error::UnprovisionedCounter` if `identity` has no counter.
    /// - `Error::InvalidOrOutOfRangeCode` if `search` returns `None`.
    /// - `Error::PersistenceFailure` if the new counter cannot be written. The
    ///   in-memory counter is only advanced when the file already holds it.
    /// - any error returned by `search`.
    pub fn advance<F>(&self, identity: &str, search: F) -> Result<u64>
    where
        F: FnOnce(u64) -> Result<Option<u64>>,
    {
        let mut counters = self.lock();

        let current = counters
            .get(identity)
            .copied()
            .ok_or_else(|| Error::UnprovisionedCounter(identity.to_string()))?;

        let next = search(current)?.ok_or(Error::InvalidOrOutOfRangeCode)?;
        debug_assert!(next > current, "counter must move forward");

        self.store(&mut counters, identity, next)?;

        Ok(next)
    }

    fn store(
        &self,
        counters: &mut BTreeMap<String, u64>,
        identity: &str,
        counter: u64,
    ) -> Result<()> {
        let previous = counters.insert(identity.to_string(), counter);

        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Err(e) = replace(path, counters) {
            error!(path = %path.display(), error = %e, "Failed to persist HOTP counters");

            match previous {
                Some(value) => counters.insert(identity.to_string(), value),
                None => counters.remove(identity),
            };

            return Err(Error::PersistenceFailure(e));
        }

        // The rename already happened, memory follows the file from here on
        if let Err(e) = sync_dir(path) {
            error!(path = %path.display(), error = %e, "Failed to sync HOTP counters directory");
            return Err(Error::PersistenceFailure(e));
        }

        debug!(path = %path.display(), "HOTP counters persisted");

        Ok(())
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, u64>> {
        // The table is restored before any error is returned, so a poisoned
        // guard still holds a consistent view
        self.counters.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CounterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CounterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CounterStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl<K: Into<String>> FromIterator<(K, u64)> for CounterStore {
    /// Memory-only store seeded with `(identity, counter)` pairs.
    fn from_iter<I: IntoIterator<Item = (K, u64)>>(iter: I) -> Self {
        Self {
            counters: Mutex::new(iter.into_iter().map(|(k, v)| (k.into(), v)).collect()),
            path: None,
        }
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Writes `counters` to a temporary file next to `path`, syncs it and renames
/// it over `path`, so a crash leaves either the old or the new table.
///
/// The temporary file takes over the permissions of the file it replaces.
fn replace(path: &Path, counters: &BTreeMap<String, u64>) -> io::Result<()> {
    let mut file = NamedTempFile::new_in(parent_dir(path))?;

    match fs::metadata(path) {
        Ok(metadata) => file.as_file().set_permissions(metadata.permissions())?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    file.write_all(entries::render(counters).as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;

    Ok(())
}

/// Flushes the directory entry created by the rename in [`replace`].
#[cfg(unix)]
fn sync_dir(path: &Path) -> io::Result<()> {
    fs::File::open(parent_dir(path))?.sync_all()
}

// Directories cannot be opened as files here, the rename is all there is
#[cfg(not(unix))]
#[allow(clippy::unnecessary_wraps)]
fn sync_dir(_path: &Path) -> io::Result<()> {
    Ok(())
}
