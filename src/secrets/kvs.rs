use crate::{
    entries,
    hotp::error::{Error, Result},
};
use std::{
    collections::HashMap,
    fmt,
    path::Path,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard},
};
use tracing::{debug, info, instrument};

/// Turns the stored text form of a value into `V`.
pub type Decoder<V> = fn(&str) -> Result<V>;

/// Named in-memory key-value store whose values are decoded on insertion.
///
/// The store does not know the shape of its values; the decoder it is built
/// with does. Values are handed out as `Arc`s so readers never hold the lock.
pub struct KeyValueStore<V> {
    name: String,
    decoder: Decoder<V>,
    values: RwLock<HashMap<String, Arc<V>>>,
}

impl<V> KeyValueStore<V> {
    #[must_use]
    pub fn new(name: impl Into<String>, decoder: Decoder<V>) -> Self {
        Self {
            name: name.into(),
            decoder,
            values: RwLock::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Decodes `raw` and stores it under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns `Error::InvalidIdentity` if `key` cannot be represented in a
    /// store file, or the decoder's error if `raw` is rejected.
    pub fn put(&self, key: &str, raw: &str) -> Result<()> {
        if !entries::valid_key(key) {
            return Err(Error::InvalidIdentity(key.to_string()));
        }

        let value = (self.decoder)(raw)?;

        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), Arc::new(value));

        Ok(())
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<Arc<V>> {
        self.read().get(key).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Loads `key value` lines from `path` into the store.
    ///
    /// Nothing is stored unless every line decodes. Returns the number of
    /// entries loaded.
    ///
    /// # Errors
    /// Returns an error naming the file and line of the first entry that is
    /// malformed or rejected by the decoder, or if the file cannot be read.
    #[instrument(skip(self, path), fields(store = %self.name, path = %path.as_ref().display()))]
    pub fn load(&self, path: impl AsRef<Path>) -> anyhow::Result<usize> {
        let mut decoded = HashMap::new();

        entries::read(path.as_ref(), |key, raw| {
            let value = (self.decoder)(raw)?;
            decoded.insert(key.to_string(), Arc::new(value));
            Ok(())
        })?;

        let loaded = decoded.len();
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(decoded);

        info!(loaded, "Loaded {} entries", self.name);
        debug!(total = self.len(), "{} store size", self.name);

        Ok(loaded)
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<V>>> {
        // Writers only insert whole values, a poisoned map is still usable
        self.values.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V> fmt::Debug for KeyValueStore<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyValueStore")
            .field("name", &self.name)
            .field("entries", &self.len())
            .finish_non_exhaustive()
    }
}
