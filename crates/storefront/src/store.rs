//! Persistent key-value storage for the cart.
//!
//! The widget only needs string get/set against a fixed key, the same
//! contract a browser's local storage offers. [`KeyValueStore`] is that
//! contract; [`CartStorage`] layers the cart's JSON layout on top and turns
//! every failure into a logged no-op.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use storecart_core::LineItem;
use thiserror::Error;
use tracing::{debug, warn};

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "cart";

/// Errors raised by a [`KeyValueStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing medium failed.
    #[error("storage I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    /// The key cannot be mapped onto the backing medium.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// The value could not be serialized.
    #[error("failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String key-value storage that survives restarts.
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &mut T {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get_item(key)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_item(key, value)
    }
}

// =============================================================================
// In-memory backend
// =============================================================================

/// Volatile store backed by a `HashMap`.
///
/// Counts writes so callers can tell whether an operation persisted anything.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one value.
    #[must_use]
    pub fn with_item(key: &str, value: &str) -> Self {
        let mut items = HashMap::new();
        items.insert(key.to_owned(), value.to_owned());
        Self { items, writes: 0 }
    }

    /// Number of successful `set_item` calls so far.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }

    /// Raw stored value for `key`.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items.insert(key.to_owned(), value.to_owned());
        self.writes += 1;
        Ok(())
    }
}

// =============================================================================
// File backend
// =============================================================================

/// Durable store keeping one `<key>.json` file per key in a directory.
///
/// The directory is created on first write. Writes go to a temporary file
/// that is renamed over the target, so a crash never leaves a half-written
/// value behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory holding the stored values.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_owned()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StoreError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let io_err = |source| StoreError::Io {
            key: key.to_owned(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io_err)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(io_err)?;
        fs::rename(&tmp, &path).map_err(io_err)?;
        Ok(())
    }
}

// =============================================================================
// Cart persistence adapter
// =============================================================================

/// Loads and saves the cart's line items under a single storage key.
///
/// Neither direction ever fails from the caller's point of view: a missing
/// or malformed value loads as an empty cart and a failed write is dropped.
/// Both cases are logged.
#[derive(Debug, Clone)]
pub struct CartStorage<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> CartStorage<S> {
    /// Bind `store` to `key`.
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Bind `store` to [`DEFAULT_STORAGE_KEY`].
    pub fn with_default_key(store: S) -> Self {
        Self::new(store, DEFAULT_STORAGE_KEY)
    }

    /// The storage key in use.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Read the persisted cart.
    ///
    /// Returns an empty list when nothing is stored or the stored value is
    /// not a valid cart. Duplicate product IDs in the stored value are merged
    /// into their first occurrence.
    #[must_use]
    pub fn load(&self) -> Vec<LineItem> {
        let raw = match self.store.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "No persisted cart");
                return Vec::new();
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read persisted cart");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Option<Vec<LineItem>>>(&raw) {
            Ok(items) => merge_duplicates(items.unwrap_or_default()),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Discarding malformed persisted cart");
                Vec::new()
            }
        }
    }

    /// Persist `items`, replacing the stored cart.
    pub fn save(&mut self, items: &[LineItem]) {
        let result = serde_json::to_string(items)
            .map_err(StoreError::from)
            .and_then(|value| self.store.set_item(&self.key, &value));

        if let Err(e) = result {
            warn!(key = %self.key, error = %e, "Failed to persist cart");
        }
    }
}

fn merge_duplicates(items: Vec<LineItem>) -> Vec<LineItem> {
    let mut merged: Vec<LineItem> = Vec::with_capacity(items.len());
    for item in items {
        if let Some(existing) = merged.iter_mut().find(|line| line.id == item.id) {
            existing.quantity = existing.quantity.saturating_add(item.quantity);
        } else {
            merged.push(item);
        }
    }
    merged
}
