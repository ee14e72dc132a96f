//! Configuration management for a Monguito store.

use indexmap::IndexSet;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::common::{atomic, Atomic, ReadExecutor, WriteExecutor};
use crate::errors::{ErrorKind, MonguitoError, MonguitoResult};
use crate::store::memory::InMemoryStorage;
use crate::store::{validate_storage, KeyValueStore};

static COLLECTION_NAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[$A-Za-z_][0-9A-Za-z_$]*$").expect("collection name pattern must compile")
});

/// Returns `true` when `name` can be used as a collection name: a letter,
/// `_` or `$` followed by letters, digits, `_` or `$`.
pub fn is_valid_collection_name(name: &str) -> bool {
    COLLECTION_NAME_PATTERN.is_match(name)
}

/// Settings a [crate::monguito::Monguito] store is opened with.
///
/// `MonguitoConfig` holds the storage handle, if any, and the collection
/// names in declaration order with duplicates dropped. It is cheap to
/// clone; clones share state. Once a store has been opened from it the
/// configuration is frozen.
#[derive(Clone)]
pub struct MonguitoConfig {
    inner: Arc<MonguitoConfigInner>,
}

impl Default for MonguitoConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl MonguitoConfig {
    pub fn new() -> Self {
        MonguitoConfig {
            inner: Arc::new(MonguitoConfigInner::new()),
        }
    }

    /// The configured storage handle, `None` meaning in-memory storage.
    pub fn storage(&self) -> Option<KeyValueStore> {
        self.inner.storage()
    }

    pub fn set_storage(&self, storage: KeyValueStore) -> MonguitoResult<()> {
        self.inner.set_storage(storage)
    }

    /// Declares a collection. Declaring the same name twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCollectionName` when `name` is not a valid
    /// identifier token.
    pub fn add_collection(&self, name: &str) -> MonguitoResult<()> {
        self.inner.add_collection(name)
    }

    pub fn collection_names(&self) -> Vec<String> {
        self.inner.collection_names()
    }

    pub fn is_configured(&self) -> bool {
        self.inner.configured.load(Ordering::Relaxed)
    }

    /// Validates the configuration, freezes it and returns the storage the
    /// store should use.
    pub(crate) fn initialize(&self) -> MonguitoResult<KeyValueStore> {
        self.inner.initialize()
    }
}

struct MonguitoConfigInner {
    configured: AtomicBool,
    storage: Atomic<Option<KeyValueStore>>,
    collection_names: Atomic<IndexSet<String>>,
}

impl MonguitoConfigInner {
    fn new() -> Self {
        MonguitoConfigInner {
            configured: AtomicBool::from(false),
            storage: atomic(None),
            collection_names: atomic(IndexSet::new()),
        }
    }

    fn storage(&self) -> Option<KeyValueStore> {
        self.storage.read_with(|storage| storage.clone())
    }

    fn set_storage(&self, storage: KeyValueStore) -> MonguitoResult<()> {
        self.ensure_not_configured("Storage")?;
        self.storage.write_with(|it| *it = Some(storage));
        Ok(())
    }

    fn add_collection(&self, name: &str) -> MonguitoResult<()> {
        self.ensure_not_configured("Collections")?;
        if !is_valid_collection_name(name) {
            log::error!("Invalid collection name '{}'", name);
            return Err(MonguitoError::new(
                &format!("Invalid collection name '{}', expecting an identifier", name),
                ErrorKind::InvalidCollectionName,
            ));
        }
        self.collection_names.write_with(|names| names.insert(name.to_string()));
        Ok(())
    }

    fn collection_names(&self) -> Vec<String> {
        self.collection_names
            .read_with(|names| names.iter().cloned().collect())
    }

    fn initialize(&self) -> MonguitoResult<KeyValueStore> {
        self.ensure_not_configured("Configuration")?;

        if self.collection_names.read_with(|names| names.is_empty()) {
            log::error!("At least one collection name is required");
            return Err(MonguitoError::new(
                "At least one collection name is required",
                ErrorKind::InvalidArgument,
            ));
        }

        let storage = match self.storage() {
            Some(storage) => {
                validate_storage(&storage)?;
                storage
            }
            None => {
                log::debug!("No storage supplied, using in-memory storage");
                InMemoryStorage::store()
            }
        };

        self.configured.store(true, Ordering::Relaxed);
        Ok(storage)
    }

    fn ensure_not_configured(&self, what: &str) -> MonguitoResult<()> {
        if self.configured.load(Ordering::Relaxed) {
            log::error!("{} cannot be changed after the store is opened", what);
            return Err(MonguitoError::new(
                &format!("{} cannot be changed after the store is opened", what),
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }
}
