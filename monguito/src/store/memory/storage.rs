use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::errors::MonguitoResult;
use crate::store::{KeyValueStore, KeyValueStoreProvider};

/// In-memory key/value storage.
///
/// # Purpose
/// `InMemoryStorage` backs a Monguito store that has no persistent storage
/// handle. Contents live as long as the last clone.
///
/// # Characteristics
/// - **Insertion Ordered**: `key(i)` enumerates keys in first-write order;
///   overwriting a key keeps its position and removing one keeps the
///   relative order of the rest
/// - **Thread-Safe**: Clones share one map behind a `parking_lot::RwLock`
///
/// # Usage
/// ```text
/// let storage = InMemoryStorage::new();
/// let store = KeyValueStore::new(storage);
/// store.set("orders", "{\"identity\":1,\"ids\":[]}")?;
/// ```
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    inner: Arc<InMemoryStorageInner>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage {
            inner: Arc::new(InMemoryStorageInner::new()),
        }
    }

    /// Wraps a fresh in-memory storage in a [KeyValueStore] handle.
    pub fn store() -> KeyValueStore {
        KeyValueStore::new(InMemoryStorage::new())
    }
}

impl KeyValueStoreProvider for InMemoryStorage {
    fn get(&self, key: &str) -> MonguitoResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> MonguitoResult<()> {
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> MonguitoResult<()> {
        self.inner.remove(key)
    }

    fn length(&self) -> MonguitoResult<usize> {
        self.inner.length()
    }

    fn key(&self, index: usize) -> MonguitoResult<Option<String>> {
        self.inner.key(index)
    }

    fn clear(&self) -> MonguitoResult<()> {
        self.inner.clear()
    }
}

#[derive(Default)]
struct InMemoryStorageInner {
    items: RwLock<IndexMap<String, String>>,
}

impl InMemoryStorageInner {
    fn new() -> Self {
        InMemoryStorageInner {
            items: RwLock::new(IndexMap::new()),
        }
    }

    fn get(&self, key: &str) -> MonguitoResult<Option<String>> {
        Ok(self.items.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> MonguitoResult<()> {
        let mut items = self.items.write();
        match items.get_mut(key) {
            Some(existing) => {
                if existing != value {
                    *existing = value.to_string();
                }
            }
            None => {
                items.insert(key.to_string(), value.to_string());
            }
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> MonguitoResult<()> {
        self.items.write().shift_remove(key);
        Ok(())
    }

    fn length(&self) -> MonguitoResult<usize> {
        Ok(self.items.read().len())
    }

    fn key(&self, index: usize) -> MonguitoResult<Option<String>> {
        Ok(self
            .items
            .read()
            .get_index(index)
            .map(|(key, _)| key.clone()))
    }

    fn clear(&self) -> MonguitoResult<()> {
        let mut items = self.items.write();
        if !items.is_empty() {
            items.clear();
        }
        Ok(())
    }
}
