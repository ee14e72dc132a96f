use std::fmt::{Debug, Formatter};
use std::ops::Deref;
use std::sync::Arc;

use crate::common::{STORAGE_PROBE_KEY, STORAGE_PROBE_VALUE};
use crate::errors::{ErrorKind, MonguitoError, MonguitoResult};

/// Synchronous string key/value storage that Monguito persists into.
///
/// # Purpose
/// Defines the minimal capability set a backend must offer: single-key
/// reads and writes, positional enumeration and a bulk clear. There are no
/// multi-key operations; Monguito sequences its own writes on top of these.
///
/// # Implementations
/// - `InMemoryStorage`: insertion-ordered map held in process memory
///
/// # Thread Safety
/// Implementers must be `Send + Sync`. No locking is implied across calls;
/// callers sharing a backend serialize access themselves.
pub trait KeyValueStoreProvider: Send + Sync {
    /// Retrieves the value stored under `key`.
    ///
    /// # Returns
    /// * `Ok(Some(value))` if the key exists
    /// * `Ok(None)` if the key does not exist
    fn get(&self, key: &str) -> MonguitoResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> MonguitoResult<()>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> MonguitoResult<()>;

    /// Returns the number of stored entries.
    fn length(&self) -> MonguitoResult<usize>;

    /// Returns the key at position `index`, or `None` past the end.
    fn key(&self, index: usize) -> MonguitoResult<Option<String>>;

    /// Removes every entry.
    fn clear(&self) -> MonguitoResult<()>;
}

/// Cheap-to-clone handle over a [KeyValueStoreProvider].
///
/// All clones point at the same backend.
#[derive(Clone)]
pub struct KeyValueStore {
    inner: Arc<dyn KeyValueStoreProvider>,
}

impl Deref for KeyValueStore {
    type Target = Arc<dyn KeyValueStoreProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Debug for KeyValueStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyValueStore")
    }
}

impl KeyValueStore {
    /// Wraps a provider implementation.
    pub fn new<T: KeyValueStoreProvider + 'static>(inner: T) -> Self {
        KeyValueStore {
            inner: Arc::new(inner),
        }
    }

    /// Returns `true` when both handles share one backend.
    pub fn same_backend(&self, other: &KeyValueStore) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Lists every stored key in enumeration order.
    pub fn keys(&self) -> MonguitoResult<Vec<String>> {
        let length = self.length()?;
        let mut keys = Vec::with_capacity(length);
        for index in 0..length {
            if let Some(key) = self.key(index)? {
                keys.push(key);
            }
        }
        Ok(keys)
    }
}

/// Checks that `store` honours the key/value contract.
///
/// Performs a probe round-trip under a fixed key: removes it, writes it,
/// reads it back and removes it again, checking `length` at every step.
/// A mismatch or a provider failure is reported as `InvalidStorage`.
pub fn validate_storage(store: &KeyValueStore) -> MonguitoResult<()> {
    probe_storage(store).map_err(|err| {
        log::error!("Storage handle failed validation: {}", err);
        MonguitoError::new_with_cause(
            "Invalid storage, expecting a key/value store",
            ErrorKind::InvalidStorage,
            err,
        )
    })
}

fn probe_storage(store: &KeyValueStore) -> MonguitoResult<()> {
    store.remove(STORAGE_PROBE_KEY)?;
    let length = store.length()?;

    store.set(STORAGE_PROBE_KEY, STORAGE_PROBE_VALUE)?;
    if store.get(STORAGE_PROBE_KEY)?.as_deref() != Some(STORAGE_PROBE_VALUE) {
        return Err(probe_failure("value read back differs from value written"));
    }
    if store.length()? != length + 1 {
        return Err(probe_failure("length did not grow after set"));
    }

    store.remove(STORAGE_PROBE_KEY)?;
    if store.get(STORAGE_PROBE_KEY)?.is_some() {
        return Err(probe_failure("key still present after remove"));
    }
    if store.length()? != length {
        return Err(probe_failure("length did not shrink after remove"));
    }
    Ok(())
}

fn probe_failure(reason: &str) -> MonguitoError {
    MonguitoError::new(&format!("Storage probe failed: {}", reason), ErrorKind::BackendError)
}
