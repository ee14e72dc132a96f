use indexmap::IndexMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::collection::Collection;
use crate::errors::{ErrorKind, MonguitoError, MonguitoResult};
use crate::monguito_builder::MonguitoBuilder;
use crate::monguito_config::MonguitoConfig;
use crate::store::KeyValueStore;

/// An embedded document store bound to one key/value storage.
///
/// A `Monguito` exposes one [Collection] per name declared when it was
/// opened. Collections sharing the storage are independent of each other.
/// The handle is cheap to clone.
///
/// # Examples
///
/// ```rust,ignore
/// use monguito::monguito::Monguito;
/// use serde_json::json;
///
/// // in-memory storage
/// let db = Monguito::new(None, &["orders", "users"])?;
/// let orders = db.collection("orders")?;
/// orders.insert(json!({"recipient": "Juan", "total": 50}))?;
///
/// // custom storage
/// let db = Monguito::builder()
///     .storage(my_storage)
///     .collection("orders")
///     .open()?;
/// ```
#[derive(Clone)]
pub struct Monguito {
    inner: Arc<MonguitoInner>,
}

impl Monguito {
    pub fn builder() -> MonguitoBuilder {
        MonguitoBuilder::new()
    }

    /// Opens a store over `storage` with the collections in `names`.
    ///
    /// `None` storage selects in-memory storage.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `names` is empty
    /// - `InvalidCollectionName` if a name is not an identifier token
    /// - `InvalidStorage` if `storage` fails the probe round-trip
    pub fn new<S: AsRef<str>>(storage: Option<KeyValueStore>, names: &[S]) -> MonguitoResult<Monguito> {
        let mut builder = MonguitoBuilder::new().collections(names);
        if let Some(storage) = storage {
            builder = builder.storage(storage);
        }
        builder.open()
    }

    pub(crate) fn open(config: MonguitoConfig) -> MonguitoResult<Monguito> {
        let storage = config.initialize()?;
        let collections = config
            .collection_names()
            .into_iter()
            .map(|name| {
                let collection = Collection::new(&name, storage.clone());
                (name, collection)
            })
            .collect::<IndexMap<String, Collection>>();

        log::debug!("Opened store with collections {:?}", collections.keys().collect::<Vec<_>>());
        Ok(Monguito {
            inner: Arc::new(MonguitoInner {
                config,
                storage,
                collections,
            }),
        })
    }

    /// The collection declared as `name`.
    ///
    /// # Errors
    ///
    /// Returns `CollectionNotFound` for a name not declared at open time.
    pub fn collection(&self, name: &str) -> MonguitoResult<Collection> {
        match self.inner.collections.get(name) {
            Some(collection) => Ok(collection.clone()),
            None => {
                log::error!("Collection {} is not declared in this store", name);
                Err(MonguitoError::new(
                    &format!("Collection {} is not declared in this store", name),
                    ErrorKind::CollectionNotFound,
                ))
            }
        }
    }

    pub fn has_collection(&self, name: &str) -> bool {
        self.inner.collections.contains_key(name)
    }

    /// Declared collection names in declaration order.
    pub fn collection_names(&self) -> Vec<String> {
        self.inner.collections.keys().cloned().collect()
    }

    pub fn storage(&self) -> KeyValueStore {
        self.inner.storage.clone()
    }

    pub fn config(&self) -> MonguitoConfig {
        self.inner.config.clone()
    }
}

impl Debug for Monguito {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monguito")
            .field("collections", &self.collection_names())
            .finish()
    }
}

struct MonguitoInner {
    config: MonguitoConfig,
    storage: KeyValueStore,
    collections: IndexMap<String, Collection>,
}
