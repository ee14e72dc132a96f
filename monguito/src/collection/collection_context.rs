use serde_json::Value;

use crate::collection::{CollectionIndex, DocumentId};
use crate::common::Fields;
use crate::errors::{ErrorKind, MonguitoError, MonguitoResult};
use crate::store::KeyValueStore;

/// Everything a collection, its documents and its cursors need to reach
/// storage: the collection name and the backing store.
#[derive(Debug)]
pub(crate) struct CollectionContext {
    name: String,
    storage: KeyValueStore,
}

impl CollectionContext {
    pub(crate) fn new(name: &str, storage: KeyValueStore) -> Self {
        CollectionContext {
            name: name.to_string(),
            storage,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn key_of(&self, id: &DocumentId) -> String {
        id.storage_key(&self.name)
    }

    pub(crate) fn load_index(&self) -> MonguitoResult<CollectionIndex> {
        CollectionIndex::load(&self.storage, &self.name)
    }

    pub(crate) fn read_document(&self, id: &DocumentId) -> MonguitoResult<Option<Fields>> {
        let key = self.key_of(id);
        match self.storage.get(&key)? {
            None => Ok(None),
            Some(json) => match serde_json::from_str::<Value>(&json)? {
                Value::Object(fields) => Ok(Some(fields)),
                other => {
                    log::error!("Entry {} does not hold a document: {}", key, other);
                    Err(MonguitoError::new(
                        &format!("Entry {} does not hold a document", key),
                        ErrorKind::EncodingError,
                    ))
                }
            },
        }
    }

    pub(crate) fn write_document(&self, id: &DocumentId, fields: &Fields) -> MonguitoResult<()> {
        let json = serde_json::to_string(fields)?;
        self.storage.set(&self.key_of(id), &json)
    }

    pub(crate) fn delete_document(&self, id: &DocumentId) -> MonguitoResult<()> {
        self.storage.remove(&self.key_of(id))
    }
}
