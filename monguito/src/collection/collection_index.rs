use serde::{Deserialize, Serialize};

use crate::collection::DocumentId;
use crate::common::INITIAL_IDENTITY;
use crate::errors::{ErrorKind, MonguitoError, MonguitoResult};
use crate::store::KeyValueStore;

/// Persisted shape of a collection index: `{"identity": 3, "ids": [1, 2]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct IndexRecord {
    identity: u64,
    ids: Vec<DocumentId>,
}

impl Default for IndexRecord {
    fn default() -> Self {
        IndexRecord {
            identity: INITIAL_IDENTITY,
            ids: Vec::new(),
        }
    }
}

/// Per-collection metadata: the next auto-increment value and the ordered
/// list of live document ids.
///
/// The record lives in storage under the bare collection name. Membership
/// in `ids` is what decides whether a document exists; the order of `ids`
/// is the insertion order every `find` enumerates in.
///
/// Each `load` is a fresh snapshot. A read-modify-`save` sequence must stay
/// inside one operation, otherwise a concurrent writer's change is lost.
#[derive(Debug, Clone)]
pub struct CollectionIndex {
    name: String,
    storage: KeyValueStore,
    record: IndexRecord,
}

impl CollectionIndex {
    /// Reads the index of collection `name`, or the default
    /// `{identity: 1, ids: []}` when none has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns `IndexCorrupted` when the stored record is not valid JSON of
    /// the expected shape, and the backend's error when the read fails.
    pub fn load(storage: &KeyValueStore, name: &str) -> MonguitoResult<CollectionIndex> {
        let record = match storage.get(name)? {
            None => IndexRecord::default(),
            Some(json) => serde_json::from_str::<IndexRecord>(&json).map_err(|err| {
                log::error!("Index record of collection {} is unreadable: {}", name, err);
                MonguitoError::new_with_cause(
                    &format!("Index record of collection {} is unreadable", name),
                    ErrorKind::IndexCorrupted,
                    err.into(),
                )
            })?,
        };
        log::trace!("Loaded index of {} with {} ids", name, record.ids.len());

        Ok(CollectionIndex {
            name: name.to_string(),
            storage: storage.clone(),
            record,
        })
    }

    /// Writes the current state back under the collection name.
    pub fn save(&self) -> MonguitoResult<()> {
        let json = serde_json::to_string(&self.record)?;
        self.storage.set(&self.name, &json)?;
        log::debug!(
            "Saved index of {} (identity {}, {} ids)",
            self.name,
            self.record.identity,
            self.record.ids.len()
        );
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value the next auto-increment insert will receive.
    pub fn identity(&self) -> u64 {
        self.record.identity
    }

    pub fn ids(&self) -> &[DocumentId] {
        &self.record.ids
    }

    pub fn len(&self) -> usize {
        self.record.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record.ids.is_empty()
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.record.ids.contains(id)
    }

    /// Hands out the current identity and advances the counter.
    ///
    /// # Errors
    ///
    /// Returns `IndexCorrupted` when the stored counter can't advance.
    pub(crate) fn next_identity(&mut self) -> MonguitoResult<u64> {
        let identity = self.record.identity;
        match identity.checked_add(1) {
            Some(next) => {
                self.record.identity = next;
                Ok(identity)
            }
            None => {
                log::error!("Identity counter of collection {} is exhausted at {}", self.name, identity);
                Err(MonguitoError::new(
                    &format!("Identity counter of collection {} is exhausted", self.name),
                    ErrorKind::IndexCorrupted,
                ))
            }
        }
    }

    pub(crate) fn push(&mut self, id: DocumentId) {
        self.record.ids.push(id);
    }

    /// Drops `id` from the list; returns whether it was listed.
    pub(crate) fn remove(&mut self, id: &DocumentId) -> bool {
        match self.record.ids.iter().position(|it| it == id) {
            Some(position) => {
                self.record.ids.remove(position);
                true
            }
            None => false,
        }
    }
}
