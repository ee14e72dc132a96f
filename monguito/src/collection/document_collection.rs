use serde_json::Value;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::collection::collection_context::CollectionContext;
use crate::collection::{assign_document_id, Cursor, Document, DocumentId, WriteResult};
use crate::common::{expect_object, Fields, DOC_ID};
use crate::errors::{ErrorKind, MonguitoError, MonguitoResult};
use crate::filter::{filter, Criterion};
use crate::store::KeyValueStore;

/// A named set of documents sharing one identifier index.
///
/// `Collection` is the CRUD entry point. It is cheap to clone and every
/// clone operates on the same storage entries. All reads re-load the index
/// from storage, so a collection never serves stale membership.
///
/// # Examples
///
/// ```rust,ignore
/// let orders = db.collection("orders")?;
///
/// let juan = orders.insert(json!({"recipient": "Juan", "total": 50}))?;
/// let ana = orders.insert(json!({"recipient": "Ana", "total": 70}))?;
///
/// let biggest = orders.find(None)?.sort("total DESC")?.first();
/// orders.remove(Some(&Criterion::field("recipient", "Juan")))?;
/// assert_eq!(orders.count()?, 1);
/// ```
#[derive(Clone)]
pub struct Collection {
    context: Arc<CollectionContext>,
}

impl Collection {
    pub(crate) fn new(name: &str, storage: KeyValueStore) -> Self {
        Collection {
            context: Arc::new(CollectionContext::new(name, storage)),
        }
    }

    pub fn name(&self) -> &str {
        self.context.name()
    }

    /// Stores `document` and returns a live handle to it.
    ///
    /// Without an `_id` field the document takes the next auto-increment
    /// id; with `_id: "uuid"` it takes a freshly generated UUID v4. Any
    /// other `_id` is rejected.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `document` is not a JSON object
    /// - `InvalidId` if `document` carries an `_id` other than `"uuid"`
    pub fn insert(&self, document: Value) -> MonguitoResult<Document> {
        let input = expect_object(&document, "Collection.insert()")?;
        let mut index = self.context.load_index()?;
        let id = assign_document_id(input.get(DOC_ID), || index.next_identity())?;

        let mut fields = Fields::with_capacity(input.len() + 1);
        fields.insert(DOC_ID.to_string(), id.to_value());
        for (field, value) in input.iter().filter(|(field, _)| *field != DOC_ID) {
            fields.insert(field.clone(), value.clone());
        }

        self.context.write_document(&id, &fields)?;
        index.push(id.clone());
        index.save()?;

        log::debug!("Inserted {:?} into {}", id, self.name());
        Ok(Document::new(id, fields, self.context.clone()))
    }

    /// Reads the document stored under `id`.
    ///
    /// Missing documents are `Ok(None)`, not an error.
    ///
    /// # Errors
    ///
    /// Returns `InvalidId` when `id` is neither a natural number nor a
    /// UUID v4.
    pub fn get<V: Into<Value>>(&self, id: V) -> MonguitoResult<Option<Document>> {
        let id = DocumentId::try_from(id.into())?;
        self.get_by_id(&id)
    }

    /// Reads the document stored under `id`.
    ///
    /// UUID keys are shared by every collection on the storage, so a UUID
    /// id must also be listed in this collection's index.
    pub fn get_by_id(&self, id: &DocumentId) -> MonguitoResult<Option<Document>> {
        if id.is_uuid() && !self.context.load_index()?.contains(id) {
            log::trace!("Looked up {:?} in {}: not indexed", id, self.name());
            return Ok(None);
        }
        self.load_document(id)
    }

    fn load_document(&self, id: &DocumentId) -> MonguitoResult<Option<Document>> {
        let fields = self.context.read_document(id)?;
        log::trace!("Looked up {:?} in {}: {}", id, self.name(), fields.is_some());
        Ok(fields.map(|fields| Document::new(id.clone(), fields, self.context.clone())))
    }

    /// Every live document matching `criterion`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `IndexCorrupted` when the index lists an id whose document
    /// entry is missing from storage.
    pub fn find(&self, criterion: Option<&Criterion>) -> MonguitoResult<Cursor> {
        let index = self.context.load_index()?;
        let mut documents = Vec::with_capacity(index.len());

        for id in index.ids() {
            match self.load_document(id)? {
                Some(document) => documents.push(document),
                None => {
                    log::error!(
                        "Index of {} lists {:?} but its entry {} is missing",
                        self.name(),
                        id,
                        self.context.key_of(id)
                    );
                    return Err(MonguitoError::new(
                        &format!("Index of {} lists {:?} but its entry is missing", self.name(), id),
                        ErrorKind::IndexCorrupted,
                    ));
                }
            }
        }

        Ok(Cursor::new(filter(&documents, criterion)))
    }

    /// First document matching `criterion` in insertion order.
    pub fn find_one(&self, criterion: Option<&Criterion>) -> MonguitoResult<Option<Document>> {
        Ok(self.find(criterion)?.first())
    }

    /// Number of live documents, read from the index without loading any.
    pub fn count(&self) -> MonguitoResult<usize> {
        Ok(self.context.load_index()?.len())
    }

    /// Applies `payload` to every document matching `criterion` and returns
    /// the updated documents.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `payload` is not a JSON object; the
    /// check happens before any document is touched.
    pub fn update(&self, criterion: &Criterion, payload: &Value) -> MonguitoResult<Cursor> {
        expect_object(payload, "Collection.update()")?;
        let cursor = self.find(Some(criterion))?;
        cursor.update(Some(payload))?;
        Ok(cursor)
    }

    /// Removes every document matching `criterion`, or every document when
    /// `criterion` is `None`.
    pub fn remove(&self, criterion: Option<&Criterion>) -> MonguitoResult<WriteResult> {
        let mut cursor = self.find(criterion)?;
        let result = cursor.remove()?;
        log::debug!("Removed {} documents from {}", result.len(), self.name());
        Ok(result)
    }
}

impl Debug for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Collection({})", self.name())
    }
}
