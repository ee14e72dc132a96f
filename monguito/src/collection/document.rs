use serde::{Serialize, Serializer};
use serde_json::Value;
use std::fmt::{Debug, Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::collection::collection_context::CollectionContext;
use crate::collection::{CollectionIndex, DocumentId};
use crate::common::{atomic, expect_object, render_pretty, Atomic, Fields, ReadExecutor, WriteExecutor, DOC_ID};
use crate::errors::{ErrorKind, MonguitoError, MonguitoResult};
use crate::filter::FieldSource;

/// A live handle to one stored record.
///
/// A `Document` is obtained from [crate::collection::Collection::insert],
/// [crate::collection::Collection::get] or any query; it is never built by
/// hand. It holds the record's fields in memory together with what it needs
/// to write them back: its collection's name and storage.
///
/// Cloning a `Document` clones the handle, not the record: every clone sees
/// the same fields and the same removed state.
///
/// The `_id` field is fixed for the life of the handle. It can be read and
/// matched on but never written.
///
/// # Examples
///
/// ```rust,ignore
/// let order = db.collection("orders")?.insert(json!({"recipient": "Juan", "total": 50}))?;
///
/// // update with a payload
/// order.update(Some(&json!({"status": "Delivered"})))?;
///
/// // or edit in memory, then persist
/// order.put("status", "Returned")?;
/// order.update(None)?;
///
/// order.remove()?;
/// assert!(order.remove().is_err());
/// ```
#[derive(Clone)]
pub struct Document {
    inner: Arc<DocumentInner>,
}

struct DocumentInner {
    id: DocumentId,
    fields: Atomic<Fields>,
    removed: AtomicBool,
    context: Arc<CollectionContext>,
}

impl Document {
    pub(crate) fn new(id: DocumentId, fields: Fields, context: Arc<CollectionContext>) -> Self {
        Document {
            inner: Arc::new(DocumentInner {
                id,
                fields: atomic(fields),
                removed: AtomicBool::new(false),
                context,
            }),
        }
    }

    /// The document's `_id`.
    pub fn id(&self) -> &DocumentId {
        &self.inner.id
    }

    /// Name of the collection this document belongs to.
    pub fn collection_name(&self) -> &str {
        self.inner.context.name()
    }

    /// Returns the in-memory value of `field`, if present.
    pub fn get(&self, field: &str) -> Option<Value> {
        self.inner.fields.read_with(|fields| fields.get(field).cloned())
    }

    /// Snapshot of all in-memory fields, `_id` included.
    pub fn fields(&self) -> Fields {
        self.inner.fields.read_with(|fields| fields.clone())
    }

    /// Snapshot of the document as a JSON object.
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields())
    }

    /// Sets `field` in memory. Nothing is persisted until [Document::update].
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` for `_id`.
    pub fn put<V: Into<Value>>(&self, field: &str, value: V) -> MonguitoResult<()> {
        self.check_writable_field(field)?;
        let value = value.into();
        self.inner
            .fields
            .write_with(|fields| fields.insert(field.to_string(), value));
        Ok(())
    }

    /// Removes `field` in memory and returns its old value. Nothing is
    /// persisted until [Document::update].
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperation` for `_id`.
    pub fn remove_field(&self, field: &str) -> MonguitoResult<Option<Value>> {
        self.check_writable_field(field)?;
        Ok(self.inner.fields.write_with(|fields| fields.shift_remove(field)))
    }

    /// Whether [Document::remove] has succeeded on this handle.
    pub fn is_removed(&self) -> bool {
        self.inner.removed.load(Ordering::Acquire)
    }

    /// Merges `payload` into the document and persists it.
    ///
    /// With `None`, the current in-memory fields are persisted as they are.
    /// With `Some(payload)`, `payload` must be a JSON object; its fields are
    /// copied onto the document except `_id`, which is silently skipped.
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `payload` is not an object (nothing is merged)
    /// - `NotFound` if the document was removed or is no longer listed in
    ///   its collection's index
    pub fn update(&self, payload: Option<&Value>) -> MonguitoResult<&Self> {
        if let Some(payload) = payload {
            let changes = expect_object(payload, "Document.update()")?;
            self.inner.fields.write_with(|fields| {
                for (field, value) in changes.iter().filter(|(field, _)| *field != DOC_ID) {
                    fields.insert(field.clone(), value.clone());
                }
            });
        }

        self.ensure_listed("Document.update()")?;
        let context = &self.inner.context;
        self.inner
            .fields
            .read_with(|fields| context.write_document(&self.inner.id, fields))?;
        log::trace!("Updated {:?} in {}", self.inner.id, context.name());
        Ok(self)
    }

    /// Deletes the document from storage and from its collection's index.
    ///
    /// Afterwards the handle is invalidated: further `update` or `remove`
    /// calls fail with `NotFound`, although the stale fields stay readable.
    pub fn remove(&self) -> MonguitoResult<()> {
        let mut index = self.ensure_listed("Document.remove()")?;
        let context = &self.inner.context;

        context.delete_document(&self.inner.id)?;
        index.remove(&self.inner.id);
        index.save()?;
        self.inner.removed.store(true, Ordering::Release);

        log::debug!("Removed {:?} from {}", self.inner.id, context.name());
        Ok(())
    }

    /// Tab-indented JSON rendering of the in-memory fields.
    pub fn render(&self) -> MonguitoResult<String> {
        self.inner.fields.read_with(|fields| render_pretty(fields))
    }

    /// Loads a fresh index and checks this document is still listed in it.
    fn ensure_listed(&self, operation: &str) -> MonguitoResult<CollectionIndex> {
        if !self.is_removed() {
            let index = self.inner.context.load_index()?;
            if index.contains(&self.inner.id) {
                return Ok(index);
            }
        }

        log::error!("{}, {:?} doesn't exist", operation, self.inner.id);
        Err(MonguitoError::new(
            &format!("{}, {:?} doesn't exist", operation, self.inner.id),
            ErrorKind::NotFound,
        ))
    }

    fn check_writable_field(&self, field: &str) -> MonguitoResult<()> {
        if field == DOC_ID {
            log::error!("Document _id can't be modified");
            return Err(MonguitoError::new(
                "Document _id can't be modified",
                ErrorKind::InvalidOperation,
            ));
        }
        Ok(())
    }
}

impl FieldSource for Document {
    fn read_fields<R>(&self, f: impl FnOnce(&Fields) -> R) -> R {
        self.inner.fields.read_with(f)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.inner.fields.read_with(|fields| fields.serialize(serializer))
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.inner
            .fields
            .read_with(|fields| write!(f, "{}", Value::Object(fields.clone())))
    }
}

impl Debug for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Document({:?} in {}) {}", self.inner.id, self.inner.context.name(), self)
    }
}
