use serde_json::Value;
use std::fmt::{Debug, Formatter};

use crate::collection::{Document, DocumentId, WriteResult};
use crate::common::{expect_object, render_pretty};
use crate::errors::MonguitoResult;
use crate::filter::{by_id, filter, first_of, last_of, sort, Criterion};

/// A materialized, ordered batch of [Document] handles.
///
/// A cursor is a snapshot: it holds the documents that matched when it was
/// built and does not see later changes to storage. Read operations
/// (`find`, `sort`) always return a new cursor and leave this one alone.
/// Write operations (`update`, `remove`) go through each contained
/// document and persist immediately.
#[derive(Clone, Default)]
pub struct Cursor {
    documents: Vec<Document>,
}

impl Cursor {
    pub(crate) fn new(documents: Vec<Document>) -> Self {
        Cursor { documents }
    }

    /// Applies `payload` to every document in this cursor.
    ///
    /// The payload is checked once up front, so a malformed payload updates
    /// nothing. A stale document stops the run with `NotFound`; documents
    /// before it have already been persisted.
    pub fn update(&self, payload: Option<&Value>) -> MonguitoResult<&Self> {
        if let Some(payload) = payload {
            expect_object(payload, "Cursor.update()")?;
        }
        for document in &self.documents {
            document.update(payload)?;
        }
        Ok(self)
    }

    /// Removes every document in this cursor, then empties it.
    pub fn remove(&mut self) -> MonguitoResult<WriteResult> {
        let mut removed = Vec::with_capacity(self.documents.len());
        for document in &self.documents {
            document.remove()?;
            removed.push(document.id().clone());
        }
        self.documents.clear();
        Ok(WriteResult::new(removed))
    }

    /// Looks `id` up among this cursor's documents only.
    ///
    /// # Errors
    ///
    /// Returns `InvalidId` when `id` is neither a natural number nor a
    /// UUID v4.
    pub fn get<V: Into<Value>>(&self, id: V) -> MonguitoResult<Option<Document>> {
        let id = DocumentId::try_from(id.into())?;
        Ok(self.find_one(Some(&by_id(&id))))
    }

    /// Re-filters this cursor into a new one.
    pub fn find(&self, criterion: Option<&Criterion>) -> Cursor {
        Cursor::new(filter(&self.documents, criterion))
    }

    /// First document of this cursor matching `criterion`.
    pub fn find_one(&self, criterion: Option<&Criterion>) -> Option<Document> {
        match criterion {
            None => self.first(),
            Some(criterion) => self.find(Some(criterion)).first(),
        }
    }

    /// A new cursor sorted by `expression`, e.g. `"seller, total DESC"`.
    pub fn sort(&self, expression: &str) -> MonguitoResult<Cursor> {
        Ok(Cursor::new(sort(&self.documents, expression)?))
    }

    pub fn first(&self) -> Option<Document> {
        first_of(&self.documents)
    }

    pub fn last(&self) -> Option<Document> {
        last_of(&self.documents)
    }

    /// Tab-indented JSON array of the contained documents.
    pub fn render(&self) -> MonguitoResult<String> {
        render_pretty(&self.documents)
    }

    pub fn count(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Ids of the contained documents, in cursor order.
    pub fn ids(&self) -> Vec<DocumentId> {
        self.documents.iter().map(|document| document.id().clone()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.documents.iter()
    }

    pub fn to_vec(&self) -> Vec<Document> {
        self.documents.clone()
    }
}

impl IntoIterator for Cursor {
    type Item = Document;
    type IntoIter = std::vec::IntoIter<Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.into_iter()
    }
}

impl<'a> IntoIterator for &'a Cursor {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

impl Debug for Cursor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.documents.iter()).finish()
    }
}
