use crate::collection::DocumentId;

/// The result of a removal.
///
/// `WriteResult` lists the ids of the documents the operation removed, in
/// the order they were removed.
///
/// # Examples
///
/// ```rust,ignore
/// let result = orders.remove(Some(&Criterion::field("status", "Cancelled")))?;
/// for id in result.affected_ids() {
///     println!("Removed {}", id);
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteResult {
    ids: Vec<DocumentId>,
}

impl WriteResult {
    /// Creates a new `WriteResult` with the specified affected ids.
    pub fn new(ids: Vec<DocumentId>) -> Self {
        Self { ids }
    }

    /// Gets the ids affected by the write operation.
    pub fn affected_ids(&self) -> &[DocumentId] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl IntoIterator for WriteResult {
    type Item = DocumentId;
    type IntoIter = std::vec::IntoIter<DocumentId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.into_iter()
    }
}
