//! Collections, documents and cursors.
//!
//! A [Collection] maps JSON documents onto key/value entries and keeps a
//! [CollectionIndex] of the ids it holds. Reads materialize [Document]
//! handles, which can be updated or removed in place, and batch them into
//! [Cursor]s that can be filtered, sorted and written through.
//!
//! # Storage layout
//!
//! For a collection named `orders`:
//!
//! | key | value |
//! |-----|-------|
//! | `orders` | `{"identity": 3, "ids": [1, "0F4C...", 2]}` |
//! | `orders-1` | `{"_id": 1, ...}` |
//! | `0F4C...` | `{"_id": "0F4C...", ...}` |
//!
//! # Identifiers
//!
//! Documents inserted without an `_id` take the next auto-increment value;
//! documents inserted with `_id: "uuid"` take a fresh UUID v4. See
//! [DocumentId].

mod collection_context;
mod collection_index;
mod cursor;
mod document;
mod document_collection;
mod document_id;
mod write_result;

pub use collection_index::*;
pub use cursor::*;
pub use document::*;
pub use document_collection::*;
pub use document_id::*;
pub use write_result::*;
