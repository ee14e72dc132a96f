//! An embedded document store with a MongoDB-like CRUD API, persisting into
//! any synchronous string key/value store.
//!
//! ```rust,ignore
//! use monguito::filter::Criterion;
//! use monguito::monguito::Monguito;
//! use serde_json::json;
//!
//! let db = Monguito::new(None, &["orders"])?;
//! let orders = db.collection("orders")?;
//!
//! orders.insert(json!({"recipient": "Juan", "total": 50}))?;
//! orders.insert(json!({"recipient": "Ana", "total": 70}))?;
//!
//! let biggest = orders.find(None)?.sort("total DESC")?.first();
//! orders.update(&Criterion::field("recipient", "Juan"), &json!({"status": "Delivered"}))?;
//! ```

pub mod collection;
pub mod common;
pub mod errors;
pub mod filter;
pub mod monguito;
pub mod monguito_builder;
pub mod monguito_config;
pub mod store;

pub use crate::collection::{Collection, Cursor, Document, DocumentId, WriteResult};
pub use crate::errors::{ErrorKind, MonguitoError, MonguitoResult};
pub use crate::filter::Criterion;
pub use crate::monguito::Monguito;
pub use crate::store::{KeyValueStore, KeyValueStoreProvider};
