//! Storage backends and abstractions.
//!
//! Monguito persists into any synchronous string key/value store that
//! implements [KeyValueStoreProvider]. Each collection writes one index
//! record under its own name plus one entry per document.
//!
//! # Storage Providers
//!
//! - **In-Memory Store**: [memory::InMemoryStorage], used when no storage
//!   handle is supplied at open time
//! - **Custom**: any type implementing [KeyValueStoreProvider], e.g. an
//!   adapter over a browser-style persistent key/value area
//!
//! Storage handles supplied by callers are checked with [validate_storage]
//! before use.

mod key_value_store;
pub mod memory;

pub use key_value_store::*;
