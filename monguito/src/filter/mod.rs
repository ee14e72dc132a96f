//! Query criteria and the full-scan query engine.
//!
//! Documents are selected with a [Criterion], either a flat field-equality
//! mapping or a predicate closure, and ordered with a sort expression of
//! comma-separated `field [ASC|DESC]` clauses. There are no indexes: every
//! query scans the sequence it is given and returns a new sequence, leaving
//! its input untouched.
//!
//! # Examples
//!
//! ```rust,ignore
//! use monguito::filter::{filter, sort, Criterion};
//! use serde_json::json;
//!
//! let armani = Criterion::equals(json!({"seller": "Armani"}))?;
//! let matches = filter(&documents, Some(&armani));
//! let ordered = sort(&matches, "seller, total DESC")?;
//! ```

mod criterion;
mod query_engine;

pub use criterion::*;
pub use query_engine::*;
