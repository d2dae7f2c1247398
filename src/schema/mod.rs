//! Schema module for WolfSearch.
//!
//! A schema declares the fields of every document in an index, how each one is
//! stored and analyzed, and which field is the unique key used for upserts.

pub mod field;
#[allow(clippy::module_inception)]
pub mod schema;

pub use field::{AnalyzerKind, FieldEntry, FieldOptions};
pub use schema::{Schema, SchemaBuilder};
