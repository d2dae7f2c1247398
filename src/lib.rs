//! # WolfSearch
//!
//! A small, privacy-oriented full-text search engine with TF-IDF ranking.
//!
//! ## Features
//!
//! - Schema-checked documents with a unique key field
//! - Stemming analysis shared by indexing and query parsing
//! - Atomic, generation-numbered commits with single-writer/multi-reader access
//! - Term, phrase and boolean queries over several fields
//! - File and in-memory storage backends
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use wolfsearch::document::{SiteDocument, SiteField};
//! use wolfsearch::index::Index;
//! use wolfsearch::query::QueryParser;
//!
//! let index = Index::in_memory(SiteField::schema().unwrap()).unwrap();
//!
//! let mut writer = index.writer().unwrap();
//! writer.update_document(SiteDocument::new("Wolves", "wolves run in packs", "a.txt")).unwrap();
//! writer.update_document(SiteDocument::new("Cats", "cats run too", "b.txt")).unwrap();
//! writer.commit().unwrap();
//! drop(writer);
//!
//! let parser = QueryParser::new(Arc::clone(index.schema()), &["title", "content"]).unwrap();
//! let query = parser.parse("running").unwrap();
//!
//! let results = index.searcher().unwrap().search(&query, 10).unwrap();
//! assert_eq!(results.total_hits, 2);
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod index;
pub mod ingest;
pub mod query;
pub mod schema;
pub mod search;
pub mod storage;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
