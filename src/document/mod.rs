//! Documents as handed to the index writer and as read back from the store.
//!
//! # Core Components
//!
//! - [`document::Document`] - field name → raw text, as produced by ingestion
//! - [`document::StoredDocument`] - stored fields of a live document plus its id
//! - [`parser::DocumentParser`] - turns a document into per-field term postings
//! - [`site::SiteDocument`] - the typed `{title, content, path}` record of the site

#[allow(clippy::module_inception)]
pub mod document;
pub mod parser;
pub mod site;

pub use document::{DocId, Document, DocumentBuilder, StoredDocument};
pub use parser::{AnalyzedDocument, DocumentParser};
pub use site::{SiteDocument, SiteField};
