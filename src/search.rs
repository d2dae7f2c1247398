//! Query execution: candidate collection, TF-IDF ranking and result excerpts.
//!
//! # Core Components
//!
//! - [`searcher::Searcher`] - runs a [`Query`](crate::query::Query) against one snapshot
//! - [`scorer::TfIdfScorer`] - per-term TF-IDF scoring
//! - [`snippet::SnippetExtractor`] - bounded excerpts of stored content

pub mod scorer;
pub mod searcher;
pub mod snippet;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::DocId;
use crate::query::Query;

pub use self::scorer::{Scorer, TfIdfScorer};
pub use self::searcher::Searcher;
pub use self::snippet::{SnippetExtractor, TRUNCATION_MARKER, excerpt};

/// A search hit: a document, its score and its stored fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// The document ID.
    pub doc_id: DocId,
    /// The relevance score; higher is more relevant.
    pub score: f32,
    /// The stored fields (empty unless documents were loaded).
    pub fields: BTreeMap<String, String>,
}

impl Hit {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// Search results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// The search hits, best first.
    pub hits: Vec<Hit>,
    /// Total number of matching documents, before the limit was applied.
    pub total_hits: u64,
    /// Maximum score in the results.
    pub max_score: f32,
    /// Generation of the snapshot that was searched.
    pub generation: u64,
}

impl SearchResults {
    pub fn empty(generation: u64) -> Self {
        SearchResults {
            generation,
            ..SearchResults::default()
        }
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Search request containing a query and its options.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// The query to execute.
    pub query: Query,
    /// Maximum number of hits to return.
    pub max_docs: usize,
    /// Whether to load the stored fields of each hit.
    pub load_documents: bool,
}

impl SearchRequest {
    pub fn new(query: Query) -> Self {
        SearchRequest {
            query,
            max_docs: 10,
            load_documents: true,
        }
    }

    /// Set the maximum number of documents to return.
    pub fn max_docs(mut self, max_docs: usize) -> Self {
        self.max_docs = max_docs;
        self
    }

    /// Set whether to load document content.
    pub fn load_documents(mut self, load_documents: bool) -> Self {
        self.load_documents = load_documents;
        self
    }
}
