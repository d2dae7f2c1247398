//! Field descriptors for schema definition.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::Analyzer;
use crate::analysis::analyzer::keyword::KeywordAnalyzer;
use crate::analysis::analyzer::stemming::StemmingAnalyzer;
use crate::error::Result;

/// Named analyzer configurations that can be persisted with a schema.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyzerKind {
    /// Split on non-alphanumerics, lowercase, Porter stem.
    Stemming,
    /// Split on non-alphanumerics, lowercase.
    Simple,
    /// Whole value as a single token.
    Keyword,
}

impl AnalyzerKind {
    /// Instantiate the analyzer this kind names.
    pub fn build(self) -> Result<Arc<dyn Analyzer>> {
        Ok(match self {
            AnalyzerKind::Stemming => Arc::new(StemmingAnalyzer::new()?),
            AnalyzerKind::Simple => Arc::new(StemmingAnalyzer::without_stemming()?),
            AnalyzerKind::Keyword => Arc::new(KeywordAnalyzer::new()),
        })
    }
}

/// Storage and indexing behavior of one field.
///
/// An indexed field without an analyzer is indexed verbatim, as a single term.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOptions {
    /// Whether the raw value is kept in the document store.
    pub stored: bool,
    /// Whether the field contributes postings to the inverted index.
    pub indexed: bool,
    /// The analyzer applied to the value when indexed.
    pub analyzer: Option<AnalyzerKind>,
    /// Whether this field is the schema's unique key.
    pub unique: bool,
}

impl FieldOptions {
    /// Stored, stemmed full-text field.
    pub fn text() -> Self {
        FieldOptions {
            stored: true,
            indexed: true,
            analyzer: Some(AnalyzerKind::Stemming),
            unique: false,
        }
    }

    /// Stored, verbatim-indexed unique identifier.
    pub fn id() -> Self {
        FieldOptions {
            stored: true,
            indexed: true,
            analyzer: None,
            unique: true,
        }
    }

    /// Stored but not searchable.
    pub fn stored_only() -> Self {
        FieldOptions {
            stored: true,
            indexed: false,
            analyzer: None,
            unique: false,
        }
    }

    /// Set whether this field is stored.
    pub fn stored(mut self, stored: bool) -> Self {
        self.stored = stored;
        self
    }

    /// Set whether this field is indexed.
    pub fn indexed(mut self, indexed: bool) -> Self {
        self.indexed = indexed;
        self
    }

    /// Set the analyzer for this field.
    pub fn analyzer(mut self, analyzer: Option<AnalyzerKind>) -> Self {
        self.analyzer = analyzer;
        self
    }

    /// Set whether this field is the unique key.
    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }
}

/// A named field bound into a [`Schema`](crate::schema::Schema), with its analyzer
/// instantiated.
#[derive(Clone)]
pub struct FieldEntry {
    name: String,
    options: FieldOptions,
    analyzer: Option<Arc<dyn Analyzer>>,
}

impl std::fmt::Debug for FieldEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldEntry")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("analyzer", &self.analyzer.as_ref().map(|a| a.name()))
            .finish()
    }
}

impl FieldEntry {
    pub(crate) fn new(name: String, options: FieldOptions) -> Result<Self> {
        let analyzer = if options.indexed {
            Some(options.analyzer.unwrap_or(AnalyzerKind::Keyword).build()?)
        } else {
            None
        };

        Ok(FieldEntry {
            name,
            options,
            analyzer,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &FieldOptions {
        &self.options
    }

    pub fn is_stored(&self) -> bool {
        self.options.stored
    }

    pub fn is_indexed(&self) -> bool {
        self.options.indexed
    }

    pub fn is_unique(&self) -> bool {
        self.options.unique
    }

    /// The analyzer used for both indexing and querying; `None` when not indexed.
    pub fn analyzer(&self) -> Option<&Arc<dyn Analyzer>> {
        self.analyzer.as_ref()
    }
}
