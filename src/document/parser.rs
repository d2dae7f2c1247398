//! Document parser converting documents into index-ready term postings.
//!
//! ```text
//! Document → DocumentParser → AnalyzedDocument → Inverted Index + Document Store
//!              ↓
//!        per-field Analyzer (from the Schema)
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use ahash::AHashMap;

use crate::document::document::Document;
use crate::error::{Result, WolfError};
use crate::schema::Schema;

/// Term positions of a single field: term → positions, ascending.
pub type FieldTerms = AHashMap<String, Vec<u32>>;

/// A document after analysis: its key, its stored values and its terms per field.
#[derive(Clone, Debug, Default)]
pub struct AnalyzedDocument {
    /// Value of the schema's unique key field.
    pub key: String,
    /// Values of the fields the schema marks as stored.
    pub stored: BTreeMap<String, String>,
    /// Terms of every indexed field that produced at least one term.
    pub field_terms: AHashMap<String, FieldTerms>,
}

impl AnalyzedDocument {
    /// Frequency of `term` in `field`.
    pub fn term_frequency(&self, field: &str, term: &str) -> u32 {
        self.field_terms
            .get(field)
            .and_then(|terms| terms.get(term))
            .map_or(0, |positions| positions.len() as u32)
    }
}

/// Analyzes documents with the analyzers bound in a schema.
#[derive(Clone, Debug)]
pub struct DocumentParser {
    schema: Arc<Schema>,
}

impl DocumentParser {
    pub fn new(schema: Arc<Schema>) -> Self {
        DocumentParser { schema }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Check the document against the schema and return its unique key.
    ///
    /// Fails with an invalid field error for undeclared fields and an invalid document
    /// error when the key is missing or empty.
    pub fn validate(&self, doc: &Document) -> Result<String> {
        for name in doc.field_names() {
            self.schema.require_field(name)?;
        }

        let key_field = self.schema.unique_key();
        match doc.get(key_field) {
            Some(key) if !key.is_empty() => Ok(key.to_string()),
            _ => Err(WolfError::invalid_document(format!(
                "missing value for unique key field '{key_field}'"
            ))),
        }
    }

    /// Analyze every indexed field and collect the stored ones.
    pub fn parse(&self, doc: &Document) -> Result<AnalyzedDocument> {
        let key = self.validate(doc)?;
        let mut stored = BTreeMap::new();
        let mut field_terms = AHashMap::new();

        for (name, value) in doc.fields() {
            let entry = self.schema.require_field(name)?;

            if entry.is_stored() {
                stored.insert(name.clone(), value.clone());
            }

            let Some(analyzer) = entry.analyzer() else {
                continue;
            };

            let mut terms: FieldTerms = AHashMap::new();
            for token in analyzer.analyze(value)? {
                let position = u32::try_from(token.position).map_err(|_| {
                    WolfError::invalid_document(format!("field '{name}' has too many tokens"))
                })?;
                terms.entry(token.text).or_default().push(position);
            }

            if !terms.is_empty() {
                field_terms.insert(name.clone(), terms);
            }
        }

        Ok(AnalyzedDocument {
            key,
            stored,
            field_terms,
        })
    }
}
