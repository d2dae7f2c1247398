//! Analyzers combine a tokenizer and token filters into a complete pipeline.
//!
//! ```text
//! Raw Text → Analyzer → Token Stream → Index / Query
//!             ↓
//!         Tokenizer
//!             ↓
//!         Filter 1 … Filter N
//! ```
//!
//! # Available Implementations
//!
//! - [`StemmingAnalyzer`](stemming::StemmingAnalyzer) - split, lowercase, stem (text fields)
//! - [`PipelineAnalyzer`](pipeline::PipelineAnalyzer) - custom tokenizer + filter chains
//! - [`KeywordAnalyzer`](keyword::KeywordAnalyzer) - whole value as one token (key fields)
//!
//! # Examples
//!
//! ```
//! use wolfsearch::analysis::analyzer::Analyzer;
//! use wolfsearch::analysis::analyzer::stemming::StemmingAnalyzer;
//!
//! let analyzer = StemmingAnalyzer::new().unwrap();
//! let terms = analyzer.terms("Wolves are RUNNING").unwrap();
//!
//! assert_eq!(terms, vec![("wolv".to_string(), 0), ("ar".to_string(), 1), ("run".to_string(), 2)]);
//! ```

pub mod keyword;
pub mod pipeline;
pub mod stemming;

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for text analyzers.
///
/// An analyzer must be deterministic. Indexing and query parsing call the same
/// instance for a given field; any divergence between the two silently breaks
/// retrieval for that field.
pub trait Analyzer: Send + Sync {
    /// Analyze text into a lazy token stream.
    fn analyze(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this analyzer.
    fn name(&self) -> &'static str;

    /// Collect `(term, position)` pairs for `text`.
    fn terms(&self, text: &str) -> Result<Vec<(String, usize)>> {
        Ok(self
            .analyze(text)?
            .map(|token| (token.text, token.position))
            .collect())
    }
}
