//! Token filters transform a token stream.
//!
//! Filters are chained after the tokenizer inside a
//! [`PipelineAnalyzer`](crate::analysis::analyzer::pipeline::PipelineAnalyzer) and are
//! applied lazily, one token at a time.

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod remove_empty;
pub mod stem;

pub use remove_empty::RemoveEmptyFilter;
pub use stem::{PorterStemmer, StemFilter, Stemmer};
