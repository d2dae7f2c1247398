//! Text analysis for WolfSearch.
//!
//! Analysis turns raw field text into the normalized term stream stored in the inverted
//! index. The same analyzer instance is used when indexing a field and when parsing a
//! query against it, so both sides agree on vocabulary.
//!
//! ```text
//! "Wolves are Running" → Lowercase → Tokenizer → Stem → RemoveEmpty
//!                        [wolves, are, running] → [wolv, ar, run]
//! ```

pub mod analyzer;
pub mod char_filter;
pub mod token;
pub mod token_filter;
pub mod tokenizer;

pub use analyzer::Analyzer;
pub use analyzer::keyword::KeywordAnalyzer;
pub use analyzer::pipeline::PipelineAnalyzer;
pub use analyzer::stemming::StemmingAnalyzer;
pub use token::{Token, TokenStream};
