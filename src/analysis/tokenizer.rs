//! Tokenizers split raw text into tokens.
//!
//! Tokenizers are the first step of the analysis pipeline. The crate ships one
//! implementation, [`regex::RegexTokenizer`], whose default pattern splits on
//! non-alphanumeric boundaries.
//!
//! # Examples
//!
//! ```
//! use wolfsearch::analysis::tokenizer::Tokenizer;
//! use wolfsearch::analysis::tokenizer::regex::RegexTokenizer;
//!
//! let tokenizer = RegexTokenizer::new().unwrap();
//! let tokens: Vec<_> = tokenizer.tokenize("Hello, world!").unwrap().collect();
//! assert_eq!(tokens.len(), 2);
//! assert_eq!(tokens[1].text, "world");
//! ```

pub mod regex;

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// Implementations must be deterministic: the same input always yields the same
/// token sequence, and calling `tokenize` again restarts the sequence.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}
