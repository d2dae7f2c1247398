//! Keyword analyzer that treats the entire input as a single token.
//!
//! Used for key fields such as document paths, which must match exactly as given.
//!
//! # Examples
//!
//! ```
//! use wolfsearch::analysis::analyzer::Analyzer;
//! use wolfsearch::analysis::analyzer::keyword::KeywordAnalyzer;
//!
//! let analyzer = KeywordAnalyzer::new();
//! let tokens: Vec<_> = analyzer.analyze("docs/Wolves.html").unwrap().collect();
//!
//! assert_eq!(tokens.len(), 1);
//! assert_eq!(tokens[0].text, "docs/Wolves.html");
//! ```

use crate::analysis::analyzer::Analyzer;
use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

#[derive(Clone, Copy, Debug, Default)]
pub struct KeywordAnalyzer;

impl KeywordAnalyzer {
    pub fn new() -> Self {
        KeywordAnalyzer
    }
}

impl Analyzer for KeywordAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        if text.is_empty() {
            return Ok(Box::new(std::iter::empty()));
        }
        let token = Token::with_offsets(text, 0, 0, text.len());
        Ok(Box::new(std::iter::once(token)))
    }

    fn name(&self) -> &'static str {
        "keyword"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_analyzer() {
        let analyzer = KeywordAnalyzer::new();
        let terms = analyzer.terms("Some Path/with spaces.txt").unwrap();
        assert_eq!(terms, vec![("Some Path/with spaces.txt".to_string(), 0)]);
        assert!(analyzer.terms("").unwrap().is_empty());
    }
}
