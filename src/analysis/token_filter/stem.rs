//! Stemming token filter and stemmer implementations.

pub mod porter;

pub use porter::PorterStemmer;

use std::sync::Arc;

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// Trait for stemming algorithms.
pub trait Stemmer: Send + Sync {
    /// Stem a word to its root form.
    fn stem(&self, word: &str) -> String;

    /// Get the name of this stemmer.
    fn name(&self) -> &'static str;
}

/// Filter that applies stemming to tokens.
#[derive(Clone)]
pub struct StemFilter {
    stemmer: Arc<dyn Stemmer>,
}

impl std::fmt::Debug for StemFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StemFilter")
            .field("stemmer", &self.stemmer.name())
            .finish()
    }
}

impl StemFilter {
    /// Create a new stem filter with the Porter stemmer.
    pub fn new() -> Self {
        StemFilter {
            stemmer: Arc::new(PorterStemmer::new()),
        }
    }

    /// Create a stem filter with a custom stemmer.
    pub fn with_stemmer(stemmer: Arc<dyn Stemmer>) -> Self {
        StemFilter { stemmer }
    }
}

impl Default for StemFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Filter for StemFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let stemmer = Arc::clone(&self.stemmer);
        Ok(Box::new(tokens.map(move |token| {
            let stemmed = stemmer.stem(&token.text);
            token.with_text(stemmed)
        })))
    }

    fn name(&self) -> &'static str {
        "stem"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    #[test]
    fn test_stem_filter() {
        let filter = StemFilter::new();
        let tokens = vec![
            Token::new("running", 0),
            Token::new("flies", 1),
            Token::new("packs", 2),
        ];

        let result: Vec<Token> = filter
            .filter(Box::new(tokens.into_iter()))
            .unwrap()
            .collect();

        assert_eq!(result.len(), 3);
        assert_eq!(result[0].text, "run");
        assert_eq!(result[1].text, "fli");
        assert_eq!(result[2].text, "pack");
    }

    struct UpperStemmer;

    impl Stemmer for UpperStemmer {
        fn stem(&self, word: &str) -> String {
            word.to_uppercase()
        }

        fn name(&self) -> &'static str {
            "upper"
        }
    }

    #[test]
    fn test_custom_stemmer() {
        let filter = StemFilter::with_stemmer(Arc::new(UpperStemmer));
        let result: Vec<Token> = filter
            .filter(Box::new(vec![Token::new("wolf", 0)].into_iter()))
            .unwrap()
            .collect();
        assert_eq!(result[0].text, "WOLF");
        assert!(format!("{filter:?}").contains("upper"));
    }
}
