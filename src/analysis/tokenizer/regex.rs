//! Regex-based tokenizer implementation.

use std::sync::Arc;

use regex::Regex;

use crate::analysis::token::{Token, TokenStream};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::{Result, WolfError};

/// Runs of letters and digits in any script; everything else is a boundary.
pub const ALPHANUMERIC_PATTERN: &str = r"[\p{Alphabetic}\p{N}]+";

/// A tokenizer that emits every match of a regular expression as a token.
///
/// Tokens are produced lazily: the returned stream owns a copy of the input and
/// advances the regex one match at a time.
#[derive(Clone, Debug)]
pub struct RegexTokenizer {
    pattern: Arc<Regex>,
}

impl RegexTokenizer {
    /// Create a new regex tokenizer with the alphanumeric pattern.
    pub fn new() -> Result<Self> {
        Self::with_pattern(ALPHANUMERIC_PATTERN)
    }

    /// Create a new regex tokenizer with a custom pattern.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| WolfError::schema(format!("Invalid tokenizer pattern: {e}")))?;

        Ok(RegexTokenizer {
            pattern: Arc::new(regex),
        })
    }

    /// Get the regex pattern used by this tokenizer.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        Ok(Box::new(MatchIter {
            pattern: Arc::clone(&self.pattern),
            text: Arc::from(text),
            cursor: 0,
            position: 0,
        }))
    }

    fn name(&self) -> &'static str {
        "regex"
    }
}

struct MatchIter {
    pattern: Arc<Regex>,
    text: Arc<str>,
    cursor: usize,
    position: usize,
}

impl Iterator for MatchIter {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        while self.cursor <= self.text.len() {
            let mat = self.pattern.find_at(&self.text, self.cursor)?;

            if mat.start() == mat.end() {
                // Zero-width match: step past one character.
                let step = self.text[mat.end()..]
                    .chars()
                    .next()
                    .map_or(1, char::len_utf8);
                self.cursor = mat.end() + step;
                continue;
            }

            self.cursor = mat.end();
            let token = Token::with_offsets(mat.as_str(), self.position, mat.start(), mat.end());
            self.position += 1;
            return Some(token);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regex_tokenizer() {
        let tokenizer = RegexTokenizer::new().unwrap();
        let tokens: Vec<Token> = tokenizer.tokenize("hello world").unwrap().collect();

        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "hello");
        assert_eq!(tokens[0].position, 0);
        assert_eq!(tokens[0].start_offset, 0);
        assert_eq!(tokens[0].end_offset, 5);

        assert_eq!(tokens[1].text, "world");
        assert_eq!(tokens[1].position, 1);
        assert_eq!(tokens[1].start_offset, 6);
        assert_eq!(tokens[1].end_offset, 11);
    }

    #[test]
    fn test_splits_on_punctuation() {
        let tokenizer = RegexTokenizer::new().unwrap();
        let texts: Vec<String> = tokenizer
            .tokenize("e-mail: wolf_pack@example.org, 42 café")
            .unwrap()
            .map(|t| t.text)
            .collect();

        assert_eq!(
            texts,
            vec!["e", "mail", "wolf", "pack", "example", "org", "42", "café"]
        );
    }

    #[test]
    fn test_positions_are_consecutive() {
        let tokenizer = RegexTokenizer::new().unwrap();
        let positions: Vec<usize> = tokenizer
            .tokenize("  ...wolves -- run ;; in packs")
            .unwrap()
            .map(|t| t.position)
            .collect();

        assert_eq!(positions, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_restartable() {
        let tokenizer = RegexTokenizer::new().unwrap();
        let first: Vec<Token> = tokenizer.tokenize("a b c").unwrap().collect();
        let second: Vec<Token> = tokenizer.tokenize("a b c").unwrap().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_width_pattern_terminates() {
        let tokenizer = RegexTokenizer::with_pattern(r"\d*").unwrap();
        let tokens: Vec<Token> = tokenizer.tokenize("ab12c").unwrap().collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "12");
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(RegexTokenizer::with_pattern("(").is_err());
    }

    #[test]
    fn test_tokenizer_name() {
        assert_eq!(RegexTokenizer::new().unwrap().name(), "regex");
    }
}
