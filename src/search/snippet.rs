//! Display excerpts of stored content.
//!
//! The baseline is leading-substring truncation measured in characters. A
//! [`SnippetExtractor`] built with [`SnippetExtractor::centered`] instead moves the
//! window so that the first token matching the query sits near its start.
//!
//! # Examples
//!
//! ```
//! use wolfsearch::search::snippet::{TRUNCATION_MARKER, excerpt};
//!
//! let content = "a".repeat(500);
//! let snippet = excerpt(&content, 400);
//! assert_eq!(snippet.chars().count(), 401);
//! assert!(snippet.ends_with(TRUNCATION_MARKER));
//!
//! assert_eq!(excerpt("short text", 400), "short text");
//! ```

use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::error::Result;
use crate::query::Query;

/// Appended (and, in centered mode, prepended) where content was cut.
pub const TRUNCATION_MARKER: &str = "…";

/// Default excerpt length in characters.
pub const DEFAULT_SNIPPET_CHARS: usize = 400;

/// Leading `max_chars` characters of `content`, followed by [`TRUNCATION_MARKER`]
/// when anything was cut.
pub fn excerpt(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let mut snippet = String::with_capacity(cut + TRUNCATION_MARKER.len());
            snippet.push_str(&content[..cut]);
            snippet.push_str(TRUNCATION_MARKER);
            snippet
        }
        None => content.to_string(),
    }
}

/// Builds excerpts for search hits.
#[derive(Clone)]
pub struct SnippetExtractor {
    max_chars: usize,
    marker: String,
    analyzer: Option<Arc<dyn Analyzer>>,
}

impl std::fmt::Debug for SnippetExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnippetExtractor")
            .field("max_chars", &self.max_chars)
            .field("marker", &self.marker)
            .field("analyzer", &self.analyzer.as_ref().map(|a| a.name()))
            .finish()
    }
}

impl Default for SnippetExtractor {
    fn default() -> Self {
        SnippetExtractor::new(DEFAULT_SNIPPET_CHARS)
    }
}

impl SnippetExtractor {
    pub fn new(max_chars: usize) -> Self {
        SnippetExtractor {
            max_chars,
            marker: TRUNCATION_MARKER.to_string(),
            analyzer: None,
        }
    }

    pub fn with_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.marker = marker.into();
        self
    }

    /// Center excerpts on the first query match, locating matches with `analyzer`.
    ///
    /// The analyzer must be the one the content field was indexed with, otherwise
    /// analysed query terms will not line up with the content tokens.
    pub fn centered(mut self, analyzer: Arc<dyn Analyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn is_centered(&self) -> bool {
        self.analyzer.is_some()
    }

    /// Excerpt of `content` for a hit of `query`.
    ///
    /// Falls back to the leading excerpt when not centered, when no query is given,
    /// or when no token of `content` matches a query term.
    pub fn extract(&self, content: &str, query: Option<&Query>) -> Result<String> {
        let total = content.chars().count();
        if total <= self.max_chars {
            return Ok(content.to_string());
        }

        let start = match (&self.analyzer, query) {
            (Some(analyzer), Some(query)) => self
                .first_match(analyzer.as_ref(), content, query)?
                .map(|byte_offset| {
                    let match_char = content[..byte_offset].chars().count();
                    match_char
                        .saturating_sub(self.max_chars / 3)
                        .min(total - self.max_chars)
                })
                .unwrap_or(0),
            _ => 0,
        };

        Ok(self.window(content, start, total))
    }

    /// Byte offset of the first token whose analysed form is a query term.
    fn first_match(&self, analyzer: &dyn Analyzer, content: &str, query: &Query) -> Result<Option<usize>> {
        let terms = query.terms();
        if terms.is_empty() {
            return Ok(None);
        }

        Ok(analyzer
            .analyze(content)?
            .find(|token| terms.contains(token.text.as_str()))
            .map(|token| token.start_offset))
    }

    fn window(&self, content: &str, start: usize, total: usize) -> String {
        let end = (start + self.max_chars).min(total);
        let text: String = content.chars().skip(start).take(end - start).collect();

        let mut snippet = String::with_capacity(text.len() + 2 * self.marker.len());
        if start > 0 {
            snippet.push_str(&self.marker);
        }
        snippet.push_str(&text);
        if end < total {
            snippet.push_str(&self.marker);
        }
        snippet
    }
}
