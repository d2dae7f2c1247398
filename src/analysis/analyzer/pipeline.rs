//! Pipeline analyzer: char filters, then a tokenizer, then token filters.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use wolfsearch::analysis::analyzer::Analyzer;
//! use wolfsearch::analysis::analyzer::pipeline::PipelineAnalyzer;
//! use wolfsearch::analysis::char_filter::lowercase::LowercaseCharFilter;
//! use wolfsearch::analysis::tokenizer::regex::RegexTokenizer;
//!
//! let tokenizer = Arc::new(RegexTokenizer::new().unwrap());
//! let analyzer = PipelineAnalyzer::new(tokenizer)
//!     .add_char_filter(Arc::new(LowercaseCharFilter::new()))
//!     .with_name("lowercase_only");
//!
//! let tokens: Vec<_> = analyzer.analyze("Hello World").unwrap().collect();
//! assert_eq!(tokens[0].text, "hello");
//! assert_eq!(analyzer.pipeline_name(), "lowercase_only");
//! ```

use std::sync::Arc;

use crate::analysis::analyzer::Analyzer;
use crate::analysis::char_filter::{CharFilter, correct_offset};
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// Char filters, tokenizer and token filters, each applied in the order added.
///
/// Token offsets always refer to the text passed to [`Analyzer::analyze`], not to
/// the char-filtered text.
#[derive(Clone)]
pub struct PipelineAnalyzer {
    char_filters: Vec<Arc<dyn CharFilter>>,
    tokenizer: Arc<dyn Tokenizer>,
    filters: Vec<Arc<dyn Filter>>,
    name: String,
}

impl std::fmt::Debug for PipelineAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineAnalyzer")
            .field(
                "char_filters",
                &self.char_filters.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .field("tokenizer", &self.tokenizer.name())
            .field(
                "filters",
                &self.filters.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .field("name", &self.name)
            .finish()
    }
}

impl PipelineAnalyzer {
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        PipelineAnalyzer {
            name: format!("pipeline_{}", tokenizer.name()),
            char_filters: Vec::new(),
            tokenizer,
            filters: Vec::new(),
        }
    }

    pub fn add_char_filter(mut self, char_filter: Arc<dyn CharFilter>) -> Self {
        self.char_filters.push(char_filter);
        self
    }

    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// The configured pipeline name (the trait `name` is static).
    pub fn pipeline_name(&self) -> &str {
        &self.name
    }

    pub fn char_filters(&self) -> &[Arc<dyn CharFilter>] {
        &self.char_filters
    }

    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    pub fn filters(&self) -> &[Arc<dyn Filter>] {
        &self.filters
    }
}

impl PipelineAnalyzer {
    fn apply_filters(&self, mut tokens: TokenStream) -> Result<TokenStream> {
        for filter in &self.filters {
            tokens = filter.filter(tokens)?;
        }
        Ok(tokens)
    }
}

impl Analyzer for PipelineAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        if self.char_filters.is_empty() {
            return self.apply_filters(self.tokenizer.tokenize(text)?);
        }

        let mut filtered = text.to_string();
        let mut transformations = Vec::with_capacity(self.char_filters.len());
        for char_filter in &self.char_filters {
            let (next, changes) = char_filter.filter(&filtered);
            filtered = next;
            transformations.push(changes);
        }

        let tokens = self.apply_filters(self.tokenizer.tokenize(&filtered)?)?;
        if transformations.iter().all(Vec::is_empty) {
            return Ok(tokens);
        }

        // Undo the char filters last to first.
        Ok(Box::new(tokens.map(move |mut token| {
            for changes in transformations.iter().rev() {
                token.start_offset = correct_offset(token.start_offset, changes);
                token.end_offset = correct_offset(token.end_offset, changes);
            }
            token
        })))
    }

    fn name(&self) -> &'static str {
        "pipeline"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::char_filter::lowercase::LowercaseCharFilter;
    use crate::analysis::token::Token;
    use crate::analysis::token_filter::stem::StemFilter;
    use crate::analysis::tokenizer::regex::RegexTokenizer;

    #[test]
    fn test_filters_applied_in_order() {
        let analyzer = PipelineAnalyzer::new(Arc::new(RegexTokenizer::new().unwrap()))
            .add_char_filter(Arc::new(LowercaseCharFilter::new()))
            .add_filter(Arc::new(StemFilter::new()));

        let tokens: Vec<Token> = analyzer.analyze("Running WOLVES").unwrap().collect();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].text, "run");
        assert_eq!(tokens[1].text, "wolv");
        assert_eq!(analyzer.pipeline_name(), "pipeline_regex");
        assert_eq!(analyzer.char_filters().len(), 1);
        assert_eq!(analyzer.filters().len(), 1);
    }

    #[test]
    fn test_offsets_refer_to_the_original_text() {
        let analyzer = PipelineAnalyzer::new(Arc::new(RegexTokenizer::new().unwrap()))
            .add_char_filter(Arc::new(LowercaseCharFilter::new()));

        let text = "İstanbul WOLVES";
        let tokens: Vec<Token> = analyzer.analyze(text).unwrap().collect();
        for token in &tokens {
            assert!(text.is_char_boundary(token.start_offset));
            assert!(text.is_char_boundary(token.end_offset));
        }
        assert_eq!(tokens[0].start_offset, 0);

        let last = tokens.last().unwrap();
        assert_eq!(last.text, "wolves");
        assert_eq!(&text[last.start_offset..last.end_offset], "WOLVES");
    }

    #[test]
    fn test_tokenizer_only() {
        let analyzer = PipelineAnalyzer::new(Arc::new(RegexTokenizer::new().unwrap()));
        let tokens: Vec<Token> = analyzer.analyze("Grey WOLF").unwrap().collect();
        assert_eq!(tokens[1].text, "WOLF");
        assert!(format!("{analyzer:?}").contains("regex"));
    }
}
