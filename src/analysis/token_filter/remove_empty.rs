//! Remove empty filter implementation.

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// A filter that drops tokens whose text is empty.
///
/// Used at the end of a pipeline so that filters which may empty a token (stemming
/// an all-suffix word, for instance) never leak a blank term into the index.
#[derive(Clone, Debug, Default)]
pub struct RemoveEmptyFilter;

impl RemoveEmptyFilter {
    /// Create a new remove empty filter.
    pub fn new() -> Self {
        RemoveEmptyFilter
    }
}

impl Filter for RemoveEmptyFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        Ok(Box::new(tokens.filter(|token| !token.is_empty())))
    }

    fn name(&self) -> &'static str {
        "remove_empty"
    }
}
