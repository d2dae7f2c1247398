//! Query parser for converting query strings to [`Query`] trees.
//!
//! Supported syntax:
//! - Terms: `running` (matched in any target field)
//! - Phrases: `"wolves run"` (consecutive positions)
//! - Field prefixes: `title:wolves`, `content:"in packs"`. A prefix that names no
//!   schema field is plain text, so `10:30` and `http://example.com` still search.
//! - Boolean operators: `wolves AND packs`, `wolves OR cats`
//! - Parentheses: `(wolves OR cats) AND run`
//!
//! Adjacent clauses without an operator are combined with OR. `AND` binds tighter
//! than `OR`. Operators are recognised only in upper case.

use std::iter::Peekable;
use std::str::Chars;
use std::sync::Arc;

use log::debug;

use crate::error::{Result, WolfError};
use crate::query::Query;
use crate::schema::Schema;

/// Parses query strings against a schema and a list of target fields.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use wolfsearch::document::SiteField;
/// use wolfsearch::query::{Query, QueryParser};
///
/// let schema = Arc::new(SiteField::schema().unwrap());
/// let parser = QueryParser::new(schema, &["title", "content"]).unwrap();
///
/// assert_eq!(
///     parser.parse("running").unwrap(),
///     Query::or(vec![Query::term("title", "run"), Query::term("content", "run")])
/// );
/// assert!(parser.parse("   ").unwrap().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct QueryParser {
    schema: Arc<Schema>,
    fields: Vec<String>,
}

impl QueryParser {
    /// Create a parser over `fields`.
    ///
    /// Every target field must be declared and indexed; otherwise this fails with an
    /// invalid field error.
    pub fn new<S: AsRef<str>>(schema: Arc<Schema>, fields: &[S]) -> Result<Self> {
        if fields.is_empty() {
            return Err(WolfError::invalid_field("no target fields given"));
        }

        let mut names = Vec::with_capacity(fields.len());
        for field in fields {
            let name = field.as_ref();
            require_indexed(&schema, name)?;
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }

        Ok(QueryParser {
            schema,
            fields: names,
        })
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Parse a query string.
    ///
    /// Empty input, or input without a single indexable term, parses to
    /// [`Query::Empty`].
    pub fn parse(&self, query_str: &str) -> Result<Query> {
        let trimmed = query_str.trim();
        if trimmed.is_empty() {
            return Ok(Query::Empty);
        }

        let mut parser = QueryStringParser::new(trimmed, self);
        let query = parser.parse()?;
        debug!("Parsed query into {query}");
        Ok(query)
    }

    /// Analyze `text` in each field and combine the per-field queries with OR.
    fn text_query(&self, field: Option<&str>, text: &str) -> Result<Query> {
        let fields: Vec<&str> = match field {
            Some(field) => vec![field],
            None => self.fields.iter().map(String::as_str).collect(),
        };

        let mut clauses = Vec::with_capacity(fields.len());
        for field in fields {
            let analyzer = require_indexed(&self.schema, field)?;
            let terms = analyzer
                .terms(text)?
                .into_iter()
                .map(|(term, _)| term)
                .collect();
            clauses.push(Query::phrase(field, terms));
        }
        Ok(Query::or(clauses))
    }
}

fn require_indexed<'a>(
    schema: &'a Schema,
    name: &str,
) -> Result<&'a Arc<dyn crate::analysis::Analyzer>> {
    schema
        .require_field(name)?
        .analyzer()
        .ok_or_else(|| WolfError::invalid_field(format!("{name} (not indexed)")))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    And,
    Or,
}

/// Internal recursive-descent parser over one query string.
struct QueryStringParser<'a> {
    chars: Peekable<Chars<'a>>,
    parser: &'a QueryParser,
}

impl<'a> QueryStringParser<'a> {
    fn new(query_str: &'a str, parser: &'a QueryParser) -> Self {
        QueryStringParser {
            chars: query_str.chars().peekable(),
            parser,
        }
    }

    fn parse(&mut self) -> Result<Query> {
        let query = self.parse_or_expression()?;

        self.skip_whitespace();
        match self.chars.peek() {
            None => Ok(query),
            Some(')') => Err(WolfError::query_syntax("unbalanced ')'")),
            Some(ch) => Err(WolfError::query_syntax(format!("unexpected '{ch}'"))),
        }
    }

    fn parse_or_expression(&mut self) -> Result<Query> {
        let mut clauses = vec![self.parse_and_expression()?];

        loop {
            self.skip_whitespace();
            match self.chars.peek() {
                None | Some(')') => break,
                _ => {}
            }

            if self.peek_keyword() == Some(Keyword::Or) {
                self.consume_keyword(Keyword::Or);
            }
            clauses.push(self.parse_and_expression()?);
        }

        Ok(Query::or(clauses))
    }

    fn parse_and_expression(&mut self) -> Result<Query> {
        let mut clauses = vec![self.parse_term()?];

        while self.peek_keyword() == Some(Keyword::And) {
            self.consume_keyword(Keyword::And);
            clauses.push(self.parse_term()?);
        }

        Ok(Query::and(clauses))
    }

    fn parse_term(&mut self) -> Result<Query> {
        self.skip_whitespace();

        match self.chars.peek() {
            None => return Err(WolfError::query_syntax("expected a term at end of query")),
            Some(')') => return Err(WolfError::query_syntax("expected a term before ')'")),
            Some('(') => {
                self.chars.next();
                let inner = self.parse_or_expression()?;
                self.skip_whitespace();
                if self.chars.next() != Some(')') {
                    return Err(WolfError::query_syntax("unbalanced '('"));
                }
                return Ok(inner);
            }
            Some('"') => {
                let phrase = self.consume_quoted()?;
                return self.parser.text_query(None, &phrase);
            }
            Some(_) => {}
        }

        if let Some(keyword) = self.peek_keyword() {
            return Err(WolfError::query_syntax(format!(
                "operator {keyword:?} is missing an operand"
            )));
        }

        let word = self.consume_word();
        match split_field(&self.parser.schema, &word) {
            Some((field, "")) => {
                if self.chars.peek() != Some(&'"') {
                    return Err(WolfError::query_syntax(format!(
                        "field prefix '{field}:' is missing a term"
                    )));
                }
                let phrase = self.consume_quoted()?;
                self.parser.text_query(Some(field), &phrase)
            }
            Some((field, term)) => self.parser.text_query(Some(field), term),
            None => self.parser.text_query(None, &word),
        }
    }

    fn consume_quoted(&mut self) -> Result<String> {
        // Opening quote.
        self.chars.next();

        let mut phrase = String::new();
        for ch in self.chars.by_ref() {
            if ch == '"' {
                return Ok(phrase);
            }
            phrase.push(ch);
        }
        Err(WolfError::query_syntax("unbalanced quote"))
    }

    fn consume_word(&mut self) -> String {
        let mut word = String::new();
        while let Some(&ch) = self.chars.peek() {
            if ch.is_whitespace() || matches!(ch, '(' | ')' | '"') {
                break;
            }
            word.push(ch);
            self.chars.next();
        }
        word
    }

    fn peek_keyword(&mut self) -> Option<Keyword> {
        self.skip_whitespace();

        let mut lookahead = self.chars.clone();
        let mut word = String::new();
        while let Some(ch) = lookahead.next_if(|ch| ch.is_ascii_alphabetic()) {
            word.push(ch);
        }

        let boundary = lookahead
            .peek()
            .is_none_or(|ch| ch.is_whitespace() || matches!(ch, '(' | ')' | '"'));
        match word.as_str() {
            "AND" if boundary => Some(Keyword::And),
            "OR" if boundary => Some(Keyword::Or),
            _ => None,
        }
    }

    fn consume_keyword(&mut self, keyword: Keyword) {
        let len = match keyword {
            Keyword::And => 3,
            Keyword::Or => 2,
        };
        for _ in 0..len {
            self.chars.next();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|ch| ch.is_whitespace()).is_some() {}
    }
}

/// Split `field:rest` when the prefix names a schema field.
fn split_field<'w>(schema: &Schema, word: &'w str) -> Option<(&'w str, &'w str)> {
    let (field, rest) = word.split_once(':')?;
    schema.has_field(field).then_some((field, rest))
}
