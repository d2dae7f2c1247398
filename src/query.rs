//! Structured queries.
//!
//! A [`Query`] is the tree a [`QueryParser`](parser::QueryParser) builds from a
//! query string: term and phrase leaves combined with `And` / `Or` nodes.

pub mod parser;

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use self::parser::QueryParser;

/// A query tree.
///
/// Terms are already analyzed: a `Term` or `Phrase` holds index vocabulary, not raw
/// user input. Use the constructors to build trees; they keep them normalized
/// (no empty combinators, no single-child combinators, no `Empty` children).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Query {
    /// Documents whose `field` contains `term`.
    Term { field: String, term: String },
    /// Documents whose `field` contains `terms` at consecutive positions.
    Phrase { field: String, terms: Vec<String> },
    /// Documents matching every child.
    And(Vec<Query>),
    /// Documents matching any child.
    Or(Vec<Query>),
    /// Matches nothing. Produced for empty input.
    Empty,
}

impl Query {
    pub fn term<F: Into<String>, T: Into<String>>(field: F, term: T) -> Query {
        Query::Term {
            field: field.into(),
            term: term.into(),
        }
    }

    /// A phrase; a single term collapses to [`Query::Term`] and no terms to
    /// [`Query::Empty`].
    pub fn phrase<F: Into<String>>(field: F, mut terms: Vec<String>) -> Query {
        match terms.len() {
            0 => Query::Empty,
            1 => Query::term(field, terms.remove(0)),
            _ => Query::Phrase {
                field: field.into(),
                terms,
            },
        }
    }

    pub fn and(clauses: Vec<Query>) -> Query {
        Query::combine(clauses, true)
    }

    pub fn or(clauses: Vec<Query>) -> Query {
        Query::combine(clauses, false)
    }

    fn combine(clauses: Vec<Query>, conjunction: bool) -> Query {
        let mut flat = Vec::with_capacity(clauses.len());
        for clause in clauses {
            match clause {
                Query::Empty => {}
                Query::And(children) if conjunction => flat.extend(children),
                Query::Or(children) if !conjunction => flat.extend(children),
                other => flat.push(other),
            }
        }

        match flat.len() {
            0 => Query::Empty,
            1 => flat.remove(0),
            _ if conjunction => Query::And(flat),
            _ => Query::Or(flat),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Query::Empty)
    }

    /// Distinct `(field, term)` pairs of every leaf, phrase terms included.
    pub fn leaf_terms(&self) -> BTreeSet<(&str, &str)> {
        let mut leaves = BTreeSet::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut BTreeSet<(&'a str, &'a str)>) {
        match self {
            Query::Term { field, term } => {
                leaves.insert((field.as_str(), term.as_str()));
            }
            Query::Phrase { field, terms } => {
                for term in terms {
                    leaves.insert((field.as_str(), term.as_str()));
                }
            }
            Query::And(children) | Query::Or(children) => {
                for child in children {
                    child.collect_leaves(leaves);
                }
            }
            Query::Empty => {}
        }
    }

    /// Distinct terms of the query, regardless of field.
    pub fn terms(&self) -> BTreeSet<&str> {
        self.leaf_terms().into_iter().map(|(_, term)| term).collect()
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Term { field, term } => write!(f, "{field}:{term}"),
            Query::Phrase { field, terms } => write!(f, "{field}:\"{}\"", terms.join(" ")),
            Query::And(children) | Query::Or(children) => {
                let op = if matches!(self, Query::And(_)) {
                    " AND "
                } else {
                    " OR "
                };
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(op)?;
                    }
                    write!(f, "{child}")?;
                }
                write!(f, ")")
            }
            Query::Empty => write!(f, "<empty>"),
        }
    }
}
