//! PostgreSQL dialect.

use super::Dialect;
use crate::lexer::{Keyword, KeywordCategory};

/// PostgreSQL's lexical conventions.
#[derive(Debug, Default, Clone, Copy)]
pub struct PostgresDialect;

impl PostgresDialect {
    /// Creates a new PostgreSQL dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Returns true if `name` only reads back unchanged when quoted, ignoring keywords.
pub(crate) fn has_special_chars(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        None => true,
        Some(first) if !(first.is_ascii_lowercase() || first == '_') => true,
        Some(_) => !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'),
    }
}

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    /// `NAMEDATALEN - 1`.
    fn max_identifier_length(&self) -> usize {
        63
    }

    fn placeholder(&self, index: u32) -> String {
        format!("${index}")
    }

    fn is_reserved(&self, word: &str) -> bool {
        Keyword::lookup(word).is_some_and(|kw| kw.is_reserved())
    }

    fn needs_quoting(&self, name: &str) -> bool {
        has_special_chars(name)
            || Keyword::lookup(name).is_some_and(|kw| kw.category() != KeywordCategory::Unreserved)
    }
}
