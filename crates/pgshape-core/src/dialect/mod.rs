//! SQL Dialect support.
//!
//! The lexer, the canonical printer and the normalizer share a handful of
//! conventions (identifier quoting, name length, placeholder spelling). This
//! module collects them behind a trait.

mod postgres;

pub(crate) use postgres::has_special_chars;
pub use postgres::PostgresDialect;

/// Trait for SQL dialect-specific behavior.
pub trait Dialect {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character.
    fn identifier_quote(&self) -> char {
        '"'
    }

    /// Returns the longest identifier, in bytes, kept before truncation.
    fn max_identifier_length(&self) -> usize;

    /// Returns the placeholder for the `index`-th parameter (1-based).
    fn placeholder(&self, index: u32) -> String;

    /// Returns true if `word` can never appear as a bare identifier.
    fn is_reserved(&self, word: &str) -> bool;

    /// Returns true if `name` must be quoted to read back as the same identifier.
    fn needs_quoting(&self, name: &str) -> bool;

    /// Quotes an identifier if necessary.
    fn quote_identifier(&self, name: &str) -> String {
        if self.needs_quoting(name) {
            let quote = self.identifier_quote();
            let escaped = name.replace(quote, &format!("{quote}{quote}"));
            format!("{quote}{escaped}{quote}")
        } else {
            name.to_string()
        }
    }
}
