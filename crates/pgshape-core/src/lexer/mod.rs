//! SQL Lexer/Tokenizer
//!
//! This module provides a hand-written lexer for PostgreSQL-flavoured SQL
//! that produces a stream of tokens.

mod error;
mod span;
mod token;
mod tokenizer;

pub use error::LexError;
pub use span::{cursor_position, Span};
pub(crate) use token::keyword_table;
pub use token::{Keyword, KeywordCategory, Token, TokenKind};
pub use tokenizer::Lexer;

/// Tokenizes `input` in one go, ending with an `Eof` token.
///
/// # Errors
///
/// Returns the first `LexError` encountered.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).tokenize()
}
