//! Caller-facing diagnostics.

use serde::Serialize;

use crate::lexer::{cursor_position, LexError};
use crate::parser::ParseError;

/// Which stage rejected the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// A token could not be formed.
    Lexical,
    /// The tokens do not form a valid statement.
    Syntax,
    /// A structural limit was exceeded (e.g. nesting depth).
    Structure,
}

impl ErrorKind {
    /// Returns a short lower-case name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Lexical => "lexical",
            Self::Syntax => "syntax",
            Self::Structure => "structure",
        }
    }
}

/// Error returned by [`parse`](crate::parse) and [`normalize`](crate::normalize).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct QueryError {
    /// Human-readable description.
    pub message: String,
    /// 1-based character position of the offending token, or `0` when no
    /// precise position applies.
    pub cursorpos: usize,
    /// The stage that failed.
    pub kind: ErrorKind,
}

impl QueryError {
    /// Sentinel cursor meaning "no precise position".
    pub const NO_POSITION: usize = 0;

    /// Creates a new error.
    #[must_use]
    pub fn new(message: impl Into<String>, cursorpos: usize, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            cursorpos,
            kind,
        }
    }

    /// Converts a parser error, resolving its span against `input`.
    #[must_use]
    pub fn from_parse_error(err: ParseError, input: &str) -> Self {
        let cursorpos = err
            .span
            .map_or(Self::NO_POSITION, |span| cursor_position(input, span.start));
        Self {
            message: err.message,
            cursorpos,
            kind: err.kind,
        }
    }

    /// Converts a lexer error, resolving its span against `input`.
    #[must_use]
    pub fn from_lex_error(err: LexError, input: &str) -> Self {
        Self {
            cursorpos: err.span.cursor_position(input),
            message: err.message,
            kind: ErrorKind::Lexical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Span;

    #[test]
    fn test_cursor_is_character_based() {
        let input = "SELECT 'é' ,";
        let err = ParseError::new(ErrorKind::Syntax, "boom", Some(Span::new(12, 13)));
        let query_err = QueryError::from_parse_error(err, input);
        assert_eq!(query_err.cursorpos, 12);
        assert_eq!(query_err.kind, ErrorKind::Syntax);
    }

    #[test]
    fn test_missing_span_is_sentinel() {
        let err = ParseError::new(ErrorKind::Structure, "stack depth limit exceeded", None);
        let query_err = QueryError::from_parse_error(err, "SELECT 1");
        assert_eq!(query_err.cursorpos, QueryError::NO_POSITION);
        assert_eq!(query_err.to_string(), "stack depth limit exceeded");
    }

    #[test]
    fn test_lex_error_conversion() {
        let err = LexError::new("unterminated quoted string", Span::new(7, 11));
        let query_err = QueryError::from_lex_error(err, "SELECT 'abc");
        assert_eq!(query_err.cursorpos, 8);
        assert_eq!(query_err.kind, ErrorKind::Lexical);
    }
}
