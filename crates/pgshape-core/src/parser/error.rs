//! Parser error types.

use crate::error::ErrorKind;
use crate::lexer::{LexError, Span, Token, TokenKind};

/// A parse error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ParseError {
    /// The stage that failed.
    pub kind: ErrorKind,
    /// The error message.
    pub message: String,
    /// The location of the error, if it has one.
    pub span: Option<Span>,
    /// Expected construct (if applicable).
    pub expected: Option<String>,
    /// The actual token found.
    pub found: Option<TokenKind>,
}

impl ParseError {
    /// Creates a new parse error.
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            kind,
            message: message.into(),
            span,
            expected: None,
            found: None,
        }
    }

    /// Creates an "unexpected token" error.
    ///
    /// `input` is the query text; the message quotes the token as written.
    #[must_use]
    pub fn unexpected(expected: impl Into<String>, found: &Token, input: &str) -> Self {
        let expected: String = expected.into();
        let mut err = Self::syntax_at(found, input);
        err.message = format!("{}, expected {expected}", err.message);
        err.expected = Some(expected);
        err
    }

    /// Creates a bare `syntax error at or near ...` error.
    #[must_use]
    pub fn syntax_at(found: &Token, input: &str) -> Self {
        let message = if found.is_eof() {
            String::from("syntax error at end of input")
        } else {
            format!("syntax error at or near \"{}\"", found.span.slice(input))
        };
        Self {
            kind: ErrorKind::Syntax,
            message,
            span: Some(found.span),
            expected: None,
            found: Some(found.kind.clone()),
        }
    }

    /// Creates the error raised when nesting exceeds the configured depth.
    #[must_use]
    pub fn depth_exceeded() -> Self {
        Self::new(ErrorKind::Structure, "stack depth limit exceeded", None)
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        Self::new(ErrorKind::Lexical, err.message, Some(err.span))
    }
}
