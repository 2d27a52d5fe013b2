//! Lexer error type.

use super::Span;

/// A malformed token.
///
/// The span starts at the first character of the token that could not be
/// completed (the opening quote of an unterminated string, the offending
/// character, ...).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LexError {
    /// The error message.
    pub message: String,
    /// The location of the offending token.
    pub span: Span,
}

impl LexError {
    /// Creates a new lexer error.
    #[must_use]
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}
