//! # pgshape-core
//!
//! A PostgreSQL-flavoured SQL parser and query normalizer.
//!
//! This crate provides:
//! - A hand-written lexer and recursive descent parser with Pratt expression
//!   parsing, producing a spanned, serializable AST
//! - A canonical printer (`Display` on every node) whose output parses back
//!   to the same tree
//! - A normalizer that replaces every literal constant with a `$N` parameter
//! - Diagnostics with a message and a 1-based character cursor
//!
//! ## Parsing
//!
//! ```rust
//! use pgshape_core::ast::Statement;
//!
//! let tree = pgshape_core::parse("SELECT a FROM t WHERE x = 1")
//!     .into_result()
//!     .unwrap();
//! assert_eq!(tree.statements.len(), 1);
//! assert!(matches!(tree.statements[0].stmt, Statement::Select(_)));
//! ```
//!
//! ## Normalizing
//!
//! ```rust
//! let normalized = pgshape_core::normalize("select 5, 'a', 5 from t where id = $1");
//! assert_eq!(
//!     normalized.normalized_query.as_deref(),
//!     Some("SELECT $2, $3, $4 FROM t WHERE id = $1")
//! );
//! ```
//!
//! ## Diagnostics
//!
//! ```rust
//! let result = pgshape_core::parse("SELECT FROM");
//! let error = result.error.unwrap();
//! assert_eq!(error.message, "syntax error at or near \"FROM\", expected target list");
//! assert_eq!(error.cursorpos, 8);
//! ```

pub mod ast;
pub mod dialect;
mod error;
pub mod lexer;
pub mod normalize;
pub mod parser;
mod result;

pub use ast::{Expr, ParseTree, Statement};
pub use error::{ErrorKind, QueryError};
pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{ParseError, Parser, ParserOptions};
pub use result::{NormalizeResult, ParseResult};

/// Builds the process-wide keyword table.
///
/// Optional: the table is also built on first use. Safe to call any number
/// of times from any thread.
pub fn init() {
    let table = lexer::keyword_table();
    tracing::debug!(keywords = table.len(), "keyword table ready");
}

/// Parses every statement in `query` with default options.
#[must_use]
pub fn parse(query: &str) -> ParseResult {
    parse_with_options(query, ParserOptions::default())
}

/// Parses every statement in `query`.
#[must_use]
pub fn parse_with_options(query: &str, options: ParserOptions) -> ParseResult {
    tracing::debug!(len = query.len(), max_depth = options.max_depth, "parse started");
    let mut parser = match Parser::with_options(query, options) {
        Ok(parser) => parser,
        Err(err) => return ParseResult::failure(reject(err, query), &[]),
    };
    let outcome = parser.parse_statements();
    let notices = parser.take_notices();
    match outcome {
        Ok(tree) => {
            tracing::debug!(
                statements = tree.statements.len(),
                notices = notices.len(),
                "parse finished"
            );
            ParseResult::success(tree, &notices)
        }
        Err(err) => ParseResult::failure(reject(err, query), &notices),
    }
}

/// Normalizes `query` with default options.
#[must_use]
pub fn normalize(query: &str) -> NormalizeResult {
    normalize_with_options(query, ParserOptions::default())
}

/// Parses `query`, replaces every literal with a `$N` parameter and prints
/// the result canonically, statements joined by `; `.
#[must_use]
pub fn normalize_with_options(query: &str, options: ParserOptions) -> NormalizeResult {
    let mut tree = match parse_with_options(query, options).into_result() {
        Ok(tree) => tree,
        Err(err) => return NormalizeResult::failure(err),
    };
    match normalize::parameterize(&mut tree) {
        Ok(replaced) => {
            let normalized = tree.to_string();
            tracing::debug!(placeholders = replaced, "normalize finished");
            NormalizeResult::success(normalized)
        }
        Err(err) => {
            tracing::debug!(message = %err.message, "normalize failed");
            NormalizeResult::failure(err)
        }
    }
}

fn reject(err: ParseError, query: &str) -> QueryError {
    let err = QueryError::from_parse_error(err, query);
    tracing::debug!(
        message = %err.message,
        cursorpos = err.cursorpos,
        kind = err.kind.as_str(),
        "query rejected"
    );
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init();
        init();
        assert!(parse("SELECT 1").is_ok());
    }

    #[test]
    fn test_empty_input() {
        let result = parse("  -- nothing here\n");
        assert!(result.parse_tree.unwrap().is_empty());
        assert!(result.error.is_none());
        assert_eq!(normalize("").normalized_query.as_deref(), Some(""));
    }

    #[test]
    fn test_exactly_one_side_is_set() {
        let ok = parse("SELECT 1");
        assert!(ok.parse_tree.is_some() && ok.error.is_none());
        let failed = parse("SELECT (");
        assert!(failed.parse_tree.is_none() && failed.error.is_some());

        let failed = normalize("SELECT (");
        assert!(failed.normalized_query.is_none());
        assert_eq!(failed.error, parse("SELECT (").error);
    }

    #[test]
    fn test_results_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ParseResult>();
        assert_send_sync::<NormalizeResult>();
        assert_send_sync::<QueryError>();
    }
}
