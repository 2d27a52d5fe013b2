//! Result records returned by the entry points.

use serde::Serialize;

use crate::ast::ParseTree;
use crate::error::QueryError;

/// Outcome of [`parse`](crate::parse).
///
/// Exactly one of `parse_tree` and `error` is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseResult {
    /// The statements, on success.
    pub parse_tree: Option<ParseTree>,
    /// Notices raised while parsing, one per line.
    pub stderr_buffer: String,
    /// The first error, on failure.
    pub error: Option<QueryError>,
}

impl ParseResult {
    pub(crate) fn success(parse_tree: ParseTree, notices: &[String]) -> Self {
        Self {
            parse_tree: Some(parse_tree),
            stderr_buffer: join_notices(notices),
            error: None,
        }
    }

    pub(crate) fn failure(error: QueryError, notices: &[String]) -> Self {
        Self {
            parse_tree: None,
            stderr_buffer: join_notices(notices),
            error: Some(error),
        }
    }

    /// Returns true if parsing succeeded.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Converts into a `Result`, dropping the notices.
    ///
    /// # Errors
    ///
    /// Returns the parse error if parsing failed.
    pub fn into_result(self) -> Result<ParseTree, QueryError> {
        match (self.parse_tree, self.error) {
            (_, Some(error)) => Err(error),
            (Some(tree), None) => Ok(tree),
            (None, None) => Ok(ParseTree::default()),
        }
    }
}

impl From<ParseResult> for Result<ParseTree, QueryError> {
    fn from(result: ParseResult) -> Self {
        result.into_result()
    }
}

/// Outcome of [`normalize`](crate::normalize).
///
/// Exactly one of `normalized_query` and `error` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizeResult {
    /// The canonical text with literals replaced by `$N`, on success.
    pub normalized_query: Option<String>,
    /// The first error, on failure.
    pub error: Option<QueryError>,
}

impl NormalizeResult {
    pub(crate) const fn success(normalized_query: String) -> Self {
        Self {
            normalized_query: Some(normalized_query),
            error: None,
        }
    }

    pub(crate) const fn failure(error: QueryError) -> Self {
        Self {
            normalized_query: None,
            error: Some(error),
        }
    }

    /// Returns true if normalization succeeded.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Converts into a `Result`.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the query could not be normalized.
    pub fn into_result(self) -> Result<String, QueryError> {
        match (self.normalized_query, self.error) {
            (_, Some(error)) => Err(error),
            (Some(query), None) => Ok(query),
            (None, None) => Ok(String::new()),
        }
    }
}

impl From<NormalizeResult> for Result<String, QueryError> {
    fn from(result: NormalizeResult) -> Self {
        result.into_result()
    }
}

fn join_notices(notices: &[String]) -> String {
    notices.iter().fold(String::new(), |mut buffer, notice| {
        buffer.push_str(notice);
        buffer.push('\n');
        buffer
    })
}
