//! SQL Parser
//!
//! A hand-written recursive descent parser with Pratt expression parsing.
//! Nesting depth is bounded by [`ParserOptions::max_depth`].

mod ddl;
mod dml;
mod error;
mod expr;
#[allow(clippy::module_inception)]
mod parser;
mod pratt;
mod query;

pub use error::ParseError;
pub use parser::{Parser, ParserOptions};
