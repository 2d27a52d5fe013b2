//! SQL Parser implementation.
//!
//! The parser pulls tokens from the lexer on demand and keeps one token of
//! lookahead (`current`) plus an optional second one (`peeked`). Statement
//! rules live in the sibling `query`, `dml`, `ddl` and `expr` modules as
//! further `impl Parser` blocks.

use super::error::ParseError;
use crate::ast::{
    ExplainStatement, ObjectName, ParseTree, RawStatement, Statement, TransactionKind,
    TransactionStatement,
};
use crate::lexer::{Keyword, Lexer, Span, Token, TokenKind};

/// Tunables for a parser run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Maximum height of the tree: parentheses, subqueries and prefix
    /// operators nest, and every operator in a chain adds one level.
    pub max_depth: usize,
}

impl ParserOptions {
    /// Default nesting limit.
    pub const DEFAULT_MAX_DEPTH: usize = 128;

    /// Creates the default options.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets the height limit.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// SQL Parser.
pub struct Parser<'a> {
    input: &'a str,
    lexer: Lexer<'a>,
    pub(super) current: Token,
    peeked: Option<Token>,
    pub(super) previous: Token,
    options: ParserOptions,
    depth: usize,
    /// Deepest level reached since the innermost open chain began.
    peak: usize,
}

/// Saved state of an enclosing chain, restored by [`Parser::end_chain`].
pub(super) struct ChainMark {
    peak: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser for the given input with default options.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the first token cannot be lexed.
    pub fn new(input: &'a str) -> Result<Self, ParseError> {
        Self::with_options(input, ParserOptions::default())
    }

    /// Creates a new parser with explicit options.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the first token cannot be lexed.
    pub fn with_options(input: &'a str, options: ParserOptions) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Self {
            input,
            lexer,
            current,
            peeked: None,
            previous: Token::new(TokenKind::Eof, Span::at(0)),
            options,
            depth: 0,
            peak: 0,
        })
    }

    /// Drains the notices the lexer recorded so far.
    pub fn take_notices(&mut self) -> Vec<String> {
        self.lexer.take_notices()
    }

    /// Parses every statement in the input.
    ///
    /// Empty statements (`;;`) are skipped; empty input yields an empty tree.
    ///
    /// # Errors
    ///
    /// Returns the first `ParseError` encountered.
    pub fn parse_statements(&mut self) -> Result<ParseTree, ParseError> {
        let mut statements = vec![];
        loop {
            while self.eat(&TokenKind::Semicolon)? {}
            if self.current.is_eof() {
                break;
            }
            let start = self.current.span.start;
            let stmt = self.parse_statement()?;
            let span = Span::new(start, self.previous.span.end);
            tracing::trace!(
                kind = stmt.kind_name(),
                start = span.start,
                end = span.end,
                "parsed statement"
            );
            statements.push(RawStatement { stmt, span });
            if !self.check(&TokenKind::Semicolon) && !self.current.is_eof() {
                return Err(self.unexpected("\";\" or end of input"));
            }
        }
        Ok(ParseTree { statements })
    }

    /// Parses a single SQL statement.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the input is not a valid SQL statement.
    pub fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match &self.current.kind {
            TokenKind::Keyword(Keyword::Select | Keyword::Values | Keyword::With)
            | TokenKind::LeftParen => self.parse_with_statement(),
            TokenKind::Keyword(Keyword::Insert) => {
                Ok(Statement::Insert(self.parse_insert_statement(None)?))
            }
            TokenKind::Keyword(Keyword::Update) => {
                Ok(Statement::Update(self.parse_update_statement(None)?))
            }
            TokenKind::Keyword(Keyword::Delete) => {
                Ok(Statement::Delete(self.parse_delete_statement(None)?))
            }
            TokenKind::Keyword(Keyword::Create) => {
                Ok(Statement::CreateTable(self.parse_create_table()?))
            }
            TokenKind::Keyword(Keyword::Drop) => Ok(Statement::DropTable(self.parse_drop_table()?)),
            TokenKind::Keyword(
                Keyword::Begin
                | Keyword::Start
                | Keyword::Commit
                | Keyword::End
                | Keyword::Rollback
                | Keyword::Abort,
            ) => Ok(Statement::Transaction(self.parse_transaction()?)),
            TokenKind::Keyword(Keyword::Explain) => Ok(Statement::Explain(self.parse_explain()?)),
            _ => Err(self.unexpected("statement")),
        }
    }

    /// Parses a statement that may start with a WITH clause.
    fn parse_with_statement(&mut self) -> Result<Statement, ParseError> {
        if !self.check_keyword(Keyword::With) {
            return Ok(Statement::Select(self.parse_query()?));
        }
        let start = self.current.span.start;
        let with = self.parse_with_clause()?;
        match &self.current.kind {
            TokenKind::Keyword(Keyword::Insert) => Ok(Statement::Insert(
                self.parse_insert_statement(Some((with, start)))?,
            )),
            TokenKind::Keyword(Keyword::Update) => Ok(Statement::Update(
                self.parse_update_statement(Some((with, start)))?,
            )),
            TokenKind::Keyword(Keyword::Delete) => Ok(Statement::Delete(
                self.parse_delete_statement(Some((with, start)))?,
            )),
            _ => Ok(Statement::Select(self.parse_query_after_with(with, start)?)),
        }
    }

    /// Parses `BEGIN`, `START TRANSACTION`, `COMMIT`, `END`, `ROLLBACK` or `ABORT`.
    fn parse_transaction(&mut self) -> Result<TransactionStatement, ParseError> {
        let token = self.advance()?;
        let kind = match token.as_keyword() {
            Some(Keyword::Begin) => TransactionKind::Begin,
            Some(Keyword::Start) => {
                self.expect_keyword(Keyword::Transaction)?;
                TransactionKind::Begin
            }
            Some(Keyword::Commit | Keyword::End) => TransactionKind::Commit,
            _ => TransactionKind::Rollback,
        };
        if !matches!(token.as_keyword(), Some(Keyword::Start))
            && (self.check_keyword(Keyword::Work) || self.check_keyword(Keyword::Transaction))
        {
            self.advance()?;
        }
        Ok(TransactionStatement {
            kind,
            span: self.span_from(token.span.start),
        })
    }

    /// Parses `EXPLAIN [ANALYZE] [VERBOSE] statement`.
    fn parse_explain(&mut self) -> Result<ExplainStatement, ParseError> {
        let start = self.expect_keyword(Keyword::Explain)?.span.start;
        let analyze = self.eat_keyword(Keyword::Analyze)?;
        let verbose = self.eat_keyword(Keyword::Verbose)?;
        self.enter()?;
        let statement = self.parse_statement()?;
        self.leave();
        Ok(ExplainStatement {
            analyze,
            verbose,
            statement: Box::new(statement),
            span: self.span_from(start),
        })
    }

    // --- Names ---

    /// Parses a column or table identifier (`ColId`): an identifier or a
    /// keyword that is neither reserved nor a type/function-name keyword.
    pub(super) fn parse_identifier(&mut self, expected: &str) -> Result<String, ParseError> {
        match &self.current.kind {
            TokenKind::Identifier(name) | TokenKind::QuotedIdentifier(name) => {
                let name = name.clone();
                self.advance()?;
                Ok(name)
            }
            TokenKind::Keyword(kw) if kw.is_col_id() => {
                let name = kw.as_str().to_ascii_lowercase();
                self.advance()?;
                Ok(name)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    /// Parses a label, where any keyword is accepted (`AS label`, `t.label`).
    pub(super) fn parse_label(&mut self, expected: &str) -> Result<String, ParseError> {
        match &self.current.kind {
            TokenKind::Keyword(kw) => {
                let name = kw.as_str().to_ascii_lowercase();
                self.advance()?;
                Ok(name)
            }
            _ => self.parse_identifier(expected),
        }
    }

    /// Parses a possibly qualified name such as `public.users`.
    pub(super) fn parse_object_name(&mut self, expected: &str) -> Result<ObjectName, ParseError> {
        let mut parts = vec![self.parse_identifier(expected)?];
        while self.eat(&TokenKind::Dot)? {
            parts.push(self.parse_label("identifier")?);
        }
        Ok(ObjectName(parts))
    }

    /// Parses a parenthesized, comma-separated list of identifiers.
    pub(super) fn parse_identifier_list(&mut self) -> Result<Vec<String>, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        let mut idents = vec![];
        loop {
            idents.push(self.parse_identifier("column name")?);
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(idents)
    }

    // --- Helper methods ---

    /// Advances to the next token and returns the one just consumed.
    pub(super) fn advance(&mut self) -> Result<Token, ParseError> {
        let next = match self.peeked.take() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };
        let token = core::mem::replace(&mut self.current, next);
        self.previous = token.clone();
        Ok(token)
    }

    /// Returns the token after `current` without consuming anything.
    pub(super) fn peek_next(&mut self) -> Result<&Token, ParseError> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };
        Ok(self.peeked.insert(token))
    }

    /// Returns true if the token after `current` is the given keyword.
    pub(super) fn peek_keyword(&mut self, keyword: Keyword) -> Result<bool, ParseError> {
        Ok(self.peek_next()?.as_keyword() == Some(keyword))
    }

    /// Checks if the current token has the same kind as `kind`, ignoring payloads.
    pub(super) fn check(&self, kind: &TokenKind) -> bool {
        core::mem::discriminant(&self.current.kind) == core::mem::discriminant(kind)
    }

    /// Checks if the current token is the given keyword.
    pub(super) fn check_keyword(&self, keyword: Keyword) -> bool {
        matches!(&self.current.kind, TokenKind::Keyword(kw) if *kw == keyword)
    }

    /// Consumes the current token if it has the given kind.
    pub(super) fn eat(&mut self, kind: &TokenKind) -> Result<bool, ParseError> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Consumes the current token if it is the given keyword.
    pub(super) fn eat_keyword(&mut self, keyword: Keyword) -> Result<bool, ParseError> {
        if self.check_keyword(keyword) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Expects the current token to be the given kind.
    pub(super) fn expect(&mut self, kind: &TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(self.unexpected(format!("\"{kind}\"")))
        }
    }

    /// Expects the current token to be the given keyword.
    pub(super) fn expect_keyword(&mut self, keyword: Keyword) -> Result<Token, ParseError> {
        if self.check_keyword(keyword) {
            self.advance()
        } else {
            Err(self.unexpected(keyword.as_str()))
        }
    }

    /// Builds an "unexpected token" error at the current token.
    pub(super) fn unexpected(&self, expected: impl Into<String>) -> ParseError {
        ParseError::unexpected(expected, &self.current, self.input)
    }

    /// Builds a bare syntax error at the current token.
    pub(super) fn syntax_error(&self) -> ParseError {
        ParseError::syntax_at(&self.current, self.input)
    }

    /// Builds a bare syntax error at the token just consumed.
    pub(super) fn syntax_at_previous(&self) -> ParseError {
        ParseError::syntax_at(&self.previous, self.input)
    }

    /// Span from `start` to the end of the last consumed token.
    pub(super) const fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.previous.span.end)
    }

    /// Enters one level of nesting.
    pub(super) fn enter(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        self.peak = self.peak.max(self.depth);
        self.check_height(self.depth)
    }

    /// Leaves one level of nesting.
    pub(super) const fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    fn check_height(&self, height: usize) -> Result<(), ParseError> {
        if height > self.options.max_depth {
            tracing::debug!(max_depth = self.options.max_depth, "nesting limit reached");
            return Err(ParseError::depth_exceeded());
        }
        Ok(())
    }

    /// Starts a left-deep chain (`a + b + c`, `t JOIN u JOIN v`) at the
    /// current level.
    pub(super) const fn begin_chain(&mut self) -> ChainMark {
        let mark = ChainMark { peak: self.peak };
        self.peak = self.depth;
        mark
    }

    /// Deepest level of the chain so far. Read it before parsing a right
    /// operand and hand it to [`Parser::wrap_chain`] afterwards.
    pub(super) const fn chain_peak(&self) -> usize {
        self.peak
    }

    /// Accounts for wrapping the chain built so far into a new node: the
    /// left side, whose deepest level was `left_peak`, moves one level down.
    pub(super) fn wrap_chain(&mut self, left_peak: usize) -> Result<(), ParseError> {
        self.peak = self.peak.max(left_peak + 1);
        self.check_height(self.peak)
    }

    pub(super) fn end_chain(&mut self, mark: ChainMark) {
        self.peak = self.peak.max(mark.peak);
    }
}
