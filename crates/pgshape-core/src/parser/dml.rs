//! INSERT, UPDATE and DELETE.

use super::error::ParseError;
use super::parser::Parser;
use crate::ast::{
    AssignmentTarget, ConflictAction, DeleteStatement, Expr, ExprKind, InsertSource,
    InsertStatement, OnConflict, SelectColumn, UpdateAssignment, UpdateStatement, WithClause,
};
use crate::lexer::{Keyword, TokenKind};

impl Parser<'_> {
    /// Parses an INSERT statement.
    ///
    /// `with` carries a WITH clause already consumed by the caller, along
    /// with the offset where the statement started.
    pub(super) fn parse_insert_statement(
        &mut self,
        with: Option<(WithClause, usize)>,
    ) -> Result<InsertStatement, ParseError> {
        let (with, start) = self.split_with(with);
        self.expect_keyword(Keyword::Insert)?;
        self.expect_keyword(Keyword::Into)?;

        let table = self.parse_object_name("table name")?;
        let alias = if self.eat_keyword(Keyword::As)? {
            Some(self.parse_identifier("alias")?)
        } else {
            None
        };

        // A parenthesized column list, unless the parenthesis opens the query
        let columns = if self.check(&TokenKind::LeftParen)
            && !matches!(
                self.peek_next()?.as_keyword(),
                Some(Keyword::Select | Keyword::Values | Keyword::With)
            ) {
            self.parse_identifier_list()?
        } else {
            vec![]
        };

        let source = if self.check_keyword(Keyword::Default) {
            self.advance()?;
            self.expect_keyword(Keyword::Values)?;
            InsertSource::DefaultValues
        } else {
            InsertSource::Query(Box::new(self.parse_query()?))
        };

        let on_conflict = if self.check_keyword(Keyword::On) {
            Some(self.parse_on_conflict()?)
        } else {
            None
        };

        let returning = self.parse_returning()?;

        Ok(InsertStatement {
            with,
            table,
            alias,
            columns,
            source,
            on_conflict,
            returning,
            span: self.span_from(start),
        })
    }

    /// Parses `ON CONFLICT [(cols)] DO NOTHING | DO UPDATE SET ... [WHERE ...]`.
    fn parse_on_conflict(&mut self) -> Result<OnConflict, ParseError> {
        self.expect_keyword(Keyword::On)?;
        self.expect_keyword(Keyword::Conflict)?;

        let columns = if self.check(&TokenKind::LeftParen) {
            self.parse_identifier_list()?
        } else {
            vec![]
        };

        self.expect_keyword(Keyword::Do)?;
        let action = if self.eat_keyword(Keyword::Nothing)? {
            ConflictAction::DoNothing
        } else if self.eat_keyword(Keyword::Update)? {
            self.expect_keyword(Keyword::Set)?;
            let assignments = self.parse_assignments()?;
            let where_clause = if self.eat_keyword(Keyword::Where)? {
                Some(self.parse_expr()?)
            } else {
                None
            };
            ConflictAction::DoUpdate {
                assignments,
                where_clause,
            }
        } else {
            return Err(self.unexpected("NOTHING or UPDATE"));
        };

        Ok(OnConflict { columns, action })
    }

    /// Parses an UPDATE statement.
    pub(super) fn parse_update_statement(
        &mut self,
        with: Option<(WithClause, usize)>,
    ) -> Result<UpdateStatement, ParseError> {
        let (with, start) = self.split_with(with);
        self.expect_keyword(Keyword::Update)?;

        let only = self.eat_keyword(Keyword::Only)?;
        let table = self.parse_object_name("table name")?;
        let alias = self.parse_target_alias()?;

        self.expect_keyword(Keyword::Set)?;
        let assignments = self.parse_assignments()?;

        let from = if self.eat_keyword(Keyword::From)? {
            self.parse_from_list()?
        } else {
            vec![]
        };

        let where_clause = if self.eat_keyword(Keyword::Where)? {
            Some(self.parse_expr()?)
        } else {
            None
        };

        let returning = self.parse_returning()?;

        Ok(UpdateStatement {
            with,
            only,
            table,
            alias,
            assignments,
            from,
            where_clause,
            returning,
            span: self.span_from(start),
        })
    }

    /// Parses a DELETE statement.
    pub(super) fn parse_delete_statement(
        &mut self,
        with: Option<(WithClause, usize)>,
    ) -> Result<DeleteStatement, ParseError> {
        let (with, start) = self.split_with(with);
        self.expect_keyword(Keyword::Delete)?;
        self.expect_keyword(Keyword::From)?;

        let only = self.eat_keyword(Keyword::Only)?;
        let table = self.parse_object_name("table name")?;
        let alias = self.parse_target_alias()?;

        let using = if self.eat_keyword(Keyword::Using)? {
            self.parse_from_list()?
        } else {
            vec![]
        };

        let where_clause = if self.eat_keyword(Keyword::Where)? {
            Some(self.parse_expr()?)
        } else {
            None
        };

        let returning = self.parse_returning()?;

        Ok(DeleteStatement {
            with,
            only,
            table,
            alias,
            using,
            where_clause,
            returning,
            span: self.span_from(start),
        })
    }

    fn split_with(&self, with: Option<(WithClause, usize)>) -> (Option<WithClause>, usize) {
        match with {
            Some((with, start)) => (Some(with), start),
            None => (None, self.current.span.start),
        }
    }

    /// Parses the `[AS] alias` of an UPDATE or DELETE target.
    fn parse_target_alias(&mut self) -> Result<Option<String>, ParseError> {
        if self.eat_keyword(Keyword::As)? || self.at_implicit_alias(true) {
            return Ok(Some(self.parse_identifier("alias")?));
        }
        Ok(None)
    }

    /// Parses `col = expr, ...` of a SET clause, where an item may also be
    /// `(col, ...) = (expr, ...)` or `(col, ...) = (SELECT ...)`.
    fn parse_assignments(&mut self) -> Result<Vec<UpdateAssignment>, ParseError> {
        let mut assignments = vec![];
        loop {
            let start = self.current.span.start;
            let (target, value) = if self.check(&TokenKind::LeftParen) {
                let columns = self.parse_identifier_list()?;
                self.expect(&TokenKind::Eq)?;
                (AssignmentTarget::Columns(columns), self.parse_row_source()?)
            } else {
                let column = self.parse_identifier("column name")?;
                self.expect(&TokenKind::Eq)?;
                (AssignmentTarget::Column(column), self.parse_expr_or_default()?)
            };
            assignments.push(UpdateAssignment {
                target,
                value,
                span: self.span_from(start),
            });
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }
        Ok(assignments)
    }

    /// Parses the value of a multi-column assignment. A parenthesized list
    /// is a row whose items may be `DEFAULT`.
    fn parse_row_source(&mut self) -> Result<Expr, ParseError> {
        let starts_row = self.check(&TokenKind::LeftParen)
            && !matches!(
                self.peek_next()?.as_keyword(),
                Some(Keyword::Select | Keyword::Values | Keyword::With)
            );
        if !starts_row {
            return self.parse_expr();
        }
        let start = self.expect(&TokenKind::LeftParen)?.span.start;
        let mut exprs = vec![];
        loop {
            exprs.push(self.parse_expr_or_default()?);
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }
        self.expect(&TokenKind::RightParen)?;
        Ok(Expr::new(
            ExprKind::Row {
                exprs,
                explicit: false,
            },
            self.span_from(start),
        ))
    }

    fn parse_returning(&mut self) -> Result<Vec<SelectColumn>, ParseError> {
        if self.eat_keyword(Keyword::Returning)? {
            self.parse_target_list()
        } else {
            Ok(vec![])
        }
    }
}
