//! SELECT, VALUES, set operations, WITH and FROM.

use super::error::ParseError;
use super::parser::Parser;
use super::pratt::token_to_binary_op;
use crate::ast::{
    Cte, Distinct, Expr, ExprKind, JoinConstraint, JoinType, Literal, LockStrength, LockWait,
    LockingClause, NullOrdering, OrderBy, OrderDirection, SelectColumn, SelectCore,
    SelectStatement, SetExpr, SetOperator, TableAlias, TableRef, Values, WithClause,
};
use crate::lexer::{Keyword, KeywordCategory, TokenKind};

impl Parser<'_> {
    /// Parses a complete query: `[WITH ...] set_expr [ORDER BY] [LIMIT] [OFFSET] [FETCH]`.
    pub(super) fn parse_query(&mut self) -> Result<SelectStatement, ParseError> {
        self.enter()?;
        let start = self.current.span.start;
        let query = if self.check_keyword(Keyword::With) {
            let with = self.parse_with_clause()?;
            self.parse_query_after_with(with, start)?
        } else {
            self.parse_query_tail(None, start)?
        };
        self.leave();
        Ok(query)
    }

    /// Parses the rest of a query whose WITH clause has been consumed.
    pub(super) fn parse_query_after_with(
        &mut self,
        with: WithClause,
        start: usize,
    ) -> Result<SelectStatement, ParseError> {
        self.parse_query_tail(Some(with), start)
    }

    fn parse_query_tail(
        &mut self,
        with: Option<WithClause>,
        start: usize,
    ) -> Result<SelectStatement, ParseError> {
        let body = self.parse_set_expr()?;

        let order_by = if self.eat_keyword(Keyword::Order)? {
            self.expect_keyword(Keyword::By)?;
            self.parse_order_by_list()?
        } else {
            vec![]
        };

        let mut limit = None;
        let mut offset = None;
        let mut locking = vec![];
        let mut limit_seen = false;
        let mut offset_seen = false;
        loop {
            if !limit_seen && self.check_keyword(Keyword::Limit) {
                self.advance()?;
                limit_seen = true;
                if !self.eat_keyword(Keyword::All)? {
                    limit = Some(self.parse_expr()?);
                }
            } else if !limit_seen && self.check_keyword(Keyword::Fetch) {
                limit_seen = true;
                limit = Some(self.parse_fetch_first()?);
            } else if !offset_seen && self.check_keyword(Keyword::Offset) {
                self.advance()?;
                offset_seen = true;
                offset = Some(self.parse_expr()?);
                if !self.eat_keyword(Keyword::Row)? {
                    self.eat_keyword(Keyword::Rows)?;
                }
            } else if locking.is_empty() && self.check_keyword(Keyword::For) {
                locking = self.parse_locking_clauses()?;
                // LIMIT and OFFSET go either all before or all after the locking clause
                if limit_seen || offset_seen {
                    limit_seen = true;
                    offset_seen = true;
                }
            } else {
                break;
            }
        }

        Ok(SelectStatement {
            with,
            body,
            order_by,
            limit,
            offset,
            locking,
            span: self.span_from(start),
        })
    }

    /// Parses one or more `FOR strength [OF table, ...] [NOWAIT | SKIP LOCKED]`.
    fn parse_locking_clauses(&mut self) -> Result<Vec<LockingClause>, ParseError> {
        let mut clauses = vec![];
        while self.check_keyword(Keyword::For) {
            let start = self.advance()?.span.start;
            let strength = if self.eat_keyword(Keyword::Update)? {
                LockStrength::Update
            } else if self.eat_keyword(Keyword::Share)? {
                LockStrength::Share
            } else if self.eat_keyword(Keyword::No)? {
                self.expect_keyword(Keyword::Key)?;
                self.expect_keyword(Keyword::Update)?;
                LockStrength::NoKeyUpdate
            } else if self.eat_keyword(Keyword::Key)? {
                self.expect_keyword(Keyword::Share)?;
                LockStrength::KeyShare
            } else {
                return Err(self.unexpected("UPDATE, NO KEY UPDATE, SHARE or KEY SHARE"));
            };

            let mut of = vec![];
            if self.eat_keyword(Keyword::Of)? {
                loop {
                    of.push(self.parse_object_name("table name")?);
                    if !self.eat(&TokenKind::Comma)? {
                        break;
                    }
                }
            }

            let wait = if self.eat_keyword(Keyword::Nowait)? {
                Some(LockWait::Nowait)
            } else if self.eat_keyword(Keyword::Skip)? {
                self.expect_keyword(Keyword::Locked)?;
                Some(LockWait::SkipLocked)
            } else {
                None
            };

            clauses.push(LockingClause {
                strength,
                of,
                wait,
                span: self.span_from(start),
            });
        }
        Ok(clauses)
    }

    /// Parses `FETCH {FIRST|NEXT} [count] {ROW|ROWS} ONLY` into a row limit.
    fn parse_fetch_first(&mut self) -> Result<Expr, ParseError> {
        let fetch = self.expect_keyword(Keyword::Fetch)?;
        if !self.eat_keyword(Keyword::First)? && !self.eat_keyword(Keyword::Next)? {
            return Err(self.unexpected("FIRST or NEXT"));
        }
        let count = if self.check_keyword(Keyword::Row) || self.check_keyword(Keyword::Rows) {
            Expr::new(ExprKind::Literal(Literal::Integer(1)), fetch.span)
        } else {
            self.parse_expr()?
        };
        if !self.eat_keyword(Keyword::Row)? && !self.eat_keyword(Keyword::Rows)? {
            return Err(self.unexpected("ROW or ROWS"));
        }
        self.expect_keyword(Keyword::Only)?;
        Ok(count)
    }

    /// Parses `WITH [RECURSIVE] cte [, ...]`.
    pub(super) fn parse_with_clause(&mut self) -> Result<WithClause, ParseError> {
        let start = self.expect_keyword(Keyword::With)?.span.start;
        let recursive = self.eat_keyword(Keyword::Recursive)?;
        let mut ctes = vec![];
        loop {
            ctes.push(self.parse_cte()?);
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }
        Ok(WithClause {
            recursive,
            ctes,
            span: self.span_from(start),
        })
    }

    fn parse_cte(&mut self) -> Result<Cte, ParseError> {
        let start = self.current.span.start;
        let name = self.parse_identifier("common table expression name")?;
        let columns = if self.check(&TokenKind::LeftParen) {
            self.parse_identifier_list()?
        } else {
            vec![]
        };
        self.expect_keyword(Keyword::As)?;
        let materialized = if self.eat_keyword(Keyword::Not)? {
            self.expect_keyword(Keyword::Materialized)?;
            Some(false)
        } else if self.eat_keyword(Keyword::Materialized)? {
            Some(true)
        } else {
            None
        };
        self.expect(&TokenKind::LeftParen)?;
        self.enter()?;
        let statement = self.parse_statement()?;
        self.leave();
        self.expect(&TokenKind::RightParen)?;
        Ok(Cte {
            name,
            columns,
            materialized,
            statement: Box::new(statement),
            span: self.span_from(start),
        })
    }

    /// Parses UNION / EXCEPT chains (left associative).
    fn parse_set_expr(&mut self) -> Result<SetExpr, ParseError> {
        let chain = self.begin_chain();
        let mut left = self.parse_set_term()?;
        loop {
            let op = if self.check_keyword(Keyword::Union) {
                SetOperator::Union
            } else if self.check_keyword(Keyword::Except) {
                SetOperator::Except
            } else {
                break;
            };
            self.advance()?;
            let all = self.parse_set_quantifier()?;
            let left_peak = self.chain_peak();
            let right = self.parse_set_term()?;
            self.wrap_chain(left_peak)?;
            left = Self::set_operation(op, all, left, right);
        }
        self.end_chain(chain);
        Ok(left)
    }

    /// Parses INTERSECT chains, which bind tighter than UNION and EXCEPT.
    fn parse_set_term(&mut self) -> Result<SetExpr, ParseError> {
        let chain = self.begin_chain();
        let mut left = self.parse_set_primary()?;
        while self.eat_keyword(Keyword::Intersect)? {
            let all = self.parse_set_quantifier()?;
            let left_peak = self.chain_peak();
            let right = self.parse_set_primary()?;
            self.wrap_chain(left_peak)?;
            left = Self::set_operation(SetOperator::Intersect, all, left, right);
        }
        self.end_chain(chain);
        Ok(left)
    }

    fn parse_set_quantifier(&mut self) -> Result<bool, ParseError> {
        if self.eat_keyword(Keyword::All)? {
            return Ok(true);
        }
        self.eat_keyword(Keyword::Distinct)?;
        Ok(false)
    }

    fn set_operation(op: SetOperator, all: bool, left: SetExpr, right: SetExpr) -> SetExpr {
        let span = left.span().merge(right.span());
        SetExpr::SetOperation {
            op,
            all,
            left: Box::new(left),
            right: Box::new(right),
            span,
        }
    }

    fn parse_set_primary(&mut self) -> Result<SetExpr, ParseError> {
        match &self.current.kind {
            TokenKind::Keyword(Keyword::Select) => {
                Ok(SetExpr::Select(Box::new(self.parse_select_core()?)))
            }
            TokenKind::Keyword(Keyword::Values) => Ok(SetExpr::Values(self.parse_values()?)),
            TokenKind::LeftParen => {
                self.advance()?;
                let query = self.parse_query()?;
                self.expect(&TokenKind::RightParen)?;
                Ok(SetExpr::Query(Box::new(query)))
            }
            _ => Err(self.unexpected("SELECT, VALUES or \"(\"")),
        }
    }

    /// Parses `VALUES (row) [, (row) ...]`; `DEFAULT` is allowed in rows.
    fn parse_values(&mut self) -> Result<Values, ParseError> {
        let start = self.expect_keyword(Keyword::Values)?.span.start;
        let mut rows = vec![];
        loop {
            self.expect(&TokenKind::LeftParen)?;
            let mut row = vec![];
            loop {
                row.push(self.parse_expr_or_default()?);
                if !self.eat(&TokenKind::Comma)? {
                    break;
                }
            }
            self.expect(&TokenKind::RightParen)?;
            rows.push(row);
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }
        Ok(Values {
            rows,
            span: self.span_from(start),
        })
    }

    /// Parses a single `SELECT` block without ORDER BY / LIMIT.
    fn parse_select_core(&mut self) -> Result<SelectCore, ParseError> {
        let start = self.expect_keyword(Keyword::Select)?.span.start;

        // DISTINCT [ON (...)] or ALL
        let distinct = if self.eat_keyword(Keyword::Distinct)? {
            if self.eat_keyword(Keyword::On)? {
                self.expect(&TokenKind::LeftParen)?;
                let exprs = self.parse_expr_list()?;
                self.expect(&TokenKind::RightParen)?;
                Some(Distinct::On(exprs))
            } else {
                Some(Distinct::Distinct)
            }
        } else {
            self.eat_keyword(Keyword::All)?;
            None
        };

        let columns = self.parse_target_list()?;

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

        let group_by = if self.eat_keyword(Keyword::Group)? {
            self.expect_keyword(Keyword::By)?;
            self.parse_expr_list()?
        } else {
            vec![]
        };

        let having = if self.eat_keyword(Keyword::Having)? {
            Some(self.parse_expr()?)
        } else {
            None
        };

        Ok(SelectCore {
            distinct,
            columns,
            from,
            where_clause,
            group_by,
            having,
            span: self.span_from(start),
        })
    }

    /// Parses a non-empty target list (SELECT columns or RETURNING).
    pub(super) fn parse_target_list(&mut self) -> Result<Vec<SelectColumn>, ParseError> {
        let ends_target_list = matches!(
            &self.current.kind,
            TokenKind::Eof
                | TokenKind::Semicolon
                | TokenKind::RightParen
                | TokenKind::Keyword(
                    Keyword::From
                        | Keyword::Where
                        | Keyword::Group
                        | Keyword::Having
                        | Keyword::Order
                        | Keyword::Limit
                        | Keyword::Offset
                        | Keyword::Fetch
                        | Keyword::Union
                        | Keyword::Intersect
                        | Keyword::Except
                        | Keyword::Into
                )
        );
        if ends_target_list {
            return Err(self.unexpected("target list"));
        }

        let mut columns = vec![];
        loop {
            columns.push(self.parse_select_column()?);
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }
        Ok(columns)
    }

    fn parse_select_column(&mut self) -> Result<SelectColumn, ParseError> {
        let start = self.current.span.start;
        // A bare `*` takes no alias
        if self.check(&TokenKind::Star) {
            let star = self.advance()?;
            return Ok(SelectColumn {
                expr: Expr::new(ExprKind::Wildcard { table: None }, star.span),
                alias: None,
                span: star.span,
            });
        }
        let expr = self.parse_expr()?;

        // AS label, or a bare identifier
        let alias = if self.eat_keyword(Keyword::As)? {
            Some(self.parse_label("column label")?)
        } else if self.at_implicit_alias(false) {
            Some(self.parse_identifier("column label")?)
        } else {
            None
        };

        Ok(SelectColumn {
            expr,
            alias,
            span: self.span_from(start),
        })
    }

    /// Returns true if the current token can be an alias written without `AS`.
    pub(super) fn at_implicit_alias(&self, table_alias: bool) -> bool {
        match &self.current.kind {
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) => true,
            TokenKind::Keyword(Keyword::Set) => !table_alias,
            TokenKind::Keyword(kw) => kw.category() == KeywordCategory::Unreserved,
            _ => false,
        }
    }

    /// Parses `[AS] alias [(col, ...)]` after a FROM item.
    fn parse_table_alias(&mut self) -> Result<Option<TableAlias>, ParseError> {
        let name = if self.eat_keyword(Keyword::As)? {
            self.parse_identifier("alias")?
        } else if self.at_implicit_alias(true) {
            self.parse_identifier("alias")?
        } else {
            return Ok(None);
        };
        let columns = if self.check(&TokenKind::LeftParen) {
            self.parse_identifier_list()?
        } else {
            vec![]
        };
        Ok(Some(TableAlias { name, columns }))
    }

    /// Parses a comma-separated FROM list.
    pub(super) fn parse_from_list(&mut self) -> Result<Vec<TableRef>, ParseError> {
        let mut tables = vec![];
        loop {
            tables.push(self.parse_table_ref()?);
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }
        Ok(tables)
    }

    /// Parses a FROM item followed by any number of joins.
    fn parse_table_ref(&mut self) -> Result<TableRef, ParseError> {
        let chain = self.begin_chain();
        let mut table_ref = self.parse_table_primary()?;

        loop {
            let natural = self.eat_keyword(Keyword::Natural)?;
            let Some(join_type) = self.parse_join_type()? else {
                if natural {
                    return Err(self.unexpected("JOIN"));
                }
                break;
            };
            let left_peak = self.chain_peak();
            let right = self.parse_table_primary()?;

            let constraint = if natural || join_type == JoinType::Cross {
                JoinConstraint::None
            } else if self.eat_keyword(Keyword::On)? {
                JoinConstraint::On(self.parse_expr()?)
            } else if self.eat_keyword(Keyword::Using)? {
                JoinConstraint::Using(self.parse_identifier_list()?)
            } else {
                return Err(self.unexpected("ON or USING"));
            };
            self.wrap_chain(left_peak)?;

            let span = table_ref.span().merge(self.span_from(right.span().start));
            table_ref = TableRef::Join {
                left: Box::new(table_ref),
                join_type,
                natural,
                right: Box::new(right),
                constraint,
                span,
            };
        }

        self.end_chain(chain);
        Ok(table_ref)
    }

    /// Parses a join type, or returns `None` if no join follows.
    fn parse_join_type(&mut self) -> Result<Option<JoinType>, ParseError> {
        let join_type = match &self.current.kind {
            TokenKind::Keyword(Keyword::Join) => {
                self.advance()?;
                return Ok(Some(JoinType::Inner));
            }
            TokenKind::Keyword(Keyword::Inner) => JoinType::Inner,
            TokenKind::Keyword(Keyword::Left) => JoinType::Left,
            TokenKind::Keyword(Keyword::Right) => JoinType::Right,
            TokenKind::Keyword(Keyword::Full) => JoinType::Full,
            TokenKind::Keyword(Keyword::Cross) => JoinType::Cross,
            _ => return Ok(None),
        };
        self.advance()?;
        if matches!(join_type, JoinType::Left | JoinType::Right | JoinType::Full) {
            self.eat_keyword(Keyword::Outer)?;
        }
        self.expect_keyword(Keyword::Join)?;
        Ok(Some(join_type))
    }

    /// Parses a table, function, subquery or parenthesized join.
    fn parse_table_primary(&mut self) -> Result<TableRef, ParseError> {
        let start = self.current.span.start;
        if self.eat_keyword(Keyword::Only)? {
            let name = self.parse_object_name("table name")?;
            let alias = self.parse_table_alias()?;
            return Ok(TableRef::Table {
                only: true,
                name,
                alias,
                span: self.span_from(start),
            });
        }
        let lateral = self.eat_keyword(Keyword::Lateral)?;

        if self.check(&TokenKind::LeftParen) {
            let starts_query = matches!(
                self.peek_next()?.kind,
                TokenKind::Keyword(Keyword::Select | Keyword::Values | Keyword::With)
                    | TokenKind::LeftParen
            );
            if starts_query {
                self.advance()?;
                let query = self.parse_query()?;
                self.expect(&TokenKind::RightParen)?;
                let alias = self.parse_table_alias()?;
                return Ok(TableRef::Subquery {
                    lateral,
                    query: Box::new(query),
                    alias,
                    span: self.span_from(start),
                });
            }
            if lateral {
                return Err(self.unexpected("subquery"));
            }
            self.advance()?;
            self.enter()?;
            let inner = self.parse_table_ref()?;
            self.leave();
            self.expect(&TokenKind::RightParen)?;
            return Ok(inner);
        }

        let name = self.parse_object_name("table name")?;
        if self.check(&TokenKind::LeftParen) {
            let call = self.parse_function_call(name, start)?;
            let alias = self.parse_table_alias()?;
            return Ok(TableRef::Function {
                lateral,
                call,
                alias,
                span: self.span_from(start),
            });
        }
        if lateral {
            return Err(self.unexpected("\"(\""));
        }
        let alias = self.parse_table_alias()?;
        Ok(TableRef::Table {
            only: false,
            name,
            alias,
            span: self.span_from(start),
        })
    }

    /// Parses a comma-separated ORDER BY list.
    pub(super) fn parse_order_by_list(&mut self) -> Result<Vec<OrderBy>, ParseError> {
        let mut items = vec![];
        loop {
            let start = self.current.span.start;
            let expr = self.parse_expr()?;

            let mut using = None;
            let direction = if self.eat_keyword(Keyword::Asc)? {
                Some(OrderDirection::Asc)
            } else if self.eat_keyword(Keyword::Desc)? {
                Some(OrderDirection::Desc)
            } else {
                if self.eat_keyword(Keyword::Using)? {
                    using = Some(self.parse_sort_operator()?);
                }
                None
            };

            let nulls = if self.eat_keyword(Keyword::Nulls)? {
                if self.eat_keyword(Keyword::First)? {
                    Some(NullOrdering::First)
                } else {
                    self.expect_keyword(Keyword::Last)?;
                    Some(NullOrdering::Last)
                }
            } else {
                None
            };

            items.push(OrderBy {
                expr,
                direction,
                using,
                nulls,
                span: self.span_from(start),
            });

            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }
        Ok(items)
    }

    /// Parses the operator after `ORDER BY expr USING`.
    fn parse_sort_operator(&mut self) -> Result<String, ParseError> {
        let op = match &self.current.kind {
            TokenKind::Keyword(_) => None,
            kind => token_to_binary_op(kind),
        };
        let Some(op) = op else {
            return Err(self.unexpected("operator"));
        };
        self.advance()?;
        Ok(op.as_str().to_string())
    }
}
