//! Expression parsing (Pratt loop, prefix forms, primaries).

use super::error::ParseError;
use super::parser::Parser;
use super::pratt::{infix_precedence, is_non_associative, token_to_binary_op, token_to_unary_op};
use crate::ast::{
    precedence, CastStyle, DataType, Expr, ExprKind, FrameBound, FrameUnits, FunctionCall,
    Literal, ObjectName, Quantifier, Subscript, TruthValue, UnaryOp, ValueFunction, WhenClause,
    WindowFrame, WindowSpec,
};
use crate::lexer::{Keyword, KeywordCategory, TokenKind};

impl Parser<'_> {
    /// Parses a full expression.
    pub(super) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_subexpr(0)
    }

    /// Parses an expression, also accepting a bare `DEFAULT`.
    pub(super) fn parse_expr_or_default(&mut self) -> Result<Expr, ParseError> {
        if self.check_keyword(Keyword::Default) {
            let token = self.advance()?;
            return Ok(Expr::new(ExprKind::Default, token.span));
        }
        self.parse_expr()
    }

    /// Parses a comma-separated list of expressions.
    pub(super) fn parse_expr_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut exprs = vec![];
        loop {
            exprs.push(self.parse_expr()?);
            if !self.eat(&TokenKind::Comma)? {
                break;
            }
        }
        Ok(exprs)
    }

    /// Parses an expression whose operators all bind tighter than `min_prec`.
    fn parse_subexpr(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        self.enter()?;
        let result = self.parse_subexpr_inner(min_prec);
        self.leave();
        result
    }

    fn parse_subexpr_inner(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        let chain = self.begin_chain();
        let mut lhs = self.parse_prefix()?;
        let mut last_non_assoc = None;

        loop {
            let Some(prec) = infix_precedence(&self.current.kind) else {
                break;
            };
            if prec <= min_prec {
                break;
            }
            if self.check_keyword(Keyword::Not) && !self.at_negated_predicate()? {
                break;
            }
            // a < b < c
            if last_non_assoc == Some(prec) {
                return Err(self.unexpected("end of expression"));
            }
            last_non_assoc = is_non_associative(prec).then_some(prec);
            let left_peak = self.chain_peak();
            lhs = self.parse_infix(lhs, prec)?;
            self.wrap_chain(left_peak)?;
        }

        self.end_chain(chain);
        Ok(lhs)
    }

    /// Returns true at `NOT` followed by `LIKE`, `ILIKE`, `IN` or `BETWEEN`.
    fn at_negated_predicate(&mut self) -> Result<bool, ParseError> {
        Ok(matches!(
            self.peek_next()?.as_keyword(),
            Some(Keyword::Like | Keyword::Ilike | Keyword::In | Keyword::Between)
        ))
    }

    /// Parses one infix or postfix operator applied to `lhs`.
    fn parse_infix(&mut self, lhs: Expr, prec: u8) -> Result<Expr, ParseError> {
        let start = lhs.span.start;
        let kind = match &self.current.kind {
            TokenKind::Keyword(Keyword::Is) => return self.parse_is(lhs),
            TokenKind::Keyword(Keyword::Isnull | Keyword::Notnull) => {
                let token = self.advance()?;
                ExprKind::IsNull {
                    expr: Box::new(lhs),
                    negated: token.as_keyword() == Some(Keyword::Notnull),
                }
            }
            TokenKind::Keyword(Keyword::Not) => {
                self.advance()?;
                return self.parse_predicate(lhs, true);
            }
            TokenKind::Keyword(Keyword::Between | Keyword::In | Keyword::Like | Keyword::Ilike) => {
                return self.parse_predicate(lhs, false);
            }
            TokenKind::LeftBracket => {
                self.advance()?;
                let subscript = self.parse_subscript()?;
                ExprKind::Subscript {
                    expr: Box::new(lhs),
                    subscript,
                }
            }
            TokenKind::DoubleColon => {
                self.advance()?;
                let data_type = self.parse_data_type()?;
                ExprKind::Cast {
                    expr: Box::new(lhs),
                    data_type,
                    style: CastStyle::DoubleColon,
                }
            }
            TokenKind::Keyword(Keyword::Collate) => {
                self.advance()?;
                let collation = self.parse_object_name("collation name")?;
                ExprKind::Collate {
                    expr: Box::new(lhs),
                    collation,
                }
            }
            TokenKind::Dot => {
                self.advance()?;
                let field = self.parse_label("field name")?;
                ExprKind::FieldAccess {
                    expr: Box::new(lhs),
                    field,
                }
            }
            kind => {
                let Some(op) = token_to_binary_op(kind) else {
                    return Err(self.syntax_error());
                };
                self.advance()?;
                if op.is_comparison() {
                    if let Some(quantifier) = self.parse_quantifier()? {
                        let right = self.parse_quantified_operand()?;
                        return Ok(Expr::new(
                            ExprKind::Quantified {
                                left: Box::new(lhs),
                                op,
                                quantifier,
                                right: Box::new(right),
                            },
                            self.span_from(start),
                        ));
                    }
                }
                let right = self.parse_subexpr(prec)?;
                ExprKind::Binary {
                    left: Box::new(lhs),
                    op,
                    right: Box::new(right),
                }
            }
        };
        Ok(Expr::new(kind, self.span_from(start)))
    }

    /// Parses `ANY`, `SOME` or `ALL` when an opening parenthesis follows.
    fn parse_quantifier(&mut self) -> Result<Option<Quantifier>, ParseError> {
        let quantifier = match self.current.as_keyword() {
            Some(Keyword::Any) => Quantifier::Any,
            Some(Keyword::Some) => Quantifier::Some,
            Some(Keyword::All) => Quantifier::All,
            _ => return Ok(None),
        };
        if !matches!(self.peek_next()?.kind, TokenKind::LeftParen) {
            return Ok(None);
        }
        self.advance()?;
        Ok(Some(quantifier))
    }

    /// Parses the parenthesized right side of `op ANY (...)`.
    fn parse_quantified_operand(&mut self) -> Result<Expr, ParseError> {
        let open = self.expect(&TokenKind::LeftParen)?;
        if self.at_query_start() {
            let query = self.parse_query()?;
            self.expect(&TokenKind::RightParen)?;
            return Ok(Expr::new(
                ExprKind::Subquery(Box::new(query)),
                self.span_from(open.span.start),
            ));
        }
        let expr = self.parse_expr()?;
        self.expect(&TokenKind::RightParen)?;
        Ok(expr)
    }

    /// Returns true if the current token starts a query inside parentheses.
    fn at_query_start(&self) -> bool {
        matches!(
            self.current.as_keyword(),
            Some(Keyword::Select | Keyword::Values | Keyword::With)
        )
    }

    /// Parses `IS [NOT] {NULL | TRUE | FALSE | UNKNOWN | DISTINCT FROM expr}`.
    fn parse_is(&mut self, lhs: Expr) -> Result<Expr, ParseError> {
        let start = lhs.span.start;
        self.expect_keyword(Keyword::Is)?;
        let negated = self.eat_keyword(Keyword::Not)?;
        let value = match self.current.as_keyword() {
            Some(Keyword::Null) => None,
            Some(Keyword::True) => Some(TruthValue::True),
            Some(Keyword::False) => Some(TruthValue::False),
            Some(Keyword::Unknown) => Some(TruthValue::Unknown),
            Some(Keyword::Distinct) => {
                self.advance()?;
                self.expect_keyword(Keyword::From)?;
                let right = self.parse_subexpr(precedence::IS)?;
                return Ok(Expr::new(
                    ExprKind::IsDistinctFrom {
                        left: Box::new(lhs),
                        right: Box::new(right),
                        negated,
                    },
                    self.span_from(start),
                ));
            }
            _ => return Err(self.unexpected("NULL, TRUE, FALSE, UNKNOWN or DISTINCT FROM")),
        };
        self.advance()?;
        let kind = match value {
            None => ExprKind::IsNull {
                expr: Box::new(lhs),
                negated,
            },
            Some(value) => ExprKind::IsTruth {
                expr: Box::new(lhs),
                value,
                negated,
            },
        };
        Ok(Expr::new(kind, self.span_from(start)))
    }

    /// Parses `BETWEEN`, `IN`, `LIKE` or `ILIKE` after an optional `NOT`.
    fn parse_predicate(&mut self, lhs: Expr, negated: bool) -> Result<Expr, ParseError> {
        let start = lhs.span.start;
        let Some(
            keyword @ (Keyword::Between | Keyword::In | Keyword::Like | Keyword::Ilike),
        ) = self.current.as_keyword()
        else {
            return Err(self.syntax_error());
        };
        self.advance()?;
        let kind = match keyword {
            Keyword::Between => {
                let symmetric = self.eat_keyword(Keyword::Symmetric)?;
                if !symmetric {
                    self.eat_keyword(Keyword::Asymmetric)?;
                }
                let low = self.parse_subexpr(precedence::PREDICATE)?;
                self.expect_keyword(Keyword::And)?;
                let high = self.parse_subexpr(precedence::PREDICATE)?;
                ExprKind::Between {
                    expr: Box::new(lhs),
                    low: Box::new(low),
                    high: Box::new(high),
                    negated,
                    symmetric,
                }
            }
            Keyword::In => {
                self.expect(&TokenKind::LeftParen)?;
                let kind = if self.at_query_start() {
                    ExprKind::InSubquery {
                        expr: Box::new(lhs),
                        subquery: Box::new(self.parse_query()?),
                        negated,
                    }
                } else {
                    ExprKind::InList {
                        expr: Box::new(lhs),
                        list: self.parse_expr_list()?,
                        negated,
                    }
                };
                self.expect(&TokenKind::RightParen)?;
                kind
            }
            _ => {
                let pattern = self.parse_subexpr(precedence::PREDICATE)?;
                let escape = if self.eat_keyword(Keyword::Escape)? {
                    Some(Box::new(self.parse_subexpr(precedence::PREDICATE)?))
                } else {
                    None
                };
                ExprKind::Like {
                    expr: Box::new(lhs),
                    pattern: Box::new(pattern),
                    escape,
                    negated,
                    case_insensitive: keyword == Keyword::Ilike,
                }
            }
        };
        Ok(Expr::new(kind, self.span_from(start)))
    }

    /// Parses the inside of `[...]` after the opening bracket.
    fn parse_subscript(&mut self) -> Result<Subscript, ParseError> {
        let lower = if self.check(&TokenKind::Colon) {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };
        let subscript = if self.eat(&TokenKind::Colon)? {
            let upper = if self.check(&TokenKind::RightBracket) {
                None
            } else {
                Some(Box::new(self.parse_expr()?))
            };
            Subscript::Slice { lower, upper }
        } else {
            match lower {
                Some(index) => Subscript::Index(index),
                None => return Err(self.unexpected("\":\"")),
            }
        };
        self.expect(&TokenKind::RightBracket)?;
        Ok(subscript)
    }

    /// Parses a prefix operator application or a primary expression.
    fn parse_prefix(&mut self) -> Result<Expr, ParseError> {
        let Some(op) = token_to_unary_op(&self.current.kind) else {
            return self.parse_primary();
        };
        let start = self.advance()?.span.start;
        let operand = self.parse_subexpr(op.precedence())?;
        let span = self.span_from(start);

        // -5 is a negative literal, not an operator applied to 5
        if op == UnaryOp::Minus {
            if let ExprKind::Literal(literal) = &operand.kind {
                let negated = match literal {
                    Literal::Integer(n) if *n >= 0 => Some(Literal::Integer(-n)),
                    Literal::Numeric(text) if !literal.is_negative() => {
                        Some(Literal::Numeric(format!("-{text}")))
                    }
                    _ => None,
                };
                if let Some(literal) = negated {
                    return Ok(Expr::new(ExprKind::Literal(literal), span));
                }
            }
        }

        Ok(Expr::new(
            ExprKind::Unary {
                op,
                expr: Box::new(operand),
            },
            span,
        ))
    }

    /// Parses a primary expression.
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        if let Some(func) = self.current.as_keyword().and_then(value_function) {
            let token = self.advance()?;
            return Ok(Expr::new(ExprKind::ValueFunction(func), token.span));
        }

        let start = self.current.span.start;
        let kind = match &self.current.kind {
            TokenKind::Integer(n) => ExprKind::Literal(Literal::Integer(*n)),
            TokenKind::Numeric(text) => ExprKind::Literal(Literal::Numeric(text.clone())),
            TokenKind::String(s) => ExprKind::Literal(Literal::String(s.clone())),
            TokenKind::BitString(bits) => ExprKind::Literal(Literal::BitString(bits.clone())),
            TokenKind::Param(n) => ExprKind::Param(*n),
            TokenKind::Keyword(Keyword::True) => ExprKind::Literal(Literal::Boolean(true)),
            TokenKind::Keyword(Keyword::False) => ExprKind::Literal(Literal::Boolean(false)),
            TokenKind::Keyword(Keyword::Null) => ExprKind::Literal(Literal::Null),
            TokenKind::LeftParen => return self.parse_paren_expr(),
            TokenKind::Keyword(Keyword::Case) => return self.parse_case(),
            TokenKind::Keyword(Keyword::Cast) => return self.parse_cast(),
            TokenKind::Keyword(Keyword::Exists) => {
                self.advance()?;
                self.expect(&TokenKind::LeftParen)?;
                let query = self.parse_query()?;
                self.expect(&TokenKind::RightParen)?;
                return Ok(Expr::new(
                    ExprKind::Exists(Box::new(query)),
                    self.span_from(start),
                ));
            }
            TokenKind::Keyword(Keyword::Array) => return self.parse_array(),
            TokenKind::Keyword(Keyword::Row) => {
                self.advance()?;
                self.expect(&TokenKind::LeftParen)?;
                let exprs = if self.check(&TokenKind::RightParen) {
                    vec![]
                } else {
                    self.parse_expr_list()?
                };
                self.expect(&TokenKind::RightParen)?;
                return Ok(Expr::new(
                    ExprKind::Row {
                        exprs,
                        explicit: true,
                    },
                    self.span_from(start),
                ));
            }
            TokenKind::Identifier(_) | TokenKind::QuotedIdentifier(_) => {
                return self.parse_name_expr();
            }
            TokenKind::Keyword(kw) => {
                let kw = *kw;
                if is_type_keyword(kw)
                    || (kw == Keyword::Double && self.peek_keyword(Keyword::Precision)?)
                {
                    return self.parse_typed_literal_or_column();
                }
                return match kw.category() {
                    KeywordCategory::Unreserved => self.parse_name_expr(),
                    KeywordCategory::TypeFuncName
                        if matches!(self.peek_next()?.kind, TokenKind::LeftParen) =>
                    {
                        self.parse_name_expr()
                    }
                    _ => Err(self.unexpected("expression")),
                };
            }
            _ => return Err(self.unexpected("expression")),
        };
        self.advance()?;
        Ok(Expr::new(kind, self.span_from(start)))
    }

    /// Parses `(expr)`, a row `(a, b)` or a scalar subquery `(SELECT ...)`.
    fn parse_paren_expr(&mut self) -> Result<Expr, ParseError> {
        let start = self.expect(&TokenKind::LeftParen)?.span.start;

        if self.at_query_start() {
            let query = self.parse_query()?;
            self.expect(&TokenKind::RightParen)?;
            return Ok(Expr::new(
                ExprKind::Subquery(Box::new(query)),
                self.span_from(start),
            ));
        }

        let first = self.parse_expr()?;
        if self.eat(&TokenKind::Comma)? {
            let mut exprs = vec![first];
            exprs.extend(self.parse_expr_list()?);
            self.expect(&TokenKind::RightParen)?;
            return Ok(Expr::new(
                ExprKind::Row {
                    exprs,
                    explicit: false,
                },
                self.span_from(start),
            ));
        }

        self.expect(&TokenKind::RightParen)?;
        Ok(Expr::new(
            ExprKind::Nested(Box::new(first)),
            self.span_from(start),
        ))
    }

    /// Parses `CASE [operand] WHEN ... THEN ... [ELSE ...] END`.
    fn parse_case(&mut self) -> Result<Expr, ParseError> {
        let start = self.expect_keyword(Keyword::Case)?.span.start;

        // Simple CASE (CASE expr WHEN ...)
        let operand = if self.check_keyword(Keyword::When) {
            None
        } else {
            Some(Box::new(self.parse_expr()?))
        };

        let mut when_clauses = vec![];
        while self.eat_keyword(Keyword::When)? {
            let condition = self.parse_expr()?;
            self.expect_keyword(Keyword::Then)?;
            let result = self.parse_expr()?;
            when_clauses.push(WhenClause { condition, result });
        }
        if when_clauses.is_empty() {
            return Err(self.unexpected("WHEN"));
        }

        let else_result = if self.eat_keyword(Keyword::Else)? {
            Some(Box::new(self.parse_expr()?))
        } else {
            None
        };

        self.expect_keyword(Keyword::End)?;

        Ok(Expr::new(
            ExprKind::Case {
                operand,
                when_clauses,
                else_result,
            },
            self.span_from(start),
        ))
    }

    /// Parses `CAST(expr AS type)`.
    fn parse_cast(&mut self) -> Result<Expr, ParseError> {
        let start = self.expect_keyword(Keyword::Cast)?.span.start;
        self.expect(&TokenKind::LeftParen)?;
        let expr = self.parse_expr()?;
        self.expect_keyword(Keyword::As)?;
        let data_type = self.parse_data_type()?;
        self.expect(&TokenKind::RightParen)?;

        Ok(Expr::new(
            ExprKind::Cast {
                expr: Box::new(expr),
                data_type,
                style: CastStyle::Function,
            },
            self.span_from(start),
        ))
    }

    /// Parses `ARRAY[...]` or `ARRAY(subquery)`.
    fn parse_array(&mut self) -> Result<Expr, ParseError> {
        let start = self.expect_keyword(Keyword::Array)?.span.start;
        match &self.current.kind {
            TokenKind::LeftBracket => self.parse_array_elements(start),
            TokenKind::LeftParen => {
                self.advance()?;
                let query = self.parse_query()?;
                self.expect(&TokenKind::RightParen)?;
                Ok(Expr::new(
                    ExprKind::ArraySubquery(Box::new(query)),
                    self.span_from(start),
                ))
            }
            _ => Err(self.unexpected("\"[\" or \"(\"")),
        }
    }

    /// Parses `[elem, ...]`; bare nested brackets are sub-arrays.
    fn parse_array_elements(&mut self, start: usize) -> Result<Expr, ParseError> {
        self.expect(&TokenKind::LeftBracket)?;
        self.enter()?;
        let mut elements = vec![];
        if !self.check(&TokenKind::RightBracket) {
            loop {
                let element = if self.check(&TokenKind::LeftBracket) {
                    let nested_start = self.current.span.start;
                    self.parse_array_elements(nested_start)?
                } else {
                    self.parse_expr()?
                };
                elements.push(element);
                if !self.eat(&TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.leave();
        self.expect(&TokenKind::RightBracket)?;
        Ok(Expr::new(ExprKind::Array(elements), self.span_from(start)))
    }

    /// Parses a type keyword that starts either a typed literal
    /// (`DATE '2024-01-01'`, `INTERVAL '1 day'`) or, alone, a column name.
    fn parse_typed_literal_or_column(&mut self) -> Result<Expr, ParseError> {
        let first = self.current.clone();
        let mut data_type = self.parse_data_type()?;

        if let TokenKind::String(value) = &self.current.kind {
            let literal = Expr::new(
                ExprKind::Literal(Literal::String(value.clone())),
                self.current.span,
            );
            self.advance()?;
            // INTERVAL '1' DAY
            if data_type == DataType::Interval(None) {
                data_type = DataType::Interval(self.parse_interval_fields()?);
            }
            return Ok(Expr::new(
                ExprKind::Cast {
                    expr: Box::new(literal),
                    data_type,
                    style: CastStyle::Prefix,
                },
                self.span_from(first.span.start),
            ));
        }

        match first.as_keyword() {
            Some(kw) if self.previous.span == first.span && kw.is_col_id() => Ok(Expr::new(
                ExprKind::Column(ObjectName::new(kw.as_str().to_ascii_lowercase())),
                first.span,
            )),
            _ => Err(self.unexpected("string literal")),
        }
    }

    /// Parses a column reference, qualified wildcard, function call or
    /// generic typed literal (`mood 'happy'`) starting with a name.
    fn parse_name_expr(&mut self) -> Result<Expr, ParseError> {
        let start = self.current.span.start;
        let mut parts = vec![self.parse_label("column name")?];

        while self.check(&TokenKind::Dot) {
            if matches!(self.peek_next()?.kind, TokenKind::Star) {
                self.advance()?;
                self.advance()?;
                return Ok(Expr::new(
                    ExprKind::Wildcard {
                        table: Some(ObjectName(parts)),
                    },
                    self.span_from(start),
                ));
            }
            self.advance()?;
            parts.push(self.parse_label("column name")?);
        }
        let name = ObjectName(parts);

        if self.check(&TokenKind::LeftParen) {
            let call = self.parse_function_call(name, start)?;
            return Ok(Expr::new(ExprKind::Function(call), self.span_from(start)));
        }

        if let TokenKind::String(value) = &self.current.kind {
            let literal = Expr::new(
                ExprKind::Literal(Literal::String(value.clone())),
                self.current.span,
            );
            self.advance()?;
            let data_type = match name.0.as_slice() {
                [single] => DataType::from_type_name(single),
                _ => None,
            }
            .unwrap_or(DataType::Custom(name));
            return Ok(Expr::new(
                ExprKind::Cast {
                    expr: Box::new(literal),
                    data_type,
                    style: CastStyle::Prefix,
                },
                self.span_from(start),
            ));
        }

        Ok(Expr::new(ExprKind::Column(name), self.span_from(start)))
    }

    /// Parses a call's argument list and any FILTER / OVER clauses.
    pub(super) fn parse_function_call(
        &mut self,
        name: ObjectName,
        start: usize,
    ) -> Result<FunctionCall, ParseError> {
        self.expect(&TokenKind::LeftParen)?;
        self.enter()?;
        let mut call = FunctionCall {
            name,
            args: vec![],
            distinct: false,
            star: false,
            variadic: false,
            order_by: vec![],
            filter: None,
            over: None,
        };

        if self.eat(&TokenKind::Star)? {
            call.star = true;
        } else if !self.check(&TokenKind::RightParen) {
            call.distinct = self.eat_keyword(Keyword::Distinct)?;
            if !call.distinct {
                self.eat_keyword(Keyword::All)?;
            }
            (call.args, call.variadic) = self.parse_call_args()?;
            if self.eat_keyword(Keyword::Order)? {
                self.expect_keyword(Keyword::By)?;
                call.order_by = self.parse_order_by_list()?;
            }
        }
        self.leave();
        self.expect(&TokenKind::RightParen)?;

        if self.check_keyword(Keyword::Filter)
            && matches!(self.peek_next()?.kind, TokenKind::LeftParen)
        {
            self.advance()?;
            self.advance()?;
            self.expect_keyword(Keyword::Where)?;
            call.filter = Some(Box::new(self.parse_expr()?));
            self.expect(&TokenKind::RightParen)?;
        }

        if self.check_keyword(Keyword::Over) && matches!(self.peek_next()?.kind, TokenKind::LeftParen)
        {
            self.advance()?;
            call.over = Some(self.parse_window_spec()?);
        }

        tracing::trace!(function = %call.name, start, "parsed function call");
        Ok(call)
    }

    /// Parses call arguments; only the last one may be marked `VARIADIC`.
    fn parse_call_args(&mut self) -> Result<(Vec<Expr>, bool), ParseError> {
        let mut args = vec![];
        loop {
            if self.eat_keyword(Keyword::Variadic)? {
                args.push(self.parse_expr()?);
                return Ok((args, true));
            }
            args.push(self.parse_expr()?);
            if !self.eat(&TokenKind::Comma)? {
                return Ok((args, false));
            }
        }
    }

    /// Parses `(PARTITION BY ... ORDER BY ... frame)`.
    fn parse_window_spec(&mut self) -> Result<WindowSpec, ParseError> {
        self.expect(&TokenKind::LeftParen)?;

        let partition_by = if self.eat_keyword(Keyword::Partition)? {
            self.expect_keyword(Keyword::By)?;
            self.parse_expr_list()?
        } else {
            vec![]
        };

        let order_by = if self.eat_keyword(Keyword::Order)? {
            self.expect_keyword(Keyword::By)?;
            self.parse_order_by_list()?
        } else {
            vec![]
        };

        let units = if self.eat_keyword(Keyword::Rows)? {
            Some(FrameUnits::Rows)
        } else if self.eat_keyword(Keyword::Range)? {
            Some(FrameUnits::Range)
        } else {
            None
        };
        let frame = match units {
            Some(units) => {
                if self.eat_keyword(Keyword::Between)? {
                    let start = self.parse_frame_bound()?;
                    self.expect_keyword(Keyword::And)?;
                    let end = self.parse_frame_bound()?;
                    Some(WindowFrame {
                        units,
                        start,
                        end: Some(end),
                    })
                } else {
                    Some(WindowFrame {
                        units,
                        start: self.parse_frame_bound()?,
                        end: None,
                    })
                }
            }
            None => None,
        };

        self.expect(&TokenKind::RightParen)?;
        Ok(WindowSpec {
            partition_by,
            order_by,
            frame,
        })
    }

    fn parse_frame_bound(&mut self) -> Result<FrameBound, ParseError> {
        if self.eat_keyword(Keyword::Unbounded)? {
            if self.eat_keyword(Keyword::Preceding)? {
                return Ok(FrameBound::UnboundedPreceding);
            }
            self.expect_keyword(Keyword::Following)?;
            return Ok(FrameBound::UnboundedFollowing);
        }
        if self.check_keyword(Keyword::Current) && self.peek_keyword(Keyword::Row)? {
            self.advance()?;
            self.advance()?;
            return Ok(FrameBound::CurrentRow);
        }
        let offset = Box::new(self.parse_subexpr(precedence::AND)?);
        if self.eat_keyword(Keyword::Preceding)? {
            Ok(FrameBound::Preceding(offset))
        } else if self.eat_keyword(Keyword::Following)? {
            Ok(FrameBound::Following(offset))
        } else {
            Err(self.unexpected("PRECEDING or FOLLOWING"))
        }
    }
}

/// Maps the SQL value-function keywords.
const fn value_function(kw: Keyword) -> Option<ValueFunction> {
    match kw {
        Keyword::CurrentDate => Some(ValueFunction::CurrentDate),
        Keyword::CurrentTime => Some(ValueFunction::CurrentTime),
        Keyword::CurrentTimestamp => Some(ValueFunction::CurrentTimestamp),
        Keyword::Localtime => Some(ValueFunction::LocalTime),
        Keyword::Localtimestamp => Some(ValueFunction::LocalTimestamp),
        Keyword::CurrentUser => Some(ValueFunction::CurrentUser),
        Keyword::CurrentRole => Some(ValueFunction::CurrentRole),
        Keyword::SessionUser => Some(ValueFunction::SessionUser),
        Keyword::User => Some(ValueFunction::User),
        _ => None,
    }
}

/// Keywords that begin a built-in type name.
const fn is_type_keyword(kw: Keyword) -> bool {
    matches!(
        kw,
        Keyword::Smallint
            | Keyword::Int
            | Keyword::Integer
            | Keyword::Bigint
            | Keyword::Bit
            | Keyword::Real
            | Keyword::Float
            | Keyword::Decimal
            | Keyword::Numeric
            | Keyword::Char
            | Keyword::Character
            | Keyword::Varchar
            | Keyword::Boolean
            | Keyword::Time
            | Keyword::Timestamp
            | Keyword::Interval
    )
}
