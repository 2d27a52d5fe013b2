//! Canonical SQL printing via `fmt::Display` for AST nodes.
//!
//! Keywords are upper case, list items are separated by `, `, identifiers are
//! quoted only when they would not read back unchanged, and parentheses are
//! emitted only where precedence requires them. The output parses back to an
//! equivalent tree.

use std::fmt;

use super::expression::{precedence, prints_as_prefix_cast};
#[allow(clippy::wildcard_imports)]
use super::*;
use crate::dialect::{has_special_chars, Dialect, PostgresDialect};
use crate::lexer::{Keyword, KeywordCategory};

fn comma_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn comma_list_fn<T>(
    f: &mut fmt::Formatter<'_>,
    items: &[T],
    fmt_item: impl Fn(&T, &mut fmt::Formatter<'_>) -> fmt::Result,
) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        fmt_item(item, f)?;
    }
    Ok(())
}

fn write_quoted(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    write!(f, "\"{}\"", name.replace('"', "\"\""))
}

/// Writes an identifier, quoting it when required.
pub(crate) fn write_ident(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    if PostgresDialect.needs_quoting(name) {
        write_quoted(f, name)
    } else {
        f.write_str(name)
    }
}

/// Writes a column label after `AS`, where any keyword is accepted.
fn write_label(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    if has_special_chars(name) {
        write_quoted(f, name)
    } else {
        f.write_str(name)
    }
}

fn write_ident_list(f: &mut fmt::Formatter<'_>, names: &[String]) -> fmt::Result {
    comma_list_fn(f, names, |name, f| write_ident(f, name))
}

/// Writes a function name; type/function-name keywords such as `left` stay bare.
fn write_function_name(f: &mut fmt::Formatter<'_>, name: &ObjectName) -> fmt::Result {
    match name.0.as_slice() {
        [single] => {
            let bare_keyword = Keyword::lookup(single).is_some_and(|kw| {
                matches!(
                    kw.category(),
                    KeywordCategory::Unreserved | KeywordCategory::TypeFuncName
                )
            });
            if bare_keyword && !has_special_chars(single) {
                f.write_str(single)
            } else {
                write_ident(f, single)
            }
        }
        _ => write!(f, "{name}"),
    }
}

/// Writes `expr`, parenthesized when `parens` is set.
fn write_operand(f: &mut fmt::Formatter<'_>, expr: &Expr, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

/// Strips redundant parentheses.
fn unnest(expr: &Expr) -> &Expr {
    match &expr.kind {
        ExprKind::Nested(inner) => unnest(inner),
        _ => expr,
    }
}

// ---------------------------------------------------------------------------
// Literals and expressions
// ---------------------------------------------------------------------------

fn write_string_literal(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let needs_escapes = s.chars().any(|c| c == '\\' || (c.is_control() && c != '\0'));
    if !needs_escapes {
        return write!(f, "'{}'", s.replace('\'', "''"));
    }
    f.write_str("E'")?;
    for c in s.chars() {
        match c {
            '\\' => f.write_str("\\\\")?,
            '\'' => f.write_str("''")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            '\u{8}' => f.write_str("\\b")?,
            '\u{c}' => f.write_str("\\f")?,
            c if c.is_control() && c != '\0' => write!(f, "\\u{:04X}", u32::from(c))?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("'")
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Numeric(text) => f.write_str(text),
            Self::String(s) => write_string_literal(f, s),
            Self::BitString(bits) => {
                let (radix, digits) = bits.split_at(bits.len().min(1));
                write!(f, "{}'{digits}'", radix.to_ascii_uppercase())
            }
            Self::Boolean(true) => f.write_str("TRUE"),
            Self::Boolean(false) => f.write_str("FALSE"),
            Self::Null => f.write_str("NULL"),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for FrameBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnboundedPreceding => f.write_str("UNBOUNDED PRECEDING"),
            Self::Preceding(expr) => write!(f, "{expr} PRECEDING"),
            Self::CurrentRow => f.write_str("CURRENT ROW"),
            Self::Following(expr) => write!(f, "{expr} FOLLOWING"),
            Self::UnboundedFollowing => f.write_str("UNBOUNDED FOLLOWING"),
        }
    }
}

impl fmt::Display for WindowSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = vec![];
        if !self.partition_by.is_empty() {
            let exprs: Vec<String> = self.partition_by.iter().map(ToString::to_string).collect();
            parts.push(format!("PARTITION BY {}", exprs.join(", ")));
        }
        if !self.order_by.is_empty() {
            let items: Vec<String> = self.order_by.iter().map(ToString::to_string).collect();
            parts.push(format!("ORDER BY {}", items.join(", ")));
        }
        if let Some(frame) = &self.frame {
            parts.push(match &frame.end {
                Some(end) => format!("{} BETWEEN {} AND {end}", frame.units.as_str(), frame.start),
                None => format!("{} {}", frame.units.as_str(), frame.start),
            });
        }
        write!(f, "({})", parts.join(" "))
    }
}

impl fmt::Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_function_name(f, &self.name)?;
        f.write_str("(")?;
        if self.star {
            f.write_str("*")?;
        } else {
            if self.distinct {
                f.write_str("DISTINCT ")?;
            }
            let last = self.args.len().saturating_sub(1);
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                if self.variadic && i == last {
                    f.write_str("VARIADIC ")?;
                }
                write!(f, "{arg}")?;
            }
            if !self.order_by.is_empty() {
                f.write_str(" ORDER BY ")?;
                comma_list(f, &self.order_by)?;
            }
        }
        f.write_str(")")?;
        if let Some(filter) = &self.filter {
            write!(f, " FILTER (WHERE {filter})")?;
        }
        if let Some(over) = &self.over {
            write!(f, " OVER {over}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Expr {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Literal(lit) => write!(f, "{lit}"),
            ExprKind::Column(name) => write!(f, "{name}"),
            ExprKind::Wildcard { table } => match table {
                Some(table) => write!(f, "{table}.*"),
                None => f.write_str("*"),
            },
            ExprKind::Param(index) => f.write_str(&PostgresDialect.placeholder(*index)),
            ExprKind::Default => f.write_str("DEFAULT"),
            ExprKind::Nested(inner) => write!(f, "{inner}"),
            ExprKind::Unary { op, expr } => {
                // A prefix operator's operand only absorbs tighter operators,
                // but another prefix form at the same level nests without parens.
                let operand_prec = expr.precedence();
                let inner = unnest(expr);
                let prefix_form = matches!(inner.kind, ExprKind::Unary { .. })
                    || inner.as_literal().is_some_and(Literal::is_negative);
                let parens = operand_prec < op.precedence()
                    || (operand_prec == op.precedence() && !prefix_form);
                if *op == UnaryOp::Not {
                    f.write_str("NOT ")?;
                    return write_operand(f, expr, parens);
                }
                let operand = if parens {
                    format!("({expr})")
                } else {
                    expr.to_string()
                };
                // `- -x` must not collapse into a comment or a longer operator.
                let sep = if operand.starts_with(|c: char| "+-*/<>=~!@#%^&|`?".contains(c)) {
                    " "
                } else {
                    ""
                };
                write!(f, "{op}{sep}{operand}")
            }
            ExprKind::Binary { left, op, right } => {
                let prec = op.precedence();
                let left_parens = if op.is_comparison() {
                    left.precedence() <= prec
                } else {
                    left.precedence() < prec
                };
                write_operand(f, left, left_parens)?;
                write!(f, " {op} ")?;
                write_operand(f, right, right.precedence() <= prec)
            }
            ExprKind::Row { exprs, explicit } => {
                if *explicit || exprs.len() < 2 {
                    f.write_str("ROW")?;
                }
                f.write_str("(")?;
                comma_list(f, exprs)?;
                f.write_str(")")
            }
            ExprKind::Array(elements) => {
                f.write_str("ARRAY[")?;
                comma_list(f, elements)?;
                f.write_str("]")
            }
            ExprKind::ArraySubquery(query) => write!(f, "ARRAY({query})"),
            ExprKind::Subscript { expr, subscript } => {
                // x::int[1] would read the brackets as part of the type
                let prec = expr.precedence();
                write_operand(
                    f,
                    expr,
                    prec < precedence::SUBSCRIPT || prec == precedence::CAST,
                )?;
                match subscript {
                    Subscript::Index(index) => write!(f, "[{index}]"),
                    Subscript::Slice { lower, upper } => {
                        f.write_str("[")?;
                        if let Some(lower) = lower {
                            write!(f, "{lower}")?;
                        }
                        f.write_str(":")?;
                        if let Some(upper) = upper {
                            write!(f, "{upper}")?;
                        }
                        f.write_str("]")
                    }
                }
            }
            ExprKind::FieldAccess { expr, field } => {
                write!(f, "({expr}).")?;
                write_ident(f, field)
            }
            ExprKind::Function(call) => write!(f, "{call}"),
            ExprKind::Cast {
                expr,
                data_type,
                style,
            } => {
                if *style == CastStyle::Function {
                    write!(f, "CAST({expr} AS {data_type})")
                } else if prints_as_prefix_cast(*style, expr) {
                    match data_type {
                        // INTERVAL '1' DAY
                        DataType::Interval(Some(fields)) => {
                            write!(f, "INTERVAL {expr} {}", fields.as_str())
                        }
                        _ => write!(f, "{data_type} {expr}"),
                    }
                } else {
                    write_operand(f, expr, expr.precedence() < precedence::SUBSCRIPT)?;
                    write!(f, "::{data_type}")
                }
            }
            ExprKind::Collate { expr, collation } => {
                write_operand(f, expr, expr.precedence() < precedence::COLLATE)?;
                write!(f, " COLLATE {collation}")
            }
            ExprKind::Case {
                operand,
                when_clauses,
                else_result,
            } => {
                f.write_str("CASE")?;
                if let Some(operand) = operand {
                    write!(f, " {operand}")?;
                }
                for clause in when_clauses {
                    write!(f, " WHEN {} THEN {}", clause.condition, clause.result)?;
                }
                if let Some(else_result) = else_result {
                    write!(f, " ELSE {else_result}")?;
                }
                f.write_str(" END")
            }
            ExprKind::Exists(query) => write!(f, "EXISTS ({query})"),
            ExprKind::Subquery(query) => write!(f, "({query})"),
            ExprKind::InList {
                expr,
                list,
                negated,
            } => {
                write_operand(f, expr, expr.precedence() <= precedence::PREDICATE)?;
                f.write_str(if *negated { " NOT IN (" } else { " IN (" })?;
                comma_list(f, list)?;
                f.write_str(")")
            }
            ExprKind::InSubquery {
                expr,
                subquery,
                negated,
            } => {
                write_operand(f, expr, expr.precedence() <= precedence::PREDICATE)?;
                let keyword = if *negated { "NOT IN" } else { "IN" };
                write!(f, " {keyword} ({subquery})")
            }
            ExprKind::Quantified {
                left,
                op,
                quantifier,
                right,
            } => {
                write_operand(f, left, left.precedence() <= precedence::COMPARISON)?;
                write!(f, " {op} {} ", quantifier.as_str())?;
                match &unnest(right).kind {
                    ExprKind::Subquery(_) => write!(f, "{}", unnest(right)),
                    _ => write!(f, "({right})"),
                }
            }
            ExprKind::Between {
                expr,
                low,
                high,
                negated,
                symmetric,
            } => {
                let prec = precedence::PREDICATE;
                write_operand(f, expr, expr.precedence() <= prec)?;
                f.write_str(if *negated { " NOT BETWEEN " } else { " BETWEEN " })?;
                if *symmetric {
                    f.write_str("SYMMETRIC ")?;
                }
                write_operand(f, low, low.precedence() <= prec)?;
                f.write_str(" AND ")?;
                write_operand(f, high, high.precedence() <= prec)
            }
            ExprKind::Like {
                expr,
                pattern,
                escape,
                negated,
                case_insensitive,
            } => {
                let prec = precedence::PREDICATE;
                write_operand(f, expr, expr.precedence() <= prec)?;
                f.write_str(if *negated { " NOT " } else { " " })?;
                f.write_str(if *case_insensitive { "ILIKE " } else { "LIKE " })?;
                write_operand(f, pattern, pattern.precedence() <= prec)?;
                if let Some(escape) = escape {
                    f.write_str(" ESCAPE ")?;
                    write_operand(f, escape, escape.precedence() <= prec)?;
                }
                Ok(())
            }
            ExprKind::IsNull { expr, negated } => {
                write_operand(f, expr, expr.precedence() <= precedence::IS)?;
                f.write_str(if *negated { " IS NOT NULL" } else { " IS NULL" })
            }
            ExprKind::IsTruth {
                expr,
                value,
                negated,
            } => {
                write_operand(f, expr, expr.precedence() <= precedence::IS)?;
                let not = if *negated { "NOT " } else { "" };
                write!(f, " IS {not}{}", value.as_str())
            }
            ExprKind::IsDistinctFrom {
                left,
                right,
                negated,
            } => {
                write_operand(f, left, left.precedence() <= precedence::IS)?;
                let not = if *negated { "NOT " } else { "" };
                write!(f, " IS {not}DISTINCT FROM ")?;
                write_operand(f, right, right.precedence() <= precedence::IS)
            }
            ExprKind::ValueFunction(func) => f.write_str(func.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

impl fmt::Display for OrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)?;
        if let Some(direction) = self.direction {
            write!(f, " {}", direction.as_str())?;
        }
        if let Some(op) = &self.using {
            write!(f, " USING {op}")?;
        }
        if let Some(nulls) = self.nulls {
            write!(f, " {}", nulls.as_str())?;
        }
        Ok(())
    }
}

impl fmt::Display for SelectColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.expr)?;
        if let Some(alias) = &self.alias {
            f.write_str(" AS ")?;
            write_label(f, alias)?;
        }
        Ok(())
    }
}

impl fmt::Display for TableAlias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_ident(f, &self.name)?;
        if !self.columns.is_empty() {
            f.write_str(" (")?;
            write_ident_list(f, &self.columns)?;
            f.write_str(")")?;
        }
        Ok(())
    }
}

fn write_alias(f: &mut fmt::Formatter<'_>, alias: Option<&TableAlias>) -> fmt::Result {
    match alias {
        Some(alias) => write!(f, " AS {alias}"),
        None => Ok(()),
    }
}

impl fmt::Display for TableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table {
                only, name, alias, ..
            } => {
                if *only {
                    f.write_str("ONLY ")?;
                }
                write!(f, "{name}")?;
                write_alias(f, alias.as_ref())
            }
            Self::Subquery {
                lateral,
                query,
                alias,
                ..
            } => {
                if *lateral {
                    f.write_str("LATERAL ")?;
                }
                write!(f, "({query})")?;
                write_alias(f, alias.as_ref())
            }
            Self::Function {
                lateral,
                call,
                alias,
                ..
            } => {
                if *lateral {
                    f.write_str("LATERAL ")?;
                }
                write!(f, "{call}")?;
                write_alias(f, alias.as_ref())
            }
            Self::Join {
                left,
                join_type,
                natural,
                right,
                constraint,
                ..
            } => {
                write!(f, "{left} ")?;
                if *natural {
                    f.write_str("NATURAL ")?;
                }
                f.write_str(join_type.as_str())?;
                if matches!(**right, Self::Join { .. }) {
                    write!(f, " ({right})")?;
                } else {
                    write!(f, " {right}")?;
                }
                match constraint {
                    JoinConstraint::On(expr) => write!(f, " ON {expr}"),
                    JoinConstraint::Using(columns) => {
                        f.write_str(" USING (")?;
                        write_ident_list(f, columns)?;
                        f.write_str(")")
                    }
                    JoinConstraint::None => Ok(()),
                }
            }
        }
    }
}

impl fmt::Display for SelectCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SELECT ")?;
        match &self.distinct {
            Some(Distinct::Distinct) => f.write_str("DISTINCT ")?,
            Some(Distinct::On(exprs)) => {
                f.write_str("DISTINCT ON (")?;
                comma_list(f, exprs)?;
                f.write_str(") ")?;
            }
            None => {}
        }
        comma_list(f, &self.columns)?;
        if !self.from.is_empty() {
            f.write_str(" FROM ")?;
            comma_list(f, &self.from)?;
        }
        if let Some(where_clause) = &self.where_clause {
            write!(f, " WHERE {where_clause}")?;
        }
        if !self.group_by.is_empty() {
            f.write_str(" GROUP BY ")?;
            comma_list(f, &self.group_by)?;
        }
        if let Some(having) = &self.having {
            write!(f, " HAVING {having}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Values {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VALUES ")?;
        comma_list_fn(f, &self.rows, |row, f| {
            f.write_str("(")?;
            comma_list(f, row)?;
            f.write_str(")")
        })
    }
}

/// Looks through parentheses that add nothing to a query (`((SELECT 1))`).
fn unwrap_bare(mut body: &SetExpr) -> &SetExpr {
    while let SetExpr::Query(query) = body {
        if !query.is_bare() {
            break;
        }
        body = &query.body;
    }
    body
}

const fn set_precedence(op: SetOperator) -> u8 {
    match op {
        SetOperator::Union | SetOperator::Except => 1,
        SetOperator::Intersect => 2,
    }
}

impl fmt::Display for SetExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(core) => write!(f, "{core}"),
            Self::Values(values) => write!(f, "{values}"),
            Self::Query(query) => write!(f, "({query})"),
            Self::SetOperation {
                op,
                all,
                left,
                right,
                ..
            } => {
                let prec = set_precedence(*op);
                let (left, right) = (unwrap_bare(left), unwrap_bare(right));
                match left {
                    Self::SetOperation { op: inner, .. } if set_precedence(*inner) < prec => {
                        write!(f, "({left})")?;
                    }
                    _ => write!(f, "{left}")?,
                }
                write!(f, " {}", op.as_str())?;
                if *all {
                    f.write_str(" ALL")?;
                }
                match right {
                    Self::SetOperation { op: inner, .. } if set_precedence(*inner) <= prec => {
                        write!(f, " ({right})")
                    }
                    _ => write!(f, " {right}"),
                }
            }
        }
    }
}

impl fmt::Display for Cte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_ident(f, &self.name)?;
        if !self.columns.is_empty() {
            f.write_str(" (")?;
            write_ident_list(f, &self.columns)?;
            f.write_str(")")?;
        }
        f.write_str(" AS ")?;
        match self.materialized {
            Some(true) => f.write_str("MATERIALIZED ")?,
            Some(false) => f.write_str("NOT MATERIALIZED ")?,
            None => {}
        }
        write!(f, "({})", self.statement)
    }
}

impl fmt::Display for WithClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WITH ")?;
        if self.recursive {
            f.write_str("RECURSIVE ")?;
        }
        comma_list(f, &self.ctes)
    }
}

fn write_with(f: &mut fmt::Formatter<'_>, with: Option<&WithClause>) -> fmt::Result {
    match with {
        Some(with) => write!(f, "{with} "),
        None => Ok(()),
    }
}

impl fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let body = unwrap_bare(&self.body);
        if let SetExpr::Query(inner) = body {
            if self.is_bare() {
                return write!(f, "{inner}");
            }
        }
        write_with(f, self.with.as_ref())?;
        write!(f, "{body}")?;
        if !self.order_by.is_empty() {
            f.write_str(" ORDER BY ")?;
            comma_list(f, &self.order_by)?;
        }
        if let Some(limit) = &self.limit {
            write!(f, " LIMIT {limit}")?;
        }
        if let Some(offset) = &self.offset {
            write!(f, " OFFSET {offset}")?;
        }
        for clause in &self.locking {
            write!(f, " {clause}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Data modification and definition
// ---------------------------------------------------------------------------

impl fmt::Display for LockingClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.strength.as_str())?;
        if !self.of.is_empty() {
            f.write_str(" OF ")?;
            comma_list(f, &self.of)?;
        }
        if let Some(wait) = self.wait {
            write!(f, " {}", wait.as_str())?;
        }
        Ok(())
    }
}

impl fmt::Display for UpdateAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            AssignmentTarget::Column(column) => write_ident(f, column)?,
            AssignmentTarget::Columns(columns) => {
                f.write_str("(")?;
                write_ident_list(f, columns)?;
                f.write_str(")")?;
                // (a) = (DEFAULT) has no ROW(...) spelling
                if let ExprKind::Row {
                    exprs,
                    explicit: false,
                } = &self.value.kind
                {
                    f.write_str(" = (")?;
                    comma_list(f, exprs)?;
                    return f.write_str(")");
                }
            }
        }
        write!(f, " = {}", self.value)
    }
}

fn write_returning(f: &mut fmt::Formatter<'_>, returning: &[SelectColumn]) -> fmt::Result {
    if returning.is_empty() {
        return Ok(());
    }
    f.write_str(" RETURNING ")?;
    comma_list(f, returning)
}

fn write_target(
    f: &mut fmt::Formatter<'_>,
    only: bool,
    table: &ObjectName,
    alias: Option<&String>,
) -> fmt::Result {
    if only {
        f.write_str("ONLY ")?;
    }
    write!(f, "{table}")?;
    if let Some(alias) = alias {
        f.write_str(" AS ")?;
        write_ident(f, alias)?;
    }
    Ok(())
}

impl fmt::Display for InsertStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_with(f, self.with.as_ref())?;
        f.write_str("INSERT INTO ")?;
        write_target(f, false, &self.table, self.alias.as_ref())?;
        if !self.columns.is_empty() {
            f.write_str(" (")?;
            write_ident_list(f, &self.columns)?;
            f.write_str(")")?;
        }
        match &self.source {
            InsertSource::Query(query) => write!(f, " {query}")?,
            InsertSource::DefaultValues => f.write_str(" DEFAULT VALUES")?,
        }
        if let Some(on_conflict) = &self.on_conflict {
            f.write_str(" ON CONFLICT")?;
            if !on_conflict.columns.is_empty() {
                f.write_str(" (")?;
                write_ident_list(f, &on_conflict.columns)?;
                f.write_str(")")?;
            }
            match &on_conflict.action {
                ConflictAction::DoNothing => f.write_str(" DO NOTHING")?,
                ConflictAction::DoUpdate {
                    assignments,
                    where_clause,
                } => {
                    f.write_str(" DO UPDATE SET ")?;
                    comma_list(f, assignments)?;
                    if let Some(where_clause) = where_clause {
                        write!(f, " WHERE {where_clause}")?;
                    }
                }
            }
        }
        write_returning(f, &self.returning)
    }
}

impl fmt::Display for UpdateStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_with(f, self.with.as_ref())?;
        f.write_str("UPDATE ")?;
        write_target(f, self.only, &self.table, self.alias.as_ref())?;
        f.write_str(" SET ")?;
        comma_list(f, &self.assignments)?;
        if !self.from.is_empty() {
            f.write_str(" FROM ")?;
            comma_list(f, &self.from)?;
        }
        if let Some(where_clause) = &self.where_clause {
            write!(f, " WHERE {where_clause}")?;
        }
        write_returning(f, &self.returning)
    }
}

impl fmt::Display for DeleteStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_with(f, self.with.as_ref())?;
        f.write_str("DELETE FROM ")?;
        write_target(f, self.only, &self.table, self.alias.as_ref())?;
        if !self.using.is_empty() {
            f.write_str(" USING ")?;
            comma_list(f, &self.using)?;
        }
        if let Some(where_clause) = &self.where_clause {
            write!(f, " WHERE {where_clause}")?;
        }
        write_returning(f, &self.returning)
    }
}

impl fmt::Display for ColumnConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotNull => f.write_str("NOT NULL"),
            Self::Null => f.write_str("NULL"),
            Self::PrimaryKey => f.write_str("PRIMARY KEY"),
            Self::Unique => f.write_str("UNIQUE"),
            Self::Default(expr) => write!(f, "DEFAULT {expr}"),
            Self::References { table, column } => {
                write!(f, "REFERENCES {table}")?;
                if let Some(column) = column {
                    f.write_str(" (")?;
                    write_ident(f, column)?;
                    f.write_str(")")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_ident(f, &self.name)?;
        write!(f, " {}", self.data_type)?;
        for constraint in &self.constraints {
            write!(f, " {constraint}")?;
        }
        Ok(())
    }
}

impl fmt::Display for CreateTableStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CREATE ")?;
        if self.temporary {
            f.write_str("TEMPORARY ")?;
        }
        f.write_str("TABLE ")?;
        if self.if_not_exists {
            f.write_str("IF NOT EXISTS ")?;
        }
        write!(f, "{} (", self.name)?;
        comma_list(f, &self.columns)?;
        f.write_str(")")
    }
}

impl fmt::Display for DropTableStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DROP TABLE ")?;
        if self.if_exists {
            f.write_str("IF EXISTS ")?;
        }
        comma_list(f, &self.names)?;
        if let Some(behavior) = self.behavior {
            write!(f, " {}", behavior.as_str())?;
        }
        Ok(())
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Select(s) => write!(f, "{s}"),
            Self::Insert(s) => write!(f, "{s}"),
            Self::Update(s) => write!(f, "{s}"),
            Self::Delete(s) => write!(f, "{s}"),
            Self::CreateTable(s) => write!(f, "{s}"),
            Self::DropTable(s) => write!(f, "{s}"),
            Self::Transaction(s) => f.write_str(s.kind.as_str()),
            Self::Explain(s) => {
                f.write_str("EXPLAIN ")?;
                if s.analyze {
                    f.write_str("ANALYZE ")?;
                }
                if s.verbose {
                    f.write_str("VERBOSE ")?;
                }
                write!(f, "{}", s.statement)
            }
        }
    }
}

impl fmt::Display for RawStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.stmt)
    }
}

impl fmt::Display for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, raw) in self.statements.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{raw}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Span;

    fn expr(kind: ExprKind) -> Expr {
        Expr::new(kind, Span::default())
    }

    #[test]
    fn test_string_literals() {
        assert_eq!(Literal::String(String::from("it's")).to_string(), "'it''s'");
        assert_eq!(
            Literal::String(String::from("a\\b\n")).to_string(),
            "E'a\\\\b\\n'"
        );
        assert_eq!(Literal::BitString(String::from("b0101")).to_string(), "B'0101'");
        assert_eq!(Literal::Numeric(String::from("1.50")).to_string(), "1.50");
    }

    #[test]
    fn test_redundant_parens_are_dropped() {
        let product = Expr::column("a").binary(BinaryOp::Mul, Expr::column("b"));
        let nested = expr(ExprKind::Nested(Box::new(product)));
        let sum = nested.binary(BinaryOp::Add, Expr::column("c"));
        assert_eq!(sum.to_string(), "a * b + c");
    }

    #[test]
    fn test_required_parens_are_kept() {
        let sum = Expr::column("a").binary(BinaryOp::Add, Expr::column("b"));
        let product = sum.binary(BinaryOp::Mul, Expr::column("c"));
        assert_eq!(product.to_string(), "(a + b) * c");

        let diff = Expr::column("b").binary(BinaryOp::Sub, Expr::column("c"));
        let outer = Expr::column("a").binary(BinaryOp::Sub, diff);
        assert_eq!(outer.to_string(), "a - (b - c)");
    }

    #[test]
    fn test_double_negation_keeps_space() {
        let inner = expr(ExprKind::Unary {
            op: UnaryOp::Minus,
            expr: Box::new(Expr::column("x")),
        });
        let outer = expr(ExprKind::Unary {
            op: UnaryOp::Minus,
            expr: Box::new(inner),
        });
        assert_eq!(outer.to_string(), "- -x");
    }

    #[test]
    fn test_identifier_quoting() {
        let col = expr(ExprKind::Column(ObjectName(vec![
            String::from("T"),
            String::from("select"),
            String::from("key"),
        ])));
        assert_eq!(col.to_string(), "\"T\".\"select\".key");
    }

    #[test]
    fn test_function_name_keywords_stay_bare() {
        let call = FunctionCall::new("left", vec![Expr::column("s"), Expr::integer(2)]);
        assert_eq!(call.to_string(), "left(s, 2)");
    }

    #[test]
    fn test_negative_literal_cast_is_parenthesized() {
        let cast = expr(ExprKind::Cast {
            expr: Box::new(Expr::integer(-5)),
            data_type: DataType::Integer,
            style: CastStyle::DoubleColon,
        });
        assert_eq!(cast.to_string(), "(-5)::INTEGER");
    }

    #[test]
    fn test_prefix_cast_falls_back_to_double_colon() {
        let cast = expr(ExprKind::Cast {
            expr: Box::new(Expr::param(1)),
            data_type: DataType::Date,
            style: CastStyle::Prefix,
        });
        assert_eq!(cast.to_string(), "$1::DATE");
    }
}
