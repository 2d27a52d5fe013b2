//! Tests for expressions, operators and literals.

mod common;
use common::*;

use pgshape_core::ast::visit::{walk_expr, walk_query, walk_select, walk_table_ref};
use pgshape_core::ast::{
    BinaryOp, DataType, Expr, ExprKind, IntervalFields, Literal, Quantifier, SelectCore,
    SelectStatement, TableRef, UnaryOp, ValueFunction, Visitor,
};
use pgshape_core::lexer::Span;

fn expr_canonical(expr: &str) -> String {
    parse_expr(expr).to_string()
}

#[test]
fn arithmetic_precedence() {
    let expr = parse_expr("1 + 2 * 3 - 4");
    match &expr.kind {
        ExprKind::Binary { op, left, .. } => {
            assert_eq!(*op, BinaryOp::Sub);
            assert!(matches!(
                left.kind,
                ExprKind::Binary {
                    op: BinaryOp::Add,
                    ..
                }
            ));
        }
        other => panic!("Expected binary, got {other:?}"),
    }
    assert_eq!(expr_canonical("2 ^ 3 ^ 2"), "2 ^ 3 ^ 2");
    assert_eq!(expr_canonical("2 ^ (3 ^ 2)"), "2 ^ (3 ^ 2)");
    assert_eq!(expr_canonical("a - (b - c)"), "a - (b - c)");
    assert_eq!(expr_canonical("(a - b) - c"), "a - b - c");
}

#[test]
fn boolean_precedence() {
    assert_eq!(expr_canonical("a OR b AND c"), "a OR b AND c");
    assert_eq!(expr_canonical("(a OR b) AND c"), "(a OR b) AND c");
    assert_eq!(expr_canonical("NOT a AND b"), "NOT a AND b");
    assert_eq!(expr_canonical("NOT (a AND b)"), "NOT (a AND b)");
    let expr = parse_expr("NOT a = b");
    assert!(matches!(
        expr.kind,
        ExprKind::Unary {
            op: UnaryOp::Not,
            ..
        }
    ));
}

#[test]
fn other_operators_sit_between_comparison_and_arithmetic() {
    assert_eq!(expr_canonical("a || b = c || d"), "a || b = c || d");
    assert_eq!(expr_canonical("(a = b) || c"), "(a = b) || c");
    assert_eq!(expr_canonical("a->>'k' = 'v'"), "a ->> 'k' = 'v'");
    assert_eq!(expr_canonical("j @> '{}' AND x"), "j @> '{}' AND x");
    assert_eq!(expr_canonical("a + b || c"), "a + b || c");
    assert_eq!(expr_canonical("a ~* 'x' OR b !~ 'y'"), "a ~* 'x' OR b !~ 'y'");
}

#[test]
fn comparisons_do_not_chain() {
    let err = parse_err("SELECT a = b = c");
    assert_eq!(
        err.message,
        "syntax error at or near \"=\", expected end of expression"
    );
    assert_eq!(err.cursorpos, 14);
    assert_eq!(expr_canonical("(a = b) = c"), "(a = b) = c");
    assert!(pgshape_core::parse("SELECT a BETWEEN 1 AND 2 BETWEEN 3 AND 4").error.is_some());
}

#[test]
fn literals() {
    assert_eq!(
        parse_expr("42").kind,
        ExprKind::Literal(Literal::Integer(42))
    );
    assert_eq!(
        parse_expr("1.5e3").kind,
        ExprKind::Literal(Literal::Numeric(String::from("1.5e3")))
    );
    assert_eq!(
        parse_expr("99999999999999999999").kind,
        ExprKind::Literal(Literal::Numeric(String::from("99999999999999999999")))
    );
    assert_eq!(expr_canonical("'it''s'"), "'it''s'");
    assert_eq!(expr_canonical("E'a\\nb'"), "E'a\\nb'");
    assert_eq!(expr_canonical("$$dollar's$$"), "'dollar''s'");
    assert_eq!(expr_canonical("B'0101'"), "B'0101'");
    assert_eq!(expr_canonical("null"), "NULL");
    assert_eq!(expr_canonical("true"), "TRUE");
}

#[test]
fn negative_numbers() {
    assert_eq!(parse_expr("-7").kind, ExprKind::Literal(Literal::Integer(-7)));
    assert_eq!(expr_canonical("1 - -7"), "1 - -7");
    assert_eq!(expr_canonical("-a"), "-a");
    assert_eq!(expr_canonical("- -a"), "- -a");
    assert_eq!(expr_canonical("(-2) ^ 2"), "-2 ^ 2");
}

#[test]
fn casts() {
    assert_eq!(expr_canonical("a::int"), "a::INTEGER");
    assert_eq!(expr_canonical("CAST(a AS varchar(10))"), "CAST(a AS VARCHAR(10))");
    assert_eq!(expr_canonical("(a + b)::text"), "(a + b)::TEXT");
    assert_eq!(expr_canonical("a::numeric(10,2)"), "a::NUMERIC(10, 2)");
    assert_eq!(expr_canonical("'1 day'::interval"), "'1 day'::INTERVAL");
    assert_eq!(expr_canonical("a::public.mood"), "a::public.mood");
    match parse_expr("x::double precision").kind {
        ExprKind::Cast { data_type, .. } => assert_eq!(data_type, DataType::DoublePrecision),
        other => panic!("Expected cast, got {other:?}"),
    }
}

#[test]
fn typed_literals() {
    assert_eq!(expr_canonical("date '2024-01-01'"), "DATE '2024-01-01'");
    assert_eq!(expr_canonical("int4 '1'"), "INTEGER '1'");
    assert_eq!(expr_canonical("mood 'happy'"), "mood 'happy'");
    assert_eq!(expr_canonical("double precision '1.5'"), "DOUBLE PRECISION '1.5'");
}

#[test]
fn predicates() {
    assert_eq!(
        expr_canonical("a between b and c and d"),
        "a BETWEEN b AND c AND d"
    );
    assert_eq!(
        expr_canonical("a in (select b from t)"),
        "a IN (SELECT b FROM t)"
    );
    assert_eq!(expr_canonical("a not like 'x%'"), "a NOT LIKE 'x%'");
    assert_eq!(expr_canonical("a notnull"), "a IS NOT NULL");
    assert_eq!(expr_canonical("a is not true"), "a IS NOT TRUE");
    assert_eq!(expr_canonical("a is unknown"), "a IS UNKNOWN");
    assert_eq!(
        expr_canonical("a is distinct from b + 1"),
        "a IS DISTINCT FROM b + 1"
    );
    assert_eq!(expr_canonical("a = b is null"), "a = b IS NULL");
}

#[test]
fn quantified_comparisons() {
    match parse_expr("a > all (select b from t)").kind {
        ExprKind::Quantified {
            op,
            quantifier,
            right,
            ..
        } => {
            assert_eq!(op, BinaryOp::Gt);
            assert_eq!(quantifier, Quantifier::All);
            assert!(matches!(right.kind, ExprKind::Subquery(_)));
        }
        other => panic!("Expected quantified comparison, got {other:?}"),
    }
    assert_eq!(expr_canonical("a = some(b)"), "a = SOME (b)");
}

#[test]
fn case_expressions() {
    assert_eq!(
        expr_canonical("case a when 1 then 'one' when 2 then 'two' end"),
        "CASE a WHEN 1 THEN 'one' WHEN 2 THEN 'two' END"
    );
}

#[test]
fn arrays_and_subscripts() {
    assert_eq!(expr_canonical("array[1, 2][1]"), "ARRAY[1, 2][1]");
    assert_eq!(expr_canonical("a[2:]"), "a[2:]");
    assert_eq!(expr_canonical("a[:2]"), "a[:2]");
    assert_eq!(
        expr_canonical("array(select 1)"),
        "ARRAY(SELECT 1)"
    );
    assert_eq!(expr_canonical("ARRAY[]"), "ARRAY[]");
}

#[test]
fn rows_and_field_access() {
    assert_eq!(expr_canonical("row(1, 2)"), "ROW(1, 2)");
    assert_eq!(expr_canonical("(1, 'a')"), "(1, 'a')");
    assert_eq!(expr_canonical("(c).f"), "(c).f");
    assert_eq!(expr_canonical("(get_pair()).first"), "(get_pair()).first");
}

#[test]
fn value_functions_and_params() {
    assert_eq!(
        expr_canonical("current_timestamp"),
        "CURRENT_TIMESTAMP"
    );
    assert_eq!(parse_expr("$3").kind, ExprKind::Param(3));
}

#[test]
fn keyword_function_names() {
    assert_eq!(expr_canonical("LEFT(s, 1)"), "left(s, 1)");
    assert_eq!(expr_canonical("public.my_func(1)"), "public.my_func(1)");
    let err = parse_err("SELECT left");
    assert!(err.message.starts_with("syntax error at or near \"left\""));
}

#[test]
fn round_trips() {
    for sql in [
        "SELECT a + b * c / d % e",
        "SELECT -(a + b), ~a, +a",
        "SELECT a::int[], (x::int)[1]",
        "SELECT a IS NULL OR b IS NOT NULL",
        "SELECT a NOT BETWEEN -1 AND 1",
        "SELECT (a BETWEEN 1 AND 2) = TRUE",
        "SELECT x FROM t WHERE a IN ((SELECT 1), 2)",
        "SELECT string_agg(name, ', ' ORDER BY name)",
        "SELECT timestamp with time zone '2020-01-01'",
        "SELECT CASE WHEN a THEN b END",
        "SELECT sum(x) OVER (ROWS BETWEEN 1 PRECEDING AND 1 FOLLOWING)",
        "SELECT 'a' LIKE 'b' ESCAPE '!'",
    ] {
        round_trip(sql);
    }
}

#[test]
fn interval_field_qualifiers() {
    let expr = parse_expr("interval '1' day");
    match &expr.kind {
        ExprKind::Cast { data_type, .. } => {
            assert_eq!(*data_type, DataType::Interval(Some(IntervalFields::Day)));
        }
        other => panic!("Expected cast, got {other:?}"),
    }
    assert_eq!(expr_canonical("interval '1' day"), "INTERVAL '1' DAY");
    assert_eq!(
        expr_canonical("interval '1-2' year to month"),
        "INTERVAL '1-2' YEAR TO MONTH"
    );
    assert_eq!(
        expr_canonical("'1'::interval hour to second"),
        "'1'::INTERVAL HOUR TO SECOND"
    );
    assert_eq!(expr_canonical("interval '1 day'"), "INTERVAL '1 day'");
    round_trip("SELECT '10'::interval minute, interval '3' second");

    let err = parse_err("SELECT interval '1' day to year");
    assert!(err.message.starts_with("syntax error at or near \"year\""));
}

#[test]
fn user_and_current_role() {
    assert_eq!(
        parse_expr("user").kind,
        ExprKind::ValueFunction(ValueFunction::User)
    );
    assert_eq!(
        parse_expr("current_role").kind,
        ExprKind::ValueFunction(ValueFunction::CurrentRole)
    );
    assert_eq!(canonical("SELECT \"user\" FROM t"), "SELECT \"user\" FROM t");
    assert_eq!(
        canonical("SELECT current_user, user, current_role"),
        "SELECT CURRENT_USER, USER, CURRENT_ROLE"
    );
}

#[test]
fn collate_clause() {
    match &parse_expr("name COLLATE \"C\"").kind {
        ExprKind::Collate { expr, collation } => {
            assert!(matches!(expr.kind, ExprKind::Column(_)));
            assert_eq!(collation.to_string(), "\"C\"");
        }
        other => panic!("Expected collate, got {other:?}"),
    }
    // COLLATE binds tighter than || and looser than unary minus
    assert_eq!(
        expr_canonical("a || b collate \"C\""),
        "a || b COLLATE \"C\""
    );
    assert_eq!(
        expr_canonical("(a || b) collate \"C\""),
        "(a || b) COLLATE \"C\""
    );
    assert!(matches!(
        parse_expr("-a COLLATE \"C\"").kind,
        ExprKind::Collate { .. }
    ));
    assert_eq!(
        expr_canonical("-(a collate \"C\")"),
        "-(a COLLATE \"C\")"
    );
    assert_eq!(
        expr_canonical("a collate pg_catalog.\"default\""),
        "a COLLATE pg_catalog.\"default\""
    );
}

#[test]
fn between_symmetric() {
    match &parse_expr("a BETWEEN SYMMETRIC 10 AND 1").kind {
        ExprKind::Between {
            symmetric, negated, ..
        } => {
            assert!(*symmetric);
            assert!(!*negated);
        }
        other => panic!("Expected between, got {other:?}"),
    }
    assert_eq!(
        expr_canonical("a not between symmetric 10 and 1"),
        "a NOT BETWEEN SYMMETRIC 10 AND 1"
    );
    assert_eq!(
        expr_canonical("a between asymmetric 1 and 10"),
        "a BETWEEN 1 AND 10"
    );
}

#[test]
fn bit_string_types() {
    assert_eq!(
        parse_expr("b::bit(3)").kind,
        ExprKind::Cast {
            expr: Box::new(parse_expr("b")),
            data_type: DataType::Bit(Some(3)),
            style: pgshape_core::ast::CastStyle::DoubleColon,
        }
    );
    assert_eq!(expr_canonical("b::bit"), "b::BIT");
    assert_eq!(expr_canonical("b::bit varying(5)"), "b::BIT VARYING(5)");
    assert_eq!(expr_canonical("b::varbit"), "b::BIT VARYING");
    assert_eq!(expr_canonical("bit '101'"), "BIT '101'");
}

#[test]
fn variadic_arguments() {
    match &parse_expr("format('%s %s', VARIADIC ARRAY['a', 'b'])").kind {
        ExprKind::Function(call) => {
            assert!(call.variadic);
            assert_eq!(call.args.len(), 2);
            assert!(matches!(call.args[1].kind, ExprKind::Array(_)));
        }
        other => panic!("Expected function call, got {other:?}"),
    }
    assert_eq!(
        expr_canonical("concat_ws(',', variadic arr)"),
        "concat_ws(',', VARIADIC arr)"
    );
    assert_eq!(expr_canonical("f(variadic arr)"), "f(VARIADIC arr)");

    let err = parse_err("SELECT f(VARIADIC a, b)");
    assert!(err.message.starts_with("syntax error at or near \",\""));
}

/// Checks that each node's span lies inside its parent's and starts after
/// the end of its previous sibling.
#[derive(Default)]
struct SpanNesting<'a> {
    sql: &'a str,
    /// Open nodes with the end of their last visited child.
    open: Vec<(Span, usize)>,
    top_end: usize,
    nodes: usize,
}

impl<'a> SpanNesting<'a> {
    fn new(sql: &'a str) -> Self {
        Self {
            sql,
            ..Self::default()
        }
    }

    fn enter(&mut self, span: Span, what: &str) {
        let sql = self.sql;
        let text = span.slice(sql);
        assert!(
            span.start < span.end,
            "empty {what} span {span:?} in {sql}"
        );
        let last_end = match self.open.last() {
            Some((parent, last_end)) => {
                assert!(
                    parent.contains(span),
                    "{what} {text:?} escapes its parent {:?} in {sql}",
                    parent.slice(sql)
                );
                *last_end
            }
            None => self.top_end,
        };
        assert!(
            span.start >= last_end,
            "{what} {text:?} overlaps its previous sibling in {sql}"
        );
        self.open.push((span, span.start));
        self.nodes += 1;
    }

    fn leave(&mut self) {
        let Some((span, _)) = self.open.pop() else {
            panic!("unbalanced leave");
        };
        match self.open.last_mut() {
            Some((_, last_end)) => *last_end = span.end,
            None => self.top_end = span.end,
        }
    }
}

impl Visitor for SpanNesting<'_> {
    fn visit_query(&mut self, query: &SelectStatement) {
        self.enter(query.span, "query");
        walk_query(self, query);
        self.leave();
    }

    fn visit_select(&mut self, select: &SelectCore) {
        self.enter(select.span, "select");
        walk_select(self, select);
        self.leave();
    }

    fn visit_table_ref(&mut self, table: &TableRef) {
        self.enter(table.span(), "table");
        walk_table_ref(self, table);
        self.leave();
    }

    fn visit_expr(&mut self, expr: &Expr) {
        self.enter(expr.span, "expression");
        walk_expr(self, expr);
        self.leave();
    }
}

#[test]
fn child_spans_nest_inside_parents() {
    for sql in [
        "SELECT a + b * -c, (x).f, arr[1][2:3] FROM t",
        "SELECT * FROM a JOIN b ON a.id = b.id LEFT JOIN (c CROSS JOIN d) ON TRUE",
        "SELECT * FROM (SELECT x FROM t WHERE x > 1) AS s, generate_series(1, 10) g",
        "SELECT CASE a WHEN 1 THEN 'one' WHEN 2 THEN 'two' ELSE 'many' END FROM t",
        "SELECT count(DISTINCT a) FILTER (WHERE a > 0) OVER (PARTITION BY b ORDER BY c) FROM t",
        "SELECT string_agg(name, ', ' ORDER BY name DESC) FROM t GROUP BY k HAVING count(*) > 1",
        "SELECT x FROM t WHERE a IN (1, 2, 3) AND b NOT IN (SELECT b FROM u) OR c = ANY (ARRAY[1, 2])",
        "SELECT a BETWEEN SYMMETRIC 1 AND 10, b LIKE 'x%' ESCAPE '!', c IS NOT DISTINCT FROM d",
        "SELECT name COLLATE \"C\" || 'x', DATE '2024-01-01', INTERVAL '1' DAY, '5'::int, CAST(a AS text)",
        "SELECT EXISTS (SELECT 1), ARRAY(SELECT 1), (SELECT max(a) FROM t), ROW(1, 2), (3, 4)",
        "SELECT 1 UNION SELECT 2 INTERSECT (SELECT 3 ORDER BY 1) ORDER BY 1 LIMIT 5 OFFSET 2",
        "WITH c AS (SELECT 1 AS n) SELECT n FROM c ORDER BY n LIMIT $1",
        "INSERT INTO t (a, b) VALUES (1, 'x'), (2, DEFAULT) ON CONFLICT (a) DO UPDATE SET b = 'y' WHERE t.a > 0 RETURNING a",
        "UPDATE t SET a = a + 1, (b, c) = (SELECT 1, 2) FROM u WHERE t.id = u.id RETURNING *",
        "DELETE FROM t USING u WHERE t.id = u.id AND u.flag IS TRUE",
    ] {
        let tree = parse_tree(sql);
        for raw in &tree.statements {
            let mut nesting = SpanNesting::new(sql);
            nesting.open.push((raw.span, raw.span.start));
            nesting.visit_statement(&raw.stmt);
            assert_eq!(nesting.open.len(), 1, "unbalanced walk over {sql}");
            assert!(nesting.nodes > 1, "nothing visited in {sql}");
        }
    }
}
