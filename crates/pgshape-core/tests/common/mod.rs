#![allow(dead_code)]

use pgshape_core::ast::{
    DeleteStatement, Expr, InsertStatement, SelectStatement, Statement, UpdateStatement,
};
use pgshape_core::{ParseTree, QueryError};

pub fn parse_tree(sql: &str) -> ParseTree {
    pgshape_core::parse(sql)
        .into_result()
        .unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e:?}"))
}

pub fn parse(sql: &str) -> Statement {
    let mut tree = parse_tree(sql);
    assert_eq!(tree.statements.len(), 1, "Expected one statement: {sql}");
    tree.statements.remove(0).stmt
}

pub fn parse_err(sql: &str) -> QueryError {
    pgshape_core::parse(sql)
        .into_result()
        .expect_err(&format!("Expected parse error for: {sql}"))
}

pub fn parse_select(sql: &str) -> SelectStatement {
    match parse(sql) {
        Statement::Select(s) => s,
        other => panic!("Expected SELECT, got {other:?}"),
    }
}

pub fn parse_insert(sql: &str) -> InsertStatement {
    match parse(sql) {
        Statement::Insert(i) => i,
        other => panic!("Expected INSERT, got {other:?}"),
    }
}

pub fn parse_update(sql: &str) -> UpdateStatement {
    match parse(sql) {
        Statement::Update(u) => u,
        other => panic!("Expected UPDATE, got {other:?}"),
    }
}

pub fn parse_delete(sql: &str) -> DeleteStatement {
    match parse(sql) {
        Statement::Delete(d) => d,
        other => panic!("Expected DELETE, got {other:?}"),
    }
}

/// Parses `SELECT <expr>` and returns the single target expression.
pub fn parse_expr(expr: &str) -> Expr {
    let select = parse_select(&format!("SELECT {expr}"));
    let core = select.core().expect("plain SELECT");
    assert_eq!(core.columns.len(), 1, "Expected one target: {expr}");
    core.columns[0].expr.clone()
}

/// Canonical text of a single statement.
pub fn canonical(sql: &str) -> String {
    parse_tree(sql).to_string()
}

/// Verifies that printing is a fixed point: the canonical text parses back
/// to the same canonical text.
pub fn round_trip(sql: &str) {
    let rendered1 = canonical(sql);
    let rendered2 = canonical(&rendered1);
    assert_eq!(
        rendered1, rendered2,
        "Round-trip failed.\n  Input:    {sql}\n  First:    {rendered1}\n  Second:   {rendered2}"
    );
}

pub fn normalize(sql: &str) -> String {
    pgshape_core::normalize(sql)
        .into_result()
        .unwrap_or_else(|e| panic!("Failed to normalize: {sql}\nError: {e:?}"))
}
