//! Tests for CREATE TABLE, DROP TABLE and type names.

mod common;
use common::*;

use pgshape_core::ast::{ColumnConstraint, DataType, DropBehavior, Statement};

fn create_table(sql: &str) -> pgshape_core::ast::CreateTableStatement {
    match parse(sql) {
        Statement::CreateTable(create) => create,
        other => panic!("Expected CREATE TABLE, got {other:?}"),
    }
}

#[test]
fn create_table_columns_and_constraints() {
    let create = create_table(
        "CREATE TABLE IF NOT EXISTS app.users (
            id bigint PRIMARY KEY,
            email varchar(255) NOT NULL UNIQUE,
            team_id int REFERENCES teams (id),
            created_at timestamptz DEFAULT now() NOT NULL,
            tags text[]
        )",
    );
    assert!(create.if_not_exists);
    assert!(!create.temporary);
    assert_eq!(create.name.to_string(), "app.users");
    assert_eq!(create.columns.len(), 5);

    let email = &create.columns[1];
    assert_eq!(email.data_type, DataType::Varchar(Some(255)));
    assert_eq!(
        email.constraints,
        vec![ColumnConstraint::NotNull, ColumnConstraint::Unique]
    );

    let created_at = &create.columns[3];
    assert_eq!(
        created_at.data_type,
        DataType::Timestamp {
            with_time_zone: true
        }
    );
    assert!(matches!(
        created_at.constraints[0],
        ColumnConstraint::Default(_)
    ));
    assert_eq!(
        create.columns[4].data_type,
        DataType::Array(Box::new(DataType::Text))
    );
}

#[test]
fn create_table_canonical_text() {
    assert_eq!(
        canonical("create temp table t (a int not null default 0, b numeric(10,2) null)"),
        "CREATE TEMPORARY TABLE t (a INTEGER NOT NULL DEFAULT 0, b NUMERIC(10, 2) NULL)"
    );
    round_trip(
        "CREATE TABLE t (a character varying(5), b double precision, c time with time zone, d bool REFERENCES u)",
    );
}

#[test]
fn type_aliases_resolve_to_builtins() {
    let create = create_table(
        "CREATE TABLE t (a int2, b int8, c float4, d float8, e float(10), f float(40), g decimal, h jsonb)",
    );
    let types: Vec<_> = create.columns.iter().map(|c| c.data_type.clone()).collect();
    assert_eq!(
        types,
        vec![
            DataType::Smallint,
            DataType::Bigint,
            DataType::Real,
            DataType::DoublePrecision,
            DataType::Real,
            DataType::DoublePrecision,
            DataType::Decimal {
                precision: None,
                scale: None
            },
            DataType::Jsonb,
        ]
    );
}

#[test]
fn drop_table() {
    match parse("DROP TABLE IF EXISTS a, s.b CASCADE") {
        Statement::DropTable(drop) => {
            assert!(drop.if_exists);
            assert_eq!(drop.names.len(), 2);
            assert_eq!(drop.behavior, Some(DropBehavior::Cascade));
        }
        other => panic!("Expected DROP TABLE, got {other:?}"),
    }
    assert_eq!(canonical("drop table t restrict"), "DROP TABLE t RESTRICT");
}

#[test]
fn unsupported_ddl_is_a_syntax_error() {
    let err = parse_err("CREATE INDEX i ON t (a)");
    assert_eq!(err.message, "syntax error at or near \"INDEX\", expected TABLE");
    assert_eq!(err.cursorpos, 8);

    let err = parse_err("CREATE TABLE t (a int CHECK (a > 0))");
    assert!(err.message.contains("\"CHECK\""), "{}", err.message);
}

#[test]
fn ddl_normalizes_defaults() {
    assert_eq!(
        normalize("CREATE TABLE t (a int DEFAULT 42, b text DEFAULT 'x')"),
        "CREATE TABLE t (a INTEGER DEFAULT $1, b TEXT DEFAULT $2)"
    );
}
