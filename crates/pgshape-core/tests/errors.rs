//! Tests for diagnostics: messages, cursor positions and limits.

mod common;
use common::*;

use pgshape_core::{ErrorKind, ParserOptions};

#[test]
fn missing_target_list() {
    let err = parse_err("SELECT FROM");
    assert_eq!(
        err.message,
        "syntax error at or near \"FROM\", expected target list"
    );
    assert_eq!(err.cursorpos, 8);
    assert_eq!(err.kind, ErrorKind::Syntax);
}

#[test]
fn token_is_quoted_as_written() {
    let err = parse_err("select * frum t");
    assert!(
        err.message.starts_with("syntax error at or near \"frum\""),
        "{}",
        err.message
    );
    assert_eq!(err.cursorpos, 10);
}

#[test]
fn cursor_counts_characters_not_bytes() {
    let err = parse_err("SELECT 'é', 'ü' 'x'");
    assert_eq!(err.cursorpos, 17);
    let err = parse_err("SELECT \"表\" FROM FROM");
    assert_eq!(err.cursorpos, 17);
}

#[test]
fn end_of_input_points_past_the_last_character() {
    for sql in ["SELECT (", "SELECT a FROM", "SELECT 'ü' +", "INSERT INTO t VALUES (1"] {
        let err = parse_err(sql);
        assert!(
            err.message.starts_with("syntax error at end of input"),
            "{sql}: {}",
            err.message
        );
        assert_eq!(err.cursorpos, sql.chars().count() + 1, "{sql}");
    }
}

#[test]
fn lexical_errors() {
    let err = parse_err("SELECT 'abc");
    assert_eq!(err.kind, ErrorKind::Lexical);
    assert_eq!(err.message, "unterminated quoted string at or near \"'abc\"");
    assert_eq!(err.cursorpos, 8);

    let err = parse_err("SELECT 1 /* open");
    assert_eq!(err.kind, ErrorKind::Lexical);
    assert_eq!(err.cursorpos, 10);

    let err = parse_err("SELECT B'012'");
    assert_eq!(err.kind, ErrorKind::Lexical);
    assert_eq!(err.message, "\"2\" is not a valid binary digit");
}

#[test]
fn statements_must_be_separated() {
    let err = parse_err("SELECT 1 SELECT 2");
    assert_eq!(
        err.message,
        "syntax error at or near \"SELECT\", expected \";\" or end of input"
    );
    assert_eq!(err.cursorpos, 10);
}

#[test]
fn unknown_statement() {
    let err = parse_err("VACUUM t");
    assert!(err.message.starts_with("syntax error at or near \"VACUUM\""));
    assert_eq!(err.cursorpos, 1);
}

#[test]
fn nesting_limit_has_no_position() {
    let sql = format!("SELECT {}1{}", "(".repeat(20), ")".repeat(20));
    let result = pgshape_core::parse_with_options(&sql, ParserOptions::new().with_max_depth(10));
    let err = result.error.unwrap();
    assert_eq!(err.kind, ErrorKind::Structure);
    assert_eq!(err.message, "stack depth limit exceeded");
    assert_eq!(err.cursorpos, 0);

    let shallow = pgshape_core::parse_with_options(&sql, ParserOptions::new().with_max_depth(64));
    assert!(shallow.is_ok());
}

#[test]
fn deep_input_is_rejected_with_default_limit() {
    // Debug builds use large frames; give the parser room to reach the limit.
    let handle = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(|| {
            let sql = format!("SELECT {}1{}", "(".repeat(10_000), ")".repeat(10_000));
            let err = pgshape_core::parse(&sql).error.unwrap();
            assert_eq!(err.kind, ErrorKind::Structure);
            assert_eq!(err.cursorpos, 0);

            let sql = format!("SELECT {}1", "- ".repeat(10_000));
            let err = pgshape_core::parse(&sql).error.unwrap();
            assert_eq!(err.kind, ErrorKind::Structure);
        })
        .unwrap();
    handle.join().unwrap();
}

#[test]
fn long_chains_are_rejected_with_default_limit() {
    let handle = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(|| {
            let chains = [
                format!("SELECT 1{}", " + 1".repeat(10_000)),
                format!("SELECT true{}", " AND true".repeat(10_000)),
                format!("SELECT 'a'{}", " || 'a'".repeat(10_000)),
                format!("SELECT 1{}", "::int".repeat(10_000)),
                format!("SELECT a{}", "[1]".repeat(10_000)),
                format!("SELECT a::int{}", "[]".repeat(10_000)),
                format!("SELECT 1{}", " UNION SELECT 1".repeat(10_000)),
                format!("SELECT 1{}", " INTERSECT SELECT 1".repeat(10_000)),
                format!("SELECT * FROM t{}", " JOIN t ON true".repeat(10_000)),
                format!("SELECT {}1{}", "(".repeat(10_000), " + 1)".repeat(10_000)),
            ];
            for sql in &chains {
                let head = &sql[..40];
                let err = pgshape_core::parse(sql)
                    .error
                    .unwrap_or_else(|| panic!("Expected an error for {head}..."));
                assert_eq!(err.kind, ErrorKind::Structure, "{head}...");
                assert_eq!(err.message, "stack depth limit exceeded");
                assert_eq!(err.cursorpos, 0);

                let result = pgshape_core::normalize(sql);
                assert!(result.normalized_query.is_none(), "{head}...");
            }

            // Groups nested on the left count their own levels once.
            let sql = format!("SELECT {}1{}", "(".repeat(50), " + 1)".repeat(50));
            assert!(pgshape_core::parse(&sql).is_ok());
        })
        .unwrap();
    handle.join().unwrap();
}

#[test]
fn chains_within_the_limit_print_and_serialize() {
    let sql = format!("SELECT 1{}", " + 1".repeat(119));
    let normalized = normalize(&sql);
    assert!(normalized.starts_with("SELECT $1 + $2 + $3"));
    assert!(normalized.ends_with("+ $120"));
    assert!(parse_tree(&sql).to_json().is_ok());

    let sql = format!("SELECT 1{}", " UNION ALL SELECT 1".repeat(99));
    assert_eq!(normalize(&sql).matches("UNION ALL").count(), 99);

    let sql = format!("SELECT * FROM t0{}", " CROSS JOIN t".repeat(99));
    round_trip(&sql);
}

#[test]
fn truncated_queries_fail_at_or_before_the_cut() {
    let sql = "SELECT a, count(*) FROM t JOIN u ON t.id = u.id WHERE b IN (1, 2) GROUP BY a";
    for (end, _) in sql.char_indices().skip(1) {
        let prefix = &sql[..end];
        let result = pgshape_core::parse(prefix);
        if let Some(err) = result.error {
            assert!(
                err.cursorpos >= 1 && err.cursorpos <= prefix.chars().count() + 1,
                "{prefix}: cursor {}",
                err.cursorpos
            );
            assert!(result.parse_tree.is_none());
        }
    }
}

#[test]
fn identifier_truncation_is_reported_as_a_notice() {
    let long = "a".repeat(70);
    let result = pgshape_core::parse(&format!("SELECT {long} FROM t"));
    assert!(result.error.is_none());
    assert_eq!(
        result.stderr_buffer,
        format!(
            "NOTICE:  identifier \"{long}\" will be truncated to \"{}\"\n",
            "a".repeat(63)
        )
    );
    let tree = result.parse_tree.unwrap();
    assert_eq!(tree.to_string(), format!("SELECT {} FROM t", "a".repeat(63)));
}

#[test]
fn notices_survive_a_failed_parse() {
    let long = "b".repeat(64);
    let result = pgshape_core::parse(&format!("SELECT {long} FROM"));
    assert!(result.error.is_some());
    assert!(result.stderr_buffer.starts_with("NOTICE:  identifier"));
}
