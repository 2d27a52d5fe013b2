//! Tests for the public lexer API.

use pgshape_core::lexer::{tokenize, Keyword, KeywordCategory, Lexer, Span, TokenKind};

fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input)
        .unwrap()
        .into_iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn tokenizes_a_statement() {
    assert_eq!(
        kinds("SELECT Id, \"Name\" FROM t WHERE x >= $1::int4;"),
        vec![
            TokenKind::Keyword(Keyword::Select),
            TokenKind::Identifier(String::from("id")),
            TokenKind::Comma,
            TokenKind::QuotedIdentifier(String::from("Name")),
            TokenKind::Keyword(Keyword::From),
            TokenKind::Identifier(String::from("t")),
            TokenKind::Keyword(Keyword::Where),
            TokenKind::Identifier(String::from("x")),
            TokenKind::GtEq,
            TokenKind::Param(1),
            TokenKind::DoubleColon,
            TokenKind::Identifier(String::from("int4")),
            TokenKind::Semicolon,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn spans_are_byte_ranges() {
    let input = "SELECT 'é' AS x";
    let tokens = tokenize(input).unwrap();
    assert_eq!(tokens[1].span, Span::new(7, 11));
    assert_eq!(tokens[1].span.slice(input), "'é'");
    assert_eq!(tokens[2].span.cursor_position(input), 12);
    let eof = tokens.last().unwrap();
    assert!(eof.is_eof());
    assert_eq!(eof.span.start, input.len());
}

#[test]
fn keyword_categories() {
    assert_eq!(Keyword::lookup("select"), Some(Keyword::Select));
    assert_eq!(Keyword::lookup("SeLeCt"), Some(Keyword::Select));
    assert_eq!(Keyword::Select.category(), KeywordCategory::Reserved);
    assert_eq!(Keyword::Left.category(), KeywordCategory::TypeFuncName);
    assert_eq!(Keyword::Cascade.category(), KeywordCategory::Unreserved);
    assert_eq!(Keyword::lookup("users"), None);
}

#[test]
fn iterator_stops_after_the_first_error() {
    let results: Vec<_> = Lexer::new("SELECT 'open").collect();
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    let err = results[1].as_ref().unwrap_err();
    assert_eq!(err.span.start, 7);
}

#[test]
fn comments_and_whitespace_are_skipped() {
    assert_eq!(
        kinds("/* outer /* inner */ */ SELECT -- trailing\n\t1"),
        vec![
            TokenKind::Keyword(Keyword::Select),
            TokenKind::Integer(1),
            TokenKind::Eof,
        ]
    );
}

#[test]
fn notices_are_collected_by_the_lexer() {
    let long = "x".repeat(64);
    let mut lexer = Lexer::new(&long);
    let token = lexer.next_token().unwrap();
    assert_eq!(token.kind, TokenKind::Identifier("x".repeat(63)));
    let notices = lexer.take_notices();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].starts_with("NOTICE:  identifier"));
    assert!(lexer.take_notices().is_empty());
}
