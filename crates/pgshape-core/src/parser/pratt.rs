//! Operator precedence for the Pratt expression parser.
//!
//! Levels come from [`precedence`]; the printer reads the same table, so
//! anything parsed here prints back with exactly the parentheses it needs.

use crate::ast::{precedence, BinaryOp, UnaryOp};
use crate::lexer::{Keyword, TokenKind};

/// Returns the precedence of a token in infix or postfix position.
///
/// Returns `None` if the token cannot continue an expression. `NOT` is
/// reported at the predicate level; the parser only treats it as an infix
/// operator when `LIKE`, `ILIKE`, `IN` or `BETWEEN` follows.
#[must_use]
pub fn infix_precedence(kind: &TokenKind) -> Option<u8> {
    let prec = match kind {
        TokenKind::Keyword(Keyword::Or) => precedence::OR,
        TokenKind::Keyword(Keyword::And) => precedence::AND,
        TokenKind::Keyword(Keyword::Is | Keyword::Isnull | Keyword::Notnull) => precedence::IS,
        TokenKind::Eq
        | TokenKind::NotEq
        | TokenKind::Lt
        | TokenKind::LtEq
        | TokenKind::Gt
        | TokenKind::GtEq => precedence::COMPARISON,
        TokenKind::Keyword(
            Keyword::Between | Keyword::In | Keyword::Like | Keyword::Ilike | Keyword::Not,
        ) => precedence::PREDICATE,
        TokenKind::Plus | TokenKind::Minus => precedence::ADDITIVE,
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => precedence::MULTIPLICATIVE,
        TokenKind::Caret => precedence::EXPONENT,
        TokenKind::Keyword(Keyword::Collate) => precedence::COLLATE,
        TokenKind::LeftBracket => precedence::SUBSCRIPT,
        TokenKind::DoubleColon => precedence::CAST,
        TokenKind::Dot => precedence::FIELD,
        kind if token_to_binary_op(kind).is_some() => precedence::OTHER,
        _ => return None,
    };
    Some(prec)
}

/// Returns true if two operators of this level may not be chained.
#[must_use]
pub const fn is_non_associative(prec: u8) -> bool {
    matches!(
        prec,
        precedence::IS | precedence::COMPARISON | precedence::PREDICATE
    )
}

/// Converts a token to a binary operator.
#[must_use]
pub fn token_to_binary_op(kind: &TokenKind) -> Option<BinaryOp> {
    let op = match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Mod,
        TokenKind::Caret => BinaryOp::Pow,
        TokenKind::Eq => BinaryOp::Eq,
        TokenKind::NotEq => BinaryOp::NotEq,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::LtEq => BinaryOp::LtEq,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::GtEq => BinaryOp::GtEq,
        TokenKind::Keyword(Keyword::And) => BinaryOp::And,
        TokenKind::Keyword(Keyword::Or) => BinaryOp::Or,
        TokenKind::Concat => BinaryOp::Concat,
        TokenKind::BitAnd => BinaryOp::BitAnd,
        TokenKind::BitOr => BinaryOp::BitOr,
        TokenKind::BitXor => BinaryOp::BitXor,
        TokenKind::LeftShift => BinaryOp::LeftShift,
        TokenKind::RightShift => BinaryOp::RightShift,
        TokenKind::Tilde => BinaryOp::RegexMatch,
        TokenKind::TildeStar => BinaryOp::RegexIMatch,
        TokenKind::NotTilde => BinaryOp::NotRegexMatch,
        TokenKind::NotTildeStar => BinaryOp::NotRegexIMatch,
        TokenKind::Operator(op) => BinaryOp::Custom(op.clone()),
        _ => return None,
    };
    Some(op)
}

/// Converts a token to a prefix operator.
#[must_use]
pub const fn token_to_unary_op(kind: &TokenKind) -> Option<UnaryOp> {
    match kind {
        TokenKind::Plus => Some(UnaryOp::Plus),
        TokenKind::Minus => Some(UnaryOp::Minus),
        TokenKind::Tilde => Some(UnaryOp::BitNot),
        TokenKind::Keyword(Keyword::Not) => Some(UnaryOp::Not),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prec(kind: TokenKind) -> u8 {
        infix_precedence(&kind).unwrap()
    }

    #[test]
    fn test_precedence_ordering() {
        // Multiplication binds tighter than addition
        assert!(prec(TokenKind::Star) > prec(TokenKind::Plus));
        // AND binds tighter than OR
        assert!(prec(TokenKind::Keyword(Keyword::And)) > prec(TokenKind::Keyword(Keyword::Or)));
        // Comparison binds tighter than AND
        assert!(prec(TokenKind::Eq) > prec(TokenKind::Keyword(Keyword::And)));
        // Concatenation sits between comparison and arithmetic
        assert!(prec(TokenKind::Concat) > prec(TokenKind::Eq));
        assert!(prec(TokenKind::Concat) < prec(TokenKind::Plus));
        // LIKE binds tighter than =
        assert!(prec(TokenKind::Keyword(Keyword::Like)) > prec(TokenKind::Eq));
        // IS binds looser than =
        assert!(prec(TokenKind::Keyword(Keyword::Is)) < prec(TokenKind::Eq));
        assert!(prec(TokenKind::DoubleColon) > prec(TokenKind::LeftBracket));
    }

    #[test]
    fn test_user_operators_share_a_level() {
        assert_eq!(
            prec(TokenKind::Operator(String::from("->>"))),
            precedence::OTHER
        );
        assert_eq!(prec(TokenKind::BitAnd), precedence::OTHER);
        assert_eq!(infix_precedence(&TokenKind::Comma), None);
        assert_eq!(infix_precedence(&TokenKind::Keyword(Keyword::From)), None);
    }

    #[test]
    fn test_non_associative_levels() {
        assert!(is_non_associative(prec(TokenKind::Lt)));
        assert!(is_non_associative(prec(TokenKind::Keyword(Keyword::Between))));
        assert!(!is_non_associative(prec(TokenKind::Plus)));
        assert!(!is_non_associative(prec(TokenKind::Keyword(Keyword::And))));
    }

    #[test]
    fn test_token_to_binary_op() {
        assert_eq!(token_to_binary_op(&TokenKind::Plus), Some(BinaryOp::Add));
        assert_eq!(token_to_binary_op(&TokenKind::Minus), Some(BinaryOp::Sub));
        assert_eq!(token_to_binary_op(&TokenKind::Eq), Some(BinaryOp::Eq));
        assert_eq!(
            token_to_binary_op(&TokenKind::Operator(String::from("@>"))),
            Some(BinaryOp::Custom(String::from("@>")))
        );
        assert_eq!(token_to_binary_op(&TokenKind::LeftParen), None);
    }

    #[test]
    fn test_token_to_unary_op() {
        assert_eq!(token_to_unary_op(&TokenKind::Minus), Some(UnaryOp::Minus));
        assert_eq!(
            token_to_unary_op(&TokenKind::Keyword(Keyword::Not)),
            Some(UnaryOp::Not)
        );
        assert_eq!(token_to_unary_op(&TokenKind::Tilde), Some(UnaryOp::BitNot));
        assert_eq!(token_to_unary_op(&TokenKind::Star), None);
    }
}
