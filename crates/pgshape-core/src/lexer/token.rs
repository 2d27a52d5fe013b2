//! Token types for the SQL lexer.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use serde::Serialize;

use super::Span;

/// Declares the keyword enum together with its spelling and category.
macro_rules! keywords {
    ($($variant:ident => $text:literal, $category:ident;)*) => {
        /// SQL keywords.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum Keyword {
            $(
                #[doc = concat!("`", $text, "`")]
                $variant,
            )*
        }

        impl Keyword {
            /// Every keyword, in declaration order.
            pub const ALL: &'static [Keyword] = &[$(Self::$variant),*];

            /// Returns the keyword as an upper-case string.
            #[must_use]
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)*
                }
            }

            /// Returns how reserved the keyword is.
            #[must_use]
            pub const fn category(&self) -> KeywordCategory {
                match self {
                    $(Self::$variant => KeywordCategory::$category,)*
                }
            }
        }
    };
}

/// How far a keyword is reserved, following PostgreSQL's classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum KeywordCategory {
    /// Usable anywhere an identifier is.
    Unreserved,
    /// Usable as a column or table name, not always as a function name.
    ColName,
    /// Usable as a function name, but not as a column or table name.
    TypeFuncName,
    /// Never usable as a bare identifier.
    Reserved,
}

keywords! {
    Abort => "ABORT", Unreserved;
    All => "ALL", Reserved;
    Analyze => "ANALYZE", Reserved;
    And => "AND", Reserved;
    Any => "ANY", Reserved;
    Array => "ARRAY", Reserved;
    As => "AS", Reserved;
    Asc => "ASC", Reserved;
    Asymmetric => "ASYMMETRIC", Reserved;
    Begin => "BEGIN", Unreserved;
    Between => "BETWEEN", ColName;
    Bigint => "BIGINT", ColName;
    Bit => "BIT", ColName;
    Boolean => "BOOLEAN", ColName;
    By => "BY", Unreserved;
    Cascade => "CASCADE", Unreserved;
    Case => "CASE", Reserved;
    Cast => "CAST", Reserved;
    Char => "CHAR", ColName;
    Character => "CHARACTER", ColName;
    Check => "CHECK", Reserved;
    Collate => "COLLATE", Reserved;
    Commit => "COMMIT", Unreserved;
    Conflict => "CONFLICT", Unreserved;
    Constraint => "CONSTRAINT", Reserved;
    Create => "CREATE", Reserved;
    Cross => "CROSS", TypeFuncName;
    Current => "CURRENT", Unreserved;
    CurrentDate => "CURRENT_DATE", Reserved;
    CurrentRole => "CURRENT_ROLE", Reserved;
    CurrentTime => "CURRENT_TIME", Reserved;
    CurrentTimestamp => "CURRENT_TIMESTAMP", Reserved;
    CurrentUser => "CURRENT_USER", Reserved;
    Day => "DAY", Unreserved;
    Decimal => "DECIMAL", ColName;
    Default => "DEFAULT", Reserved;
    Delete => "DELETE", Unreserved;
    Desc => "DESC", Reserved;
    Distinct => "DISTINCT", Reserved;
    Do => "DO", Reserved;
    Double => "DOUBLE", Unreserved;
    Drop => "DROP", Unreserved;
    Else => "ELSE", Reserved;
    End => "END", Reserved;
    Escape => "ESCAPE", Unreserved;
    Except => "EXCEPT", Reserved;
    Exists => "EXISTS", ColName;
    Explain => "EXPLAIN", Unreserved;
    False => "FALSE", Reserved;
    Fetch => "FETCH", Reserved;
    Filter => "FILTER", Unreserved;
    First => "FIRST", Unreserved;
    Float => "FLOAT", ColName;
    Following => "FOLLOWING", Unreserved;
    For => "FOR", Reserved;
    Foreign => "FOREIGN", Reserved;
    From => "FROM", Reserved;
    Full => "FULL", TypeFuncName;
    Group => "GROUP", Reserved;
    Having => "HAVING", Reserved;
    Hour => "HOUR", Unreserved;
    If => "IF", Unreserved;
    Ilike => "ILIKE", TypeFuncName;
    In => "IN", Reserved;
    Inner => "INNER", TypeFuncName;
    Insert => "INSERT", Unreserved;
    Int => "INT", ColName;
    Integer => "INTEGER", ColName;
    Intersect => "INTERSECT", Reserved;
    Interval => "INTERVAL", ColName;
    Into => "INTO", Reserved;
    Is => "IS", TypeFuncName;
    Isnull => "ISNULL", TypeFuncName;
    Join => "JOIN", TypeFuncName;
    Key => "KEY", Unreserved;
    Last => "LAST", Unreserved;
    Lateral => "LATERAL", Reserved;
    Left => "LEFT", TypeFuncName;
    Like => "LIKE", TypeFuncName;
    Limit => "LIMIT", Reserved;
    Localtime => "LOCALTIME", Reserved;
    Localtimestamp => "LOCALTIMESTAMP", Reserved;
    Locked => "LOCKED", Unreserved;
    Materialized => "MATERIALIZED", Unreserved;
    Minute => "MINUTE", Unreserved;
    Month => "MONTH", Unreserved;
    Natural => "NATURAL", TypeFuncName;
    Next => "NEXT", Unreserved;
    No => "NO", Unreserved;
    Not => "NOT", Reserved;
    Nothing => "NOTHING", Unreserved;
    Notnull => "NOTNULL", TypeFuncName;
    Nowait => "NOWAIT", Unreserved;
    Null => "NULL", Reserved;
    Nulls => "NULLS", Unreserved;
    Numeric => "NUMERIC", ColName;
    Of => "OF", Unreserved;
    Offset => "OFFSET", Reserved;
    On => "ON", Reserved;
    Only => "ONLY", Reserved;
    Or => "OR", Reserved;
    Order => "ORDER", Reserved;
    Outer => "OUTER", TypeFuncName;
    Over => "OVER", Unreserved;
    Partition => "PARTITION", Unreserved;
    Preceding => "PRECEDING", Unreserved;
    Precision => "PRECISION", ColName;
    Primary => "PRIMARY", Reserved;
    Range => "RANGE", Unreserved;
    Real => "REAL", ColName;
    Recursive => "RECURSIVE", Unreserved;
    References => "REFERENCES", Reserved;
    Restrict => "RESTRICT", Unreserved;
    Returning => "RETURNING", Reserved;
    Right => "RIGHT", TypeFuncName;
    Rollback => "ROLLBACK", Unreserved;
    Row => "ROW", ColName;
    Rows => "ROWS", Unreserved;
    Second => "SECOND", Unreserved;
    Select => "SELECT", Reserved;
    SessionUser => "SESSION_USER", Reserved;
    Set => "SET", Unreserved;
    Share => "SHARE", Unreserved;
    Skip => "SKIP", Unreserved;
    Smallint => "SMALLINT", ColName;
    Some => "SOME", Reserved;
    Start => "START", Unreserved;
    Symmetric => "SYMMETRIC", Reserved;
    Table => "TABLE", Reserved;
    Temp => "TEMP", Unreserved;
    Temporary => "TEMPORARY", Unreserved;
    Then => "THEN", Reserved;
    Time => "TIME", ColName;
    Timestamp => "TIMESTAMP", ColName;
    To => "TO", Reserved;
    Transaction => "TRANSACTION", Unreserved;
    True => "TRUE", Reserved;
    Unbounded => "UNBOUNDED", Unreserved;
    Union => "UNION", Reserved;
    Unique => "UNIQUE", Reserved;
    Unknown => "UNKNOWN", Unreserved;
    Update => "UPDATE", Unreserved;
    User => "USER", Reserved;
    Using => "USING", Reserved;
    Values => "VALUES", ColName;
    Varchar => "VARCHAR", ColName;
    Variadic => "VARIADIC", Reserved;
    Varying => "VARYING", Unreserved;
    Verbose => "VERBOSE", TypeFuncName;
    When => "WHEN", Reserved;
    Where => "WHERE", Reserved;
    Window => "WINDOW", Reserved;
    With => "WITH", Reserved;
    Without => "WITHOUT", Unreserved;
    Work => "WORK", Unreserved;
    Year => "YEAR", Unreserved;
    Zone => "ZONE", Unreserved;
}

/// Lower-case spelling to keyword, built once per process.
static KEYWORD_TABLE: OnceLock<HashMap<String, Keyword>> = OnceLock::new();

/// Returns the process-wide keyword table, building it on first use.
pub(crate) fn keyword_table() -> &'static HashMap<String, Keyword> {
    KEYWORD_TABLE.get_or_init(|| {
        Keyword::ALL
            .iter()
            .map(|kw| (kw.as_str().to_ascii_lowercase(), *kw))
            .collect()
    })
}

impl Keyword {
    /// Looks up a keyword (case-insensitive).
    #[must_use]
    pub fn lookup(s: &str) -> Option<Self> {
        let table = keyword_table();
        if s.bytes().any(|b| b.is_ascii_uppercase()) {
            table.get(&s.to_ascii_lowercase()).copied()
        } else {
            table.get(s).copied()
        }
    }

    /// Returns true if the keyword can never be used as a bare identifier.
    #[must_use]
    pub const fn is_reserved(&self) -> bool {
        matches!(self.category(), KeywordCategory::Reserved)
    }

    /// Returns true if the keyword may stand in for a column or table name.
    #[must_use]
    pub const fn is_col_id(&self) -> bool {
        matches!(
            self.category(),
            KeywordCategory::Unreserved | KeywordCategory::ColName
        )
    }

    /// Returns true if the keyword may be used as a function name.
    #[must_use]
    pub const fn is_function_name(&self) -> bool {
        !self.is_reserved()
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TokenKind {
    // Literals
    /// Integer literal that fits in an `i64` (e.g., 42)
    Integer(i64),
    /// Any other numeric literal, kept as written (e.g., 3.14, 1e10)
    Numeric(String),
    /// String literal, already unescaped (e.g., 'hello', E'a\tb', $$x$$)
    String(String),
    /// Bit string literal with its radix prefix (e.g., b0101, x1F)
    BitString(String),
    /// Positional parameter (e.g., $1)
    Param(u32),

    // Identifiers and keywords
    /// Unquoted identifier, folded to lower case
    Identifier(String),
    /// Double-quoted identifier, case preserved
    QuotedIdentifier(String),
    /// SQL keyword
    Keyword(Keyword),

    // Operators
    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// ^
    Caret,
    /// =
    Eq,
    /// != or <>
    NotEq,
    /// <
    Lt,
    /// <=
    LtEq,
    /// >
    Gt,
    /// >=
    GtEq,
    /// ||
    Concat,
    /// &
    BitAnd,
    /// |
    BitOr,
    /// #
    BitXor,
    /// ~
    Tilde,
    /// ~*
    TildeStar,
    /// !~
    NotTilde,
    /// !~*
    NotTildeStar,
    /// <<
    LeftShift,
    /// >>
    RightShift,
    /// Any other operator spelling (e.g., @>, ->>)
    Operator(String),

    // Delimiters
    /// (
    LeftParen,
    /// )
    RightParen,
    /// [
    LeftBracket,
    /// ]
    RightBracket,
    /// ,
    Comma,
    /// ;
    Semicolon,
    /// .
    Dot,
    /// :
    Colon,
    /// ::
    DoubleColon,

    // Special
    /// End of input
    Eof,
}

impl TokenKind {
    /// Maps an operator spelling to its token kind.
    #[must_use]
    pub fn from_operator(op: &str) -> Self {
        match op {
            "+" => Self::Plus,
            "-" => Self::Minus,
            "*" => Self::Star,
            "/" => Self::Slash,
            "%" => Self::Percent,
            "^" => Self::Caret,
            "=" => Self::Eq,
            "<>" | "!=" => Self::NotEq,
            "<" => Self::Lt,
            "<=" => Self::LtEq,
            ">" => Self::Gt,
            ">=" => Self::GtEq,
            "||" => Self::Concat,
            "&" => Self::BitAnd,
            "|" => Self::BitOr,
            "#" => Self::BitXor,
            "~" => Self::Tilde,
            "~*" => Self::TildeStar,
            "!~" => Self::NotTilde,
            "!~*" => Self::NotTildeStar,
            "<<" => Self::LeftShift,
            ">>" => Self::RightShift,
            other => Self::Operator(other.to_string()),
        }
    }

    /// Returns true if this token is an identifier, quoted or not.
    #[must_use]
    pub const fn is_identifier(&self) -> bool {
        matches!(self, Self::Identifier(_) | Self::QuotedIdentifier(_))
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(n) => write!(f, "{n}"),
            Self::Numeric(n) => f.write_str(n),
            Self::String(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Self::BitString(s) => {
                let (radix, digits) = s.split_at(1);
                write!(f, "{}'{digits}'", radix.to_ascii_uppercase())
            }
            Self::Param(n) => write!(f, "${n}"),
            Self::Identifier(name) => f.write_str(name),
            Self::QuotedIdentifier(name) => write!(f, "\"{}\"", name.replace('"', "\"\"")),
            Self::Keyword(kw) => f.write_str(kw.as_str()),
            Self::Plus => f.write_str("+"),
            Self::Minus => f.write_str("-"),
            Self::Star => f.write_str("*"),
            Self::Slash => f.write_str("/"),
            Self::Percent => f.write_str("%"),
            Self::Caret => f.write_str("^"),
            Self::Eq => f.write_str("="),
            Self::NotEq => f.write_str("<>"),
            Self::Lt => f.write_str("<"),
            Self::LtEq => f.write_str("<="),
            Self::Gt => f.write_str(">"),
            Self::GtEq => f.write_str(">="),
            Self::Concat => f.write_str("||"),
            Self::BitAnd => f.write_str("&"),
            Self::BitOr => f.write_str("|"),
            Self::BitXor => f.write_str("#"),
            Self::Tilde => f.write_str("~"),
            Self::TildeStar => f.write_str("~*"),
            Self::NotTilde => f.write_str("!~"),
            Self::NotTildeStar => f.write_str("!~*"),
            Self::LeftShift => f.write_str("<<"),
            Self::RightShift => f.write_str(">>"),
            Self::Operator(op) => f.write_str(op),
            Self::LeftParen => f.write_str("("),
            Self::RightParen => f.write_str(")"),
            Self::LeftBracket => f.write_str("["),
            Self::RightBracket => f.write_str("]"),
            Self::Comma => f.write_str(","),
            Self::Semicolon => f.write_str(";"),
            Self::Dot => f.write_str("."),
            Self::Colon => f.write_str(":"),
            Self::DoubleColon => f.write_str("::"),
            Self::Eof => f.write_str("end of input"),
        }
    }
}

/// A token with its span in the source code.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The location in the source code.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns true if this is a keyword.
    #[must_use]
    pub const fn is_keyword(&self) -> bool {
        matches!(self.kind, TokenKind::Keyword(_))
    }

    /// Returns the keyword if this is a keyword token.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match &self.kind {
            TokenKind::Keyword(kw) => Some(*kw),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(Keyword::lookup("SELECT"), Some(Keyword::Select));
        assert_eq!(Keyword::lookup("select"), Some(Keyword::Select));
        assert_eq!(Keyword::lookup("SeLeCt"), Some(Keyword::Select));
        assert_eq!(Keyword::lookup("current_date"), Some(Keyword::CurrentDate));
        assert_eq!(Keyword::lookup("not_a_keyword"), None);
    }

    #[test]
    fn test_keyword_as_str() {
        assert_eq!(Keyword::Select.as_str(), "SELECT");
        assert_eq!(Keyword::From.as_str(), "FROM");
        assert_eq!(Keyword::SessionUser.as_str(), "SESSION_USER");
    }

    #[test]
    fn test_every_keyword_round_trips_through_the_table() {
        for kw in Keyword::ALL {
            assert_eq!(Keyword::lookup(kw.as_str()), Some(*kw), "{kw:?}");
        }
        assert_eq!(keyword_table().len(), Keyword::ALL.len());
    }

    #[test]
    fn test_keyword_categories() {
        assert!(Keyword::Select.is_reserved());
        assert!(!Keyword::Key.is_reserved());
        assert!(Keyword::Key.is_col_id());
        assert!(Keyword::Integer.is_col_id());
        assert!(!Keyword::Left.is_col_id());
        assert!(Keyword::Left.is_function_name());
        assert!(!Keyword::From.is_function_name());
    }

    #[test]
    fn test_from_operator() {
        assert_eq!(TokenKind::from_operator("<>"), TokenKind::NotEq);
        assert_eq!(TokenKind::from_operator("!="), TokenKind::NotEq);
        assert_eq!(TokenKind::from_operator("!~*"), TokenKind::NotTildeStar);
        assert_eq!(
            TokenKind::from_operator("@>"),
            TokenKind::Operator(String::from("@>"))
        );
    }

    #[test]
    fn test_token_is_eof() {
        let eof = Token::new(TokenKind::Eof, Span::new(0, 0));
        let select = Token::new(TokenKind::Keyword(Keyword::Select), Span::new(0, 6));
        assert!(eof.is_eof());
        assert!(!select.is_eof());
    }

    #[test]
    fn test_token_as_keyword() {
        let select = Token::new(TokenKind::Keyword(Keyword::Select), Span::new(0, 6));
        let plus = Token::new(TokenKind::Plus, Span::new(0, 1));
        assert_eq!(select.as_keyword(), Some(Keyword::Select));
        assert_eq!(plus.as_keyword(), None);
    }
}
