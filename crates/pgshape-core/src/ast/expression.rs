//! Expression AST types.

use serde::Serialize;

use super::{DataType, ObjectName, OrderBy, SelectStatement};
use crate::lexer::Span;

/// Operator precedence levels, higher binds tighter.
pub mod precedence {
    /// `OR`
    pub const OR: u8 = 2;
    /// `AND`
    pub const AND: u8 = 3;
    /// Prefix `NOT`
    pub const NOT: u8 = 4;
    /// `IS ...`, `ISNULL`, `NOTNULL`
    pub const IS: u8 = 5;
    /// `<` `>` `=` `<=` `>=` `<>`
    pub const COMPARISON: u8 = 6;
    /// `BETWEEN`, `IN`, `LIKE`, `ILIKE`
    pub const PREDICATE: u8 = 7;
    /// Any other operator, including prefix `~`
    pub const OTHER: u8 = 8;
    /// Binary `+` `-`
    pub const ADDITIVE: u8 = 9;
    /// `*` `/` `%`
    pub const MULTIPLICATIVE: u8 = 10;
    /// `^`
    pub const EXPONENT: u8 = 11;
    /// `COLLATE`
    pub const COLLATE: u8 = 12;
    /// Prefix `+` `-`
    pub const UNARY: u8 = 13;
    /// `[ ]`
    pub const SUBSCRIPT: u8 = 14;
    /// `::`
    pub const CAST: u8 = 15;
    /// `.` field selection
    pub const FIELD: u8 = 16;
    /// Literals, names, calls and bracketed forms.
    pub const ATOM: u8 = 17;
}

/// A literal value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    /// Integer literal that fits in an `i64`.
    Integer(i64),
    /// Any other number, kept exactly as written.
    Numeric(String),
    /// String literal (unescaped contents).
    String(String),
    /// Bit string literal with its radix prefix (`b0101`, `x1F`).
    BitString(String),
    /// Boolean literal.
    Boolean(bool),
    /// NULL literal.
    Null,
}

impl Literal {
    /// Returns true for numeric literals carrying a leading minus sign.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        match self {
            Self::Integer(n) => *n < 0,
            Self::Numeric(text) => text.starts_with('-'),
            _ => false,
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,

    // String
    Concat,

    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    LeftShift,
    RightShift,

    // Pattern matching
    RegexMatch,
    RegexIMatch,
    NotRegexMatch,
    NotRegexIMatch,

    /// Any other operator spelling (e.g. `->>`, `@>`).
    Custom(String),
}

impl BinaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Pow => "^",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Concat => "||",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "#",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
            Self::RegexMatch => "~",
            Self::RegexIMatch => "~*",
            Self::NotRegexMatch => "!~",
            Self::NotRegexIMatch => "!~*",
            Self::Custom(op) => op,
        }
    }

    /// Returns the precedence of the operator (higher = binds tighter).
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Or => precedence::OR,
            Self::And => precedence::AND,
            Self::Eq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => {
                precedence::COMPARISON
            }
            Self::Add | Self::Sub => precedence::ADDITIVE,
            Self::Mul | Self::Div | Self::Mod => precedence::MULTIPLICATIVE,
            Self::Pow => precedence::EXPONENT,
            _ => precedence::OTHER,
        }
    }

    /// Returns true for the six comparison operators.
    #[must_use]
    pub const fn is_comparison(&self) -> bool {
        self.precedence() == precedence::COMPARISON
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    /// Identity (+)
    Plus,
    /// Negation (-)
    Minus,
    /// Logical NOT
    Not,
    /// Bitwise NOT (~)
    BitNot,
}

impl UnaryOp {
    /// Returns the SQL representation of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Not => "NOT",
            Self::BitNot => "~",
        }
    }

    /// Returns the precedence of the operator.
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Plus | Self::Minus => precedence::UNARY,
            Self::Not => precedence::NOT,
            Self::BitNot => precedence::OTHER,
        }
    }
}

/// `ANY`, `SOME` or `ALL` after a comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Quantifier {
    Any,
    Some,
    All,
}

impl Quantifier {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "ANY",
            Self::Some => "SOME",
            Self::All => "ALL",
        }
    }
}

/// Right-hand side of `IS [NOT] ...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TruthValue {
    True,
    False,
    Unknown,
}

impl TruthValue {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::Unknown => "UNKNOWN",
        }
    }
}

/// How a cast was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CastStyle {
    /// `CAST(expr AS type)`
    Function,
    /// `expr::type`
    DoubleColon,
    /// `type 'literal'`
    Prefix,
}

/// SQL value functions that take no parentheses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValueFunction {
    CurrentDate,
    CurrentTime,
    CurrentTimestamp,
    LocalTime,
    LocalTimestamp,
    CurrentUser,
    CurrentRole,
    SessionUser,
    User,
}

impl ValueFunction {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CurrentDate => "CURRENT_DATE",
            Self::CurrentTime => "CURRENT_TIME",
            Self::CurrentTimestamp => "CURRENT_TIMESTAMP",
            Self::LocalTime => "LOCALTIME",
            Self::LocalTimestamp => "LOCALTIMESTAMP",
            Self::CurrentUser => "CURRENT_USER",
            Self::CurrentRole => "CURRENT_ROLE",
            Self::SessionUser => "SESSION_USER",
            Self::User => "USER",
        }
    }
}

/// A `WHEN ... THEN ...` arm of a CASE expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WhenClause {
    pub condition: Expr,
    pub result: Expr,
}

/// What goes between the brackets of a subscript.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Subscript {
    /// `expr[i]`
    Index(Box<Expr>),
    /// `expr[lower:upper]`, either bound may be omitted.
    Slice {
        lower: Option<Box<Expr>>,
        upper: Option<Box<Expr>>,
    },
}

/// A function call expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionCall {
    /// The function name, possibly schema-qualified.
    pub name: ObjectName,
    /// The arguments.
    pub args: Vec<Expr>,
    /// Whether DISTINCT was specified.
    pub distinct: bool,
    /// Whether the argument list was `*` (as in `count(*)`).
    pub star: bool,
    /// Whether the last argument was passed with `VARIADIC`.
    pub variadic: bool,
    /// ORDER BY inside the argument list (ordered-set aggregates).
    pub order_by: Vec<OrderBy>,
    /// `FILTER (WHERE ...)`
    pub filter: Option<Box<Expr>>,
    /// `OVER (...)`
    pub over: Option<WindowSpec>,
}

impl FunctionCall {
    /// Creates a plain call with positional arguments.
    #[must_use]
    pub fn new(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Self {
            name: ObjectName::new(name),
            args,
            distinct: false,
            star: false,
            variadic: false,
            order_by: vec![],
            filter: None,
            over: None,
        }
    }
}

/// A window specification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowSpec {
    pub partition_by: Vec<Expr>,
    pub order_by: Vec<OrderBy>,
    pub frame: Option<WindowFrame>,
}

/// `ROWS` or `RANGE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FrameUnits {
    Rows,
    Range,
}

impl FrameUnits {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rows => "ROWS",
            Self::Range => "RANGE",
        }
    }
}

/// A window frame clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowFrame {
    pub units: FrameUnits,
    pub start: FrameBound,
    /// Set when written as `BETWEEN start AND end`.
    pub end: Option<FrameBound>,
}

/// One end of a window frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FrameBound {
    UnboundedPreceding,
    Preceding(Box<Expr>),
    CurrentRow,
    Following(Box<Expr>),
    UnboundedFollowing,
}

/// An SQL expression together with its source span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    /// What the expression is.
    pub kind: ExprKind,
    /// Source span.
    pub span: Span,
}

/// The shape of an expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprKind {
    /// A literal value.
    Literal(Literal),

    /// A column reference, possibly qualified (`t.col`, `s.t.col`).
    Column(ObjectName),

    /// `*` or `t.*`.
    Wildcard {
        /// Table qualifier (optional).
        table: Option<ObjectName>,
    },

    /// A positional parameter (`$1`).
    Param(u32),

    /// `DEFAULT` in a VALUES row or SET clause.
    Default,

    /// A unary expression.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        expr: Box<Expr>,
    },

    /// A binary expression.
    Binary {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expr>,
    },

    /// Parenthesized expression.
    Nested(Box<Expr>),

    /// `ROW(a, b)` or `(a, b)`.
    Row {
        /// The fields.
        exprs: Vec<Expr>,
        /// Whether the ROW keyword was written.
        explicit: bool,
    },

    /// `ARRAY[...]`
    Array(Vec<Expr>),

    /// `ARRAY(SELECT ...)`
    ArraySubquery(Box<SelectStatement>),

    /// `expr[...]`
    Subscript {
        /// The array expression.
        expr: Box<Expr>,
        /// Index or slice.
        subscript: Subscript,
    },

    /// `(expr).field`
    FieldAccess {
        /// The composite expression.
        expr: Box<Expr>,
        /// Field name.
        field: String,
    },

    /// A function call.
    Function(FunctionCall),

    /// A cast, in any of its spellings.
    Cast {
        /// Expression to cast.
        expr: Box<Expr>,
        /// Target type.
        data_type: DataType,
        /// How the cast was written.
        style: CastStyle,
    },

    /// `expr COLLATE collation`
    Collate {
        expr: Box<Expr>,
        collation: ObjectName,
    },

    /// CASE expression.
    Case {
        /// The operand (if any).
        operand: Option<Box<Expr>>,
        /// WHEN/THEN clauses.
        when_clauses: Vec<WhenClause>,
        /// ELSE clause.
        else_result: Option<Box<Expr>>,
    },

    /// `EXISTS (SELECT ...)`
    Exists(Box<SelectStatement>),

    /// A scalar subquery.
    Subquery(Box<SelectStatement>),

    /// `expr [NOT] IN (a, b, ...)`
    InList {
        expr: Box<Expr>,
        list: Vec<Expr>,
        negated: bool,
    },

    /// `expr [NOT] IN (SELECT ...)`
    InSubquery {
        expr: Box<Expr>,
        subquery: Box<SelectStatement>,
        negated: bool,
    },

    /// `left op ANY|SOME|ALL (right)`; `right` is a subquery or an array.
    Quantified {
        left: Box<Expr>,
        op: BinaryOp,
        quantifier: Quantifier,
        right: Box<Expr>,
    },

    /// `expr [NOT] BETWEEN low AND high`
    Between {
        expr: Box<Expr>,
        low: Box<Expr>,
        high: Box<Expr>,
        negated: bool,
        /// `BETWEEN SYMMETRIC`: the bounds may come in either order.
        symmetric: bool,
    },

    /// `expr [NOT] LIKE|ILIKE pattern [ESCAPE escape]`
    Like {
        expr: Box<Expr>,
        pattern: Box<Expr>,
        escape: Option<Box<Expr>>,
        negated: bool,
        case_insensitive: bool,
    },

    /// `expr IS [NOT] NULL`, `ISNULL`, `NOTNULL`
    IsNull { expr: Box<Expr>, negated: bool },

    /// `expr IS [NOT] TRUE|FALSE|UNKNOWN`
    IsTruth {
        expr: Box<Expr>,
        value: TruthValue,
        negated: bool,
    },

    /// `left IS [NOT] DISTINCT FROM right`
    IsDistinctFrom {
        left: Box<Expr>,
        right: Box<Expr>,
        negated: bool,
    },

    /// `CURRENT_DATE`, `CURRENT_USER`, ...
    ValueFunction(ValueFunction),
}

impl Expr {
    /// Creates an expression from its kind and span.
    #[must_use]
    pub const fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Creates a new column reference.
    #[must_use]
    pub fn column(name: impl Into<String>) -> Self {
        Self::new(ExprKind::Column(ObjectName::new(name)), Span::default())
    }

    /// Creates a new integer literal.
    #[must_use]
    pub const fn integer(value: i64) -> Self {
        Self::new(ExprKind::Literal(Literal::Integer(value)), Span::new(0, 0))
    }

    /// Creates a new string literal.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::new(
            ExprKind::Literal(Literal::String(value.into())),
            Span::default(),
        )
    }

    /// Creates a NULL literal.
    #[must_use]
    pub const fn null() -> Self {
        Self::new(ExprKind::Literal(Literal::Null), Span::new(0, 0))
    }

    /// Creates a positional parameter.
    #[must_use]
    pub const fn param(index: u32) -> Self {
        Self::new(ExprKind::Param(index), Span::new(0, 0))
    }

    /// Creates a binary expression spanning both operands.
    #[must_use]
    pub fn binary(self, op: BinaryOp, right: Self) -> Self {
        let span = self.span.merge(right.span);
        Self::new(
            ExprKind::Binary {
                left: Box::new(self),
                op,
                right: Box::new(right),
            },
            span,
        )
    }

    /// Creates an equality expression.
    #[must_use]
    pub fn eq(self, right: Self) -> Self {
        self.binary(BinaryOp::Eq, right)
    }

    /// Creates an AND expression.
    #[must_use]
    pub fn and(self, right: Self) -> Self {
        self.binary(BinaryOp::And, right)
    }

    /// Creates an OR expression.
    #[must_use]
    pub fn or(self, right: Self) -> Self {
        self.binary(BinaryOp::Or, right)
    }

    /// Returns the literal if this is a literal expression.
    #[must_use]
    pub const fn as_literal(&self) -> Option<&Literal> {
        match &self.kind {
            ExprKind::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Returns the precedence level this expression prints at.
    ///
    /// Parentheses are transparent: a nested expression has the precedence
    /// of its contents.
    #[must_use]
    pub fn precedence(&self) -> u8 {
        match &self.kind {
            ExprKind::Nested(inner) => inner.precedence(),
            ExprKind::Literal(lit) if lit.is_negative() => precedence::UNARY,
            ExprKind::Binary { op, .. } => op.precedence(),
            ExprKind::Unary { op, .. } => op.precedence(),
            ExprKind::InList { .. }
            | ExprKind::InSubquery { .. }
            | ExprKind::Between { .. }
            | ExprKind::Like { .. } => precedence::PREDICATE,
            ExprKind::Quantified { .. } => precedence::COMPARISON,
            ExprKind::IsNull { .. } | ExprKind::IsTruth { .. } | ExprKind::IsDistinctFrom { .. } => {
                precedence::IS
            }
            ExprKind::Cast { expr, style, .. } => {
                if *style == CastStyle::Function || prints_as_prefix_cast(*style, expr) {
                    precedence::ATOM
                } else {
                    precedence::CAST
                }
            }
            ExprKind::Collate { .. } => precedence::COLLATE,
            ExprKind::Subscript { .. } => precedence::SUBSCRIPT,
            ExprKind::FieldAccess { .. } => precedence::FIELD,
            _ => precedence::ATOM,
        }
    }
}

/// A prefix cast only round-trips while its operand is still a string literal.
pub(crate) fn prints_as_prefix_cast(style: CastStyle, expr: &Expr) -> bool {
    style == CastStyle::Prefix && matches!(expr.kind, ExprKind::Literal(Literal::String(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_op_precedence() {
        assert!(BinaryOp::Mul.precedence() > BinaryOp::Add.precedence());
        assert!(BinaryOp::And.precedence() > BinaryOp::Or.precedence());
        assert!(BinaryOp::Eq.precedence() > BinaryOp::And.precedence());
        assert!(BinaryOp::Add.precedence() > BinaryOp::Concat.precedence());
        assert!(BinaryOp::Concat.precedence() > BinaryOp::Eq.precedence());
        assert_eq!(
            BinaryOp::Custom(String::from("->>")).precedence(),
            precedence::OTHER
        );
    }

    #[test]
    fn test_expr_builders() {
        let col = Expr::column("name");
        assert!(matches!(&col.kind, ExprKind::Column(name) if name.to_string() == "name"));

        let lit = Expr::integer(42);
        assert_eq!(lit.as_literal(), Some(&Literal::Integer(42)));
    }

    #[test]
    fn test_expr_chaining() {
        let expr = Expr::column("age")
            .eq(Expr::integer(18))
            .and(Expr::column("status").eq(Expr::string("active")));

        assert!(matches!(
            expr.kind,
            ExprKind::Binary {
                op: BinaryOp::And,
                ..
            }
        ));
    }

    #[test]
    fn test_nested_is_transparent() {
        let sum = Expr::column("a").binary(BinaryOp::Add, Expr::column("b"));
        let nested = Expr::new(ExprKind::Nested(Box::new(sum)), Span::default());
        assert_eq!(nested.precedence(), precedence::ADDITIVE);
    }

    #[test]
    fn test_negative_literal_prints_as_unary() {
        let lit = Expr::integer(-5);
        assert_eq!(lit.precedence(), precedence::UNARY);
        assert_eq!(Expr::integer(5).precedence(), precedence::ATOM);
    }
}
