//! Abstract Syntax Tree (AST) types for PostgreSQL statements.
//!
//! Every node carries the byte [`Span`](crate::lexer::Span) it was parsed
//! from, prints back as canonical SQL through `Display`, and serializes to
//! JSON through `serde`.

mod display;
mod expression;
mod statement;
mod types;
pub mod visit;

pub use expression::{
    precedence, BinaryOp, CastStyle, Expr, ExprKind, FrameBound, FrameUnits, FunctionCall,
    Literal, Quantifier, Subscript, TruthValue, UnaryOp, ValueFunction, WhenClause, WindowFrame,
    WindowSpec,
};
pub use statement::{
    AssignmentTarget, ConflictAction, CreateTableStatement, Cte, DeleteStatement, Distinct,
    DropBehavior, DropTableStatement, ExplainStatement, InsertSource, InsertStatement,
    JoinConstraint, JoinType, LockStrength, LockWait, LockingClause, NullOrdering, OnConflict,
    OrderBy, OrderDirection, ParseTree, RawStatement, SelectColumn, SelectCore, SelectStatement,
    SetExpr, SetOperator, Statement, TableAlias, TableRef, TransactionKind, TransactionStatement,
    UpdateAssignment, UpdateStatement, Values, WithClause,
};
pub use types::{ColumnConstraint, ColumnDef, DataType, IntervalFields, ObjectName};
pub use visit::{Visitor, VisitorMut};
