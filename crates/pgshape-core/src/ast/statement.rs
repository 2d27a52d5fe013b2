//! SQL statement AST types.

use serde::Serialize;

use super::expression::{Expr, FunctionCall};
use super::types::{ColumnDef, ObjectName};
use crate::lexer::Span;

/// Order direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum OrderDirection {
    /// Ascending order (default).
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl OrderDirection {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Null ordering for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NullOrdering {
    /// NULLs come first.
    First,
    /// NULLs come last.
    Last,
}

impl NullOrdering {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::First => "NULLS FIRST",
            Self::Last => "NULLS LAST",
        }
    }
}

/// An ORDER BY clause entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderBy {
    /// The expression to order by.
    pub expr: Expr,
    /// The direction, when written.
    pub direction: Option<OrderDirection>,
    /// Sort operator from `USING op`; set instead of a direction.
    pub using: Option<String>,
    /// Null ordering (optional).
    pub nulls: Option<NullOrdering>,
    /// Source span.
    pub span: Span,
}

/// Join type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JoinType {
    /// INNER JOIN.
    Inner,
    /// LEFT OUTER JOIN.
    Left,
    /// RIGHT OUTER JOIN.
    Right,
    /// FULL OUTER JOIN.
    Full,
    /// CROSS JOIN.
    Cross,
}

impl JoinType {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }
}

/// How the rows of a join are matched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum JoinConstraint {
    /// `ON expr`
    On(Expr),
    /// `USING (a, b)`
    Using(Vec<String>),
    /// NATURAL or CROSS joins.
    None,
}

/// `alias` or `alias (col, ...)` after a FROM item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableAlias {
    /// The alias name.
    pub name: String,
    /// Column aliases.
    pub columns: Vec<String>,
}

impl TableAlias {
    /// Creates an alias without column names.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: vec![],
        }
    }
}

/// A table reference in FROM clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TableRef {
    /// A (possibly qualified) table name.
    Table {
        /// Whether ONLY was written (no inheritance children).
        only: bool,
        /// Table name.
        name: ObjectName,
        /// Alias.
        alias: Option<TableAlias>,
        /// Source span.
        span: Span,
    },
    /// A subquery.
    Subquery {
        /// Whether LATERAL was written.
        lateral: bool,
        /// The subquery.
        query: Box<SelectStatement>,
        /// Alias.
        alias: Option<TableAlias>,
        /// Source span.
        span: Span,
    },
    /// A set-returning function call.
    Function {
        /// Whether LATERAL was written.
        lateral: bool,
        /// The call.
        call: FunctionCall,
        /// Alias.
        alias: Option<TableAlias>,
        /// Source span.
        span: Span,
    },
    /// A joined table.
    Join {
        /// Left side of the join.
        left: Box<TableRef>,
        /// The type of join.
        join_type: JoinType,
        /// Whether NATURAL was written.
        natural: bool,
        /// Right side of the join.
        right: Box<TableRef>,
        /// The join condition.
        constraint: JoinConstraint,
        /// Source span.
        span: Span,
    },
}

impl TableRef {
    /// Returns the source span.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Table { span, .. }
            | Self::Subquery { span, .. }
            | Self::Function { span, .. }
            | Self::Join { span, .. } => *span,
        }
    }

    /// Returns the alias, if one is attached.
    #[must_use]
    pub const fn alias(&self) -> Option<&TableAlias> {
        match self {
            Self::Table { alias, .. }
            | Self::Subquery { alias, .. }
            | Self::Function { alias, .. } => alias.as_ref(),
            Self::Join { .. } => None,
        }
    }
}

/// `DISTINCT` or `DISTINCT ON (...)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Distinct {
    /// `DISTINCT`
    Distinct,
    /// `DISTINCT ON (exprs)`
    On(Vec<Expr>),
}

/// A column in SELECT clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectColumn {
    /// The expression.
    pub expr: Expr,
    /// Column alias.
    pub alias: Option<String>,
    /// Source span.
    pub span: Span,
}

impl SelectColumn {
    /// Creates a new select column spanning its expression.
    #[must_use]
    pub fn new(expr: Expr) -> Self {
        let span = expr.span;
        Self {
            expr,
            alias: None,
            span,
        }
    }
}

/// One `SELECT ... FROM ... WHERE ...` block, without ORDER BY or LIMIT.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectCore {
    /// DISTINCT qualifier.
    pub distinct: Option<Distinct>,
    /// The columns to select.
    pub columns: Vec<SelectColumn>,
    /// The FROM clause, one entry per comma-separated item.
    pub from: Vec<TableRef>,
    /// The WHERE clause.
    pub where_clause: Option<Expr>,
    /// GROUP BY expressions.
    pub group_by: Vec<Expr>,
    /// HAVING clause.
    pub having: Option<Expr>,
    /// Source span.
    pub span: Span,
}

/// `VALUES (...), (...)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Values {
    /// The rows.
    pub rows: Vec<Vec<Expr>>,
    /// Source span.
    pub span: Span,
}

/// UNION, INTERSECT or EXCEPT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SetOperator {
    Union,
    Intersect,
    Except,
}

impl SetOperator {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Union => "UNION",
            Self::Intersect => "INTERSECT",
            Self::Except => "EXCEPT",
        }
    }
}

/// The body of a query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SetExpr {
    /// A SELECT block.
    Select(Box<SelectCore>),
    /// A VALUES list.
    Values(Values),
    /// A parenthesized query.
    Query(Box<SelectStatement>),
    /// `left op [ALL] right`
    SetOperation {
        /// The operator.
        op: SetOperator,
        /// Whether ALL was written.
        all: bool,
        /// Left operand.
        left: Box<SetExpr>,
        /// Right operand.
        right: Box<SetExpr>,
        /// Source span.
        span: Span,
    },
}

impl SetExpr {
    /// Returns the source span.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Select(core) => core.span,
            Self::Values(values) => values.span,
            Self::Query(query) => query.span,
            Self::SetOperation { span, .. } => *span,
        }
    }
}

/// A common table expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cte {
    /// The CTE name.
    pub name: String,
    /// Column names.
    pub columns: Vec<String>,
    /// `Some(true)` for MATERIALIZED, `Some(false)` for NOT MATERIALIZED.
    pub materialized: Option<bool>,
    /// The CTE body.
    pub statement: Box<Statement>,
    /// Source span.
    pub span: Span,
}

/// `WITH [RECURSIVE] cte, ...`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithClause {
    /// Whether RECURSIVE was written.
    pub recursive: bool,
    /// The CTEs.
    pub ctes: Vec<Cte>,
    /// Source span.
    pub span: Span,
}

/// A SELECT statement (any query).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectStatement {
    /// WITH clause.
    pub with: Option<WithClause>,
    /// The query body.
    pub body: SetExpr,
    /// ORDER BY clauses.
    pub order_by: Vec<OrderBy>,
    /// LIMIT clause (also FETCH FIRST).
    pub limit: Option<Expr>,
    /// OFFSET clause.
    pub offset: Option<Expr>,
    /// `FOR UPDATE` / `FOR SHARE` clauses, in written order.
    pub locking: Vec<LockingClause>,
    /// Source span.
    pub span: Span,
}

impl SelectStatement {
    /// Returns the SELECT block when the body is a plain SELECT.
    #[must_use]
    pub fn core(&self) -> Option<&SelectCore> {
        match &self.body {
            SetExpr::Select(core) => Some(core),
            _ => None,
        }
    }

    /// Returns true when the query is just its body: no WITH, ORDER BY,
    /// LIMIT, OFFSET or locking clause.
    #[must_use]
    pub const fn is_bare(&self) -> bool {
        self.with.is_none()
            && self.order_by.is_empty()
            && self.limit.is_none()
            && self.offset.is_none()
            && self.locking.is_empty()
    }
}

/// Row lock strength of a locking clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LockStrength {
    Update,
    NoKeyUpdate,
    Share,
    KeyShare,
}

impl LockStrength {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Update => "FOR UPDATE",
            Self::NoKeyUpdate => "FOR NO KEY UPDATE",
            Self::Share => "FOR SHARE",
            Self::KeyShare => "FOR KEY SHARE",
        }
    }
}

/// What a locking clause does when a row is already locked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LockWait {
    /// `NOWAIT`
    Nowait,
    /// `SKIP LOCKED`
    SkipLocked,
}

impl LockWait {
    /// Returns the SQL representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nowait => "NOWAIT",
            Self::SkipLocked => "SKIP LOCKED",
        }
    }
}

/// `FOR UPDATE [OF t, ...] [NOWAIT | SKIP LOCKED]` and its variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockingClause {
    pub strength: LockStrength,
    /// Tables named after `OF`; empty locks every table in FROM.
    pub of: Vec<ObjectName>,
    pub wait: Option<LockWait>,
    /// Source span.
    pub span: Span,
}

/// Source of data for INSERT.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum InsertSource {
    /// VALUES or SELECT.
    Query(Box<SelectStatement>),
    /// DEFAULT VALUES
    DefaultValues,
}

/// ON CONFLICT clause for UPSERT.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OnConflict {
    /// Conflict target columns.
    pub columns: Vec<String>,
    /// Action to take on conflict.
    pub action: ConflictAction,
}

/// Action to take on conflict.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ConflictAction {
    /// DO NOTHING
    DoNothing,
    /// DO UPDATE SET ... [WHERE ...]
    DoUpdate {
        /// SET assignments.
        assignments: Vec<UpdateAssignment>,
        /// WHERE clause.
        where_clause: Option<Expr>,
    },
}

/// An INSERT statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsertStatement {
    /// WITH clause.
    pub with: Option<WithClause>,
    /// Target table.
    pub table: ObjectName,
    /// Alias.
    pub alias: Option<String>,
    /// Column names (optional).
    pub columns: Vec<String>,
    /// Rows to insert.
    pub source: InsertSource,
    /// ON CONFLICT clause (for UPSERT).
    pub on_conflict: Option<OnConflict>,
    /// RETURNING list.
    pub returning: Vec<SelectColumn>,
    /// Source span.
    pub span: Span,
}

/// The left side of a SET assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AssignmentTarget {
    /// `col = value`
    Column(String),
    /// `(col, ...) = value`, where the value is a row or a sub-SELECT.
    Columns(Vec<String>),
}

/// An assignment in UPDATE SET.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateAssignment {
    /// Assigned column or columns.
    pub target: AssignmentTarget,
    /// Value expression.
    pub value: Expr,
    /// Source span.
    pub span: Span,
}

/// An UPDATE statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateStatement {
    /// WITH clause.
    pub with: Option<WithClause>,
    /// Whether ONLY was written.
    pub only: bool,
    /// Target table.
    pub table: ObjectName,
    /// Alias.
    pub alias: Option<String>,
    /// SET assignments.
    pub assignments: Vec<UpdateAssignment>,
    /// FROM clause (for joins in UPDATE).
    pub from: Vec<TableRef>,
    /// WHERE clause.
    pub where_clause: Option<Expr>,
    /// RETURNING list.
    pub returning: Vec<SelectColumn>,
    /// Source span.
    pub span: Span,
}

/// A DELETE statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteStatement {
    /// WITH clause.
    pub with: Option<WithClause>,
    /// Whether ONLY was written.
    pub only: bool,
    /// Target table.
    pub table: ObjectName,
    /// Alias.
    pub alias: Option<String>,
    /// USING clause.
    pub using: Vec<TableRef>,
    /// WHERE clause.
    pub where_clause: Option<Expr>,
    /// RETURNING list.
    pub returning: Vec<SelectColumn>,
    /// Source span.
    pub span: Span,
}

/// A CREATE TABLE statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateTableStatement {
    /// TEMP / TEMPORARY.
    pub temporary: bool,
    /// IF NOT EXISTS.
    pub if_not_exists: bool,
    /// Table name.
    pub name: ObjectName,
    /// Column definitions.
    pub columns: Vec<ColumnDef>,
    /// Source span.
    pub span: Span,
}

/// CASCADE or RESTRICT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DropBehavior {
    Cascade,
    Restrict,
}

impl DropBehavior {
    /// Returns the SQL keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::Restrict => "RESTRICT",
        }
    }
}

/// A DROP TABLE statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropTableStatement {
    /// IF EXISTS.
    pub if_exists: bool,
    /// Tables to drop.
    pub names: Vec<ObjectName>,
    /// CASCADE / RESTRICT.
    pub behavior: Option<DropBehavior>,
    /// Source span.
    pub span: Span,
}

/// Transaction control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransactionKind {
    /// BEGIN / START TRANSACTION
    Begin,
    /// COMMIT / END
    Commit,
    /// ROLLBACK / ABORT
    Rollback,
}

impl TransactionKind {
    /// Returns the canonical SQL keyword.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Begin => "BEGIN",
            Self::Commit => "COMMIT",
            Self::Rollback => "ROLLBACK",
        }
    }
}

/// A transaction control statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionStatement {
    /// What the statement does.
    pub kind: TransactionKind,
    /// Source span.
    pub span: Span,
}

/// `EXPLAIN [ANALYZE] [VERBOSE] statement`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplainStatement {
    /// ANALYZE.
    pub analyze: bool,
    /// VERBOSE.
    pub verbose: bool,
    /// The explained statement.
    pub statement: Box<Statement>,
    /// Source span.
    pub span: Span,
}

/// A SQL statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    /// SELECT statement.
    Select(SelectStatement),
    /// INSERT statement.
    Insert(InsertStatement),
    /// UPDATE statement.
    Update(UpdateStatement),
    /// DELETE statement.
    Delete(DeleteStatement),
    /// CREATE TABLE statement.
    CreateTable(CreateTableStatement),
    /// DROP TABLE statement.
    DropTable(DropTableStatement),
    /// BEGIN / COMMIT / ROLLBACK.
    Transaction(TransactionStatement),
    /// EXPLAIN statement.
    Explain(ExplainStatement),
}

impl Statement {
    /// Returns the source span.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Select(s) => s.span,
            Self::Insert(s) => s.span,
            Self::Update(s) => s.span,
            Self::Delete(s) => s.span,
            Self::CreateTable(s) => s.span,
            Self::DropTable(s) => s.span,
            Self::Transaction(s) => s.span,
            Self::Explain(s) => s.span,
        }
    }

    /// Returns a short upper-case name for the statement kind.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Select(_) => "SELECT",
            Self::Insert(_) => "INSERT",
            Self::Update(_) => "UPDATE",
            Self::Delete(_) => "DELETE",
            Self::CreateTable(_) => "CREATE TABLE",
            Self::DropTable(_) => "DROP TABLE",
            Self::Transaction(_) => "TRANSACTION",
            Self::Explain(_) => "EXPLAIN",
        }
    }
}

/// One statement of a multi-statement input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawStatement {
    /// The statement.
    pub stmt: Statement,
    /// The statement text, excluding the terminating `;`.
    pub span: Span,
}

/// The result of parsing a query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseTree {
    /// Statements in source order.
    pub statements: Vec<RawStatement>,
}

impl ParseTree {
    /// Returns true when the input held no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// Serializes the tree to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error; the AST itself always serializes.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the tree to indented JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer's error; the AST itself always serializes.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
