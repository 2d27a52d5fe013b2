//! Tree traversal.
//!
//! [`Visitor`] walks a tree by shared reference, [`VisitorMut`] by mutable
//! reference. Every `visit_*` method defaults to the matching `walk_*`
//! function, which visits the node's children left to right in the order the
//! canonical printer emits them (pre-order). Override a method to intercept a
//! node family and call the `walk_*` function to keep descending.

#[allow(clippy::wildcard_imports)]
use super::*;

/// Read-only traversal of a parse tree.
pub trait Visitor {
    fn visit_statement(&mut self, stmt: &Statement) {
        walk_statement(self, stmt);
    }

    fn visit_query(&mut self, query: &SelectStatement) {
        walk_query(self, query);
    }

    fn visit_select(&mut self, select: &SelectCore) {
        walk_select(self, select);
    }

    fn visit_table_ref(&mut self, table: &TableRef) {
        walk_table_ref(self, table);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        walk_expr(self, expr);
    }

    fn visit_literal(&mut self, _literal: &Literal) {}
}

/// Mutating traversal of a parse tree.
pub trait VisitorMut {
    fn visit_statement(&mut self, stmt: &mut Statement) {
        walk_statement_mut(self, stmt);
    }

    fn visit_query(&mut self, query: &mut SelectStatement) {
        walk_query_mut(self, query);
    }

    fn visit_select(&mut self, select: &mut SelectCore) {
        walk_select_mut(self, select);
    }

    fn visit_table_ref(&mut self, table: &mut TableRef) {
        walk_table_ref_mut(self, table);
    }

    fn visit_expr(&mut self, expr: &mut Expr) {
        walk_expr_mut(self, expr);
    }

    fn visit_literal(&mut self, _literal: &mut Literal) {}
}

// ---------------------------------------------------------------------------
// Shared-reference walkers
// ---------------------------------------------------------------------------

pub fn walk_statement<V: Visitor + ?Sized>(visitor: &mut V, stmt: &Statement) {
    match stmt {
        Statement::Select(query) => visitor.visit_query(query),
        Statement::Insert(insert) => {
            walk_with(visitor, insert.with.as_ref());
            if let InsertSource::Query(query) = &insert.source {
                visitor.visit_query(query);
            }
            if let Some(on_conflict) = &insert.on_conflict {
                if let ConflictAction::DoUpdate {
                    assignments,
                    where_clause,
                } = &on_conflict.action
                {
                    for assignment in assignments {
                        visitor.visit_expr(&assignment.value);
                    }
                    if let Some(expr) = where_clause {
                        visitor.visit_expr(expr);
                    }
                }
            }
            walk_columns(visitor, &insert.returning);
        }
        Statement::Update(update) => {
            walk_with(visitor, update.with.as_ref());
            for assignment in &update.assignments {
                visitor.visit_expr(&assignment.value);
            }
            for table in &update.from {
                visitor.visit_table_ref(table);
            }
            if let Some(expr) = &update.where_clause {
                visitor.visit_expr(expr);
            }
            walk_columns(visitor, &update.returning);
        }
        Statement::Delete(delete) => {
            walk_with(visitor, delete.with.as_ref());
            for table in &delete.using {
                visitor.visit_table_ref(table);
            }
            if let Some(expr) = &delete.where_clause {
                visitor.visit_expr(expr);
            }
            walk_columns(visitor, &delete.returning);
        }
        Statement::CreateTable(create) => {
            for column in &create.columns {
                for constraint in &column.constraints {
                    if let ColumnConstraint::Default(expr) = constraint {
                        visitor.visit_expr(expr);
                    }
                }
            }
        }
        Statement::DropTable(_) | Statement::Transaction(_) => {}
        Statement::Explain(explain) => visitor.visit_statement(&explain.statement),
    }
}

fn walk_with<V: Visitor + ?Sized>(visitor: &mut V, with: Option<&WithClause>) {
    if let Some(with) = with {
        for cte in &with.ctes {
            visitor.visit_statement(&cte.statement);
        }
    }
}

fn walk_columns<V: Visitor + ?Sized>(visitor: &mut V, columns: &[SelectColumn]) {
    for column in columns {
        visitor.visit_expr(&column.expr);
    }
}

fn walk_order_by<V: Visitor + ?Sized>(visitor: &mut V, order_by: &[OrderBy]) {
    for item in order_by {
        visitor.visit_expr(&item.expr);
    }
}

pub fn walk_query<V: Visitor + ?Sized>(visitor: &mut V, query: &SelectStatement) {
    walk_with(visitor, query.with.as_ref());
    walk_set_expr(visitor, &query.body);
    walk_order_by(visitor, &query.order_by);
    if let Some(limit) = &query.limit {
        visitor.visit_expr(limit);
    }
    if let Some(offset) = &query.offset {
        visitor.visit_expr(offset);
    }
}

pub fn walk_set_expr<V: Visitor + ?Sized>(visitor: &mut V, body: &SetExpr) {
    match body {
        SetExpr::Select(select) => visitor.visit_select(select),
        SetExpr::Values(values) => {
            for row in &values.rows {
                for expr in row {
                    visitor.visit_expr(expr);
                }
            }
        }
        SetExpr::Query(query) => visitor.visit_query(query),
        SetExpr::SetOperation { left, right, .. } => {
            walk_set_expr(visitor, left);
            walk_set_expr(visitor, right);
        }
    }
}

pub fn walk_select<V: Visitor + ?Sized>(visitor: &mut V, select: &SelectCore) {
    if let Some(Distinct::On(exprs)) = &select.distinct {
        for expr in exprs {
            visitor.visit_expr(expr);
        }
    }
    walk_columns(visitor, &select.columns);
    for table in &select.from {
        visitor.visit_table_ref(table);
    }
    if let Some(expr) = &select.where_clause {
        visitor.visit_expr(expr);
    }
    for expr in &select.group_by {
        visitor.visit_expr(expr);
    }
    if let Some(expr) = &select.having {
        visitor.visit_expr(expr);
    }
}

pub fn walk_table_ref<V: Visitor + ?Sized>(visitor: &mut V, table: &TableRef) {
    match table {
        TableRef::Table { .. } => {}
        TableRef::Subquery { query, .. } => visitor.visit_query(query),
        TableRef::Function { call, .. } => walk_function(visitor, call),
        TableRef::Join {
            left,
            right,
            constraint,
            ..
        } => {
            visitor.visit_table_ref(left);
            visitor.visit_table_ref(right);
            if let JoinConstraint::On(expr) = constraint {
                visitor.visit_expr(expr);
            }
        }
    }
}

fn walk_frame_bound<V: Visitor + ?Sized>(visitor: &mut V, bound: &FrameBound) {
    if let FrameBound::Preceding(expr) | FrameBound::Following(expr) = bound {
        visitor.visit_expr(expr);
    }
}

fn walk_function<V: Visitor + ?Sized>(visitor: &mut V, call: &FunctionCall) {
    for arg in &call.args {
        visitor.visit_expr(arg);
    }
    walk_order_by(visitor, &call.order_by);
    if let Some(filter) = &call.filter {
        visitor.visit_expr(filter);
    }
    if let Some(over) = &call.over {
        for expr in &over.partition_by {
            visitor.visit_expr(expr);
        }
        walk_order_by(visitor, &over.order_by);
        if let Some(frame) = &over.frame {
            walk_frame_bound(visitor, &frame.start);
            if let Some(end) = &frame.end {
                walk_frame_bound(visitor, end);
            }
        }
    }
}

pub fn walk_expr<V: Visitor + ?Sized>(visitor: &mut V, expr: &Expr) {
    match &expr.kind {
        ExprKind::Literal(literal) => visitor.visit_literal(literal),
        ExprKind::Column(_)
        | ExprKind::Wildcard { .. }
        | ExprKind::Param(_)
        | ExprKind::Default
        | ExprKind::ValueFunction(_) => {}
        ExprKind::Unary { expr, .. }
        | ExprKind::Nested(expr)
        | ExprKind::FieldAccess { expr, .. }
        | ExprKind::Cast { expr, .. }
        | ExprKind::Collate { expr, .. }
        | ExprKind::IsNull { expr, .. }
        | ExprKind::IsTruth { expr, .. } => visitor.visit_expr(expr),
        ExprKind::Binary { left, right, .. }
        | ExprKind::Quantified { left, right, .. }
        | ExprKind::IsDistinctFrom { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        ExprKind::Row { exprs, .. } | ExprKind::Array(exprs) => {
            for expr in exprs {
                visitor.visit_expr(expr);
            }
        }
        ExprKind::ArraySubquery(query) | ExprKind::Exists(query) | ExprKind::Subquery(query) => {
            visitor.visit_query(query);
        }
        ExprKind::Subscript { expr, subscript } => {
            visitor.visit_expr(expr);
            match subscript {
                Subscript::Index(index) => visitor.visit_expr(index),
                Subscript::Slice { lower, upper } => {
                    if let Some(lower) = lower {
                        visitor.visit_expr(lower);
                    }
                    if let Some(upper) = upper {
                        visitor.visit_expr(upper);
                    }
                }
            }
        }
        ExprKind::Function(call) => walk_function(visitor, call),
        ExprKind::Case {
            operand,
            when_clauses,
            else_result,
        } => {
            if let Some(operand) = operand {
                visitor.visit_expr(operand);
            }
            for clause in when_clauses {
                visitor.visit_expr(&clause.condition);
                visitor.visit_expr(&clause.result);
            }
            if let Some(else_result) = else_result {
                visitor.visit_expr(else_result);
            }
        }
        ExprKind::InList { expr, list, .. } => {
            visitor.visit_expr(expr);
            for item in list {
                visitor.visit_expr(item);
            }
        }
        ExprKind::InSubquery { expr, subquery, .. } => {
            visitor.visit_expr(expr);
            visitor.visit_query(subquery);
        }
        ExprKind::Between {
            expr, low, high, ..
        } => {
            visitor.visit_expr(expr);
            visitor.visit_expr(low);
            visitor.visit_expr(high);
        }
        ExprKind::Like {
            expr,
            pattern,
            escape,
            ..
        } => {
            visitor.visit_expr(expr);
            visitor.visit_expr(pattern);
            if let Some(escape) = escape {
                visitor.visit_expr(escape);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Mutable walkers
// ---------------------------------------------------------------------------

pub fn walk_statement_mut<V: VisitorMut + ?Sized>(visitor: &mut V, stmt: &mut Statement) {
    match stmt {
        Statement::Select(query) => visitor.visit_query(query),
        Statement::Insert(insert) => {
            walk_with_mut(visitor, insert.with.as_mut());
            if let InsertSource::Query(query) = &mut insert.source {
                visitor.visit_query(query);
            }
            if let Some(on_conflict) = &mut insert.on_conflict {
                if let ConflictAction::DoUpdate {
                    assignments,
                    where_clause,
                } = &mut on_conflict.action
                {
                    for assignment in assignments {
                        visitor.visit_expr(&mut assignment.value);
                    }
                    if let Some(expr) = where_clause {
                        visitor.visit_expr(expr);
                    }
                }
            }
            walk_columns_mut(visitor, &mut insert.returning);
        }
        Statement::Update(update) => {
            walk_with_mut(visitor, update.with.as_mut());
            for assignment in &mut update.assignments {
                visitor.visit_expr(&mut assignment.value);
            }
            for table in &mut update.from {
                visitor.visit_table_ref(table);
            }
            if let Some(expr) = &mut update.where_clause {
                visitor.visit_expr(expr);
            }
            walk_columns_mut(visitor, &mut update.returning);
        }
        Statement::Delete(delete) => {
            walk_with_mut(visitor, delete.with.as_mut());
            for table in &mut delete.using {
                visitor.visit_table_ref(table);
            }
            if let Some(expr) = &mut delete.where_clause {
                visitor.visit_expr(expr);
            }
            walk_columns_mut(visitor, &mut delete.returning);
        }
        Statement::CreateTable(create) => {
            for column in &mut create.columns {
                for constraint in &mut column.constraints {
                    if let ColumnConstraint::Default(expr) = constraint {
                        visitor.visit_expr(expr);
                    }
                }
            }
        }
        Statement::DropTable(_) | Statement::Transaction(_) => {}
        Statement::Explain(explain) => visitor.visit_statement(&mut explain.statement),
    }
}

fn walk_with_mut<V: VisitorMut + ?Sized>(visitor: &mut V, with: Option<&mut WithClause>) {
    if let Some(with) = with {
        for cte in &mut with.ctes {
            visitor.visit_statement(&mut cte.statement);
        }
    }
}

fn walk_columns_mut<V: VisitorMut + ?Sized>(visitor: &mut V, columns: &mut [SelectColumn]) {
    for column in columns {
        visitor.visit_expr(&mut column.expr);
    }
}

fn walk_order_by_mut<V: VisitorMut + ?Sized>(visitor: &mut V, order_by: &mut [OrderBy]) {
    for item in order_by {
        visitor.visit_expr(&mut item.expr);
    }
}

pub fn walk_query_mut<V: VisitorMut + ?Sized>(visitor: &mut V, query: &mut SelectStatement) {
    walk_with_mut(visitor, query.with.as_mut());
    walk_set_expr_mut(visitor, &mut query.body);
    walk_order_by_mut(visitor, &mut query.order_by);
    if let Some(limit) = &mut query.limit {
        visitor.visit_expr(limit);
    }
    if let Some(offset) = &mut query.offset {
        visitor.visit_expr(offset);
    }
}

pub fn walk_set_expr_mut<V: VisitorMut + ?Sized>(visitor: &mut V, body: &mut SetExpr) {
    match body {
        SetExpr::Select(select) => visitor.visit_select(select),
        SetExpr::Values(values) => {
            for row in &mut values.rows {
                for expr in row {
                    visitor.visit_expr(expr);
                }
            }
        }
        SetExpr::Query(query) => visitor.visit_query(query),
        SetExpr::SetOperation { left, right, .. } => {
            walk_set_expr_mut(visitor, left);
            walk_set_expr_mut(visitor, right);
        }
    }
}

pub fn walk_select_mut<V: VisitorMut + ?Sized>(visitor: &mut V, select: &mut SelectCore) {
    if let Some(Distinct::On(exprs)) = &mut select.distinct {
        for expr in exprs {
            visitor.visit_expr(expr);
        }
    }
    walk_columns_mut(visitor, &mut select.columns);
    for table in &mut select.from {
        visitor.visit_table_ref(table);
    }
    if let Some(expr) = &mut select.where_clause {
        visitor.visit_expr(expr);
    }
    for expr in &mut select.group_by {
        visitor.visit_expr(expr);
    }
    if let Some(expr) = &mut select.having {
        visitor.visit_expr(expr);
    }
}

pub fn walk_table_ref_mut<V: VisitorMut + ?Sized>(visitor: &mut V, table: &mut TableRef) {
    match table {
        TableRef::Table { .. } => {}
        TableRef::Subquery { query, .. } => visitor.visit_query(query),
        TableRef::Function { call, .. } => walk_function_mut(visitor, call),
        TableRef::Join {
            left,
            right,
            constraint,
            ..
        } => {
            visitor.visit_table_ref(left);
            visitor.visit_table_ref(right);
            if let JoinConstraint::On(expr) = constraint {
                visitor.visit_expr(expr);
            }
        }
    }
}

fn walk_frame_bound_mut<V: VisitorMut + ?Sized>(visitor: &mut V, bound: &mut FrameBound) {
    if let FrameBound::Preceding(expr) | FrameBound::Following(expr) = bound {
        visitor.visit_expr(expr);
    }
}

fn walk_function_mut<V: VisitorMut + ?Sized>(visitor: &mut V, call: &mut FunctionCall) {
    for arg in &mut call.args {
        visitor.visit_expr(arg);
    }
    walk_order_by_mut(visitor, &mut call.order_by);
    if let Some(filter) = &mut call.filter {
        visitor.visit_expr(filter);
    }
    if let Some(over) = &mut call.over {
        for expr in &mut over.partition_by {
            visitor.visit_expr(expr);
        }
        walk_order_by_mut(visitor, &mut over.order_by);
        if let Some(frame) = &mut over.frame {
            walk_frame_bound_mut(visitor, &mut frame.start);
            if let Some(end) = &mut frame.end {
                walk_frame_bound_mut(visitor, end);
            }
        }
    }
}

pub fn walk_expr_mut<V: VisitorMut + ?Sized>(visitor: &mut V, expr: &mut Expr) {
    match &mut expr.kind {
        ExprKind::Literal(literal) => visitor.visit_literal(literal),
        ExprKind::Column(_)
        | ExprKind::Wildcard { .. }
        | ExprKind::Param(_)
        | ExprKind::Default
        | ExprKind::ValueFunction(_) => {}
        ExprKind::Unary { expr, .. }
        | ExprKind::Nested(expr)
        | ExprKind::FieldAccess { expr, .. }
        | ExprKind::Cast { expr, .. }
        | ExprKind::Collate { expr, .. }
        | ExprKind::IsNull { expr, .. }
        | ExprKind::IsTruth { expr, .. } => visitor.visit_expr(expr),
        ExprKind::Binary { left, right, .. }
        | ExprKind::Quantified { left, right, .. }
        | ExprKind::IsDistinctFrom { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        ExprKind::Row { exprs, .. } | ExprKind::Array(exprs) => {
            for expr in exprs {
                visitor.visit_expr(expr);
            }
        }
        ExprKind::ArraySubquery(query) | ExprKind::Exists(query) | ExprKind::Subquery(query) => {
            visitor.visit_query(query);
        }
        ExprKind::Subscript { expr, subscript } => {
            visitor.visit_expr(expr);
            match subscript {
                Subscript::Index(index) => visitor.visit_expr(index),
                Subscript::Slice { lower, upper } => {
                    if let Some(lower) = lower {
                        visitor.visit_expr(lower);
                    }
                    if let Some(upper) = upper {
                        visitor.visit_expr(upper);
                    }
                }
            }
        }
        ExprKind::Function(call) => walk_function_mut(visitor, call),
        ExprKind::Case {
            operand,
            when_clauses,
            else_result,
        } => {
            if let Some(operand) = operand {
                visitor.visit_expr(operand);
            }
            for clause in when_clauses {
                visitor.visit_expr(&mut clause.condition);
                visitor.visit_expr(&mut clause.result);
            }
            if let Some(else_result) = else_result {
                visitor.visit_expr(else_result);
            }
        }
        ExprKind::InList { expr, list, .. } => {
            visitor.visit_expr(expr);
            for item in list {
                visitor.visit_expr(item);
            }
        }
        ExprKind::InSubquery { expr, subquery, .. } => {
            visitor.visit_expr(expr);
            visitor.visit_query(subquery);
        }
        ExprKind::Between {
            expr, low, high, ..
        } => {
            visitor.visit_expr(expr);
            visitor.visit_expr(low);
            visitor.visit_expr(high);
        }
        ExprKind::Like {
            expr,
            pattern,
            escape,
            ..
        } => {
            visitor.visit_expr(expr);
            visitor.visit_expr(pattern);
            if let Some(escape) = escape {
                visitor.visit_expr(escape);
            }
        }
    }
}
