//! Literal-to-placeholder normalization.
//!
//! Every literal constant in a parse tree is replaced by a positional
//! parameter. Numbering continues after the highest `$n` the query already
//! uses and follows the order in which the printer emits nodes, so printing
//! a normalized tree and normalizing it again changes nothing.

use crate::ast::visit::{walk_expr, walk_expr_mut, walk_statement_mut};
use crate::ast::{Expr, ExprKind, ParseTree, Visitor, VisitorMut};
use crate::error::{ErrorKind, QueryError};

/// Finds the highest positional parameter in a tree.
#[derive(Default)]
struct MaxParam(u32);

impl Visitor for MaxParam {
    fn visit_expr(&mut self, expr: &Expr) {
        if let ExprKind::Param(index) = expr.kind {
            self.0 = self.0.max(index);
        }
        walk_expr(self, expr);
    }
}

/// Highest parameter number the lexer accepts back.
const MAX_PARAM: u32 = i32::MAX.unsigned_abs();

/// Replaces literals with consecutive parameters.
struct Parameterize {
    next: u32,
    replaced: usize,
    overflowed: bool,
}

impl VisitorMut for Parameterize {
    fn visit_expr(&mut self, expr: &mut Expr) {
        if !matches!(expr.kind, ExprKind::Literal(_)) {
            walk_expr_mut(self, expr);
            return;
        }
        if self.next > MAX_PARAM {
            self.overflowed = true;
            return;
        }
        expr.kind = ExprKind::Param(self.next);
        self.next += 1;
        self.replaced += 1;
    }
}

/// Replaces every literal in `tree` with a `$N` parameter, returning the
/// number of literals replaced.
///
/// # Errors
///
/// Fails when a parameter number would exceed the largest one the lexer
/// accepts.
pub fn parameterize(tree: &mut ParseTree) -> Result<usize, QueryError> {
    let mut max = MaxParam::default();
    for raw in &tree.statements {
        max.visit_statement(&raw.stmt);
    }

    let mut rewriter = Parameterize {
        next: max.0 + 1,
        replaced: 0,
        overflowed: false,
    };
    for raw in &mut tree.statements {
        walk_statement_mut(&mut rewriter, &mut raw.stmt);
    }

    if rewriter.overflowed {
        return Err(QueryError::new(
            "parameter number out of range",
            QueryError::NO_POSITION,
            ErrorKind::Structure,
        ));
    }
    Ok(rewriter.replaced)
}
