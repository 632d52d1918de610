//! Tree traversal helpers.
//!
//! Expression walks recurse along the expression structure, which is as deep as the source
//! expression. Statement walks use an explicit stack, since decompiled bodies can nest blocks
//! arbitrarily deep.

use crate::ast::{Block, Expr, Stmt};

/// Visits `expr` and all of its descendants, parents before children, in evaluation order.
pub fn walk_expr<'a>(expr: &'a Expr, f: &mut impl FnMut(&'a Expr)) {
    f(expr);
    for child in expr.children() {
        walk_expr(child, f);
    }
}

/// Visits `expr` and all of its descendants mutably, children before parents.
///
/// Rewrites performed by `f` on a node are not revisited.
pub fn walk_expr_mut(expr: &mut Expr, f: &mut impl FnMut(&mut Expr)) {
    for child in expr.children_mut() {
        walk_expr_mut(child, f);
    }
    f(expr);
}

/// Visits every statement of `block`, nested blocks included, in source order.
pub(crate) fn for_each_stmt<'a>(block: &'a Block, f: &mut impl FnMut(&'a Stmt)) {
    let mut stack: Vec<std::slice::Iter<'a, Stmt>> = vec![block.statements.iter()];

    while let Some(top) = stack.last_mut() {
        let Some(stmt) = top.next() else {
            stack.pop();
            continue;
        };
        f(stmt);
        for nested in stmt.blocks().into_iter().rev() {
            stack.push(nested.statements.iter());
        }
    }
}

/// Visits every block reachable from `block` (itself included) mutably, outer blocks first.
pub(crate) fn for_each_block_mut(block: &mut Block, f: &mut impl FnMut(&mut Block)) {
    let mut stack: Vec<&mut Block> = vec![block];

    while let Some(current) = stack.pop() {
        f(current);
        for stmt in current.statements.iter_mut().rev() {
            for nested in stmt.blocks_mut().into_iter().rev() {
                stack.push(nested);
            }
        }
    }
}

/// Visits every statement of `block`, nested blocks included, mutably.
pub(crate) fn for_each_stmt_mut(block: &mut Block, f: &mut impl FnMut(&mut Stmt)) {
    for_each_block_mut(block, &mut |current| {
        for stmt in &mut current.statements {
            f(stmt);
        }
    });
}

/// Visits every expression node in `block`, nested blocks included.
pub(crate) fn for_each_expr<'a>(block: &'a Block, f: &mut impl FnMut(&'a Expr)) {
    for_each_stmt(block, &mut |stmt| {
        for expr in stmt.expressions() {
            walk_expr(expr, f);
        }
    });
}

/// Rewrites every expression node in `block` bottom-up.
pub(crate) fn rewrite_exprs(block: &mut Block, f: &mut impl FnMut(&mut Expr)) {
    for_each_stmt_mut(block, &mut |stmt| {
        for expr in stmt.expressions_mut() {
            walk_expr_mut(expr, f);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOp, VariableTable};
    use crate::metadata::signatures::TypeSignature;

    fn nested_body() -> (Block, VariableTable) {
        let mut variables = VariableTable::new();
        let x = variables.local("x", TypeSignature::I4);

        let inner = Block::of(vec![Stmt::Expr(Expr::assign(
            Expr::Variable(x),
            Expr::int(2),
        ))]);
        let body = Block::of(vec![
            Stmt::Expr(Expr::assign(Expr::Variable(x), Expr::int(1))),
            Stmt::If {
                condition: Expr::binary(BinaryOp::Lt, Expr::Variable(x), Expr::int(5)),
                then: inner,
                otherwise: None,
            },
            Stmt::Return(Some(Expr::Variable(x))),
        ]);
        (body, variables)
    }

    #[test]
    fn test_statement_order() {
        let (body, _) = nested_body();
        let mut kinds = Vec::new();
        for_each_stmt(&body, &mut |stmt| {
            kinds.push(match stmt {
                Stmt::Expr(_) => "expr",
                Stmt::If { .. } => "if",
                Stmt::Return(_) => "return",
                _ => "other",
            });
        });
        assert_eq!(kinds, vec!["expr", "if", "expr", "return"]);
    }

    #[test]
    fn test_rewrite_reaches_nested_blocks() {
        let (mut body, _) = nested_body();
        rewrite_exprs(&mut body, &mut |expr| {
            if let Expr::Variable(id) = expr {
                *expr = Expr::VariableRef(*id);
            }
        });

        let mut raw = 0;
        for_each_expr(&body, &mut |expr| {
            if matches!(expr, Expr::Variable(_)) {
                raw += 1;
            }
        });
        assert_eq!(raw, 0);
    }
}
