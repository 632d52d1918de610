//! Operator folding.
//!
//! Runs last in the pipeline, after temporary elimination and reference resolution have
//! produced the final expression shapes. Rules, applied bottom-up until none matches a node:
//!
//! | Before          | After     |
//! |-----------------|-----------|
//! | `x = x op y`    | `x op= y` |
//! | `x += 1`        | `++x`     |
//! | `x -= 1`        | `--x`     |
//! | `!!b` (boolean) | `b`       |
//! | `!(a == b)`     | `a != b`  |
//! | `!(a != b)`     | `a == b`  |
//!
//! Compound forms are only introduced for variable targets, where evaluating the target twice
//! cannot be observed.

use crate::{
    ast::{rewrite_exprs, BinaryOp, DecompiledMethod, Expr, Literal, UnaryOp, VariableTable},
    compiler::pass::{AstPass, PassContext},
    metadata::signatures::TypeSignature,
    Result,
};

/// Folds composable operator expressions.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimplifyOperatorsPass;

impl SimplifyOperatorsPass {
    /// Applies one rule to `expr`; returns `true` if it changed.
    fn simplify_once(expr: &mut Expr, variables: &VariableTable) -> bool {
        let replacement = match expr {
            Expr::Assign {
                op: None,
                target,
                value,
            } => {
                let Some(id) = target.as_variable() else {
                    return false;
                };
                match &mut **value {
                    Expr::Binary { op, left, right }
                        if op.is_compoundable() && left.as_variable() == Some(id) =>
                    {
                        let right = std::mem::replace(&mut **right, Expr::Literal(Literal::Null));
                        Expr::Assign {
                            op: Some(*op),
                            target: Box::new(std::mem::replace(
                                &mut **target,
                                Expr::Literal(Literal::Null),
                            )),
                            value: Box::new(right),
                        }
                    }
                    _ => return false,
                }
            }
            Expr::Assign {
                op: Some(op @ (BinaryOp::Add | BinaryOp::Sub)),
                target,
                value,
            } if target.as_variable().is_some()
                && matches!(&**value, Expr::Literal(Literal::Int(1))) =>
            {
                let unary = if *op == BinaryOp::Add {
                    UnaryOp::PreIncrement
                } else {
                    UnaryOp::PreDecrement
                };
                Expr::unary(
                    unary,
                    std::mem::replace(&mut **target, Expr::Literal(Literal::Null)),
                )
            }
            Expr::Unary {
                op: UnaryOp::Not,
                operand,
            } => match &mut **operand {
                Expr::Unary {
                    op: UnaryOp::Not,
                    operand: inner,
                } if inner.ty(variables) == Some(TypeSignature::Boolean) => {
                    std::mem::replace(&mut **inner, Expr::Literal(Literal::Null))
                }
                Expr::Binary {
                    op: op @ (BinaryOp::Eq | BinaryOp::Ne),
                    left,
                    right,
                } => {
                    let negated = if *op == BinaryOp::Eq {
                        BinaryOp::Ne
                    } else {
                        BinaryOp::Eq
                    };
                    Expr::binary(
                        negated,
                        std::mem::replace(&mut **left, Expr::Literal(Literal::Null)),
                        std::mem::replace(&mut **right, Expr::Literal(Literal::Null)),
                    )
                }
                _ => return false,
            },
            _ => return false,
        };

        *expr = replacement;
        true
    }
}

impl AstPass for SimplifyOperatorsPass {
    fn name(&self) -> &'static str {
        "simplify-operators"
    }

    fn description(&self) -> &'static str {
        "Folds assignments and negations into compound operator forms"
    }

    fn run(&self, method: &mut DecompiledMethod, _ctx: &PassContext<'_>) -> Result<usize> {
        let DecompiledMethod {
            variables, body, ..
        } = method;
        let mut folded = 0;

        rewrite_exprs(body, &mut |expr| {
            while Self::simplify_once(expr, variables) {
                folded += 1;
            }
        });
        Ok(folded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{Block, Stmt},
        test::run_pass,
    };

    fn run(method: &mut DecompiledMethod) -> usize {
        run_pass(&SimplifyOperatorsPass, method)
    }

    #[test]
    fn test_increment_folding() {
        let mut method = DecompiledMethod::new();
        let i = method.variables.local("i", TypeSignature::I4);
        let n = method.variables.local("n", TypeSignature::I4);

        method.body = Block::of(vec![
            Stmt::Expr(Expr::assign(
                Expr::VariableRef(i),
                Expr::binary(BinaryOp::Add, Expr::VariableRef(i), Expr::int(1)),
            )),
            Stmt::Expr(Expr::assign(
                Expr::VariableRef(n),
                Expr::binary(BinaryOp::Mul, Expr::VariableRef(n), Expr::int(3)),
            )),
        ]);

        assert_eq!(run(&mut method), 3);
        assert_eq!(method.to_string(), "++i;\nn *= 3;\n");
        assert_eq!(run(&mut method), 0);
    }

    #[test]
    fn test_non_commuted_operand_is_left_alone() {
        let mut method = DecompiledMethod::new();
        let i = method.variables.local("i", TypeSignature::I4);
        let j = method.variables.local("j", TypeSignature::I4);

        method.body = Block::of(vec![Stmt::Expr(Expr::assign(
            Expr::VariableRef(i),
            Expr::binary(BinaryOp::Sub, Expr::VariableRef(j), Expr::VariableRef(i)),
        ))]);

        assert_eq!(run(&mut method), 0);
    }

    #[test]
    fn test_negation_folding() {
        let mut method = DecompiledMethod::new();
        let flag = method.variables.local("flag", TypeSignature::Boolean);
        let a = method.variables.local("a", TypeSignature::I4);

        method.body = Block::of(vec![
            Stmt::Return(Some(Expr::unary(
                UnaryOp::Not,
                Expr::unary(UnaryOp::Not, Expr::VariableRef(flag)),
            ))),
            Stmt::Return(Some(Expr::unary(
                UnaryOp::Not,
                Expr::binary(BinaryOp::Eq, Expr::VariableRef(a), Expr::int(0)),
            ))),
        ]);

        assert_eq!(run(&mut method), 2);
        assert_eq!(method.to_string(), "return flag;\nreturn (a != 0);\n");
    }
}
