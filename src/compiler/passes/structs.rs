//! Value-type copy semantics.
//!
//! Assignment in the target runtime shares objects, so reading a struct out of a location and
//! storing it elsewhere must copy it explicitly. Every struct-typed location read that flows into
//! another location (assignment, declaration initializer, call or constructor argument) is
//! wrapped in [`Expr::StructCopy`]. Returned fields and array elements are copied as well;
//! returned locals are not, since the local dies with the frame.

use crate::{
    ast::{rewrite_exprs, for_each_stmt_mut, DecompiledMethod, Expr, Literal, Stmt, VariableTable},
    compiler::pass::{AstPass, PassContext, TypeOracle},
    Result,
};

/// Wraps struct reads that flow into another location in explicit copies.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmulateStructAssignmentPass;

impl EmulateStructAssignmentPass {
    fn is_location(expr: &Expr) -> bool {
        matches!(
            expr,
            Expr::Variable(_) | Expr::VariableRef(_) | Expr::Field { .. } | Expr::ArrayElement { .. }
        )
    }

    fn needs_copy(expr: &Expr, variables: &VariableTable, oracle: &dyn TypeOracle) -> bool {
        Self::is_location(expr)
            && expr
                .ty(variables)
                .is_some_and(|signature| oracle.is_struct(&signature))
    }

    fn wrap(slot: &mut Expr) {
        let inner = std::mem::replace(slot, Expr::Literal(Literal::Null));
        *slot = Expr::StructCopy(Box::new(inner));
    }
}

impl AstPass for EmulateStructAssignmentPass {
    fn name(&self) -> &'static str {
        "emulate-struct-assignment"
    }

    fn description(&self) -> &'static str {
        "Inserts explicit copies where struct values are assigned or passed"
    }

    fn run(&self, method: &mut DecompiledMethod, ctx: &PassContext<'_>) -> Result<usize> {
        let DecompiledMethod {
            variables, body, ..
        } = method;
        let oracle = ctx.oracle;
        let mut copies = 0;

        rewrite_exprs(body, &mut |expr| match expr {
            Expr::Assign {
                op: None, value, ..
            } => {
                if Self::needs_copy(value, variables, oracle) {
                    Self::wrap(value);
                    copies += 1;
                }
            }
            Expr::Call { args, .. } | Expr::New { args, .. } => {
                for arg in args.iter_mut() {
                    if Self::needs_copy(arg, variables, oracle) {
                        Self::wrap(arg);
                        copies += 1;
                    }
                }
            }
            _ => {}
        });

        for_each_stmt_mut(body, &mut |stmt| match stmt {
            Stmt::Declare {
                value: Some(value), ..
            } => {
                if Self::needs_copy(value, variables, oracle) {
                    Self::wrap(value);
                    copies += 1;
                }
            }
            Stmt::Return(Some(value)) => {
                let escapes = matches!(value, Expr::Field { .. } | Expr::ArrayElement { .. });
                if escapes && Self::needs_copy(value, variables, oracle) {
                    Self::wrap(value);
                    copies += 1;
                }
            }
            _ => {}
        });

        Ok(copies)
    }
}
