//! Variable reference resolution.
//!
//! Rewrites every raw variable operand into a reference bound to its declaration. A
//! non-parameter variable without a declaration means the declaration step missed it; the
//! method is failed rather than emitted with an unbound name.

use rustc_hash::FxHashSet;

use crate::{
    ast::{for_each_expr, for_each_stmt, rewrite_exprs, DecompiledMethod, Expr, Stmt, VariableId},
    compiler::pass::{AstPass, PassContext},
    Error, Result,
};

/// Binds raw variable operands to their declarations.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntroduceReferencesPass;

impl AstPass for IntroduceReferencesPass {
    fn name(&self) -> &'static str {
        "introduce-references"
    }

    fn description(&self) -> &'static str {
        "Resolves raw variable operands into declared variable references"
    }

    fn run(&self, method: &mut DecompiledMethod, ctx: &PassContext<'_>) -> Result<usize> {
        let mut bound: FxHashSet<VariableId> = method
            .variables
            .iter()
            .filter(|(_, variable)| variable.is_parameter)
            .map(|(id, _)| id)
            .collect();
        for_each_stmt(&method.body, &mut |stmt| {
            if let Stmt::Declare { variable, .. } = stmt {
                bound.insert(*variable);
            }
        });

        let mut unbound: Option<VariableId> = None;
        for_each_expr(&method.body, &mut |expr| {
            if let Expr::Variable(id) = expr {
                if unbound.is_none() && !bound.contains(id) {
                    unbound = Some(*id);
                }
            }
        });
        if let Some(id) = unbound {
            return Err(Error::Transform {
                pass: self.name(),
                method: ctx.method.to_string(),
                message: format!(
                    "variable '{}' is used without a declaration",
                    method.variables.name_of(id)
                ),
            });
        }

        let mut resolved = 0;
        rewrite_exprs(&mut method.body, &mut |expr| {
            if let Expr::Variable(id) = expr {
                *expr = Expr::VariableRef(*id);
                resolved += 1;
            }
        });
        Ok(resolved)
    }
}
