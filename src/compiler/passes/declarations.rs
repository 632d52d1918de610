//! Declaration insertion.
//!
//! The target language scopes variables to the function, so one declaration at the top level of
//! the body, ahead of the statement holding the first occurrence, covers every later use. When
//! that statement is itself a plain assignment to the variable, the assignment becomes the
//! declaration's initializer. Struct variables declared without an initializer start out as
//! their default value so field writes have an object to land on.

use rustc_hash::FxHashSet;

use crate::{
    ast::{for_each_expr, for_each_stmt, walk_expr, DecompiledMethod, Expr, Stmt, VariableId},
    compiler::pass::{AstPass, PassContext},
    Result,
};

/// Introduces a declaration for every variable at its first use.
#[derive(Debug, Default, Clone, Copy)]
pub struct IntroduceDeclarationsPass;

impl IntroduceDeclarationsPass {
    /// Variables occurring in `stmt`, nested blocks included, in first-occurrence order.
    fn occurrences(stmt: &Stmt) -> Vec<VariableId> {
        let mut found = Vec::new();
        let mut record = |expr: &Expr| {
            if let Some(id) = expr.as_variable() {
                if !found.contains(&id) {
                    found.push(id);
                }
            }
        };

        for expr in stmt.expressions() {
            walk_expr(expr, &mut record);
        }
        for block in stmt.blocks() {
            for_each_expr(block, &mut record);
        }
        found
    }
}

impl AstPass for IntroduceDeclarationsPass {
    fn name(&self) -> &'static str {
        "introduce-declarations"
    }

    fn description(&self) -> &'static str {
        "Declares every local at the statement of its first use"
    }

    fn run(&self, method: &mut DecompiledMethod, ctx: &PassContext<'_>) -> Result<usize> {
        let mut declared: FxHashSet<VariableId> = FxHashSet::default();
        for_each_stmt(&method.body, &mut |stmt| {
            if let Stmt::Declare { variable, .. } = stmt {
                declared.insert(*variable);
            }
        });
        for (id, variable) in method.variables.iter() {
            if variable.is_parameter {
                declared.insert(id);
            }
        }

        let statements = std::mem::take(&mut method.body.statements);
        let mut rewritten = Vec::with_capacity(statements.len());
        let mut introduced = 0;

        for stmt in statements {
            let fresh: Vec<VariableId> = Self::occurrences(&stmt)
                .into_iter()
                .filter(|id| declared.insert(*id))
                .collect();
            if fresh.is_empty() {
                rewritten.push(stmt);
                continue;
            }
            introduced += fresh.len();

            let initialized = stmt
                .as_variable_assignment()
                .filter(|(id, value)| {
                    fresh.contains(id) && {
                        let mut mentions = false;
                        walk_expr(value, &mut |expr| {
                            mentions |= expr.as_variable() == Some(*id);
                        });
                        !mentions
                    }
                })
                .map(|(id, _)| id);

            for id in fresh.iter().copied().filter(|id| Some(*id) != initialized) {
                let value = method
                    .variables
                    .get(id)
                    .filter(|variable| ctx.oracle.is_struct(&variable.ty))
                    .map(|variable| Expr::DefaultValue(variable.ty.clone()));
                rewritten.push(Stmt::Declare {
                    variable: id,
                    value,
                });
            }

            match (initialized, stmt) {
                (Some(id), Stmt::Expr(Expr::Assign { value, .. })) => {
                    rewritten.push(Stmt::Declare {
                        variable: id,
                        value: Some(*value),
                    });
                }
                (_, stmt) => rewritten.push(stmt),
            }
        }

        method.body.statements = rewritten;
        Ok(introduced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{BinaryOp, Block},
        metadata::signatures::TypeSignature,
        test::run_pass,
    };

    fn run(method: &mut DecompiledMethod) -> usize {
        run_pass(&IntroduceDeclarationsPass, method)
    }

    #[test]
    fn test_first_assignment_becomes_declaration() {
        let mut method = DecompiledMethod::new();
        let x = method.variables.parameter("x", TypeSignature::I4);
        let sum = method.variables.local("sum", TypeSignature::I4);

        method.body = Block::of(vec![
            Stmt::Expr(Expr::assign(
                Expr::Variable(sum),
                Expr::binary(BinaryOp::Add, Expr::Variable(x), Expr::int(1)),
            )),
            Stmt::Return(Some(Expr::Variable(sum))),
        ]);

        assert_eq!(run(&mut method), 1);
        assert_eq!(method.to_string(), "var sum = (x + 1);\nreturn sum;\n");
        assert_eq!(run(&mut method), 0);
    }

    #[test]
    fn test_first_use_inside_loop_is_hoisted() {
        let mut method = DecompiledMethod::new();
        let i = method.variables.local("i", TypeSignature::I4);
        let p = method
            .variables
            .local("p", TypeSignature::value_type("Geo", "Point"));

        method.body = Block::of(vec![Stmt::While {
            condition: Expr::binary(BinaryOp::Lt, Expr::Variable(i), Expr::int(3)),
            body: Block::of(vec![Stmt::Expr(Expr::assign(
                Expr::Variable(p),
                Expr::Literal(crate::ast::Literal::Null),
            ))]),
        }]);

        assert_eq!(run(&mut method), 2);
        let text = method.to_string();
        assert!(text.starts_with("var i;\nvar p = default(Geo.Point);\nwhile"));
    }

    #[test]
    fn test_self_referencing_assignment_is_not_an_initializer() {
        let mut method = DecompiledMethod::new();
        let n = method.variables.local("n", TypeSignature::I4);

        method.body = Block::of(vec![Stmt::Expr(Expr::assign(
            Expr::Variable(n),
            Expr::binary(BinaryOp::Add, Expr::Variable(n), Expr::int(1)),
        ))]);

        assert_eq!(run(&mut method), 1);
        assert_eq!(method.to_string(), "var n;\nn = (n + 1);\n");
    }
}
