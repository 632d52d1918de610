//! Single-use temporary elimination.
//!
//! The decompiler spills every evaluation-stack slot into a generated variable. Most of those
//! are written once and read once; this pass moves the written value into the reading site and
//! drops the binding.
//!
//! # Safety Conditions
//!
//! A generated, non-parameter variable is a candidate when it has exactly one plain definition
//! (`v = value;` as a statement), exactly one read, no compound or increment write, and no
//! declaration statement. For a candidate definition:
//!
//! - A constant value (literal, default value, `this`) is moved into any later statement of the
//!   same block, nested blocks included.
//! - Any other value is moved only into the immediately following statement, and only when no
//!   write is evaluated before the read and the read is not behind a conditional branch or the
//!   right operand of `&&`/`||`.
//!
//! One run moves every candidate it can; moves can expose new candidates, so the pipeline
//! repeats the pass until it reports zero eliminations.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    ast::{
        for_each_block_mut, for_each_expr, for_each_stmt, rewrite_exprs, walk_expr_mut, Block,
        DecompiledMethod, Expr, Stmt, VariableId,
    },
    compiler::pass::{AstPass, PassContext},
    Result,
};

#[derive(Debug, Default, Clone, Copy)]
struct Usage {
    occurrences: usize,
    plain_defs: usize,
    mutations: usize,
    declarations: usize,
}

impl Usage {
    fn reads(self) -> usize {
        self.occurrences.saturating_sub(self.plain_defs)
    }
}

/// Result of looking for the read of a variable inside an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reach {
    Absent,
    Safe,
    Unsafe,
}

/// Collapses single-use temporaries into their use site.
#[derive(Debug, Default, Clone, Copy)]
pub struct EliminateTemporariesPass;

impl EliminateTemporariesPass {
    fn candidates(method: &DecompiledMethod) -> FxHashSet<VariableId> {
        let mut usage: FxHashMap<VariableId, Usage> = FxHashMap::default();

        for_each_expr(&method.body, &mut |expr| match expr {
            Expr::Variable(id) | Expr::VariableRef(id) => {
                usage.entry(*id).or_default().occurrences += 1;
            }
            Expr::Assign { op, target, .. } => {
                if let Some(id) = target.as_variable() {
                    let entry = usage.entry(id).or_default();
                    if op.is_some() {
                        entry.mutations += 1;
                    } else {
                        entry.plain_defs += 1;
                    }
                }
            }
            Expr::Unary { op, operand } if op.is_mutating() => {
                if let Some(id) = operand.as_variable() {
                    usage.entry(id).or_default().mutations += 1;
                }
            }
            _ => {}
        });

        for_each_stmt(&method.body, &mut |stmt| {
            if let Stmt::Declare { variable, .. } = stmt {
                usage.entry(*variable).or_default().declarations += 1;
            }
        });

        usage
            .into_iter()
            .filter(|(id, usage)| {
                let generated = method
                    .variables
                    .get(*id)
                    .is_some_and(|variable| variable.is_generated && !variable.is_parameter);
                generated
                    && usage.plain_defs == 1
                    && usage.reads() == 1
                    && usage.mutations == 0
                    && usage.declarations == 0
            })
            .map(|(id, _)| id)
            .collect()
    }

    /// Finds the read of `target` in evaluation order.
    ///
    /// `effects` becomes `true` once any write has been evaluated; a read after that point, or
    /// inside a conditionally evaluated operand, is unsafe to replace with a moved value.
    fn reach(expr: &Expr, target: VariableId, guarded: bool, effects: &mut bool) -> Reach {
        if expr.as_variable() == Some(target) {
            return if guarded || *effects {
                Reach::Unsafe
            } else {
                Reach::Safe
            };
        }

        let children = expr.children();
        for (position, child) in children.into_iter().enumerate() {
            let conditional = match expr {
                Expr::Conditional { .. } => position > 0,
                Expr::Binary { op, .. } => op.is_short_circuit() && position > 0,
                _ => false,
            };
            match Self::reach(child, target, guarded || conditional, effects) {
                Reach::Absent => {}
                found => return found,
            }
        }

        if expr.is_effectful_node() {
            *effects = true;
        }
        Reach::Absent
    }

    /// Expressions of the next statement a non-constant value may move into.
    fn movable_into(stmt: &Stmt) -> bool {
        matches!(
            stmt,
            Stmt::Expr(_)
                | Stmt::Throw(_)
                | Stmt::Return(_)
                | Stmt::Declare { .. }
                | Stmt::If { .. }
        )
    }

    fn reach_in_stmt(stmt: &Stmt, target: VariableId) -> Reach {
        if !Self::movable_into(stmt) {
            return Reach::Absent;
        }
        let mut effects = false;
        for expr in stmt.expressions() {
            match Self::reach(expr, target, false, &mut effects) {
                Reach::Absent => {}
                found => return found,
            }
        }
        Reach::Absent
    }

    fn mentions(stmt: &Stmt, target: VariableId) -> bool {
        let mut found = false;
        let mut check = |expr: &Expr| found |= expr.as_variable() == Some(target);

        for expr in stmt.expressions() {
            crate::ast::walk_expr(expr, &mut check);
        }
        for block in stmt.blocks() {
            for_each_expr(block, &mut check);
        }
        found
    }

    /// Replaces the single read of `target` in `stmt` with `value`.
    fn substitute(stmt: &mut Stmt, target: VariableId, value: Expr) {
        let mut slot = Some(value);
        let mut replace = |expr: &mut Expr| {
            if expr.as_variable() == Some(target) {
                if let Some(value) = slot.take() {
                    *expr = value;
                }
            }
        };

        for expr in stmt.expressions_mut() {
            walk_expr_mut(expr, &mut replace);
        }
        for block in stmt.blocks_mut() {
            rewrite_exprs(block, &mut replace);
        }
    }

    fn eliminate_in_block(block: &mut Block, candidates: &FxHashSet<VariableId>) -> usize {
        let mut eliminated = 0;
        let mut index = 0;

        while index < block.statements.len() {
            let Some((variable, value)) = block.statements[index].as_variable_assignment() else {
                index += 1;
                continue;
            };
            if !candidates.contains(&variable) {
                index += 1;
                continue;
            }

            let destination = if value.is_constant() {
                block.statements[index + 1..]
                    .iter()
                    .position(|stmt| Self::mentions(stmt, variable))
                    .map(|offset| index + 1 + offset)
            } else {
                block
                    .statements
                    .get(index + 1)
                    .filter(|next| Self::reach_in_stmt(next, variable) == Reach::Safe)
                    .map(|_| index + 1)
            };

            let Some(destination) = destination else {
                index += 1;
                continue;
            };

            let Stmt::Expr(Expr::Assign { value, .. }) = block.statements.remove(index) else {
                index += 1;
                continue;
            };
            Self::substitute(&mut block.statements[destination - 1], variable, *value);
            eliminated += 1;
        }

        eliminated
    }
}

impl AstPass for EliminateTemporariesPass {
    fn name(&self) -> &'static str {
        "eliminate-temporaries"
    }

    fn description(&self) -> &'static str {
        "Collapses single-use temporary bindings into their use site"
    }

    fn run(&self, method: &mut DecompiledMethod, _ctx: &PassContext<'_>) -> Result<usize> {
        let candidates = Self::candidates(method);
        if candidates.is_empty() {
            return Ok(0);
        }

        let mut eliminated = 0;
        for_each_block_mut(&mut method.body, &mut |block| {
            eliminated += Self::eliminate_in_block(block, &candidates);
        });
        Ok(eliminated)
    }
}
