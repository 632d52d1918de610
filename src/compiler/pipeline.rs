//! The fixed-order per-method transform pipeline.
//!
//! [`MethodPipeline`] owns one instance of every pass and runs them in the only order that is
//! correct: later steps rely on shapes produced by earlier ones (references need declarations,
//! operator folding needs the final expressions). Temporary elimination alone repeats, until a
//! run eliminates nothing or the configured bound is reached.

use crate::{
    ast::{DecompiledMethod, Function},
    compiler::{
        pass::{AstPass, PassContext},
        passes::{
            EliminateTemporariesPass, EmulateStructAssignmentPass, IgnoredTypeCheckPass,
            IntroduceDeclarationsPass, IntroduceReferencesPass, NameVariablesPass,
            SimplifyOperatorsPass,
        },
    },
    Result,
};

/// Default bound on temporary elimination runs per method.
pub const MAX_ELIMINATION_PASSES: usize = 100;

/// Caller-supplied rewrite applied to the finished function.
pub type PostProcess<'a> = &'a dyn Fn(&mut Function) -> Result<()>;

/// Runs the transform passes over one decompiled method.
///
/// # Examples
///
/// ```rust
/// use dotscript::ast::{DecompiledMethod, Expr, Stmt};
/// use dotscript::compiler::{MethodPipeline, PassContext};
/// use dotscript::metadata::graph::AssemblyGraph;
/// use dotscript::metadata::signatures::TypeSignature;
///
/// let mut tree = DecompiledMethod::new();
/// let x = tree.variables.parameter("x", TypeSignature::I4);
/// tree.parameters.push(x);
/// let t = tree.variables.temporary(TypeSignature::I4);
/// tree.body.push(Stmt::Expr(Expr::assign(Expr::Variable(t), Expr::Variable(x))));
/// tree.body.push(Stmt::Return(Some(Expr::Variable(t))));
///
/// let graph = AssemblyGraph::new();
/// let ctx = PassContext { method: "System.Int32 Ns.T::Id(System.Int32)", oracle: &graph };
/// let function = MethodPipeline::new().run("Id", tree, &ctx, None)?;
/// assert_eq!(function.to_string(), "function Id(x) {\n  return x;\n}");
/// # Ok::<(), dotscript::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct MethodPipeline {
    eliminate_temporaries: bool,
    simplify_operators: bool,
    max_elimination_passes: usize,
}

impl Default for MethodPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl MethodPipeline {
    /// Creates a pipeline with every optional step enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            eliminate_temporaries: true,
            simplify_operators: true,
            max_elimination_passes: MAX_ELIMINATION_PASSES,
        }
    }

    /// Enables or disables temporary elimination.
    #[must_use]
    pub fn eliminate_temporaries(mut self, enabled: bool) -> Self {
        self.eliminate_temporaries = enabled;
        self
    }

    /// Enables or disables operator folding.
    #[must_use]
    pub fn simplify_operators(mut self, enabled: bool) -> Self {
        self.simplify_operators = enabled;
        self
    }

    /// Sets the bound on temporary elimination runs.
    #[must_use]
    pub fn max_elimination_passes(mut self, passes: usize) -> Self {
        self.max_elimination_passes = passes.max(1);
        self
    }

    /// Transforms a decompiled method into an emittable function.
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the emitted function
    /// * `tree` - The decompiled body; consumed
    /// * `ctx` - Method name and type oracle for the passes
    /// * `post` - Optional rewrite applied to the finished function, used to inject field
    ///   initializers into constructors
    ///
    /// # Errors
    ///
    /// Returns the first pass error. All pass errors are method-local.
    pub fn run(
        &self,
        name: &str,
        mut tree: DecompiledMethod,
        ctx: &PassContext<'_>,
        post: Option<PostProcess<'_>>,
    ) -> Result<Function> {
        IgnoredTypeCheckPass.run(&mut tree, ctx)?;
        NameVariablesPass.run(&mut tree, ctx)?;

        if self.eliminate_temporaries {
            self.eliminate_to_fixpoint(&mut tree, ctx)?;
        }

        EmulateStructAssignmentPass.run(&mut tree, ctx)?;
        IntroduceDeclarationsPass.run(&mut tree, ctx)?;
        IntroduceReferencesPass.run(&mut tree, ctx)?;

        if self.simplify_operators {
            SimplifyOperatorsPass.run(&mut tree, ctx)?;
        }

        let parameters = tree
            .parameters
            .iter()
            .map(|id| tree.variables.name_of(*id))
            .collect();
        let mut function = Function {
            name: name.to_string(),
            parameters,
            variables: tree.variables,
            body: tree.body,
        };

        if let Some(post) = post {
            post(&mut function)?;
        }
        Ok(function)
    }

    fn eliminate_to_fixpoint(
        &self,
        tree: &mut DecompiledMethod,
        ctx: &PassContext<'_>,
    ) -> Result<usize> {
        let pass = EliminateTemporariesPass;
        let mut total = 0;

        for _ in 0..self.max_elimination_passes {
            let eliminated = pass.run(tree, ctx)?;
            if eliminated == 0 {
                return Ok(total);
            }
            total += eliminated;
        }

        log::warn!(
            "{} did not reach a fixpoint on {} after {} runs",
            pass.name(),
            ctx.method,
            self.max_elimination_passes
        );
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::{BinaryOp, Block, Expr, Stmt},
        metadata::{graph::AssemblyGraph, signatures::TypeSignature},
        Error,
    };

    fn counter_tree() -> DecompiledMethod {
        let mut tree = DecompiledMethod::new();
        let limit = tree.variables.parameter("limit", TypeSignature::I4);
        tree.parameters.push(limit);
        let i = tree.variables.local("i", TypeSignature::I4);
        let t = tree.variables.temporary(TypeSignature::I4);

        tree.body = Block::of(vec![
            Stmt::Expr(Expr::assign(Expr::Variable(i), Expr::int(0))),
            Stmt::While {
                condition: Expr::binary(BinaryOp::Lt, Expr::Variable(i), Expr::Variable(limit)),
                body: Block::of(vec![
                    Stmt::Expr(Expr::assign(
                        Expr::Variable(t),
                        Expr::binary(BinaryOp::Add, Expr::Variable(i), Expr::int(1)),
                    )),
                    Stmt::Expr(Expr::assign(Expr::Variable(i), Expr::Variable(t))),
                ]),
            },
            Stmt::Return(Some(Expr::Variable(i))),
        ]);
        tree
    }

    #[test]
    fn test_full_pipeline() {
        let graph = AssemblyGraph::new();
        let ctx = PassContext {
            method: "System.Int32 Ns.T::Count(System.Int32)",
            oracle: &graph,
        };

        let function = MethodPipeline::new()
            .run("Count", counter_tree(), &ctx, None)
            .unwrap();
        assert_eq!(
            function.to_string(),
            "function Count(limit) {\n  var i = 0;\n  while ((i < limit)) {\n    ++i;\n  }\n  return i;\n}"
        );
    }

    #[test]
    fn test_optional_steps_disabled() {
        let graph = AssemblyGraph::new();
        let ctx = PassContext {
            method: "M",
            oracle: &graph,
        };

        let function = MethodPipeline::new()
            .eliminate_temporaries(false)
            .simplify_operators(false)
            .run("Count", counter_tree(), &ctx, None)
            .unwrap();
        let text = function.to_string();
        assert!(text.contains("var num;"));
        assert!(text.contains("i = num;"));
    }

    #[test]
    fn test_post_process_runs_last() {
        let graph = AssemblyGraph::new();
        let ctx = PassContext {
            method: "M",
            oracle: &graph,
        };

        let prepend = |function: &mut Function| -> crate::Result<()> {
            function.body.statements.insert(0, Stmt::Return(None));
            Ok(())
        };
        let function = MethodPipeline::new()
            .run("Count", counter_tree(), &ctx, Some(&prepend as PostProcess<'_>))
            .unwrap();
        assert_eq!(function.body.statements[0], Stmt::Return(None));
    }

    #[test]
    fn test_pass_failure_is_method_local() {
        let graph = AssemblyGraph::new();
        let ctx = PassContext {
            method: "M",
            oracle: &graph,
        };

        let mut tree = DecompiledMethod::new();
        tree.variables
            .local("p", TypeSignature::ptr(TypeSignature::I4));

        let error = MethodPipeline::new().run("M", tree, &ctx, None).unwrap_err();
        assert!(matches!(error, Error::IgnoredTypeUsage { .. }));
        assert!(error.is_method_local());
    }
}
