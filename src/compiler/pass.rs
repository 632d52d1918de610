//! The pass interface of the per-method transform pipeline.

use crate::{
    ast::DecompiledMethod,
    metadata::{graph::AssemblyGraph, signatures::TypeSignature},
    Result,
};

/// Type questions a pass may ask about the program being translated.
///
/// Implemented by [`crate::typeinfo::TypeInfoStore`], which knows about ignore flags, and by
/// [`AssemblyGraph`] for standalone use, where only pointer types are ignored.
pub trait TypeOracle {
    /// Returns `true` if the type is excluded from translation.
    fn is_ignored_type(&self, signature: &TypeSignature) -> bool;

    /// Returns `true` if the type is a struct that needs copy semantics on assignment.
    fn is_struct(&self, signature: &TypeSignature) -> bool;
}

impl TypeOracle for AssemblyGraph {
    fn is_ignored_type(&self, signature: &TypeSignature) -> bool {
        signature.is_pointer()
    }

    fn is_struct(&self, signature: &TypeSignature) -> bool {
        AssemblyGraph::is_struct(self, signature)
    }
}

/// What a pass knows about the method it runs on.
pub struct PassContext<'a> {
    /// Full name of the method, for error reporting
    pub method: &'a str,
    /// Type questions
    pub oracle: &'a dyn TypeOracle,
}

/// A rewrite over one decompiled method tree.
///
/// Passes are stateless; all state lives in the tree.
pub trait AstPass {
    /// Unique name for logging and error reporting.
    fn name(&self) -> &'static str;

    /// Human-readable description of what the pass does.
    fn description(&self) -> &'static str;

    /// Runs the pass once over the whole tree.
    ///
    /// Returns the number of rewrites performed; zero means the tree is unchanged.
    ///
    /// # Errors
    ///
    /// Returns a method-local error if the tree cannot be processed. The method then becomes
    /// untranslatable.
    fn run(&self, method: &mut DecompiledMethod, ctx: &PassContext<'_>) -> Result<usize>;
}
