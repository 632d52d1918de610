//! The decompiler seam.
//!
//! Turning IL into a first tree form is an external collaborator's job. The translator only
//! asks a [`Decompiler`] for the tree of a method and treats failure as a method-local error.

use crate::{
    ast::DecompiledMethod,
    metadata::members::{MethodBody, MethodDef},
    Error, Result,
};

/// Produces the decompiled tree of a method.
pub trait Decompiler {
    /// Decompiles one method body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decompilation`] if no tree can be produced.
    fn decompile(&self, method: &MethodDef) -> Result<DecompiledMethod>;
}

/// Reads the tree that was stored on the definition when the graph was built.
#[derive(Debug, Clone, Copy, Default)]
pub struct BodyDecompiler;

impl Decompiler for BodyDecompiler {
    fn decompile(&self, method: &MethodDef) -> Result<DecompiledMethod> {
        match &method.body {
            Some(MethodBody::Tree { method: tree, .. }) => Ok(tree.clone()),
            Some(MethodBody::Undecompilable { message, .. }) => Err(Error::Decompilation {
                method: method.full_name(),
                message: message.clone(),
            }),
            None => Err(Error::Decompilation {
                method: method.full_name(),
                message: "method has no body".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::builders::{MethodBuilder, TypeDefBuilder};

    #[test]
    fn test_body_decompiler() {
        let owner = TypeDefBuilder::class("Ns", "T")
            .method(MethodBuilder::new("Ok").body(DecompiledMethod::new()))
            .method(MethodBuilder::new("Bad").body(DecompiledMethod::new()).undecompilable("bad opcode"))
            .method(MethodBuilder::new("Empty"))
            .build_detached();

        assert!(BodyDecompiler.decompile(&owner.methods[0]).is_ok());

        let error = BodyDecompiler.decompile(&owner.methods[1]).unwrap_err();
        assert!(error.is_method_local());
        assert!(error.to_string().contains("bad opcode"));

        assert!(BodyDecompiler.decompile(&owner.methods[2]).is_err());
    }
}
