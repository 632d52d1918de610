//! Ignored-type rejection.
//!
//! A method whose body touches a type the translator is configured to ignore cannot be
//! emitted: the runtime will not know the type. The pass fails the method instead of
//! rewriting it, which makes the method untranslatable while its siblings carry on.
//!
//! Checked are the types of all variables, and the types named by object creation, casts,
//! default values, field and array element accesses, and the signature of every callee.

use crate::{
    ast::{for_each_expr, DecompiledMethod, Expr},
    compiler::pass::{AstPass, PassContext},
    metadata::signatures::TypeSignature,
    Error, Result,
};

/// Fails methods that reference ignored types.
#[derive(Debug, Default, Clone, Copy)]
pub struct IgnoredTypeCheckPass;

impl IgnoredTypeCheckPass {
    fn reject(ctx: &PassContext<'_>, signature: &TypeSignature) -> Error {
        Error::IgnoredTypeUsage {
            method: ctx.method.to_string(),
            type_name: signature.full_name(),
        }
    }
}

impl AstPass for IgnoredTypeCheckPass {
    fn name(&self) -> &'static str {
        "ignored-types"
    }

    fn description(&self) -> &'static str {
        "Rejects methods whose body references an ignored type"
    }

    fn run(&self, method: &mut DecompiledMethod, ctx: &PassContext<'_>) -> Result<usize> {
        for (_, variable) in method.variables.iter() {
            if ctx.oracle.is_ignored_type(&variable.ty) {
                return Err(Self::reject(ctx, &variable.ty));
            }
        }

        let mut offending: Option<TypeSignature> = None;
        for_each_expr(&method.body, &mut |expr| {
            if offending.is_some() {
                return;
            }
            let named: Vec<&TypeSignature> = match expr {
                Expr::New { ty, .. }
                | Expr::Cast { ty, .. }
                | Expr::DefaultValue(ty)
                | Expr::ArrayElement { ty, .. } => vec![ty],
                Expr::Field { owner, ty, .. } => vec![owner, ty],
                Expr::Call { method, .. } => std::iter::once(&method.declaring)
                    .chain(std::iter::once(&method.return_type))
                    .chain(method.params.iter())
                    .collect(),
                _ => Vec::new(),
            };
            offending = named
                .into_iter()
                .find(|signature| ctx.oracle.is_ignored_type(signature))
                .cloned();
        });

        match offending {
            Some(signature) => Err(Self::reject(ctx, &signature)),
            None => Ok(0),
        }
    }
}
