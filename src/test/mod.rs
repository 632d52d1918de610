//! Shared factories for unit tests.
//!
//! Unit tests build small in-memory graphs with [`crate::metadata::builders`]; the helpers
//! here wrap the steps that every test module would otherwise repeat.

use std::sync::Arc;

use crate::{
    ast::DecompiledMethod,
    compiler::{AstPass, PassContext},
    metadata::{builders::AssemblyBuilder, graph::AssemblyGraph},
    translator::{AssemblyTranslator, TranslatorConfig, VecSink},
    typeinfo::TypeInfoStore,
};

/// Runs one pass over `method` with an empty type universe, returning the change count.
pub fn run_pass(pass: &dyn AstPass, method: &mut DecompiledMethod) -> usize {
    let graph = AssemblyGraph::new();
    let ctx = PassContext {
        method: "M",
        oracle: &graph,
    };
    pass.run(method, &ctx).unwrap()
}

/// A type information store over a single assembly.
pub fn store_of(builder: AssemblyBuilder) -> TypeInfoStore {
    TypeInfoStore::new(Arc::new(AssemblyGraph::from_assemblies([builder.build()])))
}

/// Translates a single assembly with the default configuration.
pub fn translate_one(builder: AssemblyBuilder) -> (VecSink, AssemblyTranslator) {
    translate_with(TranslatorConfig::default(), builder)
}

/// Translates a single assembly with `config`.
pub fn translate_with(
    config: TranslatorConfig,
    builder: AssemblyBuilder,
) -> (VecSink, AssemblyTranslator) {
    let assembly = builder.build();
    let graph = Arc::new(AssemblyGraph::from_assemblies([Arc::clone(&assembly)]));
    let mut translator = AssemblyTranslator::new(config, graph);
    let mut sink = VecSink::new();
    translator.translate(&assembly, &mut sink).unwrap();
    (sink, translator)
}
