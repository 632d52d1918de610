//! The resolvable type universe of a translation run.
//!
//! [`AssemblyGraph`] indexes every type of every loaded assembly by full name and answers the
//! structural questions the type information engine and the orchestrator ask: which
//! definition does a reference denote, what are a type's ancestors, is one type assignable to
//! another, and does a reference denote a struct that needs copy semantics.
//!
//! Resolution prefers the assembly named by the reference's scope and falls back to the first
//! loaded assembly that defines the name, so a type forwarded or duplicated across assemblies
//! still resolves. All walks over base-type chains are iterative and cycle guarded.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::metadata::{
    assembly::{AssemblyDefRc, ModuleDefRc},
    identity::TypeIdentifier,
    signatures::TypeSignature,
    types::{TypeDef, TypeDefRc},
};

/// All loaded assemblies, with a by-name type index.
#[derive(Debug, Default)]
pub struct AssemblyGraph {
    assemblies: Vec<AssemblyDefRc>,
    types: FxHashMap<String, Vec<(usize, TypeDefRc)>>,
    modules: FxHashMap<(String, String), ModuleDefRc>,
}

impl AssemblyGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a graph from a list of assemblies; duplicates by display name are dropped.
    pub fn from_assemblies(assemblies: impl IntoIterator<Item = AssemblyDefRc>) -> Self {
        let mut graph = Self::new();
        for assembly in assemblies {
            graph.add_assembly(assembly);
        }
        graph
    }

    /// Adds an assembly and indexes its types.
    ///
    /// Returns `false` if an assembly with the same display name is already present.
    pub fn add_assembly(&mut self, assembly: AssemblyDefRc) -> bool {
        let full_name = assembly.full_name();
        if self.assemblies.iter().any(|a| a.full_name() == full_name) {
            return false;
        }

        let index = self.assemblies.len();
        for module in &assembly.modules {
            self.modules.insert(
                (assembly.name().to_string(), module.name.clone()),
                Arc::clone(module),
            );
            for definition in module.all_types() {
                self.types
                    .entry(definition.full_name())
                    .or_default()
                    .push((index, definition));
            }
        }
        self.assemblies.push(assembly);
        true
    }

    /// All assemblies in load order.
    #[must_use]
    pub fn assemblies(&self) -> &[AssemblyDefRc] {
        &self.assemblies
    }

    /// Finds an assembly by simple name (case-insensitive).
    #[must_use]
    pub fn assembly(&self, name: &str) -> Option<&AssemblyDefRc> {
        self.assemblies
            .iter()
            .find(|assembly| assembly.name().eq_ignore_ascii_case(name))
    }

    /// Finds the first definition with the given full name.
    #[must_use]
    pub fn find_type(&self, full_name: &str) -> Option<&TypeDefRc> {
        self.types
            .get(full_name)
            .and_then(|candidates| candidates.first())
            .map(|(_, definition)| definition)
    }

    /// Resolves a reference to its definition.
    ///
    /// Generic instances resolve to their generic definition. Arrays, pointers, by-ref types
    /// and generic parameters have no definition.
    #[must_use]
    pub fn resolve(&self, signature: &TypeSignature) -> Option<TypeDefRc> {
        let name = signature.definition_name()?;
        let candidates = self.types.get(&name.full_name())?;

        let scoped = name.scope.as_deref().and_then(|scope| {
            candidates.iter().find(|(index, _)| {
                self.assemblies[*index].name().eq_ignore_ascii_case(scope)
            })
        });

        scoped
            .or_else(|| candidates.first())
            .map(|(_, definition)| Arc::clone(definition))
    }

    /// The module a definition was declared in.
    #[must_use]
    pub fn module_of(&self, definition: &TypeDef) -> Option<ModuleDefRc> {
        self.modules
            .get(&(
                definition.scope.assembly.clone(),
                definition.scope.module.clone(),
            ))
            .cloned()
    }

    /// The enclosing definition of a nested type.
    #[must_use]
    pub fn declaring_type(&self, definition: &TypeDef) -> Option<TypeDefRc> {
        let outer = definition.declaring_type.as_deref()?;
        let candidates = self.types.get(outer)?;
        candidates
            .iter()
            .find(|(_, candidate)| candidate.scope == definition.scope)
            .or_else(|| candidates.first())
            .map(|(_, candidate)| Arc::clone(candidate))
    }

    /// The resolved direct base type.
    #[must_use]
    pub fn base_type(&self, definition: &TypeDef) -> Option<TypeDefRc> {
        definition.base.as_ref().and_then(|base| self.resolve(base))
    }

    /// Full names of every ancestor, nearest first, including unresolvable ones.
    ///
    /// Stops at the first repeated name, so a cyclic chain terminates.
    #[must_use]
    pub fn ancestor_names(&self, definition: &TypeDef) -> Vec<String> {
        let mut names = Vec::new();
        let mut seen = FxHashSet::default();
        seen.insert(definition.full_name());

        let mut next = definition.base.clone();
        while let Some(base) = next {
            let Some(name) = base.definition_name().map(|name| name.full_name()) else {
                break;
            };
            if !seen.insert(name.clone()) {
                break;
            }
            names.push(name);
            next = self.resolve(&base).and_then(|resolved| resolved.base.clone());
        }

        names
    }

    /// Resolved ancestors, nearest first. Stops at unresolvable bases and cycles.
    #[must_use]
    pub fn base_types(&self, definition: &TypeDef) -> Vec<TypeDefRc> {
        let mut result = Vec::new();
        let mut seen = FxHashSet::default();
        seen.insert(TypeIdentifier::of_definition(definition));

        let mut current = self.base_type(definition);
        while let Some(base) = current {
            if !seen.insert(TypeIdentifier::of_definition(&base)) {
                break;
            }
            current = self.base_type(&base);
            result.push(base);
        }

        result
    }

    /// Returns `true` if `definition` is `target`, derives from it, or implements it.
    #[must_use]
    pub fn is_assignable_to(&self, definition: &TypeDef, target: &TypeIdentifier) -> bool {
        let own = TypeIdentifier::of_definition(definition);
        if &own == target {
            return true;
        }

        let mut seen = FxHashSet::default();
        seen.insert(own);

        let mut pending: Vec<TypeSignature> = definition
            .base
            .iter()
            .chain(&definition.interfaces)
            .cloned()
            .collect();
        while let Some(reference) = pending.pop() {
            let identifier = TypeIdentifier::of(&reference);
            if &identifier == target {
                return true;
            }
            if !seen.insert(identifier) {
                continue;
            }
            if let Some(parent) = self.resolve(&reference) {
                pending.extend(parent.base.iter().chain(&parent.interfaces).cloned());
            }
        }

        false
    }

    /// Returns `true` if the reference denotes a struct: a value type that is neither a
    /// primitive nor an enum.
    ///
    /// Value-type references that cannot be resolved are assumed to be structs.
    #[must_use]
    pub fn is_struct(&self, signature: &TypeSignature) -> bool {
        match signature {
            TypeSignature::ByRef(_)
            | TypeSignature::Ptr(_)
            | TypeSignature::SzArray(_)
            | TypeSignature::Array(..)
            | TypeSignature::GenericParamType(_)
            | TypeSignature::GenericParamMethod(_) => return false,
            _ => {}
        }
        if signature.primitive_name().is_some() {
            return false;
        }

        match self.resolve(signature) {
            Some(definition) => definition.is_value_type() && !definition.is_enum(),
            None => signature.is_value_type(),
        }
    }

    /// Returns `true` if the reference resolves to an enum.
    #[must_use]
    pub fn is_enum(&self, signature: &TypeSignature) -> bool {
        self.resolve(signature)
            .is_some_and(|definition| definition.is_enum())
    }

    /// Returns `true` if both definitions come from the same assembly.
    #[must_use]
    pub fn same_assembly(a: &TypeDef, b: &TypeDef) -> bool {
        a.scope.assembly.eq_ignore_ascii_case(&b.scope.assembly)
    }

    /// Returns `true` if both definitions come from the same module.
    #[must_use]
    pub fn same_module(a: &TypeDef, b: &TypeDef) -> bool {
        Self::same_assembly(a, b) && a.scope.module == b.scope.module
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::builders::{AssemblyBuilder, TypeDefBuilder};
    use crate::metadata::signatures::TypeName;

    fn graph() -> AssemblyGraph {
        let core = AssemblyBuilder::new("Core")
            .add_type(TypeDefBuilder::interface("Core", "IShape"))
            .add_type(
                TypeDefBuilder::class("Core", "Shape")
                    .implements(TypeSignature::class("Core", "IShape")),
            )
            .add_type(TypeDefBuilder::structure("Core", "Point"))
            .add_type(TypeDefBuilder::enumeration("Core", "Color"))
            .build();
        let app = AssemblyBuilder::new("App")
            .reference_name("Core")
            .add_type(
                TypeDefBuilder::class("App", "Circle").extends(TypeSignature::Class(
                    TypeName::new("Core", "Shape").in_scope("Core"),
                )),
            )
            .add_type(TypeDefBuilder::class("App", "Loop").extends(TypeSignature::class("App", "Loop2")))
            .add_type(TypeDefBuilder::class("App", "Loop2").extends(TypeSignature::class("App", "Loop")))
            .build();
        AssemblyGraph::from_assemblies([core, app])
    }

    #[test]
    fn test_resolve_across_assemblies() {
        let graph = graph();
        let circle = graph.find_type("App.Circle").unwrap();
        let shape = graph.base_type(circle).unwrap();
        assert_eq!(shape.full_name(), "Core.Shape");
        assert_eq!(shape.scope.assembly, "Core");
        assert!(graph.resolve(&TypeSignature::class("Missing", "Type")).is_none());
    }

    #[test]
    fn test_duplicate_assembly_rejected() {
        let mut graph = graph();
        let again = AssemblyBuilder::new("Core").build();
        assert!(!graph.add_assembly(again));
        assert_eq!(graph.assemblies().len(), 2);
    }

    #[test]
    fn test_assignability() {
        let graph = graph();
        let circle = graph.find_type("App.Circle").unwrap();

        assert!(graph.is_assignable_to(circle, &TypeIdentifier::named("Core.Shape", 0)));
        assert!(graph.is_assignable_to(circle, &TypeIdentifier::named("Core.IShape", 0)));
        assert!(graph.is_assignable_to(circle, &TypeIdentifier::named("System.Object", 0)));
        assert!(!graph.is_assignable_to(circle, &TypeIdentifier::named("Core.Point", 0)));
    }

    #[test]
    fn test_cycles_terminate() {
        let graph = graph();
        let looping = graph.find_type("App.Loop").unwrap();
        assert_eq!(graph.base_types(looping).len(), 1);
        assert_eq!(graph.ancestor_names(looping), vec!["App.Loop2".to_string()]);
        assert!(!graph.is_assignable_to(looping, &TypeIdentifier::named("Core.Shape", 0)));
    }

    #[test]
    fn test_struct_detection() {
        let graph = graph();
        assert!(graph.is_struct(&TypeSignature::value_type("Core", "Point")));
        assert!(!graph.is_struct(&TypeSignature::value_type("Core", "Color")));
        assert!(!graph.is_struct(&TypeSignature::I4));
        assert!(!graph.is_struct(&TypeSignature::class("Core", "Shape")));
        assert!(graph.is_struct(&TypeSignature::value_type("Unknown", "Blob")));
        assert!(!graph.is_struct(&TypeSignature::value_type("Core", "Point").by_ref()));
        assert!(graph.is_enum(&TypeSignature::value_type("Core", "Color")));
    }
}
