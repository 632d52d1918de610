//! Proxy types and their matching rules.
//!
//! A proxy is a type definition tagged with the proxy attribute. Its positional argument names
//! the types it patches, either as type references or as full-name strings, and its named
//! `Inheritable` argument (default `true`) extends the match to derived types.
//!
//! # Matching
//!
//! | Declared as | Inheritable            | Not inheritable          |
//! |-------------|------------------------|--------------------------|
//! | type        | target is assignable   | target is the same type  |
//! | name        | target or any ancestor | target's own name only   |
//!
//! A proxy matches a target at most once, and [`ProxyRegistry::matching`] reports matches in
//! registration order.

use std::sync::Arc;

use crate::metadata::{
    customattributes::{find_attribute, AttributeArgument, MemberMarks},
    graph::AssemblyGraph,
    identity::TypeIdentifier,
    signatures::TypeSignature,
    types::{TypeDef, TypeDefRc},
};

/// Reference-counted [`ProxyInfo`].
pub type ProxyInfoRc = Arc<ProxyInfo>;

/// Named argument controlling inheritance of a proxy.
pub const INHERITABLE_ARGUMENT: &str = "Inheritable";

/// A registered proxy type.
#[derive(Debug, Clone)]
pub struct ProxyInfo {
    definition: TypeDefRc,
    proxied_types: Vec<TypeSignature>,
    proxied_names: Vec<String>,
    inheritable: bool,
}

impl ProxyInfo {
    /// Reads the proxy attribute off a definition.
    ///
    /// Returns `None` if the definition does not carry `attribute`.
    #[must_use]
    pub fn from_definition(definition: TypeDefRc, attribute: &str) -> Option<Self> {
        let marker = find_attribute(&definition.custom_attributes, attribute)?;

        let mut proxied_types = Vec::new();
        let mut proxied_names = Vec::new();
        for argument in &marker.positional {
            match argument {
                AttributeArgument::Type(signature) => proxied_types.push(signature.clone()),
                AttributeArgument::Types(signatures) => {
                    proxied_types.extend(signatures.iter().cloned());
                }
                AttributeArgument::String(name) => proxied_names.push(name.clone()),
                AttributeArgument::Strings(names) => proxied_names.extend(names.iter().cloned()),
                AttributeArgument::Bool(_) | AttributeArgument::Int(_) => {}
            }
        }

        let inheritable = match marker.named_arg(INHERITABLE_ARGUMENT) {
            Some(AttributeArgument::Bool(value)) => *value,
            _ => true,
        };

        Some(ProxyInfo {
            definition,
            proxied_types,
            proxied_names,
            inheritable,
        })
    }

    /// The proxy type itself.
    #[must_use]
    pub fn definition(&self) -> &TypeDefRc {
        &self.definition
    }

    /// Full name of the proxy type.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.definition.full_name()
    }

    /// Types declared by reference.
    #[must_use]
    pub fn proxied_types(&self) -> &[TypeSignature] {
        &self.proxied_types
    }

    /// Types declared by full name.
    #[must_use]
    pub fn proxied_names(&self) -> &[String] {
        &self.proxied_names
    }

    /// Whether derived types match too.
    #[must_use]
    pub fn is_inheritable(&self) -> bool {
        self.inheritable
    }

    /// Marks the proxy applies to the target type itself.
    #[must_use]
    pub fn type_marks(&self) -> MemberMarks {
        self.definition.marks()
    }

    /// Returns `true` if this proxy applies to `target`.
    #[must_use]
    pub fn matches(&self, graph: &AssemblyGraph, target: &TypeDef) -> bool {
        let target_identifier = TypeIdentifier::of_definition(target);
        let by_type = self.proxied_types.iter().any(|proxied| {
            let proxied = TypeIdentifier::of(proxied);
            if self.inheritable {
                graph.is_assignable_to(target, &proxied)
            } else {
                proxied == target_identifier
            }
        });
        if by_type {
            return true;
        }

        if self.proxied_names.is_empty() {
            return false;
        }
        let target_name = target.full_name();
        if self.proxied_names.contains(&target_name) {
            return true;
        }
        self.inheritable
            && graph
                .ancestor_names(target)
                .iter()
                .any(|ancestor| self.proxied_names.contains(ancestor))
    }
}

/// All proxies known to a translation run, in registration order.
#[derive(Debug, Default)]
pub struct ProxyRegistry {
    proxies: boxcar::Vec<ProxyInfoRc>,
}

impl ProxyRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a proxy; a second proxy with the same full name is dropped.
    pub fn register(&self, proxy: ProxyInfo) -> bool {
        let name = proxy.full_name();
        if self.iter().any(|existing| existing.full_name() == name) {
            return false;
        }
        self.proxies.push(Arc::new(proxy));
        true
    }

    /// Number of registered proxies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.proxies.count()
    }

    /// Returns `true` if no proxy is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates the proxies in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ProxyInfoRc> {
        self.proxies.iter().map(|(_, proxy)| proxy)
    }

    /// The proxies applying to `target`, each at most once, in registration order.
    #[must_use]
    pub fn matching(&self, graph: &AssemblyGraph, target: &TypeDef) -> Vec<ProxyInfoRc> {
        self.iter()
            .filter(|proxy| proxy.matches(graph, target))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{
        builders::{AssemblyBuilder, TypeDefBuilder},
        customattributes::{CustomAttribute, PROXY_ATTRIBUTE},
    };

    fn proxy(name: &str, argument: AttributeArgument, inheritable: bool) -> ProxyInfo {
        let definition = TypeDefBuilder::class("Proxies", name)
            .attribute(
                CustomAttribute::new(PROXY_ATTRIBUTE)
                    .with_arg(argument)
                    .with_named(INHERITABLE_ARGUMENT, AttributeArgument::Bool(inheritable)),
            )
            .build_detached();
        ProxyInfo::from_definition(definition, PROXY_ATTRIBUTE).unwrap()
    }

    fn graph() -> AssemblyGraph {
        let assembly = AssemblyBuilder::new("App")
            .add_type(TypeDefBuilder::class("App", "Animal"))
            .add_type(
                TypeDefBuilder::class("App", "Dog").extends(TypeSignature::class("App", "Animal")),
            )
            .build();
        AssemblyGraph::from_assemblies([assembly])
    }

    #[test]
    fn test_type_based_matching() {
        let graph = graph();
        let dog = graph.find_type("App.Dog").unwrap().clone();
        let animal = graph.find_type("App.Animal").unwrap().clone();

        let inheritable = proxy(
            "AnimalProxy",
            AttributeArgument::Type(TypeSignature::class("App", "Animal")),
            true,
        );
        assert!(inheritable.matches(&graph, &dog));
        assert!(inheritable.matches(&graph, &animal));

        let exact = proxy(
            "AnimalOnly",
            AttributeArgument::Type(TypeSignature::class("App", "Animal")),
            false,
        );
        assert!(!exact.matches(&graph, &dog));
        assert!(exact.matches(&graph, &animal));
    }

    #[test]
    fn test_name_based_matching() {
        let graph = graph();
        let dog = graph.find_type("App.Dog").unwrap().clone();

        let by_ancestor = proxy(
            "ByName",
            AttributeArgument::String("App.Animal".to_string()),
            true,
        );
        assert!(by_ancestor.matches(&graph, &dog));

        let own_name_only = proxy(
            "ByNameExact",
            AttributeArgument::Strings(vec!["App.Animal".to_string()]),
            false,
        );
        assert!(!own_name_only.matches(&graph, &dog));
    }

    #[test]
    fn test_registry_order_and_dedup() {
        let graph = graph();
        let dog = graph.find_type("App.Dog").unwrap().clone();

        let registry = ProxyRegistry::new();
        assert!(registry.register(proxy(
            "First",
            AttributeArgument::String("App.Dog".to_string()),
            false
        )));
        assert!(registry.register(proxy(
            "Second",
            AttributeArgument::Types(vec![
                TypeSignature::class("App", "Animal"),
                TypeSignature::class("App", "Dog"),
            ]),
            true
        )));
        assert!(!registry.register(proxy(
            "First",
            AttributeArgument::String("App.Dog".to_string()),
            false
        )));

        let names: Vec<String> = registry
            .matching(&graph, &dog)
            .iter()
            .map(|proxy| proxy.full_name())
            .collect();
        assert_eq!(names, vec!["Proxies.First", "Proxies.Second"]);
    }

    #[test]
    fn test_missing_attribute() {
        let plain = TypeDefBuilder::class("Proxies", "Plain").build_detached();
        assert!(ProxyInfo::from_definition(plain, PROXY_ATTRIBUTE).is_none());
    }
}
