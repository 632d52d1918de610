//! The type information engine.
//!
//! Everything the translator needs to know about a type beyond its raw definition lives here:
//! which members it has once proxies are applied, which of them are ignored, external or
//! replaced, how overloads group, whether the type needs a static constructor, and what its
//! enum values are.
//!
//! # Architecture
//!
//! Models are built lazily by [`TypeInfoStore::get_type_info`] in two passes:
//!
//! 1. **Member tables.** A work-list, seeded with the requested type, builds the member table
//!    of every type reachable through member signatures. No recursion is involved, so deep
//!    and cyclic type graphs are fine.
//! 2. **Cross-type facts.** Once the work-list drains, every model built in step 1 resolves
//!    the ignore flags of its members and constructs its method groups. Both depend on the
//!    ignore status of other types, which step 1 has made available.
//!
//! Every model is cached by [`crate::metadata::identity::TypeIdentifier`] and never rebuilt;
//! an unresolvable type is cached as absent.
//!
//! # Key Components
//!
//! - [`TypeInfoStore`] - The cache and the two-pass construction
//! - [`TypeInfo`] - The frozen model of one type
//! - [`MemberInfo`] - One field, method or property with its marks
//! - [`ProxyInfo`] / [`ProxyRegistry`] - Proxy types and their matching rules
//! - [`MethodGroupInfo`] - Overloads sharing a name
//!
//! # Usage Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use dotscript::metadata::builders::{AssemblyBuilder, MethodBuilder, TypeDefBuilder};
//! use dotscript::metadata::graph::AssemblyGraph;
//! use dotscript::metadata::signatures::TypeSignature;
//! use dotscript::typeinfo::{TypeInfoStore, TypeKind};
//!
//! let app = AssemblyBuilder::new("App")
//!     .add_type(
//!         TypeDefBuilder::class("Demo", "Printer")
//!             .method(MethodBuilder::new("Print").param("value", TypeSignature::I4))
//!             .method(MethodBuilder::new("Print").param("value", TypeSignature::String)),
//!     )
//!     .build();
//! let store = TypeInfoStore::new(Arc::new(AssemblyGraph::from_assemblies([app])));
//!
//! let info = store.get_type_info(&TypeSignature::class("Demo", "Printer")).unwrap();
//! assert_eq!(info.kind(), TypeKind::Class);
//! assert_eq!(info.method_groups().len(), 1);
//! ```

mod groups;
mod members;
mod proxy;
mod store;
mod types;

use strum::{Display, EnumIter};

use crate::metadata::types::TypeDef;

pub use groups::{MethodGroupInfo, MANGLE_SEPARATOR};
pub use members::{MemberDef, MemberInfo, MemberInfoRc, MemberSource};
pub use proxy::{ProxyInfo, ProxyInfoRc, ProxyRegistry, INHERITABLE_ARGUMENT};
pub use store::TypeInfoStore;
pub use types::{EnumMember, ModuleInfo, ModuleInfoRc, StaticConstructor, TypeInfo, TypeInfoRc};

/// The nature of a type, decided once per type.
///
/// All three emission phases switch on this tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum TypeKind {
    /// An interface
    Interface,
    /// An enum
    Enum,
    /// A reference type
    Class,
    /// A value type that is not an enum
    Struct,
    /// An `abstract sealed` class
    StaticClass,
}

impl TypeKind {
    /// Classifies a definition.
    #[must_use]
    pub fn of(definition: &TypeDef) -> Self {
        if definition.is_interface() {
            TypeKind::Interface
        } else if definition.is_enum() {
            TypeKind::Enum
        } else if definition.is_value_type() {
            TypeKind::Struct
        } else if definition.is_static_class() {
            TypeKind::StaticClass
        } else {
            TypeKind::Class
        }
    }

    /// Returns `true` for kinds declared in full during forward declaration.
    #[must_use]
    pub fn is_declared_in_full(self) -> bool {
        matches!(self, TypeKind::Interface | TypeKind::Enum)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::builders::TypeDefBuilder;
    use strum::IntoEnumIterator;

    #[test]
    fn test_kind_classification() {
        let cases = [
            (TypeDefBuilder::interface("Ns", "I"), TypeKind::Interface),
            (TypeDefBuilder::enumeration("Ns", "E"), TypeKind::Enum),
            (TypeDefBuilder::structure("Ns", "S"), TypeKind::Struct),
            (TypeDefBuilder::static_class("Ns", "U"), TypeKind::StaticClass),
            (TypeDefBuilder::class("Ns", "C"), TypeKind::Class),
        ];
        for (builder, expected) in cases {
            assert_eq!(TypeKind::of(&builder.build_detached()), expected);
        }

        let declared_in_full: Vec<TypeKind> =
            TypeKind::iter().filter(|kind| kind.is_declared_in_full()).collect();
        assert_eq!(declared_in_full, vec![TypeKind::Interface, TypeKind::Enum]);
        assert_eq!(TypeKind::StaticClass.to_string(), "StaticClass");
    }
}
