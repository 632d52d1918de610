//! Type definitions.
//!
//! A [`TypeDef`] is one entry of a module's type list: its name, flags, base type and
//! interfaces, and the members it declares. Nested types are owned by their enclosing type.
//!
//! The nature of a type (interface, enum, struct, static class, class) is derived the way
//! the object format encodes it: the `INTERFACE` flag marks interfaces, a base type of
//! `System.Enum` marks enums, a base type of `System.ValueType` marks structs, and
//! `ABSTRACT | SEALED` marks static classes.

use std::sync::Arc;

use bitflags::bitflags;

use crate::metadata::{
    customattributes::{CustomAttribute, MemberMarks},
    members::{FieldDefRc, MethodDefRc, PropertyDefRc},
    signatures::{TypeName, TypeSignature},
};

/// Shared reference to a type definition
pub type TypeDefRc = Arc<TypeDef>;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Type flags (`TypeAttributes`, ECMA-335 II.23.1.15)
    pub struct TypeAttributes: u32 {
        /// Class is public scope
        const PUBLIC = 0x0000_0001;
        /// Class is nested with public visibility
        const NESTED_PUBLIC = 0x0000_0002;
        /// Class is nested with private visibility
        const NESTED_PRIVATE = 0x0000_0003;
        /// Type is an interface
        const INTERFACE = 0x0000_0020;
        /// Class is abstract
        const ABSTRACT = 0x0000_0080;
        /// Class cannot be extended
        const SEALED = 0x0000_0100;
        /// Class name is special
        const SPECIAL_NAME = 0x0000_0400;
        /// Class is serializable
        const SERIALIZABLE = 0x0000_2000;
        /// Initialize the class before first static field access
        const BEFORE_FIELD_INIT = 0x0010_0000;
    }
}

/// The assembly and module a definition was read from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TypeScope {
    /// Simple name of the defining assembly
    pub assembly: String,
    /// Name of the defining module
    pub module: String,
}

/// A type definition.
#[derive(Debug, Clone)]
pub struct TypeDef {
    /// Namespace; nested types carry their outermost type's namespace
    pub namespace: String,
    /// Simple name, including the generic arity suffix
    pub name: String,
    /// Type flags
    pub flags: TypeAttributes,
    /// Base type, absent for `System.Object` and interfaces
    pub base: Option<TypeSignature>,
    /// Directly implemented interfaces
    pub interfaces: Vec<TypeSignature>,
    /// Declared fields in declaration order
    pub fields: Vec<FieldDefRc>,
    /// Declared methods in declaration order
    pub methods: Vec<MethodDefRc>,
    /// Declared properties in declaration order
    pub properties: Vec<PropertyDefRc>,
    /// Nested types in declaration order
    pub nested_types: Vec<TypeDefRc>,
    /// Names of the type's generic parameters
    pub generic_params: Vec<String>,
    /// Attached custom attributes
    pub custom_attributes: Vec<CustomAttribute>,
    /// Where the definition lives
    pub scope: TypeScope,
    /// Full name of the enclosing type, for nested types
    pub declaring_type: Option<String>,
}

impl TypeDef {
    /// Full name: `Namespace.Name`, or `Namespace.Outer/Inner` for nested types.
    #[must_use]
    pub fn full_name(&self) -> String {
        match &self.declaring_type {
            Some(outer) => format!("{outer}/{}", self.name),
            None if self.namespace.is_empty() => self.name.clone(),
            None => format!("{}.{}", self.namespace, self.name),
        }
    }

    /// The namespace-qualified name, scoped to the defining assembly.
    #[must_use]
    pub fn type_name(&self) -> TypeName {
        let full = self.full_name();
        let name = if self.namespace.is_empty() {
            full
        } else {
            full[self.namespace.len() + 1..].to_string()
        };
        TypeName::new(self.namespace.clone(), name).in_scope(self.scope.assembly.clone())
    }

    /// A reference to this definition, encoded the way signatures would refer to it.
    #[must_use]
    pub fn signature(&self) -> TypeSignature {
        if self.is_value_type() {
            TypeSignature::ValueType(self.type_name())
        } else {
            TypeSignature::Class(self.type_name())
        }
    }

    fn base_full_name(&self) -> Option<String> {
        self.base.as_ref().map(TypeSignature::full_name)
    }

    /// Returns `true` for interfaces.
    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.flags.contains(TypeAttributes::INTERFACE)
    }

    /// Returns `true` for enums.
    #[must_use]
    pub fn is_enum(&self) -> bool {
        self.base_full_name().as_deref() == Some("System.Enum")
    }

    /// Returns `true` for value types (structs and enums).
    #[must_use]
    pub fn is_value_type(&self) -> bool {
        self.is_enum() || self.base_full_name().as_deref() == Some("System.ValueType")
    }

    /// Returns `true` for static classes.
    #[must_use]
    pub fn is_static_class(&self) -> bool {
        !self.is_interface()
            && self
                .flags
                .contains(TypeAttributes::ABSTRACT | TypeAttributes::SEALED)
    }

    /// Returns `true` for nested types.
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.declaring_type.is_some()
    }

    /// The declared static constructor, if any.
    #[must_use]
    pub fn static_constructor(&self) -> Option<&MethodDefRc> {
        self.methods
            .iter()
            .find(|method| method.is_static_constructor())
    }

    /// Finds a declared field by name.
    #[must_use]
    pub fn find_field(&self, name: &str) -> Option<&FieldDefRc> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Finds the declared methods with the given name.
    pub fn find_methods<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodDefRc> {
        self.methods.iter().filter(move |method| method.name == name)
    }

    /// Marks read off the type's own attributes.
    #[must_use]
    pub fn marks(&self) -> MemberMarks {
        MemberMarks::from_attributes(&self.custom_attributes)
    }
}
