//! Type references as they appear in member signatures.
//!
//! A [`TypeSignature`] is the reference form of a type: what a field type, a parameter type
//! or a base-type slot points at. It mirrors the element-type encoding of the object format:
//! primitives have dedicated variants, named types are either `Class` or `ValueType`
//! references carrying a [`TypeName`], and constructed types (arrays, pointers, by-ref,
//! generic instances) wrap another signature.
//!
//! Signatures are pure values. Resolving them to a [`crate::metadata::TypeDef`] is the job of
//! [`crate::metadata::graph::AssemblyGraph`].

use std::fmt;

/// Namespace-qualified name of a type, optionally scoped to the assembly that defines it.
///
/// Nested types use `/` to separate the enclosing chain, e.g. `Outer/Inner`, with the
/// namespace of the outermost type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeName {
    /// Simple name of the assembly the reference points into, if known
    pub scope: Option<String>,
    /// Namespace (empty for the global namespace)
    pub namespace: String,
    /// Type name, including generic arity suffix and nesting path
    pub name: String,
}

impl TypeName {
    /// Creates an unscoped type name.
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        TypeName {
            scope: None,
            namespace: namespace.into(),
            name: name.into(),
        }
    }

    /// Scopes the name to an assembly (by simple name).
    #[must_use]
    pub fn in_scope(mut self, assembly: impl Into<String>) -> Self {
        self.scope = Some(assembly.into());
        self
    }

    /// Returns the full name (`Namespace.Name`, or `Name` in the global namespace).
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Returns the generic arity encoded in the name's backtick suffix (`List`1` -> 1).
    #[must_use]
    pub fn generic_arity(&self) -> u32 {
        let last = self.name.rsplit('/').next().unwrap_or(&self.name);
        match last.rfind('`') {
            Some(index) => last[index + 1..].parse().unwrap_or(0),
            None => 0,
        }
    }
}

/// A type reference, as encoded in member signatures.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSignature {
    /// void
    Void,
    /// bool
    Boolean,
    /// char
    Char,
    /// signed 8bit integer
    I1,
    /// unsigned 8bit integer
    U1,
    /// signed 16bit integer
    I2,
    /// unsigned 16bit integer
    U2,
    /// signed 32bit integer
    I4,
    /// unsigned 32bit integer
    U4,
    /// signed 64bit integer
    I8,
    /// unsigned 64bit integer
    U8,
    /// 32bit floating-point
    R4,
    /// 64bit floating-point
    R8,
    /// signed integer, sized to executing platform
    I,
    /// unsigned integer, sized to executing platform
    U,
    /// System.String
    String,
    /// System.Object
    Object,
    /// A reference type by name
    Class(TypeName),
    /// A value type by name
    ValueType(TypeName),
    /// Generic type and its arguments
    GenericInst(Box<TypeSignature>, Vec<TypeSignature>),
    /// Single dimension, zero based array
    SzArray(Box<TypeSignature>),
    /// Multi dimensional array
    Array(Box<TypeSignature>, u32),
    /// Type by reference
    ByRef(Box<TypeSignature>),
    /// A pointer to a type
    Ptr(Box<TypeSignature>),
    /// Generic type parameter
    GenericParamType(u32),
    /// Generic method parameter
    GenericParamMethod(u32),
}

/// (variant, full name, is value type) for every primitive with a dedicated variant
const PRIMITIVES: &[(TypeSignature, &str, bool)] = &[
    (TypeSignature::Void, "System.Void", true),
    (TypeSignature::Boolean, "System.Boolean", true),
    (TypeSignature::Char, "System.Char", true),
    (TypeSignature::I1, "System.SByte", true),
    (TypeSignature::U1, "System.Byte", true),
    (TypeSignature::I2, "System.Int16", true),
    (TypeSignature::U2, "System.UInt16", true),
    (TypeSignature::I4, "System.Int32", true),
    (TypeSignature::U4, "System.UInt32", true),
    (TypeSignature::I8, "System.Int64", true),
    (TypeSignature::U8, "System.UInt64", true),
    (TypeSignature::R4, "System.Single", true),
    (TypeSignature::R8, "System.Double", true),
    (TypeSignature::I, "System.IntPtr", true),
    (TypeSignature::U, "System.UIntPtr", true),
    (TypeSignature::String, "System.String", false),
    (TypeSignature::Object, "System.Object", false),
];

impl TypeSignature {
    /// Reference to a class by namespace and name.
    pub fn class(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        TypeSignature::Class(TypeName::new(namespace, name))
    }

    /// Reference to a value type by namespace and name.
    pub fn value_type(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        TypeSignature::ValueType(TypeName::new(namespace, name))
    }

    /// Single dimension array of this type.
    #[must_use]
    pub fn sz_array(self) -> Self {
        TypeSignature::SzArray(Box::new(self))
    }

    /// By-reference form of this type.
    #[must_use]
    pub fn by_ref(self) -> Self {
        TypeSignature::ByRef(Box::new(self))
    }

    /// Pointer to this type.
    #[must_use]
    pub fn ptr(self) -> Self {
        TypeSignature::Ptr(Box::new(self))
    }

    /// Returns the full name of the primitive this signature denotes, if any.
    ///
    /// Named references that spell out a primitive (`ValueType(System.Int32)`) are recognised
    /// as well as the dedicated variants.
    #[must_use]
    pub fn primitive_name(&self) -> Option<&'static str> {
        match self {
            TypeSignature::Class(name) | TypeSignature::ValueType(name) => {
                let full = name.full_name();
                PRIMITIVES
                    .iter()
                    .find(|(_, primitive, _)| *primitive == full)
                    .map(|(_, primitive, _)| *primitive)
            }
            other => PRIMITIVES
                .iter()
                .find(|(variant, _, _)| variant == other)
                .map(|(_, primitive, _)| *primitive),
        }
    }

    /// Returns `true` for the primitive value types (`Boolean`, `Char`, integers, floats,
    /// native integers). `String`, `Object` and `Void` are not primitive values.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        match self.primitive_name() {
            Some("System.Void" | "System.String" | "System.Object") | None => false,
            Some(_) => true,
        }
    }

    /// Returns `true` if the reference itself is encoded as a value type.
    #[must_use]
    pub fn is_value_type(&self) -> bool {
        match self {
            TypeSignature::ValueType(_) => true,
            TypeSignature::GenericInst(definition, _) => definition.is_value_type(),
            other => PRIMITIVES
                .iter()
                .any(|(variant, name, value)| variant == other && *value && *name != "System.Void"),
        }
    }

    /// Returns `true` if this is a pointer, or a by-ref/array of a pointer.
    #[must_use]
    pub fn is_pointer(&self) -> bool {
        match self {
            TypeSignature::Ptr(_) => true,
            TypeSignature::ByRef(inner)
            | TypeSignature::SzArray(inner)
            | TypeSignature::Array(inner, _) => inner.is_pointer(),
            _ => false,
        }
    }

    /// Strips array, by-ref and pointer wrappers and returns the innermost signature.
    #[must_use]
    pub fn element_type(&self) -> &TypeSignature {
        let mut current = self;
        loop {
            match current {
                TypeSignature::ByRef(inner)
                | TypeSignature::Ptr(inner)
                | TypeSignature::SzArray(inner)
                | TypeSignature::Array(inner, _) => current = inner,
                _ => return current,
            }
        }
    }

    /// Returns the named type a definition lookup should use, if any.
    ///
    /// Generic instances yield their generic definition's name; primitives yield their
    /// `System` name; constructed types (arrays, pointers, by-ref) and generic parameters
    /// yield `None`.
    #[must_use]
    pub fn definition_name(&self) -> Option<TypeName> {
        match self {
            TypeSignature::Class(name) | TypeSignature::ValueType(name) => Some(name.clone()),
            TypeSignature::GenericInst(definition, _) => definition.definition_name(),
            other => other.primitive_name().map(|full| {
                let (namespace, name) = full.split_at(full.rfind('.').unwrap_or(0));
                TypeName::new(namespace, name.trim_start_matches('.'))
            }),
        }
    }

    /// Returns the full name in the object format's notation.
    #[must_use]
    pub fn full_name(&self) -> String {
        if let Some(primitive) = self.primitive_name() {
            return primitive.to_string();
        }

        match self {
            TypeSignature::Class(name) | TypeSignature::ValueType(name) => name.full_name(),
            TypeSignature::GenericInst(definition, args) => {
                let args: Vec<String> = args.iter().map(TypeSignature::full_name).collect();
                format!("{}<{}>", definition.full_name(), args.join(","))
            }
            TypeSignature::SzArray(inner) => format!("{}[]", inner.full_name()),
            TypeSignature::Array(inner, rank) => {
                let commas = ",".repeat(rank.saturating_sub(1) as usize);
                format!("{}[{}]", inner.full_name(), commas)
            }
            TypeSignature::ByRef(inner) => format!("{}&", inner.full_name()),
            TypeSignature::Ptr(inner) => format!("{}*", inner.full_name()),
            TypeSignature::GenericParamType(index) => format!("!{index}"),
            TypeSignature::GenericParamMethod(index) => format!("!!{index}"),
            _ => String::new(),
        }
    }
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())
    }
}
