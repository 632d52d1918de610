//! Assembly-independent type keys.
//!
//! A [`TypeIdentifier`] is what every cache in the type information engine is keyed by. It is
//! derived from a type's full name, its generic arity and its shape (array, by-ref and
//! pointer wrappers), and deliberately ignores:
//!
//! - the assembly the reference was resolved through, so the same nominal type reached via
//!   different reference paths collapses to one entry
//! - generic arguments, so `List`1<int>` and `List`1<string>` share their definition's model
//! - the primitive spelling, so `I4` and `ValueType(System.Int32)` are one type
//!
//! Constructing an identifier is pure and total.

use std::fmt;

use crate::metadata::{signatures::TypeSignature, types::TypeDef};

/// Constructed-type wrapper recorded in a [`TypeIdentifier`], outermost first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeShape {
    /// `T[]`
    SzArray,
    /// `T[,]` with the given rank
    Array(u32),
    /// `T&`
    ByRef,
    /// `T*`
    Pointer,
}

/// Value-equality key for a type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeIdentifier {
    full_name: String,
    arity: u32,
    shape: Vec<TypeShape>,
}

impl TypeIdentifier {
    /// Creates an identifier for a plain named type.
    pub fn named(full_name: impl Into<String>, arity: u32) -> Self {
        TypeIdentifier {
            full_name: full_name.into(),
            arity,
            shape: Vec::new(),
        }
    }

    /// Derives the identifier of a type reference.
    #[must_use]
    pub fn of(signature: &TypeSignature) -> Self {
        let mut shape = Vec::new();
        let mut current = signature;

        loop {
            match current {
                TypeSignature::SzArray(inner) => {
                    shape.push(TypeShape::SzArray);
                    current = inner;
                }
                TypeSignature::Array(inner, rank) => {
                    shape.push(TypeShape::Array(*rank));
                    current = inner;
                }
                TypeSignature::ByRef(inner) => {
                    shape.push(TypeShape::ByRef);
                    current = inner;
                }
                TypeSignature::Ptr(inner) => {
                    shape.push(TypeShape::Pointer);
                    current = inner;
                }
                TypeSignature::GenericInst(definition, _) => current = definition,
                _ => break,
            }
        }

        let (full_name, arity) = match current.definition_name() {
            Some(name) => (name.full_name(), name.generic_arity()),
            None => (current.full_name(), 0),
        };

        TypeIdentifier {
            full_name,
            arity,
            shape,
        }
    }

    /// Derives the identifier of a type definition.
    ///
    /// Equal to [`TypeIdentifier::of`] applied to any reference to the definition.
    #[must_use]
    pub fn of_definition(definition: &TypeDef) -> Self {
        let name = definition.type_name();
        TypeIdentifier {
            full_name: name.full_name(),
            arity: name.generic_arity(),
            shape: Vec::new(),
        }
    }

    /// Full name of the underlying named type.
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Generic arity of the underlying named type.
    #[must_use]
    pub fn arity(&self) -> u32 {
        self.arity
    }

    /// Wrappers around the named type, outermost first.
    #[must_use]
    pub fn shape(&self) -> &[TypeShape] {
        &self.shape
    }

    /// Returns `true` for arrays, pointers and by-ref types.
    #[must_use]
    pub fn is_constructed(&self) -> bool {
        !self.shape.is_empty()
    }
}

impl fmt::Display for TypeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name)?;
        for shape in self.shape.iter().rev() {
            match shape {
                TypeShape::SzArray => write!(f, "[]")?,
                TypeShape::Array(rank) => {
                    write!(f, "[{}]", ",".repeat(rank.saturating_sub(1) as usize))?;
                }
                TypeShape::ByRef => write!(f, "&")?,
                TypeShape::Pointer => write!(f, "*")?,
            }
        }
        Ok(())
    }
}
