//! Member keys.
//!
//! A [`MemberIdentifier`] names a member within its declaring type. Fields and properties are
//! keyed by name; methods additionally carry their generic arity, return type and parameter
//! types, so overloads never collide. Parameter and return types are keyed by their full
//! signature text (generic arguments included, primitive spelling normalized), which is
//! independent of the assembly the signature was read from.

use std::fmt;

use strum::Display;

use crate::metadata::{
    members::{FieldDef, MethodDef, PropertyDef},
    signatures::TypeSignature,
};

/// Kind of member an identifier refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum MemberKind {
    /// A field
    Field,
    /// A method or constructor
    Method,
    /// A property
    Property,
}

/// Value-equality key for a member within its declaring type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberIdentifier {
    kind: MemberKind,
    name: String,
    generic_arity: u32,
    return_type: Option<String>,
    parameters: Vec<String>,
}

impl MemberIdentifier {
    /// Identifier of a field.
    pub fn field(name: impl Into<String>) -> Self {
        MemberIdentifier {
            kind: MemberKind::Field,
            name: name.into(),
            generic_arity: 0,
            return_type: None,
            parameters: Vec::new(),
        }
    }

    /// Identifier of a property.
    pub fn property(name: impl Into<String>) -> Self {
        MemberIdentifier {
            kind: MemberKind::Property,
            name: name.into(),
            generic_arity: 0,
            return_type: None,
            parameters: Vec::new(),
        }
    }

    /// Identifier of a method from its signature parts.
    pub fn method<'a>(
        name: impl Into<String>,
        generic_arity: u32,
        return_type: &TypeSignature,
        parameters: impl IntoIterator<Item = &'a TypeSignature>,
    ) -> Self {
        MemberIdentifier {
            kind: MemberKind::Method,
            name: name.into(),
            generic_arity,
            return_type: Some(return_type.full_name()),
            parameters: parameters.into_iter().map(TypeSignature::full_name).collect(),
        }
    }

    /// Identifier of a field definition.
    #[must_use]
    pub fn of_field(field: &FieldDef) -> Self {
        Self::field(field.name.clone())
    }

    /// Identifier of a property definition.
    #[must_use]
    pub fn of_property(property: &PropertyDef) -> Self {
        Self::property(property.name.clone())
    }

    /// Identifier of a method definition.
    #[must_use]
    pub fn of_method(method: &MethodDef) -> Self {
        Self::method(
            method.name.clone(),
            u32::try_from(method.generic_params.len()).unwrap_or(u32::MAX),
            &method.return_type,
            method.params.iter().map(|param| &param.signature),
        )
    }

    /// The member kind.
    #[must_use]
    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    /// The member name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full names of the parameter types (methods only).
    #[must_use]
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }
}

impl fmt::Display for MemberIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MemberKind::Method => {
                if let Some(ret) = &self.return_type {
                    write!(f, "{ret} ")?;
                }
                write!(f, "{}", self.name)?;
                if self.generic_arity > 0 {
                    write!(f, "`{}", self.generic_arity)?;
                }
                write!(f, "({})", self.parameters.join(","))
            }
            _ => write!(f, "{}", self.name),
        }
    }
}
