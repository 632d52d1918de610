//! Field, method and property definitions.
//!
//! Members are owned by their declaring [`crate::metadata::types::TypeDef`] and shared through
//! `Arc`s, so the type information store and proxies can point at the same definition without
//! copying it. Every member remembers the full name of its declaring type.

use std::sync::Arc;

use bitflags::bitflags;

use crate::{
    ast::DecompiledMethod,
    metadata::{
        customattributes::{CustomAttribute, MemberMarks},
        signatures::TypeSignature,
    },
};

/// Shared reference to a field definition
pub type FieldDefRc = Arc<FieldDef>;
/// Shared reference to a method definition
pub type MethodDefRc = Arc<MethodDef>;
/// Shared reference to a property definition
pub type PropertyDefRc = Arc<PropertyDef>;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Field flags (`FieldAttributes`, ECMA-335 II.23.1.5)
    pub struct FieldAttributes: u32 {
        /// Accessible only by the parent type
        const PRIVATE = 0x0001;
        /// Accessible by anyone who has visibility to this scope
        const PUBLIC = 0x0006;
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Field can only be initialized, not written to after init
        const INIT_ONLY = 0x0020;
        /// Value is a compile time constant
        const LITERAL = 0x0040;
        /// Field is special
        const SPECIAL_NAME = 0x0200;
        /// Runtime should check name encoding
        const RT_SPECIAL_NAME = 0x0400;
        /// Field has default value
        const HAS_DEFAULT = 0x8000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Method flags (`MethodAttributes`, ECMA-335 II.23.1.10)
    pub struct MethodAttributes: u32 {
        /// Accessible only by the parent type
        const PRIVATE = 0x0001;
        /// Accessible by anyone who has visibility to this scope
        const PUBLIC = 0x0006;
        /// Defined on type, else per instance
        const STATIC = 0x0010;
        /// Method cannot be overridden
        const FINAL = 0x0020;
        /// Method is virtual
        const VIRTUAL = 0x0040;
        /// Method hides by name+sig, else just by name
        const HIDE_BY_SIG = 0x0080;
        /// Method does not provide an implementation
        const ABSTRACT = 0x0400;
        /// Method is special
        const SPECIAL_NAME = 0x0800;
        /// Runtime should check name encoding
        const RT_SPECIAL_NAME = 0x1000;
        /// Implementation is forwarded through PInvoke
        const PINVOKE_IMPL = 0x2000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    /// Method implementation flags (`MethodImplAttributes`, ECMA-335 II.23.1.11)
    pub struct MethodImplAttributes: u32 {
        /// Method impl is native
        const NATIVE = 0x0001;
        /// Method impl is provided by the runtime
        const RUNTIME = 0x0003;
        /// Method may not be inlined
        const NO_INLINING = 0x0008;
        /// Reserved: shall be zero in conforming implementations
        const INTERNAL_CALL = 0x1000;
        /// Method is single threaded through the body
        const SYNCHRONIZED = 0x0020;
    }
}

/// Value of a literal field.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstantValue {
    /// `null`
    Null,
    /// A boolean
    Bool(bool),
    /// A character
    Char(char),
    /// Any signed integer
    Int(i64),
    /// An unsigned integer too large for `i64`
    UInt(u64),
    /// A floating point number
    Float(f64),
    /// A string
    String(String),
}

impl ConstantValue {
    /// Returns the value as an integer, for enum member tables.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConstantValue::Int(value) => Some(*value),
            ConstantValue::UInt(value) => i64::try_from(*value).ok(),
            ConstantValue::Char(value) => Some(i64::from(u32::from(*value))),
            ConstantValue::Bool(value) => Some(i64::from(*value)),
            _ => None,
        }
    }
}

/// A field definition.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Field name
    pub name: String,
    /// Declared type
    pub signature: TypeSignature,
    /// Field flags
    pub flags: FieldAttributes,
    /// Constant value of literal fields
    pub constant: Option<ConstantValue>,
    /// Attached custom attributes
    pub custom_attributes: Vec<CustomAttribute>,
    /// Full name of the declaring type
    pub declaring_type: String,
}

impl FieldDef {
    /// Returns `true` for static fields.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags.contains(FieldAttributes::STATIC)
    }

    /// Returns `true` for compile time constants.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.flags.contains(FieldAttributes::LITERAL) && self.constant.is_some()
    }

    /// Full name in `Type Declaring::Name` form.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!(
            "{} {}::{}",
            self.signature.full_name(),
            self.declaring_type,
            self.name
        )
    }

    /// Marks read off the field's own attributes.
    #[must_use]
    pub fn marks(&self) -> MemberMarks {
        MemberMarks::from_attributes(&self.custom_attributes)
    }
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDef {
    /// Parameter name
    pub name: String,
    /// Parameter type
    pub signature: TypeSignature,
}

/// The body of a method as handed over by the decompiler.
#[derive(Debug, Clone)]
pub enum MethodBody {
    /// The decompiler produced a tree.
    Tree {
        /// Number of IL instructions in the original body
        instruction_count: usize,
        /// The decompiled tree
        method: DecompiledMethod,
    },
    /// The decompiler gave up on this body.
    Undecompilable {
        /// Number of IL instructions in the original body
        instruction_count: usize,
        /// The decompiler's diagnostic
        message: String,
    },
}

impl MethodBody {
    /// Number of IL instructions in the original body.
    #[must_use]
    pub fn instruction_count(&self) -> usize {
        match self {
            MethodBody::Tree {
                instruction_count, ..
            }
            | MethodBody::Undecompilable {
                instruction_count, ..
            } => *instruction_count,
        }
    }
}

/// A method definition.
#[derive(Debug, Clone)]
pub struct MethodDef {
    /// Method name (`.ctor` and `.cctor` for constructors)
    pub name: String,
    /// Method flags
    pub flags: MethodAttributes,
    /// Implementation flags
    pub impl_flags: MethodImplAttributes,
    /// Return type
    pub return_type: TypeSignature,
    /// Parameters in order
    pub params: Vec<ParamDef>,
    /// Names of the method's generic parameters
    pub generic_params: Vec<String>,
    /// Body, absent for abstract, runtime and P/Invoke methods
    pub body: Option<MethodBody>,
    /// Attached custom attributes
    pub custom_attributes: Vec<CustomAttribute>,
    /// Full name of the declaring type
    pub declaring_type: String,
}

impl MethodDef {
    /// Returns `true` for static methods.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags.contains(MethodAttributes::STATIC)
    }

    /// Returns `true` for abstract methods.
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.flags.contains(MethodAttributes::ABSTRACT)
    }

    /// Returns `true` for instance constructors.
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.name == ".ctor" && !self.is_static()
    }

    /// Returns `true` for the static constructor.
    #[must_use]
    pub fn is_static_constructor(&self) -> bool {
        self.name == ".cctor" && self.is_static()
    }

    /// Returns `true` if the implementation lives outside the assembly.
    ///
    /// Internal calls, runtime-implemented methods and P/Invoke stubs never carry a body the
    /// translator could emit.
    #[must_use]
    pub fn is_runtime_implemented(&self) -> bool {
        self.impl_flags.contains(MethodImplAttributes::INTERNAL_CALL)
            || self.impl_flags.contains(MethodImplAttributes::RUNTIME)
            || (self.flags.contains(MethodAttributes::PINVOKE_IMPL) && self.body.is_none())
    }

    /// Full name in `Ret Declaring::Name(P1,P2)` form.
    #[must_use]
    pub fn full_name(&self) -> String {
        let params: Vec<String> = self
            .params
            .iter()
            .map(|param| param.signature.full_name())
            .collect();
        format!(
            "{} {}::{}({})",
            self.return_type.full_name(),
            self.declaring_type,
            self.name,
            params.join(",")
        )
    }

    /// Marks read off the method's own attributes.
    #[must_use]
    pub fn marks(&self) -> MemberMarks {
        MemberMarks::from_attributes(&self.custom_attributes)
    }
}

/// A property definition.
#[derive(Debug, Clone)]
pub struct PropertyDef {
    /// Property name
    pub name: String,
    /// Property type
    pub signature: TypeSignature,
    /// Getter accessor
    pub getter: Option<MethodDefRc>,
    /// Setter accessor
    pub setter: Option<MethodDefRc>,
    /// Attached custom attributes
    pub custom_attributes: Vec<CustomAttribute>,
    /// Full name of the declaring type
    pub declaring_type: String,
}

impl PropertyDef {
    /// Returns `true` if the accessors are static.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.getter
            .as_ref()
            .or(self.setter.as_ref())
            .is_some_and(|accessor| accessor.is_static())
    }

    /// Marks read off the property's own attributes.
    #[must_use]
    pub fn marks(&self) -> MemberMarks {
        MemberMarks::from_attributes(&self.custom_attributes)
    }
}
