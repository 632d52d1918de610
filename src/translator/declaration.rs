//! The declaration sequence consumed by the target runtime.
//!
//! Every [`Declaration`] is one self-contained call against the runtime support library.
//! The [`fmt::Display`] rendering is a readable approximation of those calls, suitable for
//! golden tests and debugging; the real formatter is an external collaborator.
//!
//! Names stored in a declaration are already escaped; type full names (`full_name`, `base`,
//! interface and parameter type names) are kept verbatim and rendered as string literals.

use std::fmt;

use strum::{Display, EnumIter};

use crate::ast::Function;

/// The object a member is attached to: the type itself or its prototype.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberOwner {
    /// Escaped path of the type
    pub type_path: String,
    /// `true` for instance members
    pub prototype: bool,
}

impl MemberOwner {
    /// Owner for static members.
    pub fn of_type(type_path: impl Into<String>) -> Self {
        MemberOwner {
            type_path: type_path.into(),
            prototype: false,
        }
    }

    /// Owner for instance members.
    pub fn of_prototype(type_path: impl Into<String>) -> Self {
        MemberOwner {
            type_path: type_path.into(),
            prototype: true,
        }
    }

    /// Owner chosen by staticness.
    pub fn new(type_path: impl Into<String>, is_static: bool) -> Self {
        if is_static {
            Self::of_type(type_path)
        } else {
            Self::of_prototype(type_path)
        }
    }
}

impl fmt::Display for MemberOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prototype {
            write!(f, "{}.prototype", self.type_path)
        } else {
            write!(f, "{}", self.type_path)
        }
    }
}

/// What an interface member is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum InterfaceMemberKind {
    /// A method
    Function,
    /// A property
    Property,
}

/// One overload of a method group: its mangled name and parameter type names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overload {
    /// Name the overload is emitted under
    pub mangled_name: String,
    /// Full names of the parameter types
    pub parameters: Vec<String>,
}

/// The kind of a [`Declaration`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum DeclarationKind {
    /// Namespace declaration
    DeclareNamespace,
    /// Reference type shell
    MakeClass,
    /// Value type shell
    MakeStruct,
    /// Static class shell
    MakeStaticClass,
    /// Interface declaration
    MakeInterface,
    /// Enum declaration
    MakeEnum,
    /// Interface implementation record
    ImplementInterfaces,
    /// Runtime-supplied member
    ExternalMember,
    /// Translated method body
    DefineMethod,
    /// Untranslatable method placeholder
    UntranslatableFunction,
    /// Method group dispatch table
    OverloadedMethod,
    /// Property declaration
    MakeProperty,
    /// Struct field metadata
    StructFields,
    /// Literal field
    DefineConstant,
    /// Inline field initializer
    FieldInitializer,
    /// Static initialization seal
    SealType,
}

/// One call of the declaration protocol.
#[derive(Debug, Clone)]
pub enum Declaration {
    /// Creates a namespace object
    DeclareNamespace {
        /// Escaped dotted path
        path: String,
    },
    /// Declares a reference type shell
    MakeClass {
        /// Full name of the base type
        base: String,
        /// Escaped parent path
        parent: String,
        /// Escaped simple name
        name: String,
        /// Full name
        full_name: String,
    },
    /// Declares a value type shell
    MakeStruct {
        /// Escaped parent path
        parent: String,
        /// Escaped simple name
        name: String,
        /// Full name
        full_name: String,
    },
    /// Declares a static class shell
    MakeStaticClass {
        /// Escaped parent path
        parent: String,
        /// Escaped simple name
        name: String,
        /// Full name
        full_name: String,
    },
    /// Declares an interface in full
    MakeInterface {
        /// Escaped parent path
        parent: String,
        /// Escaped simple name
        name: String,
        /// Full name
        full_name: String,
        /// Escaped member names and kinds
        members: Vec<(String, InterfaceMemberKind)>,
    },
    /// Declares an enum in full
    MakeEnum {
        /// Escaped parent path
        parent: String,
        /// Escaped simple name
        name: String,
        /// Full name
        full_name: String,
        /// Escaped member names and values
        members: Vec<(String, i64)>,
        /// The enum carries the flags attribute
        is_flags: bool,
    },
    /// Records the interfaces a type implements
    ImplementInterfaces {
        /// Escaped path of the implementing type
        type_path: String,
        /// Full names of the interfaces
        interfaces: Vec<String>,
    },
    /// A member the runtime supplies
    ExternalMember {
        /// Owning object
        owner: MemberOwner,
        /// Escaped member name
        name: String,
    },
    /// A translated method body
    DefineMethod {
        /// Owning object
        owner: MemberOwner,
        /// Escaped, possibly mangled, method name
        name: String,
        /// The emittable function
        function: Function,
    },
    /// Placeholder for a method whose translation failed
    UntranslatableFunction {
        /// Owning object
        owner: MemberOwner,
        /// Escaped, possibly mangled, method name
        name: String,
        /// Full signature of the method
        method: String,
    },
    /// Dispatch table of a method group
    OverloadedMethod {
        /// Owning object
        owner: MemberOwner,
        /// Escaped group name
        name: String,
        /// Overloads in group order
        overloads: Vec<Overload>,
    },
    /// A property over accessor methods
    MakeProperty {
        /// Owning object
        owner: MemberOwner,
        /// Escaped property name
        name: String,
        /// Escaped emitted name of the getter
        getter: Option<String>,
        /// Escaped emitted name of the setter
        setter: Option<String>,
    },
    /// Instance fields of a struct that need copy semantics
    StructFields {
        /// Escaped path of the struct
        type_path: String,
        /// Escaped field names with their type full names
        fields: Vec<(String, String)>,
    },
    /// A literal field
    DefineConstant {
        /// Owning object
        owner: MemberOwner,
        /// Escaped field name
        name: String,
        /// Rendered constant value
        value: String,
    },
    /// Inline default-value assignment of a field
    FieldInitializer {
        /// Owning object
        owner: MemberOwner,
        /// Escaped field name
        name: String,
        /// Rendered default value
        value: String,
    },
    /// Marks static initialization of a type complete
    SealType {
        /// Escaped parent path
        parent: String,
        /// Escaped simple name
        name: String,
    },
}

impl Declaration {
    /// The kind of this declaration.
    #[must_use]
    pub fn kind(&self) -> DeclarationKind {
        match self {
            Declaration::DeclareNamespace { .. } => DeclarationKind::DeclareNamespace,
            Declaration::MakeClass { .. } => DeclarationKind::MakeClass,
            Declaration::MakeStruct { .. } => DeclarationKind::MakeStruct,
            Declaration::MakeStaticClass { .. } => DeclarationKind::MakeStaticClass,
            Declaration::MakeInterface { .. } => DeclarationKind::MakeInterface,
            Declaration::MakeEnum { .. } => DeclarationKind::MakeEnum,
            Declaration::ImplementInterfaces { .. } => DeclarationKind::ImplementInterfaces,
            Declaration::ExternalMember { .. } => DeclarationKind::ExternalMember,
            Declaration::DefineMethod { .. } => DeclarationKind::DefineMethod,
            Declaration::UntranslatableFunction { .. } => DeclarationKind::UntranslatableFunction,
            Declaration::OverloadedMethod { .. } => DeclarationKind::OverloadedMethod,
            Declaration::MakeProperty { .. } => DeclarationKind::MakeProperty,
            Declaration::StructFields { .. } => DeclarationKind::StructFields,
            Declaration::DefineConstant { .. } => DeclarationKind::DefineConstant,
            Declaration::FieldInitializer { .. } => DeclarationKind::FieldInitializer,
            Declaration::SealType { .. } => DeclarationKind::SealType,
        }
    }

    /// Full name of the type a type-level declaration creates.
    #[must_use]
    pub fn declared_type(&self) -> Option<&str> {
        match self {
            Declaration::MakeClass { full_name, .. }
            | Declaration::MakeStruct { full_name, .. }
            | Declaration::MakeStaticClass { full_name, .. }
            | Declaration::MakeInterface { full_name, .. }
            | Declaration::MakeEnum { full_name, .. } => Some(full_name),
            _ => None,
        }
    }
}

fn quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    write!(f, "{text:?}")
}

fn quoted_list(f: &mut fmt::Formatter<'_>, items: &[String]) -> fmt::Result {
    write!(f, "[")?;
    for (index, item) in items.iter().enumerate() {
        if index > 0 {
            write!(f, ", ")?;
        }
        quoted(f, item)?;
    }
    write!(f, "]")
}

fn accessor(f: &mut fmt::Formatter<'_>, owner: &MemberOwner, name: Option<&String>) -> fmt::Result {
    match name {
        Some(name) => write!(f, "{owner}.{name}"),
        None => write!(f, "null"),
    }
}

fn shell(
    f: &mut fmt::Formatter<'_>,
    call: &str,
    parent: &str,
    name: &str,
    full_name: &str,
) -> fmt::Result {
    write!(f, "JSIL.{call}({parent}, ")?;
    quoted(f, name)?;
    write!(f, ", ")?;
    quoted(f, full_name)
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Declaration::DeclareNamespace { path } => {
                write!(f, "JSIL.DeclareNamespace(")?;
                quoted(f, path)?;
                write!(f, ");")
            }
            Declaration::MakeClass {
                base,
                parent,
                name,
                full_name,
            } => {
                write!(f, "JSIL.MakeClass(")?;
                quoted(f, base)?;
                write!(f, ", {parent}, ")?;
                quoted(f, name)?;
                write!(f, ", ")?;
                quoted(f, full_name)?;
                write!(f, ");")
            }
            Declaration::MakeStruct {
                parent,
                name,
                full_name,
            } => {
                shell(f, "MakeStruct", parent, name, full_name)?;
                write!(f, ");")
            }
            Declaration::MakeStaticClass {
                parent,
                name,
                full_name,
            } => {
                shell(f, "MakeStaticClass", parent, name, full_name)?;
                write!(f, ");")
            }
            Declaration::MakeInterface {
                parent,
                name,
                full_name,
                members,
            } => {
                shell(f, "MakeInterface", parent, name, full_name)?;
                write!(f, ", {{")?;
                for (index, (member, kind)) in members.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    quoted(f, member)?;
                    write!(f, ": {kind}")?;
                }
                write!(f, "}});")
            }
            Declaration::MakeEnum {
                parent,
                name,
                full_name,
                members,
                is_flags,
            } => {
                shell(f, "MakeEnum", parent, name, full_name)?;
                write!(f, ", {{")?;
                for (index, (member, value)) in members.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    quoted(f, member)?;
                    write!(f, ": {value}")?;
                }
                write!(f, "}}, {is_flags});")
            }
            Declaration::ImplementInterfaces {
                type_path,
                interfaces,
            } => {
                write!(f, "JSIL.ImplementInterfaces({type_path}, ")?;
                quoted_list(f, interfaces)?;
                write!(f, ");")
            }
            Declaration::ExternalMember { owner, name } => {
                write!(f, "JSIL.ExternalMember({owner}, ")?;
                quoted(f, name)?;
                write!(f, ");")
            }
            Declaration::DefineMethod {
                owner,
                name,
                function,
            } => write!(f, "{owner}.{name} = {function};"),
            Declaration::UntranslatableFunction {
                owner,
                name,
                method,
            } => {
                write!(f, "{owner}.{name} = JSIL.UntranslatableFunction(")?;
                quoted(f, method)?;
                write!(f, ");")
            }
            Declaration::OverloadedMethod {
                owner,
                name,
                overloads,
            } => {
                write!(f, "JSIL.OverloadedMethod({owner}, ")?;
                quoted(f, name)?;
                write!(f, ", [")?;
                for (index, overload) in overloads.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "[")?;
                    quoted(f, &overload.mangled_name)?;
                    write!(f, ", ")?;
                    quoted_list(f, &overload.parameters)?;
                    write!(f, "]")?;
                }
                write!(f, "]);")
            }
            Declaration::MakeProperty {
                owner,
                name,
                getter,
                setter,
            } => {
                write!(f, "JSIL.MakeProperty({owner}, ")?;
                quoted(f, name)?;
                write!(f, ", ")?;
                accessor(f, owner, getter.as_ref())?;
                write!(f, ", ")?;
                accessor(f, owner, setter.as_ref())?;
                write!(f, ");")
            }
            Declaration::StructFields { type_path, fields } => {
                write!(f, "{type_path}.prototype.__StructFields__ = {{")?;
                for (index, (field, ty)) in fields.iter().enumerate() {
                    if index > 0 {
                        write!(f, ", ")?;
                    }
                    quoted(f, field)?;
                    write!(f, ": ")?;
                    quoted(f, ty)?;
                }
                write!(f, "}};")
            }
            Declaration::DefineConstant { owner, name, value } => {
                write!(f, "JSIL.MakeConstant({owner}, ")?;
                quoted(f, name)?;
                write!(f, ", {value});")
            }
            Declaration::FieldInitializer { owner, name, value } => {
                write!(f, "{owner}.{name} = {value};")
            }
            Declaration::SealType { parent, name } => {
                write!(f, "JSIL.SealType({parent}, ")?;
                quoted(f, name)?;
                write!(f, ");")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_shell_rendering() {
        let class = Declaration::MakeClass {
            base: "App.Base".to_string(),
            parent: "App".to_string(),
            name: "Derived".to_string(),
            full_name: "App.Derived".to_string(),
        };
        assert_eq!(
            class.to_string(),
            r#"JSIL.MakeClass("App.Base", App, "Derived", "App.Derived");"#
        );
        assert_eq!(class.kind(), DeclarationKind::MakeClass);
        assert_eq!(class.declared_type(), Some("App.Derived"));

        let seal = Declaration::SealType {
            parent: "App".to_string(),
            name: "Derived".to_string(),
        };
        assert_eq!(seal.to_string(), r#"JSIL.SealType(App, "Derived");"#);
        assert!(seal.declared_type().is_none());
    }

    #[test]
    fn test_member_rendering() {
        let owner = MemberOwner::of_prototype("App.Widget");
        let property = Declaration::MakeProperty {
            owner: owner.clone(),
            name: "Size".to_string(),
            getter: Some("get_Size".to_string()),
            setter: None,
        };
        assert_eq!(
            property.to_string(),
            r#"JSIL.MakeProperty(App.Widget.prototype, "Size", App.Widget.prototype.get_Size, null);"#
        );

        let group = Declaration::OverloadedMethod {
            owner,
            name: "F".to_string(),
            overloads: vec![
                Overload {
                    mangled_name: "F$240".to_string(),
                    parameters: vec!["System.Int32".to_string()],
                },
                Overload {
                    mangled_name: "F$241".to_string(),
                    parameters: vec![],
                },
            ],
        };
        assert_eq!(
            group.to_string(),
            r#"JSIL.OverloadedMethod(App.Widget.prototype, "F", [["F$240", ["System.Int32"]], ["F$241", []]]);"#
        );

        let flags = Declaration::MakeEnum {
            parent: "App".to_string(),
            name: "Access".to_string(),
            full_name: "App.Access".to_string(),
            members: vec![("Read".to_string(), 1), ("Write".to_string(), 2)],
            is_flags: true,
        };
        assert_eq!(
            flags.to_string(),
            r#"JSIL.MakeEnum(App, "Access", "App.Access", {"Read": 1, "Write": 2}, true);"#
        );
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(DeclarationKind::iter().count(), 16);
        assert_eq!(DeclarationKind::SealType.to_string(), "SealType");
    }
}
