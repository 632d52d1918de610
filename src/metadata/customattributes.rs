//! Custom attributes attached to modules, types and members.
//!
//! The translator reads a handful of well-known marker attributes (see the `*_ATTRIBUTE`
//! constants) to decide whether something is ignored, external, replaced by the runtime, or
//! a proxy. Attributes are matched by the full name of the attribute type.

use crate::metadata::signatures::TypeSignature;

/// Marks a module, type or member as excluded from translation.
pub const IGNORE_ATTRIBUTE: &str = "JSIL.Meta.JSIgnore";
/// Marks a type or member as supplied by the runtime; no body is emitted.
pub const EXTERNAL_ATTRIBUTE: &str = "JSIL.Meta.JSExternal";
/// Marks a method whose call sites are replaced by a runtime expression.
pub const REPLACEMENT_ATTRIBUTE: &str = "JSIL.Meta.JSReplacement";
/// Default marker for proxy types.
pub const PROXY_ATTRIBUTE: &str = "JSIL.Proxy.JSProxy";
/// Marks an enum as a bit-field.
pub const FLAGS_ATTRIBUTE: &str = "System.FlagsAttribute";

/// A constant argument of a custom attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeArgument {
    /// A boolean
    Bool(bool),
    /// Any integer
    Int(i64),
    /// A string
    String(String),
    /// An array of strings
    Strings(Vec<String>),
    /// A `typeof(...)` argument
    Type(TypeSignature),
    /// An array of `typeof(...)` arguments
    Types(Vec<TypeSignature>),
}

/// A custom attribute instance.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomAttribute {
    /// Full name of the attribute type
    pub type_name: String,
    /// Constructor arguments in order
    pub positional: Vec<AttributeArgument>,
    /// Named field/property arguments
    pub named: Vec<(String, AttributeArgument)>,
}

impl CustomAttribute {
    /// Creates an attribute without arguments.
    pub fn new(type_name: impl Into<String>) -> Self {
        CustomAttribute {
            type_name: type_name.into(),
            positional: Vec::new(),
            named: Vec::new(),
        }
    }

    /// Appends a positional argument.
    #[must_use]
    pub fn with_arg(mut self, argument: AttributeArgument) -> Self {
        self.positional.push(argument);
        self
    }

    /// Appends a named argument.
    #[must_use]
    pub fn with_named(mut self, name: impl Into<String>, argument: AttributeArgument) -> Self {
        self.named.push((name.into(), argument));
        self
    }

    /// Looks up a named argument.
    #[must_use]
    pub fn named_arg(&self, name: &str) -> Option<&AttributeArgument> {
        self.named
            .iter()
            .find(|(arg_name, _)| arg_name == name)
            .map(|(_, value)| value)
    }
}

/// Finds the first attribute of the given type.
#[must_use]
pub fn find_attribute<'a>(
    attributes: &'a [CustomAttribute],
    type_name: &str,
) -> Option<&'a CustomAttribute> {
    attributes.iter().find(|attr| attr.type_name == type_name)
}

/// Returns `true` if an attribute of the given type is present.
#[must_use]
pub fn has_attribute(attributes: &[CustomAttribute], type_name: &str) -> bool {
    find_attribute(attributes, type_name).is_some()
}

/// The translator-relevant facts read off an attribute list.
///
/// Proxies contribute their own marks on top of the target's, so marks only ever get set,
/// never cleared, by [`MemberMarks::merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemberMarks {
    /// Carries the ignore attribute
    pub ignored: bool,
    /// Carries the external attribute
    pub external: bool,
    /// Carries the replacement attribute
    pub replaced: bool,
}

impl MemberMarks {
    /// Reads the marks from an attribute list.
    #[must_use]
    pub fn from_attributes(attributes: &[CustomAttribute]) -> Self {
        MemberMarks {
            ignored: has_attribute(attributes, IGNORE_ATTRIBUTE),
            external: has_attribute(attributes, EXTERNAL_ATTRIBUTE),
            replaced: has_attribute(attributes, REPLACEMENT_ATTRIBUTE),
        }
    }

    /// Returns `true` if no mark is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.ignored && !self.external && !self.replaced
    }

    /// Combines two mark sets.
    #[must_use]
    pub fn merge(self, other: MemberMarks) -> Self {
        MemberMarks {
            ignored: self.ignored || other.ignored,
            external: self.external || other.external,
            replaced: self.replaced || other.replaced,
        }
    }
}
