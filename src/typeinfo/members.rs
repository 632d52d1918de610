//! Member descriptors of a [`crate::typeinfo::TypeInfo`].
//!
//! A [`MemberInfo`] wraps one field, method or property definition together with what the
//! translator has learned about it: the marks read off its attributes (merged with those of
//! any proxy member patched onto it), the implementation to translate (which a proxy may
//! replace), and where the member came from.
//!
//! The effective ignore flag of a member depends on other types (a method is ignored if one of
//! its parameter types is), so it is resolved once in the second construction pass and frozen
//! afterwards.

use std::sync::{Arc, OnceLock};

use crate::metadata::{
    customattributes::MemberMarks,
    identity::{MemberIdentifier, MemberKind},
    members::{FieldDefRc, MethodBody, MethodDefRc, PropertyDefRc},
    signatures::TypeSignature,
};

/// Reference-counted [`MemberInfo`].
pub type MemberInfoRc = Arc<MemberInfo>;

/// The definition a member descriptor wraps.
#[derive(Debug, Clone)]
pub enum MemberDef {
    /// A field
    Field(FieldDefRc),
    /// A method or constructor
    Method(MethodDefRc),
    /// A property
    Property(PropertyDefRc),
}

impl MemberDef {
    /// Name of the wrapped definition.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            MemberDef::Field(field) => &field.name,
            MemberDef::Method(method) => &method.name,
            MemberDef::Property(property) => &property.name,
        }
    }

    /// Identifier of the wrapped definition.
    #[must_use]
    pub fn identifier(&self) -> MemberIdentifier {
        match self {
            MemberDef::Field(field) => MemberIdentifier::of_field(field),
            MemberDef::Method(method) => MemberIdentifier::of_method(method),
            MemberDef::Property(property) => MemberIdentifier::of_property(property),
        }
    }

    /// Marks read off the definition's own attributes.
    #[must_use]
    pub fn marks(&self) -> MemberMarks {
        match self {
            MemberDef::Field(field) => field.marks(),
            MemberDef::Method(method) => method.marks(),
            MemberDef::Property(property) => property.marks(),
        }
    }
}

/// Where a member descriptor came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberSource {
    /// Declared by the type itself
    Original,
    /// Added by a proxy; carries the proxy's full name
    Proxy {
        /// Full name of the proxy type
        proxy: String,
    },
    /// Created by the translator (the synthesized static constructor)
    Synthesized,
}

/// One member of a type model.
#[derive(Debug)]
pub struct MemberInfo {
    identifier: MemberIdentifier,
    definition: MemberDef,
    implementation: Option<MethodDefRc>,
    marks: MemberMarks,
    type_external: bool,
    source: MemberSource,
    ignored: OnceLock<bool>,
}

impl MemberInfo {
    /// Creates the descriptor of a member the type declares itself.
    #[must_use]
    pub fn new(definition: MemberDef, type_external: bool) -> Self {
        Self::with_source(definition, type_external, MemberSource::Original)
    }

    pub(crate) fn with_source(
        definition: MemberDef,
        type_external: bool,
        source: MemberSource,
    ) -> Self {
        MemberInfo {
            identifier: definition.identifier(),
            marks: definition.marks(),
            definition,
            implementation: None,
            type_external,
            source,
            ignored: OnceLock::new(),
        }
    }

    /// Applies a proxy member with the same identifier.
    ///
    /// The proxy's marks are added to the member's. A proxy method with a body that is not
    /// itself external becomes the implementation the translator emits.
    pub(crate) fn patch(&mut self, proxy_member: &MemberDef) {
        let proxy_marks = proxy_member.marks();
        self.marks = self.marks.merge(proxy_marks);

        if let MemberDef::Method(method) = proxy_member {
            if matches!(method.body, Some(MethodBody::Tree { .. })) && !proxy_marks.external {
                self.implementation = Some(Arc::clone(method));
            }
        }
    }

    /// Freezes the effective ignore flag; later calls have no effect.
    pub(crate) fn resolve_ignored(&self, ignored: bool) {
        let _ = self.ignored.set(self.marks.ignored || ignored);
    }

    /// The member's key within its type.
    #[must_use]
    pub fn identifier(&self) -> &MemberIdentifier {
        &self.identifier
    }

    /// The member kind.
    #[must_use]
    pub fn kind(&self) -> MemberKind {
        self.identifier.kind()
    }

    /// The member name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.definition.name()
    }

    /// The wrapped definition.
    #[must_use]
    pub fn definition(&self) -> &MemberDef {
        &self.definition
    }

    /// Where the member came from.
    #[must_use]
    pub fn source(&self) -> &MemberSource {
        &self.source
    }

    /// Marks of the member, proxy marks included.
    #[must_use]
    pub fn marks(&self) -> MemberMarks {
        self.marks
    }

    /// Returns `true` if the member is excluded from translation.
    ///
    /// Before the second construction pass only the attribute marks are known.
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        self.ignored.get().copied().unwrap_or(self.marks.ignored)
    }

    /// Returns `true` if the runtime supplies the member; no body is emitted.
    #[must_use]
    pub fn is_external(&self) -> bool {
        if self.marks.external {
            return true;
        }
        if self.implementation.is_some() {
            return false;
        }
        self.type_external
            || matches!(&self.definition, MemberDef::Method(method) if method.is_runtime_implemented())
    }

    /// Returns `true` if call sites of the member are replaced by the runtime.
    #[must_use]
    pub fn is_replaced(&self) -> bool {
        self.marks.replaced
    }

    /// Returns `true` for static members.
    #[must_use]
    pub fn is_static(&self) -> bool {
        match &self.definition {
            MemberDef::Field(field) => field.is_static(),
            MemberDef::Method(method) => method.is_static(),
            MemberDef::Property(property) => property.is_static(),
        }
    }

    /// The method whose body is translated: a proxy's replacement, or the method itself.
    #[must_use]
    pub fn implementation(&self) -> Option<&MethodDefRc> {
        match &self.definition {
            MemberDef::Method(method) => Some(self.implementation.as_ref().unwrap_or(method)),
            _ => None,
        }
    }

    /// Returns `true` if a proxy replaced the implementation.
    #[must_use]
    pub fn has_proxy_implementation(&self) -> bool {
        self.implementation.is_some()
    }

    /// The field definition, for field members.
    #[must_use]
    pub fn as_field(&self) -> Option<&FieldDefRc> {
        match &self.definition {
            MemberDef::Field(field) => Some(field),
            _ => None,
        }
    }

    /// The method definition, for method members.
    #[must_use]
    pub fn as_method(&self) -> Option<&MethodDefRc> {
        match &self.definition {
            MemberDef::Method(method) => Some(method),
            _ => None,
        }
    }

    /// The property definition, for property members.
    #[must_use]
    pub fn as_property(&self) -> Option<&PropertyDefRc> {
        match &self.definition {
            MemberDef::Property(property) => Some(property),
            _ => None,
        }
    }

    /// The types the member's signature mentions: a field's or property's type, a method's
    /// return type followed by its parameter types.
    #[must_use]
    pub fn signature_types(&self) -> Vec<&TypeSignature> {
        match &self.definition {
            MemberDef::Field(field) => vec![&field.signature],
            MemberDef::Property(property) => vec![&property.signature],
            MemberDef::Method(method) => std::iter::once(&method.return_type)
                .chain(method.params.iter().map(|param| &param.signature))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ast::DecompiledMethod,
        metadata::{
            builders::{MethodBuilder, TypeDefBuilder},
            customattributes::{CustomAttribute, EXTERNAL_ATTRIBUTE, IGNORE_ATTRIBUTE},
            members::MethodImplAttributes,
        },
    };

    #[test]
    fn test_proxy_body_replaces_implementation() {
        let target = TypeDefBuilder::class("App", "Target")
            .method(MethodBuilder::new("Run").impl_flags(MethodImplAttributes::INTERNAL_CALL))
            .build_detached();
        let proxy = TypeDefBuilder::class("Proxies", "TargetProxy")
            .method(MethodBuilder::new("Run").body(DecompiledMethod::new()))
            .build_detached();

        let mut member = MemberInfo::new(MemberDef::Method(target.methods[0].clone()), false);
        assert!(member.is_external());

        member.patch(&MemberDef::Method(proxy.methods[0].clone()));
        assert!(!member.is_external());
        assert!(member.has_proxy_implementation());
        assert_eq!(
            member.implementation().unwrap().declaring_type,
            "Proxies.TargetProxy"
        );
    }

    #[test]
    fn test_external_proxy_member_keeps_implementation() {
        let target = TypeDefBuilder::class("App", "Target")
            .method(MethodBuilder::new("Run").body(DecompiledMethod::new()))
            .build_detached();
        let proxy = TypeDefBuilder::class("Proxies", "TargetProxy")
            .method(
                MethodBuilder::new("Run")
                    .body(DecompiledMethod::new())
                    .attribute(CustomAttribute::new(EXTERNAL_ATTRIBUTE)),
            )
            .build_detached();

        let mut member = MemberInfo::new(MemberDef::Method(target.methods[0].clone()), false);
        member.patch(&MemberDef::Method(proxy.methods[0].clone()));

        assert!(member.is_external());
        assert!(!member.has_proxy_implementation());
    }

    #[test]
    fn test_ignore_resolution_is_frozen() {
        let target = TypeDefBuilder::class("App", "Target")
            .method(
                MethodBuilder::new("Hidden").attribute(CustomAttribute::new(IGNORE_ATTRIBUTE)),
            )
            .method(MethodBuilder::new("Plain").param("p", TypeSignature::I4))
            .build_detached();

        let hidden = MemberInfo::new(MemberDef::Method(target.methods[0].clone()), false);
        assert!(hidden.is_ignored());
        hidden.resolve_ignored(false);
        assert!(hidden.is_ignored());

        let plain = MemberInfo::new(MemberDef::Method(target.methods[1].clone()), false);
        assert!(!plain.is_ignored());
        plain.resolve_ignored(true);
        plain.resolve_ignored(false);
        assert!(plain.is_ignored());
        assert_eq!(plain.signature_types(), vec![&TypeSignature::Void, &TypeSignature::I4]);
    }
}
