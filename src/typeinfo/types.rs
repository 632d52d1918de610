//! Per-type and per-module models.

use std::sync::{Arc, OnceLock};

use rustc_hash::FxHashMap;

use crate::{
    metadata::{
        assembly::ModuleDef,
        customattributes::MemberMarks,
        identity::{MemberIdentifier, MemberKind, TypeIdentifier},
        members::{FieldDefRc, MethodDefRc},
        types::TypeDefRc,
    },
    typeinfo::{
        groups::MethodGroupInfo,
        members::{MemberInfo, MemberInfoRc},
        proxy::ProxyInfoRc,
        TypeKind,
    },
};

/// Reference-counted [`TypeInfo`].
pub type TypeInfoRc = Arc<TypeInfo>;
/// Reference-counted [`ModuleInfo`].
pub type ModuleInfoRc = Arc<ModuleInfo>;

/// What the translator knows about one module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Module file name
    pub name: String,
    /// Simple name of the owning assembly
    pub assembly: String,
    /// The module carries the ignore attribute
    pub ignored: bool,
}

impl ModuleInfo {
    /// Reads the model of a module.
    #[must_use]
    pub fn new(module: &ModuleDef) -> Self {
        ModuleInfo {
            name: module.name.clone(),
            assembly: module.assembly.clone(),
            ignored: module.is_ignored(),
        }
    }
}

/// One symbolic value of an enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumMember {
    /// Member name
    pub name: String,
    /// Numeric value
    pub value: i64,
}

/// The static constructor of a type.
#[derive(Debug, Clone)]
pub enum StaticConstructor {
    /// Declared by the type (or supplied by a proxy)
    Declared(MethodDefRc),
    /// Created because static fields need initialization and none was declared
    Synthesized(MethodDefRc),
}

impl StaticConstructor {
    /// The constructor method.
    #[must_use]
    pub fn method(&self) -> &MethodDefRc {
        match self {
            StaticConstructor::Declared(method) | StaticConstructor::Synthesized(method) => method,
        }
    }

    /// Returns `true` if the constructor was synthesized.
    #[must_use]
    pub fn is_synthesized(&self) -> bool {
        matches!(self, StaticConstructor::Synthesized(_))
    }
}

/// The frozen model of one type.
///
/// Built once per [`TypeIdentifier`] by [`crate::typeinfo::TypeInfoStore`]: the member table,
/// enum table and static constructor in the first pass, the method groups and effective member
/// ignore flags in the second.
#[derive(Debug)]
pub struct TypeInfo {
    pub(crate) identifier: TypeIdentifier,
    pub(crate) definition: TypeDefRc,
    pub(crate) kind: TypeKind,
    pub(crate) module: Option<ModuleInfoRc>,
    pub(crate) proxies: Vec<ProxyInfoRc>,
    pub(crate) members: Vec<MemberInfoRc>,
    pub(crate) index: FxHashMap<MemberIdentifier, usize>,
    pub(crate) enum_members: Vec<EnumMember>,
    pub(crate) is_flags: bool,
    pub(crate) marks: MemberMarks,
    pub(crate) ignored: bool,
    pub(crate) static_fields: Vec<FieldDefRc>,
    pub(crate) static_constructor: Option<StaticConstructor>,
    pub(crate) method_groups: OnceLock<Vec<MethodGroupInfo>>,
}

impl TypeInfo {
    /// The cache key of this model.
    #[must_use]
    pub fn identifier(&self) -> &TypeIdentifier {
        &self.identifier
    }

    /// The underlying definition.
    #[must_use]
    pub fn definition(&self) -> &TypeDefRc {
        &self.definition
    }

    /// Full name of the type.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.definition.full_name()
    }

    /// Nature of the type.
    #[must_use]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// The module the type is declared in, if it belongs to a loaded assembly.
    #[must_use]
    pub fn module(&self) -> Option<&ModuleInfoRc> {
        self.module.as_ref()
    }

    /// Proxies applied to this type, in registration order.
    #[must_use]
    pub fn proxies(&self) -> &[ProxyInfoRc] {
        &self.proxies
    }

    /// Every member in emission order: fields, methods, properties, then proxy-added and
    /// synthesized members.
    #[must_use]
    pub fn members(&self) -> &[MemberInfoRc] {
        &self.members
    }

    /// Looks up a member by identifier.
    #[must_use]
    pub fn member(&self, identifier: &MemberIdentifier) -> Option<&MemberInfoRc> {
        self.index.get(identifier).map(|index| &self.members[*index])
    }

    fn of_kind(&self, kind: MemberKind) -> impl Iterator<Item = &MemberInfoRc> {
        self.members
            .iter()
            .filter(move |member| member.kind() == kind)
    }

    /// Field members.
    pub fn fields(&self) -> impl Iterator<Item = &MemberInfoRc> {
        self.of_kind(MemberKind::Field)
    }

    /// Method members, constructors included.
    pub fn methods(&self) -> impl Iterator<Item = &MemberInfoRc> {
        self.of_kind(MemberKind::Method)
    }

    /// Property members.
    pub fn properties(&self) -> impl Iterator<Item = &MemberInfoRc> {
        self.of_kind(MemberKind::Property)
    }

    /// Symbolic values, for enums.
    #[must_use]
    pub fn enum_members(&self) -> &[EnumMember] {
        &self.enum_members
    }

    /// Returns `true` for enums carrying the flags attribute.
    #[must_use]
    pub fn is_flags(&self) -> bool {
        self.is_flags
    }

    /// Type-level marks, proxy marks included.
    #[must_use]
    pub fn marks(&self) -> MemberMarks {
        self.marks
    }

    /// Returns `true` if the type is excluded from translation.
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        self.ignored
    }

    /// Returns `true` if every member of the type is supplied by the runtime.
    #[must_use]
    pub fn is_external(&self) -> bool {
        self.marks.external
    }

    /// Returns `true` for structs.
    #[must_use]
    pub fn is_struct(&self) -> bool {
        self.kind == TypeKind::Struct
    }

    /// Static fields initialized inside the static constructor, in declaration order.
    #[must_use]
    pub fn static_constructor_fields(&self) -> &[FieldDefRc] {
        &self.static_fields
    }

    /// The declared or synthesized static constructor.
    #[must_use]
    pub fn static_constructor(&self) -> Option<&StaticConstructor> {
        self.static_constructor.as_ref()
    }

    /// Returns `true` if the type has a static constructor to run and seal.
    #[must_use]
    pub fn has_static_constructor(&self) -> bool {
        self.static_constructor.is_some()
    }

    /// Member entry of the static constructor.
    #[must_use]
    pub fn static_constructor_member(&self) -> Option<&MemberInfoRc> {
        self.static_constructor()
            .and_then(|constructor| self.member(&MemberIdentifier::of_method(constructor.method())))
    }

    /// Returns `true` if the static constructor is emitted, which is when the runtime must be
    /// told to seal the type.
    #[must_use]
    pub fn needs_seal(&self) -> bool {
        !self.kind().is_declared_in_full()
            && self
                .static_constructor_member()
                .is_some_and(|member| !member.is_ignored())
    }

    /// The method groups; empty until the second construction pass ran.
    #[must_use]
    pub fn method_groups(&self) -> &[MethodGroupInfo] {
        self.method_groups.get().map_or(&[], Vec::as_slice)
    }

    /// The group a method belongs to, with its index in that group.
    #[must_use]
    pub fn group_of(&self, identifier: &MemberIdentifier) -> Option<(&MethodGroupInfo, usize)> {
        self.method_groups().iter().find_map(|group| {
            group
                .index_of(identifier)
                .map(|index| (group, index))
        })
    }

    /// The name a method is emitted under: mangled when it belongs to a group.
    #[must_use]
    pub fn emitted_name(&self, member: &MemberInfo) -> String {
        match self.group_of(member.identifier()) {
            Some((group, index)) => group.mangled_name(index),
            None => member.name().to_string(),
        }
    }

    pub(crate) fn construct_method_groups(&self) {
        let _ = self
            .method_groups
            .set(MethodGroupInfo::construct(&self.full_name(), &self.members));
    }
}
