//! The type information store.
//!
//! [`TypeInfoStore`] owns the three caches of a translation run: type identifier to model,
//! module to model, and the proxy registry. Models are constructed on first request by the
//! two-pass algorithm described in the [module documentation](crate::typeinfo) and are never
//! rebuilt or invalidated afterwards.
//!
//! # Thread Safety
//!
//! The caches are `DashMap`s and the proxy registry is a `boxcar::Vec`, so a store can be
//! shared behind an `Arc`. Construction never holds a map guard across another map access;
//! two threads racing to build the same model both succeed and the first insert wins.

use std::{
    collections::VecDeque,
    sync::{Arc, OnceLock},
};

use dashmap::DashMap;
use rustc_hash::{FxBuildHasher, FxHashMap, FxHashSet};

use crate::{
    ast::DecompiledMethod,
    compiler::TypeOracle,
    metadata::{
        assembly::AssemblyDef,
        customattributes::{has_attribute, MemberMarks, FLAGS_ATTRIBUTE, PROXY_ATTRIBUTE},
        diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics},
        graph::AssemblyGraph,
        identity::{MemberIdentifier, TypeIdentifier},
        members::{MethodAttributes, MethodBody, MethodDef, MethodImplAttributes},
        signatures::TypeSignature,
        types::{TypeDef, TypeDefRc},
    },
    typeinfo::{
        members::{MemberDef, MemberInfo, MemberInfoRc, MemberSource},
        proxy::{ProxyInfo, ProxyInfoRc, ProxyRegistry},
        types::{EnumMember, ModuleInfo, ModuleInfoRc, StaticConstructor, TypeInfo, TypeInfoRc},
        TypeKind,
    },
};

/// Cache of type models for one translation run.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use dotscript::metadata::builders::{AssemblyBuilder, FieldBuilder, TypeDefBuilder};
/// use dotscript::metadata::graph::AssemblyGraph;
/// use dotscript::metadata::signatures::TypeSignature;
/// use dotscript::typeinfo::TypeInfoStore;
///
/// let app = AssemblyBuilder::new("App")
///     .add_type(
///         TypeDefBuilder::class("Demo", "Counter")
///             .field(FieldBuilder::new("Total", TypeSignature::I4).static_()),
///     )
///     .build();
/// let store = TypeInfoStore::new(Arc::new(AssemblyGraph::from_assemblies([app])));
///
/// let counter = TypeSignature::class("Demo", "Counter");
/// let first = store.get_type_info(&counter).unwrap();
/// let second = store.get_type_info(&counter).unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
/// assert!(first.static_constructor().unwrap().is_synthesized());
/// ```
#[derive(Debug)]
pub struct TypeInfoStore {
    graph: Arc<AssemblyGraph>,
    ignored_types: FxHashSet<String>,
    proxy_attribute: String,
    proxies: ProxyRegistry,
    types: DashMap<TypeIdentifier, Option<TypeInfoRc>, FxBuildHasher>,
    modules: DashMap<(String, String), ModuleInfoRc, FxBuildHasher>,
    diagnostics: Arc<Diagnostics>,
}

impl TypeInfoStore {
    /// Creates an empty store over a type universe.
    #[must_use]
    pub fn new(graph: Arc<AssemblyGraph>) -> Self {
        TypeInfoStore {
            graph,
            ignored_types: FxHashSet::default(),
            proxy_attribute: PROXY_ATTRIBUTE.to_string(),
            proxies: ProxyRegistry::new(),
            types: DashMap::default(),
            modules: DashMap::default(),
            diagnostics: Arc::new(Diagnostics::new()),
        }
    }

    /// Treats the given full type names as ignored.
    #[must_use]
    pub fn with_ignored_types<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_types.extend(names.into_iter().map(Into::into));
        self
    }

    /// Sets the attribute that marks proxy types.
    #[must_use]
    pub fn with_proxy_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.proxy_attribute = attribute.into();
        self
    }

    /// Shares a diagnostics container with other components.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Arc<Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// The type universe.
    #[must_use]
    pub fn graph(&self) -> &Arc<AssemblyGraph> {
        &self.graph
    }

    /// Diagnostics recorded by the store.
    #[must_use]
    pub fn diagnostics(&self) -> &Arc<Diagnostics> {
        &self.diagnostics
    }

    /// The registered proxies.
    #[must_use]
    pub fn proxies(&self) -> &ProxyRegistry {
        &self.proxies
    }

    /// Registers every proxy type of an assembly.
    ///
    /// Proxies must be registered before the models of their targets are requested; models
    /// are frozen once built. Returns the number of proxies added.
    pub fn add_proxy_assembly(&self, assembly: &AssemblyDef) -> usize {
        let added = assembly
            .all_types()
            .filter(|definition| self.add_proxy_type(definition))
            .count();
        log::debug!("registered {added} proxies from {}", assembly.name());
        added
    }

    /// Registers one proxy type; returns `false` if it is not a proxy or already known.
    pub fn add_proxy_type(&self, definition: &TypeDefRc) -> bool {
        match ProxyInfo::from_definition(Arc::clone(definition), &self.proxy_attribute) {
            Some(proxy) => self.proxies.register(proxy),
            None => false,
        }
    }

    /// The proxies applying to a type, each once, in registration order.
    #[must_use]
    pub fn proxies_for(&self, definition: &TypeDef) -> Vec<ProxyInfoRc> {
        self.proxies.matching(&self.graph, definition)
    }

    /// The model of a module, if the definition belongs to a loaded one.
    #[must_use]
    pub fn module_info(&self, definition: &TypeDef) -> Option<ModuleInfoRc> {
        let key = (
            definition.scope.assembly.clone(),
            definition.scope.module.clone(),
        );
        if let Some(existing) = self.modules.get(&key) {
            return Some(Arc::clone(existing.value()));
        }

        let module = self.graph.module_of(definition)?;
        let info = Arc::new(ModuleInfo::new(&module));
        Some(Arc::clone(self.modules.entry(key).or_insert(info).value()))
    }

    /// Number of cached entries, absent models included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if nothing was requested yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// The cached model for an identifier, without constructing anything.
    #[must_use]
    pub fn cached(&self, identifier: &TypeIdentifier) -> Option<TypeInfoRc> {
        self.types
            .get(identifier)
            .and_then(|entry| entry.value().clone())
    }

    /// Returns the model of the type a reference denotes.
    ///
    /// Builds it, and the models of every type reachable through member signatures, on first
    /// request. Returns `None` if the reference cannot be resolved; the absence is cached too.
    pub fn get_type_info(&self, signature: &TypeSignature) -> Option<TypeInfoRc> {
        let identifier = TypeIdentifier::of(signature);
        if let Some(entry) = self.types.get(&identifier) {
            return entry.value().clone();
        }

        let Some(definition) = self.graph.resolve(signature) else {
            if signature.definition_name().is_some() && signature.primitive_name().is_none() {
                self.diagnostics.push(
                    Diagnostic::new(
                        DiagnosticSeverity::Warning,
                        DiagnosticCategory::Type,
                        "type could not be resolved",
                    )
                    .with_subject(identifier.to_string()),
                );
            }
            self.types.entry(identifier).or_insert(None);
            return None;
        };

        let info = self.construct(definition);
        self.types
            .entry(identifier)
            .or_insert(info)
            .value()
            .clone()
    }

    /// Returns the model of a definition.
    pub fn get_type_info_of(&self, definition: &TypeDefRc) -> Option<TypeInfoRc> {
        let identifier = TypeIdentifier::of_definition(definition);
        if let Some(entry) = self.types.get(&identifier) {
            return entry.value().clone();
        }
        self.construct(Arc::clone(definition))
    }

    /// Looks up a member of a type.
    ///
    /// A type that cannot be resolved or a member it does not define yields `None` and a
    /// warning; callers treat the member as ignored.
    pub fn member_info(
        &self,
        owner: &TypeSignature,
        identifier: &MemberIdentifier,
    ) -> Option<MemberInfoRc> {
        let Some(info) = self.get_type_info(owner) else {
            self.diagnostics.push(
                Diagnostic::new(
                    DiagnosticSeverity::Warning,
                    DiagnosticCategory::Type,
                    format!("type of member '{identifier}' is not loaded"),
                )
                .with_subject(owner.full_name()),
            );
            return None;
        };

        let member = info.member(identifier).cloned();
        if member.is_none() {
            self.diagnostics.push(
                Diagnostic::new(
                    DiagnosticSeverity::Warning,
                    DiagnosticCategory::Member,
                    format!("member '{identifier}' is not defined"),
                )
                .with_subject(info.full_name()),
            );
        }
        member
    }

    /// Returns `true` if a type reference is excluded from translation.
    ///
    /// Pointers are always ignored, generic parameters never. Constructed types are ignored
    /// if any component is. A named type is ignored if it is listed by name, cannot be
    /// resolved, or its definition is ignored. Nothing is constructed by this query.
    #[must_use]
    pub fn signature_ignored(&self, signature: &TypeSignature) -> bool {
        let mut pending = vec![signature];

        while let Some(current) = pending.pop() {
            match current {
                TypeSignature::Ptr(_) => return true,
                TypeSignature::ByRef(inner)
                | TypeSignature::SzArray(inner)
                | TypeSignature::Array(inner, _) => pending.push(inner),
                TypeSignature::GenericInst(definition, arguments) => {
                    pending.push(definition);
                    pending.extend(arguments.iter());
                }
                TypeSignature::GenericParamType(_) | TypeSignature::GenericParamMethod(_) => {}
                named => {
                    if self.named_type_ignored(named) {
                        return true;
                    }
                }
            }
        }

        false
    }

    fn named_type_ignored(&self, signature: &TypeSignature) -> bool {
        if self.ignored_types.contains(&signature.full_name()) {
            return true;
        }
        if signature.primitive_name().is_some() {
            return false;
        }

        match self.graph.resolve(signature) {
            None => true,
            Some(definition) => {
                match self.cached(&TypeIdentifier::of_definition(&definition)) {
                    Some(info) => info.is_ignored(),
                    None => self.definition_ignored(&definition),
                }
            }
        }
    }

    /// Returns `true` if a definition is excluded from translation.
    ///
    /// A definition is ignored if it or a proxy applied to it carries the ignore attribute,
    /// its module is ignored, it is listed by name, or an enclosing type is ignored.
    #[must_use]
    pub fn definition_ignored(&self, definition: &TypeDefRc) -> bool {
        let mut seen = FxHashSet::default();
        let mut current = Some(Arc::clone(definition));

        while let Some(candidate) = current {
            let full_name = candidate.full_name();
            if !seen.insert(full_name.clone()) {
                break;
            }

            if self.ignored_types.contains(&full_name)
                || self.type_marks(&candidate).ignored
                || self
                    .module_info(&candidate)
                    .is_some_and(|module| module.ignored)
            {
                return true;
            }

            current = self.graph.declaring_type(&candidate);
        }

        false
    }

    fn type_marks(&self, definition: &TypeDef) -> MemberMarks {
        self.proxies_for(definition)
            .iter()
            .fold(definition.marks(), |marks, proxy| {
                marks.merge(proxy.type_marks())
            })
    }

    /// Runs both construction passes starting at `root`.
    fn construct(&self, root: TypeDefRc) -> Option<TypeInfoRc> {
        let root_identifier = TypeIdentifier::of_definition(&root);

        let mut queue = VecDeque::new();
        let mut queued = FxHashSet::default();
        queued.insert(root_identifier.clone());
        queue.push_back((root_identifier.clone(), root));

        let mut second_pass = Vec::new();
        while let Some((identifier, definition)) = queue.pop_front() {
            if self.types.contains_key(&identifier) {
                continue;
            }

            let info = Arc::new(self.build(identifier.clone(), definition));
            for related in related_types(&info) {
                let related_identifier = TypeIdentifier::of(&related);
                if self.types.contains_key(&related_identifier)
                    || !queued.insert(related_identifier.clone())
                {
                    continue;
                }

                match self.graph.resolve(&related) {
                    Some(definition) => queue.push_back((related_identifier, definition)),
                    None => {
                        self.types.entry(related_identifier).or_insert(None);
                    }
                }
            }

            self.types
                .entry(identifier)
                .or_insert_with(|| Some(Arc::clone(&info)));
            second_pass.push(info);
        }

        for info in &second_pass {
            for member in &info.members {
                let ignored = member
                    .signature_types()
                    .into_iter()
                    .any(|signature| self.signature_ignored(signature));
                member.resolve_ignored(ignored);
            }
            info.construct_method_groups();
        }
        if !second_pass.is_empty() {
            log::debug!(
                "constructed {} type models for {}",
                second_pass.len(),
                root_identifier
            );
        }

        self.cached(&root_identifier)
    }

    /// First pass: the member table and everything derived from the type alone.
    fn build(&self, identifier: TypeIdentifier, definition: TypeDefRc) -> TypeInfo {
        let kind = TypeKind::of(&definition);
        let proxies = self.proxies_for(&definition);
        let marks = proxies
            .iter()
            .fold(definition.marks(), |marks, proxy| {
                marks.merge(proxy.type_marks())
            });
        let ignored = self.definition_ignored(&definition);
        let module = self.module_info(&definition);

        let mut members: Vec<MemberInfo> = definition
            .fields
            .iter()
            .map(|field| MemberDef::Field(Arc::clone(field)))
            .chain(
                definition
                    .methods
                    .iter()
                    .map(|method| MemberDef::Method(Arc::clone(method))),
            )
            .chain(
                definition
                    .properties
                    .iter()
                    .map(|property| MemberDef::Property(Arc::clone(property))),
            )
            .map(|member| MemberInfo::new(member, marks.external))
            .collect();
        let mut index: FxHashMap<MemberIdentifier, usize> = members
            .iter()
            .enumerate()
            .map(|(position, member)| (member.identifier().clone(), position))
            .collect();

        for proxy in &proxies {
            apply_proxy(proxy, &mut members, &mut index, marks.external);
        }

        let enum_members = if kind == TypeKind::Enum {
            definition
                .fields
                .iter()
                .filter(|field| field.is_literal() && field.is_static())
                .filter_map(|field| {
                    let value = field.constant.as_ref()?.as_i64()?;
                    Some(EnumMember {
                        name: field.name.clone(),
                        value,
                    })
                })
                .collect()
        } else {
            Vec::new()
        };

        let static_fields = if kind.is_declared_in_full() {
            Vec::new()
        } else {
            members
                .iter()
                .filter_map(MemberInfo::as_field)
                .filter(|field| {
                    field.is_static()
                        && !field.is_literal()
                        && !field.marks().ignored
                        && !self.signature_ignored(&field.signature)
                        && self.needs_static_constructor(&field.signature)
                })
                .cloned()
                .collect()
        };

        let declared = members
            .iter()
            .filter_map(MemberInfo::as_method)
            .find(|method| method.is_static_constructor())
            .cloned();
        let static_constructor = match declared {
            Some(method) => Some(StaticConstructor::Declared(method)),
            None if !static_fields.is_empty() => {
                let method = Arc::new(synthesize_static_constructor(&definition));
                let member = MemberInfo::with_source(
                    MemberDef::Method(Arc::clone(&method)),
                    false,
                    MemberSource::Synthesized,
                );
                index.insert(member.identifier().clone(), members.len());
                members.push(member);
                Some(StaticConstructor::Synthesized(method))
            }
            None => None,
        };

        TypeInfo {
            identifier,
            kind,
            module,
            proxies,
            members: members.into_iter().map(Arc::new).collect(),
            index,
            enum_members,
            is_flags: has_attribute(&definition.custom_attributes, FLAGS_ATTRIBUTE),
            marks,
            ignored,
            static_fields,
            static_constructor,
            method_groups: OnceLock::new(),
            definition,
        }
    }

    /// Returns `true` if a static field of this type is initialized in the static constructor
    /// rather than assigned inline.
    ///
    /// Structs, primitive values, generic parameters and unresolvable types need it; enums,
    /// reference types, arrays and pointers do not.
    #[must_use]
    pub fn needs_static_constructor(&self, signature: &TypeSignature) -> bool {
        match signature {
            TypeSignature::SzArray(_)
            | TypeSignature::Array(..)
            | TypeSignature::ByRef(_)
            | TypeSignature::Ptr(_) => return false,
            TypeSignature::GenericParamType(_) | TypeSignature::GenericParamMethod(_) => {
                return true
            }
            _ => {}
        }

        if signature.primitive_name().is_some() {
            return signature.is_primitive();
        }
        if self.graph.is_struct(signature) {
            return true;
        }

        match self.graph.resolve(signature) {
            None => true,
            Some(definition) => definition.is_value_type() && !definition.is_enum(),
        }
    }
}

impl TypeOracle for TypeInfoStore {
    fn is_ignored_type(&self, signature: &TypeSignature) -> bool {
        self.signature_ignored(signature)
    }

    fn is_struct(&self, signature: &TypeSignature) -> bool {
        self.graph.is_struct(signature)
    }
}

/// Patches the members of one proxy onto a member table.
fn apply_proxy(
    proxy: &ProxyInfo,
    members: &mut Vec<MemberInfo>,
    index: &mut FxHashMap<MemberIdentifier, usize>,
    type_external: bool,
) {
    let source = proxy.definition();
    let proxy_members = source
        .fields
        .iter()
        .map(|field| MemberDef::Field(Arc::clone(field)))
        .chain(
            source
                .methods
                .iter()
                .filter(|method| !method.is_constructor() || !method.custom_attributes.is_empty())
                .map(|method| MemberDef::Method(Arc::clone(method))),
        )
        .chain(
            source
                .properties
                .iter()
                .map(|property| MemberDef::Property(Arc::clone(property))),
        );

    for proxy_member in proxy_members {
        let identifier = proxy_member.identifier();
        match index.get(&identifier).copied() {
            Some(position) => members[position].patch(&proxy_member),
            None => {
                index.insert(identifier, members.len());
                members.push(MemberInfo::with_source(
                    proxy_member,
                    type_external,
                    MemberSource::Proxy {
                        proxy: proxy.full_name(),
                    },
                ));
            }
        }
    }
}

/// The named types a model's member signatures mention, each stripped to the form a
/// definition lookup uses. Primitives are left out.
fn related_types(info: &TypeInfo) -> Vec<TypeSignature> {
    let mut result = Vec::new();
    let mut pending: Vec<&TypeSignature> = info
        .members
        .iter()
        .flat_map(|member| member.signature_types())
        .collect();

    while let Some(signature) = pending.pop() {
        match signature.element_type() {
            TypeSignature::GenericInst(definition, arguments) => {
                pending.push(definition);
                pending.extend(arguments.iter());
            }
            TypeSignature::GenericParamType(_) | TypeSignature::GenericParamMethod(_) => {}
            named if named.primitive_name().is_none() => result.push(named.clone()),
            _ => {}
        }
    }

    result
}

fn synthesize_static_constructor(definition: &TypeDef) -> MethodDef {
    MethodDef {
        name: ".cctor".to_string(),
        flags: MethodAttributes::STATIC
            | MethodAttributes::PRIVATE
            | MethodAttributes::SPECIAL_NAME
            | MethodAttributes::RT_SPECIAL_NAME,
        impl_flags: MethodImplAttributes::empty(),
        return_type: TypeSignature::Void,
        params: Vec::new(),
        generic_params: Vec::new(),
        body: Some(MethodBody::Tree {
            instruction_count: 0,
            method: DecompiledMethod::new(),
        }),
        custom_attributes: Vec::new(),
        declaring_type: definition.full_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{
        builders::{
            AssemblyBuilder, FieldBuilder, MethodBuilder, ModuleBuilder, PropertyBuilder,
            TypeDefBuilder,
        },
        customattributes::{AttributeArgument, CustomAttribute, IGNORE_ATTRIBUTE},
        identity::MemberKind,
        members::ConstantValue,
    };
    use crate::test::store_of;

    #[test]
    fn test_two_pass_idempotence() {
        let store = store_of(
            AssemblyBuilder::new("App")
                .add_type(
                    TypeDefBuilder::class("App", "Node")
                        .field(FieldBuilder::new("Next", TypeSignature::class("App", "Node")))
                        .field(FieldBuilder::new("Tag", TypeSignature::class("App", "Tag"))),
                )
                .add_type(
                    TypeDefBuilder::class("App", "Tag")
                        .field(FieldBuilder::new("Owner", TypeSignature::class("App", "Node"))),
                ),
        );

        let node = TypeSignature::class("App", "Node");
        let first = store.get_type_info(&node).unwrap();
        let cached = store.len();
        let second = store.get_type_info(&node).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.len(), cached);

        let tag = store
            .cached(&TypeIdentifier::named("App.Tag", 0))
            .expect("related type is built in the same run");
        assert!(tag.method_groups().is_empty());
        assert!(Arc::ptr_eq(
            &tag,
            &store.get_type_info(&TypeSignature::class("App", "Tag")).unwrap()
        ));
    }

    #[test]
    fn test_unresolved_type_is_cached_absent() {
        let store = store_of(AssemblyBuilder::new("App"));
        let missing = TypeSignature::class("App", "Missing");

        assert!(store.get_type_info(&missing).is_none());
        assert!(store.get_type_info(&missing).is_none());
        assert_eq!(store.diagnostics().warning_count(), 1);
        assert!(store.signature_ignored(&missing));
    }

    #[test]
    fn test_ignored_parameter_excludes_method_from_group() {
        let store = store_of(
            AssemblyBuilder::new("App")
                .add_type(
                    TypeDefBuilder::class("App", "Secret")
                        .attribute(CustomAttribute::new(IGNORE_ATTRIBUTE)),
                )
                .add_type(
                    TypeDefBuilder::class("App", "Api")
                        .method(MethodBuilder::new("Send").param("a", TypeSignature::I4))
                        .method(
                            MethodBuilder::new("Send")
                                .param("a", TypeSignature::class("App", "Secret")),
                        )
                        .method(MethodBuilder::new("Send").param("a", TypeSignature::String)),
                ),
        );

        let api = store
            .get_type_info(&TypeSignature::class("App", "Api"))
            .unwrap();
        let groups = api.method_groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);

        let hidden = api
            .methods()
            .find(|member| member.identifier().parameters() == ["App.Secret"])
            .unwrap();
        assert!(hidden.is_ignored());
        assert!(api.group_of(hidden.identifier()).is_none());
    }

    #[test]
    fn test_static_constructor_synthesis() {
        let store = store_of(
            AssemblyBuilder::new("App")
                .add_type(TypeDefBuilder::structure("App", "Point"))
                .add_type(TypeDefBuilder::enumeration("App", "Mode").enum_value("On", 1))
                .add_type(
                    TypeDefBuilder::class("App", "Holder")
                        .field(FieldBuilder::new("Origin", TypeSignature::value_type("App", "Point")).static_())
                        .field(FieldBuilder::new("Name", TypeSignature::String).static_())
                        .field(FieldBuilder::new("Mode", TypeSignature::value_type("App", "Mode")).static_())
                        .field(FieldBuilder::new("Count", TypeSignature::I4).static_())
                        .field(FieldBuilder::new("Limit", TypeSignature::I4).literal(ConstantValue::Int(3))),
                )
                .add_type(
                    TypeDefBuilder::class("App", "Plain")
                        .field(FieldBuilder::new("Name", TypeSignature::String).static_()),
                ),
        );

        let holder = store
            .get_type_info(&TypeSignature::class("App", "Holder"))
            .unwrap();
        let names: Vec<&str> = holder
            .static_constructor_fields()
            .iter()
            .map(|field| field.name.as_str())
            .collect();
        assert_eq!(names, vec!["Origin", "Count"]);

        let cctor = holder.static_constructor().unwrap();
        assert!(cctor.is_synthesized());
        assert!(cctor.method().is_static_constructor());
        assert_eq!(cctor.method().declaring_type, "App.Holder");
        assert!(holder
            .member(&MemberIdentifier::of_method(cctor.method()))
            .is_some_and(|member| *member.source() == MemberSource::Synthesized));

        let plain = store
            .get_type_info(&TypeSignature::class("App", "Plain"))
            .unwrap();
        assert!(!plain.has_static_constructor());
    }

    #[test]
    fn test_declared_static_constructor_is_kept() {
        let store = store_of(
            AssemblyBuilder::new("App").add_type(
                TypeDefBuilder::class("App", "Config")
                    .field(FieldBuilder::new("Retries", TypeSignature::I4).static_())
                    .method(MethodBuilder::static_constructor().body(DecompiledMethod::new())),
            ),
        );

        let config = store
            .get_type_info(&TypeSignature::class("App", "Config"))
            .unwrap();
        assert!(!config.static_constructor().unwrap().is_synthesized());
        assert_eq!(config.static_constructor_fields().len(), 1);
        assert_eq!(config.methods().count(), 1);
    }

    #[test]
    fn test_enum_members_and_flags() {
        let store = store_of(
            AssemblyBuilder::new("App").add_type(
                TypeDefBuilder::enumeration("App", "Access")
                    .attribute(CustomAttribute::new(FLAGS_ATTRIBUTE))
                    .enum_value("Read", 1)
                    .enum_value("Write", 2),
            ),
        );

        let access = store
            .get_type_info(&TypeSignature::value_type("App", "Access"))
            .unwrap();
        assert_eq!(access.kind(), TypeKind::Enum);
        assert!(access.is_flags());
        assert_eq!(
            access.enum_members(),
            &[
                EnumMember {
                    name: "Read".to_string(),
                    value: 1
                },
                EnumMember {
                    name: "Write".to_string(),
                    value: 2
                },
            ]
        );
        assert!(!access.has_static_constructor());
    }

    #[test]
    fn test_proxy_members_are_patched() {
        let store = store_of(
            AssemblyBuilder::new("App").add_type(
                TypeDefBuilder::class("App", "Clock")
                    .method(MethodBuilder::new("Now").returns(TypeSignature::I8))
                    .method(MethodBuilder::constructor().body(DecompiledMethod::new())),
            ),
        );
        let proxies = AssemblyBuilder::new("Proxies")
            .add_type(
                TypeDefBuilder::class("Proxies", "ClockProxy")
                    .attribute(CustomAttribute::new(PROXY_ATTRIBUTE).with_arg(
                        AttributeArgument::String("App.Clock".to_string()),
                    ))
                    .method(
                        MethodBuilder::new("Now")
                            .returns(TypeSignature::I8)
                            .body(DecompiledMethod::new()),
                    )
                    .method(MethodBuilder::new("Reset").body(DecompiledMethod::new()))
                    .method(
                        MethodBuilder::constructor()
                            .param("seed", TypeSignature::I4)
                            .body(DecompiledMethod::new()),
                    )
                    .property(PropertyBuilder::new("Zone", TypeSignature::String)),
            )
            .add_type(TypeDefBuilder::class("Proxies", "Unrelated"))
            .build();
        assert_eq!(store.add_proxy_assembly(&proxies), 1);

        let clock = store
            .get_type_info(&TypeSignature::class("App", "Clock"))
            .unwrap();
        assert_eq!(clock.proxies().len(), 1);

        let now = clock
            .methods()
            .find(|member| member.name() == "Now")
            .unwrap();
        assert!(now.has_proxy_implementation());

        let reset = clock
            .methods()
            .find(|member| member.name() == "Reset")
            .unwrap();
        assert_eq!(
            reset.source(),
            &MemberSource::Proxy {
                proxy: "Proxies.ClockProxy".to_string()
            }
        );

        assert_eq!(
            clock
                .methods()
                .filter(|member| member.name() == ".ctor")
                .count(),
            1
        );
        assert_eq!(clock.properties().count(), 1);
        assert_eq!(
            clock.members().last().unwrap().kind(),
            MemberKind::Property
        );
    }

    #[test]
    fn test_ignore_propagation() {
        let assembly = AssemblyBuilder::new("App")
            .module(
                ModuleBuilder::new("Hidden.dll")
                    .attribute(CustomAttribute::new(IGNORE_ATTRIBUTE))
                    .add_type(TypeDefBuilder::class("Hidden", "Thing")),
            )
            .add_type(
                TypeDefBuilder::class("App", "Outer")
                    .attribute(CustomAttribute::new(IGNORE_ATTRIBUTE))
                    .nested(TypeDefBuilder::class("App", "Inner")),
            )
            .add_type(TypeDefBuilder::class("App", "Listed"))
            .add_type(TypeDefBuilder::class("App", "Visible"))
            .build();
        let store = TypeInfoStore::new(Arc::new(AssemblyGraph::from_assemblies([assembly])))
            .with_ignored_types(["App.Listed"]);

        assert!(store.signature_ignored(&TypeSignature::class("Hidden", "Thing")));
        assert!(store.signature_ignored(&TypeSignature::class("App", "Outer/Inner")));
        assert!(store.signature_ignored(&TypeSignature::class("App", "Listed").sz_array()));
        assert!(store.signature_ignored(&TypeSignature::I4.ptr()));
        assert!(!store.signature_ignored(&TypeSignature::class("App", "Visible")));
        assert!(!store.signature_ignored(&TypeSignature::GenericParamType(0)));
        assert!(store.signature_ignored(&TypeSignature::GenericInst(
            Box::new(TypeSignature::class("App", "Visible")),
            vec![TypeSignature::class("App", "Listed")],
        )));
    }

    #[test]
    fn test_member_lookup_warnings() {
        let store = store_of(
            AssemblyBuilder::new("App").add_type(
                TypeDefBuilder::class("App", "Box").field(FieldBuilder::new("Value", TypeSignature::Object)),
            ),
        );
        let owner = TypeSignature::class("App", "Box");

        assert!(store
            .member_info(&owner, &MemberIdentifier::field("Value"))
            .is_some());
        assert!(store
            .member_info(&owner, &MemberIdentifier::field("Missing"))
            .is_none());
        assert!(store
            .member_info(&TypeSignature::class("App", "Gone"), &MemberIdentifier::field("X"))
            .is_none());

        assert_eq!(
            store
                .diagnostics()
                .by_category(DiagnosticCategory::Member)
                .len(),
            1
        );
        assert!(!store
            .diagnostics()
            .by_category(DiagnosticCategory::Type)
            .is_empty());
    }

    #[test]
    fn test_deep_chain_does_not_recurse() {
        let mut builder = AssemblyBuilder::new("App");
        for index in 0..2_000 {
            builder = builder.add_type(TypeDefBuilder::class("Deep", format!("T{index}")).field(
                FieldBuilder::new("next", TypeSignature::class("Deep", format!("T{}", index + 1))),
            ));
        }
        let store = store_of(builder);

        assert!(store
            .get_type_info(&TypeSignature::class("Deep", "T0"))
            .is_some());
        assert!(store
            .cached(&TypeIdentifier::named("Deep.T1999", 0))
            .is_some());
        assert!(store.signature_ignored(&TypeSignature::class("Deep", "T2000")));
    }
}
