//! The translation orchestrator.
//!
//! [`AssemblyTranslator`] walks the types of an assembly three times, each walk over the
//! whole assembly before the next starts:
//!
//! 1. **Forward declare.** Interfaces and enums are declared in full. Classes, structs and
//!    static classes get a shell, their same-assembly base shell first.
//! 2. **Translate.** Method bodies, method groups, properties, interface records, struct
//!    field tables, field initializers and finally the static constructor.
//! 3. **Seal.** Post-order over nested types; every type with a static constructor is
//!    sealed.
//!
//! All walks use explicit stacks. The declared-type set doubles as the cycle guard of the
//! forward declaration walk.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use crate::{
    ast::{Expr, Function, Stmt},
    compiler::{BodyDecompiler, Decompiler, MethodPipeline, PassContext, PostProcess},
    metadata::{
        assembly::{AssemblyDef, AssemblyDefRc},
        diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics},
        graph::AssemblyGraph,
        identity::{MemberIdentifier, TypeIdentifier},
        members::{ConstantValue, MethodDefRc},
        signatures::TypeSignature,
        types::{TypeDef, TypeDefRc},
    },
    project::LoadResult,
    translator::{
        config::TranslatorConfig,
        declaration::{Declaration, InterfaceMemberKind, MemberOwner, Overload},
        escape::{escape_identifier, escape_path},
        sink::DeclarationSink,
    },
    typeinfo::{MemberInfo, MethodGroupInfo, TypeInfoRc, TypeInfoStore, TypeKind},
    Result,
};

/// Where a type lives in the emitted namespace tree.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TypeLocation {
    parent: String,
    name: String,
}

impl TypeLocation {
    /// Splits a full name at the last namespace separator; nested types keep `Outer/Inner`
    /// as one escaped name.
    fn of(definition: &TypeDef) -> Self {
        let full_name = definition.full_name();
        let head = full_name.split('/').next().unwrap_or(&full_name);

        match head.rfind('.') {
            Some(split) => TypeLocation {
                parent: escape_path(&full_name[..split]),
                name: escape_identifier(&full_name[split + 1..]),
            },
            None => TypeLocation {
                parent: "this".to_string(),
                name: escape_identifier(&full_name),
            },
        }
    }

    fn path(&self) -> String {
        format!("{}.{}", self.parent, self.name)
    }
}

enum DeclareStep {
    Enter(TypeDefRc),
    Shell(TypeInfoRc),
}

enum SealStep {
    Enter(TypeDefRc),
    Exit(TypeInfoRc),
}

fn constant_text(value: &ConstantValue) -> String {
    match value {
        ConstantValue::Null => "null".to_string(),
        ConstantValue::Bool(value) => value.to_string(),
        ConstantValue::Char(value) => format!("{:?}", value.to_string()),
        ConstantValue::Int(value) => value.to_string(),
        ConstantValue::UInt(value) => value.to_string(),
        ConstantValue::Float(value) => format!("{value:?}"),
        ConstantValue::String(value) => format!("{value:?}"),
    }
}

/// Translates assemblies into the declaration sequence.
///
/// One translator holds the caches of one run: the type models, the declared types and
/// namespaces, and the assemblies already generated. Requesting an assembly a second time
/// is a no-op.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use dotscript::metadata::builders::{AssemblyBuilder, TypeDefBuilder};
/// use dotscript::metadata::graph::AssemblyGraph;
/// use dotscript::translator::{AssemblyTranslator, TranslatorConfig, VecSink};
///
/// let app = AssemblyBuilder::new("App")
///     .add_type(TypeDefBuilder::class("App", "Widget"))
///     .build();
/// let graph = Arc::new(AssemblyGraph::from_assemblies([Arc::clone(&app)]));
///
/// let mut translator = AssemblyTranslator::new(TranslatorConfig::default(), graph);
/// let mut sink = VecSink::new();
/// translator.translate(&app, &mut sink)?;
///
/// assert_eq!(
///     sink.lines(),
///     vec![
///         r#"JSIL.DeclareNamespace("App");"#,
///         r#"JSIL.MakeClass("System.Object", App, "Widget", "App.Widget");"#,
///     ]
/// );
/// # Ok::<(), dotscript::Error>(())
/// ```
pub struct AssemblyTranslator {
    config: TranslatorConfig,
    store: TypeInfoStore,
    pipeline: MethodPipeline,
    decompiler: Box<dyn Decompiler>,
    diagnostics: Arc<Diagnostics>,
    declared_types: FxHashSet<TypeIdentifier>,
    declared_namespaces: FxHashSet<String>,
    generated: FxHashSet<String>,
}

impl AssemblyTranslator {
    /// Creates a translator over a type universe with its own diagnostics.
    #[must_use]
    pub fn new(config: TranslatorConfig, graph: Arc<AssemblyGraph>) -> Self {
        Self::with_diagnostics(config, graph, Arc::new(Diagnostics::new()))
    }

    /// Creates a translator recording into existing diagnostics.
    #[must_use]
    pub fn with_diagnostics(
        config: TranslatorConfig,
        graph: Arc<AssemblyGraph>,
        diagnostics: Arc<Diagnostics>,
    ) -> Self {
        let store = TypeInfoStore::new(graph)
            .with_ignored_types(config.ignored_types.iter().cloned())
            .with_proxy_attribute(config.proxy_attribute.clone())
            .with_diagnostics(Arc::clone(&diagnostics));

        AssemblyTranslator {
            pipeline: config.pipeline(),
            config,
            store,
            decompiler: Box::new(BodyDecompiler),
            diagnostics,
            declared_types: FxHashSet::default(),
            declared_namespaces: FxHashSet::default(),
            generated: FxHashSet::default(),
        }
    }

    /// Creates a translator over the assemblies of a load, sharing its diagnostics.
    #[must_use]
    pub fn from_load_result(config: TranslatorConfig, result: &LoadResult) -> Self {
        Self::with_diagnostics(
            config,
            Arc::new(result.graph()),
            Arc::clone(result.diagnostics()),
        )
    }

    /// Replaces the decompiler.
    #[must_use]
    pub fn with_decompiler(mut self, decompiler: Box<dyn Decompiler>) -> Self {
        self.decompiler = decompiler;
        self
    }

    /// The configuration of this run.
    #[must_use]
    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// The type model cache.
    #[must_use]
    pub fn store(&self) -> &TypeInfoStore {
        &self.store
    }

    /// Diagnostics recorded so far.
    #[must_use]
    pub fn diagnostics(&self) -> &Arc<Diagnostics> {
        &self.diagnostics
    }

    /// Registers the proxy types of an assembly. Must happen before translation starts.
    pub fn add_proxy_assembly(&self, assembly: &AssemblyDef) -> usize {
        self.store.add_proxy_assembly(assembly)
    }

    /// Returns `true` if a type has been forward-declared.
    #[must_use]
    pub fn is_declared(&self, identifier: &TypeIdentifier) -> bool {
        self.declared_types.contains(identifier)
    }

    /// Translates every assembly in order, each at most once.
    ///
    /// # Errors
    ///
    /// Returns an error only for sink failures and engine invariant violations; everything
    /// data-shaped is recorded in [`AssemblyTranslator::diagnostics`].
    pub fn translate_project(
        &mut self,
        assemblies: &[AssemblyDefRc],
        sink: &mut dyn DeclarationSink,
    ) -> Result<()> {
        for assembly in assemblies {
            self.translate(assembly, sink)?;
        }
        Ok(())
    }

    /// Translates one assembly.
    ///
    /// # Errors
    ///
    /// Returns an error only for sink failures and engine invariant violations.
    pub fn translate(
        &mut self,
        assembly: &AssemblyDef,
        sink: &mut dyn DeclarationSink,
    ) -> Result<()> {
        let full_name = assembly.full_name();
        if !self.generated.insert(full_name.clone()) {
            log::debug!("{full_name} already generated");
            return Ok(());
        }
        log::info!("translating assembly {full_name}");

        let roots: Vec<TypeDefRc> = assembly
            .modules
            .iter()
            .filter(|module| !module.is_ignored())
            .flat_map(|module| module.types.iter().cloned())
            .collect();

        for root in &roots {
            self.forward_declare(root, sink)?;
        }
        for root in &roots {
            self.translate_types(root, sink)?;
        }
        for root in &roots {
            self.seal_types(root, sink)?;
        }
        Ok(())
    }

    fn model(&self, definition: &TypeDefRc) -> Result<TypeInfoRc> {
        self.store
            .get_type_info_of(definition)
            .ok_or_else(|| invariant_error!("type {} has no model", definition.full_name()))
    }

    fn declare_namespace(
        &mut self,
        definition: &TypeDef,
        sink: &mut dyn DeclarationSink,
    ) -> Result<()> {
        if definition.is_nested() || definition.namespace.is_empty() {
            return Ok(());
        }

        let path = escape_path(&definition.namespace);
        if self.declared_namespaces.insert(path.clone()) {
            sink.emit(Declaration::DeclareNamespace { path })?;
        }
        Ok(())
    }

    fn record_cycle(&self, definition: &TypeDef) {
        let full_name = definition.full_name();
        log::warn!("inheritance cycle through {full_name}");
        self.diagnostics.push(
            Diagnostic::new(
                DiagnosticSeverity::Error,
                DiagnosticCategory::Declaration,
                "inheritance cycle; base declaration skipped",
            )
            .with_subject(full_name),
        );
    }

    /// Forward-declares a type, its same-assembly base chain and its nested types.
    fn forward_declare(
        &mut self,
        root: &TypeDefRc,
        sink: &mut dyn DeclarationSink,
    ) -> Result<()> {
        let mut in_progress: FxHashSet<TypeIdentifier> = FxHashSet::default();
        let mut stack = vec![DeclareStep::Enter(Arc::clone(root))];

        while let Some(step) = stack.pop() {
            match step {
                DeclareStep::Enter(definition) => {
                    let info = self.model(&definition)?;
                    if info.is_ignored() || !self.declared_types.insert(info.identifier().clone())
                    {
                        continue;
                    }
                    log::debug!("forward declaring {}", info.full_name());
                    self.declare_namespace(&definition, sink)?;

                    if info.kind().is_declared_in_full() {
                        self.declare_in_full(&info, sink)?;
                        stack.extend(
                            definition
                                .nested_types
                                .iter()
                                .rev()
                                .map(|nested| DeclareStep::Enter(Arc::clone(nested))),
                        );
                        continue;
                    }

                    in_progress.insert(info.identifier().clone());
                    stack.push(DeclareStep::Shell(Arc::clone(&info)));

                    let base = self
                        .store
                        .graph()
                        .base_type(&definition)
                        .filter(|base| AssemblyGraph::same_assembly(base, &definition));
                    if let Some(base) = base {
                        let base_identifier = TypeIdentifier::of_definition(&base);
                        if in_progress.contains(&base_identifier) {
                            self.record_cycle(&definition);
                        } else if !self.declared_types.contains(&base_identifier) {
                            stack.push(DeclareStep::Enter(base));
                        }
                    }
                }
                DeclareStep::Shell(info) => {
                    self.declare_shell(&info, sink)?;
                    in_progress.remove(info.identifier());
                    stack.extend(
                        info.definition()
                            .nested_types
                            .iter()
                            .rev()
                            .map(|nested| DeclareStep::Enter(Arc::clone(nested))),
                    );
                }
            }
        }
        Ok(())
    }

    fn declare_in_full(&self, info: &TypeInfoRc, sink: &mut dyn DeclarationSink) -> Result<()> {
        let definition = info.definition();
        let location = TypeLocation::of(definition);

        match info.kind() {
            TypeKind::Enum => sink.emit(Declaration::MakeEnum {
                parent: location.parent,
                name: location.name,
                full_name: definition.full_name(),
                members: info
                    .enum_members()
                    .iter()
                    .map(|member| (escape_identifier(&member.name), member.value))
                    .collect(),
                is_flags: info.is_flags(),
            }),
            TypeKind::Interface => {
                let mut members: Vec<(String, InterfaceMemberKind)> = Vec::new();
                for member in info.members() {
                    if member.is_ignored() {
                        continue;
                    }
                    let kind = match (member.as_method(), member.as_property()) {
                        (Some(_), _) => InterfaceMemberKind::Function,
                        (None, Some(_)) => InterfaceMemberKind::Property,
                        (None, None) => continue,
                    };
                    let name = escape_identifier(member.name());
                    if members.iter().all(|(existing, _)| *existing != name) {
                        members.push((name, kind));
                    }
                }

                sink.emit(Declaration::MakeInterface {
                    parent: location.parent,
                    name: location.name,
                    full_name: definition.full_name(),
                    members,
                })
            }
            kind => Err(invariant_error!(
                "{} is a {} and has no full declaration",
                info.full_name(),
                kind
            )),
        }
    }

    fn declare_shell(&self, info: &TypeInfoRc, sink: &mut dyn DeclarationSink) -> Result<()> {
        let definition = info.definition();
        let location = TypeLocation::of(definition);
        let full_name = definition.full_name();

        let declaration = match info.kind() {
            TypeKind::Struct => Declaration::MakeStruct {
                parent: location.parent,
                name: location.name,
                full_name,
            },
            TypeKind::StaticClass => Declaration::MakeStaticClass {
                parent: location.parent,
                name: location.name,
                full_name,
            },
            TypeKind::Class => Declaration::MakeClass {
                base: definition
                    .base
                    .as_ref()
                    .map_or_else(|| "System.Object".to_string(), TypeSignature::full_name),
                parent: location.parent,
                name: location.name,
                full_name,
            },
            kind => {
                return Err(invariant_error!(
                    "{} is a {} and has no shell declaration",
                    full_name,
                    kind
                ))
            }
        };
        sink.emit(declaration)
    }

    fn translate_types(&mut self, root: &TypeDefRc, sink: &mut dyn DeclarationSink) -> Result<()> {
        let mut stack = vec![Arc::clone(root)];

        while let Some(definition) = stack.pop() {
            let info = self.model(&definition)?;
            if info.is_ignored() {
                continue;
            }
            if !info.kind().is_declared_in_full() {
                self.translate_type(&info, sink)?;
            }
            stack.extend(definition.nested_types.iter().rev().cloned());
        }
        Ok(())
    }

    fn translate_type(&mut self, info: &TypeInfoRc, sink: &mut dyn DeclarationSink) -> Result<()> {
        log::debug!("translating {}", info.full_name());
        let definition = info.definition();
        let type_path = TypeLocation::of(definition).path();

        for member in info.methods() {
            let Some(method) = member.as_method() else {
                continue;
            };
            if member.is_ignored() || method.is_static_constructor() {
                continue;
            }
            self.translate_method(info, member, &type_path, None, sink)?;
        }

        for group in info.method_groups() {
            self.translate_group(info, group, &type_path, sink)?;
        }

        for member in info.properties() {
            let Some(property) = member.as_property() else {
                continue;
            };
            if member.is_ignored() {
                continue;
            }
            let accessor = |method: &Option<MethodDefRc>| {
                let method = method.as_ref()?;
                let accessor = info.member(&MemberIdentifier::of_method(method))?;
                (!accessor.is_ignored()).then(|| escape_identifier(&info.emitted_name(accessor)))
            };
            sink.emit(Declaration::MakeProperty {
                owner: MemberOwner::new(type_path.clone(), property.is_static()),
                name: escape_identifier(&property.name),
                getter: accessor(&property.getter),
                setter: accessor(&property.setter),
            })?;
        }

        let interfaces: Vec<String> = definition
            .interfaces
            .iter()
            .filter(|interface| !self.store.signature_ignored(interface))
            .map(TypeSignature::full_name)
            .collect();
        if !interfaces.is_empty() {
            sink.emit(Declaration::ImplementInterfaces {
                type_path: type_path.clone(),
                interfaces,
            })?;
        }

        self.translate_fields(info, &type_path, sink)?;
        self.translate_static_constructor(info, &type_path, sink)
    }

    fn translate_fields(
        &self,
        info: &TypeInfoRc,
        type_path: &str,
        sink: &mut dyn DeclarationSink,
    ) -> Result<()> {
        let graph = self.store.graph();
        let mut struct_fields = Vec::new();

        for member in info.fields() {
            let Some(field) = member.as_field() else {
                continue;
            };
            if member.is_ignored() || member.is_external() {
                continue;
            }

            let owner = MemberOwner::new(type_path, field.is_static());
            let name = escape_identifier(&field.name);
            if field.is_literal() {
                if let Some(constant) = &field.constant {
                    sink.emit(Declaration::DefineConstant {
                        owner,
                        name,
                        value: constant_text(constant),
                    })?;
                }
                continue;
            }

            if graph.is_struct(&field.signature) {
                if !field.is_static() {
                    struct_fields.push((name, field.signature.full_name()));
                }
                continue;
            }
            if info
                .static_constructor_fields()
                .iter()
                .any(|initialized| Arc::ptr_eq(initialized, field))
            {
                continue;
            }

            sink.emit(Declaration::FieldInitializer {
                owner,
                name,
                value: self.default_value_text(&field.signature),
            })?;
        }

        if !struct_fields.is_empty() {
            sink.emit(Declaration::StructFields {
                type_path: type_path.to_string(),
                fields: struct_fields,
            })?;
        }
        Ok(())
    }

    fn default_value_text(&self, signature: &TypeSignature) -> String {
        match signature.primitive_name() {
            Some("System.Boolean") => "false".to_string(),
            Some("System.Char") => "\"\\0\"".to_string(),
            Some("System.String" | "System.Object") => "null".to_string(),
            Some(_) => "0".to_string(),
            None if self.store.graph().is_enum(signature) => "0".to_string(),
            None => "null".to_string(),
        }
    }

    fn translate_static_constructor(
        &self,
        info: &TypeInfoRc,
        type_path: &str,
        sink: &mut dyn DeclarationSink,
    ) -> Result<()> {
        let Some(constructor) = info.static_constructor() else {
            return Ok(());
        };
        let Some(member) = info.static_constructor_member() else {
            return Err(invariant_error!(
                "static constructor of {} is not in its member table",
                info.full_name()
            ));
        };
        if member.is_ignored() {
            return Ok(());
        }

        let owner = info.definition().signature();
        let initializers: Vec<Stmt> = info
            .static_constructor_fields()
            .iter()
            .map(|field| {
                Stmt::Expr(Expr::assign(
                    Expr::Field {
                        target: None,
                        owner: owner.clone(),
                        name: field.name.clone(),
                        ty: field.signature.clone(),
                    },
                    Expr::DefaultValue(field.signature.clone()),
                ))
            })
            .collect();
        let insert_initializers = |function: &mut Function| -> Result<()> {
            let original = std::mem::take(&mut function.body.statements);
            function.body.statements = initializers.iter().cloned().chain(original).collect();
            Ok(())
        };

        self.translate_method(
            info,
            member,
            type_path,
            Some(&insert_initializers as PostProcess<'_>),
            sink,
        )
    }

    fn translate_group(
        &mut self,
        info: &TypeInfoRc,
        group: &MethodGroupInfo,
        type_path: &str,
        sink: &mut dyn DeclarationSink,
    ) -> Result<()> {
        let definition = info.definition();
        let graph = Arc::clone(self.store.graph());

        // A whole-assembly run has declared every module type by now; this covers groups
        // translated before their parameter types were reached.
        for method in group.methods().iter().filter_map(|member| member.as_method()) {
            for param in &method.params {
                let Some(param_type) = graph.resolve(param.signature.element_type()) else {
                    continue;
                };
                if AssemblyGraph::same_module(&param_type, definition)
                    && !self.is_declared(&TypeIdentifier::of_definition(&param_type))
                {
                    self.forward_declare(&param_type, sink)?;
                }
            }
        }

        sink.emit(Declaration::OverloadedMethod {
            owner: MemberOwner::new(type_path, group.is_static()),
            name: escape_identifier(group.name()),
            overloads: group
                .methods()
                .iter()
                .enumerate()
                .map(|(index, member)| Overload {
                    mangled_name: escape_identifier(&group.mangled_name(index)),
                    parameters: member.identifier().parameters().to_vec(),
                })
                .collect(),
        })
    }

    /// Emits one method: external member, translated function or untranslatable placeholder.
    fn translate_method(
        &self,
        info: &TypeInfoRc,
        member: &MemberInfo,
        type_path: &str,
        post: Option<PostProcess<'_>>,
        sink: &mut dyn DeclarationSink,
    ) -> Result<()> {
        let (Some(declared), Some(implementation)) = (member.as_method(), member.implementation())
        else {
            return Ok(());
        };

        let owner = MemberOwner::new(type_path, member.is_static());
        let name = escape_identifier(&info.emitted_name(member));
        if member.is_external() {
            if !member.is_replaced() {
                sink.emit(Declaration::ExternalMember { owner, name })?;
            }
            return Ok(());
        }
        if implementation.is_abstract() {
            return Ok(());
        }

        let full_name = declared.full_name();
        let instructions = implementation
            .body
            .as_ref()
            .map_or(0, |body| body.instruction_count());
        let large = instructions >= self.config.large_method_threshold;
        if large {
            log::info!("started translating {full_name} ({instructions} instructions)");
        }

        let ctx = PassContext {
            method: &full_name,
            oracle: &self.store,
        };
        let result = self
            .decompiler
            .decompile(implementation)
            .and_then(|tree| self.pipeline.run(&name, tree, &ctx, post));

        if large {
            log::info!("finished translating {full_name}");
        }

        match result {
            Ok(function) => sink.emit(Declaration::DefineMethod {
                owner,
                name,
                function,
            }),
            Err(error) if error.is_method_local() => {
                log::warn!("{error}");
                self.diagnostics.push(
                    Diagnostic::new(
                        DiagnosticSeverity::Error,
                        DiagnosticCategory::Method,
                        error.to_string(),
                    )
                    .with_subject(full_name.clone()),
                );
                sink.emit(Declaration::UntranslatableFunction {
                    owner,
                    name,
                    method: full_name,
                })
            }
            Err(error) => Err(error),
        }
    }

    fn seal_types(&self, root: &TypeDefRc, sink: &mut dyn DeclarationSink) -> Result<()> {
        let mut stack = vec![SealStep::Enter(Arc::clone(root))];

        while let Some(step) = stack.pop() {
            match step {
                SealStep::Enter(definition) => {
                    let info = self.model(&definition)?;
                    if info.is_ignored() {
                        continue;
                    }
                    stack.push(SealStep::Exit(info));
                    stack.extend(
                        definition
                            .nested_types
                            .iter()
                            .rev()
                            .map(|nested| SealStep::Enter(Arc::clone(nested))),
                    );
                }
                SealStep::Exit(info) => {
                    if !info.needs_seal() {
                        continue;
                    }
                    let location = TypeLocation::of(info.definition());
                    sink.emit(Declaration::SealType {
                        parent: location.parent,
                        name: location.name,
                    })?;
                }
            }
        }
        Ok(())
    }
}
