//! Fluent builders for the input graph.
//!
//! The translator consumes an already-read graph of assemblies; these builders are how such
//! a graph is put together in memory by readers, tests and benchmarks. Scoping is handled at
//! build time: every type learns its assembly and module, nested types inherit their
//! enclosing type's namespace, and members learn their declaring type's full name.
//!
//! # Examples
//!
//! ```rust
//! use dotscript::metadata::builders::{AssemblyBuilder, FieldBuilder, TypeDefBuilder};
//! use dotscript::metadata::signatures::TypeSignature;
//!
//! let assembly = AssemblyBuilder::new("App")
//!     .add_type(TypeDefBuilder::class("Demo", "Base"))
//!     .add_type(
//!         TypeDefBuilder::class("Demo", "Derived")
//!             .extends(TypeSignature::class("Demo", "Base"))
//!             .field(FieldBuilder::new("Count", TypeSignature::I4).static_()),
//!     )
//!     .build();
//!
//! assert_eq!(assembly.all_types().count(), 2);
//! ```

use std::sync::Arc;

use crate::{
    ast::DecompiledMethod,
    metadata::{
        assembly::{AssemblyDef, AssemblyDefRc, ModuleDef, ModuleDefRc},
        customattributes::CustomAttribute,
        identity::{AssemblyIdentity, AssemblyVersion},
        members::{
            ConstantValue, FieldAttributes, FieldDef, MethodAttributes, MethodBody, MethodDef,
            MethodImplAttributes, ParamDef, PropertyDef,
        },
        signatures::TypeSignature,
        types::{TypeAttributes, TypeDef, TypeDefRc, TypeScope},
    },
};

/// Builds an [`AssemblyDef`].
#[derive(Debug, Clone)]
pub struct AssemblyBuilder {
    identity: AssemblyIdentity,
    references: Vec<AssemblyIdentity>,
    custom_attributes: Vec<CustomAttribute>,
    main_module: ModuleBuilder,
    modules: Vec<ModuleBuilder>,
    has_symbols: bool,
}

impl AssemblyBuilder {
    /// Starts an assembly with version `0.0.0.0` and a main module named `<name>.dll`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        AssemblyBuilder {
            main_module: ModuleBuilder::new(format!("{name}.dll")),
            identity: AssemblyIdentity::new(name, AssemblyVersion::UNKNOWN),
            references: Vec::new(),
            custom_attributes: Vec::new(),
            modules: Vec::new(),
            has_symbols: true,
        }
    }

    /// Sets the version.
    #[must_use]
    pub fn version(mut self, version: AssemblyVersion) -> Self {
        self.identity.version = version;
        self
    }

    /// Adds a reference to another assembly.
    #[must_use]
    pub fn reference(mut self, identity: AssemblyIdentity) -> Self {
        self.references.push(identity);
        self
    }

    /// Adds a reference to another assembly by simple name, version `0.0.0.0`.
    #[must_use]
    pub fn reference_name(self, name: impl Into<String>) -> Self {
        self.reference(AssemblyIdentity::new(name, AssemblyVersion::UNKNOWN))
    }

    /// Attaches a custom attribute to the assembly.
    #[must_use]
    pub fn attribute(mut self, attribute: CustomAttribute) -> Self {
        self.custom_attributes.push(attribute);
        self
    }

    /// Attaches a custom attribute to the main module.
    #[must_use]
    pub fn module_attribute(mut self, attribute: CustomAttribute) -> Self {
        self.main_module = self.main_module.attribute(attribute);
        self
    }

    /// Adds a top-level type to the main module.
    #[must_use]
    pub fn add_type(mut self, builder: TypeDefBuilder) -> Self {
        self.main_module = self.main_module.add_type(builder);
        self
    }

    /// Adds a secondary module.
    #[must_use]
    pub fn module(mut self, module: ModuleBuilder) -> Self {
        self.modules.push(module);
        self
    }

    /// Marks the assembly as read without debug symbols.
    #[must_use]
    pub fn without_symbols(mut self) -> Self {
        self.has_symbols = false;
        self
    }

    /// Builds the assembly.
    #[must_use]
    pub fn build(self) -> AssemblyDefRc {
        let assembly_name = self.identity.name.clone();
        let modules = std::iter::once(self.main_module)
            .chain(self.modules)
            .map(|module| module.build(&assembly_name))
            .collect();

        Arc::new(AssemblyDef {
            identity: self.identity,
            modules,
            references: self.references,
            custom_attributes: self.custom_attributes,
            has_symbols: self.has_symbols,
        })
    }
}

/// Builds a [`ModuleDef`].
#[derive(Debug, Clone)]
pub struct ModuleBuilder {
    name: String,
    types: Vec<TypeDefBuilder>,
    custom_attributes: Vec<CustomAttribute>,
}

impl ModuleBuilder {
    /// Starts an empty module.
    pub fn new(name: impl Into<String>) -> Self {
        ModuleBuilder {
            name: name.into(),
            types: Vec::new(),
            custom_attributes: Vec::new(),
        }
    }

    /// Attaches a custom attribute to the module.
    #[must_use]
    pub fn attribute(mut self, attribute: CustomAttribute) -> Self {
        self.custom_attributes.push(attribute);
        self
    }

    /// Adds a top-level type.
    #[must_use]
    pub fn add_type(mut self, builder: TypeDefBuilder) -> Self {
        self.types.push(builder);
        self
    }

    fn build(self, assembly: &str) -> ModuleDefRc {
        let scope = TypeScope {
            assembly: assembly.to_string(),
            module: self.name.clone(),
        };
        let types = self
            .types
            .into_iter()
            .map(|builder| builder.build_in(&scope, None))
            .collect();

        Arc::new(ModuleDef {
            name: self.name,
            assembly: assembly.to_string(),
            types,
            custom_attributes: self.custom_attributes,
        })
    }
}

/// Builds a [`TypeDef`] with its members and nested types.
#[derive(Debug, Clone)]
pub struct TypeDefBuilder {
    namespace: String,
    name: String,
    flags: TypeAttributes,
    base: Option<TypeSignature>,
    interfaces: Vec<TypeSignature>,
    fields: Vec<FieldBuilder>,
    methods: Vec<MethodBuilder>,
    properties: Vec<PropertyBuilder>,
    nested: Vec<TypeDefBuilder>,
    generic_params: Vec<String>,
    custom_attributes: Vec<CustomAttribute>,
}

impl TypeDefBuilder {
    fn with_shape(
        namespace: impl Into<String>,
        name: impl Into<String>,
        flags: TypeAttributes,
        base: Option<TypeSignature>,
    ) -> Self {
        TypeDefBuilder {
            namespace: namespace.into(),
            name: name.into(),
            flags,
            base,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
            nested: Vec::new(),
            generic_params: Vec::new(),
            custom_attributes: Vec::new(),
        }
    }

    /// A class deriving from `System.Object`.
    pub fn class(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::with_shape(
            namespace,
            name,
            TypeAttributes::PUBLIC,
            Some(TypeSignature::Object),
        )
    }

    /// A struct (base `System.ValueType`).
    pub fn structure(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::with_shape(
            namespace,
            name,
            TypeAttributes::PUBLIC | TypeAttributes::SEALED,
            Some(TypeSignature::class("System", "ValueType")),
        )
    }

    /// An enum (base `System.Enum`) with its `value__` backing field.
    pub fn enumeration(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        let mut builder = Self::with_shape(
            namespace,
            name,
            TypeAttributes::PUBLIC | TypeAttributes::SEALED,
            Some(TypeSignature::class("System", "Enum")),
        );
        builder.fields.push(
            FieldBuilder::new("value__", TypeSignature::I4).flags(
                FieldAttributes::PUBLIC
                    | FieldAttributes::SPECIAL_NAME
                    | FieldAttributes::RT_SPECIAL_NAME,
            ),
        );
        builder
    }

    /// An interface.
    pub fn interface(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::with_shape(
            namespace,
            name,
            TypeAttributes::PUBLIC | TypeAttributes::INTERFACE | TypeAttributes::ABSTRACT,
            None,
        )
    }

    /// A static class (`abstract sealed`).
    pub fn static_class(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::with_shape(
            namespace,
            name,
            TypeAttributes::PUBLIC | TypeAttributes::ABSTRACT | TypeAttributes::SEALED,
            Some(TypeSignature::Object),
        )
    }

    /// Replaces the base type.
    #[must_use]
    pub fn extends(mut self, base: TypeSignature) -> Self {
        self.base = Some(base);
        self
    }

    /// Removes the base type.
    #[must_use]
    pub fn without_base(mut self) -> Self {
        self.base = None;
        self
    }

    /// Adds an implemented interface.
    #[must_use]
    pub fn implements(mut self, interface: TypeSignature) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Adds type flags.
    #[must_use]
    pub fn flags(mut self, flags: TypeAttributes) -> Self {
        self.flags |= flags;
        self
    }

    /// Adds a generic parameter; the name's arity suffix is not adjusted.
    #[must_use]
    pub fn generic_param(mut self, name: impl Into<String>) -> Self {
        self.generic_params.push(name.into());
        self
    }

    /// Attaches a custom attribute.
    #[must_use]
    pub fn attribute(mut self, attribute: CustomAttribute) -> Self {
        self.custom_attributes.push(attribute);
        self
    }

    /// Adds a field.
    #[must_use]
    pub fn field(mut self, field: FieldBuilder) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds an enum member: a static literal field of the enum's own type.
    #[must_use]
    pub fn enum_value(mut self, name: impl Into<String>, value: i64) -> Self {
        let own = TypeSignature::value_type(self.namespace.clone(), self.name.clone());
        self.fields
            .push(FieldBuilder::new(name, own).literal(ConstantValue::Int(value)));
        self
    }

    /// Adds a method.
    #[must_use]
    pub fn method(mut self, method: MethodBuilder) -> Self {
        self.methods.push(method);
        self
    }

    /// Adds a property; accessors are looked up among the type's methods by name.
    #[must_use]
    pub fn property(mut self, property: PropertyBuilder) -> Self {
        self.properties.push(property);
        self
    }

    /// Adds a nested type.
    #[must_use]
    pub fn nested(mut self, nested: TypeDefBuilder) -> Self {
        self.nested.push(nested);
        self
    }

    /// Builds the type outside of any assembly.
    #[must_use]
    pub fn build_detached(self) -> TypeDefRc {
        self.build_in(&TypeScope::default(), None)
    }

    fn build_in(self, scope: &TypeScope, outer: Option<(&str, &str)>) -> TypeDefRc {
        let namespace = match outer {
            Some((outer_namespace, _)) => outer_namespace.to_string(),
            None => self.namespace,
        };

        let mut definition = TypeDef {
            namespace,
            name: self.name,
            flags: self.flags,
            base: self.base,
            interfaces: self.interfaces,
            fields: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
            nested_types: Vec::new(),
            generic_params: self.generic_params,
            custom_attributes: self.custom_attributes,
            scope: scope.clone(),
            declaring_type: outer.map(|(_, outer_name)| outer_name.to_string()),
        };
        if outer.is_some() && definition.flags.contains(TypeAttributes::PUBLIC) {
            definition.flags.remove(TypeAttributes::PUBLIC);
            definition.flags |= TypeAttributes::NESTED_PUBLIC;
        }

        let full_name = definition.full_name();
        let own_signature = definition.signature();

        definition.fields = self
            .fields
            .into_iter()
            .map(|field| {
                let mut field = field.build(&full_name);
                // enum members were declared before the scope was known
                if field.is_literal() && definition_is_self(&field.signature, &definition) {
                    field.signature = own_signature.clone();
                }
                Arc::new(field)
            })
            .collect();
        definition.methods = self
            .methods
            .into_iter()
            .map(|method| Arc::new(method.build(&full_name)))
            .collect();
        definition.properties = self
            .properties
            .into_iter()
            .map(|property| Arc::new(property.build(&full_name, &definition.methods)))
            .collect();
        definition.nested_types = self
            .nested
            .into_iter()
            .map(|nested| nested.build_in(scope, Some((&definition.namespace, &full_name))))
            .collect();

        Arc::new(definition)
    }
}

fn definition_is_self(signature: &TypeSignature, definition: &TypeDef) -> bool {
    match signature {
        TypeSignature::ValueType(name) => {
            name.scope.is_none()
                && name.namespace == definition.namespace
                && name.name == definition.name
        }
        _ => false,
    }
}

/// Builds a [`FieldDef`].
#[derive(Debug, Clone)]
pub struct FieldBuilder {
    name: String,
    signature: TypeSignature,
    flags: FieldAttributes,
    constant: Option<ConstantValue>,
    custom_attributes: Vec<CustomAttribute>,
}

impl FieldBuilder {
    /// A public instance field.
    pub fn new(name: impl Into<String>, signature: TypeSignature) -> Self {
        FieldBuilder {
            name: name.into(),
            signature,
            flags: FieldAttributes::PUBLIC,
            constant: None,
            custom_attributes: Vec::new(),
        }
    }

    /// Makes the field static.
    #[must_use]
    pub fn static_(mut self) -> Self {
        self.flags |= FieldAttributes::STATIC;
        self
    }

    /// Makes the field a compile time constant.
    #[must_use]
    pub fn literal(mut self, value: ConstantValue) -> Self {
        self.flags |=
            FieldAttributes::STATIC | FieldAttributes::LITERAL | FieldAttributes::HAS_DEFAULT;
        self.constant = Some(value);
        self
    }

    /// Adds field flags.
    #[must_use]
    pub fn flags(mut self, flags: FieldAttributes) -> Self {
        self.flags |= flags;
        self
    }

    /// Attaches a custom attribute.
    #[must_use]
    pub fn attribute(mut self, attribute: CustomAttribute) -> Self {
        self.custom_attributes.push(attribute);
        self
    }

    fn build(self, declaring_type: &str) -> FieldDef {
        FieldDef {
            name: self.name,
            signature: self.signature,
            flags: self.flags,
            constant: self.constant,
            custom_attributes: self.custom_attributes,
            declaring_type: declaring_type.to_string(),
        }
    }
}

/// Builds a [`MethodDef`].
#[derive(Debug, Clone)]
pub struct MethodBuilder {
    name: String,
    flags: MethodAttributes,
    impl_flags: MethodImplAttributes,
    return_type: TypeSignature,
    params: Vec<ParamDef>,
    generic_params: Vec<String>,
    body: Option<MethodBody>,
    custom_attributes: Vec<CustomAttribute>,
}

impl MethodBuilder {
    /// A public instance method returning `void`, without a body.
    pub fn new(name: impl Into<String>) -> Self {
        MethodBuilder {
            name: name.into(),
            flags: MethodAttributes::PUBLIC | MethodAttributes::HIDE_BY_SIG,
            impl_flags: MethodImplAttributes::empty(),
            return_type: TypeSignature::Void,
            params: Vec::new(),
            generic_params: Vec::new(),
            body: None,
            custom_attributes: Vec::new(),
        }
    }

    /// An instance constructor.
    pub fn constructor() -> Self {
        Self::new(".ctor").flags(MethodAttributes::SPECIAL_NAME | MethodAttributes::RT_SPECIAL_NAME)
    }

    /// The static constructor.
    pub fn static_constructor() -> Self {
        let mut builder = Self::new(".cctor").flags(
            MethodAttributes::STATIC
                | MethodAttributes::SPECIAL_NAME
                | MethodAttributes::RT_SPECIAL_NAME,
        );
        builder.flags.remove(MethodAttributes::PUBLIC);
        builder.flags |= MethodAttributes::PRIVATE;
        builder
    }

    /// Sets the return type.
    #[must_use]
    pub fn returns(mut self, return_type: TypeSignature) -> Self {
        self.return_type = return_type;
        self
    }

    /// Appends a parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, signature: TypeSignature) -> Self {
        self.params.push(ParamDef {
            name: name.into(),
            signature,
        });
        self
    }

    /// Makes the method static.
    #[must_use]
    pub fn static_(self) -> Self {
        self.flags(MethodAttributes::STATIC)
    }

    /// Makes the method abstract and virtual.
    #[must_use]
    pub fn abstract_(self) -> Self {
        self.flags(MethodAttributes::ABSTRACT | MethodAttributes::VIRTUAL)
    }

    /// Adds method flags.
    #[must_use]
    pub fn flags(mut self, flags: MethodAttributes) -> Self {
        self.flags |= flags;
        self
    }

    /// Adds implementation flags.
    #[must_use]
    pub fn impl_flags(mut self, flags: MethodImplAttributes) -> Self {
        self.impl_flags |= flags;
        self
    }

    /// Adds a generic parameter.
    #[must_use]
    pub fn generic_param(mut self, name: impl Into<String>) -> Self {
        self.generic_params.push(name.into());
        self
    }

    /// Attaches a custom attribute.
    #[must_use]
    pub fn attribute(mut self, attribute: CustomAttribute) -> Self {
        self.custom_attributes.push(attribute);
        self
    }

    /// Sets a decompiled body; the instruction count is estimated from the tree.
    #[must_use]
    pub fn body(mut self, method: DecompiledMethod) -> Self {
        let instruction_count = method.estimated_instruction_count();
        self.body = Some(MethodBody::Tree {
            instruction_count,
            method,
        });
        self
    }

    /// Marks the body as one the decompiler could not handle.
    #[must_use]
    pub fn undecompilable(mut self, message: impl Into<String>) -> Self {
        let instruction_count = self
            .body
            .as_ref()
            .map_or(0, MethodBody::instruction_count);
        self.body = Some(MethodBody::Undecompilable {
            instruction_count,
            message: message.into(),
        });
        self
    }

    /// Overrides the instruction count of the body.
    #[must_use]
    pub fn instruction_count(mut self, count: usize) -> Self {
        match &mut self.body {
            Some(
                MethodBody::Tree {
                    instruction_count, ..
                }
                | MethodBody::Undecompilable {
                    instruction_count, ..
                },
            ) => *instruction_count = count,
            None => {}
        }
        self
    }

    fn build(self, declaring_type: &str) -> MethodDef {
        MethodDef {
            name: self.name,
            flags: self.flags,
            impl_flags: self.impl_flags,
            return_type: self.return_type,
            params: self.params,
            generic_params: self.generic_params,
            body: self.body,
            custom_attributes: self.custom_attributes,
            declaring_type: declaring_type.to_string(),
        }
    }
}

/// Builds a [`PropertyDef`].
#[derive(Debug, Clone)]
pub struct PropertyBuilder {
    name: String,
    signature: TypeSignature,
    getter: Option<String>,
    setter: Option<String>,
    custom_attributes: Vec<CustomAttribute>,
}

impl PropertyBuilder {
    /// A property without accessors.
    pub fn new(name: impl Into<String>, signature: TypeSignature) -> Self {
        PropertyBuilder {
            name: name.into(),
            signature,
            getter: None,
            setter: None,
            custom_attributes: Vec::new(),
        }
    }

    /// Names the getter method (conventionally `get_<Name>`).
    #[must_use]
    pub fn getter(mut self, method: impl Into<String>) -> Self {
        self.getter = Some(method.into());
        self
    }

    /// Names the setter method (conventionally `set_<Name>`).
    #[must_use]
    pub fn setter(mut self, method: impl Into<String>) -> Self {
        self.setter = Some(method.into());
        self
    }

    /// Attaches a custom attribute.
    #[must_use]
    pub fn attribute(mut self, attribute: CustomAttribute) -> Self {
        self.custom_attributes.push(attribute);
        self
    }

    fn build(self, declaring_type: &str, methods: &[Arc<MethodDef>]) -> PropertyDef {
        let lookup = |name: Option<String>| {
            name.and_then(|name| methods.iter().find(|method| method.name == name).cloned())
        };

        PropertyDef {
            getter: lookup(self.getter),
            setter: lookup(self.setter),
            name: self.name,
            signature: self.signature,
            custom_attributes: self.custom_attributes,
            declaring_type: declaring_type.to_string(),
        }
    }
}
