//! Integration tests for whole-assembly translation.
//!
//! These tests assemble small in-memory graphs with the public builders, run the three-phase
//! translator over them and check the emitted declaration sequence and diagnostics.

use std::sync::Arc;

use dotscript::{
    ast::{Expr, MethodRef, Stmt},
    metadata::customattributes::IGNORE_ATTRIBUTE,
    prelude::*,
    translator::{escape_identifier, unescape_identifier},
    Result,
};

fn translate(assembly: AssemblyDefRc, config: TranslatorConfig) -> Result<(Vec<Declaration>, AssemblyTranslator)> {
    let graph = Arc::new(AssemblyGraph::from_assemblies([Arc::clone(&assembly)]));
    let mut translator = AssemblyTranslator::new(config, graph);
    let mut sink = VecSink::new();
    translator.translate(&assembly, &mut sink)?;
    Ok((sink.into_declarations(), translator))
}

fn kinds(declarations: &[Declaration]) -> Vec<DeclarationKind> {
    declarations.iter().map(Declaration::kind).collect()
}

/// Base and derived class, with a static `int` field on the derived class:
/// the shells come in base-first order, the derived type gets a synthesized
/// static constructor initializing the field, and only the derived type is sealed.
#[test]
fn test_base_derived_end_to_end() -> Result<()> {
    let assembly = AssemblyBuilder::new("App")
        .add_type(
            TypeDefBuilder::class("App", "Derived")
                .extends(TypeSignature::class("App", "Base"))
                .field(FieldBuilder::new("Count", TypeSignature::I4).static_()),
        )
        .add_type(TypeDefBuilder::class("App", "Base"))
        .build();

    let (declarations, translator) = translate(assembly, TranslatorConfig::default())?;

    assert_eq!(
        kinds(&declarations),
        vec![
            DeclarationKind::DeclareNamespace,
            DeclarationKind::MakeClass,
            DeclarationKind::MakeClass,
            DeclarationKind::DefineMethod,
            DeclarationKind::SealType,
        ]
    );
    assert_eq!(
        declarations[1].to_string(),
        r#"JSIL.MakeClass("System.Object", App, "Base", "App.Base");"#
    );
    assert_eq!(
        declarations[2].to_string(),
        r#"JSIL.MakeClass("App.Base", App, "Derived", "App.Derived");"#
    );

    let Declaration::DefineMethod { owner, function, .. } = &declarations[3] else {
        panic!("expected the static constructor, got {}", declarations[3]);
    };
    assert_eq!(owner.to_string(), "App.Derived");
    let Some(Stmt::Expr(Expr::Assign { target, .. })) = function.body.statements.first() else {
        panic!("static constructor does not start with an initializer");
    };
    assert!(matches!(target.as_ref(), Expr::Field { name, .. } if name == "Count"));

    assert_eq!(
        declarations[4].to_string(),
        r#"JSIL.SealType(App, "Derived");"#
    );
    assert!(!translator.diagnostics().has_errors());
    Ok(())
}

/// A static struct-typed field needs a static constructor even when the type declares none;
/// the initializers precede the statements of an explicit static constructor.
#[test]
fn test_static_constructor_initializers_precede_body() -> Result<()> {
    let mut body = dotscript::ast::DecompiledMethod::new();
    body.body.push(Stmt::Expr(Expr::assign(
        Expr::static_field(TypeSignature::class("App", "Scene"), "Ready", TypeSignature::Boolean),
        Expr::bool(true),
    )));

    let assembly = AssemblyBuilder::new("App")
        .add_type(TypeDefBuilder::structure("App", "Point").field(FieldBuilder::new("X", TypeSignature::I4)))
        .add_type(
            TypeDefBuilder::class("App", "Scene")
                .field(FieldBuilder::new("Origin", TypeSignature::value_type("App", "Point")).static_())
                .field(FieldBuilder::new("Ready", TypeSignature::Boolean).static_())
                .method(MethodBuilder::static_constructor().body(body)),
        )
        .build();

    let (declarations, _) = translate(assembly, TranslatorConfig::default())?;

    let constructor = declarations
        .iter()
        .find_map(|declaration| match declaration {
            Declaration::DefineMethod { owner, function, .. } if owner.to_string() == "App.Scene" => {
                Some(function)
            }
            _ => None,
        })
        .expect("static constructor of App.Scene");

    let assigned: Vec<String> = constructor
        .body
        .statements
        .iter()
        .filter_map(|statement| match statement {
            Stmt::Expr(Expr::Assign { target, .. }) => match target.as_ref() {
                Expr::Field { name, .. } => Some(name.clone()),
                _ => None,
            },
            _ => None,
        })
        .collect();
    assert_eq!(assigned, vec!["Origin", "Ready", "Ready"]);

    let seals: Vec<String> = declarations
        .iter()
        .filter(|declaration| declaration.kind() == DeclarationKind::SealType)
        .map(ToString::to_string)
        .collect();
    assert_eq!(seals, vec![r#"JSIL.SealType(App, "Scene");"#]);
    Ok(())
}

/// A method touching an ignored type becomes a placeholder; its siblings still translate.
#[test]
fn test_untranslatable_method_does_not_affect_siblings() -> Result<()> {
    let mut touches_secret = dotscript::ast::DecompiledMethod::new();
    touches_secret
        .variables
        .local("secret", TypeSignature::class("Vendor", "Secret"));

    let assembly = AssemblyBuilder::new("App")
        .add_type(
            TypeDefBuilder::class("App", "Service")
                .method(MethodBuilder::new("Leak").body(touches_secret))
                .method(MethodBuilder::new("Run").body(dotscript::ast::DecompiledMethod::new()))
                .method(MethodBuilder::new("Stop").body(dotscript::ast::DecompiledMethod::new())),
        )
        .build();

    let config = TranslatorConfig::default().ignore_type("Vendor.Secret");
    let (declarations, translator) = translate(assembly, config)?;

    assert_eq!(
        kinds(&declarations)[2..],
        [
            DeclarationKind::UntranslatableFunction,
            DeclarationKind::DefineMethod,
            DeclarationKind::DefineMethod,
        ]
    );

    let errors = translator.diagnostics().errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].category, DiagnosticCategory::Method);
    assert_eq!(
        errors[0].subject.as_deref(),
        Some("System.Void App.Service::Leak()")
    );
    Ok(())
}

/// Calling into an ignored type makes the caller untranslatable, not its siblings.
#[test]
fn test_call_into_ignored_type_is_untranslatable() -> Result<()> {
    let mut calls_secret = dotscript::ast::DecompiledMethod::new();
    calls_secret.body.push(Stmt::Expr(Expr::call_static(
        MethodRef {
            declaring: TypeSignature::class("App", "Secret"),
            name: "Do".to_string(),
            return_type: TypeSignature::Void,
            params: Vec::new(),
            is_static: true,
        },
        Vec::new(),
    )));

    let assembly = AssemblyBuilder::new("App")
        .add_type(
            TypeDefBuilder::class("App", "Secret")
                .attribute(CustomAttribute::new(IGNORE_ATTRIBUTE))
                .method(MethodBuilder::new("Do").static_().body(dotscript::ast::DecompiledMethod::new())),
        )
        .add_type(
            TypeDefBuilder::class("App", "Worker")
                .method(MethodBuilder::new("Use").static_().body(calls_secret))
                .method(MethodBuilder::new("Fine").body(dotscript::ast::DecompiledMethod::new())),
        )
        .build();

    let (declarations, translator) = translate(assembly, TranslatorConfig::default())?;

    assert_eq!(
        kinds(&declarations)[2..],
        [DeclarationKind::UntranslatableFunction, DeclarationKind::DefineMethod]
    );
    assert_eq!(
        declarations[2].to_string(),
        r#"App.Worker.Use = JSIL.UntranslatableFunction("System.Void App.Worker::Use()");"#
    );
    assert!(!declarations.iter().any(|declaration| declaration.to_string().contains("App.Secret\"")));

    let errors = translator.diagnostics().errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].subject.as_deref(), Some("System.Void App.Worker::Use()"));
    Ok(())
}

/// Overloads with an ignored parameter type drop out of the group; the rest stay mangled.
#[test]
fn test_method_group_excludes_ignored_overloads() -> Result<()> {
    let empty = dotscript::ast::DecompiledMethod::new;
    let assembly = AssemblyBuilder::new("App")
        .add_type(
            TypeDefBuilder::class("App", "Logger")
                .method(MethodBuilder::new("Write").param("value", TypeSignature::I4).body(empty()))
                .method(MethodBuilder::new("Write").param("value", TypeSignature::String).body(empty()))
                .method(
                    MethodBuilder::new("Write")
                        .param("value", TypeSignature::class("Vendor", "Secret"))
                        .body(empty()),
                ),
        )
        .build();

    let config = TranslatorConfig::default().ignore_type("Vendor.Secret");
    let (declarations, _) = translate(assembly, config)?;

    let overloads = declarations
        .iter()
        .find_map(|declaration| match declaration {
            Declaration::OverloadedMethod { overloads, .. } => Some(overloads),
            _ => None,
        })
        .expect("overload group of Write");
    let signatures: Vec<Vec<String>> = overloads
        .iter()
        .map(|overload| overload.parameters.clone())
        .collect();
    assert_eq!(
        signatures,
        vec![vec!["System.Int32".to_string()], vec!["System.String".to_string()]]
    );

    let defined = declarations
        .iter()
        .filter(|declaration| declaration.kind() == DeclarationKind::DefineMethod)
        .count();
    assert_eq!(defined, 2);
    Ok(())
}

/// Enums and interfaces are declared in full during forward declaration.
#[test]
fn test_flags_enum_and_interface() -> Result<()> {
    let assembly = AssemblyBuilder::new("App")
        .add_type(
            TypeDefBuilder::enumeration("App", "Access")
                .attribute(CustomAttribute::new("System.FlagsAttribute"))
                .enum_value("Read", 1)
                .enum_value("Write", 2),
        )
        .add_type(
            TypeDefBuilder::interface("App", "IShape")
                .method(MethodBuilder::new("Area").returns(TypeSignature::R8).abstract_()),
        )
        .add_type(
            TypeDefBuilder::class("App", "Square")
                .implements(TypeSignature::class("App", "IShape"))
                .method(MethodBuilder::new("Area").returns(TypeSignature::R8).body(dotscript::ast::DecompiledMethod::new())),
        )
        .build();

    let (declarations, _) = translate(assembly, TranslatorConfig::default())?;
    let lines: Vec<String> = declarations.iter().map(ToString::to_string).collect();

    assert_eq!(
        lines[1],
        r#"JSIL.MakeEnum(App, "Access", "App.Access", {"Read": 1, "Write": 2}, true);"#
    );
    assert_eq!(
        lines[2],
        r#"JSIL.MakeInterface(App, "IShape", "App.IShape", {"Area": Function});"#
    );
    assert!(lines.contains(&r#"JSIL.ImplementInterfaces(App.Square, ["App.IShape"]);"#.to_string()));
    Ok(())
}

/// A cyclic inheritance chain terminates, declares every type once and is diagnosed.
#[test]
fn test_inheritance_cycle_is_diagnosed() -> Result<()> {
    let assembly = AssemblyBuilder::new("App")
        .add_type(TypeDefBuilder::class("App", "A").extends(TypeSignature::class("App", "B")))
        .add_type(TypeDefBuilder::class("App", "B").extends(TypeSignature::class("App", "A")))
        .build();

    let (declarations, translator) = translate(assembly, TranslatorConfig::default())?;

    let shells = declarations
        .iter()
        .filter(|declaration| declaration.kind() == DeclarationKind::MakeClass)
        .count();
    assert_eq!(shells, 2);

    let cycles = translator
        .diagnostics()
        .by_category(DiagnosticCategory::Declaration);
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0].severity, DiagnosticSeverity::Error);
    Ok(())
}

/// Translating the same assembly twice emits nothing the second time.
#[test]
fn test_translation_is_idempotent() -> Result<()> {
    let assembly = AssemblyBuilder::new("App")
        .add_type(TypeDefBuilder::class("App", "Widget"))
        .build();
    let graph = Arc::new(AssemblyGraph::from_assemblies([Arc::clone(&assembly)]));
    let mut translator = AssemblyTranslator::new(TranslatorConfig::default(), graph);

    let mut first = VecSink::new();
    translator.translate(&assembly, &mut first)?;
    let mut second = VecSink::new();
    translator.translate(&assembly, &mut second)?;

    assert_eq!(first.declarations().len(), 2);
    assert!(second.declarations().is_empty());
    Ok(())
}

/// Escaped names are valid identifiers and map back to the original names.
#[test]
fn test_escaped_member_names() -> Result<()> {
    let assembly = AssemblyBuilder::new("App")
        .add_type(
            TypeDefBuilder::class("App", "Box`1")
                .generic_param("T")
                .method(MethodBuilder::new("op_Implicit").static_().body(dotscript::ast::DecompiledMethod::new()))
                .method(MethodBuilder::new("delete").body(dotscript::ast::DecompiledMethod::new())),
        )
        .build();

    let (declarations, _) = translate(assembly, TranslatorConfig::default())?;
    let lines: Vec<String> = declarations.iter().map(ToString::to_string).collect();

    assert_eq!(lines[1], r#"JSIL.MakeClass("System.Object", App, "Box$601", "App.Box`1");"#);
    for name in ["Box`1", "delete", ".cctor", "1st"] {
        let escaped = escape_identifier(name);
        assert!(escaped.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$'));
        assert_eq!(unescape_identifier(&escaped).as_deref(), Some(name));
    }
    assert!(lines
        .iter()
        .any(|line| line.starts_with("App.Box$601.prototype.$$delete = function")));
    Ok(())
}
