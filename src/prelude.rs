//! # dotscript Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the dotscript library. Import this module to get quick access to the essential
//! types for loading assemblies and translating them into declarations.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dotscript operations
pub use crate::Error;

/// The result type used throughout dotscript
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// The three-phase translator and its configuration
pub use crate::translator::{AssemblyTranslator, TranslatorConfig};

/// Output protocol and sinks
pub use crate::translator::{Declaration, DeclarationKind, DeclarationSink, TextSink, VecSink};

/// Assembly loading
pub use crate::project::{
    AssemblyResolver, AssemblySource, InMemorySource, LoadResult, ProjectLoader, ReadOptions,
};

// ================================================================================================
// Metadata System - Input Graph
// ================================================================================================

/// Definitions and their shared handles
pub use crate::metadata::{
    assembly::{AssemblyDef, AssemblyDefRc, ModuleDef, ModuleDefRc},
    members::{
        ConstantValue, FieldAttributes, FieldDef, FieldDefRc, MethodAttributes, MethodDef,
        MethodDefRc, MethodImplAttributes, PropertyDef, PropertyDefRc,
    },
    types::{TypeAttributes, TypeDef, TypeDefRc},
};

/// Fluent builders for in-memory graphs
pub use crate::metadata::builders::{
    AssemblyBuilder, FieldBuilder, MethodBuilder, ModuleBuilder, PropertyBuilder, TypeDefBuilder,
};

/// Type references and attributes
pub use crate::metadata::{
    customattributes::{AttributeArgument, CustomAttribute},
    signatures::{TypeName, TypeSignature},
};

/// Identity keys
pub use crate::metadata::identity::{
    AssemblyIdentity, AssemblyVersion, MemberIdentifier, MemberKind, TypeIdentifier,
};

/// Cross-assembly resolution
pub use crate::metadata::graph::AssemblyGraph;

/// Diagnostics collected during a run
pub use crate::metadata::diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics,
};

// ================================================================================================
// Type Information
// ================================================================================================

/// Type models, proxies and method groups
pub use crate::typeinfo::{
    MemberInfo, MethodGroupInfo, ProxyInfo, TypeInfo, TypeInfoRc, TypeInfoStore, TypeKind,
};

// ================================================================================================
// Method Trees and Pipeline
// ================================================================================================

/// Decompiled method trees
pub use crate::ast::{DecompiledMethod, Expr, Function, Stmt};

/// The per-method pipeline and its seams
pub use crate::compiler::{Decompiler, MethodPipeline, TypeOracle};
