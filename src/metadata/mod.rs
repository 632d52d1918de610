//! The input object-code graph.
//!
//! This module models what the translator receives from its readers: assemblies made of
//! modules, modules made of types, types made of fields, methods and properties, each
//! carrying flags and custom attributes, plus a best-effort decompiled tree per method body.
//! Nothing here parses bytes; readers hand over already-built definitions, typically via the
//! fluent [`builders`].
//!
//! # Architecture
//!
//! - **Definitions** ([`assembly`], [`types`], [`members`]) are immutable once built and
//!   shared through `Arc`s.
//! - **References** ([`signatures`]) are pure values; [`graph::AssemblyGraph`] resolves them
//!   to definitions.
//! - **Identity** ([`identity`]) derives the cache keys the type information engine uses.
//! - **Diagnostics** ([`diagnostics`]) collect data-shaped problems without aborting a run.
//!
//! # Key Components
//!
//! - [`assembly::AssemblyDef`] / [`assembly::ModuleDef`] - Containers of types
//! - [`types::TypeDef`] - A type with its members and nested types
//! - [`members::MethodDef`] - A method with its optional decompiled body
//! - [`signatures::TypeSignature`] - A type reference
//! - [`graph::AssemblyGraph`] - Cross-assembly resolution
//!
//! # Usage Examples
//!
//! ```rust
//! use dotscript::metadata::builders::{AssemblyBuilder, TypeDefBuilder};
//! use dotscript::metadata::graph::AssemblyGraph;
//! use dotscript::metadata::signatures::TypeSignature;
//!
//! let app = AssemblyBuilder::new("App")
//!     .add_type(TypeDefBuilder::structure("Geo", "Point"))
//!     .build();
//! let graph = AssemblyGraph::from_assemblies([app]);
//!
//! assert!(graph.is_struct(&TypeSignature::value_type("Geo", "Point")));
//! ```

pub mod assembly;
pub mod builders;
pub mod customattributes;
pub mod diagnostics;
pub mod graph;
pub mod identity;
pub mod members;
pub mod signatures;
pub mod types;
