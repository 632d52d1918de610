// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # dotscript
//!
//! A whole-program translator from decompiled .NET assemblies to the declarations of a
//! dynamic script runtime. `dotscript` resolves cross-assembly type references, builds a
//! queryable model of every type's members, applies proxy member patching, groups overloaded
//! methods for dispatch, runs a fixed transform pipeline over every method body, and emits
//! declarations in an order that satisfies the runtime's initialization constraints: base
//! types before derived types, and types before their static initializers run.
//!
//! ## Features
//!
//! - **🧭 Cross-assembly resolution** - Dependency closure loading with symbol fallback
//! - **🧱 Two-pass type models** - Lazy, cached, safe on deep and cyclic type graphs
//! - **🩹 Proxy patching** - Structural member patching from auxiliary assemblies
//! - **🔀 Overload groups** - Same-named methods collapsed into one dispatch descriptor
//! - **⚙️ Transform pipeline** - Temporary elimination, struct copies, declarations, operators
//! - **🛡️ Graceful degradation** - One broken method never aborts a run
//!
//! ## Quick Start
//!
//! ```rust
//! use dotscript::prelude::*;
//!
//! let app = AssemblyBuilder::new("App")
//!     .add_type(TypeDefBuilder::class("App", "Base"))
//!     .add_type(
//!         TypeDefBuilder::class("App", "Derived")
//!             .extends(TypeSignature::class("App", "Base"))
//!             .field(FieldBuilder::new("Count", TypeSignature::I4).static_()),
//!     )
//!     .build();
//!
//! let source = InMemorySource::new().with_assembly(app);
//! let resolver = AssemblyResolver::new(source);
//! let loaded = ProjectLoader::new()
//!     .load(&resolver, &AssemblyIdentity::new("App", AssemblyVersion::UNKNOWN))?;
//!
//! let mut translator = AssemblyTranslator::from_load_result(TranslatorConfig::default(), &loaded);
//! let mut sink = VecSink::new();
//! translator.translate_project(&loaded.assemblies, &mut sink)?;
//!
//! let kinds: Vec<DeclarationKind> = sink.declarations().iter().map(Declaration::kind).collect();
//! assert_eq!(kinds.last(), Some(&DeclarationKind::SealType));
//! assert!(!translator.diagnostics().has_errors());
//! # Ok::<(), dotscript::Error>(())
//! ```
//!
//! ## Architecture
//!
//! `dotscript` is organized into several key modules:
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`metadata`] - The input graph: assemblies, types, members, signatures, identities
//! - [`project`] - Assembly resolution and dependency closure loading
//! - [`typeinfo`] - Type models, proxies and method groups
//! - [`ast`] - Decompiled method trees
//! - [`compiler`] - The per-method transform pipeline
//! - [`translator`] - The three-phase emission of declarations
//! - [`Error`] and [`Result`] - Error handling
//!
//! ```text
//! AssemblyIdentity ─► project ─► metadata::graph ─► typeinfo ─┐
//!                                                             ▼
//!                        DeclarationSink ◄─ translator ◄─ compiler ◄─ ast
//! ```
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T>`]. Problems with the input data (a reference
//! that cannot be resolved, missing debug symbols, a method that cannot be decompiled, an
//! inheritance cycle) are not errors: they are recorded in
//! [`metadata::diagnostics::Diagnostics`] and the run continues. Returned errors are sink I/O
//! failures, invalid configuration, and [`Error::Invariant`] when the engine itself is broken.
//!
//! ## Logging
//!
//! The crate logs through the [`log`] facade and never installs a logger.
//!
//! ## Thread Safety
//!
//! Definitions in [`metadata`] are immutable and shared through `Arc`. The
//! [`typeinfo::TypeInfoStore`] cache and the [`metadata::diagnostics::Diagnostics`]
//! container accept concurrent access; a single [`translator::AssemblyTranslator`] run is
//! sequential.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use dotscript::prelude::*;
///
/// let config = TranslatorConfig::default().ignore_type("System.IntPtr");
/// assert!(config.eliminate_temporaries);
/// ```
pub mod prelude;

/// The input object-code graph: assemblies, modules, types, members and their identities.
pub mod metadata;

/// Assembly resolution: reader seam, caching resolver and dependency closure loading.
pub mod project;

/// Type information: two-pass type models, proxy matching and method groups.
pub mod typeinfo;

/// Decompiled method trees and their traversal.
pub mod ast;

/// The per-method transform pipeline and its passes.
pub mod compiler;

/// The three-phase translation of assemblies into declarations.
pub mod translator;

/// `dotscript` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
/// This is used consistently throughout the crate for all fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

/// `dotscript` Error type
///
/// The main error type for all operations in this crate.
///
/// # Examples
///
/// ```rust
/// use dotscript::{Error, project::{AssemblyResolver, InMemorySource, ProjectLoader}};
/// use dotscript::metadata::identity::{AssemblyIdentity, AssemblyVersion};
///
/// let resolver = AssemblyResolver::new(InMemorySource::new());
/// let primary = AssemblyIdentity::new("Missing", AssemblyVersion::UNKNOWN);
///
/// match ProjectLoader::new().load(&resolver, &primary) {
///     Err(Error::AssemblyNotResolved(name)) => assert!(name.starts_with("Missing")),
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
pub use error::Error;
