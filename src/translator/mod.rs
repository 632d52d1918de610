//! Whole-assembly translation into the declaration sequence.
//!
//! The translator drives everything else: it asks [`crate::typeinfo`] for type models, runs
//! the [`crate::compiler`] pipeline for every method body, and hands the resulting
//! [`Declaration`]s to a [`DeclarationSink`] in the order the target runtime requires.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                     AssemblyTranslator                         │
//! ├────────────────────────────────────────────────────────────────┤
//! │  forward declare   namespaces, enums, interfaces, type shells  │
//! │        │           (base shells first, cycles diagnosed)       │
//! │        ▼                                                       │
//! │  translate         methods, groups, properties, interfaces,    │
//! │        │           struct fields, fields, static constructor   │
//! │        ▼                                                       │
//! │  seal              post-order, types with a static ctor        │
//! └────────────────────────────────────────────────────────────────┘
//!            │ Declaration
//!            ▼
//!     DeclarationSink (VecSink, TextSink)
//! ```
//!
//! # Key Components
//!
//! - [`AssemblyTranslator`] - The three-phase orchestrator
//! - [`TranslatorConfig`] - Options of a run
//! - [`Declaration`] - One call of the output protocol
//! - [`DeclarationSink`] - Where declarations go
//! - [`escape_identifier`] / [`unescape_identifier`] - Reversible identifier escaping
//!
//! # Error Handling
//!
//! Data-shaped failures (an undecompilable method, a method touching an ignored type, an
//! inheritance cycle) are recorded in [`crate::metadata::diagnostics::Diagnostics`] and
//! translation continues with the next unit. Only sink I/O errors and engine invariant
//! violations are returned.

mod config;
mod declaration;
mod escape;
mod orchestrator;
mod sink;

pub use config::{TranslatorConfig, LARGE_METHOD_THRESHOLD};
pub use declaration::{Declaration, DeclarationKind, InterfaceMemberKind, MemberOwner, Overload};
pub use escape::{escape_identifier, escape_path, unescape_identifier};
pub use orchestrator::AssemblyTranslator;
pub use sink::{DeclarationSink, TextSink, VecSink};
