//! Identity keys for assemblies, types and members.
//!
//! Every cache in the translator is keyed by a value from this module. The keys are pure,
//! total functions of their inputs: structurally equal inputs produce identifiers that
//! compare and hash equal, independent of which assembly a reference was read from.
//!
//! # Module Structure
//!
//! - [`assembly`] - Assembly name, version, culture and public key token
//! - [`types`] - [`TypeIdentifier`], the key of the type information store
//! - [`members`] - [`MemberIdentifier`], the key of a type's member table
//!
//! # Usage Examples
//!
//! ```rust
//! use dotscript::metadata::identity::TypeIdentifier;
//! use dotscript::metadata::signatures::TypeSignature;
//!
//! let a = TypeIdentifier::of(&TypeSignature::I4);
//! let b = TypeIdentifier::of(&TypeSignature::value_type("System", "Int32"));
//! assert_eq!(a, b);
//! ```

pub mod assembly;
pub mod members;
pub mod types;

pub use assembly::{AssemblyIdentity, AssemblyVersion};
pub use members::{MemberIdentifier, MemberKind};
pub use types::{TypeIdentifier, TypeShape};
