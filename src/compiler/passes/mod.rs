//! The named rewrites of the per-method pipeline.
//!
//! Each pass implements [`crate::compiler::AstPass`] and performs one kind of rewrite over a
//! [`crate::ast::DecompiledMethod`]. The order in which they run is fixed by
//! [`crate::compiler::MethodPipeline`]:
//!
//! 1. [`IgnoredTypeCheckPass`] - fails methods that touch ignored types
//! 2. [`NameVariablesPass`] - stable display names
//! 3. [`EliminateTemporariesPass`] - single-use temporaries, repeated to fixpoint
//! 4. [`EmulateStructAssignmentPass`] - explicit struct copies
//! 5. [`IntroduceDeclarationsPass`] - declarations at first use
//! 6. [`IntroduceReferencesPass`] - raw operands to declared references
//! 7. [`SimplifyOperatorsPass`] - compound and negation folding

mod declarations;
mod ignored;
mod naming;
mod operators;
mod references;
mod structs;
mod temporaries;

pub use declarations::IntroduceDeclarationsPass;
pub use ignored::IgnoredTypeCheckPass;
pub use naming::NameVariablesPass;
pub use operators::SimplifyOperatorsPass;
pub use references::IntroduceReferencesPass;
pub use structs::EmulateStructAssignmentPass;
pub use temporaries::EliminateTemporariesPass;

pub(crate) use naming::RESERVED_WORDS;
