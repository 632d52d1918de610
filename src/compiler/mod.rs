//! Per-method transform pipeline.
//!
//! This module turns one decompiled method tree into an emittable [`crate::ast::Function`]:
//!
//! - [`crate::ast`] - the tree the passes rewrite
//! - [`compiler`](self) - the decompiler seam, the pass interface and the fixed-order pipeline
//! - [`crate::translator`] - drives the pipeline for every method and emits the result
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                       Method Pipeline                            │
//! ├──────────────────────────────────────────────────────────────────┤
//! │                                                                  │
//! │  Decompiler                  External seam: MethodDef -> tree    │
//! │                                                                  │
//! │  MethodPipeline              Fixed order, fails per method       │
//! │    ├─ 1 IgnoredTypeCheck      (reject ignored type usage)        │
//! │    ├─ 2 NameVariables         (stable display names)             │
//! │    ├─ 3 EliminateTemporaries  (repeated to fixpoint, optional)   │
//! │    ├─ 4 EmulateStructAssign   (explicit struct copies)           │
//! │    ├─ 5 IntroduceDeclarations (declare at first use)             │
//! │    ├─ 6 IntroduceReferences   (operands -> declared refs)        │
//! │    ├─ 7 SimplifyOperators     (compound/negation folding, opt.)  │
//! │    └─ 8 post-process hook     (constructor field initializers)   │
//! │                                                                  │
//! │  AstPass trait               Interface for all passes            │
//! │  TypeOracle trait            Ignore/struct questions for passes  │
//! │                                                                  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Any error raised inside the pipeline is method-local
//! ([`crate::Error::is_method_local`]); the translator turns it into an untranslatable
//! placeholder and moves on to the next method.

mod decompiler;
mod pass;
mod passes;
mod pipeline;

pub use decompiler::{BodyDecompiler, Decompiler};
pub use pass::{AstPass, PassContext, TypeOracle};
pub use passes::{
    EliminateTemporariesPass, EmulateStructAssignmentPass, IgnoredTypeCheckPass,
    IntroduceDeclarationsPass, IntroduceReferencesPass, NameVariablesPass, SimplifyOperatorsPass,
};
pub use pipeline::{MethodPipeline, PostProcess, MAX_ELIMINATION_PASSES};

pub(crate) use passes::RESERVED_WORDS;
