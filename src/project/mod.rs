//! Assembly resolution and dependency closure loading.
//!
//! This module turns a primary assembly reference into the set of assemblies a translation
//! run works on. Reading an assembly is delegated to an [`AssemblySource`]; this module adds
//! caching, the transitive reference walk, the symbol fallback and graceful handling of
//! references that cannot be found.
//!
//! # Architecture
//!
//! ```text
//! AssemblyIdentity ──► ProjectLoader ──► AssemblyResolver ──► AssemblySource
//!                           │                  │ (cache by
//!                           │                  │  display name)
//!                           ▼                  ▼
//!                      LoadResult ◄──── AssemblyDefRc
//!                           │
//!                           ▼
//!                     AssemblyGraph
//! ```
//!
//! # Key Components
//!
//! - [`AssemblySource`] - Reader seam; [`InMemorySource`] serves prebuilt assemblies
//! - [`AssemblyResolver`] - Caches reads so every assembly is read at most once
//! - [`ProjectLoader`] - Breadth-first dependency closure with symbol fallback
//! - [`LoadResult`] - Loaded assemblies plus failures, skips and version mismatches
//!
//! # Error Handling
//!
//! Only a primary assembly that cannot be read fails a load. Unresolved references become
//! [`crate::metadata::diagnostics::DiagnosticCategory::Assembly`] errors and missing symbols
//! become [`crate::metadata::diagnostics::DiagnosticCategory::Symbols`] warnings, unless the
//! loader runs in strict mode.
//!
//! # Usage Examples
//!
//! ```rust
//! use dotscript::metadata::builders::{AssemblyBuilder, TypeDefBuilder};
//! use dotscript::metadata::identity::{AssemblyIdentity, AssemblyVersion};
//! use dotscript::project::{AssemblyResolver, InMemorySource, ProjectLoader};
//!
//! let source = InMemorySource::new()
//!     .with_assembly(
//!         AssemblyBuilder::new("App")
//!             .reference_name("Lib")
//!             .add_type(TypeDefBuilder::class("App", "Program"))
//!             .build(),
//!     )
//!     .with_assembly(AssemblyBuilder::new("Lib").build());
//!
//! let resolver = AssemblyResolver::new(source);
//! let result = ProjectLoader::new()
//!     .load(&resolver, &AssemblyIdentity::new("App", AssemblyVersion::UNKNOWN))?;
//!
//! let graph = result.graph();
//! assert!(graph.find_type("App.Program").is_some());
//! assert_eq!(resolver.len(), 2);
//! # Ok::<(), dotscript::Error>(())
//! ```

mod loader;
mod result;
mod source;

use std::sync::Arc;

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

use crate::{
    metadata::{assembly::AssemblyDefRc, identity::AssemblyIdentity},
    Result,
};

pub use loader::ProjectLoader;
pub use result::{LoadResult, VersionMismatch};
pub use source::{AssemblySource, InMemorySource, ReadOptions};

/// Caching front of an [`AssemblySource`].
///
/// Entries are keyed by display name. A read is answered from the cache when the requested
/// name is cached, or when a cached assembly satisfies the reference; otherwise the source
/// is asked and the result stored under both the requested and the actual display name.
pub struct AssemblyResolver {
    source: Box<dyn AssemblySource>,
    cache: DashMap<String, AssemblyDefRc, FxBuildHasher>,
}

impl AssemblyResolver {
    /// Creates a resolver reading from `source`.
    pub fn new(source: impl AssemblySource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cache: DashMap::with_hasher(FxBuildHasher),
        }
    }

    /// Resolves a reference to an assembly.
    ///
    /// # Errors
    ///
    /// Propagates the source's error when the assembly is not cached and cannot be read.
    pub fn resolve(
        &self,
        identity: &AssemblyIdentity,
        options: ReadOptions,
    ) -> Result<AssemblyDefRc> {
        let requested = identity.display_name();
        if let Some(cached) = self.cache.get(&requested) {
            return Ok(Arc::clone(cached.value()));
        }

        let satisfying = self
            .cache
            .iter()
            .find(|entry| entry.value().identity.satisfies(identity))
            .map(|entry| Arc::clone(entry.value()));
        if let Some(cached) = satisfying {
            return Ok(cached);
        }

        let assembly = self.source.read(identity, options)?;
        self.cache.insert(requested, Arc::clone(&assembly));
        self.cache.insert(assembly.full_name(), Arc::clone(&assembly));
        Ok(assembly)
    }

    /// Places an already-read assembly in the cache.
    pub fn insert(&self, assembly: AssemblyDefRc) {
        self.cache.insert(assembly.full_name(), assembly);
    }

    /// Returns the cached assembly with the given display name.
    #[must_use]
    pub fn cached(&self, display_name: &str) -> Option<AssemblyDefRc> {
        self.cache
            .get(display_name)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Number of distinct assemblies in the cache.
    #[must_use]
    pub fn len(&self) -> usize {
        let mut names: Vec<String> = self
            .cache
            .iter()
            .map(|entry| entry.value().full_name())
            .collect();
        names.sort_unstable();
        names.dedup();
        names.len()
    }

    /// Returns `true` if nothing has been read yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::metadata::{builders::AssemblyBuilder, identity::AssemblyVersion};

    struct CountingSource {
        inner: InMemorySource,
        reads: Arc<AtomicUsize>,
    }

    impl AssemblySource for CountingSource {
        fn read(&self, identity: &AssemblyIdentity, options: ReadOptions) -> Result<AssemblyDefRc> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.read(identity, options)
        }
    }

    #[test]
    fn test_resolver_reads_once() {
        let reads = Arc::new(AtomicUsize::new(0));
        let resolver = AssemblyResolver::new(CountingSource {
            inner: InMemorySource::new().with_assembly(
                AssemblyBuilder::new("Lib")
                    .version(AssemblyVersion::new(1, 2, 0, 0))
                    .build(),
            ),
            reads: Arc::clone(&reads),
        });

        let exact = AssemblyIdentity::new("Lib", AssemblyVersion::new(1, 2, 0, 0));
        let loose = AssemblyIdentity::new("Lib", AssemblyVersion::UNKNOWN);

        let first = resolver.resolve(&exact, ReadOptions::WITH_SYMBOLS).unwrap();
        let second = resolver.resolve(&loose, ReadOptions::WITH_SYMBOLS).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(reads.load(Ordering::SeqCst), 1);
        assert_eq!(resolver.len(), 1);
        assert!(resolver.cached(&exact.display_name()).is_some());
    }

    #[test]
    fn test_resolver_propagates_missing() {
        let resolver = AssemblyResolver::new(InMemorySource::new());
        assert!(resolver.is_empty());

        let missing = AssemblyIdentity::new("Nope", AssemblyVersion::UNKNOWN);
        assert!(resolver
            .resolve(&missing, ReadOptions::WITHOUT_SYMBOLS)
            .is_err());
        assert!(resolver.is_empty());
    }
}
