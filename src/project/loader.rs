//! ProjectLoader builder API for loading an assembly and its reference closure.
//!
//! This module provides the `ProjectLoader` builder-style API for loading assemblies with
//! breadth-first dependency resolution, fallback to symbol-less reads, and graceful
//! degradation when references cannot be resolved.

use std::{collections::VecDeque, sync::Arc};

use regex::Regex;
use rustc_hash::FxHashSet;

use crate::{
    metadata::{
        assembly::AssemblyDefRc,
        diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics},
        identity::AssemblyIdentity,
    },
    project::{AssemblyResolver, LoadResult, ReadOptions},
    Error, Result,
};

/// Builder for loading a primary assembly and, optionally, its transitive references.
///
/// # Design Goals
///
/// - **Single Assembly Support**: Translate an assembly even when none of its references load
/// - **Symbol Fallback**: Retry without debug symbols when they cannot be read
/// - **Graceful Degradation**: Unresolved references become diagnostics, not failures
///
/// # Usage Examples
///
/// ```rust
/// use dotscript::metadata::builders::AssemblyBuilder;
/// use dotscript::metadata::identity::{AssemblyIdentity, AssemblyVersion};
/// use dotscript::project::{AssemblyResolver, InMemorySource, ProjectLoader};
///
/// let source = InMemorySource::new()
///     .with_assembly(AssemblyBuilder::new("App").reference_name("Lib").build())
///     .with_assembly(AssemblyBuilder::new("Lib").reference_name("mscorlib").build());
/// let resolver = AssemblyResolver::new(source);
///
/// let result = ProjectLoader::new()
///     .ignore_assembly("^mscorlib")?
///     .load(&resolver, &AssemblyIdentity::new("App", AssemblyVersion::UNKNOWN))?;
///
/// assert_eq!(result.success_count(), 2);
/// assert_eq!(result.skipped.len(), 1);
/// assert!(result.is_complete_success());
/// # Ok::<(), dotscript::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ProjectLoader {
    /// Whether to load the transitive reference closure
    include_dependencies: bool,
    /// Whether to read debug symbols first
    use_symbols: bool,
    /// Whether an unresolved reference fails the load
    strict_mode: bool,
    /// References whose display name matches are never loaded
    ignored_assemblies: Vec<Regex>,
    /// Where diagnostics are recorded
    diagnostics: Option<Arc<Diagnostics>>,
}

impl Default for ProjectLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectLoader {
    /// Create a new ProjectLoader builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            include_dependencies: true,
            use_symbols: true,
            strict_mode: false,
            ignored_assemblies: Vec::new(),
            diagnostics: None,
        }
    }

    /// Enable or disable loading of the reference closure.
    #[must_use]
    pub fn include_dependencies(mut self, enabled: bool) -> Self {
        self.include_dependencies = enabled;
        self
    }

    /// Enable or disable reading debug symbols.
    #[must_use]
    pub fn use_symbols(mut self, enabled: bool) -> Self {
        self.use_symbols = enabled;
        self
    }

    /// Enable or disable strict mode.
    ///
    /// In strict mode an unresolved reference fails the load. In non-strict mode (default)
    /// it is recorded and loading continues with the remaining references.
    #[must_use]
    pub fn strict_mode(mut self, strict: bool) -> Self {
        self.strict_mode = strict;
        self
    }

    /// Add a pattern for references that must not be loaded.
    ///
    /// # Errors
    /// Returns [`Error::Pattern`] if `pattern` is not a valid regular expression.
    pub fn ignore_assembly(mut self, pattern: &str) -> Result<Self> {
        self.ignored_assemblies.push(Regex::new(pattern)?);
        Ok(self)
    }

    /// Replace the ignored-assembly patterns.
    #[must_use]
    pub fn ignored_assemblies(mut self, patterns: Vec<Regex>) -> Self {
        self.ignored_assemblies = patterns;
        self
    }

    /// Record diagnostics into an existing container.
    #[must_use]
    pub fn with_diagnostics(mut self, diagnostics: Arc<Diagnostics>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    fn is_ignored(&self, display_name: &str) -> bool {
        self.ignored_assemblies
            .iter()
            .any(|pattern| pattern.is_match(display_name))
    }

    /// Load the primary assembly and, if enabled, its reference closure.
    ///
    /// # Errors
    /// Returns an error if the primary assembly cannot be read, or in strict mode if any
    /// reference cannot be resolved.
    pub fn load(
        &self,
        resolver: &AssemblyResolver,
        primary: &AssemblyIdentity,
    ) -> Result<LoadResult> {
        let mut result = LoadResult::new(self.diagnostics.clone().unwrap_or_default());

        log::info!("loading assembly {}", primary.display_name());
        let assembly = self.read(resolver, primary, result.diagnostics())?;
        result.record_success(Arc::clone(&assembly));

        if self.include_dependencies {
            self.load_references(resolver, &assembly, &mut result)?;
        }
        Ok(result)
    }

    /// Load the reference closure of an assembly that was already read.
    ///
    /// # Errors
    /// Returns an error in strict mode if any reference cannot be resolved.
    pub fn load_from(
        &self,
        resolver: &AssemblyResolver,
        primary: AssemblyDefRc,
    ) -> Result<LoadResult> {
        let mut result = LoadResult::new(self.diagnostics.clone().unwrap_or_default());

        resolver.insert(Arc::clone(&primary));
        result.record_success(Arc::clone(&primary));

        if self.include_dependencies {
            self.load_references(resolver, &primary, &mut result)?;
        }
        Ok(result)
    }

    /// Breadth-first walk over the references, each display name visited once.
    fn load_references(
        &self,
        resolver: &AssemblyResolver,
        primary: &AssemblyDefRc,
        result: &mut LoadResult,
    ) -> Result<()> {
        let mut queue: VecDeque<AssemblyIdentity> = primary.references.iter().cloned().collect();
        let mut visited: FxHashSet<String> = FxHashSet::default();

        while let Some(reference) = queue.pop_front() {
            let display_name = reference.display_name();
            if !visited.insert(display_name.clone()) {
                continue;
            }

            if self.is_ignored(&display_name) {
                log::debug!("skipping ignored assembly {display_name}");
                result.record_skipped(display_name);
                continue;
            }

            if let Some(loaded) = result.find_loaded(&reference.name) {
                if !loaded.identity.satisfies(&reference) {
                    let actual = loaded.identity.clone();
                    result.record_version_mismatch(reference, actual);
                }
                continue;
            }

            log::info!("loading assembly {display_name}");
            match self.read(resolver, &reference, result.diagnostics()) {
                Ok(assembly) => {
                    if !assembly.identity.satisfies(&reference) {
                        result.record_version_mismatch(reference, assembly.identity.clone());
                    }
                    queue.extend(assembly.references.iter().cloned());
                    result.record_success(assembly);
                }
                Err(error) => {
                    if self.strict_mode {
                        return Err(error);
                    }

                    log::warn!("could not resolve assembly {display_name}: {error}");
                    result.diagnostics().push(
                        Diagnostic::new(
                            DiagnosticSeverity::Error,
                            DiagnosticCategory::Assembly,
                            error.to_string(),
                        )
                        .with_subject(display_name.clone()),
                    );
                    result.record_failure(display_name, error.to_string());
                }
            }
        }
        Ok(())
    }

    /// Reads one assembly, falling back to a read without symbols.
    fn read(
        &self,
        resolver: &AssemblyResolver,
        identity: &AssemblyIdentity,
        diagnostics: &Diagnostics,
    ) -> Result<AssemblyDefRc> {
        if self.use_symbols {
            match resolver.resolve(identity, ReadOptions::WITH_SYMBOLS) {
                Err(Error::SymbolsUnavailable(name)) => {
                    log::warn!("could not load symbols for {name}");
                    diagnostics.push(
                        Diagnostic::new(
                            DiagnosticSeverity::Warning,
                            DiagnosticCategory::Symbols,
                            "debug symbols unavailable; loaded without symbols",
                        )
                        .with_subject(name),
                    );
                }
                other => return other,
            }
        }

        resolver.resolve(identity, ReadOptions::WITHOUT_SYMBOLS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::{builders::AssemblyBuilder, identity::AssemblyVersion},
        project::InMemorySource,
    };

    fn identity(name: &str) -> AssemblyIdentity {
        AssemblyIdentity::new(name, AssemblyVersion::UNKNOWN)
    }

    #[test]
    fn test_breadth_first_closure() {
        let resolver = AssemblyResolver::new(
            InMemorySource::new()
                .with_assembly(
                    AssemblyBuilder::new("App")
                        .reference_name("A")
                        .reference_name("B")
                        .build(),
                )
                .with_assembly(AssemblyBuilder::new("A").reference_name("C").build())
                .with_assembly(AssemblyBuilder::new("B").reference_name("A").build())
                .with_assembly(AssemblyBuilder::new("C").build()),
        );

        let result = ProjectLoader::new().load(&resolver, &identity("App")).unwrap();
        let names: Vec<&str> = result.assemblies.iter().map(|a| a.name()).collect();
        assert_eq!(names, vec!["App", "A", "B", "C"]);
        assert!(result.is_complete_success());
    }

    #[test]
    fn test_dependencies_disabled() {
        let resolver = AssemblyResolver::new(
            InMemorySource::new()
                .with_assembly(AssemblyBuilder::new("App").reference_name("A").build())
                .with_assembly(AssemblyBuilder::new("A").build()),
        );

        let result = ProjectLoader::new()
            .include_dependencies(false)
            .load(&resolver, &identity("App"))
            .unwrap();
        assert_eq!(result.success_count(), 1);
    }

    #[test]
    fn test_symbol_fallback_and_unresolved() {
        let resolver = AssemblyResolver::new(
            InMemorySource::new()
                .with_assembly(
                    AssemblyBuilder::new("App")
                        .reference_name("NoPdb")
                        .reference_name("Gone")
                        .build(),
                )
                .with_assembly(AssemblyBuilder::new("NoPdb").without_symbols().build()),
        );

        let result = ProjectLoader::new().load(&resolver, &identity("App")).unwrap();
        assert_eq!(result.success_count(), 2);
        assert_eq!(result.failure_count(), 1);

        let diagnostics = result.diagnostics();
        assert_eq!(diagnostics.by_category(DiagnosticCategory::Symbols).len(), 1);
        assert_eq!(diagnostics.by_category(DiagnosticCategory::Assembly).len(), 1);
        assert_eq!(diagnostics.error_count(), 1);
    }

    #[test]
    fn test_strict_mode_fails() {
        let resolver = AssemblyResolver::new(
            InMemorySource::new()
                .with_assembly(AssemblyBuilder::new("App").reference_name("Gone").build()),
        );

        let error = ProjectLoader::new()
            .strict_mode(true)
            .load(&resolver, &identity("App"))
            .unwrap_err();
        assert!(matches!(error, Error::AssemblyNotResolved(_)));
    }

    #[test]
    fn test_missing_primary_is_fatal() {
        let resolver = AssemblyResolver::new(InMemorySource::new());
        assert!(ProjectLoader::new().load(&resolver, &identity("App")).is_err());
    }

    #[test]
    fn test_version_mismatch_recorded() {
        let resolver = AssemblyResolver::new(
            InMemorySource::new()
                .with_assembly(
                    AssemblyBuilder::new("App")
                        .reference(AssemblyIdentity::new("Lib", AssemblyVersion::new(3, 0, 0, 0)))
                        .build(),
                )
                .with_assembly(
                    AssemblyBuilder::new("Lib")
                        .version(AssemblyVersion::new(1, 0, 0, 0))
                        .build(),
                ),
        );

        let result = ProjectLoader::new().load(&resolver, &identity("App")).unwrap();
        assert_eq!(result.success_count(), 2);
        assert!(result.has_version_mismatches());
    }
}
