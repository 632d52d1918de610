//! Project loading result types and statistics.
//!
//! This module provides result types for project loading operations, tracking
//! successfully loaded assemblies, failures, skipped references and version mismatches.

use std::sync::Arc;

use crate::metadata::{
    assembly::AssemblyDefRc, diagnostics::Diagnostics, graph::AssemblyGraph,
    identity::AssemblyIdentity,
};

/// A version mismatch between a required and actual assembly version.
///
/// This occurs when an assembly is found but its version doesn't satisfy the
/// version requirement from the dependency reference.
#[derive(Debug, Clone)]
pub struct VersionMismatch {
    /// The assembly identity that was required by a reference
    pub required: AssemblyIdentity,
    /// The assembly identity that was actually found
    pub actual: AssemblyIdentity,
}

/// Result of a project loading operation.
///
/// Contains the loaded assemblies, primary first, along with statistics about the loading
/// process. Unresolved references do not fail the load; they are listed here and recorded
/// as error diagnostics.
///
/// # Usage
///
/// ```rust
/// use dotscript::metadata::builders::AssemblyBuilder;
/// use dotscript::metadata::identity::{AssemblyIdentity, AssemblyVersion};
/// use dotscript::project::{AssemblyResolver, InMemorySource, ProjectLoader};
///
/// let source = InMemorySource::new()
///     .with_assembly(AssemblyBuilder::new("App").reference_name("Missing").build());
/// let resolver = AssemblyResolver::new(source);
///
/// let primary = AssemblyIdentity::new("App", AssemblyVersion::UNKNOWN);
/// let result = ProjectLoader::new().load(&resolver, &primary)?;
///
/// assert_eq!(result.success_count(), 1);
/// assert!(result.has_failures());
/// assert_eq!(result.missing_dependencies.len(), 1);
/// # Ok::<(), dotscript::Error>(())
/// ```
#[derive(Debug)]
pub struct LoadResult {
    /// Loaded assemblies in load order, the primary first
    pub assemblies: Vec<AssemblyDefRc>,
    /// Successfully loaded assembly identities
    pub loaded_assemblies: Vec<AssemblyIdentity>,
    /// References that could not be resolved
    pub missing_dependencies: Vec<String>,
    /// Detailed failure information (display name -> error message)
    pub failed_loads: Vec<(String, String)>,
    /// Version mismatches detected during dependency resolution
    pub version_mismatches: Vec<VersionMismatch>,
    /// References skipped by an ignored-assembly pattern
    pub skipped: Vec<String>,
    /// Total number of successfully loaded assemblies
    pub loaded_count: usize,
    /// Total number of failed loading attempts
    pub failed_count: usize,
    diagnostics: Arc<Diagnostics>,
}

impl LoadResult {
    /// Create a new empty load result recording into `diagnostics`.
    #[must_use]
    pub fn new(diagnostics: Arc<Diagnostics>) -> Self {
        Self {
            assemblies: Vec::new(),
            loaded_assemblies: Vec::new(),
            missing_dependencies: Vec::new(),
            failed_loads: Vec::new(),
            version_mismatches: Vec::new(),
            skipped: Vec::new(),
            loaded_count: 0,
            failed_count: 0,
            diagnostics,
        }
    }

    /// The primary assembly.
    #[must_use]
    pub fn primary(&self) -> Option<&AssemblyDefRc> {
        self.assemblies.first()
    }

    /// Diagnostics recorded while loading.
    #[must_use]
    pub fn diagnostics(&self) -> &Arc<Diagnostics> {
        &self.diagnostics
    }

    /// The type universe spanned by the loaded assemblies.
    #[must_use]
    pub fn graph(&self) -> AssemblyGraph {
        AssemblyGraph::from_assemblies(self.assemblies.iter().cloned())
    }

    /// Returns the loaded assembly with the given simple name.
    #[must_use]
    pub fn find_loaded(&self, name: &str) -> Option<&AssemblyDefRc> {
        self.assemblies
            .iter()
            .find(|assembly| assembly.name().eq_ignore_ascii_case(name))
    }

    /// Check if the loading operation was completely successful (no failures).
    #[must_use]
    pub fn is_complete_success(&self) -> bool {
        self.failed_count == 0
    }

    /// Check if the loading operation had any failures.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.failed_count > 0
    }

    /// Get the number of successfully loaded assemblies.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.loaded_count
    }

    /// Get the number of failed assembly loads.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failed_count
    }

    /// Record a successful assembly load. Returns `false` if the assembly was already loaded.
    pub(crate) fn record_success(&mut self, assembly: AssemblyDefRc) -> bool {
        let full_name = assembly.full_name();
        if self
            .assemblies
            .iter()
            .any(|loaded| loaded.full_name() == full_name)
        {
            return false;
        }

        self.loaded_assemblies.push(assembly.identity.clone());
        self.assemblies.push(assembly);
        self.loaded_count += 1;
        true
    }

    /// Record a failed assembly load.
    pub(crate) fn record_failure(&mut self, display_name: String, error_message: String) {
        self.failed_loads.push((display_name.clone(), error_message));
        self.missing_dependencies.push(display_name);
        self.failed_count += 1;
    }

    /// Record a reference skipped by pattern.
    pub(crate) fn record_skipped(&mut self, display_name: String) {
        self.skipped.push(display_name);
    }

    /// Record a version mismatch between required and actual assembly.
    pub(crate) fn record_version_mismatch(
        &mut self,
        required: AssemblyIdentity,
        actual: AssemblyIdentity,
    ) {
        self.version_mismatches
            .push(VersionMismatch { required, actual });
    }

    /// Check if there are any version mismatches.
    #[must_use]
    pub fn has_version_mismatches(&self) -> bool {
        !self.version_mismatches.is_empty()
    }

    /// Get the number of version mismatches.
    #[must_use]
    pub fn version_mismatch_count(&self) -> usize {
        self.version_mismatches.len()
    }

    /// Get all version mismatches.
    #[must_use]
    pub fn get_version_mismatches(&self) -> &[VersionMismatch] {
        &self.version_mismatches
    }
}

impl Default for LoadResult {
    fn default() -> Self {
        Self::new(Arc::new(Diagnostics::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::builders::AssemblyBuilder;

    #[test]
    fn test_record_success_dedupes() {
        let mut result = LoadResult::default();
        let app = AssemblyBuilder::new("App").build();

        assert!(result.record_success(Arc::clone(&app)));
        assert!(!result.record_success(app));
        assert_eq!(result.success_count(), 1);
        assert_eq!(result.primary().unwrap().name(), "App");
        assert!(result.find_loaded("app").is_some());
        assert!(result.is_complete_success());
    }

    #[test]
    fn test_failures_and_mismatches() {
        let mut result = LoadResult::default();
        result.record_failure("Lib, Version=1.0.0.0".to_string(), "not found".to_string());
        result.record_skipped("Skip".to_string());
        result.record_version_mismatch(
            AssemblyIdentity::parse("Lib, Version=2.0.0.0").unwrap(),
            AssemblyIdentity::parse("Lib, Version=1.0.0.0").unwrap(),
        );

        assert!(result.has_failures());
        assert_eq!(result.failure_count(), 1);
        assert_eq!(result.missing_dependencies, vec!["Lib, Version=1.0.0.0"]);
        assert_eq!(result.version_mismatch_count(), 1);
        assert_eq!(result.get_version_mismatches()[0].required.name, "Lib");
        assert_eq!(result.skipped, vec!["Skip"]);
    }
}
