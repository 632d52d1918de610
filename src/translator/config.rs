//! Translator configuration.
//!
//! [`TranslatorConfig`] gathers every knob of a run: which optional pipeline steps run, what
//! gets loaded, and what is excluded from translation. It hands the relevant subsets to the
//! [`crate::project::ProjectLoader`] and the [`crate::compiler::MethodPipeline`].

use regex::Regex;

use crate::{
    compiler::{MethodPipeline, MAX_ELIMINATION_PASSES},
    metadata::customattributes::PROXY_ATTRIBUTE,
    project::ProjectLoader,
    Result,
};

/// Methods with at least this many IL instructions are logged when translated.
pub const LARGE_METHOD_THRESHOLD: usize = 1024;

/// Configuration of one translation run.
///
/// # Examples
///
/// ```rust
/// use dotscript::translator::TranslatorConfig;
///
/// let config = TranslatorConfig::default()
///     .simplify_operators(false)
///     .ignore_assembly(r"^Microsoft\.")?
///     .ignore_type("App.Native.Handle");
///
/// assert!(config.is_assembly_ignored("Microsoft.CSharp, Version=4.0.0.0"));
/// assert!(!config.is_assembly_ignored("App, Version=1.0.0.0"));
/// # Ok::<(), dotscript::Error>(())
/// ```
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct TranslatorConfig {
    /// Collapse single-use temporaries, repeated to a fixpoint
    pub eliminate_temporaries: bool,

    /// Fold compound assignments and negations
    pub simplify_operators: bool,

    /// Load and translate the transitive reference closure of the primary assembly
    pub include_dependencies: bool,

    /// Read debug symbols alongside assemblies when available
    pub use_symbols: bool,

    /// Assemblies whose full display name matches any of these are never loaded
    pub ignored_assemblies: Vec<Regex>,

    /// Fully-qualified names of types excluded from translation
    pub ignored_types: Vec<String>,

    /// Instruction count from which a method counts as large (default: 1024)
    pub large_method_threshold: usize,

    /// Bound on temporary elimination runs per method (default: 100)
    pub max_elimination_passes: usize,

    /// Full name of the attribute marking proxy types
    pub proxy_attribute: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            eliminate_temporaries: true,
            simplify_operators: true,
            include_dependencies: true,
            use_symbols: true,
            ignored_assemblies: Vec::new(),
            ignored_types: Vec::new(),
            large_method_threshold: LARGE_METHOD_THRESHOLD,
            max_elimination_passes: MAX_ELIMINATION_PASSES,
            proxy_attribute: PROXY_ATTRIBUTE.to_string(),
        }
    }
}

impl TranslatorConfig {
    /// Enables or disables temporary elimination.
    #[must_use]
    pub fn eliminate_temporaries(mut self, enabled: bool) -> Self {
        self.eliminate_temporaries = enabled;
        self
    }

    /// Enables or disables operator folding.
    #[must_use]
    pub fn simplify_operators(mut self, enabled: bool) -> Self {
        self.simplify_operators = enabled;
        self
    }

    /// Enables or disables dependency loading.
    #[must_use]
    pub fn include_dependencies(mut self, enabled: bool) -> Self {
        self.include_dependencies = enabled;
        self
    }

    /// Enables or disables symbol reading.
    #[must_use]
    pub fn use_symbols(mut self, enabled: bool) -> Self {
        self.use_symbols = enabled;
        self
    }

    /// Adds an ignored-assembly pattern.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Pattern`] if `pattern` is not a valid regular expression.
    pub fn ignore_assembly(mut self, pattern: &str) -> Result<Self> {
        self.ignored_assemblies.push(Regex::new(pattern)?);
        Ok(self)
    }

    /// Adds a type to exclude from translation.
    #[must_use]
    pub fn ignore_type(mut self, full_name: impl Into<String>) -> Self {
        self.ignored_types.push(full_name.into());
        self
    }

    /// Sets the large method threshold.
    #[must_use]
    pub fn large_method_threshold(mut self, instructions: usize) -> Self {
        self.large_method_threshold = instructions;
        self
    }

    /// Sets the bound on temporary elimination runs.
    #[must_use]
    pub fn max_elimination_passes(mut self, passes: usize) -> Self {
        self.max_elimination_passes = passes;
        self
    }

    /// Sets the proxy attribute name.
    #[must_use]
    pub fn proxy_attribute(mut self, full_name: impl Into<String>) -> Self {
        self.proxy_attribute = full_name.into();
        self
    }

    /// Returns `true` if an assembly display name matches an ignored-assembly pattern.
    #[must_use]
    pub fn is_assembly_ignored(&self, display_name: &str) -> bool {
        self.ignored_assemblies
            .iter()
            .any(|pattern| pattern.is_match(display_name))
    }

    /// A loader carrying the loading options of this configuration.
    #[must_use]
    pub fn loader(&self) -> ProjectLoader {
        ProjectLoader::new()
            .include_dependencies(self.include_dependencies)
            .use_symbols(self.use_symbols)
            .ignored_assemblies(self.ignored_assemblies.clone())
    }

    /// The method pipeline with the optional steps of this configuration.
    #[must_use]
    pub fn pipeline(&self) -> MethodPipeline {
        MethodPipeline::new()
            .eliminate_temporaries(self.eliminate_temporaries)
            .simplify_operators(self.simplify_operators)
            .max_elimination_passes(self.max_elimination_passes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TranslatorConfig::default();
        assert!(config.eliminate_temporaries);
        assert!(config.simplify_operators);
        assert!(config.include_dependencies);
        assert!(config.use_symbols);
        assert_eq!(config.large_method_threshold, 1024);
        assert_eq!(config.max_elimination_passes, 100);
        assert_eq!(config.proxy_attribute, "JSIL.Proxy.JSProxy");
        assert!(!config.is_assembly_ignored("mscorlib, Version=4.0.0.0"));
    }

    #[test]
    fn test_invalid_pattern() {
        let error = TranslatorConfig::default().ignore_assembly("(").unwrap_err();
        assert!(matches!(error, crate::Error::Pattern(_)));
    }
}
