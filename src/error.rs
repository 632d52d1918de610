use thiserror::Error;

macro_rules! invariant_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Invariant {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Invariant {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Errors fall into two groups. Data-shaped errors describe a problem with the input graph
/// (an assembly that cannot be found, a method that cannot be decompiled, a method that touches
/// an ignored type). The translator recovers from those at the smallest possible granularity and
/// records them as diagnostics. [`Error::Invariant`] on the other hand signals that the type
/// information engine itself is broken; it is never recovered and aborts the run.
///
/// # Error Categories
///
/// ## Loading Errors
/// - [`Error::AssemblyNotResolved`] - A referenced assembly could not be located or read
/// - [`Error::SymbolsUnavailable`] - Debug symbols were requested but could not be read
/// - [`Error::FileError`] - Filesystem or sink I/O errors
///
/// ## Per-Method Errors
/// - [`Error::Decompilation`] - The external decompiler failed for a method body
/// - [`Error::IgnoredTypeUsage`] - A method body references an ignored type
/// - [`Error::Transform`] - A transform pass rejected the tree
///
/// ## Configuration and Internal Errors
/// - [`Error::InvalidAssemblyName`] - A display name or version string is malformed
/// - [`Error::Pattern`] - An ignored-assembly pattern is not a valid regular expression
/// - [`Error::Invariant`] - Programmer invariant violated inside the engine
///
/// # Examples
///
/// ```rust
/// use dotscript::Error;
///
/// let error = Error::Decompilation {
///     method: "System.Void A::M()".to_string(),
///     message: "stack imbalance".to_string(),
/// };
/// assert!(error.is_method_local());
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// A referenced assembly could not be resolved.
    ///
    /// Raised by an [`crate::project::AssemblySource`] when neither a cached nor a freshly read
    /// assembly matches the requested display name. During dependency loading this is turned
    /// into an error diagnostic and the dependency is left out of the graph.
    #[error("Could not resolve assembly '{0}'")]
    AssemblyNotResolved(String),

    /// Debug symbols for an assembly could not be read.
    ///
    /// Non-fatal: loaders retry without symbols and record a diagnostic.
    #[error("Could not load debug symbols for '{0}'")]
    SymbolsUnavailable(String),

    /// File or sink I/O error.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Text formatting error while rendering declarations.
    #[error("{0}")]
    FormatError(#[from] std::fmt::Error),

    /// The external decompiler could not produce a tree for a method.
    #[error("Could not decompile {method}: {message}")]
    Decompilation {
        /// Full name of the method
        method: String,
        /// Diagnostic value reported by the decompiler
        message: String,
    },

    /// A method body references a type the translator is configured to ignore.
    #[error("{method} references ignored type {type_name}")]
    IgnoredTypeUsage {
        /// Full name of the method
        method: String,
        /// Full name of the offending type
        type_name: String,
    },

    /// A transform pass could not process a method tree.
    #[error("Pass '{pass}' failed on {method}: {message}")]
    Transform {
        /// Name of the failing pass
        pass: &'static str,
        /// Full name of the method
        method: String,
        /// Description of the failure
        message: String,
    },

    /// An assembly display name or version string could not be parsed.
    #[error("Invalid assembly name - {0}")]
    InvalidAssemblyName(String),

    /// An ignored-assembly pattern is invalid.
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// An internal invariant of the type information engine was violated.
    ///
    /// This indicates a bug in the engine, not a problem with the input graph. The error
    /// includes the source location where the violation was detected.
    #[error("Invariant violated - {file}:{line}: {message}")]
    Invariant {
        /// Description of the violated invariant
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Generic error for miscellaneous failures.
    #[error("{0}")]
    Error(String),
}

impl Error {
    /// Returns `true` if the error only affects the translation of a single method.
    ///
    /// Method-local errors are recovered by emitting an untranslatable placeholder for the
    /// method; sibling methods, the declaring type and the assembly are unaffected.
    #[must_use]
    pub fn is_method_local(&self) -> bool {
        matches!(
            self,
            Error::Decompilation { .. } | Error::IgnoredTypeUsage { .. } | Error::Transform { .. }
        )
    }

    /// Returns `true` if the error is an engine invariant violation.
    #[must_use]
    pub fn is_invariant(&self) -> bool {
        matches!(self, Error::Invariant { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_local_classification() {
        let transform = Error::Transform {
            pass: "declarations",
            method: "System.Void A::M()".to_string(),
            message: "undeclared".to_string(),
        };
        assert!(transform.is_method_local());
        assert!(!transform.is_invariant());

        let unresolved = Error::AssemblyNotResolved("Missing".to_string());
        assert!(!unresolved.is_method_local());
    }

    #[test]
    fn test_invariant_macro() {
        let error = invariant_error!("enum {} has no member table", "A.B");
        assert!(error.is_invariant());
        let text = error.to_string();
        assert!(text.contains("enum A.B has no member table"));
        assert!(text.contains("error.rs"));
    }
}
