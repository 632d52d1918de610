//! Where assemblies come from.
//!
//! Reading an assembly file into an [`AssemblyDef`](crate::metadata::assembly::AssemblyDef)
//! is an external collaborator's job. The loader only asks an [`AssemblySource`] for the
//! assembly matching a reference.

use rustc_hash::FxHashMap;

use crate::{
    metadata::{assembly::AssemblyDefRc, identity::AssemblyIdentity},
    Error, Result,
};

/// Options of a single read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Read debug symbols alongside the assembly
    pub read_symbols: bool,
}

impl ReadOptions {
    /// Read with debug symbols.
    pub const WITH_SYMBOLS: Self = Self { read_symbols: true };
    /// Read without debug symbols.
    pub const WITHOUT_SYMBOLS: Self = Self {
        read_symbols: false,
    };
}

/// Produces assemblies for references.
pub trait AssemblySource: Send + Sync {
    /// Reads the assembly a reference denotes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AssemblyNotResolved`] if no assembly matches, and
    /// [`Error::SymbolsUnavailable`] if symbols were requested but cannot be read.
    fn read(&self, identity: &AssemblyIdentity, options: ReadOptions) -> Result<AssemblyDefRc>;
}

/// A source over assemblies that are already in memory.
///
/// Lookups match names case-insensitively. When several versions are present, one
/// satisfying the reference wins; otherwise the first with the name is returned and the
/// loader records the version mismatch. Requesting symbols for an assembly built without
/// them fails with [`Error::SymbolsUnavailable`].
#[derive(Debug, Default, Clone)]
pub struct InMemorySource {
    by_name: FxHashMap<String, Vec<AssemblyDefRc>>,
}

impl InMemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an assembly.
    #[must_use]
    pub fn with_assembly(mut self, assembly: AssemblyDefRc) -> Self {
        self.add(assembly);
        self
    }

    /// Adds an assembly.
    pub fn add(&mut self, assembly: AssemblyDefRc) {
        self.by_name
            .entry(assembly.name().to_ascii_lowercase())
            .or_default()
            .push(assembly);
    }

    /// Number of assemblies held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_name.values().map(Vec::len).sum()
    }

    /// Returns `true` if the source holds nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl AssemblySource for InMemorySource {
    fn read(&self, identity: &AssemblyIdentity, options: ReadOptions) -> Result<AssemblyDefRc> {
        let candidates = self
            .by_name
            .get(&identity.name.to_ascii_lowercase())
            .ok_or_else(|| Error::AssemblyNotResolved(identity.display_name()))?;

        let assembly = candidates
            .iter()
            .find(|candidate| candidate.identity.satisfies(identity))
            .or_else(|| candidates.first())
            .ok_or_else(|| Error::AssemblyNotResolved(identity.display_name()))?;

        if options.read_symbols && !assembly.has_symbols {
            return Err(Error::SymbolsUnavailable(assembly.full_name()));
        }
        Ok(assembly.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{builders::AssemblyBuilder, identity::AssemblyVersion};

    #[test]
    fn test_version_selection() {
        let source = InMemorySource::new()
            .with_assembly(
                AssemblyBuilder::new("Lib")
                    .version(AssemblyVersion::new(1, 0, 0, 0))
                    .build(),
            )
            .with_assembly(
                AssemblyBuilder::new("Lib")
                    .version(AssemblyVersion::new(2, 1, 0, 0))
                    .build(),
            );
        assert_eq!(source.len(), 2);

        let wanted = AssemblyIdentity::new("lib", AssemblyVersion::new(2, 0, 0, 0));
        let found = source.read(&wanted, ReadOptions::WITHOUT_SYMBOLS).unwrap();
        assert_eq!(found.identity.version, AssemblyVersion::new(2, 1, 0, 0));

        let missing = AssemblyIdentity::new("Other", AssemblyVersion::UNKNOWN);
        assert!(matches!(
            source.read(&missing, ReadOptions::WITHOUT_SYMBOLS),
            Err(Error::AssemblyNotResolved(_))
        ));
    }

    #[test]
    fn test_symbols_requested_but_missing() {
        let source = InMemorySource::new()
            .with_assembly(AssemblyBuilder::new("Lib").without_symbols().build());
        let wanted = AssemblyIdentity::new("Lib", AssemblyVersion::UNKNOWN);

        assert!(matches!(
            source.read(&wanted, ReadOptions::WITH_SYMBOLS),
            Err(Error::SymbolsUnavailable(_))
        ));
        assert!(source.read(&wanted, ReadOptions::WITHOUT_SYMBOLS).is_ok());
    }
}
