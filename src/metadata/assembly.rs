//! Assembly and module definitions.

use std::sync::Arc;

use crate::metadata::{
    customattributes::{has_attribute, CustomAttribute, IGNORE_ATTRIBUTE},
    identity::AssemblyIdentity,
    types::TypeDefRc,
};

/// Shared reference to an assembly definition
pub type AssemblyDefRc = Arc<AssemblyDef>;
/// Shared reference to a module definition
pub type ModuleDefRc = Arc<ModuleDef>;

/// A module: the unit types are declared in.
#[derive(Debug, Clone)]
pub struct ModuleDef {
    /// Module file name (e.g. `App.dll`)
    pub name: String,
    /// Simple name of the owning assembly
    pub assembly: String,
    /// Top-level types in declaration order
    pub types: Vec<TypeDefRc>,
    /// Attached custom attributes
    pub custom_attributes: Vec<CustomAttribute>,
}

impl ModuleDef {
    /// Returns `true` if the module carries the ignore attribute.
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        has_attribute(&self.custom_attributes, IGNORE_ATTRIBUTE)
    }

    /// Every type of the module, nested types included, in pre-order.
    #[must_use]
    pub fn all_types(&self) -> Vec<TypeDefRc> {
        let mut result = Vec::new();
        let mut stack: Vec<TypeDefRc> = self.types.iter().rev().cloned().collect();

        while let Some(current) = stack.pop() {
            stack.extend(current.nested_types.iter().rev().cloned());
            result.push(current);
        }

        result
    }
}

/// An assembly: identity, modules and references to other assemblies.
#[derive(Debug, Clone)]
pub struct AssemblyDef {
    /// Name, version, culture and token
    pub identity: AssemblyIdentity,
    /// Modules, the manifest module first
    pub modules: Vec<ModuleDefRc>,
    /// Identities of referenced assemblies
    pub references: Vec<AssemblyIdentity>,
    /// Attached custom attributes
    pub custom_attributes: Vec<CustomAttribute>,
    /// Whether debug symbols were read alongside the assembly
    pub has_symbols: bool,
}

impl AssemblyDef {
    /// Simple name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.identity.name
    }

    /// Full display name.
    #[must_use]
    pub fn full_name(&self) -> String {
        self.identity.display_name()
    }

    /// Every type of every module, nested types included.
    pub fn all_types(&self) -> impl Iterator<Item = TypeDefRc> + '_ {
        self.modules.iter().flat_map(|module| module.all_types())
    }
}
