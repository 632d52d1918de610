//! Variable naming.
//!
//! Gives every non-parameter variable a stable display name. Named locals keep their name;
//! decompiler temporaries get a name derived from their type (`num`, `text`, `flag`, the
//! camel-cased type name otherwise). Collisions with parameters, with each other and with
//! reserved words of the target language get a numeric suffix (`num`, `num2`, ...).
//!
//! Naming is deterministic in variable-table order, so a second run renames nothing.

use rustc_hash::FxHashSet;

use crate::{
    ast::DecompiledMethod,
    compiler::pass::{AstPass, PassContext},
    metadata::signatures::TypeSignature,
    Result,
};

/// Words a local must never be called.
pub(crate) const RESERVED_WORDS: &[&str] = &[
    "arguments", "await", "break", "case", "catch", "class", "const", "continue", "debugger",
    "default", "delete", "do", "else", "enum", "eval", "export", "extends", "false", "finally",
    "for", "function", "if", "implements", "import", "in", "instanceof", "interface", "let",
    "new", "null", "package", "private", "protected", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "undefined", "var", "void", "while",
    "with", "yield",
];

/// Assigns display names to non-parameter variables.
#[derive(Debug, Default, Clone, Copy)]
pub struct NameVariablesPass;

impl NameVariablesPass {
    /// Base name for a variable of the given type.
    fn base_name(signature: &TypeSignature) -> String {
        match signature {
            TypeSignature::SzArray(_) | TypeSignature::Array(..) => return "array".to_string(),
            TypeSignature::ByRef(inner) | TypeSignature::Ptr(inner) => {
                return Self::base_name(inner)
            }
            TypeSignature::GenericParamType(_) | TypeSignature::GenericParamMethod(_) => {
                return "val".to_string()
            }
            _ => {}
        }

        match signature.primitive_name() {
            Some("System.Boolean") => return "flag".to_string(),
            Some("System.Char") => return "c".to_string(),
            Some("System.String") => return "text".to_string(),
            Some("System.Object") => return "obj".to_string(),
            Some(_) => return "num".to_string(),
            None => {}
        }

        let Some(name) = signature.definition_name() else {
            return "val".to_string();
        };
        let simple = name.name.rsplit('/').next().unwrap_or(&name.name);
        let simple = simple.split('`').next().unwrap_or(simple);

        let mut chars = simple.chars();
        match chars.next() {
            Some(first) if first.is_alphabetic() => {
                first.to_lowercase().chain(chars).collect()
            }
            _ => "val".to_string(),
        }
    }
}

impl AstPass for NameVariablesPass {
    fn name(&self) -> &'static str {
        "name-variables"
    }

    fn description(&self) -> &'static str {
        "Assigns stable, unique display names to locals and temporaries"
    }

    fn run(&self, method: &mut DecompiledMethod, _ctx: &PassContext<'_>) -> Result<usize> {
        let mut taken: FxHashSet<String> = method
            .variables
            .iter()
            .filter(|(_, variable)| variable.is_parameter)
            .map(|(_, variable)| variable.name.clone())
            .collect();

        let locals: Vec<_> = method
            .variables
            .iter()
            .filter(|(_, variable)| !variable.is_parameter)
            .map(|(id, _)| id)
            .collect();

        let mut renamed = 0;
        for id in locals {
            let Some(variable) = method.variables.get_mut(id) else {
                continue;
            };

            let base = if variable.is_generated || variable.name.is_empty() {
                Self::base_name(&variable.ty)
            } else {
                variable.name.clone()
            };

            let mut candidate = base.clone();
            let mut suffix = 1;
            while taken.contains(&candidate) || RESERVED_WORDS.contains(&candidate.as_str()) {
                suffix += 1;
                candidate = format!("{base}{suffix}");
            }

            if variable.name != candidate {
                variable.name.clone_from(&candidate);
                renamed += 1;
            }
            taken.insert(candidate);
        }

        Ok(renamed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::run_pass;

    fn run(method: &mut DecompiledMethod) -> usize {
        run_pass(&NameVariablesPass, method)
    }

    #[test]
    fn test_temporaries_named_by_type() {
        let mut method = DecompiledMethod::new();
        let a = method.variables.temporary(TypeSignature::I4);
        let b = method.variables.temporary(TypeSignature::I4);
        let s = method.variables.temporary(TypeSignature::String);
        let p = method
            .variables
            .temporary(TypeSignature::value_type("Geo", "Point"));

        assert_eq!(run(&mut method), 4);
        assert_eq!(method.variables.name_of(a), "num");
        assert_eq!(method.variables.name_of(b), "num2");
        assert_eq!(method.variables.name_of(s), "text");
        assert_eq!(method.variables.name_of(p), "point");
    }

    #[test]
    fn test_collisions_with_parameters_and_reserved_words() {
        let mut method = DecompiledMethod::new();
        method.variables.parameter("num", TypeSignature::I4);
        let local = method.variables.local("class", TypeSignature::Object);
        let temp = method.variables.temporary(TypeSignature::I4);

        run(&mut method);
        assert_eq!(method.variables.name_of(local), "class2");
        assert_eq!(method.variables.name_of(temp), "num2");
    }

    #[test]
    fn test_second_run_is_stable() {
        let mut method = DecompiledMethod::new();
        method.variables.temporary(TypeSignature::I4);
        method.variables.local("count", TypeSignature::I4);
        method
            .variables
            .temporary(TypeSignature::class("System.Collections.Generic", "List`1"));

        assert!(run(&mut method) > 0);
        assert_eq!(run(&mut method), 0);
    }
}
