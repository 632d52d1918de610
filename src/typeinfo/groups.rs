//! Method groups: overloads collapsed into one dispatch descriptor.
//!
//! Methods of one type that share a name (and staticness) and are not ignored form a group
//! when there are at least two of them. Each method in a group is emitted under a mangled name
//! (`Name$index`) and the group itself as one overload table keyed by parameter types.

use std::sync::Arc;

use crate::{
    metadata::identity::MemberIdentifier,
    typeinfo::members::{MemberInfo, MemberInfoRc},
};

/// Separator between a method name and its index within a group.
pub const MANGLE_SEPARATOR: char = '$';

/// A set of overloads sharing a name on one declaring type.
#[derive(Debug, Clone)]
pub struct MethodGroupInfo {
    name: String,
    declaring_type: String,
    is_static: bool,
    methods: Vec<MemberInfoRc>,
}

impl MethodGroupInfo {
    /// Groups the non-ignored methods of a member table.
    ///
    /// Groups appear in the order their first method is declared, and methods within a group
    /// keep declaration order. Names with a single method produce no group.
    #[must_use]
    pub fn construct(declaring_type: &str, members: &[MemberInfoRc]) -> Vec<MethodGroupInfo> {
        let mut groups: Vec<MethodGroupInfo> = Vec::new();

        for member in members {
            let Some(method) = member.as_method() else {
                continue;
            };
            if member.is_ignored() || method.is_static_constructor() {
                continue;
            }

            let is_static = member.is_static();
            match groups
                .iter_mut()
                .find(|group| group.name == method.name && group.is_static == is_static)
            {
                Some(group) => group.methods.push(Arc::clone(member)),
                None => groups.push(MethodGroupInfo {
                    name: method.name.clone(),
                    declaring_type: declaring_type.to_string(),
                    is_static,
                    methods: vec![Arc::clone(member)],
                }),
            }
        }

        groups.retain(|group| group.methods.len() >= 2);
        groups
    }

    /// The shared method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full name of the declaring type.
    #[must_use]
    pub fn declaring_type(&self) -> &str {
        &self.declaring_type
    }

    /// Returns `true` for a group of static methods.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// The overloads in declaration order.
    #[must_use]
    pub fn methods(&self) -> &[MemberInfoRc] {
        &self.methods
    }

    /// Number of overloads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Always `false` for a constructed group.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Parameter type names of every overload, in overload order.
    #[must_use]
    pub fn signatures(&self) -> Vec<Vec<String>> {
        self.methods
            .iter()
            .map(|method| method.identifier().parameters().to_vec())
            .collect()
    }

    /// Position of a method within the group.
    #[must_use]
    pub fn index_of(&self, identifier: &MemberIdentifier) -> Option<usize> {
        self.methods
            .iter()
            .position(|method| method.identifier() == identifier)
    }

    /// The name the overload at `index` is emitted under.
    #[must_use]
    pub fn mangled_name(&self, index: usize) -> String {
        format!("{}{MANGLE_SEPARATOR}{index}", self.name)
    }

    /// The mangled name of a member of this group.
    #[must_use]
    pub fn mangled_name_of(&self, member: &MemberInfo) -> Option<String> {
        self.index_of(member.identifier())
            .map(|index| self.mangled_name(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{
        builders::{MethodBuilder, TypeDefBuilder},
        customattributes::{CustomAttribute, IGNORE_ATTRIBUTE},
        signatures::TypeSignature,
    };
    use crate::typeinfo::members::MemberDef;

    fn members(builder: TypeDefBuilder) -> Vec<MemberInfoRc> {
        builder
            .build_detached()
            .methods
            .iter()
            .map(|method| Arc::new(MemberInfo::new(MemberDef::Method(method.clone()), false)))
            .collect()
    }

    #[test]
    fn test_single_method_forms_no_group() {
        let members = members(
            TypeDefBuilder::class("Ns", "T")
                .method(MethodBuilder::new("F").param("a", TypeSignature::I4))
                .method(MethodBuilder::new("G")),
        );
        assert!(MethodGroupInfo::construct("Ns.T", &members).is_empty());
    }

    #[test]
    fn test_overloads_form_one_group() {
        let members = members(
            TypeDefBuilder::class("Ns", "T")
                .method(MethodBuilder::new("F").param("a", TypeSignature::I4))
                .method(MethodBuilder::new("G"))
                .method(MethodBuilder::new("F").param("a", TypeSignature::String)),
        );

        let groups = MethodGroupInfo::construct("Ns.T", &members);
        assert_eq!(groups.len(), 1);

        let group = &groups[0];
        assert_eq!(group.name(), "F");
        assert_eq!(group.declaring_type(), "Ns.T");
        assert_eq!(group.len(), 2);
        assert_eq!(
            group.signatures(),
            vec![
                vec!["System.Int32".to_string()],
                vec!["System.String".to_string()]
            ]
        );
        assert_eq!(group.mangled_name(1), "F$1");
        assert_eq!(group.mangled_name_of(&members[2]).as_deref(), Some("F$1"));
        assert!(group.index_of(members[1].identifier()).is_none());
    }

    #[test]
    fn test_ignored_and_static_split() {
        let members = members(
            TypeDefBuilder::class("Ns", "T")
                .method(MethodBuilder::new("F").param("a", TypeSignature::I4))
                .method(
                    MethodBuilder::new("F")
                        .param("a", TypeSignature::String)
                        .attribute(CustomAttribute::new(IGNORE_ATTRIBUTE)),
                )
                .method(MethodBuilder::new("F").static_().param("a", TypeSignature::R8)),
        );

        assert!(MethodGroupInfo::construct("Ns.T", &members).is_empty());
    }
}
