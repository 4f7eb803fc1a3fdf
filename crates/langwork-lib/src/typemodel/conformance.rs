//! Subtype compatibility between type instances.

use super::declaration::TypeDeclaration;
use super::instance::{DeclId, TypeInstance};
use super::model::TypeModel;
use super::stdlib::{ANY, NOTHING};

impl TypeModel {
    /// Whether a value of type `sub` may be used where `sup` is expected.
    ///
    /// A nullable instance never conforms to a non-nullable one. `Any`
    /// accepts everything and `Nothing` conforms to everything. Same
    /// declarations compare their arguments pairwise; otherwise declared
    /// supertypes are followed transitively. An unnamed supertype conforms
    /// when all of its members do, and a type conforms to one when it
    /// conforms to any member.
    pub fn conforms_to(&self, sub: &TypeInstance, sup: &TypeInstance) -> bool {
        let mut visited = Vec::new();
        self.conforms_inner(sub, sup, &mut visited)
    }

    fn conforms_inner(
        &self,
        sub: &TypeInstance,
        sup: &TypeInstance,
        visited: &mut Vec<DeclId>,
    ) -> bool {
        if sub.nullable && !sup.nullable {
            return false;
        }
        if sup.decl == ANY || sub.decl == NOTHING {
            return true;
        }
        if sub.decl == sup.decl {
            return sub.args.len() == sup.args.len()
                && sub
                    .args
                    .iter()
                    .zip(&sup.args)
                    .all(|(a, b)| self.conforms_inner(a, b, &mut Vec::new()));
        }

        if let TypeDeclaration::UnnamedSupertype(union) = self.declaration(sub.decl) {
            return union.subtypes.iter().all(|member| {
                let member = member.clone().with_nullable(sub.nullable);
                self.conforms_inner(&member, sup, &mut Vec::new())
            });
        }
        if let TypeDeclaration::UnnamedSupertype(union) = self.declaration(sup.decl) {
            return union.subtypes.iter().any(|member| {
                let member = member.clone().with_nullable(sup.nullable);
                self.conforms_inner(sub, &member, &mut Vec::new())
            });
        }

        if visited.contains(&sub.decl) {
            return false;
        }
        visited.push(sub.decl);
        self.declaration(sub.decl).supertypes().iter().any(|parent| {
            let parent = parent.clone().with_nullable(sub.nullable);
            self.conforms_inner(&parent, sup, visited)
        })
    }

    /// Name-based conformance used where only qualified type names are
    /// known, e.g. scope items. Unknown names conform only to themselves.
    pub fn conforms_to_named(&self, sub: &str, sup: &str) -> bool {
        if sub == sup {
            return true;
        }
        match (
            self.find_first_by_possibly_qualified_or_null(sub),
            self.find_first_by_possibly_qualified_or_null(sup),
        ) {
            (Some(a), Some(b)) => self.conforms_to(&TypeInstance::of(a), &TypeInstance::of(b)),
            _ => false,
        }
    }
}
