//! Unification of choice alternatives into one type.
//!
//! Rule-level and item-level choices share this policy; they differ only in
//! whether a named owner type receives the alternatives as subtypes.

use crate::typemodel::stdlib::{self, LIST};
use crate::typemodel::{DeclId, NamespaceId, TypeDeclaration, TypeInstance, TypeModel};

/// Unify `alternatives` (already resolved, in grammar order).
///
/// `Nothing` alternatives are dropped and make the result nullable, unless
/// every alternative is `Nothing`. `owner` is the type created for a
/// rule whose whole body is the choice.
pub fn unify_choice(
    model: &mut TypeModel,
    namespace: NamespaceId,
    alternatives: &[TypeInstance],
    owner: Option<DeclId>,
) -> TypeInstance {
    let any_nullable = alternatives.iter().any(|t| t.nullable);
    let mut members: Vec<TypeInstance> = Vec::new();
    for alt in alternatives.iter().filter(|t| !stdlib::is_nothing(t)) {
        let alt = alt.clone().non_null();
        if !members.contains(&alt) {
            members.push(alt);
        }
    }
    if members.is_empty() {
        return stdlib::nothing().with_nullable(any_nullable);
    }
    let nullable = any_nullable || alternatives.iter().any(stdlib::is_nothing);

    let unified = match classify(model, &members) {
        Shape::Primitive => stdlib::string(),
        Shape::Data => unify_data(model, namespace, &members, owner),
        Shape::List => {
            if members.len() == 1 {
                members[0].clone()
            } else {
                stdlib::list_of(stdlib::any())
            }
        }
        Shape::Tuple if same_property_names(model, &members) => {
            let first = &members[0];
            let empty = model
                .declaration(first.decl)
                .properties()
                .is_none_or(|p| p.is_empty());
            if empty {
                return stdlib::nothing().with_nullable(nullable);
            }
            first.clone()
        }
        Shape::Tuple | Shape::Mixed if members.len() == 1 => members[0].clone(),
        Shape::Tuple | Shape::Mixed => TypeInstance::of(
            model
                .namespace_mut(namespace)
                .create_unnamed_supertype_type(members),
        ),
    };
    unified.with_nullable(nullable)
}

enum Shape {
    Primitive,
    Data,
    List,
    Tuple,
    Mixed,
}

fn classify(model: &TypeModel, members: &[TypeInstance]) -> Shape {
    if members.iter().all(|t| model.is_primitive(t)) {
        Shape::Primitive
    } else if members
        .iter()
        .all(|t| model.declaration(t.decl).as_data().is_some())
    {
        Shape::Data
    } else if members.iter().all(|t| t.decl == LIST) {
        Shape::List
    } else if members
        .iter()
        .all(|t| matches!(model.declaration(t.decl), TypeDeclaration::Tuple(_)))
    {
        Shape::Tuple
    } else {
        Shape::Mixed
    }
}

fn unify_data(
    model: &mut TypeModel,
    namespace: NamespaceId,
    members: &[TypeInstance],
    owner: Option<DeclId>,
) -> TypeInstance {
    if let Some(owner) = owner {
        for member in members.iter().filter(|m| m.decl != owner) {
            model.add_subtype(owner, member.decl);
        }
        return TypeInstance::of(owner);
    }
    if members.len() == 1 {
        return members[0].clone();
    }
    let common = model
        .declaration(members[0].decl)
        .supertypes()
        .iter()
        .find(|sup| members.iter().all(|m| model.conforms_to(m, sup)))
        .cloned();
    match common {
        Some(sup) => sup,
        None => TypeInstance::of(
            model
                .namespace_mut(namespace)
                .create_unnamed_supertype_type(members.to_vec()),
        ),
    }
}

fn same_property_names(model: &TypeModel, members: &[TypeInstance]) -> bool {
    let names = |t: &TypeInstance| -> Vec<String> {
        let mut names: Vec<String> = model
            .declaration(t.decl)
            .properties()
            .map(|p| p.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    };
    let first = names(&members[0]);
    members[1..].iter().all(|m| names(m) == first)
}
