use super::stdlib::{self, BOOLEAN, STRING};
use super::*;

struct Fixture {
    model: TypeModel,
    expr: DeclId,
    binary: DeclId,
    literal: DeclId,
    other: DeclId,
}

fn fixture() -> Fixture {
    let mut model = TypeModel::new("sample");
    let ns = model.add_namespace("test.Expr");
    let expr = model.namespace_mut(ns).find_or_create_data_type_named("Expr");
    let binary = model.namespace_mut(ns).find_or_create_data_type_named("Binary");
    let literal = model.namespace_mut(ns).find_or_create_data_type_named("Literal");
    let other = model.namespace_mut(ns).find_or_create_data_type_named("Other");
    model.add_subtype(expr, binary);
    model.add_subtype(binary, literal);
    Fixture {
        model,
        expr,
        binary,
        literal,
        other,
    }
}

fn of(decl: DeclId) -> TypeInstance {
    TypeInstance::of(decl)
}

#[test]
fn any_accepts_everything_and_nothing_conforms_to_everything() {
    let f = fixture();
    assert!(f.model.conforms_to(&of(f.other), &stdlib::any()));
    assert!(f.model.conforms_to(&stdlib::string(), &stdlib::any()));
    assert!(f.model.conforms_to(&stdlib::nothing(), &of(f.expr)));
    assert!(!f.model.conforms_to(&stdlib::any(), &of(f.expr)));
}

#[test]
fn supertypes_are_followed_transitively() {
    let f = fixture();
    assert!(f.model.conforms_to(&of(f.binary), &of(f.expr)));
    assert!(f.model.conforms_to(&of(f.literal), &of(f.expr)));
    assert!(!f.model.conforms_to(&of(f.expr), &of(f.literal)));
    assert!(!f.model.conforms_to(&of(f.other), &of(f.expr)));
}

#[test]
fn nullable_never_conforms_to_non_nullable() {
    let f = fixture();
    assert!(!f.model.conforms_to(&of(f.literal).make_nullable(), &of(f.expr)));
    assert!(f.model.conforms_to(&of(f.literal), &of(f.expr).make_nullable()));
    assert!(
        f.model
            .conforms_to(&of(f.literal).make_nullable(), &of(f.expr).make_nullable())
    );
}

#[test]
fn collection_arguments_compared_pairwise() {
    let f = fixture();
    let literals = stdlib::list_of(of(f.literal));
    let exprs = stdlib::list_of(of(f.expr));
    assert!(f.model.conforms_to(&literals, &exprs));
    assert!(!f.model.conforms_to(&exprs, &literals));
    assert!(!f.model.conforms_to(&stdlib::list_of(of(STRING)), &exprs));
}

#[test]
fn unnamed_supertype_members() {
    let mut f = fixture();
    let ns = f.expr.namespace();
    let union = f
        .model
        .namespace_mut(ns)
        .create_unnamed_supertype_type(vec![of(f.literal), of(BOOLEAN)]);

    assert!(f.model.conforms_to(&of(f.literal), &of(union)));
    assert!(f.model.conforms_to(&of(BOOLEAN), &of(union)));
    assert!(!f.model.conforms_to(&of(f.other), &of(union)));
    assert!(!f.model.conforms_to(&of(union), &of(f.expr)));

    let narrow = f
        .model
        .namespace_mut(ns)
        .create_unnamed_supertype_type(vec![of(f.literal), of(f.binary)]);
    assert!(f.model.conforms_to(&of(narrow), &of(f.expr)));
}

#[test]
fn named_conformance_accepts_simple_and_qualified_names() {
    let f = fixture();
    assert!(f.model.conforms_to_named("test.Expr.Literal", "Expr"));
    assert!(f.model.conforms_to_named("Binary", "test.Expr.Expr"));
    assert!(!f.model.conforms_to_named("Other", "Expr"));
    assert!(f.model.conforms_to_named("Unknown", "Unknown"));
    assert!(!f.model.conforms_to_named("Unknown", "Expr"));
}
