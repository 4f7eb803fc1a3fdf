use indoc::indoc;

use crate::asm::walk;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::test_utils::{Stmt, derive, program, program_asm};
use crate::xref::{CrossReferenceModel, Expression};

use super::*;

fn build(xref: &CrossReferenceModel, stmts: Vec<Stmt>) -> (ScopeTree, Diagnostics) {
    let d = derive(program);
    let asm = program_asm(stmts);
    let mut creator = ScopeCreator::new(&d.type_model, xref, ScopeTree::new());
    walk(&asm, &mut creator);
    creator.finish()
}

fn identified_by(expression: &str) -> CrossReferenceModel {
    let expression = Expression::parse(expression).unwrap();
    CrossReferenceModel::new()
        .identify("Decl", expression.clone())
        .identify("Block", expression)
        .scope("Block")
}

#[test]
fn nested_blocks_open_nested_scopes() {
    let (tree, diagnostics) = build(
        &identified_by("ID"),
        vec![
            Stmt::Decl("a"),
            Stmt::Block(
                "outer",
                vec![Stmt::Decl("b"), Stmt::Block("inner", vec![Stmt::Decl("c")])],
            ),
            Stmt::Use("a"),
        ],
    );

    assert!(diagnostics.is_empty());
    assert_eq!(
        tree.dump(),
        indoc! {"
            §root {
              a: Decl @ /0/stmt/0
              outer: Block @ /0/stmt/1
              outer {
                b: Decl @ /0/stmt/1/stmt/0
                inner: Block @ /0/stmt/1/stmt/1
                inner {
                  c: Decl @ /0/stmt/1/stmt/1/stmt/0
                }
              }
            }
        "}
    );
    let outer = tree.child(tree.root(), "outer").unwrap();
    assert_eq!(tree.scope_for_path(&"/0/stmt/1".into()), Some(outer));
}

#[test]
fn blocks_with_same_name_share_a_scope() {
    let (tree, diagnostics) = build(
        &identified_by("ID"),
        vec![
            Stmt::Block("m", vec![Stmt::Decl("x")]),
            Stmt::Block("m", vec![Stmt::Decl("y")]),
        ],
    );

    assert_eq!(diagnostics.count_of(DiagnosticKind::DuplicateScopeItem), 1);
    let m = tree.child(tree.root(), "m").unwrap();
    assert_eq!(tree.identifiers(m).collect::<Vec<_>>(), vec!["x", "y"]);
    assert_eq!(tree.scope_for_path(&"/0/stmt/1".into()), Some(m));
}

#[test]
fn duplicate_declaration_is_reported() {
    let (tree, diagnostics) = build(
        &identified_by("ID"),
        vec![Stmt::Decl("x"), Stmt::Decl("x")],
    );

    insta::assert_snapshot!(diagnostics.render(), @"warning[semantic]: `x` is already registered in this scope (at /0/stmt/1)");
    assert_eq!(tree.items(tree.root(), "x").len(), 1);
}

#[test]
fn literal_identity_names_every_element_alike() {
    let (tree, diagnostics) = build(
        &identified_by("'it'"),
        vec![Stmt::Decl("x"), Stmt::Block("b", vec![])],
    );

    assert!(diagnostics.is_empty());
    assert_eq!(
        tree.dump(),
        indoc! {"
            §root {
              it: Decl @ /0/stmt/0
              it: Block @ /0/stmt/1
              it {}
            }
        "}
    );
}

#[test]
fn absent_identity_falls_back_to_type_name() {
    let (tree, diagnostics) = build(&identified_by("name"), vec![Stmt::Decl("x")]);

    insta::assert_snapshot!(diagnostics.render(), @"warning[semantic]: element has no identifying value (at /0/stmt/0) (data: name)");
    assert_eq!(tree.items(tree.root(), "Decl").len(), 1);
}

#[test]
fn non_scalar_identity_is_not_registered() {
    let (tree, diagnostics) = build(
        &identified_by("stmt"),
        vec![Stmt::Block("b", vec![])],
    );

    insta::assert_snapshot!(diagnostics.render(), @"warning[semantic]: identifying value is not a name (at /0/stmt/0) (data: stmt)");
    assert_eq!(tree.dump(), "§root {\n  Block {}\n}\n");
}

#[test]
fn unidentified_types_are_skipped() {
    let (tree, diagnostics) = build(
        &CrossReferenceModel::new().scope("Block"),
        vec![Stmt::Decl("x"), Stmt::Block("b", vec![Stmt::Decl("y")])],
    );

    assert!(diagnostics.is_empty());
    assert_eq!(tree.dump(), "§root {\n  Block {}\n}\n");
}
