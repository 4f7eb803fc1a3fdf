use indoc::indoc;

use crate::asm::{Asm, AsmReference, AsmValue, ReferenceTarget};
use crate::derive::Derivation;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::test_utils::{Stmt, derive, program, program_asm};
use crate::xref::{CrossReferenceModel, Expression, ReferenceExpression};

use super::*;

fn expr(text: &str) -> Expression {
    Expression::parse(text).unwrap()
}

/// Declarations and blocks are named by `ID`; blocks open scopes.
fn declarations() -> CrossReferenceModel {
    CrossReferenceModel::new()
        .identify("Decl", expr("ID"))
        .identify("Block", expr("ID"))
        .scope("Block")
}

/// `use` statements refer to declarations of `target_types`.
fn uses(target_types: &[&str]) -> CrossReferenceModel {
    declarations().reference("Use", ReferenceExpression::property(expr("ID"), target_types))
}

struct Run {
    asm: Asm,
    scopes: ScopeTree,
    diagnostics: Diagnostics,
}

fn run_in(
    d: &Derivation,
    xref: &CrossReferenceModel,
    options: SemanticAnalysisOptions,
    stmts: Vec<Stmt>,
    tree: ScopeTree,
) -> Run {
    let mut asm = program_asm(stmts);
    let mut analyser = SemanticAnalyser::new(&d.type_model, xref).with_options(options);
    let scopes = analyser.analyse_in(&mut asm, tree);
    Run {
        asm,
        scopes,
        diagnostics: analyser.into_diagnostics(),
    }
}

fn run(xref: &CrossReferenceModel, stmts: Vec<Stmt>) -> Run {
    let d = derive(program);
    run_in(&d, xref, SemanticAnalysisOptions::default(), stmts, ScopeTree::new())
}

#[test]
fn unique_match_becomes_reference() {
    let r = run(&uses(&["Decl"]), vec![Stmt::Decl("x"), Stmt::Use("x")]);

    assert!(r.diagnostics.is_empty(), "{}", r.diagnostics.render());
    assert_eq!(
        r.asm.dump(),
        indoc! {"
            Unit {
              stmt: [
                Decl {
                  ID: 'x'
                }
                Use {
                  ID: &x -> /0/stmt/0
                }
              ]
            }
        "}
    );
    let decl = r.asm.element_at(&"/0/stmt/0".into()).unwrap();
    assert_eq!(
        r.asm.value_at(&"/0/stmt/1/ID".into()),
        Some(&AsmValue::Reference(AsmReference {
            reference: "x".into(),
            target: ReferenceTarget::Element(decl),
        }))
    );
}

#[test]
fn missing_name_leaves_unresolved_marker() {
    let r = run(&uses(&["Decl"]), vec![Stmt::Use("x")]);

    assert_eq!(r.diagnostics.error_count(), 1);
    insta::assert_snapshot!(r.diagnostics.render(), @"error[semantic]: cannot find `x` (at /0/stmt/0/ID)");
    assert_eq!(
        r.asm.value_at(&"/0/stmt/0/ID".into()),
        Some(&AsmValue::Reference(AsmReference::unresolved("x")))
    );
}

#[test]
fn several_matches_are_ambiguous() {
    let r = run(
        &uses(&["Stmt"]),
        vec![Stmt::Decl("x"), Stmt::Block("x", vec![]), Stmt::Use("x")],
    );

    assert_eq!(r.diagnostics.len(), 1);
    assert_eq!(r.diagnostics.count_of(DiagnosticKind::AmbiguousReference), 1);
    insta::assert_snapshot!(r.diagnostics.render(), @"error[semantic]: `x` matches more than one element (at /0/stmt/2/ID)");
    assert_eq!(
        r.asm.value_at(&"/0/stmt/2/ID".into()),
        Some(&AsmValue::Reference(AsmReference::unresolved("x")))
    );
}

#[test]
fn target_types_narrow_the_candidates() {
    let r = run(
        &uses(&["Block"]),
        vec![Stmt::Decl("x"), Stmt::Block("x", vec![]), Stmt::Use("x")],
    );

    assert!(r.diagnostics.is_empty());
    assert_eq!(
        r.asm.dump().lines().find(|line| line.contains('&')),
        Some("      ID: &x -> /0/stmt/1")
    );
}

#[test]
fn external_item_resolves_without_diagnostics() {
    let d = derive(program);
    let mut builtins = ScopeTree::new();
    let root = builtins.root();
    builtins.add_external(root, "int", "test.Test.Decl");

    let r = run_in(
        &d,
        &uses(&["Decl"]),
        SemanticAnalysisOptions::default(),
        vec![Stmt::Use("int")],
        builtins,
    );

    assert!(r.diagnostics.is_empty());
    assert_eq!(
        r.asm.value_at(&"/0/stmt/0/ID".into()),
        Some(&AsmValue::Reference(AsmReference {
            reference: "int".into(),
            target: ReferenceTarget::External,
        }))
    );
}

#[test]
fn lookup_is_lexical() {
    let r = run(
        &uses(&["Decl"]),
        vec![
            Stmt::Block("b", vec![Stmt::Decl("x"), Stmt::Use("x")]),
            Stmt::Use("x"),
        ],
    );

    assert_eq!(
        r.scopes.dump(),
        indoc! {"
            §root {
              b: Block @ /0/stmt/0
              b {
                x: Decl @ /0/stmt/0/stmt/0
              }
            }
        "}
    );
    insta::assert_snapshot!(r.diagnostics.render(), @"error[semantic]: cannot find `x` (at /0/stmt/1/ID)");
    assert_eq!(
        r.asm.dump(),
        indoc! {"
            Unit {
              stmt: [
                Block {
                  ID: 'b'
                  stmt: [
                    Decl {
                      ID: 'x'
                    }
                    Use {
                      ID: &x -> /0/stmt/0/stmt/0
                    }
                  ]
                }
                Use {
                  ID: &x -> ?
                }
              ]
            }
        "}
    );
}

#[test]
fn list_of_names_is_looked_up_from_root() {
    let r = run(
        &uses(&["Decl"]),
        vec![
            Stmt::Block("b", vec![Stmt::Decl("x")]),
            Stmt::UseQualified(&["b", "x"]),
            Stmt::UseQualified(&["x"]),
        ],
    );

    let decl = r.asm.element_at(&"/0/stmt/0/stmt/0".into()).unwrap();
    assert_eq!(
        r.asm.value_at(&"/0/stmt/1/ID".into()),
        Some(&AsmValue::Reference(AsmReference {
            reference: "b.x".into(),
            target: ReferenceTarget::Element(decl),
        }))
    );
    insta::assert_snapshot!(r.diagnostics.render(), @"error[semantic]: cannot find `x` (at /0/stmt/2/ID)");
}

#[test]
fn checking_only_reports_without_changing_asm() {
    let d = derive(program);
    let options = SemanticAnalysisOptions::default().resolve_references(false);
    let r = run_in(
        &d,
        &uses(&["Decl"]),
        options,
        vec![Stmt::Decl("x"), Stmt::Use("x"), Stmt::Use("y")],
        ScopeTree::new(),
    );

    assert_eq!(r.diagnostics.count_of(DiagnosticKind::UnresolvedReference), 1);
    assert_eq!(
        r.asm.value_at(&"/0/stmt/1/ID".into()),
        Some(&AsmValue::Primitive("x".into()))
    );
    assert_eq!(
        r.asm.value_at(&"/0/stmt/2/ID".into()),
        Some(&AsmValue::Primitive("y".into()))
    );
}

#[test]
fn navigated_scope_is_searched() {
    // The unit resolves its second statement inside the scope of its first.
    let xref = declarations().reference(
        "Unit",
        ReferenceExpression::property(expr("stmt.child[1].ID"), &["Decl"])
            .in_scope_of(expr("stmt.child[0]")),
    );
    let r = run(
        &xref,
        vec![Stmt::Block("b", vec![Stmt::Decl("x")]), Stmt::Use("x")],
    );

    assert!(r.diagnostics.is_empty(), "{}", r.diagnostics.render());
    assert_eq!(
        r.asm.dump().lines().find(|line| line.contains('&')),
        Some("      ID: &x -> /0/stmt/0/stmt/0")
    );
}

#[test]
fn navigation_to_scopeless_element_is_reported() {
    let xref = declarations().reference(
        "Unit",
        ReferenceExpression::property(expr("stmt.child[0].ID"), &["Decl"])
            .in_scope_of(expr("stmt.child[1]")),
    );
    let r = run(&xref, vec![Stmt::Decl("x"), Stmt::Use("x")]);

    insta::assert_snapshot!(r.diagnostics.render(), @"error[semantic]: navigation target defines no scope (at /0) (data: stmt.child[1])");
    assert_eq!(
        r.asm.value_at(&"/0/stmt/1/ID".into()),
        Some(&AsmValue::Primitive("x".into()))
    );
}

#[test]
fn collection_applies_nested_expressions_per_item() {
    let xref = declarations().reference(
        "Block",
        ReferenceExpression::collection(
            expr("stmt"),
            Some("Use"),
            vec![ReferenceExpression::property(expr("ID"), &["Decl"])],
        ),
    );
    let r = run(
        &xref,
        vec![
            Stmt::Decl("x"),
            Stmt::Block("b", vec![Stmt::Use("x"), Stmt::Decl("y"), Stmt::Use("z")]),
        ],
    );

    let x = r.asm.element_at(&"/0/stmt/0".into()).unwrap();
    assert_eq!(
        r.asm.value_at(&"/0/stmt/1/stmt/0/ID".into()),
        Some(&AsmValue::Reference(AsmReference {
            reference: "x".into(),
            target: ReferenceTarget::Element(x),
        }))
    );
    assert_eq!(
        r.asm.value_at(&"/0/stmt/1/stmt/1/ID".into()),
        Some(&AsmValue::Primitive("y".into()))
    );
    insta::assert_snapshot!(r.diagnostics.render(), @"error[semantic]: cannot find `z` (at /0/stmt/1/stmt/2/ID)");
}

#[test]
fn non_name_value_is_invalid() {
    let xref = declarations().reference(
        "Block",
        ReferenceExpression::property(expr("stmt"), &["Decl"]),
    );
    let r = run(&xref, vec![Stmt::Block("b", vec![Stmt::Decl("x")])]);

    insta::assert_snapshot!(r.diagnostics.render(), @"error[semantic]: reference value is not a name (at /0/stmt/0/stmt) (data: stmt)");
}

#[test]
fn scope_item_without_asm_element_is_reported() {
    let d = derive(program);
    let mut seeded = ScopeTree::new();
    let root = seeded.root();
    seeded.add_to_scope(root, "ghost", "test.Test.Decl", "/7".into());
    seeded.add_to_scope(root, "text", "test.Test.Decl", "/0/stmt/1/ID".into());

    let r = run_in(
        &d,
        &uses(&["Decl"]),
        SemanticAnalysisOptions::default(),
        vec![Stmt::Use("ghost"), Stmt::Use("text")],
        seeded,
    );

    assert_eq!(
        r.diagnostics.count_of(DiagnosticKind::ReferenceTargetMissing),
        1
    );
    assert_eq!(
        r.diagnostics.count_of(DiagnosticKind::ReferenceTargetNotElement),
        1
    );
    insta::assert_snapshot!(r.diagnostics.render(), @r"
    error[semantic]: ASM does not contain element as reference (at /0/stmt/0/ID) (data: ghost)
    error[semantic]: reference target is not an element (at /0/stmt/1/ID) (data: text)
    ");
    assert_eq!(
        r.asm.value_at(&"/0/stmt/0/ID".into()),
        Some(&AsmValue::Reference(AsmReference::unresolved("ghost")))
    );
}

#[test]
fn resolved_references_are_left_alone() {
    let d = derive(program);
    let xref = uses(&["Decl"]);
    let mut asm = program_asm(vec![Stmt::Decl("x"), Stmt::Use("x")]);
    let mut analyser = SemanticAnalyser::new(&d.type_model, &xref);

    analyser.analyse(&mut asm);
    let first = asm.clone();
    analyser.analyse(&mut asm);

    assert_eq!(asm, first);
    assert!(analyser.diagnostics().is_empty());
}

#[test]
#[should_panic(expected = "cannot read `name` of a primitive")]
fn navigating_through_a_primitive_panics() {
    let xref = declarations().reference(
        "Use",
        ReferenceExpression::property(expr("ID.name.first"), &["Decl"]),
    );
    run(&xref, vec![Stmt::Use("x")]);
}
