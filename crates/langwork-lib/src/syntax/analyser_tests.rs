use indoc::indoc;
use langwork_core::Grammar;

use crate::asm::{Asm, AsmPath, AsmValue};
use crate::diagnostics::DiagnosticKind;
use crate::test_utils::{declarations, derive_set, grammar};
use crate::transform::{Navigation, PropertyAssignment};
use crate::typemodel::{TUPLE_TYPE_NAME, TypeDeclaration, TypeInstance, TypeModel, stdlib};
use crate::Error;

use super::*;

fn decl(name: &str) -> ParseNode {
    ParseNode::rule("decl", vec![ParseNode::token("var"), ParseNode::leaf("ID", name)])
}

/// `var x var y`
fn unit_tree() -> ParseNode {
    ParseNode::rule("unit", vec![ParseNode::seq(vec![decl("x"), decl("y")])])
}

#[test]
fn builds_structures_along_child_indices() {
    let (set, id) = grammar(declarations);
    let d = derive_set(&set, id);

    let (asm, diagnostics) = SyntaxAnalyser::new(&set, &d)
        .analyse(id, "unit", &unit_tree())
        .unwrap();

    assert!(diagnostics.is_empty());
    assert_eq!(
        asm.dump(),
        indoc! {"
            Unit {
              decl: [
                Decl {
                  ID: 'x'
                }
                Decl {
                  ID: 'y'
                }
              ]
            }
        "}
    );
    let y = asm.element_at(&AsmPath::from("/0/decl/1")).unwrap();
    assert_eq!(asm.structure(y).type_name, "test.Test.Decl");
    assert_eq!(
        asm.value_at(&"/0/decl/1/ID".into()),
        Some(&AsmValue::Primitive("y".into()))
    );
}

#[test]
fn analysis_is_idempotent() {
    let (set, id) = grammar(declarations);
    let d = derive_set(&set, id);
    let analyser = SyntaxAnalyser::new(&set, &d);

    let (first, _) = analyser.analyse(id, "unit", &unit_tree()).unwrap();
    let (second, _) = analyser.analyse(id, "unit", &unit_tree()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn choice_rule_yields_chosen_alternative() {
    // s = a | b ; a = 'a' x ; b = 'b' x ; leaf x ;
    let (set, id) = grammar(|g| {
        let a = g.nonterminal("a");
        let b = g.nonterminal("b");
        let rhs = g.choice([a, b]);
        g.add_rule("s", rhs);
        for (name, text) in [("a", "a"), ("b", "b")] {
            let lit = g.literal(text);
            let x = g.nonterminal("x");
            let body = g.concatenation([lit, x]);
            g.add_rule(name, body);
        }
        let pattern = g.pattern("[a-z]+");
        g.add_leaf("x", pattern);
    });
    let d = derive_set(&set, id);

    let tree = ParseNode::rule_option(
        "s",
        1,
        ParseNode::rule("b", vec![ParseNode::token("b"), ParseNode::leaf("x", "q")]),
    );
    let (asm, diagnostics) = SyntaxAnalyser::new(&set, &d).analyse(id, "s", &tree).unwrap();

    assert!(diagnostics.is_empty());
    let root = asm.element_at(&"/0".into()).unwrap();
    assert_eq!(asm.structure(root).type_name, "test.Test.B");
    assert_eq!(asm.dump(), "B {\n  x: 'q'\n}\n");
}

#[test]
fn groups_become_tuples() {
    // s = (a ',' b)* ;
    let (set, id) = grammar(|g| {
        let a = g.nonterminal("a");
        let comma = g.literal(",");
        let b = g.nonterminal("b");
        let seq = g.concatenation([a, comma, b]);
        let group = g.group(seq);
        let list = g.zero_or_more(group);
        g.add_rule("s", list);
        for name in ["a", "b"] {
            let pattern = g.pattern("[a-z]+");
            g.add_leaf(name, pattern);
        }
    });
    let d = derive_set(&set, id);

    let pair = |a: &str, b: &str| {
        ParseNode::seq(vec![ParseNode::seq(vec![
            ParseNode::leaf("a", a),
            ParseNode::token(","),
            ParseNode::leaf("b", b),
        ])])
    };
    let tree = ParseNode::rule("s", vec![ParseNode::seq(vec![pair("p", "q"), pair("r", "s")])]);
    let (asm, diagnostics) = SyntaxAnalyser::new(&set, &d).analyse(id, "s", &tree).unwrap();

    assert!(diagnostics.is_empty());
    assert_eq!(
        asm.dump(),
        indoc! {"
            S {
              $list: [
                $Tuple {
                  a: 'p'
                  b: 'q'
                }
                $Tuple {
                  a: 'r'
                  b: 's'
                }
              ]
            }
        "}
    );
    assert!(asm.element_at(&"/0/$list/1".into()).is_some());
}

#[test]
fn absent_optional_is_nothing() {
    // S = 'a' S? ;
    let (set, id) = grammar(|g| {
        let a = g.literal("a");
        let s = g.nonterminal("S");
        let opt = g.optional(s);
        let rhs = g.concatenation([a, opt]);
        g.add_rule("S", rhs);
    });
    let d = derive_set(&set, id);

    let inner = ParseNode::rule("S", vec![ParseNode::token("a"), ParseNode::empty()]);
    let tree = ParseNode::rule(
        "S",
        vec![ParseNode::token("a"), ParseNode::seq(vec![inner])],
    );
    let (asm, _) = SyntaxAnalyser::new(&set, &d).analyse(id, "S", &tree).unwrap();

    assert_eq!(
        asm.dump(),
        indoc! {"
            S {
              S: S {
                S: nothing
              }
            }
        "}
    );
}

#[test]
fn separated_list_keeps_separators() {
    // s = [a / ',']+ ;
    let (set, id) = grammar(|g| {
        let a = g.nonterminal("a");
        let comma = g.literal(",");
        let list = g.separated_list(a, comma, 1, None);
        g.add_rule("s", list);
        let pattern = g.pattern("[a-z]+");
        g.add_leaf("a", pattern);
    });
    let d = derive_set(&set, id);

    let tree = ParseNode::rule(
        "s",
        vec![ParseNode::seq(vec![
            ParseNode::leaf("a", "x"),
            ParseNode::token(","),
            ParseNode::leaf("a", "y"),
        ])],
    );
    let (asm, _) = SyntaxAnalyser::new(&set, &d).analyse(id, "s", &tree).unwrap();

    let items = asm.value_at(&"/0/a".into()).and_then(AsmValue::as_list).unwrap();
    let texts: Vec<_> = items.iter().filter_map(AsmValue::as_primitive).collect();
    assert_eq!(texts, vec!["x", ",", "y"]);
}

#[test]
fn mismatched_tree_is_reported() {
    let (set, id) = grammar(declarations);
    let d = derive_set(&set, id);

    let broken = ParseNode::rule("decl", vec![ParseNode::leaf("ID", "x")]);
    let tree = ParseNode::rule("unit", vec![ParseNode::seq(vec![broken])]);
    let (asm, diagnostics) = SyntaxAnalyser::new(&set, &d).analyse(id, "unit", &tree).unwrap();

    assert_eq!(diagnostics.count_of(DiagnosticKind::ParseTreeMismatch), 1);
    insta::assert_snapshot!(diagnostics.render(), @"error[syntax]: parse tree does not match the grammar: children of `decl` do not match its body (at /0/decl/0)");
    assert_eq!(asm.value_at(&"/0/decl/0".into()), Some(&AsmValue::Nothing));
}

#[test]
fn wrong_rule_node_is_reported() {
    let (set, id) = grammar(declarations);
    let d = derive_set(&set, id);

    let tree = ParseNode::rule("unit", vec![ParseNode::seq(vec![ParseNode::leaf("ID", "x")])]);
    let (_, diagnostics) = SyntaxAnalyser::new(&set, &d).analyse(id, "unit", &tree).unwrap();

    assert_eq!(diagnostics.count_of(DiagnosticKind::ParseTreeMismatch), 1);
    assert!(diagnostics.has_errors());
}

#[test]
fn unknown_goal_rule_is_an_error() {
    let (set, id) = grammar(declarations);
    let d = derive_set(&set, id);

    let err = SyntaxAnalyser::new(&set, &d)
        .analyse(id, "nope", &unit_tree())
        .unwrap_err();
    assert!(matches!(err, Error::MissingTransformRule(ref name) if name == "test.Test.nope"));
}

#[test]
fn modify_rule_layers_assignments() {
    let (set, id) = grammar(declarations);
    let mut d = derive_set(&set, id);
    let ns = d.goal_namespace();
    let modified = d.transforms.modify(
        ns,
        "decl",
        vec![
            PropertyAssignment {
                property: "name".into(),
                navigation: Navigation::parse("ID").unwrap(),
                type_instance: stdlib::string(),
            },
            PropertyAssignment {
                property: "keyword".into(),
                navigation: Navigation::child(0),
                type_instance: stdlib::string(),
            },
        ],
    );
    assert!(modified);

    let (asm, diagnostics) = SyntaxAnalyser::new(&set, &d)
        .analyse(id, "unit", &unit_tree())
        .unwrap();
    assert!(diagnostics.is_empty());
    assert_eq!(
        asm.value_at(&"/0/decl/0/name".into()),
        Some(&AsmValue::Primitive("x".into()))
    );
    assert_eq!(
        asm.value_at(&"/0/decl/1/keyword".into()),
        Some(&AsmValue::Primitive("var".into()))
    );
}

#[test]
fn embedded_rules_use_their_own_grammar() {
    let mut inner = Grammar::new("test", "Inner");
    let id = inner.nonterminal("id");
    inner.add_rule("expr", id);
    let pattern = inner.pattern("[a-z]+");
    inner.add_leaf("id", pattern);

    let mut outer = Grammar::new("test", "Outer");
    let x = outer.literal("x");
    let expr = outer.embedded("test.Inner", "expr");
    let body = outer.concatenation([x, expr]);
    outer.add_rule("s", body);

    let mut set = langwork_core::GrammarSet::new();
    let outer_id = set.add(outer);
    set.add(inner);
    let d = derive_set(&set, outer_id);

    let tree = ParseNode::rule(
        "s",
        vec![
            ParseNode::token("x"),
            ParseNode::rule("expr", vec![ParseNode::leaf("id", "v")]),
        ],
    );
    let (asm, diagnostics) = SyntaxAnalyser::new(&set, &d)
        .analyse(outer_id, "s", &tree)
        .unwrap();

    assert!(diagnostics.is_empty());
    let expr = asm.element_at(&"/0/expr".into()).unwrap();
    assert_eq!(asm.structure(expr).type_name, "test.Inner.Expr");
}

/// Whether the built `value` is described by `expected`.
fn value_conforms(model: &TypeModel, asm: &Asm, value: &AsmValue, expected: &TypeInstance) -> bool {
    if let TypeDeclaration::UnnamedSupertype(union) = model.declaration(expected.decl) {
        return (value.is_nothing() && expected.nullable)
            || union
                .subtypes
                .iter()
                .any(|member| value_conforms(model, asm, value, member));
    }
    match value {
        AsmValue::Nothing => expected.nullable || stdlib::is_nothing(expected),
        AsmValue::Primitive(_) => model.conforms_to(&stdlib::string(), expected),
        AsmValue::Reference(_) => true,
        AsmValue::List(items) => match expected.decl {
            stdlib::LIST => items
                .iter()
                .all(|item| value_conforms(model, asm, item, &expected.args[0])),
            stdlib::LIST_SEPARATED => items
                .iter()
                .enumerate()
                .all(|(j, item)| value_conforms(model, asm, item, &expected.args[j % 2])),
            _ => false,
        },
        AsmValue::Structure(id) => {
            let structure = asm.structure(*id);
            let decl = if structure.type_name == TUPLE_TYPE_NAME {
                if !matches!(model.declaration(expected.decl), TypeDeclaration::Tuple(_)) {
                    return false;
                }
                expected.decl
            } else {
                let Some(found) = model.find_first_by_possibly_qualified_or_null(&structure.type_name)
                else {
                    return false;
                };
                if !model.conforms_to(&TypeInstance::of(found), &expected.clone().non_null()) {
                    return false;
                }
                found
            };
            structure.properties.iter().all(|(name, value)| {
                model
                    .declaration(decl)
                    .property(name)
                    .is_some_and(|p| value_conforms(model, asm, value, &p.type_instance))
            })
        }
    }
}

#[test]
fn recursive_choice_values_conform_to_rule_type() {
    // expr = num | expr '+' num ;
    let (set, id) = grammar(|g| {
        let num = g.nonterminal("num");
        let expr = g.nonterminal("expr");
        let plus = g.literal("+");
        let num2 = g.nonterminal("num");
        let seq = g.concatenation([expr, plus, num2]);
        let rhs = g.choice([num, seq]);
        g.add_rule("expr", rhs);
        let pattern = g.pattern("[0-9]+");
        g.add_leaf("num", pattern);
    });
    let d = derive_set(&set, id);
    let num = |text: &str| ParseNode::rule_option("expr", 0, ParseNode::leaf("num", text));
    let sum = |left: ParseNode, right: &str| {
        ParseNode::rule_option(
            "expr",
            1,
            ParseNode::seq(vec![left, ParseNode::token("+"), ParseNode::leaf("num", right)]),
        )
    };

    // 1+2+3
    let tree = sum(sum(num("1"), "2"), "3");
    let (asm, diagnostics) = SyntaxAnalyser::new(&set, &d).analyse(id, "expr", &tree).unwrap();

    assert!(diagnostics.is_empty(), "{}", diagnostics.render());
    assert_eq!(
        asm.dump(),
        indoc! {"
            $Tuple {
              expr: $Tuple {
                expr: '1'
                num: '2'
              }
              num: '3'
            }
        "}
    );
    let expr = d.rule_type(id, "expr").unwrap();
    assert!(value_conforms(&d.type_model, &asm, &asm.roots()[0], expr));

    let (single, _) = SyntaxAnalyser::new(&set, &d).analyse(id, "expr", &num("7")).unwrap();
    assert!(value_conforms(&d.type_model, &single, &single.roots()[0], expr));
}

#[test]
fn built_values_conform_to_declared_types() {
    let (set, id) = grammar(declarations);
    let d = derive_set(&set, id);

    let (asm, _) = SyntaxAnalyser::new(&set, &d)
        .analyse(id, "unit", &unit_tree())
        .unwrap();

    let unit = d.rule_type(id, "unit").unwrap();
    assert!(value_conforms(&d.type_model, &asm, &asm.roots()[0], unit));
    let decl = d.rule_type(id, "decl").unwrap();
    assert!(!value_conforms(&d.type_model, &asm, &asm.roots()[0], decl));
}
