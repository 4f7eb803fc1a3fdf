use indoc::indoc;

use crate::asm::AsmPath;
use crate::test_utils::{derive, program};

use super::*;

fn names(items: &[&ScopeItem]) -> Vec<String> {
    items
        .iter()
        .map(|item| format!("{}: {}", item.identifier, item.type_name))
        .collect()
}

#[test]
fn fresh_tree_has_only_root() {
    let tree = ScopeTree::new();

    assert!(tree.is_empty());
    assert_eq!(tree.len(), 1);
    assert_eq!(tree.name(tree.root()), ROOT_SCOPE_NAME);
    assert_eq!(tree.parent(tree.root()), None);
    assert_eq!(tree.dump(), "§root {}\n");
}

#[test]
fn duplicate_identifier_and_type_is_rejected() {
    let mut tree = ScopeTree::new();
    let root = tree.root();

    assert!(tree.add_to_scope(root, "x", "test.Test.Decl", "/0/stmt/0".into()));
    assert!(!tree.add_to_scope(root, "x", "test.Test.Decl", "/0/stmt/1".into()));
    assert!(tree.add_to_scope(root, "x", "test.Test.Block", "/0/stmt/2".into()));

    let items = tree.items(root, "x");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].path, Some(AsmPath::from("/0/stmt/0")));
    assert!(!tree.is_empty());
}

#[test]
fn children_are_created_once_per_key() {
    let mut tree = ScopeTree::new();
    let root = tree.root();

    let a = tree.create_or_get_child(root, "a", "test.Test.Block");
    let again = tree.create_or_get_child(root, "a", "test.Test.Block");
    let b = tree.create_or_get_child(a, "b", "test.Test.Block");

    assert_eq!(a, again);
    assert_eq!(tree.len(), 3);
    assert_eq!(tree.parent(b), Some(a));
    assert_eq!(tree.child(root, "a"), Some(a));
    assert_eq!(tree.type_name(b), "test.Test.Block");
}

#[test]
fn lexical_lookup_ascends_until_found() {
    let d = derive(program);
    let mut tree = ScopeTree::new();
    let root = tree.root();
    tree.add_to_scope(root, "x", "test.Test.Decl", "/0/stmt/0".into());
    tree.add_to_scope(root, "y", "test.Test.Decl", "/0/stmt/1".into());
    let inner = tree.create_or_get_child(root, "b", "test.Test.Block");
    tree.add_to_scope(inner, "x", "test.Test.Decl", "/0/stmt/2/stmt/0".into());

    let decl = ["Decl".to_owned()];
    let x = tree.find_conforming_to(&d.type_model, inner, "x", &decl);
    assert_eq!(x.len(), 1);
    assert_eq!(x[0].path, Some(AsmPath::from("/0/stmt/2/stmt/0")));

    let y = tree.find_conforming_to(&d.type_model, inner, "y", &decl);
    assert_eq!(y[0].path, Some(AsmPath::from("/0/stmt/1")));

    assert!(tree.find_conforming_to(&d.type_model, root, "z", &decl).is_empty());
}

#[test]
fn lookup_filters_by_conformance() {
    let d = derive(program);
    let mut tree = ScopeTree::new();
    let root = tree.root();
    tree.add_to_scope(root, "x", "test.Test.Decl", "/0/stmt/0".into());
    tree.add_to_scope(root, "x", "test.Test.Block", "/0/stmt/1".into());

    let only_blocks = tree.find_conforming_to(&d.type_model, root, "x", &["Block".to_owned()]);
    assert_eq!(names(&only_blocks), vec!["x: test.Test.Block"]);

    let statements = tree.find_conforming_to(&d.type_model, root, "x", &["Stmt".to_owned()]);
    assert_eq!(statements.len(), 2);

    let anything = tree.find_conforming_to(&d.type_model, root, "x", &[]);
    assert_eq!(anything.len(), 2);
}

#[test]
fn qualified_lookup_starts_at_root() {
    let d = derive(program);
    let mut tree = ScopeTree::new();
    let root = tree.root();
    let outer = tree.create_or_get_child(root, "a", "test.Test.Block");
    let inner = tree.create_or_get_child(outer, "b", "test.Test.Block");
    tree.add_to_scope(inner, "x", "test.Test.Decl", "/0/stmt/0/stmt/0/stmt/0".into());

    let path = |names: &[&str]| names.iter().map(|n| (*n).to_owned()).collect::<Vec<_>>();
    let decl = ["Decl".to_owned()];

    let found = tree.find_qualified_conforming_to(&d.type_model, &path(&["a", "b", "x"]), &decl);
    assert_eq!(names(&found), vec!["x: test.Test.Decl"]);
    assert!(
        tree.find_qualified_conforming_to(&d.type_model, &path(&["b", "x"]), &decl)
            .is_empty()
    );
    assert!(tree.find_qualified_conforming_to(&d.type_model, &[], &decl).is_empty());
}

#[test]
fn paths_map_to_the_scopes_they_open() {
    let mut tree = ScopeTree::new();
    let root = tree.root();
    let block = tree.create_or_get_child(root, "b", "test.Test.Block");
    tree.record_path("/0/stmt/0".into(), block);

    assert_eq!(tree.scope_for_path(&"/0/stmt/0".into()), Some(block));
    assert_eq!(tree.scope_for_path(&"/0/stmt/1".into()), None);
}

#[test]
fn dump_nests_child_scopes() {
    let mut tree = ScopeTree::new();
    let root = tree.root();
    tree.add_external(root, "int", "std.Integer");
    tree.add_to_scope(root, "b", "test.Test.Block", "/0/stmt/0".into());
    let block = tree.create_or_get_child(root, "b", "test.Test.Block");
    tree.add_to_scope(block, "x", "test.Test.Decl", "/0/stmt/0/stmt/0".into());
    tree.create_or_get_child(block, "c", "test.Test.Block");

    assert_eq!(
        tree.dump(),
        indoc! {"
            §root {
              int: Integer (external)
              b: Block @ /0/stmt/0
              b {
                x: Decl @ /0/stmt/0/stmt/0
                c {}
              }
            }
        "}
    );
}
