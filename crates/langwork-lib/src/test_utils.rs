//! Grammar fixtures shared by tests.

use langwork_core::{Grammar, GrammarId, GrammarSet};

use crate::asm::{Asm, AsmPath, AsmValue};
use crate::derive::{Derivation, Deriver, DeriverConfig};

/// Build a single grammar `test.Test` with `build`.
pub fn grammar(build: impl FnOnce(&mut Grammar)) -> (GrammarSet, GrammarId) {
    let mut g = Grammar::new("test", "Test");
    build(&mut g);
    let mut set = GrammarSet::new();
    let id = set.add(g);
    (set, id)
}

pub fn derive_set(set: &GrammarSet, goal: GrammarId) -> Derivation {
    let (derivation, diagnostics) = Deriver::new(set, DeriverConfig::default())
        .derive(goal)
        .expect("derivation should succeed");
    assert!(diagnostics.is_empty(), "{}", diagnostics.render());
    derivation
}

pub fn derive(build: impl FnOnce(&mut Grammar)) -> Derivation {
    let (set, id) = grammar(build);
    derive_set(&set, id)
}

/// `unit = decl* ; decl = 'var' ID ; leaf ID = "[a-z]+"`
pub fn declarations(g: &mut Grammar) {
    let decl = g.nonterminal("decl");
    let decls = g.zero_or_more(decl);
    g.add_rule("unit", decls);
    let var = g.literal("var");
    let id = g.nonterminal("ID");
    let body = g.concatenation([var, id]);
    g.add_rule("decl", body);
    let pattern = g.pattern("[a-z]+");
    g.add_leaf("ID", pattern);
}

/// `unit = stmt* ; stmt = decl | use | block ; decl = 'var' ID ;
/// use = 'use' ID ; block = 'block' ID '{' stmt* '}' ; leaf ID = "[a-z]+"`
pub fn program(g: &mut Grammar) {
    let stmt = g.nonterminal("stmt");
    let stmts = g.zero_or_more(stmt);
    g.add_rule("unit", stmts);

    let alternatives = ["decl", "use", "block"].map(|name| g.nonterminal(name));
    let choice = g.choice(alternatives);
    g.add_rule("stmt", choice);

    for (name, keyword) in [("decl", "var"), ("use", "use")] {
        let keyword = g.literal(keyword);
        let id = g.nonterminal("ID");
        let body = g.concatenation([keyword, id]);
        g.add_rule(name, body);
    }

    let keyword = g.literal("block");
    let id = g.nonterminal("ID");
    let open = g.literal("{");
    let stmt = g.nonterminal("stmt");
    let stmts = g.zero_or_more(stmt);
    let close = g.literal("}");
    let body = g.concatenation([keyword, id, open, stmts, close]);
    g.add_rule("block", body);

    let pattern = g.pattern("[a-z]+");
    g.add_leaf("ID", pattern);
}

/// Statement shapes of [`program`], for building ASMs by hand.
pub enum Stmt {
    Decl(&'static str),
    Use(&'static str),
    /// A `use` naming a qualified path, stored as a list of names.
    UseQualified(&'static [&'static str]),
    Block(&'static str, Vec<Stmt>),
}

/// ASM of one `unit` holding `stmts`, typed the way [`program`] derives.
pub fn program_asm(stmts: Vec<Stmt>) -> Asm {
    let mut asm = Asm::new();
    let path = asm.next_root_path();
    let unit = asm.create_structure(path.clone(), "test.Test.Unit");
    let list = place_all(&mut asm, &path.property("stmt"), stmts);
    asm.set_property(unit, "stmt", list);
    asm.add_root(AsmValue::Structure(unit));
    asm
}

fn place_all(asm: &mut Asm, path: &AsmPath, stmts: Vec<Stmt>) -> AsmValue {
    let items = stmts
        .into_iter()
        .enumerate()
        .map(|(i, stmt)| place(asm, path.item(i), stmt))
        .collect();
    AsmValue::List(items)
}

fn place(asm: &mut Asm, path: AsmPath, stmt: Stmt) -> AsmValue {
    let (type_name, id) = match &stmt {
        Stmt::Decl(name) => ("test.Test.Decl", AsmValue::Primitive((*name).into())),
        Stmt::Use(name) => ("test.Test.Use", AsmValue::Primitive((*name).into())),
        Stmt::UseQualified(names) => (
            "test.Test.Use",
            AsmValue::List(names.iter().map(|n| AsmValue::Primitive((*n).into())).collect()),
        ),
        Stmt::Block(name, _) => ("test.Test.Block", AsmValue::Primitive((*name).into())),
    };
    let element = asm.create_structure(path.clone(), type_name);
    asm.set_property(element, "ID", id);
    if let Stmt::Block(_, body) = stmt {
        let list = place_all(asm, &path.property("stmt"), body);
        asm.set_property(element, "stmt", list);
    }
    AsmValue::Structure(element)
}
