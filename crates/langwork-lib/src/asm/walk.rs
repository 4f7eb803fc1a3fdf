//! Depth-first ASM traversal.
//!
//! # Usage
//!
//! Implement `AsmWalker` and override the callbacks you need, then drive
//! it with [`walk`]. Structures are bracketed by `before_structure` and
//! `after_structure`; their property values are visited in between.
//!
//! ```ignore
//! impl AsmWalker for MyPass {
//!     fn before_structure(&mut self, asm: &Asm, id: ElementId) {
//!         // Pre-order logic
//!     }
//! }
//! walk(&asm, &mut MyPass::default());
//! ```

use super::model::{Asm, AsmReference, AsmValue, ElementId};

pub trait AsmWalker {
    fn before_root(&mut self, _asm: &Asm, _root: &AsmValue) {}

    fn after_root(&mut self, _asm: &Asm, _root: &AsmValue) {}

    fn before_structure(&mut self, _asm: &Asm, _id: ElementId) {}

    fn after_structure(&mut self, _asm: &Asm, _id: ElementId) {}

    fn on_primitive(&mut self, _asm: &Asm, _value: &str) {}

    fn before_list(&mut self, _asm: &Asm, _items: &[AsmValue]) {}

    fn after_list(&mut self, _asm: &Asm, _items: &[AsmValue]) {}

    fn on_reference(&mut self, _asm: &Asm, _reference: &AsmReference) {}

    fn on_nothing(&mut self, _asm: &Asm) {}
}

/// Walk every root of `asm` in order.
pub fn walk<W: AsmWalker>(asm: &Asm, walker: &mut W) {
    for root in asm.roots() {
        walker.before_root(asm, root);
        walk_value(asm, walker, root);
        walker.after_root(asm, root);
    }
}

pub fn walk_value<W: AsmWalker>(asm: &Asm, walker: &mut W, value: &AsmValue) {
    match value {
        AsmValue::Nothing => walker.on_nothing(asm),
        AsmValue::Primitive(text) => walker.on_primitive(asm, text),
        AsmValue::Reference(reference) => walker.on_reference(asm, reference),
        AsmValue::List(items) => {
            walker.before_list(asm, items);
            for item in items {
                walk_value(asm, walker, item);
            }
            walker.after_list(asm, items);
        }
        AsmValue::Structure(id) => walk_structure(asm, walker, *id),
    }
}

pub fn walk_structure<W: AsmWalker>(asm: &Asm, walker: &mut W, id: ElementId) {
    walker.before_structure(asm, id);
    for value in asm.structure(id).properties.values() {
        walk_value(asm, walker, value);
    }
    walker.after_structure(asm, id);
}
