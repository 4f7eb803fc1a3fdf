#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for langwork grammars.
//!
//! The rule-item algebra is a closed enum stored in a per-grammar arena.
//! Grammars are grouped into a [`GrammarSet`] so that supergrammars and
//! embedded grammars can be resolved by name.

pub mod grammar;
pub mod utils;


pub use grammar::{
    Grammar, GrammarError, GrammarId, GrammarRule, GrammarSet, ItemId, ItemRef, RuleItem,
};
