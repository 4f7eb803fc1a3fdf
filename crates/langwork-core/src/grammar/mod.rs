//! Grammar data model.
//!
//! This module provides the closed rule-item algebra consumed by type
//! derivation, a registry for grammar sets (supergrammars and embedded
//! grammars), and JSON deserialization.

mod json;
mod set;
mod types;


pub use json::GrammarError;
pub use set::GrammarSet;
pub use types::{Grammar, GrammarId, GrammarRule, ItemId, ItemRef, RuleItem};
