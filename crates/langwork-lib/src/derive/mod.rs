//! Grammar-to-type-model derivation.
//!
//! Produces a [`TypeModel`](crate::typemodel::TypeModel) and the matching
//! [`TransformRuleSet`](crate::transform::TransformRuleSet) in one pass.

mod choice;
mod config;
mod deriver;
mod invariants;


pub use choice::unify_choice;
pub use config::{
    CHOICE_PROPERTY, DefaultNaming, DeriverConfig, GROUP_PROPERTY, LIST_PROPERTY, NamingStrategy,
    VALUE_PROPERTY,
};
pub use deriver::{DeriveError, Derivation, Deriver};
