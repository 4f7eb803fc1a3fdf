//! Configuration for type-model derivation.

use std::fmt;
use std::rc::Rc;

use langwork_core::utils::{lower_first, lower_first_unless_upper, upper_first};
use langwork_core::{Grammar, ItemId, RuleItem};

use crate::typemodel::TypeInstance;

/// Property name for a terminal that is the whole content of a rule.
pub const VALUE_PROPERTY: &str = "$value";
/// Property name for a group.
pub const GROUP_PROPERTY: &str = "$group";
/// Property name for a nested choice.
pub const CHOICE_PROPERTY: &str = "$choice";
/// Property name for a list of anonymous items.
pub const LIST_PROPERTY: &str = "$list";

/// Names for derived types and properties.
///
/// Collisions are resolved by the deriver afterwards, so implementations
/// return the base name only.
pub trait NamingStrategy: fmt::Debug {
    fn type_name(&self, rule: &str) -> String;

    /// Base name of the property contributed by `item`, whose type has
    /// already been resolved to `resolved`.
    fn property_name(&self, grammar: &Grammar, item: ItemId, resolved: &TypeInstance) -> String;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultNaming;

impl NamingStrategy for DefaultNaming {
    fn type_name(&self, rule: &str) -> String {
        upper_first(rule)
    }

    fn property_name(&self, grammar: &Grammar, item: ItemId, resolved: &TypeInstance) -> String {
        match grammar.item(item) {
            RuleItem::Terminal { .. } | RuleItem::Empty => VALUE_PROPERTY.to_owned(),
            RuleItem::NonTerminal { name } => lower_first_unless_upper(name),
            RuleItem::Embedded { goal, .. } => lower_first(goal),
            RuleItem::Choice(_) => CHOICE_PROPERTY.to_owned(),
            RuleItem::Concatenation(_) => GROUP_PROPERTY.to_owned(),
            RuleItem::Group(content) => match grammar.item(*content) {
                RuleItem::Choice(_) => CHOICE_PROPERTY.to_owned(),
                _ => GROUP_PROPERTY.to_owned(),
            },
            RuleItem::Optional(inner) => self.property_name(grammar, *inner, resolved),
            RuleItem::SimpleList { item: inner, .. }
            | RuleItem::SeparatedList { item: inner, .. } => match grammar.item(*inner) {
                RuleItem::NonTerminal { .. } | RuleItem::Embedded { .. } => {
                    self.property_name(grammar, *inner, resolved)
                }
                _ => LIST_PROPERTY.to_owned(),
            },
        }
    }
}

/// Configuration for [`Deriver`](super::Deriver).
#[derive(Clone, Debug)]
pub struct DeriverConfig {
    pub(crate) naming: Rc<dyn NamingStrategy>,
    /// Derive every non-skip rule of an embedded grammar, not only the
    /// rules reachable from the embedded goal.
    pub(crate) derive_all_embedded_rules: bool,
}

impl Default for DeriverConfig {
    fn default() -> Self {
        Self {
            naming: Rc::new(DefaultNaming),
            derive_all_embedded_rules: true,
        }
    }
}

impl DeriverConfig {
    /// Create a new DeriverConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the naming strategy.
    pub fn naming(mut self, naming: impl NamingStrategy + 'static) -> Self {
        self.naming = Rc::new(naming);
        self
    }

    /// Set whether embedded grammars are derived in full.
    pub fn derive_all_embedded_rules(mut self, value: bool) -> Self {
        self.derive_all_embedded_rules = value;
        self
    }
}
