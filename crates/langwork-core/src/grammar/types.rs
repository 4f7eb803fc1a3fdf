//! Grammar type definitions.
//!
//! Rule items live in a per-grammar arena and are addressed by `ItemId`.
//! The arena index is the identity used by every memo table downstream, so
//! an item keeps its id for the lifetime of the grammar.

use indexmap::IndexMap;

/// Handle to a rule item inside one grammar's arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct ItemId(u32);

impl ItemId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Create an ItemId from a raw index. Use only for tests and debugging.
    #[inline]
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }
}

/// Handle to a grammar registered in a [`GrammarSet`](super::GrammarSet).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct GrammarId(pub(crate) u32);

impl GrammarId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Globally unique address of a rule item: owning grammar plus arena slot.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct ItemRef {
    pub grammar: GrammarId,
    pub item: ItemId,
}

impl ItemRef {
    pub fn new(grammar: GrammarId, item: ItemId) -> Self {
        Self { grammar, item }
    }
}

/// Right-hand-side expression node.
///
/// The set of variants is closed: every consumer matches exhaustively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleItem {
    /// Epsilon.
    Empty,
    /// Literal or pattern token.
    Terminal { value: String, pattern: bool },
    /// Reference to a rule of this grammar (or an inherited one).
    NonTerminal { name: String },
    /// Goal rule of another grammar, parsed in place.
    Embedded { grammar: String, goal: String },
    /// Items matched in order. Never directly nested inside another concatenation.
    Concatenation(Vec<ItemId>),
    /// Alternatives.
    Choice(Vec<ItemId>),
    Optional(ItemId),
    SimpleList {
        min: u32,
        max: Option<u32>,
        item: ItemId,
    },
    SeparatedList {
        min: u32,
        max: Option<u32>,
        item: ItemId,
        separator: ItemId,
    },
    /// Parenthesised sub-expression.
    Group(ItemId),
}

impl RuleItem {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal { .. })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

/// A named production.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarRule {
    pub name: String,
    /// Skip rules (whitespace, comments) never produce types.
    pub skip: bool,
    /// Leaf rules are matched as a single token and always produce `String`.
    pub leaf: bool,
    pub rhs: ItemId,
}

/// A grammar: ordered rules over an item arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    /// Dotted namespace, e.g. `net.example`. May be empty.
    pub namespace: String,
    pub name: String,
    /// Qualified names of supergrammars, in precedence order.
    pub extends: Vec<String>,
    rules: IndexMap<String, GrammarRule>,
    items: Vec<RuleItem>,
}

impl Grammar {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            extends: Vec::new(),
            rules: IndexMap::new(),
            items: Vec::new(),
        }
    }

    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Get a rule item by id.
    ///
    /// # Panics
    /// Panics if the id was not created by this grammar.
    #[inline]
    pub fn item(&self, id: ItemId) -> &RuleItem {
        &self.items[id.index()]
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn rule(&self, name: &str) -> Option<&GrammarRule> {
        self.rules.get(name)
    }

    /// Rules in definition order. The first rule is the default goal.
    pub fn rules(&self) -> impl Iterator<Item = &GrammarRule> {
        self.rules.values()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn extend(&mut self, qualified_name: impl Into<String>) -> &mut Self {
        self.extends.push(qualified_name.into());
        self
    }

    /// Add a rule. A rule with the same name is replaced in place.
    pub fn add_rule(&mut self, name: impl Into<String>, rhs: ItemId) -> &mut GrammarRule {
        self.insert_rule(name.into(), rhs, false, false)
    }

    pub fn add_leaf(&mut self, name: impl Into<String>, rhs: ItemId) -> &mut GrammarRule {
        self.insert_rule(name.into(), rhs, false, true)
    }

    pub fn add_skip(&mut self, name: impl Into<String>, rhs: ItemId) -> &mut GrammarRule {
        self.insert_rule(name.into(), rhs, true, false)
    }

    fn insert_rule(&mut self, name: String, rhs: ItemId, skip: bool, leaf: bool) -> &mut GrammarRule {
        let rule = GrammarRule {
            name: name.clone(),
            skip,
            leaf,
            rhs,
        };
        let (index, _) = self.rules.insert_full(name, rule);
        &mut self.rules[index]
    }

    fn push(&mut self, item: RuleItem) -> ItemId {
        let id = ItemId(self.items.len() as u32);
        self.items.push(item);
        id
    }

    pub fn empty(&mut self) -> ItemId {
        self.push(RuleItem::Empty)
    }

    pub fn literal(&mut self, value: impl Into<String>) -> ItemId {
        self.push(RuleItem::Terminal {
            value: value.into(),
            pattern: false,
        })
    }

    pub fn pattern(&mut self, value: impl Into<String>) -> ItemId {
        self.push(RuleItem::Terminal {
            value: value.into(),
            pattern: true,
        })
    }

    pub fn nonterminal(&mut self, name: impl Into<String>) -> ItemId {
        self.push(RuleItem::NonTerminal { name: name.into() })
    }

    pub fn embedded(&mut self, grammar: impl Into<String>, goal: impl Into<String>) -> ItemId {
        self.push(RuleItem::Embedded {
            grammar: grammar.into(),
            goal: goal.into(),
        })
    }

    /// Concatenate items.
    ///
    /// Nested concatenations are spliced into the new one and a single item
    /// is returned unwrapped, so a concatenation never directly contains
    /// another concatenation.
    pub fn concatenation(&mut self, items: impl IntoIterator<Item = ItemId>) -> ItemId {
        let mut flat = Vec::new();
        for id in items {
            match self.item(id) {
                RuleItem::Concatenation(inner) => flat.extend(inner.iter().copied()),
                _ => flat.push(id),
            }
        }
        match flat.len() {
            0 => self.empty(),
            1 => flat[0],
            _ => self.push(RuleItem::Concatenation(flat)),
        }
    }

    /// Alternatives. A single alternative is returned unwrapped.
    pub fn choice(&mut self, alternatives: impl IntoIterator<Item = ItemId>) -> ItemId {
        let alternatives: Vec<_> = alternatives.into_iter().collect();
        if alternatives.len() == 1 {
            return alternatives[0];
        }
        self.push(RuleItem::Choice(alternatives))
    }

    pub fn optional(&mut self, item: ItemId) -> ItemId {
        self.push(RuleItem::Optional(item))
    }

    pub fn list(&mut self, item: ItemId, min: u32, max: Option<u32>) -> ItemId {
        self.push(RuleItem::SimpleList { min, max, item })
    }

    /// `item*`
    pub fn zero_or_more(&mut self, item: ItemId) -> ItemId {
        self.list(item, 0, None)
    }

    /// `item+`
    pub fn one_or_more(&mut self, item: ItemId) -> ItemId {
        self.list(item, 1, None)
    }

    pub fn separated_list(
        &mut self,
        item: ItemId,
        separator: ItemId,
        min: u32,
        max: Option<u32>,
    ) -> ItemId {
        self.push(RuleItem::SeparatedList {
            min,
            max,
            item,
            separator,
        })
    }

    pub fn group(&mut self, content: ItemId) -> ItemId {
        self.push(RuleItem::Group(content))
    }

    /// Rule names referenced by nonterminals anywhere in the arena.
    pub fn referenced_rules(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            RuleItem::NonTerminal { name } => Some(name.as_str()),
            _ => None,
        })
    }

    /// Embedded grammar names referenced anywhere in the arena.
    pub fn embedded_grammars(&self) -> impl Iterator<Item = &str> {
        self.items.iter().filter_map(|item| match item {
            RuleItem::Embedded { grammar, .. } => Some(grammar.as_str()),
            _ => None,
        })
    }
}
