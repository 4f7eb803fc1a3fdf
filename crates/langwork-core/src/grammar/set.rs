//! Registry of grammars addressable by `GrammarId`.

use indexmap::IndexMap;

use super::json::GrammarError;
use super::types::{Grammar, GrammarId, GrammarRule, ItemRef, RuleItem};

/// All grammars of one language definition: the goal grammar, its
/// supergrammars, and every grammar it embeds.
#[derive(Debug, Clone, Default)]
pub struct GrammarSet {
    grammars: Vec<Grammar>,
    by_name: IndexMap<String, GrammarId>,
}

impl GrammarSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a grammar under its qualified name.
    ///
    /// Re-registering a qualified name replaces the grammar but keeps its id.
    pub fn add(&mut self, grammar: Grammar) -> GrammarId {
        let qualified = grammar.qualified_name();
        if let Some(&id) = self.by_name.get(&qualified) {
            self.grammars[id.index()] = grammar;
            return id;
        }
        let id = GrammarId(self.grammars.len() as u32);
        self.grammars.push(grammar);
        self.by_name.insert(qualified, id);
        id
    }

    /// # Panics
    /// Panics if the id was not created by this set.
    #[inline]
    pub fn get(&self, id: GrammarId) -> &Grammar {
        &self.grammars[id.index()]
    }

    /// Resolve the item behind an `ItemRef`.
    #[inline]
    pub fn item(&self, item: ItemRef) -> &RuleItem {
        self.get(item.grammar).item(item.item)
    }

    /// Look up a grammar by qualified name, falling back to a unique simple name.
    pub fn lookup(&self, name: &str) -> Option<GrammarId> {
        if let Some(&id) = self.by_name.get(name) {
            return Some(id);
        }
        let mut candidates = self
            .grammars
            .iter()
            .enumerate()
            .filter(|(_, g)| g.name == name);
        let (index, _) = candidates.next()?;
        if candidates.next().is_some() {
            return None;
        }
        Some(GrammarId(index as u32))
    }

    pub fn len(&self) -> usize {
        self.grammars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.grammars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GrammarId, &Grammar)> {
        self.grammars
            .iter()
            .enumerate()
            .map(|(i, g)| (GrammarId(i as u32), g))
    }

    /// Find a rule visible from `grammar`: its own rules first, then the
    /// supergrammars depth-first in declaration order.
    pub fn find_rule(&self, grammar: GrammarId, name: &str) -> Option<(GrammarId, &GrammarRule)> {
        let mut visited = Vec::new();
        self.find_rule_inner(grammar, name, &mut visited)
    }

    fn find_rule_inner(
        &self,
        grammar: GrammarId,
        name: &str,
        visited: &mut Vec<GrammarId>,
    ) -> Option<(GrammarId, &GrammarRule)> {
        if visited.contains(&grammar) {
            return None;
        }
        visited.push(grammar);

        let g = self.get(grammar);
        if let Some(rule) = g.rule(name) {
            return Some((grammar, rule));
        }
        g.extends
            .iter()
            .filter_map(|sup| self.lookup(sup))
            .find_map(|sup| self.find_rule_inner(sup, name, visited))
    }

    /// Every rule visible from `grammar`, inherited rules first.
    ///
    /// A rule defined again lower in the hierarchy overrides the inherited
    /// one but keeps the inherited position.
    pub fn all_rules(&self, grammar: GrammarId) -> Vec<(GrammarId, &GrammarRule)> {
        let mut collected: IndexMap<&str, (GrammarId, &GrammarRule)> = IndexMap::new();
        let mut visited = Vec::new();
        self.collect_rules(grammar, &mut collected, &mut visited);
        collected.into_values().collect()
    }

    fn collect_rules<'a>(
        &'a self,
        grammar: GrammarId,
        collected: &mut IndexMap<&'a str, (GrammarId, &'a GrammarRule)>,
        visited: &mut Vec<GrammarId>,
    ) {
        if visited.contains(&grammar) {
            return;
        }
        visited.push(grammar);

        let g = self.get(grammar);
        for sup in &g.extends {
            if let Some(sup_id) = self.lookup(sup) {
                self.collect_rules(sup_id, collected, visited);
            }
        }
        for rule in g.rules() {
            collected.insert(rule.name.as_str(), (grammar, rule));
        }
    }

    /// Check that every supergrammar, embedded grammar and nonterminal resolves.
    pub fn validate(&self) -> Result<(), GrammarError> {
        for (id, grammar) in self.iter() {
            for sup in &grammar.extends {
                if self.lookup(sup).is_none() {
                    return Err(GrammarError::UnknownGrammar(sup.clone()));
                }
            }
            for embedded in grammar.embedded_grammars() {
                if self.lookup(embedded).is_none() {
                    return Err(GrammarError::UnknownGrammar(embedded.to_owned()));
                }
            }
            for rule in grammar.referenced_rules() {
                if self.find_rule(id, rule).is_none() {
                    return Err(GrammarError::UnknownRule {
                        grammar: grammar.qualified_name(),
                        rule: rule.to_owned(),
                    });
                }
            }
        }
        Ok(())
    }
}
