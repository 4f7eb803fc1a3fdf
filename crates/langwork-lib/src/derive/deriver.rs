//! Grammar-to-type-model derivation.
//!
//! One recursive descent over the rule-item algebra computes the type of
//! every rule and, in the same step, the transform rule that builds it. Memo
//! entries are stored before recursing so recursive grammars terminate.

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use langwork_core::{Grammar, GrammarId, GrammarSet, ItemId, ItemRef, RuleItem};
use tracing::{debug, trace};

use crate::diagnostics::Diagnostics;
use crate::transform::{Navigation, PropertyAssignment, TransformRule, TransformRuleSet};
use crate::typemodel::stdlib::{self, LIST, LIST_SEPARATED};
use crate::typemodel::{
    DeclId, NamespaceId, PropertyCharacteristics, TypeDeclaration, TypeInstance, TypeModel,
};
use crate::PassResult;

use super::choice::unify_choice;
use super::config::DeriverConfig;
use super::invariants::{assert_imports_resolved, assert_not_nested_concatenation, ensure_context};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeriveError {
    #[error("grammar `{0}` is not defined")]
    UnknownGrammar(String),
    #[error("rule `{rule}` is not defined in grammar `{grammar}`")]
    UnknownRule { grammar: String, rule: String },
}

/// Output of a derivation: the type model, the transform rules, and the
/// namespace each grammar was derived into.
#[derive(Clone, Debug)]
pub struct Derivation {
    pub type_model: TypeModel,
    pub transforms: TransformRuleSet,
    goal: GrammarId,
    namespaces: IndexMap<GrammarId, NamespaceId>,
    rule_types: IndexMap<(NamespaceId, String), TypeInstance>,
    tuples: IndexMap<(NamespaceId, ItemRef), DeclId>,
}

impl Derivation {
    pub fn goal(&self) -> GrammarId {
        self.goal
    }

    pub fn goal_namespace(&self) -> NamespaceId {
        self.namespaces[&self.goal]
    }

    pub fn namespace_of(&self, grammar: GrammarId) -> Option<NamespaceId> {
        self.namespaces.get(&grammar).copied()
    }

    /// Type derived for `rule` within the namespace of `grammar`.
    pub fn rule_type(&self, grammar: GrammarId, rule: &str) -> Option<&TypeInstance> {
        let ns = self.namespace_of(grammar)?;
        self.rule_types.get(&(ns, rule.to_owned()))
    }

    pub fn transform(&self, grammar: GrammarId, rule: &str) -> Option<&TransformRule> {
        self.transforms.get(self.namespace_of(grammar)?, rule)
    }

    /// Tuple type created for a concatenation or group item, as derived
    /// within the namespace of `grammar`.
    pub fn tuple_type(&self, grammar: GrammarId, item: ItemRef) -> Option<DeclId> {
        let ns = self.namespace_of(grammar)?;
        self.tuples.get(&(ns, item)).copied()
    }
}

/// Per-grammar derivation state.
#[derive(Debug)]
struct GrammarContext {
    namespace: NamespaceId,
    rule_types: IndexMap<String, TypeInstance>,
    /// Choice rules whose placeholder type is currently memoized.
    pending_choices: HashSet<String>,
    /// Pending choice rules whose placeholder was handed out.
    placeholder_used: HashSet<String>,
    item_types: HashMap<(ItemRef, bool), TypeInstance>,
    tuples: IndexMap<ItemRef, DeclId>,
}

impl GrammarContext {
    fn new(namespace: NamespaceId) -> Self {
        Self {
            namespace,
            rule_types: IndexMap::new(),
            pending_choices: HashSet::new(),
            placeholder_used: HashSet::new(),
            item_types: HashMap::new(),
            tuples: IndexMap::new(),
        }
    }
}

/// Derives a [`TypeModel`] and [`TransformRuleSet`] from a grammar set.
///
/// A deriver is consumed by one derivation; create a new one per run.
pub struct Deriver<'g> {
    grammars: &'g GrammarSet,
    config: DeriverConfig,
    model: TypeModel,
    transforms: TransformRuleSet,
    contexts: IndexMap<GrammarId, GrammarContext>,
}

impl<'g> Deriver<'g> {
    pub fn new(grammars: &'g GrammarSet, config: DeriverConfig) -> Self {
        Self {
            grammars,
            config,
            model: TypeModel::new(""),
            transforms: TransformRuleSet::new(),
            contexts: IndexMap::new(),
        }
    }

    /// Derive every non-skip rule visible from `goal`, including inherited
    /// rules and rules reached through embedded grammars.
    pub fn derive(mut self, goal: GrammarId) -> PassResult<Derivation> {
        let goal_grammar = self.grammars.get(goal);
        debug!(grammar = %goal_grammar.qualified_name(), "deriving type model");
        self.model = TypeModel::new(goal_grammar.name.clone());

        self.derive_grammar(goal)?;

        let unresolved = self.model.resolve_imports();
        assert_imports_resolved(&unresolved);
        let diagnostics = Diagnostics::new();

        let mut namespaces = IndexMap::new();
        let mut rule_types = IndexMap::new();
        let mut tuples = IndexMap::new();
        for (&grammar, context) in &self.contexts {
            namespaces.insert(grammar, context.namespace);
            for (rule, t) in &context.rule_types {
                rule_types.insert((context.namespace, rule.clone()), t.clone());
            }
            for (&item, &tuple) in &context.tuples {
                tuples.insert((context.namespace, item), tuple);
            }
        }
        debug!(
            namespaces = namespaces.len(),
            rules = rule_types.len(),
            transforms = self.transforms.len(),
            "type model derived"
        );

        let derivation = Derivation {
            type_model: self.model,
            transforms: self.transforms,
            goal,
            namespaces,
            rule_types,
            tuples,
        };
        Ok((derivation, diagnostics))
    }

    /// Register the namespace of `grammar` once.
    fn open_grammar(&mut self, grammar: GrammarId) -> (NamespaceId, bool) {
        if let Some(context) = self.contexts.get(&grammar) {
            return (context.namespace, false);
        }
        let name = self.grammars.get(grammar).qualified_name();
        let namespace = self.model.add_namespace(&name);
        self.contexts.insert(grammar, GrammarContext::new(namespace));
        (namespace, true)
    }

    fn derive_grammar(&mut self, grammar: GrammarId) -> Result<NamespaceId, DeriveError> {
        let (namespace, fresh) = self.open_grammar(grammar);
        if !fresh {
            return Ok(namespace);
        }
        let grammars = self.grammars;
        for (_, rule) in grammars.all_rules(grammar) {
            if rule.skip {
                continue;
            }
            self.rule_type(grammar, &rule.name)?;
        }
        Ok(namespace)
    }

    fn context(&mut self, grammar: GrammarId) -> &mut GrammarContext {
        ensure_context(self.contexts.get_mut(&grammar))
    }

    fn rule_type(&mut self, grammar: GrammarId, name: &str) -> Result<TypeInstance, DeriveError> {
        let context = self.context(grammar);
        if let Some(t) = context.rule_types.get(name) {
            let t = t.clone();
            if context.pending_choices.contains(name) {
                context.placeholder_used.insert(name.to_owned());
            }
            return Ok(t);
        }
        let namespace = context.namespace;

        let grammars = self.grammars;
        let Some((defining, rule)) = grammars.find_rule(grammar, name) else {
            return Err(DeriveError::UnknownRule {
                grammar: grammars.get(grammar).qualified_name(),
                rule: name.to_owned(),
            });
        };
        trace!(rule = name, "derive rule");

        if rule.leaf {
            let t = stdlib::string();
            self.context(grammar)
                .rule_types
                .insert(name.to_owned(), t.clone());
            let select = TransformRule::Select {
                type_instance: t.clone(),
                navigation: Navigation::self_ref(),
            };
            self.transforms.insert(namespace, name, select);
            return Ok(t);
        }

        let rhs = grammars.get(defining).item(rule.rhs);
        match rhs {
            RuleItem::Choice(alternatives) => {
                self.choice_rule(grammar, defining, name, alternatives)
            }
            RuleItem::Group(content) => match grammars.get(defining).item(*content) {
                RuleItem::Choice(alternatives) => {
                    self.choice_rule(grammar, defining, name, alternatives)
                }
                _ => self.data_rule(grammar, defining, name, &[rule.rhs], false),
            },
            RuleItem::Concatenation(items) => self.data_rule(grammar, defining, name, items, true),
            RuleItem::Empty
            | RuleItem::Terminal { .. }
            | RuleItem::NonTerminal { .. }
            | RuleItem::Embedded { .. }
            | RuleItem::Optional(_)
            | RuleItem::SimpleList { .. }
            | RuleItem::SeparatedList { .. } => {
                self.data_rule(grammar, defining, name, &[rule.rhs], false)
            }
        }
    }

    /// A rule producing its own data type, one property per item.
    ///
    /// Inside a sequence, terminals and other `Nothing` items contribute no
    /// property; indices are kept as given.
    fn data_rule(
        &mut self,
        grammar: GrammarId,
        defining: GrammarId,
        name: &str,
        items: &[ItemId],
        in_sequence: bool,
    ) -> Result<TypeInstance, DeriveError> {
        let namespace = self.context(grammar).namespace;
        let type_name = self.config.naming.type_name(name);
        let decl = self
            .model
            .namespace_mut(namespace)
            .find_or_create_data_type_named(&type_name);
        let t = TypeInstance::of(decl);
        self.context(grammar)
            .rule_types
            .insert(name.to_owned(), t.clone());

        let assignments = self.add_item_properties(grammar, defining, decl, items, in_sequence, name)?;
        let create = TransformRule::CreateObject {
            type_instance: t.clone(),
            assignments,
        };
        self.transforms.insert(namespace, name, create);
        Ok(t)
    }

    fn add_item_properties(
        &mut self,
        grammar: GrammarId,
        defining: GrammarId,
        owner: DeclId,
        items: &[ItemId],
        in_sequence: bool,
        rule: &str,
    ) -> Result<Vec<PropertyAssignment>, DeriveError> {
        let grammars = self.grammars;
        let defining_grammar: &Grammar = grammars.get(defining);
        let mut assignments = Vec::new();
        for (index, &item) in items.iter().enumerate() {
            if in_sequence {
                assert_not_nested_concatenation(defining_grammar.item(item), rule);
            }
            let t = self.item_type(grammar, ItemRef::new(defining, item), in_sequence)?;
            if stdlib::is_nothing(&t) {
                continue;
            }
            let base = self
                .config
                .naming
                .property_name(defining_grammar, item, &t);
            let property = self.model.add_property(
                owner,
                &base,
                t.clone(),
                PropertyCharacteristics::DERIVED_FROM_GRAMMAR,
                index,
            );
            assignments.push(PropertyAssignment {
                property,
                navigation: Navigation::child(index),
                type_instance: t,
            });
        }
        Ok(assignments)
    }

    /// A rule whose body is a choice.
    ///
    /// The rule's own data type is memoized as a placeholder while the
    /// alternatives are derived. When unification yields another type and
    /// nothing referred to the placeholder, the placeholder is withdrawn;
    /// otherwise the placeholder becomes a union named after the rule.
    fn choice_rule(
        &mut self,
        grammar: GrammarId,
        defining: GrammarId,
        name: &str,
        alternatives: &[ItemId],
    ) -> Result<TypeInstance, DeriveError> {
        let namespace = self.context(grammar).namespace;
        let type_name = self.config.naming.type_name(name);
        let decl = self
            .model
            .namespace_mut(namespace)
            .find_or_create_data_type_named(&type_name);
        let placeholder = TypeInstance::of(decl);
        {
            let context = self.context(grammar);
            context.rule_types.insert(name.to_owned(), placeholder.clone());
            context.pending_choices.insert(name.to_owned());
        }

        let mut types = Vec::with_capacity(alternatives.len());
        for &alt in alternatives {
            types.push(self.item_type(grammar, ItemRef::new(defining, alt), false)?);
        }

        let used = {
            let context = self.context(grammar);
            context.pending_choices.remove(name);
            context.placeholder_used.remove(name)
        };
        let created_before = self.model.namespace(namespace).declaration_count();
        let unified = unify_choice(&mut self.model, namespace, &types, Some(decl));
        let t = if unified.decl == decl {
            unified
        } else if used {
            let members = self.union_members(&unified, decl);
            if !members.is_empty() {
                let fresh = unified.decl.namespace() == namespace
                    && unified.decl.index() >= created_before;
                let ns = self.model.namespace_mut(namespace);
                if fresh {
                    ns.withdraw_unnamed(unified.decl);
                }
                ns.redefine_as_union(decl, members);
            }
            placeholder.with_nullable(unified.nullable)
        } else {
            self.model.namespace_mut(namespace).remove_owned(&type_name);
            unified
        };
        trace!(rule = name, ty = %self.model.signature(&t), "choice rule unified");

        self.context(grammar)
            .rule_types
            .insert(name.to_owned(), t.clone());
        let select = TransformRule::Select {
            type_instance: t.clone(),
            navigation: Navigation::child(0),
        };
        self.transforms.insert(namespace, name, select);
        Ok(t)
    }

    /// Members the placeholder `decl` stands for once `unified` is known.
    /// The placeholder itself adds nothing to its own union.
    fn union_members(&self, unified: &TypeInstance, decl: DeclId) -> Vec<TypeInstance> {
        let members = match self.model.declaration(unified.decl) {
            TypeDeclaration::UnnamedSupertype(union) if union.name.is_none() => {
                union.subtypes.clone()
            }
            _ if stdlib::is_nothing(unified) => Vec::new(),
            _ => vec![unified.clone().non_null()],
        };
        members.into_iter().filter(|m| m.decl != decl).collect()
    }

    /// Type of a rule item. `for_property` is set when the item is one
    /// element of a sequence; terminals there carry no information.
    fn item_type(
        &mut self,
        grammar: GrammarId,
        item: ItemRef,
        for_property: bool,
    ) -> Result<TypeInstance, DeriveError> {
        if let Some(t) = self.context(grammar).item_types.get(&(item, for_property)) {
            return Ok(t.clone());
        }
        let grammars = self.grammars;
        let defining = grammars.get(item.grammar);

        let t = match grammars.item(item) {
            RuleItem::Empty => stdlib::nothing(),
            RuleItem::Terminal { .. } => {
                if for_property {
                    stdlib::nothing()
                } else {
                    stdlib::string()
                }
            }
            RuleItem::NonTerminal { name } => self.rule_type(grammar, name)?,
            RuleItem::Embedded {
                grammar: embedded,
                goal,
            } => self.embedded_type(grammar, embedded, goal)?,
            RuleItem::Concatenation(items) => self.tuple_type(grammar, item, items)?,
            RuleItem::Choice(alternatives) => {
                let mut types = Vec::with_capacity(alternatives.len());
                for &alt in alternatives {
                    types.push(self.item_type(grammar, ItemRef::new(item.grammar, alt), false)?);
                }
                let namespace = self.context(grammar).namespace;
                unify_choice(&mut self.model, namespace, &types, None)
            }
            RuleItem::Optional(inner) => {
                let t = self.item_type(grammar, ItemRef::new(item.grammar, *inner), for_property)?;
                if stdlib::is_nothing(&t) {
                    t
                } else {
                    t.make_nullable()
                }
            }
            RuleItem::SimpleList { item: element, .. } => {
                self.list_type(grammar, item, for_property, *element, None)?
            }
            RuleItem::SeparatedList {
                item: element,
                separator,
                ..
            } => self.list_type(grammar, item, for_property, *element, Some(*separator))?,
            RuleItem::Group(content) => match defining.item(*content) {
                RuleItem::Choice(_) => {
                    self.item_type(grammar, ItemRef::new(item.grammar, *content), for_property)?
                }
                RuleItem::Concatenation(items) => self.tuple_type(grammar, item, items)?,
                _ => self.tuple_type(grammar, item, &[*content])?,
            },
        };

        self.context(grammar)
            .item_types
            .insert((item, for_property), t.clone());
        Ok(t)
    }

    /// `List<E>` or `ListSeparated<E, S>`. The list is memoized before its
    /// element is derived and withdrawn again if the element is `Nothing`.
    fn list_type(
        &mut self,
        grammar: GrammarId,
        item: ItemRef,
        for_property: bool,
        element: ItemId,
        separator: Option<ItemId>,
    ) -> Result<TypeInstance, DeriveError> {
        let provisional = match separator {
            Some(_) => stdlib::list_separated_of(stdlib::any(), stdlib::any()),
            None => stdlib::list_of(stdlib::any()),
        };
        self.context(grammar)
            .item_types
            .insert((item, for_property), provisional);

        let element_type = self.item_type(grammar, ItemRef::new(item.grammar, element), false)?;
        if stdlib::is_nothing(&element_type) {
            self.context(grammar).item_types.remove(&(item, for_property));
            return Ok(stdlib::nothing());
        }
        let t = match separator {
            Some(separator) => {
                let separator_type =
                    self.item_type(grammar, ItemRef::new(item.grammar, separator), false)?;
                TypeInstance::with_args(LIST_SEPARATED, vec![element_type, separator_type])
            }
            None => TypeInstance::with_args(LIST, vec![element_type]),
        };
        Ok(t)
    }

    /// Anonymous sequence: a tuple with one property per item, or `Nothing`
    /// when no item carries information. `origin` is the concatenation or
    /// group item the tuple is recorded under.
    fn tuple_type(
        &mut self,
        grammar: GrammarId,
        origin: ItemRef,
        items: &[ItemId],
    ) -> Result<TypeInstance, DeriveError> {
        let defining = origin.grammar;
        let grammars = self.grammars;
        let defining_grammar = grammars.get(defining);
        let mut properties = Vec::new();
        for (index, &item) in items.iter().enumerate() {
            assert_not_nested_concatenation(defining_grammar.item(item), "<group>");
            let t = self.item_type(grammar, ItemRef::new(defining, item), true)?;
            if !stdlib::is_nothing(&t) {
                properties.push((index, item, t));
            }
        }
        if properties.is_empty() {
            return Ok(stdlib::nothing());
        }

        let namespace = self.context(grammar).namespace;
        let tuple = self.model.namespace_mut(namespace).create_tuple_type();
        let mut assignments = Vec::with_capacity(properties.len());
        for (index, item, t) in properties {
            let base = self.config.naming.property_name(defining_grammar, item, &t);
            let property = self.model.add_property(
                tuple,
                &base,
                t.clone(),
                PropertyCharacteristics::DERIVED_FROM_GRAMMAR,
                index,
            );
            assignments.push(PropertyAssignment {
                property,
                navigation: Navigation::child(index),
                type_instance: t,
            });
        }
        let t = TypeInstance::of(tuple);
        self.context(grammar).tuples.insert(origin, tuple);
        self.transforms.insert_tuple(
            tuple,
            TransformRule::CreateObject {
                type_instance: t.clone(),
                assignments,
            },
        );
        Ok(t)
    }

    /// Goal type of an embedded grammar, derived into its own namespace
    /// once and imported by the host namespace.
    fn embedded_type(
        &mut self,
        host: GrammarId,
        embedded: &str,
        goal: &str,
    ) -> Result<TypeInstance, DeriveError> {
        let Some(embedded_id) = self.grammars.lookup(embedded) else {
            return Err(DeriveError::UnknownGrammar(embedded.to_owned()));
        };
        let embedded_namespace = if self.config.derive_all_embedded_rules {
            self.derive_grammar(embedded_id)?
        } else {
            self.open_grammar(embedded_id).0
        };
        let host_namespace = self.context(host).namespace;
        if host_namespace != embedded_namespace {
            let qualified = self
                .model
                .namespace(embedded_namespace)
                .qualified_name()
                .to_owned();
            self.model.namespace_mut(host_namespace).add_import(qualified);
        }
        self.rule_type(embedded_id, goal)
    }
}
