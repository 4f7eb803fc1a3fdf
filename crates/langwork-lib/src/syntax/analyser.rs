//! Syntax analysis: apply transform rules to a parse tree, producing an ASM.
//!
//! The walk pairs parse nodes with the rule items that produced them, the
//! same way the deriver paired rule items with properties. A `child[i]`
//! navigation therefore reads the i-th item of the rule body.

use langwork_core::{GrammarId, GrammarSet, ItemId, ItemRef, RuleItem};
use tracing::{debug, trace};

use crate::asm::{Asm, AsmPath, AsmValue, ElementId};
use crate::derive::Derivation;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::transform::{Navigation, NavigationSegment, TransformRule};
use crate::{Error, PassResult};

use super::parse_tree::ParseNode;

/// A rule item paired with the parse node it matched.
type Child<'t> = (ItemId, &'t ParseNode);

/// Builds ASMs from parse trees using a derivation's transform rules.
///
/// Each call to [`analyse`](Self::analyse) starts from an empty ASM, so the
/// analyser can be reused.
pub struct SyntaxAnalyser<'a> {
    grammars: &'a GrammarSet,
    derivation: &'a Derivation,
}

impl<'a> SyntaxAnalyser<'a> {
    pub fn new(grammars: &'a GrammarSet, derivation: &'a Derivation) -> Self {
        Self {
            grammars,
            derivation,
        }
    }

    /// Build an ASM whose single root is `tree`, a node of `goal_rule`.
    pub fn analyse(&self, grammar: GrammarId, goal_rule: &str, tree: &ParseNode) -> PassResult<Asm> {
        if self.derivation.transform(grammar, goal_rule).is_none() {
            let qualified = format!("{}.{goal_rule}", self.grammars.get(grammar).qualified_name());
            return Err(Error::MissingTransformRule(qualified));
        }
        debug!(rule = goal_rule, "syntax analysis");

        let mut builder = AsmBuilder {
            grammars: self.grammars,
            derivation: self.derivation,
            asm: Asm::new(),
            diagnostics: Diagnostics::new(),
        };
        let path = builder.asm.next_root_path();
        let root = builder.rule_value(grammar, goal_rule, tree, &path);
        builder.asm.add_root(root);

        debug!(
            elements = builder.asm.len(),
            diagnostics = builder.diagnostics.len(),
            "asm built"
        );
        Ok((builder.asm, builder.diagnostics))
    }
}

struct AsmBuilder<'a> {
    grammars: &'a GrammarSet,
    derivation: &'a Derivation,
    asm: Asm,
    diagnostics: Diagnostics,
}

impl<'a> AsmBuilder<'a> {
    fn mismatch(&mut self, path: &AsmPath, detail: impl Into<String>) -> AsmValue {
        self.diagnostics
            .report(DiagnosticKind::ParseTreeMismatch)
            .at(path.as_str())
            .message(detail)
            .emit();
        AsmValue::Nothing
    }

    /// Value of a rule node. `context` is the grammar whose namespace the
    /// rule was derived into.
    fn rule_value(
        &mut self,
        context: GrammarId,
        name: &str,
        node: &ParseNode,
        path: &AsmPath,
    ) -> AsmValue {
        if node.rule_name() != Some(name) {
            let found = node.rule_name().unwrap_or("a pseudo node").to_owned();
            return self.mismatch(path, format!("expected rule `{name}`, found {found}"));
        }
        let grammars = self.grammars;
        let Some((defining, rule)) = grammars.find_rule(context, name) else {
            return self.mismatch(path, format!("rule `{name}` is not defined"));
        };
        let derivation = self.derivation;
        let Some(transform) = derivation.transform(context, name) else {
            let qualified = format!("{}.{name}", grammars.get(context).qualified_name());
            self.diagnostics
                .report(DiagnosticKind::MissingTransformRule)
                .at(path.as_str())
                .message(qualified)
                .emit();
            return AsmValue::Nothing;
        };
        trace!(rule = name, path = %path, "apply transform");

        let children = if rule.leaf {
            Vec::new()
        } else {
            match self.rule_children(defining, rule.rhs, node) {
                Some(children) => children,
                None => {
                    return self.mismatch(path, format!("children of `{name}` do not match its body"));
                }
            }
        };
        self.apply(context, defining, transform, node, &children, path)
    }

    /// Pair the children of a rule node with the items of the rule body.
    fn rule_children<'t>(
        &self,
        defining: GrammarId,
        rhs: ItemId,
        node: &'t ParseNode,
    ) -> Option<Vec<Child<'t>>> {
        let grammar = self.grammars.get(defining);
        let children = node.children();
        let body = grammar.item(rhs);
        let alternatives = match body {
            RuleItem::Choice(alternatives) => Some(alternatives),
            RuleItem::Group(content) => match grammar.item(*content) {
                RuleItem::Choice(alternatives) => Some(alternatives),
                _ => None,
            },
            _ => None,
        };
        if let Some(alternatives) = alternatives {
            let alternative = *alternatives.get(node.option())?;
            return match children {
                [child] => Some(vec![(alternative, child)]),
                _ => None,
            };
        }
        match (body, children) {
            (RuleItem::Concatenation(items), _) if items.len() == children.len() => {
                Some(items.iter().copied().zip(children).collect())
            }
            (RuleItem::Concatenation(_), _) => None,
            (RuleItem::Empty, []) => Some(Vec::new()),
            (_, [child]) => Some(vec![(rhs, child)]),
            _ => None,
        }
    }

    fn apply(
        &mut self,
        context: GrammarId,
        defining: GrammarId,
        transform: &TransformRule,
        node: &ParseNode,
        children: &[Child<'_>],
        path: &AsmPath,
    ) -> AsmValue {
        match transform {
            TransformRule::Select { navigation, .. } => {
                self.evaluate(context, defining, navigation, node, children, path)
            }
            TransformRule::CreateObject {
                type_instance,
                assignments,
            } => {
                let type_name = self
                    .derivation
                    .type_model
                    .qualified_type_name(type_instance.decl);
                let id = self.asm.create_structure(path.clone(), type_name);
                for assignment in assignments {
                    let property_path = path.property(&assignment.property);
                    let value = self.evaluate(
                        context,
                        defining,
                        &assignment.navigation,
                        node,
                        children,
                        &property_path,
                    );
                    self.asm.set_property(id, &assignment.property, value);
                }
                AsmValue::Structure(id)
            }
            TransformRule::ModifyObject {
                base, assignments, ..
            } => {
                let value = self.apply(context, defining, base, node, children, path);
                let Some(id) = value.as_structure() else {
                    return value;
                };
                for assignment in assignments {
                    let navigation = &assignment.navigation;
                    let modified = match navigation.segments().first() {
                        Some(NavigationSegment::Child(_)) => {
                            let property_path = path.property(&assignment.property);
                            self.evaluate(context, defining, navigation, node, children, &property_path)
                        }
                        Some(NavigationSegment::Property(_)) | None => self.built_value(id, navigation),
                    };
                    self.asm.set_property(id, &assignment.property, modified);
                }
                value
            }
        }
    }

    /// Evaluate a navigation against a parse node: `self` is the node's
    /// text, `child[i]` the value of the i-th body item, and any further
    /// property segments read the built value.
    fn evaluate(
        &mut self,
        context: GrammarId,
        defining: GrammarId,
        navigation: &Navigation,
        node: &ParseNode,
        children: &[Child<'_>],
        path: &AsmPath,
    ) -> AsmValue {
        let mut segments = navigation.segments().iter();
        let mut value = match segments.next() {
            None => AsmValue::Primitive(node.text()),
            Some(NavigationSegment::Child(index)) => {
                let Some(&(item, child)) = children.get(*index) else {
                    return self.mismatch(path, format!("no child at index {index}"));
                };
                self.item_value(context, ItemRef::new(defining, item), child, path)
            }
            Some(NavigationSegment::Property(name)) => {
                return self.mismatch(path, format!("`{name}` cannot be read from a parse node"));
            }
        };
        for segment in segments {
            value = self.project(&value, segment);
        }
        value
    }

    /// Evaluate a property navigation against an already built structure.
    fn built_value(&self, id: ElementId, navigation: &Navigation) -> AsmValue {
        navigation
            .segments()
            .iter()
            .fold(AsmValue::Structure(id), |value, segment| self.project(&value, segment))
    }

    fn project(&self, value: &AsmValue, segment: &NavigationSegment) -> AsmValue {
        match (value, segment) {
            (AsmValue::Structure(id), NavigationSegment::Property(name)) => self
                .asm
                .structure(*id)
                .property(name)
                .cloned()
                .unwrap_or(AsmValue::Nothing),
            (AsmValue::List(items), NavigationSegment::Child(index)) => {
                items.get(*index).cloned().unwrap_or(AsmValue::Nothing)
            }
            _ => AsmValue::Nothing,
        }
    }

    fn item_value(
        &mut self,
        context: GrammarId,
        item: ItemRef,
        node: &ParseNode,
        path: &AsmPath,
    ) -> AsmValue {
        let grammars = self.grammars;
        let grammar = grammars.get(item.grammar);
        let at = |id: ItemId| ItemRef::new(item.grammar, id);

        match grammar.item(item.item) {
            RuleItem::Empty => AsmValue::Nothing,
            RuleItem::Terminal { .. } => AsmValue::Primitive(node.text()),
            RuleItem::NonTerminal { name } => self.rule_value(context, name, node, path),
            RuleItem::Embedded {
                grammar: embedded,
                goal,
            } => match grammars.lookup(embedded) {
                Some(embedded) => self.rule_value(embedded, goal, node, path),
                None => self.mismatch(path, format!("grammar `{embedded}` is not defined")),
            },
            RuleItem::Choice(alternatives) => {
                match (alternatives.get(node.option()), node.children()) {
                    (Some(&alternative), [child]) => {
                        self.item_value(context, at(alternative), child, path)
                    }
                    _ => self.mismatch(path, "choice node does not match its alternatives"),
                }
            }
            RuleItem::Optional(inner) => match node.children() {
                [] => AsmValue::Nothing,
                [child] => self.item_value(context, at(*inner), child, path),
                _ => self.mismatch(path, "optional node has more than one child"),
            },
            RuleItem::SimpleList { item: element, .. } => {
                let items = node
                    .children()
                    .iter()
                    .enumerate()
                    .map(|(j, child)| self.item_value(context, at(*element), child, &path.item(j)))
                    .collect();
                AsmValue::List(items)
            }
            RuleItem::SeparatedList {
                item: element,
                separator,
                ..
            } => {
                let items = node
                    .children()
                    .iter()
                    .enumerate()
                    .map(|(j, child)| {
                        let of = if j % 2 == 0 { *element } else { *separator };
                        self.item_value(context, at(of), child, &path.item(j))
                    })
                    .collect();
                AsmValue::List(items)
            }
            RuleItem::Concatenation(items) => {
                self.tuple_value(context, item, items, node, node.children(), path)
            }
            RuleItem::Group(content) => match (grammar.item(*content), node.children()) {
                (RuleItem::Choice(_), [child]) => {
                    self.item_value(context, at(*content), child, path)
                }
                (RuleItem::Concatenation(items), [child]) => {
                    self.tuple_value(context, item, items, child, child.children(), path)
                }
                (RuleItem::Choice(_) | RuleItem::Concatenation(_), _) => {
                    self.mismatch(path, "group node must have exactly one child")
                }
                _ => self.tuple_value(context, item, &[*content], node, node.children(), path),
            },
        }
    }

    /// Value of a concatenation or group item: the tuple derived for it, or
    /// `Nothing` when no item carries information.
    fn tuple_value(
        &mut self,
        context: GrammarId,
        origin: ItemRef,
        items: &[ItemId],
        node: &ParseNode,
        nodes: &[ParseNode],
        path: &AsmPath,
    ) -> AsmValue {
        let derivation = self.derivation;
        let Some(transform) = derivation
            .tuple_type(context, origin)
            .and_then(|tuple| derivation.transforms.tuple(tuple))
        else {
            return AsmValue::Nothing;
        };
        if items.len() != nodes.len() {
            return self.mismatch(
                path,
                format!("expected {} children, found {}", items.len(), nodes.len()),
            );
        }
        let children: Vec<Child<'_>> = items.iter().copied().zip(nodes).collect();
        self.apply(context, origin.grammar, transform, node, &children, path)
    }
}
