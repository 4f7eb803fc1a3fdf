//! Transform rules: data recipes turning a parse node into an ASM value.

use std::fmt::Write;

use indexmap::IndexMap;

use crate::typemodel::{DeclId, NamespaceId, TypeInstance, TypeModel};

use super::navigation::Navigation;

/// Binds one property of the produced object to a navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyAssignment {
    pub property: String,
    pub navigation: Navigation,
    pub type_instance: TypeInstance,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransformRule {
    /// Create a structure of `type_instance` and fill its properties.
    CreateObject {
        type_instance: TypeInstance,
        assignments: Vec<PropertyAssignment>,
    },
    /// Run `base`, then overwrite properties of the object it produced.
    /// Navigations here are evaluated against built values, not parse nodes.
    ModifyObject {
        type_instance: TypeInstance,
        base: Box<TransformRule>,
        assignments: Vec<PropertyAssignment>,
    },
    /// The node's value is the value found by `navigation`: a leaf's own
    /// text, or the chosen alternative of a choice.
    Select {
        type_instance: TypeInstance,
        navigation: Navigation,
    },
}

impl TransformRule {
    pub fn type_instance(&self) -> &TypeInstance {
        match self {
            Self::CreateObject { type_instance, .. }
            | Self::ModifyObject { type_instance, .. }
            | Self::Select { type_instance, .. } => type_instance,
        }
    }

    pub fn assignments(&self) -> &[PropertyAssignment] {
        match self {
            Self::CreateObject { assignments, .. } | Self::ModifyObject { assignments, .. } => {
                assignments
            }
            Self::Select { .. } => &[],
        }
    }
}

/// Transform rules per grammar rule, plus per tuple type.
///
/// Rules are keyed by the namespace the rule was derived into, so an
/// inherited rule gets one entry per extending grammar.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransformRuleSet {
    rules: IndexMap<(NamespaceId, String), TransformRule>,
    tuples: IndexMap<DeclId, TransformRule>,
}

impl TransformRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, namespace: NamespaceId, rule: &str) -> Option<&TransformRule> {
        self.rules.get(&(namespace, rule.to_owned()))
    }

    pub fn tuple(&self, tuple: DeclId) -> Option<&TransformRule> {
        self.tuples.get(&tuple)
    }

    pub fn len(&self) -> usize {
        self.rules.len() + self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.tuples.is_empty()
    }

    pub(crate) fn insert(&mut self, namespace: NamespaceId, rule: &str, transform: TransformRule) {
        self.rules.insert((namespace, rule.to_owned()), transform);
    }

    pub(crate) fn insert_tuple(&mut self, tuple: DeclId, transform: TransformRule) {
        self.tuples.insert(tuple, transform);
    }

    /// Layer textual assignments over an existing rule.
    ///
    /// Returns `false` if no rule is registered under that name.
    pub fn modify(
        &mut self,
        namespace: NamespaceId,
        rule: &str,
        assignments: Vec<PropertyAssignment>,
    ) -> bool {
        let Some(slot) = self.rules.get_mut(&(namespace, rule.to_owned())) else {
            return false;
        };
        let base = slot.clone();
        *slot = TransformRule::ModifyObject {
            type_instance: base.type_instance().clone(),
            base: Box::new(base),
            assignments,
        };
        true
    }

    /// Render every rule with the model's type signatures.
    pub fn dump(&self, model: &TypeModel) -> String {
        let mut out = String::new();
        for ((ns, name), rule) in &self.rules {
            let ns_name = model.namespace(*ns).qualified_name();
            write!(out, "{ns_name}.{name} := ").expect("String write never fails");
            format_rule(&mut out, model, rule);
        }
        for (decl, rule) in &self.tuples {
            write!(out, "#{} := ", decl.index()).expect("String write never fails");
            format_rule(&mut out, model, rule);
        }
        out
    }
}

fn format_rule(out: &mut String, model: &TypeModel, rule: &TransformRule) {
    let signature = model.signature(rule.type_instance());
    match rule {
        TransformRule::CreateObject { assignments, .. } => {
            out.push_str(&format!("{signature}()"));
            format_assignments(out, model, assignments);
        }
        TransformRule::ModifyObject {
            base, assignments, ..
        } => {
            out.push_str("modify ");
            let mut inner = String::new();
            format_rule(&mut inner, model, base);
            out.push_str(inner.trim_end());
            format_assignments(out, model, assignments);
        }
        TransformRule::Select { navigation, .. } => {
            out.push_str(&format!("{signature} <- {navigation}\n"));
        }
    }
}

fn format_assignments(out: &mut String, model: &TypeModel, assignments: &[PropertyAssignment]) {
    if assignments.is_empty() {
        out.push('\n');
        return;
    }
    out.push_str(" {\n");
    for a in assignments {
        out.push_str(&format!(
            "  {}: {} := {}\n",
            a.property,
            model.signature(&a.type_instance),
            a.navigation
        ));
    }
    out.push_str("}\n");
}
