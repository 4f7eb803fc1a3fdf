//! Cross-reference model: which types are identified, which define scopes,
//! and which properties hold references.
//!
//! Type names may be simple (`Decl`) or qualified (`lang.Lang.Decl`). An
//! entry applies to an element whose type has that name or conforms to the
//! named type.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::typemodel::TypeModel;

use super::expression::Expression;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReferenceExpression {
    /// The value of `referring` names an element whose type conforms to
    /// one of `target_types`. With `from`, the name is looked up in the
    /// scope of the element `from` navigates to.
    Property {
        referring: Expression,
        target_types: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        from: Option<Expression>,
    },
    /// Apply `expressions` to every element of the collection found by
    /// `navigation`, optionally only to elements of `of_type`.
    Collection {
        navigation: Expression,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        of_type: Option<String>,
        expressions: Vec<ReferenceExpression>,
    },
}

impl ReferenceExpression {
    pub fn property(referring: Expression, target_types: &[&str]) -> Self {
        Self::Property {
            referring,
            target_types: target_types.iter().map(|t| (*t).to_owned()).collect(),
            from: None,
        }
    }

    /// Look the name up in the scope of the element `from` navigates to.
    pub fn in_scope_of(self, navigation: Expression) -> Self {
        match self {
            Self::Property {
                referring,
                target_types,
                ..
            } => Self::Property {
                referring,
                target_types,
                from: Some(navigation),
            },
            collection @ Self::Collection { .. } => collection,
        }
    }

    pub fn collection(
        navigation: Expression,
        of_type: Option<&str>,
        expressions: Vec<ReferenceExpression>,
    ) -> Self {
        Self::Collection {
            navigation,
            of_type: of_type.map(str::to_owned),
            expressions,
        }
    }

    fn type_names(&self, out: &mut Vec<String>) {
        match self {
            Self::Property { target_types, .. } => out.extend(target_types.iter().cloned()),
            Self::Collection {
                of_type,
                expressions,
                ..
            } => {
                out.extend(of_type.iter().cloned());
                for expression in expressions {
                    expression.type_names(out);
                }
            }
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrossReferenceModel {
    /// Type name → expression computing the name an element is known by.
    pub identifying: IndexMap<String, Expression>,
    /// Types whose elements open a child scope.
    pub scopes: IndexSet<String>,
    /// Type name → references held by elements of that type.
    pub references: IndexMap<String, Vec<ReferenceExpression>>,
}

impl CrossReferenceModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn is_empty(&self) -> bool {
        self.identifying.is_empty() && self.scopes.is_empty() && self.references.is_empty()
    }

    /// Identify elements of `type_name` by `expression`.
    pub fn identify(mut self, type_name: &str, expression: Expression) -> Self {
        self.identifying.insert(type_name.to_owned(), expression);
        self
    }

    /// Make elements of `type_name` open a child scope.
    pub fn scope(mut self, type_name: &str) -> Self {
        self.scopes.insert(type_name.to_owned());
        self
    }

    pub fn reference(mut self, type_name: &str, expression: ReferenceExpression) -> Self {
        self.references
            .entry(type_name.to_owned())
            .or_default()
            .push(expression);
        self
    }

    /// Identifying expression for an element of `type_name`. An entry for
    /// the exact type wins over one inherited through conformance.
    pub fn identifying_expression(&self, model: &TypeModel, type_name: &str) -> Option<&Expression> {
        self.identifying
            .iter()
            .find(|(declared, _)| names_type(declared, type_name))
            .or_else(|| {
                self.identifying
                    .iter()
                    .find(|(declared, _)| model.conforms_to_named(type_name, declared))
            })
            .map(|(_, expression)| expression)
    }

    pub fn is_scope_defining(&self, model: &TypeModel, type_name: &str) -> bool {
        self.scopes
            .iter()
            .any(|declared| type_matches(model, type_name, declared))
    }

    /// Reference expressions for `type_name`, including those declared for
    /// its supertypes.
    pub fn reference_expressions(
        &self,
        model: &TypeModel,
        type_name: &str,
    ) -> Vec<&ReferenceExpression> {
        self.references
            .iter()
            .filter(|(declared, _)| type_matches(model, type_name, declared))
            .flat_map(|(_, expressions)| expressions)
            .collect()
    }

    /// Type names this model mentions that `model` does not declare.
    pub fn unknown_types(&self, model: &TypeModel) -> Vec<String> {
        let mut names: Vec<String> = self.identifying.keys().cloned().collect();
        names.extend(self.scopes.iter().cloned());
        names.extend(self.references.keys().cloned());
        for expressions in self.references.values() {
            for expression in expressions {
                expression.type_names(&mut names);
            }
        }
        let mut unknown = IndexSet::new();
        for name in names {
            if model.find_first_by_possibly_qualified_or_null(&name).is_none() {
                unknown.insert(name);
            }
        }
        unknown.into_iter().collect()
    }
}

/// `declared` names `actual` exactly, by qualified or simple name.
fn names_type(declared: &str, actual: &str) -> bool {
    declared == actual
        || actual
            .rsplit_once('.')
            .is_some_and(|(_, simple)| simple == declared)
}

/// Whether an element of qualified type `actual` satisfies the declared
/// type name: same name, or conformance in `model`.
pub fn type_matches(model: &TypeModel, actual: &str, declared: &str) -> bool {
    names_type(declared, actual) || model.conforms_to_named(actual, declared)
}
