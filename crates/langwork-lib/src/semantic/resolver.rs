//! Reference resolution over an ASM whose scopes have been built.
//!
//! The walk only reads the ASM. Property updates are collected and applied
//! by the caller once the walk completes.

use tracing::trace;

use crate::asm::{Asm, AsmPath, AsmReference, AsmValue, AsmWalker, ElementId, ReferenceTarget};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::typemodel::TypeModel;
use crate::xref::{CrossReferenceModel, Expression, ReferenceExpression, type_matches};

use super::evaluate::{element_of, evaluate, property_slot};
use super::invariants::ensure_scope;
use super::scope::{ScopeId, ScopeItem, ScopeTree};

/// A property value to replace once the walk is done.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyUpdate {
    pub element: ElementId,
    pub property: String,
    pub value: AsmValue,
}

/// Outcome of looking a name up.
enum Lookup<'s> {
    Unique(&'s ScopeItem),
    Missing,
    Ambiguous,
}

pub struct ReferenceResolver<'a> {
    model: &'a TypeModel,
    xref: &'a CrossReferenceModel,
    scopes: &'a ScopeTree,
    /// Replace resolved values. Without it, references are only checked.
    resolve: bool,
    stack: Vec<ScopeId>,
    updates: Vec<PropertyUpdate>,
    diagnostics: Diagnostics,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(
        model: &'a TypeModel,
        xref: &'a CrossReferenceModel,
        scopes: &'a ScopeTree,
        resolve: bool,
    ) -> Self {
        Self {
            model,
            xref,
            scopes,
            resolve,
            stack: Vec::new(),
            updates: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn finish(self) -> (Vec<PropertyUpdate>, Diagnostics) {
        (self.updates, self.diagnostics)
    }

    fn resolve_expression(
        &mut self,
        asm: &Asm,
        element: ElementId,
        expression: &ReferenceExpression,
        scope: ScopeId,
    ) {
        match expression {
            ReferenceExpression::Property {
                referring,
                target_types,
                from,
            } => self.resolve_property(asm, element, referring, target_types, from.as_ref(), scope),
            ReferenceExpression::Collection {
                navigation,
                of_type,
                expressions,
            } => {
                let items = match evaluate(asm, element, navigation) {
                    AsmValue::List(items) => items,
                    single @ (AsmValue::Structure(_) | AsmValue::Reference(_)) => vec![single],
                    AsmValue::Nothing | AsmValue::Primitive(_) => Vec::new(),
                };
                for item in items.iter().filter_map(element_of) {
                    let structure = asm.structure(item);
                    if let Some(of_type) = of_type
                        && !type_matches(self.model, &structure.type_name, of_type)
                    {
                        continue;
                    }
                    let item_scope = self.scopes.scope_for_path(&structure.path).unwrap_or(scope);
                    for nested in expressions {
                        self.resolve_expression(asm, item, nested, item_scope);
                    }
                }
            }
        }
    }

    fn resolve_property(
        &mut self,
        asm: &Asm,
        element: ElementId,
        referring: &Expression,
        target_types: &[String],
        from: Option<&Expression>,
        scope: ScopeId,
    ) {
        let path = &asm.structure(element).path;
        let scope = match from {
            None => scope,
            Some(from) => match self.scope_of(asm, element, from) {
                Some(scope) => scope,
                None => {
                    self.diagnostics
                        .report(DiagnosticKind::NoScopeForNavigation)
                        .at(path.as_str())
                        .data(from.to_string())
                        .emit();
                    return;
                }
            },
        };

        let Some((owner, property)) = property_slot(asm, element, referring) else {
            self.invalid_value(path, referring);
            return;
        };
        let location = asm.structure(owner).path.property(&property);
        let value = asm
            .structure(owner)
            .property(&property)
            .cloned()
            .unwrap_or(AsmValue::Nothing);

        let scopes = self.scopes;
        let (reference, lookup) = match &value {
            AsmValue::Nothing => return,
            AsmValue::Reference(AsmReference {
                target: ReferenceTarget::Element(_) | ReferenceTarget::External,
                ..
            }) => return,
            AsmValue::Primitive(name)
            | AsmValue::Reference(AsmReference {
                reference: name,
                target: ReferenceTarget::Unresolved,
            }) => {
                let found = scopes.find_conforming_to(self.model, scope, name, target_types);
                (name.clone(), classify(found))
            }
            AsmValue::List(items) => {
                let Some(names) = items
                    .iter()
                    .map(|item| item.as_primitive().map(str::to_owned))
                    .collect::<Option<Vec<_>>>()
                else {
                    self.invalid_value(&location, referring);
                    return;
                };
                let found = scopes.find_qualified_conforming_to(self.model, &names, target_types);
                (names.join("."), classify(found))
            }
            AsmValue::Structure(_) => {
                self.invalid_value(&location, referring);
                return;
            }
        };
        trace!(reference = %reference, at = %location, "resolve reference");

        let target = match lookup {
            Lookup::Missing => {
                self.diagnostics
                    .report(DiagnosticKind::UnresolvedReference)
                    .at(location.as_str())
                    .message(reference.as_str())
                    .emit();
                ReferenceTarget::Unresolved
            }
            Lookup::Ambiguous => {
                self.diagnostics
                    .report(DiagnosticKind::AmbiguousReference)
                    .at(location.as_str())
                    .message(reference.as_str())
                    .emit();
                ReferenceTarget::Unresolved
            }
            Lookup::Unique(item) if item.external => ReferenceTarget::External,
            Lookup::Unique(item) => match self.target_element(asm, item, &location) {
                Some(id) => ReferenceTarget::Element(id),
                None => ReferenceTarget::Unresolved,
            },
        };

        if self.resolve {
            self.updates.push(PropertyUpdate {
                element: owner,
                property,
                value: AsmValue::Reference(AsmReference { reference, target }),
            });
        }
    }

    /// The ASM structure a scope item was registered for.
    fn target_element(
        &mut self,
        asm: &Asm,
        item: &ScopeItem,
        location: &AsmPath,
    ) -> Option<ElementId> {
        let target = item.path.as_ref().and_then(|path| asm.value_at(path));
        match target {
            Some(AsmValue::Structure(id)) => Some(*id),
            Some(_) => {
                self.diagnostics
                    .report(DiagnosticKind::ReferenceTargetNotElement)
                    .at(location.as_str())
                    .data(item.identifier.as_str())
                    .emit();
                None
            }
            None => {
                self.diagnostics
                    .report(DiagnosticKind::ReferenceTargetMissing)
                    .at(location.as_str())
                    .data(item.identifier.as_str())
                    .emit();
                None
            }
        }
    }

    /// Scope opened by the element `from` navigates to.
    fn scope_of(&self, asm: &Asm, element: ElementId, from: &Expression) -> Option<ScopeId> {
        let target = element_of(&evaluate(asm, element, from))?;
        self.scopes.scope_for_path(&asm.structure(target).path)
    }

    fn invalid_value(&mut self, location: &AsmPath, referring: &Expression) {
        self.diagnostics
            .report(DiagnosticKind::InvalidReferenceValue)
            .at(location.as_str())
            .data(referring.to_string())
            .emit();
    }
}

fn classify(found: Vec<&ScopeItem>) -> Lookup<'_> {
    match found.as_slice() {
        [] => Lookup::Missing,
        [item] => Lookup::Unique(*item),
        _ => Lookup::Ambiguous,
    }
}

impl AsmWalker for ReferenceResolver<'_> {
    fn before_root(&mut self, _asm: &Asm, _root: &AsmValue) {
        self.stack.clear();
        self.stack.push(self.scopes.root());
    }

    fn after_root(&mut self, _asm: &Asm, _root: &AsmValue) {
        self.stack.clear();
    }

    fn before_structure(&mut self, asm: &Asm, id: ElementId) {
        let current = ensure_scope(self.stack.last().copied());
        let element = asm.structure(id);
        let scope = self.scopes.scope_for_path(&element.path).unwrap_or(current);
        self.stack.push(scope);

        let xref = self.xref;
        for expression in xref.reference_expressions(self.model, &element.type_name) {
            self.resolve_expression(asm, id, expression, scope);
        }
    }

    fn after_structure(&mut self, _asm: &Asm, _id: ElementId) {
        self.stack.pop();
    }
}
