//! Scope creation: one walk registering identified elements and opening
//! child scopes for scope-defining types.

use tracing::trace;

use crate::asm::{Asm, AsmValue, AsmWalker, ElementId};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::typemodel::TypeModel;
use crate::xref::CrossReferenceModel;

use super::evaluate::evaluate;
use super::invariants::ensure_scope;
use super::scope::{ScopeId, ScopeTree};

pub struct ScopeCreator<'a> {
    model: &'a TypeModel,
    xref: &'a CrossReferenceModel,
    tree: ScopeTree,
    stack: Vec<ScopeId>,
    /// Per open structure: whether it pushed a scope.
    pushed: Vec<bool>,
    diagnostics: Diagnostics,
}

impl<'a> ScopeCreator<'a> {
    pub fn new(model: &'a TypeModel, xref: &'a CrossReferenceModel, tree: ScopeTree) -> Self {
        Self {
            model,
            xref,
            tree,
            stack: Vec::new(),
            pushed: Vec::new(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn finish(self) -> (ScopeTree, Diagnostics) {
        (self.tree, self.diagnostics)
    }

    /// Name an element is known by in its parent scope.
    ///
    /// `None` when the type has no identifying expression or the value is
    /// not a name. An absent value falls back to the simple type name.
    fn identify(&mut self, asm: &Asm, id: ElementId) -> Option<String> {
        let element = asm.structure(id);
        let xref = self.xref;
        let expression = xref.identifying_expression(self.model, &element.type_name)?;
        match evaluate(asm, id, expression) {
            AsmValue::Primitive(name) => Some(name),
            AsmValue::Reference(reference) => Some(reference.reference),
            AsmValue::Nothing => {
                self.diagnostics
                    .report(DiagnosticKind::ElementNotIdentified)
                    .at(element.path.as_str())
                    .data(expression.to_string())
                    .emit();
                Some(element.simple_type_name().to_owned())
            }
            AsmValue::List(_) | AsmValue::Structure(_) => {
                self.diagnostics
                    .report(DiagnosticKind::IdentityNotScalar)
                    .at(element.path.as_str())
                    .data(expression.to_string())
                    .emit();
                None
            }
        }
    }
}

impl AsmWalker for ScopeCreator<'_> {
    fn before_root(&mut self, _asm: &Asm, _root: &AsmValue) {
        self.stack.clear();
        self.stack.push(self.tree.root());
    }

    fn after_root(&mut self, _asm: &Asm, _root: &AsmValue) {
        self.stack.clear();
    }

    fn before_structure(&mut self, asm: &Asm, id: ElementId) {
        let current = ensure_scope(self.stack.last().copied());
        let identity = self.identify(asm, id);
        let element = asm.structure(id);

        if let Some(name) = &identity
            && !self
                .tree
                .add_to_scope(current, name, &element.type_name, element.path.clone())
        {
            self.diagnostics
                .report(DiagnosticKind::DuplicateScopeItem)
                .at(element.path.as_str())
                .message(name.as_str())
                .emit();
        }

        if !self.xref.is_scope_defining(self.model, &element.type_name) {
            self.pushed.push(false);
            return;
        }
        let key = identity.unwrap_or_else(|| element.simple_type_name().to_owned());
        let scope = self
            .tree
            .create_or_get_child(current, &key, &element.type_name);
        self.tree.record_path(element.path.clone(), scope);
        trace!(scope = %key, path = %element.path, "open scope");
        self.stack.push(scope);
        self.pushed.push(true);
    }

    fn after_structure(&mut self, _asm: &Asm, _id: ElementId) {
        if self.pushed.pop() == Some(true) {
            self.stack.pop();
        }
    }
}
