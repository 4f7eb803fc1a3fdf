//! Semantic analysis: scope building followed by reference resolution.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::asm::{Asm, walk};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::typemodel::TypeModel;
use crate::xref::CrossReferenceModel;

use super::creator::ScopeCreator;
use super::resolver::ReferenceResolver;
use super::scope::ScopeTree;

/// Which semantic passes run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticAnalysisOptions {
    /// Register identified elements and open scopes.
    pub build_scope: bool,
    /// Replace reference values with resolved references.
    pub resolve_references: bool,
    /// Report unresolvable references without changing the ASM.
    pub check_references: bool,
}

impl Default for SemanticAnalysisOptions {
    fn default() -> Self {
        Self {
            build_scope: true,
            resolve_references: true,
            check_references: true,
        }
    }
}

impl SemanticAnalysisOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build_scope(mut self, value: bool) -> Self {
        self.build_scope = value;
        self
    }

    pub fn resolve_references(mut self, value: bool) -> Self {
        self.resolve_references = value;
        self
    }

    pub fn check_references(mut self, value: bool) -> Self {
        self.check_references = value;
        self
    }
}

/// Runs the semantic passes over ASMs of one language.
///
/// Diagnostics accumulate across [`analyse`](Self::analyse) calls until
/// [`clear`](Self::clear).
pub struct SemanticAnalyser<'a> {
    model: &'a TypeModel,
    xref: &'a CrossReferenceModel,
    options: SemanticAnalysisOptions,
    diagnostics: Diagnostics,
}

impl<'a> SemanticAnalyser<'a> {
    pub fn new(model: &'a TypeModel, xref: &'a CrossReferenceModel) -> Self {
        Self {
            model,
            xref,
            options: SemanticAnalysisOptions::default(),
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn with_options(mut self, options: SemanticAnalysisOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> SemanticAnalysisOptions {
        self.options
    }

    /// Build the scope tree of `asm` and resolve its references in place.
    pub fn analyse(&mut self, asm: &mut Asm) -> ScopeTree {
        self.analyse_in(asm, ScopeTree::new())
    }

    /// Like [`analyse`](Self::analyse), starting from a tree already
    /// holding items, e.g. built-ins added with
    /// [`ScopeTree::add_external`].
    pub fn analyse_in(&mut self, asm: &mut Asm, mut tree: ScopeTree) -> ScopeTree {
        for name in self.xref.unknown_types(self.model) {
            self.diagnostics
                .report(DiagnosticKind::UnknownType)
                .message(name.as_str())
                .emit();
        }

        if self.options.build_scope {
            let mut creator = ScopeCreator::new(self.model, self.xref, tree);
            walk(asm, &mut creator);
            let (built, diagnostics) = creator.finish();
            debug!(scopes = built.len(), "scope tree built");
            tree = built;
            self.diagnostics.extend(diagnostics);
        }

        let resolve = self.options.resolve_references;
        if resolve || self.options.check_references {
            let mut resolver = ReferenceResolver::new(self.model, self.xref, &tree, resolve);
            walk(asm, &mut resolver);
            let (updates, diagnostics) = resolver.finish();
            debug!(
                resolved = updates.len(),
                problems = diagnostics.len(),
                "references resolved"
            );
            self.diagnostics.extend(diagnostics);
            for update in updates {
                asm.set_property(update.element, update.property, update.value);
            }
        }

        tree
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Drop diagnostics from earlier runs.
    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }
}
