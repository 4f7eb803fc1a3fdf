//! Language processor: one grammar set, processed end to end.
//!
//! Derivation runs once, on first use, and is cached. Syntax and semantic
//! analysis run per parse tree; each call reports its own diagnostics.


use std::cell::{Cell, OnceCell};

use langwork_core::{GrammarId, GrammarSet};
use tracing::debug;

use crate::asm::Asm;
use crate::derive::{DeriveError, Derivation, Deriver, DeriverConfig};
use crate::diagnostics::Diagnostics;
use crate::semantic::{ScopeTree, SemanticAnalyser, SemanticAnalysisOptions};
use crate::syntax::{ParseNode, SyntaxAnalyser};
use crate::typemodel::TypeModel;
use crate::xref::CrossReferenceModel;
use crate::{Error, PassResult, Result};

/// Derives the type model of a goal grammar and turns its parse trees into
/// resolved ASMs.
///
/// Create with [`new`](Self::new), configure with the `with_*` methods,
/// then call [`process`](Self::process) per parse tree.
#[derive(Debug)]
pub struct LanguageProcessor {
    grammars: GrammarSet,
    goal: GrammarId,
    goal_rule: Option<String>,
    config: DeriverConfig,
    xref: CrossReferenceModel,
    options: SemanticAnalysisOptions,
    /// Built-ins visible from the root scope: identifier and type name.
    externals: Vec<(String, String)>,
    derivation: OnceCell<(Derivation, Diagnostics)>,
    /// Derivation diagnostics were returned by an analysis call.
    derivation_reported: Cell<bool>,
}

impl LanguageProcessor {
    /// Processor for the grammar named `goal` (qualified, or a unique
    /// simple name).
    pub fn new(grammars: GrammarSet, goal: &str) -> Result<Self> {
        let goal = grammars
            .lookup(goal)
            .ok_or_else(|| DeriveError::UnknownGrammar(goal.to_owned()))?;
        Ok(Self {
            grammars,
            goal,
            goal_rule: None,
            config: DeriverConfig::default(),
            xref: CrossReferenceModel::default(),
            options: SemanticAnalysisOptions::default(),
            externals: Vec::new(),
            derivation: OnceCell::new(),
            derivation_reported: Cell::new(false),
        })
    }

    pub fn with_config(mut self, config: DeriverConfig) -> Self {
        self.config = config;
        self.derivation = OnceCell::new();
        self.derivation_reported = Cell::new(false);
        self
    }

    pub fn with_cross_reference_model(mut self, xref: CrossReferenceModel) -> Self {
        self.xref = xref;
        self
    }

    pub fn with_semantic_options(mut self, options: SemanticAnalysisOptions) -> Self {
        self.options = options;
        self
    }

    /// Rule parse trees start from. Defaults to the first non-skip rule of
    /// the goal grammar.
    pub fn with_goal_rule(mut self, rule: impl Into<String>) -> Self {
        self.goal_rule = Some(rule.into());
        self
    }

    /// Make `identifier` resolvable everywhere without an ASM element.
    pub fn with_external(
        mut self,
        identifier: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        self.externals.push((identifier.into(), type_name.into()));
        self
    }

    pub fn grammars(&self) -> &GrammarSet {
        &self.grammars
    }

    pub fn cross_reference_model(&self) -> &CrossReferenceModel {
        &self.xref
    }

    /// Type model and transform rules, derived on first call.
    pub fn derive(&self) -> Result<(&Derivation, &Diagnostics)> {
        if let Some((derivation, diagnostics)) = self.derivation.get() {
            return Ok((derivation, diagnostics));
        }
        let name = self.grammars.get(self.goal).qualified_name();
        debug!(grammar = %name, "deriving type model");
        let derived = Deriver::new(&self.grammars, self.config.clone()).derive(self.goal)?;
        let (derivation, diagnostics) = self.derivation.get_or_init(|| derived);
        Ok((derivation, diagnostics))
    }

    pub fn type_model(&self) -> Result<&TypeModel> {
        Ok(&self.derive()?.0.type_model)
    }

    /// Name of the rule parse trees start from.
    pub fn goal_rule(&self) -> Result<String> {
        let grammar = self.grammars.get(self.goal);
        if let Some(rule) = &self.goal_rule {
            if self.grammars.find_rule(self.goal, rule).is_none() {
                return Err(Error::UnknownGoalRule {
                    grammar: grammar.qualified_name(),
                    rule: rule.clone(),
                });
            }
            return Ok(rule.clone());
        }
        grammar
            .rules()
            .find(|rule| !rule.skip)
            .map(|rule| rule.name.clone())
            .or_else(|| {
                self.grammars
                    .all_rules(self.goal)
                    .into_iter()
                    .find(|(_, rule)| !rule.skip)
                    .map(|(_, rule)| rule.name.clone())
            })
            .ok_or_else(|| Error::UnknownGoalRule {
                grammar: grammar.qualified_name(),
                rule: String::new(),
            })
    }

    /// Derivation diagnostics, the first time an analysis asks for them.
    fn unreported_derivation_diagnostics(&self, derived: &Diagnostics) -> Diagnostics {
        let mut diagnostics = Diagnostics::new();
        if !self.derivation_reported.replace(true) {
            diagnostics.extend(derived.clone());
        }
        diagnostics
    }

    /// Build the ASM of one parse tree.
    ///
    /// The first analysis after derivation also returns the derivation's
    /// diagnostics.
    pub fn syntax_analysis(&self, tree: &ParseNode) -> PassResult<Asm> {
        let (derivation, derived) = self.derive()?;
        let goal_rule = self.goal_rule()?;
        let (asm, syntax) =
            SyntaxAnalyser::new(&self.grammars, derivation).analyse(self.goal, &goal_rule, tree)?;
        let mut diagnostics = self.unreported_derivation_diagnostics(derived);
        diagnostics.extend(syntax);
        Ok((asm, diagnostics))
    }

    /// Build the scope tree of `asm` and resolve its references in place.
    pub fn semantic_analysis(&self, asm: &mut Asm) -> PassResult<ScopeTree> {
        let (derivation, derived) = self.derive()?;
        let mut diagnostics = self.unreported_derivation_diagnostics(derived);
        let mut seeded = ScopeTree::new();
        let root = seeded.root();
        for (identifier, type_name) in &self.externals {
            seeded.add_external(root, identifier, type_name);
        }

        let mut analyser =
            SemanticAnalyser::new(&derivation.type_model, &self.xref).with_options(self.options);
        let scopes = analyser.analyse_in(asm, seeded);
        diagnostics.extend(analyser.into_diagnostics());
        Ok((scopes, diagnostics))
    }

    /// Syntax then semantic analysis. Diagnostics of both passes are
    /// returned together, syntax first.
    pub fn process(&self, tree: &ParseNode) -> PassResult<(Asm, ScopeTree)> {
        let (mut asm, mut diagnostics) = self.syntax_analysis(tree)?;
        let (scopes, semantic) = self.semantic_analysis(&mut asm)?;
        diagnostics.extend(semantic);
        debug!(
            elements = asm.len(),
            errors = diagnostics.error_count(),
            "processed parse tree"
        );
        Ok(((asm, scopes), diagnostics))
    }
}
