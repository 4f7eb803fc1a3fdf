//! Langwork: grammar-derived type models, ASM construction and reference
//! resolution.
//!
//! # Example
//!
//! ```ignore
//! use langwork_lib::LanguageProcessor;
//!
//! let processor = LanguageProcessor::new(grammars, "lang.Lang")?
//!     .with_cross_reference_model(xref);
//! let ((asm, scopes), diagnostics) = processor.process(&parse_tree)?;
//! eprintln!("{}", diagnostics.render());
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod asm;
pub mod derive;
pub mod diagnostics;
pub mod processor;
pub mod semantic;
pub mod syntax;
pub mod transform;
pub mod typemodel;
pub mod xref;

#[cfg(test)]
mod test_utils;

/// Result type for passes that produce both output and diagnostics.
///
/// Recoverable problems are diagnostics; failures that leave no usable
/// output use the outer `Result`.
pub type PassResult<T> = std::result::Result<(T, Diagnostics), Error>;

pub use asm::{Asm, AsmPath, AsmStructure, AsmValue, ElementId};
pub use derive::{Derivation, Deriver, DeriverConfig};
pub use diagnostics::{Diagnostics, DiagnosticsPrinter, Severity};
pub use processor::LanguageProcessor;
pub use semantic::{ScopeTree, SemanticAnalyser, SemanticAnalysisOptions};
pub use syntax::{ParseNode, SyntaxAnalyser};
pub use typemodel::{TypeInstance, TypeModel};
pub use xref::CrossReferenceModel;

/// Errors that abort processing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Derive(#[from] derive::DeriveError),

    #[error("goal rule `{rule}` is not defined in grammar `{grammar}`")]
    UnknownGoalRule { grammar: String, rule: String },

    #[error("no transform rule for `{0}`")]
    MissingTransformRule(String),

    #[error("invalid cross-reference model: {0}")]
    XrefModel(#[from] serde_json::Error),
}

/// Result type for processing operations.
pub type Result<T> = std::result::Result<T, Error>;
