//! Semantic analysis of an ASM against a cross-reference model.
//!
//! Two walks over the ASM:
//! - scope creation registers identified elements by name and opens a
//!   child scope for every scope-defining element
//! - reference resolution looks reference values up in those scopes and
//!   replaces them with resolved references
//!
//! Problems are reported as diagnostics; an unresolvable reference stays
//! in the ASM as an unresolved marker.

mod analyser;
mod creator;
mod evaluate;
mod invariants;
mod resolver;
mod scope;

#[cfg(test)]
mod creator_tests;
#[cfg(test)]
mod resolver_tests;
#[cfg(test)]
mod scope_tests;

pub use analyser::{SemanticAnalyser, SemanticAnalysisOptions};
pub use creator::ScopeCreator;
pub use evaluate::evaluate;
pub use resolver::{PropertyUpdate, ReferenceResolver};
pub use scope::{ROOT_SCOPE_NAME, ScopeId, ScopeItem, ScopeTree};
