//! Cross-reference model consumed by semantic analysis.

mod expression;
mod model;


pub use expression::{Expression, ExpressionError};
pub use model::{CrossReferenceModel, ReferenceExpression, type_matches};
