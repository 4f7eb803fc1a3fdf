//! Transform rules derived alongside the type model.

mod navigation;
mod rules;


pub use navigation::{Navigation, NavigationError, NavigationSegment};
pub use rules::{PropertyAssignment, TransformRule, TransformRuleSet};
