//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use langwork_core::RuleItem;

#[inline]
pub fn assert_not_nested_concatenation(item: &RuleItem, rule: &str) {
    assert!(
        !matches!(item, RuleItem::Concatenation(_)),
        "derive: concatenation nested directly in a concatenation of rule `{rule}` \
         (Grammar::concatenation flattens nested sequences)"
    );
}

/// Every import the deriver records names a namespace it registered.
#[inline]
pub fn assert_imports_resolved(unresolved: &[String]) {
    assert!(
        unresolved.is_empty(),
        "derive: imports of unregistered namespaces: {}",
        unresolved.join(", ")
    );
}

#[inline]
pub fn ensure_context<T>(context: Option<T>) -> T {
    context.expect("derive: grammar context is created before any of its rules is derived")
}
