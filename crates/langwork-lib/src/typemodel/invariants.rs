//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use super::instance::NamespaceId;

#[inline]
pub fn ensure_mutable_namespace(id: NamespaceId) {
    assert!(
        !id.is_std(),
        "typemodel: the std namespace is shared and immutable"
    );
}

#[inline]
pub fn ensure_has_properties<T>(properties: Option<T>) -> T {
    properties.expect("typemodel: properties added to a declaration without a property table")
}
