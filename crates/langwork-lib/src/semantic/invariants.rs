//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::asm::AsmValue;
use crate::xref::Expression;

use super::scope::ScopeId;

/// Reading a property of a primitive or a list means the cross-reference
/// model does not describe this ASM.
#[cold]
pub fn panic_navigation_through(value: &AsmValue, segment: &str, expression: &Expression) -> ! {
    let kind = match value {
        AsmValue::Primitive(_) => "a primitive",
        AsmValue::List(_) => "a list",
        AsmValue::Nothing | AsmValue::Structure(_) | AsmValue::Reference(_) => "a value",
    };
    panic!(
        "semantic: cannot read `{segment}` of {kind} while evaluating `{expression}` \
         (cross-reference model does not match the ASM)"
    )
}

#[inline]
pub fn ensure_scope(scope: Option<ScopeId>) -> ScopeId {
    scope.expect("semantic: elements are visited inside a root")
}
