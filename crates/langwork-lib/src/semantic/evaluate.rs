//! Evaluation of cross-reference expressions against ASM elements.

use crate::asm::{Asm, AsmValue, ElementId, ReferenceTarget};
use crate::transform::NavigationSegment;
use crate::xref::Expression;

use super::invariants::panic_navigation_through;

/// Value of `expression` with `element` as `self`.
///
/// Absent values (`Nothing`, unresolved references) end navigation early
/// with `Nothing`. Resolved references are followed to their target.
pub fn evaluate(asm: &Asm, element: ElementId, expression: &Expression) -> AsmValue {
    match expression {
        Expression::SelfRef => AsmValue::Structure(element),
        Expression::Literal(text) => AsmValue::Primitive(text.clone()),
        Expression::Navigation(navigation) => navigate(
            asm,
            AsmValue::Structure(element),
            navigation.segments(),
            expression,
        ),
    }
}

/// The structure owning the property a navigation ends in, and that
/// property's name. `None` unless the expression ends in a property of an
/// element.
pub fn property_slot(
    asm: &Asm,
    element: ElementId,
    expression: &Expression,
) -> Option<(ElementId, String)> {
    let Expression::Navigation(navigation) = expression else {
        return None;
    };
    let (last, prefix) = navigation.segments().split_last()?;
    let NavigationSegment::Property(name) = last else {
        return None;
    };
    let owner = navigate(asm, AsmValue::Structure(element), prefix, expression);
    Some((element_of(&owner)?, name.clone()))
}

/// The element a value denotes: a structure or a resolved reference.
pub fn element_of(value: &AsmValue) -> Option<ElementId> {
    match value {
        AsmValue::Structure(id) => Some(*id),
        AsmValue::Reference(reference) => match reference.target {
            ReferenceTarget::Element(id) => Some(id),
            ReferenceTarget::Unresolved | ReferenceTarget::External => None,
        },
        AsmValue::Nothing | AsmValue::Primitive(_) | AsmValue::List(_) => None,
    }
}

fn navigate(
    asm: &Asm,
    start: AsmValue,
    segments: &[NavigationSegment],
    expression: &Expression,
) -> AsmValue {
    let mut current = start;
    for segment in segments {
        current = match (&current, segment) {
            (AsmValue::Nothing, _) => return AsmValue::Nothing,
            (AsmValue::List(items), NavigationSegment::Child(index)) => {
                items.get(*index).cloned().unwrap_or(AsmValue::Nothing)
            }
            (AsmValue::Structure(_) | AsmValue::Reference(_), NavigationSegment::Property(name)) => {
                let Some(id) = element_of(&current) else {
                    return AsmValue::Nothing;
                };
                asm.structure(id)
                    .property(name)
                    .cloned()
                    .unwrap_or(AsmValue::Nothing)
            }
            (value, NavigationSegment::Property(name)) => {
                panic_navigation_through(value, name, expression)
            }
            (value, NavigationSegment::Child(index)) => {
                panic_navigation_through(value, &format!("child[{index}]"), expression)
            }
        };
    }
    current
}
